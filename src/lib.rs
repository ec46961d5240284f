//! Länge summaries from PDF protocols
//!
//! This library walks a directory of PDF protocols named
//! `DD.MM.YYYY, <number>, <address>.pdf`, reads the tables in each document,
//! picks the last numeric value of the first column and aggregates the
//! values into a semicolon separated report.

mod collect;
mod dates;
mod error;
mod extract;
mod filename;
mod lange;
mod layout;
mod output;
mod report;
mod tables;
mod types;
mod utils;

// Re-export error type
pub use error::Error;

// Re-export extraction API
pub use extract::{Pages, TableExtractor, TableExtractorBuilder, read_tables};
pub use tables::Flavor;

// Re-export the pipeline
pub use collect::{Collection, Record, TableSource, collect_records, extract_last_lange};
pub use dates::{DATE_FORMAT, DateRange, parse_date};
pub use filename::parse_date_address;
pub use lange::{format_value, is_numeric, last_lange, normalize_cell};
pub use report::{Report, csv_filename};

// Re-export public types
pub use types::{BoundingBox, Point, Table, TextLine, TextSpan};
