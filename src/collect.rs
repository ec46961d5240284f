use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::dates::DateRange;
use crate::error::Error;
use crate::extract::TableExtractor;
use crate::filename::parse_date_address;
use crate::lange::last_lange;
use crate::types::Table;

/// Anything that can turn a PDF file into tables.
pub trait TableSource {
    fn read_tables(&self, path: &Path) -> Result<Vec<Table>, Error>;
}

impl TableSource for TableExtractor {
    fn read_tables(&self, path: &Path) -> Result<Vec<Table>, Error> {
        self.from_path(path)
    }
}

/// The last Länge value of the document at `path`.
pub fn extract_last_lange<S: TableSource + ?Sized>(
    source: &S,
    path: &Path,
) -> Result<Option<f64>, Error> {
    let tables = source.read_tables(path)?;
    Ok(last_lange(&tables))
}

/// One line of the report.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// `DD.MM.YYYY`, or empty when the file name did not match.
    pub date: String,
    pub address: String,
    pub value: Option<f64>,
}

/// Result of walking a directory.
#[derive(Debug, Default)]
pub struct Collection {
    pub records: Vec<Record>,
    /// Documents that could not be read. Each still has a record with no value.
    pub failures: Vec<(PathBuf, Error)>,
}

fn is_pdf(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.to_lowercase().ends_with(".pdf"))
}

/// Walk `root` recursively and build a record for every PDF whose date lies
/// in `range`. Without a range every PDF is taken.
///
/// Files outside the range are never opened. Read failures are kept in
/// [`Collection::failures`] and do not stop the walk.
pub fn collect_records<S: TableSource + ?Sized>(
    root: &Path,
    range: Option<&DateRange>,
    source: &S,
) -> Collection {
    let mut collection = Collection::default();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        // Symlinks are kept unless they lead to a directory; broken ones
        // surface as read failures. A root that is itself a file is not walked.
        if entry.depth() == 0 || entry.path().is_dir() || !is_pdf(entry.path()) {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        let (date, address) = parse_date_address(&name);

        if let Some(range) = range {
            if !range.matches(&date) {
                debug!("{} is outside the date range", entry.path().display());
                continue;
            }
        }

        info!("Processing {}", entry.path().display());
        let value = match extract_last_lange(source, entry.path()) {
            Ok(value) => value,
            Err(e) => {
                warn!("Error processing {}: {}", entry.path().display(), e);
                collection.failures.push((entry.path().to_path_buf(), e));
                None
            }
        };

        collection.records.push(Record {
            date,
            address,
            value,
        });
    }

    collection
}
