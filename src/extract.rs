use std::collections::BTreeSet;
use std::io::Read;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::str::FromStr;

use lopdf::Document;
use tracing::debug;

use crate::error::Error;
use crate::output::PageCollector;
use crate::tables::{Flavor, detect_tables};
use crate::types::Table;

/// Which pages to read tables from.
///
/// Parsed from `all` or a comma separated list of page numbers and ranges,
/// where `end` stands for the last page: `1,3-5,7-end`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Pages {
    #[default]
    All,
    Ranges(Vec<(u32, Option<u32>)>),
}

impl Pages {
    /// Page numbers selected in a document with `page_count` pages,
    /// ascending and without duplicates.
    pub fn resolve(&self, page_count: u32) -> Vec<u32> {
        match self {
            Pages::All => (1..=page_count).collect(),
            Pages::Ranges(ranges) => ranges
                .iter()
                .flat_map(|&(start, end)| start..=end.unwrap_or(page_count))
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
        }
    }
}

impl FromStr for Pages {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidPages(s.to_owned());
        let number = |part: &str| -> Result<u32, Error> {
            match part.trim().parse::<u32>() {
                Ok(0) | Err(_) => Err(invalid()),
                Ok(n) => Ok(n),
            }
        };

        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Pages::All);
        }

        let mut ranges = Vec::new();
        for part in s.split(',') {
            let range = match part.split_once('-') {
                Some((start, end)) if end.trim() == "end" => (number(start)?, None),
                Some((start, end)) => {
                    let (start, end) = (number(start)?, number(end)?);
                    if end < start {
                        return Err(invalid());
                    }
                    (start, Some(end))
                }
                None => {
                    let page = number(part)?;
                    (page, Some(page))
                }
            };
            ranges.push(range);
        }
        Ok(Pages::Ranges(ranges))
    }
}

/// Builder for configuring table extraction options.
///
/// # Examples
///
/// ```no_run
/// use pdf_lange::{Flavor, TableExtractor};
///
/// let tables = TableExtractor::builder()
///     .password("secret")
///     .pages("1-2".parse()?)
///     .flavor(Flavor::Stream)
///     .build()
///     .from_path("protocol.pdf")?;
/// # Ok::<(), pdf_lange::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct TableExtractorBuilder {
    password: Option<String>,
    pages: Pages,
    flavor: Flavor,
}

impl TableExtractorBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the password for encrypted PDFs.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Restrict extraction to some pages.
    pub fn pages(mut self, pages: Pages) -> Self {
        self.pages = pages;
        self
    }

    /// Choose how tables are located.
    pub fn flavor(mut self, flavor: Flavor) -> Self {
        self.flavor = flavor;
        self
    }

    /// Build the extractor configuration.
    pub fn build(self) -> TableExtractor {
        TableExtractor {
            password: self.password,
            pages: self.pages,
            flavor: self.flavor,
        }
    }
}

/// Reads the tables of a PDF document.
///
/// Failures of the underlying PDF parser, including panics on malformed
/// documents, are returned as [`Error`] values.
///
/// # Examples
///
/// ```no_run
/// use pdf_lange::TableExtractor;
///
/// for table in TableExtractor::default().from_path("protocol.pdf")? {
///     println!("page {}:\n{}", table.page_num, table);
/// }
/// # Ok::<(), pdf_lange::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct TableExtractor {
    password: Option<String>,
    pages: Pages,
    flavor: Flavor,
}

impl TableExtractor {
    /// Create a builder for configuring extraction options.
    pub fn builder() -> TableExtractorBuilder {
        TableExtractorBuilder::new()
    }

    /// Extract tables from a PDF file at the given path.
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Table>, Error> {
        let path = path.as_ref();
        guarded(|| {
            let mut doc = Document::load(path)?;
            self.extract_from_document(&mut doc)
        })
    }

    /// Extract tables from a PDF in memory.
    pub fn from_bytes(&self, bytes: &[u8]) -> Result<Vec<Table>, Error> {
        guarded(|| {
            let mut doc = Document::load_mem(bytes)?;
            self.extract_from_document(&mut doc)
        })
    }

    /// Extract tables from a PDF reader.
    pub fn from_reader<R: Read>(&self, mut reader: R) -> Result<Vec<Table>, Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.from_bytes(&bytes)
    }

    fn extract_from_document(&self, doc: &mut Document) -> Result<Vec<Table>, Error> {
        if doc.is_encrypted() {
            doc.decrypt(self.password.as_deref().unwrap_or(""))?;
        }

        let mut collector = PageCollector::new();
        match self.pages {
            Pages::All => pdf_extract::output_doc(doc, &mut collector)?,
            Pages::Ranges(_) => {
                let page_count = doc.get_pages().len() as u32;
                for page_num in self.pages.resolve(page_count) {
                    pdf_extract::output_doc_page(doc, &mut collector, page_num)?;
                }
            }
        }

        let tables: Vec<Table> = collector
            .into_pages()
            .into_iter()
            .flat_map(|page| detect_tables(page, self.flavor))
            .collect();
        debug!("{} table(s) found", tables.len());
        Ok(tables)
    }
}

/// Run `f`, turning a panic inside the PDF backend into an error.
fn guarded<T>(f: impl FnOnce() -> Result<T, Error>) -> Result<T, Error> {
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_owned());
        Err(Error::Panic(message))
    })
}

/// Extract tables from a PDF file using default settings.
///
/// This is a convenience function equivalent to `TableExtractor::default().from_path(path)`.
pub fn read_tables<P: AsRef<Path>>(path: P) -> Result<Vec<Table>, Error> {
    TableExtractor::default().from_path(path)
}
