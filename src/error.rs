use std::fmt::Formatter;

#[derive(Debug)]
pub enum Error {
    IoError(std::io::Error),
    PdfError(lopdf::Error),
    ExtractError(pdf_extract::OutputError),
    CsvError(csv::Error),
    /// A panic raised inside the PDF backend while reading one document.
    Panic(String),
    InvalidDate(String),
    InvalidPages(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Error::IoError(e) => write!(f, "IO error: {}", e),
            Error::PdfError(e) => write!(f, "PDF error: {}", e),
            Error::ExtractError(e) => write!(f, "{}", e),
            Error::CsvError(e) => write!(f, "CSV error: {}", e),
            Error::Panic(msg) => write!(f, "PDF parser panicked: {}", msg),
            Error::InvalidDate(s) => write!(f, "Invalid date {:?}, expected DD.MM.YYYY", s),
            Error::InvalidPages(s) => write!(f, "Invalid page selection {:?}", s),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::IoError(e)
    }
}

impl From<lopdf::Error> for Error {
    fn from(e: lopdf::Error) -> Self {
        Error::PdfError(e)
    }
}

impl From<pdf_extract::OutputError> for Error {
    fn from(e: pdf_extract::OutputError) -> Self {
        Error::ExtractError(e)
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::CsvError(e)
    }
}
