//! Sorting, totals and the semicolon separated summary.

use std::collections::HashSet;

use csv::{Terminator, WriterBuilder};
use tracing::debug;

use crate::collect::Record;
use crate::dates::DateRange;
use crate::error::Error;
use crate::lange::format_value;

const CSV_HEADER: [&str; 3] = ["date", "address", "last_lange"];

/// Name of the CSV file for a run over `range`.
///
/// The report is only printed; the name is kept for logging.
pub fn csv_filename(range: Option<&DateRange>) -> String {
    let day = |d: &chrono::NaiveDate| d.format("%d-%m-%Y").to_string();
    match range {
        Some(range) if range.is_single_day() => {
            format!("lange_camelot_{}.csv", day(&range.start))
        }
        Some(range) => format!(
            "lange_camelot_{}_to_{}.csv",
            day(&range.start),
            day(&range.end)
        ),
        None => "lange_camelot_all.csv".to_owned(),
    }
}

/// Records in report order with their aggregates.
#[derive(Debug, Clone)]
pub struct Report {
    records: Vec<Record>,
}

impl Report {
    /// Sort `records` by date string, then address.
    pub fn new(mut records: Vec<Record>) -> Self {
        records.sort_by(|a, b| (&a.date, &a.address).cmp(&(&b.date, &b.address)));
        Report { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Sum of all extracted values, `None` when there were none.
    pub fn total(&self) -> Option<f64> {
        self.records
            .iter()
            .filter_map(|r| r.value)
            .fold(None, |acc, v| Some(acc.unwrap_or(0.) + v))
    }

    fn total_text(&self) -> String {
        self.total().map(format_value).unwrap_or_else(|| "0".to_owned())
    }

    /// Number of distinct addresses, counting records without a value too.
    pub fn unique_addresses(&self) -> usize {
        self.records
            .iter()
            .map(|r| r.address.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// The CSV body: header, one row per record, then the `SUM` and
    /// `UNIQUE_ADDRESSES` rows.
    pub fn to_csv(&self) -> Result<String, Error> {
        let mut writer = WriterBuilder::new()
            .delimiter(b';')
            .terminator(Terminator::CRLF)
            .from_writer(Vec::new());

        writer.write_record(CSV_HEADER)?;
        for record in &self.records {
            let value = record.value.map(format_value).unwrap_or_default();
            writer.write_record([record.date.as_str(), record.address.as_str(), value.as_str()])?;
        }
        writer.write_record(["SUM", "", self.total_text().as_str()])?;
        writer.write_record([
            "UNIQUE_ADDRESSES",
            "",
            self.unique_addresses().to_string().as_str(),
        ])?;

        let bytes = writer.into_inner().map_err(|e| Error::from(e.into_error()))?;
        Ok(String::from_utf8_lossy(&bytes).trim().to_owned())
    }

    /// Everything printed at the end of a run.
    pub fn render(&self, range: Option<&DateRange>) -> Result<String, Error> {
        debug!("Report file name: {}", csv_filename(range));

        Ok(format!(
            "CSV_START\n{}\nCSV_END\n\
             Results processed in buffer\n\
             Summary:\n  \
             Total distance: {}\n  \
             Unique addresses: {}\n  \
             Entries: {}\n",
            self.to_csv()?,
            self.total_text(),
            self.unique_addresses(),
            self.records.len()
        ))
    }
}
