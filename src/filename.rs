use std::path::MAIN_SEPARATOR;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PDF_NAME: Regex =
        Regex::new(r"^(\d{2}\.\d{2}\.\d{4}),\s*[\d\s]+,\s*(.+)\.pdf$").unwrap();
    static ref PATH_COMPONENT: Regex =
        Regex::new(r"^(\d{2}\.\d{2}\.\d{4}),\s*[\d\s]+,\s*(.+)").unwrap();
}

/// Split a protocol file name of the form `DD.MM.YYYY, <number>, <address>.pdf`
/// into its date and address.
///
/// When `name` itself does not match, the path components are searched from
/// the last one backwards for `DD.MM.YYYY, <number>, <address>` without an
/// extension. Returns two empty strings when nothing matches.
///
/// ```
/// let (date, address) = pdf_lange::parse_date_address("01.02.2023, 17, Hauptstr. 5.pdf");
/// assert_eq!(date, "01.02.2023");
/// assert_eq!(address, "Hauptstr. 5");
/// ```
pub fn parse_date_address(name: &str) -> (String, String) {
    if let Some(caps) = PDF_NAME.captures(name) {
        return (caps[1].to_owned(), caps[2].to_owned());
    }

    name.split(MAIN_SEPARATOR)
        .rev()
        .find_map(|part| PATH_COMPONENT.captures(part))
        .map(|caps| (caps[1].to_owned(), caps[2].to_owned()))
        .unwrap_or_default()
}
