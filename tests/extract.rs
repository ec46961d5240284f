mod common;

use common::{PdfBuilder, RuledTable, protocol};
use pdf_lange::{Flavor, TableExtractor, last_lange};

#[test_log::test]
fn reads_the_last_value_of_a_ruled_table() {
    let tables = TableExtractor::default()
        .from_bytes(&protocol().to_bytes())
        .unwrap();

    assert_eq!(tables.len(), 1);
    let table = &tables[0];
    assert_eq!(table.page_num, 1);
    assert_eq!(table.num_rows(), 3);
    assert_eq!(table.num_cols(), 2);
    assert_eq!(
        table.column(0).collect::<Vec<_>>(),
        vec!["Länge [m]", "10", "12,5"]
    );
    assert_eq!(last_lange(&tables), Some(12.5));
}

#[test_log::test]
fn lower_table_wins() {
    let pdf = protocol()
        .ruled_table(RuledTable {
            left: 50,
            top: 500,
            col_widths: &[120],
            row_height: 20,
            rows: &[&["Länge"], &["7"], &["42"]],
        })
        .to_bytes();

    let tables = TableExtractor::default().from_bytes(&pdf).unwrap();
    assert_eq!(tables.len(), 2);
    assert_eq!(last_lange(&tables), Some(42.));
}

#[test_log::test]
fn text_without_rulings_needs_stream_flavor() {
    let pdf = PdfBuilder::new()
        .text(55, 740, "Länge [m]")
        .text(55, 720, "10")
        .text(55, 700, "12,5")
        .to_bytes();

    let lattice = TableExtractor::default().from_bytes(&pdf).unwrap();
    assert!(lattice.is_empty());
    assert_eq!(last_lange(&lattice), None);

    let stream = TableExtractor::builder()
        .flavor(Flavor::Stream)
        .build()
        .from_bytes(&pdf)
        .unwrap();
    assert_eq!(stream.len(), 1);
    assert_eq!(last_lange(&stream), Some(12.5));
}

#[test_log::test]
fn page_selection_limits_the_tables() {
    let pdf = PdfBuilder::new()
        .text(55, 740, "Deckblatt")
        .page()
        .ruled_table(RuledTable {
            left: 50,
            top: 760,
            col_widths: &[150],
            row_height: 20,
            rows: &[&["Länge"], &["99"]],
        })
        .to_bytes();

    let first_only = TableExtractor::builder()
        .pages("1".parse().unwrap())
        .build()
        .from_bytes(&pdf)
        .unwrap();
    assert!(first_only.is_empty());

    let tables = TableExtractor::builder()
        .pages("2-end".parse().unwrap())
        .build()
        .from_bytes(&pdf)
        .unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].page_num, 2);
    assert_eq!(last_lange(&tables), Some(99.));
}

#[test_log::test]
fn reads_from_a_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("protokoll.pdf");
    protocol().save(&path);

    let tables = pdf_lange::read_tables(&path).unwrap();
    assert_eq!(last_lange(&tables), Some(12.5));
}

#[test_log::test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(pdf_lange::read_tables(dir.path().join("fehlt.pdf")).is_err());
}
