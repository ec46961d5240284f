//! Builds small PDF protocols with ruled tables for the integration tests.

#![allow(dead_code)]

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, StringFormat, dictionary};

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const FONT_SIZE: i64 = 10;

/// A ruled table: rows of cells drawn as a grid of stroked lines.
pub struct RuledTable<'a> {
    pub left: i64,
    pub top: i64,
    pub col_widths: &'a [i64],
    pub row_height: i64,
    pub rows: &'a [&'a [&'a str]],
}

#[derive(Default)]
pub struct PdfBuilder {
    pages: Vec<Vec<Operation>>,
}

fn latin1(text: &str) -> Object {
    Object::String(
        text.chars().map(|c| c as u32 as u8).collect(),
        StringFormat::Literal,
    )
}

impl PdfBuilder {
    pub fn new() -> Self {
        PdfBuilder {
            pages: vec![Vec::new()],
        }
    }

    /// Start a new page; later calls draw on it.
    pub fn page(mut self) -> Self {
        self.pages.push(Vec::new());
        self
    }

    fn ops(&mut self) -> &mut Vec<Operation> {
        self.pages.last_mut().expect("builder always has a page")
    }

    /// Show `text` with its baseline at (`x`, `y`) in PDF user space.
    pub fn text(mut self, x: i64, y: i64, text: &str) -> Self {
        self.ops().extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]),
            Operation::new("Td", vec![x.into(), y.into()]),
            Operation::new("Tj", vec![latin1(text)]),
            Operation::new("ET", vec![]),
        ]);
        self
    }

    fn line(mut self, from: (i64, i64), to: (i64, i64)) -> Self {
        self.ops().extend([
            Operation::new("m", vec![from.0.into(), from.1.into()]),
            Operation::new("l", vec![to.0.into(), to.1.into()]),
            Operation::new("S", vec![]),
        ]);
        self
    }

    pub fn ruled_table(mut self, table: RuledTable<'_>) -> Self {
        let width: i64 = table.col_widths.iter().sum();
        let bottom = table.top - table.row_height * table.rows.len() as i64;

        for i in 0..=table.rows.len() as i64 {
            let y = table.top - i * table.row_height;
            self = self.line((table.left, y), (table.left + width, y));
        }
        let mut x = table.left;
        for w in std::iter::once(&0).chain(table.col_widths) {
            x += w;
            self = self.line((x, table.top), (x, bottom));
        }

        for (i, row) in table.rows.iter().enumerate() {
            let baseline = table.top - table.row_height * (i as i64 + 1) + 6;
            let mut x = table.left;
            for (cell, w) in row.iter().zip(table.col_widths) {
                self = self.text(x + 5, baseline, cell);
                x += w;
            }
        }
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids = Vec::new();
        for ops in &self.pages {
            let content = Content {
                operations: ops.clone(),
            };
            let content_id = doc.add_object(Stream::new(
                Dictionary::new(),
                content.encode().expect("content encodes"),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(Object::from(page_id));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(PAGE_WIDTH),
                    Object::Integer(PAGE_HEIGHT),
                ],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).expect("document saves");
        bytes
    }

    pub fn save(&self, path: &Path) {
        std::fs::write(path, self.to_bytes()).expect("fixture written");
    }
}

/// A protocol page with one table whose first column holds `Länge [m]`,
/// `10` and `12,5`.
pub fn protocol() -> PdfBuilder {
    PdfBuilder::new().ruled_table(RuledTable {
        left: 50,
        top: 760,
        col_widths: &[150, 100],
        row_height: 20,
        rows: &[&["Länge [m]", "Bemerkung"], &["10", "a"], &["12,5", "b"]],
    })
}
