use std::fmt;

/// Page coordinates with the origin in the top-left corner; y grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    pub t: f64,
    pub r: f64,
    pub b: f64,
    pub l: f64,
}

impl BoundingBox {
    pub fn center(&self) -> Point {
        Point {
            x: (self.l + self.r) / 2.,
            y: (self.t + self.b) / 2.,
        }
    }

    pub fn width(&self) -> f64 {
        self.r - self.l
    }

    pub fn height(&self) -> f64 {
        self.b - self.t
    }

    /// Grow this box so it also covers `other`.
    pub fn union(&mut self, other: &BoundingBox) {
        self.t = self.t.min(other.t);
        self.l = self.l.min(other.l);
        self.b = self.b.max(other.b);
        self.r = self.r.max(other.r);
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(t: {:.1}, r: {:.1}, b: {:.1}, l: {:.1})",
            self.t, self.r, self.b, self.l
        )
    }
}

/// A run of text on one page. Glyphs coming out of the PDF backend are spans
/// of a single character; layout merges them into words and phrases.
#[derive(Debug, Clone)]
pub struct TextSpan {
    pub text: String,
    pub bbox: BoundingBox,
    pub font_size: f64,
    pub page_num: u32,
}

impl TextSpan {
    /// Baseline of the span. Lines are grouped on this so superscripts stay
    /// with their line.
    pub fn baseline(&self) -> f64 {
        self.bbox.b
    }
}

pub type TextLine = Vec<TextSpan>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A straight horizontal or vertical line drawn on a page.
///
/// For horizontal rulings `pos` is the y coordinate and `start..end` spans x;
/// for vertical rulings `pos` is x and `start..end` spans y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ruling {
    pub orientation: Orientation,
    pub pos: f64,
    pub start: f64,
    pub end: f64,
}

impl Ruling {
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    /// Whether two rulings touch, allowing `tolerance` points of slack at
    /// either end.
    pub fn touches(&self, other: &Ruling, tolerance: f64) -> bool {
        match (self.orientation, other.orientation) {
            (Orientation::Horizontal, Orientation::Vertical)
            | (Orientation::Vertical, Orientation::Horizontal) => {
                other.pos >= self.start - tolerance
                    && other.pos <= self.end + tolerance
                    && self.pos >= other.start - tolerance
                    && self.pos <= other.end + tolerance
            }
            _ => {
                (self.pos - other.pos).abs() <= tolerance
                    && self.start <= other.end + tolerance
                    && other.start <= self.end + tolerance
            }
        }
    }
}

/// Everything one page contributed: its glyphs and its rulings.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    pub page_num: u32,
    pub glyphs: Vec<TextSpan>,
    pub rulings: Vec<Ruling>,
}

/// A table detected on a page, as a rectangular grid of cell text.
///
/// Cells whose content spans several lines keep them separated by `\n`.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub page_num: u32,
    pub bbox: BoundingBox,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(page_num: u32, bbox: BoundingBox, rows: Vec<Vec<String>>) -> Self {
        Table {
            page_num,
            bbox,
            rows,
        }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_cols(&self) -> usize {
        self.rows.first().map_or(0, |r| r.len())
    }

    /// Cells of column `idx`, top to bottom.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .filter_map(move |row| row.get(idx).map(String::as_str))
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(|c| c.replace('\n', "\\n")).collect();
            writeln!(f, "| {} |", cells.join(" | "))?;
        }
        Ok(())
    }
}
