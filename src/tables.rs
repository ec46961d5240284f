use std::fmt;

use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use crate::layout::{layout_lines, line_text};
use crate::types::{BoundingBox, Orientation, PageContent, Ruling, Table, TextSpan};
use crate::utils::{cluster_positions, cmp_f64, merge_intervals, merge_rulings};

// Rulings closer than this are the same line
const JOIN_TOLERANCE_POINTS: f64 = 1.0;

// Slack allowed where two rulings are meant to meet
const INTERSECT_TOLERANCE_POINTS: f64 = 2.0;

// Row and column boundaries closer than this collapse into one
const GRID_SNAP_POINTS: f64 = 2.0;

// Spans closer than this horizontally share a stream column
const COLUMN_GAP_POINTS: f64 = 1.0;

/// How tables are located on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flavor {
    /// Tables are grids of drawn lines; text outside them is ignored.
    #[default]
    Lattice,
    /// Each page's text is one table, with columns inferred from alignment.
    Stream,
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flavor::Lattice => write!(f, "lattice"),
            Flavor::Stream => write!(f, "stream"),
        }
    }
}

/// Detect the tables of one page.
pub fn detect_tables(page: PageContent, flavor: Flavor) -> Vec<Table> {
    let page_num = page.page_num;
    let tables = match flavor {
        Flavor::Lattice => lattice_tables(page),
        Flavor::Stream => stream_table(page).into_iter().collect(),
    };
    debug!("page {}: {} {} table(s)", page_num, tables.len(), flavor);
    tables
}

fn cell_text(glyphs: Vec<TextSpan>) -> String {
    layout_lines(glyphs)
        .iter()
        .map(|line| line_text(line).nfkc().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Index of the band `[bounds[i], bounds[i + 1])` containing `v`.
fn band_index(bounds: &[f64], v: f64) -> Option<usize> {
    bounds.windows(2).position(|w| v >= w[0] && v < w[1])
}

struct Grid {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Grid {
    fn bbox(&self) -> BoundingBox {
        BoundingBox {
            t: self.ys[0],
            r: self.xs[self.xs.len() - 1],
            b: self.ys[self.ys.len() - 1],
            l: self.xs[0],
        }
    }

    fn area(&self) -> f64 {
        let bbox = self.bbox();
        bbox.width() * bbox.height()
    }
}

/// Split rulings into connected components of lines that touch each other.
fn connected_components(rulings: &[Ruling]) -> Vec<Vec<Ruling>> {
    let mut parent: Vec<usize> = (0..rulings.len()).collect();

    fn find(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    for i in 0..rulings.len() {
        for j in (i + 1)..rulings.len() {
            if rulings[i].touches(&rulings[j], INTERSECT_TOLERANCE_POINTS) {
                let (a, b) = (find(&mut parent, i), find(&mut parent, j));
                if a != b {
                    parent[b] = a;
                }
            }
        }
    }

    let mut components: Vec<(usize, Vec<Ruling>)> = Vec::new();
    for (i, ruling) in rulings.iter().enumerate() {
        let root = find(&mut parent, i);
        match components.iter_mut().find(|(r, _)| *r == root) {
            Some((_, members)) => members.push(*ruling),
            None => components.push((root, vec![*ruling])),
        }
    }
    components.into_iter().map(|(_, members)| members).collect()
}

fn grid_of(component: &[Ruling]) -> Option<Grid> {
    let positions = |orientation: Orientation| -> Vec<f64> {
        component
            .iter()
            .filter(|r| r.orientation == orientation)
            .map(|r| r.pos)
            .collect()
    };
    let ys = cluster_positions(&positions(Orientation::Horizontal), GRID_SNAP_POINTS);
    let xs = cluster_positions(&positions(Orientation::Vertical), GRID_SNAP_POINTS);

    if xs.len() < 2 || ys.len() < 2 {
        return None;
    }
    Some(Grid { xs, ys })
}

fn lattice_tables(page: PageContent) -> Vec<Table> {
    let rulings = merge_rulings(&page.rulings, JOIN_TOLERANCE_POINTS);
    let mut grids: Vec<Grid> = connected_components(&rulings)
        .iter()
        .filter_map(|component| grid_of(component))
        .collect();

    // Smaller grids claim their glyphs first so a frame drawn around the page
    // does not swallow the tables inside it.
    grids.sort_by(|a, b| cmp_f64(&a.area(), &b.area()));

    let mut remaining = page.glyphs;
    let mut tables = Vec::with_capacity(grids.len());

    for grid in grids {
        let rows = grid.ys.len() - 1;
        let cols = grid.xs.len() - 1;
        let mut cells: Vec<Vec<Vec<TextSpan>>> = vec![vec![Vec::new(); cols]; rows];

        let mut unclaimed = Vec::with_capacity(remaining.len());
        for glyph in remaining {
            let center = glyph.bbox.center();
            match (band_index(&grid.ys, center.y), band_index(&grid.xs, center.x)) {
                (Some(row), Some(col)) => cells[row][col].push(glyph),
                _ => unclaimed.push(glyph),
            }
        }
        remaining = unclaimed;

        let rows: Vec<Vec<String>> = cells
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect();
        tables.push(Table::new(page.page_num, grid.bbox(), rows));
    }

    tables.sort_by(|a, b| cmp_f64(&a.bbox.t, &b.bbox.t).then(cmp_f64(&a.bbox.l, &b.bbox.l)));
    tables
}

fn stream_table(page: PageContent) -> Option<Table> {
    let lines = layout_lines(page.glyphs);
    let spans: Vec<&TextSpan> = lines.iter().flatten().collect();
    let first = spans.first()?;

    let mut bbox = first.bbox.clone();
    for span in &spans {
        bbox.union(&span.bbox);
    }

    let columns = merge_intervals(
        spans.iter().map(|s| (s.bbox.l, s.bbox.r)).collect(),
        COLUMN_GAP_POINTS,
    );

    let rows: Vec<Vec<String>> = lines
        .iter()
        .map(|line| {
            let mut row: Vec<Vec<&str>> = vec![Vec::new(); columns.len()];
            for span in line {
                let x = span.bbox.center().x;
                if let Some(col) = columns.iter().position(|&(l, r)| x >= l && x <= r) {
                    row[col].push(&span.text);
                }
            }
            row.into_iter()
                .map(|parts| parts.join(" ").nfkc().collect::<String>())
                .collect::<Vec<String>>()
        })
        .collect();

    Some(Table::new(page.page_num, bbox, rows))
}
