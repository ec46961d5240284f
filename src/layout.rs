use std::cmp::Ordering;

use crate::types::{TextLine, TextSpan};

// Baselines further apart than this start a new line. Superscripts sit on
// almost the same baseline; table rows are several points apart.
const LINE_BREAK_THRESHOLD_POINTS: f64 = 5.0;

// Character spacing thresholds (as ratio of font size)
// Gap > this ratio will start a new span
const CHAR_FLUSH_THRESHOLD_RATIO: f64 = 1.2;
// Gap > this ratio will insert a space within the current span
const CHAR_SPACE_THRESHOLD_RATIO: f64 = 0.15;

fn by_left(a: &TextSpan, b: &TextSpan) -> Ordering {
    a.bbox.l.partial_cmp(&b.bbox.l).unwrap_or(Ordering::Equal)
}

/// Arrange glyphs into lines of spans, top to bottom and left to right.
///
/// Pages are never mixed: a page change always ends the current line.
pub fn layout_lines(mut glyphs: Vec<TextSpan>) -> Vec<TextLine> {
    glyphs.sort_by(|a, b| match a.page_num.cmp(&b.page_num) {
        Ordering::Equal => a
            .baseline()
            .partial_cmp(&b.baseline())
            .unwrap_or(Ordering::Equal),
        other => other,
    });

    let mut lines = Vec::new();
    let mut current: Vec<TextSpan> = Vec::new();
    let mut last: Option<(u32, f64)> = None;

    for glyph in glyphs {
        if let Some((page, y)) = last {
            if glyph.page_num != page || (glyph.baseline() - y).abs() > LINE_BREAK_THRESHOLD_POINTS
            {
                lines.push(merge_spans(std::mem::take(&mut current)));
            }
        }
        last = Some((glyph.page_num, glyph.baseline()));
        current.push(glyph);
    }
    if !current.is_empty() {
        lines.push(merge_spans(current));
    }

    lines
}

/// Merge the glyphs of one line into spans.
fn merge_spans(mut glyphs: Vec<TextSpan>) -> TextLine {
    glyphs.sort_by(by_left);

    let mut spans: Vec<TextSpan> = Vec::new();
    for glyph in glyphs {
        if let Some(span) = spans.last_mut() {
            let size = if span.font_size > 0. { span.font_size } else { 1. };
            let gap_ratio = (glyph.bbox.l - span.bbox.r) / size;

            if gap_ratio <= CHAR_FLUSH_THRESHOLD_RATIO {
                let prev_is_space = span.text.chars().last().is_some_and(char::is_whitespace);
                if !prev_is_space && gap_ratio > CHAR_SPACE_THRESHOLD_RATIO {
                    span.text.push(' ');
                }
                span.text.push_str(&glyph.text);
                span.bbox.union(&glyph.bbox);
                continue;
            }
        }
        spans.push(glyph);
    }
    spans
}

/// Text of a line with its spans separated by single spaces.
pub fn line_text(line: &[TextSpan]) -> String {
    line.iter()
        .map(|span| span.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
