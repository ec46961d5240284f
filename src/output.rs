use euclid::{point2, vec2};
use pdf_extract::{ColorSpace, MediaBox, OutputDev, OutputError, Path, PathOp, Transform};
use tracing::trace;

use crate::types::{BoundingBox, Orientation, PageContent, Ruling, TextSpan};

type ArtBox = (f64, f64, f64, f64);

/// Receives drawing callbacks from `pdf_extract` and keeps what table
/// detection needs: one glyph per visible character and the straight
/// rulings of stroked and thin filled paths.
pub(crate) struct PageCollector {
    flip_ctm: Transform,
    current: Option<PageContent>,
    pages: Vec<PageContent>,
}

impl PageCollector {
    // Maximum deviation from the axis for a segment to count as a ruling
    const AXIS_TOLERANCE_POINTS: f64 = 1.0;

    // Shorter segments are tick marks or glyph fragments, not table lines
    const MIN_RULING_LENGTH_POINTS: f64 = 2.0;

    // Filled rectangles thinner than this are drawn lines
    const MAX_FILLED_LINE_THICKNESS_POINTS: f64 = 2.0;

    pub(crate) fn new() -> PageCollector {
        PageCollector {
            flip_ctm: Transform::identity(),
            current: None,
            pages: Vec::new(),
        }
    }

    pub(crate) fn into_pages(mut self) -> Vec<PageContent> {
        if let Some(page) = self.current.take() {
            self.pages.push(page);
        }
        self.pages
    }

    fn page_mut(&mut self) -> &mut PageContent {
        self.current.get_or_insert_with(PageContent::default)
    }

    fn push_segment(&mut self, from: (f64, f64), to: (f64, f64)) {
        let (dx, dy) = ((to.0 - from.0).abs(), (to.1 - from.1).abs());
        let ruling = if dy <= Self::AXIS_TOLERANCE_POINTS && dx >= dy {
            Ruling {
                orientation: Orientation::Horizontal,
                pos: (from.1 + to.1) / 2.,
                start: from.0.min(to.0),
                end: from.0.max(to.0),
            }
        } else if dx <= Self::AXIS_TOLERANCE_POINTS {
            Ruling {
                orientation: Orientation::Vertical,
                pos: (from.0 + to.0) / 2.,
                start: from.1.min(to.1),
                end: from.1.max(to.1),
            }
        } else {
            return;
        };
        if ruling.length() >= Self::MIN_RULING_LENGTH_POINTS {
            self.page_mut().rulings.push(ruling);
        }
    }

    /// Transform a path into flipped page space and split it into subpaths of
    /// straight points. Subpaths containing curves are dropped.
    fn flatten(&self, ctm: &Transform, path: &Path) -> Vec<Vec<(f64, f64)>> {
        let to_page = ctm.post_transform(&self.flip_ctm);
        let map = |x: f64, y: f64| {
            let p = to_page.transform_point(point2(x, y));
            (p.x, p.y)
        };

        let mut subpaths = Vec::new();
        let mut current: Vec<(f64, f64)> = Vec::new();
        let mut curved = false;

        for op in &path.ops {
            match *op {
                PathOp::MoveTo(x, y) => {
                    if current.len() > 1 && !curved {
                        subpaths.push(std::mem::take(&mut current));
                    }
                    current.clear();
                    curved = false;
                    current.push(map(x, y));
                }
                PathOp::LineTo(x, y) => current.push(map(x, y)),
                PathOp::CurveTo(_, _, _, _, x, y) => {
                    curved = true;
                    current.push(map(x, y));
                }
                PathOp::Rect(x, y, w, h) => {
                    if current.len() > 1 && !curved {
                        subpaths.push(std::mem::take(&mut current));
                    }
                    current.clear();
                    curved = false;
                    subpaths.push(vec![
                        map(x, y),
                        map(x + w, y),
                        map(x + w, y + h),
                        map(x, y + h),
                        map(x, y),
                    ]);
                }
                PathOp::Close => {
                    if let Some(&first) = current.first() {
                        current.push(first);
                    }
                }
            }
        }
        if current.len() > 1 && !curved {
            subpaths.push(current);
        }
        subpaths
    }
}

impl OutputDev for PageCollector {
    fn begin_page(
        &mut self,
        page_num: u32,
        media_box: &MediaBox,
        _: Option<ArtBox>,
    ) -> Result<(), OutputError> {
        if let Some(page) = self.current.take() {
            self.pages.push(page);
        }
        self.current = Some(PageContent {
            page_num,
            ..PageContent::default()
        });
        self.flip_ctm = Transform::row_major(1., 0., 0., -1., 0., media_box.ury - media_box.lly);
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), OutputError> {
        if let Some(page) = self.current.take() {
            trace!(
                "page {}: {} glyphs, {} rulings",
                page.page_num,
                page.glyphs.len(),
                page.rulings.len()
            );
            self.pages.push(page);
        }
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        font_size: f64,
        char: &str,
    ) -> Result<(), OutputError> {
        if char.trim().is_empty() {
            return Ok(());
        }

        let position = trm.post_transform(&self.flip_ctm);
        let transformed_font_size_vec = trm.transform_vector(vec2(font_size, font_size));
        let transformed_font_size =
            (transformed_font_size_vec.x * transformed_font_size_vec.y).abs().sqrt();
        let (x, y) = (position.m31, position.m32);
        let end_x = x + width * transformed_font_size;

        let page = self.page_mut();
        let page_num = page.page_num;
        page.glyphs.push(TextSpan {
            text: char.to_owned(),
            bbox: BoundingBox {
                t: y - transformed_font_size,
                r: x.max(end_x),
                b: y,
                l: x.min(end_x),
            },
            font_size: transformed_font_size,
            page_num,
        });
        Ok(())
    }

    fn begin_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn stroke(
        &mut self,
        ctm: &Transform,
        _colorspace: &ColorSpace,
        _color: &[f64],
        path: &Path,
    ) -> Result<(), OutputError> {
        for subpath in self.flatten(ctm, path) {
            for pair in subpath.windows(2) {
                self.push_segment(pair[0], pair[1]);
            }
        }
        Ok(())
    }

    fn fill(
        &mut self,
        ctm: &Transform,
        _colorspace: &ColorSpace,
        _color: &[f64],
        path: &Path,
    ) -> Result<(), OutputError> {
        for subpath in self.flatten(ctm, path) {
            let (mut l, mut t) = (f64::INFINITY, f64::INFINITY);
            let (mut r, mut b) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
            for &(x, y) in &subpath {
                l = l.min(x);
                r = r.max(x);
                t = t.min(y);
                b = b.max(y);
            }
            let (w, h) = (r - l, b - t);
            if h <= Self::MAX_FILLED_LINE_THICKNESS_POINTS && w > h {
                let y = (t + b) / 2.;
                self.push_segment((l, y), (r, y));
            } else if w <= Self::MAX_FILLED_LINE_THICKNESS_POINTS && h > w {
                let x = (l + r) / 2.;
                self.push_segment((x, t), (x, b));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media_box() -> MediaBox {
        MediaBox {
            llx: 0.,
            lly: 0.,
            urx: 595.,
            ury: 842.,
        }
    }

    fn rect_path(x: f64, y: f64, w: f64, h: f64) -> Path {
        Path {
            ops: vec![PathOp::Rect(x, y, w, h)],
        }
    }

    #[test]
    fn stroked_rect_yields_four_rulings_in_flipped_space() {
        let mut collector = PageCollector::new();
        collector.begin_page(1, &media_box(), None).unwrap();
        collector
            .stroke(
                &Transform::identity(),
                &ColorSpace::DeviceGray,
                &[0.],
                &rect_path(100., 700., 200., 40.),
            )
            .unwrap();
        collector.end_page().unwrap();

        let pages = collector.into_pages();
        assert_eq!(pages.len(), 1);
        let rulings = &pages[0].rulings;
        assert_eq!(rulings.len(), 4);

        let horizontals: Vec<f64> = rulings
            .iter()
            .filter(|r| r.orientation == Orientation::Horizontal)
            .map(|r| r.pos)
            .collect();
        assert!(horizontals.contains(&142.));
        assert!(horizontals.contains(&102.));
    }

    #[test]
    fn thin_fill_is_a_ruling_but_block_fill_is_not() {
        let mut collector = PageCollector::new();
        collector.begin_page(1, &media_box(), None).unwrap();
        let gray = ColorSpace::DeviceGray;
        collector
            .fill(&Transform::identity(), &gray, &[0.], &rect_path(50., 400., 300., 0.5))
            .unwrap();
        collector
            .fill(&Transform::identity(), &gray, &[0.], &rect_path(50., 100., 300., 80.))
            .unwrap();
        collector.end_page().unwrap();

        let pages = collector.into_pages();
        assert_eq!(pages[0].rulings.len(), 1);
        assert_eq!(pages[0].rulings[0].orientation, Orientation::Horizontal);
        assert_eq!(pages[0].rulings[0].length(), 300.);
    }

    #[test]
    fn whitespace_glyphs_are_dropped() {
        let mut collector = PageCollector::new();
        collector.begin_page(2, &media_box(), None).unwrap();
        let trm = Transform::row_major(1., 0., 0., 1., 72., 720.);
        collector.output_character(&trm, 0.5, 0., 10., "1").unwrap();
        collector.output_character(&trm, 0.25, 0., 10., " ").unwrap();
        collector.end_page().unwrap();

        let pages = collector.into_pages();
        assert_eq!(pages[0].page_num, 2);
        assert_eq!(pages[0].glyphs.len(), 1);
        let glyph = &pages[0].glyphs[0];
        assert_eq!(glyph.bbox.l, 72.);
        assert_eq!(glyph.bbox.b, 122.);
        assert_eq!(glyph.page_num, 2);
    }
}
