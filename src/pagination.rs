//! Vertical cursor, page transitions and repeating page chrome

use crate::Result;
use crate::drawing::PageCanvas;
use crate::error::ReportError;
use crate::font::{FontFace, FontMetrics};
use crate::geometry::PageGeometry;
use crate::report::{LayoutReport, PageReport, Placement, PlacementKind};
use crate::style::ReportStyle;
use tracing::{debug, trace};

// Absorbs float noise when rows sum exactly to the printable height.
const FIT_TOLERANCE: f64 = 1e-9;

/// Current write position: a page index and the distance below its top margin
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cursor {
    page_index: usize,
    y: f64,
}

impl Cursor {
    /// A cursor at the top of the first page
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Distance below the top margin
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Space left above the bottom margin
    pub fn remaining_height(&self, geometry: &PageGeometry) -> f64 {
        geometry.printable_height() - self.y
    }

    /// Whether a block of `height` fits on the current page
    pub fn will_fit(&self, geometry: &PageGeometry, height: f64) -> bool {
        self.remaining_height(geometry) + FIT_TOLERANCE >= height
    }

    fn advance(&mut self, height: f64) {
        self.y += height;
    }

    fn next_page(&mut self) {
        self.page_index += 1;
        self.y = 0.0;
    }
}

/// Content repeated at the top of pages.
///
/// `height` is reserved on the page before any block is placed on it.
pub trait PageChrome: Send + Sync {
    fn height(&self, page_index: usize, style: &ReportStyle) -> f64;

    fn draw(
        &self,
        page_index: usize,
        geometry: &PageGeometry,
        style: &ReportStyle,
        canvas: &mut PageCanvas,
    );
}

/// No repeating chrome
#[derive(Debug, Clone, Copy, Default)]
pub struct NoChrome;

impl PageChrome for NoChrome {
    fn height(&self, _page_index: usize, _style: &ReportStyle) -> f64 {
        0.0
    }

    fn draw(&self, _: usize, _: &PageGeometry, _: &ReportStyle, _: &mut PageCanvas) {}
}

/// Repeats the document title, with a rule below it, on every page after
/// the first
#[derive(Debug, Clone)]
pub struct RepeatedTitle {
    text: String,
}

impl RepeatedTitle {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self { text: text.into() }
    }
}

impl PageChrome for RepeatedTitle {
    fn height(&self, page_index: usize, style: &ReportStyle) -> f64 {
        if page_index == 0 {
            0.0
        } else {
            style.body_line_height() + style.title_spacing
        }
    }

    fn draw(
        &self,
        page_index: usize,
        geometry: &PageGeometry,
        style: &ReportStyle,
        canvas: &mut PageCanvas,
    ) {
        if page_index == 0 {
            return;
        }
        let baseline = geometry.pdf_y(style.font_size);
        canvas.text(
            geometry.pdf_x(0.0),
            baseline,
            FontFace::Bold,
            style.font_size,
            &format!("{} (continued)", self.text),
        );
        let rule_y = geometry.pdf_y(style.body_line_height() + style.title_spacing / 2.0);
        canvas.horizontal_rule(
            geometry.pdf_x(0.0),
            geometry.pdf_x(geometry.printable_width()),
            rule_y,
            style.rule_color,
            style.rule_width,
        );
    }
}

/// Mutable state of one in-flight render: geometry, styling, the cursor and
/// the pages drawn so far. Never shared between documents.
pub struct RenderContext<'a> {
    pub geometry: PageGeometry,
    pub style: &'a ReportStyle,
    pub metrics: &'a dyn FontMetrics,
    cursor: Cursor,
    pages: Vec<PageCanvas>,
    report: LayoutReport,
}

impl<'a> RenderContext<'a> {
    /// Create a context positioned at the top of an empty first page
    pub fn new(geometry: PageGeometry, style: &'a ReportStyle, metrics: &'a dyn FontMetrics) -> Self {
        Self {
            geometry,
            style,
            metrics,
            cursor: Cursor::new(),
            pages: vec![PageCanvas::new()],
            report: LayoutReport {
                pages: vec![PageReport::default()],
            },
        }
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Canvas of the current page
    pub fn canvas(&mut self) -> &mut PageCanvas {
        let index = self.pages.len() - 1;
        &mut self.pages[index]
    }

    /// Record a band of `height` at the cursor and move the cursor below it
    pub fn advance(&mut self, kind: PlacementKind, height: f64) {
        let placement = Placement {
            kind,
            top: self.cursor.y(),
            height,
        };
        trace!("Placed {:?}", placement);
        self.current_report().placements.push(placement);
        self.cursor.advance(height);
    }

    /// Record a band outside the flow (e.g. in a margin) without moving
    /// the cursor
    pub fn place_fixed(&mut self, kind: PlacementKind, top: f64, height: f64) {
        self.current_report()
            .placements
            .push(Placement { kind, top, height });
    }

    fn current_report(&mut self) -> &mut PageReport {
        let index = self.report.pages.len() - 1;
        &mut self.report.pages[index]
    }

    fn push_page(&mut self) {
        self.cursor.next_page();
        self.pages.push(PageCanvas::new());
        self.report.pages.push(PageReport {
            index: self.cursor.page_index(),
            placements: Vec::new(),
        });
    }

    /// Finish the render, handing back the drawn pages and their layout
    pub fn into_parts(self) -> (Vec<PageCanvas>, LayoutReport) {
        (self.pages, self.report)
    }
}

/// Decides when a block needs a fresh page and performs the transition
pub struct PageBreaker<'a> {
    chrome: &'a dyn PageChrome,
}

impl<'a> PageBreaker<'a> {
    pub fn new(chrome: &'a dyn PageChrome) -> Self {
        Self { chrome }
    }

    /// Height an empty page following the current one can hold
    pub fn capacity(&self, ctx: &RenderContext<'_>) -> f64 {
        let next = ctx.cursor().page_index() + 1;
        ctx.geometry.printable_height() - self.chrome.height(next, ctx.style)
    }

    /// Draw chrome for the page the cursor is on
    pub fn begin_page(&self, ctx: &mut RenderContext<'_>) {
        let page_index = ctx.cursor().page_index();
        let height = self.chrome.height(page_index, ctx.style);
        if height > 0.0 {
            let (geometry, style) = (ctx.geometry, ctx.style);
            self.chrome.draw(page_index, &geometry, style, ctx.canvas());
            ctx.advance(PlacementKind::Chrome, height);
        }
    }

    /// Make sure a block of `height` fits, starting a new page if it does
    /// not. Returns whether a page break happened.
    pub fn ensure_space(
        &self,
        ctx: &mut RenderContext<'_>,
        height: f64,
        kind: &'static str,
    ) -> Result<bool> {
        if ctx.cursor().will_fit(&ctx.geometry, height) {
            return Ok(false);
        }

        let available = self.capacity(ctx);
        if height > available + FIT_TOLERANCE {
            return Err(ReportError::BlockTooLarge {
                kind,
                height,
                available,
            });
        }

        self.start_new_page(ctx);
        Ok(true)
    }

    /// Close the current page and continue at the top of a new one
    pub fn start_new_page(&self, ctx: &mut RenderContext<'_>) {
        ctx.push_page();
        debug!("Started page {}", ctx.cursor().page_index() + 1);
        self.begin_page(ctx);
    }
}
