//! Document assembly: runs blocks through pagination and writes the PDF

use crate::Result;
use crate::block::{ContentBlock, Emphasis};
use crate::drawing::PageCanvas;
use crate::error::ReportError;
use crate::font::{FontFace, FontMetrics, HeuristicMetrics};
use crate::geometry::PageGeometry;
use crate::pagination::{NoChrome, PageBreaker, PageChrome, RenderContext};
use crate::render::{keep_with_next, render_block, render_footer};
use crate::report::LayoutReport;
use crate::sink::Sink;
use crate::style::ReportStyle;
use crate::text::encode_win_ansi;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use lopdf::{Document, Object, Stream, StringFormat, dictionary};
use tracing::{debug, instrument, trace, warn};

const FALLBACK_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Lifecycle of a [`DocumentAssembler`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblerState {
    NotStarted,
    InProgress,
    Finalized,
}

/// A finished render: the sink's output and where every block landed
#[derive(Debug)]
pub struct RenderedDocument<T> {
    pub output: T,
    pub layout: LayoutReport,
}

/// Lays out an ordered list of blocks into pages and writes them to a sink.
///
/// An assembler renders exactly one document. A failed or finished render
/// cannot be retried on the same assembler; build a fresh one instead.
pub struct DocumentAssembler {
    geometry: PageGeometry,
    style: ReportStyle,
    metrics: Box<dyn FontMetrics>,
    chrome: Box<dyn PageChrome>,
    generated_at: Option<DateTime<Local>>,
    title: Option<String>,
    state: AssemblerState,
}

impl DocumentAssembler {
    /// Create an assembler with default style, heuristic metrics and no chrome
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            style: ReportStyle::default(),
            metrics: Box::new(HeuristicMetrics::default()),
            chrome: Box::new(NoChrome),
            generated_at: None,
            title: None,
            state: AssemblerState::NotStarted,
        }
    }

    pub fn with_style(mut self, style: ReportStyle) -> Self {
        self.style = style;
        self
    }

    /// Measure text with the given metrics instead of the heuristic
    pub fn with_metrics<M: FontMetrics + 'static>(mut self, metrics: M) -> Self {
        self.metrics = Box::new(metrics);
        self
    }

    /// Set the chrome drawn at the top of each page
    pub fn with_chrome<C: PageChrome + 'static>(mut self, chrome: C) -> Self {
        self.chrome = Box::new(chrome);
        self
    }

    /// Fix the generation time printed in the footer (defaults to now)
    pub fn with_generated_at(mut self, generated_at: DateTime<Local>) -> Self {
        self.generated_at = Some(generated_at);
        self
    }

    /// Title stored in the PDF document information dictionary
    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn state(&self) -> AssemblerState {
        self.state
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Render `blocks` into `sink`.
    ///
    /// Every block is validated before anything is drawn and the sink is only
    /// opened once all pages are laid out. On failure the sink is aborted so
    /// no partial output stays visible.
    #[instrument(skip_all, fields(blocks = blocks.len()))]
    pub fn render<S: Sink>(
        &mut self,
        blocks: &[ContentBlock],
        sink: &mut S,
    ) -> Result<RenderedDocument<S::Output>> {
        if self.state != AssemblerState::NotStarted {
            return Err(ReportError::AlreadyFinalized);
        }
        self.state = AssemblerState::InProgress;

        let result = self.render_inner(blocks, sink);
        self.state = AssemblerState::Finalized;

        if let Err(ref e) = result {
            debug!("Render failed, aborting sink: {}", e);
            sink.abort();
        }
        result
    }

    fn render_inner<S: Sink>(
        &self,
        blocks: &[ContentBlock],
        sink: &mut S,
    ) -> Result<RenderedDocument<S::Output>> {
        for block in blocks {
            block.validate()?;
        }

        let generated_at = self.generated_at.unwrap_or_else(Local::now);
        let (pages, layout) = self.lay_out(blocks, &generated_at)?;
        debug!("Laid out {} blocks on {} pages", blocks.len(), pages.len());

        let mut document = self.build_pdf(pages, &generated_at)?;
        let mut writer = sink.open()?;
        document.save_to(&mut writer)?;
        let output = sink.finalize()?;

        Ok(RenderedDocument { output, layout })
    }

    fn lay_out(
        &self,
        blocks: &[ContentBlock],
        generated_at: &DateTime<Local>,
    ) -> Result<(Vec<PageCanvas>, LayoutReport)> {
        let mut ctx = RenderContext::new(self.geometry, &self.style, self.metrics.as_ref());
        let breaker = PageBreaker::new(self.chrome.as_ref());
        breaker.begin_page(&mut ctx);

        let mut table_index = 0;
        for (i, block) in blocks.iter().enumerate() {
            if let (ContentBlock::Title { emphasis: Emphasis::Normal, .. }, Some(next)) =
                (block, blocks.get(i + 1))
            {
                keep_with_next(block, next, &mut ctx, &breaker)?;
            }
            render_block(block, table_index, &mut ctx, &breaker)?;
            if matches!(block, ContentBlock::Table { .. }) {
                table_index += 1;
            }
        }

        render_footer(&mut ctx, &self.footer_text(generated_at));

        Ok(ctx.into_parts())
    }

    fn footer_text(&self, generated_at: &DateTime<Local>) -> String {
        let format = self.style.footer_date_format.as_str();
        let valid = StrftimeItems::new(format).all(|item| !matches!(item, Item::Error));
        let format = if valid {
            format
        } else {
            warn!("Invalid footer date format {:?}, using default", format);
            FALLBACK_DATE_FORMAT
        };
        format!("Generated on {}", generated_at.format(format))
    }

    fn build_pdf(&self, pages: Vec<PageCanvas>, generated_at: &DateTime<Local>) -> Result<Document> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let fonts = [FontFace::Regular, FontFace::Bold].map(|face| {
            let id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => face.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            (face.resource_name(), id)
        });
        let mut font_dict = lopdf::Dictionary::new();
        for (name, id) in fonts {
            font_dict.set(name, id);
        }
        let resources_id = doc.add_object(dictionary! {
            "Font" => font_dict,
        });

        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
        for canvas in pages {
            let content = canvas.into_content();
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }
        trace!("Assembled {} page objects", kids.len());

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![
                    0.into(),
                    0.into(),
                    (self.geometry.width() as f32).into(),
                    (self.geometry.height() as f32).into(),
                ],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut info = dictionary! {
            "Producer" => Object::string_literal("lopdf-report"),
            "CreationDate" => Object::string_literal(
                generated_at.format("D:%Y%m%d%H%M%S").to_string()
            ),
        };
        if let Some(ref title) = self.title {
            info.set(
                "Title",
                Object::String(encode_win_ansi(title), StringFormat::Literal),
            );
        }
        let info_id = doc.add_object(info);
        doc.trailer.set("Info", info_id);

        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{Column, ColumnSpec};
    use crate::sink::BufferSink;

    #[test]
    fn test_render_produces_pdf() {
        let mut assembler = DocumentAssembler::new(PageGeometry::a4()).with_title("Test");
        let blocks = vec![
            ContentBlock::title("Report"),
            ContentBlock::paragraph(None, "Hello"),
        ];
        let rendered = assembler.render(&blocks, &mut BufferSink::new()).unwrap();

        assert!(rendered.output.starts_with(b"%PDF-1.5"));
        assert_eq!(rendered.layout.page_count(), 1);
        assert_eq!(assembler.state(), AssemblerState::Finalized);

        let doc = Document::load_mem(&rendered.output).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_second_render_fails() {
        let mut assembler = DocumentAssembler::new(PageGeometry::a4());
        assembler.render(&[], &mut BufferSink::new()).unwrap();
        let again = assembler.render(&[], &mut BufferSink::new());
        assert!(matches!(again, Err(ReportError::AlreadyFinalized)));
    }

    #[test]
    fn test_failed_render_is_final() {
        let mut assembler = DocumentAssembler::new(PageGeometry::a4());
        let bad = ContentBlock::table(
            ColumnSpec::new(vec![Column::new("A", 0.0)]),
            vec![vec!["x".to_string()]],
        );
        assert!(matches!(
            assembler.render(&[bad], &mut BufferSink::new()),
            Err(ReportError::InvalidLayout(_))
        ));
        assert_eq!(assembler.state(), AssemblerState::Finalized);
        assert!(matches!(
            assembler.render(&[], &mut BufferSink::new()),
            Err(ReportError::AlreadyFinalized)
        ));
    }

    #[test]
    fn test_invalid_date_format_falls_back() {
        let style = ReportStyle {
            footer_date_format: "broken %".to_string(),
            ..Default::default()
        };
        let at = Local::now();
        let assembler = DocumentAssembler::new(PageGeometry::a4()).with_style(style);
        let text = assembler.footer_text(&at);
        assert_eq!(
            text,
            format!("Generated on {}", at.format(FALLBACK_DATE_FORMAT))
        );
    }

    #[test]
    fn test_empty_document_still_has_footer_page() {
        let mut assembler = DocumentAssembler::new(PageGeometry::a4());
        let rendered = assembler.render(&[], &mut BufferSink::new()).unwrap();
        assert_eq!(rendered.layout.page_count(), 1);
        assert!(rendered.layout.pages[0].has_footer());
    }
}
