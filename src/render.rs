//! Block renderers: measurement and emission of each content kind
//!
//! Measurement is pure and only depends on geometry, style and font
//! metrics. Emission draws onto the current page and advances the cursor by
//! exactly the measured height.

use crate::Result;
use crate::block::{ColumnSpec, ContentBlock, Emphasis};
use crate::error::ReportError;
use crate::font::{FontFace, FontMetrics};
use crate::geometry::PageGeometry;
use crate::layout::ColumnPlan;
use crate::pagination::{PageBreaker, RenderContext};
use crate::report::PlacementKind;
use crate::style::{Alignment, ReportStyle};
use crate::text::wrap_text;
use tracing::{debug, trace};

/// Computes block heights without drawing anything
#[derive(Clone, Copy)]
pub struct Measurer<'a> {
    geometry: &'a PageGeometry,
    style: &'a ReportStyle,
    metrics: &'a dyn FontMetrics,
}

impl<'a> Measurer<'a> {
    pub fn new(
        geometry: &'a PageGeometry,
        style: &'a ReportStyle,
        metrics: &'a dyn FontMetrics,
    ) -> Self {
        Self {
            geometry,
            style,
            metrics,
        }
    }

    fn wrap(&self, text: &str, width: f64, font_size: f64) -> Vec<String> {
        wrap_text(text, width, font_size, self.metrics)
    }

    pub fn title_font_size(&self, emphasis: Emphasis) -> f64 {
        match emphasis {
            Emphasis::Strong => self.style.title_font_size,
            Emphasis::Normal => self.style.heading_font_size,
        }
    }

    pub fn title_lines(&self, text: &str, emphasis: Emphasis) -> Vec<String> {
        let size = self.title_font_size(emphasis);
        self.wrap(text, self.geometry.printable_width(), size)
    }

    pub fn title_height(&self, text: &str, emphasis: Emphasis) -> f64 {
        let size = self.title_font_size(emphasis);
        self.title_lines(text, emphasis).len() as f64 * self.style.line_height(size)
            + self.style.title_spacing
    }

    /// Width taken by `label: ` ahead of a value
    pub fn label_width(&self, label: &str) -> f64 {
        self.metrics
            .text_width(&format!("{label}: "), self.style.font_size)
    }

    pub fn value_lines(&self, label: &str, value: &str) -> Vec<String> {
        let width = self.geometry.printable_width() - self.label_width(label);
        self.wrap(value, width, self.style.font_size)
    }

    pub fn key_value_height(&self, pairs: &[(String, String)]) -> f64 {
        let lines: usize = pairs
            .iter()
            .map(|(label, value)| self.value_lines(label, value).len())
            .sum();
        lines as f64 * self.style.body_line_height()
    }

    pub fn paragraph_lines(&self, text: &str) -> Vec<String> {
        self.wrap(text, self.geometry.printable_width(), self.style.font_size)
    }

    pub fn paragraph_height(&self, label: Option<&str>, text: &str) -> f64 {
        let lines = usize::from(label.is_some()) + self.paragraph_lines(text).len();
        lines as f64 * self.style.body_line_height()
    }

    /// Lines of every cell, wrapped to its column's width inside the padding
    pub fn cell_lines<S: AsRef<str>>(&self, cells: &[S], plan: &ColumnPlan) -> Vec<Vec<String>> {
        let padding = self.style.cell_padding.horizontal();
        cells
            .iter()
            .zip(plan.widths())
            .map(|(cell, width)| self.wrap(cell.as_ref(), width - padding, self.style.font_size))
            .collect()
    }

    pub fn row_height<S: AsRef<str>>(&self, cells: &[S], plan: &ColumnPlan) -> f64 {
        let lines = self
            .cell_lines(cells, plan)
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(1)
            .max(1);
        lines as f64 * self.style.body_line_height() + self.style.cell_padding.vertical()
    }

    pub fn header_height(&self, columns: &ColumnSpec, plan: &ColumnPlan) -> f64 {
        let labels: Vec<&str> = columns.columns().iter().map(|c| c.label.as_str()).collect();
        self.row_height(labels.as_slice(), plan)
    }

    /// Total height of a block if it were drawn in one piece
    pub fn measure(&self, block: &ContentBlock) -> Result<f64> {
        let height = match block {
            ContentBlock::Title { text, emphasis } => self.title_height(text, *emphasis),
            ContentBlock::KeyValue { pairs } => self.key_value_height(pairs),
            ContentBlock::Paragraph { label, text } => {
                self.paragraph_height(label.as_deref(), text)
            }
            ContentBlock::Table { columns, rows } => {
                if rows.is_empty() {
                    0.0
                } else {
                    let plan = ColumnPlan::new(self.geometry.printable_width(), columns)?;
                    self.header_height(columns, &plan)
                        + rows
                            .iter()
                            .map(|row| self.row_height(row.as_slice(), &plan))
                            .sum::<f64>()
                }
            }
            ContentBlock::Spacer { height } => *height,
        };
        Ok(height)
    }

    /// Height of the first unbreakable band of `block`: a table's header and
    /// first row, or the whole block for anything else. A spacer has none.
    pub fn lead_height(&self, block: &ContentBlock) -> Result<f64> {
        match block {
            ContentBlock::Table { columns, rows } => match rows.first() {
                Some(first) => {
                    let plan = ColumnPlan::new(self.geometry.printable_width(), columns)?;
                    Ok(self.header_height(columns, &plan) + self.row_height(first.as_slice(), &plan))
                }
                None => Ok(0.0),
            },
            ContentBlock::Spacer { .. } => Ok(0.0),
            _ => self.measure(block),
        }
    }
}

fn measurer<'a>(ctx: &'a RenderContext<'_>) -> Measurer<'a> {
    Measurer::new(&ctx.geometry, ctx.style, ctx.metrics)
}

/// Render one block at the cursor. `table_index` numbers table blocks in
/// document order.
pub fn render_block(
    block: &ContentBlock,
    table_index: usize,
    ctx: &mut RenderContext<'_>,
    breaker: &PageBreaker<'_>,
) -> Result<()> {
    debug!(
        "Rendering {} on page {} at y={:.1}",
        block.kind(),
        ctx.cursor().page_index() + 1,
        ctx.cursor().y()
    );
    match block {
        ContentBlock::Title { text, emphasis } => render_title(text, *emphasis, ctx, breaker),
        ContentBlock::KeyValue { pairs } => render_key_value(pairs, ctx, breaker),
        ContentBlock::Paragraph { label, text } => {
            render_paragraph(label.as_deref(), text, ctx, breaker)
        }
        ContentBlock::Table { columns, rows } => {
            render_table(table_index, columns, rows, ctx, breaker)
        }
        ContentBlock::Spacer { height } => render_spacer(*height, ctx),
    }
}

/// Move to a new page before `heading` when it would otherwise end up alone
/// at the bottom of the page, separated from the start of `next`
pub fn keep_with_next(
    heading: &ContentBlock,
    next: &ContentBlock,
    ctx: &mut RenderContext<'_>,
    breaker: &PageBreaker<'_>,
) -> Result<()> {
    let m = measurer(ctx);
    let lead = m.measure(heading)? + m.lead_height(next)?;
    if lead <= breaker.capacity(ctx) && breaker.ensure_space(ctx, lead, "heading")? {
        trace!("Moved {} with the following {}", heading.kind(), next.kind());
    }
    Ok(())
}

fn render_title(
    text: &str,
    emphasis: Emphasis,
    ctx: &mut RenderContext<'_>,
    breaker: &PageBreaker<'_>,
) -> Result<()> {
    let m = measurer(ctx);
    let size = m.title_font_size(emphasis);
    let lines = m.title_lines(text, emphasis);
    let height = m.title_height(text, emphasis);
    let line_height = ctx.style.line_height(size);
    let metrics = ctx.metrics;

    breaker.ensure_space(ctx, height, "title")?;

    let top = ctx.cursor().y();
    let geometry = ctx.geometry;
    for (i, line) in lines.iter().enumerate() {
        let x = match emphasis {
            Emphasis::Strong => {
                (geometry.printable_width() - metrics.text_width(line, size)) / 2.0
            }
            Emphasis::Normal => 0.0,
        };
        let baseline = top + i as f64 * line_height + size;
        ctx.canvas().text(
            geometry.pdf_x(x.max(0.0)),
            geometry.pdf_y(baseline),
            FontFace::Bold,
            size,
            line,
        );
    }

    ctx.advance(PlacementKind::Title, height);
    Ok(())
}

fn render_key_value(
    pairs: &[(String, String)],
    ctx: &mut RenderContext<'_>,
    breaker: &PageBreaker<'_>,
) -> Result<()> {
    let m = measurer(ctx);
    let height = m.key_value_height(pairs);
    let wrapped: Vec<(f64, Vec<String>)> = pairs
        .iter()
        .map(|(label, value)| (m.label_width(label), m.value_lines(label, value)))
        .collect();

    breaker.ensure_space(ctx, height, "key/value block")?;

    let geometry = ctx.geometry;
    let size = ctx.style.font_size;
    let line_height = ctx.style.body_line_height();
    let mut y = ctx.cursor().y();
    for ((label, _), (label_width, lines)) in pairs.iter().zip(wrapped) {
        ctx.canvas().text(
            geometry.pdf_x(0.0),
            geometry.pdf_y(y + size),
            FontFace::Bold,
            size,
            &format!("{label}:"),
        );
        for line in lines {
            ctx.canvas().text(
                geometry.pdf_x(label_width),
                geometry.pdf_y(y + size),
                FontFace::Regular,
                size,
                &line,
            );
            y += line_height;
        }
    }

    ctx.advance(PlacementKind::KeyValue, height);
    Ok(())
}

fn render_paragraph(
    label: Option<&str>,
    text: &str,
    ctx: &mut RenderContext<'_>,
    breaker: &PageBreaker<'_>,
) -> Result<()> {
    let m = measurer(ctx);
    let height = m.paragraph_height(label, text);
    let lines = m.paragraph_lines(text);

    breaker.ensure_space(ctx, height, "paragraph")?;

    let geometry = ctx.geometry;
    let size = ctx.style.font_size;
    let line_height = ctx.style.body_line_height();
    let mut y = ctx.cursor().y();
    if let Some(label) = label {
        ctx.canvas().text(
            geometry.pdf_x(0.0),
            geometry.pdf_y(y + size),
            FontFace::Bold,
            size,
            &format!("{label}:"),
        );
        y += line_height;
    }
    for line in &lines {
        ctx.canvas().text(
            geometry.pdf_x(0.0),
            geometry.pdf_y(y + size),
            FontFace::Regular,
            size,
            line,
        );
        y += line_height;
    }

    ctx.advance(PlacementKind::Paragraph, height);
    Ok(())
}

fn render_spacer(height: f64, ctx: &mut RenderContext<'_>) -> Result<()> {
    let available = ctx.geometry.printable_height();
    if height > available {
        return Err(ReportError::BlockTooLarge {
            kind: "spacer",
            height,
            available,
        });
    }
    // A spacer never starts a page; it stops at the bottom margin
    let advance = height.min(ctx.cursor().remaining_height(&ctx.geometry).max(0.0));
    ctx.advance(PlacementKind::Spacer, advance);
    Ok(())
}

fn render_table(
    table_index: usize,
    columns: &ColumnSpec,
    rows: &[Vec<String>],
    ctx: &mut RenderContext<'_>,
    breaker: &PageBreaker<'_>,
) -> Result<()> {
    if rows.is_empty() {
        debug!("Table {} has no rows, skipping", table_index);
        return Ok(());
    }

    let plan = ColumnPlan::new(ctx.geometry.printable_width(), columns)?;
    let m = measurer(ctx);
    let labels: Vec<String> = columns.columns().iter().map(|c| c.label.clone()).collect();
    let header_lines = m.cell_lines(labels.as_slice(), &plan);
    let header_height = m.header_height(columns, &plan);
    let row_heights: Vec<f64> = rows.iter().map(|row| m.row_height(row.as_slice(), &plan)).collect();
    trace!("Table {} row heights: {:?}", table_index, row_heights);

    // Keep the header together with the first row when an empty page can
    let lead = header_height + row_heights[0];
    if lead <= breaker.capacity(ctx) {
        breaker.ensure_space(ctx, lead, "table header")?;
    } else {
        breaker.ensure_space(ctx, header_height, "table header")?;
    }
    draw_table_row(ctx, columns, &plan, &header_lines, header_height, true);
    ctx.advance(
        PlacementKind::TableHeader {
            table: table_index,
            x_offsets: plan.offsets().to_vec(),
        },
        header_height,
    );

    for (row_idx, (row, &height)) in rows.iter().zip(&row_heights).enumerate() {
        let broke = breaker.ensure_space(ctx, height, "table row")?;
        if broke
            && ctx.style.repeat_table_header
            && ctx
                .cursor()
                .will_fit(&ctx.geometry, header_height + height)
        {
            draw_table_row(ctx, columns, &plan, &header_lines, header_height, true);
            ctx.advance(
                PlacementKind::TableHeader {
                    table: table_index,
                    x_offsets: plan.offsets().to_vec(),
                },
                header_height,
            );
        }

        let lines = measurer(ctx).cell_lines(row.as_slice(), &plan);
        draw_table_row(ctx, columns, &plan, &lines, height, false);
        ctx.advance(
            PlacementKind::TableRow {
                table: table_index,
                row: row_idx,
                x_offsets: plan.offsets().to_vec(),
            },
            height,
        );
    }

    debug!(
        "Table {} finished on page {}",
        table_index,
        ctx.cursor().page_index() + 1
    );
    Ok(())
}

/// Draw a header or data row at the cursor without moving it
fn draw_table_row(
    ctx: &mut RenderContext<'_>,
    columns: &ColumnSpec,
    plan: &ColumnPlan,
    cell_lines: &[Vec<String>],
    height: f64,
    header: bool,
) {
    let geometry = ctx.geometry;
    let style = ctx.style;
    let metrics = ctx.metrics;
    let top = ctx.cursor().y();
    let size = style.font_size;
    let line_height = style.body_line_height();
    let padding = style.cell_padding;
    let face = if header {
        FontFace::Bold
    } else {
        FontFace::Regular
    };

    if header {
        if let Some(background) = style.header_background {
            ctx.canvas().fill_rect(
                geometry.pdf_x(0.0),
                geometry.pdf_y(top + height),
                plan.total_width(),
                height,
                background,
            );
        }
    }

    for (col_idx, lines) in cell_lines.iter().enumerate() {
        let offset = plan.offsets()[col_idx];
        let width = plan.widths()[col_idx];
        let alignment = columns.columns()[col_idx].alignment;
        for (line_idx, line) in lines.iter().enumerate() {
            let text_width = metrics.text_width(line, size);
            let x = match alignment {
                Alignment::Left => offset + padding.left,
                Alignment::Center => offset + (width - text_width) / 2.0,
                Alignment::Right => offset + width - padding.right - text_width,
            };
            let baseline = top + padding.top + line_idx as f64 * line_height + size;
            ctx.canvas().text(
                geometry.pdf_x(x.max(offset)),
                geometry.pdf_y(baseline),
                face,
                size,
                line,
            );
        }
    }

    ctx.canvas().horizontal_rule(
        geometry.pdf_x(0.0),
        geometry.pdf_x(plan.total_width()),
        geometry.pdf_y(top + height),
        style.rule_color,
        style.rule_width,
    );
}

/// Draw the generation footer in the bottom margin of the current page
pub fn render_footer(ctx: &mut RenderContext<'_>, text: &str) {
    let geometry = ctx.geometry;
    let size = ctx.style.footer_font_size;
    let width = ctx.metrics.text_width(text, size);
    // Baseline halfway down the bottom margin
    let baseline = geometry.printable_height() + geometry.margins().bottom / 2.0;
    ctx.canvas().text(
        geometry.pdf_x(((geometry.printable_width() - width) / 2.0).max(0.0)),
        geometry.pdf_y(baseline),
        FontFace::Regular,
        size,
        text,
    );
    let height = ctx.style.line_height(size);
    ctx.place_fixed(PlacementKind::Footer, baseline - size, height);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Column;
    use crate::font::HeuristicMetrics;
    use crate::pagination::NoChrome;

    fn two_columns() -> ColumnSpec {
        ColumnSpec::new(vec![
            Column::new("Name", 1.0),
            Column::new("Qty", 1.0).aligned(Alignment::Right),
        ])
    }

    #[test]
    fn test_measure_simple_blocks() {
        let geometry = PageGeometry::a4();
        let style = ReportStyle::default();
        let metrics = HeuristicMetrics::default();
        let m = Measurer::new(&geometry, &style, &metrics);

        let kv = ContentBlock::key_value([("Goal", "Strength"), ("Difficulty", "Hard")]);
        assert_eq!(m.measure(&kv).unwrap(), 24.0);

        let para = ContentBlock::paragraph(Some("Description"), "Short text");
        assert_eq!(m.measure(&para).unwrap(), 24.0);

        assert_eq!(m.measure(&ContentBlock::spacer(7.5)).unwrap(), 7.5);
        // 18pt * 1.2 + 10pt spacing
        let title = ContentBlock::title("Program");
        assert!((m.measure(&title).unwrap() - 31.6).abs() < 1e-9);
    }

    #[test]
    fn test_empty_table_measures_zero() {
        let geometry = PageGeometry::a4();
        let style = ReportStyle::default();
        let metrics = HeuristicMetrics::default();
        let m = Measurer::new(&geometry, &style, &metrics);
        assert_eq!(m.measure(&ContentBlock::table(two_columns(), vec![])).unwrap(), 0.0);
    }

    #[test]
    fn test_lead_height() {
        let geometry = PageGeometry::a4();
        let style = ReportStyle::default();
        let metrics = HeuristicMetrics::default();
        let m = Measurer::new(&geometry, &style, &metrics);

        let rows = vec![
            vec!["a".to_string(), "1".to_string()],
            vec!["b".to_string(), "2".to_string()],
        ];
        let table = ContentBlock::table(two_columns(), rows);
        assert_eq!(m.lead_height(&table).unwrap(), 40.0);
        assert_eq!(m.measure(&table).unwrap(), 60.0);
        assert_eq!(
            m.lead_height(&ContentBlock::table(two_columns(), vec![])).unwrap(),
            0.0
        );
        assert_eq!(m.lead_height(&ContentBlock::spacer(30.0)).unwrap(), 0.0);
        assert_eq!(
            m.lead_height(&ContentBlock::paragraph(None, "Text")).unwrap(),
            12.0
        );
    }

    #[test]
    fn test_row_height_grows_with_wrapping() {
        let geometry = PageGeometry::a4();
        let style = ReportStyle::default();
        let metrics = HeuristicMetrics::default();
        let m = Measurer::new(&geometry, &style, &metrics);
        let plan = ColumnPlan::new(100.0, &two_columns()).unwrap();

        assert_eq!(m.row_height(&["a", "1"], &plan), style.single_row_height());
        // 42pt of text room holds 8 characters per line
        let tall = m.row_height(&["aaaa bbbb cccc", "1"], &plan);
        assert_eq!(tall, 3.0 * 12.0 + 8.0);
    }

    #[test]
    fn test_table_renders_header_and_rows() {
        let style = ReportStyle::default();
        let metrics = HeuristicMetrics::default();
        let mut ctx = RenderContext::new(PageGeometry::a4(), &style, &metrics);
        let breaker = PageBreaker::new(&NoChrome);
        let rows = vec![
            vec!["Squat".to_string(), "5".to_string()],
            vec!["Bench".to_string(), "3".to_string()],
        ];
        render_block(&ContentBlock::table(two_columns(), rows), 0, &mut ctx, &breaker).unwrap();

        assert_eq!(ctx.cursor().y(), 60.0);
        let (_, report) = ctx.into_parts();
        assert_eq!(report.header_count(), 1);
        assert_eq!(report.rows_in_order(0), vec![0, 1]);
    }

    #[test]
    fn test_spacer_stops_at_bottom_margin() {
        let style = ReportStyle::default();
        let metrics = HeuristicMetrics::default();
        let mut ctx = RenderContext::new(PageGeometry::a4(), &style, &metrics);
        let breaker = PageBreaker::new(&NoChrome);

        render_block(&ContentBlock::spacer(730.0), 0, &mut ctx, &breaker).unwrap();
        render_block(&ContentBlock::spacer(50.0), 0, &mut ctx, &breaker).unwrap();
        assert_eq!(ctx.cursor().page_index(), 0);
        assert_eq!(ctx.cursor().y(), 742.0);

        let too_tall = render_block(&ContentBlock::spacer(800.0), 0, &mut ctx, &breaker);
        assert!(matches!(too_tall, Err(ReportError::BlockTooLarge { .. })));
    }

    #[test]
    fn test_oversized_paragraph_is_rejected() {
        let style = ReportStyle::default();
        let metrics = HeuristicMetrics::default();
        let mut ctx = RenderContext::new(PageGeometry::a4(), &style, &metrics);
        let breaker = PageBreaker::new(&NoChrome);

        let text = "line\n".repeat(70);
        let result = render_block(&ContentBlock::paragraph(None, text), 0, &mut ctx, &breaker);
        assert!(matches!(
            result,
            Err(ReportError::BlockTooLarge {
                kind: "paragraph",
                ..
            })
        ));
    }
}
