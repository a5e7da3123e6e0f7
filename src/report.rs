//! Record of where every block landed during a render

/// What a placement holds
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementKind {
    /// Repeating page chrome (e.g. the title on continuation pages)
    Chrome,
    Title,
    KeyValue,
    Paragraph,
    /// Header row of the `table`-th table block, with each cell's x-offset
    TableHeader { table: usize, x_offsets: Vec<f64> },
    /// Data row `row` of the `table`-th table block
    TableRow {
        table: usize,
        row: usize,
        x_offsets: Vec<f64>,
    },
    Spacer,
    /// Generation footer, drawn in the bottom margin
    Footer,
}

/// A vertical band of a page occupied by rendered content
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub kind: PlacementKind,
    /// Distance from the top margin to the top of the band
    pub top: f64,
    pub height: f64,
}

impl Placement {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Placements on one page, in drawing order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageReport {
    pub index: usize,
    pub placements: Vec<Placement>,
}

impl PageReport {
    /// Height used inside the printable area (the footer sits in the margin)
    pub fn content_height(&self) -> f64 {
        self.placements
            .iter()
            .filter(|p| p.kind != PlacementKind::Footer)
            .map(|p| p.height)
            .sum()
    }

    pub fn has_footer(&self) -> bool {
        self.placements
            .iter()
            .any(|p| p.kind == PlacementKind::Footer)
    }

    /// (table, row) indices of the data rows on this page
    pub fn table_rows(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.placements.iter().filter_map(|p| match p.kind {
            PlacementKind::TableRow { table, row, .. } => Some((table, row)),
            _ => None,
        })
    }
}

/// Layout of a whole document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutReport {
    pub pages: Vec<PageReport>,
}

impl LayoutReport {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Data row indices of `table` in document order across all pages
    pub fn rows_in_order(&self, table: usize) -> Vec<usize> {
        self.pages
            .iter()
            .flat_map(|page| page.table_rows())
            .filter(|(t, _)| *t == table)
            .map(|(_, row)| row)
            .collect()
    }

    pub fn placements(&self) -> impl Iterator<Item = &Placement> {
        self.pages.iter().flat_map(|page| page.placements.iter())
    }

    pub fn header_count(&self) -> usize {
        self.placements()
            .filter(|p| matches!(p.kind, PlacementKind::TableHeader { .. }))
            .count()
    }
}
