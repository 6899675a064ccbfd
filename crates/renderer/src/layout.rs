//! Fixed 2 x 4 panel grid below a header strip.

use report_common::PANEL_COUNT;

pub const GRID_COLUMNS: u32 = 2;
pub const GRID_ROWS: u32 = 4;

/// Axis-aligned pixel rectangle. `right` and `bottom` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True if both rectangles are non-empty and share at least one pixel.
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// True if `other` lies entirely inside `self`.
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Shrink by `pad` on every side, collapsing to zero size if too small.
    pub fn inset(&self, pad: u32) -> Rect {
        Rect {
            x: self.x.saturating_add(pad).min(self.right()),
            y: self.y.saturating_add(pad).min(self.bottom()),
            width: self.width.saturating_sub(pad.saturating_mul(2)),
            height: self.height.saturating_sub(pad.saturating_mul(2)),
        }
    }

    /// Clip to `bounds`, keeping the origin inside it.
    fn clamp_to(&self, bounds: &Rect) -> Rect {
        let x = self.x.clamp(bounds.x, bounds.right());
        let y = self.y.clamp(bounds.y, bounds.bottom());
        Rect {
            x,
            y,
            width: self.right().min(bounds.right()).saturating_sub(x),
            height: self.bottom().min(bounds.bottom()).saturating_sub(y),
        }
    }
}

/// Header strip plus one box per panel, in panel order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutGrid {
    pub canvas: Rect,
    pub header: Rect,
    pub margin: u32,
    pub cells: [Rect; PANEL_COUNT],
}

impl LayoutGrid {
    pub fn cell(&self, index: usize) -> Option<&Rect> {
        self.cells.get(index)
    }

    pub fn regions(&self, index: usize) -> Option<PanelRegions> {
        self.cell(index).map(PanelRegions::for_cell)
    }
}

/// Compute the panel grid for a canvas.
///
/// Margin, gap and header scale with the canvas. Canvases too small for the
/// fixed parts yield zero-area cells clamped inside the canvas.
pub fn layout(canvas_width: u32, canvas_height: u32) -> LayoutGrid {
    let canvas = Rect::new(0, 0, canvas_width, canvas_height);

    let margin = canvas_width / 40;
    let gap = canvas_width / 80;
    let header_height = canvas_height / 12;

    let cell_w = canvas_width
        .saturating_sub(2 * margin + (GRID_COLUMNS - 1) * gap)
        / GRID_COLUMNS;
    let cell_h = canvas_height
        .saturating_sub(header_height + margin + (GRID_ROWS - 1) * gap)
        / GRID_ROWS;

    let header = Rect::new(margin, 0, canvas_width.saturating_sub(2 * margin), header_height);

    let mut cells = [Rect::default(); PANEL_COUNT];
    for (i, cell) in cells.iter_mut().enumerate() {
        let (row, col) = (i as u32 / GRID_COLUMNS, i as u32 % GRID_COLUMNS);
        *cell = Rect::new(
            margin + col * (cell_w + gap),
            header_height + row * (cell_h + gap),
            cell_w,
            cell_h,
        )
        .clamp_to(&canvas);
    }

    LayoutGrid {
        canvas,
        header: header.clamp_to(&canvas),
        margin,
        cells,
    }
}

/// Sub-regions of one panel box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelRegions {
    pub panel: Rect,
    /// Square icon slot in the top-left corner
    pub icon: Rect,
    /// Title, value and description, right of the icon
    pub text: Rect,
    /// Full-width strip below the text for the chart
    pub chart: Rect,
    pub padding: u32,
}

impl PanelRegions {
    pub fn for_cell(cell: &Rect) -> Self {
        let padding = (cell.height / 20).max(2);
        let inner = cell.inset(padding);

        let side = ((cell.height as f32 * 0.3).min(cell.width as f32 * 0.2)) as u32;
        let side = side.min(inner.width).min(inner.height);
        let icon = Rect::new(inner.x, inner.y, side, side);

        let text_x = (icon.right() + padding).min(inner.right());
        let text_height = ((cell.height as f32 * 0.4) as u32).max(side).min(inner.height);
        let text = Rect::new(text_x, inner.y, inner.right() - text_x, text_height);

        let chart_y = (inner.y + text_height + padding).min(inner.bottom());
        let chart = Rect::new(inner.x, chart_y, inner.width, inner.bottom() - chart_y);

        Self {
            panel: *cell,
            icon,
            text,
            chart,
            padding,
        }
    }

    pub fn title_size(&self) -> f32 {
        self.panel.height as f32 * 0.08
    }

    pub fn value_size(&self) -> f32 {
        self.panel.height as f32 * 0.12
    }

    pub fn description_size(&self) -> f32 {
        self.panel.height as f32 * 0.064
    }
}
