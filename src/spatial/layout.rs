//! Overlay layout selection and decoration placement

use crate::io::configuration::{
    COVER_GAP, GRID_PANEL_MARGIN, MAX_GRID_COVERS, ROW_COVER_HEIGHT, ROW_PANEL_MARGIN,
};
use crate::raster::shapes::Bounds;

/// Decoration layout chosen from the output dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutKind {
    /// Background only
    Plain,
    /// 1200x628: panel with a single row of covers
    RowPanel,
    /// 1080x1080: panel with text or a 2x2 cover grid
    GridPanel,
}

impl LayoutKind {
    /// Resolve the layout for an output size
    pub const fn for_dimensions(width: u32, height: u32) -> Self {
        match (width, height) {
            (1200, 628) => Self::RowPanel,
            (1080, 1080) => Self::GridPanel,
            _ => Self::Plain,
        }
    }

    /// Panel inset from the canvas edge, `None` for layouts without a panel
    pub const fn panel_margin(self) -> Option<f32> {
        match self {
            Self::Plain => None,
            Self::RowPanel => Some(ROW_PANEL_MARGIN),
            Self::GridPanel => Some(GRID_PANEL_MARGIN),
        }
    }

    /// Whether this layout has a variant per decoration kind
    pub const fn has_variants(self) -> bool {
        matches!(self, Self::GridPanel)
    }

    /// Panel rectangle on a `width x height` canvas
    pub fn panel_bounds(self, width: u32, height: u32) -> Option<Bounds> {
        self.panel_margin()
            .map(|margin| Bounds::new(0.0, 0.0, width as f32, height as f32).inset(margin))
    }
}

/// Place covers side by side in one row centred on the canvas
///
/// Every cover is scaled to the row height keeping its aspect ratio, with a
/// fixed gap between neighbours.
pub fn row_placements(
    aspect_ratios: &[f32],
    canvas_width: f32,
    canvas_height: f32,
) -> Vec<Bounds> {
    let widths: Vec<f32> = aspect_ratios
        .iter()
        .map(|aspect| ROW_COVER_HEIGHT * aspect)
        .collect();
    let gaps = widths.len().saturating_sub(1) as f32;
    let total = widths.iter().sum::<f32>() + COVER_GAP * gaps;

    let top = (canvas_height - ROW_COVER_HEIGHT) / 2.0;
    let mut x = (canvas_width - total) / 2.0;

    widths
        .into_iter()
        .map(|width| {
            let bounds = Bounds::new(x, top, width, ROW_COVER_HEIGHT);
            x += width + COVER_GAP;
            bounds
        })
        .collect()
}

/// Place up to four covers in a 2x2 grid inside `panel`
///
/// The grid area is the panel inset by the gap. Each cover fits its cell and
/// hugs the shared centre lines, so neighbours are exactly one gap apart.
pub fn grid_placements(aspect_ratios: &[f32], panel: Bounds) -> Vec<Bounds> {
    let content = panel.inset(COVER_GAP);
    let cell_width = (content.width - COVER_GAP) / 2.0;
    let cell_height = (content.height - COVER_GAP) / 2.0;
    let cell_aspect = cell_width / cell_height;

    aspect_ratios
        .iter()
        .take(MAX_GRID_COVERS)
        .enumerate()
        .map(|(index, &aspect)| {
            let (row, col) = (index / 2, index % 2);

            let (width, height) = if aspect > cell_aspect {
                (cell_width, cell_width / aspect)
            } else {
                (cell_height * aspect, cell_height)
            };

            let cell_x = (col as f32).mul_add(cell_width + COVER_GAP, content.x);
            let cell_y = (row as f32).mul_add(cell_height + COVER_GAP, content.y);

            let x = if col == 0 {
                cell_x + cell_width - width
            } else {
                cell_x
            };
            let y = if row == 0 {
                cell_y + cell_height - height
            } else {
                cell_y
            };

            Bounds::new(x, y, width, height)
        })
        .collect()
}
