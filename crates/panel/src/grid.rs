use snafu::ensure;

use crate::error::{GridPositionSnafu, PanelResult};

/// Read side of a scrolled grid of equally sized cells.
pub trait GridLayout {
    fn span_count(&self) -> usize;
    fn item_count(&self) -> usize;
    fn last_visible(&self) -> Option<usize>;
    fn last_completely_visible(&self) -> Option<usize>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellVisibility {
    Hidden,
    Visible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellChange {
    pub position: usize,
    pub visibility: CellVisibility,
}

/// Clears the trailing corner of the emoji grid, where the delete key floats over the
/// last rows, and restores cells once they scroll clear of it.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridScrollAdjuster;

impl GridScrollAdjuster {
    /// Visibility changes for the current scroll position. Lookups that land outside the
    /// grid are logged and skipped.
    pub fn on_scrolled(&self, layout: &dyn GridLayout) -> Vec<CellChange> {
        let span = layout.span_count() as i64;
        let item_count = layout.item_count();
        let Some(last) = layout.last_visible().map(|position| position as i64) else {
            return Vec::new();
        };
        if span == 0 {
            return Vec::new();
        }

        let mut changes = Vec::new();
        let mut push = |position: i64, visibility: CellVisibility| {
            match cell(position, item_count) {
                Ok(position) => changes.push(CellChange {
                    position,
                    visibility,
                }),
                Err(error) => tracing::warn!(%error, "skipping grid cell"),
            }
        };

        if in_trailing_pair(last, span) {
            if (last + 1) % span == 0 {
                push(last, CellVisibility::Hidden);
            }
            push(last - 1, CellVisibility::Hidden);
            push(last - span, CellVisibility::Hidden);
            push(last - span - 1, CellVisibility::Hidden);
        }

        let complete = layout.last_completely_visible().map(|position| position as i64);
        if let Some(complete) = complete.filter(|complete| in_trailing_pair(*complete, span)) {
            if (complete + 1) % span == 0 {
                push(last - span * 2, CellVisibility::Visible);
            }
            push(last - span * 2 - 1, CellVisibility::Visible);
        }

        changes
    }
}

fn in_trailing_pair(position: i64, span: i64) -> bool {
    (position + 1) % span == 0 || (position + 2) % span == 0
}

fn cell(position: i64, item_count: usize) -> PanelResult<usize> {
    ensure!(
        position >= 0 && (position as usize) < item_count,
        GridPositionSnafu {
            stage: "grid-scroll",
            position,
            item_count,
        }
    );
    Ok(position as usize)
}
