use std::collections::HashSet;
use std::rc::Rc;

use gpui::*;
use gpui_component::{
    ActiveTheme, Sizable, VirtualListScrollHandle,
    button::{Button, ButtonVariants},
    h_flex,
    label::Label,
    v_flex, v_virtual_list,
};
use murmur_chat::{ExpressionCatalog, NORMAL_COUNT_BY_ROW};
use murmur_panel::{CellVisibility, GridLayout, GridScrollAdjuster};

use crate::chat::events::{ExpressionDeleteTapped, ExpressionPicked};

/// Strip above the grid naming the expression set; panel height is keyboard plus this.
pub const EXPRESSION_TAB_HEIGHT: f32 = 36.0;
const CELL_HEIGHT: f32 = 48.0;

/// What part of the emoji grid is on screen, in cell terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridViewport {
    pub span: usize,
    pub item_count: usize,
    pub cell_height: f32,
    pub scroll_top: f32,
    pub viewport_height: f32,
}

impl GridViewport {
    fn last_in_rows(&self, rows: f32) -> Option<usize> {
        if self.item_count == 0 || rows < 1.0 {
            return None;
        }
        let rows = rows as usize;
        Some((rows * self.span - 1).min(self.item_count - 1))
    }

    fn bottom_rows(&self) -> f32 {
        if self.cell_height <= 0.0 || self.viewport_height <= 0.0 {
            return 0.0;
        }
        (self.scroll_top.max(0.0) + self.viewport_height) / self.cell_height
    }
}

impl GridLayout for GridViewport {
    fn span_count(&self) -> usize {
        self.span
    }

    fn item_count(&self) -> usize {
        self.item_count
    }

    fn last_visible(&self) -> Option<usize> {
        self.last_in_rows(self.bottom_rows().ceil())
    }

    fn last_completely_visible(&self) -> Option<usize> {
        // Sub-pixel overshoot still counts as a whole row.
        self.last_in_rows((self.bottom_rows() + 0.01).floor())
    }
}

pub struct ExpressionPanel {
    catalog: ExpressionCatalog,
    scroll_handle: VirtualListScrollHandle,
    row_sizes: Rc<Vec<Size<Pixels>>>,
    hidden_cells: HashSet<usize>,
    height: f32,
}

impl EventEmitter<ExpressionPicked> for ExpressionPanel {}
impl EventEmitter<ExpressionDeleteTapped> for ExpressionPanel {}

impl ExpressionPanel {
    pub fn new(catalog: ExpressionCatalog) -> Self {
        let row_sizes = Rc::new(
            catalog
                .rows()
                .map(|_| size(px(0.), px(CELL_HEIGHT)))
                .collect::<Vec<_>>(),
        );

        Self {
            catalog,
            scroll_handle: VirtualListScrollHandle::new(),
            row_sizes,
            hidden_cells: HashSet::new(),
            height: 0.0,
        }
    }

    pub fn set_height(&mut self, height: f32, cx: &mut Context<Self>) {
        if (self.height - height).abs() > f32::EPSILON {
            self.height = height;
            cx.notify();
        }
    }

    fn viewport(&self) -> GridViewport {
        GridViewport {
            span: NORMAL_COUNT_BY_ROW,
            item_count: self.catalog.len(),
            cell_height: CELL_HEIGHT,
            scroll_top: -f32::from(self.scroll_handle.offset().y),
            viewport_height: (self.height - EXPRESSION_TAB_HEIGHT).max(0.0),
        }
    }

    fn sync_hidden_cells(&mut self) {
        for change in GridScrollAdjuster.on_scrolled(&self.viewport()) {
            match change.visibility {
                CellVisibility::Hidden => {
                    self.hidden_cells.insert(change.position);
                }
                CellVisibility::Visible => {
                    self.hidden_cells.remove(&change.position);
                }
            }
        }
    }

    fn render_row(&self, row: usize, cx: &mut Context<Self>) -> Option<AnyElement> {
        let expressions = self.catalog.rows().nth(row)?;
        let cells = expressions.iter().map(|expression| {
            let position = expression.index - 1;
            let tag = expression.tag.clone();
            let cell = div()
                .id(("expression-cell", position))
                .flex_1()
                .h(px(CELL_HEIGHT))
                .flex()
                .items_center()
                .justify_center();

            if self.hidden_cells.contains(&position) {
                return cell.into_any_element();
            }
            cell.rounded_md()
                .cursor_pointer()
                .text_xl()
                .child(expression.glyph)
                .on_click(cx.listener(move |_, _, _window, cx| {
                    cx.emit(ExpressionPicked { tag: tag.clone() });
                }))
                .into_any_element()
        });

        Some(
            h_flex()
                .w_full()
                .h(px(CELL_HEIGHT))
                .children(cells)
                .into_any_element(),
        )
    }
}

impl Render for ExpressionPanel {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        self.sync_hidden_cells();
        let theme = cx.theme();

        v_flex()
            .id("expression-panel")
            .relative()
            .w_full()
            .h(px(self.height))
            .bg(theme.secondary)
            .border_t_1()
            .border_color(theme.border)
            .child(
                h_flex()
                    .h(px(EXPRESSION_TAB_HEIGHT))
                    .px_3()
                    .items_center()
                    .child(Label::new("Emoji").text_sm()),
            )
            .child(
                v_virtual_list(
                    cx.entity().clone(),
                    "expression-grid",
                    self.row_sizes.clone(),
                    |this, visible_range, _window, cx| {
                        visible_range
                            .filter_map(|row| this.render_row(row, cx))
                            .collect::<Vec<_>>()
                    },
                )
                .flex_1()
                .px_2()
                .track_scroll(&self.scroll_handle),
            )
            .child(
                div().absolute().right_3().bottom_3().child(
                    Button::new("expression-delete")
                        .small()
                        .child("⌫")
                        .on_click(cx.listener(|_, _, _window, cx| {
                            cx.emit(ExpressionDeleteTapped);
                        })),
                ),
            )
            .on_scroll_wheel(cx.listener(|_, _, _window, cx| {
                cx.notify();
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(scroll_top: f32, viewport_height: f32) -> GridViewport {
        GridViewport {
            span: 7,
            item_count: 56,
            cell_height: 48.0,
            scroll_top,
            viewport_height,
        }
    }

    #[test]
    fn partial_row_counts_as_visible_only() {
        let grid = viewport(0.0, 200.0);
        assert_eq!(grid.last_visible(), Some(34));
        assert_eq!(grid.last_completely_visible(), Some(27));
    }

    #[test]
    fn scrolled_to_end_clamps_to_last_item() {
        let grid = viewport(240.0, 200.0);
        assert_eq!(grid.last_visible(), Some(55));
        assert_eq!(grid.last_completely_visible(), Some(55));
    }

    #[test]
    fn collapsed_viewport_sees_nothing() {
        let grid = viewport(0.0, 0.0);
        assert_eq!(grid.last_visible(), None);
        assert!(GridScrollAdjuster.on_scrolled(&grid).is_empty());
    }

    #[test]
    fn resting_grid_hides_corner_under_delete_key() {
        let changes = GridScrollAdjuster.on_scrolled(&viewport(0.0, 200.0));
        let hidden = changes
            .iter()
            .filter(|change| change.visibility == CellVisibility::Hidden)
            .map(|change| change.position)
            .collect::<Vec<_>>();
        assert_eq!(hidden, vec![34, 33, 27, 26]);
    }
}
