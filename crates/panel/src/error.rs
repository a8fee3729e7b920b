use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum PanelError {
    #[snafu(display("panel type '{name}' is not recognized"))]
    UnknownPanelType { stage: &'static str, name: String },
    #[snafu(display("grid position {position} is outside the {item_count} laid out items"))]
    GridPosition {
        stage: &'static str,
        position: i64,
        item_count: usize,
    },
}

pub type PanelResult<T> = Result<T, PanelError>;
