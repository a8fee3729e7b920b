use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ChatError {
    #[snafu(display("message text is empty after trimming"))]
    EmptyMessage { stage: &'static str },
    #[snafu(display("expression tag '{tag}' is not in the catalog"))]
    UnknownExpression { stage: &'static str, tag: String },
    #[snafu(display("expression tag pattern failed to compile"))]
    TagPattern {
        stage: &'static str,
        source: regex::Error,
    },
    #[snafu(display("chat id '{raw}' is invalid for {id_type}"))]
    InvalidId {
        stage: &'static str,
        id_type: &'static str,
        raw: String,
        source: uuid::Error,
    },
}

pub type ChatResult<T> = Result<T, ChatError>;
