pub mod draft;
pub mod error;
pub mod expression;
pub mod ids;
pub mod message;
pub mod seed;
pub mod store;

pub use draft::Draft;
pub use error::{ChatError, ChatResult};
pub use expression::{Expression, ExpressionCatalog, NORMAL_COUNT_BY_ROW, Segment, normal_tag};
pub use ids::MessageId;
pub use message::{ImageResource, Message, MessageBody, NewMessage, Sender};
pub use store::{MessageStore, TIMESTAMP_THRESHOLD_MILLIS};

/// Wall-clock milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
