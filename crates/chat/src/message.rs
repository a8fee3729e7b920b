use std::fmt;

use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::ids::MessageId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    Me,
    Peer,
}

impl Sender {
    pub fn is_me(self) -> bool {
        matches!(self, Self::Me)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Me => "Me",
            Self::Peer => "Alex",
        }
    }
}

/// Bundled image shown in place of text. Only static resources are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageResource {
    AppIcon,
    Star,
    Gallery,
    Info,
}

impl ImageResource {
    pub fn name(self) -> &'static str {
        match self {
            Self::AppIcon => "app_icon",
            Self::Star => "star",
            Self::Gallery => "gallery",
            Self::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MessageBody {
    Text(String),
    Image(ImageResource),
}

impl MessageBody {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Image(_) => None,
        }
    }
}

impl fmt::Display for MessageBody {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => formatter.write_str(text),
            Self::Image(resource) => write!(formatter, "[image:{}]", resource.name()),
        }
    }
}

/// Input for [`MessageStore::append`](crate::MessageStore::append).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub sender: Sender,
    pub body: MessageBody,
    pub timestamp_millis: i64,
}

impl NewMessage {
    pub fn text(sender: Sender, text: impl Into<String>, timestamp_millis: i64) -> Self {
        Self {
            sender,
            body: MessageBody::Text(text.into()),
            timestamp_millis,
        }
    }

    pub fn image(sender: Sender, resource: ImageResource, timestamp_millis: i64) -> Self {
        Self {
            sender,
            body: MessageBody::Image(resource),
            timestamp_millis,
        }
    }
}

/// A stored message. Display flags are fixed when the store inserts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    sender: Sender,
    body: MessageBody,
    timestamp_millis: i64,
    show_sender_info: bool,
    show_timestamp: bool,
}

impl Message {
    pub(crate) fn annotated(
        input: NewMessage,
        show_sender_info: bool,
        show_timestamp: bool,
    ) -> Self {
        Self {
            id: MessageId::new_v7(),
            sender: input.sender,
            body: input.body,
            timestamp_millis: input.timestamp_millis,
            show_sender_info,
            show_timestamp,
        }
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn body(&self) -> &MessageBody {
        &self.body
    }

    pub fn timestamp_millis(&self) -> i64 {
        self.timestamp_millis
    }

    pub fn show_sender_info(&self) -> bool {
        self.show_sender_info
    }

    pub fn show_timestamp(&self) -> bool {
        self.show_timestamp
    }

    /// Whether the row opens a new visual group and gets the larger top margin.
    pub fn starts_group(&self) -> bool {
        self.show_sender_info || self.show_timestamp
    }

    pub fn time_label(&self) -> Option<String> {
        self.time_label_in(&Local)
    }

    /// `HH:MM` in the given zone; `None` when the timestamp is out of range.
    pub fn time_label_in<Tz>(&self, zone: &Tz) -> Option<String>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        zone.timestamp_millis_opt(self.timestamp_millis)
            .single()
            .map(|time| time.format("%H:%M").to_string())
    }
}
