use snafu::ensure;

use crate::error::{ChatResult, EmptyMessageSnafu};
use crate::message::{Message, MessageBody, NewMessage, Sender};

/// Gap after which a message shows its own timestamp. Exactly five minutes stays grouped.
pub const TIMESTAMP_THRESHOLD_MILLIS: i64 = 5 * 60 * 1000;

/// Append-only, ordered message list with sender-grouping rules applied on insert.
#[derive(Debug, Clone, Default)]
pub struct MessageStore {
    messages: Vec<Message>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store preloaded with the sample conversation, ending shortly before `now_millis`.
    pub fn seeded(now_millis: i64) -> Self {
        let mut store = Self::new();
        for message in crate::seed::sample_messages(now_millis) {
            store.append(message);
        }
        tracing::debug!(count = store.len(), "message store seeded");
        store
    }

    /// Inserts `input` after the current last message. Earlier messages are never touched.
    pub fn append(&mut self, input: NewMessage) -> &Message {
        let (show_sender_info, show_timestamp) = match self.messages.last() {
            Some(previous) => (
                previous.sender() != input.sender,
                input.timestamp_millis - previous.timestamp_millis() > TIMESTAMP_THRESHOLD_MILLIS,
            ),
            None => (true, true),
        };

        let index = self.messages.len();
        self.messages
            .push(Message::annotated(input, show_sender_info, show_timestamp));
        &self.messages[index]
    }

    /// Sends trimmed text as [`Sender::Me`]. Blank input is rejected.
    pub fn send_text(&mut self, text: &str, timestamp_millis: i64) -> ChatResult<&Message> {
        let text = text.trim();
        ensure!(!text.is_empty(), EmptyMessageSnafu { stage: "send-text" });

        let message = self.append(NewMessage {
            sender: Sender::Me,
            body: MessageBody::Text(text.to_string()),
            timestamp_millis,
        });
        tracing::debug!(id = %message.id(), "message sent");
        Ok(message)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Owned copy for the host to render.
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChatError;

    const T0: i64 = 1_700_000_000_000;

    fn flags(message: &Message) -> (bool, bool) {
        (message.show_sender_info(), message.show_timestamp())
    }

    #[test]
    fn first_message_shows_everything() {
        let mut store = MessageStore::new();
        let first = store.append(NewMessage::text(Sender::Peer, "hello", T0));
        assert_eq!(flags(first), (true, true));
        assert!(first.starts_group());
    }

    #[test]
    fn same_sender_burst_is_grouped() {
        let mut store = MessageStore::new();
        store.append(NewMessage::text(Sender::Me, "one", T0));
        let second = store.append(NewMessage::text(Sender::Me, "two", T0 + 1_000));
        assert_eq!(flags(second), (false, false));
        assert!(!second.starts_group());

        let third = store.append(NewMessage::text(Sender::Peer, "three", T0 + 2_000));
        assert_eq!(flags(third), (true, false));
    }

    #[test]
    fn exactly_five_minutes_stays_in_group() {
        let mut store = MessageStore::new();
        store.append(NewMessage::text(Sender::Me, "one", T0));
        let boundary = store.append(NewMessage::text(
            Sender::Me,
            "two",
            T0 + TIMESTAMP_THRESHOLD_MILLIS,
        ));
        assert!(!boundary.show_timestamp());

        let past = store.append(NewMessage::text(
            Sender::Me,
            "three",
            T0 + 2 * TIMESTAMP_THRESHOLD_MILLIS + 1,
        ));
        assert!(past.show_timestamp());
        assert!(past.starts_group());
    }

    #[test]
    fn previous_message_is_left_alone() {
        let mut store = MessageStore::new();
        store.append(NewMessage::text(Sender::Me, "one", T0));
        store.append(NewMessage::text(Sender::Me, "two", T0 + 1_000));
        store.append(NewMessage::text(Sender::Me, "three", T0 + 3_600_000));

        assert!(!store.messages()[1].show_timestamp());
        assert!(store.messages()[2].show_timestamp());
    }

    #[test]
    fn send_trims_and_rejects_blank_text() {
        let mut store = MessageStore::new();
        assert!(matches!(
            store.send_text("   \n", T0),
            Err(ChatError::EmptyMessage { .. })
        ));
        assert!(store.is_empty());

        let sent = store.send_text("  hi there ", T0).map(|message| message.body().clone());
        assert_eq!(sent.ok(), Some(MessageBody::Text("hi there".to_string())));
        assert_eq!(store.last().map(|message| message.sender()), Some(Sender::Me));
    }

    #[test]
    fn seeded_store_applies_grouping() {
        let store = MessageStore::seeded(T0);
        assert_eq!(store.len(), 13);

        let messages = store.messages();
        assert_eq!(flags(&messages[0]), (true, true));
        // Samples are seconds apart, so only sender changes open groups.
        assert!(messages[1..].iter().all(|message| !message.show_timestamp()));
        assert!(!messages[6].show_sender_info());
        assert!(!messages[8].show_sender_info());
        assert!(messages[7].show_sender_info());
    }
}
