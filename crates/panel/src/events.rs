use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

use crate::machine::Transition;
use crate::panel_type::PanelType;

/// Everything the coordinator reports to the hosting screen, in emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    KeyboardOpened { height: f32 },
    KeyboardClosed,
    TransitionStarted(Transition),
    /// The grouped slide for `target` reached its end and views were re-laid out.
    TransitionFinished { target: PanelType },
    Reset,
    Released,
}

/// Receiving half of a coordinator subscription. Dropping it unsubscribes.
pub struct PanelEventStream {
    events: mpsc::UnboundedReceiver<PanelEvent>,
}

impl PanelEventStream {
    pub async fn recv(&mut self) -> Option<PanelEvent> {
        self.events.recv().await
    }

    pub fn try_recv(&mut self) -> Option<PanelEvent> {
        self.events.try_recv().ok()
    }

    /// Takes every event queued so far.
    pub fn drain(&mut self) -> Vec<PanelEvent> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}

impl Stream for PanelEventStream {
    type Item = PanelEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.events.poll_recv(cx)
    }
}

#[derive(Debug, Default)]
pub(crate) struct EventHub {
    subscribers: Vec<mpsc::UnboundedSender<PanelEvent>>,
}

impl EventHub {
    pub(crate) fn subscribe(&mut self) -> PanelEventStream {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        self.subscribers.push(event_tx);
        PanelEventStream { events: event_rx }
    }

    pub(crate) fn publish(&mut self, event: PanelEvent) {
        // Closed receivers are pruned on the way through.
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;

    #[test]
    fn dropped_streams_are_pruned() {
        let mut hub = EventHub::default();
        let mut kept = hub.subscribe();
        let dropped = hub.subscribe();
        drop(dropped);

        hub.publish(PanelEvent::KeyboardClosed);
        assert_eq!(hub.subscriber_count(), 1);
        assert_eq!(kept.drain(), vec![PanelEvent::KeyboardClosed]);
    }

    #[tokio::test]
    async fn stream_yields_in_order() {
        let mut hub = EventHub::default();
        let stream = hub.subscribe();
        hub.publish(PanelEvent::KeyboardOpened { height: 640.0 });
        hub.publish(PanelEvent::Reset);
        drop(hub);

        let events = stream.collect::<Vec<_>>().await;
        assert_eq!(
            events,
            vec![PanelEvent::KeyboardOpened { height: 640.0 }, PanelEvent::Reset]
        );
    }
}
