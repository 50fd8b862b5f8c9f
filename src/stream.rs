//! Subscribable event stream
//!
//! A thin wrapper over a tokio broadcast channel. Every subscriber receives
//! every event published after it subscribed; dropping a [`Subscription`]
//! unsubscribes it.

use crate::event::InputEvent;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::{debug, warn};

/// Fan-out of semantic input events to any number of subscribers
///
/// Cloning is cheap; every clone publishes into the same stream.
///
/// # Examples
///
/// ```rust
/// use cockpit::{ButtonInput, ButtonStatus, EventStream, InputEvent};
///
/// let stream = EventStream::new(16);
/// let mut subscription = stream.subscribe();
/// stream.publish(InputEvent::Button(ButtonInput {
///     id: 0,
///     dt: 0.0,
///     held: 0.0,
///     status: ButtonStatus::Pressed,
/// }));
/// assert!(subscription.try_recv().is_some());
/// ```
#[derive(Clone, Debug)]
pub struct EventStream {
    sender: broadcast::Sender<InputEvent>,
}

impl EventStream {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        debug!("Created event stream with buffer capacity {}", capacity);
        Self { sender }
    }

    /// Publishes one event. Having no subscribers is not an error.
    pub fn publish(&self, event: InputEvent) {
        if self.sender.send(event).is_err() {
            debug!("Event dropped, stream has no subscribers");
        }
    }

    pub fn publish_all(&self, events: impl IntoIterator<Item = InputEvent>) {
        for event in events {
            self.publish(event);
        }
    }

    /// Registers a subscriber that sees every event published from now on.
    ///
    /// Drop the returned [`Subscription`] to unsubscribe.
    pub fn subscribe(&self) -> Subscription {
        debug!(
            "New subscriber to event stream ({} total)",
            self.sender.receiver_count() + 1
        );
        Subscription {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventStream {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[derive(Debug)]
pub struct Subscription {
    receiver: broadcast::Receiver<InputEvent>,
}

impl Subscription {
    /// Waits for the next event. `None` once every publisher is gone.
    pub async fn recv(&mut self) -> Option<InputEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Subscriber lagging, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Returns an already queued event without waiting.
    pub fn try_recv(&mut self) -> Option<InputEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!("Subscriber lagging, skipped {} events", skipped);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ButtonInput, ButtonStatus};

    fn button(id: usize) -> InputEvent {
        InputEvent::Button(ButtonInput {
            id,
            dt: 0.0,
            held: 0.0,
            status: ButtonStatus::Pressed,
        })
    }

    #[test]
    fn every_subscriber_sees_full_stream() {
        let stream = EventStream::new(16);
        let mut first = stream.subscribe();
        let mut second = stream.subscribe();

        stream.publish_all([button(0), button(1)]);

        for sub in [&mut first, &mut second] {
            assert_eq!(sub.try_recv(), Some(button(0)));
            assert_eq!(sub.try_recv(), Some(button(1)));
            assert_eq!(sub.try_recv(), None);
        }
    }

    #[test]
    fn late_subscriber_misses_earlier_events() {
        let stream = EventStream::new(16);
        stream.publish(button(3));
        let mut late = stream.subscribe();
        assert_eq!(late.try_recv(), None);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let stream = EventStream::new(4);
        let sub = stream.subscribe();
        assert_eq!(stream.subscriber_count(), 1);
        drop(sub);
        assert_eq!(stream.subscriber_count(), 0);
        stream.publish(button(0));
    }

    #[test]
    fn lagging_subscriber_keeps_receiving() {
        let stream = EventStream::new(2);
        let mut sub = stream.subscribe();
        for id in 0..5 {
            stream.publish(button(id));
        }
        assert_eq!(sub.try_recv(), Some(button(3)));
        assert_eq!(sub.try_recv(), Some(button(4)));
    }
}
