//! Observable state stream
//!
//! Each subscriber gets its own unbounded channel, so every transition
//! reaches every live subscriber in order and nothing is coalesced.

use super::types::FetchState;
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Fan-out of state transitions to subscribers
#[derive(Debug, Default)]
pub(crate) struct StateBroadcaster {
    subscribers: Vec<UnboundedSender<FetchState>>,
}

impl StateBroadcaster {
    /// Register a new subscriber
    pub(crate) fn subscribe(&mut self) -> StateSubscription {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.subscribers.push(sender);
        StateSubscription { receiver }
    }

    /// Deliver a transition, pruning subscribers that went away
    pub(crate) fn emit(&mut self, state: &FetchState) {
        self.subscribers
            .retain(|subscriber| subscriber.send(state.clone()).is_ok());
    }

    /// Number of live subscribers
    pub(crate) fn len(&self) -> usize {
        self.subscribers
            .iter()
            .filter(|subscriber| !subscriber.is_closed())
            .count()
    }
}

/// Receiving end of the state stream.
///
/// Only transitions emitted after subscribing are delivered. The stream
/// ends once the controller is dropped.
#[derive(Debug)]
pub struct StateSubscription {
    receiver: UnboundedReceiver<FetchState>,
}

impl StateSubscription {
    /// Wait for the next transition
    pub async fn recv(&mut self) -> Option<FetchState> {
        self.receiver.recv().await
    }

    /// Take the next transition if one is already queued
    pub fn try_recv(&mut self) -> Option<FetchState> {
        self.receiver.try_recv().ok()
    }

    /// Take every queued transition
    pub fn drain(&mut self) -> Vec<FetchState> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}

impl Stream for StateSubscription {
    type Item = FetchState;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

#[cfg(test)]
mod stream_tests {
    use super::*;
    use futures::StreamExt;

    #[test]
    fn test_every_subscriber_sees_every_transition() {
        let mut broadcaster = StateBroadcaster::default();
        let mut first = broadcaster.subscribe();
        let mut second = broadcaster.subscribe();

        broadcaster.emit(&FetchState::Fetching);
        broadcaster.emit(&FetchState::Success);
        broadcaster.emit(&FetchState::Fetching);

        let expected = vec![
            FetchState::Fetching,
            FetchState::Success,
            FetchState::Fetching,
        ];
        assert_eq!(first.drain(), expected);
        assert_eq!(second.drain(), expected);
        assert!(first.try_recv().is_none());
    }

    #[test]
    fn test_late_subscriber_gets_only_new_transitions() {
        let mut broadcaster = StateBroadcaster::default();
        broadcaster.emit(&FetchState::Fetching);

        let mut late = broadcaster.subscribe();
        broadcaster.emit(&FetchState::Success);
        assert_eq!(late.drain(), vec![FetchState::Success]);
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let mut broadcaster = StateBroadcaster::default();
        let kept = broadcaster.subscribe();
        let dropped = broadcaster.subscribe();
        assert_eq!(broadcaster.len(), 2);

        drop(dropped);
        broadcaster.emit(&FetchState::Fetching);
        assert_eq!(broadcaster.subscribers.len(), 1);
        assert_eq!(broadcaster.len(), 1);
        drop(kept);
    }

    #[tokio::test]
    async fn test_subscription_is_a_stream() {
        let mut broadcaster = StateBroadcaster::default();
        let subscription = broadcaster.subscribe();

        broadcaster.emit(&FetchState::Fetching);
        broadcaster.emit(&FetchState::Error("offline".into()));
        drop(broadcaster);

        let states: Vec<FetchState> = subscription.collect().await;
        assert_eq!(
            states,
            vec![FetchState::Fetching, FetchState::Error("offline".into())]
        );
    }
}
