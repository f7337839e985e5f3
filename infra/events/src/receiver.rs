use crate::bus::Event;
use std::any::type_name;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::{debug, warn};

/// Ergonomic receive helpers for bus subscriptions.
///
/// Lagging receivers skip to the oldest retained event instead of failing.
pub trait EventReceiverExt<T> {
    /// Takes every event currently buffered without blocking.
    fn drain(&mut self) -> Vec<Arc<T>>;

    /// Waits for the next event, returning `None` once the bus drops the channel.
    fn next_event(&mut self) -> impl Future<Output = Option<Arc<T>>> + Send;
}

impl<T: Event> EventReceiverExt<T> for broadcast::Receiver<Arc<T>> {
    fn drain(&mut self) -> Vec<Arc<T>> {
        let mut events = Vec::new();
        loop {
            match self.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(event = type_name::<T>(), skipped, "Receiver lagged while draining");
                },
                Err(TryRecvError::Empty | TryRecvError::Closed) => return events,
            }
        }
    }

    async fn next_event(&mut self) -> Option<Arc<T>> {
        let mut skipped = 0u64;

        loop {
            match self.recv().await {
                Ok(event) => {
                    if skipped > 0 {
                        warn!(
                            event = type_name::<T>(),
                            skipped, "Receiver lagged; continuing from the oldest retained event"
                        );
                    }
                    return Some(event);
                },
                Err(RecvError::Lagged(n)) => {
                    skipped = skipped.saturating_add(n);
                    debug!(event = type_name::<T>(), skipped = n, total_skipped = skipped, "Lagged");
                },
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
