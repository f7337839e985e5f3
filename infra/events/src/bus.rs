use crate::error::EventBusError;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::{Any, TypeId, type_name};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast;
use tracing::{trace, warn};

/// Lifecycle events are rare; 64 buffered events per type is plenty.
const DEFAULT_CAPACITY: usize = 64;
const MIN_CAPACITY: usize = 1;

/// Marker trait for types that can be sent across the [`EventBus`].
///
/// Any type that is `Send + Sync + 'static` automatically implements this trait.
pub trait Event: Any + Send + Sync + 'static {}
impl<T: Any + Send + Sync + 'static> Event for T {}

#[derive(Debug)]
struct Channel {
    capacity: usize,
    sender: Box<dyn Any + Send + Sync>,
}

impl Channel {
    fn new<T: Event>(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel::<Arc<T>>(capacity);
        Self { capacity, sender: Box::new(tx) }
    }

    fn sender<T: Event>(&self) -> Result<broadcast::Sender<Arc<T>>, EventBusError> {
        self.sender.downcast_ref::<broadcast::Sender<Arc<T>>>().cloned().ok_or_else(|| {
            EventBusError::TypeMismatch {
                message: type_name::<T>().into(),
                context: Some("Registered sender has an unexpected event type".into()),
            }
        })
    }
}

#[derive(Debug, Default)]
struct BusState {
    channels: RwLock<FxHashMap<TypeId, Channel>>,
    closed: AtomicBool,
}

/// A thread-safe broadcast event bus.
///
/// Cloning is cheap; clones share the same channels.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    state: Arc<BusState>,
}

impl EventBus {
    /// Creates a new, empty `EventBus`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to events of type `T` with the default buffer capacity.
    ///
    /// # Errors
    /// Returns [`EventBusError::Closed`] after [`EventBus::shutdown`].
    pub fn subscribe<T: Event>(&self) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        self.subscribe_with_capacity::<T>(DEFAULT_CAPACITY)
    }

    /// Subscribes to events of type `T`, creating the channel with `capacity`
    /// if it does not exist yet.
    ///
    /// # Errors
    /// Returns [`EventBusError::InvalidCapacity`] if `capacity` is zero and
    /// [`EventBusError::Closed`] after [`EventBus::shutdown`].
    pub fn subscribe_with_capacity<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        if capacity < MIN_CAPACITY {
            return Err(EventBusError::InvalidCapacity {
                message: format!("capacity must be >= {MIN_CAPACITY}").into(),
                context: Some(type_name::<T>().into()),
            });
        }
        Ok(self.sender::<T>(capacity)?.subscribe())
    }

    /// Publishes an event to every current subscriber of `T`.
    ///
    /// Returns the number of subscribers that received the event.
    ///
    /// # Errors
    /// Returns [`EventBusError::Closed`] after [`EventBus::shutdown`].
    pub fn publish<T: Event>(&self, event: T) -> Result<usize, EventBusError> {
        self.publish_arc(Arc::new(event))
    }

    /// Publishes an already shared event without re-wrapping it.
    ///
    /// # Errors
    /// Returns [`EventBusError::Closed`] after [`EventBus::shutdown`].
    pub fn publish_arc<T: Event>(&self, event: Arc<T>) -> Result<usize, EventBusError> {
        let sender = self.sender::<T>(DEFAULT_CAPACITY)?;
        match sender.send(event) {
            Ok(count) => {
                trace!(event = type_name::<T>(), count, "Event dispatched");
                Ok(count)
            },
            Err(_) => {
                trace!(event = type_name::<T>(), "Event dropped: no active subscribers");
                Ok(0)
            },
        }
    }

    /// Number of live receivers for `T`.
    #[must_use]
    pub fn subscriber_count<T: Event>(&self) -> usize {
        self.state
            .channels
            .read()
            .get(&TypeId::of::<T>())
            .and_then(|channel| channel.sender::<T>().ok())
            .map_or(0, |tx| tx.receiver_count())
    }

    /// Closes the bus and drops every channel.
    ///
    /// Returns the number of channels that were closed.
    pub fn shutdown(&self) -> usize {
        self.state.closed.store(true, Ordering::Release);
        let mut channels = self.state.channels.write();
        let count = channels.len();
        channels.clear();
        count
    }

    /// Whether [`EventBus::shutdown`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.closed.load(Ordering::Acquire)
    }

    fn sender<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Sender<Arc<T>>, EventBusError> {
        if self.is_closed() {
            return Err(EventBusError::Closed {
                message: type_name::<T>().into(),
                context: Some("Event bus was shut down".into()),
            });
        }

        let id = TypeId::of::<T>();
        if let Some(channel) = self.state.channels.read().get(&id) {
            if channel.capacity != capacity && capacity != DEFAULT_CAPACITY {
                warn!(
                    event = type_name::<T>(),
                    existing_capacity = channel.capacity,
                    requested_capacity = capacity,
                    "Channel already initialized with a different capacity"
                );
            }
            return channel.sender::<T>();
        }

        let mut channels = self.state.channels.write();
        let channel = channels.entry(id).or_insert_with(|| {
            trace!(event = type_name::<T>(), capacity, "Initializing new event channel");
            Channel::new::<T>(capacity)
        });
        channel.sender::<T>()
    }
}
