use std::sync::Arc;
use parking_lot::Mutex;
use ahash::AHashMap;

/// Bus for widget lifecycle events
pub struct EventBus {
    handlers: Arc<Mutex<AHashMap<std::any::TypeId, Vec<Box<dyn EventHandler>>>>>,
}

/// Event trait that all events must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// Lifecycle events published by widgets
pub mod events {
    use super::Event;
    use crate::container::ContainerId;
    use crate::engine::SceneId;

    /// A scene was attached and published
    #[derive(Debug, Clone)]
    pub struct SceneMounted {
        pub container: ContainerId,
        pub scene_id: SceneId,
        pub plot_count: usize,
    }

    /// A scene was detached and removed from the registry
    #[derive(Debug, Clone)]
    pub struct SceneReleased {
        pub container: ContainerId,
        pub scene_id: SceneId,
    }

    /// A render was aborted; the previous scene, if any, stays mounted
    #[derive(Debug, Clone)]
    pub struct RenderFailed {
        pub container: ContainerId,
        pub error: String,
    }

    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(SceneMounted, SceneReleased, RenderFailed);
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(AHashMap::new())),
        }
    }

    /// Subscribe to events of a specific type
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();
        handlers.entry(type_id).or_insert_with(Vec::new).push(handler);
    }

    /// Publish an event
    pub fn publish<E: Event>(&self, event: E) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();

        if let Some(event_handlers) = handlers.get_mut(&type_id) {
            for handler in event_handlers.iter_mut() {
                handler.handle(&event);
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

struct ClosureEventHandler<F> {
    handler: F,
}

impl<F> EventHandler for ClosureEventHandler<F>
where
    F: FnMut(&dyn Event) + Send + Sync,
{
    fn handle(&mut self, event: &dyn Event) {
        (self.handler)(event);
    }
}

/// Create an event handler from a closure
pub fn handler_from_fn<F>(f: F) -> Box<dyn EventHandler>
where
    F: FnMut(&dyn Event) + Send + Sync + 'static,
{
    Box::new(ClosureEventHandler { handler: f })
}

#[cfg(test)]
mod tests {
    use super::events::{RenderFailed, SceneReleased};
    use super::*;

    #[test]
    fn test_handlers_receive_their_event_type() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        bus.subscribe::<RenderFailed>(handler_from_fn(move |event| {
            if let Some(failed) = event.as_any().downcast_ref::<RenderFailed>() {
                sink.lock().push(failed.error.clone());
            }
        }));

        bus.publish(SceneReleased {
            container: "el".into(),
            scene_id: uuid::Uuid::nil(),
        });
        bus.publish(RenderFailed {
            container: "el".into(),
            error: "boom".to_string(),
        });

        assert_eq!(*seen.lock(), vec!["boom".to_string()]);
    }
}
