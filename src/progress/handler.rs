//! Progress handler trait and events

use std::time::Duration;

/// Events emitted while a resolution run progresses
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// Run started
    RunStarted { total: usize },

    /// A component is about to be looked up
    ComponentStarted { ordinal: usize, component: String },

    /// Job search finished for a component
    JobLocated {
        ordinal: usize,
        component: String,
        job: Option<String>,
    },

    /// A component has its final version (or the N/A marker)
    ComponentResolved {
        ordinal: usize,
        component: String,
        version: String,
        elapsed: Duration,
    },

    /// All components processed
    RunCompleted {
        total: usize,
        resolved: usize,
        total_time: Duration,
    },
}

/// Trait for handling progress events during a run
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}

/// Forwards every event to each inner handler in order
#[derive(Default)]
pub struct FanOutHandler {
    handlers: Vec<Box<dyn ProgressHandler>>,
}

impl FanOutHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, handler: impl ProgressHandler + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl ProgressHandler for FanOutHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        for handler in &self.handlers {
            handler.on_progress(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingHandler {
        count: Arc<AtomicUsize>,
    }

    impl ProgressHandler for CountingHandler {
        fn on_progress(&self, _event: &ProgressEvent) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_noop_handler() {
        let handler = NoOpHandler;
        handler.on_progress(&ProgressEvent::RunStarted { total: 3 });
    }

    #[test]
    fn test_progress_events() {
        let count = Arc::new(AtomicUsize::new(0));
        let handler = CountingHandler {
            count: count.clone(),
        };

        handler.on_progress(&ProgressEvent::RunStarted { total: 1 });
        handler.on_progress(&ProgressEvent::ComponentStarted {
            ordinal: 1,
            component: "foo-svc".to_string(),
        });
        handler.on_progress(&ProgressEvent::RunCompleted {
            total: 1,
            resolved: 1,
            total_time: Duration::from_secs(2),
        });

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_fan_out_reaches_every_handler() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let handler = FanOutHandler::new()
            .with(CountingHandler {
                count: first.clone(),
            })
            .with(NoOpHandler)
            .with(CountingHandler {
                count: second.clone(),
            });

        handler.on_progress(&ProgressEvent::RunStarted { total: 0 });

        assert_eq!(handler.len(), 3);
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_event_debug() {
        let event = ProgressEvent::ComponentStarted {
            ordinal: 4,
            component: "bar".to_string(),
        };
        let debug_str = format!("{:?}", event);
        assert!(debug_str.contains("ComponentStarted"));
        assert!(debug_str.contains("ordinal: 4"));
    }
}
