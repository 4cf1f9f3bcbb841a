use std::{
    fmt,
    sync::{Arc, Mutex},
};
use tracing::{
    field::{Field, Visit},
    subscriber::DefaultGuard,
    Event, Level, Subscriber,
};
use tracing_subscriber::{
    layer::{Context, SubscriberExt},
    Layer,
};

/// One event recorded by [`LogCapture`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedEvent {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub fields: Vec<(String, String)>,
}

/// Layer that records every event it sees.
///
/// Install it for the current thread with [`LogCapture::set_default`] so
/// concurrently running tests don't observe each other's events.
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl LogCapture {
    pub fn set_default(&self) -> DefaultGuard {
        let subscriber = tracing_subscriber::registry().with(self.clone());
        tracing::subscriber::set_default(subscriber)
    }

    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().expect("lock captured events").clone()
    }

    /// Messages of the events emitted under `target`, in emission order.
    pub fn messages_of(&self, target: &str) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|event| event.target == target)
            .map(|event| event.message)
            .collect()
    }
}

impl<S: Subscriber> Layer<S> for LogCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);
        let metadata = event.metadata();
        self.events.lock().expect("lock captured events").push(CapturedEvent {
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.push((field.name().to_string(), format!("{value:?}")));
        }
    }
}
