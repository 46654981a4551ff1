use std::fmt::Debug;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tracing::{field::Field, subscriber::DefaultGuard, Event, Level, Subscriber};
use tracing_subscriber::{layer::Context, prelude::*, Layer, Registry};

use crate::database::models::Employee;
use crate::geo::{GeoPoint, Geofence};

/// Seven points of a morning route around the Mumbai office
pub fn sample_location() -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {},
            "geometry": {
                "type": "LineString",
                "coordinates": [
                    [72.855663, 19.080709],
                    [72.871113, 19.09531],
                    [72.873344, 19.078438],
                    [72.86459, 19.067731],
                    [72.848454, 19.073084],
                    [72.854633, 19.081521],
                    [72.840214, 19.105204]
                ]
            }
        }]
    })
}

/// 2 km around (19.08, 72.86)
pub fn mumbai_office() -> Geofence {
    Geofence {
        center: GeoPoint { longitude: 72.86, latitude: 19.08 },
        radius_km: 2.0,
    }
}

pub fn employee(name: &str, user_id: &str) -> Employee {
    Employee {
        name: name.to_string(),
        user_id: user_id.to_string(),
        employee_name: None,
        company: Some("Acme".to_string()),
    }
}

/// One recorded tracing event
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub target: String,
    pub message: String,
}

pub type CapturedEvents = Arc<Mutex<Vec<CapturedEvent>>>;

struct CaptureLayer {
    level: Level,
    events: CapturedEvents,
}

#[derive(Default)]
struct MessageVisitor(String);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        if field.name() == "message" {
            self.0 = format!("{:?}", value);
        }
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() != self.level {
            return;
        }
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            target: event.metadata().target().to_string(),
            message: visitor.0,
        });
    }
}

/// Record every event at `level` on this thread until the guard drops.
/// Async callers need the current-thread runtime (plain `#[tokio::test]`).
pub fn capture_events(level: Level) -> (CapturedEvents, DefaultGuard) {
    let events = CapturedEvents::default();
    let layer = CaptureLayer {
        level,
        events: events.clone(),
    };
    let guard = tracing::subscriber::set_default(Registry::default().with(layer));
    (events, guard)
}
