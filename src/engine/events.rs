// ==========================================
// Panitia Engine - assignment change events
// ==========================================
// Responsibility: change-notification contract for the assignment store.
// The engine defines the trait; subscribers (UI refresh, conflict
// reporting) implement it. One event per program per committed write,
// no implicit global broadcast.
// ==========================================

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::sync::Arc;

// ==========================================
// Event types
// ==========================================

/// What changed in the assignment store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentEventType {
    /// A program's unlocked set was replaced by the generator
    AssignmentsRegenerated,
    /// A single assignment was added manually
    AssignmentAdded,
    /// A single assignment was removed
    AssignmentRemoved,
    /// An assignment's lock flag was toggled
    LockToggled,
}

impl AssignmentEventType {
    pub fn as_str(&self) -> &str {
        match self {
            AssignmentEventType::AssignmentsRegenerated => "AssignmentsRegenerated",
            AssignmentEventType::AssignmentAdded => "AssignmentAdded",
            AssignmentEventType::AssignmentRemoved => "AssignmentRemoved",
            AssignmentEventType::LockToggled => "LockToggled",
        }
    }
}

/// A committed change to one program's assignment set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentEvent {
    /// Program whose assignment set changed
    pub program_id: String,
    /// Kind of change
    pub event_type: AssignmentEventType,
    /// Originating component, for diagnostics
    pub source: Option<String>,
}

impl AssignmentEvent {
    pub fn new(
        program_id: &str,
        event_type: AssignmentEventType,
        source: Option<&str>,
    ) -> Self {
        Self {
            program_id: program_id.to_string(),
            event_type,
            source: source.map(str::to_string),
        }
    }
}

// ==========================================
// Publisher trait
// ==========================================

/// Assignment event publisher
///
/// Emitted after the write has committed; a failing subscriber must not
/// fail the operation that produced the event.
pub trait AssignmentEventPublisher: Send + Sync {
    fn publish(&self, event: AssignmentEvent) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// No-op publisher for callers that do not subscribe (and for tests)
#[derive(Debug, Clone, Default)]
pub struct NoOpEventPublisher;

impl AssignmentEventPublisher for NoOpEventPublisher {
    fn publish(&self, event: AssignmentEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        tracing::debug!(
            "NoOpEventPublisher: dropping event - program_id={}, event_type={}",
            event.program_id,
            event.event_type.as_str()
        );
        Ok(())
    }
}

/// Optional publisher wrapper
///
/// Simplifies carrying `Option<Arc<dyn AssignmentEventPublisher>>` around.
pub struct OptionalEventPublisher {
    inner: Option<Arc<dyn AssignmentEventPublisher>>,
}

impl OptionalEventPublisher {
    pub fn with_publisher(publisher: Arc<dyn AssignmentEventPublisher>) -> Self {
        Self {
            inner: Some(publisher),
        }
    }

    pub fn none() -> Self {
        Self { inner: None }
    }

    /// Publish if a publisher is configured; subscriber errors are logged,
    /// never propagated into the mutation path.
    pub fn publish(&self, event: AssignmentEvent) {
        if let Some(publisher) = &self.inner {
            if let Err(e) = publisher.publish(event) {
                tracing::warn!("event publish failed: {}", e);
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }
}

impl Default for OptionalEventPublisher {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingPublisher {
        events: Mutex<Vec<AssignmentEvent>>,
    }

    impl AssignmentEventPublisher for RecordingPublisher {
        fn publish(&self, event: AssignmentEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
            self.events.lock().unwrap().push(event);
            Ok(())
        }
    }

    #[test]
    fn test_noop_publisher() {
        let publisher = NoOpEventPublisher;
        let event = AssignmentEvent::new("P001", AssignmentEventType::AssignmentAdded, None);
        assert!(publisher.publish(event).is_ok());
    }

    #[test]
    fn test_optional_publisher_none() {
        let publisher = OptionalEventPublisher::none();
        assert!(!publisher.is_configured());
        publisher.publish(AssignmentEvent::new(
            "P001",
            AssignmentEventType::LockToggled,
            None,
        ));
    }

    #[test]
    fn test_optional_publisher_delivers() {
        let recording = Arc::new(RecordingPublisher {
            events: Mutex::new(Vec::new()),
        });
        let publisher = OptionalEventPublisher::with_publisher(recording.clone());
        assert!(publisher.is_configured());

        publisher.publish(AssignmentEvent::new(
            "P001",
            AssignmentEventType::AssignmentsRegenerated,
            Some("AssignmentGenerator"),
        ));

        let events = recording.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].program_id, "P001");
        assert_eq!(
            events[0].event_type,
            AssignmentEventType::AssignmentsRegenerated
        );
    }
}
