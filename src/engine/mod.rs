// ==========================================
// Panitia Engine - engine layer
// ==========================================
// Business rules: availability, conflicts, committee generation, workload.
// Engines call repositories; they do not hand-assemble SQL, and every
// infeasibility carries its specific reason.
// ==========================================

pub mod availability;
pub mod conflict;
pub mod events;
pub mod generator;
pub mod generator_core;
pub mod workload;

pub use availability::AvailabilityIndex;
pub use conflict::{ConflictDetector, MemberConflictReport};
pub use events::{
    AssignmentEvent, AssignmentEventPublisher, AssignmentEventType, NoOpEventPublisher,
    OptionalEventPublisher,
};
pub use generator::{AssignmentGenerator, GenerationResult, GeneratorError};
pub use generator_core::{GeneratorCore, RolePick};
pub use workload::{MemberWorkload, WorkloadError, WorkloadTracker};
