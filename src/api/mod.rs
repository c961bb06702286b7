// ==========================================
// Panitia Engine - API layer
// ==========================================
// Caller-facing operations and the error taxonomy they answer with.
// ==========================================

pub mod assignment_api;
pub mod error;
pub mod workload_api;

pub use assignment_api::{
    AssignmentApi, AssignmentFilter, BulkFailure, BulkGenerationReport, GenerationOutcome,
};
pub use error::{ApiError, ApiResult};
pub use workload_api::WorkloadApi;
