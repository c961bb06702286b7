// ==========================================
// Panitia Engine - core library
// ==========================================
// Committee assignment engine for organizational programs:
// constraint-aware generation, time-conflict detection, lock-aware
// regeneration, workload accounting.
// Stack: Rust + SQLite
// ==========================================

// ==========================================
// Module declarations
// ==========================================

// domain layer - entities and types
pub mod domain;

// repository layer - data access
pub mod repository;

// engine layer - business rules
pub mod engine;

// configuration layer
pub mod config;

// database infrastructure (connection init / unified PRAGMAs / schema)
pub mod db;

// logging
pub mod logging;

// API layer - caller-facing operations
pub mod api;

// application layer - wiring
pub mod app;

// ==========================================
// Core type re-exports
// ==========================================

// domain types
pub use domain::{
    Assignment, Commission, GenerationBatch, Member, Program, ProgramStatus, Revision,
    WorkloadLevel,
};

// engines
pub use engine::{
    AssignmentGenerator, AvailabilityIndex, ConflictDetector, GenerationResult, GeneratorCore,
    GeneratorError, MemberConflictReport, MemberWorkload, WorkloadTracker,
};

// config
pub use config::{ConfigManager, GatekeeperRule, GeneratorConfigReader};

// API
pub use api::{ApiError, AssignmentApi, BulkGenerationReport, GenerationOutcome, WorkloadApi};

// ==========================================
// Constants
// ==========================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "Panitia Engine";
