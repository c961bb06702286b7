// ==========================================
// Panitia Engine - repository layer
// ==========================================
// SQLite data access, one repository per aggregate, shared connection.
// All multi-row mutation happens in explicit transactions.
// ==========================================

pub mod assignment_repo;
pub mod batch_repo;
pub mod commission_repo;
pub mod error;
pub mod member_repo;
pub mod program_repo;
pub mod revision_repo;

pub use assignment_repo::{AssignmentRepository, MemberCommitment};
pub use batch_repo::BatchRepository;
pub use commission_repo::CommissionRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use member_repo::MemberRepository;
pub use program_repo::ProgramRepository;
pub use revision_repo::RevisionRepository;
