//! 幂等导入流程

pub mod facade;
pub mod identifier;
pub mod orchestrator;
pub mod result;
pub mod validator;

pub use identifier::derive_identifier;
pub use orchestrator::IngestionService;
pub use result::{BatchSummary, EntitiesCreated, IngestAction, IngestionResult};
