pub mod context;
pub mod decision;
pub mod error;
pub mod orchestrator;
pub mod session;

pub use decision::parse_decision;
pub use error::EngineError;
pub use orchestrator::{FinalOutcome, Orchestrator, RoundOutcome, StatusReport, DEFAULT_ROLE};
pub use session::Session;
