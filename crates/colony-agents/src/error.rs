//! Error types for the `colony-agents` crate.
//!
//! All operations that can fail return typed errors rather than panicking.

use colony_types::WorkerId;

/// Errors that can occur during worker roster operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    /// Worker with the given ID was not found in the roster.
    #[error("worker not found: {0}")]
    WorkerNotFound(WorkerId),

    /// Worker name already exists in the roster.
    #[error("duplicate worker name: {0}")]
    DuplicateName(String),

    /// An arithmetic overflow occurred.
    #[error("arithmetic overflow: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },
}
