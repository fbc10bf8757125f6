//! Error types for the engine binary.
//!
//! [`EngineError`] wraps the failure modes of startup (world generation,
//! worker spawning) so the helpers in this crate can use `?`; `main`
//! itself reports through `anyhow`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Starting world construction failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: colony_world::WorldError,
    },

    /// A worker could not be added to the roster.
    #[error("agent error: {source}")]
    Agent {
        /// The underlying roster error.
        #[from]
        source: colony_agents::AgentError,
    },

    /// Worker spawning failed.
    #[error("spawner error: {message}")]
    Spawner {
        /// Description of the spawner failure.
        message: String,
    },
}
