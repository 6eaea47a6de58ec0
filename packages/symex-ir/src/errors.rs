//! Error types for symex-ir

use crate::config::ConfigError;
use crate::features::heap::domain::MemoryError;
use crate::features::symbolic::infrastructure::EvalError;
use thiserror::Error;

/// Main error type for symex-ir operations
#[derive(Debug, Error)]
pub enum SymexError {
    /// Fatal heap-model failure; the current path must be dropped
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Concrete evaluation under a model failed
    #[error("Evaluation error: {0}")]
    Eval(#[from] EvalError),
}

impl SymexError {
    /// Whether the error came from the heap model
    pub fn is_memory(&self) -> bool {
        matches!(self, SymexError::Memory(_))
    }
}

/// Result type alias for symex-ir operations
pub type Result<T> = std::result::Result<T, SymexError>;
