//! Configuration
//!
//! ```rust,ignore
//! use symex_ir::config::MemoryConfig;
//!
//! // Defaults
//! let memory = SymbolicMemory::new();
//!
//! // Builder overrides
//! let memory = SymbolicMemory::with_config(MemoryConfig::default().seed_prefix("@"))?;
//!
//! // YAML
//! let config = MemoryConfig::from_yaml_str(&std::fs::read_to_string("memory.yaml")?)?;
//! ```

pub mod error;
pub mod memory_config;
pub mod validation;

// Re-exports
pub use error::{ConfigError, ConfigResult};
pub use memory_config::{MemoryConfig, MAX_ADDRESSES_LIMIT};
pub use validation::{Validatable, ValidatableCollection};
