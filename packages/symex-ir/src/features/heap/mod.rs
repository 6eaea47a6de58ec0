//! Symbolic Heap (Hexagonal Architecture)
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Domain          pools, MemoryError            │
//! │      ▲                                        │
//! │ Ports           MemoryPort                    │
//! │      ▲                                        │
//! │ Infrastructure  SymbolicMemory                │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! A driver holds one [`SymbolicMemory`] per explored path and issues
//! allocate / read / write calls against it as it walks statements.

/// Domain Layer - pools and errors
pub mod domain;

/// Ports Layer - interface definitions
pub mod ports;

/// Infrastructure Layer - port implementations
pub mod infrastructure;

pub use domain::{MemoryError, MemoryResult};
pub use infrastructure::SymbolicMemory;
pub use ports::MemoryPort;
