//! Feature modules - Each feature follows Hexagonal Architecture
//!
//! Each feature contains:
//! - domain/     - Pure data model (no external dependencies)
//! - ports/      - Interface definitions (traits)
//! - infrastructure/ - Implementations

pub mod heap;
pub mod symbolic;
