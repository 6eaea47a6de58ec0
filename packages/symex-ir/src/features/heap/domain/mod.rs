//! Heap Domain - pools and memory errors

pub mod error;
pub mod pools;

pub use crate::features::symbolic::domain::{Address, Ref};
pub use error::{MemoryError, MemoryResult};
pub use pools::{ArrayPool, ObjectPool, PrimitivePool, SlotCounter};
