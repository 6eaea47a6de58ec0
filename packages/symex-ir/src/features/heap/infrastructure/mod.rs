//! Heap Infrastructure - port implementations

pub mod symbolic_memory;

pub use symbolic_memory::SymbolicMemory;
