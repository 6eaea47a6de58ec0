//! Heap Ports - the interface a driver walks one execution path through
//!
//! ```rust,ignore
//! fn init_counter<M: MemoryPort>(memory: &mut M) -> MemoryResult<Ref> {
//!     let r = memory.allocate(ValueKind::Int, None, None)?;
//!     memory.assign_primitive(&r, SymbolicExpression::int(0))?;
//!     Ok(r)
//! }
//! ```

use super::domain::{MemoryResult, Ref};
use crate::features::symbolic::domain::{ExprRef, GenericType, ValueKind};

/// Array-theory heap
///
/// Every write returns the new head of the store chain it extended. Every
/// `Err` is fatal for the path.
pub trait MemoryPort {
    /// Fresh location: next slot-identity, next address, one address-chain store
    fn allocate(
        &mut self,
        kind: ValueKind,
        type_name: Option<&str>,
        generic: Option<&GenericType>,
    ) -> MemoryResult<Ref>;

    /// Alias with an unconstrained slot-identity; the address chain is unchanged
    fn make_ref(
        &mut self,
        kind: ValueKind,
        type_name: Option<&str>,
        generic: Option<&GenericType>,
    ) -> MemoryResult<Ref>;

    /// Store a scalar; returns the pool's new slot array
    fn assign_primitive(&mut self, reference: &Ref, value: ExprRef) -> MemoryResult<ExprRef>;

    fn read_primitive(&self, reference: &Ref) -> MemoryResult<ExprRef>;

    /// Store into an object field; returns a `FieldWrite` node
    fn assign_field(
        &mut self,
        reference: &Ref,
        field_index: usize,
        value: ExprRef,
    ) -> MemoryResult<ExprRef>;

    /// Returns a `FieldRead` node
    fn get_field_value(&self, reference: &Ref, field_index: usize) -> MemoryResult<ExprRef>;

    /// Store one element; returns the referenced array after the store
    fn assign_to_array(
        &mut self,
        reference: &Ref,
        index: ExprRef,
        value: ExprRef,
    ) -> MemoryResult<ExprRef>;

    /// Returns an `ArraySelect` node
    fn get_from_array(&self, reference: &Ref, index: ExprRef) -> MemoryResult<ExprRef>;
}
