//! Memory pools
//!
//! A pool owns one slot-identity counter and the current head of one or more
//! store chains keyed by slot-identity:
//!
//! ```text
//! PrimitivePool  slot → scalar                  (one per scalar kind)
//! ArrayPool      slot → inner array             (one per element type)
//! ObjectPool     field i: slot → field value    (one per schema, lazily per field)
//! ```
//!
//! Heads only move forward; each new head's array operand is the previous one.

use crate::features::symbolic::domain::{
    ExprRef, FieldType, GenericType, ObjectSchema, SymbolicExpression, SymbolicVariable, ValueKind,
};
use std::sync::Arc;

/// Monotonic slot-identity source; `None` once `i64::MAX` was handed out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotCounter {
    next: Option<i64>,
}

impl SlotCounter {
    pub fn starting_at(first: i64) -> Self {
        Self { next: Some(first) }
    }

    /// Hand out the next slot-identity
    pub fn take(&mut self) -> Option<i64> {
        let slot = self.next?;
        self.next = slot.checked_add(1);
        Some(slot)
    }
}

fn seed(name: String, element: GenericType) -> ExprRef {
    Arc::new(SymbolicExpression::Variable(SymbolicVariable::array(name, element)))
}

#[derive(Debug, Clone)]
pub struct PrimitivePool {
    slots_taken: SlotCounter,
    slots: ExprRef,
}

impl PrimitivePool {
    pub fn new(kind: ValueKind, seed_name: String, first_slot: i64) -> Self {
        Self {
            slots_taken: SlotCounter::starting_at(first_slot),
            slots: seed(seed_name, GenericType::scalar(kind)),
        }
    }

    pub fn take_slot(&mut self) -> Option<i64> {
        self.slots_taken.take()
    }

    pub fn slots(&self) -> &ExprRef {
        &self.slots
    }

    pub fn advance(&mut self, slots: ExprRef) {
        self.slots = slots;
    }
}

#[derive(Debug, Clone)]
pub struct ArrayPool {
    slots_taken: SlotCounter,
    slots: ExprRef,
}

impl ArrayPool {
    /// The outer seed holds arrays of `element`
    pub fn new(element: GenericType, seed_name: String, first_slot: i64) -> Self {
        Self {
            slots: seed(seed_name, GenericType::array_of(element)),
            slots_taken: SlotCounter::starting_at(first_slot),
        }
    }

    pub fn take_slot(&mut self) -> Option<i64> {
        self.slots_taken.take()
    }

    /// Outer array: slot → inner array
    pub fn slots(&self) -> &ExprRef {
        &self.slots
    }

    pub fn advance(&mut self, slots: ExprRef) {
        self.slots = slots;
    }
}

#[derive(Debug, Clone)]
pub struct ObjectPool {
    schema: ObjectSchema,
    slots_taken: SlotCounter,
    field_slots: Vec<Option<ExprRef>>,
}

impl ObjectPool {
    pub fn new(schema: ObjectSchema, first_slot: i64) -> Self {
        Self {
            schema,
            slots_taken: SlotCounter::starting_at(first_slot),
            field_slots: Vec::new(),
        }
    }

    pub fn schema(&self) -> &ObjectSchema {
        &self.schema
    }

    pub fn schema_mut(&mut self) -> &mut ObjectSchema {
        &mut self.schema
    }

    pub fn take_slot(&mut self) -> Option<i64> {
        self.slots_taken.take()
    }

    /// Current slot array of field `index`, if the field was ever written
    pub fn field_slots(&self, index: usize) -> Option<&ExprRef> {
        self.field_slots.get(index).and_then(Option::as_ref)
    }

    /// Install a fresh seed for a newly established field
    pub fn open_field(&mut self, index: usize, field: &FieldType, seed_name: String) {
        if self.field_slots.len() <= index {
            self.field_slots.resize(index + 1, None);
        }
        self.field_slots[index] = Some(seed(seed_name, field.slot_element()));
    }

    pub fn advance_field(&mut self, index: usize, slots: ExprRef) {
        if let Some(entry) = self.field_slots.get_mut(index) {
            *entry = Some(slots);
        }
    }
}
