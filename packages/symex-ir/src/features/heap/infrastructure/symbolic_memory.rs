//! Array-Theory Symbolic Memory
//!
//! ## Memory Model
//!
//! ```text
//! Memory ::= AddressChain × PrimitivePools × ArrayPools × ObjectPools
//!
//! AddressChain  = store(...store($addr, a₁, s₁)..., aₙ, sₙ)     address → slot
//! PrimitivePool = store(...store($int, s, v)...)                 slot → scalar
//! ArrayPool     = store(...store($array[int], s, inner)...)      slot → inner array
//! ObjectPool    = field i ↦ store(...store($Foo.i$int, s, v)...) slot → field value
//! ```
//!
//! Every access dereferences a [`Ref`] through the *current* address chain:
//! `slot = select(addressChain, address)`. For an allocated ref this reduces to
//! its concrete slot; for a ref from [`make_ref`](MemoryPort::make_ref) it is an
//! unknown the solver may equate with any other slot of the same pool.
//!
//! All heads only move forward, so every earlier expression handed out stays
//! valid and the full history is visible to the solver.
//!
//! ## Forking
//!
//! Expressions are shared through `Arc`, so [`SymbolicMemory::fork`] is a
//! shallow copy of pool heads and counters. Each explored path owns its fork.

use crate::config::{ConfigResult, MemoryConfig};
use crate::features::heap::domain::{
    ArrayPool, MemoryError, MemoryResult, ObjectPool, PrimitivePool,
};
use crate::features::heap::ports::MemoryPort;
use crate::features::symbolic::domain::{
    Address, ExprRef, FieldEstablishment, FieldRead, FieldType, FieldWrite, GenericType,
    ObjectSchema, ProvenanceError, Ref, SchemaName, SymbolicExpression, SymbolicVariable,
    ValueKind,
};
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

const SCALAR_KINDS: [ValueKind; 3] = [ValueKind::Int, ValueKind::Float, ValueKind::Bool];

/// Pool a location lives in, resolved from allocation arguments
#[derive(Debug, Clone, Copy)]
enum Target<'a> {
    Scalar(ValueKind),
    Array(&'a GenericType),
    Object(&'a str),
}

impl<'a> Target<'a> {
    fn resolve(
        kind: ValueKind,
        type_name: Option<&'a str>,
        generic: Option<&'a GenericType>,
    ) -> MemoryResult<Self> {
        match kind {
            _ if kind.is_scalar() => Ok(Self::Scalar(kind)),
            ValueKind::Array => {
                let element = generic.ok_or(MemoryError::MissingGeneric)?;
                if !element.is_well_formed() {
                    return Err(MemoryError::MalformedGeneric {
                        generic: element.render(),
                    });
                }
                check_element(element)?;
                Ok(Self::Array(element))
            }
            ValueKind::Object => match type_name {
                Some(name) if !name.is_empty() => Ok(Self::Object(name)),
                _ => Err(MemoryError::MissingTypeName),
            },
            _ => Err(MemoryError::UnsupportedKind { kind }),
        }
    }

    fn reference(&self, address: Address, deref: ExprRef) -> Ref {
        match *self {
            Self::Scalar(kind) => Ref::new(address, kind, None, None, deref),
            Self::Array(element) => {
                Ref::new(address, ValueKind::Array, Some(element.clone()), None, deref)
            }
            Self::Object(schema) => {
                Ref::new(address, ValueKind::Object, None, Some(schema.to_string()), deref)
            }
        }
    }
}

impl fmt::Display for Target<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => write!(f, "{}", kind),
            Self::Array(element) => write!(f, "array[{}]", element),
            Self::Object(schema) => f.write_str(schema),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SymbolicMemory {
    config: MemoryConfig,
    next_address: Address,
    /// Addresses handed out by `allocate` and `make_ref`
    allocations: usize,
    address_chain: ExprRef,
    primitives: FxHashMap<ValueKind, PrimitivePool>,
    /// Keyed by the element type's render
    arrays: FxHashMap<String, ArrayPool>,
    objects: FxHashMap<SchemaName, ObjectPool>,
}

impl Default for SymbolicMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolicMemory {
    pub fn new() -> Self {
        Self::build(MemoryConfig::default())
    }

    /// Memory with a validated custom configuration
    pub fn with_config(config: MemoryConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: MemoryConfig) -> Self {
        let primitives = SCALAR_KINDS
            .iter()
            .map(|&kind| {
                let seed = format!("{}{}", config.seed_prefix, kind);
                (kind, PrimitivePool::new(kind, seed, config.first_slot_id))
            })
            .collect();
        let address_chain = Arc::new(SymbolicExpression::Variable(SymbolicVariable::array(
            config.address_chain_name.clone(),
            GenericType::int(),
        )));

        Self {
            next_address: config.first_address,
            allocations: 0,
            address_chain,
            primitives,
            arrays: FxHashMap::default(),
            objects: FxHashMap::default(),
            config,
        }
    }

    /// Independent copy for another execution path
    pub fn fork(&self) -> Self {
        trace!(next_address = self.next_address, "memory forked");
        self.clone()
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Inspection
    // ═══════════════════════════════════════════════════════════════════════

    /// Address the next `allocate`/`make_ref` will hand out
    pub fn next_address(&self) -> Address {
        self.next_address
    }

    /// Current head of the address → slot chain
    pub fn address_chain(&self) -> &ExprRef {
        &self.address_chain
    }

    pub fn allocation_count(&self) -> usize {
        self.allocations
    }

    pub fn schema(&self, name: &str) -> Option<&ObjectSchema> {
        self.objects.get(name).map(ObjectPool::schema)
    }

    pub fn primitive_slots(&self, kind: ValueKind) -> Option<&ExprRef> {
        self.primitives.get(&kind).map(PrimitivePool::slots)
    }

    /// Outer slot array of the pool for arrays of `element`
    pub fn array_pool_slots(&self, element: &GenericType) -> Option<&ExprRef> {
        self.arrays.get(&element.render()).map(ArrayPool::slots)
    }

    pub fn field_slots(&self, schema: &str, field_index: usize) -> Option<&ExprRef> {
        self.objects
            .get(schema)
            .and_then(|pool| pool.field_slots(field_index))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Internals
    // ═══════════════════════════════════════════════════════════════════════

    fn check_capacity(&self) -> MemoryResult<()> {
        let limit = self.config.max_addresses;
        if self.allocations >= limit || self.next_address == Address::MAX {
            return Err(MemoryError::AddressSpaceExhausted { limit });
        }
        Ok(())
    }

    fn claim_address(&mut self) -> Address {
        let address = self.next_address;
        self.next_address += 1;
        self.allocations += 1;
        address
    }

    /// Slot-identity of `reference` under the current address chain
    fn slot_of(&self, reference: &Ref) -> MemoryResult<ExprRef> {
        Ok(SymbolicExpression::select(
            self.address_chain.clone(),
            reference.address_term(),
        )?)
    }

    /// Create the target's pool if needed and take a slot from it.
    ///
    /// A fresh pool always has a slot, so a failure leaves no new pool behind.
    fn take_slot(&mut self, target: &Target<'_>) -> MemoryResult<i64> {
        let config = &self.config;
        let slot = match *target {
            Target::Scalar(kind) => primitive_pool(&mut self.primitives, config, kind).take_slot(),
            Target::Array(element) => array_pool(&mut self.arrays, config, element).take_slot(),
            Target::Object(schema) => object_pool(&mut self.objects, config, schema).take_slot(),
        };
        slot.ok_or_else(|| MemoryError::SlotSpaceExhausted {
            pool: target.to_string(),
        })
    }

    fn ensure_pool(&mut self, target: &Target<'_>) {
        let config = &self.config;
        match *target {
            Target::Scalar(kind) => {
                primitive_pool(&mut self.primitives, config, kind);
            }
            Target::Array(element) => {
                array_pool(&mut self.arrays, config, element);
            }
            Target::Object(schema) => {
                object_pool(&mut self.objects, config, schema);
            }
        }
    }
}

fn primitive_pool<'p>(
    pools: &'p mut FxHashMap<ValueKind, PrimitivePool>,
    config: &MemoryConfig,
    kind: ValueKind,
) -> &'p mut PrimitivePool {
    pools.entry(kind).or_insert_with(|| {
        debug!(pool = %kind, "primitive pool created");
        PrimitivePool::new(kind, format!("{}{}", config.seed_prefix, kind), config.first_slot_id)
    })
}

fn array_pool<'p>(
    pools: &'p mut FxHashMap<String, ArrayPool>,
    config: &MemoryConfig,
    element: &GenericType,
) -> &'p mut ArrayPool {
    pools.entry(element.render()).or_insert_with(|| {
        let seed = format!(
            "{}{}",
            config.seed_prefix,
            GenericType::array_of(element.clone()).render()
        );
        debug!(pool = %seed, "array pool created");
        ArrayPool::new(element.clone(), seed, config.first_slot_id)
    })
}

fn object_pool<'p>(
    pools: &'p mut FxHashMap<SchemaName, ObjectPool>,
    config: &MemoryConfig,
    schema: &str,
) -> &'p mut ObjectPool {
    pools.entry(schema.to_string()).or_insert_with(|| {
        debug!(schema, "object pool created");
        ObjectPool::new(ObjectSchema::new(schema), config.first_slot_id)
    })
}

/// Array pools hold scalars or nested arrays of scalars
fn check_element(element: &GenericType) -> MemoryResult<()> {
    match element.innermost_kind() {
        ValueKind::Ref | ValueKind::Object => Err(MemoryError::UnsupportedElement {
            generic: element.render(),
        }),
        _ => Ok(()),
    }
}

fn scalar_target(reference: &Ref, operation: &'static str) -> MemoryResult<ValueKind> {
    match reference.target_kind() {
        kind if kind.is_scalar() => Ok(kind),
        found => Err(MemoryError::WrongTarget {
            operation,
            expected: "a scalar",
            found,
        }),
    }
}

fn object_target<'r>(reference: &'r Ref, operation: &'static str) -> MemoryResult<&'r str> {
    if reference.target_kind() != ValueKind::Object {
        return Err(MemoryError::WrongTarget {
            operation,
            expected: "an object",
            found: reference.target_kind(),
        });
    }
    reference.object_schema().ok_or(MemoryError::MissingTypeName)
}

fn array_target<'r>(reference: &'r Ref, operation: &'static str) -> MemoryResult<&'r GenericType> {
    if reference.target_kind() != ValueKind::Array {
        return Err(MemoryError::WrongTarget {
            operation,
            expected: "an array",
            found: reference.target_kind(),
        });
    }
    reference.generic().ok_or(MemoryError::MissingGeneric)
}

/// Field type a value establishes and the term stored in the slot array.
///
/// References are stored by address.
fn field_value(value: &ExprRef) -> MemoryResult<(FieldType, ExprRef)> {
    if let Some(field) = FieldType::scalar(value.kind()) {
        return Ok((field, value.clone()));
    }

    let unsupported = || MemoryError::UnsupportedFieldValue {
        kind: value.kind(),
        expr: value.to_string(),
    };

    match value.as_ref() {
        _ if value.kind() == ValueKind::Array => {
            let element = value
                .element_type()
                .cloned()
                .ok_or_else(|| ProvenanceError::UntypedArrayChain {
                    expr: value.to_string(),
                })?;
            check_element(&element)?;
            Ok((FieldType::Array(element), value.clone()))
        }
        SymbolicExpression::Ref(r) if r.target_kind() == ValueKind::Object => r
            .object_schema()
            .map(|schema| (FieldType::Ref(schema.to_string()), r.address_term()))
            .ok_or_else(unsupported),
        SymbolicExpression::FieldRead(read) => match read.field_type() {
            FieldType::Ref(schema) => {
                Ok((FieldType::Ref(schema.clone()), read.raw_value().clone()))
            }
            _ => Err(unsupported()),
        },
        _ => Err(unsupported()),
    }
}

impl MemoryPort for SymbolicMemory {
    fn allocate(
        &mut self,
        kind: ValueKind,
        type_name: Option<&str>,
        generic: Option<&GenericType>,
    ) -> MemoryResult<Ref> {
        let target = Target::resolve(kind, type_name, generic)?;
        self.check_capacity()?;

        let slot = self.take_slot(&target)?;
        let address = self.claim_address();
        self.address_chain = SymbolicExpression::store(
            self.address_chain.clone(),
            SymbolicExpression::int(address),
            SymbolicExpression::int(slot),
        )?;
        let deref = SymbolicExpression::select(
            self.address_chain.clone(),
            SymbolicExpression::int(address),
        )?;

        debug!(address, slot, pool = %target, "allocated");
        Ok(target.reference(address, deref))
    }

    fn make_ref(
        &mut self,
        kind: ValueKind,
        type_name: Option<&str>,
        generic: Option<&GenericType>,
    ) -> MemoryResult<Ref> {
        let target = Target::resolve(kind, type_name, generic)?;
        self.check_capacity()?;

        self.ensure_pool(&target);
        let address = self.claim_address();
        let deref = SymbolicExpression::select(
            self.address_chain.clone(),
            SymbolicExpression::int(address),
        )?;

        debug!(address, pool = %target, "alias created");
        Ok(target.reference(address, deref))
    }

    fn assign_primitive(&mut self, reference: &Ref, value: ExprRef) -> MemoryResult<ExprRef> {
        let kind = scalar_target(reference, "assign_primitive")?;
        if value.kind() != kind {
            return Err(MemoryError::KindMismatch {
                expected: kind,
                found: value.kind(),
                expr: value.to_string(),
            });
        }

        let slot = self.slot_of(reference)?;
        let pool = primitive_pool(&mut self.primitives, &self.config, kind);
        let slots = SymbolicExpression::store(pool.slots().clone(), slot, value)?;
        pool.advance(slots.clone());

        trace!(address = reference.address(), pool = %kind, "primitive store");
        Ok(slots)
    }

    fn read_primitive(&self, reference: &Ref) -> MemoryResult<ExprRef> {
        let kind = scalar_target(reference, "read_primitive")?;
        let pool = self
            .primitives
            .get(&kind)
            .ok_or(MemoryError::UnsupportedKind { kind })?;

        Ok(SymbolicExpression::select(
            pool.slots().clone(),
            self.slot_of(reference)?,
        )?)
    }

    fn assign_field(
        &mut self,
        reference: &Ref,
        field_index: usize,
        value: ExprRef,
    ) -> MemoryResult<ExprRef> {
        let schema = object_target(reference, "assign_field")?;
        let (field_type, stored) = field_value(&value)?;
        let slot = self.slot_of(reference)?;

        let prefix = &self.config.seed_prefix;
        let pool = self
            .objects
            .get_mut(schema)
            .ok_or_else(|| MemoryError::UnknownObjectPool {
                schema: schema.to_string(),
            })?;

        if pool.schema_mut().ensure_field(field_index, field_type.clone())?
            == FieldEstablishment::New
        {
            let seed = format!("{}{}.{}${}", prefix, schema, field_index, field_type);
            debug!(schema, field = field_index, field_type = %field_type, "field established");
            pool.open_field(field_index, &field_type, seed);
        }

        let current = pool
            .field_slots(field_index)
            .cloned()
            .ok_or_else(|| MemoryError::FieldNotWritten {
                schema: schema.to_string(),
                index: field_index,
            })?;
        let slots = SymbolicExpression::store(current, slot, stored)?;
        pool.advance_field(field_index, slots.clone());

        trace!(address = reference.address(), schema, field = field_index, "field store");
        let write = FieldWrite::new(reference.to_expr(), field_index, value, slots);
        Ok(SymbolicExpression::from(write).shared())
    }

    fn get_field_value(&self, reference: &Ref, field_index: usize) -> MemoryResult<ExprRef> {
        let schema = object_target(reference, "get_field_value")?;
        let pool = self
            .objects
            .get(schema)
            .ok_or_else(|| MemoryError::UnknownObjectPool {
                schema: schema.to_string(),
            })?;

        let not_written = || MemoryError::FieldNotWritten {
            schema: schema.to_string(),
            index: field_index,
        };
        let field_type = pool.schema().field(field_index).ok_or_else(not_written)?;
        let slots = pool.field_slots(field_index).ok_or_else(not_written)?;

        let raw = SymbolicExpression::select(slots.clone(), self.slot_of(reference)?)?;
        let read = FieldRead::new(reference.to_expr(), field_index, field_type.clone(), raw);
        Ok(SymbolicExpression::from(read).shared())
    }

    fn assign_to_array(
        &mut self,
        reference: &Ref,
        index: ExprRef,
        value: ExprRef,
    ) -> MemoryResult<ExprRef> {
        let element = array_target(reference, "assign_to_array")?;
        let key = element.render();
        let slot = self.slot_of(reference)?;
        let pool = self
            .arrays
            .get_mut(&key)
            .ok_or_else(|| MemoryError::UnknownArrayPool { key: key.clone() })?;

        let inner = SymbolicExpression::select(pool.slots().clone(), slot.clone())?;
        let updated = SymbolicExpression::store(inner, index, value)?;
        let outer = SymbolicExpression::store(pool.slots().clone(), slot, updated.clone())?;
        pool.advance(outer);

        trace!(address = reference.address(), pool = %key, "array store");
        Ok(updated)
    }

    fn get_from_array(&self, reference: &Ref, index: ExprRef) -> MemoryResult<ExprRef> {
        let element = array_target(reference, "get_from_array")?;
        let key = element.render();
        let pool = self
            .arrays
            .get(&key)
            .ok_or(MemoryError::UnknownArrayPool { key })?;

        let inner = SymbolicExpression::select(pool.slots().clone(), self.slot_of(reference)?)?;
        Ok(SymbolicExpression::select(inner, index)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::symbolic::infrastructure::SelectStoreSimplifier;
    use pretty_assertions::assert_eq;

    fn simplified(expr: &ExprRef) -> ExprRef {
        SelectStoreSimplifier::simplify(expr)
    }

    #[test]
    fn test_allocate_extends_address_chain() {
        let mut mem = SymbolicMemory::new();
        let a = mem.allocate(ValueKind::Int, None, None).unwrap();
        let b = mem.allocate(ValueKind::Int, None, None).unwrap();

        assert_eq!(a.address(), 1);
        assert_eq!(b.address(), 2);
        assert_eq!(mem.address_chain().to_string(), "(($addr[1] = 1)[2] = 2)");
        assert_eq!(simplified(b.deref()), SymbolicExpression::int(2));
    }

    #[test]
    fn test_pools_count_slots_independently() {
        let mut mem = SymbolicMemory::new();
        mem.allocate(ValueKind::Int, None, None).unwrap();
        let f = mem.allocate(ValueKind::Float, None, None).unwrap();

        assert_eq!(f.address(), 2);
        assert_eq!(simplified(f.deref()), SymbolicExpression::int(1));
    }

    #[test]
    fn test_make_ref_leaves_chain_alone() {
        let mut mem = SymbolicMemory::new();
        let r = mem.make_ref(ValueKind::Object, Some("Foo"), None).unwrap();

        assert_eq!(mem.address_chain().to_string(), "$addr");
        assert_eq!(r.deref().to_string(), "$addr[1]");
        assert_eq!(mem.next_address(), 2);
        assert!(mem.schema("Foo").is_some_and(ObjectSchema::is_empty));
    }

    #[test]
    fn test_primitive_round_trip() {
        let mut mem = SymbolicMemory::new();
        let r = mem.allocate(ValueKind::Bool, None, None).unwrap();
        let slots = mem.assign_primitive(&r, SymbolicExpression::boolean(true)).unwrap();

        assert_eq!(slots.to_string(), "($bool[($addr[1] = 1)[1]] = true)");
        assert_eq!(mem.primitive_slots(ValueKind::Bool), Some(&slots));

        let read = mem.read_primitive(&r).unwrap();
        assert_eq!(read.kind(), ValueKind::Bool);
        assert_eq!(simplified(&read), SymbolicExpression::boolean(true));
    }

    #[test]
    fn test_assign_primitive_rejects_kind_mismatch() {
        let mut mem = SymbolicMemory::new();
        let r = mem.allocate(ValueKind::Int, None, None).unwrap();
        let err = mem
            .assign_primitive(&r, SymbolicExpression::float(1.0))
            .unwrap_err();
        assert!(matches!(err, MemoryError::KindMismatch { .. }));
    }

    #[test]
    fn test_missing_arguments() {
        let mut mem = SymbolicMemory::new();
        assert_eq!(
            mem.allocate(ValueKind::Object, None, None).unwrap_err(),
            MemoryError::MissingTypeName
        );
        assert_eq!(
            mem.allocate(ValueKind::Array, None, None).unwrap_err(),
            MemoryError::MissingGeneric
        );
        assert!(matches!(
            mem.allocate(ValueKind::Array, None, Some(&GenericType::scalar(ValueKind::Array))),
            Err(MemoryError::MalformedGeneric { .. })
        ));
        assert_eq!(mem.next_address(), 1);
    }

    #[test]
    fn test_field_seed_names() {
        let mut mem = SymbolicMemory::new();
        let foo = mem.allocate(ValueKind::Object, Some("Foo"), None).unwrap();
        let bar = mem.allocate(ValueKind::Object, Some("Bar"), None).unwrap();

        mem.assign_field(&foo, 1, SymbolicExpression::int(3)).unwrap();
        mem.assign_field(&foo, 3, bar.to_expr()).unwrap();

        let schema = mem.schema("Foo").unwrap();
        assert_eq!(schema.len(), 4);
        assert_eq!(schema.field(0), None);
        assert_eq!(schema.field(3), Some(&FieldType::Ref("Bar".into())));
        assert_eq!(
            mem.field_slots("Foo", 3).unwrap().to_string(),
            "($Foo.3$ref<Bar>[(($addr[1] = 1)[2] = 1)[1]] = 2)"
        );
    }

    #[test]
    fn test_ref_field_reads_back_address() {
        let mut mem = SymbolicMemory::new();
        let node = mem.allocate(ValueKind::Object, Some("Node"), None).unwrap();
        let next = mem.allocate(ValueKind::Object, Some("Node"), None).unwrap();

        let write = mem.assign_field(&node, 0, next.to_expr()).unwrap();
        assert_eq!(write.kind(), ValueKind::Ref);

        let read = mem.get_field_value(&node, 0).unwrap();
        assert_eq!(read.kind(), ValueKind::Ref);
        assert_eq!(read.object_schema(), Some("Node"));

        let SymbolicExpression::FieldRead(read) = read.as_ref() else {
            panic!("expected a field read");
        };
        assert_eq!(simplified(read.raw_value()), SymbolicExpression::int(2));
    }

    #[test]
    fn test_array_store_rebuilds_outer_pool() {
        let mut mem = SymbolicMemory::new();
        let a = mem.allocate(ValueKind::Array, None, Some(&GenericType::int())).unwrap();
        let inner = mem
            .assign_to_array(&a, SymbolicExpression::int(0), SymbolicExpression::int(7))
            .unwrap();

        let outer = mem.array_pool_slots(&GenericType::int()).unwrap();
        let SymbolicExpression::ArrayStore(step) = outer.as_ref() else {
            panic!("outer pool should end in a store");
        };
        assert!(Arc::ptr_eq(step.value(), &inner));
        assert_eq!(step.array().to_string(), "$array[int]");
    }

    #[test]
    fn test_wrong_target() {
        let mut mem = SymbolicMemory::new();
        let i = mem.allocate(ValueKind::Int, None, None).unwrap();
        assert!(matches!(
            mem.assign_field(&i, 0, SymbolicExpression::int(1)),
            Err(MemoryError::WrongTarget { .. })
        ));
        assert!(matches!(
            mem.get_from_array(&i, SymbolicExpression::int(0)),
            Err(MemoryError::WrongTarget { .. })
        ));
    }

    #[test]
    fn test_address_limit() {
        let config = MemoryConfig::default().max_addresses(2);
        let mut mem = SymbolicMemory::with_config(config).unwrap();
        mem.allocate(ValueKind::Int, None, None).unwrap();
        mem.make_ref(ValueKind::Int, None, None).unwrap();

        assert_eq!(
            mem.allocate(ValueKind::Int, None, None).unwrap_err(),
            MemoryError::AddressSpaceExhausted { limit: 2 }
        );
        assert_eq!(mem.allocation_count(), 2);
    }

    #[test]
    fn test_slot_exhaustion_is_an_error() {
        let config = MemoryConfig::default().first_slot_id(i64::MAX);
        assert!(SymbolicMemory::with_config(config.clone()).is_err());

        let mut mem = SymbolicMemory::build(config);
        let last = mem.allocate(ValueKind::Int, None, None).unwrap();
        assert_eq!(simplified(last.deref()), SymbolicExpression::int(i64::MAX));

        assert_eq!(
            mem.allocate(ValueKind::Int, None, None).unwrap_err(),
            MemoryError::SlotSpaceExhausted { pool: "int".into() }
        );
        assert_eq!(mem.next_address(), 2);
        assert_eq!(mem.allocation_count(), 1);

        // Other pools count on their own
        mem.allocate(ValueKind::Float, None, None).unwrap();
    }

    #[test]
    fn test_reference_element_arrays_are_rejected() {
        let mut mem = SymbolicMemory::new();
        let refs = GenericType::reference("Foo");

        assert_eq!(
            mem.allocate(ValueKind::Array, None, Some(&refs)).unwrap_err(),
            MemoryError::UnsupportedElement {
                generic: "ref<Foo>".into()
            }
        );
        let nested = GenericType::array_of(GenericType::object("Foo"));
        assert!(matches!(
            mem.make_ref(ValueKind::Array, None, Some(&nested)),
            Err(MemoryError::UnsupportedElement { .. })
        ));
        assert_eq!(mem.next_address(), 1);
        assert!(mem.array_pool_slots(&refs).is_none());

        let holder = mem.allocate(ValueKind::Object, Some("Holder"), None).unwrap();
        let ref_array = SymbolicExpression::array_variable("r", refs);
        assert!(matches!(
            mem.assign_field(&holder, 0, ref_array),
            Err(MemoryError::UnsupportedElement { .. })
        ));
        assert!(mem.schema("Holder").is_some_and(ObjectSchema::is_empty));
    }

    #[test]
    fn test_custom_seed_prefix() {
        let config = MemoryConfig::default().seed_prefix("@").address_chain_name("refs");
        let mut mem = SymbolicMemory::with_config(config).unwrap();
        let r = mem.allocate(ValueKind::Int, None, None).unwrap();
        let slots = mem.assign_primitive(&r, SymbolicExpression::int(4)).unwrap();

        assert_eq!(slots.to_string(), "(@int[(refs[1] = 1)[1]] = 4)");
    }

    #[test]
    fn test_fork_is_independent() {
        let mut mem = SymbolicMemory::new();
        let r = mem.allocate(ValueKind::Int, None, None).unwrap();
        let mut fork = mem.fork();

        fork.assign_primitive(&r, SymbolicExpression::int(9)).unwrap();
        fork.allocate(ValueKind::Int, None, None).unwrap();

        assert_eq!(mem.primitive_slots(ValueKind::Int).unwrap().to_string(), "$int");
        assert_eq!(mem.next_address(), 2);
        assert_eq!(fork.next_address(), 3);
    }
}
