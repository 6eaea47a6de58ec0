//! Heap scenarios: arrays, object fields, aliasing and addressing

mod common;

use common::*;
use pretty_assertions::assert_eq;
use symex_ir::{
    BinaryOperator, ConcreteArray, ConcreteValue, FieldType, GenericType, LogicalOperator,
    MemoryError, MemoryPort, Model, SymbolicExpression, SymbolicMemory, ValueKind,
    VariableCollector,
};
use std::time::{Duration, Instant};

// ═══════════════════════════════════════════════════════════════════════════
// Arrays
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_array_write_then_read_same_index() {
    let mut memory = SymbolicMemory::new();
    let a = int_array(&mut memory);

    memory.assign_to_array(&a, int(5), int(10)).unwrap();
    let read = memory.get_from_array(&a, int(5)).unwrap();

    assert_eq!(read.kind(), ValueKind::Int);
    assert_reduces_to(&read, 10);
    assert_eq!(eval(&Model::new(), &read), ConcreteValue::Int(10));
}

#[test]
fn test_array_unwritten_index_is_unconstrained() {
    let mut memory = SymbolicMemory::new();
    let a = int_array(&mut memory);
    memory.assign_to_array(&a, int(5), int(10)).unwrap();

    let read = memory.get_from_array(&a, int(10)).unwrap();
    assert_unresolved(&read);
    assert_eq!(
        symex_ir::SelectStoreSimplifier::simplify(&read).to_string(),
        "$array[int][1][10]"
    );

    // Any value is a model of the unwritten element
    for witness in [-3, 0, 42] {
        let pool = ConcreteArray::constant(ConcreteValue::Array(ConcreteArray::constant(
            ConcreteValue::Int(witness),
        )));
        let model = Model::new().with("$array[int]", ConcreteValue::Array(pool));
        assert_eq!(eval(&model, &read), ConcreteValue::Int(witness));
    }
}

#[test]
fn test_arrays_of_same_type_share_a_pool() {
    let mut memory = SymbolicMemory::new();
    let a = int_array(&mut memory);
    let b = int_array(&mut memory);

    memory.assign_to_array(&a, int(0), int(3)).unwrap();
    let read_b = memory.get_from_array(&b, int(0)).unwrap();

    assert_unresolved(&read_b);
    assert_eq!(
        symex_ir::SelectStoreSimplifier::simplify(&read_b).to_string(),
        "$array[int][2][0]"
    );

    let seeds = VariableCollector::collect(&read_b);
    let names: Vec<&str> = seeds.iter().map(|v| v.name()).collect();
    assert_eq!(names, vec!["$array[int]", "$addr"]);
}

#[test]
fn test_array_alias_observes_writes_when_slots_equal() {
    let mut memory = SymbolicMemory::new();
    let a = int_array(&mut memory);
    memory.allocate(ValueKind::Int, None, None).unwrap();
    let alias = memory
        .make_ref(ValueKind::Array, None, Some(&GenericType::int()))
        .unwrap();

    memory.assign_to_array(&a, int(0), int(3)).unwrap();
    let read = memory.get_from_array(&alias, int(0)).unwrap();
    assert_unresolved(&read);

    let aliased = Model::new().with("$addr", all_addresses_to(1));
    assert_eq!(eval(&aliased, &read), ConcreteValue::Int(3));

    let apart = Model::new().with("$addr", all_addresses_to(7));
    assert_eq!(eval(&apart, &read), ConcreteValue::Int(0));
}

#[test]
fn test_nested_array_pool_key() {
    let mut memory = SymbolicMemory::new();
    let matrix_row = GenericType::array_of(GenericType::boolean());
    let m = memory
        .allocate(ValueKind::Array, None, Some(&matrix_row))
        .unwrap();

    let row = memory.get_from_array(&m, int(2)).unwrap();
    assert_eq!(row.kind(), ValueKind::Array);
    assert_eq!(row.element_type(), Some(&GenericType::boolean()));
    assert!(memory
        .array_pool_slots(&matrix_row)
        .is_some_and(|slots| slots.to_string() == "$array[array[bool]]"));
}

#[test]
fn test_array_store_checks_value_and_index_kinds() {
    let mut memory = SymbolicMemory::new();
    let a = int_array(&mut memory);

    assert!(matches!(
        memory.assign_to_array(&a, int(0), SymbolicExpression::boolean(true)),
        Err(MemoryError::Provenance(_))
    ));
    assert!(matches!(
        memory.get_from_array(&a, SymbolicExpression::float(1.0)),
        Err(MemoryError::Provenance(_))
    ));
}

#[test]
fn test_long_write_sequences_stay_tractable() {
    let mut memory = SymbolicMemory::new();
    let a = int_array(&mut memory);
    let b = int_array(&mut memory);
    let writes = 120;

    let started = Instant::now();
    for step in 0..writes {
        let target = if step % 2 == 0 { &a } else { &b };
        memory.assign_to_array(target, int(step % 7), int(step)).unwrap();
    }
    let last_write = |parity: i64| {
        (0..writes)
            .filter(|step| step % 2 == parity && step % 7 == 3)
            .max()
            .unwrap()
    };

    let read_a = memory.get_from_array(&a, int(3)).unwrap();
    let read_b = memory.get_from_array(&b, int(3)).unwrap();
    assert_reduces_to(&read_a, last_write(0));
    assert_reduces_to(&read_b, last_write(1));
    assert_eq!(eval(&Model::new(), &read_a), ConcreteValue::Int(last_write(0)));
    assert_eq!(eval(&Model::new(), &read_b), ConcreteValue::Int(last_write(1)));
    let seeds = VariableCollector::collect(&read_a);
    let names: Vec<&str> = seeds.iter().map(|v| v.name()).collect();
    assert_eq!(names, vec!["$array[int]", "$addr"]);
    assert!(started.elapsed() < Duration::from_secs(5));
}

// ═══════════════════════════════════════════════════════════════════════════
// Object fields
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_allocated_objects_keep_fields_independent() {
    let mut memory = SymbolicMemory::new();
    let first = object(&mut memory, "Foo");
    let second = object(&mut memory, "Foo");

    memory.assign_field(&first, 1, int(10)).unwrap();
    memory.assign_field(&second, 1, int(5)).unwrap();

    let read_first = memory.get_field_value(&first, 1).unwrap();
    let read_second = memory.get_field_value(&second, 1).unwrap();

    assert_eq!(read_first.to_string(), "0x1.1");
    assert_reduces_to(&raw(&read_first), 10);
    assert_reduces_to(&raw(&read_second), 5);
}

#[test]
fn test_make_ref_aliases_are_satisfiable_as_equal() {
    let mut memory = SymbolicMemory::new();
    let ref1 = memory.make_ref(ValueKind::Object, Some("Foo"), None).unwrap();
    let ref2 = memory.make_ref(ValueKind::Object, Some("Foo"), None).unwrap();

    memory.assign_field(&ref1, 1, int(10)).unwrap();
    memory.assign_field(&ref2, 1, int(5)).unwrap();

    let read1 = memory.get_field_value(&ref1, 1).unwrap();
    let read2 = memory.get_field_value(&ref2, 1).unwrap();
    assert_unresolved(&raw(&read1));

    // slot(ref1) == slot(ref2) && ref1.1 == 5 && ref2.1 == 5
    let same_slot =
        SymbolicExpression::binary(ref1.deref().clone(), ref2.deref().clone(), BinaryOperator::Eq)
            .unwrap();
    let first_is_5 =
        SymbolicExpression::binary(read1.clone(), int(5), BinaryOperator::Eq).unwrap();
    let second_is_5 =
        SymbolicExpression::binary(read2.clone(), int(5), BinaryOperator::Eq).unwrap();
    let query = SymbolicExpression::logical(
        vec![same_slot, first_is_5, second_is_5],
        LogicalOperator::And,
    )
    .unwrap();

    let aliased = Model::new().with("$addr", all_addresses_to(1));
    assert_eq!(eval(&aliased, &query), ConcreteValue::Bool(true));

    let apart = Model::new().with(
        "$addr",
        ConcreteValue::Array(
            ConcreteArray::constant(ConcreteValue::Int(0))
                .with(1, ConcreteValue::Int(1))
                .with(2, ConcreteValue::Int(2)),
        ),
    );
    assert_eq!(eval(&apart, &read1), ConcreteValue::Int(10));
    assert_eq!(eval(&apart, &query), ConcreteValue::Bool(false));
}

#[test]
fn test_field_schema_is_fixed_by_first_write() {
    let mut memory = SymbolicMemory::new();
    let foo = object(&mut memory, "Foo");

    memory.assign_field(&foo, 2, int(1)).unwrap();
    let err = memory
        .assign_field(&foo, 2, SymbolicExpression::boolean(true))
        .unwrap_err();

    let conflict = match err {
        MemoryError::FieldKindConflict(conflict) => conflict,
        other => panic!("expected a field conflict, got {other}"),
    };
    assert_eq!(conflict.existing, FieldType::Int);
    assert_eq!(conflict.requested, FieldType::Bool);
    assert_eq!(memory.schema("Foo").unwrap().field(2), Some(&FieldType::Int));

    // Same type again is fine
    memory.assign_field(&foo, 2, int(4)).unwrap();
}

#[test]
fn test_schema_shared_across_references() {
    let mut memory = SymbolicMemory::new();
    let first = object(&mut memory, "Foo");
    let second = object(&mut memory, "Foo");

    memory
        .assign_field(&first, 0, SymbolicExpression::float(1.5))
        .unwrap();
    let read = memory.get_field_value(&second, 0).unwrap();

    assert_eq!(read.kind(), ValueKind::Float);
    assert_unresolved(&raw(&read));
}

#[test]
fn test_array_valued_field() {
    let mut memory = SymbolicMemory::new();
    let holder = object(&mut memory, "Holder");
    let a = int_array(&mut memory);
    let inner = memory.assign_to_array(&a, int(0), int(8)).unwrap();

    memory.assign_field(&holder, 0, inner).unwrap();
    let read = memory.get_field_value(&holder, 0).unwrap();
    assert_eq!(read.kind(), ValueKind::Array);
    assert_eq!(read.element_type(), Some(&GenericType::int()));

    let element = SymbolicExpression::select(read, int(0)).unwrap();
    assert_eq!(eval(&Model::new(), &element), ConcreteValue::Int(8));
}

#[test]
fn test_field_read_before_write_fails() {
    let mut memory = SymbolicMemory::new();
    let foo = object(&mut memory, "Foo");

    assert_eq!(
        memory.get_field_value(&foo, 0).unwrap_err(),
        MemoryError::FieldNotWritten {
            schema: "Foo".into(),
            index: 0
        }
    );
}

#[test]
fn test_object_values_cannot_be_stored_in_fields() {
    let mut memory = SymbolicMemory::new();
    let foo = object(&mut memory, "Foo");
    let raw_object = SymbolicExpression::variable("o", ValueKind::Object);

    assert!(matches!(
        memory.assign_field(&foo, 0, raw_object),
        Err(MemoryError::UnsupportedFieldValue { .. })
    ));
}

// ═══════════════════════════════════════════════════════════════════════════
// Addressing and primitives
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_addresses_strictly_increase() {
    let mut memory = SymbolicMemory::new();
    let mut seen = Vec::new();

    for step in 0..12 {
        let r = if step % 3 == 0 {
            memory.make_ref(ValueKind::Bool, None, None).unwrap()
        } else {
            memory.allocate(ValueKind::Int, None, None).unwrap()
        };
        seen.push(r.address());
    }

    assert!(seen.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(memory.next_address(), 13);
    assert_eq!(memory.allocation_count(), 12);
}

#[test]
fn test_primitive_writes_are_per_slot() {
    let mut memory = SymbolicMemory::new();
    let x = memory.allocate(ValueKind::Int, None, None).unwrap();
    let y = memory.allocate(ValueKind::Int, None, None).unwrap();

    memory.assign_primitive(&x, int(1)).unwrap();
    memory.assign_primitive(&y, int(2)).unwrap();
    memory.assign_primitive(&x, int(3)).unwrap();

    assert_reduces_to(&memory.read_primitive(&x).unwrap(), 3);
    assert_reduces_to(&memory.read_primitive(&y).unwrap(), 2);
}

#[test]
fn test_unsupported_kind_is_fatal() {
    let mut memory = SymbolicMemory::new();
    let err = memory.allocate(ValueKind::Ref, None, None).unwrap_err();

    assert_eq!(err, MemoryError::UnsupportedKind { kind: ValueKind::Ref });
    assert_eq!(memory.next_address(), 1);
    assert_eq!(memory.address_chain().to_string(), "$addr");
}

#[test]
fn test_earlier_expressions_stay_valid() {
    let mut memory = SymbolicMemory::new();
    let x = memory.allocate(ValueKind::Int, None, None).unwrap();

    let before = memory.assign_primitive(&x, int(1)).unwrap();
    let snapshot = before.to_string();
    memory.assign_primitive(&x, int(2)).unwrap();

    assert_eq!(before.to_string(), snapshot);
    let old_read = SymbolicExpression::select(before, x.deref().clone()).unwrap();
    assert_reduces_to(&old_read, 1);
}
