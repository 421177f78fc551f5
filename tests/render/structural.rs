//! Integration tests for structural rendering
//!
//! Tests described objects: field walks, inheritance levels, redaction,
//! failed reads, cycles, depth limits, and large-object handles.

use std::sync::Arc;

use spoor_foundation::{BrokenBlob, BrokenClob, MemoryBlob, MemoryClob, Record, Value};
use spoor_render::{FormatSettings, render_to_string};

fn render(value: &Value) -> String {
    render_to_string(&FormatSettings::default(), value)
}

// =============================================================================
// Field Walks
// =============================================================================

#[test]
fn single_field_object_is_one_line() {
    let v = Value::object(Record::new("Point").with_primitive_field("x", Value::Int(3)));
    assert_eq!(render(&v), "(Point)[x: 3]");
}

#[test]
fn multi_field_object_breaks_per_field() {
    let v = Value::object(
        Record::new("Point")
            .with_primitive_field("x", Value::Int(3))
            .with_primitive_field("y", Value::Int(4)),
    );
    assert_eq!(render(&v), "(Point)[\n  x: 3,\n  y: 4,\n]");
}

#[test]
fn nested_object_annotation_is_not_parenthesized() {
    let inner = Record::new("Inner").with_primitive_field("n", Value::Int(1));
    let v = Value::object(Record::new("Outer").with_field("inner", Value::object(inner)));
    assert_eq!(render(&v), "(Outer)[inner: Inner[n: 1]]");
}

#[test]
fn primitive_field_suppresses_scalar_annotations() {
    // A string field is not primitively declared, but a scalar is.
    let v = Value::object(
        Record::new("Mixed")
            .with_primitive_field("count", Value::Int(2))
            .with_field("label", Value::from("tag")),
    );
    let out = render(&v);
    assert!(out.contains("count: 2"));
    assert!(out.contains("label: \"tag\""));
}

// =============================================================================
// Inheritance Levels
// =============================================================================

#[test]
fn base_class_fields_follow_a_boundary_line() {
    let v = Value::object(
        Record::new("Derived")
            .with_primitive_field("own", Value::Int(1))
            .with_base("Base")
            .with_primitive_field("inherited", Value::Int(2)),
    );
    let expected = "(Derived)[\n  own: 1,\n  --- Base\n  inherited: 2,\n]";
    assert_eq!(render(&v), expected);
}

// =============================================================================
// Redaction and Failed Reads
// =============================================================================

#[test]
fn redacted_field_shows_only_the_marker() {
    let settings = FormatSettings::default().redact("Account#password");
    let v = Value::object(
        Record::new("Account")
            .with_field("name", Value::from("ada"))
            .with_field("password", Value::from("hunter2")),
    );
    let out = render_to_string(&settings, &v);
    assert!(out.contains("password: ***"));
    assert!(!out.contains("hunter2"));
}

#[test]
fn failed_field_read_renders_the_message() {
    let v = Value::object(Record::new("Flaky").with_failed_field("broken", "accessor threw"));
    assert_eq!(render(&v), "(Flaky)[broken: *** accessor threw ***]");
}

// =============================================================================
// Cycles and Depth
// =============================================================================

#[test]
fn self_reference_is_marked_cyclic() {
    let node = Arc::new(Record::new("Node").with_field("id", Value::Int(1)));
    node.set_field("this", Value::Object(node.clone()));
    let out = render(&Value::Object(node));
    assert!(out.contains("this: *** cyclic *** Node"));
    assert_eq!(out.matches("id: 1").count(), 1);
}

#[test]
fn mutual_references_are_marked_on_the_back_edge() {
    let a = Arc::new(Record::new("A").with_field("tag", Value::Int(1)));
    let b = Arc::new(Record::new("B").with_field("peer", Value::Object(a.clone())));
    a.set_field("peer", Value::Object(b.clone()));
    let out = render(&Value::Object(a));
    assert_eq!(out.matches("*** cyclic ***").count(), 1);
    assert!(out.contains("B["));
}

#[test]
fn shared_but_acyclic_objects_render_twice() {
    let shared = Value::object(Record::new("Leaf").with_primitive_field("n", Value::Int(9)));
    let v = Value::object(
        Record::new("Pair")
            .with_field("left", shared.clone())
            .with_field("right", shared),
    );
    let out = render(&v);
    assert_eq!(out.matches("Leaf[n: 9]").count(), 2);
    assert!(!out.contains("cyclic"));
}

#[test]
fn reflection_nest_limit_cuts_deep_chains() {
    let mut value = Value::object(Record::new("Leaf").with_primitive_field("n", Value::Int(0)));
    for _ in 0..6 {
        value = Value::object(Record::new("Link").with_field("next", value));
    }
    let settings = FormatSettings::default().with_reflection_nest_limit(3);
    let out = render_to_string(&settings, &value);
    assert!(out.contains("Link..."));
    assert!(!out.contains("Leaf["));
}

// =============================================================================
// Custom Text and Large Objects
// =============================================================================

#[test]
fn custom_text_conversion_wins_over_field_walk() {
    let v = Value::object(
        Record::new("Duration")
            .with_text("PT5S")
            .with_primitive_field("seconds", Value::Int(5)),
    );
    assert_eq!(render(&v), "PT5S");
}

#[test]
fn clob_contents_are_quoted() {
    let v = Value::Clob(Arc::new(MemoryClob::new("hello")));
    assert_eq!(render(&v), "(Clob length:5)\"hello\"");
}

#[test]
fn blob_contents_are_hex() {
    let v = Value::Blob(Arc::new(MemoryBlob::new(vec![0xCAu8, 0xFE])));
    assert_eq!(render(&v), "(Blob length:2)[CA FE]");
}

#[test]
fn broken_clob_renders_the_error_in_place() {
    let v = Value::Clob(Arc::new(BrokenClob::new("stream closed")));
    let out = render(&v);
    assert!(out.starts_with("(Clob length:"));
    assert!(out.contains("stream closed"));
    assert!(!out.contains('"'));
}

#[test]
fn broken_blob_renders_the_error_in_place() {
    let v = Value::Blob(Arc::new(BrokenBlob::new("device offline")));
    let out = render(&v);
    assert!(out.contains("device offline"));
}
