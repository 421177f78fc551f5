//! Integration tests for composite rendering
//!
//! Tests arrays, byte blocks, sequences, maps, and optionals, including
//! single-line versus multi-line layout and the collection limit.

use spoor_foundation::{ElemType, Value};
use spoor_render::{FormatSettings, render_to_string};

fn render(value: &Value) -> String {
    render_to_string(&FormatSettings::default(), value)
}

// =============================================================================
// Arrays
// =============================================================================

#[test]
fn int_array_stays_on_one_line() {
    let v = Value::array(
        ElemType::Int,
        [Value::Int(-123_456_789), Value::Int(123_456_789)],
    );
    assert_eq!(render(&v), "(int[] length:2)[-123456789, 123456789]");
}

#[test]
fn empty_array_is_empty_brackets() {
    let v = Value::array(ElemType::Bool, []);
    assert_eq!(render(&v), "(bool[] length:0)[]");
}

#[test]
fn char_array_renders_as_a_string() {
    let v = Value::chars("trace");
    assert_eq!(render(&v), "(char[] length:5)\"trace\"");
}

#[test]
fn string_array_breaks_per_element() {
    let v = Value::array(ElemType::Str, ["x", "y"].map(Value::from));
    let expected = "(String[] length:2)[\n  \"x\",\n  \"y\",\n]";
    assert_eq!(render(&v), expected);
}

#[test]
fn nested_array_annotation_stacks_brackets() {
    let inner = |a: i64, b: i64| {
        Value::array(ElemType::Int, [Value::Int(a), Value::Int(b)])
    };
    let v = Value::array(
        ElemType::Array(Box::new(ElemType::Int)),
        [inner(1, 2), inner(3, 4)],
    );
    let out = render(&v);
    assert!(out.starts_with("(int[][] length:2)["));
    assert!(out.contains("int[] length:2"));
}

// =============================================================================
// Bytes
// =============================================================================

#[test]
fn short_byte_runs_are_one_line_of_hex() {
    let v = Value::bytes(vec![0u8, 1, 254, 255]);
    assert_eq!(render(&v), "(byte[] length:4)[00 01 FE FF]");
}

#[test]
fn long_byte_runs_break_into_rows_of_sixteen() {
    let v = Value::bytes((0u8..40).collect::<Vec<_>>());
    let out = render(&v);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "(byte[] length:40)[");
    assert_eq!(lines[1].split_whitespace().count(), 16);
    assert_eq!(lines[3].split_whitespace().count(), 8);
    assert_eq!(lines[4], "]");
}

#[test]
fn bytes_limit_appends_the_marker() {
    let settings = FormatSettings::default().with_bytes_limit(8);
    let v = Value::bytes((0u8..12).collect::<Vec<_>>());
    let out = render_to_string(&settings, &v);
    assert_eq!(out, "(byte[] length:12)[00 01 02 03 04 05 06 07 ...]");
}

// =============================================================================
// Sequences
// =============================================================================

#[test]
fn int_sequence_stays_on_one_line() {
    let v = Value::seq("Vec", (1..=3).map(Value::Int));
    assert_eq!(render(&v), "(Vec size:3)[1, 2, 3]");
}

#[test]
fn string_sequence_breaks_per_element() {
    let v = Value::seq("Vec", ["a", "b", "c"].map(Value::from));
    let expected = "(Vec size:3)[\n  \"a\",\n  \"b\",\n  \"c\",\n]";
    assert_eq!(render(&v), expected);
}

#[test]
fn nested_sequences_indent_per_level() {
    let inner = Value::seq("Vec", ["deep"].map(Value::from));
    let v = Value::seq("Vec", [inner, Value::from("top")]);
    let out = render(&v);
    assert!(out.contains("\n  Vec size:1"));
}

#[test]
fn collection_limit_reports_the_true_size() {
    let settings = FormatSettings::default().with_collection_limit(3);
    let v = Value::seq("Vec", (0..10).map(Value::Int));
    let out = render_to_string(&settings, &v);
    assert_eq!(out, "(Vec size:10)[0, 1, 2, ...]");
}

// =============================================================================
// Maps
// =============================================================================

#[test]
fn single_entry_map_is_one_line() {
    let v = Value::map("HashMap", [(Value::from("k"), Value::Int(1))]);
    assert_eq!(render(&v), "(HashMap size:1)[\"k\": 1]");
}

#[test]
fn multi_entry_map_with_string_values_breaks() {
    let v = Value::map(
        "BTreeMap",
        [
            (Value::Int(1), Value::from("one")),
            (Value::Int(2), Value::from("two")),
        ],
    );
    let expected = "(BTreeMap size:2)[\n  1: \"one\",\n  2: \"two\",\n]";
    assert_eq!(render(&v), expected);
}

#[test]
fn map_preserves_entry_order() {
    let v = Value::map(
        "LinkedHashMap",
        [
            (Value::Int(3), Value::Int(30)),
            (Value::Int(1), Value::Int(10)),
            (Value::Int(2), Value::Int(20)),
        ],
    );
    assert_eq!(render(&v), "(LinkedHashMap size:3)[3: 30, 1: 10, 2: 20]");
}

// =============================================================================
// Optionals
// =============================================================================

#[test]
fn absent_optional_is_the_empty_marker() {
    assert_eq!(render(&Value::none()), "empty");
}

#[test]
fn present_optional_renders_its_inner_value() {
    assert_eq!(render(&Value::some(Value::Int(7))), "7");
    assert_eq!(render(&Value::some(Value::from("in"))), "\"in\"");
}

#[test]
fn optional_inside_a_sequence() {
    // Optionals are not a single-line kind, so the sequence breaks.
    let v = Value::seq("Vec", [Value::some(Value::Int(1)), Value::none()]);
    assert_eq!(render(&v), "(Vec size:2)[\n  1,\n  empty,\n]");
}

// =============================================================================
// Line Width
// =============================================================================

#[test]
fn narrow_width_wraps_long_single_line_collections() {
    let settings = FormatSettings::default().with_max_line_width(20);
    let v = Value::seq("Vec", (100..110).map(Value::Int));
    let out = render_to_string(&settings, &v);
    assert!(out.lines().count() > 1);
    for line in out.lines() {
        assert!(line.chars().count() <= 24, "line too wide: {line}");
    }
}
