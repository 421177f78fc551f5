//! Integration tests for the tracer facade
//!
//! Tests enter/leave nesting, printed values, caller positions, symbolic
//! names, and the disabled tracer, all through a memory sink.

use std::sync::{Arc, Mutex};

use spoor_foundation::{Record, Value};
use spoor_render::FormatSettings;
use spoor_trace::{MemorySink, Tracer};

fn memory_tracer(settings: FormatSettings) -> (Tracer, Arc<Mutex<Vec<String>>>) {
    let sink = MemorySink::new();
    let handle = sink.handle();
    (Tracer::new(settings, sink), handle)
}

fn captured(handle: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
    handle.lock().unwrap().clone()
}

// =============================================================================
// Enter / Leave
// =============================================================================

#[test]
fn enter_and_leave_carry_the_caller_position() {
    let (tracer, handle) = memory_tracer(FormatSettings::default());
    tracer.enter();
    tracer.leave();
    let lines = captured(&handle);
    assert!(lines.iter().any(|l| l.starts_with("Enter facade.rs:")));
    assert!(lines.iter().any(|l| l.starts_with("Leave facade.rs:")));
}

#[test]
fn nesting_indents_with_the_call_indent() {
    let (tracer, handle) = memory_tracer(FormatSettings::default());
    tracer.enter();
    tracer.enter();
    tracer.enter();
    tracer.leave();
    tracer.leave();
    tracer.leave();
    let lines = captured(&handle);
    let enters: Vec<&String> = lines.iter().filter(|l| l.contains("Enter ")).collect();
    assert!(enters[2].starts_with("| | Enter"));
    let leaves: Vec<&String> = lines.iter().filter(|l| l.contains("Leave ")).collect();
    assert!(leaves[0].starts_with("| | Leave"));
    assert!(!leaves[2].starts_with("|"));
}

#[test]
fn sibling_call_groups_are_separated_by_a_blank_line() {
    let (tracer, handle) = memory_tracer(FormatSettings::default());
    tracer.enter();
    tracer.leave();
    tracer.enter();
    tracer.leave();
    let lines = captured(&handle);
    let second = lines.iter().rposition(|l| l.contains("Enter ")).unwrap();
    assert_eq!(lines[second - 1], "");
}

// =============================================================================
// Printing
// =============================================================================

#[test]
fn printed_scalars_use_name_equals_value() {
    let (tracer, handle) = memory_tracer(FormatSettings::default());
    tracer.print("count", &Value::Int(12));
    let lines = captured(&handle);
    assert!(lines.last().unwrap().starts_with("count = 12 (facade.rs:"));
}

#[test]
fn printed_objects_indent_data_below_the_call_level() {
    let (tracer, handle) = memory_tracer(FormatSettings::default());
    tracer.enter();
    let v = Value::object(
        Record::new("Point")
            .with_primitive_field("x", Value::Int(1))
            .with_primitive_field("y", Value::Int(2)),
    );
    tracer.print("p", &v);
    let lines = captured(&handle);
    let body: Vec<&String> = lines
        .iter()
        .filter(|l| l.contains("p = ") || l.contains("x:") || l.contains("y:"))
        .collect();
    assert_eq!(body[0], "| p = (Point)[");
    assert_eq!(body[1], "|   x: 1,");
    assert_eq!(body[2], "|   y: 2,");
}

#[test]
fn last_output_matches_the_printed_block() {
    let (tracer, _handle) = memory_tracer(FormatSettings::default());
    let v = Value::seq("Vec", ["a", "b"].map(Value::from));
    tracer.print("items", &v);
    let out = tracer.last_output();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "items = (Vec size:2)[");
    assert_eq!(lines[1], "  \"a\",");
    assert!(lines[3].starts_with("] (facade.rs:"));
}

#[test]
fn print_message_is_verbatim_plus_caller() {
    let (tracer, handle) = memory_tracer(FormatSettings::default());
    tracer.print_message("loading config");
    let lines = captured(&handle);
    assert!(lines.last().unwrap().starts_with("loading config (facade.rs:"));
}

// =============================================================================
// Symbolic Names
// =============================================================================

#[test]
fn print_applies_the_table_registered_under_its_own_name() {
    let settings = FormatSettings::default()
        .with_name_map("mode", [(0, "IDLE".to_string()), (1, "ACTIVE".to_string())]);
    let (tracer, handle) = memory_tracer(settings);
    tracer.print("mode", &Value::Int(1));
    let lines = captured(&handle);
    assert!(lines.last().unwrap().starts_with("mode = 1(ACTIVE)"));
}

#[test]
fn symbolic_names_reach_collection_elements() {
    let settings = FormatSettings::default()
        .with_name_map("codes", [(4, "STOP".to_string()), (7, "GO".to_string())]);
    let (tracer, handle) = memory_tracer(settings);
    tracer.print("codes", &Value::seq("Vec", [Value::Int(7), Value::Int(4)]));
    let lines = captured(&handle);
    let line = lines.last().unwrap();
    assert!(line.contains("7(GO)"));
    assert!(line.contains("4(STOP)"));
}

#[test]
fn unmapped_integers_stay_bare() {
    let settings =
        FormatSettings::default().with_name_map("mode", [(0, "IDLE".to_string())]);
    let (tracer, handle) = memory_tracer(settings);
    tracer.print("mode", &Value::Int(9));
    let lines = captured(&handle);
    assert!(lines.last().unwrap().starts_with("mode = 9 ("));
}

#[test]
fn print_with_selects_a_table_by_map_name() {
    let settings =
        FormatSettings::default().with_name_map("errno", [(2, "ENOENT".to_string())]);
    let (tracer, handle) = memory_tracer(settings);
    tracer.print_with("result", "errno", &Value::Int(2));
    let lines = captured(&handle);
    assert!(lines.last().unwrap().starts_with("result = 2(ENOENT)"));
}

#[test]
fn struct_fields_use_their_short_name_for_lookup() {
    let settings =
        FormatSettings::default().with_name_map("state", [(3, "CLOSING".to_string())]);
    let (tracer, handle) = memory_tracer(settings);
    let v = Value::object(Record::new("Conn").with_primitive_field("state", Value::Int(3)));
    tracer.print("conn", &v);
    let lines = captured(&handle);
    assert!(lines.last().unwrap().contains("state: 3(CLOSING)"));
}

// =============================================================================
// Disabled and Reset
// =============================================================================

#[test]
fn disabled_tracer_emits_nothing_and_is_cheap_to_call() {
    let tracer = Tracer::disabled();
    for _ in 0..100 {
        tracer.enter();
        tracer.print("x", &Value::Int(1));
        tracer.leave();
    }
    assert_eq!(tracer.last_output(), "");
}

#[test]
fn reset_clears_nesting_between_test_cases() {
    let (tracer, handle) = memory_tracer(FormatSettings::default());
    tracer.enter();
    tracer.enter();
    tracer.reset();
    tracer.print("fresh", &Value::Int(1));
    let lines = captured(&handle);
    assert!(lines.last().unwrap().starts_with("fresh = 1"));
}
