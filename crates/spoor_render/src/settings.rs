//! Format settings consumed read-only by the renderer.
//!
//! One [`FormatSettings`] is built at startup (by hand or deserialized with
//! the `serde` feature), validated once, and shared by every thread for the
//! process lifetime. Nothing here is mutated during rendering.

use std::collections::{HashMap, HashSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Numeric limits, separators, markers, and lookup tables for rendering.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FormatSettings {
    /// Maximum width of one output line before wrapping.
    pub max_line_width: usize,
    /// Maximum characters rendered from a string or char array.
    pub string_limit: usize,
    /// Maximum bytes rendered from a byte array or blob.
    pub bytes_limit: usize,
    /// Maximum elements rendered from an array, collection, or map.
    pub collection_limit: usize,
    /// Maximum structural nesting depth before cutting off with the limit
    /// marker.
    pub reflection_nest_limit: usize,
    /// Clamp for both indent depths; bounds memory on pathological nesting.
    pub max_indents: usize,

    /// Indent unit repeated per call-nesting level.
    pub call_indent: String,
    /// Indent unit repeated per data-nesting level.
    pub data_indent: String,

    /// Prefix of method-entry lines.
    pub enter_marker: String,
    /// Prefix of method-exit lines.
    pub leave_marker: String,
    /// Appended once when a size or length limit cuts output short.
    pub limit_marker: String,
    /// Emitted in place of re-rendering an object already on the cycle stack.
    pub cyclic_marker: String,
    /// Printed instead of a redacted field's value.
    pub redacted_marker: String,
    /// Prefix of an inline field-read failure.
    pub field_error_prefix: String,
    /// Suffix of an inline field-read failure.
    pub field_error_suffix: String,
    /// Printed for an absent optional value.
    pub empty_marker: String,
    /// Literal text for nil values.
    pub nil_literal: String,
    /// Thread-boundary line; `{}` is replaced with the thread description.
    pub thread_boundary_format: String,
    /// Prefix of base-class boundary markers inside structural output.
    pub class_boundary_prefix: String,

    /// Between a printed name and its value.
    pub name_value_separator: String,
    /// Between a map key and its value.
    pub key_value_separator: String,
    /// Between a structural field name and its value.
    pub field_value_separator: String,
    /// Between elements on a single line.
    pub element_separator: String,

    /// chrono format string for dates.
    pub date_format: String,
    /// chrono format string for times of day.
    pub time_format: String,
    /// chrono format string for timestamps.
    pub timestamp_format: String,

    /// Well-known type names whose annotation is suppressed.
    pub no_annotation_types: HashSet<String>,
    /// `TypeName#fieldName` entries whose values are never printed.
    pub redacted_fields: HashSet<String>,
    /// Symbolic-name substitution: field or map name to (value, name) table.
    pub name_map: HashMap<String, HashMap<i32, String>>,
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            max_line_width: 160,
            string_limit: 256,
            bytes_limit: 512,
            collection_limit: 128,
            reflection_nest_limit: 4,
            max_indents: 32,
            call_indent: "| ".to_string(),
            data_indent: "  ".to_string(),
            enter_marker: "Enter ".to_string(),
            leave_marker: "Leave ".to_string(),
            limit_marker: "...".to_string(),
            cyclic_marker: "*** cyclic ***".to_string(),
            redacted_marker: "***".to_string(),
            field_error_prefix: "*** ".to_string(),
            field_error_suffix: " ***".to_string(),
            empty_marker: "empty".to_string(),
            nil_literal: "null".to_string(),
            thread_boundary_format: "______________________ {} ______________________".to_string(),
            class_boundary_prefix: "--- ".to_string(),
            name_value_separator: " = ".to_string(),
            key_value_separator: ": ".to_string(),
            field_value_separator: ": ".to_string(),
            element_separator: ", ".to_string(),
            date_format: "%Y-%m-%d".to_string(),
            time_format: "%H:%M:%S%.3f".to_string(),
            timestamp_format: "%Y-%m-%d %H:%M:%S%.3f".to_string(),
            no_annotation_types: [
                "bool",
                "char",
                "int",
                "float",
                "decimal",
                "String",
                "Date",
                "Time",
                "Timestamp",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
            redacted_fields: HashSet::new(),
            name_map: HashMap::new(),
        }
    }
}

impl FormatSettings {
    /// Creates settings with all defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the maximum line width.
    #[must_use]
    pub fn with_max_line_width(mut self, width: usize) -> Self {
        self.max_line_width = width;
        self
    }

    /// Builder method to set the string limit.
    #[must_use]
    pub fn with_string_limit(mut self, limit: usize) -> Self {
        self.string_limit = limit;
        self
    }

    /// Builder method to set the byte-array limit.
    #[must_use]
    pub fn with_bytes_limit(mut self, limit: usize) -> Self {
        self.bytes_limit = limit;
        self
    }

    /// Builder method to set the element-count limit.
    #[must_use]
    pub fn with_collection_limit(mut self, limit: usize) -> Self {
        self.collection_limit = limit;
        self
    }

    /// Builder method to set the structural nesting limit.
    #[must_use]
    pub fn with_reflection_nest_limit(mut self, limit: usize) -> Self {
        self.reflection_nest_limit = limit;
        self
    }

    /// Builder method to redact a `TypeName#fieldName` entry.
    #[must_use]
    pub fn redact(mut self, qualified_field: impl Into<String>) -> Self {
        self.redacted_fields.insert(qualified_field.into());
        self
    }

    /// Builder method to register a symbolic-name substitution table.
    #[must_use]
    pub fn with_name_map(
        mut self,
        name: impl Into<String>,
        table: impl IntoIterator<Item = (i32, String)>,
    ) -> Self {
        self.name_map.insert(name.into(), table.into_iter().collect());
        self
    }

    /// Looks up the symbolic name for an integer under a field or map name.
    ///
    /// Only values that fit in an `i32` participate.
    #[must_use]
    pub fn symbolic_name(&self, name: &str, value: i64) -> Option<&str> {
        let key = i32::try_from(value).ok()?;
        self.name_map.get(name)?.get(&key).map(String::as_str)
    }

    /// Returns true if `TypeName#fieldName` is on the redaction list.
    #[must_use]
    pub fn is_redacted(&self, class_name: &str, field_name: &str) -> bool {
        self.redacted_fields
            .contains(&format!("{class_name}#{field_name}"))
    }

    /// Validates the settings.
    ///
    /// Malformed configuration is the only failure that propagates to the
    /// caller, and only at startup.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when a limit that must be positive is zero.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.max_line_width == 0 {
            return Err(SettingsError::ZeroLimit("max_line_width"));
        }
        if self.string_limit == 0 {
            return Err(SettingsError::ZeroLimit("string_limit"));
        }
        if self.bytes_limit == 0 {
            return Err(SettingsError::ZeroLimit("bytes_limit"));
        }
        if self.collection_limit == 0 {
            return Err(SettingsError::ZeroLimit("collection_limit"));
        }
        if self.max_indents == 0 {
            return Err(SettingsError::ZeroLimit("max_indents"));
        }
        Self::check_format("date_format", &self.date_format)?;
        Self::check_format("time_format", &self.time_format)?;
        Self::check_format("timestamp_format", &self.timestamp_format)?;
        Ok(())
    }

    fn check_format(field: &'static str, format: &str) -> Result<(), SettingsError> {
        use chrono::format::{Item, StrftimeItems};
        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(SettingsError::BadDateFormat {
                field,
                format: format.to_string(),
            });
        }
        Ok(())
    }
}

/// Invalid format settings, detected at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// A limit that must be positive was zero.
    #[error("{0} must be positive")]
    ZeroLimit(&'static str),

    /// A date/time format string chrono cannot parse.
    #[error("invalid {field} format string: {format:?}")]
    BadDateFormat {
        /// Which settings field carried the bad format.
        field: &'static str,
        /// The offending format string.
        format: String,
    },
}
