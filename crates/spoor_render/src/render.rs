//! The recursive value renderer.
//!
//! Converts one [`Value`] into one or more buffered lines, dispatching over
//! the value's shape. Composite values decide up front whether they fit on a
//! single line (one element or fewer, or single-line element types) or break
//! into one indented element per line. Structural values go through the
//! cycle guard and the per-type text-conversion cache.

use std::collections::HashMap;
use std::sync::Arc;

use spoor_foundation::describe::{ClassLevel, Describe, Field, FieldRead};
use spoor_foundation::value::Value;

use crate::buffer::{LineBuffer, RenderedLine};
use crate::cycle::CycleGuard;
use crate::settings::FormatSettings;

/// Per-type cache of "has a usable custom text conversion".
///
/// The answer is determined once per runtime type name and kept for the
/// cache's lifetime; the trace facade owns one under its lock so the cache
/// lives for the process.
#[derive(Debug, Default)]
pub struct TextCache {
    map: HashMap<String, bool>,
}

impl TextCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the object's type has a custom text conversion,
    /// probing it on the first encounter of the type.
    pub fn has_text(&mut self, object: &dyn Describe) -> bool {
        if let Some(&known) = self.map.get(object.type_name()) {
            return known;
        }
        let has = object.as_text().is_some();
        self.map.insert(object.type_name().to_string(), has);
        has
    }

    /// Number of cached types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if no type has been probed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Where a value sits relative to its parent; drives type-name suppression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Ctx {
    /// A value printed on its own; annotations are parenthesized.
    TopLevel,
    /// An element of an array; the array's annotation names the element type.
    ArrayElement,
    /// An element of a collection, map, optional, or structure.
    ContainerElement,
    /// A structural field whose declared type is primitive; never annotated.
    PrimitiveField,
}

/// One render pass over one value.
///
/// Borrows the shared settings and text cache; owns the line buffer and
/// cycle guard, which never outlive the pass.
pub struct Renderer<'s, 'c> {
    settings: &'s FormatSettings,
    cache: &'c mut TextCache,
    buffer: LineBuffer,
    guard: CycleGuard,
}

impl<'s, 'c> Renderer<'s, 'c> {
    /// Creates a renderer for one pass.
    #[must_use]
    pub fn new(settings: &'s FormatSettings, cache: &'c mut TextCache) -> Self {
        Self {
            settings,
            cache,
            buffer: LineBuffer::new(settings.max_line_width),
            guard: CycleGuard::new(),
        }
    }

    /// Renders one value to buffered lines.
    #[must_use]
    pub fn render(mut self, value: &Value) -> Vec<RenderedLine> {
        self.append_value(value, Ctx::TopLevel, 0, None);
        self.buffer.take_lines()
    }

    /// Renders `name = value`, optionally applying the symbolic-name table
    /// registered under `map_name` to integer values.
    #[must_use]
    pub fn render_named(
        mut self,
        name: &str,
        map_name: Option<&str>,
        value: &Value,
    ) -> Vec<RenderedLine> {
        self.buffer.no_break_append(name);
        self.buffer.no_break_append(&self.settings.name_value_separator);
        self.append_value(value, Ctx::TopLevel, 0, map_name);
        self.buffer.take_lines()
    }

    // -------------------------------------------------------------------------
    // Dispatch
    // -------------------------------------------------------------------------

    fn append_value(&mut self, value: &Value, ctx: Ctx, depth: usize, map_name: Option<&str>) {
        if let Value::Object(object) = value {
            self.append_object(object, depth);
            return;
        }

        if let Some(annotation) = self.annotation(value, ctx) {
            let text = if depth == 0 {
                format!("({annotation})")
            } else {
                annotation
            };
            self.buffer.append(&text);
        }

        match value {
            Value::Object(_) => unreachable!("handled above"),
            Value::Nil => {
                self.buffer.append(&self.settings.nil_literal);
            }
            Value::Bool(b) => {
                self.buffer.append(if *b { "true" } else { "false" });
            }
            Value::Char(c) => {
                let quoted = quote_char(*c);
                self.buffer.append(&quoted);
            }
            Value::Int(n) => {
                self.buffer.append(&n.to_string());
                self.append_symbolic(*n, map_name);
            }
            Value::Float(n) => {
                self.buffer.append(&format!("{n:?}"));
            }
            Value::Decimal(d) => {
                self.buffer.append(d.as_str());
            }
            Value::Str(s) => {
                let quoted = self.quoted_string(s, false);
                self.buffer.append(&quoted);
            }
            Value::Date(d) => {
                let text = format_temporal(d.format(&self.settings.date_format));
                self.buffer.append(&text);
            }
            Value::Time(t) => {
                let text = format_temporal(t.format(&self.settings.time_format));
                self.buffer.append(&text);
            }
            Value::Timestamp(ts) => {
                let text = format_temporal(ts.format(&self.settings.timestamp_format));
                self.buffer.append(&text);
            }
            Value::Bytes(bytes) => {
                let shown = &bytes[..bytes.len().min(self.settings.bytes_limit)];
                self.append_hex(shown, shown.len() < bytes.len());
            }
            Value::Array(array) => {
                if array.elem == spoor_foundation::ElemType::Char {
                    let text: String = array
                        .items
                        .iter()
                        .filter_map(|v| match v {
                            Value::Char(c) => Some(*c),
                            _ => None,
                        })
                        .collect();
                    let quoted = self.quoted_string(&text, false);
                    self.buffer.append(&quoted);
                } else {
                    let single = array.len() <= 1 || array.elem.is_single_line();
                    self.append_items(&array.items, single, Ctx::ArrayElement, depth, map_name);
                }
            }
            Value::Optional(inner) => match inner {
                None => {
                    self.buffer.append(&self.settings.empty_marker);
                }
                Some(inner) => {
                    self.append_value(inner, Ctx::ContainerElement, depth, map_name);
                }
            },
            Value::Seq(seq) => {
                let single =
                    seq.len() <= 1 || seq.items.front().is_some_and(Value::is_single_line);
                self.append_items(&seq.items, single, Ctx::ContainerElement, depth, map_name);
            }
            Value::Map(map) => {
                self.append_map_entries(&map.entries, depth, map_name);
            }
            Value::Blob(blob) => match blob.read_prefix(self.settings.bytes_limit) {
                Ok(bytes) => {
                    let truncated = (bytes.len() as u64) < blob.len();
                    self.append_hex(&bytes, truncated);
                }
                Err(err) => {
                    self.buffer.append(&err.to_string());
                }
            },
            Value::Clob(clob) => match clob.read_prefix(self.settings.string_limit) {
                Ok(text) => {
                    let truncated = (text.chars().count() as u64) < clob.len();
                    let quoted = self.quoted_string(&text, truncated);
                    self.buffer.append(&quoted);
                }
                Err(err) => {
                    self.buffer.append(&err.to_string());
                }
            },
        }
    }

    /// Computes the type annotation for a non-structural value, or `None`
    /// when the annotation is suppressed.
    fn annotation(&self, value: &Value, ctx: Ctx) -> Option<String> {
        match value {
            // Objects annotate themselves; nil and optionals are bare.
            Value::Nil | Value::Optional(_) | Value::Object(_) => None,
            Value::Array(a) => Some(format!("{}[] length:{}", a.elem, a.len())),
            Value::Bytes(b) => Some(format!("byte[] length:{}", b.len())),
            Value::Seq(s) => Some(format!("{} size:{}", s.name, s.len())),
            Value::Map(m) => Some(format!("{} size:{}", m.name, m.len())),
            Value::Blob(b) => Some(format!("Blob length:{}", b.len())),
            Value::Clob(c) => Some(format!("Clob length:{}", c.len())),
            _ => {
                if ctx == Ctx::PrimitiveField {
                    return None;
                }
                let name = value.type_name();
                if self.settings.no_annotation_types.contains(&name) {
                    None
                } else {
                    Some(name)
                }
            }
        }
    }

    /// Appends `(SymbolicName)` after an integer that is registered under
    /// the active field or map name and fits in an `i32`.
    fn append_symbolic(&mut self, value: i64, map_name: Option<&str>) {
        let Some(name) = map_name else { return };
        if let Some(symbol) = self.settings.symbolic_name(name, value) {
            let tag = format!("({symbol})");
            self.buffer.no_break_append(&tag);
        }
    }

    // -------------------------------------------------------------------------
    // Composite bodies
    // -------------------------------------------------------------------------

    fn append_items(
        &mut self,
        items: &im::Vector<Value>,
        single_line: bool,
        ctx: Ctx,
        depth: usize,
        map_name: Option<&str>,
    ) {
        let limit = self.settings.collection_limit;
        self.buffer.no_break_append("[");
        if single_line {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    self.buffer
                        .no_break_append(&self.settings.element_separator);
                }
                if i >= limit {
                    self.buffer.append(&self.settings.limit_marker);
                    break;
                }
                self.append_value(item, ctx, depth + 1, map_name);
            }
        } else {
            self.buffer.line_feed();
            self.buffer.up_nest();
            for (i, item) in items.iter().enumerate() {
                if i >= limit {
                    self.buffer.append(&self.settings.limit_marker);
                    self.buffer.line_feed();
                    break;
                }
                self.append_value(item, ctx, depth + 1, map_name);
                self.buffer.no_break_append(",");
                self.buffer.line_feed();
            }
            self.buffer.down_nest();
        }
        self.buffer.no_break_append("]");
    }

    fn append_map_entries(
        &mut self,
        entries: &im::Vector<(Value, Value)>,
        depth: usize,
        map_name: Option<&str>,
    ) {
        let limit = self.settings.collection_limit;
        let single = entries.len() <= 1
            || entries
                .front()
                .is_some_and(|(k, v)| k.is_single_line() && v.is_single_line());
        self.buffer.no_break_append("[");
        if single {
            for (i, (key, value)) in entries.iter().enumerate() {
                if i > 0 {
                    self.buffer
                        .no_break_append(&self.settings.element_separator);
                }
                if i >= limit {
                    self.buffer.append(&self.settings.limit_marker);
                    break;
                }
                self.append_entry(key, value, depth, map_name);
            }
        } else {
            self.buffer.line_feed();
            self.buffer.up_nest();
            for (i, (key, value)) in entries.iter().enumerate() {
                if i >= limit {
                    self.buffer.append(&self.settings.limit_marker);
                    self.buffer.line_feed();
                    break;
                }
                self.append_entry(key, value, depth, map_name);
                self.buffer.no_break_append(",");
                self.buffer.line_feed();
            }
            self.buffer.down_nest();
        }
        self.buffer.no_break_append("]");
    }

    fn append_entry(&mut self, key: &Value, value: &Value, depth: usize, map_name: Option<&str>) {
        self.append_value(key, Ctx::ContainerElement, depth + 1, None);
        self.buffer
            .no_break_append(&self.settings.key_value_separator);
        self.append_value(value, Ctx::ContainerElement, depth + 1, map_name);
    }

    /// Appends bytes as space-separated uppercase hex pairs; more than 16
    /// bytes break into rows of 16.
    fn append_hex(&mut self, bytes: &[u8], truncated: bool) {
        self.buffer.no_break_append("[");
        if bytes.len() <= 16 {
            let row = hex_row(bytes);
            self.buffer.no_break_append(&row);
            if truncated {
                self.buffer
                    .no_break_append(&format!(" {}", self.settings.limit_marker));
            }
        } else {
            self.buffer.line_feed();
            self.buffer.up_nest();
            for chunk in bytes.chunks(16) {
                let row = hex_row(chunk);
                self.buffer.no_break_append(&row);
                self.buffer.line_feed();
            }
            if truncated {
                self.buffer.append(&self.settings.limit_marker);
                self.buffer.line_feed();
            }
            self.buffer.down_nest();
        }
        self.buffer.no_break_append("]");
    }

    // -------------------------------------------------------------------------
    // Structural fallback
    // -------------------------------------------------------------------------

    fn append_object(&mut self, object: &Arc<dyn Describe>, depth: usize) {
        let id = Arc::as_ptr(object).cast::<()>() as usize;

        if self.guard.contains(id) {
            // Already being rendered further up this pass: a cyclic edge.
            let raw = object
                .as_text()
                .unwrap_or_else(|| object.type_name().to_string());
            let marker = format!("{} {raw}", self.settings.cyclic_marker);
            self.buffer.append(&marker);
            return;
        }

        if self.cache.has_text(object.as_ref()) {
            if let Some(text) = object.as_text() {
                self.buffer.append(&text);
                return;
            }
        }

        if self.guard.depth() >= self.settings.reflection_nest_limit {
            let cut = format!("{}{}", object.type_name(), self.settings.limit_marker);
            self.buffer.append(&cut);
            return;
        }

        self.guard.push(id);
        self.append_levels(object, depth);
        self.guard.pop();
    }

    fn append_levels(&mut self, object: &Arc<dyn Describe>, depth: usize) {
        let levels = object.levels();
        let total_fields: usize = levels.iter().map(|l| l.fields.len()).sum();

        let annotation = object.type_name().to_string();
        let text = if depth == 0 {
            format!("({annotation})")
        } else {
            annotation
        };
        self.buffer.append(&text);

        let single = levels.len() <= 1 && total_fields <= 1;
        self.buffer.no_break_append("[");
        if single {
            for level in &levels {
                for field in &level.fields {
                    self.append_field(level, field, depth);
                }
            }
        } else {
            self.buffer.line_feed();
            self.buffer.up_nest();
            for (i, level) in levels.iter().enumerate() {
                if i > 0 {
                    let boundary = format!(
                        "{}{}",
                        self.settings.class_boundary_prefix, level.class_name
                    );
                    self.buffer.append(&boundary);
                    self.buffer.line_feed();
                }
                for field in &level.fields {
                    self.append_field(level, field, depth);
                    self.buffer.no_break_append(",");
                    self.buffer.line_feed();
                }
            }
            self.buffer.down_nest();
        }
        self.buffer.no_break_append("]");
    }

    fn append_field(&mut self, level: &ClassLevel, field: &Field, depth: usize) {
        self.buffer.append(&field.name);
        self.buffer
            .no_break_append(&self.settings.field_value_separator);

        if self.settings.is_redacted(&level.class_name, &field.name) {
            self.buffer.append(&self.settings.redacted_marker);
            return;
        }

        match &field.value {
            FieldRead::Failed(message) => {
                let marker = format!(
                    "{}{message}{}",
                    self.settings.field_error_prefix, self.settings.field_error_suffix
                );
                self.buffer.append(&marker);
            }
            FieldRead::Value(value) => {
                let ctx = if field.declared_primitive {
                    Ctx::PrimitiveField
                } else {
                    Ctx::ContainerElement
                };
                let map_name = self
                    .settings
                    .name_map
                    .contains_key(&*field.name)
                    .then_some(&*field.name);
                self.append_value(value, ctx, depth + 1, map_name);
            }
        }
    }

    fn quoted_string(&self, s: &str, already_truncated: bool) -> String {
        let limit = self.settings.string_limit;
        let mut out = String::with_capacity(s.len() + 2);
        out.push('"');
        let mut truncated = already_truncated;
        for (i, c) in s.chars().enumerate() {
            if i >= limit {
                truncated = true;
                break;
            }
            escape_into(c, '"', &mut out);
        }
        if truncated {
            out.push_str(&self.settings.limit_marker);
        }
        out.push('"');
        out
    }
}

/// Renders one value to a string, with data-nest indentation applied.
///
/// The standalone query surface; uses a transient text cache.
#[must_use]
pub fn render_to_string(settings: &FormatSettings, value: &Value) -> String {
    let mut cache = TextCache::new();
    let lines = Renderer::new(settings, &mut cache).render(value);
    lines_to_string(settings, &lines)
}

/// Joins buffered lines, indenting each by its clamped data-nest level.
#[must_use]
pub fn lines_to_string(settings: &FormatSettings, lines: &[RenderedLine]) -> String {
    lines
        .iter()
        .map(|line| {
            let indent = settings
                .data_indent
                .repeat(line.nest.min(settings.max_indents));
            format!("{indent}{}", line.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Realizes a chrono delayed format without ever panicking; an invalid
/// format string (missed by settings validation) yields empty text.
fn format_temporal(format: impl std::fmt::Display) -> String {
    use std::fmt::Write as _;
    let mut out = String::new();
    if write!(out, "{format}").is_err() {
        out.clear();
    }
    out
}

fn hex_row(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn quote_char(c: char) -> String {
    let mut out = String::new();
    out.push('\'');
    escape_into(c, '\'', &mut out);
    out.push('\'');
    out
}

/// Escapes one character into `out`, with `quote` as the active quote
/// character.
fn escape_into(c: char, quote: char, out: &mut String) {
    match c {
        '\u{8}' => out.push_str("\\b"),
        '\t' => out.push_str("\\t"),
        '\n' => out.push_str("\\n"),
        '\u{c}' => out.push_str("\\f"),
        '\r' => out.push_str("\\r"),
        '\\' => out.push_str("\\\\"),
        c if c == quote => {
            out.push('\\');
            out.push(c);
        }
        c if c.is_control() => {
            out.push_str(&format!("\\u{:04X}", c as u32));
        }
        c => out.push(c),
    }
}
