//! Structural description of composite values.
//!
//! Rust has no runtime reflection, so values that want structural rendering
//! implement [`Describe`]: an explicit "enumerate my fields" capability. A
//! description is a list of [`ClassLevel`]s ordered most-derived first, which
//! is how an inheritance hierarchy flattens into field groups.

use std::sync::{Arc, RwLock};

use crate::value::Value;

/// The structural-description capability.
///
/// Implemented by values with no natural text form. The renderer consults
/// [`as_text`](Describe::as_text) first (a custom text conversion, cached per
/// type name), and falls back to walking [`levels`](Describe::levels).
pub trait Describe: Send + Sync {
    /// The runtime type name, used for annotations and cycle markers.
    fn type_name(&self) -> &str;

    /// Field groups, most-derived level first.
    ///
    /// Levels after the first represent base types; the renderer precedes
    /// each with a class-boundary marker.
    fn levels(&self) -> Vec<ClassLevel>;

    /// A custom text conversion, used verbatim when present.
    fn as_text(&self) -> Option<String> {
        None
    }
}

/// One level of a type hierarchy: a class name plus its own fields.
#[derive(Clone)]
pub struct ClassLevel {
    /// The class name at this level.
    pub class_name: Arc<str>,
    /// The fields declared at this level, excluding statics.
    pub fields: Vec<Field>,
}

impl ClassLevel {
    /// Creates an empty level.
    #[must_use]
    pub fn new(class_name: impl Into<Arc<str>>) -> Self {
        Self {
            class_name: class_name.into(),
            fields: Vec::new(),
        }
    }
}

/// One field of a structural description.
#[derive(Clone)]
pub struct Field {
    /// The externally visible field name.
    pub name: Arc<str>,
    /// True when the field's declared type is primitive; suppresses the
    /// value's type annotation.
    pub declared_primitive: bool,
    /// The field's value, or the captured failure that produced none.
    pub value: FieldRead,
}

/// Outcome of reading one field.
///
/// A failed read is captured per field and rendered inline; it never aborts
/// sibling fields or the enclosing structure.
#[derive(Clone)]
pub enum FieldRead {
    /// The field's value.
    Value(Value),
    /// The failure text of an accessor or field read.
    Failed(String),
}

// =============================================================================
// Record
// =============================================================================

/// A ready-made [`Describe`] implementation built field by field.
///
/// Fields live behind a lock so an object graph can be tied into a cycle
/// after the `Arc` exists:
///
/// ```
/// use std::sync::Arc;
/// use spoor_foundation::{Record, Value};
///
/// let node = Arc::new(Record::new("Node").with_field("id", Value::Int(1)));
/// node.set_field("next", Value::Object(node.clone()));
/// ```
pub struct Record {
    type_name: Arc<str>,
    text: Option<Arc<str>>,
    levels: RwLock<Vec<ClassLevel>>,
}

impl Record {
    /// Creates a record with a single level named after the type.
    #[must_use]
    pub fn new(type_name: impl Into<Arc<str>>) -> Self {
        let type_name = type_name.into();
        Self {
            levels: RwLock::new(vec![ClassLevel::new(type_name.clone())]),
            text: None,
            type_name,
        }
    }

    /// Appends a field to the most recently added level.
    #[must_use]
    pub fn with_field(self, name: impl Into<Arc<str>>, value: Value) -> Self {
        self.push_field(Field {
            name: name.into(),
            declared_primitive: false,
            value: FieldRead::Value(value),
        });
        self
    }

    /// Appends a primitively declared field to the most recently added level.
    #[must_use]
    pub fn with_primitive_field(self, name: impl Into<Arc<str>>, value: Value) -> Self {
        self.push_field(Field {
            name: name.into(),
            declared_primitive: true,
            value: FieldRead::Value(value),
        });
        self
    }

    /// Appends a field whose read failed with the given message.
    #[must_use]
    pub fn with_failed_field(self, name: impl Into<Arc<str>>, message: impl Into<String>) -> Self {
        self.push_field(Field {
            name: name.into(),
            declared_primitive: false,
            value: FieldRead::Failed(message.into()),
        });
        self
    }

    /// Starts a new base-class level; subsequent `with_field` calls add to it.
    #[must_use]
    pub fn with_base(self, class_name: impl Into<Arc<str>>) -> Self {
        if let Ok(mut levels) = self.levels.write() {
            levels.push(ClassLevel::new(class_name));
        }
        self
    }

    /// Gives this record a custom text conversion, bypassing structural
    /// rendering entirely.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<Arc<str>>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Sets a field on the most-derived level, replacing an existing field of
    /// the same name or appending a new one.
    ///
    /// This is the hook for constructing cyclic graphs: wrap the record in an
    /// `Arc`, then point a field back at it.
    pub fn set_field(&self, name: &str, value: Value) {
        if let Ok(mut levels) = self.levels.write() {
            let Some(level) = levels.first_mut() else {
                return;
            };
            if let Some(field) = level.fields.iter_mut().find(|f| &*f.name == name) {
                field.value = FieldRead::Value(value);
            } else {
                level.fields.push(Field {
                    name: name.into(),
                    declared_primitive: false,
                    value: FieldRead::Value(value),
                });
            }
        }
    }

    fn push_field(&self, field: Field) {
        if let Ok(mut levels) = self.levels.write() {
            if let Some(level) = levels.last_mut() {
                level.fields.push(field);
            }
        }
    }
}

impl Describe for Record {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn levels(&self) -> Vec<ClassLevel> {
        self.levels.read().map(|l| l.clone()).unwrap_or_default()
    }

    fn as_text(&self) -> Option<String> {
        self.text.as_ref().map(ToString::to_string)
    }
}
