//! The runtime value shape consumed by the renderer.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use im::Vector;

use crate::describe::Describe;
use crate::error::DecimalError;
use crate::lob::{BinaryLob, TextLob};

/// A runtime value handed to the renderer.
///
/// Values are immutable and cheaply cloneable (O(1) for most variants).
/// Composite variants use persistent vectors with structural sharing, so a
/// value can be captured for rendering without copying its contents.
#[derive(Clone)]
pub enum Value {
    /// Absence of a value; rendered as the configured nil literal.
    Nil,
    /// Boolean value.
    Bool(bool),
    /// Single character; rendered quoted and escaped.
    Char(char),
    /// Signed integer (covers byte/short/int/long shapes).
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// Exact-precision decimal; always rendered in plain notation.
    Decimal(Decimal),
    /// String value.
    Str(Arc<str>),
    /// Calendar date.
    Date(NaiveDate),
    /// Time of day.
    Time(NaiveTime),
    /// Date plus time of day.
    Timestamp(NaiveDateTime),
    /// Byte array; rendered as hexadecimal pairs.
    Bytes(Arc<[u8]>),
    /// Typed array with a fixed element type.
    Array(ArrayValue),
    /// Optional-like container holding zero or one value.
    Optional(Option<Arc<Value>>),
    /// Named finite collection.
    Seq(SeqValue),
    /// Named key-to-value map with insertion-ordered entries.
    Map(MapValue),
    /// Binary large-object handle, materialized lazily at render time.
    Blob(Arc<dyn BinaryLob>),
    /// Text large-object handle, materialized lazily at render time.
    Clob(Arc<dyn TextLob>),
    /// Composite value rendered through its structural description.
    Object(Arc<dyn Describe>),
}

/// Element type descriptor for [`Value::Array`].
///
/// Array type names are computed by appending `[]` per dimension to the
/// innermost element name, so nested arrays carry a nested descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElemType {
    /// Boolean elements.
    Bool,
    /// Character elements; char arrays take the quoted-string rendering path.
    Char,
    /// Integer elements.
    Int,
    /// Floating-point elements.
    Float,
    /// Exact-precision decimal elements.
    Decimal,
    /// String elements.
    Str,
    /// Date elements.
    Date,
    /// Time-of-day elements.
    Time,
    /// Timestamp elements.
    Timestamp,
    /// Elements of a named composite type.
    Named(Arc<str>),
    /// Nested array elements (one per extra dimension).
    Array(Box<ElemType>),
}

impl ElemType {
    /// Creates a nested-array element type.
    #[must_use]
    pub fn array(elem: ElemType) -> Self {
        Self::Array(Box::new(elem))
    }

    /// Returns true if individual elements of this type never force the
    /// enclosing array onto multiple lines.
    #[must_use]
    pub fn is_single_line(&self) -> bool {
        !matches!(self, Self::Str | Self::Named(_) | Self::Array(_))
    }
}

impl fmt::Display for ElemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Char => write!(f, "char"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Decimal => write!(f, "decimal"),
            Self::Str => write!(f, "String"),
            Self::Date => write!(f, "Date"),
            Self::Time => write!(f, "Time"),
            Self::Timestamp => write!(f, "Timestamp"),
            Self::Named(name) => write!(f, "{name}"),
            Self::Array(elem) => write!(f, "{elem}[]"),
        }
    }
}

/// A typed array: element type plus items.
#[derive(Clone)]
pub struct ArrayValue {
    /// The element type; printed in the array's type annotation.
    pub elem: ElemType,
    /// The elements, in order.
    pub items: Vector<Value>,
}

impl ArrayValue {
    /// Creates an array value from an element type and items.
    #[must_use]
    pub fn new(elem: ElemType, items: impl IntoIterator<Item = Value>) -> Self {
        Self {
            elem,
            items: items.into_iter().collect(),
        }
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the array has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A named finite collection.
#[derive(Clone)]
pub struct SeqValue {
    /// The collection's type name (e.g. `Vec`, `HashSet`).
    pub name: Arc<str>,
    /// The elements, in iteration order.
    pub items: Vector<Value>,
}

impl SeqValue {
    /// Creates a sequence value from a type name and items.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, items: impl IntoIterator<Item = Value>) -> Self {
        Self {
            name: name.into(),
            items: items.into_iter().collect(),
        }
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the collection has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A named map with insertion-ordered entries.
#[derive(Clone)]
pub struct MapValue {
    /// The map's type name (e.g. `HashMap`, `BTreeMap`).
    pub name: Arc<str>,
    /// The entries, in iteration order.
    pub entries: Vector<(Value, Value)>,
}

impl MapValue {
    /// Creates a map value from a type name and entries.
    #[must_use]
    pub fn new(
        name: impl Into<Arc<str>>,
        entries: impl IntoIterator<Item = (Value, Value)>,
    ) -> Self {
        Self {
            name: name.into(),
            entries: entries.into_iter().collect(),
        }
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Value {
    /// Creates a string value.
    #[must_use]
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Self::Str(s.into())
    }

    /// Creates a typed array value.
    #[must_use]
    pub fn array(elem: ElemType, items: impl IntoIterator<Item = Value>) -> Self {
        Self::Array(ArrayValue::new(elem, items))
    }

    /// Creates a char array from the characters of a string.
    #[must_use]
    pub fn chars(s: &str) -> Self {
        Self::Array(ArrayValue::new(ElemType::Char, s.chars().map(Self::Char)))
    }

    /// Creates a byte-array value.
    #[must_use]
    pub fn bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::Bytes(bytes.into())
    }

    /// Creates a named collection value.
    #[must_use]
    pub fn seq(name: impl Into<Arc<str>>, items: impl IntoIterator<Item = Value>) -> Self {
        Self::Seq(SeqValue::new(name, items))
    }

    /// Creates a named map value.
    #[must_use]
    pub fn map(
        name: impl Into<Arc<str>>,
        entries: impl IntoIterator<Item = (Value, Value)>,
    ) -> Self {
        Self::Map(MapValue::new(name, entries))
    }

    /// Creates a present optional value.
    #[must_use]
    pub fn some(inner: Value) -> Self {
        Self::Optional(Some(Arc::new(inner)))
    }

    /// Creates an absent optional value.
    #[must_use]
    pub const fn none() -> Self {
        Self::Optional(None)
    }

    /// Wraps a structural description in a value.
    #[must_use]
    pub fn object(described: impl Describe + 'static) -> Self {
        Self::Object(Arc::new(described))
    }

    /// Returns true if this value is nil.
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Attempts to extract a boolean.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to extract an integer.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a float.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true if instances of this value's type are always rendered on
    /// a single line and never force an enclosing composite onto multiple
    /// lines (primitives, decimals, and temporal values).
    #[must_use]
    pub const fn is_single_line(&self) -> bool {
        matches!(
            self,
            Self::Nil
                | Self::Bool(_)
                | Self::Char(_)
                | Self::Int(_)
                | Self::Float(_)
                | Self::Decimal(_)
                | Self::Date(_)
                | Self::Time(_)
                | Self::Timestamp(_)
        )
    }

    /// Returns the runtime type name used for annotations.
    ///
    /// Array names append `[]` per dimension to the innermost element name.
    #[must_use]
    pub fn type_name(&self) -> String {
        match self {
            Self::Nil => "null".to_string(),
            Self::Bool(_) => "bool".to_string(),
            Self::Char(_) => "char".to_string(),
            Self::Int(_) => "int".to_string(),
            Self::Float(_) => "float".to_string(),
            Self::Decimal(_) => "decimal".to_string(),
            Self::Str(_) => "String".to_string(),
            Self::Date(_) => "Date".to_string(),
            Self::Time(_) => "Time".to_string(),
            Self::Timestamp(_) => "Timestamp".to_string(),
            Self::Bytes(_) => "byte[]".to_string(),
            Self::Array(a) => format!("{}[]", a.elem),
            Self::Optional(_) => "Optional".to_string(),
            Self::Seq(s) => s.name.to_string(),
            Self::Map(m) => m.name.to_string(),
            Self::Blob(_) => "Blob".to_string(),
            Self::Clob(_) => "Clob".to_string(),
            Self::Object(o) => o.type_name().to_string(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            // Bit equality so NaN compares equal to itself
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Decimal(a), Self::Decimal(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::Time(a), Self::Time(b)) => a == b,
            (Self::Timestamp(a), Self::Timestamp(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a.elem == b.elem && a.items == b.items,
            (Self::Optional(a), Self::Optional(b)) => a == b,
            (Self::Seq(a), Self::Seq(b)) => a.name == b.name && a.items == b.items,
            (Self::Map(a), Self::Map(b)) => a.name == b.name && a.entries == b.entries,
            // Handles and described objects compare by identity
            (Self::Blob(a), Self::Blob(b)) => Arc::ptr_eq(a, b),
            (Self::Clob(a), Self::Clob(b)) => Arc::ptr_eq(a, b),
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Char(c) => write!(f, "{c:?}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Date(d) => write!(f, "{d}"),
            Self::Time(t) => write!(f, "{t}"),
            Self::Timestamp(ts) => write!(f, "{ts}"),
            Self::Bytes(b) => write!(f, "Bytes(len={})", b.len()),
            Self::Array(a) => write!(f, "Array({}[], len={})", a.elem, a.len()),
            Self::Optional(None) => write!(f, "Optional(empty)"),
            Self::Optional(Some(v)) => write!(f, "Optional({v:?})"),
            Self::Seq(s) => write!(f, "Seq({}, len={})", s.name, s.len()),
            Self::Map(m) => write!(f, "Map({}, len={})", m.name, m.len()),
            Self::Blob(b) => write!(f, "Blob(len={})", b.len()),
            Self::Clob(c) => write!(f, "Clob(len={})", c.len()),
            Self::Object(o) => write!(f, "Object({})", o.type_name()),
        }
    }
}

// Convenience From implementations

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s.into())
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Self::Decimal(d)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<NaiveTime> for Value {
    fn from(t: NaiveTime) -> Self {
        Self::Time(t)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(ts: NaiveDateTime) -> Self {
        Self::Timestamp(ts)
    }
}

// =============================================================================
// Decimal
// =============================================================================

/// An exact-precision decimal held in plain (non-scientific) notation.
///
/// Parsing accepts an optional sign, digits with an optional fraction, and an
/// optional `e`/`E` exponent; the stored form is always plain text with the
/// fractional precision of the input preserved (`1.50e1` parses to `15.0`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Decimal(Arc<str>);

impl Decimal {
    /// Parses a decimal literal, normalizing to plain notation.
    ///
    /// # Errors
    ///
    /// Returns [`DecimalError::Malformed`] when the literal has no digits,
    /// contains non-digit characters, or carries an unparseable exponent.
    pub fn new(literal: &str) -> Result<Self, DecimalError> {
        literal.parse()
    }

    /// Returns the plain-notation text of this decimal.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Decimal {
    type Err = DecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || DecimalError::Malformed(s.to_string());

        let mut rest = s;
        let mut negative = false;
        if let Some(stripped) = rest.strip_prefix('-') {
            negative = true;
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix('+') {
            rest = stripped;
        }

        let (mantissa, exponent) = match rest.find(['e', 'E']) {
            Some(i) => {
                let exp: i32 = rest[i + 1..].parse().map_err(|_| malformed())?;
                (&rest[..i], exp)
            }
            None => (rest, 0),
        };

        let (int_part, frac_part) = match mantissa.find('.') {
            Some(i) => (&mantissa[..i], &mantissa[i + 1..]),
            None => (mantissa, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(malformed());
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(malformed());
        }

        let digits = format!("{int_part}{frac_part}");
        let frac_len = i64::try_from(frac_part.len()).map_err(|_| malformed())?;
        // digits * 10^-scale is the value; scale <= 0 means a whole number
        let scale = frac_len - i64::from(exponent);

        let mut plain = String::new();
        if negative && digits.bytes().any(|b| b != b'0') {
            plain.push('-');
        }
        if scale <= 0 {
            let whole = digits.trim_start_matches('0');
            if whole.is_empty() {
                plain.push('0');
            } else {
                plain.push_str(whole);
                for _ in 0..(-scale) {
                    plain.push('0');
                }
            }
        } else {
            let scale = usize::try_from(scale).map_err(|_| malformed())?;
            if digits.len() > scale {
                let (whole, frac) = digits.split_at(digits.len() - scale);
                let whole = whole.trim_start_matches('0');
                plain.push_str(if whole.is_empty() { "0" } else { whole });
                plain.push('.');
                plain.push_str(frac);
            } else {
                plain.push_str("0.");
                for _ in 0..(scale - digits.len()) {
                    plain.push('0');
                }
                plain.push_str(&digits);
            }
        }

        Ok(Self(plain.into()))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
