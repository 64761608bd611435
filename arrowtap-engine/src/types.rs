//! Source-side type descriptors and the nullable value model.

/// Column type descriptor as reported by the source engine.
///
/// `Numeric` carries its declared precision and scale; timezone awareness is
/// the distinction between [`SqlType::Timestamp`] and
/// [`SqlType::TimestampTz`]. `Other` covers tags the engine can report but
/// the converter has no mapping for; translating one fails with a schema
/// error naming the tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlType {
    SmallInt,
    Int,
    BigInt,
    /// 32-bit unsigned object identifier.
    Oid,
    Float,
    Double,
    Bytes,
    Geography,
    Varchar,
    Char,
    Text,
    Json,
    Bool,
    Date,
    Timestamp,
    TimestampTz,
    Interval,
    Time,
    Numeric { precision: u32, scale: u32 },
    /// A source tag outside the supported mapping, by name.
    Other(String),
}

/// One column of the cursor's result schema: name plus source type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceColumn {
    pub name: String,
    pub ty: SqlType,
}

impl SourceColumn {
    pub fn new(name: impl Into<String>, ty: SqlType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Interval value in the engine's component form.
///
/// The engine keeps calendar and clock components separate; the converter
/// packs them into Arrow's `{months, days, nanoseconds}` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceInterval {
    pub years: i32,
    pub months: i32,
    pub days: i32,
    pub hours: i32,
    pub minutes: i32,
    pub seconds: i32,
    pub microseconds: i32,
}

/// One nullable value as produced by the source engine.
///
/// Temporal payloads are raw: [`Value::Date`] is an unsigned Julian day
/// number, [`Value::Timestamp`]/[`Value::TimestampTz`] are unsigned
/// microsecond counts since the Julian epoch, [`Value::Time`] is
/// microseconds since midnight. [`Value::Numeric`] is the exact fixed-point
/// rendering at the column's declared (precision, scale), e.g. `"-12.30"`
/// for `numeric(4, 2)`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    SmallInt(i16),
    Int(i32),
    BigInt(i64),
    Oid(u32),
    Float(f32),
    Double(f64),
    Bytes(Vec<u8>),
    Text(String),
    Bool(bool),
    /// Unsigned Julian day number.
    Date(u32),
    /// Microseconds since the Julian epoch, no timezone.
    Timestamp(u64),
    /// Microseconds since the Julian epoch, instant in UTC.
    TimestampTz(u64),
    /// Microseconds since midnight.
    Time(i64),
    Interval(SourceInterval),
    /// Exact fixed-point string at the declared (precision, scale).
    Numeric(String),
}

impl Value {
    /// Whether this is the null marker.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short kind name used in conversion error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::SmallInt(_) => "small-int",
            Value::Int(_) => "int",
            Value::BigInt(_) => "big-int",
            Value::Oid(_) => "oid",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Bytes(_) => "bytes",
            Value::Text(_) => "text",
            Value::Bool(_) => "bool",
            Value::Date(_) => "date",
            Value::Timestamp(_) => "timestamp",
            Value::TimestampTz(_) => "timestamptz",
            Value::Time(_) => "time",
            Value::Interval(_) => "interval",
            Value::Numeric(_) => "numeric",
        }
    }
}

/// One row in cursor order.
pub type Row = Vec<Value>;

/// One native chunk of rows as grouped by the source engine.
pub type RowChunk = Vec<Row>;
