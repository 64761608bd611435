//! Per-column value writers: one appended element per source value.
//!
//! A [`ColumnWriter`] pairs one target field with one typed Arrow builder
//! for the duration of a single chunk build. Selection is a single
//! exhaustive match on the field's `DataType`, so adding a mapping without
//! a writer is a compile-time hole rather than a runtime surprise. All
//! fallible work happens before the builder is touched: a failed append
//! leaves value buffer and validity bitmap in lockstep.

use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanBuilder, Date32Builder, Decimal128Builder, Float32Builder, Float64Builder,
    Int16Builder, Int32Builder, Int64Builder, IntervalMonthDayNanoBuilder, LargeBinaryBuilder,
    LargeStringBuilder, Time64MicrosecondBuilder, TimestampMicrosecondBuilder, UInt32Builder,
};
use arrow::datatypes::{DataType, Field, IntervalMonthDayNanoType, IntervalUnit, TimeUnit};

use arrowtap_engine::{SourceInterval, Value};
use arrowtap_result::{Error, Result};

/// Julian day number of 1970-01-01.
const UNIX_EPOCH_JULIAN_DAY: i64 = 2_440_588;

/// Microseconds between the Julian epoch and the Unix epoch.
const UNIX_EPOCH_JULIAN_MICROS: i64 = UNIX_EPOCH_JULIAN_DAY * 86_400 * 1_000_000;

/// One column's converter for one chunk build.
///
/// Wraps the builder whose value buffer and validity bitmap back the column
/// in the batch under construction. Rebuilt fresh for every chunk.
pub(crate) enum ColumnWriter {
    Int16(Int16Builder),
    Int32(Int32Builder),
    Int64(Int64Builder),
    UInt32(UInt32Builder),
    Float32(Float32Builder),
    Float64(Float64Builder),
    Binary(LargeBinaryBuilder),
    Utf8(LargeStringBuilder),
    Bool(BooleanBuilder),
    Date32(Date32Builder),
    Timestamp {
        builder: TimestampMicrosecondBuilder,
        zoned: bool,
    },
    Interval(IntervalMonthDayNanoBuilder),
    Time64(Time64MicrosecondBuilder),
    Decimal {
        builder: Decimal128Builder,
        precision: u8,
    },
}

impl ColumnWriter {
    /// Select the writer for a translated field.
    ///
    /// Keyed by the target `DataType`; the translator only produces types
    /// this match covers.
    pub(crate) fn for_field(field: &Field, capacity: usize) -> Result<Self> {
        let writer = match field.data_type() {
            DataType::Int16 => ColumnWriter::Int16(Int16Builder::with_capacity(capacity)),
            DataType::Int32 => ColumnWriter::Int32(Int32Builder::with_capacity(capacity)),
            DataType::Int64 => ColumnWriter::Int64(Int64Builder::with_capacity(capacity)),
            DataType::UInt32 => ColumnWriter::UInt32(UInt32Builder::with_capacity(capacity)),
            DataType::Float32 => ColumnWriter::Float32(Float32Builder::with_capacity(capacity)),
            DataType::Float64 => ColumnWriter::Float64(Float64Builder::with_capacity(capacity)),
            DataType::LargeBinary => {
                ColumnWriter::Binary(LargeBinaryBuilder::with_capacity(capacity, capacity * 8))
            }
            DataType::LargeUtf8 => {
                ColumnWriter::Utf8(LargeStringBuilder::with_capacity(capacity, capacity * 8))
            }
            DataType::Boolean => ColumnWriter::Bool(BooleanBuilder::with_capacity(capacity)),
            DataType::Date32 => ColumnWriter::Date32(Date32Builder::with_capacity(capacity)),
            DataType::Timestamp(TimeUnit::Microsecond, tz) => ColumnWriter::Timestamp {
                builder: TimestampMicrosecondBuilder::with_capacity(capacity)
                    .with_data_type(field.data_type().clone()),
                zoned: tz.is_some(),
            },
            DataType::Interval(IntervalUnit::MonthDayNano) => {
                ColumnWriter::Interval(IntervalMonthDayNanoBuilder::with_capacity(capacity))
            }
            DataType::Time64(TimeUnit::Microsecond) => {
                ColumnWriter::Time64(Time64MicrosecondBuilder::with_capacity(capacity))
            }
            DataType::Decimal128(precision, _) => ColumnWriter::Decimal {
                builder: Decimal128Builder::with_capacity(capacity)
                    .with_data_type(field.data_type().clone()),
                precision: *precision,
            },
            other => {
                return Err(Error::Schema(format!(
                    "no column writer for Arrow type {other}"
                )));
            }
        };
        Ok(writer)
    }

    /// Append one value (or null) to the column.
    ///
    /// Nulls take a uniform path that never enters the type-specific decode.
    /// A type mismatch or a decode failure returns without touching the
    /// builder.
    pub(crate) fn append(&mut self, column: &str, value: &Value) -> Result<()> {
        if value.is_null() {
            self.append_null();
            return Ok(());
        }

        match (self, value) {
            (ColumnWriter::Int16(b), Value::SmallInt(v)) => b.append_value(*v),
            (ColumnWriter::Int32(b), Value::Int(v)) => b.append_value(*v),
            (ColumnWriter::Int64(b), Value::BigInt(v)) => b.append_value(*v),
            (ColumnWriter::UInt32(b), Value::Oid(v)) => b.append_value(*v),
            (ColumnWriter::Float32(b), Value::Float(v)) => b.append_value(*v),
            (ColumnWriter::Float64(b), Value::Double(v)) => b.append_value(*v),
            (ColumnWriter::Binary(b), Value::Bytes(v)) => b.append_value(v),
            (ColumnWriter::Utf8(b), Value::Text(v)) => b.append_value(v),
            (ColumnWriter::Bool(b), Value::Bool(v)) => b.append_value(*v),
            (ColumnWriter::Date32(b), Value::Date(julian)) => {
                b.append_value(rebase_julian_day(*julian)?)
            }
            (
                ColumnWriter::Timestamp {
                    builder,
                    zoned: false,
                },
                Value::Timestamp(raw),
            ) => builder.append_value(rebase_julian_micros(*raw)?),
            (
                ColumnWriter::Timestamp {
                    builder,
                    zoned: true,
                },
                Value::TimestampTz(raw),
            ) => builder.append_value(rebase_julian_micros(*raw)?),
            (ColumnWriter::Time64(b), Value::Time(micros)) => b.append_value(*micros),
            (ColumnWriter::Interval(b), Value::Interval(iv)) => {
                let (months, days, nanos) = pack_interval(iv);
                b.append_value(IntervalMonthDayNanoType::make_value(months, days, nanos));
            }
            (
                ColumnWriter::Decimal { builder, precision },
                Value::Numeric(text),
            ) => {
                let unscaled = decode_decimal(column, text, *precision)?;
                builder.append_value(unscaled);
            }
            (writer, value) => {
                return Err(Error::conversion(
                    column,
                    value.kind(),
                    format!("column holds {} values", writer.kind()),
                ));
            }
        }
        Ok(())
    }

    fn append_null(&mut self) {
        match self {
            ColumnWriter::Int16(b) => b.append_null(),
            ColumnWriter::Int32(b) => b.append_null(),
            ColumnWriter::Int64(b) => b.append_null(),
            ColumnWriter::UInt32(b) => b.append_null(),
            ColumnWriter::Float32(b) => b.append_null(),
            ColumnWriter::Float64(b) => b.append_null(),
            ColumnWriter::Binary(b) => b.append_null(),
            ColumnWriter::Utf8(b) => b.append_null(),
            ColumnWriter::Bool(b) => b.append_null(),
            ColumnWriter::Date32(b) => b.append_null(),
            ColumnWriter::Timestamp { builder, .. } => builder.append_null(),
            ColumnWriter::Interval(b) => b.append_null(),
            ColumnWriter::Time64(b) => b.append_null(),
            ColumnWriter::Decimal { builder, .. } => builder.append_null(),
        }
    }

    /// Finalize the column into an immutable array.
    pub(crate) fn finish(&mut self) -> ArrayRef {
        match self {
            ColumnWriter::Int16(b) => Arc::new(b.finish()),
            ColumnWriter::Int32(b) => Arc::new(b.finish()),
            ColumnWriter::Int64(b) => Arc::new(b.finish()),
            ColumnWriter::UInt32(b) => Arc::new(b.finish()),
            ColumnWriter::Float32(b) => Arc::new(b.finish()),
            ColumnWriter::Float64(b) => Arc::new(b.finish()),
            ColumnWriter::Binary(b) => Arc::new(b.finish()),
            ColumnWriter::Utf8(b) => Arc::new(b.finish()),
            ColumnWriter::Bool(b) => Arc::new(b.finish()),
            ColumnWriter::Date32(b) => Arc::new(b.finish()),
            ColumnWriter::Timestamp { builder, .. } => Arc::new(builder.finish()),
            ColumnWriter::Interval(b) => Arc::new(b.finish()),
            ColumnWriter::Time64(b) => Arc::new(b.finish()),
            ColumnWriter::Decimal { builder, .. } => Arc::new(builder.finish()),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ColumnWriter::Int16(_) => "small-int",
            ColumnWriter::Int32(_) => "int",
            ColumnWriter::Int64(_) => "big-int",
            ColumnWriter::UInt32(_) => "oid",
            ColumnWriter::Float32(_) => "float",
            ColumnWriter::Float64(_) => "double",
            ColumnWriter::Binary(_) => "bytes",
            ColumnWriter::Utf8(_) => "text",
            ColumnWriter::Bool(_) => "bool",
            ColumnWriter::Date32(_) => "date",
            ColumnWriter::Timestamp { zoned: false, .. } => "timestamp",
            ColumnWriter::Timestamp { zoned: true, .. } => "timestamptz",
            ColumnWriter::Interval(_) => "interval",
            ColumnWriter::Time64(_) => "time",
            ColumnWriter::Decimal { .. } => "numeric",
        }
    }
}

/// Rebase an unsigned Julian day number onto days since 1970-01-01.
fn rebase_julian_day(julian: u32) -> Result<i32> {
    if julian > i32::MAX as u32 {
        return Err(Error::Range(format!(
            "julian day {julian} exceeds the signed 32-bit day range"
        )));
    }
    Ok(julian as i32 - UNIX_EPOCH_JULIAN_DAY as i32)
}

/// Rebase unsigned microseconds since the Julian epoch onto the Unix epoch.
fn rebase_julian_micros(raw: u64) -> Result<i64> {
    let raw = i64::try_from(raw).map_err(|_| {
        Error::Range(format!(
            "timestamp {raw} exceeds the signed 64-bit microsecond range"
        ))
    })?;
    Ok(raw - UNIX_EPOCH_JULIAN_MICROS)
}

/// Collapse the engine's interval components into Arrow's
/// `{months, days, nanoseconds}` triple.
fn pack_interval(iv: &SourceInterval) -> (i32, i32, i64) {
    const NANOS_PER_SECOND: i64 = 1_000_000_000;
    const NANOS_PER_MICRO: i64 = 1_000;

    let months = iv.years * 12 + iv.months;
    let seconds = (i64::from(iv.hours) * 60 + i64::from(iv.minutes)) * 60 + i64::from(iv.seconds);
    let nanos = seconds * NANOS_PER_SECOND + i64::from(iv.microseconds) * NANOS_PER_MICRO;
    (months, iv.days, nanos)
}

/// Decode an exact fixed-point rendering into an unscaled 128-bit integer.
///
/// The engine prints numerics at the column's declared scale, so stripping
/// the decimal point yields the unscaled digit string. Magnitudes needing
/// more than `precision` digits are rejected.
fn decode_decimal(column: &str, text: &str, precision: u8) -> Result<i128> {
    if text.bytes().filter(|b| *b == b'.').count() > 1 {
        return Err(Error::conversion(
            column,
            "numeric",
            format!("malformed fixed-point literal {text:?}"),
        ));
    }

    let unscaled: String = text.chars().filter(|c| *c != '.').collect();
    let value: i128 = unscaled.parse().map_err(|_| {
        Error::conversion(
            column,
            "numeric",
            format!("malformed fixed-point literal {text:?}"),
        )
    })?;

    // precision <= 38 here, and 10^38 < i128::MAX.
    let limit = 10_i128.pow(u32::from(precision));
    if value <= -limit || value >= limit {
        return Err(Error::conversion(
            column,
            "numeric",
            format!("{text} does not fit in {precision} digits"),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, Date32Array, Decimal128Array, TimestampMicrosecondArray};

    fn writer_for(data_type: DataType) -> ColumnWriter {
        ColumnWriter::for_field(&Field::new("c", data_type, true), 8).expect("writer")
    }

    #[test]
    fn unix_epoch_julian_day_rebases_to_zero() {
        let mut w = writer_for(DataType::Date32);
        w.append("c", &Value::Date(2_440_588)).expect("append");
        w.append("c", &Value::Date(2_440_589)).expect("append");
        let array = w.finish();
        let days = array.as_any().downcast_ref::<Date32Array>().expect("date32");
        assert_eq!(days.value(0), 0);
        assert_eq!(days.value(1), 1);
    }

    #[test]
    fn julian_day_beyond_i32_is_a_range_error() {
        let mut w = writer_for(DataType::Date32);
        let err = w
            .append("c", &Value::Date(i32::MAX as u32 + 1))
            .expect_err("out of range");
        assert!(matches!(err, Error::Range(_)));
    }

    #[test]
    fn unix_epoch_julian_micros_rebase_to_zero() {
        let raw = 2_440_588u64 * 86_400 * 1_000_000;
        let mut w = writer_for(DataType::Timestamp(TimeUnit::Microsecond, None));
        w.append("c", &Value::Timestamp(raw)).expect("append");
        let array = w.finish();
        let micros = array
            .as_any()
            .downcast_ref::<TimestampMicrosecondArray>()
            .expect("timestamp");
        assert_eq!(micros.value(0), 0);
    }

    #[test]
    fn timestamp_beyond_i64_is_a_range_error() {
        let mut w = writer_for(DataType::Timestamp(TimeUnit::Microsecond, None));
        let err = w
            .append("c", &Value::Timestamp(u64::MAX))
            .expect_err("out of range");
        assert!(matches!(err, Error::Range(_)));
    }

    #[test]
    fn zoned_writer_rejects_naive_values() {
        let mut w = writer_for(DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())));
        let err = w
            .append("ts", &Value::Timestamp(0))
            .expect_err("naive into zoned");
        assert!(matches!(err, Error::Conversion { .. }));
    }

    #[test]
    fn interval_components_collapse_to_month_day_nano() {
        let iv = SourceInterval {
            years: 1,
            months: 2,
            days: 3,
            hours: 4,
            minutes: 5,
            seconds: 6,
            microseconds: 7,
        };
        let (months, days, nanos) = pack_interval(&iv);
        assert_eq!(months, 14);
        assert_eq!(days, 3);
        assert_eq!(nanos, ((4 * 60 + 5) * 60 + 6) * 1_000_000_000 + 7_000);
    }

    #[test]
    fn decimal_strings_decode_to_unscaled_i128() {
        let mut w = writer_for(DataType::Decimal128(10, 2));
        w.append("amount", &Value::Numeric("12345.67".into()))
            .expect("append");
        w.append("amount", &Value::Numeric("-0.05".into()))
            .expect("append");
        let array = w.finish();
        let decimals = array
            .as_any()
            .downcast_ref::<Decimal128Array>()
            .expect("decimal128");
        assert_eq!(decimals.value(0), 1_234_567);
        assert_eq!(decimals.value(1), -5);
        assert_eq!(decimals.precision(), 10);
        assert_eq!(decimals.scale(), 2);
    }

    #[test]
    fn decimal_overflowing_declared_precision_fails() {
        let mut w = writer_for(DataType::Decimal128(4, 2));
        let err = w
            .append("amount", &Value::Numeric("123.45".into()))
            .expect_err("5 digits in 4");
        assert!(matches!(err, Error::Conversion { .. }));
    }

    #[test]
    fn malformed_decimal_string_fails_cleanly() {
        let mut w = writer_for(DataType::Decimal128(10, 2));
        for bad in ["", "1.2.3", "12a.00"] {
            let err = w
                .append("amount", &Value::Numeric(bad.into()))
                .expect_err("malformed");
            assert!(matches!(err, Error::Conversion { .. }));
        }
        // Failed appends must not have grown the column.
        assert_eq!(w.finish().len(), 0);
    }

    #[test]
    fn null_appends_unset_validity_without_decoding() {
        // A null never reaches the decode path, so a writer whose decode
        // would reject every non-null payload still accepts it.
        let types = [
            DataType::Int16,
            DataType::UInt32,
            DataType::LargeUtf8,
            DataType::Date32,
            DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
            DataType::Interval(IntervalUnit::MonthDayNano),
            DataType::Decimal128(10, 2),
        ];
        for data_type in types {
            let mut w = writer_for(data_type);
            w.append("c", &Value::Null).expect("null append");
            let array = w.finish();
            assert_eq!(array.len(), 1);
            assert!(array.is_null(0));
        }
    }

    #[test]
    fn mismatched_value_kind_is_a_conversion_error() {
        let mut w = writer_for(DataType::Int64);
        let err = w
            .append("id", &Value::Text("not a number".into()))
            .expect_err("text into big-int");
        match err {
            Error::Conversion { column, kind, .. } => {
                assert_eq!(column, "id");
                assert_eq!(kind, "text");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(w.finish().len(), 0);
    }
}
