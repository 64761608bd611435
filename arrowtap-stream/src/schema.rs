//! Source schema to Arrow schema translation.

use std::sync::Arc;

use arrow::datatypes::{DataType, Field, IntervalUnit, Schema, SchemaRef, TimeUnit};
use rustc_hash::FxHashMap;

use arrowtap_engine::{SourceColumn, SqlType};
use arrowtap_result::{Error, Result};

/// Exclusive upper bound on decimal precision and scale: `Decimal128`
/// carries at most 38 significant digits.
pub const NUMERIC_DIGIT_LIMIT: u32 = 39;

/// Map one source type to its Arrow target.
///
/// Strings become `LargeUtf8` and byte payloads `LargeBinary` so a single
/// chunk can exceed 2 GiB of variable-length data without offset overflow.
pub fn target_type(ty: &SqlType) -> Result<DataType> {
    let data_type = match ty {
        SqlType::SmallInt => DataType::Int16,
        SqlType::Int => DataType::Int32,
        SqlType::BigInt => DataType::Int64,
        SqlType::Oid => DataType::UInt32,
        SqlType::Float => DataType::Float32,
        SqlType::Double => DataType::Float64,
        SqlType::Geography | SqlType::Bytes => DataType::LargeBinary,
        SqlType::Varchar | SqlType::Char | SqlType::Text | SqlType::Json => DataType::LargeUtf8,
        SqlType::Bool => DataType::Boolean,
        SqlType::Date => DataType::Date32,
        SqlType::Timestamp => DataType::Timestamp(TimeUnit::Microsecond, None),
        SqlType::TimestampTz => DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
        SqlType::Interval => DataType::Interval(IntervalUnit::MonthDayNano),
        SqlType::Time => DataType::Time64(TimeUnit::Microsecond),
        SqlType::Numeric { precision, scale } => {
            if *precision >= NUMERIC_DIGIT_LIMIT || *scale >= NUMERIC_DIGIT_LIMIT {
                return Err(Error::PrecisionRange {
                    precision: *precision,
                    scale: *scale,
                });
            }
            DataType::Decimal128(*precision as u8, *scale as i8)
        }
        SqlType::Other(name) => {
            return Err(Error::Schema(format!("source type {name} has no Arrow mapping")));
        }
    };
    Ok(data_type)
}

/// Translate the cursor's column metadata into an Arrow schema.
///
/// Every field is nullable. Duplicate column names are never merged: the
/// first occurrence keeps its name, the k-th repeat is renamed `name_k`.
/// Renaming depends only on first-seen order, so rebuilding from identical
/// metadata produces an identical schema.
pub fn translate_schema(columns: &[SourceColumn]) -> Result<SchemaRef> {
    let mut seen: FxHashMap<&str, usize> = FxHashMap::default();
    let mut fields = Vec::with_capacity(columns.len());

    for column in columns {
        let occurrences = seen.entry(column.name.as_str()).or_insert(0);
        let name = if *occurrences == 0 {
            column.name.clone()
        } else {
            format!("{}_{}", column.name, occurrences)
        };
        *occurrences += 1;

        let data_type = target_type(&column.ty)
            .map_err(|err| match err {
                Error::Schema(msg) => {
                    Error::Schema(format!("column {}: {msg}", column.name))
                }
                other => other,
            })?;
        fields.push(Field::new(name, data_type, true));
    }

    Ok(Arc::new(Schema::new(fields)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(name: &str, ty: SqlType) -> SourceColumn {
        SourceColumn::new(name, ty)
    }

    #[test]
    fn maps_every_supported_tag() {
        let cases = [
            (SqlType::SmallInt, DataType::Int16),
            (SqlType::Int, DataType::Int32),
            (SqlType::BigInt, DataType::Int64),
            (SqlType::Oid, DataType::UInt32),
            (SqlType::Float, DataType::Float32),
            (SqlType::Double, DataType::Float64),
            (SqlType::Geography, DataType::LargeBinary),
            (SqlType::Bytes, DataType::LargeBinary),
            (SqlType::Varchar, DataType::LargeUtf8),
            (SqlType::Char, DataType::LargeUtf8),
            (SqlType::Text, DataType::LargeUtf8),
            (SqlType::Json, DataType::LargeUtf8),
            (SqlType::Bool, DataType::Boolean),
            (SqlType::Date, DataType::Date32),
            (
                SqlType::Timestamp,
                DataType::Timestamp(TimeUnit::Microsecond, None),
            ),
            (
                SqlType::TimestampTz,
                DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
            ),
            (
                SqlType::Interval,
                DataType::Interval(IntervalUnit::MonthDayNano),
            ),
            (SqlType::Time, DataType::Time64(TimeUnit::Microsecond)),
            (
                SqlType::Numeric {
                    precision: 10,
                    scale: 2,
                },
                DataType::Decimal128(10, 2),
            ),
        ];

        for (source, expected) in cases {
            assert_eq!(target_type(&source).expect("mapped"), expected);
        }
    }

    #[test]
    fn unknown_tag_is_a_schema_error() {
        let err = translate_schema(&[col("geo", SqlType::Other("tdesph".into()))])
            .expect_err("must fail");
        assert!(matches!(err, Error::Schema(msg) if msg.contains("tdesph") && msg.contains("geo")));
    }

    #[test]
    fn numeric_38_is_accepted_39_is_not() {
        assert_eq!(
            target_type(&SqlType::Numeric {
                precision: 38,
                scale: 0
            })
            .expect("38 digits fit"),
            DataType::Decimal128(38, 0)
        );

        let err = target_type(&SqlType::Numeric {
            precision: 39,
            scale: 0,
        })
        .expect_err("39 digits must not fit");
        assert!(matches!(
            err,
            Error::PrecisionRange {
                precision: 39,
                scale: 0
            }
        ));

        let err = target_type(&SqlType::Numeric {
            precision: 10,
            scale: 39,
        })
        .expect_err("39-digit scale must not fit");
        assert!(matches!(err, Error::PrecisionRange { .. }));
    }

    #[test]
    fn duplicate_names_get_positional_suffixes() {
        let schema = translate_schema(&[
            col("value", SqlType::Int),
            col("value", SqlType::Text),
            col("other", SqlType::Bool),
            col("value", SqlType::Double),
        ])
        .expect("translate");

        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(names, ["value", "value_1", "other", "value_2"]);
    }

    #[test]
    fn identical_metadata_translates_identically() {
        let columns = [
            col("id", SqlType::BigInt),
            col("ts", SqlType::TimestampTz),
            col(
                "amount",
                SqlType::Numeric {
                    precision: 10,
                    scale: 2,
                },
            ),
        ];
        let a = translate_schema(&columns).expect("first");
        let b = translate_schema(&columns).expect("second");
        assert_eq!(a, b);
    }

    #[test]
    fn all_fields_are_nullable() {
        let schema =
            translate_schema(&[col("id", SqlType::Int), col("name", SqlType::Text)]).expect("ok");
        assert!(schema.fields().iter().all(|f| f.is_nullable()));
    }
}
