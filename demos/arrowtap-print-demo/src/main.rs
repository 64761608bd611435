//! Stream a canned query through the conversion core and print the batches.

use std::path::Path;

use arrow::util::pretty::pretty_format_batches;
use arrowtap_engine::{ProcessParams, SourceColumn, SqlType, Value};
use arrowtap_result::Result;
use arrowtap_test_utils::FixtureEngine;

fn spaceship_engine() -> FixtureEngine {
    let columns = vec![
        SourceColumn::new("name", SqlType::Text),
        SourceColumn::new("crew", SqlType::Int),
        SourceColumn::new(
            "tonnage",
            SqlType::Numeric {
                precision: 10,
                scale: 2,
            },
        ),
        SourceColumn::new("commissioned", SqlType::Date),
        SourceColumn::new("active", SqlType::Bool),
    ];

    // Julian day 2460311 is 2024-01-01.
    let rows = vec![
        vec![
            Value::Text("Resolute".into()),
            Value::Int(212),
            Value::Numeric("18250.50".into()),
            Value::Date(2_460_311),
            Value::Bool(true),
        ],
        vec![
            Value::Text("Meridian".into()),
            Value::Int(96),
            Value::Null,
            Value::Date(2_459_946),
            Value::Bool(true),
        ],
        vec![
            Value::Text("Daybreak".into()),
            Value::Int(148),
            Value::Numeric("9075.25".into()),
            Value::Date(2_457_389),
            Value::Bool(false),
        ],
    ];

    FixtureEngine::new(columns, rows).with_native_chunk_rows(2)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let engine = spaceship_engine();
    let mut handle = arrowtap_stream::read_from_query(
        &engine,
        Path::new("spaceship.db"),
        "SELECT * FROM spaceship",
        ProcessParams::new(),
        0,
    )?;

    let schema = handle.schema()?;
    println!("Result schema:");
    for field in schema.fields() {
        println!("    {} :: {}", field.name(), field.data_type());
    }

    let mut batches = Vec::new();
    while let Some(batch) = handle.next_batch()? {
        println!(
            "chunk {}: {} rows",
            batches.len(),
            batch.num_rows()
        );
        batches.push(batch);
    }

    println!("{}", pretty_format_batches(&batches)?);

    handle.release()?;
    println!("The connection to the source has been closed.");
    Ok(())
}
