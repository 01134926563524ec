//! Column-driven formatting with built-in and custom types.
//!
//! Run with: cargo run --example formatting

use std::error::Error;

use chrono::{TimeZone, Utc};
use sortable_table::{
    record, ColumnSpec, ConvertError, FormatPipeline, NumberStyle, PipelineConfig, Separator,
    TypeSpec, Value,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let order = record!({
        "id": 17,
        "customer": "Ada",
        "total": 1234567.891,
        "discount": 0.125,
        "shipped": Utc.with_ymd_and_hms(2024, 2, 29, 16, 5, 0).single(),
        "delivered": Value::Null,
        "status": "paid",
    });

    // Built-in types with the default number style
    let pipeline = FormatPipeline::setup(
        PipelineConfig::new()
            .with_column("customer")
            .with_column(ColumnSpec::new("total").with_type("number"))
            .with_column(ColumnSpec::new("discount").with_type("percent").with_decimals(1))
            .with_column(
                ColumnSpec::new("shipped")
                    .with_type("date")
                    .with_format("dddd, MMMM Do YYYY [at] h:mm A"),
            )
            .with_column(ColumnSpec::new("delivered").with_type("date")),
    )?;
    println!("default style:\n{}\n", serde_json::to_string_pretty(&pipeline.format(order.clone())?)?);

    // Comma thousands, custom placeholder via the default type and a registered type
    let pipeline = FormatPipeline::setup(
        PipelineConfig::new()
            .with_columns(["total", "delivered"])
            .with_default_type(
                TypeSpec::new("number")
                    .with_decimals(0)
                    .with_placeholder("n/a"),
            )
            .with_number_style(NumberStyle::new().with_thousands(Separator::Comma))
            .with_column(ColumnSpec::new("status").with_type("badge"))
            .with_type("badge", |value: &Value, _: &ColumnSpec| {
                value
                    .as_str()
                    .map(|s| format!("[{}]", s.to_uppercase()))
                    .ok_or_else(|| ConvertError::new("badge needs text"))
            }),
    )?;
    println!("custom style:\n{}\n", serde_json::to_string_pretty(&pipeline.format(order)?)?);

    // An unknown type fails with the type name
    let broken = FormatPipeline::setup(
        PipelineConfig::new().with_column(ColumnSpec::new("total").with_type("currency")),
    )?;
    if let Err(e) = broken.format(record!({ "total": 3 })) {
        println!("error: {}", e);
    }

    Ok(())
}
