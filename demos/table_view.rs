//! A table view wired to a host view: header clicks, filtering and snapshots.
//!
//! Run with: RUST_LOG=debug cargo run --example table_view

use std::error::Error;

use sortable_table::{
    record, Collection, HeaderEvents, PipelineConfig, TableView, ViewOptions,
};
use tracing_subscriber::EnvFilter;

/// Stands in for a rendered table; records which header selectors are live.
#[derive(Debug, Default)]
struct ConsoleView {
    bound: Vec<String>,
}

impl HeaderEvents for ConsoleView {
    fn unbind_header_clicks(&mut self, selectors: &str) {
        self.bound.retain(|s| s != selectors);
    }

    fn bind_header_clicks(&mut self, selectors: &str) {
        println!("listening for clicks on: {}", selectors);
        self.bound.push(selectors.to_string());
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = PipelineConfig::from_json(
        r#"{
            "columns": [
                "city",
                { "property": "population", "type": "number", "decimals": 0 },
                { "property": "growth", "type": "percent", "decimals": 2 }
            ],
            "defaultType": { "type": "string", "noValuePlaceholder": "?" },
            "numberStyle": { "thousands": "apostrophe" }
        }"#,
    )?;

    let cities = Collection::new(vec![
        record!({ "id": "zrh", "city": "Zürich", "population": 421878, "growth": 0.0112 }),
        record!({ "id": "gva", "city": "geneva", "population": 203856, "growth": None::<f64> }),
        record!({ "id": "bsl", "city": "Basel", "population": 173863, "growth": -0.0021 }),
        record!({ "id": "brn", "city": "Bern", "population": 134794, "growth": 0.0087 }),
    ]);

    let mut table = TableView::setup(
        ViewOptions::new(cities)
            .with_pipeline(config)
            .with_view(ConsoleView::default()),
    )?;

    for header in ["population", "population", "city"] {
        table.on_click_header(header)?;
        println!("\nclicked {}:", header);
        for row in table.rows()? {
            println!("  {}", serde_json::to_string(&row)?);
        }
    }

    table.on_key_up_filter("BE");
    println!("\nsnapshot:\n{}", serde_json::to_string_pretty(&table.to_json()?)?);

    Ok(())
}
