//! Toggleable sorting over mixed records.
//!
//! Run with: RUST_LOG=sortable_table=debug cargo run --example sorting

use std::error::Error;

use chrono::{TimeZone, Utc};
use sortable_table::{record, Collection, HostCollection, RecordMap, SortDirection, Value};
use tracing_subscriber::EnvFilter;

fn print(title: &str, rows: &[RecordMap]) {
    println!("{}:", title);
    for row in rows {
        let cell = |key: &str| row.get(key).map(Value::to_display_string).unwrap_or_default();
        println!(
            "  #{:<2} {:<8} {:>8} {}",
            cell("id"),
            cell("name"),
            cell("score"),
            cell("joined")
        );
    }
    println!();
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let joined = |y, m, d| Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).single();

    let mut players = Collection::new(vec![
        record!({ "id": 1, "name": "mallory", "score": 42, "joined": joined(2021, 3, 14) }),
        record!({ "id": 2, "name": "Alice", "score": Value::Null, "joined": joined(2019, 7, 1) }),
        record!({ "id": 3, "name": "bob", "score": 42, "joined": Value::Null }),
        record!({ "id": 4, "name": "Carol", "score": -3.5, "joined": joined(2023, 1, 9) }),
    ]);

    // first click on a column sorts ascending, names ignore case
    players.update_order("name", None)?;
    print("name asc", &players.to_records());

    // second click on the same column flips the direction
    players.update_order("name", None)?;
    print("name desc", &players.to_records());

    // missing scores sort as zero; equal scores fall back to id
    players.update_order("score", None)?;
    print("score asc", &players.to_records());

    players.update_order("joined", Some(SortDirection::Desc))?;
    print("joined desc", &players.to_records());

    // new records land in place
    players.push(record!({ "id": 5, "name": "dave", "score": 7, "joined": joined(2020, 5, 5) }));
    print("after push", &players.to_records());

    println!("sort state: {}", serde_json::to_string(&players.sort_state())?);

    Ok(())
}
