//! # sortable_table
//!
//! Toggleable, type-aware sorting and column-driven value formatting for table views.
//!
//! ## What's inside?
//!
//! - **[`SortController`]**: owns a collection's sort attribute and direction.
//!   Sorting on the same attribute twice flips the direction; the comparator
//!   ignores string case, coerces missing values and breaks ties by record `id`,
//!   so repeated sorts never reshuffle equal rows.
//! - **[`FormatPipeline`]**: turns raw record attributes into display strings,
//!   dispatching on each column's type through an extensible [`TypeRegistry`]
//!   (`string`, `number`, `percent` and `date` built in).
//! - **[`TableView`]**: glue pairing a host collection with a pipeline, routing
//!   header clicks into sorting and producing a serializable [`TableSnapshot`].
//!
//! ## Quick Start
//!
//! ```rust
//! use sortable_table::{record, Collection, ColumnSpec, NoView, TableView, ViewOptions};
//!
//! let collection = Collection::new(vec![
//!     record!({ "id": 1, "name": "Bob", "amount": 1234.5 }),
//!     record!({ "id": 2, "name": "alice", "amount": None::<f64> }),
//! ]);
//!
//! let mut table = TableView::setup(
//!     ViewOptions::new(collection)
//!         .with_column("name")
//!         .with_column(ColumnSpec::new("amount").with_type("number").with_decimals(1))
//!         .with_view(NoView),
//! )
//! .unwrap();
//!
//! table.on_click_header("name").unwrap();
//!
//! let snapshot = table.to_json().unwrap();
//! let amounts: Vec<_> = snapshot
//!     .rows
//!     .iter()
//!     .filter_map(|row| row.get("amount").and_then(|v| v.as_str()))
//!     .collect();
//! assert_eq!(amounts, ["---", "1 234.5"]);
//! ```
//!
//! ## Errors
//!
//! Every failure is returned to the immediate caller as an [`Error`]; nothing
//! is retried or swallowed. See the [`error`] module.
//!
//! ## Logging
//!
//! State transitions (order updates, pipeline setup, converter failures) are
//! emitted as `tracing` events at `debug` level. The crate installs no subscriber.

pub mod collection;
pub mod converters;
pub mod error;
pub mod format;
pub mod macros;
pub mod map;
pub mod options;
pub mod record;
pub mod sort;
pub mod value;
pub mod view;

pub use collection::{Collection, HostCollection};
pub use error::{ConvertError, Error, Result};
pub use format::{
    ColumnSpec, Converter, DefaultType, FormatPipeline, PipelineConfig, TypeRegistry, TypeSpec,
};
pub use map::RecordMap;
pub use options::{NumberStyle, Separator};
pub use record::Record;
pub use sort::{compare_values, SortController, SortDirection, SortState};
pub use value::{Number, Value, ValueKind};
pub use view::{HeaderEvents, NoView, TableSnapshot, TableView, ViewOptions};

/// Sorts records in place by `attribute` in the given direction.
///
/// A one-shot shortcut for a fresh [`SortController`].
///
/// # Errors
///
/// Returns [`Error::Argument`] if `attribute` is empty.
///
/// # Examples
///
/// ```rust
/// use sortable_table::{record, sort_by, SortDirection};
///
/// let mut rows = vec![record!({ "id": 1, "n": 2 }), record!({ "id": 2, "n": 10 })];
/// sort_by(&mut rows, "n", SortDirection::Desc).unwrap();
/// assert_eq!(rows[0].get("n").and_then(|v| v.as_i64()), Some(10));
/// ```
pub fn sort_by<R: Record>(records: &mut [R], attribute: &str, direction: SortDirection) -> Result<()> {
    let mut controller = SortController::new();
    controller.update_order(attribute, Some(direction))?;
    controller.sort(records);
    Ok(())
}

/// Formats one record with the given columns and the built-in converters.
///
/// # Errors
///
/// Returns [`Error::FormatterNotFound`] if a column type has no built-in converter.
///
/// # Examples
///
/// ```rust
/// use sortable_table::{format_record, record, ColumnSpec, Value};
///
/// let row = format_record(
///     record!({ "share": 0.125 }),
///     [ColumnSpec::new("share").with_type("percent").with_decimals(1)],
/// )
/// .unwrap();
/// assert_eq!(row.get("share"), Some(&Value::from("12.5%")));
/// ```
pub fn format_record<I, C>(record: RecordMap, columns: I) -> Result<RecordMap>
where
    I: IntoIterator<Item = C>,
    C: Into<ColumnSpec>,
{
    FormatPipeline::setup(PipelineConfig::new().with_columns(columns))?.format(record)
}
