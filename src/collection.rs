//! Host collections the table view reads from.
//!
//! [`HostCollection`] is the interface the view consumes. Sorting and filtering
//! are optional capabilities with defaults that describe a plain list. [`Collection`]
//! is a ready-made host backed by a `Vec` and a [`SortController`].

use tracing::debug;

use crate::{Error, Record, RecordMap, Result, SortController, SortDirection, SortState};

/// The collection side of a table view.
pub trait HostCollection {
    /// Returns every record as a plain mapping, in the current order.
    fn to_records(&self) -> Vec<RecordMap>;

    /// Returns the sort state, or `None` when the collection cannot sort.
    fn sort_state(&self) -> Option<SortState> {
        None
    }

    /// Updates the sort attribute and direction, then re-sorts the records.
    ///
    /// A header click goes through this call alone, so sortable
    /// implementations must leave the records in the new order.
    ///
    /// # Errors
    ///
    /// The default implementation fails with [`Error::Setup`]; sortable
    /// collections return [`Error::Argument`] for an empty attribute.
    fn update_order(&mut self, attribute: &str, direction: Option<SortDirection>) -> Result<()> {
        let _ = (attribute, direction);
        Err(Error::setup("collection does not support sorting"))
    }

    /// Re-sorts the records with the current state.
    fn sort(&mut self) {}

    /// Returns the active filter text, if filtering has been requested.
    fn filter_string(&self) -> Option<&str> {
        None
    }

    /// Returns the records matching the active filter.
    fn filtered(&self) -> Vec<RecordMap> {
        self.to_records()
    }

    /// Sets the filter text.
    fn set_filter(&mut self, filter: &str) {
        let _ = filter;
    }

    /// Returns `true` if the collection exposes a sort state.
    fn is_sortable(&self) -> bool {
        self.sort_state().is_some()
    }
}

/// A sortable, filterable collection of records.
///
/// # Examples
///
/// ```rust
/// use sortable_table::{record, Collection, HostCollection};
///
/// let mut people = Collection::new(vec![
///     record!({ "id": 1, "name": "Bob" }),
///     record!({ "id": 2, "name": "alice" }),
/// ]);
///
/// people.update_order("name", None).unwrap();
/// let first = &people.records()[0];
/// assert_eq!(first.get("name").and_then(|v| v.as_str()), Some("alice"));
///
/// people.set_filter("BO");
/// assert_eq!(people.filtered().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Collection<R> {
    records: Vec<R>,
    controller: SortController,
    filter: Option<String>,
}

impl<R: Record> Collection<R> {
    /// Creates an unsorted, unfiltered collection.
    #[must_use]
    pub fn new(records: Vec<R>) -> Self {
        Collection {
            records,
            controller: SortController::new(),
            filter: None,
        }
    }

    /// Returns the records in their current order.
    #[must_use]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    #[must_use]
    pub fn controller(&self) -> &SortController {
        &self.controller
    }

    /// Adds a record at the position the current sort gives it.
    pub fn push(&mut self, record: R) {
        let index = self
            .records
            .partition_point(|existing| self.controller.comparator(existing, &record).is_lt());
        self.records.insert(index, record);
    }

    /// Removes the filter, so [`HostCollection::filter_string`] returns `None`.
    pub fn clear_filter(&mut self) {
        self.filter = None;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<R> {
        self.records
    }
}

impl<R: Record> HostCollection for Collection<R> {
    fn to_records(&self) -> Vec<RecordMap> {
        self.records.iter().map(Record::to_map).collect()
    }

    fn sort_state(&self) -> Option<SortState> {
        Some(self.controller.sort_state())
    }

    fn update_order(&mut self, attribute: &str, direction: Option<SortDirection>) -> Result<()> {
        self.controller.update_order(attribute, direction)?;
        self.sort();
        Ok(())
    }

    fn sort(&mut self) {
        self.controller.sort(&mut self.records);
    }

    fn filter_string(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    fn filtered(&self) -> Vec<RecordMap> {
        let Some(needle) = self.filter.as_deref().map(str::to_lowercase) else {
            return self.to_records();
        };
        self.records
            .iter()
            .map(Record::to_map)
            .filter(|map| {
                map.values()
                    .any(|value| value.to_display_string().to_lowercase().contains(&needle))
            })
            .collect()
    }

    fn set_filter(&mut self, filter: &str) {
        debug!(filter, "filter updated");
        self.filter = Some(filter.to_string());
    }
}
