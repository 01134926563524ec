//! Table view: binds a host collection to a format pipeline.
//!
//! [`TableView`] is the capability set attached to one rendered table. It
//! formats the collection's rows, reports headers, routes header clicks into
//! sorting and bundles everything into a [`TableSnapshot`] for rendering.
//!
//! ## Examples
//!
//! ```rust
//! use sortable_table::{record, Collection, ColumnSpec, HeaderEvents, TableView, ViewOptions};
//!
//! #[derive(Default)]
//! struct Header {
//!     bound: Vec<String>,
//! }
//!
//! impl HeaderEvents for Header {
//!     fn unbind_header_clicks(&mut self, selectors: &str) {
//!         self.bound.retain(|s| s != selectors);
//!     }
//!     fn bind_header_clicks(&mut self, selectors: &str) {
//!         self.bound.push(selectors.to_string());
//!     }
//! }
//!
//! let collection = Collection::new(vec![
//!     record!({ "id": 1, "name": "Bob", "score": 0.5 }),
//!     record!({ "id": 2, "name": "alice", "score": 0.75 }),
//! ]);
//!
//! let mut table = TableView::setup(
//!     ViewOptions::new(collection)
//!         .with_column("name")
//!         .with_column(ColumnSpec::new("score").with_type("percent").with_decimals(0))
//!         .with_view(Header::default()),
//! )
//! .unwrap();
//!
//! table.on_click_header("name").unwrap();
//! let snapshot = table.to_json().unwrap();
//! assert_eq!(snapshot.rows[0].get("score").and_then(|v| v.as_str()), Some("75%"));
//! ```

use serde::Serialize;
use tracing::debug;

use crate::{
    ColumnSpec, DefaultType, Error, FormatPipeline, HostCollection, NumberStyle, PipelineConfig,
    RecordMap, Result, SortState, TypeRegistry,
};

/// Event binding on the host view's header cells.
///
/// Implementations attach a click handler for the given selectors that calls
/// [`TableView::on_click_header`] with the clicked column's field name.
pub trait HeaderEvents {
    /// Removes a previously bound click handler for `selectors`.
    fn unbind_header_clicks(&mut self, selectors: &str);

    /// Binds a click handler for `selectors`.
    fn bind_header_clicks(&mut self, selectors: &str);
}

/// A view that binds no events, for tables that never sort.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoView;

impl HeaderEvents for NoView {
    fn unbind_header_clicks(&mut self, _selectors: &str) {}

    fn bind_header_clicks(&mut self, _selectors: &str) {}
}

/// Setup options for a [`TableView`].
#[derive(Debug)]
pub struct ViewOptions<C, V = NoView> {
    pub collection: C,
    pub view: Option<V>,
    pub pipeline: PipelineConfig,
}

impl<C: HostCollection> ViewOptions<C, NoView> {
    /// Starts options for `collection` with no columns and no view.
    #[must_use]
    pub fn new(collection: C) -> Self {
        ViewOptions {
            collection,
            view: None,
            pipeline: PipelineConfig::new(),
        }
    }
}

impl<C: HostCollection, V: HeaderEvents> ViewOptions<C, V> {
    /// Binds a host view, needed when the collection is sortable.
    #[must_use]
    pub fn with_view<W: HeaderEvents>(self, view: W) -> ViewOptions<C, W> {
        ViewOptions {
            collection: self.collection,
            view: Some(view),
            pipeline: self.pipeline,
        }
    }

    #[must_use]
    pub fn with_column(mut self, column: impl Into<ColumnSpec>) -> Self {
        self.pipeline = self.pipeline.with_column(column);
        self
    }

    #[must_use]
    pub fn with_columns<I, T>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ColumnSpec>,
    {
        self.pipeline = self.pipeline.with_columns(columns);
        self
    }

    #[must_use]
    pub fn with_default_type(mut self, default_type: impl Into<DefaultType>) -> Self {
        self.pipeline = self.pipeline.with_default_type(default_type);
        self
    }

    #[must_use]
    pub fn with_types(mut self, types: TypeRegistry) -> Self {
        self.pipeline = self.pipeline.with_types(types);
        self
    }

    #[must_use]
    pub fn with_number_style(mut self, style: NumberStyle) -> Self {
        self.pipeline = self.pipeline.with_number_style(style);
        self
    }

    /// Replaces the whole pipeline configuration, e.g. one parsed from JSON.
    #[must_use]
    pub fn with_pipeline(mut self, pipeline: PipelineConfig) -> Self {
        self.pipeline = pipeline;
        self
    }
}

/// Everything a renderer needs for one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSnapshot {
    pub rows: Vec<RecordMap>,
    pub columns: Vec<String>,
    pub sort: Option<SortState>,
    pub filter_string: Option<String>,
}

/// A host collection paired with its format pipeline and header bindings.
#[derive(Debug)]
pub struct TableView<C, V = NoView> {
    collection: C,
    view: Option<V>,
    pipeline: FormatPipeline,
}

impl<C: HostCollection, V: HeaderEvents> TableView<C, V> {
    /// Builds the pipeline and, for a sortable collection, activates sorting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a malformed default type and
    /// [`Error::Setup`] when the collection is sortable but no view is bound.
    pub fn setup(options: ViewOptions<C, V>) -> Result<Self> {
        let mut table = TableView {
            collection: options.collection,
            view: options.view,
            pipeline: FormatPipeline::setup(options.pipeline)?,
        };
        if table.collection.is_sortable() {
            table.activate_sorting()?;
        }
        Ok(table)
    }

    /// Binds header clicks for every column on the host view.
    ///
    /// Any earlier binding for the same selectors is removed first, so calling
    /// this twice leaves one handler.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Setup`] if no view is bound.
    pub fn activate_sorting(&mut self) -> Result<()> {
        let selectors = self.header_selectors();
        let view = self
            .view
            .as_mut()
            .ok_or_else(|| Error::setup("for sorting, pass a view instance on setup"))?;
        view.unbind_header_clicks(&selectors);
        view.bind_header_clicks(&selectors);
        debug!(%selectors, "header sorting activated");
        Ok(())
    }

    /// Returns the header cell selector for every column, comma-separated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sortable_table::{Collection, RecordMap, TableView, ViewOptions};
    ///
    /// let table = TableView::setup(
    ///     ViewOptions::new(Collection::<RecordMap>::new(Vec::new()))
    ///         .with_columns(["name", "age"])
    ///         .with_view(sortable_table::NoView),
    /// )
    /// .unwrap();
    /// assert_eq!(
    ///     table.header_selectors(),
    ///     "th[data-field-name=name], th[data-field-name=age]"
    /// );
    /// ```
    #[must_use]
    pub fn header_selectors(&self) -> String {
        self.pipeline
            .columns()
            .iter()
            .map(|column| format!("th[data-field-name={}]", column.property))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Sorts by the clicked column, toggling direction on repeat clicks.
    ///
    /// The collection re-sorts inside [`HostCollection::update_order`]; no
    /// second pass is made here.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Argument`] for an empty field name.
    pub fn on_click_header(&mut self, field_name: &str) -> Result<()> {
        self.collection.update_order(field_name, None)
    }

    /// Forwards filter input to the collection.
    pub fn on_key_up_filter(&mut self, text: &str) {
        self.collection.set_filter(text);
    }

    /// Returns the formatted rows, filtered when the collection has a filter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FormatterNotFound`] if any column cannot be formatted.
    pub fn rows(&self) -> Result<Vec<RecordMap>> {
        let records = if self.collection.filter_string().is_some() {
            self.collection.filtered()
        } else {
            self.collection.to_records()
        };
        records
            .into_iter()
            .map(|record| self.pipeline.format(record))
            .collect()
    }

    /// Returns the property name of every column.
    #[must_use]
    pub fn headers(&self) -> Vec<String> {
        self.pipeline.headers()
    }

    /// Bundles rows, headers, sort state and filter text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FormatterNotFound`] if any column cannot be formatted.
    pub fn to_json(&self) -> Result<TableSnapshot> {
        Ok(TableSnapshot {
            rows: self.rows()?,
            columns: self.headers(),
            sort: self.collection.sort_state(),
            filter_string: self.collection.filter_string().map(str::to_string),
        })
    }

    /// Formats a single record with this table's columns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FormatterNotFound`] if any column cannot be formatted.
    pub fn format(&self, record: RecordMap) -> Result<RecordMap> {
        self.pipeline.format(record)
    }

    #[must_use]
    pub fn collection(&self) -> &C {
        &self.collection
    }

    pub fn collection_mut(&mut self) -> &mut C {
        &mut self.collection
    }

    #[must_use]
    pub fn view(&self) -> Option<&V> {
        self.view.as_ref()
    }

    #[must_use]
    pub fn pipeline(&self) -> &FormatPipeline {
        &self.pipeline
    }
}
