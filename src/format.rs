//! Column-driven value formatting.
//!
//! A [`FormatPipeline`] holds the column list, the default column type and a
//! [`TypeRegistry`] of converters. [`FormatPipeline::format`] turns the raw
//! attributes of one record into display strings, dispatching on each column's type.
//!
//! ## Examples
//!
//! ```rust
//! use sortable_table::{record, ColumnSpec, FormatPipeline, PipelineConfig, Value};
//!
//! let pipeline = FormatPipeline::setup(
//!     PipelineConfig::new()
//!         .with_column("name")
//!         .with_column(ColumnSpec::new("amount").with_type("number").with_decimals(1)),
//! )
//! .unwrap();
//!
//! let row = pipeline.format(record!({ "name": "Alice", "amount": 1234.5 })).unwrap();
//! assert_eq!(row.get("amount"), Some(&Value::from("1 234.5")));
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::converters;
use crate::error::ConvertError;
use crate::{Error, NumberStyle, RecordMap, Result, Value};

/// Type used when neither the column nor the default type names one.
pub const FALLBACK_TYPE: &str = "string";

/// Formatting options shared by a column and the default type.
///
/// Every field is optional; unset fields fall back to the default type and
/// then to the converter's own defaults.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeSpec {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_value_placeholder: Option<String>,
}

impl TypeSpec {
    /// Creates a spec naming only a type.
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        TypeSpec {
            type_name: Some(type_name.into()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    #[must_use]
    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = Some(decimals);
        self
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.no_value_placeholder = Some(placeholder.into());
        self
    }

    /// Fills every unset field from `defaults`.
    #[must_use]
    pub fn merged_over(&self, defaults: &TypeSpec) -> TypeSpec {
        TypeSpec {
            type_name: self.type_name.clone().or_else(|| defaults.type_name.clone()),
            format: self.format.clone().or_else(|| defaults.format.clone()),
            decimals: self.decimals.or(defaults.decimals),
            no_value_placeholder: self
                .no_value_placeholder
                .clone()
                .or_else(|| defaults.no_value_placeholder.clone()),
        }
    }
}

/// One display column: the record property it shows and how to render it.
///
/// Deserializes from either a bare property name or an object.
///
/// # Examples
///
/// ```rust
/// use sortable_table::ColumnSpec;
///
/// let columns: Vec<ColumnSpec> =
///     serde_json::from_str(r#"["name", {"property": "price", "type": "number", "decimals": 0}]"#)
///         .unwrap();
/// assert_eq!(columns[0], ColumnSpec::new("name"));
/// assert_eq!(columns[1].options.decimals, Some(0));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ColumnDef")]
pub struct ColumnSpec {
    pub property: String,
    #[serde(flatten)]
    pub options: TypeSpec,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColumnDef {
    Name(String),
    Spec {
        property: String,
        #[serde(flatten)]
        options: TypeSpec,
    },
}

impl From<ColumnDef> for ColumnSpec {
    fn from(def: ColumnDef) -> Self {
        match def {
            ColumnDef::Name(property) => ColumnSpec::new(property),
            ColumnDef::Spec { property, options } => ColumnSpec { property, options },
        }
    }
}

impl ColumnSpec {
    /// Creates a column with no options of its own.
    #[must_use]
    pub fn new(property: impl Into<String>) -> Self {
        ColumnSpec {
            property: property.into(),
            options: TypeSpec::default(),
        }
    }

    #[must_use]
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.options.type_name = Some(type_name.into());
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.options.format = Some(format.into());
        self
    }

    #[must_use]
    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.options.decimals = Some(decimals);
        self
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.options.no_value_placeholder = Some(placeholder.into());
        self
    }

    /// Returns the column type, or [`FALLBACK_TYPE`] when none is set.
    #[must_use]
    pub fn type_name(&self) -> &str {
        self.options.type_name.as_deref().unwrap_or(FALLBACK_TYPE)
    }

    /// Returns this column with unset options filled from `defaults`.
    #[must_use]
    pub fn resolve(&self, defaults: &TypeSpec) -> ColumnSpec {
        ColumnSpec {
            property: self.property.clone(),
            options: self.options.merged_over(defaults),
        }
    }
}

impl From<&str> for ColumnSpec {
    fn from(property: &str) -> Self {
        ColumnSpec::new(property)
    }
}

impl From<String> for ColumnSpec {
    fn from(property: String) -> Self {
        ColumnSpec::new(property)
    }
}

/// The default type as supplied at setup.
///
/// Only [`DefaultType::Spec`] is accepted; a bare name is kept here so setup can
/// reject it with a clear error instead of guessing.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DefaultType {
    Name(String),
    Spec(TypeSpec),
}

impl From<TypeSpec> for DefaultType {
    fn from(spec: TypeSpec) -> Self {
        DefaultType::Spec(spec)
    }
}

impl From<&str> for DefaultType {
    fn from(name: &str) -> Self {
        DefaultType::Name(name.to_string())
    }
}

impl From<String> for DefaultType {
    fn from(name: String) -> Self {
        DefaultType::Name(name)
    }
}

/// Signature of a value converter.
pub type ConvertFn = dyn Fn(&Value, &ColumnSpec) -> std::result::Result<String, ConvertError>
    + Send
    + Sync;

/// A shareable converter function.
#[derive(Clone)]
pub struct Converter(Arc<ConvertFn>);

impl Converter {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value, &ColumnSpec) -> std::result::Result<String, ConvertError>
            + Send
            + Sync
            + 'static,
    {
        Converter(Arc::new(f))
    }

    /// Renders `value` for the resolved `column`.
    ///
    /// # Errors
    ///
    /// Returns whatever the wrapped function reports.
    pub fn call(&self, value: &Value, column: &ColumnSpec) -> std::result::Result<String, ConvertError> {
        (self.0)(value, column)
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Converter(..)")
    }
}

/// Ordered mapping from type name to converter.
///
/// # Examples
///
/// ```rust
/// use sortable_table::{NumberStyle, TypeRegistry, Value};
///
/// let mut types = TypeRegistry::builtin(NumberStyle::new());
/// assert!(types.contains("percent"));
///
/// types.register("upper", |value: &Value, _: &_| Ok(value.to_display_string().to_uppercase()));
/// assert_eq!(types.len(), 5);
/// ```
#[derive(Clone, Debug, Default)]
pub struct TypeRegistry {
    converters: IndexMap<String, Converter>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry seeded with `date`, `number`, `string` and `percent`.
    #[must_use]
    pub fn builtin(style: NumberStyle) -> Self {
        let mut types = TypeRegistry::new();
        types.register("date", converters::date);
        types.register("number", move |value: &Value, column: &ColumnSpec| {
            converters::number(value, column, &style)
        });
        types.register("string", converters::string);
        types.register("percent", move |value: &Value, column: &ColumnSpec| {
            converters::percent(value, column, &style)
        });
        types
    }

    /// Registers a converter under `name`, returning the one it replaces.
    pub fn register<F>(&mut self, name: impl Into<String>, f: F) -> Option<Converter>
    where
        F: Fn(&Value, &ColumnSpec) -> std::result::Result<String, ConvertError>
            + Send
            + Sync
            + 'static,
    {
        self.insert(name, Converter::new(f))
    }

    /// Inserts an existing converter under `name`, returning the one it replaces.
    pub fn insert(&mut self, name: impl Into<String>, converter: Converter) -> Option<Converter> {
        self.converters.insert(name.into(), converter)
    }

    /// Adds every entry of `other`; entries of `other` win on name conflicts.
    pub fn merge(&mut self, other: TypeRegistry) {
        self.converters.extend(other.converters);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Converter> {
        self.converters.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.converters.contains_key(name)
    }

    /// Returns the registered type names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.converters.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

/// Setup options for a [`FormatPipeline`].
///
/// Deserializes from JSON with `columns`, `defaultType` and `numberStyle` keys.
/// Converters cannot come from JSON; add them with [`PipelineConfig::with_type`].
///
/// # Examples
///
/// ```rust
/// use sortable_table::{FormatPipeline, PipelineConfig};
///
/// let config = PipelineConfig::from_json(
///     r#"{"columns": ["name", {"property": "share", "type": "percent"}],
///         "defaultType": {"type": "string", "noValuePlaceholder": "n/a"}}"#,
/// )
/// .unwrap();
/// let pipeline = FormatPipeline::setup(config).unwrap();
/// assert_eq!(pipeline.headers(), ["name", "share"]);
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineConfig {
    pub columns: Vec<ColumnSpec>,
    pub default_type: Option<DefaultType>,
    pub number_style: NumberStyle,
    #[serde(skip)]
    pub types: TypeRegistry,
}

impl PipelineConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the JSON is malformed or has the wrong shape.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::config(format!("invalid configuration: {}", e)))
    }

    #[must_use]
    pub fn with_column(mut self, column: impl Into<ColumnSpec>) -> Self {
        self.columns.push(column.into());
        self
    }

    #[must_use]
    pub fn with_columns<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ColumnSpec>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_default_type(mut self, default_type: impl Into<DefaultType>) -> Self {
        self.default_type = Some(default_type.into());
        self
    }

    #[must_use]
    pub fn with_number_style(mut self, style: NumberStyle) -> Self {
        self.number_style = style;
        self
    }

    /// Registers a converter that overrides any built-in of the same name.
    #[must_use]
    pub fn with_type<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value, &ColumnSpec) -> std::result::Result<String, ConvertError>
            + Send
            + Sync
            + 'static,
    {
        self.types.register(name, f);
        self
    }

    #[must_use]
    pub fn with_types(mut self, types: TypeRegistry) -> Self {
        self.types.merge(types);
        self
    }
}

/// Formats records column by column.
#[derive(Clone, Debug)]
pub struct FormatPipeline {
    columns: Vec<ColumnSpec>,
    default_type: TypeSpec,
    types: TypeRegistry,
}

impl FormatPipeline {
    /// Builds a pipeline from its configuration.
    ///
    /// Without a default type, columns default to `{type: "string"}`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the default type is given as a bare name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sortable_table::{Error, FormatPipeline, PipelineConfig};
    ///
    /// let err = FormatPipeline::setup(PipelineConfig::new().with_default_type("number")).unwrap_err();
    /// assert!(matches!(err, Error::Config(_)));
    /// ```
    pub fn setup(config: PipelineConfig) -> Result<Self> {
        let default_type = match config.default_type {
            None => TypeSpec::new(FALLBACK_TYPE),
            Some(DefaultType::Spec(spec)) => spec,
            Some(DefaultType::Name(_)) => {
                return Err(Error::config("defaultType must be passed as object"));
            }
        };

        let mut types = TypeRegistry::builtin(config.number_style);
        types.merge(config.types);

        debug!(
            columns = config.columns.len(),
            types = types.len(),
            "format pipeline set up"
        );

        Ok(FormatPipeline {
            columns: config.columns,
            default_type,
            types,
        })
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    #[must_use]
    pub fn default_type(&self) -> &TypeSpec {
        &self.default_type
    }

    #[must_use]
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Returns the property name of every column, in column order.
    #[must_use]
    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.property.clone()).collect()
    }

    /// Replaces each column's value in `record` with its display string.
    ///
    /// Attributes without a column are left as they are; a column whose
    /// property the record lacks is formatted from a null value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FormatterNotFound`] if a column's type has no converter
    /// or its converter fails.
    pub fn format(&self, mut record: RecordMap) -> Result<RecordMap> {
        for column in &self.columns {
            let resolved = column.resolve(&self.default_type);
            let type_name = resolved.type_name();
            let converter = self
                .types
                .get(type_name)
                .ok_or_else(|| Error::formatter_not_found(type_name))?;

            let text = converter
                .call(record.get(&resolved.property).unwrap_or(&Value::Null), &resolved)
                .map_err(|source| {
                    debug!(
                        property = %resolved.property,
                        type_name,
                        error = %source,
                        "converter failed"
                    );
                    Error::formatter_failed(type_name, source)
                })?;
            record.insert(resolved.property.clone(), Value::String(text));
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;

    fn amount_pipeline(column: ColumnSpec) -> FormatPipeline {
        FormatPipeline::setup(PipelineConfig::new().with_column(column)).unwrap()
    }

    #[test]
    fn test_number_column_space_grouped() {
        let pipeline = amount_pipeline(ColumnSpec::new("amount").with_type("number").with_decimals(1));
        let row = pipeline.format(record!({ "amount": 1234.5 })).unwrap();
        assert_eq!(row.get("amount"), Some(&Value::from("1 234.5")));
    }

    #[test]
    fn test_missing_value_uses_placeholder() {
        let pipeline = amount_pipeline(ColumnSpec::new("amount").with_type("number"));
        let row = pipeline.format(record!({ "amount": Value::Null })).unwrap();
        assert_eq!(row.get("amount"), Some(&Value::from("---")));

        let row = pipeline.format(record!({ "other": 1 })).unwrap();
        assert_eq!(row.get("amount"), Some(&Value::from("---")));
        assert_eq!(row.get("other"), Some(&Value::from(1)));
    }

    #[test]
    fn test_unknown_type_fails() {
        let pipeline = amount_pipeline(ColumnSpec::new("amount").with_type("currency"));
        let err = pipeline.format(record!({ "amount": 3 })).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Formatter function for type \"currency\" does not exist"
        );
        assert!(err.converter_failure().is_none());
    }

    #[test]
    fn test_failing_converter_is_reported_as_missing() {
        let pipeline = FormatPipeline::setup(
            PipelineConfig::new()
                .with_column(ColumnSpec::new("amount").with_type("strict"))
                .with_type("strict", |_: &Value, _: &ColumnSpec| {
                    Err(ConvertError::new("boom"))
                }),
        )
        .unwrap();
        let err = pipeline.format(record!({ "amount": 3 })).unwrap_err();
        assert!(err.to_string().contains("\"strict\""));
        assert_eq!(err.converter_failure(), Some(&ConvertError::new("boom")));
    }

    #[test]
    fn test_default_type_fills_column_options() {
        let pipeline = FormatPipeline::setup(
            PipelineConfig::new()
                .with_columns(["a", "b"])
                .with_column(ColumnSpec::new("c").with_decimals(0))
                .with_default_type(TypeSpec::new("number").with_decimals(3)),
        )
        .unwrap();
        let row = pipeline
            .format(record!({ "a": 1, "b": Value::Null, "c": 2.6 }))
            .unwrap();
        assert_eq!(row.get("a"), Some(&Value::from("1.000")));
        assert_eq!(row.get("b"), Some(&Value::from("---")));
        assert_eq!(row.get("c"), Some(&Value::from("3")));
    }

    #[test]
    fn test_default_type_without_type_falls_back_to_string() {
        let pipeline = FormatPipeline::setup(
            PipelineConfig::new()
                .with_column("name")
                .with_default_type(TypeSpec::default().with_placeholder("n/a")),
        )
        .unwrap();
        let row = pipeline.format(record!({ "name": "x" })).unwrap();
        assert_eq!(row.get("name"), Some(&Value::from("x")));
    }

    #[test]
    fn test_bare_default_type_is_rejected() {
        let err = FormatPipeline::setup(PipelineConfig::new().with_default_type("string")).unwrap_err();
        assert_eq!(err.to_string(), "defaultType must be passed as object");

        let config = PipelineConfig::from_json(r#"{"defaultType": "number"}"#).unwrap();
        assert!(matches!(FormatPipeline::setup(config), Err(Error::Config(_))));
    }

    #[test]
    fn test_custom_type_overrides_builtin() {
        let pipeline = FormatPipeline::setup(
            PipelineConfig::new()
                .with_column(ColumnSpec::new("n").with_type("number"))
                .with_type("number", |value: &Value, _: &ColumnSpec| {
                    Ok(format!("#{}", value))
                }),
        )
        .unwrap();
        let row = pipeline.format(record!({ "n": 7 })).unwrap();
        assert_eq!(row.get("n"), Some(&Value::from("#7")));
        assert!(pipeline.types().contains("percent"));
    }

    #[test]
    fn test_string_type_is_passthrough() {
        let pipeline = amount_pipeline(ColumnSpec::new("label"));
        let row = pipeline.format(record!({ "label": "Hello, World" })).unwrap();
        assert_eq!(row.get("label"), Some(&Value::from("Hello, World")));
    }

    #[test]
    fn test_config_json_errors() {
        assert!(matches!(
            PipelineConfig::from_json(r#"{"columns": 3}"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_column_spec_serializes_flat() {
        let column = ColumnSpec::new("price").with_type("number").with_placeholder("-");
        assert_eq!(
            serde_json::to_string(&column).unwrap(),
            r#"{"property":"price","type":"number","noValuePlaceholder":"-"}"#
        );
    }
}
