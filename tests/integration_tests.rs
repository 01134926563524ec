use std::cmp::Ordering;

use chrono::{TimeZone, Utc};
use serde_json::json;
use sortable_table::{
    record, Collection, ColumnSpec, ConvertError, Error, FormatPipeline, HeaderEvents,
    HostCollection, PipelineConfig, Record, RecordMap, SortController, SortDirection, SortState,
    TableView, TypeSpec, Value, ViewOptions,
};

#[derive(Debug, Default)]
struct Clicks {
    bound: Option<String>,
}

impl HeaderEvents for Clicks {
    fn unbind_header_clicks(&mut self, selectors: &str) {
        if self.bound.as_deref() == Some(selectors) {
            self.bound = None;
        }
    }

    fn bind_header_clicks(&mut self, selectors: &str) {
        self.bound = Some(selectors.to_string());
    }
}

/// A typed host record, to check the controller works beyond plain maps.
#[derive(Debug)]
struct Employee {
    fields: RecordMap,
}

impl Employee {
    fn new(id: i64, name: &str, salary: Option<f64>, hired: Option<(i32, u32, u32)>) -> Self {
        let hired = hired.map(|(y, m, d)| Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap());
        Employee {
            fields: record!({ "id": id, "name": name, "salary": salary, "hired": hired }),
        }
    }
}

impl Record for Employee {
    fn get(&self, attribute: &str) -> Option<&Value> {
        self.fields.get(attribute)
    }

    fn to_map(&self) -> RecordMap {
        self.fields.clone()
    }
}

fn staff() -> Collection<Employee> {
    Collection::new(vec![
        Employee::new(1, "Dana", Some(72_000.0), Some((2019, 4, 1))),
        Employee::new(2, "carl", None, Some((2021, 11, 15))),
        Employee::new(3, "Bea", Some(98_500.75), None),
        Employee::new(4, "avery", Some(72_000.0), Some((2015, 1, 5))),
    ])
}

fn column(rows: &[RecordMap], property: &str) -> Vec<String> {
    rows.iter()
        .map(|row| {
            row.get(property)
                .map(Value::to_display_string)
                .unwrap_or_default()
        })
        .collect()
}

fn table() -> TableView<Collection<Employee>, Clicks> {
    TableView::setup(
        ViewOptions::new(staff())
            .with_column("name")
            .with_column(ColumnSpec::new("salary").with_type("number").with_decimals(0))
            .with_column(
                ColumnSpec::new("hired")
                    .with_type("date")
                    .with_format("YYYY-MM-DD")
                    .with_placeholder("not yet"),
            )
            .with_view(Clicks::default()),
    )
    .unwrap()
}

#[test]
fn test_toggle_then_switch_then_override() {
    let mut controller = SortController::new();
    controller.update_order("x", None).unwrap();
    controller.update_order("x", None).unwrap();
    assert_eq!(controller.direction(), SortDirection::Desc);

    controller.update_order("y", None).unwrap();
    assert_eq!(
        controller.sort_state(),
        SortState {
            attribute: Some("y".to_string()),
            direction: SortDirection::Asc
        }
    );

    controller.update_order("x", Some(SortDirection::Desc)).unwrap();
    assert_eq!(controller.direction(), SortDirection::Desc);
}

#[test]
fn test_setup_binds_header_selectors() {
    let table = table();
    assert_eq!(
        table.view().and_then(|v| v.bound.as_deref()),
        Some("th[data-field-name=name], th[data-field-name=salary], th[data-field-name=hired]")
    );
}

#[test]
fn test_sort_by_name_is_case_insensitive() {
    let mut table = table();
    table.on_click_header("name").unwrap();
    let rows = table.rows().unwrap();
    assert_eq!(column(&rows, "name"), ["avery", "Bea", "carl", "Dana"]);
}

#[test]
fn test_equal_salaries_keep_id_order_across_resorts() {
    let mut table = table();
    table.on_click_header("salary").unwrap();
    let first = table.rows().unwrap();
    assert_eq!(column(&first, "name"), ["carl", "Dana", "avery", "Bea"]);

    // re-sorting with the same state must not reshuffle the 72 000 tie
    table.collection_mut().sort();
    assert_eq!(table.rows().unwrap(), first);

    table.on_click_header("salary").unwrap();
    let desc = table.rows().unwrap();
    assert_eq!(column(&desc, "name"), ["Bea", "avery", "Dana", "carl"]);
    assert_eq!(column(&desc, "salary"), ["98 501", "72 000", "72 000", "---"]);
}

#[test]
fn test_dates_sort_and_format() {
    let mut table = table();
    table.on_click_header("hired").unwrap();
    let rows = table.rows().unwrap();
    assert_eq!(column(&rows, "name"), ["Bea", "avery", "Dana", "carl"]);
    assert_eq!(
        column(&rows, "hired"),
        ["not yet", "2015-01-05", "2019-04-01", "2021-11-15"]
    );
}

#[test]
fn test_snapshot_serializes_for_rendering() {
    let mut table = table();
    table.on_click_header("name").unwrap();
    table.on_click_header("name").unwrap();
    table.on_key_up_filter("a");

    let json = serde_json::to_value(table.to_json().unwrap()).unwrap();
    assert_eq!(json["columns"], json!(["name", "salary", "hired"]));
    assert_eq!(json["sort"], json!({ "direction": "desc", "attribute": "name" }));
    assert_eq!(json["filterString"], json!("a"));
    // every name contains an "a"
    assert_eq!(json["rows"].as_array().map(Vec::len), Some(4));
    assert_eq!(json["rows"][0]["name"], json!("Dana"));
    assert_eq!(json["rows"][0]["id"], json!(1));
}

#[test]
fn test_missing_value_beside_number_does_not_fail() {
    let controller = {
        let mut c = SortController::new();
        c.update_order("v", None).unwrap();
        c
    };
    let missing = record!({ "id": 1 });
    let five = record!({ "id": 2, "v": 5 });
    assert_eq!(controller.comparator(&missing, &five), Ordering::Less);
    assert_eq!(controller.comparator(&five, &missing), Ordering::Greater);
}

#[test]
fn test_format_number_with_one_decimal() {
    let pipeline = FormatPipeline::setup(
        PipelineConfig::new()
            .with_column(ColumnSpec::new("amount").with_type("number").with_decimals(1)),
    )
    .unwrap();
    let row = pipeline.format(record!({ "amount": 1234.5 })).unwrap();
    assert_eq!(row.get("amount"), Some(&Value::from("1 234.5")));

    let row = pipeline.format(record!({ "amount": Value::Null })).unwrap();
    assert_eq!(row.get("amount"), Some(&Value::from("---")));
}

#[test]
fn test_unknown_type_names_the_type() {
    let pipeline = FormatPipeline::setup(
        PipelineConfig::new().with_column(ColumnSpec::new("amount").with_type("currency")),
    )
    .unwrap();
    match pipeline.format(record!({ "amount": 1 })) {
        Err(Error::FormatterNotFound { type_name, source }) => {
            assert_eq!(type_name, "currency");
            assert!(source.is_none());
        }
        other => panic!("expected FormatterNotFound, got {:?}", other),
    }
}

#[test]
fn test_registering_currency_type() {
    let pipeline = FormatPipeline::setup(
        PipelineConfig::new()
            .with_column(ColumnSpec::new("amount").with_type("currency").with_format("EUR"))
            .with_type("currency", |value: &Value, column: &ColumnSpec| {
                let amount = value
                    .as_f64()
                    .ok_or_else(|| ConvertError::new("currency needs a number"))?;
                Ok(format!(
                    "{:.2} {}",
                    amount,
                    column.options.format.as_deref().unwrap_or("USD")
                ))
            }),
    )
    .unwrap();

    let row = pipeline.format(record!({ "amount": 9.5 })).unwrap();
    assert_eq!(row.get("amount"), Some(&Value::from("9.50 EUR")));

    let err = pipeline.format(record!({ "amount": "ten" })).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Formatter function for type \"currency\" does not exist"
    );
    assert_eq!(
        err.converter_failure().map(ToString::to_string).as_deref(),
        Some("currency needs a number")
    );
}

#[test]
fn test_pipeline_from_json_config() {
    let config = PipelineConfig::from_json(
        r#"{
            "columns": [
                "name",
                { "property": "ratio", "type": "percent", "decimals": 1 },
                { "property": "total", "type": "number" }
            ],
            "defaultType": { "type": "string", "noValuePlaceholder": "n/a" },
            "numberStyle": { "thousands": "comma" }
        }"#,
    )
    .unwrap();
    let pipeline = FormatPipeline::setup(config).unwrap();
    assert_eq!(pipeline.default_type(), &TypeSpec::new("string").with_placeholder("n/a"));

    let row = pipeline
        .format(record!({ "name": "x", "ratio": 0.0637, "total": Value::Null }))
        .unwrap();
    assert_eq!(row.get("ratio"), Some(&Value::from("6.4%")));
    assert_eq!(row.get("total"), Some(&Value::from("n/a")));

    let row = pipeline.format(record!({ "total": 1234567 })).unwrap();
    assert_eq!(row.get("total"), Some(&Value::from("1,234,567.00")));
}

#[test]
fn test_default_type_given_as_name_is_config_error() {
    let config = PipelineConfig::from_json(r#"{ "columns": ["a"], "defaultType": "string" }"#).unwrap();
    let err = TableView::setup(
        ViewOptions::new(staff())
            .with_pipeline(config)
            .with_view(Clicks::default()),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_setup_without_view_fails_for_sortable_collection() {
    let err = TableView::setup(ViewOptions::new(staff()).with_column("name")).unwrap_err();
    assert!(matches!(err, Error::Setup(_)));
}

#[test]
fn test_host_collection_without_sorting_rejects_clicks() {
    struct Fixed(Vec<RecordMap>);

    impl HostCollection for Fixed {
        fn to_records(&self) -> Vec<RecordMap> {
            self.0.clone()
        }
    }

    let mut table = TableView::setup(
        ViewOptions::new(Fixed(vec![record!({ "id": 1, "name": "only" })])).with_column("name"),
    )
    .unwrap();
    assert!(matches!(table.on_click_header("name"), Err(Error::Setup(_))));
    assert_eq!(table.to_json().unwrap().sort, None);
}
