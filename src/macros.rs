/// Builds a [`RecordMap`](crate::RecordMap) from `"key": value` pairs.
///
/// Values go through `Value::from`, so anything with a `From` conversion works,
/// including `Value::Null` and `Option<T>` for possibly-missing attributes.
///
/// # Examples
///
/// ```rust
/// use sortable_table::{record, Value};
///
/// let row = record!({ "id": 1, "name": "Alice", "score": None::<f64> });
/// assert_eq!(row.get("name"), Some(&Value::from("Alice")));
/// assert_eq!(row.get("score"), Some(&Value::Null));
/// ```
#[macro_export]
macro_rules! record {
    // Handle empty record
    ({}) => {
        $crate::RecordMap::new()
    };

    ({ $($key:literal : $value:expr),* $(,)? }) => {{
        let mut record = $crate::RecordMap::new();
        $(
            record.insert($key.to_string(), $crate::Value::from($value));
        )*
        record
    }};
}
