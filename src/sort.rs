//! Toggleable, type-aware sorting state and comparator.
//!
//! [`SortController`] owns the sort attribute and direction of one host
//! collection. Clicking the same column twice flips the direction, clicking a
//! new column starts ascending, and [`SortController::comparator`] orders
//! records for any slice sort.
//!
//! ## Ordering rules
//!
//! - Strings compare case-insensitively.
//! - Numbers, dates (as epoch milliseconds) and booleans (`false` = 0, `true` = 1)
//!   share one numeric scale; strings sort after it.
//! - A missing value compares as the neutral value of the other side's kind
//!   (`""`, `0`, the epoch, `false`) and sorts before a value equal to that neutral.
//! - Records with equal values are ordered by `id` in the current direction, so
//!   the comparator is a total order and repeated sorts never reshuffle rows.
//!
//! ## Examples
//!
//! ```rust
//! use sortable_table::{record, SortController, SortDirection};
//!
//! let mut rows = vec![
//!     record!({ "id": 1, "name": "Bob" }),
//!     record!({ "id": 2, "name": "alice" }),
//! ];
//!
//! let mut controller = SortController::new();
//! controller.update_order("name", None).unwrap();
//! controller.sort(&mut rows);
//! assert_eq!(rows[0].get("name").and_then(|v| v.as_str()), Some("alice"));
//!
//! // Same attribute again: descending
//! controller.update_order("name", None).unwrap();
//! assert_eq!(controller.sort_state().direction, SortDirection::Desc);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Number, Record, Result, Value};

/// Ascending or descending order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Returns the opposite direction.
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Returns `"asc"` or `"desc"`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Orients an ascending ordering to this direction.
    #[inline]
    #[must_use]
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(Error::Argument(format!(
                "sort direction must be \"asc\" or \"desc\", got \"{}\"",
                other
            ))),
        }
    }
}

/// Snapshot of the current sort attribute and direction.
///
/// `attribute` is `None` until the first [`SortController::update_order`].
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    pub direction: SortDirection,
    pub attribute: Option<String>,
}

/// Owns the sort state of one collection and orders its records.
#[derive(Clone, Debug, Default)]
pub struct SortController {
    state: SortState,
}

impl SortController {
    /// Creates a controller with no sort attribute, ascending.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the attribute to sort on.
    ///
    /// Repeating the current attribute toggles the direction; a different
    /// attribute resets it to ascending. An explicit `direction` overrides both.
    /// This only updates state: re-sorting the records is up to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Argument`] if `attribute` is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sortable_table::{SortController, SortDirection};
    ///
    /// let mut controller = SortController::new();
    /// controller.update_order("x", None).unwrap();
    /// controller.update_order("x", Some(SortDirection::Asc)).unwrap();
    /// assert_eq!(controller.direction(), SortDirection::Asc);
    /// ```
    pub fn update_order(&mut self, attribute: &str, direction: Option<SortDirection>) -> Result<()> {
        if attribute.is_empty() {
            return Err(Error::missing_argument("property"));
        }

        let state = &mut self.state;
        if state.attribute.as_deref() == Some(attribute) {
            state.direction = state.direction.toggle();
        } else {
            state.attribute = Some(attribute.to_string());
            state.direction = SortDirection::Asc;
        }

        if let Some(direction) = direction {
            state.direction = direction;
        }

        debug!(attribute, direction = %state.direction, "sort order updated");
        Ok(())
    }

    /// Returns a snapshot of the current state.
    #[must_use]
    pub fn sort_state(&self) -> SortState {
        self.state.clone()
    }

    #[must_use]
    pub fn attribute(&self) -> Option<&str> {
        self.state.attribute.as_deref()
    }

    #[must_use]
    pub fn direction(&self) -> SortDirection {
        self.state.direction
    }

    /// Orders two records by the current sort attribute and direction.
    ///
    /// Returns `Equal` only when the attribute values are equal and the records
    /// share the same `id`.
    pub fn comparator<R: Record + ?Sized>(&self, a: &R, b: &R) -> Ordering {
        let (left, right) = match self.attribute() {
            Some(attribute) => (a.get(attribute), b.get(attribute)),
            None => (None, None),
        };

        match compare(
            left.unwrap_or(&Value::Null),
            right.unwrap_or(&Value::Null),
            true,
        ) {
            Ordering::Equal => self.tie_break(a, b),
            ordering => self.state.direction.apply(ordering),
        }
    }

    /// Sorts records in place with [`SortController::comparator`].
    pub fn sort<R: Record>(&self, records: &mut [R]) {
        records.sort_by(|a, b| self.comparator(a, b));
    }

    fn tie_break<R: Record + ?Sized>(&self, a: &R, b: &R) -> Ordering {
        let ordering = compare(
            a.id().unwrap_or(&Value::Null),
            b.id().unwrap_or(&Value::Null),
            false,
        );
        self.state.direction.apply(ordering)
    }
}

/// Compares two attribute values in ascending order, ignoring string case.
///
/// # Examples
///
/// ```rust
/// use std::cmp::Ordering;
/// use sortable_table::{compare_values, Value};
///
/// assert_eq!(compare_values(&Value::from("alice"), &Value::from("Bob")), Ordering::Less);
/// assert_eq!(compare_values(&Value::Null, &Value::from(5)), Ordering::Less);
/// assert_eq!(compare_values(&Value::Null, &Value::from(-5)), Ordering::Greater);
/// ```
#[must_use]
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    compare(a, b, true)
}

fn compare(a: &Value, b: &Value, fold_case: bool) -> Ordering {
    match (a.kind(), b.kind()) {
        (None, None) => Ordering::Equal,
        (None, Some(kind)) => compare_present(&kind.neutral(), b, fold_case).then(Ordering::Less),
        (Some(kind), None) => {
            compare_present(a, &kind.neutral(), fold_case).then(Ordering::Greater)
        }
        (Some(_), Some(_)) => compare_present(a, b, fold_case),
    }
}

fn compare_present(a: &Value, b: &Value, fold_case: bool) -> Ordering {
    match (numeric_key(a), numeric_key(b)) {
        (Some(x), Some(y)) => compare_numbers(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => {
            let x = a.as_str().unwrap_or_default();
            let y = b.as_str().unwrap_or_default();
            if fold_case {
                x.chars()
                    .flat_map(char::to_lowercase)
                    .cmp(y.chars().flat_map(char::to_lowercase))
            } else {
                x.cmp(y)
            }
        }
    }
}

fn numeric_key(value: &Value) -> Option<Number> {
    match value {
        Value::Bool(b) => Some(Number::Integer(i64::from(*b))),
        Value::Number(n) => Some(*n),
        Value::Date(dt) => Some(Number::Integer(dt.timestamp_millis())),
        Value::String(_) | Value::Null => None,
    }
}

/// Orders two numbers exactly. Integers never pass through `f64`, where
/// values above 2^53 would collapse.
fn compare_numbers(a: Number, b: Number) -> Ordering {
    match (a, b) {
        (Number::Integer(x), Number::Integer(y)) => x.cmp(&y),
        (Number::Float(x), Number::Float(y)) => x.total_cmp(&y),
        (Number::Integer(x), Number::Float(y)) => compare_integer_float(x, y),
        (Number::Float(x), Number::Integer(y)) => compare_integer_float(y, x).reverse(),
    }
}

// 2^63, the smallest float above every i64
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

// Agrees with `f64::total_cmp`: NaN sorts by sign, and -0.0 sits below 0.
fn compare_integer_float(i: i64, f: f64) -> Ordering {
    if f.is_nan() {
        return if f.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if f >= I64_BOUND {
        return Ordering::Less;
    }
    if f < -I64_BOUND {
        return Ordering::Greater;
    }
    let whole = f.trunc();
    i.cmp(&(whole as i64)).then_with(|| {
        if f > whole {
            Ordering::Less
        } else if f < whole || (f == 0.0 && f.is_sign_negative()) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{record, RecordMap};
    use chrono::{TimeZone, Utc};

    fn names(rows: &[RecordMap], attribute: &str) -> Vec<String> {
        rows.iter()
            .map(|r| r.get(attribute).map(Value::to_display_string).unwrap_or_default())
            .collect()
    }

    fn ids(rows: &[RecordMap]) -> Vec<i64> {
        rows.iter()
            .filter_map(|r| r.get("id").and_then(Value::as_i64))
            .collect()
    }

    #[test]
    fn test_toggle_sequence() {
        let mut controller = SortController::new();
        let mut seen = Vec::new();
        for _ in 0..3 {
            controller.update_order("x", None).unwrap();
            seen.push(controller.direction());
        }
        assert_eq!(
            seen,
            [SortDirection::Asc, SortDirection::Desc, SortDirection::Asc]
        );
    }

    #[test]
    fn test_switching_attribute_resets_direction() {
        let mut controller = SortController::new();
        controller.update_order("x", Some(SortDirection::Desc)).unwrap();
        controller.update_order("y", None).unwrap();
        assert_eq!(
            controller.sort_state(),
            SortState {
                attribute: Some("y".to_string()),
                direction: SortDirection::Asc,
            }
        );
    }

    #[test]
    fn test_explicit_direction_overrides() {
        let mut controller = SortController::new();
        controller.update_order("x", Some(SortDirection::Desc)).unwrap();
        assert_eq!(controller.direction(), SortDirection::Desc);
        // would toggle to asc, override wins
        controller.update_order("x", Some(SortDirection::Desc)).unwrap();
        assert_eq!(controller.direction(), SortDirection::Desc);
    }

    #[test]
    fn test_missing_attribute_is_rejected() {
        let mut controller = SortController::new();
        controller.update_order("x", None).unwrap();
        let err = controller.update_order("", None).unwrap_err();
        assert!(matches!(err, Error::Argument(_)));
        assert_eq!(err.to_string(), "missing argument <property>");
        // state untouched
        assert_eq!(controller.attribute(), Some("x"));
    }

    #[test]
    fn test_initial_state() {
        let state = SortController::new().sort_state();
        assert_eq!(state.attribute, None);
        assert_eq!(state.direction, SortDirection::Asc);
    }

    #[test]
    fn test_case_insensitive_strings() {
        let mut rows = vec![
            record!({ "id": 1, "name": "Bob" }),
            record!({ "id": 2, "name": "alice" }),
            record!({ "id": 3, "name": "Carol" }),
        ];
        let mut controller = SortController::new();
        controller.update_order("name", None).unwrap();
        controller.sort(&mut rows);
        assert_eq!(names(&rows, "name"), ["alice", "Bob", "Carol"]);

        controller.update_order("name", None).unwrap();
        controller.sort(&mut rows);
        assert_eq!(names(&rows, "name"), ["Carol", "Bob", "alice"]);
    }

    #[test]
    fn test_same_id_is_true_tie() {
        let mut controller = SortController::new();
        controller.update_order("name", None).unwrap();
        let a = record!({ "id": 4, "name": "Same" });
        let b = record!({ "id": 4, "name": "same" });
        assert_eq!(controller.comparator(&a, &b), Ordering::Equal);
        assert_eq!(controller.comparator(&a, &a), Ordering::Equal);
    }

    #[test]
    fn test_equal_values_break_ties_by_id() {
        let mut controller = SortController::new();
        controller.update_order("group", None).unwrap();
        let low = record!({ "id": 1, "group": "a" });
        let high = record!({ "id": 2, "group": "a" });
        assert_eq!(controller.comparator(&low, &high), Ordering::Less);
        assert_eq!(controller.comparator(&high, &low), Ordering::Greater);

        controller.update_order("group", None).unwrap();
        assert_eq!(controller.comparator(&low, &high), Ordering::Greater);
    }

    #[test]
    fn test_constant_attribute_orders_by_id() {
        let mut rows: Vec<RecordMap> = [3, 1, 2]
            .into_iter()
            .map(|id| record!({ "id": id, "status": "open" }))
            .collect();
        let mut controller = SortController::new();
        controller.update_order("status", None).unwrap();
        controller.sort(&mut rows);
        assert_eq!(ids(&rows), [1, 2, 3]);

        controller.update_order("status", None).unwrap();
        controller.sort(&mut rows);
        assert_eq!(ids(&rows), [3, 2, 1]);
    }

    #[test]
    fn test_no_attribute_orders_by_id() {
        let mut rows: Vec<RecordMap> = [2, 3, 1]
            .into_iter()
            .map(|id| record!({ "id": id }))
            .collect();
        SortController::new().sort(&mut rows);
        assert_eq!(ids(&rows), [1, 2, 3]);
    }

    #[test]
    fn test_missing_value_next_to_number() {
        let mut rows = vec![
            record!({ "id": 1, "amount": 5 }),
            record!({ "id": 2 }),
            record!({ "id": 3, "amount": -2.5 }),
            record!({ "id": 4, "amount": Value::Null }),
        ];
        let mut controller = SortController::new();
        controller.update_order("amount", None).unwrap();
        controller.sort(&mut rows);
        assert_eq!(ids(&rows), [3, 2, 4, 1]);
    }

    #[test]
    fn test_missing_value_sorts_before_empty_string() {
        let a = Value::Null;
        let b = Value::from("");
        assert_eq!(compare_values(&a, &b), Ordering::Less);
        assert_eq!(compare_values(&b, &a), Ordering::Greater);
    }

    #[test]
    fn test_dates_and_numbers_share_scale() {
        let epoch_plus = Value::from(Utc.timestamp_millis_opt(1_000).unwrap());
        assert_eq!(compare_values(&epoch_plus, &Value::from(999)), Ordering::Greater);
        assert_eq!(compare_values(&Value::Null, &epoch_plus), Ordering::Less);
        assert_eq!(compare_values(&Value::from(true), &Value::from(0.5)), Ordering::Greater);
    }

    #[test]
    fn test_text_after_numbers() {
        assert_eq!(compare_values(&Value::from(1e9), &Value::from("a")), Ordering::Less);
        assert_eq!(compare_values(&Value::from("a"), &Value::from(false)), Ordering::Greater);
    }

    #[test]
    fn test_large_integer_ids_stay_distinct() {
        let mut controller = SortController::new();
        controller.update_order("v", None).unwrap();
        let low = record!({ "id": 9_007_199_254_740_992_i64, "v": 1 });
        let high = record!({ "id": 9_007_199_254_740_993_i64, "v": 1 });
        assert_eq!(controller.comparator(&low, &high), Ordering::Less);
        assert_eq!(controller.comparator(&high, &low), Ordering::Greater);

        controller.update_order("v", None).unwrap();
        assert_eq!(controller.comparator(&low, &high), Ordering::Greater);
    }

    #[test]
    fn test_integers_and_floats_compare_exactly() {
        let big = Value::from(9_007_199_254_740_993_i64);
        let float = Value::from(9_007_199_254_740_992.0);
        assert_eq!(compare_values(&big, &float), Ordering::Greater);
        assert_eq!(compare_values(&float, &big), Ordering::Less);

        assert_eq!(compare_values(&Value::from(2), &Value::from(2.0)), Ordering::Equal);
        assert_eq!(compare_values(&Value::from(2), &Value::from(2.5)), Ordering::Less);
        assert_eq!(compare_values(&Value::from(-2), &Value::from(-2.5)), Ordering::Greater);
        assert_eq!(compare_values(&Value::from(i64::MAX), &Value::from(1e19)), Ordering::Less);
        // same place as total_cmp puts it among floats
        assert_eq!(compare_values(&Value::from(0), &Value::from(-0.0)), Ordering::Greater);
        assert_eq!(compare_values(&Value::from(0), &Value::from(0.0)), Ordering::Equal);
        assert_eq!(compare_values(&Value::from(0), &Value::from(f64::NAN)), Ordering::Less);
    }

    #[test]
    fn test_ids_compare_case_sensitively() {
        let mut controller = SortController::new();
        controller.update_order("v", None).unwrap();
        let a = record!({ "id": "A", "v": 1 });
        let b = record!({ "id": "a", "v": 1 });
        assert_ne!(controller.comparator(&a, &b), Ordering::Equal);
    }

    #[test]
    fn test_direction_parse_and_serde() {
        assert_eq!("desc".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert!("up".parse::<SortDirection>().is_err());
        let state = SortState {
            attribute: Some("name".to_string()),
            direction: SortDirection::Desc,
        };
        assert_eq!(
            serde_json::to_string(&state).unwrap(),
            r#"{"direction":"desc","attribute":"name"}"#
        );
    }
}
