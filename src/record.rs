//! The record interface the sort controller and table view read from.

use crate::{RecordMap, Value};

/// A keyed entity owned by a host collection.
///
/// The core only reads attributes through [`Record::get`] and never creates or
/// destroys records.
///
/// # Examples
///
/// ```rust
/// use sortable_table::{Record, RecordMap, Value};
///
/// struct Invoice {
///     id: Value,
///     fields: RecordMap,
/// }
///
/// impl Record for Invoice {
///     fn get(&self, attribute: &str) -> Option<&Value> {
///         if attribute == "id" { Some(&self.id) } else { self.fields.get(attribute) }
///     }
///
///     fn to_map(&self) -> RecordMap {
///         let mut map = RecordMap::new();
///         map.insert("id".to_string(), self.id.clone());
///         map.extend(self.fields.clone());
///         map
///     }
/// }
/// ```
pub trait Record {
    /// Returns the named attribute, or `None` when the record does not have it.
    fn get(&self, attribute: &str) -> Option<&Value>;

    /// Returns the identity used to break ties between equal attribute values.
    fn id(&self) -> Option<&Value> {
        self.get("id")
    }

    /// Returns the record as a plain ordered mapping.
    fn to_map(&self) -> RecordMap;
}

impl Record for RecordMap {
    fn get(&self, attribute: &str) -> Option<&Value> {
        RecordMap::get(self, attribute)
    }

    fn to_map(&self) -> RecordMap {
        self.clone()
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn get(&self, attribute: &str) -> Option<&Value> {
        (**self).get(attribute)
    }

    fn id(&self) -> Option<&Value> {
        (**self).id()
    }

    fn to_map(&self) -> RecordMap {
        (**self).to_map()
    }
}
