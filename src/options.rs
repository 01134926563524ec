//! Configuration options for number rendering.
//!
//! - [`NumberStyle`]: the thousands and decimal separators used by the built-in
//!   `number` and `percent` converters
//! - [`Separator`]: the characters a separator can be
//!
//! ## Examples
//!
//! ```rust
//! use sortable_table::{NumberStyle, Separator};
//!
//! // Default: "1 234.50"
//! let style = NumberStyle::new();
//! assert_eq!(style.thousands, Separator::Space);
//!
//! // Continental style: "1.234,50"
//! let style = NumberStyle::new()
//!     .with_thousands(Separator::Period)
//!     .with_decimal(Separator::Comma);
//! ```

use serde::{Deserialize, Serialize};

/// A separator character for grouped numbers.
///
/// # Examples
///
/// ```rust
/// use sortable_table::Separator;
///
/// assert_eq!(Separator::Space.as_str(), " ");
/// assert_eq!(Separator::Comma.as_str(), ",");
/// assert_eq!(Separator::None.as_str(), "");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Separator {
    #[default]
    Space,
    Comma,
    Period,
    Apostrophe,
    None,
}

impl Separator {
    /// Returns the string representation of this separator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Separator::Space => " ",
            Separator::Comma => ",",
            Separator::Period => ".",
            Separator::Apostrophe => "'",
            Separator::None => "",
        }
    }
}

/// Separators used when rendering numbers.
///
/// Digits are grouped by three from the decimal point leftward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberStyle {
    pub thousands: Separator,
    pub decimal: Separator,
}

impl Default for NumberStyle {
    fn default() -> Self {
        NumberStyle {
            thousands: Separator::Space,
            decimal: Separator::Period,
        }
    }
}

impl NumberStyle {
    /// Creates the default style: space-grouped thousands, period decimal point.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the thousands separator.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sortable_table::{NumberStyle, Separator};
    ///
    /// let style = NumberStyle::new().with_thousands(Separator::Comma);
    /// assert_eq!(style.group("1234567.89"), "1,234,567.89");
    /// ```
    #[must_use]
    pub fn with_thousands(mut self, thousands: Separator) -> Self {
        self.thousands = thousands;
        self
    }

    /// Sets the decimal separator.
    #[must_use]
    pub fn with_decimal(mut self, decimal: Separator) -> Self {
        self.decimal = decimal;
        self
    }

    /// Inserts separators into a fixed-point string such as `"-1234.50"`.
    ///
    /// Input that is not a plain decimal number (`"NaN"`, `"Infinity"`) is
    /// returned unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sortable_table::NumberStyle;
    ///
    /// let style = NumberStyle::new();
    /// assert_eq!(style.group("1234.5"), "1 234.5");
    /// assert_eq!(style.group("-1234567"), "-1 234 567");
    /// assert_eq!(style.group("NaN"), "NaN");
    /// ```
    #[must_use]
    pub fn group(&self, fixed: &str) -> String {
        let (sign, unsigned) = match fixed.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", fixed),
        };
        let (integer, fraction) = match unsigned.split_once('.') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (unsigned, None),
        };
        if integer.is_empty() || !integer.bytes().all(|b| b.is_ascii_digit()) {
            return fixed.to_string();
        }

        let thousands = self.thousands.as_str();
        let mut out = String::with_capacity(fixed.len() + integer.len() / 3 * thousands.len());
        out.push_str(sign);
        let len = integer.len();
        for (i, c) in integer.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                out.push_str(thousands);
            }
            out.push(c);
        }
        if let Some(fraction) = fraction {
            out.push_str(self.decimal.as_str());
            out.push_str(fraction);
        }
        out
    }
}
