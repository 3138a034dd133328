//! Type-aware cell rendering.
//!
//! Formatting never fails. Values that cannot be converted pass through
//! unchanged (or render empty, for floats); the [`Conversion`] tag says which
//! of those happened.

use crate::header::{ColumnHeader, ColumnType};
use crate::value::{Row, Value};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use ratatui::layout::Alignment;
use std::fmt;

const DATE_OPEN: &str = "/Date(";
const DATE_CLOSE: &str = ")/";

/// What the formatter did with a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// The column type's conversion applied.
    Converted,
    /// The value was shown as-is.
    PassedThrough,
    /// The value did not fit the column type and renders empty.
    Rejected,
    /// The cell was missing or falsy; the placeholder is shown.
    Placeholder,
}

/// A formatted value without affixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    /// Display text.
    pub text: String,
    /// How the text was produced.
    pub conversion: Conversion,
}

impl Formatted {
    fn new(text: impl Into<String>, conversion: Conversion) -> Self {
        Self {
            text: text.into(),
            conversion,
        }
    }
}

/// A fully rendered cell: optional prefix, the value, optional suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Text shown before the value.
    pub prefix: Option<String>,
    /// The formatted value.
    pub text: String,
    /// Text shown after the value.
    pub suffix: Option<String>,
    /// How the value was produced.
    pub conversion: Conversion,
    /// Horizontal alignment for the column.
    pub alignment: Alignment,
}

impl Cell {
    /// Whether this cell shows the placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.conversion == Conversion::Placeholder
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = &self.prefix {
            write!(f, "{prefix} ")?;
        }
        f.write_str(&self.text)?;
        if let Some(suffix) = &self.suffix {
            write!(f, " {suffix}")?;
        }
        Ok(())
    }
}

/// Converts raw row values into display text.
///
/// # Example
///
/// ```ignore
/// let fmt = CellFormatter::default();
/// let row = Row::new().with("UsagePrice", 1.5);
/// let header = ColumnHeader::new("Price", "UsagePrice")
///     .with_type(ColumnType::Float)
///     .with_prefix("$");
/// assert_eq!(fmt.format_cell(&row, &header).to_string(), "$ 1.50");
/// ```
#[derive(Debug, Clone)]
pub struct CellFormatter {
    offset: FixedOffset,
    placeholder: String,
}

impl Default for CellFormatter {
    fn default() -> Self {
        Self {
            offset: Utc.fix(),
            placeholder: "-".to_string(),
        }
    }
}

impl CellFormatter {
    /// A formatter rendering dates in UTC with `-` as the placeholder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Render dates in the given fixed offset instead of UTC.
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Use a different placeholder for missing cells.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// The placeholder text.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Format a bare value for a column type. `None` means no declared type.
    pub fn format_value(&self, value: &Value, column_type: Option<ColumnType>) -> Formatted {
        match column_type {
            Some(ColumnType::Date) => self.format_date_value(value),
            Some(ColumnType::Float) => match format_float(value) {
                Some(text) => Formatted::new(text, Conversion::Converted),
                None => Formatted::new("", Conversion::Rejected),
            },
            Some(ColumnType::Number) | Some(ColumnType::String) | None => {
                Formatted::new(value.to_string(), Conversion::PassedThrough)
            }
        }
    }

    /// Format the cell of `row` under `header`, including affixes.
    ///
    /// A missing or falsy value renders the placeholder and skips the affixes.
    pub fn format_cell(&self, row: &Row, header: &ColumnHeader) -> Cell {
        let alignment = header.alignment();
        let value = match row.get(header.key()) {
            Some(v) if v.is_truthy() => v,
            _ => {
                return Cell {
                    prefix: None,
                    text: self.placeholder.clone(),
                    suffix: None,
                    conversion: Conversion::Placeholder,
                    alignment,
                }
            }
        };

        let formatted = self.format_value(value, header.data.column_type);
        Cell {
            prefix: resolve_affix(header.data.prefix.as_deref(), row),
            text: formatted.text,
            suffix: resolve_affix(header.data.suffix.as_deref(), row),
            conversion: formatted.conversion,
            alignment,
        }
    }

    /// Format epoch milliseconds as `MM/DD/YYYY` in this formatter's offset.
    pub fn format_date(&self, millis: i64) -> Option<String> {
        let utc = DateTime::<Utc>::from_timestamp_millis(millis)?;
        Some(utc.with_timezone(&self.offset).format("%m/%d/%Y").to_string())
    }

    fn format_date_value(&self, value: &Value) -> Formatted {
        let passthrough = || Formatted::new(value.to_string(), Conversion::PassedThrough);
        match parse_date_millis(value) {
            Some(0) | None => passthrough(),
            Some(millis) => match self.format_date(millis) {
                Some(text) => Formatted::new(text, Conversion::Converted),
                None => Formatted::new(value.to_string(), Conversion::Rejected),
            },
        }
    }
}

/// Decode the epoch milliseconds from `"/Date(<millis>)/"` text.
///
/// Every `/Date(` and `)/` is removed and the remainder is read as a leading
/// integer, so trailing garbage after the digits is ignored. Returns `None`
/// for non-text values, text without the marker, and text with no digits.
pub fn parse_date_millis(value: &Value) -> Option<i64> {
    let text = value.as_text()?;
    if !text.contains(DATE_OPEN) {
        return None;
    }
    let stripped = text.replace(DATE_OPEN, "").replace(DATE_CLOSE, "");
    parse_leading_int(&stripped)
}

fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let n: i64 = digits[..end].parse().ok()?;
    Some(if negative { -n } else { n })
}

/// Render a number with exactly two decimals. Non-numbers and NaN yield
/// `None`.
pub fn format_float(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) if n.is_nan() => None,
        Value::Number(n) if n.is_infinite() => Some(value.to_string()),
        Value::Number(n) => Some(format!("{n:.2}")),
        _ => None,
    }
}

// An affix naming a row key shows that field; anything else is literal.
// A field holding null shows nothing.
fn resolve_affix(affix: Option<&str>, row: &Row) -> Option<String> {
    let affix = affix.filter(|a| !a.is_empty())?;
    match row.get(affix) {
        Some(Value::Null) => None,
        Some(v) => Some(v.to_string()),
        None => Some(affix.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt() -> CellFormatter {
        CellFormatter::default()
    }

    fn date(text: &str) -> Formatted {
        fmt().format_value(&Value::from(text), Some(ColumnType::Date))
    }

    // ── Dates ──

    #[test]
    fn date_wire_format_converts() {
        let out = date("/Date(1666949100000)/");
        assert_eq!(out.text, "10/28/2022");
        assert_eq!(out.conversion, Conversion::Converted);
    }

    #[test]
    fn zero_epoch_passes_through() {
        let out = date("/Date(0)/");
        assert_eq!(out.text, "/Date(0)/");
        assert_eq!(out.conversion, Conversion::PassedThrough);
    }

    #[test]
    fn negative_epoch_converts() {
        assert_eq!(date("/Date(-86400000)/").text, "12/31/1969");
    }

    #[test]
    fn malformed_dates_pass_through() {
        for raw in ["/Date(abc)/", "2022-10-28", "", "x/Date(12)/y"] {
            let out = date(raw);
            assert_eq!(out.text, raw);
            assert_eq!(out.conversion, Conversion::PassedThrough);
        }
    }

    #[test]
    fn trailing_garbage_after_digits_is_ignored() {
        assert_eq!(
            parse_date_millis(&Value::from("/Date(1666949100000+0000)/")),
            Some(1666949100000)
        );
    }

    #[test]
    fn non_text_date_passes_through() {
        let out = fmt().format_value(&Value::from(1666949100000i64), Some(ColumnType::Date));
        assert_eq!(out.text, "1666949100000");
        assert_eq!(out.conversion, Conversion::PassedThrough);
    }

    #[test]
    fn out_of_range_epoch_is_rejected() {
        let out = date("/Date(9223372036854775807)/");
        assert_eq!(out.conversion, Conversion::Rejected);
        assert_eq!(out.text, "/Date(9223372036854775807)/");
    }

    #[test]
    fn date_respects_offset() {
        let Some(minus_ten) = FixedOffset::west_opt(10 * 3600) else {
            panic!("valid offset");
        };
        let fmt = fmt().with_offset(minus_ten);
        // 2022-10-28T09:25:00Z is still the 27th ten hours west.
        assert_eq!(fmt.format_date(1666949100000).as_deref(), Some("10/27/2022"));
    }

    // ── Numbers ──

    #[test]
    fn float_renders_two_decimals() {
        let f = fmt();
        let out = f.format_value(&Value::from(1.5), Some(ColumnType::Float));
        assert_eq!(out.text, "1.50");
        assert_eq!(out.conversion, Conversion::Converted);
        assert_eq!(
            f.format_value(&Value::from(3), Some(ColumnType::Float)).text,
            "3.00"
        );
    }

    #[test]
    fn float_rejects_text_and_nan() {
        let f = fmt();
        let out = f.format_value(&Value::from("abc"), Some(ColumnType::Float));
        assert_eq!(out.text, "");
        assert_eq!(out.conversion, Conversion::Rejected);
        let out = f.format_value(&Value::Number(f64::NAN), Some(ColumnType::Float));
        assert_eq!(out.conversion, Conversion::Rejected);
    }

    #[test]
    fn number_and_string_pass_through() {
        let f = fmt();
        assert_eq!(
            f.format_value(&Value::from(2.25), Some(ColumnType::Number)).text,
            "2.25"
        );
        assert_eq!(f.format_value(&Value::from("abc"), None).text, "abc");
        assert_eq!(
            f.format_value(&Value::from("/Date(1666949100000)/"), Some(ColumnType::String))
                .text,
            "/Date(1666949100000)/"
        );
    }

    // ── Cells ──

    #[test]
    fn missing_cell_is_placeholder_without_affixes() {
        let header = ColumnHeader::new("Price", "UsagePrice")
            .with_prefix("$")
            .with_suffix("USD");
        let cell = fmt().format_cell(&Row::new().with("Other", 1), &header);
        assert!(cell.is_placeholder());
        assert_eq!(cell.to_string(), "-");
    }

    #[test]
    fn falsy_cell_is_placeholder() {
        let header = ColumnHeader::new("Added", "AddedInventory").with_type(ColumnType::Number);
        for v in [Value::from(0), Value::from(""), Value::Null, Value::from(false)] {
            let row = Row::new().with("AddedInventory", v);
            assert!(fmt().format_cell(&row, &header).is_placeholder());
        }
    }

    #[test]
    fn literal_and_looked_up_affixes() {
        let row = Row::new()
            .with("UsedInventory", 12)
            .with("QuantityUOM", "kg")
            .with("UsagePrice", 9.5);

        let used = ColumnHeader::new("Used", "UsedInventory")
            .with_type(ColumnType::Number)
            .with_suffix("QuantityUOM");
        assert_eq!(fmt().format_cell(&row, &used).to_string(), "12 kg");

        let price = ColumnHeader::new("Price", "UsagePrice")
            .with_type(ColumnType::Float)
            .with_prefix("$");
        let cell = fmt().format_cell(&row, &price);
        assert_eq!(cell.to_string(), "$ 9.50");
        assert_eq!(cell.alignment, Alignment::Right);
    }

    #[test]
    fn null_affix_field_is_omitted() {
        let row = Row::new()
            .with("UsedInventory", 12)
            .with("QuantityUOM", Value::Null);
        let used = ColumnHeader::new("Used", "UsedInventory").with_suffix("QuantityUOM");
        let cell = fmt().format_cell(&row, &used);
        assert_eq!(cell.suffix, None);
        assert_eq!(cell.to_string(), "12");
    }

    #[test]
    fn empty_affix_is_omitted() {
        let row = Row::new().with("Name", "Acme");
        let header = ColumnHeader::new("Name", "Name").with_prefix("").with_suffix("");
        assert_eq!(fmt().format_cell(&row, &header).to_string(), "Acme");
    }

    #[test]
    fn custom_placeholder() {
        let header = ColumnHeader::new("X", "x");
        let cell = fmt()
            .with_placeholder("n/a")
            .format_cell(&Row::new(), &header);
        assert_eq!(cell.text, "n/a");
    }
}
