//! Column descriptors: label, row key, declared type and affixes.

use crate::error::TableError;
use ratatui::layout::Alignment;
use serde::{Deserialize, Serialize};

/// Declared column type, selecting the cell formatter and comparator.
///
/// Unknown type names deserialize as [`ColumnType::String`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnType {
    /// Rendered as-is.
    #[default]
    String,
    /// Rendered as-is, right aligned.
    Number,
    /// `"/Date(<millis>)/"` text rendered as `MM/DD/YYYY`.
    Date,
    /// Numbers rendered with two decimals, right aligned.
    Float,
}

impl ColumnType {
    /// The name used in header JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Number => "number",
            ColumnType::Date => "date",
            ColumnType::Float => "float",
        }
    }

    /// Numeric columns align right, everything else left.
    pub fn alignment(self) -> Alignment {
        match self {
            ColumnType::Number | ColumnType::Float => Alignment::Right,
            ColumnType::String | ColumnType::Date => Alignment::Left,
        }
    }
}

impl From<String> for ColumnType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "number" => ColumnType::Number,
            "date" => ColumnType::Date,
            "float" => ColumnType::Float,
            _ => ColumnType::String,
        }
    }
}

impl From<ColumnType> for String {
    fn from(t: ColumnType) -> Self {
        t.as_str().to_string()
    }
}

/// Which row field a column shows and how.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnData {
    /// Row key holding the cell value.
    pub value: String,
    /// Literal text, or a row key whose value is shown before the cell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Literal text, or a row key whose value is shown after the cell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    /// Declared type; unset behaves like [`ColumnType::String`].
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub column_type: Option<ColumnType>,
}

fn enabled() -> bool {
    true
}

/// A column of the data table.
///
/// # Example
///
/// ```ignore
/// let price = ColumnHeader::new("Usage Price", "UsagePrice")
///     .with_type(ColumnType::Float)
///     .with_prefix("$")
///     .filterable(false);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnHeader {
    /// Display name.
    pub label: String,
    /// Field binding.
    pub data: ColumnData,
    /// Whether clicking the header sorts by this column.
    #[serde(rename = "sort", default = "enabled")]
    pub sortable: bool,
    /// Whether the filter bar offers a menu for this column.
    #[serde(rename = "filter", default = "enabled")]
    pub filterable: bool,
}

impl ColumnHeader {
    /// A sortable, filterable string column bound to `key`.
    pub fn new(label: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: ColumnData {
                value: key.into(),
                ..ColumnData::default()
            },
            sortable: true,
            filterable: true,
        }
    }

    /// Set the declared column type.
    pub fn with_type(mut self, column_type: ColumnType) -> Self {
        self.data.column_type = Some(column_type);
        self
    }

    /// Set the prefix (literal or row key).
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.data.prefix = Some(prefix.into());
        self
    }

    /// Set the suffix (literal or row key).
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.data.suffix = Some(suffix.into());
        self
    }

    /// Enable or disable sorting on this column.
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// Enable or disable the filter menu for this column.
    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    /// The row key this column reads.
    pub fn key(&self) -> &str {
        &self.data.value
    }

    /// The declared type, defaulting to [`ColumnType::String`].
    pub fn column_type(&self) -> ColumnType {
        self.data.column_type.unwrap_or_default()
    }

    /// Cell alignment. Columns without a declared type align left.
    pub fn alignment(&self) -> Alignment {
        self.data
            .column_type
            .map_or(Alignment::Left, ColumnType::alignment)
    }
}

/// Parse a JSON array of column headers.
pub fn headers_from_json(json: &str) -> Result<Vec<ColumnHeader>, TableError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let h = ColumnHeader::new("Supplier", "SupplierName");
        assert_eq!(h.key(), "SupplierName");
        assert_eq!(h.column_type(), ColumnType::String);
        assert!(h.sortable && h.filterable);
        assert_eq!(h.alignment(), Alignment::Left);
    }

    #[test]
    fn numeric_columns_align_right() {
        let h = ColumnHeader::new("Used", "UsedInventory").with_type(ColumnType::Number);
        assert_eq!(h.alignment(), Alignment::Right);
        let h = ColumnHeader::new("Price", "UsagePrice").with_type(ColumnType::Float);
        assert_eq!(h.alignment(), Alignment::Right);
        let h = ColumnHeader::new("Date", "CreatedDateTime").with_type(ColumnType::Date);
        assert_eq!(h.alignment(), Alignment::Left);
    }

    #[test]
    fn headers_parse_with_original_field_names() {
        let headers = headers_from_json(
            r#"[
                {"label": "Date", "data": {"value": "CreatedDateTime", "type": "date"}},
                {"label": "Added",
                 "data": {"value": "AddedInventory", "suffix": "QuantityUOM", "type": "number"},
                 "filter": false, "sort": false},
                {"label": "Usage Price", "data": {"prefix": "$", "value": "UsagePrice", "type": "float"}}
            ]"#,
        )
        .unwrap();

        assert_eq!(headers.len(), 3);
        assert_eq!(headers[0].column_type(), ColumnType::Date);
        assert!(headers[0].sortable && headers[0].filterable);
        assert_eq!(headers[1].data.suffix.as_deref(), Some("QuantityUOM"));
        assert!(!headers[1].sortable && !headers[1].filterable);
        assert_eq!(headers[2].data.prefix.as_deref(), Some("$"));
        assert_eq!(headers[2].column_type(), ColumnType::Float);
    }

    #[test]
    fn unknown_type_falls_back_to_string() {
        let headers =
            headers_from_json(r#"[{"label": "X", "data": {"value": "x", "type": "currency"}}]"#)
                .unwrap();
        assert_eq!(headers[0].data.column_type, Some(ColumnType::String));
    }
}
