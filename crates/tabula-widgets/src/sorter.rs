//! Column sorting over a row permutation.
//!
//! Rows are never moved. A sort re-orders a `Vec<usize>` of indices into the
//! row arena, so other views of the same rows are unaffected.

use crate::format::parse_date_millis;
use crate::header::ColumnType;
use crate::value::{Row, Value};
use std::cmp::Ordering;

/// Sort direction for a column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// The opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Apply this direction to an ascending comparison result.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    /// Glyph for column headers.
    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Where rows without a usable sort value end up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingKeys {
    /// Before every row that has the key, in either direction.
    First,
    /// After every row that has the key, in either direction.
    #[default]
    Last,
}

/// The active sort column and direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    key: Option<String>,
    direction: SortDirection,
}

impl SortState {
    /// The sorted column key, if any.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// The current direction. Meaningless until a key is set.
    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Whether `key` is the sorted column.
    pub fn is_sorted_by(&self, key: &str) -> bool {
        self.key.as_deref() == Some(key)
    }

    /// Record a sort request for `key` and return the direction to sort in.
    ///
    /// Requesting the current key flips the direction; any other key starts
    /// ascending.
    pub fn toggle(&mut self, key: &str) -> SortDirection {
        self.direction = if self.is_sorted_by(key) {
            self.direction.flipped()
        } else {
            SortDirection::Ascending
        };
        self.key = Some(key.to_string());
        self.direction
    }

    /// Forget the sort column.
    pub fn clear(&mut self) {
        self.key = None;
        self.direction = SortDirection::Ascending;
    }
}

/// A value reduced to what the comparator looks at.
///
/// Keys order by class first (decoded date, number, NaN, text) and then
/// within the class, which keeps the order total for any mix of values.
#[derive(Debug, Clone)]
enum SortKey {
    Date(i64),
    Number(f64),
    NotANumber,
    Text(String),
}

impl SortKey {
    /// Numbers, booleans and text that parses as a number all land in the
    /// number class. Only date columns decode `/Date(..)/`.
    fn of(value: &Value, column_type: ColumnType) -> Self {
        if column_type == ColumnType::Date {
            if let Some(millis) = parse_date_millis(value) {
                return SortKey::Date(millis);
            }
        }
        let number = value.as_number().or_else(|| parse_number(value));
        match number {
            Some(n) if n.is_nan() => SortKey::NotANumber,
            Some(n) => SortKey::Number(n),
            None => SortKey::Text(fold(value)),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Date(_) => 0,
            SortKey::Number(_) => 1,
            SortKey::NotANumber => 2,
            SortKey::Text(_) => 3,
        }
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Date(x), SortKey::Date(y)) => x.cmp(y),
            (SortKey::Number(x), SortKey::Number(y)) => x.total_cmp(y),
            (SortKey::Text(x), SortKey::Text(y)) => x.cmp(y),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey {}

/// Compare two present values ascending.
///
/// - on date columns, decodable `/Date(..)/` values compare by epoch and
///   order before everything else,
/// - numbers, booleans and numeric text compare numerically,
/// - NaN orders after every number,
/// - remaining text compares case-insensitively (upper-cased) and orders
///   last.
pub fn compare_values(a: &Value, b: &Value, column_type: ColumnType) -> Ordering {
    SortKey::of(a, column_type).cmp(&SortKey::of(b, column_type))
}

fn parse_number(v: &Value) -> Option<f64> {
    v.as_text()?.trim().parse().ok()
}

fn fold(v: &Value) -> String {
    match v {
        Value::Text(s) => s.to_uppercase(),
        other => other.to_string(),
    }
}

/// Stable-sort `order` (indices into `rows`) by the column `key`.
///
/// Rows that lack the key, or hold `null`, are grouped according to
/// `missing` regardless of `direction`, keeping their relative order.
pub fn sort_order(
    rows: &[Row],
    order: &mut [usize],
    key: &str,
    direction: SortDirection,
    column_type: ColumnType,
    missing: MissingKeys,
) {
    let missing_side = match missing {
        MissingKeys::First => Ordering::Less,
        MissingKeys::Last => Ordering::Greater,
    };
    // Null counts as missing so it groups with absent keys.
    let keys: Vec<Option<SortKey>> = rows
        .iter()
        .map(|row| {
            row.get(key)
                .filter(|v| **v != Value::Null)
                .map(|v| SortKey::of(v, column_type))
        })
        .collect();
    let key_at = |i: usize| keys.get(i).and_then(Option::as_ref);

    order.sort_by(|&a, &b| match (key_at(a), key_at(b)) {
        (Some(x), Some(y)) => direction.apply(x.cmp(y)),
        (None, Some(_)) => missing_side,
        (Some(_), None) => missing_side.reverse(),
        (None, None) => Ordering::Equal,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows_k(values: &[&str]) -> Vec<Row> {
        values.iter().map(|v| Row::new().with("k", *v)).collect()
    }

    fn keys(rows: &[Row], order: &[usize], key: &str) -> Vec<String> {
        order
            .iter()
            .map(|&i| rows[i].get(key).map(Value::to_string).unwrap_or_default())
            .collect()
    }

    fn sorted(rows: &[Row], key: &str, direction: SortDirection, ty: ColumnType) -> Vec<usize> {
        let mut order: Vec<usize> = (0..rows.len()).collect();
        sort_order(rows, &mut order, key, direction, ty, MissingKeys::Last);
        order
    }

    // ── Direction state ──

    #[test]
    fn toggle_same_key_flips() {
        let mut s = SortState::default();
        assert_eq!(s.toggle("k"), SortDirection::Ascending);
        assert_eq!(s.toggle("k"), SortDirection::Descending);
        assert_eq!(s.toggle("k"), SortDirection::Ascending);
        assert_eq!(s.key(), Some("k"));
    }

    #[test]
    fn toggle_new_key_resets_to_ascending() {
        let mut s = SortState::default();
        s.toggle("a");
        s.toggle("a");
        assert_eq!(s.direction(), SortDirection::Descending);
        assert_eq!(s.toggle("b"), SortDirection::Ascending);
        assert!(s.is_sorted_by("b"));
        s.clear();
        assert_eq!(s.key(), None);
    }

    // ── Ordering ──

    #[test]
    fn ascending_then_descending() {
        let rows = rows_k(&["b", "a", "c"]);
        let mut state = SortState::default();
        let mut order: Vec<usize> = (0..rows.len()).collect();

        let dir = state.toggle("k");
        sort_order(&rows, &mut order, "k", dir, ColumnType::String, MissingKeys::Last);
        assert_eq!(keys(&rows, &order, "k"), vec!["a", "b", "c"]);

        let dir = state.toggle("k");
        sort_order(&rows, &mut order, "k", dir, ColumnType::String, MissingKeys::Last);
        assert_eq!(keys(&rows, &order, "k"), vec!["c", "b", "a"]);
    }

    #[test]
    fn text_is_case_insensitive() {
        let rows = rows_k(&["banana", "Apple", "cherry"]);
        let order = sorted(&rows, "k", SortDirection::Ascending, ColumnType::String);
        assert_eq!(keys(&rows, &order, "k"), vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn numbers_compare_numerically() {
        let rows: Vec<Row> = [10, 9, 100, -1]
            .iter()
            .map(|n| Row::new().with("n", *n))
            .collect();
        let order = sorted(&rows, "n", SortDirection::Ascending, ColumnType::Number);
        assert_eq!(keys(&rows, &order, "n"), vec!["-1", "9", "10", "100"]);
    }

    #[test]
    fn equal_keys_keep_prior_order() {
        let rows: Vec<Row> = [("x", 1), ("y", 0), ("x", 2), ("y", 3), ("x", 4)]
            .iter()
            .map(|(k, id)| Row::new().with("k", *k).with("id", *id))
            .collect();
        let order = sorted(&rows, "k", SortDirection::Ascending, ColumnType::String);
        assert_eq!(keys(&rows, &order, "id"), vec!["1", "2", "4", "0", "3"]);
    }

    #[test]
    fn missing_keys_sink_in_both_directions() {
        let rows = vec![
            Row::new().with("k", "b"),
            Row::new().with("other", 1),
            Row::new().with("k", "a"),
            Row::new().with("k", Value::Null),
            Row::new().with("k", "c"),
        ];
        let asc = sorted(&rows, "k", SortDirection::Ascending, ColumnType::String);
        assert_eq!(asc, vec![2, 0, 4, 1, 3]);
        let desc = sorted(&rows, "k", SortDirection::Descending, ColumnType::String);
        assert_eq!(desc, vec![4, 0, 2, 1, 3]);
    }

    #[test]
    fn missing_keys_can_float() {
        let rows = vec![
            Row::new().with("k", "b"),
            Row::new(),
            Row::new().with("k", "a"),
        ];
        let mut order = vec![0, 1, 2];
        sort_order(
            &rows,
            &mut order,
            "k",
            SortDirection::Descending,
            ColumnType::String,
            MissingKeys::First,
        );
        assert_eq!(order, vec![1, 0, 2]);
    }

    #[test]
    fn date_columns_compare_by_epoch() {
        // Lexically "/Date(999..." > "/Date(1000...", by epoch it is smaller.
        let rows = rows_k(&["/Date(1000000000000)/", "/Date(999999999999)/"]);
        let order = sorted(&rows, "k", SortDirection::Ascending, ColumnType::Date);
        assert_eq!(order, vec![1, 0]);
        let order = sorted(&rows, "k", SortDirection::Ascending, ColumnType::String);
        assert_eq!(order, vec![0, 1]);
    }

    #[test]
    fn mixed_number_and_text() {
        assert_eq!(
            compare_values(&Value::from(5), &Value::from("10"), ColumnType::String),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&Value::from(5), &Value::from("abc"), ColumnType::String),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&Value::from("abc"), &Value::from(5), ColumnType::String),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(&Value::from(true), &Value::from(0), ColumnType::String),
            Ordering::Greater
        );
    }

    #[test]
    fn numeric_text_joins_numbers() {
        let nine = Value::from(9);
        let ten = Value::from("10");
        let nine_text = Value::from("9");
        assert_eq!(compare_values(&nine, &ten, ColumnType::String), Ordering::Less);
        assert_eq!(compare_values(&nine_text, &ten, ColumnType::String), Ordering::Less);
        assert_eq!(
            compare_values(&nine, &nine_text, ColumnType::String),
            Ordering::Equal
        );
    }

    #[test]
    fn nan_orders_between_numbers_and_text() {
        let nan = Value::Number(f64::NAN);
        assert_eq!(
            compare_values(&Value::from(1e9), &nan, ColumnType::Number),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&nan, &Value::from("abc"), ColumnType::Number),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&nan, &Value::from("NaN"), ColumnType::Number),
            Ordering::Equal
        );
    }

    #[test]
    fn decoded_dates_order_before_other_values() {
        let date = Value::from("/Date(1666949100000)/");
        for other in [Value::from(1), Value::from("abc"), Value::from("/Date(x)/")] {
            assert_eq!(
                compare_values(&date, &other, ColumnType::Date),
                Ordering::Less,
                "{other:?}"
            );
        }
    }

    // Deterministic xorshift so mixed-value grids are reproducible.
    fn seeded(seed: u64) -> impl FnMut() -> u64 {
        let mut state = seed;
        move || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        }
    }

    fn mixed_value(next: &mut impl FnMut() -> u64) -> Value {
        let n = (next() % 50) as i64 - 10;
        match next() % 9 {
            0 => Value::from(n),
            1 => Value::from(n as f64 + 0.5),
            2 => Value::from(n.to_string()),
            3 => Value::from(format!(" {n}.25 ")),
            4 => Value::from(format!("x{n}")),
            5 => Value::Number(f64::NAN),
            6 => Value::from(n % 2 == 0),
            7 => Value::from(format!("/Date({})/", 1_600_000_000_000 + n * 86_400_000)),
            _ => Value::from("/Date(bogus)/"),
        }
    }

    fn assert_sorted_and_stable(rows: &[Row], order: &[usize], ty: ColumnType) {
        let mut seen = order.to_vec();
        seen.sort_unstable();
        assert_eq!(seen, (0..rows.len()).collect::<Vec<_>>());

        for pair in order.windows(2) {
            let (a, b) = (&rows[pair[0]], &rows[pair[1]]);
            let ordering = compare_values(a.get("k").unwrap(), b.get("k").unwrap(), ty);
            assert_ne!(ordering, Ordering::Greater, "{:?} before {:?}", a, b);
            if ordering == Ordering::Equal {
                assert!(pair[0] < pair[1], "equal keys swapped: {pair:?}");
            }
        }
    }

    #[test]
    fn mixed_values_sort_without_panicking() {
        for (round, ty) in [ColumnType::String, ColumnType::Number, ColumnType::Date]
            .into_iter()
            .cycle()
            .take(12)
            .enumerate()
        {
            let mut next = seeded(0x9E37_79B9_7F4A_7C15 ^ round as u64);
            let rows: Vec<Row> = (0..300)
                .map(|_| Row::new().with("k", mixed_value(&mut next)))
                .collect();
            let order = sorted(&rows, "k", SortDirection::Ascending, ty);
            assert_sorted_and_stable(&rows, &order, ty);
        }
    }

    #[test]
    fn mixed_date_column_groups_decoded_dates_first() {
        let rows = rows_k(&[
            "pending",
            "/Date(1666949100000)/",
            "/Date(nope)/",
            "/Date(1000)/",
        ]);
        let order = sorted(&rows, "k", SortDirection::Ascending, ColumnType::Date);
        assert_eq!(order, vec![3, 1, 2, 0]);
    }

    #[test]
    fn reverse_of_previous_sort_without_duplicates() {
        let rows: Vec<Row> = (0..30)
            .map(|i| Row::new().with("n", (i * 7919) % 101))
            .collect();
        let asc = sorted(&rows, "n", SortDirection::Ascending, ColumnType::Number);
        let mut desc = asc.clone();
        sort_order(
            &rows,
            &mut desc,
            "n",
            SortDirection::Descending,
            ColumnType::Number,
            MissingKeys::Last,
        );
        let mut reversed = asc;
        reversed.reverse();
        assert_eq!(desc, reversed);
    }
}
