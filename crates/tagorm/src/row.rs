//! Raw result rows.

use std::borrow::Cow;

/// One result row: column name → raw bytes, in the order the executor
/// returned the columns. Column names are unique; NULL cells are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    columns: Vec<String>,
    values: Vec<Vec<u8>>,
}

impl RawRow {
    /// An empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `column` to `value`, replacing an existing entry in place.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Vec<u8>>) {
        let column = column.into();
        let value = value.into();
        match self.position(&column) {
            Some(i) => self.values[i] = value,
            None => {
                self.columns.push(column);
                self.values.push(value);
            }
        }
    }

    pub fn get(&self, column: &str) -> Option<&[u8]> {
        self.position(column).map(|i| self.values[i].as_slice())
    }

    /// The cell as text (lossy for invalid UTF-8).
    pub fn get_str(&self, column: &str) -> Option<Cow<'_, str>> {
        self.get(column).map(String::from_utf8_lossy)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.position(column).is_some()
    }

    /// The first column's value, if the row has any columns.
    pub fn first(&self) -> Option<&[u8]> {
        self.values.first().map(Vec::as_slice)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(Vec::as_slice))
    }

    pub fn into_first(self) -> Option<Vec<u8>> {
        self.values.into_iter().next()
    }

    fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }
}

impl<K, V> FromIterator<(K, V)> for RawRow
where
    K: Into<String>,
    V: Into<Vec<u8>>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RawRow::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}
