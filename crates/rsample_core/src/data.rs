//! Minimal tabular data capability
//!
//! The engine only needs a row count and by-name column access. `Frame` is a
//! small in-memory implementation used by the CLI and the tests; any other
//! table type can plug in by implementing [`Table`].

use crate::error::{ResampleError, Result};

/// Borrowed view of one column's raw values, aligned to row order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnRef<'a> {
    Numeric(&'a [f64]),
    Categorical(&'a [String]),
}

impl ColumnRef<'_> {
    pub fn len(&self) -> usize {
        match self {
            ColumnRef::Numeric(values) => values.len(),
            ColumnRef::Categorical(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gather the values at `rows`, in the order given
    pub fn gather(&self, rows: &[usize]) -> Result<Column> {
        check_rows(rows, self.len())?;
        Ok(self.gather_in_bounds(rows))
    }

    /// `rows` must already be checked against the column length
    fn gather_in_bounds(&self, rows: &[usize]) -> Column {
        match self {
            ColumnRef::Numeric(values) => Column::Numeric(rows.iter().map(|&i| values[i]).collect()),
            ColumnRef::Categorical(values) => {
                Column::Categorical(rows.iter().map(|&i| values[i].clone()).collect())
            }
        }
    }
}

fn check_rows(rows: &[usize], nrow: usize) -> Result<()> {
    match rows.iter().find(|&&row| row >= nrow) {
        Some(row) => Err(ResampleError::invalid(
            "rows",
            format!("contains row {row} but the table has {nrow} rows"),
        )),
        None => Ok(()),
    }
}

/// Owned column values
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Numeric(Vec<f64>),
    Categorical(Vec<String>),
}

impl Column {
    pub fn view(&self) -> ColumnRef<'_> {
        match self {
            Column::Numeric(values) => ColumnRef::Numeric(values),
            Column::Categorical(values) => ColumnRef::Categorical(values),
        }
    }

    pub fn len(&self) -> usize {
        self.view().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read-only rectangular data source
pub trait Table {
    /// Number of rows
    fn nrow(&self) -> usize;

    /// Look up a column by name
    fn column(&self, name: &str) -> Option<ColumnRef<'_>>;

    /// Names of all columns, in table order
    fn column_names(&self) -> Vec<&str>;
}

/// Simple column-oriented in-memory table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    nrow: usize,
    columns: Vec<(String, Column)>,
}

impl Frame {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame with `nrow` rows and no columns, for strategies that only need row positions
    #[must_use]
    pub fn with_rows(nrow: usize) -> Self {
        Self {
            nrow,
            columns: Vec::new(),
        }
    }

    /// Add a column. The first column fixes the row count of an empty frame.
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Result<Self> {
        let name = name.into();
        if self.columns.iter().any(|(existing, _)| *existing == name) {
            return Err(ResampleError::invalid(
                "column",
                format!("'{name}' is already present in the frame"),
            ));
        }
        if self.columns.is_empty() && self.nrow == 0 {
            self.nrow = column.len();
        } else if column.len() != self.nrow {
            return Err(ResampleError::invalid(
                "column",
                format!(
                    "'{name}' has {} values but the frame has {} rows",
                    column.len(),
                    self.nrow
                ),
            ));
        }
        self.columns.push((name, column));
        Ok(self)
    }

    pub fn with_numeric(self, name: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        self.with_column(name, Column::Numeric(values))
    }

    pub fn with_categorical<S: Into<String>>(
        self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        let values = values.into_iter().map(Into::into).collect();
        self.with_column(name, Column::Categorical(values))
    }

    /// Materialize a new frame holding `rows` (in order, repeats allowed)
    pub fn take(&self, rows: &[usize]) -> Result<Frame> {
        check_rows(rows, self.nrow)?;
        Ok(self.take_in_bounds(rows))
    }

    fn take_in_bounds(&self, rows: &[usize]) -> Frame {
        Frame {
            nrow: rows.len(),
            columns: self
                .columns
                .iter()
                .map(|(name, column)| (name.clone(), column.view().gather_in_bounds(rows)))
                .collect(),
        }
    }
}

impl Table for Frame {
    fn nrow(&self) -> usize {
        self.nrow
    }

    fn column(&self, name: &str) -> Option<ColumnRef<'_>> {
        self.columns
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, column)| column.view())
    }

    fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }
}

/// Lazy view over a subset of a table's rows
///
/// Nothing is copied until a column is gathered.
#[derive(Debug, Clone)]
pub struct Subset<'a, D: ?Sized> {
    data: &'a D,
    rows: std::borrow::Cow<'a, [usize]>,
}

impl<'a, D: Table + ?Sized> Subset<'a, D> {
    pub(crate) fn new(data: &'a D, rows: std::borrow::Cow<'a, [usize]>) -> Self {
        Self { data, rows }
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn data(&self) -> &'a D {
        self.data
    }

    /// Values of column `name` for the subset's rows
    pub fn column(&self, name: &str) -> Option<Column> {
        // Subset rows come from a validated split
        self.data
            .column(name)
            .map(|column| column.gather_in_bounds(&self.rows))
    }
}

impl Subset<'_, Frame> {
    pub fn to_frame(&self) -> Frame {
        self.data.take_in_bounds(&self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> Frame {
        Frame::new()
            .with_numeric("x", vec![1.0, 2.0, 3.0, 4.0])
            .unwrap()
            .with_categorical("g", ["a", "b", "a", "c"])
            .unwrap()
    }

    #[test]
    fn test_frame_row_count_and_columns() {
        let frame = sample_frame();
        assert_eq!(frame.nrow(), 4);
        assert_eq!(frame.column_names(), vec!["x", "g"]);
        assert!(matches!(frame.column("x"), Some(ColumnRef::Numeric(v)) if v.len() == 4));
        assert!(frame.column("missing").is_none());
    }

    #[test]
    fn test_frame_rejects_mismatched_length() {
        let err = Frame::new()
            .with_numeric("x", vec![1.0, 2.0])
            .unwrap()
            .with_numeric("y", vec![1.0])
            .unwrap_err();
        assert_eq!(err.param(), Some("column"));
    }

    #[test]
    fn test_frame_rejects_duplicate_name() {
        let err = sample_frame().with_numeric("x", vec![0.0; 4]).unwrap_err();
        assert!(err.to_string().contains("already present"));
    }

    #[test]
    fn test_with_rows_then_column_must_match() {
        let frame = Frame::with_rows(3);
        assert_eq!(frame.nrow(), 3);
        assert!(frame.clone().with_numeric("x", vec![1.0; 2]).is_err());
        assert!(frame.with_numeric("x", vec![1.0; 3]).is_ok());
    }

    #[test]
    fn test_take_keeps_order_and_repeats() {
        let frame = sample_frame();
        let taken = frame.take(&[3, 0, 0]).unwrap();
        assert_eq!(taken.nrow(), 3);
        assert_eq!(
            taken.column("x"),
            Some(ColumnRef::Numeric(&[4.0, 1.0, 1.0]))
        );
    }

    #[test]
    fn test_out_of_range_rows_rejected() {
        let frame = sample_frame();
        let err = frame.take(&[0, 4]).unwrap_err();
        assert_eq!(err.param(), Some("rows"));

        let column = frame.column("g").unwrap();
        assert!(column.gather(&[9]).is_err());
        assert_eq!(
            column.gather(&[2]).unwrap(),
            Column::Categorical(vec!["a".to_string()])
        );
    }

    #[test]
    fn test_subset_gathers_lazily() {
        let frame = sample_frame();
        let subset = Subset::new(&frame, vec![1, 3].into());
        assert_eq!(subset.len(), 2);
        assert_eq!(
            subset.column("g"),
            Some(Column::Categorical(vec!["b".to_string(), "c".to_string()]))
        );
        assert_eq!(subset.to_frame().nrow(), 2);
    }
}
