// 📋 Table Layer - typed cells + CSV I/O
// Columns are kept by name and position; every cell is explicitly nullable

use crate::error::{DriftError, DriftResult};
use std::fmt;
use std::path::Path;

/// Tokens read as missing, same set a pandas `read_csv` treats as NA
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ============================================================================
// CELL VALUE
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Missing,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Parse a raw CSV field; NA tokens become `Missing`, everything else stays text
    pub fn from_field(field: &str) -> Self {
        if NA_TOKENS.contains(&field) {
            Value::Missing
        } else {
            Value::Text(field.to_string())
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Numeric view of the cell. Text is trimmed and parsed.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Missing => None,
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Text(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => Ok(()),
            Value::Int(i) => write!(f, "{}", i),
            // Integral floats keep their decimal point ("1889.0")
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{:.1}", x),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => f.write_str(s),
        }
    }
}

// ============================================================================
// TABLE
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == headers.len()));
        Table { headers, rows }
    }

    /// Build a table from raw text fields, applying the same NA rules as `load_csv`
    pub fn from_fields(headers: &[&str], rows: &[Vec<&str>]) -> Self {
        let headers = headers.iter().map(|h| h.to_string()).collect();
        let rows = rows
            .iter()
            .map(|r| r.iter().map(|f| Value::from_field(f)).collect())
            .collect();
        Table::new(headers, rows)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Values of one column in row order
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| &r[idx]).collect())
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut Value> {
        self.rows.get_mut(row).and_then(|r| r.get_mut(col))
    }

    /// Remove a column by name. Returns false if it was not present.
    pub fn drop_column(&mut self, name: &str) -> bool {
        let Some(idx) = self.column_index(name) else {
            return false;
        };
        self.headers.remove(idx);
        for row in &mut self.rows {
            row.remove(idx);
        }
        true
    }

    /// Replace every cell of a column with `f(cell)`. Returns false if absent.
    pub fn map_column<F>(&mut self, name: &str, mut f: F) -> bool
    where
        F: FnMut(&Value) -> Value,
    {
        let Some(idx) = self.column_index(name) else {
            return false;
        };
        for row in &mut self.rows {
            row[idx] = f(&row[idx]);
        }
        true
    }

    /// Fallible variant of `map_column`; the closure also receives the row position
    pub fn try_map_column<F>(&mut self, name: &str, mut f: F) -> DriftResult<()>
    where
        F: FnMut(usize, &Value) -> DriftResult<Value>,
    {
        let idx = self
            .column_index(name)
            .ok_or_else(|| DriftError::MissingColumn(name.to_string()))?;
        for (pos, row) in self.rows.iter_mut().enumerate() {
            row[idx] = f(pos, &row[idx])?;
        }
        Ok(())
    }

    pub fn retain_rows<F>(&mut self, mut keep: F)
    where
        F: FnMut(&[Value]) -> bool,
    {
        self.rows.retain(|r| keep(r));
    }

    /// New table holding the rows at `positions`, in that order (duplicates allowed)
    pub fn take_rows(&self, positions: &[usize]) -> Table {
        let rows = positions.iter().map(|&p| self.rows[p].clone()).collect();
        Table {
            headers: self.headers.clone(),
            rows,
        }
    }
}

// ============================================================================
// CSV I/O
// ============================================================================

pub fn load_csv(csv_path: &Path) -> DriftResult<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(csv_path)
        .map_err(|e| DriftError::from_csv(csv_path, e))?;

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| DriftError::from_csv(csv_path, e))?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if h.is_empty() {
                format!("Unnamed: {}", i)
            } else {
                h.to_string()
            }
        })
        .collect();

    if headers.is_empty() {
        return Err(DriftError::EmptyInput(csv_path.to_path_buf()));
    }

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| DriftError::from_csv(csv_path, e))?;
        rows.push(record.iter().map(Value::from_field).collect());
    }

    Ok(Table::new(headers, rows))
}

/// Write header + rows, no index column
pub fn write_csv(table: &Table, csv_path: &Path) -> DriftResult<()> {
    let mut wtr = csv::Writer::from_path(csv_path).map_err(|e| DriftError::from_csv(csv_path, e))?;

    wtr.write_record(table.headers())
        .map_err(|e| DriftError::from_csv(csv_path, e))?;

    for row in table.rows() {
        wtr.write_record(row.iter().map(|v| v.to_string()))
            .map_err(|e| DriftError::from_csv(csv_path, e))?;
    }

    wtr.flush().map_err(|e| DriftError::io(csv_path, e))?;
    Ok(())
}
