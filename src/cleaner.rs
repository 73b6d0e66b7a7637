// 🧹 Cleaner - normalizes the raw churn table
// Drops identifier columns, coerces charges, maps yes/no flags to 0/1

use crate::error::{DriftError, DriftResult};
use crate::table::{Table, Value};

pub const INDEX_COLUMN: &str = "Unnamed: 0";
pub const ID_COLUMN: &str = "customerID";
pub const TOTAL_CHARGES_COLUMN: &str = "TotalCharges";
pub const LABEL_COLUMN: &str = "Churn";

/// Yes/no-like service columns mapped through `binary_flag`
pub const BINARY_COLUMNS: [&str; 12] = [
    "SeniorCitizen",
    "Partner",
    "Dependents",
    "PhoneService",
    "MultipleLines",
    "OnlineSecurity",
    "OnlineBackup",
    "DeviceProtection",
    "TechSupport",
    "StreamingTV",
    "StreamingMovies",
    "PaperlessBilling",
];

/// Case-insensitive lookup for the binary columns
pub fn binary_flag(raw: &str) -> Option<i64> {
    match raw.to_lowercase().as_str() {
        "yes" | "true" | "1" => Some(1),
        "no" | "no internet service" | "no phone service" | "false" | "0" => Some(0),
        _ => None,
    }
}

/// Label lookup. Exact "Yes"/"No"; already-mapped 0/1 passes through.
pub fn churn_label(value: &Value) -> Option<i64> {
    match value {
        Value::Text(s) => match s.as_str() {
            "Yes" => Some(1),
            "No" => Some(0),
            "1" => Some(1),
            "0" => Some(0),
            _ => None,
        },
        Value::Int(i @ (0 | 1)) => Some(*i),
        Value::Float(f) if *f == 0.0 || *f == 1.0 => Some(*f as i64),
        _ => None,
    }
}

fn to_cell(mapped: Option<i64>) -> Value {
    mapped.map(Value::Int).unwrap_or(Value::Missing)
}

/// Clean a raw table.
///
/// Fails only when `TotalCharges` is absent; every malformed cell becomes
/// `Value::Missing` instead. Rows with a missing `TotalCharges` are removed,
/// a missing label is left for the caller to filter.
pub fn clean(mut table: Table) -> DriftResult<Table> {
    table.drop_column(INDEX_COLUMN);
    table.drop_column(ID_COLUMN);

    let charges = table
        .column_index(TOTAL_CHARGES_COLUMN)
        .ok_or_else(|| DriftError::MissingColumn(TOTAL_CHARGES_COLUMN.to_string()))?;
    table.map_column(TOTAL_CHARGES_COLUMN, |v| {
        v.as_f64().map(Value::Float).unwrap_or(Value::Missing)
    });
    table.retain_rows(|row| !row[charges].is_missing());

    table.map_column(LABEL_COLUMN, |v| to_cell(churn_label(v)));

    for column in BINARY_COLUMNS {
        table.map_column(column, |v| {
            if v.is_missing() {
                return Value::Missing;
            }
            to_cell(binary_flag(&v.to_string()))
        });
    }

    Ok(table)
}

/// Drop rows whose label is missing
pub fn drop_unlabeled(table: &mut Table) -> DriftResult<usize> {
    let label = table
        .column_index(LABEL_COLUMN)
        .ok_or_else(|| DriftError::MissingColumn(LABEL_COLUMN.to_string()))?;
    let before = table.len();
    table.retain_rows(|row| !row[label].is_missing());
    Ok(before - table.len())
}
