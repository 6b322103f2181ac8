use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::geometry::id_from_value;

/// One `(id, value)` row. Missing or non-finite values are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueRecord {
    pub id: String,
    pub val: Option<f64>,
}

impl ValueRecord {
    pub fn new(id: impl Into<String>, val: Option<f64>) -> Self {
        Self { id: id.into(), val }
    }
}

/// How repeated ids in a dataset are combined.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    #[default]
    Last,
    First,
    Sum,
    Mean,
}

impl DuplicatePolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "last" => Some(DuplicatePolicy::Last),
            "first" => Some(DuplicatePolicy::First),
            "sum" => Some(DuplicatePolicy::Sum),
            "mean" | "average" => Some(DuplicatePolicy::Mean),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetError {
    Json(String),
    UnsupportedShape,
    MissingColumn(&'static str),
    ColumnLengthMismatch { ids: usize, vals: usize },
    InvalidRow { index: usize, reason: String },
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::Json(msg) => write!(f, "dataset JSON parse error: {msg}"),
            DatasetError::UnsupportedShape => {
                write!(f, "dataset must be an array of rows or an object of columns")
            }
            DatasetError::MissingColumn(name) => write!(f, "dataset missing column {name:?}"),
            DatasetError::ColumnLengthMismatch { ids, vals } => {
                write!(f, "dataset columns differ in length: id={ids} val={vals}")
            }
            DatasetError::InvalidRow { index, reason } => {
                write!(f, "invalid dataset row {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for DatasetError {}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValueDataset {
    pub records: Vec<ValueRecord>,
}

impl ValueDataset {
    pub fn new(records: Vec<ValueRecord>) -> Self {
        Self { records }
    }

    pub fn from_json_str(payload: &str) -> Result<Self, DatasetError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| DatasetError::Json(e.to_string()))?;
        Self::from_json_value(&value)
    }

    /// Accepts rows (`[{"id": .., "val": ..}]`) or columns (`{"id": [..], "val": [..]}`).
    pub fn from_json_value(value: &Value) -> Result<Self, DatasetError> {
        match value {
            Value::Array(rows) => {
                let mut records = Vec::with_capacity(rows.len());
                for (index, row) in rows.iter().enumerate() {
                    let obj = row.as_object().ok_or_else(|| DatasetError::InvalidRow {
                        index,
                        reason: "row must be an object".to_string(),
                    })?;
                    let id = obj.get("id").and_then(id_from_value).ok_or_else(|| {
                        DatasetError::InvalidRow {
                            index,
                            reason: "row missing id".to_string(),
                        }
                    })?;
                    records.push(ValueRecord::new(id, obj.get("val").and_then(value_number)));
                }
                Ok(Self { records })
            }
            Value::Object(columns) => {
                let ids = columns
                    .get("id")
                    .and_then(|v| v.as_array())
                    .ok_or(DatasetError::MissingColumn("id"))?;
                let vals = columns
                    .get("val")
                    .and_then(|v| v.as_array())
                    .ok_or(DatasetError::MissingColumn("val"))?;
                if ids.len() != vals.len() {
                    return Err(DatasetError::ColumnLengthMismatch {
                        ids: ids.len(),
                        vals: vals.len(),
                    });
                }
                let mut records = Vec::with_capacity(ids.len());
                for (index, (id, val)) in ids.iter().zip(vals).enumerate() {
                    let id = id_from_value(id).ok_or_else(|| DatasetError::InvalidRow {
                        index,
                        reason: format!("id must be a string or number, got {id}"),
                    })?;
                    records.push(ValueRecord::new(id, value_number(val)));
                }
                Ok(Self { records })
            }
            _ => Err(DatasetError::UnsupportedShape),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All finite values, in record order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().filter_map(|r| r.val)
    }

    /// Aggregate records into an id lookup. Ids whose values are all missing map to `None`.
    pub fn to_value_map(&self, policy: DuplicatePolicy) -> ValueMap {
        let mut acc: BTreeMap<String, (Option<f64>, usize)> = BTreeMap::new();
        for record in &self.records {
            match acc.get_mut(&record.id) {
                None => {
                    acc.insert(record.id.clone(), (record.val, usize::from(record.val.is_some())));
                }
                Some((current, count)) => match policy {
                    DuplicatePolicy::Last => {
                        *current = record.val;
                        *count = usize::from(record.val.is_some());
                    }
                    DuplicatePolicy::First => {}
                    DuplicatePolicy::Sum | DuplicatePolicy::Mean => {
                        if let Some(v) = record.val {
                            *current = Some(current.unwrap_or(0.0) + v);
                            *count += 1;
                        }
                    }
                },
            }
        }

        let values = acc
            .into_iter()
            .map(|(id, (val, count))| {
                let val = match (policy, val) {
                    (DuplicatePolicy::Mean, Some(sum)) if count > 0 => Some(sum / count as f64),
                    _ => val,
                };
                (id, val)
            })
            .collect();
        ValueMap { values }
    }
}

fn value_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Id to value lookup built from a dataset.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValueMap {
    values: BTreeMap<String, Option<f64>>,
}

impl ValueMap {
    pub fn get(&self, id: &str) -> Option<f64> {
        self.values.get(id).copied().flatten()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.values.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
