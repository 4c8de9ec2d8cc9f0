//! Seed dataset parsing.
//!
//! The dataset is an array of loosely-typed objects: numbers may arrive as
//! strings, and an empty string stands for "unknown". Coercion happens once
//! here so the store only ever sees typed [`Character`] values.

use serde::Deserialize;
use serde_json::Value;

use crate::character::{integral, Character};
use crate::errors::ModelError;

#[derive(Debug, Clone, Deserialize)]
pub struct SeedRecord {
    pub page_id: Value,
    pub name: Value,
    #[serde(rename = "Year", default)]
    pub year: Value,
    #[serde(rename = "APPEARANCES", default)]
    pub appearances: Value,
}

impl SeedRecord {
    pub fn into_character(self) -> Result<Character, String> {
        let id = lenient_int(&self.page_id)
            .map_err(|e| format!("page_id {e}"))?
            .ok_or_else(|| "page_id is empty".to_string())?;
        let name = match self.name {
            Value::String(s) => s,
            other => return Err(format!("name must be a string, got {other}")),
        };
        let year = lenient_int(&self.year).map_err(|e| format!("Year {e}"))?;
        let appearances = lenient_int(&self.appearances).map_err(|e| format!("APPEARANCES {e}"))?;
        Ok(Character { id, name, year, appearances })
    }
}

/// Parse the whole dataset; the first malformed record aborts the load.
pub fn parse_seed(bytes: &[u8]) -> Result<Vec<Character>, ModelError> {
    let records: Vec<Value> =
        serde_json::from_slice(bytes).map_err(|e| ModelError::Seed(e.to_string()))?;
    records
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            serde_json::from_value::<SeedRecord>(raw)
                .map_err(|e| e.to_string())
                .and_then(SeedRecord::into_character)
                .map_err(|reason| ModelError::SeedRecord { index, reason })
        })
        .collect()
}

/// null / "" → None, "42" / 42 / 42.0 → Some(42).
fn lenient_int(value: &Value) -> Result<Option<i64>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| format!("is not an integer: {s:?}")),
        Value::Number(n) => integral(n)
            .map(Some)
            .ok_or_else(|| format!("is not an integer: {n}")),
        other => Err(format!("has unsupported type: {other}")),
    }
}
