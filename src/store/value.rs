//! Valores de documento
//!
//! Representación tipada de los campos que guarda el almacén remoto. El almacén
//! tiene su propio tipo nativo de instante (`Timestamp`), distinto de un string.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Number, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Campos de un documento, ordenados por nombre
pub type Fields = BTreeMap<String, DocumentValue>;

/// Clave con la que se codifica un timestamp nativo dentro de JSON
pub const TIMESTAMP_KEY: &str = "$timestamp";

/// Valor de un campo de documento
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    Timestamp(DateTime<Utc>),
    String(String),
    Array(Vec<DocumentValue>),
    Map(Fields),
}

impl DocumentValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DocumentValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DocumentValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            DocumentValue::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[DocumentValue]> {
        match self {
            DocumentValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Fields> {
        match self {
            DocumentValue::Map(fields) => Some(fields),
            _ => None,
        }
    }

    /// Rango del tipo dentro del orden global del almacén:
    /// null < boolean < número < timestamp < string < array < map
    fn type_rank(&self) -> u8 {
        match self {
            DocumentValue::Null => 0,
            DocumentValue::Boolean(_) => 1,
            DocumentValue::Integer(_) | DocumentValue::Double(_) => 2,
            DocumentValue::Timestamp(_) => 3,
            DocumentValue::String(_) => 4,
            DocumentValue::Array(_) => 5,
            DocumentValue::Map(_) => 6,
        }
    }

    /// Orden total entre dos valores, usado para las consultas ordenadas
    pub fn compare(&self, other: &Self) -> Ordering {
        use DocumentValue::*;

        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Boolean(a), Boolean(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Integer(a), Double(b)) => (*a as f64).total_cmp(b),
            (Double(a), Integer(b)) => a.total_cmp(&(*b as f64)),
            (Double(a), Double(b)) => a.total_cmp(b),
            (Timestamp(a), Timestamp(b)) => a.cmp(b),
            (String(a), String(b)) => a.cmp(b),
            (Array(a), Array(b)) => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| x.compare(y))
                .find(|o| *o != Ordering::Equal)
                .unwrap_or_else(|| a.len().cmp(&b.len())),
            (Map(a), Map(b)) => a
                .iter()
                .zip(b.iter())
                .map(|((ka, va), (kb, vb))| ka.cmp(kb).then_with(|| va.compare(vb)))
                .find(|o| *o != Ordering::Equal)
                .unwrap_or_else(|| a.len().cmp(&b.len())),
            _ => self.type_rank().cmp(&other.type_rank()),
        }
    }

    /// Codificar como JSON. Los timestamps se envuelven en `{"$timestamp": "<RFC 3339>"}`.
    pub fn to_json(&self) -> Value {
        match self {
            DocumentValue::Null => Value::Null,
            DocumentValue::Boolean(b) => Value::Bool(*b),
            DocumentValue::Integer(i) => Value::Number((*i).into()),
            DocumentValue::Double(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
            DocumentValue::Timestamp(t) => {
                let mut wrapper = Map::new();
                wrapper.insert(
                    TIMESTAMP_KEY.to_string(),
                    Value::String(t.to_rfc3339_opts(SecondsFormat::Micros, true)),
                );
                Value::Object(wrapper)
            }
            DocumentValue::String(s) => Value::String(s.clone()),
            DocumentValue::Array(items) => Value::Array(items.iter().map(|v| v.to_json()).collect()),
            DocumentValue::Map(fields) => Value::Object(fields_to_json(fields)),
        }
    }

    /// Decodificar desde JSON (inverso de [`DocumentValue::to_json`])
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => DocumentValue::Null,
            Value::Bool(b) => DocumentValue::Boolean(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => DocumentValue::Integer(i),
                None => DocumentValue::Double(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => DocumentValue::String(s),
            Value::Array(items) => {
                DocumentValue::Array(items.into_iter().map(DocumentValue::from_json).collect())
            }
            Value::Object(object) => {
                if let Some(instant) = decode_timestamp(&object) {
                    return DocumentValue::Timestamp(instant);
                }
                DocumentValue::Map(fields_from_json(object))
            }
        }
    }
}

fn decode_timestamp(object: &Map<String, Value>) -> Option<DateTime<Utc>> {
    if object.len() != 1 {
        return None;
    }
    let raw = object.get(TIMESTAMP_KEY)?.as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

pub fn fields_to_json(fields: &Fields) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), value.to_json()))
        .collect()
}

pub fn fields_from_json(object: Map<String, Value>) -> Fields {
    object
        .into_iter()
        .map(|(key, value)| (key, DocumentValue::from_json(value)))
        .collect()
}

impl From<&str> for DocumentValue {
    fn from(value: &str) -> Self {
        DocumentValue::String(value.to_string())
    }
}

impl From<String> for DocumentValue {
    fn from(value: String) -> Self {
        DocumentValue::String(value)
    }
}

impl From<bool> for DocumentValue {
    fn from(value: bool) -> Self {
        DocumentValue::Boolean(value)
    }
}

impl From<i64> for DocumentValue {
    fn from(value: i64) -> Self {
        DocumentValue::Integer(value)
    }
}

impl From<u64> for DocumentValue {
    fn from(value: u64) -> Self {
        DocumentValue::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for DocumentValue {
    fn from(value: f64) -> Self {
        DocumentValue::Double(value)
    }
}

impl From<DateTime<Utc>> for DocumentValue {
    fn from(value: DateTime<Utc>) -> Self {
        DocumentValue::Timestamp(value)
    }
}

impl From<Vec<DocumentValue>> for DocumentValue {
    fn from(value: Vec<DocumentValue>) -> Self {
        DocumentValue::Array(value)
    }
}

impl From<Fields> for DocumentValue {
    fn from(value: Fields) -> Self {
        DocumentValue::Map(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_timestamp_survives_json_encoding() {
        let instant = Utc.with_ymd_and_hms(2026, 10, 19, 13, 45, 0).unwrap();
        let encoded = DocumentValue::Timestamp(instant).to_json();

        assert!(encoded.get(TIMESTAMP_KEY).is_some());
        assert_eq!(DocumentValue::from_json(encoded), DocumentValue::Timestamp(instant));
    }

    #[test]
    fn test_map_with_extra_keys_is_not_a_timestamp() {
        let raw = json!({ "$timestamp": "2026-10-19T13:45:00Z", "other": 1 });
        assert!(matches!(DocumentValue::from_json(raw), DocumentValue::Map(_)));
    }

    #[test]
    fn test_type_order_puts_timestamps_before_strings() {
        let instant = DocumentValue::Timestamp(Utc::now());
        let text = DocumentValue::from("2020-01-01");
        assert_eq!(instant.compare(&text), Ordering::Less);
        assert_eq!(DocumentValue::Null.compare(&DocumentValue::Boolean(false)), Ordering::Less);
    }

    #[test]
    fn test_mixed_numbers_compare_by_value() {
        assert_eq!(DocumentValue::Integer(2).compare(&DocumentValue::Double(2.5)), Ordering::Less);
        assert_eq!(DocumentValue::Double(3.0).compare(&DocumentValue::Integer(3)), Ordering::Equal);
    }

    #[test]
    fn test_strings_compare_bytewise() {
        assert_eq!(DocumentValue::from("Zé").compare(&DocumentValue::from("ana")), Ordering::Less);
    }
}
