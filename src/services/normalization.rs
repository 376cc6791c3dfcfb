//! Normalización de documentos remotos
//!
//! Convierte un documento crudo del almacén en un valor local total: cada campo
//! ausente o con tipo inesperado recibe un valor por defecto (`""`, `0`, lista
//! vacía) y nunca se produce un error. Es la única puerta de entrada de datos
//! remotos al estado local.

use chrono::{DateTime, Utc};

use crate::models::{ChecklistItem, ChecklistModelItem, RegistryEntry, Trip};
use crate::store::{Document, DocumentValue, Fields};
use crate::utils::validation::{parse_km, MAX_KM};

fn string_field(fields: &Fields, name: &str) -> String {
    fields
        .get(name)
        .and_then(DocumentValue::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Elemento de registro (motorista, vehículo o placa)
pub fn normalize_entry<T: RegistryEntry>(document: &Document) -> T {
    let value = string_field(&document.fields, T::KIND.value_field());
    T::from_parts(document.id.clone(), value)
}

/// Kilometraje como entero no negativo
pub fn normalize_km(value: Option<&DocumentValue>) -> u64 {
    match value {
        Some(DocumentValue::Integer(km)) => u64::try_from(*km).unwrap_or(0),
        Some(DocumentValue::Double(km)) if km.is_finite() && *km >= 0.0 => (km.trunc() as u64).min(MAX_KM),
        Some(DocumentValue::String(raw)) => parse_km(raw),
        _ => 0,
    }
}

/// Hora de salida. Si falta o no es un timestamp nativo se usa `now`.
pub fn normalize_departure_time(value: Option<&DocumentValue>, now: DateTime<Utc>) -> DateTime<Utc> {
    value.and_then(DocumentValue::as_timestamp).unwrap_or(now)
}

/// Checklist embebido. Las entradas que no son mapas se descartan.
pub fn normalize_checklist(value: Option<&DocumentValue>) -> Vec<ChecklistItem> {
    let Some(items) = value.and_then(DocumentValue::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(DocumentValue::as_map)
        .map(|item| ChecklistItem {
            id: match item.get("id") {
                Some(DocumentValue::String(id)) => id.clone(),
                Some(DocumentValue::Integer(id)) => id.to_string(),
                _ => String::new(),
            },
            text: string_field(item, "text"),
            checked: item.get("checked").and_then(DocumentValue::as_bool).unwrap_or(false),
        })
        .collect()
}

/// Documento de la colección `trips`
pub fn normalize_trip(document: &Document, now: DateTime<Utc>) -> Trip {
    let fields = &document.fields;
    Trip {
        id: document.id.clone(),
        driver: string_field(fields, "driver"),
        vehicle: string_field(fields, "vehicle"),
        plate: string_field(fields, "plate"),
        km: normalize_km(fields.get("km")),
        origin: string_field(fields, "origin"),
        destination: string_field(fields, "destination"),
        departure_time: normalize_departure_time(fields.get("departureTime"), now),
        checklist: normalize_checklist(fields.get("checklist")),
    }
}

/// Documento de la colección `checklistModel`
pub fn normalize_checklist_model_item(document: &Document) -> ChecklistModelItem {
    ChecklistModelItem {
        id: document.id.clone(),
        text: string_field(&document.fields, "text"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Driver, Plate};
    use chrono::TimeZone;

    fn doc(id: &str, entries: Vec<(&str, DocumentValue)>) -> Document {
        Document::new(
            id,
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    #[test]
    fn test_trip_without_checklist_gets_empty_sequence() {
        let departure = Utc.with_ymd_and_hms(2026, 10, 19, 10, 0, 0).unwrap();
        let document = doc(
            "t1",
            vec![
                ("driver", DocumentValue::from("Ana")),
                ("km", DocumentValue::Integer(42)),
                ("departureTime", DocumentValue::Timestamp(departure)),
            ],
        );

        let trip = normalize_trip(&document, Utc::now());
        assert!(trip.checklist.is_empty());
        assert_eq!(trip.driver, "Ana");
        assert_eq!(trip.vehicle, "");
        assert_eq!(trip.km, 42);
        assert_eq!(trip.departure_time, departure);
    }

    #[test]
    fn test_empty_trip_document_is_fully_defaulted() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let trip = normalize_trip(&doc("t2", vec![]), now);

        assert_eq!(trip.id, "t2");
        assert_eq!(trip.driver, "");
        assert_eq!(trip.plate, "");
        assert_eq!(trip.km, 0);
        assert_eq!(trip.origin, "");
        assert_eq!(trip.destination, "");
        assert_eq!(trip.departure_time, now);
    }

    #[test]
    fn test_non_timestamp_departure_falls_back_to_now() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let value = DocumentValue::from("2026-01-01T00:00:00Z");
        assert_eq!(normalize_departure_time(Some(&value), now), now);
    }

    #[test]
    fn test_km_normalization_accepts_loose_values() {
        assert_eq!(normalize_km(Some(&DocumentValue::Integer(-3))), 0);
        assert_eq!(normalize_km(Some(&DocumentValue::Double(12.9))), 12);
        assert_eq!(normalize_km(Some(&DocumentValue::Double(f64::NAN))), 0);
        assert_eq!(normalize_km(Some(&DocumentValue::from("12a3b"))), 123);
        assert_eq!(normalize_km(Some(&DocumentValue::Boolean(true))), 0);
        assert_eq!(normalize_km(None), 0);
    }

    #[test]
    fn test_oversized_km_survives_store_round_trip() {
        let km = parse_km("99999999999999999999999");
        let stored = DocumentValue::from(km);

        assert_eq!(stored, DocumentValue::Integer(i64::MAX));
        assert_eq!(normalize_km(Some(&stored)), km);
        assert_eq!(normalize_km(Some(&DocumentValue::Double(1e30))), MAX_KM);
    }

    #[test]
    fn test_checklist_items_are_defaulted_and_non_maps_skipped() {
        let mut item = Fields::new();
        item.insert("id".to_string(), DocumentValue::Integer(7));
        item.insert("text".to_string(), DocumentValue::from("Rota planejada"));

        let value = DocumentValue::Array(vec![DocumentValue::Map(item), DocumentValue::from("junk")]);
        let checklist = normalize_checklist(Some(&value));

        assert_eq!(checklist, vec![ChecklistItem::new("7", "Rota planejada")]);
        assert!(normalize_checklist(Some(&DocumentValue::from("not a list"))).is_empty());
    }

    #[test]
    fn test_registry_entries_use_their_value_field() {
        let driver: Driver = normalize_entry(&doc("d1", vec![("name", DocumentValue::from("Carlos"))]));
        assert_eq!(driver.name, "Carlos");

        let plate: Plate = normalize_entry(&doc("p1", vec![("number", DocumentValue::from("ABC-1234"))]));
        assert_eq!(plate.number, "ABC-1234");

        let nameless: Driver = normalize_entry(&doc("d2", vec![("number", DocumentValue::from("x"))]));
        assert_eq!(nameless.name, "");
    }
}
