//! Utilidades de validación
//!
//! Limpieza y formato de las entradas del formulario: placas, kilometraje y
//! hora de salida.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

use super::errors::{AppError, AppResult};

/// Longitud de una placa canónica sin el separador
pub const PLATE_LENGTH: usize = 7;

/// Posición tras la cual se inserta el separador de la placa
const PLATE_SEPARATOR_AFTER: usize = 3;

pub const PLATE_FORMAT_NOTICE: &str = "A placa deve ter exatamente 7 caracteres (3 letras + 4 números).";

/// Formato del input `datetime-local`
const LOCAL_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

lazy_static! {
    static ref NON_ALPHANUMERIC: Regex = Regex::new(r"[^A-Za-z0-9]").expect("valid plate regex");
    static ref NON_DIGIT: Regex = Regex::new(r"\D").expect("valid digit regex");
}

/// Forma canónica de una placa: solo `[A-Za-z0-9]`, en mayúsculas, truncada a 7
/// caracteres y con `-` después del tercero si hay más de tres.
///
/// `"abc1234"` → `"ABC-1234"`, `"ab"` → `"AB"`.
pub fn canonicalize_plate(raw: &str) -> String {
    let cleaned: String = NON_ALPHANUMERIC
        .replace_all(raw, "")
        .to_uppercase()
        .chars()
        .take(PLATE_LENGTH)
        .collect();

    if cleaned.len() > PLATE_SEPARATOR_AFTER {
        format!(
            "{}-{}",
            &cleaned[..PLATE_SEPARATOR_AFTER],
            &cleaned[PLATE_SEPARATOR_AFTER..]
        )
    } else {
        cleaned
    }
}

/// Cantidad de caracteres alfanuméricos de un valor
pub fn alphanumeric_len(value: &str) -> usize {
    NON_ALPHANUMERIC.replace_all(value, "").chars().count()
}

/// Canonicalizar una placa y exigir exactamente 7 caracteres alfanuméricos
pub fn validate_plate(raw: &str) -> AppResult<String> {
    let plate = canonicalize_plate(raw.trim());
    if alphanumeric_len(&plate) != PLATE_LENGTH {
        return Err(AppError::InvalidInput(PLATE_FORMAT_NOTICE.to_string()));
    }
    Ok(plate)
}

/// Quitar todo lo que no sea dígito: `"12a3b"` → `"123"`
pub fn sanitize_km_input(raw: &str) -> String {
    NON_DIGIT.replace_all(raw, "").into_owned()
}

/// Mayor kilometraje que el almacén guarda como entero
pub const MAX_KM: u64 = i64::MAX as u64;

/// Kilometraje entero no negativo a partir de la entrada del usuario.
/// Vacío equivale a 0; un valor demasiado grande se satura en [`MAX_KM`].
pub fn parse_km(raw: &str) -> u64 {
    let digits = sanitize_km_input(raw);
    if digits.is_empty() {
        return 0;
    }
    digits.parse::<u64>().map_or(MAX_KM, |km| km.min(MAX_KM))
}

/// Interpretar una hora de salida: RFC 3339, o `YYYY-MM-DDTHH:MM` local en el
/// desfase configurado
pub fn parse_departure_time(raw: &str, offset: FixedOffset) -> AppResult<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(raw, LOCAL_INPUT_FORMAT).map_err(|_| {
        AppError::InvalidInput(format!("Data e hora de saída inválida: '{}'", raw))
    })?;

    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| AppError::InvalidInput(format!("Data e hora de saída inválida: '{}'", raw)))
}

/// Valor para el input `datetime-local` en el desfase configurado
pub fn format_local_input(instant: DateTime<Utc>, offset: FixedOffset) -> String {
    instant.with_timezone(&offset).format(LOCAL_INPUT_FORMAT).to_string()
}

/// Validar que un string no esté vacío (para `#[validate(custom = ...)]`)
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}
