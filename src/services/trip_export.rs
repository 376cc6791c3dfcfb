//! Exportación de viajes
//!
//! Texto para copiar, mensaje para compartir y enlace de WhatsApp. El orden de
//! los campos es fijo y la fecha se formatea en el desfase local configurado.

use chrono::FixedOffset;
use serde::Serialize;

use crate::models::Trip;

const SHARE_BASE_URL: &str = "https://api.whatsapp.com/send?text=";

/// Signos que un navegador deja sin codificar en un componente de URL
const UNRESERVED_MARKS: [(&str, &str); 5] =
    [("%21", "!"), ("%27", "'"), ("%28", "("), ("%29", ")"), ("%2A", "*")];

/// `dd/mm/aaaa, HH:MM`, como en pt-BR
const DATE_FORMAT: &str = "%d/%m/%Y, %H:%M";

pub fn format_departure(trip: &Trip, offset: FixedOffset) -> String {
    trip.departure_time
        .with_timezone(&offset)
        .format(DATE_FORMAT)
        .to_string()
}

/// Mensaje con etiquetas en negrita (`*...*`) para compartir
pub fn format_trip_message(trip: &Trip, offset: FixedOffset) -> String {
    format!(
        "*Motorista:* {}\n*Veículo:* {}\n*Placa:* {}\n*Km:* {} KM\n*Origem:* {}\n*Destino:* {}\n*Data e Hora da Saída:* {}",
        trip.driver,
        trip.vehicle,
        trip.plate,
        trip.km,
        trip.origin,
        trip.destination,
        format_departure(trip, offset),
    )
}

/// Texto plano para el portapapeles: el mensaje sin marcas de negrita
pub fn format_trip_text(trip: &Trip, offset: FixedOffset) -> String {
    format_trip_message(trip, offset).replace('*', "")
}

/// Codificar un componente de URL igual que `encodeURIComponent`
fn encode_component(raw: &str) -> String {
    UNRESERVED_MARKS
        .iter()
        .fold(urlencoding::encode(raw).into_owned(), |encoded, (escaped, mark)| {
            encoded.replace(escaped, mark)
        })
}

/// Enlace para compartir el mensaje por WhatsApp
pub fn share_url(trip: &Trip, offset: FixedOffset) -> String {
    format!("{}{}", SHARE_BASE_URL, encode_component(&format_trip_message(trip, offset)))
}

/// Vista de detalle, con el checklist del viaje si lo tiene
pub fn format_trip_details(trip: &Trip, offset: FixedOffset) -> String {
    let mut lines = vec![
        format!("Motorista: {}", trip.driver),
        format!("Veículo: {}", trip.vehicle),
        format!("Placa: {}", trip.plate),
        format!("KM: {} KM", trip.km),
        format!("Origem: {}", trip.origin),
        format!("Destino: {}", trip.destination),
        format!("Data/Hora: {}", format_departure(trip, offset)),
    ];

    if !trip.checklist.is_empty() {
        lines.push("Checklist:".to_string());
        for item in &trip.checklist {
            let mark = if item.checked { "[x]" } else { "[ ]" };
            lines.push(format!("{} {}", mark, item.text));
        }
    }

    lines.join("\n")
}

/// Todas las representaciones exportables de un viaje
#[derive(Debug, Clone, Serialize)]
pub struct TripExport {
    pub text: String,
    pub message: String,
    pub details: String,
    pub share_url: String,
}

impl TripExport {
    pub fn build(trip: &Trip, offset: FixedOffset) -> Self {
        Self {
            text: format_trip_text(trip, offset),
            message: format_trip_message(trip, offset),
            details: format_trip_details(trip, offset),
            share_url: share_url(trip, offset),
        }
    }
}
