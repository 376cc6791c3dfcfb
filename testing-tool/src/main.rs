use anyhow::Result;
use colored::*;
use reqwest::{Client, Method, StatusCode};
use serde_json::{json, Value};
use std::io::{self, Write};

#[tokio::main]
async fn main() -> Result<()> {
    println!("{}", "🚐 KM Rodado Testing Tool".bright_blue().bold());
    println!("{}", "=====================================".bright_blue());
    println!();

    let base_url = prompt("URL del servidor (enter = http://localhost:3000): ")?;
    let base_url = if base_url.is_empty() {
        "http://localhost:3000".to_string()
    } else {
        base_url.trim_end_matches('/').to_string()
    };
    let api = Api::new(base_url);

    loop {
        println!();
        println!("{}", "📋 MENÚ PRINCIPAL".bright_green().bold());
        println!("{}", "==================".bright_green());
        println!("1. 💓 Health check");
        println!("2. 👤 Agregar motorista / vehículo / placa");
        println!("3. 📝 Registrar viaje desde el formulario");
        println!("4. 📜 Listar viajes");
        println!("5. 📤 Exportar un viaje");
        println!("6. 🧪 Smoke test completo");
        println!("7. 🚪 Salir");
        let choice = prompt("Selecciona una opción (1-7): ")?;

        let result = match choice.as_str() {
            "1" => api.show(Method::GET, "/health", None).await,
            "2" => add_registry_entry(&api).await,
            "3" => submit_trip(&api).await,
            "4" => api.show(Method::GET, "/api/trips", None).await,
            "5" => {
                let id = prompt("Id del viaje: ")?;
                api.show(Method::GET, &format!("/api/trips/{}/export", id), None).await
            }
            "6" => smoke_test(&api).await,
            "7" => {
                println!("{}", "👋 ¡Hasta luego!".bright_green());
                break;
            }
            _ => {
                println!("{}", "❌ Opción inválida. Intenta de nuevo.".bright_red());
                Ok(())
            }
        };

        if let Err(e) = result {
            println!("{} {}", "❌ Error:".bright_red(), e);
        }
    }

    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label.bright_yellow());
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

struct Api {
    client: Client,
    base_url: String,
}

impl Api {
    fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    async fn call(&self, method: Method, path: &str, body: Option<Value>) -> Result<(StatusCode, Value)> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let value = serde_json::from_str(&text).unwrap_or(Value::String(text));
        Ok((status, value))
    }

    async fn show(&self, method: Method, path: &str, body: Option<Value>) -> Result<()> {
        println!("{} {} {}", "📤".bright_blue(), method, path);
        let (status, value) = self.call(method, path, body).await?;
        let label = if status.is_success() {
            format!("✅ {}", status).bright_green()
        } else {
            format!("⚠️ {}", status).bright_red()
        };
        println!("{}", label);
        println!("{}", serde_json::to_string_pretty(&value)?);
        Ok(())
    }
}

async fn add_registry_entry(api: &Api) -> Result<()> {
    let kind = prompt("Tipo (drivers / vehicles / plates): ")?;
    if !matches!(kind.as_str(), "drivers" | "vehicles" | "plates") {
        println!("{}", "❌ Tipo inválido.".bright_red());
        return Ok(());
    }
    let value = prompt("Valor: ")?;
    api.show(Method::POST, &format!("/api/{}", kind), Some(json!({ "value": value })))
        .await
}

async fn submit_trip(api: &Api) -> Result<()> {
    let km = prompt("KM: ")?;
    let origin = prompt("Origem: ")?;
    let destination = prompt("Destino: ")?;
    let departure = prompt("Saída (YYYY-MM-DDTHH:MM, enter = agora): ")?;

    let mut update = json!({ "km": km, "origin": origin, "destination": destination });
    if !departure.is_empty() {
        update["departureTime"] = json!(departure);
    }

    api.show(Method::PATCH, "/api/form", Some(update)).await?;
    api.show(Method::POST, "/api/form/submit", None).await
}

fn check(step: &str, ok: bool) -> bool {
    if ok {
        println!("{} {}", "✅".bright_green(), step);
    } else {
        println!("{} {}", "❌".bright_red(), step.bright_red());
    }
    ok
}

/// Recorrido completo: registros, formulario, listado, exportación y borrado
async fn smoke_test(api: &Api) -> Result<()> {
    println!();
    println!("{}", "🧪 SMOKE TEST".bright_cyan().bold());
    println!("{}", "=============".bright_cyan());

    let mut passed = 0;
    let mut total = 0;
    let mut record = |ok: bool| {
        total += 1;
        if ok {
            passed += 1;
        }
    };

    let (status, _) = api.call(Method::GET, "/health", None).await?;
    record(check("Health check", status.is_success()));

    for (kind, value) in [("drivers", "Ana"), ("vehicles", "Van1"), ("plates", "abc1234")] {
        let (status, _) = api
            .call(Method::POST, &format!("/api/{}", kind), Some(json!({ "value": value })))
            .await?;
        // 409 si ya existía de una ejecución anterior
        record(check(
            &format!("Alta en {} ({})", kind, status),
            status.is_success() || status == StatusCode::CONFLICT,
        ));
    }

    let (status, body) = api.call(Method::POST, "/api/plates", Some(json!({ "value": "ab-12" }))).await?;
    record(check(
        &format!("Placa inválida rechazada: {}", body["message"]),
        status == StatusCode::BAD_REQUEST,
    ));

    // Dar tiempo a que la sincronización actualice el formulario
    tokio::time::sleep(std::time::Duration::from_millis(300)).await;

    let (status, _) = api
        .call(
            Method::PATCH,
            "/api/form",
            Some(json!({ "driver": "Ana", "vehicle": "Van1", "plate": "ABC-1234", "km": "150km", "origin": "A", "destination": "B" })),
        )
        .await?;
    record(check("Formulario actualizado", status.is_success()));

    let (status, body) = api.call(Method::POST, "/api/form/submit", None).await?;
    let trip_id = body["data"]["id"].as_str().unwrap_or_default().to_string();
    record(check("Viaje registrado", status.is_success() && !trip_id.is_empty()));

    tokio::time::sleep(std::time::Duration::from_millis(300)).await;

    let (status, trips) = api.call(Method::GET, "/api/trips?driver=Ana", None).await?;
    let listed = trips
        .as_array()
        .map(|trips| trips.iter().any(|trip| trip["id"] == trip_id.as_str() && trip["km"] == 150))
        .unwrap_or(false);
    record(check("Viaje listado con 150 km", status.is_success() && listed));

    let (status, export) = api.call(Method::GET, &format!("/api/trips/{}/export", trip_id), None).await?;
    let share_ok = export["share_url"]
        .as_str()
        .map(|url| url.starts_with("https://api.whatsapp.com/send?text="))
        .unwrap_or(false);
    record(check("Exportación con enlace para compartir", status.is_success() && share_ok));

    let (status, _) = api.call(Method::DELETE, &format!("/api/trips/{}", trip_id), None).await?;
    record(check("Borrado sin confirmación rechazado", status == StatusCode::BAD_REQUEST));

    let (status, _) = api
        .call(Method::DELETE, &format!("/api/trips/{}?confirm=true", trip_id), None)
        .await?;
    record(check("Borrado confirmado", status.is_success()));

    println!();
    let summary = format!("Resultado: {}/{} pasos correctos", passed, total);
    if passed == total {
        println!("{}", summary.bright_green().bold());
    } else {
        println!("{}", summary.bright_red().bold());
    }
    Ok(())
}
