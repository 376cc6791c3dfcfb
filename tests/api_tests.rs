mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{eventually, seed_registries, spawn_app, wait_for_selection, TestApp};
use km_rodado::routes::create_app_router;
use km_rodado::store::MemoryDocumentStore;

fn router(app: &TestApp) -> Router {
    create_app_router(app.state.clone())
}

async fn send(app: &TestApp, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let request = match body {
        Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router(app).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app(MemoryDocumentStore::new()).await;
    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["collections"]["trips"], 0);
}

#[tokio::test]
async fn test_add_driver_and_reject_case_insensitive_duplicate() {
    let app = spawn_app(MemoryDocumentStore::new()).await;

    let (status, body) = send(&app, Method::POST, "/api/drivers", Some(json!({ "value": "  Ana  " }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Ana");

    eventually(|| app.sync.drivers().len() == 1).await;
    let (status, body) = send(&app, Method::GET, "/api/drivers", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["name"], "Ana");

    let (status, body) = send(&app, Method::POST, "/api/drivers", Some(json!({ "value": "ana" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Motorista já existe ou o nome é inválido.");
}

#[tokio::test]
async fn test_plate_is_canonicalized_or_rejected() {
    let app = spawn_app(MemoryDocumentStore::new()).await;

    let (status, body) = send(&app, Method::POST, "/api/plates", Some(json!({ "value": "abc1234" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["number"], "ABC-1234");

    let (status, body) = send(&app, Method::POST, "/api/plates", Some(json!({ "value": "ab-12" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "A placa deve ter exatamente 7 caracteres (3 letras + 4 números)."
    );
}

#[tokio::test]
async fn test_last_vehicle_cannot_be_removed() {
    let store = MemoryDocumentStore::new();
    seed_registries(&store, &[], &["Van1"], &[]);
    let app = spawn_app(store).await;
    eventually(|| app.sync.vehicles().len() == 1).await;

    let id = app.sync.vehicles()[0].id.clone();
    let (status, body) = send(&app, Method::DELETE, &format!("/api/vehicles/{}", id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "É necessário ter pelo menos um veículo.");
    assert_eq!(app.store.write_attempts(), 0);
}

#[tokio::test]
async fn test_remote_failure_surfaces_generic_notice() {
    let store = MemoryDocumentStore::new();
    store.set_fail_writes(true);
    let app = spawn_app(store).await;

    let (status, body) = send(&app, Method::POST, "/api/drivers", Some(json!({ "value": "Ana" }))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["message"], "Falha ao adicionar motorista.");
    assert_eq!(body["code"], "REMOTE_WRITE_FAILED");
}

#[tokio::test]
async fn test_form_submit_export_and_delete_trip() {
    let store = MemoryDocumentStore::new();
    seed_registries(&store, &["Ana"], &["Van1"], &["ABC-1234"]);
    let app = spawn_app(store).await;
    wait_for_selection(&app).await;

    let (status, form) = send(
        &app,
        Method::PATCH,
        "/api/form",
        Some(json!({
            "km": "150km",
            "origin": "A",
            "destination": "B",
            "departureTime": "2026-10-19T08:00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(form["km"], "150");
    assert_eq!(form["departureTimeLocal"], "2026-10-19T08:00");

    let (status, body) = send(&app, Method::POST, "/api/form/submit", None).await;
    assert_eq!(status, StatusCode::OK);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    eventually(|| app.sync.trips().len() == 1).await;
    let (status, trips) = send(&app, Method::GET, "/api/trips?driver=Ana&search=a", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trips[0]["id"], id.as_str());
    assert_eq!(trips[0]["km"], 150);
    assert_eq!(trips[0]["departureTime"], "2026-10-19T11:00:00Z");

    let (status, export) = send(&app, Method::GET, &format!("/api/trips/{}/export", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        export["message"],
        "*Motorista:* Ana\n*Veículo:* Van1\n*Placa:* ABC-1234\n*Km:* 150 KM\n*Origem:* A\n*Destino:* B\n*Data e Hora da Saída:* 19/10/2026, 08:00"
    );
    assert!(export["share_url"]
        .as_str()
        .unwrap()
        .starts_with("https://api.whatsapp.com/send?text=*Motorista%3A*%20Ana"));

    let (status, _) = send(&app, Method::DELETE, &format!("/api/trips/{}", id), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/trips/{}?confirm=true", id), None).await;
    assert_eq!(status, StatusCode::OK);
    eventually(|| app.sync.trips().is_empty()).await;
}

#[tokio::test]
async fn test_cleared_driver_falls_back_to_first_registered() {
    let store = MemoryDocumentStore::new();
    seed_registries(&store, &["Ana", "Bruno"], &["Van1"], &["ABC-1234"]);
    let app = spawn_app(store).await;
    wait_for_selection(&app).await;
    eventually(|| app.sync.drivers().len() == 2).await;

    let (status, form) = send(&app, Method::PATCH, "/api/form", Some(json!({ "driver": "Bruno" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(form["driver"], "Bruno");

    let (status, form) = send(&app, Method::PATCH, "/api/form", Some(json!({ "driver": "" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(form["driver"], "Ana");

    let (status, _) = send(&app, Method::POST, "/api/form/submit", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_form_stays_readable_while_store_write_is_pending() {
    let store = MemoryDocumentStore::new();
    seed_registries(&store, &["Ana"], &["Van1"], &["ABC-1234"]);
    let app = spawn_app(store).await;
    wait_for_selection(&app).await;

    app.store.set_hold_writes(true);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/form/submit")
        .body(Body::empty())
        .unwrap();
    let pending = tokio::spawn(router(&app).oneshot(request));
    eventually(|| app.store.write_attempts() == 1).await;

    let (status, form) = tokio::time::timeout(
        std::time::Duration::from_secs(1),
        send(&app, Method::GET, "/api/form", None),
    )
    .await
    .expect("form read blocked by pending submit");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(form["phase"], "submitting");

    let (status, body) = send(&app, Method::POST, "/api/form/submit", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Já existe um envio em andamento.");

    app.store.set_hold_writes(false);
    let response = pending.await.unwrap().unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (_, form) = send(&app, Method::GET, "/api/form", None).await;
    assert_eq!(form["phase"], "editing");
    eventually(|| app.sync.trips().len() == 1).await;
}

#[tokio::test]
async fn test_form_checklist_endpoints() {
    let app = spawn_app(MemoryDocumentStore::new()).await;

    let (status, body) = send(&app, Method::POST, "/api/form/checklist", Some(json!({ "text": "Verificar freios" }))).await;
    assert_eq!(status, StatusCode::OK);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, form) = send(
        &app,
        Method::PATCH,
        &format!("/api/form/checklist/{}", id),
        Some(json!({ "text": "Verificar freios e luzes", "toggle": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let item = &form["checklist"][7];
    assert_eq!(item["text"], "Verificar freios e luzes");
    assert_eq!(item["checked"], true);

    let (status, form) = send(&app, Method::POST, "/api/form/checklist/check-all", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(form["checklist"].as_array().unwrap().iter().all(|item| item["checked"] == true));

    let (status, form) = send(&app, Method::DELETE, &format!("/api/form/checklist/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(form["checklist"].as_array().unwrap().len(), 7);

    let (status, _) = send(&app, Method::POST, "/api/form/checklist", Some(json!({ "text": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_submit_without_driver_is_rejected() {
    let app = spawn_app(MemoryDocumentStore::new()).await;

    let (status, body) = send(&app, Method::POST, "/api/form/submit", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Por favor, selecione um motorista. Se não houver nenhum, adicione um primeiro."
    );
    assert_eq!(app.store.write_attempts(), 0);
}

#[tokio::test]
async fn test_invalid_trip_filter_bound_is_rejected() {
    let app = spawn_app(MemoryDocumentStore::new()).await;
    let (status, _) = send(&app, Method::GET, "/api/trips?from=ontem", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_checklist_model_crud() {
    let app = spawn_app(MemoryDocumentStore::new()).await;

    let (status, _) = send(&app, Method::POST, "/api/checklist-model", Some(json!({ "text": " " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::POST, "/api/checklist-model", Some(json!({ "text": "Rota planejada" }))).await;
    assert_eq!(status, StatusCode::OK);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/checklist-model/{}", id),
        Some(json!({ "text": "Rota conferida" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, items) = send(&app, Method::GET, "/api/checklist-model", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(items[0]["text"], "Rota conferida");

    let (status, _) = send(&app, Method::DELETE, &format!("/api/checklist-model/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
}
