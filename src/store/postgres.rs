//! Almacén de documentos sobre PostgreSQL
//!
//! Cada documento es una fila de la tabla `documents` con sus campos en JSONB.
//! Un trigger emite `NOTIFY documents_changed, '<colección>'` en cada escritura;
//! las suscripciones escuchan ese canal y vuelven a leer la colección completa.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgListener;
use sqlx::{Executor, PgPool};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::value::{fields_from_json, fields_to_json, TIMESTAMP_KEY};
use super::{
    Collection, Direction, Document, DocumentStore, Fields, OrderBy, Snapshot, StoreError,
    StoreResult, Subscription,
};

/// Canal de notificación usado por el trigger de la tabla `documents`
pub const NOTIFY_CHANNEL: &str = "documents_changed";

const SCHEMA: &str = include_str!("../../migrations/0001_documents.sql");

/// Espera antes de releer tras perder la conexión del listener
const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Almacén de documentos respaldado por PostgreSQL
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Crear la tabla, el índice y el trigger de notificación si no existen
    pub async fn migrate(&self) -> StoreResult<()> {
        self.pool.execute(SCHEMA).await?;
        info!("✅ Esquema de documentos aplicado");
        Ok(())
    }

    /// Leer una colección completa. Sin orden, devuelve el orden de creación.
    async fn load(
        pool: &PgPool,
        collection: Collection,
        order: Option<&OrderBy>,
    ) -> StoreResult<Vec<Document>> {
        let rows: Vec<(String, Value)> = match order {
            // El campo de orden es un string o un timestamp codificado; ambos se comparan como texto
            Some(order) => {
                let direction = match order.direction {
                    Direction::Ascending => "ASC",
                    Direction::Descending => "DESC",
                };
                let sql = format!(
                    r#"
                    SELECT id, data FROM documents
                    WHERE collection = $1 AND data ? $2
                    ORDER BY COALESCE(data -> $2 ->> '{key}', data ->> $2) COLLATE "C" {direction}, id
                    "#,
                    key = TIMESTAMP_KEY,
                    direction = direction,
                );
                sqlx::query_as(&sql)
                    .bind(collection.name())
                    .bind(order.field)
                    .fetch_all(pool)
                    .await?
            }
            None => {
                sqlx::query_as(
                    "SELECT id, data FROM documents WHERE collection = $1 ORDER BY created_at, id",
                )
                .bind(collection.name())
                .fetch_all(pool)
                .await?
            }
        };

        Ok(rows
            .into_iter()
            .map(|(id, data)| Document::new(id, document_fields(data)))
            .collect())
    }
}

fn document_fields(data: Value) -> Fields {
    match data {
        Value::Object(object) => fields_from_json(object),
        _ => Fields::new(),
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn subscribe(&self, collection: Collection, order: OrderBy) -> StoreResult<Subscription> {
        let mut listener = PgListener::connect_with(&self.pool).await?;
        listener.listen(NOTIFY_CHANNEL).await?;

        let initial = Self::load(&self.pool, collection, Some(&order)).await?;
        let (sender, receiver) = mpsc::unbounded_channel();
        sender
            .send(Snapshot::new(collection, initial))
            .map_err(|_| StoreError::Unavailable("subscriber dropped".to_string()))?;

        let pool = self.pool.clone();
        let task = tokio::spawn(async move {
            loop {
                match listener.recv().await {
                    Ok(notification) if Collection::from_name(notification.payload()) != Some(collection) => continue,
                    Ok(_) => {}
                    Err(e) => {
                        // El listener reconecta en el siguiente recv; se relee por si hubo cambios perdidos
                        warn!("⚠️ Listener de {} desconectado: {}", collection, e);
                        tokio::time::sleep(RECONNECT_DELAY).await;
                    }
                }

                match Self::load(&pool, collection, Some(&order)).await {
                    Ok(documents) => {
                        if sender.send(Snapshot::new(collection, documents)).is_err() {
                            debug!("suscripción a {} cerrada", collection);
                            break;
                        }
                    }
                    Err(e) => warn!("⚠️ Error releyendo {}: {}", collection, e),
                }
            }
        });

        Ok(Subscription::new(collection, receiver, Some(task)))
    }

    async fn fetch(&self, collection: Collection) -> StoreResult<Vec<Document>> {
        Self::load(&self.pool, collection, None).await
    }

    async fn create(&self, collection: Collection, fields: Fields) -> StoreResult<String> {
        let id = Uuid::new_v4().simple().to_string();
        let data = Value::Object(fields_to_json(&fields));

        sqlx::query("INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)")
            .bind(collection.name())
            .bind(&id)
            .bind(data)
            .execute(&self.pool)
            .await?;

        Ok(id)
    }

    async fn update(&self, collection: Collection, id: &str, fields: Fields) -> StoreResult<()> {
        let patch = Value::Object(fields_to_json(&fields));

        let result = sqlx::query(
            "UPDATE documents SET data = data || $3 WHERE collection = $1 AND id = $2",
        )
        .bind(collection.name())
        .bind(id)
        .bind(patch)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                collection,
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> StoreResult<()> {
        sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.name())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
