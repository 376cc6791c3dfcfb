//! Almacén de documentos
//!
//! Este módulo define el contrato con el almacén remoto de documentos:
//! suscripciones ordenadas en tiempo real, creación, actualización y borrado.
//! El resto del sistema solo depende del trait [`DocumentStore`]; la instancia
//! concreta la construye la raíz de composición (`main.rs`) y se inyecta.

pub mod memory;
pub mod postgres;
pub mod value;

use async_trait::async_trait;
use futures::Stream;
use std::cmp::Ordering;
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;
pub use value::{DocumentValue, Fields};

/// Colecciones conocidas por la aplicación
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Drivers,
    Vehicles,
    Plates,
    Trips,
    ChecklistModel,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Drivers,
        Collection::Vehicles,
        Collection::Plates,
        Collection::Trips,
        Collection::ChecklistModel,
    ];

    /// Nombre de la colección en el almacén remoto
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Drivers => "drivers",
            Collection::Vehicles => "vehicles",
            Collection::Plates => "plates",
            Collection::Trips => "trips",
            Collection::ChecklistModel => "checklistModel",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Orden de una suscripción: un único campo y una dirección
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub field: &'static str,
    pub direction: Direction,
}

impl OrderBy {
    pub fn ascending(field: &'static str) -> Self {
        Self { field, direction: Direction::Ascending }
    }

    pub fn descending(field: &'static str) -> Self {
        Self { field, direction: Direction::Descending }
    }

    /// Comparar dos documentos que contienen el campo de orden
    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        let ordering = match (a.get(self.field), b.get(self.field)) {
            (Some(x), Some(y)) => x.compare(y),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        };
        let ordering = match self.direction {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        };
        ordering.then_with(|| a.id.cmp(&b.id))
    }
}

/// Documento remoto: identificador asignado por el almacén y sus campos
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self { id: id.into(), fields }
    }

    pub fn get(&self, field: &str) -> Option<&DocumentValue> {
        self.fields.get(field)
    }
}

/// Contenido completo de una colección en un instante, entregado por una suscripción
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub collection: Collection,
    pub documents: Vec<Document>,
}

impl Snapshot {
    pub fn new(collection: Collection, documents: Vec<Document>) -> Self {
        Self { collection, documents }
    }
}

/// Aplicar el orden de una consulta. Los documentos sin el campo de orden
/// quedan fuera del resultado, igual que en el almacén remoto.
pub fn order_documents(documents: impl IntoIterator<Item = Document>, order: &OrderBy) -> Vec<Document> {
    let mut ordered: Vec<Document> = documents
        .into_iter()
        .filter(|doc| doc.get(order.field).is_some())
        .collect();
    ordered.sort_by(|a, b| order.compare(a, b));
    ordered
}

/// Errores del almacén de documentos
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: Collection, id: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Suscripción viva a una colección. Al soltarla se cancela en el almacén.
pub struct Subscription {
    collection: Collection,
    receiver: mpsc::UnboundedReceiver<Snapshot>,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn new(
        collection: Collection,
        receiver: mpsc::UnboundedReceiver<Snapshot>,
        task: Option<JoinHandle<()>>,
    ) -> Self {
        Self { collection, receiver, task }
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

}

/// Flujo de snapshots. Termina cuando el almacén cierra la suscripción.
impl Stream for Subscription {
    type Item = Snapshot;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Snapshot>> {
        self.receiver.poll_recv(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.receiver.close();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Contrato con el almacén remoto de documentos
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Suscribirse a una colección ordenada. El primer snapshot llega de inmediato
    /// y después uno nuevo por cada cambio en la colección.
    async fn subscribe(&self, collection: Collection, order: OrderBy) -> StoreResult<Subscription>;

    /// Lectura única de la colección, en orden de creación
    async fn fetch(&self, collection: Collection) -> StoreResult<Vec<Document>>;

    /// Crear un documento y devolver el id asignado
    async fn create(&self, collection: Collection, fields: Fields) -> StoreResult<String>;

    /// Mezclar campos en un documento existente
    async fn update(&self, collection: Collection, id: &str, fields: Fields) -> StoreResult<()>;

    /// Borrar un documento. Borrar un id inexistente no es un error.
    async fn delete(&self, collection: Collection, id: &str) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(id: &str, name: Option<&str>) -> Document {
        let mut fields = Fields::new();
        if let Some(name) = name {
            fields.insert("name".to_string(), DocumentValue::from(name));
        }
        Document::new(id, fields)
    }

    #[test]
    fn test_collection_names_round_trip() {
        for collection in Collection::ALL {
            assert_eq!(Collection::from_name(collection.name()), Some(collection));
        }
        assert_eq!(Collection::from_name("unknown"), None);
    }

    #[test]
    fn test_order_documents_skips_documents_without_field() {
        let docs = vec![named("1", Some("Bruno")), named("2", None), named("3", Some("Ana"))];
        let ordered = order_documents(docs, &OrderBy::ascending("name"));

        let ids: Vec<&str> = ordered.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1"]);
    }

    #[test]
    fn test_order_documents_descending() {
        let docs = vec![named("1", Some("Ana")), named("2", Some("Carla")), named("3", Some("Bruno"))];
        let ordered = order_documents(docs, &OrderBy::descending("name"));

        let ids: Vec<&str> = ordered.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "1"]);
    }
}
