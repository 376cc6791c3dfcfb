//! Almacén de documentos en memoria
//!
//! Implementación en proceso de [`DocumentStore`]. Mantiene las colecciones en
//! memoria y empuja un snapshot ordenado a cada suscriptor después de cada
//! escritura. Permite simular fallos y escrituras retenidas para los tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{mpsc, Notify};
use tracing::debug;
use uuid::Uuid;

use super::{
    order_documents, Collection, Document, DocumentStore, Fields, OrderBy, Snapshot, StoreError,
    StoreResult, Subscription,
};

struct Subscriber {
    order: OrderBy,
    sender: mpsc::UnboundedSender<Snapshot>,
}

#[derive(Default)]
struct Inner {
    collections: HashMap<Collection, Vec<Document>>,
    subscribers: HashMap<Collection, Vec<Subscriber>>,
}

impl Inner {
    fn documents(&self, collection: Collection) -> Vec<Document> {
        self.collections.get(&collection).cloned().unwrap_or_default()
    }

    /// Enviar el snapshot actual a los suscriptores de la colección,
    /// descartando los que ya se desuscribieron
    fn publish(&mut self, collection: Collection) {
        let documents = self.documents(collection);
        if let Some(subscribers) = self.subscribers.get_mut(&collection) {
            subscribers.retain(|subscriber| {
                let ordered = order_documents(documents.clone(), &subscriber.order);
                subscriber.sender.send(Snapshot::new(collection, ordered)).is_ok()
            });
        }
    }
}

/// Almacén de documentos en proceso
#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    inner: Arc<Mutex<Inner>>,
    fail_writes: Arc<AtomicBool>,
    hold_writes: Arc<AtomicBool>,
    writes_released: Arc<Notify>,
    write_attempts: Arc<AtomicUsize>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    /// Hacer que todas las escrituras siguientes fallen (o vuelvan a funcionar)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Retener las escrituras siguientes hasta liberarlas, como un almacén remoto que no responde
    pub fn set_hold_writes(&self, hold: bool) {
        self.hold_writes.store(hold, Ordering::SeqCst);
        if !hold {
            self.writes_released.notify_waiters();
        }
    }

    async fn wait_until_released(&self) {
        while self.hold_writes.load(Ordering::SeqCst) {
            let released = self.writes_released.notified();
            if !self.hold_writes.load(Ordering::SeqCst) {
                break;
            }
            released.await;
        }
    }

    /// Número de escrituras intentadas (create/update/delete), fallidas o no
    pub fn write_attempts(&self) -> usize {
        self.write_attempts.load(Ordering::SeqCst)
    }

    /// Insertar un documento tal cual, sin contar como escritura de la aplicación.
    /// Sirve para cargar datos históricos, incluso malformados.
    pub fn seed(&self, collection: Collection, fields: Fields) -> StoreResult<String> {
        let id = new_document_id();
        let mut inner = self.lock()?;
        inner
            .collections
            .entry(collection)
            .or_default()
            .push(Document::new(id.clone(), fields));
        inner.publish(collection);
        Ok(id)
    }

    fn begin_write(&self, operation: &str, collection: Collection) -> StoreResult<()> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            debug!("simulated {} failure on {}", operation, collection);
            return Err(StoreError::Unavailable(format!(
                "simulated {} failure on {}",
                operation, collection
            )));
        }
        Ok(())
    }
}

fn new_document_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn subscribe(&self, collection: Collection, order: OrderBy) -> StoreResult<Subscription> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut inner = self.lock()?;

        let initial = order_documents(inner.documents(collection), &order);
        sender
            .send(Snapshot::new(collection, initial))
            .map_err(|_| StoreError::Unavailable("subscriber dropped".to_string()))?;

        inner
            .subscribers
            .entry(collection)
            .or_default()
            .push(Subscriber { order, sender });

        Ok(Subscription::new(collection, receiver, None))
    }

    async fn fetch(&self, collection: Collection) -> StoreResult<Vec<Document>> {
        Ok(self.lock()?.documents(collection))
    }

    async fn create(&self, collection: Collection, fields: Fields) -> StoreResult<String> {
        self.begin_write("create", collection)?;
        self.wait_until_released().await;
        let id = new_document_id();

        let mut inner = self.lock()?;
        inner
            .collections
            .entry(collection)
            .or_default()
            .push(Document::new(id.clone(), fields));
        inner.publish(collection);
        Ok(id)
    }

    async fn update(&self, collection: Collection, id: &str, fields: Fields) -> StoreResult<()> {
        self.begin_write("update", collection)?;
        self.wait_until_released().await;

        let mut inner = self.lock()?;
        let document = inner
            .collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
            .ok_or_else(|| StoreError::NotFound {
                collection,
                id: id.to_string(),
            })?;
        document.fields.extend(fields);
        inner.publish(collection);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> StoreResult<()> {
        self.begin_write("delete", collection)?;
        self.wait_until_released().await;

        let mut inner = self.lock()?;
        if let Some(docs) = inner.collections.get_mut(&collection) {
            docs.retain(|doc| doc.id != id);
        }
        inner.publish(collection);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DocumentValue;
    use futures::StreamExt;

    fn name_fields(name: &str) -> Fields {
        let mut fields = Fields::new();
        fields.insert("name".to_string(), DocumentValue::from(name));
        fields
    }

    #[tokio::test]
    async fn test_subscription_receives_initial_and_ordered_updates() {
        let store = MemoryDocumentStore::new();
        store.seed(Collection::Drivers, name_fields("Carla")).unwrap();

        let mut subscription = store
            .subscribe(Collection::Drivers, OrderBy::ascending("name"))
            .await
            .unwrap();

        let initial = subscription.next().await.expect("initial snapshot");
        assert_eq!(initial.documents.len(), 1);

        store.create(Collection::Drivers, name_fields("Ana")).await.unwrap();
        let update = subscription.next().await.expect("update snapshot");
        let names: Vec<&str> = update
            .documents
            .iter()
            .filter_map(|d| d.get("name").and_then(|v| v.as_str()))
            .collect();
        assert_eq!(names, vec!["Ana", "Carla"]);
    }

    #[tokio::test]
    async fn test_failed_writes_leave_collection_untouched() {
        let store = MemoryDocumentStore::new();
        store.set_fail_writes(true);

        let result = store.create(Collection::Vehicles, name_fields("Van1")).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert_eq!(store.write_attempts(), 1);
        assert!(store.fetch(Collection::Vehicles).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_held_writes_complete_after_release() {
        let store = MemoryDocumentStore::new();
        store.set_hold_writes(true);

        let writer = store.clone();
        let pending = tokio::spawn(async move { writer.create(Collection::Drivers, name_fields("Ana")).await });

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(!pending.is_finished());
        assert!(store.fetch(Collection::Drivers).await.unwrap().is_empty());

        store.set_hold_writes(false);
        pending.await.unwrap().unwrap();
        assert_eq!(store.fetch(Collection::Drivers).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_merges_fields_and_rejects_unknown_ids() {
        let store = MemoryDocumentStore::new();
        let id = store.create(Collection::ChecklistModel, name_fields("x")).await.unwrap();

        let mut patch = Fields::new();
        patch.insert("text".to_string(), DocumentValue::from("Verificar pneus"));
        store.update(Collection::ChecklistModel, &id, patch.clone()).await.unwrap();

        let docs = store.fetch(Collection::ChecklistModel).await.unwrap();
        assert_eq!(docs[0].get("text").and_then(|v| v.as_str()), Some("Verificar pneus"));
        assert_eq!(docs[0].get("name").and_then(|v| v.as_str()), Some("x"));

        let missing = store.update(Collection::ChecklistModel, "nope", patch).await;
        assert!(matches!(missing, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_dropped_subscription_is_pruned() {
        let store = MemoryDocumentStore::new();
        let subscription = store
            .subscribe(Collection::Plates, OrderBy::ascending("number"))
            .await
            .unwrap();
        drop(subscription);

        store.create(Collection::Plates, Fields::new()).await.unwrap();
        let inner = store.inner.lock().unwrap();
        assert!(inner.subscribers.get(&Collection::Plates).map_or(true, |s| s.is_empty()));
    }
}
