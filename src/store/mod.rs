use std::time::Instant;

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DeliveryError;
use crate::models::delivery::Delivery;
use crate::observability::metrics::Metrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StoreEvent {
    Saved { delivery_id: Uuid },
    Deleted { delivery_id: Uuid },
}

/// Narrow persistence boundary for delivery aggregates. Tasks and package
/// associations live inside the aggregate value, so a delete cascades by
/// construction.
pub trait DeliveryRepository {
    fn find(&self, id: Uuid) -> Option<Delivery>;
    fn save(&self, delivery: Delivery);
    fn delete(&self, id: Uuid) -> Option<Delivery>;
}

pub struct InMemoryDeliveryStore {
    deliveries: DashMap<Uuid, Delivery>,
    events_tx: broadcast::Sender<StoreEvent>,
    metrics: Metrics,
}

impl InMemoryDeliveryStore {
    pub fn new(event_buffer_size: usize) -> Self {
        let (events_tx, _unused_rx) = broadcast::channel(event_buffer_size);

        Self {
            deliveries: DashMap::new(),
            events_tx,
            metrics: Metrics::new(),
        }
    }

    pub fn subscribe(&self) -> BroadcastStream<StoreEvent> {
        BroadcastStream::new(self.events_tx.subscribe())
    }

    /// Read-modify-write of one aggregate under its map entry lock, so
    /// concurrent mutations of the same delivery are serialized instead of
    /// racing on package totals or task windows.
    pub fn update<T>(
        &self,
        id: Uuid,
        mutate: impl FnOnce(&mut Delivery) -> Result<T, DeliveryError>,
    ) -> Result<T, DeliveryError> {
        let start = Instant::now();

        let outcome = {
            let mut entry = self
                .deliveries
                .get_mut(&id)
                .ok_or_else(|| DeliveryError::NotFound(format!("delivery {id} not found")))?;
            mutate(entry.value_mut())?
        };

        self.metrics
            .update_duration_seconds
            .observe(start.elapsed().as_secs_f64());
        self.metrics
            .store_operations_total
            .with_label_values(&["update"])
            .inc();

        let _ = self.events_tx.send(StoreEvent::Saved { delivery_id: id });
        debug!(delivery_id = %id, "delivery updated");

        Ok(outcome)
    }

    pub fn len(&self) -> usize {
        self.deliveries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deliveries.is_empty()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

impl DeliveryRepository for InMemoryDeliveryStore {
    fn find(&self, id: Uuid) -> Option<Delivery> {
        self.metrics
            .store_operations_total
            .with_label_values(&["find"])
            .inc();

        self.deliveries.get(&id).map(|entry| entry.value().clone())
    }

    fn save(&self, delivery: Delivery) {
        let id = delivery.id();
        self.deliveries.insert(id, delivery);

        self.metrics
            .store_operations_total
            .with_label_values(&["save"])
            .inc();
        self.metrics.deliveries_live.set(self.deliveries.len() as i64);

        let _ = self.events_tx.send(StoreEvent::Saved { delivery_id: id });
        info!(delivery_id = %id, "delivery saved");
    }

    fn delete(&self, id: Uuid) -> Option<Delivery> {
        let removed = self.deliveries.remove(&id).map(|(_, delivery)| delivery);

        if removed.is_some() {
            self.metrics
                .store_operations_total
                .with_label_values(&["delete"])
                .inc();
            self.metrics.deliveries_live.set(self.deliveries.len() as i64);

            let _ = self.events_tx.send(StoreEvent::Deleted { delivery_id: id });
            info!(delivery_id = %id, "delivery deleted");
        }

        removed
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{DeliveryRepository, InMemoryDeliveryStore};
    use crate::error::DeliveryError;
    use crate::models::delivery::Delivery;
    use crate::models::package::Package;

    #[test]
    fn save_then_find_roundtrips_the_aggregate() {
        let store = InMemoryDeliveryStore::new(16);
        let delivery = Delivery::new();
        let id = delivery.id();

        store.save(delivery);

        let found = store.find(id).expect("delivery present");
        assert_eq!(found.id(), id);
        assert!(found.pickup().is_some());
        assert!(found.dropoff().is_some());
    }

    #[test]
    fn find_unknown_id_returns_none() {
        let store = InMemoryDeliveryStore::new(16);
        assert!(store.find(Uuid::new_v4()).is_none());
    }

    #[test]
    fn delete_cascades_the_whole_aggregate() {
        let store = InMemoryDeliveryStore::new(16);
        let mut delivery = Delivery::new();
        let package = Package::new("box");
        delivery.add_package_with_quantity(&package, 2);
        let id = delivery.id();

        store.save(delivery);
        let removed = store.delete(id).expect("delivery removed");

        assert_eq!(removed.quantity_for_package(&package), 2);
        assert!(store.find(id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn update_mutates_in_place() {
        let store = InMemoryDeliveryStore::new(16);
        let delivery = Delivery::new();
        let id = delivery.id();
        let package = Package::new("box");
        store.save(delivery);

        store
            .update(id, |delivery| {
                delivery.add_package_with_quantity(&package, 3);
                Ok(())
            })
            .unwrap();

        let found = store.find(id).unwrap();
        assert_eq!(found.quantity_for_package(&package), 3);
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let store = InMemoryDeliveryStore::new(16);

        let result = store.update(Uuid::new_v4(), |_| Ok(()));

        assert!(matches!(result, Err(DeliveryError::NotFound(_))));
    }

    #[test]
    fn metrics_track_store_operations() {
        let store = InMemoryDeliveryStore::new(16);
        let delivery = Delivery::new();
        let id = delivery.id();

        store.save(delivery);
        let _ = store.find(id);
        let _ = store.delete(id);

        let encoded = store.metrics().encode().unwrap();
        assert!(encoded.contains("store_operations_total"));
        assert!(encoded.contains("deliveries_live"));
    }
}
