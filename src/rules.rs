use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::address::Address;
use crate::models::delivery::{Delivery, Vehicle};
use crate::models::package::Package;
use crate::models::task::Task;

/// Simplified task view handed to rule engines.
#[derive(Debug, Clone, Serialize)]
pub struct TaskView {
    pub address: Option<Address>,
    pub created_at: Option<DateTime<Utc>>,
    pub before: Option<DateTime<Utc>>,
}

/// Lazy package-quantity lookup. Answers per-package queries on demand
/// instead of copying the whole association set into the snapshot.
pub struct PackagesResolver<'a> {
    delivery: &'a Delivery,
}

impl PackagesResolver<'_> {
    pub fn quantity(&self, package: &Package) -> u32 {
        self.delivery.quantity_for_package(package)
    }

    pub fn contains(&self, package: &Package) -> bool {
        self.delivery.has_package(package)
    }
}

/// Read-only projection of a delivery for an external rule engine. A value
/// snapshot, not a live handle: nothing here can mutate the delivery.
pub struct DeliveryContext<'a> {
    pub distance: Option<f64>,
    pub weight: Option<u32>,
    pub vehicle: Vehicle,
    pub pickup: TaskView,
    pub dropoff: TaskView,
    pub packages: PackagesResolver<'a>,
}

pub trait RuleEvaluator {
    fn evaluate(&self, context: &DeliveryContext<'_>) -> bool;
}

pub fn snapshot(delivery: &Delivery) -> DeliveryContext<'_> {
    DeliveryContext {
        distance: delivery.distance_meters(),
        weight: delivery.weight,
        vehicle: delivery.vehicle,
        pickup: task_view(delivery.pickup()),
        dropoff: task_view(delivery.dropoff()),
        packages: PackagesResolver { delivery },
    }
}

fn task_view(task: Option<&Task>) -> TaskView {
    match task {
        Some(task) => TaskView {
            address: task.address.clone(),
            created_at: Some(task.created_at),
            before: task.done_before(),
        },
        None => TaskView {
            address: None,
            created_at: None,
            before: None,
        },
    }
}
