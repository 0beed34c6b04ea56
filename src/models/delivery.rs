use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::DeliveryError;
use crate::geo::distance_meters;
use crate::models::address::Address;
use crate::models::package::{DeliveryPackage, Package};
use crate::models::task::{Task, TaskKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Vehicle {
    #[default]
    Bike,
    CargoBike,
}

// Plain ordered task storage. The two-slot rule lives in Delivery, not here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    fn insert(&mut self, task: Task, position: Option<usize>) {
        match position {
            Some(index) if index < self.tasks.len() => self.tasks.insert(index, task),
            _ => self.tasks.push(task),
        }
    }

    fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut Task> {
        self.tasks.iter_mut()
    }
}

/// A pickup/dropoff task pair attached to an order, with package bookkeeping.
///
/// The pair is created whole and stays whole: exactly one pickup and one
/// dropoff for the lifetime of the delivery, linked to each other by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delivery {
    id: Uuid,
    tasks: TaskList,
    packages: Vec<DeliveryPackage>,
    pub weight: Option<u32>,
    pub vehicle: Vehicle,
    pub order_id: Option<Uuid>,
    pub store_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Delivery {
    pub fn new() -> Self {
        let mut pickup = Task::new(TaskKind::Pickup);
        let mut dropoff = Task::new(TaskKind::Dropoff);
        pickup.link_next(dropoff.id());
        dropoff.link_previous(pickup.id());

        let mut tasks = TaskList::default();
        tasks.insert(pickup, None);
        tasks.insert(dropoff, None);

        Self {
            id: Uuid::new_v4(),
            tasks,
            packages: Vec::new(),
            weight: None,
            vehicle: Vehicle::default(),
            order_id: None,
            store_id: None,
            created_at: Utc::now(),
        }
    }

    pub fn builder() -> DeliveryBuilder {
        DeliveryBuilder::default()
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Accepts a task only while the matching slot is still empty. Callers
    /// going through the generic container path hit the same guard.
    pub fn add_task(&mut self, task: Task, position: Option<usize>) -> Result<(), DeliveryError> {
        let slot_free = match task.kind() {
            TaskKind::Pickup => self.pickup().is_none(),
            TaskKind::Dropoff => self.dropoff().is_none(),
        };

        if !slot_free {
            return Err(DeliveryError::TaskSlotOccupied);
        }

        self.tasks.insert(task, position);
        Ok(())
    }

    pub fn pickup(&self) -> Option<&Task> {
        self.tasks.iter().find(|task| task.is_pickup())
    }

    pub fn dropoff(&self) -> Option<&Task> {
        self.tasks.iter().find(|task| task.is_dropoff())
    }

    pub(crate) fn pickup_mut(&mut self) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.is_pickup())
    }

    pub(crate) fn dropoff_mut(&mut self) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.is_dropoff())
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn task_count(&self) -> usize {
        self.tasks.iter().count()
    }

    /// Accumulates `quantity` onto the association for `package`, creating it
    /// on first use. A zero quantity never creates an association.
    pub fn add_package_with_quantity(&mut self, package: &Package, quantity: u32) {
        if quantity == 0 {
            return;
        }

        match self
            .packages
            .iter_mut()
            .find(|entry| entry.package_id == package.id)
        {
            Some(entry) => entry.quantity += quantity,
            None => self.packages.push(DeliveryPackage {
                package_id: package.id,
                quantity,
            }),
        }

        debug!(
            delivery_id = %self.id,
            package_id = %package.id,
            quantity,
            "package quantity added"
        );
    }

    pub fn has_package(&self, package: &Package) -> bool {
        self.packages
            .iter()
            .any(|entry| entry.package_id == package.id)
    }

    pub fn has_packages(&self) -> bool {
        !self.packages.is_empty()
    }

    pub fn quantity_for_package(&self, package: &Package) -> u32 {
        self.packages
            .iter()
            .find(|entry| entry.package_id == package.id)
            .map_or(0, |entry| entry.quantity)
    }

    pub fn packages(&self) -> &[DeliveryPackage] {
        &self.packages
    }

    pub fn is_assigned(&self) -> bool {
        self.pickup().is_some_and(Task::is_assigned) && self.dropoff().is_some_and(Task::is_assigned)
    }

    pub fn is_completed(&self) -> bool {
        self.tasks.iter().all(Task::is_completed)
    }

    pub fn set_pickup_range(
        &mut self,
        after: DateTime<Utc>,
        before: DateTime<Utc>,
    ) -> Result<&mut Self, DeliveryError> {
        self.pickup_mut()
            .ok_or_else(|| DeliveryError::Internal("pickup task missing".to_string()))?
            .set_window(after, before)?;
        Ok(self)
    }

    pub fn set_dropoff_range(
        &mut self,
        after: DateTime<Utc>,
        before: DateTime<Utc>,
    ) -> Result<&mut Self, DeliveryError> {
        self.dropoff_mut()
            .ok_or_else(|| DeliveryError::Internal("dropoff task missing".to_string()))?
            .set_window(after, before)?;
        Ok(self)
    }

    /// Great-circle distance between the two task addresses, when both are
    /// geocoded.
    pub fn distance_meters(&self) -> Option<f64> {
        let from = self.pickup()?.address.as_ref()?.location?;
        let to = self.dropoff()?.address.as_ref()?.location?;
        Some(distance_meters(&from, &to))
    }
}

impl Default for Delivery {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
pub struct DeliveryBuilder {
    pickup_address: Option<Address>,
    dropoff_address: Option<Address>,
    default_window: bool,
    weight: Option<u32>,
    vehicle: Option<Vehicle>,
    order_id: Option<Uuid>,
    store_id: Option<Uuid>,
}

impl DeliveryBuilder {
    pub fn pickup_address(mut self, address: Address) -> Self {
        self.pickup_address = Some(address);
        self
    }

    pub fn dropoff_address(mut self, address: Address) -> Self {
        self.dropoff_address = Some(address);
        self
    }

    /// Default fulfillment window when the caller supplies none: pickup due
    /// in one day, dropoff one hour after that. Overridable through the
    /// range setters.
    pub fn default_window(mut self) -> Self {
        self.default_window = true;
        self
    }

    pub fn weight(mut self, grams: u32) -> Self {
        self.weight = Some(grams);
        self
    }

    pub fn vehicle(mut self, vehicle: Vehicle) -> Self {
        self.vehicle = Some(vehicle);
        self
    }

    pub fn order_id(mut self, order_id: Uuid) -> Self {
        self.order_id = Some(order_id);
        self
    }

    pub fn store_id(mut self, store_id: Uuid) -> Self {
        self.store_id = Some(store_id);
        self
    }

    pub fn build(self) -> Delivery {
        let mut delivery = Delivery::new();

        if self.default_window {
            let pickup_before = Utc::now() + Duration::days(1);
            let dropoff_before = pickup_before + Duration::hours(1);

            if let Some(pickup) = delivery.pickup_mut() {
                pickup.set_deadline(pickup_before);
            }
            if let Some(dropoff) = delivery.dropoff_mut() {
                dropoff.set_deadline(dropoff_before);
            }
        }

        if let Some(address) = self.pickup_address {
            if let Some(pickup) = delivery.pickup_mut() {
                pickup.address = Some(address);
            }
        }
        if let Some(address) = self.dropoff_address {
            if let Some(dropoff) = delivery.dropoff_mut() {
                dropoff.address = Some(address);
            }
        }

        delivery.weight = self.weight;
        if let Some(vehicle) = self.vehicle {
            delivery.vehicle = vehicle;
        }
        delivery.order_id = self.order_id;
        delivery.store_id = self.store_id;

        delivery
    }
}
