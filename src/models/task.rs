use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DeliveryError;
use crate::models::address::Address;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskKind {
    Pickup,
    Dropoff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Todo,
    Done,
    Failed,
}

/// A single unit of work. The kind is fixed at creation; the sibling links
/// are weak references by id, the pair itself is owned by the delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    id: Uuid,
    kind: TaskKind,
    pub address: Option<Address>,
    done_after: Option<DateTime<Utc>>,
    done_before: Option<DateTime<Utc>>,
    pub assigned_to: Option<Uuid>,
    pub status: TaskStatus,
    previous: Option<Uuid>,
    next: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(kind: TaskKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            address: None,
            done_after: None,
            done_before: None,
            assigned_to: None,
            status: TaskStatus::Todo,
            previous: None,
            next: None,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    pub fn is_pickup(&self) -> bool {
        self.kind == TaskKind::Pickup
    }

    pub fn is_dropoff(&self) -> bool {
        self.kind == TaskKind::Dropoff
    }

    pub fn done_after(&self) -> Option<DateTime<Utc>> {
        self.done_after
    }

    pub fn done_before(&self) -> Option<DateTime<Utc>> {
        self.done_before
    }

    /// Sets both window bounds together. Rejects inverted ranges.
    pub fn set_window(
        &mut self,
        after: DateTime<Utc>,
        before: DateTime<Utc>,
    ) -> Result<(), DeliveryError> {
        if after > before {
            return Err(DeliveryError::InvalidTimeRange { after, before });
        }

        self.done_after = Some(after);
        self.done_before = Some(before);
        Ok(())
    }

    // Deadline-only default set by the builder, before any lower bound exists.
    pub(crate) fn set_deadline(&mut self, before: DateTime<Utc>) {
        self.done_before = Some(before);
    }

    pub fn previous(&self) -> Option<Uuid> {
        self.previous
    }

    pub fn next(&self) -> Option<Uuid> {
        self.next
    }

    pub(crate) fn link_previous(&mut self, sibling: Uuid) {
        self.previous = Some(sibling);
    }

    pub(crate) fn link_next(&mut self, sibling: Uuid) {
        self.next = Some(sibling);
    }

    pub fn assign(&mut self, courier: Uuid) {
        self.assigned_to = Some(courier);
    }

    pub fn unassign(&mut self) {
        self.assigned_to = None;
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned_to.is_some()
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Done
    }
}
