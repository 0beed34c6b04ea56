use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Catalog entity. Lookups key on the stable id, never on reference identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub id: Uuid,
    pub name: String,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryPackage {
    pub package_id: Uuid,
    pub quantity: u32,
}
