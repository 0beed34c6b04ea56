use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street_address: String,
    pub location: Option<GeoPoint>,
}

impl Address {
    pub fn new(street_address: impl Into<String>) -> Self {
        Self {
            street_address: street_address.into(),
            location: None,
        }
    }

    pub fn with_location(street_address: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            street_address: street_address.into(),
            location: Some(GeoPoint { lat, lng }),
        }
    }
}
