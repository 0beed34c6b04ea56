use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdjustmentKind {
    Tax,
    Delivery,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    pub id: Uuid,
    pub kind: AdjustmentKind,
    pub label: String,
    pub amount: i64,
    pub neutral: bool,
    pub origin_code: Option<String>,
}

impl Adjustment {
    pub fn new(kind: AdjustmentKind, label: impl Into<String>, amount: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            label: label.into(),
            amount,
            neutral: false,
            origin_code: None,
        }
    }

    /// Tax adjustments are neutral: informational, already part of the total.
    pub fn tax(label: impl Into<String>, amount: i64, origin_code: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: AdjustmentKind::Tax,
            label: label.into(),
            amount,
            neutral: true,
            origin_code: Some(origin_code.into()),
        }
    }

    pub fn delivery(label: impl Into<String>, amount: i64) -> Self {
        Self::new(AdjustmentKind::Delivery, label, amount)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub unit_price: i64,
    pub quantity: u32,
    pub tax_category: String,
    pub adjustments: Vec<Adjustment>,
}

impl OrderItem {
    pub fn new(unit_price: i64, quantity: u32, tax_category: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            unit_price,
            quantity,
            tax_category: tax_category.into(),
            adjustments: Vec::new(),
        }
    }

    pub fn total(&self) -> i64 {
        self.unit_price * i64::from(self.quantity)
    }

    pub fn remove_adjustments(&mut self, kind: AdjustmentKind) {
        self.adjustments.retain(|adjustment| adjustment.kind != kind);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub items: Vec<OrderItem>,
    pub adjustments: Vec<Adjustment>,
}

impl Order {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            items: Vec::new(),
            adjustments: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn adjustments_of(&self, kind: AdjustmentKind) -> impl Iterator<Item = &Adjustment> {
        self.adjustments
            .iter()
            .filter(move |adjustment| adjustment.kind == kind)
    }

    pub fn remove_adjustments(&mut self, kind: AdjustmentKind) {
        self.adjustments.retain(|adjustment| adjustment.kind != kind);
    }
}

impl Default for Order {
    fn default() -> Self {
        Self::new()
    }
}
