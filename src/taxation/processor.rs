use tracing::debug;

use crate::config::Config;
use crate::error::DeliveryError;
use crate::models::order::{Adjustment, AdjustmentKind, Order};
use crate::taxation::{
    SERVICE_CATEGORY, SERVICE_TAX_EXEMPT_CATEGORY, TaxCalculator, TaxRateResolver,
};

/// Recomputes the tax adjustments of an order from scratch: one neutral tax
/// adjustment per item, plus one per delivery adjustment, taxed under the
/// service category selected by the VAT setting.
pub struct OrderTaxesProcessor<R, C> {
    resolver: R,
    calculator: C,
    subject_to_vat: bool,
    jurisdiction: String,
}

impl<R, C> OrderTaxesProcessor<R, C>
where
    R: TaxRateResolver,
    C: TaxCalculator,
{
    pub fn new(
        resolver: R,
        calculator: C,
        subject_to_vat: bool,
        jurisdiction: impl Into<String>,
    ) -> Self {
        Self {
            resolver,
            calculator,
            subject_to_vat,
            jurisdiction: jurisdiction.into(),
        }
    }

    pub fn from_config(resolver: R, calculator: C, config: &Config) -> Self {
        Self::new(
            resolver,
            calculator,
            config.subject_to_vat,
            config.tax_jurisdiction.clone(),
        )
    }

    pub fn process(&self, order: &mut Order) -> Result<(), DeliveryError> {
        clear_taxes(order);

        if order.is_empty() {
            return Ok(());
        }

        for item in &mut order.items {
            let rate = self
                .resolver
                .resolve(&item.tax_category, &self.jurisdiction)
                .ok_or_else(|| DeliveryError::MissingTaxRate(item.tax_category.clone()))?;

            let amount = self.calculator.calculate(item.total(), &rate);
            item.adjustments
                .push(Adjustment::tax(rate.name.clone(), amount, rate.code));
        }

        let service_category = if self.subject_to_vat {
            SERVICE_CATEGORY
        } else {
            SERVICE_TAX_EXEMPT_CATEGORY
        };

        let delivery_amounts: Vec<i64> = order
            .adjustments_of(AdjustmentKind::Delivery)
            .map(|adjustment| adjustment.amount)
            .collect();

        for base in delivery_amounts {
            let rate = self
                .resolver
                .resolve(service_category, &self.jurisdiction)
                .ok_or_else(|| DeliveryError::MissingTaxRate(service_category.to_string()))?;

            let amount = self.calculator.calculate(base, &rate);
            order
                .adjustments
                .push(Adjustment::tax(rate.name.clone(), amount, rate.code));
        }

        debug!(order_id = %order.id, jurisdiction = %self.jurisdiction, "order taxes processed");

        Ok(())
    }
}

fn clear_taxes(order: &mut Order) {
    order.remove_adjustments(AdjustmentKind::Tax);
    for item in &mut order.items {
        item.remove_adjustments(AdjustmentKind::Tax);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::OrderTaxesProcessor;
    use crate::error::DeliveryError;
    use crate::models::order::{Adjustment, AdjustmentKind, Order, OrderItem};
    use crate::taxation::{
        SERVICE_CATEGORY, SERVICE_TAX_EXEMPT_CATEGORY, TaxCalculator, TaxRate, TaxRateResolver,
    };

    struct TableResolver {
        rates: HashMap<String, TaxRate>,
    }

    impl TableResolver {
        fn with_standard_rates() -> Self {
            let mut rates = HashMap::new();
            rates.insert("FOOD".to_string(), rate("tva_10", "TVA 10%", 0.10));
            rates.insert(
                SERVICE_CATEGORY.to_string(),
                rate("tva_20", "TVA 20%", 0.20),
            );
            rates.insert(
                SERVICE_TAX_EXEMPT_CATEGORY.to_string(),
                rate("tva_0", "TVA 0%", 0.0),
            );
            Self { rates }
        }
    }

    impl TaxRateResolver for TableResolver {
        fn resolve(&self, category: &str, _jurisdiction: &str) -> Option<TaxRate> {
            self.rates.get(category).cloned()
        }
    }

    struct PercentCalculator;

    impl TaxCalculator for PercentCalculator {
        fn calculate(&self, base: i64, rate: &TaxRate) -> i64 {
            (base as f64 * rate.amount).round() as i64
        }
    }

    fn rate(code: &str, name: &str, amount: f64) -> TaxRate {
        TaxRate {
            code: code.to_string(),
            name: name.to_string(),
            amount,
            included: true,
        }
    }

    fn processor(subject_to_vat: bool) -> OrderTaxesProcessor<TableResolver, PercentCalculator> {
        OrderTaxesProcessor::new(
            TableResolver::with_standard_rates(),
            PercentCalculator,
            subject_to_vat,
            "fr",
        )
    }

    #[test]
    fn empty_order_gets_no_adjustments() {
        let mut order = Order::new();

        processor(true).process(&mut order).unwrap();

        assert!(order.adjustments.is_empty());
    }

    #[test]
    fn each_item_gets_a_neutral_tax_adjustment() {
        let mut order = Order::new();
        order.items.push(OrderItem::new(1_000, 2, "FOOD"));

        processor(true).process(&mut order).unwrap();

        let item = &order.items[0];
        assert_eq!(item.adjustments.len(), 1);

        let tax = &item.adjustments[0];
        assert_eq!(tax.kind, AdjustmentKind::Tax);
        assert!(tax.neutral);
        assert_eq!(tax.amount, 200);
        assert_eq!(tax.label, "TVA 10%");
        assert_eq!(tax.origin_code.as_deref(), Some("tva_10"));
    }

    #[test]
    fn delivery_adjustments_are_taxed_under_service_category() {
        let mut order = Order::new();
        order.items.push(OrderItem::new(500, 1, "FOOD"));
        order
            .adjustments
            .push(Adjustment::delivery("delivery fee", 350));

        processor(true).process(&mut order).unwrap();

        let taxes: Vec<_> = order.adjustments_of(AdjustmentKind::Tax).collect();
        assert_eq!(taxes.len(), 1);
        assert_eq!(taxes[0].amount, 70);
        assert_eq!(taxes[0].origin_code.as_deref(), Some("tva_20"));
    }

    #[test]
    fn vat_exempt_setting_switches_service_category() {
        let mut order = Order::new();
        order.items.push(OrderItem::new(500, 1, "FOOD"));
        order
            .adjustments
            .push(Adjustment::delivery("delivery fee", 350));

        processor(false).process(&mut order).unwrap();

        let taxes: Vec<_> = order.adjustments_of(AdjustmentKind::Tax).collect();
        assert_eq!(taxes.len(), 1);
        assert_eq!(taxes[0].amount, 0);
        assert_eq!(taxes[0].origin_code.as_deref(), Some("tva_0"));
    }

    #[test]
    fn reprocessing_replaces_previous_tax_adjustments() {
        let mut order = Order::new();
        order.items.push(OrderItem::new(1_000, 1, "FOOD"));
        order
            .adjustments
            .push(Adjustment::delivery("delivery fee", 350));

        let processor = processor(true);
        processor.process(&mut order).unwrap();
        processor.process(&mut order).unwrap();

        assert_eq!(order.items[0].adjustments.len(), 1);
        assert_eq!(order.adjustments_of(AdjustmentKind::Tax).count(), 1);
        assert_eq!(order.adjustments_of(AdjustmentKind::Delivery).count(), 1);
    }

    #[test]
    fn missing_rate_is_surfaced_immediately() {
        let mut order = Order::new();
        order.items.push(OrderItem::new(1_000, 1, "UNKNOWN"));

        let result = processor(true).process(&mut order);

        assert!(matches!(result, Err(DeliveryError::MissingTaxRate(c)) if c == "UNKNOWN"));
    }
}
