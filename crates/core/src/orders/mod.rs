//! Owner of the cart and the item under construction.
//!
//! Every mutation of an [`Order`] goes through [`OrderManager`]. The fallible
//! `try_*` operations report why nothing changed; the `bool` variants are the
//! dialogue-facing contract and never fail loudly.

pub mod export;
pub mod summary;

use std::sync::Arc;

use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::catalog::pricing::{money, price_configuration, PriceBreakdown};
use crate::catalog::{Catalog, FurnitureType};
use crate::domain::order::{FieldValue, Order, OrderItem, PendingItem};
use crate::errors::DomainError;
use crate::flows::DialogueState;

pub use export::{ExportedItem, OrderExport};
pub use summary::{item_description, render_summary, EMPTY_CART_SUMMARY};

#[derive(Clone, Debug)]
pub struct OrderManager {
    catalog: Arc<Catalog>,
    order: Order,
}

impl OrderManager {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog, order: Order::new() }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.order.items
    }

    pub fn pending(&self) -> Option<&PendingItem> {
        self.order.pending.as_ref()
    }

    pub fn state(&self) -> DialogueState {
        self.order.state
    }

    pub fn set_state(&mut self, state: DialogueState) {
        self.order.state = state;
    }

    pub fn customer_name(&self) -> Option<&str> {
        self.order.customer_name.as_deref()
    }

    pub fn set_customer_name(&mut self, name: impl Into<String>) {
        self.order.customer_name = Some(name.into());
    }

    pub fn set_contact_email(&mut self, email: &str) {
        self.order.contact_email = Some(SecretString::from(email.trim().to_owned()));
    }

    /// Discards any previous pending item.
    pub fn start_item(&mut self, furniture_type: FurnitureType, quantity: u32) {
        self.start_pending(PendingItem::new(furniture_type, quantity));
    }

    pub fn start_pending(&mut self, item: PendingItem) {
        if let Some(previous) = self.order.pending.replace(item) {
            debug!(
                event_name = "order.pending_replaced",
                previous = %previous.furniture_type,
                "pending item replaced before commit"
            );
        }
    }

    /// Returns false when there is no pending item to update.
    pub fn set_field(&mut self, value: FieldValue) -> bool {
        match self.order.pending.as_mut() {
            Some(pending) => {
                pending.set(value);
                true
            }
            None => false,
        }
    }

    /// The single gate into the cart: the pending item is committed only when
    /// complete and is kept otherwise.
    pub fn try_commit_pending(&mut self) -> Result<&OrderItem, DomainError> {
        let pending = self.order.pending.as_ref().ok_or(DomainError::NoPendingItem)?;
        let item = pending.to_order_item()?;
        self.order.pending = None;
        debug!(
            event_name = "order.item_committed",
            furniture_type = %item.furniture_type,
            quantity = item.quantity,
            "order item committed"
        );
        self.order.items.push(item);
        Ok(&self.order.items[self.order.items.len() - 1])
    }

    pub fn commit_pending_item(&mut self) -> bool {
        self.try_commit_pending().is_ok()
    }

    pub fn try_remove_item(&mut self, index: usize) -> Result<OrderItem, DomainError> {
        let len = self.order.items.len();
        if index >= len {
            return Err(DomainError::ItemOutOfRange { index, len });
        }
        let removed = self.order.items.remove(index);
        debug!(event_name = "order.item_removed", index, "order item removed");
        Ok(removed)
    }

    pub fn remove_item(&mut self, index: usize) -> bool {
        self.try_remove_item(index).is_ok()
    }

    pub fn try_set_item_quantity(&mut self, index: usize, quantity: u32) -> Result<(), DomainError> {
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity { quantity });
        }
        let len = self.order.items.len();
        let item = self
            .order
            .items
            .get_mut(index)
            .ok_or(DomainError::ItemOutOfRange { index, len })?;
        item.quantity = quantity;
        debug!(event_name = "order.quantity_changed", index, quantity, "order item quantity changed");
        Ok(())
    }

    pub fn set_item_quantity(&mut self, index: usize, quantity: u32) -> bool {
        self.try_set_item_quantity(index, quantity).is_ok()
    }

    pub fn line_price(&self, item: &OrderItem) -> PriceBreakdown {
        price_configuration(
            &self.catalog,
            item.furniture_type,
            item.material,
            item.color,
            item.dimension,
            item.quantity,
        )
    }

    pub fn total(&self) -> Decimal {
        self.order.items.iter().map(|item| self.line_price(item).total_price).sum()
    }

    pub fn summary(&self) -> String {
        render_summary(&self.catalog, &self.order.items)
    }

    /// Wipes items, pending item, customer data and state.
    pub fn reset(&mut self) {
        self.order = Order::new();
    }

    pub fn export(&self) -> OrderExport {
        let items = self
            .order
            .items
            .iter()
            .map(|item| {
                let price = self.line_price(item);
                ExportedItem {
                    furniture_type: item.furniture_type,
                    material: item.material,
                    color: item.color,
                    dimension: item.dimension,
                    quantity: item.quantity,
                    unit_price: money(price.unit_price),
                    total_price: money(price.total_price),
                }
            })
            .collect();

        OrderExport {
            customer: self.order.customer_name.clone(),
            email: self.order.contact_email.as_ref().map(|email| email.expose_secret().to_owned()),
            timestamp: self.order.created_at,
            items,
            total: money(self.total()),
            state: self.order.state,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;

    use super::{OrderManager, EMPTY_CART_SUMMARY};
    use crate::catalog::{Catalog, Color, DimensionTier, FurnitureType, Material};
    use crate::domain::order::FieldValue;
    use crate::errors::DomainError;
    use crate::flows::DialogueState;

    fn manager() -> OrderManager {
        OrderManager::new(Arc::new(Catalog::standard()))
    }

    fn add_chair(manager: &mut OrderManager, quantity: u32) {
        manager.start_item(FurnitureType::Silla, quantity);
        manager.set_field(FieldValue::Material(Material::MaderaNoble));
        manager.set_field(FieldValue::Color(Color::Natural));
        manager.set_field(FieldValue::Dimension(DimensionTier::Estandar));
        assert!(manager.commit_pending_item());
    }

    #[test]
    fn incomplete_pending_item_is_not_committed() {
        let mut manager = manager();
        manager.start_item(FurnitureType::Mesa, 1);
        manager.set_field(FieldValue::Material(Material::Metal));

        assert!(!manager.commit_pending_item());
        assert!(manager.items().is_empty());
        assert!(manager.pending().is_some(), "pending item is preserved for the next turn");
    }

    #[test]
    fn complete_pending_item_is_committed_once() {
        let mut manager = manager();
        add_chair(&mut manager, 1);

        assert_eq!(manager.items().len(), 1);
        assert!(manager.pending().is_none());
        assert!(!manager.commit_pending_item());
        assert_eq!(manager.total(), Decimal::new(3500, 1));
    }

    #[test]
    fn set_field_without_pending_item_is_rejected() {
        let mut manager = manager();
        assert!(!manager.set_field(FieldValue::Color(Color::Gris)));
        assert_eq!(manager.try_commit_pending().err(), Some(DomainError::NoPendingItem));
    }

    #[test]
    fn out_of_range_edits_never_mutate_the_cart() {
        let mut manager = manager();
        add_chair(&mut manager, 2);

        assert!(!manager.remove_item(1));
        assert!(!manager.set_item_quantity(5, 3));
        assert!(!manager.set_item_quantity(0, 0));
        assert_eq!(manager.items()[0].quantity, 2);
        assert_eq!(
            manager.try_remove_item(3).err(),
            Some(DomainError::ItemOutOfRange { index: 3, len: 1 })
        );
    }

    #[test]
    fn quantity_change_reprices_the_line() {
        let mut manager = manager();
        add_chair(&mut manager, 1);

        assert!(manager.set_item_quantity(0, 4));
        assert_eq!(manager.total(), Decimal::from(1400));
    }

    #[test]
    fn removing_last_item_restores_empty_summary() {
        let mut manager = manager();
        add_chair(&mut manager, 1);

        assert!(manager.remove_item(0));
        assert_eq!(manager.summary(), EMPTY_CART_SUMMARY);
        assert_eq!(manager.total(), Decimal::ZERO);
    }

    #[test]
    fn export_carries_prices_and_trimmed_email() {
        let mut manager = manager();
        add_chair(&mut manager, 2);
        manager.set_customer_name("Ana");
        manager.set_contact_email("  ana@example.com ");
        manager.set_state(DialogueState::AwaitingContact);

        let export = manager.export();
        assert_eq!(export.customer.as_deref(), Some("Ana"));
        assert_eq!(export.email.as_deref(), Some("ana@example.com"));
        assert_eq!(export.items[0].unit_price.to_string(), "350.00");
        assert_eq!(export.total.to_string(), "700.00");
        assert_eq!(export.state, DialogueState::AwaitingContact);
    }

    #[test]
    fn repeated_exports_share_the_order_creation_time() {
        let mut manager = manager();
        add_chair(&mut manager, 1);

        let first = manager.export();
        let second = manager.export();
        assert_eq!(first.timestamp, manager.order().created_at);
        assert_eq!(first, second);
    }

    #[test]
    fn email_is_not_leaked_by_debug() {
        let mut manager = manager();
        manager.set_contact_email("secret@example.com");
        assert!(!format!("{manager:?}").contains("secret@example.com"));
    }

    #[test]
    fn reset_wipes_everything() {
        let mut manager = manager();
        add_chair(&mut manager, 1);
        manager.start_item(FurnitureType::Sofa, 1);
        manager.set_state(DialogueState::Finalizing);

        manager.reset();

        assert!(manager.items().is_empty());
        assert!(manager.pending().is_none());
        assert_eq!(manager.state(), DialogueState::Start);
    }
}
