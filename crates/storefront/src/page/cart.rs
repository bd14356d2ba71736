//! Cart operations, display refresh and the cart modal.

use askama::Template;
use rust_decimal::Decimal;
use sunleaf_core::{CartError, Notification, Receipt, Removal, Totals};

use super::Page;
use super::layout::ids;
use crate::host::{ElementId, Scheduler, Surface, Task};
use crate::render::{CartItemsTemplate, CartTotalTemplate};

/// Class that activates the cart modal transition.
pub const MODAL_ACTIVE_CLASS: &str = "active";

impl<S: Surface, T: Scheduler> Page<S, T> {
    /// Add one unit of `name`, merging with an existing line.
    pub fn add_item(&mut self, name: &str, unit_price: Decimal) -> Totals {
        let totals = self.cart.add_item(name, unit_price);
        tracing::info!(
            item = name,
            count = totals.count,
            total = %totals.amount,
            "Item added to cart"
        );
        self.refresh_cart();
        self.notify(&Notification::item_added(name));
        totals
    }

    /// Remove the line at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OutOfRange`] when no line exists at `index`. The
    /// cart is left unchanged and an error notification is shown.
    pub fn remove_item(&mut self, index: usize) -> Result<Removal, CartError> {
        match self.cart.remove_item(index) {
            Ok(removal) => {
                tracing::info!(
                    item = %removal.item.name,
                    count = removal.totals.count,
                    total = %removal.totals.amount,
                    "Item removed from cart"
                );
                self.refresh_cart();
                self.notify(&Notification::item_removed(&removal.item.name));
                Ok(removal)
            }
            Err(err) => {
                tracing::warn!(index, error = %err, "Rejected cart removal");
                self.notify(&Notification::from(&err));
                Err(err)
            }
        }
    }

    /// Empty the cart without notifying.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.refresh_cart();
    }

    #[must_use]
    pub fn compute_totals(&self) -> Totals {
        self.cart.compute_totals()
    }

    /// Place the order: notify with the total, empty the cart and close the
    /// modal.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::EmptyCart`] when there is nothing to order. The
    /// cart is left unchanged and an error notification is shown.
    pub fn checkout(&mut self) -> Result<Receipt, CartError> {
        match self.cart.checkout() {
            Ok(receipt) => {
                tracing::info!(
                    items = receipt.items.len(),
                    count = receipt.totals.count,
                    total = %receipt.totals.amount,
                    "Order placed"
                );
                self.notify(&Notification::order_placed(receipt.totals.amount));
                self.refresh_cart();
                self.close_cart();
                Ok(receipt)
            }
            Err(err) => {
                tracing::debug!(error = %err, "Checkout of empty cart");
                self.notify(&Notification::from(&err));
                Err(err)
            }
        }
    }

    /// Bring the badge, the item list and the total in line with the cart.
    pub fn refresh_cart(&mut self) {
        let totals = self.cart.compute_totals();
        self.surface
            .set_text(&ElementId::from(ids::CART_COUNT), &totals.count.to_string());

        match CartItemsTemplate::from(&self.cart).render() {
            Ok(html) => self.surface.set_html(&ElementId::from(ids::CART_ITEMS), html),
            Err(e) => tracing::error!(error = %e, "Failed to render cart items"),
        }
        match CartTotalTemplate::from(&totals).render() {
            Ok(html) => self.surface.set_html(&ElementId::from(ids::CART_TOTAL), html),
            Err(e) => tracing::error!(error = %e, "Failed to render cart total"),
        }
    }

    /// Show the cart modal and start its opening transition.
    pub fn open_cart(&mut self) {
        self.cancel_modal_transition();
        self.surface
            .set_style(&ElementId::from(ids::CART_MODAL), "display", "block");
        self.modal_timer = Some(
            self.scheduler
                .once(self.effects.modal.reveal_delay, Task::RevealModal),
        );
    }

    /// Start the closing transition; the modal is hidden once it completes.
    pub fn close_cart(&mut self) {
        self.cancel_modal_transition();
        self.surface
            .remove_class(&ElementId::from(ids::CART_MODAL), MODAL_ACTIVE_CLASS);
        self.modal_timer = Some(
            self.scheduler
                .once(self.effects.modal.close_delay, Task::HideModal),
        );
    }

    pub(super) fn reveal_modal(&mut self) {
        self.modal_timer = None;
        self.surface
            .add_class(&ElementId::from(ids::CART_MODAL), MODAL_ACTIVE_CLASS);
    }

    pub(super) fn hide_modal(&mut self) {
        self.modal_timer = None;
        self.surface
            .set_style(&ElementId::from(ids::CART_MODAL), "display", "none");
    }

    fn cancel_modal_transition(&mut self) {
        if let Some(timer) = self.modal_timer.take() {
            self.scheduler.cancel(timer);
        }
    }
}
