//! Cart, notification and effect behavior of the page controller.
//!
//! The page runs against the in-memory document and a virtual clock, so
//! every timing is exact.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::time::Duration;

use rust_decimal::Decimal;
use sunleaf_core::{CartError, Price};
use sunleaf_integration_tests::{notification_messages, test_page};
use sunleaf_storefront::host::{ElementId, Surface};
use sunleaf_storefront::page::{UiEvent, ids};

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn rupees(amount: i64) -> Decimal {
    Decimal::from(amount)
}

// ============================================================================
// Cart store
// ============================================================================

#[test]
fn test_totals_match_items() {
    let mut page = test_page();
    page.add_item("Soap", rupees(40));
    page.add_item("Soap", rupees(40));
    page.add_item("Oil", rupees(150));

    let totals = page.compute_totals();
    assert_eq!(totals.count, 3);
    assert_eq!(totals.amount.amount, rupees(230));
    // Totals are derived, never drift.
    assert_eq!(page.compute_totals(), totals);
}

#[test]
fn test_duplicate_adds_merge() {
    let mut page = test_page();
    page.add_item("Soap", rupees(40));
    page.add_item("Soap", rupees(40));

    let items = page.cart().items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Soap");
    assert_eq!(items[0].quantity, 2);
}

#[test]
fn test_remove_first_item() {
    let mut page = test_page();
    page.add_item("Soap", rupees(40));
    page.add_item("Soap", rupees(40));
    page.add_item("Oil", rupees(150));

    let removal = page.remove_item(0).unwrap();
    assert_eq!(removal.item.name, "Soap");
    assert_eq!(removal.totals.count, 1);
    assert_eq!(removal.totals.amount.amount, rupees(150));

    let names: Vec<&str> = page.cart().items().iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Oil"]);

    let messages = notification_messages(&page);
    assert!(messages.last().unwrap().contains("Soap removed from cart"));
}

#[test]
fn test_removing_only_item_empties_cart() {
    let mut page = test_page();
    page.add_item("Soap", rupees(40));
    page.remove_item(0).unwrap();

    let totals = page.compute_totals();
    assert!(page.cart().is_empty());
    assert_eq!(totals.count, 0);
    assert_eq!(totals.amount.amount, Decimal::ZERO);
    assert_eq!(page.surface().text(ids::CART_COUNT), Some("0"));
    assert!(
        page.surface()
            .html(ids::CART_ITEMS)
            .unwrap()
            .contains("Your cart is empty")
    );
}

#[test]
fn test_out_of_range_removal_changes_nothing() {
    let mut page = test_page();
    page.add_item("Soap", rupees(40));
    let before = page.cart().clone();

    let err = page.remove_item(5).unwrap_err();
    assert_eq!(err, CartError::OutOfRange { index: 5, len: 1 });
    assert_eq!(page.cart(), &before);
    assert_eq!(page.surface().text(ids::CART_COUNT), Some("1"));
    assert!(
        notification_messages(&page)
            .last()
            .unwrap()
            .contains("no longer in your cart")
    );
}

#[test]
fn test_checkout_clears_cart_and_reports_total() {
    let mut page = test_page();
    page.add_item("Soap", rupees(40));
    page.add_item("Soap", rupees(40));
    page.add_item("Oil", rupees(150));

    let receipt = page.checkout().unwrap();
    assert_eq!(receipt.items.len(), 2);
    assert_eq!(receipt.totals.count, 3);

    let totals = page.compute_totals();
    assert_eq!(totals.count, 0);
    assert_eq!(totals.amount.amount, Decimal::ZERO);

    let last = notification_messages(&page).pop().unwrap();
    assert!(last.contains("Thank you for your order! Total: ₹230."));
    assert!(last.contains("We will contact you soon for delivery details."));
    assert_eq!(page.surface().text(ids::CART_COUNT), Some("0"));
}

#[test]
fn test_checkout_of_empty_cart_only_notifies() {
    let mut page = test_page();
    let err = page.checkout().unwrap_err();

    assert_eq!(err, CartError::EmptyCart);
    assert!(page.cart().is_empty());
    let messages = notification_messages(&page);
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("Your cart is empty!"));
    assert!(messages[0].contains("fa-times-circle"));
    assert_eq!(page.surface().count_class("error"), 1);
}

#[test]
fn test_events_drive_the_cart() {
    let mut page = test_page();
    page.handle(UiEvent::AddToCart {
        name: "Rose Water".to_string(),
        unit_price: Decimal::new(755, 1),
    });
    page.handle(UiEvent::AddToCart {
        name: "Rose Water".to_string(),
        unit_price: Decimal::new(755, 1),
    });

    assert_eq!(page.surface().text(ids::CART_COUNT), Some("2"));
    let total = page.surface().html(ids::CART_TOTAL).unwrap();
    assert!(total.contains(&Price::new(Decimal::from(151), page.cart().currency_code()).to_string()));

    page.handle(UiEvent::RemoveFromCart { index: 9 });
    assert_eq!(page.cart().items().len(), 1);
    page.handle(UiEvent::Checkout);
    assert!(page.cart().is_empty());
}

// ============================================================================
// Notifications
// ============================================================================

#[test]
fn test_notification_fades_then_disappears() {
    let mut page = test_page();
    page.add_item("Soap", rupees(40));
    let id = page.surface().children(ids::NOTIFICATIONS)[0].clone();

    page.advance(ms(2999));
    assert!(!page.surface().has_class(id.as_str(), "fade-out"));

    page.advance(ms(1));
    assert!(page.surface().has_class(id.as_str(), "fade-out"));

    page.advance(ms(399));
    assert!(page.surface().contains(&id));

    page.advance(ms(1));
    assert!(!page.surface().contains(&id));
}

#[test]
fn test_overlapping_notifications_keep_order() {
    let mut page = test_page();
    page.add_item("Soap", rupees(40));
    page.advance(ms(1000));
    page.add_item("Oil", rupees(150));

    let messages = notification_messages(&page);
    assert_eq!(messages.len(), 2);
    assert!(messages[0].contains("Soap added to cart!"));
    assert!(messages[1].contains("Oil added to cart!"));

    // The first one leaves at 3400ms, the second at 4400ms.
    page.advance(ms(2400));
    assert_eq!(notification_messages(&page).len(), 1);
    page.advance(ms(1000));
    assert!(notification_messages(&page).is_empty());
}

#[test]
fn test_contact_form_acknowledged() {
    let mut page = test_page();
    page.handle(UiEvent::ContactSubmitted);
    let messages = notification_messages(&page);
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("Thank you for your message! We will contact you soon."));
    assert_eq!(page.surface().count_class("success"), 1);
}

// ============================================================================
// Cart modal
// ============================================================================

#[test]
fn test_modal_open_and_close() {
    let mut page = test_page();
    page.handle(UiEvent::OpenCart);
    assert_eq!(page.surface().style(ids::CART_MODAL, "display"), Some("block"));
    page.advance(ms(10));
    assert!(page.surface().has_class(ids::CART_MODAL, "active"));

    page.handle(UiEvent::CloseCart);
    assert!(!page.surface().has_class(ids::CART_MODAL, "active"));
    page.advance(ms(300));
    assert_eq!(page.surface().style(ids::CART_MODAL, "display"), Some("none"));
}

// ============================================================================
// Effects
// ============================================================================

#[test]
fn test_particles_capped_and_expire() {
    let mut page = test_page();
    page.handle(UiEvent::Loaded {
        viewport_width: 1440,
    });

    let mut peak = 0;
    for _ in 0..200 {
        page.advance(ms(100));
        let count = page.surface().count_class("particle");
        assert!(count <= 15);
        peak = peak.max(count);
    }
    // 800ms spawns with an 8000ms lifetime saturate at 10.
    assert_eq!(peak, 10);

    let first = ElementId::from("particle-1");
    assert!(!page.surface().contains(&first));
}

#[test]
fn test_counters_animate_once_per_load() {
    let mut page = test_page();
    page.handle(UiEvent::Loaded {
        viewport_width: 1440,
    });
    page.handle(UiEvent::SectionVisible {
        target: ElementId::from(ids::STATS),
        ratio: 0.9,
    });
    page.advance(ms(2100));

    for (id, target) in [
        ("years-counter", "11"),
        ("customers-counter", "850"),
        ("products-counter", "15"),
        ("delivery-counter", "200"),
    ] {
        assert_eq!(page.surface().text(id), Some(target), "{id}");
    }
    assert!(!page.surface().is_observed(ids::STATS));

    // A later report in the same load does not restart them.
    page.handle(UiEvent::SectionVisible {
        target: ElementId::from(ids::STATS),
        ratio: 1.0,
    });
    page.advance(ms(16));
    assert_eq!(page.surface().text("customers-counter"), Some("850"));

    // A new load re-arms the observation.
    page.handle(UiEvent::Loaded {
        viewport_width: 1440,
    });
    assert!(page.surface().is_observed(ids::STATS));
    assert_eq!(page.surface().text("customers-counter"), Some("0"));
}

#[test]
fn test_navbar_threshold() {
    let mut page = test_page();
    page.handle(UiEvent::Scrolled { scroll_y: 120 });
    assert!(page.surface().has_class(ids::NAVBAR, "scrolled"));
    page.handle(UiEvent::Scrolled { scroll_y: 10 });
    assert!(!page.surface().has_class(ids::NAVBAR, "scrolled"));
}

#[test]
fn test_anchor_offsets() {
    let mut page = test_page();
    page.handle(UiEvent::Loaded {
        viewport_width: 1440,
    });
    page.surface_mut().take_patches();
    page.handle(UiEvent::AnchorClicked {
        offset_top: Some(1200),
    });
    assert_eq!(page.surface_mut().take_patches().scroll_to, Some(1120));

    page.handle(UiEvent::AnchorClicked {
        offset_top: Some(40),
    });
    assert_eq!(page.surface_mut().take_patches().scroll_to, Some(0));
}
