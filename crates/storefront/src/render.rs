//! Askama components for the dynamic parts of the page.
//!
//! The page controller decides *what* changes; these templates decide how
//! it looks. Nothing here reads or mutates cart state.

use askama::Template;
use sunleaf_core::{Cart, CartItem, Notification, Totals};

/// Cart row display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub name: String,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            name: item.name.clone(),
            unit_price: item.unit_price.to_string(),
            quantity: item.quantity,
            line_total: item.line_total().to_string(),
        }
    }
}

/// Itemized cart list. Each row carries a remove control addressed by its
/// position in the list.
#[derive(Template)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub items: Vec<CartItemView>,
}

impl From<&Cart> for CartItemsTemplate {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
        }
    }
}

/// Running total line.
#[derive(Template)]
#[template(path = "partials/cart_total.html")]
pub struct CartTotalTemplate {
    pub amount: String,
}

impl From<&Totals> for CartTotalTemplate {
    fn from(totals: &Totals) -> Self {
        Self {
            amount: totals.amount.to_string(),
        }
    }
}

/// Icon and message inside a notification.
#[derive(Template)]
#[template(path = "partials/notification.html")]
pub struct NotificationTemplate<'a> {
    pub icon: &'static str,
    pub message: &'a str,
}

impl<'a> From<&'a Notification> for NotificationTemplate<'a> {
    fn from(notification: &'a Notification) -> Self {
        Self {
            icon: notification.kind.icon(),
            message: &notification.message,
        }
    }
}

/// A single HTML attribute.
pub struct Attr<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

/// Outer HTML of one surface element.
///
/// `oob` marks the fragment for an HTMX out-of-band swap (`true` replaces,
/// `beforeend` appends, `delete` removes).
#[derive(Template)]
#[template(path = "partials/node.html")]
pub struct NodeTemplate<'a> {
    pub tag: &'a str,
    pub id: &'a str,
    pub class: String,
    pub style: String,
    pub attrs: Vec<Attr<'a>>,
    pub text: &'a str,
    pub html: String,
    pub oob: Option<&'static str>,
}

impl<'a> NodeTemplate<'a> {
    /// An empty wrapper used to address an element by id.
    #[must_use]
    pub fn shell(id: &'a str, oob: &'static str) -> Self {
        Self {
            tag: "div",
            id,
            class: String::new(),
            style: String::new(),
            attrs: Vec::new(),
            text: "",
            html: String::new(),
            oob: Some(oob),
        }
    }
}

/// Static markup placed inside layout elements.
#[derive(Template)]
#[template(path = "partials/navbar.html")]
pub struct NavbarTemplate;

#[derive(Template)]
#[template(path = "partials/cart_modal_header.html")]
pub struct CartModalHeaderTemplate;

#[derive(Template)]
#[template(path = "partials/cart_modal_footer.html")]
pub struct CartModalFooterTemplate;

#[derive(Template)]
#[template(path = "partials/hero_video.html")]
pub struct HeroVideoTemplate;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use sunleaf_core::CurrencyCode;

    use super::*;

    fn cart() -> Cart {
        let mut cart = Cart::new(CurrencyCode::INR);
        cart.add_item("Soap", Decimal::from(40));
        cart.add_item("Soap", Decimal::from(40));
        cart.add_item("Oil", Decimal::from(150));
        cart
    }

    #[test]
    fn test_cart_items_rows() {
        let html = CartItemsTemplate::from(&cart()).render().unwrap();
        assert!(html.contains("Soap"));
        assert!(html.contains("₹40 each"));
        assert!(html.contains("Qty: 2"));
        assert!(html.contains("₹80"));
        assert!(html.contains("Oil"));
        assert!(html.contains("\"index\": 1"));
        assert!(!html.contains("empty-cart-message"));
    }

    #[test]
    fn test_cart_items_empty() {
        let empty = Cart::new(CurrencyCode::INR);
        let html = CartItemsTemplate::from(&empty).render().unwrap();
        assert!(html.contains("empty-cart-message"));
        assert!(html.contains("Your cart is empty"));
    }

    #[test]
    fn test_cart_total() {
        let totals = cart().compute_totals();
        let html = CartTotalTemplate::from(&totals).render().unwrap();
        assert!(html.contains("Total:"));
        assert!(html.contains("<span>₹230</span>"));
    }

    #[test]
    fn test_notification_escapes_message() {
        let notification = Notification::item_added("<b>Soap</b>");
        let html = NotificationTemplate::from(&notification).render().unwrap();
        assert!(html.contains("fa-check-circle"));
        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;b&gt;Soap"));
        assert!(html.contains("added to cart!"));
    }

    #[test]
    fn test_node_shell() {
        let html = NodeTemplate::shell("n-1", "delete").render().unwrap();
        assert_eq!(html.trim(), r#"<div id="n-1" hx-swap-oob="delete"></div>"#);
    }
}
