//! The dynamic elements of the landing page.
//!
//! Only elements the page controller touches live in the document; the rest
//! of the page is static markup in `index.html`.

use askama::Template;

use crate::config::EffectsConfig;
use crate::document::Document;
use crate::host::{Element, ElementId};
use crate::render::{
    CartModalFooterTemplate, CartModalHeaderTemplate, HeroVideoTemplate, NavbarTemplate,
};

/// Element ids shared by the controller, the layout and the templates.
pub mod ids {
    pub const NAVBAR: &str = "navbar";
    pub const NAV_CONTAINER: &str = "nav-container";
    pub const CART_BUTTON: &str = "cart-button";
    pub const CART_COUNT: &str = "cart-count";
    pub const PARTICLES: &str = "particles";
    pub const HERO_VIDEO: &str = "hero-video";
    pub const STATS: &str = "stats";
    pub const CART_MODAL: &str = "cartModal";
    pub const CART_MODAL_CONTENT: &str = "cart-modal-content";
    pub const CART_MODAL_HEADER: &str = "cart-modal-header";
    pub const CART_ITEMS: &str = "cart-items";
    pub const CART_TOTAL: &str = "cart-total";
    pub const CART_MODAL_FOOTER: &str = "cart-modal-footer";
    pub const NOTIFICATIONS: &str = "notifications";
}

/// Top-level elements the landing page template places by id.
#[must_use]
pub fn regions(effects: &EffectsConfig) -> Vec<ElementId> {
    let mut regions: Vec<ElementId> = [ids::NAVBAR, ids::PARTICLES, ids::HERO_VIDEO]
        .into_iter()
        .map(ElementId::from)
        .collect();
    regions.extend(
        effects
            .counters
            .targets
            .iter()
            .map(|counter| ElementId::from(counter.element_id.as_str())),
    );
    regions.push(ElementId::from(ids::CART_MODAL));
    regions.push(ElementId::from(ids::NOTIFICATIONS));
    regions
}

/// Build the initial document.
///
/// # Errors
///
/// Returns an error if one of the static fragments fails to render.
pub fn landing_document(effects: &EffectsConfig) -> askama::Result<Document> {
    let mut document = Document::new();

    let navbar = ElementId::from(ids::NAVBAR);
    let nav_container = ElementId::from(ids::NAV_CONTAINER);
    let cart_button = ElementId::from(ids::CART_BUTTON);
    document.insert(None, Element::new("nav", navbar.clone()).class("navbar"));
    document.insert(
        Some(&navbar),
        Element::new("div", nav_container.clone())
            .class("nav-container")
            .html(NavbarTemplate.render()?),
    );
    document.insert(
        Some(&nav_container),
        Element::new("button", cart_button.clone())
            .class("cart-icon")
            .attr("type", "button")
            .attr("aria-label", "Open cart")
            .attr("hx-post", "/cart/open")
            .attr("hx-swap", "none")
            .html(r#"<i class="fas fa-shopping-cart"></i>"#),
    );
    document.insert(
        Some(&cart_button),
        Element::new("span", ids::CART_COUNT)
            .class("cart-count")
            .text("0"),
    );

    document.insert(None, Element::new("div", ids::PARTICLES).class("particles"));
    document.insert(
        None,
        Element::new("video", ids::HERO_VIDEO)
            .class("hero-video")
            .attr("autoplay", "")
            .attr("muted", "")
            .attr("loop", "")
            .attr("playsinline", "")
            .html(HeroVideoTemplate.render()?),
    );

    document.insert(None, Element::new("section", ids::STATS).class("stats"));
    for counter in &effects.counters.targets {
        document.insert(
            None,
            Element::new("span", counter.element_id.as_str())
                .class("stat-number")
                .text("0"),
        );
    }

    let modal = ElementId::from(ids::CART_MODAL);
    let content = ElementId::from(ids::CART_MODAL_CONTENT);
    document.insert(
        None,
        Element::new("div", modal.clone())
            .class("modal")
            .style("display", "none")
            .attr("hx-post", "/cart/close")
            .attr("hx-trigger", "click[target === this]")
            .attr("hx-swap", "none"),
    );
    document.insert(
        Some(&modal),
        Element::new("div", content.clone()).class("modal-content"),
    );
    document.insert(
        Some(&content),
        Element::new("div", ids::CART_MODAL_HEADER).html(CartModalHeaderTemplate.render()?),
    );
    document.insert(
        Some(&content),
        Element::new("div", ids::CART_ITEMS).class("cart-items"),
    );
    document.insert(
        Some(&content),
        Element::new("div", ids::CART_TOTAL).class("cart-total"),
    );
    document.insert(
        Some(&content),
        Element::new("div", ids::CART_MODAL_FOOTER).html(CartModalFooterTemplate.render()?),
    );

    document.insert(
        None,
        Element::new("div", ids::NOTIFICATIONS)
            .class("notifications")
            .attr("aria-live", "polite"),
    );

    Ok(document)
}
