//! Landing page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use rust_decimal::Decimal;
use sunleaf_core::{CurrencyCode, Price};
use tracing::instrument;

use crate::config::{EffectsConfig, RevealConfig};
use crate::error::Result;
use crate::filters;
use crate::page::ids;
use crate::runtime::PageSnapshot;
use crate::state::AppState;

// =============================================================================
// Catalog (static content for the product grid)
// =============================================================================

/// A product shown on the landing page.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    /// Price in minor units (paise, cents).
    pub price_minor: i64,
}

/// Products offered on the landing page.
pub const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        name: "Neem Soap",
        description: "Cold-pressed neem and tulsi for clear, calm skin.",
        icon: "soap",
        price_minor: 4000,
    },
    CatalogEntry {
        name: "Coconut Hair Oil",
        description: "Virgin coconut oil infused with hibiscus and curry leaf.",
        icon: "oil-can",
        price_minor: 15000,
    },
    CatalogEntry {
        name: "Aloe Vera Gel",
        description: "Fresh aloe pulp, nothing added, for sun-tired skin.",
        icon: "leaf",
        price_minor: 12000,
    },
    CatalogEntry {
        name: "Herbal Shampoo",
        description: "Reetha, shikakai and amla in a gentle wash.",
        icon: "pump-soap",
        price_minor: 18000,
    },
    CatalogEntry {
        name: "Turmeric Face Pack",
        description: "Kasturi turmeric and sandalwood for a natural glow.",
        icon: "spa",
        price_minor: 9000,
    },
    CatalogEntry {
        name: "Rose Water",
        description: "Steam-distilled damask rose toner.",
        icon: "seedling",
        price_minor: 7500,
    },
];

/// Product card display data for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    /// Formatted price, e.g. `₹40`.
    pub price: String,
    /// Plain amount posted back on add to cart.
    pub amount: String,
}

impl ProductView {
    fn new(entry: &CatalogEntry, currency: CurrencyCode) -> Self {
        let amount = Decimal::new(entry.price_minor, 2).normalize();
        Self {
            name: entry.name,
            description: entry.description,
            icon: entry.icon,
            price: Price::new(amount, currency).to_string(),
            amount: amount.to_string(),
        }
    }
}

/// Stats counter display data for templates.
#[derive(Debug, Clone)]
pub struct StatView {
    pub html: String,
    pub label: String,
}

// =============================================================================
// Template
// =============================================================================

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub navbar: String,
    pub particles: String,
    pub hero_video: String,
    pub stats: Vec<StatView>,
    pub cart_modal: String,
    pub notifications: String,
    pub products: Vec<ProductView>,
    pub reveal: RevealConfig,
    pub stats_threshold: f64,
    pub stats_root_margin: String,
    pub currency: CurrencyCode,
}

impl IndexTemplate {
    #[must_use]
    pub fn new(snapshot: &PageSnapshot, effects: &EffectsConfig, currency: CurrencyCode) -> Self {
        Self {
            navbar: snapshot.region(ids::NAVBAR).to_string(),
            particles: snapshot.region(ids::PARTICLES).to_string(),
            hero_video: snapshot.region(ids::HERO_VIDEO).to_string(),
            stats: effects
                .counters
                .targets
                .iter()
                .map(|counter| StatView {
                    html: snapshot.region(&counter.element_id).to_string(),
                    label: counter.label.clone(),
                })
                .collect(),
            cart_modal: snapshot.region(ids::CART_MODAL).to_string(),
            notifications: snapshot.region(ids::NOTIFICATIONS).to_string(),
            products: CATALOG
                .iter()
                .map(|entry| ProductView::new(entry, currency))
                .collect(),
            reveal: effects.reveal.clone(),
            stats_threshold: effects.counters.threshold,
            stats_root_margin: effects.counters.root_margin(),
            currency,
        }
    }
}

/// Display the landing page with the current state of every region.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Result<IndexTemplate> {
    let snapshot = state.ui().snapshot().await?;
    let config = state.config();
    Ok(IndexTemplate::new(&snapshot, &config.effects, config.currency))
}
