//! Sunleaf Core - Cart and notification types.
//!
//! This crate provides the stateful rules behind the Sunleaf landing page:
//! - [`Cart`] - the in-memory line items and their derived totals
//! - [`Notification`] - the transient messages shown after cart and form actions
//! - [`Price`] - decimal amounts tagged with a currency
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no rendering, no timers.
//! The storefront crate owns a [`Cart`] inside its page controller and turns
//! the results of these operations into markup.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
