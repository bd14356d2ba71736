//! Core types for Sunleaf.
//!
//! This module provides the cart model and the values derived from it.

pub mod cart;
pub mod notification;
pub mod price;

pub use cart::{Cart, CartError, CartItem, Receipt, Removal, Totals};
pub use notification::{Notification, NotificationKind};
pub use price::{CurrencyCode, Price};
