//! In-memory shopping cart.
//!
//! The cart is an ordered list of line items keyed by product name. Totals
//! are always derived from the items and never stored alongside them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::price::{CurrencyCode, Price};

/// Errors returned by cart operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// Checkout was attempted with no items in the cart.
    #[error("Your cart is empty!")]
    EmptyCart,
    /// A removal addressed a position outside the current item list.
    #[error("no cart item at position {index} (cart has {len} items)")]
    OutOfRange {
        /// The requested position.
        index: usize,
        /// Number of items in the cart at the time of the request.
        len: usize,
    },
}

/// One product entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product name; unique within a cart.
    pub name: String,
    /// Price of a single unit.
    pub unit_price: Price,
    /// Number of units, always at least 1.
    pub quantity: u32,
}

impl CartItem {
    /// Price of all units of this item.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// Derived cart totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Sum of all quantities.
    pub count: u32,
    /// Sum of unit price times quantity over all items.
    pub amount: Price,
}

/// An item taken out of the cart together with the totals left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    pub item: CartItem,
    pub totals: Totals,
}

/// What a successful checkout took out of the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub items: Vec<CartItem>,
    pub totals: Totals,
}

/// The shopping cart.
///
/// ## Invariants
///
/// - No two items share a name
/// - Every quantity is at least 1
/// - Removing an item deletes it entirely
///
/// # Example
///
/// ```
/// use rust_decimal::Decimal;
/// use sunleaf_core::{Cart, CurrencyCode};
///
/// let mut cart = Cart::new(CurrencyCode::INR);
/// cart.add_item("Soap", Decimal::from(40));
/// cart.add_item("Soap", Decimal::from(40));
/// let totals = cart.add_item("Oil", Decimal::from(150));
///
/// assert_eq!(cart.items().len(), 2);
/// assert_eq!(totals.count, 3);
/// assert_eq!(totals.amount.to_string(), "₹230");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
    currency_code: CurrencyCode,
}

impl Cart {
    /// Create an empty cart priced in `currency_code`.
    #[must_use]
    pub const fn new(currency_code: CurrencyCode) -> Self {
        Self {
            items: Vec::new(),
            currency_code,
        }
    }

    /// The line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Currency used for every price in this cart.
    #[must_use]
    pub const fn currency_code(&self) -> CurrencyCode {
        self.currency_code
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add one unit of `name`.
    ///
    /// An item with the same name gets its quantity incremented; otherwise a
    /// new item with quantity 1 is appended. The price is taken as given.
    pub fn add_item(&mut self, name: impl Into<String>, unit_price: Decimal) -> Totals {
        let name = name.into();
        if let Some(item) = self.items.iter_mut().find(|item| item.name == name) {
            item.quantity = item.quantity.saturating_add(1);
        } else {
            self.items.push(CartItem {
                name,
                unit_price: Price::new(unit_price, self.currency_code),
                quantity: 1,
            });
        }
        self.compute_totals()
    }

    /// Remove the item at ordinal position `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OutOfRange`] without touching the cart if `index`
    /// does not address a current item.
    pub fn remove_item(&mut self, index: usize) -> Result<Removal, CartError> {
        if index >= self.items.len() {
            return Err(CartError::OutOfRange {
                index,
                len: self.items.len(),
            });
        }
        let item = self.items.remove(index);
        Ok(Removal {
            item,
            totals: self.compute_totals(),
        })
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Total quantity and amount over all items.
    ///
    /// Both saturate instead of overflowing, so this never fails.
    #[must_use]
    pub fn compute_totals(&self) -> Totals {
        let count = self
            .items
            .iter()
            .fold(0_u32, |count, item| count.saturating_add(item.quantity));
        let amount = self
            .items
            .iter()
            .fold(Decimal::ZERO, |amount, item| {
                amount.saturating_add(item.line_total().amount)
            });
        Totals {
            count,
            amount: Price::new(amount, self.currency_code),
        }
    }

    /// Finalize the order and empty the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::EmptyCart`] and leaves the cart untouched if
    /// there is nothing to check out.
    pub fn checkout(&mut self) -> Result<Receipt, CartError> {
        if self.items.is_empty() {
            return Err(CartError::EmptyCart);
        }
        let totals = self.compute_totals();
        let items = std::mem::take(&mut self.items);
        Ok(Receipt { items, totals })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rupees(amount: i64) -> Decimal {
        Decimal::from(amount)
    }

    fn soap_and_oil() -> Cart {
        let mut cart = Cart::new(CurrencyCode::INR);
        cart.add_item("Soap", rupees(40));
        cart.add_item("Soap", rupees(40));
        cart.add_item("Oil", rupees(150));
        cart
    }

    #[test]
    fn test_new_cart_is_empty() {
        let cart = Cart::new(CurrencyCode::INR);
        assert!(cart.is_empty());
        let totals = cart.compute_totals();
        assert_eq!(totals.count, 0);
        assert_eq!(totals.amount, Price::zero(CurrencyCode::INR));
    }

    #[test]
    fn test_add_same_name_merges() {
        let cart = soap_and_oil();
        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.items()[0].name, "Soap");
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.items()[1].name, "Oil");
        assert_eq!(cart.items()[1].quantity, 1);
    }

    #[test]
    fn test_totals() {
        let cart = soap_and_oil();
        let totals = cart.compute_totals();
        assert_eq!(totals.count, 3);
        assert_eq!(totals.amount.amount, rupees(230));
        // Computing again gives the same answer
        assert_eq!(cart.compute_totals(), totals);
    }

    #[test]
    fn test_add_returns_new_totals() {
        let mut cart = Cart::new(CurrencyCode::INR);
        let totals = cart.add_item("Soap", rupees(40));
        assert_eq!(totals.count, 1);
        assert_eq!(totals.amount.amount, rupees(40));
    }

    #[test]
    fn test_add_keeps_first_price() {
        let mut cart = Cart::new(CurrencyCode::INR);
        cart.add_item("Soap", rupees(40));
        cart.add_item("Soap", rupees(55));
        assert_eq!(cart.items()[0].unit_price.amount, rupees(40));
        assert_eq!(cart.compute_totals().amount.amount, rupees(80));
    }

    #[test]
    fn test_negative_price_is_accepted() {
        let mut cart = Cart::new(CurrencyCode::INR);
        let totals = cart.add_item("Discount", rupees(-10));
        assert_eq!(totals.amount.amount, rupees(-10));
    }

    #[test]
    fn test_remove_first_item() {
        let mut cart = soap_and_oil();
        let removal = cart.remove_item(0).unwrap();
        assert_eq!(removal.item.name, "Soap");
        assert_eq!(removal.totals.count, 1);
        assert_eq!(removal.totals.amount.amount, rupees(150));
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].name, "Oil");
    }

    #[test]
    fn test_remove_only_item_empties_cart() {
        let mut cart = Cart::new(CurrencyCode::INR);
        cart.add_item("Soap", rupees(40));
        let removal = cart.remove_item(0).unwrap();
        assert!(cart.is_empty());
        assert_eq!(removal.totals.count, 0);
        assert_eq!(removal.totals.amount.amount, Decimal::ZERO);
    }

    #[test]
    fn test_remove_removes_whole_quantity() {
        let mut cart = soap_and_oil();
        cart.remove_item(0).unwrap();
        assert!(cart.items().iter().all(|item| item.name != "Soap"));
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut cart = soap_and_oil();
        let before = cart.clone();
        assert_eq!(
            cart.remove_item(2),
            Err(CartError::OutOfRange { index: 2, len: 2 })
        );
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_from_empty_cart() {
        let mut cart = Cart::new(CurrencyCode::INR);
        assert!(matches!(
            cart.remove_item(0),
            Err(CartError::OutOfRange { index: 0, len: 0 })
        ));
    }

    #[test]
    fn test_clear() {
        let mut cart = soap_and_oil();
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.compute_totals().count, 0);
    }

    #[test]
    fn test_checkout_clears_and_reports_totals() {
        let mut cart = soap_and_oil();
        let receipt = cart.checkout().unwrap();
        assert_eq!(receipt.items.len(), 2);
        assert_eq!(receipt.totals.count, 3);
        assert_eq!(receipt.totals.amount.to_string(), "₹230");
        assert!(cart.is_empty());
        let totals = cart.compute_totals();
        assert_eq!(totals.count, 0);
        assert_eq!(totals.amount.amount, Decimal::ZERO);
    }

    #[test]
    fn test_checkout_empty_cart() {
        let mut cart = Cart::new(CurrencyCode::INR);
        assert_eq!(cart.checkout(), Err(CartError::EmptyCart));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(CartError::EmptyCart.to_string(), "Your cart is empty!");
        assert_eq!(
            CartError::OutOfRange { index: 4, len: 1 }.to_string(),
            "no cart item at position 4 (cart has 1 items)"
        );
    }

    #[test]
    fn test_line_total() {
        let cart = soap_and_oil();
        assert_eq!(cart.items()[0].line_total().to_string(), "₹80");
    }

    #[test]
    fn test_huge_prices_saturate() {
        let mut cart = Cart::new(CurrencyCode::INR);
        cart.add_item("Big", Decimal::MAX);
        let totals = cart.add_item("Big", Decimal::MAX);
        assert_eq!(totals.count, 2);
        assert_eq!(totals.amount.amount, Decimal::MAX);

        let totals = cart.add_item("Soap", rupees(40));
        assert_eq!(totals.count, 3);
        assert_eq!(totals.amount.amount, Decimal::MAX);

        // The cart stays usable afterwards.
        let removal = cart.remove_item(0).unwrap();
        assert_eq!(removal.totals.amount.amount, rupees(40));
    }

    #[test]
    fn test_huge_negative_prices_saturate() {
        let mut cart = Cart::new(CurrencyCode::INR);
        cart.add_item("Refund", Decimal::MIN);
        let totals = cart.add_item("Refund", Decimal::MIN);
        assert_eq!(totals.amount.amount, Decimal::MIN);
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        const NAMES: [&str; 4] = ["Soap", "Oil", "Gel", "Shampoo"];

        #[derive(Debug, Clone)]
        enum Op {
            Add { name: usize, paise: i64 },
            Remove(usize),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                3 => (0..NAMES.len(), 0_i64..1_000_000)
                    .prop_map(|(name, paise)| Op::Add { name, paise }),
                1 => (0_usize..6).prop_map(Op::Remove),
            ]
        }

        proptest! {
            #[test]
            fn test_totals_follow_items(ops in prop::collection::vec(op(), 0..40)) {
                let mut cart = Cart::new(CurrencyCode::INR);
                // (name, unit price, quantity) in insertion order
                let mut expected: Vec<(&str, Decimal, u32)> = Vec::new();

                for op in ops {
                    match op {
                        Op::Add { name, paise } => {
                            let name = NAMES[name];
                            let price = Decimal::new(paise, 2);
                            cart.add_item(name, price);
                            match expected.iter_mut().find(|(n, _, _)| *n == name) {
                                Some(line) => line.2 += 1,
                                None => expected.push((name, price, 1)),
                            }
                        }
                        Op::Remove(index) => {
                            let result = cart.remove_item(index);
                            if index < expected.len() {
                                prop_assert!(result.is_ok());
                                expected.remove(index);
                            } else {
                                prop_assert_eq!(
                                    result,
                                    Err(CartError::OutOfRange { index, len: expected.len() })
                                );
                            }
                        }
                    }

                    let items = cart.items();
                    prop_assert_eq!(items.len(), expected.len());
                    for (item, (name, price, quantity)) in items.iter().zip(&expected) {
                        prop_assert_eq!(item.name.as_str(), *name);
                        prop_assert_eq!(item.unit_price.amount, *price);
                        prop_assert_eq!(item.quantity, *quantity);
                        prop_assert!(item.quantity >= 1);
                    }

                    let totals = cart.compute_totals();
                    let count: u32 = expected.iter().map(|(_, _, quantity)| quantity).sum();
                    let amount: Decimal = expected
                        .iter()
                        .map(|(_, price, quantity)| price * Decimal::from(*quantity))
                        .sum();
                    prop_assert_eq!(totals.count, count);
                    prop_assert_eq!(totals.amount.amount, amount);
                }
            }
        }
    }
}
