//! Cart domain types and the priced cart view.

use serde::{Serialize, Serializer};

use emporium_core::{CartId, Money, ProductId};

/// One cart line joined with the product's live name and price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Money,
}

/// A priced line in the cart view.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub price_per_unit: Money,
    pub subtotal: Money,
}

/// The cart as returned to the customer, priced at read time.
///
/// Totals are never stored; they are recomputed from live product prices
/// every time the view is built.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CartView {
    #[serde(serialize_with = "serialize_cart_id")]
    pub cart_id: CartId,
    pub items: Vec<CartItemView>,
    pub total_items: u32,
    pub grand_total: Money,
}

impl CartView {
    /// Price `lines` for `cart_id`.
    ///
    /// Each subtotal is rounded to cents and the grand total is the sum of
    /// the rounded subtotals, so the numbers a client sees always add up.
    #[must_use]
    pub fn build(cart_id: CartId, lines: Vec<CartLine>) -> Self {
        let items: Vec<CartItemView> = lines
            .into_iter()
            .map(|line| CartItemView {
                subtotal: line.unit_price.times(line.quantity).rounded(),
                product_id: line.product_id,
                name: line.name,
                quantity: line.quantity,
                price_per_unit: line.unit_price,
            })
            .collect();

        let total_items = items
            .iter()
            .fold(0u32, |total, item| total.saturating_add(item.quantity));
        let grand_total = items.iter().map(|item| item.subtotal).sum();

        Self {
            cart_id,
            items,
            total_items,
            grand_total,
        }
    }

    /// An empty view for `cart_id`.
    #[must_use]
    pub fn empty(cart_id: CartId) -> Self {
        Self::build(cart_id, Vec::new())
    }
}

fn serialize_cart_id<S: Serializer>(id: &CartId, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(id)
}
