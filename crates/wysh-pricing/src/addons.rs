//! # Add-On Gating
//!
//! Add-ons (gift wrap, logo print, engraving) attach to a cart line and are
//! only offered once the line quantity reaches the add-on's minimum order
//! quantity (MOQ).

use serde::Serialize;
use tracing::debug;
use ts_rs::TS;

use crate::error::{PricingError, PricingResult};
use crate::money::Money;
use crate::types::AddOn;

/// True when `line_quantity` meets the add-on's MOQ.
///
/// ```rust
/// use wysh_pricing::addons::gate_add_on;
/// use wysh_pricing::money::Money;
/// use wysh_pricing::types::AddOn;
///
/// let print = AddOn {
///     id: "logo".into(),
///     name: "Logo print".into(),
///     price: Money::from_paise(2_500),
///     minimum_order_quantity: 25,
///     requires_proof_of_art: true,
///     is_active: true,
/// };
/// assert!(!gate_add_on(&print, 24));
/// assert!(gate_add_on(&print, 25));
/// ```
#[inline]
pub fn gate_add_on(add_on: &AddOn, line_quantity: u32) -> bool {
    line_quantity >= add_on.minimum_order_quantity
}

/// Add-ons a product page should offer for `line_quantity`.
pub fn available_add_ons(add_ons: &[AddOn], line_quantity: u32) -> Vec<&AddOn> {
    add_ons
        .iter()
        .filter(|a| a.is_active && gate_add_on(a, line_quantity))
        .collect()
}

/// The priced add-ons chosen for one cart line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AddOnSelection {
    pub add_ons: Vec<AddOn>,

    /// Sum of `price × line quantity` over the selection.
    #[serde(rename = "totalPaise")]
    pub total: Money,

    /// At least one selected add-on needs an approved proof before production.
    pub requires_proof_of_art: bool,
}

/// Prices the add-ons selected for a line.
///
/// Each add-on is charged per unit of the line.
///
/// ## Errors
/// `AddOnNotAvailable` for an inactive add-on or one whose MOQ the line
/// does not meet. Checkout must drop it before placing the order.
pub fn price_add_ons(selected: &[AddOn], line_quantity: u32) -> PricingResult<AddOnSelection> {
    let mut selection = AddOnSelection::default();

    for add_on in selected {
        if !add_on.is_active || !gate_add_on(add_on, line_quantity) {
            debug!(add_on = %add_on.name, line_quantity, "Add-on not available");
            return Err(PricingError::AddOnNotAvailable {
                name: add_on.name.clone(),
                quantity: line_quantity,
                minimum_order_quantity: add_on.minimum_order_quantity,
            });
        }

        selection.total += add_on.price.multiply_quantity(line_quantity);
        selection.requires_proof_of_art |= add_on.requires_proof_of_art;
        selection.add_ons.push(add_on.clone());
    }

    Ok(selection)
}
