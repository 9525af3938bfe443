//! Guest/user cart reconciliation.
//!
//! A visitor always has a *mirror* cart held client-side (in the browser it is
//! local storage; server-side it is the session). Once they log in, the
//! authoritative cart is the one stored on their account, and the mirror just
//! follows it. This module captures the three transitions where the two
//! carts meet.
//!
//! The mirror remembers the account cart it was last copied from (its
//! *baseline*). Only units added on top of that baseline are the guest's own,
//! so logging out and back in never counts the account's items twice.
//!
//! ```text
//!            login / register                     logout
//!   Guest ─────────────────────────▶ User ──────────────────────▶ Guest
//!   mirror  server := server ⊕ (mirror - baseline)  mirror := last server cart
//!           mirror := server                         baseline := last server cart
//!
//!                     order placed (User)
//!                     server := ∅, mirror := ∅
//! ```

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::types::UserId;

/// Whose cart a request is operating on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartOwner {
    Guest,
    User(UserId),
}

impl CartOwner {
    #[must_use]
    pub const fn user_id(self) -> Option<UserId> {
        match self {
            Self::Guest => None,
            Self::User(id) => Some(id),
        }
    }
}

impl From<Option<UserId>> for CartOwner {
    fn from(user: Option<UserId>) -> Self {
        user.map_or(Self::Guest, Self::User)
    }
}

/// The cart held in the visitor's session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mirror {
    /// What the visitor sees and edits while logged out.
    pub cart: Cart,
    /// Account cart this mirror was copied from. Empty for a fresh guest.
    #[serde(default)]
    pub baseline: Cart,
}

impl Mirror {
    /// A mirror that holds only the guest's own items.
    #[must_use]
    pub fn guest(cart: Cart) -> Self {
        Self {
            cart: cart.normalized(),
            baseline: Cart::new(),
        }
    }

    /// A mirror that follows an account cart exactly.
    #[must_use]
    pub fn of_account(cart: Cart) -> Self {
        let cart = cart.normalized();
        Self {
            baseline: cart.clone(),
            cart,
        }
    }

    /// Units the visitor added while logged out.
    #[must_use]
    pub fn guest_additions(&self) -> Cart {
        self.cart.additions_over(&self.baseline)
    }

    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            cart: self.cart.normalized(),
            baseline: self.baseline.normalized(),
        }
    }
}

/// Result of reconciling carts at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// Cart to persist on the account.
    pub server: Cart,
    /// Mirror to keep in the visitor's session.
    pub mirror: Mirror,
    /// Whether the guest contributed anything (the account needs a write).
    pub changed: bool,
}

/// Merge the guest's additions into the account cart on login.
///
/// Nothing the guest added is lost: quantities for the same product and size
/// are summed. Items the mirror already copied from an account are not added
/// again. Afterwards the mirror follows the account cart.
#[must_use]
pub fn reconcile_login(guest: &Mirror, server: Cart) -> Reconciled {
    let additions = guest.guest_additions();
    let mut merged = server.normalized();
    let changed = !additions.is_empty();
    merged.merge(&additions);

    Reconciled {
        mirror: Mirror::of_account(merged.clone()),
        server: merged,
        changed,
    }
}

/// The guest mirror left behind after logout: a snapshot of the account cart.
#[must_use]
pub fn logout(server: &Cart) -> Mirror {
    Mirror::of_account(server.clone())
}

/// Carts after a successful order: both sides are emptied.
#[must_use]
pub fn after_order() -> (Cart, Mirror) {
    (Cart::default(), Mirror::default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{ProductId, Size};

    fn cart(entries: &[(i32, Size, i64)]) -> Cart {
        let mut cart = Cart::new();
        for (id, size, qty) in entries {
            cart.set_quantity(ProductId::new(*id), *size, *qty);
        }
        cart
    }

    #[test]
    fn test_login_merges_guest_into_server() {
        let guest = Mirror::guest(cart(&[(1, Size::M, 1), (3, Size::S, 2)]));
        let server = cart(&[(1, Size::M, 2)]);

        let result = reconcile_login(&guest, server);
        assert!(result.changed);
        assert_eq!(result.server, cart(&[(1, Size::M, 3), (3, Size::S, 2)]));
        assert_eq!(result.mirror, Mirror::of_account(result.server.clone()));
    }

    #[test]
    fn test_login_with_empty_guest_keeps_server() {
        let server = cart(&[(2, Size::L, 1)]);
        let result = reconcile_login(&Mirror::default(), server.clone());
        assert!(!result.changed);
        assert_eq!(result.server, server);
        assert_eq!(result.mirror.cart, server);
    }

    #[test]
    fn test_logout_leaves_snapshot() {
        let server = cart(&[(2, Size::L, 1)]);
        assert_eq!(logout(&server).cart, server);
    }

    #[test]
    fn test_logout_then_login_does_not_double() {
        let server = cart(&[(1, Size::M, 1)]);

        let mut mirror = logout(&server);
        for _ in 0..3 {
            let result = reconcile_login(&mirror, server.clone());
            assert!(!result.changed);
            assert_eq!(result.server, server);
            mirror = logout(&result.server);
        }
    }

    #[test]
    fn test_login_while_logged_in_does_not_double() {
        let server = cart(&[(1, Size::M, 2), (4, Size::XL, 1)]);
        let following = Mirror::of_account(server.clone());
        assert_eq!(reconcile_login(&following, server.clone()).server, server);
    }

    #[test]
    fn test_additions_after_logout_are_merged_once() {
        let server = cart(&[(1, Size::M, 1)]);
        let mut mirror = logout(&server);
        mirror.cart.add_item(ProductId::new(1), Some(Size::M)).unwrap();
        mirror.cart.add_item(ProductId::new(5), Some(Size::S)).unwrap();

        let result = reconcile_login(&mirror, server);
        assert!(result.changed);
        assert_eq!(result.server, cart(&[(1, Size::M, 2), (5, Size::S, 1)]));

        let again = reconcile_login(&result.mirror, result.server.clone());
        assert_eq!(again.server, result.server);
    }

    #[test]
    fn test_snapshot_carried_to_another_account_adds_only_guest_items() {
        let first = cart(&[(1, Size::M, 2)]);
        let mut mirror = logout(&first);
        mirror.cart.add_item(ProductId::new(9), Some(Size::L)).unwrap();

        let second = cart(&[(3, Size::S, 1)]);
        let result = reconcile_login(&mirror, second);
        assert_eq!(result.server, cart(&[(3, Size::S, 1), (9, Size::L, 1)]));
    }

    #[test]
    fn test_mirror_without_baseline_deserializes_as_guest() {
        let mirror: Mirror = serde_json::from_str(r#"{"cart":{"1":{"M":2}}}"#).unwrap();
        assert_eq!(mirror.guest_additions(), cart(&[(1, Size::M, 2)]));
    }

    #[test]
    fn test_after_order_empties_both() {
        let (server, mirror) = after_order();
        assert!(server.is_empty() && mirror.cart.is_empty() && mirror.baseline.is_empty());
    }

    #[test]
    fn test_owner_from_option() {
        assert_eq!(CartOwner::from(None), CartOwner::Guest);
        let owner = CartOwner::from(Some(UserId::new(4)));
        assert_eq!(owner.user_id(), Some(UserId::new(4)));
    }
}
