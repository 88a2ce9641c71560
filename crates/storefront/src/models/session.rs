//! Session keys.
//!
//! The session holds serialized snapshots of per-visitor state: the cart as
//! a [`crate::cart::Cart`] and the signed-in [`crate::auth::User`].

/// Session keys for cart and authentication data.
pub mod keys {
    /// Key for the cart snapshot.
    pub const CART: &str = "cart";

    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
