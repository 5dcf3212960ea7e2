//! Checkout routes.

pub(crate) mod checkout;
