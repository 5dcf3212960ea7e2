//! Request authentication.

pub(crate) mod middleware;
