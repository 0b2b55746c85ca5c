//! Typed wrappers over the Trading Assistant API endpoints.
//!
//! These are thin: build the request, run it through the client's
//! authenticated pipeline, decode the body. All coordination logic lives in
//! [`crate::auth`].

pub(crate) mod auth;
pub(crate) mod portfolios;
pub(crate) mod registry;
