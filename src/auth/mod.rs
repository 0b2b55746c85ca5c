//! Session lifecycle: response classification, the session store, and the
//! single-flight renewal coordinator.

pub mod classify;
pub(crate) mod renewal;
pub mod session;
