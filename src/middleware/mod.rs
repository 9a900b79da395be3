//! Middleware module
//!
//! HTTP middleware shared by every route

pub mod logging;
