//! Middleware module
//!
//! Request logging applied to every route

pub mod logging;
