//! Backend for the GTDN registry browser.
//!
//! The crate wraps the Czech business registry (ARES), the Justice registry
//! open data and the site's contact endpoints behind axum routers that the
//! `gtdn-api` service mounts.

pub mod ares;
pub mod cache;
pub mod config;
pub mod contacts;
pub mod error;
pub mod justice;
pub mod request;
pub mod telemetry;
pub mod throttle;
