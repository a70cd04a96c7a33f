//! Feedbacker - a feedback-collection web service
//!
//! Serves feedback forms to desktop and mobile browsers, classifies each
//! request by browser/platform/mobile-ness, and persists submitted opinions.
//!
//! # Architecture
//! - `browsers`: User-Agent parsing into normalized browser facts
//! - `classify`: per-request mobile decision and cookie middleware
//! - `prodchan`: product.platform.channel derivation
//! - `forms`: form deserialization and validation
//! - `services`: feedback routing, submission handling, rendering, health
//! - `storage`: opinion persistence behind a store trait
//! - `config`: static configuration
//! - `system`: logging initialization

pub mod browsers;
pub mod classify;
pub mod config;
pub mod errors;
pub mod forms;
pub mod prodchan;
pub mod services;
pub mod storage;
pub mod system;
