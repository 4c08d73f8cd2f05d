//! Smartlink - device-aware deep-link shortener
//!
//! Turns e-commerce product URLs into short codes and redirects visitors to
//! the right place for their device: the native app via a derived deep link
//! on iOS/Android, the web URL everywhere else (and always inside in-app
//! browsers, which cannot open scheme URIs reliably).
//!
//! # Architecture
//! - `platform`: merchant detection, product-ID extraction, deep-link templates
//! - `storages`: storage backends, the link model, and buffered click counting
//! - `services`: HTTP handlers (redirect, link CRUD, preview, health) and
//!   the user-agent classifier
//! - `middleware`: optional bearer-token guard for the management API
//! - `config` / `system` / `errors` / `utils`: ambient plumbing

pub mod config;
pub mod errors;
pub mod middleware;
pub mod platform;
pub mod services;
pub mod storages;
pub mod system;
pub mod utils;
