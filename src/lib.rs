//! totp-sync - reactive data core for a TOTP authenticator
//!
//! Keeps credential items, their live codes and exports in sync with a
//! persistent store. This library exposes modules for use in integration tests.

pub mod adapters;
pub mod config;
pub mod data_state;
pub mod error;
pub mod logging;
pub mod models;
pub mod prelude;
pub mod repository;
pub mod shared;
pub mod traits;
