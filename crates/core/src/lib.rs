//! Shopdeck Core - Shared types library.
//!
//! This crate provides the domain types used across all Shopdeck components:
//! - `console` - Terminal storefront client
//! - `integration-tests` - End-to-end tests against stub services
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. The wire
//! formats here mirror what the product, customer, and order services accept
//! and return; the services own the data, the client only reads copies and
//! constructs creation payloads.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, money formatting, order statuses, and the wire
//!   structs for all three services

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
