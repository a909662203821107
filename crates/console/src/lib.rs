//! Shopdeck Console - terminal storefront client.
//!
//! An interactive session against the three Shopdeck backend services:
//! products, customers, and orders. The services own all persistent data;
//! this client renders read copies, issues commands, and keeps exactly one
//! piece of local state - the shopping cart - which only reaches the backend
//! as an order-creation payload at checkout.
//!
//! # Architecture
//!
//! - [`api`] - REST clients with uniform success/error normalization
//! - [`cart`] - session-lifetime cart state
//! - [`notify`] - single-slot transient status messages
//! - [`views`] - fetch-and-render components per service
//! - [`app`] - command dispatch and the event loop (stdin + poll timers)
//! - [`config`] - environment-driven configuration
//!
//! Everything runs on one task: user input, network completions, and poll
//! ticks are multiplexed with `tokio::select!`, so all mutable state is
//! plainly owned by the loop and no locking exists anywhere.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod app;
pub mod cart;
pub mod config;
pub mod notify;
pub mod views;
