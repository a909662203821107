//! Core types for Shopdeck.
//!
//! This module provides type-safe wrappers for common domain concepts and the
//! wire formats of the three backend services.

pub mod customer;
pub mod email;
pub mod id;
pub mod money;
pub mod order;
pub mod product;
pub mod status;

pub use customer::{Customer, NewCustomer};
pub use email::{Email, EmailError};
pub use id::*;
pub use money::format_usd;
pub use order::{NewOrder, NewOrderItem, Order, OrderItem, StatusUpdate};
pub use product::{NewProduct, Product, ProductUpdate};
pub use status::{OrderStatus, ParseOrderStatusError};
