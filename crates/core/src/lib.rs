//! RocketShoes Core - Shared cart types.
//!
//! This crate provides the types shared by every RocketShoes component:
//! - `cart` - Cart store, service clients, and persistence
//! - `cli` - Command-line front-end for inspecting and mutating the cart
//!
//! # Architecture
//!
//! The core crate contains only types and their JSON encoding - no I/O, no
//! HTTP clients, no storage backends. This keeps it lightweight and allows
//! it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, prices, catalog records, line items, and carts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
