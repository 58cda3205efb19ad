//! Qamar Core - Domain types and business rules.
//!
//! This crate provides the types shared by the Qamar components:
//! - `admin` - Staff dashboard API (orders, promo codes, catalog, analytics)
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. Everything here can be unit tested without a store.
//!
//! # Modules
//!
//! - [`types`] - Typed ids, money, order status progression, promo codes,
//!   orders, users, products and sale banners

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
