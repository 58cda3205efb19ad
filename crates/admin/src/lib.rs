//! Qamar Admin library.
//!
//! This crate provides the staff dashboard API as a library, allowing it to
//! be tested and reused by the CLI.
//!
//! # Security
//!
//! Every `/api/*` route except login requires a signed-in admin session.
//! The only admin is the address configured in `ADMIN_EMAIL`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
