//! User Management API Library
//!
//! This library provides the core functionality for the user management
//! service: the user domain, its record stores, and the HTTP layer.

pub mod api;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod state;
