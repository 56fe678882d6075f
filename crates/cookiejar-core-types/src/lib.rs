//! Core types shared across cookiejar facilities
//!
//! This crate holds the canonical field keys and event names used by the
//! logging facility and by log assertions in tests.

pub mod schema;
