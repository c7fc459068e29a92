//! Unit tests for the conversation module.
//!
//! Organised by concern: domain types, the store, and the file cache.

mod domain_tests;
