//! springport End-to-End Test Infrastructure
//!
//! This crate provides integration tests for the conversion pipeline:
//!
//! - Correspondence: source nodes to destination nodes across skeletons
//! - Conversion: colliders, hand defaults, chain grouping, overwrite modes
//! - CLI: avatar documents in, converted documents and reports out
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p springport-tests
//! ```

pub mod fixtures;
