//! springport CLI library.
//!
//! This crate provides the pieces behind the `springport` binary: loading
//! avatar documents, persisting converted avatars, and the command
//! implementations.

pub mod commands;
pub mod input;
pub mod sink;
