//! # nodeid-cli
//!
//! Operator interface to a node's identity.
//!
//! - **id**: run startup resolution and print the node identity
//! - **keystore**: generate, inspect or remove the node key pair
//! - **encode**: compute the legacy identity of a certificate file
//! - **config**: show the effective configuration

pub mod cli;

pub use cli::run;
