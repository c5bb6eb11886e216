//! Synapse Agent Library Crate
//!
//! This library contains the process-boundary pieces of the lesson
//! agent: environment configuration and the Firestore-backed curriculum
//! store. The `agent` and `seed` binaries are thin wrappers around it
//! and the `synapse-core` controller.

pub mod config;
pub mod firestore;
