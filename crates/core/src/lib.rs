//! Synapse Core Library
//!
//! This crate contains the domain logic for the Synapse lesson agent: the
//! lesson data model, the contracts for the three external collaborators
//! (curriculum store, lesson generator, message sink), and the controller
//! that advances the curriculum one lesson per run.
//!
//! Concrete collaborators are injected as trait objects at construction
//! time, so the progression logic can be exercised without a real
//! database, LLM, or chat endpoint.

pub mod controller;
pub mod generator;
pub mod lesson;
pub mod prompt;
pub mod sink;
pub mod store;
