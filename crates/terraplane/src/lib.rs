//! Provider lifecycle management for the terraplane deployment engine.
//!
//! During a deployment the engine walks a graph of desired resources;
//! before it can operate on a resource it must resolve which provider
//! instance (package, version, and configuration) is responsible for it.
//! This crate owns that resolution: the [`providers::Registry`]
//! meta-provider manages the lifecycle of provider plugins and serves
//! lookups by [`providers::Reference`] while the engine's parallel
//! executor processes the rest of the graph.

pub mod config;
pub mod plugin;
pub mod providers;
pub mod resource;
