//! Core types and definitions for STAGECRAFT.
//!
//! This crate defines the vocabulary shared across the other crates:
//! components, component factories, prefab templates, events, and constants.
//! It has no dependency on the ECS runtime or any renderer.

pub mod components;
pub mod constants;
pub mod enums;
pub mod events;
pub mod factories;
pub mod prefab;
pub mod types;

#[cfg(test)]
mod tests;
