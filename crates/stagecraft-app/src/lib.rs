//! STAGECRAFT host application.
//!
//! Loads configuration, initializes logging, and drives the level manager
//! from a fixed-rate frame-loop thread fed by a command channel.

pub mod config;
pub mod frame_loop;
pub mod logger;

pub use stagecraft_core as core;
pub use stagecraft_engine as engine;
