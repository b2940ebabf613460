//! Core domain models for Pipeline
//!
//! This module defines the pipeline state machine, the action tree it
//! drives, and the observer protocol that reports state changes.

pub mod action;
pub mod config;
pub mod observer;
pub mod pipeline;
pub mod shared;
pub mod stage;
pub mod state;
pub mod visitor;

pub use action::*;
pub use observer::*;
pub use pipeline::*;
pub use shared::*;
pub use stage::*;
pub use state::*;
pub use visitor::*;
