//! contingent - A deterministic contingent-claims algebra and lifecycle engine
//!
//! Instruments are described once as claim trees and advanced through time
//! and elections by a pure engine; effect assembly turns each step into a
//! settlement effect and a content-addressed instrument version.

pub mod claim;
pub mod cli;
pub mod config;
pub mod effect;
pub mod lifecycle;
pub mod observability;
pub mod observation;
