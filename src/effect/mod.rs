//! Effect assembly
//!
//! Connects the pure lifecycle engine to settlement: versions instruments
//! by content hash, replays their history and packages realized quantities
//! as effects.
//!
//! # Rules
//!
//! - A version id is the SHA-256 of the tree's JSON encoding
//! - Each election produces exactly one effect
//! - History replay from inception must reproduce the current version
//! - A fully discharged instrument has no next version
//! - Logging happens here, never in the engine

mod effect;
mod errors;
mod processor;
mod version;

pub use effect::Effect;
pub use errors::{EffectError, EffectErrorCode, EffectResult};
pub use processor::{EffectProcessor, ElectionOutcome, ElectionRequest, Party, TimeOutcome};
pub use version::{InstrumentVersion, VersionId};
