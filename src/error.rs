//! Error taxonomy for the world-state core.
//!
//! Construction-time validation failures propagate to the caller unmodified;
//! stat arithmetic has no error path at all. Listener failures during event
//! dispatch are aggregated into a [`DispatchReport`](crate::events::DispatchReport)
//! rather than surfacing here, since they are per-listener and must never
//! abort delivery to the rest of the registration list.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// A player was constructed with an id outside the player id range.
    /// Fatal to that construction; no partially-built player is ever returned.
    #[error("player id {id} is below the minimum player id {min}")]
    IllegalIdentifier { id: u64, min: u64 },

    /// Cosine/arc-cosine requested against a zero-magnitude vector. The angle
    /// is undefined, which callers must be able to tell apart from an angle
    /// that happens to be zero.
    #[error("angle is undefined for a zero-magnitude vector")]
    UndefinedAngle,

    /// The leveling table has no entry for the next level. Callers implement
    /// their max-level policy on top of this instead of hitting an unrelated
    /// lookup failure.
    #[error("no xp threshold configured for level {level}")]
    MissingThreshold { level: u32 },
}
