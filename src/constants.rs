//! Centralized constants for the world-state core.
//!
//! Eliminates magic numbers duplicated across player validation and the
//! default leveling table. Per-module constants (inventory sizing) remain in
//! their respective modules as the single source of truth.

/// Entity ids at or above this value belong to players; everything below is
/// reserved for non-player actors sharing the same id space.
pub const PLAYER_MIN_ID: u64 = 10_000;

/// Level every player starts at.
pub const BASE_LEVEL: u32 = 1;

/// Default `level -> xp required for the next level` pairs. Sparse: only
/// levels that can still advance appear here.
pub const DEFAULT_LEVEL_THRESHOLDS: &[(u32, u64)] = &[(1, 100), (2, 200)];
