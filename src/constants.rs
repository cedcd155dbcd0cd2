//! Centralized generation constants for the house procedural core.
//!
//! Defaults for the configuration surface live here so that config defaults,
//! tests and benches agree on a single source of truth. Per-type tables
//! (grammar, size ranges, caps) remain in `grammar` next to the types.

// =====================================================
// House limits
// =====================================================
//
// The defaults are deliberately looser than a compact 10x10 plan with a
// single upper story. In that tight layout the default grammar drops most of
// its rooms; at 50x50 with three upper stories most of them are kept.
// Configs that want the compact layout set
// `max_width: 10, max_height: 10, max_stories: 1`.

/// Default maximum width of a single z-level, in tiles
pub const DEFAULT_MAX_WIDTH: u32 = 50;

/// Default maximum height (north-south extent) of a single z-level, in tiles
pub const DEFAULT_MAX_HEIGHT: u32 = 50;

/// Default highest z-index a room may be lifted to (0 = single story, so 3
/// allows four levels)
pub const DEFAULT_MAX_STORIES: u32 = 3;

// =====================================================
// Tree construction
// =====================================================

/// Maximum number of branch draws per room, regardless of grammar breadth
pub const MAX_BRANCHES_PER_ROOM: usize = 3;

/// Smallest legal room side: a wall ring around at least one floor tile
pub const MIN_ROOM_SIDE: u32 = 3;

// =====================================================
// Survey
// =====================================================

/// Default number of houses generated by a survey run
pub const DEFAULT_SURVEY_RUNS: u64 = 256;

/// Default base seed for surveys
pub const DEFAULT_SEED: u64 = 42;
