//! Error taxonomy for house generation.
//!
//! Only configuration inconsistencies are errors. Rooms that cannot be placed
//! and floors that cannot be joined by stairs are recorded on the result
//! instead (see `RoomNode::placed` and `ConnectivityGap`).

use std::path::PathBuf;

use crate::constants::MIN_ROOM_SIDE;
use crate::grammar::direction::Direction;
use crate::grammar::RoomType;

/// Fatal configuration error: generation must not start (or continue) with it.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("no branch directions defined for facing {0}")]
    MissingDirections(Direction),
    #[error("tile not found in catalog: {0}")]
    UnknownTile(String),
    #[error("no size range configured for room type {0}")]
    MissingSizeRange(RoomType),
    #[error("invalid size range for {room_type}: {min}..={max}")]
    InvalidSizeRange { room_type: RoomType, min: u32, max: u32 },
    #[error(
        "{room_type} room is {width}x{height}, below the {min}-tile minimum side",
        min = MIN_ROOM_SIDE
    )]
    InvalidRoomSize { room_type: RoomType, width: u32, height: u32 },
    #[error("room type {0} can recurse into itself without a population cap")]
    UnboundedGrammar(RoomType),
    #[error("root room type {0} has a population cap of zero")]
    RootCappedOut(RoomType),
    #[error("invalid house limits: {0}")]
    InvalidLimits(String),
}

/// Error loading or validating a `HouseConfig`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("unsupported config format: {0:?}")]
    UnsupportedFormat(PathBuf),
    #[error("invalid config: {0}")]
    Invalid(#[from] GenerationError),
}
