//! House Procedural Core Library
//!
//! Generates multi-story house floor plans in two phases:
//! - Room grammar and tree building (typed rooms, size ranges, population caps)
//! - Breadth-first spatial embedding onto a growing 3D tile grid
//! - Door and stair placement over the finished grid
//! - Monte-Carlo survey for vetting custom grammars
//!
//! Every run is reproducible from its seed, which is logged and stored on
//! the resulting `House`.

pub mod config;
pub mod constants;
pub mod embed;
pub mod error;
pub mod finish;
pub mod grammar;
pub mod grid;
pub mod house;
pub mod logging;
pub mod survey;
pub mod tiles;
pub mod tree;

pub use config::HouseConfig;
pub use error::{ConfigError, GenerationError};
pub use house::House;
