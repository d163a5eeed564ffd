//! # Block Type Module
//!
//! Well-known block-type identifiers. A block type is an open string key into the
//! [`AssetRegistry`](crate::engine_state::rendering::AssetRegistry); these are the
//! ones the engine itself refers to.

/// Textured crate block the generate volume is filled with.
pub const CONTAINER: &str = "container2";

/// Emissive lamp block, drawn with its own unlit shader.
pub const LAMP: &str = "blockLamp";

/// Fallback block type whose shader every unregistered block type borrows.
pub const NORMAL: &str = "blockNormal";

/// Block type used to populate a freshly constructed chunk.
pub const DEFAULT_POPULATION: &str = CONTAINER;
