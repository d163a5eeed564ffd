//! # Coordinate Model
//!
//! Pure conversions between the three coordinate spaces a block lives in:
//!
//! * **Global** - integer world position of the block
//! * **Chunk column** - the X/Z pair derived from the global position
//! * **Local** - position relative to the chunk column's world-space origin
//!
//! Y is never chunked; it passes through every conversion untouched.

use cgmath::{Point3, Vector2};

use super::chunk::{CHUNK_SIZE_X, CHUNK_SIZE_Z};

/// Derives the chunk column of a global block position.
///
/// The column is `(x mod CHUNK_SIZE_X, z mod CHUNK_SIZE_Z)`, using the Euclidean
/// remainder so the result is never negative.
///
/// # Arguments
/// * `global` - The block's world-space position
///
/// # Returns
/// The chunk column as an `(x, z)` pair
pub fn to_chunk_column(global: Point3<i32>) -> Vector2<i32> {
    Vector2::new(
        global.x.rem_euclid(CHUNK_SIZE_X as i32),
        global.z.rem_euclid(CHUNK_SIZE_Z as i32),
    )
}

/// Converts a global block position into a position relative to `column`'s origin.
///
/// # Arguments
/// * `global` - The block's world-space position
/// * `column` - The chunk column whose origin the result is relative to
///
/// # Returns
/// The local position; Y is unchanged
pub fn to_local(global: Point3<i32>, column: Vector2<i32>) -> Point3<i32> {
    Point3::new(
        global.x - column.x * CHUNK_SIZE_X as i32,
        global.y,
        global.z - column.y * CHUNK_SIZE_Z as i32,
    )
}

/// World-space origin of the chunk at chunk-grid coordinate `chunk`.
pub fn chunk_origin(chunk: Vector2<i32>) -> Point3<i32> {
    Point3::new(
        chunk.x * CHUNK_SIZE_X as i32,
        0,
        chunk.y * CHUNK_SIZE_Z as i32,
    )
}
