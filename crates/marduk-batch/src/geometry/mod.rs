//! Captured geometry types.
//!
//! Responsibilities:
//! - vertex / topology model and strip/fan expansion
//! - texture identity
//! - chunk keys giving deterministic ordering (depth + insertion order + sub-order)

mod chunk;
mod depth;
mod key;
mod texture;
mod vertex;

pub use chunk::Chunk;
pub use depth::Depth;
pub use key::ChunkKey;
pub use texture::TextureId;
pub use vertex::{PrimitiveKind, PrimitiveType, Vertex};
