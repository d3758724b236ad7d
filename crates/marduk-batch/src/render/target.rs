use anyhow::Result;

use crate::coords::Transform;
use crate::geometry::{PrimitiveKind, TextureId, Vertex};

/// How a draw call's fragments combine with the target.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum BlendMode {
    /// Premultiplied "source over": `dst = src + dst * (1 - src.a)`.
    #[default]
    Alpha,
    /// `dst = src + dst`.
    Add,
    /// `dst = src`.
    None,
}

/// State applied uniformly to every draw call of a flush.
///
/// Per-drawable transforms are already baked into vertex positions; this
/// transform is applied on top (e.g. a camera/view).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct RenderStates {
    pub transform: Transform,
    pub blend: BlendMode,
}

impl RenderStates {
    #[inline]
    pub const fn new(transform: Transform, blend: BlendMode) -> Self {
        Self { transform, blend }
    }
}

/// One rasterization pass: indexed list geometry with a single texture.
///
/// Indices are relative to `vertices`.
#[derive(Debug, Copy, Clone)]
pub struct DrawCall<'a> {
    pub vertices: &'a [Vertex],
    pub indices: &'a [u32],
    pub kind: PrimitiveKind,
    pub texture: Option<TextureId>,
    pub states: &'a RenderStates,
}

/// Destination of draw calls.
///
/// Implementations must not assume any bound state (texture, pipeline)
/// survives between two `draw` calls.
pub trait RenderTarget {
    /// Reports whether the target can accept the coming draw calls.
    ///
    /// Called once per flush before the first `draw`, with the texture of
    /// every call the flush will issue. An error aborts the flush with no draw
    /// issued, so a target should reject textures it cannot resolve here.
    fn begin(&mut self, textures: &[Option<TextureId>]) -> Result<()>;

    fn draw(&mut self, call: &DrawCall<'_>) -> Result<()>;
}

impl<T: RenderTarget + ?Sized> RenderTarget for &mut T {
    #[inline]
    fn begin(&mut self, textures: &[Option<TextureId>]) -> Result<()> {
        (**self).begin(textures)
    }

    #[inline]
    fn draw(&mut self, call: &DrawCall<'_>) -> Result<()> {
        (**self).draw(call)
    }
}
