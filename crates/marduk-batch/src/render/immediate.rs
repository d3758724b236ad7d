use anyhow::Result;

use crate::batch::{Batchable, GeometrySink};
use crate::coords::Transform;
use crate::geometry::{PrimitiveType, TextureId, Vertex};

use super::{DrawCall, RenderStates, RenderTarget};

/// Draws `drawable` directly: one draw call per pushed chunk, in push order.
///
/// This is the unbatched reference path. A batch flushed in
/// [`BatchMode::Deferred`](crate::batch::BatchMode) produces the same image.
pub fn draw_immediate<T, B>(target: &mut T, drawable: &B, states: &RenderStates) -> Result<()>
where
    T: RenderTarget + ?Sized,
    B: Batchable + ?Sized,
{
    let mut textures = TextureCollector::default();
    drawable.batch(&mut textures);
    target.begin(&textures.0)?;

    let mut sink = ImmediateSink {
        target,
        states,
        vertices: Vec::new(),
        indices: Vec::new(),
        draw_calls: 0,
        error: None,
    };
    drawable.batch(&mut sink);

    match sink.error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Records the texture of every pushed chunk so the target can check them up front.
#[derive(Default)]
struct TextureCollector(Vec<Option<TextureId>>);

impl GeometrySink for TextureCollector {
    fn push(&mut self, _: &[Vertex], _: PrimitiveType, texture: Option<TextureId>, _: &Transform) {
        self.0.push(texture);
    }
}

/// Sink that turns every chunk into a draw call right away.
///
/// `GeometrySink::push` cannot fail, so the first target error is kept and
/// later chunks are skipped.
struct ImmediateSink<'a, T: RenderTarget + ?Sized> {
    target: &'a mut T,
    states: &'a RenderStates,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    draw_calls: usize,
    error: Option<anyhow::Error>,
}

impl<T: RenderTarget + ?Sized> GeometrySink for ImmediateSink<'_, T> {
    fn push(
        &mut self,
        vertices: &[Vertex],
        primitive: PrimitiveType,
        texture: Option<TextureId>,
        transform: &Transform,
    ) {
        if self.error.is_some() {
            return;
        }

        let Ok(count) = u32::try_from(vertices.len()) else {
            log::warn!("draw_immediate: chunk of {} vertices exceeds u32 range; skipped", vertices.len());
            return;
        };

        self.indices.clear();
        if primitive.write_list_indices(count, 0, &mut self.indices) == 0 {
            return;
        }

        self.vertices.clear();
        self.vertices.extend(vertices.iter().map(|v| v.transformed(transform)));

        let call = DrawCall {
            vertices: &self.vertices,
            indices: &self.indices,
            kind: primitive.kind(),
            texture,
            states: self.states,
        };
        match self.target.draw(&call) {
            Ok(()) => self.draw_calls += 1,
            Err(err) => {
                log::debug!("draw_immediate: target failed after {} draw calls", self.draw_calls);
                self.error = Some(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::paint::Color;
    use crate::render::{Canvas, TextureStore};

    fn square(texture: Option<TextureId>) -> impl Fn(&mut dyn GeometrySink) {
        move |sink: &mut dyn GeometrySink| {
            let v = |x, y| Vertex::new(Vec2::new(x, y), Color::WHITE, Vec2::new(0.0, 0.0));
            let quad = [v(0.0, 0.0), v(0.0, 4.0), v(4.0, 0.0), v(4.0, 4.0)];
            sink.push(&quad, PrimitiveType::TriangleStrip, texture, &Transform::IDENTITY);
        }
    }

    #[test]
    fn draws_one_call_per_chunk() {
        let mut store = TextureStore::new();
        let red = store.solid(1, 1, Color::RED);
        let mut canvas = Canvas::new(8, 8, &store);

        let drawable = |sink: &mut dyn GeometrySink| {
            square(Some(red))(&mut *sink);
            square(None)(&mut *sink);
        };
        draw_immediate(&mut canvas, &drawable, &RenderStates::default()).unwrap();

        assert_eq!(canvas.draw_calls(), 2);
        assert_eq!(canvas.pixel(1, 1), Some(Color::WHITE));
    }

    #[test]
    fn unknown_texture_in_a_later_chunk_draws_nothing() {
        let mut store = TextureStore::new();
        let red = store.solid(1, 1, Color::RED);
        let foreign = TextureStore::new().solid(1, 1, Color::RED);
        let mut canvas = Canvas::new(8, 8, &store);

        let drawable = |sink: &mut dyn GeometrySink| {
            square(Some(red))(&mut *sink);
            square(Some(foreign))(&mut *sink);
        };
        assert!(draw_immediate(&mut canvas, &drawable, &RenderStates::default()).is_err());

        assert_eq!(canvas.draw_calls(), 0);
        assert_eq!(canvas.pixel(1, 1), Some(Color::TRANSPARENT));
    }
}
