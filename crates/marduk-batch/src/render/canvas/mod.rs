//! Software render target.
//!
//! `Canvas` rasterizes draw calls into an RGBA8 image on the CPU. It exists so
//! batched and unbatched rendering can be compared pixel for pixel without a
//! GPU, and so the bench can write its results to disk.

mod raster;
mod textures;

use std::path::Path;

use anyhow::{Context, Result};
use image::RgbaImage;

use crate::geometry::{PrimitiveKind, TextureId, Vertex};
use crate::paint::Color;

use super::{DrawCall, RenderTarget};
use raster::Sampler;

pub use textures::TextureStore;
pub(crate) use textures::premultiply;

/// CPU render target backed by a premultiplied RGBA8 image.
pub struct Canvas<'t> {
    image: RgbaImage,
    textures: &'t TextureStore,
    active: bool,
    draw_calls: usize,
}

impl<'t> Canvas<'t> {
    /// Creates an active canvas cleared to transparent black.
    pub fn new(width: u32, height: u32, textures: &'t TextureStore) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            textures,
            active: true,
            draw_calls: 0,
        }
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Fills every pixel with `color` and resets the draw call counter.
    pub fn clear(&mut self, color: Color) {
        let px = image::Rgba(color.to_premul_u8());
        for p in self.image.pixels_mut() {
            *p = px;
        }
        self.draw_calls = 0;
    }

    /// An inactive canvas rejects flushes (see [`RenderTarget::begin`]).
    #[inline]
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Draw calls received since creation or the last [`clear`](Self::clear).
    #[inline]
    pub fn draw_calls(&self) -> usize {
        self.draw_calls
    }

    /// Premultiplied pixels.
    #[inline]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        (x < self.image.width() && y < self.image.height())
            .then(|| Color::from_premul_u8(self.image.get_pixel(x, y).0))
    }

    /// Returns a straight-alpha copy suitable for encoding.
    pub fn to_straight_image(&self) -> RgbaImage {
        let mut out = self.image.clone();
        for px in out.pixels_mut() {
            let (r, g, b, a) = Color::from_premul_u8(px.0).to_straight();
            let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
            px.0 = [q(r), q(g), q(b), q(a)];
        }
        out
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.to_straight_image()
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("failed to write {}", path.display()))
    }
}

impl RenderTarget for Canvas<'_> {
    fn begin(&mut self, textures: &[Option<TextureId>]) -> Result<()> {
        anyhow::ensure!(self.active, "canvas is not active");
        for &id in textures.iter().flatten() {
            anyhow::ensure!(
                self.textures.get(id).is_some(),
                "texture {} is not in this canvas' store",
                id.raw()
            );
        }
        Ok(())
    }

    fn draw(&mut self, call: &DrawCall<'_>) -> Result<()> {
        anyhow::ensure!(self.active, "canvas is not active");

        let texture = match call.texture {
            Some(id) => Some(
                self.textures
                    .get(id)
                    .with_context(|| format!("texture {} is not in this canvas' store", id.raw()))?,
            ),
            None => None,
        };
        let sampler = Sampler { texture };
        let blend = call.states.blend;

        let t = &call.states.transform;
        let fetch = |i: u32| -> Option<Vertex> {
            let v = call.vertices.get(i as usize)?;
            Some(v.transformed(t))
        };

        let arity = call.kind.arity();
        for prim in call.indices.chunks_exact(arity) {
            match call.kind {
                PrimitiveKind::Triangles => {
                    let (Some(a), Some(b), Some(c)) = (fetch(prim[0]), fetch(prim[1]), fetch(prim[2])) else {
                        anyhow::bail!("draw call index out of range");
                    };
                    raster::fill_triangle(&mut self.image, [a, b, c], sampler, blend);
                }
                PrimitiveKind::Lines => {
                    let (Some(a), Some(b)) = (fetch(prim[0]), fetch(prim[1])) else {
                        anyhow::bail!("draw call index out of range");
                    };
                    raster::draw_line(&mut self.image, [a, b], sampler, blend);
                }
                PrimitiveKind::Points => {
                    let Some(a) = fetch(prim[0]) else {
                        anyhow::bail!("draw call index out of range");
                    };
                    raster::draw_point(&mut self.image, a, sampler, blend);
                }
            }
        }

        self.draw_calls += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{Transform, Vec2};
    use crate::render::{BlendMode, RenderStates};

    fn quad(x: f32, y: f32, size: f32, color: Color) -> ([Vertex; 4], [u32; 6]) {
        let v = |px, py, u, w| Vertex::new(Vec2::new(px, py), color, Vec2::new(u, w));
        (
            [
                v(x, y, 0.0, 0.0),
                v(x + size, y, size, 0.0),
                v(x + size, y + size, size, size),
                v(x, y + size, 0.0, size),
            ],
            [0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn draws_textured_quad() {
        let mut store = TextureStore::new();
        let red = store.solid(4, 4, Color::RED);

        let mut canvas = Canvas::new(8, 8, &store);
        let (vertices, indices) = quad(2.0, 2.0, 4.0, Color::WHITE);
        let states = RenderStates::default();
        canvas
            .draw(&DrawCall {
                vertices: &vertices,
                indices: &indices,
                kind: PrimitiveKind::Triangles,
                texture: Some(red),
                states: &states,
            })
            .unwrap();

        assert_eq!(canvas.pixel(3, 3), Some(Color::RED));
        assert_eq!(canvas.pixel(0, 0), Some(Color::TRANSPARENT));
        assert_eq!(canvas.draw_calls(), 1);
    }

    #[test]
    fn states_transform_moves_geometry() {
        let store = TextureStore::new();
        let mut canvas = Canvas::new(8, 8, &store);
        let (vertices, indices) = quad(0.0, 0.0, 2.0, Color::GREEN);
        let states = RenderStates::new(Transform::translation(Vec2::new(4.0, 4.0)), BlendMode::Alpha);
        canvas
            .draw(&DrawCall {
                vertices: &vertices,
                indices: &indices,
                kind: PrimitiveKind::Triangles,
                texture: None,
                states: &states,
            })
            .unwrap();

        assert_eq!(canvas.pixel(0, 0), Some(Color::TRANSPARENT));
        assert_eq!(canvas.pixel(5, 5), Some(Color::GREEN));
    }

    #[test]
    fn unknown_texture_is_an_error() {
        let store = TextureStore::new();
        let other = TextureStore::new().solid(1, 1, Color::RED);
        let mut canvas = Canvas::new(4, 4, &store);
        let (vertices, indices) = quad(0.0, 0.0, 2.0, Color::WHITE);
        let states = RenderStates::default();
        let res = canvas.draw(&DrawCall {
            vertices: &vertices,
            indices: &indices,
            kind: PrimitiveKind::Triangles,
            texture: Some(other),
            states: &states,
        });
        assert!(res.is_err());
        assert_eq!(canvas.draw_calls(), 0);
    }

    #[test]
    fn inactive_canvas_refuses_to_begin() {
        let store = TextureStore::new();
        let mut canvas = Canvas::new(4, 4, &store);
        assert!(canvas.begin(&[None]).is_ok());
        canvas.set_active(false);
        assert!(canvas.begin(&[None]).is_err());
    }

    #[test]
    fn begin_rejects_textures_outside_the_store() {
        let mut store = TextureStore::new();
        let known = store.solid(1, 1, Color::RED);
        let other = TextureStore::new().solid(1, 1, Color::RED);

        let mut canvas = Canvas::new(4, 4, &store);
        assert!(canvas.begin(&[None, Some(known)]).is_ok());

        let err = canvas.begin(&[Some(known), Some(other)]).unwrap_err();
        assert!(err.to_string().contains("not in this canvas' store"));
        assert_eq!(canvas.draw_calls(), 0);
    }

    #[test]
    fn straight_export_undoes_premultiplication() {
        let store = TextureStore::new();
        let mut canvas = Canvas::new(1, 1, &store);
        canvas.clear(Color::from_straight(1.0, 0.0, 0.0, 0.5));
        assert_eq!(canvas.to_straight_image().get_pixel(0, 0).0, [255, 0, 0, 128]);
    }
}
