use image::RgbaImage;
use rand::Rng;

use marduk_batch::batch::{Batchable, GeometrySink};
use marduk_batch::coords::{Rect, Vec2};
use marduk_batch::geometry::TextureId;
use marduk_batch::paint::Color;
use marduk_batch::render::TextureStore;
use marduk_batch::shapes::{CircleShape, Sprite, Transformable};

use crate::config::{BenchConfig, DrawableArg};

const TEXTURE_SIZE: u32 = 64;
const SHAPE_RADIUS: f32 = 60.0;
const SHAPE_POINTS: usize = 30;
/// Degrees added to every drawable's rotation per frame.
const SPIN: f32 = 2.0;

pub enum Drawable {
    Sprite(Sprite),
    Shape(CircleShape),
}

impl Drawable {
    fn transform_mut(&mut self) -> &mut Transformable {
        match self {
            Drawable::Sprite(s) => &mut s.transform,
            Drawable::Shape(s) => &mut s.transform,
        }
    }
}

impl Batchable for Drawable {
    fn batch(&self, sink: &mut dyn GeometrySink) {
        match self {
            Drawable::Sprite(s) => s.batch(sink),
            Drawable::Shape(s) => s.batch(sink),
        }
    }
}

pub struct Scene {
    pub store: TextureStore,
    pub drawables: Vec<Drawable>,
}

impl Scene {
    pub fn generate<R: Rng>(config: &BenchConfig, rng: &mut R) -> Self {
        let mut store = TextureStore::new();
        let textures: Vec<TextureId> = (0..config.textures.max(1))
            .map(|_| store.insert(checkerboard(rng)))
            .collect();

        let (w, h) = (config.width as f32, config.height as f32);
        let mut previous: Option<TextureId> = None;
        let mut drawables = Vec::with_capacity(config.count);

        for _ in 0..config.count {
            let position = Vec2::new(rng.gen_range(0.0..w), rng.gen_range(0.0..h));
            let rotation = rng.gen_range(0.0..360.0);

            let mut texture = textures[rng.gen_range(0..textures.len())];
            // Frequent texture changes are the worst case for ordered batching.
            if let Some(prev) = previous {
                if rng.gen_range(0..100) < config.same_texture_chance {
                    texture = prev;
                }
            }
            previous = Some(texture);

            let size = TEXTURE_SIZE as f32;
            let transform = Transformable::at(position).with_rotation(rotation);

            let drawable = match config.drawable {
                DrawableArg::Sprite => Drawable::Sprite(
                    Sprite::new(texture, Rect::new(0.0, 0.0, size, size))
                        .with_transform(transform.with_origin(Vec2::new(size / 2.0, size / 2.0))),
                ),
                DrawableArg::Shape | DrawableArg::ShapeUntextured => {
                    let mut shape = CircleShape::with_points(SHAPE_RADIUS, SHAPE_POINTS);
                    shape.style.outline_color = Color::BLUE;
                    shape.style.outline_thickness = 2.0;
                    if config.drawable == DrawableArg::Shape {
                        shape.style.texture = Some(texture);
                        shape.style.texture_rect = Rect::new(0.0, 0.0, size, size);
                    }
                    shape.transform = transform.with_origin(Vec2::new(SHAPE_RADIUS, SHAPE_RADIUS));
                    Drawable::Shape(shape)
                }
            };
            drawables.push(drawable);
        }

        log::debug!("scene: {} drawables over {} textures", drawables.len(), textures.len());
        Self { store, drawables }
    }

    /// Advances the animation by one frame.
    pub fn step(&mut self) {
        for d in &mut self.drawables {
            let t = d.transform_mut();
            t.rotation = (t.rotation + SPIN) % 360.0;
        }
    }
}

fn checkerboard<R: Rng>(rng: &mut R) -> RgbaImage {
    let a = image::Rgba([rng.r#gen(), rng.r#gen(), rng.r#gen(), 255]);
    let b = image::Rgba([rng.r#gen(), rng.r#gen(), rng.r#gen(), 255]);
    RgbaImage::from_fn(TEXTURE_SIZE, TEXTURE_SIZE, |x, y| {
        if (x / 8 + y / 8) % 2 == 0 { a } else { b }
    })
}
