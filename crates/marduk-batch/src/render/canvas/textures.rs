use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use image::RgbaImage;

use crate::geometry::TextureId;
use crate::paint::Color;

/// CPU-side texture storage for [`Canvas`](super::Canvas).
///
/// Images are kept premultiplied; inputs are straight alpha (as decoded from
/// files) and converted on insert.
#[derive(Debug, Default)]
pub struct TextureStore {
    textures: HashMap<TextureId, RgbaImage>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a straight-alpha image and returns its id.
    pub fn insert(&mut self, mut image: RgbaImage) -> TextureId {
        premultiply(&mut image);
        let id = TextureId::allocate();
        self.textures.insert(id, image);
        id
    }

    /// Registers a `width`×`height` texture filled with `color`.
    pub fn solid(&mut self, width: u32, height: u32, color: Color) -> TextureId {
        let id = TextureId::allocate();
        let px = image::Rgba(color.to_premul_u8());
        self.textures.insert(id, RgbaImage::from_pixel(width, height, px));
        id
    }

    /// Decodes an image file and registers it.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<TextureId> {
        let path = path.as_ref();
        let image = image::open(path)
            .with_context(|| format!("failed to load texture {}", path.display()))?
            .to_rgba8();
        Ok(self.insert(image))
    }

    /// Premultiplied pixels of `id`.
    #[inline]
    pub fn get(&self, id: TextureId) -> Option<&RgbaImage> {
        self.textures.get(&id)
    }

    #[inline]
    pub fn size(&self, id: TextureId) -> Option<(u32, u32)> {
        self.get(id).map(|img| img.dimensions())
    }

    /// Iterates registered textures (premultiplied pixels).
    pub fn iter(&self) -> impl Iterator<Item = (TextureId, &RgbaImage)> {
        self.textures.iter().map(|(&id, img)| (id, img))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

/// Converts straight-alpha pixels to premultiplied in place.
pub(crate) fn premultiply(image: &mut RgbaImage) {
    for px in image.pixels_mut() {
        let [r, g, b, a] = px.0;
        px.0 = Color::from_srgb_u8(r, g, b, a).to_premul_u8();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_premultiplies() {
        let mut store = TextureStore::new();
        let id = store.insert(RgbaImage::from_pixel(1, 1, image::Rgba([255, 255, 255, 0])));
        assert_eq!(store.get(id).map(|img| img.get_pixel(0, 0).0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn solid_textures_get_distinct_ids() {
        let mut store = TextureStore::new();
        let a = store.solid(4, 2, Color::RED);
        let b = store.solid(4, 2, Color::RED);
        assert_ne!(a, b);
        assert_eq!(store.size(a), Some((4, 2)));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn missing_file_reports_path() {
        let mut store = TextureStore::new();
        let err = store.load("/definitely/not/here.png").unwrap_err();
        assert!(err.to_string().contains("not/here.png"));
    }
}
