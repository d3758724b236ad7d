//! Rasterization helpers for [`Canvas`](super::Canvas).
//!
//! Conventions:
//! - pixel centers sit at `+0.5`
//! - triangles use the top-left fill rule, so shared edges are covered once
//! - lines and points are one pixel wide

use image::RgbaImage;

use crate::coords::Vec2;
use crate::geometry::Vertex;
use crate::paint::Color;
use crate::render::BlendMode;

/// Nearest-texel sampler over a premultiplied RGBA8 image.
///
/// Without a texture every sample is opaque white, so vertex colors pass
/// through unchanged.
#[derive(Copy, Clone)]
pub(super) struct Sampler<'a> {
    pub(super) texture: Option<&'a RgbaImage>,
}

impl Sampler<'_> {
    #[inline]
    fn sample(&self, uv: Vec2) -> Color {
        let Some(tex) = self.texture else {
            return Color::WHITE;
        };
        if tex.width() == 0 || tex.height() == 0 {
            return Color::TRANSPARENT;
        }

        let x = (uv.x.floor().max(0.0) as u32).min(tex.width() - 1);
        let y = (uv.y.floor().max(0.0) as u32).min(tex.height() - 1);
        Color::from_premul_u8(tex.get_pixel(x, y).0)
    }

    #[inline]
    fn shade(&self, color: Color, uv: Vec2) -> Color {
        color.modulate(self.sample(uv))
    }
}

#[inline]
fn blend_pixel(dst: &mut RgbaImage, x: u32, y: u32, src: Color, blend: BlendMode) {
    let px = dst.get_pixel_mut(x, y);
    let d = Color::from_premul_u8(px.0);

    let out = match blend {
        BlendMode::Alpha => {
            let k = 1.0 - src.a;
            Color::from_premul(src.r + d.r * k, src.g + d.g * k, src.b + d.b * k, src.a + d.a * k)
        }
        BlendMode::Add => Color::from_premul(src.r + d.r, src.g + d.g, src.b + d.b, src.a + d.a),
        BlendMode::None => src,
    };

    px.0 = out.to_premul_u8();
}

/// Signed doubled area of `(a, b, p)`; positive on the inner side once the
/// triangle is wound consistently.
///
/// Endpoints are evaluated in a fixed order so two triangles sharing an edge
/// get exactly opposite values and never both cover a pixel.
#[inline]
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    if (a.y, a.x) > (b.y, b.x) {
        return -edge_raw(b, a, p);
    }
    edge_raw(a, b, p)
}

#[inline]
fn edge_raw(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Top or left edge (interior below / to the right) for a consistently wound triangle.
#[inline]
fn is_top_left(a: Vec2, b: Vec2) -> bool {
    b.y < a.y || (b.y == a.y && b.x > a.x)
}

#[inline]
fn covers(w: f32, top_left: bool) -> bool {
    w > 0.0 || (w == 0.0 && top_left)
}

pub(super) fn fill_triangle(dst: &mut RgbaImage, tri: [Vertex; 3], sampler: Sampler<'_>, blend: BlendMode) {
    let [v0, mut v1, mut v2] = tri;

    let mut area = edge(v0.position, v1.position, v2.position);
    if area == 0.0 || !area.is_finite() {
        return;
    }
    if area < 0.0 {
        core::mem::swap(&mut v1, &mut v2);
        area = -area;
    }

    let (p0, p1, p2) = (v0.position, v1.position, v2.position);

    let (w, h) = (dst.width() as f32, dst.height() as f32);
    let min_x = p0.x.min(p1.x).min(p2.x).floor().max(0.0);
    let min_y = p0.y.min(p1.y).min(p2.y).floor().max(0.0);
    let max_x = p0.x.max(p1.x).max(p2.x).ceil().min(w);
    let max_y = p0.y.max(p1.y).max(p2.y).ceil().min(h);
    if min_x >= max_x || min_y >= max_y {
        return;
    }

    let tl0 = is_top_left(p1, p2);
    let tl1 = is_top_left(p2, p0);
    let tl2 = is_top_left(p0, p1);
    let inv_area = 1.0 / area;

    for y in min_y as u32..max_y as u32 {
        for x in min_x as u32..max_x as u32 {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);

            let w0 = edge(p1, p2, p);
            let w1 = edge(p2, p0, p);
            let w2 = edge(p0, p1, p);
            if !(covers(w0, tl0) && covers(w1, tl1) && covers(w2, tl2)) {
                continue;
            }

            let (l0, l1, l2) = (w0 * inv_area, w1 * inv_area, w2 * inv_area);
            let color = Color::from_premul(
                v0.color.r * l0 + v1.color.r * l1 + v2.color.r * l2,
                v0.color.g * l0 + v1.color.g * l1 + v2.color.g * l2,
                v0.color.b * l0 + v1.color.b * l1 + v2.color.b * l2,
                v0.color.a * l0 + v1.color.a * l1 + v2.color.a * l2,
            );
            let uv = v0.tex_coords * l0 + v1.tex_coords * l1 + v2.tex_coords * l2;

            blend_pixel(dst, x, y, sampler.shade(color, uv), blend);
        }
    }
}

/// Draws a one pixel wide segment; the end point is excluded.
pub(super) fn draw_line(dst: &mut RgbaImage, seg: [Vertex; 2], sampler: Sampler<'_>, blend: BlendMode) {
    let [a, b] = seg;
    let d = b.position - a.position;
    let steps = d.x.abs().max(d.y.abs()).ceil();
    if steps < 1.0 || !steps.is_finite() {
        return;
    }

    let n = steps as u32;
    for i in 0..n {
        let t = i as f32 / steps;
        let color = Color::from_premul(
            a.color.r + (b.color.r - a.color.r) * t,
            a.color.g + (b.color.g - a.color.g) * t,
            a.color.b + (b.color.b - a.color.b) * t,
            a.color.a + (b.color.a - a.color.a) * t,
        );
        let uv = a.tex_coords + (b.tex_coords - a.tex_coords) * t;
        plot(dst, a.position + d * t, sampler.shade(color, uv), blend);
    }
}

pub(super) fn draw_point(dst: &mut RgbaImage, v: Vertex, sampler: Sampler<'_>, blend: BlendMode) {
    plot(dst, v.position, sampler.shade(v.color, v.tex_coords), blend);
}

#[inline]
fn plot(dst: &mut RgbaImage, p: Vec2, color: Color, blend: BlendMode) {
    if !p.is_finite() || p.x < 0.0 || p.y < 0.0 {
        return;
    }
    let (x, y) = (p.x.floor() as u32, p.y.floor() as u32);
    if x < dst.width() && y < dst.height() {
        blend_pixel(dst, x, y, color, blend);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white(x: f32, y: f32) -> Vertex {
        Vertex::colored(Vec2::new(x, y), Color::WHITE)
    }

    fn covered(img: &RgbaImage) -> usize {
        img.pixels().filter(|p| p.0[3] > 0).count()
    }

    const NO_TEX: Sampler<'static> = Sampler { texture: None };

    #[test]
    fn quad_from_two_triangles_covers_each_pixel_once() {
        let mut img = RgbaImage::new(8, 8);
        let half = Color::from_premul(0.5, 0.5, 0.5, 0.5);
        let v = |x, y| Vertex::colored(Vec2::new(x, y), half);

        fill_triangle(&mut img, [v(1.0, 1.0), v(5.0, 1.0), v(5.0, 5.0)], NO_TEX, BlendMode::Alpha);
        fill_triangle(&mut img, [v(1.0, 1.0), v(5.0, 5.0), v(1.0, 5.0)], NO_TEX, BlendMode::Alpha);

        assert_eq!(covered(&img), 16);
        // A double-covered diagonal pixel would read 192, not 128.
        assert!(img.pixels().all(|p| p.0[3] == 0 || p.0[3] == 128));
    }

    #[test]
    fn winding_does_not_matter() {
        let mut cw = RgbaImage::new(8, 8);
        let mut ccw = RgbaImage::new(8, 8);
        fill_triangle(&mut cw, [white(0.0, 0.0), white(6.0, 0.0), white(0.0, 6.0)], NO_TEX, BlendMode::Alpha);
        fill_triangle(&mut ccw, [white(0.0, 0.0), white(0.0, 6.0), white(6.0, 0.0)], NO_TEX, BlendMode::Alpha);
        assert_eq!(cw, ccw);
        assert!(covered(&cw) > 0);
    }

    #[test]
    fn offscreen_triangle_is_clipped() {
        let mut img = RgbaImage::new(4, 4);
        fill_triangle(&mut img, [white(-10.0, -10.0), white(-5.0, -10.0), white(-5.0, -5.0)], NO_TEX, BlendMode::Alpha);
        assert_eq!(covered(&img), 0);
    }

    #[test]
    fn texture_is_sampled_at_nearest_texel() {
        let mut tex = RgbaImage::new(2, 1);
        tex.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        tex.put_pixel(1, 0, image::Rgba([0, 0, 255, 255]));
        let sampler = Sampler { texture: Some(&tex) };

        let mut img = RgbaImage::new(2, 1);
        let v = |x: f32, y: f32, u: f32| Vertex::new(Vec2::new(x, y), Color::WHITE, Vec2::new(u, y));
        fill_triangle(&mut img, [v(0.0, 0.0, 0.0), v(2.0, 0.0, 2.0), v(2.0, 1.0, 2.0)], sampler, BlendMode::None);
        fill_triangle(&mut img, [v(0.0, 0.0, 0.0), v(2.0, 1.0, 2.0), v(0.0, 1.0, 0.0)], sampler, BlendMode::None);

        assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(1, 0).0, [0, 0, 255, 255]);
    }

    #[test]
    fn horizontal_line_excludes_end_point() {
        let mut img = RgbaImage::new(8, 2);
        draw_line(&mut img, [white(1.0, 0.5), white(5.0, 0.5)], NO_TEX, BlendMode::Alpha);
        assert_eq!(covered(&img), 4);
        assert_eq!(img.get_pixel(5, 0).0[3], 0);
    }

    #[test]
    fn additive_blend_saturates() {
        let mut img = RgbaImage::new(1, 1);
        draw_point(&mut img, white(0.2, 0.2), NO_TEX, BlendMode::Add);
        draw_point(&mut img, white(0.2, 0.2), NO_TEX, BlendMode::Add);
        assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);
    }
}
