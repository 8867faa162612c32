/// Software framebuffer and half-block terminal presentation
use crossterm::{
    cursor,
    style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use meshview_core::{Color, Rect, Surface, TexCoord, Texture, Viewport};
use nalgebra::Point2;
use std::io::Write;
use std::path::Path;

/// Upper half block: foreground paints the top pixel, background the bottom
const HALF_BLOCK: char = '▀';

/// RGB pixel buffer that the frame renderer draws into
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
    background: Color,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; width * height],
            background: Color::BLACK,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> Color {
        self.pixels[y * self.width + x]
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.pixels[y as usize * self.width + x as usize] = color;
        }
    }

    /// Pixel bounding box of a triangle, clipped to the buffer
    fn clipped_box(&self, v: &[Point2<f32>; 3]) -> (i32, i32, i32, i32) {
        let min_x = v[0].x.min(v[1].x).min(v[2].x).floor().max(0.0) as i32;
        let max_x = v[0].x.max(v[1].x).max(v[2].x).ceil().min(self.width as f32 - 1.0) as i32;
        let min_y = v[0].y.min(v[1].y).min(v[2].y).floor().max(0.0) as i32;
        let max_y = v[0].y.max(v[1].y).max(v[2].y).ceil().min(self.height as f32 - 1.0) as i32;
        (min_x, max_x, min_y, max_y)
    }

    /// Fill a triangle, asking `shade` for each covered pixel's color given
    /// its barycentric weights
    fn rasterize_triangle(
        &mut self,
        v: [Point2<f32>; 3],
        mut shade: impl FnMut(f32, f32, f32) -> Color,
    ) {
        let (min_x, max_x, min_y, max_y) = self.clipped_box(&v);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = Point2::new(x as f32 + 0.5, y as f32 + 0.5);
                if let Some((w0, w1, w2)) = barycentric(v[0], v[1], v[2], p) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let color = shade(w0, w1, w2);
                        self.set_pixel(x, y, color);
                    }
                }
            }
        }
    }

    /// Stamp a `width`-pixel square centered on a point
    fn stamp(&mut self, x: i32, y: i32, width: u32, color: Color) {
        let width = width.max(1) as i32;
        let offset = width / 2;
        for dy in 0..width {
            for dx in 0..width {
                self.set_pixel(x.saturating_add(dx - offset), y.saturating_add(dy - offset), color);
            }
        }
    }

    pub fn to_image(&self) -> image::RgbImage {
        let mut image = image::RgbImage::new(self.width as u32, self.height as u32);
        for (x, y, pixel) in image.enumerate_pixels_mut() {
            let c = self.pixel(x as usize, y as usize);
            *pixel = image::Rgb([c.r, c.g, c.b]);
        }
        image
    }

    pub fn save_png(&self, path: &Path) -> image::ImageResult<()> {
        self.to_image().save(path)
    }

    /// The color of one terminal half-cell: the pixel in the box that stands
    /// out most from the background, so thin lines survive downsampling
    fn sample_box(&self, x0: usize, x1: usize, y0: usize, y1: usize) -> Color {
        let mut best = self.background;
        let mut best_distance = 0;
        for y in y0..y1.max(y0 + 1).min(self.height) {
            for x in x0..x1.max(x0 + 1).min(self.width) {
                let color = self.pixel(x, y);
                let distance = color.distance_sq(self.background);
                if distance > best_distance {
                    best = color;
                    best_distance = distance;
                }
            }
        }
        best
    }

    /// Write the buffer to a `columns` x `rows` terminal area, two pixels
    /// per cell
    pub fn present<W: Write>(
        &self,
        writer: &mut W,
        columns: u16,
        rows: u16,
    ) -> std::io::Result<()> {
        let columns = columns.max(1) as usize;
        let half_rows = rows.max(1) as usize * 2;
        let y = |half_row: usize| half_row * self.height / half_rows;

        for row in 0..rows as usize {
            writer.queue(cursor::MoveTo(0, row as u16))?;
            let mut last: Option<(Color, Color)> = None;
            for column in 0..columns {
                let x0 = column * self.width / columns;
                let x1 = (column + 1) * self.width / columns;
                let top = self.sample_box(x0, x1, y(row * 2), y(row * 2 + 1));
                let bottom = self.sample_box(x0, x1, y(row * 2 + 1), y(row * 2 + 2));

                if last != Some((top, bottom)) {
                    writer.queue(SetForegroundColor(term_color(top)))?;
                    writer.queue(SetBackgroundColor(term_color(bottom)))?;
                    last = Some((top, bottom));
                }
                writer.queue(Print(HALF_BLOCK))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn term_color(color: Color) -> TermColor {
    TermColor::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

fn to_f32(p: Point2<i32>) -> Point2<f32> {
    Point2::new(p.x as f32, p.y as f32)
}

impl Surface for Framebuffer {
    fn size(&self) -> Viewport {
        Viewport::new(self.width as u32, self.height as u32)
    }

    fn clear(&mut self, color: Color) {
        self.background = color;
        self.pixels.fill(color);
    }

    fn fill_polygon(&mut self, points: &[Point2<i32>], color: Color) {
        // Convex polygons only: fan out from the first vertex
        for i in 1..points.len().saturating_sub(1) {
            let triangle = [to_f32(points[0]), to_f32(points[i]), to_f32(points[i + 1])];
            self.rasterize_triangle(triangle, |_, _, _| color);
        }
    }

    fn fill_textured_polygon(
        &mut self,
        points: &[Point2<i32>],
        uvs: &[TexCoord],
        texture: &Texture,
    ) {
        if uvs.len() != points.len() {
            if let Some(rect) = Rect::clipped_bounds(points, self.size()) {
                self.blit_image(rect, texture);
            }
            return;
        }
        for i in 1..points.len().saturating_sub(1) {
            let triangle = [to_f32(points[0]), to_f32(points[i]), to_f32(points[i + 1])];
            let (a, b, c) = (uvs[0], uvs[i], uvs[i + 1]);
            self.rasterize_triangle(triangle, |w0, w1, w2| {
                let uv = TexCoord::new(
                    w0 * a.x + w1 * b.x + w2 * c.x,
                    w0 * a.y + w1 * b.y + w2 * c.y,
                );
                texture.sample(uv)
            });
        }
    }

    fn draw_line(&mut self, start: Point2<i32>, end: Point2<i32>, color: Color, width: u32) {
        let margin = width as f64;
        let bounds = (
            -margin,
            -margin,
            self.width as f64 + margin,
            self.height as f64 + margin,
        );
        let Some((a, b)) = clip_line(start.cast(), end.cast(), bounds) else {
            return;
        };

        // Bresenham
        let (mut x0, mut y0) = (a.x.round() as i32, a.y.round() as i32);
        let (x1, y1) = (b.x.round() as i32, b.y.round() as i32);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.stamp(x0, y0, width, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn draw_circle(&mut self, center: Point2<i32>, radius: u32, color: Color) {
        let r = radius as i32;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.set_pixel(center.x.saturating_add(dx), center.y.saturating_add(dy), color);
                }
            }
        }
    }

    fn blit_image(&mut self, rect: Rect, texture: &Texture) {
        if texture.width == 0 || texture.height == 0 {
            return;
        }
        for py in 0..rect.height as usize {
            let ty = py * texture.height / rect.height as usize;
            for px in 0..rect.width as usize {
                let tx = px * texture.width / rect.width as usize;
                self.set_pixel(rect.x + px as i32, rect.y + py as i32, texture.pixel(tx, ty));
            }
        }
    }
}

/// Liang-Barsky clipping of a segment to `(min_x, min_y, max_x, max_y)`.
/// Runs in f64 so saturated far-away endpoints clip without drift.
fn clip_line(
    a: Point2<f64>,
    b: Point2<f64>,
    bounds: (f64, f64, f64, f64),
) -> Option<(Point2<f64>, Point2<f64>)> {
    let (min_x, min_y, max_x, max_y) = bounds;
    let d = b - a;
    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;
    for (p, q) in [
        (-d.x, a.x - min_x),
        (d.x, max_x - a.x),
        (-d.y, a.y - min_y),
        (d.y, max_y - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let t = q / p;
            if p < 0.0 {
                t0 = t0.max(t);
            } else {
                t1 = t1.min(t);
            }
            if t0 > t1 {
                return None;
            }
        }
    }
    Some((a + d * t0, a + d * t1))
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: Point2<f32>,
    v1: Point2<f32>,
    v2: Point2<f32>,
    p: Point2<f32>,
) -> Option<(f32, f32, f32)> {
    let denom = (v1.y - v2.y) * (v0.x - v2.x) + (v2.x - v1.x) * (v0.y - v2.y);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.y - v2.y) * (p.x - v2.x) + (v2.x - v1.x) * (p.y - v2.y)) / denom;
    let w1 = ((v2.y - v0.y) * (p.x - v2.x) + (v0.x - v2.x) * (p.y - v2.y)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(fb: &Framebuffer, color: Color) -> usize {
        fb.pixels.iter().filter(|&&c| c == color).count()
    }

    #[test]
    fn test_fill_polygon_either_winding() {
        let mut fb = Framebuffer::new(20, 20);
        let square = [
            Point2::new(2, 2),
            Point2::new(12, 2),
            Point2::new(12, 12),
            Point2::new(2, 12),
        ];
        fb.fill_polygon(&square, Color::GREEN);
        let clockwise = count(&fb, Color::GREEN);
        assert!(clockwise >= 100);

        let mut fb = Framebuffer::new(20, 20);
        let reversed: Vec<_> = square.iter().rev().copied().collect();
        fb.fill_polygon(&reversed, Color::GREEN);
        assert!(count(&fb, Color::GREEN) >= 100);
        assert_eq!(fb.pixel(7, 7), Color::GREEN);
        assert_eq!(fb.pixel(15, 15), Color::BLACK);
    }

    #[test]
    fn test_line_and_clipping() {
        let mut fb = Framebuffer::new(10, 10);
        fb.draw_line(Point2::new(0, 5), Point2::new(9, 5), Color::WHITE, 1);
        assert_eq!(count(&fb, Color::WHITE), 10);

        // far off-screen endpoints are clipped instead of walked
        let mut fb = Framebuffer::new(10, 10);
        let (left, right) = (Point2::new(-1_000_000_000, 3), Point2::new(1_000_000_000, 3));
        fb.draw_line(left, right, Color::WHITE, 1);
        assert_eq!(count(&fb, Color::WHITE), 10);

        let mut fb = Framebuffer::new(10, 10);
        fb.draw_line(Point2::new(-50, -50), Point2::new(-20, -40), Color::WHITE, 2);
        assert_eq!(count(&fb, Color::WHITE), 0);
    }

    #[test]
    fn test_circle() {
        let mut fb = Framebuffer::new(10, 10);
        fb.draw_circle(Point2::new(5, 5), 1, Color::RED);
        assert_eq!(count(&fb, Color::RED), 5);
    }

    #[test]
    fn test_saturated_coordinates_draw_nothing() {
        let mut fb = Framebuffer::new(10, 10);
        let far = Point2::new(i32::MAX, i32::MIN);
        fb.draw_circle(far, 3, Color::RED);
        fb.draw_line(far, Point2::new(i32::MAX, i32::MAX), Color::RED, 2);
        assert_eq!(count(&fb, Color::RED), 0);
    }

    #[test]
    fn test_blit_and_textured_fill() {
        let texture = Texture::new(2, 1, vec![Color::RED, Color::BLUE]);
        let mut fb = Framebuffer::new(10, 10);
        fb.blit_image(Rect { x: 0, y: 0, width: 4, height: 2 }, &texture);
        assert_eq!(fb.pixel(0, 0), Color::RED);
        assert_eq!(fb.pixel(3, 1), Color::BLUE);
        assert_eq!(fb.pixel(4, 0), Color::BLACK);

        let mut fb = Framebuffer::new(10, 10);
        let points = [Point2::new(0, 0), Point2::new(9, 0), Point2::new(9, 9), Point2::new(0, 9)];
        let uvs = [
            TexCoord::new(0.0, 1.0),
            TexCoord::new(1.0, 1.0),
            TexCoord::new(1.0, 0.0),
            TexCoord::new(0.0, 0.0),
        ];
        fb.fill_textured_polygon(&points, &uvs, &texture);
        assert_eq!(fb.pixel(1, 4), Color::RED);
        assert_eq!(fb.pixel(8, 4), Color::BLUE);
    }

    #[test]
    fn test_present_keeps_thin_lines() {
        let mut fb = Framebuffer::new(40, 40);
        fb.clear(Color::BLACK);
        fb.draw_line(Point2::new(0, 13), Point2::new(39, 13), Color::YELLOW, 1);
        assert_eq!(fb.sample_box(0, 10, 10, 20), Color::YELLOW);
        assert_eq!(fb.sample_box(0, 10, 20, 30), Color::BLACK);

        let mut out = Vec::new();
        fb.present(&mut out, 4, 2).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches(HALF_BLOCK).count(), 8);
    }

    #[test]
    fn test_snapshot_image_matches_buffer() {
        let mut fb = Framebuffer::new(3, 2);
        fb.clear(Color::GRAY);
        fb.draw_circle(Point2::new(0, 0), 0, Color::CYAN);
        let image = fb.to_image();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(0, 0).0, [0, 255, 255]);
        assert_eq!(image.get_pixel(2, 1).0, [100, 100, 100]);
    }
}
