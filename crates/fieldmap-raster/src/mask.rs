//! Geographic to pixel mapping and the polygon pixel mask.
//!
//! The mask depends only on the boundary, the bounding box and the canvas
//! size. Real imagery and synthetic gradients are cut with the same mask,
//! so switching between them never moves the visible overlay.

use fieldmap_core::models::{Boundary, BoundingBox, GeoPoint};
use image::{Rgba, RgbaImage};

/// Affine map from the bounding box onto a `width` x `height` canvas.
///
/// Rows grow downward while latitude grows northward, so the vertical axis
/// is flipped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelMapper {
    bbox: BoundingBox,
    width: u32,
    height: u32,
}

impl PixelMapper {
    pub fn new(bbox: BoundingBox, width: u32, height: u32) -> Self {
        Self { bbox, width, height }
    }

    /// Continuous pixel coordinates of a point; (0, 0) is the top-left corner
    pub fn to_pixel(&self, point: &GeoPoint) -> (f64, f64) {
        let x = (point.lng - self.bbox.min_lng) / self.bbox.span_lng() * self.width as f64;
        let y = (self.bbox.max_lat - point.lat) / self.bbox.span_lat() * self.height as f64;
        (x, y)
    }

    /// Inverse of [`PixelMapper::to_pixel`]
    pub fn to_geo(&self, x: f64, y: f64) -> GeoPoint {
        let lng = self.bbox.min_lng + x / self.width.max(1) as f64 * self.bbox.span_lng();
        let lat = self.bbox.max_lat - y / self.height.max(1) as f64 * self.bbox.span_lat();
        GeoPoint::new(lat, lng)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Which pixels of a canvas fall inside a boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolygonMask {
    width: u32,
    height: u32,
    inside: Vec<bool>,
}

impl PolygonMask {
    /// Rasterize `boundary` onto a canvas covering `bbox`.
    ///
    /// Even-odd scanline fill sampled at pixel centres. Edges are treated as
    /// half-open in y, so a vertex lying exactly on a scanline is counted once.
    pub fn new(boundary: &Boundary, bbox: &BoundingBox, width: u32, height: u32) -> Self {
        let mapper = PixelMapper::new(*bbox, width, height);
        let vertices: Vec<(f64, f64)> =
            boundary.points().iter().map(|p| mapper.to_pixel(p)).collect();
        let n = vertices.len();
        let w = width as usize;

        let mut inside = vec![false; w * height as usize];
        let mut crossings: Vec<f64> = Vec::with_capacity(n);

        for row in 0..height as usize {
            let y = row as f64 + 0.5;
            crossings.clear();
            for i in 0..n {
                let (x0, y0) = vertices[i];
                let (x1, y1) = vertices[(i + 1) % n];
                if (y0 <= y) != (y1 <= y) {
                    let t = (y - y0) / (y1 - y0);
                    crossings.push(x0 + t * (x1 - x0));
                }
            }
            crossings.sort_by(|a, b| a.total_cmp(b));

            for span in crossings.chunks_exact(2) {
                // columns whose centre lies in [span[0], span[1])
                let start = (span[0] - 0.5).ceil().clamp(0.0, w as f64) as usize;
                let end = (span[1] - 0.5).ceil().clamp(0.0, w as f64) as usize;
                for cell in &mut inside[row * w + start..row * w + end.max(start)] {
                    *cell = true;
                }
            }
        }

        Self { width, height, inside }
    }

    /// Mask sized to an existing image
    pub fn for_image(boundary: &Boundary, bbox: &BoundingBox, image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self::new(boundary, bbox, width, height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// False for pixels outside the polygon or outside the canvas
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.inside[(y * self.width + x) as usize]
    }

    /// Number of pixels inside the polygon
    pub fn covered(&self) -> usize {
        self.inside.iter().filter(|inside| **inside).count()
    }

    /// Make every pixel outside the polygon fully transparent.
    ///
    /// Pixels inside are left exactly as they were.
    pub fn apply(&self, image: &mut RgbaImage) {
        if image.dimensions() != (self.width, self.height) {
            tracing::debug!(
                mask = ?(self.width, self.height),
                image = ?image.dimensions(),
                "Mask and image sizes differ; pixels beyond the mask are cleared"
            );
        }
        for (x, y, pixel) in image.enumerate_pixels_mut() {
            if !self.contains(x, y) {
                *pixel = Rgba([0, 0, 0, 0]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_bbox() -> BoundingBox {
        BoundingBox::new(0.0, 1.0, 0.0, 1.0)
    }

    #[test]
    fn test_mapper_flips_latitude() {
        let mapper = PixelMapper::new(unit_bbox(), 100, 50);
        assert_eq!(mapper.to_pixel(&GeoPoint::new(1.0, 0.0)), (0.0, 0.0));
        assert_eq!(mapper.to_pixel(&GeoPoint::new(0.0, 1.0)), (100.0, 50.0));
        let back = mapper.to_geo(25.0, 10.0);
        assert!((back.lng - 0.25).abs() < 1e-12);
        assert!((back.lat - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_rectangle_covering_the_box_fills_everything() {
        let boundary =
            Boundary::from_lng_lat(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]).unwrap();
        let mask = PolygonMask::new(&boundary, &unit_bbox(), 8, 4);
        assert_eq!(mask.covered(), 32);
    }

    #[test]
    fn test_triangle_covers_lower_left_half() {
        // lower-left triangle in geographic terms is the bottom-left half in pixels
        let boundary = Boundary::from_lng_lat(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]).unwrap();
        let mask = PolygonMask::new(&boundary, &unit_bbox(), 10, 10);
        assert!(mask.contains(0, 9));
        assert!(!mask.contains(9, 0));
        // pixel centres strictly below the diagonal: 0 + 1 + ... + 9
        assert_eq!(mask.covered(), 45);
    }

    #[test]
    fn test_apply_clears_outside_and_keeps_inside() {
        let boundary = Boundary::from_lng_lat(&[[0.0, 0.0], [0.5, 0.0], [0.5, 1.0], [0.0, 1.0]])
            .unwrap();
        let mut image = RgbaImage::from_pixel(4, 2, Rgba([10, 20, 30, 200]));
        let mask = PolygonMask::for_image(&boundary, &unit_bbox(), &image);
        mask.apply(&mut image);

        assert_eq!(image.get_pixel(0, 0), &Rgba([10, 20, 30, 200]));
        assert_eq!(image.get_pixel(1, 1), &Rgba([10, 20, 30, 200]));
        assert_eq!(image.get_pixel(2, 0), &Rgba([0, 0, 0, 0]));
        assert_eq!(image.get_pixel(3, 1), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_out_of_canvas_lookups_are_outside() {
        let boundary =
            Boundary::from_lng_lat(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]).unwrap();
        let mask = PolygonMask::new(&boundary, &unit_bbox(), 2, 2);
        assert!(!mask.contains(2, 0));
        assert!(!mask.contains(0, 5));
    }
}
