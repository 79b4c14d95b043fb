use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use fieldmap_core::error::{FieldmapError, Result};
use fieldmap_core::models::BoundingBox;
use image::{ImageFormat, RgbaImage};

/// A masked raster ready to be placed on the map over its bounding box
#[derive(Debug, Clone, PartialEq)]
pub struct ClippedRaster {
    image: RgbaImage,
    bbox: BoundingBox,
}

impl ClippedRaster {
    pub fn new(image: RgbaImage, bbox: BoundingBox) -> Self {
        Self { image, bbox }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Pixels with any opacity left after masking
    pub fn visible_pixels(&self) -> usize {
        self.image.pixels().filter(|p| p.0[3] > 0).count()
    }

    /// Encode as PNG, keeping the alpha channel
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| FieldmapError::Serialization(format!("PNG encoding failed: {}", e)))?;
        Ok(bytes)
    }

    /// `data:image/png;base64,...` handle for an image source
    pub fn to_data_url(&self) -> Result<String> {
        Ok(format!("data:image/png;base64,{}", STANDARD.encode(self.to_png()?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_png_keeps_transparency() {
        let mut image = RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 255]));
        image.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        let raster = ClippedRaster::new(image.clone(), BoundingBox::new(0.0, 1.0, 0.0, 1.0));

        let png = raster.to_png().unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded, image);
        assert_eq!(raster.visible_pixels(), 5);
    }

    #[test]
    fn test_data_url_prefix() {
        let raster = ClippedRaster::new(
            RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 0])),
            BoundingBox::new(0.0, 1.0, 0.0, 1.0),
        );
        let url = raster.to_data_url().unwrap();
        assert!(url.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }
}
