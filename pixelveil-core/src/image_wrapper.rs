use crate::error::{Error, Result};
use crate::macros::*;
use crate::utilities::file_utils;

use image::{ColorType, ImageFormat};

/// The byte offset of the blue channel within a pixel.
const BLUE_CHANNEL: usize = 2;

/// An in-memory pixel grid, wrapping the decoded bytes of an image file.
///
/// The codec only ever touches pixel data through this type, so the
/// image-decoding library never leaks into the codec itself.
#[derive(Clone, Debug)]
pub struct ImageWrapper {
    image_bytes: Vec<u8>,
    /// A boolean indicating whether modifications to the image should be permitted.
    read_only: bool,
    /// The dimensions of the image.
    dimensions: (u32, u32),
    /// The underlying pixel colour type of the image.
    colour_type: ColorType,
}

impl ImageWrapper {
    /// Build a wrapper directly from raw RGB pixel data.
    ///
    /// # Arguments
    ///
    /// * `width` - The width of the grid, in pixels.
    /// * `height` - The height of the grid, in pixels.
    /// * `pixels` - The interleaved RGB bytes, three per pixel.
    ///
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> ImageWrapper {
        assert_eq!(
            pixels.len(),
            width as usize * height as usize * 3,
            "pixel buffer length does not match the image dimensions"
        );

        ImageWrapper {
            image_bytes: pixels,
            read_only: false,
            dimensions: (width, height),
            colour_type: ColorType::Rgb8,
        }
    }

    /// Return the image's dimensions.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }

    /// The width of the image, in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.dimensions.0
    }

    /// The height of the image, in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.dimensions.1
    }

    /// The raw channel bytes of the image.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.image_bytes
    }

    /// Read the blue channel byte of the pixel at (x, y).
    ///
    /// `Note:` out-of-bounds coordinates are a programmer error and will panic.
    ///
    #[inline]
    pub fn get_blue(&self, x: u32, y: u32) -> u8 {
        self.image_bytes[self.pixel_index(x, y) + BLUE_CHANNEL]
    }

    /// Write the blue channel byte of the pixel at (x, y).
    ///
    /// `Note:` out-of-bounds coordinates are a programmer error and will panic.
    ///
    #[inline]
    pub fn set_blue(&mut self, x: u32, y: u32, value: u8) {
        assert!(!self.read_only, "attempted to modify a read-only image");

        let index = self.pixel_index(x, y) + BLUE_CHANNEL;
        self.image_bytes[index] = value;
    }

    /// Compute the byte index of the first channel of the pixel at (x, y).
    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        let (w, h) = self.dimensions;
        assert!(x < w && y < h, "pixel coordinate out of bounds");

        (y as usize * w as usize + x as usize) * self.bytes_per_pixel()
    }

    /// The number of channel bytes that make up a single pixel.
    #[inline]
    fn bytes_per_pixel(&self) -> usize {
        match self.colour_type {
            ColorType::Rgb8 => 3,
            ColorType::Rgba8 => 4,
            // Only these two colour types are ever constructed.
            _ => unreachable!("unsupported colour type"),
        }
    }

    /// Attempt to load an image from a file.
    ///
    /// # Arguments
    ///
    /// * `file_path` - The path to the image file.
    /// * `read_only` - Whether modifications to the image should be rejected.
    ///
    pub fn load_from_file(file_path: &str, read_only: bool) -> Result<ImageWrapper> {
        use image::{DynamicImage::*, GenericImageView};

        if !file_utils::path_exists(file_path) {
            return Err(Error::PathInvalid);
        }

        let image = unwrap_or_return_err!(image::open(file_path), Error::ImageOpening);
        let dimensions = image.dimensions();

        // 8-bit RGB(A) images are used as-is. Anything else is expanded to
        // RGBA so that every pixel has an addressable blue byte.
        let (colour_type, image_bytes) = match image {
            ImageRgb8(img) => (ColorType::Rgb8, img.into_raw()),
            ImageRgba8(img) => (ColorType::Rgba8, img.into_raw()),
            other => (ColorType::Rgba8, other.to_rgba8().into_raw()),
        };

        Ok(ImageWrapper {
            image_bytes,
            read_only,
            dimensions,
            colour_type,
        })
    }

    /// Save the pixel buffer to a file at the specified path.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to which the file should be saved.
    ///
    /// `Note:` the output is always written as a PNG, regardless of the
    /// extension, since any lossy format would destroy the encoded data.
    ///
    pub fn save_lossless(&self, path: &str) -> Result<()> {
        assert!(!self.read_only, "attempted to write a read-only image");

        let (w, h) = self.dimensions;
        match image::save_buffer_with_format(
            path,
            &self.image_bytes,
            w,
            h,
            self.colour_type,
            ImageFormat::Png,
        ) {
            Ok(_) => Ok(()),
            Err(e) => Err(Error::ImageSaving(e.to_string())),
        }
    }
}
