//! Owned 8-bit raster that every engine stage consumes and produces.
//!
//! Layout is row-major with a top-left origin, one byte per channel.
//! Transforms never mutate their input; each returns a fresh buffer.

use serde::{Deserialize, Serialize};

use crate::error::BufferError;
use crate::luma::luma_u8;

/// Channel arrangement of an [`ImageBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChannelLayout {
    /// Three interleaved channels: red, green, blue.
    #[default]
    Rgb,
    /// Single luminance channel.
    Gray,
}

impl ChannelLayout {
    /// Number of bytes per pixel.
    #[inline]
    pub fn channels(self) -> usize {
        match self {
            ChannelLayout::Rgb => 3,
            ChannelLayout::Gray => 1,
        }
    }

    /// Map a raw channel count onto a layout.
    pub fn from_channels(channels: u8) -> Result<Self, BufferError> {
        match channels {
            3 => Ok(ChannelLayout::Rgb),
            1 => Ok(ChannelLayout::Gray),
            other => Err(BufferError::UnsupportedChannels(other)),
        }
    }
}

/// An 8-bit image with validated shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    layout: ChannelLayout,
    data: Vec<u8>,
}

impl ImageBuffer {
    /// Create a buffer, checking `data.len() == width * height * channels`.
    pub fn new(
        width: u32,
        height: u32,
        layout: ChannelLayout,
        data: Vec<u8>,
    ) -> Result<Self, BufferError> {
        let channels = layout.channels();
        let expected = (width as usize) * (height as usize) * channels;
        if data.len() != expected {
            return Err(BufferError::ShapeMismatch {
                width,
                height,
                channels,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    /// Create an RGB buffer.
    pub fn rgb(width: u32, height: u32, data: Vec<u8>) -> Result<Self, BufferError> {
        Self::new(width, height, ChannelLayout::Rgb, data)
    }

    /// Create a grayscale buffer.
    pub fn gray(width: u32, height: u32, data: Vec<u8>) -> Result<Self, BufferError> {
        Self::new(width, height, ChannelLayout::Gray, data)
    }

    /// An RGB buffer where every pixel has the same color.
    pub fn filled(width: u32, height: u32, color: [u8; 3]) -> Self {
        let count = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(count * 3);
        for _ in 0..count {
            data.extend_from_slice(&color);
        }
        Self {
            width,
            height,
            layout: ChannelLayout::Rgb,
            data,
        }
    }

    /// Build an RGB buffer by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 3]) -> Self {
        let mut data = Vec::with_capacity((width as usize) * (height as usize) * 3);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self {
            width,
            height,
            layout: ChannelLayout::Rgb,
            data,
        }
    }

    /// Wrap data that is known to match this buffer's shape.
    pub(crate) fn with_data(&self, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), self.data.len(), "Pixel buffer size mismatch");
        Self {
            width: self.width,
            height: self.height,
            layout: self.layout,
            data,
        }
    }

    /// Wrap RGB data for a known size.
    pub(crate) fn rgb_unchecked(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), (width as usize) * (height as usize) * 3);
        Self {
            width,
            height,
            layout: ChannelLayout::Rgb,
            data,
        }
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Channel layout.
    #[inline]
    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    /// Bytes per pixel.
    #[inline]
    pub fn channels(&self) -> usize {
        self.layout.channels()
    }

    /// Raw pixel bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer and return its bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// True when the image has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Channel values of the pixel at `(x, y)`.
    ///
    /// # Panics
    /// Panics if the coordinate is outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let c = self.channels();
        let idx = ((y as usize) * (self.width as usize) + x as usize) * c;
        &self.data[idx..idx + c]
    }

    /// Return an RGB version of this buffer, replicating gray into all channels.
    pub fn to_rgb(&self) -> ImageBuffer {
        match self.layout {
            ChannelLayout::Rgb => self.clone(),
            ChannelLayout::Gray => {
                let mut data = Vec::with_capacity(self.data.len() * 3);
                for &v in &self.data {
                    data.extend_from_slice(&[v, v, v]);
                }
                Self::rgb_unchecked(self.width, self.height, data)
            }
        }
    }

    /// Return a grayscale version using BT.601 luma.
    pub fn to_gray(&self) -> ImageBuffer {
        match self.layout {
            ChannelLayout::Gray => self.clone(),
            ChannelLayout::Rgb => {
                let data = self
                    .data
                    .chunks_exact(3)
                    .map(|px| luma_u8(px[0], px[1], px[2]))
                    .collect();
                Self {
                    width: self.width,
                    height: self.height,
                    layout: ChannelLayout::Gray,
                    data,
                }
            }
        }
    }

    /// Convert any codec color mode (RGBA, 16-bit, gray+alpha, ...) to RGB.
    pub fn from_dynamic(img: image::DynamicImage) -> Self {
        Self::from_rgb_image(img.into_rgb8())
    }

    /// Create a buffer from an `image::RgbImage`.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self::rgb_unchecked(width, height, img.into_raw())
    }

    /// Convert to an `image::RgbImage` for codec hand-off.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        let rgb = self.to_rgb();
        image::RgbImage::from_raw(rgb.width, rgb.height, rgb.data)
    }
}
