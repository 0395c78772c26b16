//! Pixel and raster types passed between pipeline stages.

use image::{DynamicImage, ImageBuffer, Rgba, RgbaImage};

use super::color::Rgb;

/// A 16-bit RGBA image buffer, as produced by `image`'s `to_rgba16`.
pub type Rgba16Image = ImageBuffer<Rgba<u16>, Vec<u16>>;

/// One RGBA sample with every channel on the 16-bit scale `[0, 65535]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pixel {
    pub r: u16,
    pub g: u16,
    pub b: u16,
    pub a: u16,
}

impl Pixel {
    pub const fn new(r: u16, g: u16, b: u16, a: u16) -> Self {
        Self { r, g, b, a }
    }

    /// Widen 8-bit channels to the 16-bit scale (`v * 257`), fully opaque.
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba8(r, g, b, 255)
    }

    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as u16 * 257,
            g: g as u16 * 257,
            b: b as u16 * 257,
            a: a as u16 * 257,
        }
    }

    /// Narrow to 8-bit channels by dropping the low byte.
    pub const fn to_rgba8(self) -> [u8; 4] {
        [
            (self.r >> 8) as u8,
            (self.g >> 8) as u8,
            (self.b >> 8) as u8,
            (self.a >> 8) as u8,
        ]
    }

    /// The 8-bit display color of this pixel (alpha dropped).
    pub const fn rgb8(self) -> Rgb {
        let [r, g, b, _] = self.to_rgba8();
        Rgb::new(r, g, b)
    }
}

impl From<Rgb> for Pixel {
    fn from(c: Rgb) -> Self {
        Pixel::from_rgb8(c.r, c.g, c.b)
    }
}

/// A width x height grid of pixels, origin top-left, row-major.
///
/// Stages never mutate a raster they receive; they build a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
}

impl Raster {
    /// Create a raster where every pixel is `fill`.
    pub fn filled(width: u32, height: u32, fill: Pixel) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; width as usize * height as usize],
        }
    }

    /// Build a raster by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Pixel) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Wrap an existing pixel buffer. Returns `None` if the buffer length
    /// does not match `width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Pixel>) -> Option<Self> {
        if pixels.len() != width as usize * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or `None` when out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y as usize * self.width as usize + x as usize])
    }

    /// Build a new raster by mapping every pixel.
    pub fn map(&self, f: impl FnMut(&Pixel) -> Pixel) -> Raster {
        Raster {
            width: self.width,
            height: self.height,
            pixels: self.pixels.iter().map(f).collect(),
        }
    }

    /// Combine two rasters of identical size pixel by pixel.
    ///
    /// Pixels of `other` outside its bounds are treated as transparent black.
    pub fn zip_map(&self, other: &Raster, mut f: impl FnMut(&Pixel, &Pixel) -> Pixel) -> Raster {
        Raster::from_fn(self.width, self.height, |x, y| {
            let base = self.pixels[y as usize * self.width as usize + x as usize];
            let over = other.get(x, y).unwrap_or_default();
            f(&base, &over)
        })
    }

    pub fn from_rgba16_image(img: &Rgba16Image) -> Self {
        let pixels = img
            .pixels()
            .map(|p| Pixel::new(p[0], p[1], p[2], p[3]))
            .collect();
        Self {
            width: img.width(),
            height: img.height(),
            pixels,
        }
    }

    pub fn from_dynamic(img: &DynamicImage) -> Self {
        Self::from_rgba16_image(&img.to_rgba16())
    }

    pub fn to_rgba16_image(&self) -> Rgba16Image {
        let data = self
            .pixels
            .iter()
            .flat_map(|p| [p.r, p.g, p.b, p.a])
            .collect();
        // The buffer length is width * height * 4 by construction.
        ImageBuffer::from_raw(self.width, self.height, data)
            .unwrap_or_else(|| ImageBuffer::new(self.width, self.height))
    }

    pub fn to_rgba8_image(&self) -> RgbaImage {
        let data = self.pixels.iter().flat_map(|p| p.to_rgba8()).collect();
        ImageBuffer::from_raw(self.width, self.height, data)
            .unwrap_or_else(|| ImageBuffer::new(self.width, self.height))
    }
}
