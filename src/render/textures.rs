//! Texture atlases and the per-code offset tables.
//!
//! An atlas is a single immutable CPU pixmap. Walls, floor/ceiling variants
//! and sprite frames are addressed purely by pixel-origin offsets into it
//! plus the shared tile size from the render options; there is no other
//! metadata. When no asset file is available, procedurally generated
//! pixmaps stand in.

use std::collections::HashMap;
use std::fmt;

use raylib::prelude::*;

use crate::error::EngineError;

/// Which atlas a failure is reported against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtlasKind {
    Wall,
    FloorCeiling,
    Sprite,
    Sky,
}

impl fmt::Display for AtlasKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AtlasKind::Wall => "wall",
            AtlasKind::FloorCeiling => "floor/ceiling",
            AtlasKind::Sprite => "sprite",
            AtlasKind::Sky => "sky",
        };
        f.write_str(name)
    }
}

/// Immutable CPU pixmap sampled per pixel.
#[derive(Clone)]
pub struct TextureAtlas {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl TextureAtlas {
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> Self {
        debug_assert_eq!(pixels.len(), (width * height) as usize);
        Self { width, height, pixels }
    }

    /// Builds an atlas from a loaded raylib image.
    pub fn from_image(img: &Image) -> Self {
        let w = img.width().max(1) as u32;
        let h = img.height().max(1) as u32;
        Self::from_pixels(w, h, img.get_image_data().to_vec())
    }

    /// Checkerboard fallback used when no asset file is present.
    pub fn checker(width: u32, height: u32, base: Color) -> Self {
        let mut px = vec![base; (width * height) as usize];
        let cell = 8u32;
        for y in 0..height {
            for x in 0..width {
                if ((x / cell) + (y / cell)) % 2 == 0 {
                    let i = (y * width + x) as usize;
                    px[i] = mix(px[i], Color::WHITE, 24);
                }
            }
        }
        Self::from_pixels(width, height, px)
    }

    pub fn solid(width: u32, height: u32, color: Color) -> Self {
        Self::from_pixels(width, height, vec![color; (width * height) as usize])
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.width > 0 && self.height > 0 && self.pixels.len() == (self.width * self.height) as usize
    }

    /// Samples a pixel; coordinates wrap at the atlas edges.
    #[inline]
    pub fn sample(&self, x: u32, y: u32) -> Color {
        let xi = (x % self.width) as usize;
        let yi = (y % self.height) as usize;
        self.pixels[yi * self.width as usize + xi]
    }

    /// Readiness check raised as an engine error naming the atlas.
    pub fn ensure_ready(&self, kind: AtlasKind) -> Result<(), EngineError> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(EngineError::AtlasNotReady { kind })
        }
    }
}

impl Default for TextureAtlas {
    fn default() -> Self {
        Self::checker(64, 64, Color::new(120, 120, 130, 255))
    }
}

impl fmt::Debug for TextureAtlas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextureAtlas")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

fn mix(a: Color, b: Color, t: u8) -> Color {
    let t = t as u32;
    let ch = |x: u8, y: u8| (((x as u32) * (255 - t) + (y as u32) * t) / 255) as u8;
    Color::new(ch(a.r, b.r), ch(a.g, b.g), ch(a.b, b.b), 255)
}

/// Wall code to atlas pixel origin.
pub type WallMapping = HashMap<i32, (u32, u32)>;

/// Atlas pixel origins for one floor/ceiling variant.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloorCeilingOffsets {
    pub floor: (u32, u32),
    pub ceiling: (u32, u32),
}

/// Floor/ceiling variant code to atlas pixel origins.
pub type FloorCeilingMapping = HashMap<i32, FloorCeilingOffsets>;
