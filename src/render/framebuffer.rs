use raylib::core::texture::RaylibTexture2D;
use raylib::prelude::*;

pub struct Framebuffer {
    pub color_buffer: Vec<Color>,
    pub width: u32,
    pub height: u32,
    pub background_color: Color,
    pub current_color: Color,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width * height) as usize;
        let bg = Color::BLACK;
        Self {
            color_buffer: vec![bg; size],
            width,
            height,
            background_color: bg,
            current_color: Color::WHITE,
        }
    }

    /// Reallocates the buffer; contents reset to the background color.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.color_buffer = vec![self.background_color; (width * height) as usize];
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn clear(&mut self) {
        self.color_buffer.fill(self.background_color);
    }

    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32) {
        if x < self.width && y < self.height {
            self.color_buffer[(y * self.width + x) as usize] = self.current_color;
        }
    }

    #[inline]
    pub fn set_pixel_color(&mut self, x: u32, y: u32, color: Color) {
        if x < self.width && y < self.height {
            self.color_buffer[(y * self.width + x) as usize] = color;
        }
    }

    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Color {
        if x < self.width && y < self.height {
            return self.color_buffer[(y * self.width + x) as usize];
        }
        self.background_color
    }

    #[inline]
    pub fn set_current_color(&mut self, c: Color) {
        self.current_color = c;
    }

    #[inline]
    pub fn set_background_color(&mut self, c: Color) {
        self.background_color = c;
    }

    /// Fills a rectangle with the current color, clipped to the buffer.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width as i32);
        let y1 = (y + h).min(self.height as i32);
        for py in y0..y1 {
            let row = py as u32 * self.width;
            for px in x0..x1 {
                self.color_buffer[(row + px as u32) as usize] = self.current_color;
            }
        }
    }

    /// Uploads the pixels to a persistent texture of matching dimensions.
    pub fn upload_to_texture(&self, tex: &mut Texture2D) {
        // &[Color] reinterpreted as RGBA8 bytes without copying.
        let byte_len = self.color_buffer.len() * std::mem::size_of::<Color>();
        let bytes: &[u8] = unsafe {
            std::slice::from_raw_parts(self.color_buffer.as_ptr() as *const u8, byte_len)
        };
        let _ = tex.update_texture(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_rect_clips_to_buffer() {
        let mut fb = Framebuffer::new(8, 8);
        fb.set_current_color(Color::RED);
        fb.fill_rect(-2, -2, 4, 4);
        fb.fill_rect(6, 6, 10, 10);
        assert_eq!(fb.get_pixel(0, 0), Color::RED);
        assert_eq!(fb.get_pixel(1, 1), Color::RED);
        assert_eq!(fb.get_pixel(2, 2), Color::BLACK);
        assert_eq!(fb.get_pixel(7, 7), Color::RED);
        assert_eq!(fb.get_pixel(5, 5), Color::BLACK);
    }

    #[test]
    fn resize_resets_contents() {
        let mut fb = Framebuffer::new(4, 4);
        fb.set_pixel(1, 1);
        fb.resize(16, 8);
        assert_eq!(fb.width, 16);
        assert_eq!(fb.color_buffer.len(), 16 * 8);
        assert_eq!(fb.get_pixel(1, 1), fb.background_color);
    }
}
