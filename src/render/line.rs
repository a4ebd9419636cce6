//! Bresenham integer line drawing.

use crate::render::framebuffer::Framebuffer;

/// Draws a line in the framebuffer's current color; endpoints may lie
/// outside the buffer.
pub fn draw_line(fb: &mut Framebuffer, x0: i32, y0: i32, x1: i32, y1: i32) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);

    loop {
        if x >= 0 && y >= 0 {
            fb.set_pixel(x as u32, y as u32);
        }
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raylib::prelude::Color;

    #[test]
    fn draws_horizontal_line() {
        let mut fb = Framebuffer::new(8, 8);
        fb.set_current_color(Color::WHITE);
        draw_line(&mut fb, 1, 3, 5, 3);
        for x in 1..=5 {
            assert_eq!(fb.get_pixel(x, 3), Color::WHITE);
        }
        assert_eq!(fb.get_pixel(6, 3), Color::BLACK);
    }

    #[test]
    fn draws_diagonal_line() {
        let mut fb = Framebuffer::new(8, 8);
        fb.set_current_color(Color::WHITE);
        draw_line(&mut fb, 0, 0, 4, 4);
        for i in 0..=4 {
            assert_eq!(fb.get_pixel(i, i), Color::WHITE);
        }
    }
}
