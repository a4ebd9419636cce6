//! Column renderer: projection setup, textured wall strips and the
//! inverse-perspective floor/ceiling rows.

use std::f32::consts::TAU;

use crate::core::map::Map;
use crate::error::EngineError;
use crate::options::RenderOptions;
use crate::render::caster::{RayHit, cast_ray};
use crate::render::framebuffer::Framebuffer;
use crate::render::textures::AtlasKind;

/// Floor projection weights keyed by field of view in degrees, fitted
/// against a visual reference. Carried over unchanged; the nearest key wins.
pub const FOV_FLOOR_WEIGHT_TABLE: &[(f32, f32)] = &[
    (10.0, 5.50),
    (20.0, 2.80),
    (30.0, 1.85),
    (40.0, 1.35),
    (45.0, 1.15),
    (50.0, 1.00),
    (55.0, 0.95),
    (60.0, 0.85),
    (65.0, 0.75),
    (70.0, 0.65),
    (75.0, 0.60),
    (80.0, 0.55),
    (85.0, 0.50),
    (90.0, 0.45),
    (95.0, 0.40),
    (100.0, 0.35),
    (110.0, 0.30),
    (120.0, 0.25),
    (130.0, 0.20),
    (140.0, 0.15),
    (150.0, 0.12),
    (160.0, 0.08),
    (170.0, 0.03),
];

/// Nearest-degree lookup into the floor weight table.
pub fn fov_floor_weight(fov: f32) -> f32 {
    let fov_degrees = fov.to_degrees();
    let mut best = 0.85;
    let mut best_diff = f32::INFINITY;
    for &(deg, weight) in FOV_FLOOR_WEIGHT_TABLE {
        let diff = (deg - fov_degrees).abs();
        if diff < best_diff {
            best = weight;
            best_diff = diff;
        }
        if best_diff == 0.0 {
            break;
        }
    }
    best
}

/// Values derived once per session from the render options.
#[derive(Debug, Clone)]
pub struct Projection {
    /// Number of rays to cast, one per screen column.
    pub num_rays: usize,
    /// Distance from the viewer to the projection plane, in pixels:
    /// tan(fov/2) = (screen_width/2) / view_dist.
    pub view_dist: f32,
    /// Middle of the projection plane, in pixels.
    pub screen_middle: f32,
    pub fov_floor_weight: f32,
}

impl Projection {
    pub fn new(options: &RenderOptions) -> Self {
        let screen_w = options.screen_width as f32;
        Self {
            num_rays: (screen_w / options.strip_width as f32).ceil() as usize,
            view_dist: (screen_w / 2.0) / (options.fov / 2.0).tan(),
            screen_middle: screen_w / 2.0,
            fov_floor_weight: fov_floor_weight(options.fov),
        }
    }

    /// World angle of the ray for one screen column, normalized to [0, 2pi).
    /// The projection plane is flat, so the per-strip angle comes from the
    /// right triangle between the strip position and the plane distance.
    pub fn ray_angle(&self, options: &RenderOptions, viewer_rot: f32, strip: usize) -> f32 {
        let leftmost = -(self.num_rays as f32) / 2.0;
        let screen_pos = (leftmost + strip as f32) * options.strip_width as f32;
        let ray_view_len = (screen_pos * screen_pos + self.view_dist * self.view_dist).sqrt();
        let mut angle = (screen_pos / ray_view_len).asin() + viewer_rot;
        angle %= TAU;
        if angle < 0.0 {
            angle += TAU;
        }
        angle
    }
}

/// Paints the backdrop: a sky panorama wrapped by viewer rotation (or the
/// solid ceiling color) over the top half, the solid floor color below.
pub fn draw_backdrop(fb: &mut Framebuffer, options: &RenderOptions, viewer_rot: f32) {
    let w = options.screen_width as i32;
    let h = options.screen_height as i32;
    let hh = h / 2;

    if let Some(sky) = &options.sky_image {
        let mut rot = viewer_rot % TAU;
        if rot < 0.0 {
            rot += TAU;
        }
        let offset = rot * sky.width() as f32 / TAU;
        for y in 0..hh {
            for x in 0..w {
                let sx = (offset + x as f32) as u32;
                fb.set_pixel_color(x as u32, y as u32, sky.sample(sx, y as u32));
            }
        }
    } else {
        fb.set_current_color(options.ceiling_color);
        fb.fill_rect(0, 0, w, hh);
    }

    fb.set_current_color(options.floor_color);
    fb.fill_rect(0, hh, w, h - hh);
}

/// Casts the full ray fan: fills `dist` with one perpendicular distance per
/// screen column and draws the wall strip plus floor/ceiling rows for each.
pub fn render_walls(
    fb: &mut Framebuffer,
    map: &Map,
    options: &RenderOptions,
    proj: &Projection,
    viewer_x: f32,
    viewer_y: f32,
    viewer_rot: f32,
    dist: &mut Vec<f32>,
) -> Result<(), EngineError> {
    dist.clear();
    for strip in 0..proj.num_rays {
        let ray_a = proj.ray_angle(options, viewer_rot, strip);
        match cast_ray(map, viewer_x, viewer_y, ray_a) {
            Some(hit) => {
                // Oblique to perpendicular distance; removes the fisheye
                // distortion of the flat projection plane.
                let d = hit.distance * (viewer_rot - ray_a).cos();
                dist.push(d);
                draw_strip(fb, map, options, proj, viewer_x, viewer_y, strip, d, &hit)?;
            }
            None => dist.push(f32::INFINITY),
        }
    }
    Ok(())
}

/// Draws one wall strip and its floor/ceiling rows.
#[allow(clippy::too_many_arguments)]
fn draw_strip(
    fb: &mut Framebuffer,
    map: &Map,
    options: &RenderOptions,
    proj: &Projection,
    viewer_x: f32,
    viewer_y: f32,
    strip: usize,
    dist: f32,
    hit: &RayHit,
) -> Result<(), EngineError> {
    if !dist.is_finite() || dist <= 0.0 {
        return Ok(());
    }

    let screen_h = options.screen_height as f32;
    let strip_w = options.strip_width as i32;
    let tex_w = options.texture_width;
    let tex_h = options.texture_height;

    let atlas = &options.wall_atlas;
    atlas.ensure_ready(AtlasKind::Wall)?;

    // A wall is one unit tall, so its strip height on the projection plane
    // is view_dist / dist, vertically centered.
    let height = (proj.view_dist / dist).round();
    let x = strip as i32 * strip_w;
    let y = ((screen_h - height) / 2.0).round();

    let (off_h, off_v) = options.wall_mapping.get(&hit.wall_type).copied().unwrap_or((0, 0));
    let src_x = (off_h as f32 + hit.texture_u * tex_w as f32).floor() as u32;

    // One atlas column scaled onto the strip.
    let y0 = y.max(0.0) as i32;
    let y1 = (y + height).min(screen_h) as i32;
    for py in y0..y1 {
        let v = (py as f32 - y) / height;
        let src_y = off_v + ((v * tex_h as f32) as u32).min(tex_h - 1);
        let color = atlas.sample(src_x, src_y);
        for px in x..(x + strip_w) {
            fb.set_pixel_color(px as u32, py as u32, color);
        }
    }

    // Floor and mirrored ceiling rows for the rest of the column.
    let fheight = (screen_h - height) / 2.0;
    if fheight <= 0.0 {
        return Ok(());
    }
    let fc_atlas = &options.floor_ceiling_atlas;
    fc_atlas.ensure_ready(AtlasKind::FloorCeiling)?;

    let foffset = y + height;
    let bottom = foffset + fheight;
    // Aspect and FOV dependent weight placing floor tiles at the right
    // world distance.
    let fweight = (options.screen_width as f32 / screen_h) * proj.fov_floor_weight;
    let vx = (hit.hit_x - viewer_x) / dist;
    let vy = (hit.hit_y - viewer_y) / dist;

    let rows = fheight.ceil() as i32;
    for fy in 0..rows {
        let denom = 2.0 * (fy as f32 + foffset) - bottom;
        if denom <= 0.0 {
            continue;
        }
        let current_dist = bottom / denom;

        let wx = viewer_x + vx * current_dist * fweight;
        let wy = viewer_y + vy * current_dist * fweight;
        let floor_code = map.cell(wx.floor() as isize, wy.floor() as isize).unwrap_or(0);
        // Non-negative codes have no floor/ceiling variant; leave the
        // backdrop visible.
        if floor_code >= 0 {
            continue;
        }

        let ftx = (wx * tex_w as f32).rem_euclid(tex_w as f32) as u32;
        let fty = (wy * tex_h as f32).rem_euclid(tex_h as f32) as u32;
        let offsets = options
            .floor_ceiling_mapping
            .get(&floor_code)
            .copied()
            .unwrap_or_default();

        let floor_color = fc_atlas.sample(ftx + offsets.floor.0, fty + offsets.floor.1);
        fb.set_current_color(floor_color);
        fb.fill_rect(x, (fy as f32 + foffset) as i32, strip_w, 1);

        // The ceiling row mirrors the floor row; drawn double wide to
        // avoid pinholes between strips.
        let ceiling_color = fc_atlas.sample(ftx + offsets.ceiling.0, fty + offsets.ceiling.1);
        fb.set_current_color(ceiling_color);
        fb.fill_rect(x, (fheight - fy as f32) as i32, strip_w * 2, 1);
    }
    Ok(())
}
