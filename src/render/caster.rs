//! Grid-line ray traversal.
//!
//! One cast runs two independent searches from the origin along the ray
//! direction: one crossing successive vertical grid lines (x = integer) and
//! one crossing horizontal grid lines (y = integer). Each search advances
//! exactly one grid unit per step, deriving the coordinate on the other axis
//! from the ray slope, and stops at the first wall code or when it leaves
//! the map. The nearer of the two candidate hits wins. Stepping on grid
//! lines bounds the work by the map extent and avoids the cumulative error
//! of marching in small fixed increments.

use std::f32::consts::{PI, TAU};

use crate::core::map::Map;

/// Direction components smaller than this are treated as axis-aligned; the
/// degenerate axis search is skipped instead of dividing by its slope.
const AXIS_EPS: f32 = 1e-6;

/// Result of a single ray cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Euclidean distance from the origin to the hit point.
    pub distance: f32,
    /// Fractional position along the hit wall face, mirrored by approach
    /// direction so texture orientation stays consistent.
    pub texture_u: f32,
    /// Wall code of the hit cell.
    pub wall_type: i32,
    pub hit_x: f32,
    pub hit_y: f32,
}

struct Candidate {
    dist_sq: f32,
    texture_u: f32,
    wall_type: i32,
    x: f32,
    y: f32,
}

/// Casts one ray; `None` when the ray leaves the map without hitting a wall.
pub fn cast_ray(map: &Map, origin_x: f32, origin_y: f32, angle: f32) -> Option<RayHit> {
    let mut angle = angle % TAU;
    if angle < 0.0 {
        angle += TAU;
    }

    let right = angle > TAU * 0.75 || angle < TAU * 0.25;
    let up = angle > PI;

    let v_x = angle.cos();
    let v_y = angle.sin();

    let map_w = map.width() as f32;
    let map_h = map.height() as f32;

    // Search crossing vertical grid lines.
    let mut do_v = v_x.abs() > AXIS_EPS;
    let slope_v = if do_v { v_y / v_x } else { 0.0 };
    let dx_v: f32 = if right { 1.0 } else { -1.0 };
    let dy_v = dx_v * slope_v;
    let mut x_v = if right { origin_x.ceil() } else { origin_x.floor() };
    let mut y_v = origin_y + (x_v - origin_x) * slope_v;
    let mut hit_v: Option<Candidate> = None;

    // Search crossing horizontal grid lines.
    let mut do_h = v_y.abs() > AXIS_EPS;
    let slope_h = if do_h { v_x / v_y } else { 0.0 };
    let dy_h: f32 = if up { -1.0 } else { 1.0 };
    let dx_h = dy_h * slope_h;
    let mut y_h = if up { origin_y.floor() } else { origin_y.ceil() };
    let mut x_h = origin_x + (y_h - origin_y) * slope_h;
    let mut hit_h: Option<Candidate> = None;

    while do_v || do_h {
        if do_v {
            if x_v >= 0.0 && x_v < map_w && y_v >= 0.0 && y_v < map_h {
                // The cell the ray has just entered lies left of the
                // crossed line when heading left.
                let wall_x = (x_v + if right { 0.0 } else { -1.0 }).floor() as isize;
                let wall_y = y_v.floor() as isize;
                let wall = map.cell(wall_x, wall_y).unwrap_or(0);
                if wall > 0 {
                    let dx = x_v - origin_x;
                    let dy = y_v - origin_y;
                    let mut u = y_v - y_v.floor();
                    if !right {
                        u = 1.0 - u;
                    }
                    hit_v = Some(Candidate {
                        dist_sq: dx * dx + dy * dy,
                        texture_u: u,
                        wall_type: wall,
                        x: x_v,
                        y: y_v,
                    });
                    do_v = false;
                } else {
                    x_v += dx_v;
                    y_v += dy_v;
                }
            } else {
                do_v = false;
            }
        }
        if do_h {
            if x_h >= 0.0 && x_h < map_w && y_h >= 0.0 && y_h < map_h {
                let wall_y = ((y_h + if up { -1.0 } else { 0.0 }).floor() as isize).max(0);
                let wall_x = x_h.floor() as isize;
                let wall = map.cell(wall_x, wall_y).unwrap_or(0);
                if wall > 0 {
                    let dx = x_h - origin_x;
                    let dy = y_h - origin_y;
                    let mut u = x_h - x_h.floor();
                    if up {
                        u = 1.0 - u;
                    }
                    hit_h = Some(Candidate {
                        dist_sq: dx * dx + dy * dy,
                        texture_u: u,
                        wall_type: wall,
                        x: x_h,
                        y: y_h,
                    });
                    do_h = false;
                } else {
                    x_h += dx_h;
                    y_h += dy_h;
                }
            } else {
                do_h = false;
            }
        }
    }

    let best = match (hit_v, hit_h) {
        (Some(v), Some(h)) => Some(if h.dist_sq < v.dist_sq { h } else { v }),
        (Some(v), None) => Some(v),
        (None, Some(h)) => Some(h),
        (None, None) => None,
    };
    best.map(|c| RayHit {
        distance: c.dist_sq.sqrt(),
        texture_u: c.texture_u,
        wall_type: c.wall_type,
        hit_x: c.x,
        hit_y: c.y,
    })
}
