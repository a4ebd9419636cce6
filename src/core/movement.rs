//! Time-corrected movement with axis-separated wall collision.

use crate::core::entity::Entity;
use crate::core::map::Map;

/// Advances an entity by one simulation step.
///
/// `time_correction` is the measured elapsed time divided by the nominal
/// tick duration, so a late tick moves further instead of queuing extra
/// steps. The candidate position is probed `min_dist_to_wall` away along
/// each axis independently; motion on an axis whose probes stay clear still
/// applies when the other axis is blocked, which makes entities slide along
/// walls. `probe_offset` is subtracted from probe coordinates (sprites are
/// drawn centered in their tile).
pub fn advance(
    ent: &mut Entity,
    map: &Map,
    time_correction: f32,
    min_dist_to_wall: f32,
    probe_offset: (f32, f32),
) {
    let move_step = time_correction * ent.speed * ent.move_speed;
    let strafe_step = time_correction * ent.strafe * ent.move_speed;

    let new_x = ent.x + ent.rot.cos() * move_step - ent.rot.sin() * strafe_step;
    let new_y = ent.y + ent.rot.sin() * move_step + ent.rot.cos() * strafe_step;

    // Rotation is never blocked by walls.
    ent.rot += time_correction * ent.dir * ent.rot_speed;

    let (hit_x, hit_y) = detect_collision(map, new_x, new_y, min_dist_to_wall, probe_offset);
    if !hit_x {
        ent.x = new_x;
    }
    if !hit_y {
        ent.y = new_y;
    }
}

/// Probes a candidate position and reports which axes collide.
fn detect_collision(map: &Map, x: f32, y: f32, dist: f32, offset: (f32, f32)) -> (bool, bool) {
    // Fail-safe: an entity leaving the map entirely is rejected outright.
    if x < 0.0 || x > map.width() as f32 || y < 0.0 || y > map.height() as f32 {
        return (true, true);
    }

    let probe = |px: f32, py: f32| map.is_wall_at(px - offset.0, py - offset.1);

    let hit_y = probe(x, y + dist) || probe(x, y - dist);
    let hit_x = probe(x + dist, y) || probe(x - dist, y);
    (hit_x, hit_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn open_map(w: usize, h: usize) -> Map {
        Map::from_rows(vec![vec![0; w]; h]).unwrap()
    }

    /// 6x6 open map with a single wall in cell (3,3).
    fn map_with_block() -> Map {
        let mut rows = vec![vec![0; 6]; 6];
        rows[3][3] = 1;
        Map::from_rows(rows).unwrap()
    }

    fn walker(x: f32, y: f32) -> Entity {
        Entity {
            x,
            y,
            speed: 1.0,
            ..Entity::default()
        }
    }

    #[test]
    fn slides_along_wall() {
        let map = map_with_block();
        let mut ent = walker(2.5, 3.1);
        ent.strafe = 1.0; // rot 0: strafing moves along +y

        for _ in 0..3 {
            advance(&mut ent, &map, 1.0, 0.2, (0.0, 0.0));
        }
        // x stops advancing once x + 0.2 would enter the blocked cell.
        assert!((ent.x - 2.71).abs() < 1e-4, "x ended at {}", ent.x);
        assert!(ent.x + 0.2 < 3.0);
        // y motion in the same ticks is unaffected.
        assert!((ent.y - 3.73).abs() < 1e-4, "y ended at {}", ent.y);
    }

    #[test]
    fn time_correction_is_linear() {
        let map = open_map(16, 16);
        let base = Entity {
            x: 4.0,
            y: 4.0,
            rot: 0.7,
            speed: 1.0,
            strafe: 0.4,
            ..Entity::default()
        };
        let mut twice = base.clone();
        let mut once = base;

        advance(&mut twice, &map, 0.5, 0.2, (0.0, 0.0));
        advance(&mut twice, &map, 0.5, 0.2, (0.0, 0.0));
        advance(&mut once, &map, 1.0, 0.2, (0.0, 0.0));

        assert!((twice.x - once.x).abs() < 1e-5);
        assert!((twice.y - once.y).abs() < 1e-5);
    }

    #[test]
    fn rejects_leaving_the_map() {
        let map = open_map(4, 4);
        let mut ent = walker(3.9, 2.0);
        ent.move_speed = 1.0;
        advance(&mut ent, &map, 1.0, 0.2, (0.0, 0.0));
        assert_eq!(ent.x, 3.9);
        assert_eq!(ent.y, 2.0);
    }

    #[test]
    fn rotation_applies_even_when_blocked() {
        let map = map_with_block();
        let mut ent = walker(2.9, 3.5);
        ent.dir = 1.0;
        ent.rot_speed = 0.1;
        advance(&mut ent, &map, 1.0, 0.2, (0.0, 0.0));
        assert!((ent.rot - 0.1).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn half_steps_compose_to_whole_steps(
            rot in 0.0f32..std::f32::consts::TAU,
            speed in -1.0f32..1.0,
            strafe in -1.0f32..1.0,
        ) {
            let map = open_map(32, 32);
            let base = Entity {
                x: 16.0,
                y: 16.0,
                rot,
                speed,
                strafe,
                ..Entity::default()
            };
            let mut twice = base.clone();
            let mut once = base;
            advance(&mut twice, &map, 0.5, 0.2, (0.0, 0.0));
            advance(&mut twice, &map, 0.5, 0.2, (0.0, 0.0));
            advance(&mut once, &map, 1.0, 0.2, (0.0, 0.0));
            prop_assert!((twice.x - once.x).abs() < 1e-4);
            prop_assert!((twice.y - once.y).abs() < 1e-4);
        }
    }
}
