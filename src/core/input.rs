//! Key event handling and the default bindings.

use raylib::prelude::KeyboardKey;

use crate::core::entity::Player;
use crate::engine::GameState;

/// One key transition with modifier state captured at event time.
#[derive(Debug, Clone, Copy)]
pub struct KeyEvent {
    pub key: KeyboardKey,
    pub ctrl: bool,
    pub shift: bool,
}

impl KeyEvent {
    pub fn plain(key: KeyboardKey) -> Self {
        Self { key, ctrl: false, shift: false }
    }
}

/// Pluggable key handler mutating the player's movement intent. Swapped via
/// the render options; the engine never hardwires bindings.
pub trait EventHandler {
    fn on_key_down(&self, state: &mut GameState, ev: KeyEvent);
    fn on_key_up(&self, state: &mut GameState, ev: KeyEvent);
}

/// Arrow-key bindings: up/down move, left/right turn, or strafe while ctrl
/// or shift is held. Holding a turn key ramps the rotation speed up to the
/// player's maximum; releasing it resets to the minimum.
#[derive(Debug, Default)]
pub struct DefaultEventHandler;

impl EventHandler for DefaultEventHandler {
    fn on_key_down(&self, state: &mut GameState, ev: KeyEvent) {
        let p = &mut state.player;
        match ev.key {
            KeyboardKey::KEY_UP => p.ent.speed = 1.0,
            KeyboardKey::KEY_DOWN => p.ent.speed = -1.0,
            KeyboardKey::KEY_RIGHT => {
                if ev.ctrl || ev.shift {
                    p.ent.strafe = 1.0;
                } else {
                    p.ent.dir = 1.0;
                    ramp_rotation(p);
                }
            }
            KeyboardKey::KEY_LEFT => {
                if ev.ctrl || ev.shift {
                    p.ent.strafe = -1.0;
                } else {
                    p.ent.dir = -1.0;
                    ramp_rotation(p);
                }
            }
            _ => {}
        }
    }

    fn on_key_up(&self, state: &mut GameState, ev: KeyEvent) {
        let p = &mut state.player;
        match ev.key {
            KeyboardKey::KEY_UP | KeyboardKey::KEY_DOWN => p.ent.speed = 0.0,
            KeyboardKey::KEY_LEFT | KeyboardKey::KEY_RIGHT => {
                p.ent.dir = 0.0;
                p.ent.strafe = 0.0;
                p.ent.rot_speed = p.min_rot_speed;
            }
            _ => {}
        }
    }
}

fn ramp_rotation(p: &mut Player) {
    if p.ent.rot_speed < p.max_rot_speed {
        p.ent.rot_speed = (p.ent.rot_speed * p.rot_accel).min(p.max_rot_speed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::map::Map;

    fn state() -> GameState {
        GameState {
            map: Map::from_rows(vec![vec![0; 4]; 4]).unwrap(),
            player: Player::default(),
        }
    }

    #[test]
    fn arrow_keys_drive_intent() {
        let handler = DefaultEventHandler;
        let mut st = state();

        handler.on_key_down(&mut st, KeyEvent::plain(KeyboardKey::KEY_UP));
        assert_eq!(st.player.ent.speed, 1.0);

        handler.on_key_down(&mut st, KeyEvent::plain(KeyboardKey::KEY_RIGHT));
        assert_eq!(st.player.ent.dir, 1.0);
        assert_eq!(st.player.ent.strafe, 0.0);

        handler.on_key_up(&mut st, KeyEvent::plain(KeyboardKey::KEY_UP));
        assert_eq!(st.player.ent.speed, 0.0);

        handler.on_key_up(&mut st, KeyEvent::plain(KeyboardKey::KEY_RIGHT));
        assert_eq!(st.player.ent.dir, 0.0);
        assert_eq!(st.player.ent.rot_speed, st.player.min_rot_speed);
    }

    #[test]
    fn modifier_turns_into_strafe() {
        let handler = DefaultEventHandler;
        let mut st = state();
        let ev = KeyEvent { key: KeyboardKey::KEY_LEFT, ctrl: false, shift: true };

        handler.on_key_down(&mut st, ev);
        assert_eq!(st.player.ent.strafe, -1.0);
        assert_eq!(st.player.ent.dir, 0.0);
    }

    #[test]
    fn turn_key_ramps_rotation_up_to_max() {
        let handler = DefaultEventHandler;
        let mut st = state();
        let base = st.player.ent.rot_speed;

        handler.on_key_down(&mut st, KeyEvent::plain(KeyboardKey::KEY_RIGHT));
        assert!((st.player.ent.rot_speed - base * 3.0).abs() < 1e-6);

        for _ in 0..5 {
            handler.on_key_down(&mut st, KeyEvent::plain(KeyboardKey::KEY_RIGHT));
        }
        assert_eq!(st.player.ent.rot_speed, st.player.max_rot_speed);
    }
}
