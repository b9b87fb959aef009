//! Playback and view actions for the coaster demo
//!
//! Camera keys (WASD, QE) are NOT mapped here - they go directly to the
//! [`OrbitController`](crate::OrbitController).

use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Discrete actions triggered by a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoasterAction {
    /// Pause or resume the ride (Space)
    TogglePlay,
    /// Raise the playback multiplier (= or numpad +)
    SpeedUp,
    /// Lower the playback multiplier (- or numpad -)
    SlowDown,
    /// Cycle orbit / ride / follow views (V)
    CycleView,
    /// Put the train back at the start (R)
    ResetRide,
    /// Drive the other way round (B)
    ReverseDirection,
    /// Toggle orbit input smoothing (G)
    ToggleSmoothing,
    /// Quit (Escape)
    Exit,
}

/// Maps raw key events to [`CoasterAction`]s
pub struct ActionMapper;

impl ActionMapper {
    /// Map keyboard input to an action
    ///
    /// Only presses count; releases and unbound keys return `None`.
    pub fn map_keyboard(key: KeyCode, state: ElementState) -> Option<CoasterAction> {
        if state != ElementState::Pressed {
            return None;
        }

        match key {
            KeyCode::Space => Some(CoasterAction::TogglePlay),
            KeyCode::Equal | KeyCode::NumpadAdd => Some(CoasterAction::SpeedUp),
            KeyCode::Minus | KeyCode::NumpadSubtract => Some(CoasterAction::SlowDown),
            KeyCode::KeyV => Some(CoasterAction::CycleView),
            KeyCode::KeyR => Some(CoasterAction::ResetRide),
            KeyCode::KeyB => Some(CoasterAction::ReverseDirection),
            KeyCode::KeyG => Some(CoasterAction::ToggleSmoothing),
            KeyCode::Escape => Some(CoasterAction::Exit),
            _ => None,
        }
    }

    /// Map a key by its `KeyCode` name as written in config files (e.g. `"Space"`, `"KeyV"`)
    pub fn map_key_name(name: &str) -> Option<CoasterAction> {
        let key = match name {
            "Space" => KeyCode::Space,
            "Equal" => KeyCode::Equal,
            "NumpadAdd" => KeyCode::NumpadAdd,
            "Minus" => KeyCode::Minus,
            "NumpadSubtract" => KeyCode::NumpadSubtract,
            "KeyV" => KeyCode::KeyV,
            "KeyR" => KeyCode::KeyR,
            "KeyB" => KeyCode::KeyB,
            "KeyG" => KeyCode::KeyG,
            "Escape" => KeyCode::Escape,
            _ => return None,
        };
        Self::map_keyboard(key, ElementState::Pressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playback_keys() {
        assert_eq!(
            ActionMapper::map_keyboard(KeyCode::Space, ElementState::Pressed),
            Some(CoasterAction::TogglePlay)
        );
        assert_eq!(
            ActionMapper::map_keyboard(KeyCode::Equal, ElementState::Pressed),
            Some(CoasterAction::SpeedUp)
        );
        assert_eq!(
            ActionMapper::map_keyboard(KeyCode::NumpadSubtract, ElementState::Pressed),
            Some(CoasterAction::SlowDown)
        );
        assert_eq!(
            ActionMapper::map_keyboard(KeyCode::KeyB, ElementState::Pressed),
            Some(CoasterAction::ReverseDirection)
        );
    }

    #[test]
    fn test_key_release_ignored() {
        assert_eq!(ActionMapper::map_keyboard(KeyCode::Space, ElementState::Released), None);
    }

    #[test]
    fn test_camera_keys_not_mapped() {
        for key in [
            KeyCode::KeyW,
            KeyCode::KeyA,
            KeyCode::KeyS,
            KeyCode::KeyD,
            KeyCode::KeyQ,
            KeyCode::KeyE,
        ] {
            let action = ActionMapper::map_keyboard(key, ElementState::Pressed);
            assert_eq!(action, None, "Key {:?} should not be mapped", key);
        }
    }

    #[test]
    fn test_map_key_name() {
        assert_eq!(ActionMapper::map_key_name("KeyV"), Some(CoasterAction::CycleView));
        assert_eq!(ActionMapper::map_key_name("Escape"), Some(CoasterAction::Exit));
        assert_eq!(ActionMapper::map_key_name("KeyW"), None);
        assert_eq!(ActionMapper::map_key_name("nonsense"), None);
    }
}
