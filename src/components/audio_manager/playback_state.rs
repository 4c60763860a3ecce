//! Playback flags owned by the controller and the toggle appearance derived from them.

/// Mutable playback flags. `is_playing` and `has_started_once` reset on every page load,
/// only `is_muted` is persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub is_muted: bool,
    pub has_started_once: bool,
    /// Steady-state volume that fades move toward and away from.
    pub current_volume: f64,
}

impl PlaybackState {
    pub fn new(target_volume: f64) -> Self {
        Self {
            is_playing: false,
            is_muted: false,
            has_started_once: false,
            current_volume: target_volume.clamp(0.0, 1.0),
        }
    }

    pub fn appearance(&self) -> ToggleAppearance {
        ToggleAppearance::from_flags(self.is_muted, self.is_playing)
    }
}

/// The three mutually exclusive looks of the music toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToggleAppearance {
    Muted,
    Playing,
    #[default]
    Idle,
}

impl ToggleAppearance {
    pub fn from_flags(is_muted: bool, is_playing: bool) -> Self {
        match (is_muted, is_playing) {
            (true, _) => ToggleAppearance::Muted,
            (false, true) => ToggleAppearance::Playing,
            (false, false) => ToggleAppearance::Idle,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ToggleAppearance::Muted => "Unmute Music",
            ToggleAppearance::Playing => "Mute Music",
            ToggleAppearance::Idle => "Play Music",
        }
    }

    /// Name understood by [`crate::components::Icon`].
    pub fn icon_name(self) -> &'static str {
        match self {
            ToggleAppearance::Muted => "volume-off",
            ToggleAppearance::Playing | ToggleAppearance::Idle => "volume-on",
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            ToggleAppearance::Muted => "muted",
            ToggleAppearance::Playing => "playing",
            ToggleAppearance::Idle => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn muted_wins_regardless_of_playback() {
        for playing in [true, false] {
            let look = ToggleAppearance::from_flags(true, playing);
            assert_eq!(look, ToggleAppearance::Muted);
            assert_eq!(look.title(), "Unmute Music");
            assert_eq!(look.icon_name(), "volume-off");
        }
    }

    #[test]
    fn unmuted_looks_follow_playback() {
        let playing = ToggleAppearance::from_flags(false, true);
        assert_eq!(playing.title(), "Mute Music");
        assert_eq!(playing.icon_name(), "volume-on");
        assert_eq!(playing.class(), "playing");

        let idle = ToggleAppearance::from_flags(false, false);
        assert_eq!(idle.title(), "Play Music");
        assert_eq!(idle.icon_name(), "volume-on");
        assert_eq!(idle.class(), "");
    }

    #[test]
    fn fresh_state_is_idle_at_target_volume() {
        let state = PlaybackState::new(0.3);
        assert!(!state.is_playing && !state.is_muted && !state.has_started_once);
        assert_eq!(state.current_volume, 0.3);
        assert_eq!(state.appearance(), ToggleAppearance::Idle);
        assert_eq!(PlaybackState::new(4.0).current_volume, 1.0);
    }
}
