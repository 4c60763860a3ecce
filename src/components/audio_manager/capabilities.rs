//! Seams between the controller and whatever actually plays sound, draws the toggle,
//! runs timers and stores the preference.

use std::time::Duration;

use crate::db::PreferenceError;

use super::ToggleAppearance;

/// Lifecycle notifications coming back from the playing stream.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Started,
    Paused,
    Ended,
    Error(String),
    /// The asynchronous start request was refused, usually by the autoplay policy.
    StartRejected(String),
}

/// Something that can produce the background music.
///
/// `start` only requests playback. The outcome arrives later as a [`StreamEvent`].
pub trait PlaybackBackend {
    fn start(&mut self);
    fn stop(&mut self);
    fn set_volume(&mut self, level: f64);
}

/// The clickable music toggle.
pub trait ToggleView {
    fn render(&mut self, appearance: ToggleAppearance);
    /// Replace the descriptive text after the stream failed.
    fn mark_unavailable(&mut self, title: &str);
}

/// Repeating timer driving volume fades. While running, the host calls
/// `AudioPlaybackController::on_fade_tick` once per interval.
pub trait FadeScheduler {
    fn begin(&mut self, interval: Duration);
    fn cancel(&mut self);
}

/// Per-origin key/value storage for the mute flag.
pub trait PreferenceStore {
    fn read(&self, key: &str) -> Result<Option<String>, PreferenceError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// Fade scheduler with no clock of its own; whoever owns the controller ticks it.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ManualFadeScheduler {
    running: Option<Duration>,
}

#[cfg(test)]
impl ManualFadeScheduler {
    #[allow(dead_code)]
    pub fn interval(&self) -> Option<Duration> {
        self.running
    }
}

#[cfg(test)]
impl FadeScheduler for ManualFadeScheduler {
    fn begin(&mut self, interval: Duration) {
        self.running = Some(interval);
    }

    fn cancel(&mut self) {
        self.running = None;
    }
}
