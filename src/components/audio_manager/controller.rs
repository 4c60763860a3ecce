//! Background music controller: fades, mute preference and first-interaction autoplay.

use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::db::AudioSettings;

use super::{
    FadeScheduler, InteractionTrigger, PlaybackBackend, PlaybackState, PreferenceStore,
    StreamEvent, ToggleAppearance, ToggleView,
};

/// Slack for float comparisons while stepping the volume.
const VOLUME_EPSILON: f64 = 1e-9;

pub const UNAVAILABLE_TITLE: &str = "Audio file not found";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    In,
    Out,
}

/// The audio source and toggle the controller is bound to. Both are required.
pub struct AudioBindings {
    pub backend: Box<dyn PlaybackBackend>,
    pub toggle: Box<dyn ToggleView>,
}

pub struct AudioPlaybackController {
    settings: AudioSettings,
    state: PlaybackState,
    live_volume: f64,
    active_fade: Option<FadeDirection>,
    bindings: Option<AudioBindings>,
    fades: Box<dyn FadeScheduler>,
    preferences: Box<dyn PreferenceStore>,
}

impl AudioPlaybackController {
    /// Binds to the audio source and toggle. With either missing the controller stays
    /// disabled and every operation is a no-op.
    pub fn new(
        settings: AudioSettings,
        backend: Option<Box<dyn PlaybackBackend>>,
        toggle: Option<Box<dyn ToggleView>>,
        fades: Box<dyn FadeScheduler>,
        preferences: Box<dyn PreferenceStore>,
    ) -> Self {
        let state = PlaybackState::new(settings.target_volume);
        let bindings = match (backend, toggle) {
            (Some(backend), Some(toggle)) => Some(AudioBindings { backend, toggle }),
            (backend, toggle) => {
                warn!(
                    has_audio = backend.is_some(),
                    has_toggle = toggle.is_some(),
                    "audio elements not found, background music disabled"
                );
                None
            }
        };

        let mut controller = Self {
            live_volume: state.current_volume,
            settings,
            state,
            active_fade: None,
            bindings,
            fades,
            preferences,
        };

        if controller.is_enabled() {
            let target = controller.state.current_volume;
            controller.apply_volume(target);
            info!(volume = target, "audio manager initialized");
        }

        controller
    }

    pub fn is_enabled(&self) -> bool {
        self.bindings.is_some()
    }

    #[allow(dead_code)]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[allow(dead_code)]
    pub fn settings(&self) -> &AudioSettings {
        &self.settings
    }

    #[allow(dead_code)]
    pub fn active_fade(&self) -> Option<FadeDirection> {
        self.active_fade
    }

    /// Runs `play` for the first qualifying trigger of the page load, unless muted.
    pub fn attempt_auto_start(&mut self, trigger: InteractionTrigger) {
        if !self.is_enabled() {
            return;
        }
        if self.state.has_started_once || self.state.is_muted {
            debug!(?trigger, "autoplay skipped");
            return;
        }

        self.state.has_started_once = true;
        debug!(?trigger, "autoplay triggered");
        self.play();
    }

    /// Fades in from silence to the target volume while requesting the stream to start.
    pub fn play(&mut self) {
        if !self.is_enabled() {
            return;
        }

        self.apply_volume(0.0);
        self.begin_fade(FadeDirection::In);
        if let Some(bindings) = self.bindings.as_mut() {
            bindings.backend.start();
        }
    }

    /// Fades out, then stops the stream and restores the target volume for the next play.
    pub fn pause(&mut self) {
        if !self.is_enabled() {
            return;
        }
        self.begin_fade(FadeDirection::Out);
    }

    pub fn toggle_music(&mut self) {
        if self.state.is_muted {
            self.unmute();
        } else {
            self.mute();
        }
    }

    pub fn mute(&mut self) {
        if !self.is_enabled() {
            return;
        }
        self.state.is_muted = true;
        self.pause();
        self.refresh_toggle();
        self.save_preference();
        info!("music muted");
    }

    pub fn unmute(&mut self) {
        if !self.is_enabled() {
            return;
        }
        self.state.is_muted = false;
        self.play();
        self.refresh_toggle();
        self.save_preference();
        info!("music unmuted");
    }

    pub fn handle_stream_event(&mut self, event: StreamEvent) {
        match event {
            StreamEvent::Started => self.on_playback_started(),
            StreamEvent::Paused => self.on_playback_paused(),
            StreamEvent::Ended => self.on_playback_ended(),
            StreamEvent::Error(message) => self.on_playback_error(&message),
            StreamEvent::StartRejected(reason) => self.on_start_rejected(&reason),
        }
    }

    pub fn on_playback_started(&mut self) {
        if !self.is_enabled() {
            return;
        }
        self.state.is_playing = true;
        self.refresh_toggle();
        info!("music started playing");
    }

    pub fn on_playback_paused(&mut self) {
        if !self.is_enabled() {
            return;
        }
        self.state.is_playing = false;
        // A mute-triggered pause already shows the muted look.
        if !self.state.is_muted {
            self.refresh_toggle();
        }
    }

    pub fn on_playback_ended(&mut self) {
        if !self.is_enabled() {
            return;
        }
        self.state.is_playing = false;
        if !self.state.is_muted {
            self.refresh_toggle();
        }
    }

    fn on_start_rejected(&mut self, reason: &str) {
        if !self.is_enabled() {
            return;
        }
        warn!(%reason, "autoplay prevented, waiting for the toggle");
        self.state.is_playing = false;
    }

    fn on_playback_error(&mut self, message: &str) {
        error!(%message, "background music error");
        if let Some(bindings) = self.bindings.as_mut() {
            bindings.toggle.mark_unavailable(UNAVAILABLE_TITLE);
        }
    }

    /// Sets the live volume, clamped into `[0, 1]`. The fade target is unchanged.
    #[allow(dead_code)]
    pub fn set_volume(&mut self, level: f64) {
        if !self.is_enabled() {
            return;
        }
        let level = if level.is_nan() { 0.0 } else { level.clamp(0.0, 1.0) };
        self.apply_volume(level);
    }

    #[allow(dead_code)]
    pub fn get_volume(&self) -> f64 {
        if self.is_enabled() {
            self.live_volume
        } else {
            0.0
        }
    }

    /// Advances the running fade by one step.
    pub fn on_fade_tick(&mut self) {
        let Some(direction) = self.active_fade else {
            return;
        };
        let target = self.state.current_volume;
        let step = self.settings.fade_step;

        match direction {
            FadeDirection::In => {
                if self.live_volume + VOLUME_EPSILON < target {
                    self.apply_volume((self.live_volume + step).min(target));
                } else {
                    self.finish_fade();
                }
            }
            FadeDirection::Out => {
                if self.live_volume > self.settings.fade_out_floor + VOLUME_EPSILON {
                    self.apply_volume((self.live_volume - step).max(0.0));
                } else {
                    if let Some(bindings) = self.bindings.as_mut() {
                        bindings.backend.stop();
                    }
                    self.apply_volume(target);
                    self.finish_fade();
                }
            }
        }
    }

    pub fn save_preference(&mut self) {
        let value = if self.state.is_muted { "true" } else { "false" };
        if let Err(err) = self
            .preferences
            .write(&self.settings.preference_key, value)
        {
            warn!(error = %err, "failed to save music preference");
        }
    }

    /// A stored `"true"` forces the muted look. Playback is never paused here: the
    /// autoplay guard keeps it from starting in the first place.
    pub fn load_preference(&mut self) {
        if !self.is_enabled() {
            return;
        }
        match self.preferences.read(&self.settings.preference_key) {
            Ok(Some(saved)) if saved == "true" => {
                self.state.is_muted = true;
                self.refresh_toggle();
                debug!("restored muted preference");
            }
            Ok(_) => {}
            Err(err) => warn!(error = %err, "failed to load music preference"),
        }
    }

    fn begin_fade(&mut self, direction: FadeDirection) {
        if self.active_fade.take().is_some() {
            self.fades.cancel();
        }
        self.active_fade = Some(direction);
        self.fades
            .begin(Duration::from_millis(self.settings.fade_interval_ms));
    }

    fn finish_fade(&mut self) {
        self.active_fade = None;
        self.fades.cancel();
    }

    fn apply_volume(&mut self, level: f64) {
        self.live_volume = level;
        if let Some(bindings) = self.bindings.as_mut() {
            bindings.backend.set_volume(level);
        }
    }

    fn refresh_toggle(&mut self) {
        let appearance: ToggleAppearance = self.state.appearance();
        if let Some(bindings) = self.bindings.as_mut() {
            bindings.toggle.render(appearance);
        }
    }
}
