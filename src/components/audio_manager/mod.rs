//! Audio Manager - background music that fades in on the first interaction and
//! remembers whether the visitor muted it.
//! The controller itself is host-agnostic; the host modules bind it to the page.

mod autostart;
mod capabilities;
mod controller;
mod playback_state;

#[cfg(not(target_arch = "wasm32"))]
mod controller_native;
#[cfg(target_arch = "wasm32")]
mod controller_web;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use dioxus::core::{Runtime, RuntimeGuard};
use dioxus::prelude::*;

use crate::components::ToggleState;

pub use autostart::{InteractionTrigger, OneShotLatch};
#[cfg(test)]
pub use capabilities::ManualFadeScheduler;
pub use capabilities::{FadeScheduler, PlaybackBackend, PreferenceStore, StreamEvent, ToggleView};
pub use controller::{AudioPlaybackController, FadeDirection, UNAVAILABLE_TITLE};
pub use playback_state::{PlaybackState, ToggleAppearance};

#[cfg(not(target_arch = "wasm32"))]
pub use controller_native::initialize;
#[cfg(target_arch = "wasm32")]
pub use controller_web::initialize;

pub const AUDIO_ELEMENT_ID: &str = "background-music";
pub const TOGGLE_ELEMENT_ID: &str = "music-toggle";

/// The page-wide controller, owned by the app shell and shared with event closures.
pub type SharedController = Rc<RefCell<AudioPlaybackController>>;

/// Run `f` against the controller unless it is already borrowed further up the stack.
pub fn with_controller<F>(controller: &SharedController, f: F)
where
    F: FnOnce(&mut AudioPlaybackController),
{
    match controller.try_borrow_mut() {
        Ok(mut controller) => f(&mut controller),
        Err(_) => tracing::debug!("audio controller busy, dropping re-entrant call"),
    }
}

/// Late-bound handle to the controller for objects the controller itself owns.
#[derive(Clone, Default)]
pub(crate) struct ControllerSlot(Rc<RefCell<Weak<RefCell<AudioPlaybackController>>>>);

impl ControllerSlot {
    pub(crate) fn attach(&self, controller: &SharedController) {
        *self.0.borrow_mut() = Rc::downgrade(controller);
    }

    pub(crate) fn dispatch<F>(&self, f: F)
    where
        F: FnOnce(&mut AudioPlaybackController),
    {
        let upgraded = self.0.borrow().upgrade();
        if let Some(controller) = upgraded {
            with_controller(&controller, f);
        }
    }
}

/// Human-readable text for a `MediaError.code`.
pub(crate) fn media_error_message(code: u16) -> String {
    match code {
        1 => "Playback was aborted before the stream loaded.".to_string(),
        2 => "Network error while loading the background music.".to_string(),
        3 => "Background music failed due to a decode error.".to_string(),
        4 => "No supported source was found for the background music.".to_string(),
        _ => "Unable to load the background music.".to_string(),
    }
}

/// Toggle view backed by the signal the `MusicToggle` component renders from.
pub struct SignalToggleView {
    state: Signal<ToggleState>,
    runtime: Rc<Runtime>,
}

impl SignalToggleView {
    /// Must be called inside the Dioxus runtime, e.g. from an effect.
    pub fn new(state: Signal<ToggleState>) -> Self {
        Self {
            state,
            runtime: Runtime::current(),
        }
    }
}

impl ToggleView for SignalToggleView {
    fn render(&mut self, appearance: ToggleAppearance) {
        let _guard = RuntimeGuard::new(self.runtime.clone());
        self.state.set(ToggleState {
            appearance,
            title_override: None,
        });
    }

    fn mark_unavailable(&mut self, title: &str) {
        let _guard = RuntimeGuard::new(self.runtime.clone());
        self.state.write().title_override = Some(title.to_string());
    }
}
