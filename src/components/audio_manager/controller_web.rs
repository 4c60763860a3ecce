// Browser host: binds the controller to the page's <audio> element and toggle button,
// drives fades from async timers and arms the one-shot autoplay listeners.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use dioxus::prelude::*;
use gloo_timers::callback::Timeout;
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{window, Document, HtmlAudioElement};

use crate::components::ToggleState;
use crate::db::{AudioSettings, LocalPreferenceStore};

use super::{
    media_error_message, AudioPlaybackController, ControllerSlot, FadeScheduler,
    InteractionTrigger, OneShotLatch, PlaybackBackend, SharedController, SignalToggleView,
    StreamEvent, ToggleView, AUDIO_ELEMENT_ID, TOGGLE_ELEMENT_ID,
};

fn describe_js_error(err: &JsValue) -> String {
    js_sys::Reflect::get(err, &"name".into())
        .ok()
        .and_then(|name| name.as_string())
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{err:?}"))
}

fn media_error_code(audio: &HtmlAudioElement) -> u16 {
    let audio_js = JsValue::from(audio.clone());
    js_sys::Reflect::get(&audio_js, &"error".into())
        .ok()
        .filter(|error| !error.is_null() && !error.is_undefined())
        .and_then(|error| js_sys::Reflect::get(&error, &"code".into()).ok())
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0) as u16
}

struct WebAudioBackend {
    audio: HtmlAudioElement,
    slot: ControllerSlot,
}

impl PlaybackBackend for WebAudioBackend {
    fn start(&mut self) {
        // Outcomes are reported from a later task; the controller is borrowed right now.
        let slot = self.slot.clone();
        match self.audio.play() {
            Ok(promise) => spawn_local(async move {
                if let Err(err) = JsFuture::from(promise).await {
                    let reason = describe_js_error(&err);
                    slot.dispatch(|c| c.handle_stream_event(StreamEvent::StartRejected(reason)));
                }
            }),
            Err(err) => {
                let reason = describe_js_error(&err);
                spawn_local(async move {
                    slot.dispatch(|c| c.handle_stream_event(StreamEvent::StartRejected(reason)));
                });
            }
        }
    }

    fn stop(&mut self) {
        if let Err(err) = self.audio.pause() {
            tracing::debug!(reason = %describe_js_error(&err), "pausing background music failed");
        }
    }

    fn set_volume(&mut self, level: f64) {
        self.audio.set_volume(level.clamp(0.0, 1.0));
    }
}

/// Each `begin` spawns a ticking task tagged with a generation; bumping the
/// generation retires whatever task is running.
struct WebFadeScheduler {
    generation: Rc<Cell<u64>>,
    slot: ControllerSlot,
}

impl FadeScheduler for WebFadeScheduler {
    fn begin(&mut self, interval: Duration) {
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);

        let current = self.generation.clone();
        let slot = self.slot.clone();
        let millis = interval.as_millis().min(u32::MAX as u128) as u32;
        spawn_local(async move {
            loop {
                TimeoutFuture::new(millis).await;
                if current.get() != generation {
                    break;
                }
                slot.dispatch(|c| c.on_fade_tick());
            }
        });
    }

    fn cancel(&mut self) {
        self.generation.set(self.generation.get().wrapping_add(1));
    }
}

fn bind_stream_events(audio: &HtmlAudioElement, slot: &ControllerSlot) {
    let play_slot = slot.clone();
    let play_cb = Closure::wrap(Box::new(move || {
        play_slot.dispatch(|c| c.handle_stream_event(StreamEvent::Started));
    }) as Box<dyn FnMut()>);
    audio.set_onplay(Some(play_cb.as_ref().unchecked_ref()));
    play_cb.forget();

    let pause_slot = slot.clone();
    let pause_cb = Closure::wrap(Box::new(move || {
        pause_slot.dispatch(|c| c.handle_stream_event(StreamEvent::Paused));
    }) as Box<dyn FnMut()>);
    audio.set_onpause(Some(pause_cb.as_ref().unchecked_ref()));
    pause_cb.forget();

    let ended_slot = slot.clone();
    let ended_cb = Closure::wrap(Box::new(move || {
        ended_slot.dispatch(|c| c.handle_stream_event(StreamEvent::Ended));
    }) as Box<dyn FnMut()>);
    audio.set_onended(Some(ended_cb.as_ref().unchecked_ref()));
    ended_cb.forget();

    let error_slot = slot.clone();
    let error_audio = audio.clone();
    let error_cb = Closure::wrap(Box::new(move || {
        let message = media_error_message(media_error_code(&error_audio));
        error_slot.dispatch(|c| c.handle_stream_event(StreamEvent::Error(message)));
    }) as Box<dyn FnMut()>);
    audio.set_onerror(Some(error_cb.as_ref().unchecked_ref()));
    error_cb.forget();
}

struct InteractionListeners {
    document: Document,
    callbacks: Vec<(&'static str, Closure<dyn FnMut()>)>,
}

impl InteractionListeners {
    fn detach(&self) {
        for (event, callback) in &self.callbacks {
            let _ = self
                .document
                .remove_event_listener_with_callback(event, callback.as_ref().unchecked_ref());
        }
    }
}

/// Registers the five one-shot document listeners plus the fallback timer. The first
/// listener to fire removes the rest; the timer is never cancelled.
fn arm_autostart(document: &Document, slot: &ControllerSlot, delay_ms: u32) {
    let latch = Rc::new(OneShotLatch::new());
    let armed: Rc<RefCell<Option<InteractionListeners>>> = Rc::new(RefCell::new(None));
    let mut callbacks = Vec::with_capacity(InteractionTrigger::LISTENED.len());

    for trigger in InteractionTrigger::LISTENED {
        let Some(event) = trigger.event_name() else {
            continue;
        };
        let latch = latch.clone();
        let armed_for_cb = armed.clone();
        let slot = slot.clone();
        let callback = Closure::wrap(Box::new(move || {
            if !latch.fire() {
                return;
            }
            let taken = armed_for_cb.borrow_mut().take();
            if let Some(listeners) = taken {
                listeners.detach();
                // This closure lives inside `listeners`; free them once dispatch returns.
                spawn_local(async move {
                    drop(listeners);
                });
            }
            slot.dispatch(|c| c.attempt_auto_start(trigger));
        }) as Box<dyn FnMut()>);

        if document
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .is_err()
        {
            tracing::warn!(event, "failed to register autoplay listener");
        }
        callbacks.push((event, callback));
    }

    *armed.borrow_mut() = Some(InteractionListeners {
        document: document.clone(),
        callbacks,
    });

    let slot = slot.clone();
    Timeout::new(delay_ms, move || {
        slot.dispatch(|c| c.attempt_auto_start(InteractionTrigger::Timeout));
    })
    .forget();
}

/// Binds the background music to the rendered page. Always returns a controller;
/// without both elements present it is a disabled no-op.
pub async fn initialize(
    settings: AudioSettings,
    toggle_state: Signal<ToggleState>,
) -> SharedController {
    let document = window().and_then(|w| w.document());
    let audio = document
        .as_ref()
        .and_then(|doc| doc.get_element_by_id(AUDIO_ELEMENT_ID))
        .and_then(|element| element.dyn_into::<HtmlAudioElement>().ok());
    let has_toggle = document
        .as_ref()
        .and_then(|doc| doc.get_element_by_id(TOGGLE_ELEMENT_ID))
        .is_some();

    let slot = ControllerSlot::default();
    let backend = audio.clone().map(|audio| {
        Box::new(WebAudioBackend {
            audio,
            slot: slot.clone(),
        }) as Box<dyn PlaybackBackend>
    });
    let toggle = has_toggle
        .then(|| Box::new(SignalToggleView::new(toggle_state)) as Box<dyn ToggleView>);
    let fades = Box::new(WebFadeScheduler {
        generation: Rc::new(Cell::new(0)),
        slot: slot.clone(),
    });
    let delay_ms = settings.autoplay_delay_ms;

    let controller = Rc::new(RefCell::new(AudioPlaybackController::new(
        settings,
        backend,
        toggle,
        fades,
        Box::new(LocalPreferenceStore),
    )));
    slot.attach(&controller);
    controller.borrow_mut().load_preference();

    if !controller.borrow().is_enabled() {
        return controller;
    }

    if let (Some(audio), Some(document)) = (audio.as_ref(), document.as_ref()) {
        audio.set_loop(true);
        bind_stream_events(audio, &slot);
        arm_autostart(document, &slot, delay_ms);
    }

    controller
}
