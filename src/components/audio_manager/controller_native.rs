// Desktop host: the page runs inside a webview, so the controller drives the rendered
// <audio> element through an injected script bridge and polls it for events.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use dioxus::prelude::*;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::components::ToggleState;
use crate::db::{AudioSettings, MemoryPreferenceStore, SqlitePreferenceStore};

use super::{
    media_error_message, AudioPlaybackController, ControllerSlot, FadeScheduler,
    InteractionTrigger, OneShotLatch, PlaybackBackend, PreferenceStore, SharedController,
    SignalToggleView, StreamEvent, ToggleView, AUDIO_ELEMENT_ID, TOGGLE_ELEMENT_ID,
};

const BRIDGE_POLL_MS: u64 = 100;

/// Installs `window.__portfolioAudioBridge` once and reports which elements exist.
/// Media events, the first interaction and the autoplay timer are queued for `drain`.
const BRIDGE_BOOTSTRAP_JS: &str = r#"
return (function () {
  const audio = document.getElementById("__AUDIO_ID__");
  const toggle = !!document.getElementById("__TOGGLE_ID__");
  if (!audio) {
    return { audio: false, toggle };
  }
  if (window.__portfolioAudioBridge) {
    return { audio: true, toggle };
  }

  const queue = [];
  const push = (event) => queue.push(event);

  audio.loop = true;
  audio.addEventListener("play", () => push({ kind: "play" }));
  audio.addEventListener("pause", () => push({ kind: "pause" }));
  audio.addEventListener("ended", () => push({ kind: "ended" }));
  audio.addEventListener("error", () =>
    push({ kind: "error", code: audio.error ? audio.error.code : 0 })
  );

  const listened = ["scroll", "pointermove", "touchstart", "click", "keydown"];
  const onFirst = (event) => {
    listened.forEach((name) => document.removeEventListener(name, onFirst));
    push({ kind: "interaction", trigger: event.type });
  };
  listened.forEach((name) => document.addEventListener(name, onFirst));
  setTimeout(() => push({ kind: "timeout" }), __DELAY_MS__);

  window.__portfolioAudioBridge = {
    apply(command) {
      if (command.op === "play") {
        const started = audio.play();
        if (started && typeof started.catch === "function") {
          started.catch((err) =>
            push({ kind: "rejected", reason: (err && err.name) || String(err) })
          );
        }
      } else if (command.op === "stop") {
        audio.pause();
      } else if (command.op === "volume") {
        audio.volume = Math.min(1, Math.max(0, command.level));
      }
    },
    drain() {
      return queue.splice(0, queue.length);
    },
  };
  return { audio: true, toggle };
})();
"#;

const BRIDGE_DRAIN_JS: &str = r#"
return (function () {
  const bridge = window.__portfolioAudioBridge;
  return bridge ? bridge.drain() : [];
})();
"#;

#[derive(Debug, Default, Deserialize)]
struct BridgeStatus {
    audio: bool,
    toggle: bool,
}

/// One entry of the bridge's event queue.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum BridgeEvent {
    Play,
    Pause,
    Ended,
    Error {
        #[serde(default)]
        code: u16,
    },
    Rejected {
        #[serde(default)]
        reason: String,
    },
    Interaction {
        trigger: String,
    },
    Timeout,
}

fn bridge_command(command: serde_json::Value) {
    let payload = serde_json::to_string(&command).unwrap_or_else(|_| "{}".to_string());
    let script = format!(
        r#"(function () {{
            const bridge = window.__portfolioAudioBridge;
            if (!bridge) return false;
            bridge.apply({payload});
            return true;
        }})();"#
    );
    let _ = document::eval(&script);
}

async fn drain_bridge_events() -> Vec<BridgeEvent> {
    document::eval(BRIDGE_DRAIN_JS)
        .join::<Vec<BridgeEvent>>()
        .await
        .unwrap_or_default()
}

fn apply_bridge_event(
    controller: &mut AudioPlaybackController,
    latch: &OneShotLatch,
    event: BridgeEvent,
) {
    match event {
        BridgeEvent::Play => controller.handle_stream_event(StreamEvent::Started),
        BridgeEvent::Pause => controller.handle_stream_event(StreamEvent::Paused),
        BridgeEvent::Ended => controller.handle_stream_event(StreamEvent::Ended),
        BridgeEvent::Error { code } => {
            controller.handle_stream_event(StreamEvent::Error(media_error_message(code)))
        }
        BridgeEvent::Rejected { reason } => {
            controller.handle_stream_event(StreamEvent::StartRejected(reason))
        }
        BridgeEvent::Interaction { trigger } => {
            let Some(trigger) = InteractionTrigger::from_event_name(&trigger) else {
                debug!(%trigger, "ignoring unknown interaction");
                return;
            };
            if latch.fire() {
                controller.attempt_auto_start(trigger);
            }
        }
        BridgeEvent::Timeout => controller.attempt_auto_start(InteractionTrigger::Timeout),
    }
}

struct WebviewAudioBackend;

impl PlaybackBackend for WebviewAudioBackend {
    fn start(&mut self) {
        // A rejected start comes back through the event queue.
        bridge_command(serde_json::json!({ "op": "play" }));
    }

    fn stop(&mut self) {
        bridge_command(serde_json::json!({ "op": "stop" }));
    }

    fn set_volume(&mut self, level: f64) {
        bridge_command(serde_json::json!({ "op": "volume", "level": level.clamp(0.0, 1.0) }));
    }
}

/// Same generation scheme as the browser host, ticking on the desktop runtime.
struct WebviewFadeScheduler {
    generation: Rc<Cell<u64>>,
    slot: ControllerSlot,
}

impl FadeScheduler for WebviewFadeScheduler {
    fn begin(&mut self, interval: Duration) {
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);

        let current = self.generation.clone();
        let slot = self.slot.clone();
        spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
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

fn open_preferences() -> Box<dyn PreferenceStore> {
    match SqlitePreferenceStore::open_default() {
        Ok(store) => Box::new(store),
        Err(err) => {
            warn!(error = %err, "falling back to in-memory music preference");
            Box::new(MemoryPreferenceStore::default())
        }
    }
}

/// Binds the background music to the page rendered in the webview. Always returns a
/// controller; without both elements present it is a disabled no-op.
pub async fn initialize(
    settings: AudioSettings,
    toggle_state: Signal<ToggleState>,
) -> SharedController {
    let script = BRIDGE_BOOTSTRAP_JS
        .replace("__AUDIO_ID__", AUDIO_ELEMENT_ID)
        .replace("__TOGGLE_ID__", TOGGLE_ELEMENT_ID)
        .replace("__DELAY_MS__", &settings.autoplay_delay_ms.to_string());
    let status = document::eval(&script)
        .join::<BridgeStatus>()
        .await
        .unwrap_or_default();

    let slot = ControllerSlot::default();
    let backend = status
        .audio
        .then(|| Box::new(WebviewAudioBackend) as Box<dyn PlaybackBackend>);
    let toggle = status
        .toggle
        .then(|| Box::new(SignalToggleView::new(toggle_state)) as Box<dyn ToggleView>);
    let fades = Box::new(WebviewFadeScheduler {
        generation: Rc::new(Cell::new(0)),
        slot: slot.clone(),
    });

    let controller = Rc::new(RefCell::new(AudioPlaybackController::new(
        settings,
        backend,
        toggle,
        fades,
        open_preferences(),
    )));
    slot.attach(&controller);
    controller.borrow_mut().load_preference();

    if controller.borrow().is_enabled() {
        spawn(async move {
            let latch = OneShotLatch::new();
            loop {
                tokio::time::sleep(Duration::from_millis(BRIDGE_POLL_MS)).await;
                for event in drain_bridge_events().await {
                    slot.dispatch(|c| apply_bridge_event(c, &latch, event));
                }
            }
        });
    }

    controller
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{ManualFadeScheduler, ToggleAppearance, UNAVAILABLE_TITLE};

    #[derive(Default)]
    struct Seen {
        starts: usize,
        appearances: Vec<ToggleAppearance>,
        unavailable: Vec<String>,
    }

    struct SeenBackend(Rc<RefCell<Seen>>);
    struct SeenToggle(Rc<RefCell<Seen>>);

    impl PlaybackBackend for SeenBackend {
        fn start(&mut self) {
            self.0.borrow_mut().starts += 1;
        }
        fn stop(&mut self) {}
        fn set_volume(&mut self, _level: f64) {}
    }

    impl ToggleView for SeenToggle {
        fn render(&mut self, appearance: ToggleAppearance) {
            self.0.borrow_mut().appearances.push(appearance);
        }
        fn mark_unavailable(&mut self, title: &str) {
            self.0.borrow_mut().unavailable.push(title.to_string());
        }
    }

    fn controller(seen: &Rc<RefCell<Seen>>) -> AudioPlaybackController {
        AudioPlaybackController::new(
            AudioSettings::default(),
            Some(Box::new(SeenBackend(seen.clone()))),
            Some(Box::new(SeenToggle(seen.clone()))),
            Box::new(ManualFadeScheduler::default()),
            Box::new(MemoryPreferenceStore::default()),
        )
    }

    #[test]
    fn drained_queue_decodes() {
        let raw = r#"[
            {"kind":"play"},
            {"kind":"error","code":4},
            {"kind":"rejected","reason":"NotAllowedError"},
            {"kind":"interaction","trigger":"scroll"},
            {"kind":"timeout"}
        ]"#;
        let events: Vec<BridgeEvent> = serde_json::from_str(raw).unwrap();
        assert_eq!(
            events,
            vec![
                BridgeEvent::Play,
                BridgeEvent::Error { code: 4 },
                BridgeEvent::Rejected {
                    reason: "NotAllowedError".into()
                },
                BridgeEvent::Interaction {
                    trigger: "scroll".into()
                },
                BridgeEvent::Timeout,
            ]
        );

        let status: BridgeStatus = serde_json::from_str(r#"{"audio":true,"toggle":false}"#).unwrap();
        assert!(status.audio);
        assert!(!status.toggle);
    }

    #[test]
    fn interactions_and_timer_start_playback_once() {
        let seen = Rc::new(RefCell::new(Seen::default()));
        let mut controller = controller(&seen);
        let latch = OneShotLatch::new();

        for event in [
            BridgeEvent::Interaction {
                trigger: "wheel".into(),
            },
            BridgeEvent::Interaction {
                trigger: "pointermove".into(),
            },
            BridgeEvent::Interaction {
                trigger: "click".into(),
            },
            BridgeEvent::Timeout,
        ] {
            apply_bridge_event(&mut controller, &latch, event);
        }

        assert_eq!(seen.borrow().starts, 1);
        assert!(latch.has_fired());
        assert!(controller.state().has_started_once);
    }

    #[test]
    fn media_events_reach_the_toggle() {
        let seen = Rc::new(RefCell::new(Seen::default()));
        let mut controller = controller(&seen);
        let latch = OneShotLatch::new();

        apply_bridge_event(&mut controller, &latch, BridgeEvent::Play);
        assert_eq!(seen.borrow().appearances.last(), Some(&ToggleAppearance::Playing));

        apply_bridge_event(&mut controller, &latch, BridgeEvent::Pause);
        assert_eq!(seen.borrow().appearances.last(), Some(&ToggleAppearance::Idle));

        apply_bridge_event(&mut controller, &latch, BridgeEvent::Error { code: 4 });
        assert_eq!(seen.borrow().unavailable, vec![UNAVAILABLE_TITLE.to_string()]);
    }
}
