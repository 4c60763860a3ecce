use dioxus::prelude::*;

use crate::components::{
    with_controller, Icon, SharedController, ToggleAppearance, TOGGLE_ELEMENT_ID,
};

/// What the toggle button shows. The controller writes it, the button renders it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToggleState {
    pub appearance: ToggleAppearance,
    /// Set after a stream error until the next appearance change.
    pub title_override: Option<String>,
}

impl ToggleState {
    pub fn title(&self) -> String {
        self.title_override
            .clone()
            .unwrap_or_else(|| self.appearance.title().to_string())
    }
}

#[component]
pub fn MusicToggle() -> Element {
    let state = use_context::<Signal<ToggleState>>();
    let controller = use_context::<Signal<Option<SharedController>>>();
    let current = state();
    let title = current.title();
    let class = format!("music-toggle {}", current.appearance.class());

    rsx! {
        button {
            id: TOGGLE_ELEMENT_ID,
            class: "{class}",
            title: "{title}",
            aria_label: "{title}",
            onclick: move |_| {
                let shared = controller.peek().as_ref().cloned();
                if let Some(shared) = shared {
                    with_controller(&shared, |c| c.toggle_music());
                }
            },
            Icon {
                name: current.appearance.icon_name().to_string(),
                class: "music-icon w-5 h-5".to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dioxus::core::VirtualDom;

    fn root() -> Element {
        let state = use_signal(|| ToggleState {
            appearance: ToggleAppearance::Muted,
            title_override: None,
        });
        let controller = use_signal(|| None::<SharedController>);
        use_context_provider(|| state);
        use_context_provider(|| controller);
        rsx! { MusicToggle {} }
    }

    #[test]
    fn toggle_reads_its_signals_from_context() {
        let mut dom = VirtualDom::new(root);
        dom.rebuild_in_place();
    }

    #[test]
    fn override_replaces_title_until_cleared() {
        let mut state = ToggleState::default();
        assert_eq!(state.title(), "Play Music");

        state.title_override = Some("Audio file not found".into());
        assert_eq!(state.title(), "Audio file not found");

        state = ToggleState {
            appearance: ToggleAppearance::Muted,
            title_override: None,
        };
        assert_eq!(state.title(), "Unmute Music");
    }
}
