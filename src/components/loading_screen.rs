use dioxus::prelude::*;

#[component]
pub fn LoadingScreen(visible: bool) -> Element {
    let style = if visible {
        "opacity: 1;"
    } else {
        "opacity: 0; pointer-events: none;"
    };

    rsx! {
        div { id: "loading-screen", class: "loading-screen", style: "{style}",
            div { class: "loader-ring" }
            p { class: "loader-text", "Loading portfolio..." }
        }
    }
}
