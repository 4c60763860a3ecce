use dioxus::prelude::*;

mod api;
mod components;
mod db;
mod utils;

use components::AppShell;

const MAIN_CSS: Asset = asset!("/assets/styling/main.css");

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Title { "Portfolio" }
        document::Meta { name: "theme-color", content: "#050810" }
        document::Meta { name: "viewport", content: "width=device-width, initial-scale=1" }

        document::Stylesheet { href: MAIN_CSS }

        AppShell {}
    }
}
