use crate::api::{load_portfolio, PortfolioData};
use crate::components::{
    initialize, CertificationsSection, EducationSection, ExperienceSection, LoadingScreen,
    MusicToggle, ProjectsSection, SharedController, ToggleState, AUDIO_ELEMENT_ID,
};
use crate::db::AudioSettings;
use crate::utils::sleep_ms;
use dioxus::prelude::*;

const NAV_LINKS: [(&str, &str); 4] = [
    ("#education", "Education"),
    ("#certifications", "Certifications"),
    ("#projects", "Projects"),
    ("#experience", "Experience"),
];

/// Composition root: owns the audio controller and the page content.
#[component]
pub fn AppShell() -> Element {
    let settings = use_hook(|| AudioSettings::default().normalized());
    let toggle_state = use_signal(ToggleState::default);
    let mut controller = use_signal(|| None::<SharedController>);
    let mut portfolio = use_signal(PortfolioData::default);
    let mut loading_visible = use_signal(|| true);

    use_context_provider(|| toggle_state);
    use_context_provider(|| controller);

    // Bind the background music once the audio element and toggle are mounted
    let audio_settings = settings.clone();
    use_effect(move || {
        if controller.peek().is_some() {
            return;
        }
        let audio_settings = audio_settings.clone();
        spawn(async move {
            let shared = initialize(audio_settings, toggle_state).await;
            controller.set(Some(shared));
        });
    });

    // Load portfolio content
    let data_url = settings.data_url.clone();
    use_effect(move || {
        let data_url = data_url.clone();
        spawn(async move {
            match load_portfolio(&data_url).await {
                Ok(data) => {
                    tracing::info!(
                        education = data.education.len(),
                        certifications = data.certifications.len(),
                        projects = data.projects.len(),
                        experience = data.experience.len(),
                        "portfolio data loaded"
                    );
                    portfolio.set(data);
                }
                Err(err) => tracing::error!(error = %err, "failed to load portfolio data"),
            }
        });
    });

    // Hide the loading screen after a short delay
    let loading_ms = settings.loading_screen_ms;
    use_effect(move || {
        spawn(async move {
            sleep_ms(loading_ms).await;
            loading_visible.set(false);
        });
    });

    let data = portfolio();

    rsx! {
        LoadingScreen { visible: loading_visible() }

        nav { class: "navbar",
            a { class: "nav-brand", href: "#hero", "Portfolio" }
            div { class: "nav-links",
                for (href, label) in NAV_LINKS {
                    a { key: "{href}", class: "nav-link", href: "{href}", "{label}" }
                }
            }
            MusicToggle {}
        }

        main { class: "page-shell",
            section { id: "hero", class: "hero",
                h1 { class: "hero-title", "Hello, world." }
                p { class: "hero-subtitle", "Engineer. Builder. Occasional DJ." }
            }

            EducationSection { items: data.education.clone() }
            CertificationsSection { items: data.certifications.clone() }
            ProjectsSection { items: data.projects.clone() }
            ExperienceSection { items: data.experience.clone() }
        }

        footer { class: "footer", "Built with Rust and Dioxus." }

        audio {
            id: AUDIO_ELEMENT_ID,
            src: "{settings.source_url}",
            preload: "auto",
            r#loop: true,
        }
    }
}
