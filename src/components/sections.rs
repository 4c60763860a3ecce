//! Content sections filled from the portfolio data file.

use dioxus::prelude::*;

use crate::api::{Certification, Education, Experience, Project};
use crate::components::Icon;
use crate::utils::slugify;

const EDUCATION_STAGGER_SECS: f64 = 0.2;
const CERTIFICATION_STAGGER_SECS: f64 = 0.15;

/// Entrance animation for the card at `index`, delayed so cards cascade in.
pub fn stagger_style(index: usize, step_secs: f64) -> String {
    format!(
        "animation: slideUpFade 0.8s ease-out {:.2}s backwards;",
        index as f64 * step_secs
    )
}

#[component]
fn Section(title: String, children: Element) -> Element {
    let anchor = slugify(&title);
    rsx! {
        section { id: "{anchor}", class: "section",
            h2 { class: "section-title", "{title}" }
            {children}
        }
    }
}

#[component]
pub fn EducationSection(items: Vec<Education>) -> Element {
    rsx! {
        Section { title: "Education".to_string(),
            div { id: "education-container", class: "edu-grid",
                for (index, edu) in items.iter().enumerate() {
                    div {
                        key: "{index}",
                        class: "edu-card",
                        style: stagger_style(index, EDUCATION_STAGGER_SECS),
                        div { class: "edu-icon", {edu.icon()} }
                        h4 { "{edu.qualification}" }
                        p { class: "edu-institution", "{edu.institution}" }
                        span { class: "edu-year", {edu.year_span()} }
                    }
                }
            }
        }
    }
}

#[component]
pub fn CertificationsSection(items: Vec<Certification>) -> Element {
    rsx! {
        Section { title: "Certifications".to_string(),
            div { id: "certifications-container", class: "edu-grid",
                for (index, cert) in items.iter().enumerate() {
                    if let Some(url) = cert.link() {
                        a {
                            key: "{index}",
                            class: "edu-card edu-card-link",
                            href: "{url}",
                            target: "_blank",
                            rel: "noopener noreferrer",
                            style: stagger_style(index, CERTIFICATION_STAGGER_SECS),
                            div { class: "edu-icon", {cert.icon()} }
                            h4 { "{cert.name}" }
                            p { class: "edu-institution", "{cert.issuer}" }
                            span { class: "edu-year", "{cert.date}" }
                        }
                    } else {
                        div {
                            key: "{index}",
                            class: "edu-card",
                            style: stagger_style(index, CERTIFICATION_STAGGER_SECS),
                            div { class: "edu-icon", {cert.icon()} }
                            h4 { "{cert.name}" }
                            p { class: "edu-institution", "{cert.issuer}" }
                            span { class: "edu-year", "{cert.date}" }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn ProjectsSection(items: Vec<Project>) -> Element {
    rsx! {
        Section { title: "Projects".to_string(),
            div { id: "projects-gallery", class: "projects-grid",
                for (index, project) in items.iter().enumerate() {
                    div { key: "{index}", class: "project-card",
                        h3 { "{project.title}" }
                        p { "{project.description}" }
                        if let Some(link) = project.link.as_ref() {
                            a {
                                class: "project-link",
                                href: "{link}",
                                target: "_blank",
                                rel: "noopener noreferrer",
                                "View Project"
                                Icon {
                                    name: "external-link".to_string(),
                                    class: "w-4 h-4".to_string(),
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn ExperienceSection(items: Vec<Experience>) -> Element {
    rsx! {
        Section { title: "Experience".to_string(),
            div { id: "experience-timeline", class: "timeline",
                for (index, job) in items.iter().enumerate() {
                    div { key: "{index}", class: "experience-entry timeline-content",
                        Icon {
                            name: "briefcase".to_string(),
                            class: "timeline-icon w-5 h-5".to_string(),
                        }
                        h4 { "{job.position} at {job.company}" }
                        p { class: "timeline-duration", "{job.duration}" }
                        p { "{job.description}" }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::stagger_style;

    #[test]
    fn stagger_grows_with_index() {
        assert!(stagger_style(0, 0.2).contains(" 0.00s "));
        assert!(stagger_style(2, 0.15).contains(" 0.30s "));
        assert!(stagger_style(3, 0.2).contains(" 0.60s "));
    }
}
