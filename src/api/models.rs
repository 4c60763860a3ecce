use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Contents of the static portfolio data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PortfolioData {
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub experience: Vec<Experience>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Education {
    pub qualification: String,
    pub institution: String,
    #[serde(default, alias = "startDate")]
    pub start_date: String,
    #[serde(default, alias = "endDate")]
    pub end_date: String,
    #[serde(default)]
    pub icon: Option<String>,
}

impl Education {
    pub fn icon(&self) -> &str {
        self.icon
            .as_deref()
            .filter(|icon| !icon.trim().is_empty())
            .unwrap_or("🎓")
    }

    /// "2019 - 2023", keeping the raw text for dates that do not parse.
    pub fn year_span(&self) -> String {
        format!(
            "{} - {}",
            year_label(&self.start_date),
            year_label(&self.end_date)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Certification {
    pub name: String,
    pub issuer: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl Certification {
    pub fn icon(&self) -> &str {
        if self.icon.trim().is_empty() {
            "📜"
        } else {
            &self.icon
        }
    }

    pub fn link(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Project {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Experience {
    pub position: String,
    pub company: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub description: String,
}

/// Year of an ISO-like date: `YYYY-MM-DD`, `YYYY-MM` or `YYYY`.
pub fn year_of(date: &str) -> Option<i32> {
    let date = date.trim();
    if let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return Some(parsed.year());
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(&format!("{date}-01"), "%Y-%m-%d") {
        return Some(parsed.year());
    }
    if date.len() == 4 {
        return date.parse().ok();
    }
    None
}

fn year_label(date: &str) -> String {
    year_of(date)
        .map(|year| year.to_string())
        .unwrap_or_else(|| date.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "education": [
            {
                "qualification": "BSc Computer Science",
                "institution": "State University",
                "startDate": "2018-09-01",
                "endDate": "2022-06"
            }
        ],
        "certifications": [
            { "name": "Cloud Practitioner", "issuer": "AWS", "date": "2023", "icon": "☁️", "url": "https://example.com/cert" },
            { "name": "Scrum Basics", "issuer": "Scrum.org", "date": "2021", "icon": "" }
        ],
        "projects": [
            { "title": "Synth", "description": "A tiny synthesizer", "link": "https://example.com/synth" }
        ]
    }"#;

    #[test]
    fn parses_camel_case_dates_and_missing_sections() {
        let data: PortfolioData = serde_json::from_str(FIXTURE).unwrap();
        assert_eq!(data.education[0].start_date, "2018-09-01");
        assert_eq!(data.education[0].year_span(), "2018 - 2022");
        assert_eq!(data.education[0].icon(), "🎓");
        assert_eq!(data.certifications.len(), 2);
        assert!(data.experience.is_empty());
    }

    #[test]
    fn certification_fallbacks() {
        let data: PortfolioData = serde_json::from_str(FIXTURE).unwrap();
        assert_eq!(data.certifications[0].link(), Some("https://example.com/cert"));
        assert_eq!(data.certifications[1].link(), None);
        assert_eq!(data.certifications[1].icon(), "📜");
    }

    #[test]
    fn year_of_accepts_partial_dates() {
        assert_eq!(year_of("2020-02-29"), Some(2020));
        assert_eq!(year_of("2021-07"), Some(2021));
        assert_eq!(year_of(" 2019 "), Some(2019));
        assert_eq!(year_of("Present"), None);
    }

    #[test]
    fn unparsable_dates_keep_their_text() {
        let edu = Education {
            start_date: "2020".into(),
            end_date: "Present".into(),
            ..Education::default()
        };
        assert_eq!(edu.year_span(), "2020 - Present");
    }
}
