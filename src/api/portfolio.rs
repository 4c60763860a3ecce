use super::models::PortfolioData;

#[cfg(target_arch = "wasm32")]
use once_cell::sync::Lazy;

#[cfg(target_arch = "wasm32")]
static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("request failed: {0}")]
    Http(String),
    #[error("HTTP error! status: {0}")]
    Status(u16),
    #[error("could not read data file: {0}")]
    Read(String),
    #[error("invalid portfolio data: {0}")]
    Decode(String),
}

/// Append a `t=<millis>` query so browsers never serve a stale data file.
pub fn cache_busted_url(base: &str, millis: i64) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}t={millis}")
}

pub fn parse_portfolio(body: &str) -> Result<PortfolioData, LoadError> {
    serde_json::from_str(body).map_err(|e| LoadError::Decode(e.to_string()))
}

#[cfg(target_arch = "wasm32")]
fn absolute_url(path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let origin = web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default();
    format!("{}/{}", origin.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(target_arch = "wasm32")]
pub async fn load_portfolio(data_url: &str) -> Result<PortfolioData, LoadError> {
    let url = cache_busted_url(
        &absolute_url(data_url),
        chrono::Utc::now().timestamp_millis(),
    );

    let response = HTTP_CLIENT
        .get(&url)
        .send()
        .await
        .map_err(|e| LoadError::Http(e.to_string()))?;
    if !response.status().is_success() {
        return Err(LoadError::Status(response.status().as_u16()));
    }

    let body = response
        .text()
        .await
        .map_err(|e| LoadError::Http(e.to_string()))?;
    tracing::debug!(%url, "portfolio data fetched");
    parse_portfolio(&body)
}

/// Desktop preview builds read the bundled file from the public directory.
#[cfg(not(target_arch = "wasm32"))]
pub async fn load_portfolio(data_url: &str) -> Result<PortfolioData, LoadError> {
    let path = std::path::Path::new("public").join(data_url.trim_start_matches('/'));
    let body = std::fs::read_to_string(&path)
        .map_err(|e| LoadError::Read(format!("{}: {e}", path.display())))?;
    parse_portfolio(&body)
}
