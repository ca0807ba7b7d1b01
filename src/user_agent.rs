//! Shared User-Agent string for outbound API and probe requests.

/// Project URL appended to the User-Agent.
const PROJECT_UA_URL: &str = "https://github.com/fierce/tooldex";

/// User-Agent sent by every outbound client.
#[must_use]
pub(crate) fn default_api_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("tooldex/{version} (directory-maintenance; +{PROJECT_UA_URL})")
}
