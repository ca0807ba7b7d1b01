//! The directory entry model.
//!
//! A [`Tool`] is the only persisted entity. Records are read leniently
//! (unknown categories are re-scored, unknown pricing tiers fall back to
//! freemium) and written back with the same JSON field names the directory
//! front-end consumes.

mod category;
mod popularity;

pub use category::{CATEGORY_KEYWORDS, determine_category};
pub use popularity::{DEFAULT_POPULARITY, calculate_popularity};

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Fixed set of directory categories, in enumeration order.
///
/// Enumeration order matters: the keyword scorer keeps the first category on
/// ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Chat,
    Image,
    Video,
    Audio,
    Code,
    Writing,
    Productivity,
    Research,
    Design,
    Dating,
    Health,
    Education,
    Gaming,
    Finance,
    Travel,
    CustomerService,
    Directory,
    Enterprise,
}

impl Category {
    /// All categories in enumeration order.
    pub const ALL: [Category; 18] = [
        Category::Chat,
        Category::Image,
        Category::Video,
        Category::Audio,
        Category::Code,
        Category::Writing,
        Category::Productivity,
        Category::Research,
        Category::Design,
        Category::Dating,
        Category::Health,
        Category::Education,
        Category::Gaming,
        Category::Finance,
        Category::Travel,
        Category::CustomerService,
        Category::Directory,
        Category::Enterprise,
    ];

    /// Returns the stable kebab-case label used in the JSON file.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Code => "code",
            Self::Writing => "writing",
            Self::Productivity => "productivity",
            Self::Research => "research",
            Self::Design => "design",
            Self::Dating => "dating",
            Self::Health => "health",
            Self::Education => "education",
            Self::Gaming => "gaming",
            Self::Finance => "finance",
            Self::Travel => "travel",
            Self::CustomerService => "customer-service",
            Self::Directory => "directory",
            Self::Enterprise => "enterprise",
        }
    }

    /// Fallback emoji shown when a tool has no logo.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Chat => "💬",
            Self::Image | Self::Design => "🎨",
            Self::Video => "🎬",
            Self::Audio => "🎵",
            Self::Code => "💻",
            Self::Writing => "✍️",
            Self::Productivity => "⚡",
            Self::Research => "🔬",
            Self::Dating => "❤️",
            Self::Health => "🏥",
            Self::Education => "📚",
            Self::Gaming => "🎮",
            Self::Finance => "💰",
            Self::Travel => "✈️",
            Self::CustomerService => "📞",
            Self::Directory => "📂",
            Self::Enterprise => "🏢",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == wanted)
            .ok_or_else(|| format!("unknown category '{value}'"))
    }
}

/// Pricing tier of a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pricing {
    Free,
    Freemium,
    Paid,
}

impl Pricing {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Freemium => "freemium",
            Self::Paid => "paid",
        }
    }
}

impl fmt::Display for Pricing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pricing {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "freemium" => Ok(Self::Freemium),
            "paid" => Ok(Self::Paid),
            _ => Err(format!("unknown pricing tier '{value}'")),
        }
    }
}

/// A single directory entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredTool", rename_all = "camelCase")]
pub struct Tool {
    pub name: String,
    pub category: Category,
    pub description: String,
    /// Emoji shown next to the name. Filled from the category only when the
    /// stored record has no `icon` key; a stored empty string is kept.
    pub icon: String,
    pub logo: String,
    pub pricing: Pricing,
    pub url: String,
    pub features: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popularity: Option<u8>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_iso_millis"
    )]
    pub date_added: Option<DateTime<Utc>>,
    /// Keys this crate does not model (for example `sponsored`), written back
    /// unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Writes timestamps as `YYYY-MM-DDTHH:MM:SS.mmmZ`, the format the front-end reads.
fn serialize_iso_millis<S: serde::Serializer>(
    value: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(stamp) => {
            serializer.serialize_str(&stamp.to_rfc3339_opts(SecondsFormat::Millis, true))
        }
        None => serializer.serialize_none(),
    }
}

impl Tool {
    /// Creates a tool with the category icon, no logo, popularity or date.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        category: Category,
        description: impl Into<String>,
        pricing: Pricing,
        url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            description: description.into(),
            icon: category.icon().to_string(),
            logo: String::new(),
            pricing,
            url: url.into(),
            features: Vec::new(),
            popularity: None,
            date_added: None,
            extra: Map::new(),
        }
    }

    /// Builder-style feature list setter.
    #[must_use]
    pub fn with_features(mut self, features: Vec<String>) -> Self {
        self.features = features;
        self
    }

    /// Whether this tool still carries the "unknown" popularity.
    #[must_use]
    pub fn needs_popularity(&self) -> bool {
        self.popularity.is_none_or(|score| score == DEFAULT_POPULARITY)
    }
}

/// On-disk shape accepted when reading the tools file.
///
/// Category and pricing are kept as strings so a single unrecognized value
/// does not make the whole file unreadable.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTool {
    name: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    logo: String,
    #[serde(default)]
    pricing: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    features: Vec<String>,
    #[serde(default)]
    popularity: Option<u8>,
    #[serde(default)]
    date_added: Option<DateTime<Utc>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<StoredTool> for Tool {
    fn from(stored: StoredTool) -> Self {
        let category = stored.category.parse().unwrap_or_else(|_| {
            let scored = determine_category(&stored.name, &stored.description);
            debug!(
                tool = %stored.name,
                stored = %stored.category,
                assigned = %scored,
                "Unrecognized category, reassigned by keyword score"
            );
            scored
        });
        let pricing = stored.pricing.parse().unwrap_or_else(|_| {
            debug!(
                tool = %stored.name,
                stored = %stored.pricing,
                "Unrecognized pricing, using freemium"
            );
            Pricing::Freemium
        });
        let icon = stored.icon.unwrap_or_else(|| category.icon().to_string());

        Self {
            name: stored.name,
            category,
            description: stored.description,
            icon,
            logo: stored.logo,
            pricing,
            url: stored.url,
            features: stored.features,
            popularity: stored.popularity,
            date_added: stored.date_added,
            extra: stored.extra,
        }
    }
}
