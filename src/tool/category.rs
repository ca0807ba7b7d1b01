//! Keyword-overlap category scoring.

use tracing::instrument;

use super::Category;

/// Per-category keyword lists, in category enumeration order.
///
/// Keywords are matched as lower-case substrings of the combined name and
/// description.
pub const CATEGORY_KEYWORDS: [(Category, &[&str]); 18] = [
    (Category::Chat, &["chatbot", "conversation", "assistant", "chat", "ai chat"]),
    (
        Category::Image,
        &["image", "photo", "picture", "art", "visual", "illustration", "graphics"],
    ),
    (Category::Video, &["video", "film", "movie", "animation", "clips"]),
    (Category::Audio, &["audio", "voice", "music", "sound", "speech", "podcast"]),
    (Category::Code, &["code", "coding", "programming", "developer", "github"]),
    (
        Category::Writing,
        &["writing", "content", "blog", "article", "copywriting", "text"],
    ),
    (
        Category::Productivity,
        &["productivity", "task", "organize", "workflow", "efficiency"],
    ),
    (Category::Research, &["research", "analysis", "data", "insights", "study"]),
    (Category::Design, &["design", "ui", "ux", "prototype", "mockup", "creative"]),
    (Category::Dating, &["dating", "relationship", "match", "romance"]),
    (
        Category::Health,
        &["health", "fitness", "medical", "wellness", "healthcare"],
    ),
    (
        Category::Education,
        &["education", "learning", "teaching", "training", "course"],
    ),
    (Category::Gaming, &["gaming", "game", "esports", "entertainment"]),
    (
        Category::Finance,
        &["finance", "trading", "investment", "accounting", "money"],
    ),
    (Category::Travel, &["travel", "trip", "booking", "tourism", "hotel"]),
    (
        Category::CustomerService,
        &["customer service", "support", "help desk", "crm"],
    ),
    (Category::Directory, &["directory", "catalog", "marketplace", "platform"]),
    (
        Category::Enterprise,
        &["enterprise", "business", "corporate", "b2b", "saas"],
    ),
];

/// Picks the category whose keyword list best overlaps `name` + `description`.
///
/// The highest non-zero hit count wins; ties keep the category that comes
/// first in enumeration order; zero hits yields [`Category::Productivity`].
#[must_use]
#[instrument(level = "trace", skip(description))]
pub fn determine_category(name: &str, description: &str) -> Category {
    let text = format!("{name} {description}").to_lowercase();

    let mut best = Category::Productivity;
    let mut highest = 0usize;
    for (category, keywords) in CATEGORY_KEYWORDS {
        let score = keywords
            .iter()
            .filter(|keyword| text.contains(*keyword))
            .count();
        if score > highest {
            highest = score;
            best = category;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_table_follows_enumeration_order() {
        let table_order: Vec<Category> = CATEGORY_KEYWORDS.iter().map(|(c, _)| *c).collect();
        assert_eq!(table_order, Category::ALL.to_vec());
    }

    #[test]
    fn test_determine_category_picks_highest_score() {
        let category = determine_category("PixelMuse", "Turn a photo into an illustration");
        assert_eq!(category, Category::Image);
    }

    #[test]
    fn test_determine_category_zero_hits_defaults_to_productivity() {
        assert_eq!(determine_category("Zyx", "qwerty"), Category::Productivity);
    }

    #[test]
    fn test_determine_category_tie_keeps_first_in_order() {
        // one chat hit ("chat") and one video hit ("video")
        let category = determine_category("Chat", "video");
        assert_eq!(category, Category::Chat);
    }

    #[test]
    fn test_determine_category_is_case_insensitive() {
        assert_eq!(
            determine_category("TRAVEL Planner", "Book a HOTEL"),
            Category::Travel
        );
    }
}
