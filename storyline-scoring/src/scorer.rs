//! The additive credibility point system

use serde::{Deserialize, Serialize};
use tracing::debug;

use storyline_core::CredibilityLabel;

use crate::grammar::GrammarCheck;
use crate::patterns::{AdDetector, ClickbaitDetector};
use crate::trust::{TrustLevel, TrustTable};

/// Issue ratio below which content earns the grammar bonus
const GRAMMAR_BONUS_THRESHOLD: f32 = 0.05;

/// Content length above which the richness bonus applies
const RICH_CONTENT_CHARS: usize = 500;

/// Article fields the scorer reads
#[derive(Debug, Clone, Copy)]
pub struct ScoreInput<'a> {
    pub url: &'a str,
    pub title: &'a str,
    pub content: &'a str,
    pub description: &'a str,
    pub author: Option<&'a str>,
    pub image: Option<&'a str>,
}

/// Result of scoring one article
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CredibilityAssessment {
    pub score: u8,
    pub label: CredibilityLabel,
    pub is_clickbait: bool,
    pub is_ad: bool,
}

/// Score an article's trustworthiness
///
/// Additive points clamped to [0, 100]:
/// domain trust +40/+20, grammar under 5% issues +15, non-clickbait title
/// +10, ad -10 / non-ad +5, author/image/description +5 each, body over 500
/// chars +10. Deterministic and infallible: sub-checks that cannot run
/// contribute zero.
pub fn assess(
    input: &ScoreInput<'_>,
    trust: &TrustTable,
    clickbait: &ClickbaitDetector,
    ads: &AdDetector,
    grammar: &dyn GrammarCheck,
) -> CredibilityAssessment {
    let mut score: i32 = 0;

    match trust.level_for_url(input.url) {
        Some(TrustLevel::High) => score += 40,
        Some(TrustLevel::Medium) => score += 20,
        None => {}
    }

    if let Some(ratio) = grammar.issue_ratio(input.content) {
        if ratio < GRAMMAR_BONUS_THRESHOLD {
            score += 15;
        }
    }

    let is_clickbait = clickbait.is_clickbait(input.title);
    let is_ad = ads.is_ad(input.title, input.content);

    if !is_clickbait {
        score += 10;
    }
    if is_ad {
        score -= 10;
    } else {
        score += 5;
    }

    if input.author.is_some_and(|a| !a.is_empty()) {
        score += 5;
    }
    if input.image.is_some_and(|i| !i.is_empty()) {
        score += 5;
    }
    if !input.description.is_empty() {
        score += 5;
    }
    if input.content.len() > RICH_CONTENT_CHARS {
        score += 10;
    }

    let score = score.clamp(0, 100) as u8;
    let label = CredibilityLabel::from_score(score);
    debug!(score, %label, is_clickbait, is_ad, "scored article");

    CredibilityAssessment {
        score,
        label,
        is_clickbait,
        is_ad,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedGrammar(Option<f32>);

    impl GrammarCheck for FixedGrammar {
        fn issue_ratio(&self, _text: &str) -> Option<f32> {
            self.0
        }
    }

    fn defaults() -> (TrustTable, ClickbaitDetector, AdDetector) {
        (
            TrustTable::default(),
            ClickbaitDetector::default(),
            AdDetector::default(),
        )
    }

    fn long_body() -> String {
        "The negotiations continued into the evening. ".repeat(15)
    }

    #[test]
    fn test_maximum_signals() {
        let (trust, cb, ads) = defaults();
        let body = long_body();
        let input = ScoreInput {
            url: "https://www.reuters.com/world/summit",
            title: "Summit ends with joint declaration",
            content: &body,
            description: "Leaders signed a joint declaration.",
            author: Some("Jane Smith"),
            image: Some("https://reuters.com/img.jpg"),
        };
        let result = assess(&input, &trust, &cb, &ads, &FixedGrammar(Some(0.0)));
        // 40 + 15 + 10 + 5 + 5 + 5 + 5 + 10
        assert_eq!(result.score, 95);
        assert_eq!(result.label, CredibilityLabel::High);
        assert!(!result.is_clickbait);
        assert!(!result.is_ad);
    }

    #[test]
    fn test_score_never_negative() {
        let (trust, cb, ads) = defaults();
        let input = ScoreInput {
            url: "https://spam-site.biz/x",
            title: "You won't believe this shocking deal!!",
            content: "Use promo code SAVE20 now",
            description: "",
            author: None,
            image: None,
        };
        let result = assess(&input, &trust, &cb, &ads, &FixedGrammar(Some(0.5)));
        assert!(result.score <= 100);
        assert!(result.is_clickbait);
        assert!(result.is_ad);
        assert_eq!(result.label, CredibilityLabel::Low);
    }

    #[test]
    fn test_unavailable_grammar_contributes_zero() {
        let (trust, cb, ads) = defaults();
        let input = ScoreInput {
            url: "https://www.reuters.com/a",
            title: "Plain headline",
            content: "",
            description: "",
            author: None,
            image: None,
        };
        let with = assess(&input, &trust, &cb, &ads, &FixedGrammar(Some(0.0)));
        let without = assess(&input, &trust, &cb, &ads, &FixedGrammar(None));
        assert_eq!(with.score - without.score, 15);
    }

    #[test]
    fn test_label_matches_score_buckets() {
        // Exercise each bucket through real inputs rather than the mapping alone
        let (trust, cb, ads) = defaults();
        let body = long_body();
        let high = ScoreInput {
            url: "https://apnews.com/article",
            title: "Plain report",
            content: &body,
            description: "Summary.",
            author: Some("A"),
            image: Some("i"),
        };
        let result = assess(&high, &trust, &cb, &ads, &FixedGrammar(Some(0.0)));
        assert!(result.score >= 80);
        assert_eq!(result.label, CredibilityLabel::High);

        let unrated = ScoreInput {
            url: "https://smallblog.example/post",
            title: "Plain report",
            content: &body,
            description: "Summary.",
            author: None,
            image: None,
        };
        let result = assess(&unrated, &trust, &cb, &ads, &FixedGrammar(Some(0.0)));
        // 0 + 15 + 10 + 5 + 5 + 10 = 45
        assert_eq!(result.score, 45);
        assert_eq!(result.label, CredibilityLabel::Low);
    }

    #[test]
    fn test_ad_penalty() {
        let (trust, cb, ads) = defaults();
        let clean = ScoreInput {
            url: "https://x.example/a",
            title: "Report",
            content: "Nothing promotional here",
            description: "",
            author: None,
            image: None,
        };
        let promo = ScoreInput {
            content: "Limited-time offer inside",
            ..clean
        };
        let clean_score = assess(&clean, &trust, &cb, &ads, &FixedGrammar(None)).score;
        let promo_score = assess(&promo, &trust, &cb, &ads, &FixedGrammar(None)).score;
        // +5 swings to -10
        assert_eq!(clean_score as i32 - promo_score as i32, 15);
    }
}
