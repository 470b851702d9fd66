//! Clickbait and advertisement pattern sets

use regex::RegexSet;

/// Sensational title patterns, checked against the title alone
const CLICKBAIT_PATTERNS: &[&str] = &[
    r"(?i)you won'?t believe",
    r"(?i)\bshocking\b",
    r"(?i)\bjaw[ -]dropping\b",
    r"(?i)what happen(s|ed) next",
    r"(?i)\bthis one (weird )?trick\b",
    r"(?i)\bdoctors hate\b",
    r"(?i)\bgo(es)? viral\b",
    r"(?i)\bmind[ -]blowing\b",
    r"(?i)\bnumber \d+ will\b",
    r"(?i)\byou need to (see|know|watch)\b",
    r"(?i)\bthe truth about\b",
    r"(?i)\bwill leave you\b",
    r"!{2,}",
    r"(?i)\btop \d+ (reasons|ways|things)\b",
];

/// Promotional/affiliate patterns, checked against title and content together
const AD_PATTERNS: &[&str] = &[
    r"(?i)\bsponsored\b",
    r"(?i)\badvertis(ement|ing|orial)\b",
    r"(?i)\baffiliate (link|commission)s?\b",
    r"(?i)\bpromo code\b",
    r"(?i)\bdiscount code\b",
    r"(?i)\buse code [A-Z0-9]+\b",
    r"(?i)\bbuy now\b",
    r"(?i)\bshop (now|the sale)\b",
    r"(?i)\blimited[ -]time offer\b",
    r"(?i)\bpartner content\b",
    r"(?i)\bpaid partnership\b",
    r"(?i)\bexclusive deal\b",
    r"(?i)\b\d+% off\b",
];

/// Matches article titles against the sensational pattern set
#[derive(Debug, Clone)]
pub struct ClickbaitDetector {
    set: RegexSet,
}

impl ClickbaitDetector {
    pub fn is_clickbait(&self, title: &str) -> bool {
        self.set.is_match(title)
    }
}

impl Default for ClickbaitDetector {
    fn default() -> Self {
        // The pattern list is fixed and known-valid
        Self {
            set: RegexSet::new(CLICKBAIT_PATTERNS).unwrap(),
        }
    }
}

/// Matches title+content against the promotional pattern set
#[derive(Debug, Clone)]
pub struct AdDetector {
    set: RegexSet,
}

impl AdDetector {
    pub fn is_ad(&self, title: &str, content: &str) -> bool {
        self.set.is_match(title) || self.set.is_match(content)
    }
}

impl Default for AdDetector {
    fn default() -> Self {
        Self {
            set: RegexSet::new(AD_PATTERNS).unwrap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clickbait_titles() {
        let detector = ClickbaitDetector::default();
        assert!(detector.is_clickbait("You Won't Believe What The Senator Said"));
        assert!(detector.is_clickbait("SHOCKING footage from the summit"));
        assert!(detector.is_clickbait("Top 10 reasons the deal collapsed"));
        assert!(!detector.is_clickbait("Parliament approves the 2026 budget"));
    }

    #[test]
    fn test_ad_content() {
        let detector = AdDetector::default();
        assert!(detector.is_ad("Great headphones", "Use promo code SAVE20 at checkout"));
        assert!(detector.is_ad("Sponsored: our favorite luggage", ""));
        assert!(!detector.is_ad("Central bank holds rates", "The decision was unanimous."));
    }

    #[test]
    fn test_case_insensitive() {
        let detector = ClickbaitDetector::default();
        assert!(detector.is_clickbait("you won't believe this"));
        assert!(detector.is_clickbait("YOU WON'T BELIEVE THIS"));
    }
}
