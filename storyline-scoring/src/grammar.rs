//! Grammar quality checking

/// Language-correctness check over article bodies
///
/// Pluggable so the scorer can be exercised with deterministic fakes and so a
/// heavier external checker can be swapped in without touching the scorer.
pub trait GrammarCheck: Send + Sync {
    /// Ratio of detected issues to word count, or `None` when the check
    /// cannot run (empty input, checker unavailable).
    fn issue_ratio(&self, text: &str) -> Option<f32>;
}

/// Mechanical issue counter, no external dependencies
///
/// Counts surface errors a copy editor would catch: doubled words, doubled
/// spaces, whitespace before punctuation, sentences starting in lowercase,
/// and unbalanced double quotes.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicGrammarCheck;

impl GrammarCheck for HeuristicGrammarCheck {
    fn issue_ratio(&self, text: &str) -> Option<f32> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return None;
        }

        let mut issues = 0usize;

        // Doubled words ("the the")
        for pair in words.windows(2) {
            let a: String = pair[0].chars().filter(|c| c.is_alphabetic()).collect();
            let b: String = pair[1].chars().filter(|c| c.is_alphabetic()).collect();
            if !a.is_empty() && a.eq_ignore_ascii_case(&b) {
                issues += 1;
            }
        }

        // Doubled spaces and whitespace before punctuation
        issues += text.matches("  ").count();
        issues += text.matches(" ,").count();
        issues += text.matches(" .").count();

        // Sentences starting in lowercase
        let mut expect_capital = true;
        for word in &words {
            if expect_capital {
                if let Some(first) = word.chars().next() {
                    if first.is_lowercase() {
                        issues += 1;
                    }
                }
            }
            expect_capital = word.ends_with('.') || word.ends_with('!') || word.ends_with('?');
        }

        // Unbalanced double quotes
        if text.matches('"').count() % 2 != 0 {
            issues += 1;
        }

        Some(issues as f32 / words.len() as f32)
    }
}
