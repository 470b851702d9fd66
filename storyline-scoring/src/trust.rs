//! Curated source reputation table

use std::collections::HashMap;

/// Reputation tier of a news domain
///
/// Domains absent from the table are unrated and score neutrally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustLevel {
    High,
    Medium,
}

/// Mapping from registrable domain to reputation tier
#[derive(Debug, Clone)]
pub struct TrustTable {
    domains: HashMap<String, TrustLevel>,
}

impl TrustTable {
    /// Build a table from explicit entries
    pub fn from_entries(entries: &[(&str, TrustLevel)]) -> Self {
        Self {
            domains: entries
                .iter()
                .map(|(d, l)| (d.to_string(), *l))
                .collect(),
        }
    }

    /// Look up the trust level for an article URL
    ///
    /// Matches the URL host against the table, dropping subdomain labels one
    /// at a time so `edition.cnn.com` resolves to the `cnn.com` entry.
    pub fn level_for_url(&self, url: &str) -> Option<TrustLevel> {
        let parsed = url::Url::parse(url).ok()?;
        let host = parsed.host_str()?;
        let host = host.strip_prefix("www.").unwrap_or(host);

        let mut candidate = host;
        loop {
            if let Some(level) = self.domains.get(candidate) {
                return Some(*level);
            }
            match candidate.split_once('.') {
                // Stop once only the registrable suffix would remain
                Some((_, rest)) if rest.contains('.') => candidate = rest,
                _ => return None,
            }
        }
    }
}

impl Default for TrustTable {
    /// Curated defaults: wire services and top-tier papers rate high,
    /// established broadcast and online outlets rate medium.
    fn default() -> Self {
        Self::from_entries(&[
            // Wire services
            ("reuters.com", TrustLevel::High),
            ("apnews.com", TrustLevel::High),
            ("afp.com", TrustLevel::High),
            // Top-tier newspapers
            ("nytimes.com", TrustLevel::High),
            ("washingtonpost.com", TrustLevel::High),
            ("wsj.com", TrustLevel::High),
            ("ft.com", TrustLevel::High),
            ("economist.com", TrustLevel::High),
            ("theguardian.com", TrustLevel::High),
            ("bbc.com", TrustLevel::High),
            ("bbc.co.uk", TrustLevel::High),
            ("npr.org", TrustLevel::High),
            ("nature.com", TrustLevel::High),
            // Broadcast and quality online news
            ("cnn.com", TrustLevel::Medium),
            ("nbcnews.com", TrustLevel::Medium),
            ("cbsnews.com", TrustLevel::Medium),
            ("abcnews.go.com", TrustLevel::Medium),
            ("aljazeera.com", TrustLevel::Medium),
            ("dw.com", TrustLevel::Medium),
            ("france24.com", TrustLevel::Medium),
            ("euronews.com", TrustLevel::Medium),
            ("politico.com", TrustLevel::Medium),
            ("thehill.com", TrustLevel::Medium),
            ("axios.com", TrustLevel::Medium),
            ("cnbc.com", TrustLevel::Medium),
            ("lemonde.fr", TrustLevel::Medium),
            ("elpais.com", TrustLevel::Medium),
            ("spiegel.de", TrustLevel::Medium),
            ("theverge.com", TrustLevel::Medium),
            ("wired.com", TrustLevel::Medium),
            ("arstechnica.com", TrustLevel::Medium),
            ("sciencedaily.com", TrustLevel::Medium),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_host() {
        let table = TrustTable::default();
        assert_eq!(
            table.level_for_url("https://reuters.com/world/story"),
            Some(TrustLevel::High)
        );
    }

    #[test]
    fn test_www_and_subdomain_stripping() {
        let table = TrustTable::default();
        assert_eq!(
            table.level_for_url("https://www.bbc.com/news/id"),
            Some(TrustLevel::High)
        );
        assert_eq!(
            table.level_for_url("https://edition.cnn.com/2025/story"),
            Some(TrustLevel::Medium)
        );
    }

    #[test]
    fn test_unrated_and_invalid() {
        let table = TrustTable::default();
        assert_eq!(table.level_for_url("https://example-blog.net/post"), None);
        assert_eq!(table.level_for_url("not a url"), None);
    }
}
