//! Curated feed source list

use storyline_core::FeedSource;

/// Curated news feeds the crawler polls, grouped by language
pub fn curated_sources() -> Vec<FeedSource> {
    vec![
        // English general / world
        FeedSource::new("en", "", "BBC News - General", "http://feeds.bbci.co.uk/news/rss.xml"),
        FeedSource::new("en", "", "BBC News - World", "http://feeds.bbci.co.uk/news/world/rss.xml"),
        FeedSource::new("en", "", "The Guardian - World News", "https://www.theguardian.com/world/rss"),
        FeedSource::new("en", "", "NYT - Top Stories", "https://rss.nytimes.com/services/xml/rss/nyt/HomePage.xml"),
        FeedSource::new("en", "", "NYT - World", "https://rss.nytimes.com/services/xml/rss/nyt/World.xml"),
        FeedSource::new("en", "", "NPR - News", "https://feeds.npr.org/1001/rss.xml"),
        FeedSource::new("en", "", "The Verge - Main", "https://www.theverge.com/rss/index.xml"),
        // English specialty
        FeedSource::new("en", "", "Foreign Policy", "https://foreignpolicy.com/feed/"),
        FeedSource::new("en", "", "Science Daily", "https://www.sciencedaily.com/rss/all.xml"),
        FeedSource::new("en", "", "Entertainment Tonight", "https://www.etonline.com/news/rss"),
        // Romanian general
        FeedSource::new("ro", "RO", "Adevărul - General", "https://adevarul.ro/rss"),
        FeedSource::new("ro", "RO", "HotNews.ro - General", "https://feeds.feedburner.com/hotnews/yvoq"),
        // French general
        FeedSource::new("fr", "FR", "Le Monde - International", "https://www.lemonde.fr/international/rss_full.xml"),
        FeedSource::new("fr", "FR", "Le Figaro - Actualités", "https://www.lefigaro.fr/rss/figaro_actualites.xml"),
        FeedSource::new("fr", "FR", "France 24 - Monde", "https://www.france24.com/fr/rss"),
        // Spanish general
        FeedSource::new("es", "ES", "El País - Portada", "https://feeds.elpais.com/mrss-s/pages/ep/site/elpais.com/portada"),
        FeedSource::new("es", "ES", "ABC.es - Mundo", "https://www.abc.es/rss/feeds/abc_Internacional.xml"),
        // German general
        FeedSource::new("de", "DE", "Der Spiegel - Schlagzeilen", "https://www.spiegel.de/schlagzeilen/index.rss"),
        FeedSource::new("de", "DE", "Die Welt - Top News", "https://www.welt.de/feeds/topnews.rss"),
        FeedSource::new("de", "DE", "Der Standard - Österreich", "https://www.derstandard.at/rss/"),
    ]
}
