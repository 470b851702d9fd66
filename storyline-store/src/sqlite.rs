//! SQLite storage backend using rusqlite

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, instrument};

use storyline_core::{
    Article, ArticleStore, CredibilityLabel, StorylineError, StorylineResult, Thread, ThreadId,
    ThreadStore,
};

/// SQLite store for articles, threads and their linkage
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the database at the given path
    #[instrument(skip(database_path))]
    pub fn new<P: AsRef<Path> + std::fmt::Debug>(database_path: P) -> StorylineResult<Self> {
        info!("Opening storyline database: {:?}", database_path.as_ref());
        let conn = Connection::open(database_path.as_ref())
            .map_err(|e| StorylineError::database(format!("Failed to open database: {}", e)))?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_tables()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn new_in_memory() -> StorylineResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorylineError::database(format!("Failed to create in-memory DB: {}", e)))?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_tables()?;
        Ok(store)
    }

    fn init_tables(&self) -> StorylineResult<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS articles (
                url TEXT PRIMARY KEY,
                source TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                published INTEGER,
                author TEXT,
                language TEXT NOT NULL,
                content TEXT NOT NULL,
                content_en TEXT NOT NULL,
                image TEXT,
                topic TEXT NOT NULL,
                thread_id TEXT NOT NULL,
                credibility_score INTEGER NOT NULL,
                credibility_label TEXT,
                is_clickbait INTEGER NOT NULL,
                is_ad INTEGER NOT NULL,
                fetched_at INTEGER NOT NULL
            )",
            [],
        )
        .map_err(db_err)?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_articles_thread ON articles(thread_id)",
            [],
        )
        .map_err(db_err)?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_articles_topic ON articles(topic)",
            [],
        )
        .map_err(db_err)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS threads (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                topic TEXT NOT NULL,
                language TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                last_updated INTEGER NOT NULL
            )",
            [],
        )
        .map_err(db_err)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS thread_articles (
                thread_id TEXT NOT NULL,
                article_url TEXT NOT NULL,
                position INTEGER NOT NULL,
                PRIMARY KEY (thread_id, article_url)
            )",
            [],
        )
        .map_err(db_err)?;

        info!("Storyline database tables initialized");
        Ok(())
    }

    fn load_thread(conn: &Connection, id: &str) -> rusqlite::Result<Option<Thread>> {
        let row = conn
            .query_row(
                "SELECT id, title, topic, language, created_at, last_updated
                 FROM threads WHERE id = ?",
                params![id],
                |row| {
                    let created_at: i64 = row.get(4)?;
                    let last_updated: i64 = row.get(5)?;
                    Ok(Thread {
                        id: ThreadId::new(row.get::<_, String>(0)?),
                        title: row.get(1)?,
                        topic: row.get(2)?,
                        language: row.get(3)?,
                        languages: Vec::new(),
                        articles: Vec::new(),
                        created_at: timestamp(created_at),
                        last_updated: timestamp(last_updated),
                    })
                },
            )
            .optional()?;

        let Some(mut thread) = row else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            "SELECT article_url FROM thread_articles WHERE thread_id = ? ORDER BY position",
        )?;
        thread.articles = stmt
            .query_map(params![id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;

        let mut stmt = conn.prepare(
            "SELECT DISTINCT a.language FROM articles a
             JOIN thread_articles ta ON a.url = ta.article_url
             WHERE ta.thread_id = ? ORDER BY a.language",
        )?;
        thread.languages = stmt
            .query_map(params![id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;

        Ok(Some(thread))
    }
}

#[async_trait]
impl ArticleStore for SqliteStore {
    async fn contains(&self, url: &str) -> StorylineResult<bool> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM articles WHERE url = ?",
                params![url],
                |row| row.get(0),
            )
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn insert_article(&self, article: &Article) -> StorylineResult<bool> {
        let conn = self.conn.lock().unwrap();
        // INSERT OR IGNORE makes the dedup check-then-act atomic: racing
        // writers on the same URL cannot both insert
        let inserted = conn
            .execute(
                "INSERT OR IGNORE INTO articles
                 (url, source, title, description, published, author, language,
                  content, content_en, image, topic, thread_id,
                  credibility_score, credibility_label, is_clickbait, is_ad, fetched_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    &article.url,
                    &article.source,
                    &article.title,
                    &article.description,
                    article.published.map(|p| p.timestamp()),
                    &article.author,
                    &article.language,
                    &article.content,
                    &article.content_en,
                    &article.image,
                    &article.topic,
                    article.thread_id.as_str(),
                    article.credibility_score as i64,
                    article.credibility_label.as_str(),
                    article.is_clickbait as i64,
                    article.is_ad as i64,
                    article.fetched_at.timestamp(),
                ],
            )
            .map_err(db_err)?;

        debug!(url = %article.url, inserted = inserted > 0, "stored article");
        Ok(inserted > 0)
    }

    async fn get_article(&self, url: &str) -> StorylineResult<Option<Article>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT url, source, title, description, published, author, language,
                    content, content_en, image, topic, thread_id,
                    credibility_score, credibility_label, is_clickbait, is_ad, fetched_at
             FROM articles WHERE url = ?",
            params![url],
            |row| {
                let score: i64 = row.get(12)?;
                let label: Option<String> = row.get(13)?;
                let published: Option<i64> = row.get(4)?;
                let fetched_at: i64 = row.get(16)?;
                Ok(Article {
                    url: row.get(0)?,
                    source: row.get(1)?,
                    title: row.get(2)?,
                    description: row.get(3)?,
                    published: published.map(timestamp),
                    author: row.get(5)?,
                    language: row.get(6)?,
                    content: row.get(7)?,
                    content_en: row.get(8)?,
                    image: row.get(9)?,
                    topic: row.get(10)?,
                    thread_id: ThreadId::new(row.get::<_, String>(11)?),
                    credibility_score: score as u8,
                    credibility_label: label
                        .and_then(|l| l.parse().ok())
                        .unwrap_or_else(|| CredibilityLabel::from_score(score as u8)),
                    is_clickbait: row.get::<_, i64>(14)? != 0,
                    is_ad: row.get::<_, i64>(15)? != 0,
                    fetched_at: timestamp(fetched_at),
                })
            },
        )
        .optional()
        .map_err(db_err)
    }

    async fn count_articles(&self) -> StorylineResult<u64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))
            .map_err(db_err)?;
        Ok(count as u64)
    }

    async fn relabel_missing(&self) -> StorylineResult<u64> {
        let conn = self.conn.lock().unwrap();
        let updated = conn
            .execute(
                "UPDATE articles SET credibility_label =
                    CASE WHEN credibility_score >= 80 THEN 'high'
                         WHEN credibility_score >= 50 THEN 'medium'
                         ELSE 'low' END
                 WHERE credibility_label IS NULL OR credibility_label = ''",
                [],
            )
            .map_err(db_err)?;
        if updated > 0 {
            info!("Backfilled credibility_label on {} articles", updated);
        }
        Ok(updated as u64)
    }
}

#[async_trait]
impl ThreadStore for SqliteStore {
    async fn list_threads(&self) -> StorylineResult<Vec<Thread>> {
        let conn = self.conn.lock().unwrap();
        let ids: Vec<String> = {
            let mut stmt = conn
                .prepare("SELECT id FROM threads ORDER BY created_at ASC, rowid ASC")
                .map_err(db_err)?;
            let rows = stmt
                .query_map([], |row| row.get(0))
                .map_err(db_err)?
                .collect::<rusqlite::Result<Vec<String>>>()
                .map_err(db_err)?;
            rows
        };

        let mut threads = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(thread) = Self::load_thread(&conn, &id).map_err(db_err)? {
                threads.push(thread);
            }
        }
        Ok(threads)
    }

    async fn get_thread(&self, id: &ThreadId) -> StorylineResult<Option<Thread>> {
        let conn = self.conn.lock().unwrap();
        Self::load_thread(&conn, id.as_str()).map_err(db_err)
    }

    async fn create_thread(&self, thread: &Thread) -> StorylineResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO threads (id, title, topic, language, created_at, last_updated)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                thread.id.as_str(),
                &thread.title,
                &thread.topic,
                &thread.language,
                thread.created_at.timestamp(),
                thread.last_updated.timestamp(),
            ],
        )
        .map_err(db_err)?;
        debug!(thread = %thread.id, topic = %thread.topic, "created thread");
        Ok(())
    }

    async fn touch_thread(&self, id: &ThreadId, at: DateTime<Utc>) -> StorylineResult<()> {
        let conn = self.conn.lock().unwrap();
        // MAX keeps last_updated monotonically non-decreasing
        conn.execute(
            "UPDATE threads SET last_updated = MAX(last_updated, ?) WHERE id = ?",
            params![at.timestamp(), id.as_str()],
        )
        .map_err(db_err)?;
        Ok(())
    }

    async fn set_thread_title(&self, id: &ThreadId, title: &str) -> StorylineResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE threads SET title = ?, last_updated = MAX(last_updated, ?) WHERE id = ?",
            params![title, Utc::now().timestamp(), id.as_str()],
        )
        .map_err(db_err)?;
        Ok(())
    }

    async fn add_article_to_thread(&self, id: &ThreadId, url: &str) -> StorylineResult<bool> {
        let conn = self.conn.lock().unwrap();
        let inserted = conn
            .execute(
                "INSERT OR IGNORE INTO thread_articles (thread_id, article_url, position)
                 VALUES (?1, ?2,
                         (SELECT COUNT(*) FROM thread_articles WHERE thread_id = ?1))",
                params![id.as_str(), url],
            )
            .map_err(db_err)?;

        if inserted > 0 {
            // Membership changed: bump the thread
            conn.execute(
                "UPDATE threads SET last_updated = MAX(last_updated, ?) WHERE id = ?",
                params![Utc::now().timestamp(), id.as_str()],
            )
            .map_err(db_err)?;
        }
        Ok(inserted > 0)
    }

    async fn member_snippets(&self, id: &ThreadId) -> StorylineResult<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT COALESCE(NULLIF(a.description, ''), a.title)
                 FROM articles a
                 JOIN thread_articles ta ON a.url = ta.article_url
                 WHERE ta.thread_id = ? ORDER BY ta.position",
            )
            .map_err(db_err)?;
        let snippets = stmt
            .query_map(params![id.as_str()], |row| row.get(0))
            .map_err(db_err)?
            .collect::<rusqlite::Result<Vec<String>>>()
            .map_err(db_err)?;
        Ok(snippets)
    }
}

fn db_err(e: rusqlite::Error) -> StorylineError {
    StorylineError::database(e.to_string())
}

fn timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_else(Utc::now)
}
