//! Cross-kind search
//!
//! A query runs against every enabled record kind at once. Each kind does a
//! literal, case-sensitive substring match over its text fields, limited to
//! the requesting owner's rows. The per-kind results are concatenated in a
//! fixed order (tasks, notes, bookmarks, events) and each hit is tagged with
//! its kind.
//!
//! # Example
//!
//! ```no_run
//! use daybook_shared::models::OwnerScope;
//! use daybook_shared::search::{search, SearchFilter};
//! use sqlx::SqlitePool;
//!
//! # async fn example(pool: SqlitePool, owner: OwnerScope) -> Result<(), sqlx::Error> {
//! let hits = search(&pool, owner, "report", SearchFilter::parse(Some("tasks"))).await?;
//! for hit in &hits {
//!     println!("{}", hit.kind().as_str());
//! }
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::models::{
    bookmark::Bookmark, event::Event, note::Note, task::Task, OwnerScope,
};

/// Record kind a search hit came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Task,
    Note,
    Bookmark,
    Event,
}

impl SearchKind {
    /// Tag used in serialized hits
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchKind::Task => "task",
            SearchKind::Note => "note",
            SearchKind::Bookmark => "bookmark",
            SearchKind::Event => "event",
        }
    }
}

/// Which kinds a search covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchFilter {
    pub tasks: bool,
    pub notes: bool,
    pub bookmarks: bool,
    pub events: bool,
}

impl SearchFilter {
    /// Filter value used when the request names none
    pub const DEFAULT_TYPE: &'static str = "all";

    /// Every kind enabled
    pub fn all() -> Self {
        Self {
            tasks: true,
            notes: true,
            bookmarks: true,
            events: true,
        }
    }

    /// No kind enabled
    pub fn none() -> Self {
        Self {
            tasks: false,
            notes: false,
            bookmarks: false,
            events: false,
        }
    }

    /// Parses the `type` request parameter
    ///
    /// Absent or empty means `all`. The recognized values are `all`,
    /// `tasks`, `notes`, `bookmarks` and `events`, compared exactly; anything
    /// else enables no kind.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.unwrap_or_default() {
            "" | "all" => Self::all(),
            "tasks" => Self { tasks: true, ..Self::none() },
            "notes" => Self { notes: true, ..Self::none() },
            "bookmarks" => Self { bookmarks: true, ..Self::none() },
            "events" => Self { events: true, ..Self::none() },
            _ => Self::none(),
        }
    }

    pub fn includes(&self, kind: SearchKind) -> bool {
        match kind {
            SearchKind::Task => self.tasks,
            SearchKind::Note => self.notes,
            SearchKind::Bookmark => self.bookmarks,
            SearchKind::Event => self.events,
        }
    }
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self::all()
    }
}

/// A single search result tagged with its kind
///
/// Serializes as `{"kind": "task", "item": {...}}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "item", rename_all = "lowercase")]
pub enum SearchHit {
    Task(Task),
    Note(Note),
    Bookmark(Bookmark),
    Event(Event),
}

impl SearchHit {
    pub fn kind(&self) -> SearchKind {
        match self {
            SearchHit::Task(_) => SearchKind::Task,
            SearchHit::Note(_) => SearchKind::Note,
            SearchHit::Bookmark(_) => SearchKind::Bookmark,
            SearchHit::Event(_) => SearchKind::Event,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            SearchHit::Task(t) => &t.title,
            SearchHit::Note(n) => &n.title,
            SearchHit::Bookmark(b) => &b.title,
            SearchHit::Event(e) => &e.title,
        }
    }
}

/// Searches `owner`'s records for `query`
///
/// An empty query returns no hits without touching the database. The
/// enabled kinds are queried concurrently; the first failing lookup fails
/// the whole search.
pub async fn search(
    pool: &SqlitePool,
    owner: OwnerScope,
    query: &str,
    filter: SearchFilter,
) -> Result<Vec<SearchHit>, sqlx::Error> {
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let tasks = async {
        if filter.tasks {
            Task::search(pool, owner, query).await
        } else {
            Ok(Vec::new())
        }
    };
    let notes = async {
        if filter.notes {
            Note::search(pool, owner, query).await
        } else {
            Ok(Vec::new())
        }
    };
    let bookmarks = async {
        if filter.bookmarks {
            Bookmark::search(pool, owner, query).await
        } else {
            Ok(Vec::new())
        }
    };
    let events = async {
        if filter.events {
            Event::search(pool, owner, query).await
        } else {
            Ok(Vec::new())
        }
    };

    let (tasks, notes, bookmarks, events) = tokio::try_join!(tasks, notes, bookmarks, events)?;

    debug!(
        user_id = owner.user_id(),
        tasks = tasks.len(),
        notes = notes.len(),
        bookmarks = bookmarks.len(),
        events = events.len(),
        "Search completed"
    );

    let mut hits = Vec::with_capacity(tasks.len() + notes.len() + bookmarks.len() + events.len());
    hits.extend(tasks.into_iter().map(SearchHit::Task));
    hits.extend(notes.into_iter().map(SearchHit::Note));
    hits.extend(bookmarks.into_iter().map(SearchHit::Bookmark));
    hits.extend(events.into_iter().map(SearchHit::Event));

    Ok(hits)
}
