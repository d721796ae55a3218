//! Post list query engine.
//!
//! Turns an already-fetched collection of posts plus the user's list controls
//! (search box, status filter, tag filter, sort order) into the ordered subset
//! to display. Everything here is pure: the input slice is never touched and
//! every call returns a fresh `Vec`.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use icu_collator::{Collator, CollatorOptions};

use crate::domain::{Post, PostStatus};

/// Restriction on post status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Published,
    Draft,
}

impl StatusFilter {
    /// Parse a raw filter value. Anything unrecognised means no restriction.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "published" => StatusFilter::Published,
            "draft" => StatusFilter::Draft,
            _ => StatusFilter::All,
        }
    }

    fn admits(self, status: PostStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Published => status == PostStatus::Published,
            StatusFilter::Draft => status == PostStatus::Draft,
        }
    }
}

/// Sort order for the result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Newest,
    Oldest,
    Updated,
    Title,
    Reading,
}

impl SortKey {
    /// Parse a raw sort value. Unknown keys yield `None`, which keeps input order.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "newest" => Some(SortKey::Newest),
            "oldest" => Some(SortKey::Oldest),
            "updated" => Some(SortKey::Updated),
            "title" => Some(SortKey::Title),
            "reading" => Some(SortKey::Reading),
            _ => None,
        }
    }
}

/// Which timestamp `Newest`/`Oldest` order by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateBasis {
    /// `created_at` - the author's own list.
    #[default]
    Created,
    /// `published_at`, falling back to `created_at` - the public listing.
    Published,
}

impl DateBasis {
    fn timestamp(self, post: &Post) -> DateTime<Utc> {
        match self {
            DateBasis::Created => post.created_at,
            DateBasis::Published => post.published_at.unwrap_or(post.created_at),
        }
    }
}

/// User-specified list controls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostQuery {
    pub search: String,
    pub status: StatusFilter,
    pub tag: Option<String>,
    pub sort: Option<SortKey>,
    pub date_basis: DateBasis,
}

impl PostQuery {
    /// Build a query from raw control values, as they arrive from a query string.
    ///
    /// Never fails: unknown status means all, unknown sort keeps input order,
    /// and a blank tag means no tag restriction.
    pub fn from_raw(
        search: Option<&str>,
        status: Option<&str>,
        tag: Option<&str>,
        sort: Option<&str>,
    ) -> Self {
        Self {
            search: search.unwrap_or_default().to_string(),
            status: status.map(StatusFilter::parse).unwrap_or_default(),
            tag: tag
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
            sort: sort.and_then(SortKey::parse),
            date_basis: DateBasis::Created,
        }
    }

    pub fn with_date_basis(mut self, basis: DateBasis) -> Self {
        self.date_basis = basis;
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    /// Run the query: search, status filter, tag filter, then a stable sort.
    pub fn apply(&self, posts: &[Post]) -> Vec<Post> {
        let needle = self.search.trim().to_lowercase();

        let mut selected: Vec<Post> = posts
            .iter()
            .filter(|post| needle.is_empty() || matches_search(post, &needle))
            .filter(|post| self.status.admits(post.status))
            .filter(|post| self.tag.as_deref().is_none_or(|tag| post.has_tag(tag)))
            .cloned()
            .collect();

        if let Some(key) = self.sort {
            let basis = self.date_basis;
            let titles = TitleCollator::new();
            selected.sort_by(|a, b| compare(key, basis, &titles, a, b));
        }

        selected
    }
}

fn matches_search(post: &Post, needle: &str) -> bool {
    post.title.to_lowercase().contains(needle)
        || post.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
}

fn compare(
    key: SortKey,
    basis: DateBasis,
    titles: &TitleCollator,
    a: &Post,
    b: &Post,
) -> Ordering {
    match key {
        SortKey::Newest => basis.timestamp(b).cmp(&basis.timestamp(a)),
        SortKey::Oldest => basis.timestamp(a).cmp(&basis.timestamp(b)),
        SortKey::Updated => b.updated_at.cmp(&a.updated_at),
        SortKey::Title => titles.compare(&a.title, &b.title),
        SortKey::Reading => a.reading_time.cmp(&b.reading_time),
    }
}

/// Title ordering under the Unicode root collation.
///
/// Base letters decide first, so `Éclair` sorts with the `e`s. Accents and
/// then case only break ties, lowercase first.
pub struct TitleCollator {
    collator: Option<Collator>,
}

impl TitleCollator {
    pub fn new() -> Self {
        Self {
            collator: Collator::try_new(&Default::default(), CollatorOptions::new()).ok(),
        }
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let collated = match &self.collator {
            Some(collator) => collator.compare(a, b),
            None => fold_case(a).cmp(fold_case(b)),
        };
        collated.then_with(|| a.cmp(b))
    }
}

impl Default for TitleCollator {
    fn default() -> Self {
        Self::new()
    }
}

fn fold_case(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

/// Compare two titles the way the title sort does.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    TitleCollator::new().compare(a, b)
}

/// Distinct tags across `posts`, sorted ascending. Feeds the tag selector.
pub fn tag_universe(posts: &[Post]) -> Vec<String> {
    posts
        .iter()
        .flat_map(|post| post.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
