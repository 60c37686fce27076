//! Blog posts: the model, the in-memory collection and its JSON store.

pub mod listing;
pub mod slug;
mod store;

pub use listing::{paginate, visible_posts, Page, POSTS_PER_PAGE};
pub use slug::{slugify, unique_slug};
pub use store::{PostStore, StoreError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimum post body length, in characters.
pub const MIN_CONTENT_CHARS: usize = 10;

/// A blog entry as stored in the post file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub slug: String,
    pub content: String,
    /// Upload filename, empty when the post has no cover.
    #[serde(default)]
    pub cover_image: String,
    #[serde(default = "default_published")]
    pub published: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

const fn default_published() -> bool {
    true
}

impl Post {
    #[must_use]
    pub fn cover_image(&self) -> Option<&str> {
        Some(self.cover_image.as_str()).filter(|s| !s.is_empty())
    }
}

/// Fields an admin submits when creating or editing a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub published: bool,
}

impl PostDraft {
    /// Build a draft from raw form values, trimming title and content.
    #[must_use]
    pub fn from_form(title: &str, content: &str, published: bool) -> Self {
        Self {
            title: title.trim().to_string(),
            content: content.trim().to_string(),
            published,
        }
    }

    /// A draft is acceptable when the title is non-empty and the content has
    /// at least [`MIN_CONTENT_CHARS`] characters.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.title.is_empty() && self.content.chars().count() >= MIN_CONTENT_CHARS
    }
}

/// The full ordered list of posts, serialized as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostCollection {
    posts: Vec<Post>,
}

impl PostCollection {
    #[must_use]
    pub fn new(posts: Vec<Post>) -> Self {
        Self { posts }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Post> {
        self.posts.iter()
    }

    /// 1 for an empty collection, otherwise one more than the largest id.
    #[must_use]
    pub fn next_id(&self) -> u64 {
        self.posts.iter().map(|p| p.id).max().map_or(1, |max| max + 1)
    }

    #[must_use]
    pub fn find_by_slug(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    #[must_use]
    pub fn find_by_id(&self, id: u64) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// Append a new post built from `draft`, assigning its id and a unique slug.
    pub fn insert(
        &mut self,
        draft: PostDraft,
        cover_image: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Post {
        let slug = unique_slug(&self.posts, &slugify(&draft.title), None);
        let post = Post {
            id: self.next_id(),
            title: draft.title,
            slug,
            content: draft.content,
            cover_image: cover_image.unwrap_or_default(),
            published: draft.published,
            created_at,
        };
        self.posts.push(post.clone());
        post
    }

    /// Apply `draft` to the post with `id`, recomputing its slug from the new title.
    ///
    /// `cover_image` replaces the stored cover only when `Some`. Returns the
    /// updated post, or `None` if no post has that id.
    pub fn update(
        &mut self,
        id: u64,
        draft: PostDraft,
        cover_image: Option<String>,
    ) -> Option<Post> {
        let slug = unique_slug(&self.posts, &slugify(&draft.title), Some(id));
        let post = self.posts.iter_mut().find(|p| p.id == id)?;

        post.title = draft.title;
        post.content = draft.content;
        post.published = draft.published;
        post.slug = slug;
        if let Some(cover) = cover_image {
            post.cover_image = cover;
        }
        Some(post.clone())
    }

    /// Remove the post with `id`, returning it if it existed.
    pub fn remove(&mut self, id: u64) -> Option<Post> {
        let index = self.posts.iter().position(|p| p.id == id)?;
        Some(self.posts.remove(index))
    }
}

impl<'a> IntoIterator for &'a PostCollection {
    type Item = &'a Post;
    type IntoIter = std::slice::Iter<'a, Post>;

    fn into_iter(self) -> Self::IntoIter {
        self.posts.iter()
    }
}

/// `created_at` is written as RFC 3339 UTC. Naive timestamps without an
/// offset are accepted on read and taken to be UTC.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(dt.with_timezone(&Utc));
        }
        raw.parse::<NaiveDateTime>()
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}
