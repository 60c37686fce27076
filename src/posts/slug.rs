//! URL slugs derived from post titles.

use std::sync::LazyLock;

use regex::Regex;

use super::Post;

static NON_ALNUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Turn a title into a URL-safe slug.
///
/// Runs of characters outside `[a-z0-9]` collapse to a single hyphen. Titles
/// with no ASCII alphanumerics fall back to a random 8-character hex token.
#[must_use]
pub fn slugify(title: &str) -> String {
    let lowered = title.trim().to_lowercase();
    let slug = NON_ALNUM.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');

    if slug.is_empty() {
        random_token()
    } else {
        slug.to_string()
    }
}

/// Return `base` if no other post uses it, otherwise the first free `base-N` (N >= 2).
///
/// The post with id `ignore_id` does not count as a conflict, so an edited post
/// can keep its own slug.
#[must_use]
pub fn unique_slug(posts: &[Post], base: &str, ignore_id: Option<u64>) -> String {
    let taken = |slug: &str| {
        posts
            .iter()
            .any(|p| p.slug == slug && Some(p.id) != ignore_id)
    };

    let mut slug = base.to_string();
    let mut suffix = 2;
    while taken(&slug) {
        slug = format!("{base}-{suffix}");
        suffix += 1;
    }
    slug
}

fn random_token() -> String {
    hex::encode(rand::random::<[u8; 4]>())
}
