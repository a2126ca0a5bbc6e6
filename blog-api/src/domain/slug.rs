//! Slug normalization shared by posts and tags.
//!
//! A slug is the lowercase ASCII form of a display string where every run of
//! characters other than `a-z`/`0-9` collapses into a single `-`, with no
//! separator at either end. Applying [`slugify`] to its own output is a no-op.

const SEPARATOR: char = '-';

pub(crate) fn slugify(text: &str) -> String {
    let ascii = deunicode::deunicode(text);

    let mut slug = String::with_capacity(ascii.len());
    let mut pending_separator = false;

    for ch in ascii.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push(SEPARATOR);
            }
            pending_separator = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}
