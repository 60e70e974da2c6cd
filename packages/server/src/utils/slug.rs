/// Derive a URL slug from a post title: lowercase, every run of
/// non-alphanumeric characters collapsed to a single `-`, with no leading or
/// trailing `-`.
///
/// Returns an empty string when the title contains no ASCII alphanumerics;
/// callers treat that as a validation failure.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_separator = false;

    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else {
            pending_separator = true;
        }
    }

    slug
}
