//! Filename slug sanitization.

/// Reduce free text to a safe snake_case filename slug.
///
/// Keeps alphanumerics, collapses whitespace and separators to single
/// underscores, and lowercases the result. Returns "unnamed" for input with
/// no usable characters, so callers always get a valid filename component.
///
/// # Examples
///
/// ```
/// use fresco_engine::sanitize_slug;
///
/// assert_eq!(sanitize_slug("The Old Lighthouse"), "the_old_lighthouse");
/// assert_eq!(sanitize_slug("  Kevin! (the Hero)  "), "kevin_the_hero");
/// ```
pub fn sanitize_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_was_separator = true;

    for c in text.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
            last_was_separator = false;
        } else if !last_was_separator {
            slug.push('_');
            last_was_separator = true;
        }
    }

    let slug = slug.trim_matches('_').to_string();
    if slug.is_empty() {
        "unnamed".to_string()
    } else {
        slug
    }
}
