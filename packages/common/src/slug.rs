use chrono::{DateTime, Utc};

/// Build the unique name of a submission: the lowercased display name with
/// each whitespace run replaced by `-`, suffixed with the submission time in
/// epoch milliseconds.
///
/// The timestamp suffix makes names unique without a central counter.
pub fn slugify(name: &str, submitted_at: DateTime<Utc>) -> String {
    let mut slug = String::with_capacity(name.len() + 14);
    let mut in_whitespace = false;

    for ch in name.trim().chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
        } else {
            slug.extend(ch.to_lowercase());
            in_whitespace = false;
        }
    }

    format!("{slug}-{}", submitted_at.timestamp_millis())
}
