/// Normalize a file name for matching: drop the extension and any leading
/// track number ("01. ", "1 - "), lower-case, and remove all whitespace.
pub fn normalize_file_name(name: &str) -> String {
    let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
    let without_track = stem
        .trim_start_matches(|c: char| c.is_ascii_digit() || c.is_whitespace() || c == '.' || c == '-');
    strip_whitespace(&without_track.to_lowercase())
}

/// Normalize a song title: lower-case with all whitespace removed
pub fn normalize_title(title: &str) -> String {
    strip_whitespace(&title.to_lowercase())
}

/// A file matches a title when its normalized name contains the
/// normalized title. Titles that normalize to nothing never match.
pub fn name_matches_title(normalized_name: &str, title: &str) -> bool {
    let title = normalize_title(title);
    !title.is_empty() && normalized_name.contains(&title)
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}
