//! Node label normalization and copy naming

/// Normalize a user-entered label, `None` when nothing usable remains
pub fn normalize_label(label: &str) -> Option<String> {
    let cleaned: String = label
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();

    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Split `report.txt` into (`report`, `.txt`); dotfiles have no extension
fn split_extension(label: &str) -> (&str, &str) {
    match label.rfind('.') {
        Some(idx) if idx > 0 => label.split_at(idx),
        _ => (label, ""),
    }
}

/// Label for a copy of `label` that does not collide with `taken`
///
/// `report.txt` becomes `report (copy).txt`, then `report (copy 2).txt`, ...
pub fn copy_label<'a, I>(label: &str, taken: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let taken: Vec<&str> = taken.into_iter().collect();
    let (stem, ext) = split_extension(label);

    let mut candidate = format!("{} (copy){}", stem, ext);
    let mut n = 2;
    while taken.contains(&candidate.as_str()) {
        candidate = format!("{} (copy {}){}", stem, n, ext);
        n += 1;
    }

    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("  report.txt "), Some("report.txt".to_string()));
        assert_eq!(normalize_label("a\tb"), Some("a b".to_string()));
        assert_eq!(normalize_label("   "), None);
        assert_eq!(normalize_label(""), None);
    }

    #[test]
    fn test_copy_label() {
        assert_eq!(copy_label("report.txt", []), "report (copy).txt");
        assert_eq!(copy_label("Budget", ["Budget (copy)"]), "Budget (copy 2)");
        assert_eq!(
            copy_label("report.txt", ["report (copy).txt", "report (copy 2).txt"]),
            "report (copy 3).txt"
        );
    }

    #[test]
    fn test_copy_label_dotfile() {
        assert_eq!(copy_label(".env", []), ".env (copy)");
    }
}
