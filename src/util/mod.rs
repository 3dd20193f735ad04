/// Browser `confirm()`. Reads as "no" when no window is available.
pub(crate) fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// Split a comma-separated tag field; blanks are dropped.
pub(crate) fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

pub(crate) fn join_tags(tags: &[String]) -> String {
    tags.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags_trims_and_drops_blanks() {
        assert_eq!(
            parse_tags(" Python, Basics ,,  "),
            vec!["Python".to_string(), "Basics".to_string()]
        );
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn test_join_tags_round_trips_through_parse() {
        let tags = vec!["Rust".to_string(), "Ownership".to_string()];
        assert_eq!(parse_tags(&join_tags(&tags)), tags);
    }
}
