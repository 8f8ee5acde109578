//! Command suggestions for the palette.
//!
//! The catalogue is a fixed list of example commands. [`resolve`] filters it
//! against the current palette input; it is pure and allocation is limited to
//! the returned list.

/// Maximum number of suggestions shown at once.
pub const MAX_SUGGESTIONS: usize = 8;

/// Example commands offered by the palette, in display order.
pub const BUILTIN_CATALOGUE: [&str; 20] = [
    "Open Chrome and search for React documentation",
    "Send email to team about project updates",
    "Create new document in Google Docs",
    "Schedule meeting for tomorrow at 2 PM",
    "Take screenshot of current window",
    "Open VS Code",
    "Fill out the contact form",
    "Download the latest report",
    "Click the submit button",
    "Type my name in the input field",
    "Scroll down to see more content",
    "Open settings menu",
    "Save the current document",
    "Copy text to clipboard",
    "Navigate to dashboard",
    "Search for files",
    "Open file manager",
    "Switch to dark mode",
    "Refresh the page",
    "Close all tabs",
];

/// Returns at most [`MAX_SUGGESTIONS`] catalogue entries for `input`.
///
/// An empty input yields the first entries of the catalogue. Otherwise every
/// entry containing `input` as a case-insensitive substring is returned, in
/// catalogue order.
pub fn resolve<S: AsRef<str>>(input: &str, catalogue: &[S]) -> Vec<String> {
    if input.is_empty() {
        return catalogue
            .iter()
            .take(MAX_SUGGESTIONS)
            .map(|entry| entry.as_ref().to_string())
            .collect();
    }

    let needle = input.to_lowercase();
    catalogue
        .iter()
        .map(AsRef::as_ref)
        .filter(|entry| entry.to_lowercase().contains(&needle))
        .take(MAX_SUGGESTIONS)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_returns_defaults() {
        let suggestions = resolve("", &BUILTIN_CATALOGUE);
        assert_eq!(suggestions, BUILTIN_CATALOGUE[..8].to_vec());
    }

    #[test]
    fn test_case_insensitive_match() {
        let suggestions = resolve("SCREENSHOT", &BUILTIN_CATALOGUE);
        assert_eq!(suggestions, vec!["Take screenshot of current window".to_string()]);
    }

    #[test]
    fn test_matches_keep_catalogue_order() {
        let suggestions = resolve("open", &BUILTIN_CATALOGUE);
        assert_eq!(
            suggestions,
            vec![
                "Open Chrome and search for React documentation",
                "Open VS Code",
                "Open settings menu",
                "Open file manager",
            ]
        );
    }

    #[test]
    fn test_results_are_truncated() {
        // every entry contains an "e"
        let suggestions = resolve("e", &BUILTIN_CATALOGUE);
        assert_eq!(suggestions.len(), MAX_SUGGESTIONS);
        assert_eq!(suggestions[0], BUILTIN_CATALOGUE[0]);
    }

    #[test]
    fn test_no_match() {
        assert!(resolve("xyzzy", &BUILTIN_CATALOGUE).is_empty());
    }

    #[test]
    fn test_short_catalogue() {
        let catalogue = vec!["One".to_string(), "Two".to_string()];
        assert_eq!(resolve("", &catalogue), catalogue);
    }
}
