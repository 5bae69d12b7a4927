//! Embedded templates
//!
//! Compiled into the binary from the `templates/` directory.

use tracing::debug;

/// One prompt card
pub const CARD: &str = include_str!("../../templates/card.hbs");

/// Placeholder shown instead of an empty list
pub const EMPTY: &str = include_str!("../../templates/empty.hbs");

/// Standalone board page
pub const PAGE: &str = include_str!("../../templates/page.hbs");

/// Names of every template the renderer needs
pub const TEMPLATE_NAMES: [&str; 3] = ["card", "empty", "page"];

/// Get the embedded template by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "card" => Some(CARD),
        "empty" => Some(EMPTY),
        "page" => Some(PAGE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_template_is_embedded() {
        for name in TEMPLATE_NAMES {
            assert!(get_embedded(name).is_some(), "missing {}", name);
        }
    }

    #[test]
    fn test_card_has_no_inline_handlers() {
        assert!(!CARD.contains("onclick"));
        assert!(CARD.contains("data-copy-target"));
    }

    #[test]
    fn test_only_list_is_unescaped() {
        for name in TEMPLATE_NAMES {
            let triple = get_embedded(name).unwrap().matches("{{{").count();
            let expected = if name == "page" { 1 } else { 0 };
            assert_eq!(triple, expected, "{}", name);
        }
    }

    #[test]
    fn test_page_copy_failure_resets_button() {
        let catch = PAGE.split("catch (err)").nth(1).unwrap();
        let alert = catch.find("alert(").unwrap();
        let handler = &catch[..alert];
        assert!(handler.contains("clearTimeout(timers.get(button))"));
        assert!(handler.contains("button.classList.remove('copied')"));
        assert!(handler.contains("label.textContent = COPY_LABEL"));
    }

    #[test]
    fn test_page_language_matches_labels() {
        assert!(PAGE.contains(r#"<html lang="en">"#));
    }

    #[test]
    fn test_get_embedded_unknown() {
        assert!(get_embedded("unknown-template").is_none());
    }
}
