//! Minimal `Cookie` request-header parsing.
//!
//! The header format is `name=value; name2=value2; …`. Values arrive
//! percent-encoded (the setting endpoint encodes them) and are decoded
//! here. Anything that does not decode to valid UTF-8, or carries no `=`,
//! is skipped rather than treated as an error – a foreign cookie must
//! never break a chat request.

/// Look up `name` in a raw `Cookie` header and return its percent-decoded
/// value.
///
/// Matching is exact on the cookie name; the first occurrence wins.
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        if key != name {
            return None;
        }
        urlencoding::decode(value).ok().map(|v| v.into_owned())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_named_cookie_among_others() {
        let header = "theme=dark; translateLang=English; sid=abc123";
        assert_eq!(cookie_value(header, "translateLang"), Some("English".into()));
    }

    #[test]
    fn percent_decodes_values() {
        assert_eq!(
            cookie_value("translateLang=Fran%C3%A7ais", "translateLang"),
            Some("Français".into())
        );
        assert_eq!(
            cookie_value("note=hello%20world%21", "note"),
            Some("hello world!".into())
        );
    }

    #[test]
    fn missing_or_malformed_cookies_yield_none() {
        assert_eq!(cookie_value("", "translateLang"), None);
        assert_eq!(cookie_value("theme=dark", "translateLang"), None);
        assert_eq!(cookie_value("translateLang", "translateLang"), None);
        // Prefix of another name must not match.
        assert_eq!(cookie_value("translateLangX=En", "translateLang"), None);
    }

    #[test]
    fn invalid_percent_sequences_are_skipped() {
        assert_eq!(cookie_value("translateLang=%FF%FE", "translateLang"), None);
    }
}
