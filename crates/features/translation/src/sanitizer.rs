use crate::catalogue::MessageCatalogue;
use std::fmt::{self, Debug};

/// A message that was rewritten because it carried active content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizationError {
    pub locale: String,
    pub domain: String,
    pub id: String,
    pub original: String,
    pub sanitized: String,
}

impl fmt::Display for SanitizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}: {}", self.locale, self.domain, self.id)
    }
}

/// Inspects freshly compiled catalogues before they are persisted.
pub trait MessageCatalogueSanitizer: Send + Sync + Debug {
    /// Rewrites unsafe messages in place and reports each rewrite.
    fn sanitize(&self, catalogue: &mut MessageCatalogue) -> Vec<SanitizationError>;
}

/// Escapes messages containing scripts, `javascript:` URLs or inline event handlers.
///
/// Ordinary markup such as `<b>` or `<a href>` is left untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlMessageSanitizer;

impl HtmlMessageSanitizer {
    fn is_unsafe(message: &str) -> bool {
        let lower = message.to_ascii_lowercase();
        lower.contains("<script") || lower.contains("javascript:") || has_event_handler(&lower)
    }
}

impl MessageCatalogueSanitizer for HtmlMessageSanitizer {
    fn sanitize(&self, catalogue: &mut MessageCatalogue) -> Vec<SanitizationError> {
        let locale = catalogue.locale().to_owned();
        let mut errors = Vec::new();
        for (domain, messages) in catalogue.messages_mut() {
            for (id, message) in messages.iter_mut() {
                if !Self::is_unsafe(message) {
                    continue;
                }
                let sanitized = escape(message);
                errors.push(SanitizationError {
                    locale: locale.clone(),
                    domain: domain.clone(),
                    id: id.clone(),
                    original: std::mem::replace(message, sanitized.clone()),
                    sanitized,
                });
            }
        }
        errors
    }
}

/// `on<letters>=` inside a tag.
fn has_event_handler(lower: &str) -> bool {
    let mut in_tag = false;
    let bytes = lower.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'<' => in_tag = true,
            b'>' => in_tag = false,
            b'o' if in_tag && i > 0 && bytes[i - 1].is_ascii_whitespace() => {
                let rest = &bytes[i..];
                if rest.get(1) != Some(&b'n') {
                    continue;
                }
                let name_len = rest[2..].iter().take_while(|c| c.is_ascii_alphabetic()).count();
                let after = rest[2 + name_len..].iter().find(|c| !c.is_ascii_whitespace());
                if name_len > 0 && after == Some(&b'=') {
                    return true;
                }
            },
            _ => {},
        }
    }
    false
}

fn escape(message: &str) -> String {
    let mut out = String::with_capacity(message.len() + 16);
    for c in message.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '&' => out.push_str("&amp;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_only_active_content() {
        let mut catalogue = MessageCatalogue::new("en");
        catalogue.set("bold", "<b>Hello</b> %name%", "messages");
        catalogue.set("script", "Hi<script>alert(1)</script>", "messages");
        catalogue.set("handler", "<img src=x onerror = 'steal()'>", "messages");
        catalogue.set("link", "<a href=\"JavaScript:void(0)\">x</a>", "security");
        catalogue.set("prose", "Click on = to compare", "messages");

        let errors = HtmlMessageSanitizer.sanitize(&mut catalogue);

        let ids: Vec<_> = errors.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["handler", "script", "link"]);
        assert_eq!(catalogue.get("bold", "messages"), Some("<b>Hello</b> %name%"));
        assert_eq!(
            catalogue.get("script", "messages"),
            Some("Hi&lt;script&gt;alert(1)&lt;/script&gt;")
        );
        assert_eq!(errors[0].original, "<img src=x onerror = 'steal()'>");
        assert_eq!(catalogue.get("prose", "messages"), Some("Click on = to compare"));
    }
}
