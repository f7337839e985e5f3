//! Parameter substitution and plural selection.
//!
//! Placeholders are replaced literally, longest key first, and replaced text is
//! never scanned again. A message containing `|` is a plural choice when a
//! numeric `%count%` parameter is given:
//!
//! ```text
//! {0} No apples|{1} One apple|]1,Inf[ %count% apples
//! one: One apple|other: %count% apples
//! ```

use crate::error::TranslationError;
use std::collections::BTreeMap;

pub const COUNT: &str = "%count%";

/// Placeholder to replacement.
pub type Parameters = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, Default)]
pub struct MessageFormatter;

impl MessageFormatter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Formats `message` for `locale`.
    ///
    /// # Errors
    /// Returns [`TranslationError::InvalidArgument`] when no plural form matches `%count%`.
    pub fn format(
        &self,
        message: &str,
        locale: &str,
        parameters: &Parameters,
    ) -> Result<String, TranslationError> {
        let count = parameters.get(COUNT).and_then(|c| c.trim().parse::<f64>().ok());
        let chosen = match count {
            Some(number) if message.contains('|') => choose(message, number, locale)?,
            _ => message.to_owned(),
        };
        Ok(replace_parameters(&chosen, parameters))
    }
}

/// Literal, single-pass replacement of every parameter key.
#[must_use]
pub fn replace_parameters(message: &str, parameters: &Parameters) -> String {
    if parameters.is_empty() {
        return message.to_owned();
    }
    let mut keys: Vec<(&str, &str)> = parameters
        .iter()
        .filter(|(key, _)| !key.is_empty())
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    keys.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut out = String::with_capacity(message.len());
    let mut rest = message;
    'scan: while !rest.is_empty() {
        for (key, value) in &keys {
            if let Some(tail) = rest.strip_prefix(key) {
                out.push_str(value);
                rest = tail;
                continue 'scan;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }
    out
}

fn choose(message: &str, number: f64, locale: &str) -> Result<String, TranslationError> {
    let parts = split_parts(message);
    let mut standard = Vec::with_capacity(parts.len());

    for part in &parts {
        if let Some((interval, text)) = Interval::parse(part) {
            if interval.contains(number) {
                return Ok(text.to_owned());
            }
        } else {
            standard.push(strip_label(part));
        }
    }

    let position = plural_position(number, locale);
    match standard.get(position) {
        Some(text) => Ok((*text).to_owned()),
        None if parts.len() == 1 && !standard.is_empty() => Ok(standard[0].to_owned()),
        None => Err(TranslationError::InvalidArgument {
            message: format!(
                "unable to choose a translation for \"{message}\" with locale \"{locale}\" for value \"{number}\""
            )
            .into(),
            context: None,
        }),
    }
}

/// Splits on `|`, where `||` stands for a literal pipe. Parts are trimmed.
fn split_parts(message: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = message.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '|' {
            current.push(c);
        } else if chars.peek() == Some(&'|') {
            chars.next();
            current.push('|');
        } else {
            parts.push(current.trim().to_owned());
            current.clear();
        }
    }
    parts.push(current.trim().to_owned());
    parts
}

fn strip_label(part: &str) -> &str {
    match part.split_once(':') {
        Some((label, text))
            if !label.is_empty() && label.chars().all(|c| c.is_alphanumeric() || c == '_') =>
        {
            text.trim_start()
        },
        _ => part,
    }
}

#[derive(Debug, PartialEq)]
enum Interval {
    Set(Vec<f64>),
    Range { low: f64, low_inclusive: bool, high: f64, high_inclusive: bool },
}

impl Interval {
    /// Parses a leading `{1,2}` or `[1,Inf[` style interval, returning the remaining text.
    fn parse(part: &str) -> Option<(Self, &str)> {
        let mut chars = part.chars();
        match chars.next()? {
            '{' => {
                let (inner, rest) = chars.as_str().split_once('}')?;
                let values = inner
                    .split(',')
                    .map(|v| parse_bound(v.trim()))
                    .collect::<Option<Vec<_>>>()?;
                Some((Self::Set(values), rest.trim_start()))
            },
            open @ ('[' | ']') => {
                let body = chars.as_str();
                let (low, rest) = body.split_once(',')?;
                let close_at = rest.find([']', '['])?;
                let high = &rest[..close_at];
                let close = rest[close_at..].chars().next()?;
                let text = &rest[close_at + close.len_utf8()..];
                Some((
                    Self::Range {
                        low: parse_bound(low.trim())?,
                        low_inclusive: open == '[',
                        high: parse_bound(high.trim())?,
                        high_inclusive: close == ']',
                    },
                    text.trim_start(),
                ))
            },
            _ => None,
        }
    }

    fn contains(&self, n: f64) -> bool {
        match self {
            Self::Set(values) => values.iter().any(|v| (v - n).abs() < f64::EPSILON),
            Self::Range { low, low_inclusive, high, high_inclusive } => {
                let above = if *low_inclusive { n >= *low } else { n > *low };
                let below = if *high_inclusive { n <= *high } else { n < *high };
                above && below
            },
        }
    }
}

fn parse_bound(token: &str) -> Option<f64> {
    match token {
        "-Inf" => Some(f64::NEG_INFINITY),
        "Inf" | "+Inf" => Some(f64::INFINITY),
        _ => token.parse::<f64>().ok().filter(|v| v.is_finite()),
    }
}

/// Index of the plural form for `number`.
fn plural_position(number: f64, locale: &str) -> usize {
    let language = locale.split(['_', '-']).next().unwrap_or(locale);
    let n = number.abs();
    match language {
        "ja" | "ko" | "zh" | "tr" | "vi" | "th" | "id" | "ms" | "fa" | "ka" | "bo" | "dz" => 0,
        "fr" | "hy" | "ln" | "mg" | "ti" | "wa" => usize::from(n >= 2.0),
        _ => usize::from((n - 1.0).abs() >= f64::EPSILON),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(entries: &[(&str, &str)]) -> Parameters {
        entries.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
    }

    #[test]
    fn replaces_placeholders_literally() {
        let out = MessageFormatter::new()
            .format("Hello %name%, {role}!", "en", &params(&[("%name%", "Ada"), ("{role}", "admin")]))
            .unwrap();
        assert_eq!(out, "Hello Ada, admin!");
    }

    #[test]
    fn replaced_text_is_not_rescanned() {
        let out = replace_parameters("%a% %b%", &params(&[("%a%", "%b%"), ("%b%", "B")]));
        assert_eq!(out, "%b% B");
    }

    #[test]
    fn longest_key_wins() {
        let out = replace_parameters("%count%s", &params(&[("%count%", "3"), ("%count%s", "many")]));
        assert_eq!(out, "many");
    }

    #[test]
    fn explicit_intervals_are_checked_first() {
        let message = "{0} No apples|{1} One apple|]1,Inf[ %count% apples";
        let f = MessageFormatter::new();
        assert_eq!(f.format(message, "en", &params(&[(COUNT, "0")])).unwrap(), "No apples");
        assert_eq!(f.format(message, "en", &params(&[(COUNT, "1")])).unwrap(), "One apple");
        assert_eq!(f.format(message, "en", &params(&[(COUNT, "7")])).unwrap(), "7 apples");
    }

    #[test]
    fn negative_infinity_range() {
        let message = "[-Inf,0] none|[1,Inf[ some";
        let f = MessageFormatter::new();
        assert_eq!(f.format(message, "en", &params(&[(COUNT, "-3")])).unwrap(), "none");
        assert_eq!(f.format(message, "en", &params(&[(COUNT, "2")])).unwrap(), "some");
    }

    #[test]
    fn labelled_standard_forms_follow_language_rules() {
        let message = "one: %count% file|other: %count% files";
        let f = MessageFormatter::new();
        assert_eq!(f.format(message, "en", &params(&[(COUNT, "1")])).unwrap(), "1 file");
        assert_eq!(f.format(message, "en", &params(&[(COUNT, "0")])).unwrap(), "0 files");
        assert_eq!(f.format(message, "fr_FR", &params(&[(COUNT, "0")])).unwrap(), "0 file");
        assert_eq!(f.format(message, "ja", &params(&[(COUNT, "5")])).unwrap(), "5 file");
    }

    #[test]
    fn unmatched_choice_is_an_invalid_argument() {
        let err = MessageFormatter::new()
            .format("{0} none|{1} one", "en", &params(&[(COUNT, "5")]))
            .unwrap_err();
        assert_eq!(err.kind(), "InvalidArgument");
    }

    #[test]
    fn without_count_pipes_are_plain_text() {
        let out = MessageFormatter::new().format("a|b", "en", &Parameters::new()).unwrap();
        assert_eq!(out, "a|b");
    }

    #[test]
    fn double_pipe_is_a_literal() {
        let out = MessageFormatter::new()
            .format("one || two|many", "en", &params(&[(COUNT, "1")]))
            .unwrap();
        assert_eq!(out, "one | two");
    }
}
