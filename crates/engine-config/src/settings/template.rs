use crate::error::TemplateError;
use std::{fmt, str::FromStr};

/// Source query with a single `%s` slot for the watermark.
///
/// `%%` renders as a literal `%`; any other verb is rejected when the
/// template is parsed, so rendering cannot fail.
#[derive(Clone, PartialEq, Eq)]
pub struct QueryTemplate {
    raw: String,
}

impl QueryTemplate {
    pub fn parse(raw: &str) -> Result<Self, TemplateError> {
        let mut placeholders = 0;
        let mut chars = raw.char_indices();

        while let Some((position, ch)) = chars.next() {
            if ch != '%' {
                continue;
            }
            match chars.next() {
                Some((_, 's')) => placeholders += 1,
                Some((_, '%')) => {}
                Some((_, verb)) => return Err(TemplateError::UnsupportedVerb { verb, position }),
                None => return Err(TemplateError::TrailingPercent),
            }
        }

        match placeholders {
            0 => Err(TemplateError::NoPlaceholder),
            1 => Ok(QueryTemplate {
                raw: raw.to_string(),
            }),
            n => Err(TemplateError::TooManyPlaceholders(n)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Substitutes `watermark` into the placeholder.
    pub fn render(&self, watermark: &str) -> String {
        let mut out = String::with_capacity(self.raw.len() + watermark.len());
        let mut chars = self.raw.chars();

        while let Some(ch) = chars.next() {
            if ch != '%' {
                out.push(ch);
                continue;
            }
            match chars.next() {
                Some('s') => out.push_str(watermark),
                Some(other) => out.push(other),
                None => {}
            }
        }
        out
    }
}

impl FromStr for QueryTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for QueryTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("QueryTemplate").field(&self.raw).finish()
    }
}

impl fmt::Display for QueryTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
