/// Prompt templates: placeholder parsing and two-pass substitution.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unclosed brace at offset {0}")]
    UnclosedBrace(usize),
    #[error("nested braces are not allowed (offset {0})")]
    NestedBrace(usize),
    #[error("empty placeholder at offset {0}")]
    EmptyPlaceholder(usize),
    #[error("unmatched closing brace at offset {0}")]
    UnmatchedClose(usize),
}

/// A segment of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text, emitted as-is.
    Literal(String),
    /// Named slot reference: `{slot}`.
    Slot(String),
}

/// A parsed template: the original text plus its segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

/// One piece of a resolved template, produced by [`Template::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece<'a> {
    Text(&'a str),
    Value(&'a str),
    /// A placeholder with no value; rendered as `[slot]`.
    Unresolved(&'a str),
}

impl Template {
    /// Parse a template string into a sequence of segments.
    ///
    /// Syntax:
    /// - `{slot}` → `Slot`
    /// - `{{` / `}}` → literal `{` / `}`
    /// - Everything else → `Literal`
    pub fn parse(input: &str) -> Result<Template, TemplateError> {
        let mut segments = Vec::new();
        let mut literal_buf = String::new();
        let chars: Vec<(usize, char)> = input.char_indices().collect();
        let len = chars.len();
        let mut i = 0;

        while i < len {
            let (offset, c) = chars[i];
            if c == '{' {
                if i + 1 < len && chars[i + 1].1 == '{' {
                    literal_buf.push('{');
                    i += 2;
                    continue;
                }

                if !literal_buf.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal_buf)));
                }

                let start = i + 1;
                let mut end = start;
                while end < len && chars[end].1 != '}' {
                    if chars[end].1 == '{' {
                        return Err(TemplateError::NestedBrace(chars[end].0));
                    }
                    end += 1;
                }
                if end == len {
                    return Err(TemplateError::UnclosedBrace(offset));
                }

                let name: String = chars[start..end].iter().map(|(_, c)| c).collect();
                if name.is_empty() {
                    return Err(TemplateError::EmptyPlaceholder(offset));
                }

                segments.push(Segment::Slot(name));
                i = end + 1;
            } else if c == '}' {
                if i + 1 < len && chars[i + 1].1 == '}' {
                    literal_buf.push('}');
                    i += 2;
                    continue;
                }
                return Err(TemplateError::UnmatchedClose(offset));
            } else {
                literal_buf.push(c);
                i += 1;
            }
        }

        if !literal_buf.is_empty() {
            segments.push(Segment::Literal(literal_buf));
        }

        Ok(Template {
            source: input.to_string(),
            segments,
        })
    }

    /// The template text as written in its profile.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Slot names referenced by this template, in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|seg| match seg {
            Segment::Slot(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// First pass: decide for every placeholder whether `lookup` can fill it.
    pub fn resolve<'a, F>(&'a self, lookup: F) -> Vec<Piece<'a>>
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        self.segments
            .iter()
            .map(|seg| match seg {
                Segment::Literal(text) => Piece::Text(text),
                Segment::Slot(name) => match lookup(name) {
                    Some(value) => Piece::Value(value),
                    None => Piece::Unresolved(name),
                },
            })
            .collect()
    }

    /// Resolve and render in one step.
    pub fn fill<'a, F>(&'a self, lookup: F) -> String
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        render(&self.resolve(lookup))
    }
}

/// Second pass: concatenate resolved pieces, marking unresolved slots.
pub fn render(pieces: &[Piece<'_>]) -> String {
    let mut out = String::new();
    for piece in pieces {
        match piece {
            Piece::Text(text) | Piece::Value(text) => out.push_str(text),
            Piece::Unresolved(name) => {
                out.push('[');
                out.push_str(name);
                out.push(']');
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_literal_only() {
        let t = Template::parse("a quiet harbour at dawn").unwrap();
        assert_eq!(
            t.segments(),
            &[Segment::Literal("a quiet harbour at dawn".to_string())]
        );
    }

    #[test]
    fn parse_slots_and_literals() {
        let t = Template::parse("{subject} in {environment}, {style}").unwrap();
        assert_eq!(
            t.segments(),
            &[
                Segment::Slot("subject".to_string()),
                Segment::Literal(" in ".to_string()),
                Segment::Slot("environment".to_string()),
                Segment::Literal(", ".to_string()),
                Segment::Slot("style".to_string()),
            ]
        );
        let names: Vec<&str> = t.placeholders().collect();
        assert_eq!(names, vec!["subject", "environment", "style"]);
    }

    #[test]
    fn parse_escaped_braces() {
        let t = Template::parse("use {{braces}} here").unwrap();
        assert_eq!(
            t.segments(),
            &[Segment::Literal("use {braces} here".to_string())]
        );
        assert_eq!(t.source(), "use {{braces}} here");
    }

    #[test]
    fn parse_multibyte_text() {
        let t = Template::parse("café {mood} — naïve").unwrap();
        assert_eq!(t.segments().len(), 3);
        assert_eq!(t.segments()[1], Segment::Slot("mood".to_string()));
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            Template::parse("bad {} here"),
            Err(TemplateError::EmptyPlaceholder(4))
        );
        assert_eq!(
            Template::parse("bad {outer{inner}}"),
            Err(TemplateError::NestedBrace(10))
        );
        assert_eq!(
            Template::parse("bad {unclosed"),
            Err(TemplateError::UnclosedBrace(4))
        );
        assert_eq!(
            Template::parse("bad } here"),
            Err(TemplateError::UnmatchedClose(4))
        );
    }

    #[test]
    fn resolve_marks_unknown_slots() {
        let t = Template::parse("{subject} under {sky}").unwrap();
        let pieces = t.resolve(|name| (name == "subject").then_some("a fox"));
        assert_eq!(
            pieces,
            vec![
                Piece::Value("a fox"),
                Piece::Text(" under "),
                Piece::Unresolved("sky"),
            ]
        );
        assert_eq!(render(&pieces), "a fox under [sky]");
    }

    #[test]
    fn fill_repeated_placeholder() {
        let t = Template::parse("{mood}, very {mood}").unwrap();
        assert_eq!(t.fill(|_| Some("calm")), "calm, very calm");
    }
}
