//! Validated SQL identifiers.
//!
//! Postgres cannot bind identifiers as parameters, so table and column names
//! are checked here before they are spliced into statement text.
//!
//! - bare segments: `[A-Za-z_][A-Za-z0-9_$]*`
//! - quoted segments: `"..."`, any char except NUL, `""` for a literal quote
//! - segments are joined with `.` (`public.users.id`)

use crate::error::{SqlError, SqlResult};
use std::fmt;

/// One `.`-separated segment of an [`Ident`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Bare(String),
    Quoted(String),
}

/// A schema, table or column name that is safe to splice into SQL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident {
    segments: Vec<Segment>,
}

fn invalid(input: &str, reason: &str) -> SqlError {
    SqlError::validation(format!("invalid identifier '{input}': {reason}"))
}

impl Ident {
    /// Parse `input`, accepting dotted and quoted forms.
    pub fn parse(input: &str) -> SqlResult<Self> {
        if input.is_empty() {
            return Err(invalid(input, "empty"));
        }
        if input.contains('\0') {
            return Err(invalid(input, "contains NUL"));
        }

        let mut segments = Vec::new();
        let mut rest = input;
        loop {
            let (segment, tail) = if let Some(quoted) = rest.strip_prefix('"') {
                parse_quoted(input, quoted)?
            } else {
                parse_bare(input, rest)?
            };
            segments.push(segment);

            match tail.strip_prefix('.') {
                Some("") => return Err(invalid(input, "trailing '.'")),
                Some(next) => rest = next,
                None if tail.is_empty() => break,
                None => return Err(invalid(input, "expected '.' between segments")),
            }
        }

        Ok(Self { segments })
    }

    /// A single quoted segment, for names that are not valid bare identifiers.
    pub fn quoted(name: &str) -> SqlResult<Self> {
        if name.is_empty() {
            return Err(invalid(name, "empty quoted segment"));
        }
        if name.contains('\0') {
            return Err(invalid(name, "contains NUL"));
        }
        Ok(Self {
            segments: vec![Segment::Quoted(name.to_string())],
        })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Render the canonical SQL form.
    pub fn to_sql(&self) -> String {
        let mut out = String::new();
        self.write_sql(&mut out);
        out
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            match segment {
                Segment::Bare(name) => out.push_str(name),
                Segment::Quoted(name) => {
                    out.push('"');
                    out.push_str(&name.replace('"', "\"\""));
                    out.push('"');
                }
            }
        }
    }
}

fn parse_quoted<'a>(input: &str, body: &'a str) -> SqlResult<(Segment, &'a str)> {
    let mut name = String::new();
    let mut chars = body.char_indices().peekable();
    while let Some((pos, c)) = chars.next() {
        if c != '"' {
            name.push(c);
            continue;
        }
        if matches!(chars.peek(), Some((_, '"'))) {
            chars.next();
            name.push('"');
            continue;
        }
        if name.is_empty() {
            return Err(invalid(input, "empty quoted segment"));
        }
        return Ok((Segment::Quoted(name), &body[pos + 1..]));
    }
    Err(invalid(input, "unclosed quote"))
}

fn parse_bare<'a>(input: &str, text: &'a str) -> SqlResult<(Segment, &'a str)> {
    let end = text.find('.').unwrap_or(text.len());
    let name = &text[..end];

    let mut chars = name.chars();
    match chars.next() {
        None => return Err(invalid(input, "empty segment")),
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        Some(c) => return Err(invalid(input, &format!("cannot start with '{c}'"))),
    }
    if let Some(c) = chars.find(|c| !(*c == '_' || *c == '$' || c.is_ascii_alphanumeric())) {
        return Err(invalid(input, &format!("unexpected character '{c}'")));
    }

    Ok((Segment::Bare(name.to_string()), &text[end..]))
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

/// Conversion into a validated [`Ident`], so builder APIs accept `&str`,
/// `String` or an already parsed `Ident`.
pub trait IntoIdent {
    fn into_ident(self) -> SqlResult<Ident>;
}

impl IntoIdent for Ident {
    fn into_ident(self) -> SqlResult<Ident> {
        Ok(self)
    }
}

impl IntoIdent for &Ident {
    fn into_ident(self) -> SqlResult<Ident> {
        Ok(self.clone())
    }
}

impl IntoIdent for &str {
    fn into_ident(self) -> SqlResult<Ident> {
        Ident::parse(self)
    }
}

impl IntoIdent for String {
    fn into_ident(self) -> SqlResult<Ident> {
        Ident::parse(&self)
    }
}
