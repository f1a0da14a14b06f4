//! Minimal lexer over module text.
//!
//! Yields the significant characters of a region: whitespace and comments are
//! skipped, and each quoted string literal is a single token so that brackets
//! or quotes inside it are never mistaken for structure.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Token {
    Char { at: usize, ch: char },
    Str { start: usize, end: usize },
}

impl Token {
    /// Byte offset just past the token.
    pub(crate) fn end(&self) -> usize {
        match *self {
            Token::Char { at, ch } => at + ch.len_utf8(),
            Token::Str { end, .. } => end,
        }
    }
}

pub(crate) struct Scanner<'a> {
    text: &'a str,
    pos: usize,
    limit: usize,
}

impl<'a> Scanner<'a> {
    /// Scan `text[from..]`.
    pub(crate) fn new(text: &'a str, from: usize) -> Self {
        Self {
            text,
            pos: from,
            limit: text.len(),
        }
    }

    /// Scan `text[from..to]`.
    pub(crate) fn bounded(text: &'a str, from: usize, to: usize) -> Self {
        Self {
            text,
            pos: from,
            limit: to,
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if self.pos >= self.limit {
                return None;
            }
            let rest = &self.text[self.pos..self.limit];
            let ch = rest.chars().next()?;
            let at = self.pos;

            if ch.is_whitespace() {
                self.pos += ch.len_utf8();
                continue;
            }
            if rest.starts_with("//") {
                self.pos = rest.find('\n').map_or(self.limit, |i| at + i + 1);
                continue;
            }
            if rest.starts_with("/*") {
                self.pos = rest[2..].find("*/").map_or(self.limit, |i| at + 2 + i + 2);
                continue;
            }
            if matches!(ch, '"' | '\'' | '`') {
                let end = string_end(rest, ch).map_or(self.limit, |len| at + len);
                self.pos = end;
                return Some(Token::Str { start: at, end });
            }

            self.pos += ch.len_utf8();
            return Some(Token::Char { at, ch });
        }
    }
}

/// Length of the string literal at the start of `rest`, including both
/// quotes, or `None` if it never closes.
fn string_end(rest: &str, quote: char) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in rest.char_indices().skip(1) {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return Some(i + c.len_utf8());
        }
    }
    None
}

/// Offset of the `]` that closes an array whose contents begin at `from`.
pub(crate) fn find_closing_bracket(text: &str, from: usize) -> Option<usize> {
    let mut depth = 0usize;
    for token in Scanner::new(text, from) {
        if let Token::Char { at, ch } = token {
            match ch {
                '[' => depth += 1,
                ']' if depth == 0 => return Some(at),
                ']' => depth -= 1,
                _ => {}
            }
        }
    }
    None
}

/// End offset of the last significant token in `text[from..to]`.
pub(crate) fn last_significant_end(text: &str, from: usize, to: usize) -> Option<usize> {
    Scanner::bounded(text, from, to).last().map(|t| t.end())
}
