//! # Line Lexer
//!
//! Splits one input line into argument strings in a single left-to-right scan.
//!
//! - Whitespace separates tokens.
//! - `'...'` and `"..."` group a token; escapes are resolved inside.
//! - `r:` takes the rest of the line as one escaped token, and is dropped when
//!   that token resolves to nothing.
//! - `rr:` takes the rest of the line verbatim.
//!
//! Escapes: `\a \b \f \n \r \t \v \\ \' \" \<space>`, plus numeric code points
//! `\b<binary>`, `\o<octal>`, `\x<hex>` and `\<decimal>`. A numeric escape
//! consumes the longest run of digits that follows it.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// No closing quote before the end of the line.
    #[error("unterminated {0} quote")]
    UnterminatedQuote(char),
    #[error("unknown escape sequence '\\{0}'")]
    UnknownEscape(char),
    /// `\o`, `\x` or `\<decimal>` with no digits after it.
    #[error("escape '\\{0}' is missing its digits")]
    MissingDigits(char),
    /// The digit run is not a Unicode scalar value.
    #[error("'{0}' is not a valid code point")]
    InvalidCodePoint(String),
    #[error("line ends in the middle of an escape sequence")]
    UnexpectedEnd,
}

/// A malformed line. `offset` is the byte offset of the quote or backslash
/// that started the failing construct.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("parse error at offset {offset}: {kind}")]
pub struct ParseError {
    /// Byte offset of the construct that failed.
    pub offset: usize,
    /// What went wrong.
    pub kind: ParseErrorKind,
}

impl ParseError {
    fn new(offset: usize, kind: ParseErrorKind) -> Self {
        Self { offset, kind }
    }

    /// The error text without the offset prefix.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// Moves the offset by `by` bytes, for text that was cut out of a longer line.
    pub(crate) fn shifted(mut self, by: usize) -> Self {
        self.offset += by;
        self
    }
}

/// A lazy token stream over one line. It stops for good after the first
/// error or after a rest operator.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    line: &'a str,
    pos: usize,
    done: bool,
}

impl<'a> Lexer<'a> {
    /// A lexer positioned at the start of `line`.
    pub fn new(line: &'a str) -> Self {
        Self {
            line,
            pos: 0,
            done: false,
        }
    }

    fn remaining(&self) -> &'a str {
        self.line.get(self.pos..).unwrap_or_default()
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&mut self, c: char) {
        self.pos += c.len_utf8();
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek().filter(|c| c.is_whitespace()) {
            self.advance(c);
        }
    }

    /// Reads an unquoted token up to the next unescaped whitespace.
    fn bare(&mut self) -> Result<Option<String>, ParseError> {
        let mut token = String::new();
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                break;
            }
            if c == '\\' {
                token.push(self.escape()?);
            } else {
                token.push(c);
                self.advance(c);
            }
        }
        Ok(Some(token))
    }

    /// Reads a quoted token. The closing quote ends the token even when it is
    /// directly followed by more text.
    fn quoted(&mut self, quote: char) -> Result<Option<String>, ParseError> {
        let start = self.pos;
        self.advance(quote);
        let mut token = String::new();
        loop {
            match self.peek() {
                None => {
                    return Err(ParseError::new(
                        start,
                        ParseErrorKind::UnterminatedQuote(quote),
                    ));
                }
                Some(c) if c == quote => {
                    self.advance(c);
                    return Ok(Some(token));
                }
                Some('\\') => token.push(self.escape()?),
                Some(c) => {
                    token.push(c);
                    self.advance(c);
                }
            }
        }
    }

    /// The `r:` operator: everything left, escapes resolved. Empty means no token.
    fn rest(&mut self) -> Result<Option<String>, ParseError> {
        let mut token = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                token.push(self.escape()?);
            } else {
                token.push(c);
                self.advance(c);
            }
        }
        Ok((!token.is_empty()).then_some(token))
    }

    /// Resolves the escape sequence starting at the backslash under the cursor.
    fn escape(&mut self) -> Result<char, ParseError> {
        let start = self.pos;
        self.advance('\\');
        let c = self
            .peek()
            .ok_or(ParseError::new(start, ParseErrorKind::UnexpectedEnd))?;
        self.advance(c);

        let resolved = match c {
            'a' => '\x07',
            'f' => '\x0C',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\x0B',
            '\\' | '\'' | '"' | ' ' => c,
            // `\b` alone is backspace; with binary digits it is a code point.
            'b' => match self.digits(2) {
                Some(run) => code_point(run, 2, start)?,
                None => '\x08',
            },
            'o' => {
                let run = self
                    .digits(8)
                    .ok_or(ParseError::new(start, ParseErrorKind::MissingDigits('o')))?;
                code_point(run, 8, start)?
            }
            'x' => {
                let run = self
                    .digits(16)
                    .ok_or(ParseError::new(start, ParseErrorKind::MissingDigits('x')))?;
                code_point(run, 16, start)?
            }
            d if d.is_ascii_digit() => {
                // Step back so the first digit is part of the run.
                self.pos -= 1;
                let run = self
                    .digits(10)
                    .ok_or(ParseError::new(start, ParseErrorKind::MissingDigits(d)))?;
                code_point(run, 10, start)?
            }
            other => {
                return Err(ParseError::new(
                    start,
                    ParseErrorKind::UnknownEscape(other),
                ));
            }
        };
        Ok(resolved)
    }

    /// Consumes the longest run of digits in `radix`, if there is one.
    fn digits(&mut self, radix: u32) -> Option<&'a str> {
        let begin = self.pos;
        while let Some(c) = self.peek().filter(|c| c.is_digit(radix)) {
            self.advance(c);
        }
        let line = self.line;
        let end = self.pos;
        line.get(begin..end).filter(|run| !run.is_empty())
    }
}

fn code_point(run: &str, radix: u32, offset: usize) -> Result<char, ParseError> {
    u32::from_str_radix(run, radix)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| {
            ParseError::new(offset, ParseErrorKind::InvalidCodePoint(run.to_string()))
        })
}

impl Iterator for Lexer<'_> {
    type Item = Result<String, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        self.skip_whitespace();

        let remaining = self.remaining();
        let result = if remaining.is_empty() {
            Ok(None)
        } else if let Some(raw) = remaining.strip_prefix("rr:") {
            self.pos = self.line.len();
            self.done = true;
            Ok(Some(raw.to_string()))
        } else if remaining.starts_with("r:") {
            self.pos += 2;
            self.done = true;
            self.rest()
        } else if let Some(quote) = remaining.chars().next().filter(|c| *c == '"' || *c == '\'')
        {
            self.quoted(quote)
        } else {
            self.bare()
        };

        match result {
            Ok(Some(token)) => {
                log::trace!("Lexed token {:?}", token);
                Some(Ok(token))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl std::iter::FusedIterator for Lexer<'_> {}

/// Tokenizes a whole line, stopping at the first error.
pub fn tokenize(line: &str) -> Result<Vec<String>, ParseError> {
    Lexer::new(line).collect()
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(line: &str) -> Vec<String> {
        tokenize(line).unwrap()
    }

    // --- Plain Splitting ---

    #[test]
    fn test_splits_on_whitespace_runs() {
        assert_eq!(tokens("  alpha  beta\tgamma \n"), vec!["alpha", "beta", "gamma"]);
        assert!(tokens("").is_empty());
        assert!(tokens("   \t ").is_empty());
    }

    #[test]
    fn test_non_ascii_tokens() {
        assert_eq!(tokens("héllo wörld ✓"), vec!["héllo", "wörld", "✓"]);
    }

    // --- Quotes ---

    #[test]
    fn test_quoted_tokens() {
        assert_eq!(
            tokens("\"hello world\" 'how are you?'"),
            vec!["hello world", "how are you?"]
        );
    }

    #[test]
    fn test_other_quote_is_literal_inside_quotes() {
        assert_eq!(tokens(r#""it's" 'say "hi"'"#), vec!["it's", "say \"hi\""]);
    }

    #[test]
    fn test_empty_quotes_yield_empty_token() {
        assert_eq!(tokens("a \"\" b"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_closing_quote_ends_token() {
        assert_eq!(tokens("\"ab\"cd"), vec!["ab", "cd"]);
    }

    #[test]
    fn test_quote_inside_bare_token_is_literal() {
        assert_eq!(tokens("don't"), vec!["don't"]);
    }

    #[test]
    fn test_unterminated_quote_points_at_quote() {
        let err = tokenize("ok 'never closed").unwrap_err();
        assert_eq!(err.offset, 3);
        assert_eq!(err.kind, ParseErrorKind::UnterminatedQuote('\''));
    }

    // --- Escapes ---

    #[test]
    fn test_control_character_escapes() {
        assert_eq!(tokens("\\a\\b\\f"), vec!["\x07\x08\x0C"]);
        assert_eq!(tokens(r"\n\r\t\v"), vec!["\n\r\t\x0B"]);
    }

    #[test]
    fn test_escaped_space_and_quotes() {
        assert_eq!(tokens(r"hello\ world"), vec!["hello world"]);
        assert_eq!(tokens(r#"\"q\" \'s\' \\"#), vec!["\"q\"", "'s'", "\\"]);
    }

    #[test]
    fn test_escapes_inside_quotes() {
        assert_eq!(tokens(r#""tab\there" 'q\'q'"#), vec!["tab\there", "q'q"]);
    }

    #[test]
    fn test_numeric_escapes() {
        assert_eq!(tokens(r"\x41\o102\67"), vec!["ABC"]);
        assert_eq!(tokens(r"\b1000001"), vec!["A"]);
        assert_eq!(tokens(r"\x2713"), vec!["✓"]);
    }

    #[test]
    fn test_numeric_escape_takes_longest_digit_run() {
        // `\x20` followed by `ab` keeps going: 0x20ab is a single code point.
        assert_eq!(tokens(r"\x20ab"), vec!["\u{20ab}"]);
        assert_eq!(tokens(r"\x20world"), vec![" world"]);
    }

    #[test]
    fn test_backspace_when_no_binary_digits() {
        assert_eq!(tokens(r"\b2"), vec!["\x082"]);
    }

    #[test]
    fn test_unknown_escape_points_at_backslash() {
        let err = tokenize(r"abc d\q").unwrap_err();
        assert_eq!(err.offset, 5);
        assert_eq!(err.kind, ParseErrorKind::UnknownEscape('q'));
    }

    #[test]
    fn test_missing_digits() {
        let err = tokenize(r"\xg").unwrap_err();
        assert_eq!(err.offset, 0);
        assert_eq!(err.kind, ParseErrorKind::MissingDigits('x'));
        let err = tokenize(r"a \o9").unwrap_err();
        assert_eq!(err.offset, 2);
        assert_eq!(err.kind, ParseErrorKind::MissingDigits('o'));
    }

    #[test]
    fn test_invalid_code_point() {
        let err = tokenize(r"\x110000").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidCodePoint("110000".to_string()));
        let err = tokenize(r"\xd800").unwrap_err();
        assert_eq!(err.offset, 0);
        assert!(err.message().contains("d800"));
    }

    #[test]
    fn test_end_of_input_mid_escape() {
        let err = tokenize("abc\\").unwrap_err();
        assert_eq!(err.offset, 3);
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEnd);
        let err = tokenize("'abc\\").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEnd);
    }

    // --- Rest Operators ---

    #[test]
    fn test_rest_operator_resolves_escapes() {
        assert_eq!(
            tokens(r"say r:hello \x41 'world'"),
            vec!["say", "hello A 'world'"]
        );
    }

    #[test]
    fn test_empty_rest_is_dropped() {
        assert_eq!(tokens("hello world r:"), vec!["hello", "world"]);
    }

    #[test]
    fn test_raw_rest_is_verbatim() {
        assert_eq!(tokens("rr:hello\\x20world"), vec!["hello\\x20world"]);
        assert_eq!(tokens("a rr: 'x' \\q"), vec!["a", " 'x' \\q"]);
    }

    #[test]
    fn test_empty_raw_rest_is_kept() {
        assert_eq!(tokens("a rr:"), vec!["a", ""]);
    }

    #[test]
    fn test_bare_r_falls_back_to_normal_token() {
        assert_eq!(tokens("r rx rr ar: r"), vec!["r", "rx", "rr", "ar:", "r"]);
    }

    #[test]
    fn test_rest_operator_reports_escape_errors() {
        let err = tokenize(r"a r:ok\z").unwrap_err();
        assert_eq!(err.offset, 6);
    }

    // --- Laziness ---

    #[test]
    fn test_lexer_is_lazy_and_fuses_after_error() {
        let mut lexer = Lexer::new(r"one \q three");
        assert_eq!(lexer.next(), Some(Ok("one".to_string())));
        assert!(matches!(lexer.next(), Some(Err(_))));
        assert_eq!(lexer.next(), None);
        assert_eq!(lexer.next(), None);
    }
}
