use std::borrow::Cow;

/// Tokens longer than this (minus one, for old times' sake) are silently truncated.
pub const MAX_TOKEN_CHARS: usize = 1024;

/// A single word or quoted string pulled out of a script.
#[derive(Clone, Debug, PartialEq)]
pub struct Token<'a> {
    pub text: Cow<'a, str>,
    /// Line the token started on, counting from 1
    pub line: usize,
}

impl<'a> Token<'a> {
    fn new(bytes: &'a [u8], line: usize) -> Self {
        let len = bytes.len().min(MAX_TOKEN_CHARS - 1);
        Token {
            text: String::from_utf8_lossy(&bytes[..len]),
            line,
        }
    }

    pub fn is(&self, text: &str) -> bool {
        self.text == text
    }
}

#[derive(Debug, PartialEq)]
pub enum Step<'a> {
    Token(Token<'a>),
    /// Line breaks weren't allowed and one was found before the next token.  The cursor stays in
    /// front of the line break; use `skip_rest_of_line` to get past it.
    EndOfLine,
    /// Nothing left but whitespace and comments.
    EndOfInput,
}

impl<'a> Step<'a> {
    pub fn token(self) -> Option<Token<'a>> {
        match self {
            Step::Token(token) => Some(token),
            _ => None,
        }
    }
}

/// Cursor over a script buffer.  Whitespace, `//` comments and `/* */` comments separate tokens,
/// and newlines crossed along the way are counted.  A NUL byte ends the input just like the end
/// of the buffer does.
pub struct Tokenizer<'a> {
    buf: &'a [u8],
    pos: usize,
    line: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Tokenizer {
            buf,
            pos: 0,
            line: 1,
        }
    }

    /// Current line number, counting from 1.
    pub fn line(&self) -> usize {
        self.line
    }

    fn byte_at(&self, pos: usize) -> u8 {
        self.buf.get(pos).cloned().unwrap_or(0)
    }

    pub fn next_token(&mut self, allow_line_breaks: bool) -> Step<'a> {
        self.next_token_delimited(allow_line_breaks, None)
    }

    /// Like `next_token`, but an unquoted word also stops (without consuming) at `delimiter`.
    pub fn next_token_delimited(&mut self, allow_line_breaks: bool, delimiter: Option<u8>) -> Step<'a> {
        let mut pos = self.pos;
        // Only newlines between tokens end the line; ones inside block comments just get counted
        let mut lines = 0;
        let mut comment_lines = 0;
        // Just past the last block comment on this line; where an EndOfLine leaves the cursor
        let mut line_end = self.pos;

        loop {
            loop {
                let c = self.byte_at(pos);
                if c == 0 {
                    self.pos = self.buf.len();
                    self.line += lines + comment_lines;
                    return Step::EndOfInput;
                }
                if c > b' ' {
                    break;
                }
                if c == b'\n' {
                    lines += 1;
                }
                pos += 1;
            }

            if lines > 0 && !allow_line_breaks {
                self.pos = line_end;
                self.line += comment_lines;
                return Step::EndOfLine;
            }

            if self.byte_at(pos) != b'/' {
                break;
            }
            match self.byte_at(pos + 1) {
                b'/' => {
                    pos += 2;
                    while self.byte_at(pos) != 0 && self.byte_at(pos) != b'\n' {
                        pos += 1;
                    }
                }
                b'*' => {
                    // Unterminated block comments just eat the rest of the input
                    pos += 2;
                    loop {
                        match self.byte_at(pos) {
                            0 => break,
                            b'*' if self.byte_at(pos + 1) == b'/' => {
                                pos += 2;
                                line_end = pos;
                                break;
                            }
                            b'\n' => { comment_lines += 1; }
                            _ => {}
                        }
                        pos += 1;
                    }
                }
                _ => break,
            }
        }

        self.line += lines + comment_lines;
        let line = self.line;
        let buf = self.buf;

        if buf[pos] == b'"' {
            let start = pos + 1;
            pos = start;
            loop {
                match self.byte_at(pos) {
                    0 => {
                        self.pos = pos;
                        break;
                    }
                    b'"' => {
                        self.pos = pos + 1;
                        break;
                    }
                    b'\n' => { self.line += 1; }
                    _ => {}
                }
                pos += 1;
            }
            return Step::Token(Token::new(&buf[start..pos], line));
        }

        // The first character is always taken, even if it's the delimiter
        let start = pos;
        pos += 1;
        loop {
            let c = self.byte_at(pos);
            if c <= b' ' || Some(c) == delimiter {
                break;
            }
            pos += 1;
        }
        self.pos = pos;
        Step::Token(Token::new(&buf[start..pos], line))
    }

    /// Skip past the next newline, or to the end of input if there isn't one.
    pub fn skip_rest_of_line(&mut self) {
        while let Some(&c) = self.buf.get(self.pos) {
            self.pos += 1;
            if c == b'\n' {
                self.line += 1;
                break;
            }
        }
    }

    /// Consume tokens until the braces balance out, starting from `depth` levels deep.  Returns
    /// false if the input runs out first.
    pub fn skip_braced_section(&mut self, depth: usize) -> bool {
        let mut depth = depth;
        while depth > 0 {
            match self.next_token(true) {
                Step::Token(token) => {
                    if token.is("{") {
                        depth += 1;
                    }
                    else if token.is("}") {
                        depth -= 1;
                    }
                }
                _ => return false,
            }
        }
        true
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn words(src: &str) -> Vec<(String, usize)> {
        let mut tokenizer = Tokenizer::new(src.as_bytes());
        let mut ret = Vec::new();
        while let Some(token) = tokenizer.next_token(true).token() {
            ret.push((token.text.into_owned(), token.line));
        }
        ret
    }

    #[test]
    fn splits_words_and_counts_lines() {
        assert_eq!(words("foo bar\n\n  baz\tquux"), vec![
            ("foo".to_string(), 1),
            ("bar".to_string(), 1),
            ("baz".to_string(), 3),
            ("quux".to_string(), 3),
        ]);
    }

    #[test]
    fn skips_comments() {
        let src = "a // b c\n/* d\ne */ f\n/* never closed\ng h";
        assert_eq!(words(src), vec![("a".to_string(), 1), ("f".to_string(), 3)]);
    }

    #[test]
    fn comment_markers_inside_words_are_kept() {
        assert_eq!(words("textures/base/wall"), vec![("textures/base/wall".to_string(), 1)]);
    }

    #[test]
    fn quoted_tokens() {
        let mut tokenizer = Tokenizer::new(b"\"two words\" \"\" \"multi\nline\" after");
        assert_eq!(tokenizer.next_token(true).token().unwrap().text, "two words");
        // An empty quoted string is still a token
        let empty = tokenizer.next_token(true).token().unwrap();
        assert_eq!(empty.text, "");
        assert_eq!(tokenizer.next_token(true).token().unwrap().text, "multi\nline");
        let after = tokenizer.next_token(true).token().unwrap();
        assert_eq!(after.text, "after");
        assert_eq!(after.line, 2);
        assert_eq!(tokenizer.next_token(true), Step::EndOfInput);
    }

    #[test]
    fn unterminated_quote_takes_the_rest() {
        let mut tokenizer = Tokenizer::new(b"\"abc def");
        assert_eq!(tokenizer.next_token(true).token().unwrap().text, "abc def");
        assert_eq!(tokenizer.next_token(true), Step::EndOfInput);
    }

    #[test]
    fn line_breaks_stop_without_moving() {
        let mut tokenizer = Tokenizer::new(b"a b\nc");
        assert_eq!(tokenizer.next_token(false).token().unwrap().text, "a");
        assert_eq!(tokenizer.next_token(false).token().unwrap().text, "b");
        assert_eq!(tokenizer.next_token(false), Step::EndOfLine);
        assert_eq!(tokenizer.next_token(false), Step::EndOfLine);
        assert_eq!(tokenizer.line(), 1);

        tokenizer.skip_rest_of_line();
        let c = tokenizer.next_token(false).token().unwrap();
        assert_eq!(c.text, "c");
        assert_eq!(c.line, 2);
    }

    #[test]
    fn trailing_comment_then_newline_is_end_of_line() {
        let mut tokenizer = Tokenizer::new(b"a // note\nb");
        tokenizer.next_token(false);
        assert_eq!(tokenizer.next_token(false), Step::EndOfLine);
        assert_eq!(tokenizer.next_token(true).token().unwrap().text, "b");
    }

    #[test]
    fn block_comment_spanning_lines_stays_on_the_line() {
        let mut tokenizer = Tokenizer::new(b"a /* x\ny */ b\nc");
        assert_eq!(tokenizer.next_token(false).token().unwrap().text, "a");
        let b = tokenizer.next_token(false).token().unwrap();
        assert_eq!(b.text, "b");
        assert_eq!(b.line, 2);
        assert_eq!(tokenizer.next_token(false), Step::EndOfLine);
        tokenizer.skip_rest_of_line();
        let c = tokenizer.next_token(false).token().unwrap();
        assert_eq!(c.text, "c");
        assert_eq!(c.line, 3);
    }

    #[test]
    fn end_of_line_after_a_multiline_comment() {
        let mut tokenizer = Tokenizer::new(b"a /* x\ny */\nb");
        tokenizer.next_token(false);
        assert_eq!(tokenizer.next_token(false), Step::EndOfLine);
        assert_eq!(tokenizer.line(), 2);
        tokenizer.skip_rest_of_line();
        let b = tokenizer.next_token(false).token().unwrap();
        assert_eq!(b.text, "b");
        assert_eq!(b.line, 3);
    }

    #[test]
    fn delimiter_ends_words() {
        let mut tokenizer = Tokenizer::new(b"key=value");
        assert_eq!(tokenizer.next_token_delimited(true, Some(b'=')).token().unwrap().text, "key");
        // The delimiter itself isn't consumed, so it leads the next word
        assert_eq!(tokenizer.next_token_delimited(true, Some(b'=')).token().unwrap().text, "=value");
    }

    #[test]
    fn long_tokens_are_truncated() {
        let long = "x".repeat(MAX_TOKEN_CHARS * 2);
        let src = format!("{} next", long);
        let found = words(&src);
        assert_eq!(found[0].0.len(), MAX_TOKEN_CHARS - 1);
        assert_eq!(found[1].0, "next");
    }

    #[test]
    fn empty_input() {
        assert_eq!(Tokenizer::new(b"").next_token(true), Step::EndOfInput);
        assert_eq!(Tokenizer::new(b"  \n // hi").next_token(true), Step::EndOfInput);
    }

    #[test]
    fn braced_sections() {
        let mut tokenizer = Tokenizer::new(b"{ map foo { nested } } next");
        assert!(tokenizer.next_token(true).token().unwrap().is("{"));
        assert!(tokenizer.skip_braced_section(1));
        assert_eq!(tokenizer.next_token(true).token().unwrap().text, "next");

        let mut tokenizer = Tokenizer::new(b"{ map foo { nested }");
        tokenizer.next_token(true);
        assert!(!tokenizer.skip_braced_section(1));
    }

    #[test]
    fn braces_glued_to_words_dont_count() {
        let mut tokenizer = Tokenizer::new(b"{ a{ }b }");
        tokenizer.next_token(true);
        assert!(tokenizer.skip_braced_section(1));
        assert_eq!(tokenizer.next_token(true), Step::EndOfInput);
    }
}
