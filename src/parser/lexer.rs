//! Tokenizer for policy text
//!
//! Comments (`// ...` and `/* ... */`) and whitespace are dropped here, so the
//! reader only ever sees meaningful tokens. Any mix of LF, CRLF and CR line
//! endings is accepted; line numbers are 1-based and only used for errors.

use std::iter::Peekable;
use std::str::Chars;

use crate::core::{PolicyError, PolicyResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// Bare word: keyword, class name, or `*`
    Word(String),
    /// Double quoted string with escapes resolved
    Quoted(String),
    LBrace,
    RBrace,
    Semicolon,
    Comma,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub line: usize,
}

/// Characters allowed in a bare word
pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '$' | '*' | '-')
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
        }
    }

    /// Consume one character, tracking line breaks
    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        match c {
            '\n' => self.line += 1,
            '\r' => {
                if self.chars.peek() != Some(&'\n') {
                    self.line += 1;
                }
            }
            _ => {}
        }
        Some(c)
    }

    fn skip_line_comment(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if c == '\n' || c == '\r' {
                break;
            }
            self.bump();
        }
    }

    fn skip_block_comment(&mut self, start_line: usize) -> PolicyResult<()> {
        while let Some(c) = self.bump() {
            if c == '*' && self.chars.peek() == Some(&'/') {
                self.bump();
                return Ok(());
            }
        }
        Err(PolicyError::parse(start_line, "unterminated block comment"))
    }

    fn read_quoted(&mut self, start_line: usize) -> PolicyResult<String> {
        let mut value = String::new();
        loop {
            match self.bump() {
                None | Some('\n') | Some('\r') => {
                    return Err(PolicyError::parse(start_line, "unterminated string"));
                }
                Some('"') => return Ok(value),
                Some('\\') => match self.bump() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some(other) => value.push(other),
                    None => return Err(PolicyError::parse(start_line, "unterminated string")),
                },
                Some(c) => value.push(c),
            }
        }
    }

    fn read_word(&mut self, first: char) -> String {
        let mut word = String::from(first);
        while let Some(&c) = self.chars.peek() {
            if !is_word_char(c) {
                break;
            }
            word.push(c);
            self.bump();
        }
        word
    }

    fn next_token(&mut self) -> PolicyResult<Option<Token>> {
        loop {
            let line = self.line;
            let Some(c) = self.bump() else {
                return Ok(None);
            };

            let kind = match c {
                c if c.is_whitespace() => continue,
                '/' => match self.chars.peek().copied() {
                    Some('/') => {
                        self.skip_line_comment();
                        continue;
                    }
                    Some('*') => {
                        self.bump();
                        self.skip_block_comment(line)?;
                        continue;
                    }
                    _ => return Err(PolicyError::parse(line, "unexpected character '/'")),
                },
                '{' => TokenKind::LBrace,
                '}' => TokenKind::RBrace,
                ';' => TokenKind::Semicolon,
                ',' => TokenKind::Comma,
                '"' => TokenKind::Quoted(self.read_quoted(line)?),
                c if is_word_char(c) => TokenKind::Word(self.read_word(c)),
                other => {
                    return Err(PolicyError::parse(
                        line,
                        format!("unexpected character '{}'", other),
                    ))
                }
            };
            return Ok(Some(Token { kind, line }));
        }
    }
}

/// Split policy text into tokens
pub(crate) fn tokenize(input: &str) -> PolicyResult<Vec<Token>> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_basic_tokens() {
        assert_eq!(
            kinds("grant { permission a.B \"x\", \"read\"; };"),
            vec![
                TokenKind::Word("grant".into()),
                TokenKind::LBrace,
                TokenKind::Word("permission".into()),
                TokenKind::Word("a.B".into()),
                TokenKind::Quoted("x".into()),
                TokenKind::Comma,
                TokenKind::Quoted("read".into()),
                TokenKind::Semicolon,
                TokenKind::RBrace,
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        let text = "/* header */\ngrant // trailing\n{ /* inner */ };";
        assert_eq!(
            kinds(text),
            vec![
                TokenKind::Word("grant".into()),
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn test_escapes() {
        assert_eq!(
            kinds(r#""C:\\temp\\x" "say \"hi\"""#),
            vec![
                TokenKind::Quoted("C:\\temp\\x".into()),
                TokenKind::Quoted("say \"hi\"".into()),
            ]
        );
    }

    #[test]
    fn test_line_numbers_with_mixed_endings() {
        let tokens = tokenize("a\r\nb\rc\nd").unwrap();
        let lines: Vec<usize> = tokens.iter().map(|t| t.line).collect();
        assert_eq!(lines, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_unterminated_comment() {
        let err = tokenize("grant {\n/* never closed").unwrap_err();
        assert!(matches!(err, PolicyError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("permission x \"abc\n").unwrap_err();
        assert!(matches!(err, PolicyError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("grant = {").unwrap_err();
        assert!(matches!(err, PolicyError::Parse { .. }));
    }
}
