//! Tokenizer for C declaration snippets.

use crate::decl::DeclError;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    /// Numeric literal, kept as written (only appears inside annotation payloads).
    Number(String),
    Star,
    LParen,
    RParen,
    Comma,
    Semicolon,
    /// Any other single character (`.`, `:`, `<`...), only valid inside payloads.
    Punct(char),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, DeclError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.src[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_trivia(&mut self) -> Result<(), DeclError> {
        loop {
            match (self.peek(), self.peek_second()) {
                (Some(c), _) if c.is_whitespace() => {
                    self.bump();
                }
                (Some('/'), Some('/')) => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                (Some('/'), Some('*')) => {
                    let start = self.pos;
                    self.pos += 2;
                    match self.src[self.pos..].find("*/") {
                        Some(end) => self.pos += end + 2,
                        None => return Err(DeclError::UnterminatedComment { offset: start }),
                    }
                }
                // Preprocessor lines are not part of the declaration.
                (Some('#'), _) => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>, DeclError> {
        self.skip_trivia()?;
        let start = self.pos;
        let Some(c) = self.bump() else {
            return Ok(None);
        };

        let kind = match c {
            '*' => TokenKind::Star,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            c if c.is_ascii_alphabetic() || c == '_' => {
                while matches!(self.peek(), Some(n) if n.is_ascii_alphanumeric() || n == '_') {
                    self.bump();
                }
                TokenKind::Ident(self.src[start..self.pos].to_string())
            }
            c if c.is_ascii_digit() => {
                while matches!(self.peek(), Some(n) if n.is_ascii_alphanumeric() || n == '.') {
                    self.bump();
                }
                TokenKind::Number(self.src[start..self.pos].to_string())
            }
            c if c.is_ascii_punctuation() => TokenKind::Punct(c),
            other => return Err(DeclError::UnexpectedChar { ch: other, offset: start }),
        };

        Ok(Some(Token { kind, start, end: self.pos }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src).tokenize().unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn declaration_tokens() {
        assert_eq!(
            kinds("Ped GET_PLAYER_PED(Player playerId);"),
            vec![
                TokenKind::Ident("Ped".into()),
                TokenKind::Ident("GET_PLAYER_PED".into()),
                TokenKind::LParen,
                TokenKind::Ident("Player".into()),
                TokenKind::Ident("playerId".into()),
                TokenKind::RParen,
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn comments_are_skipped() {
        let src = "// 0x43A66C31C68491C0\n/* block */ void A();";
        assert_eq!(kinds(src).len(), 5);
    }

    #[test]
    fn version_payload_lexes_as_number() {
        assert_eq!(
            kinds("since(1.0.2)"),
            vec![
                TokenKind::Ident("since".into()),
                TokenKind::LParen,
                TokenKind::Number("1.0.2".into()),
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn offsets_point_into_source() {
        let src = "int  foo";
        let tokens = Lexer::new(src).tokenize().unwrap();
        assert_eq!(&src[tokens[1].start..tokens[1].end], "foo");
    }

    #[test]
    fn unterminated_block_comment_fails() {
        let err = Lexer::new("int /* oops").tokenize().unwrap_err();
        assert_eq!(err, DeclError::UnterminatedComment { offset: 4 });
    }

    #[test]
    fn non_ascii_is_rejected() {
        let err = Lexer::new("int é").tokenize().unwrap_err();
        assert_eq!(err, DeclError::UnexpectedChar { ch: 'é', offset: 4 });
    }
}
