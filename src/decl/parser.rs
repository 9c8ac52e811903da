//! Recursive-descent parser for annotated prototypes.
//!
//! Grammar:
//!
//! ```text
//! decl       := annotation* type IDENT '(' params? ')' annotation* ';'?
//! params     := 'void' | param (',' param)*
//! param      := annotation* type IDENT?
//! type       := 'const'? NAME+ 'const'? ('*' 'const'?)*
//! annotation := ('since' | 'until' | 'cs_type') '(' raw ')' | 'cs_split' | 'cs_omit'
//! ```

use crate::annotate::{Annotation, AnnotationKind, AnnotationSet};
use crate::decl::lexer::{Lexer, Token, TokenKind};
use crate::decl::{DeclError, FunctionDecl, ParamDecl, TypeRef};
use crate::domain::schema::{BUILTIN_MODIFIERS, TypeClass, TypeVocabulary};

/// Parse a snippet that must contain exactly one prototype.
pub fn parse_declaration(src: &str, vocab: &TypeVocabulary) -> Result<FunctionDecl, DeclError> {
    let mut decls = parse_declarations(src, vocab)?;
    if decls.len() != 1 {
        return Err(DeclError::FunctionCount(decls.len()));
    }
    Ok(decls.remove(0))
}

/// Parse every prototype in a snippet.
pub fn parse_declarations(src: &str, vocab: &TypeVocabulary) -> Result<Vec<FunctionDecl>, DeclError> {
    let tokens = Lexer::new(src).tokenize()?;
    let mut parser = Parser { src, tokens, pos: 0, vocab };
    let mut decls = Vec::new();
    while !parser.at_end() {
        decls.push(parser.parse_function()?);
    }
    Ok(decls)
}

struct Parser<'a> {
    src: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    vocab: &'a TypeVocabulary,
}

impl<'a> Parser<'a> {
    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    fn peek_ident(&self) -> Option<&str> {
        match self.peek_kind() {
            Some(TokenKind::Ident(name)) => Some(name),
            _ => None,
        }
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned()?;
        self.pos += 1;
        Some(token)
    }

    fn unexpected(&self, expected: &'static str) -> DeclError {
        match self.peek() {
            Some(token) => DeclError::UnexpectedToken {
                expected,
                found: self.src[token.start..token.end].to_string(),
                offset: token.start,
            },
            None => DeclError::UnexpectedEof { expected },
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token, DeclError> {
        match self.peek() {
            Some(token) if token.kind == kind => {
                let token = token.clone();
                self.pos += 1;
                Ok(token)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek_kind() == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, word: &str) -> bool {
        if self.peek_ident() == Some(word) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_ident(&mut self, expected: &'static str) -> Result<(String, usize), DeclError> {
        match self.peek() {
            Some(Token { kind: TokenKind::Ident(name), start, .. })
                if AnnotationKind::from_keyword(name).is_none() =>
            {
                let found = (name.clone(), *start);
                self.pos += 1;
                Ok(found)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    fn parse_function(&mut self) -> Result<FunctionDecl, DeclError> {
        let mut annotations = self.parse_annotations()?;
        let return_type = self.parse_type()?;
        let (name, _) = self.expect_ident("function name")?;

        self.expect(TokenKind::LParen, "'('")?;
        let params = self.parse_params()?;
        self.expect(TokenKind::RParen, "')'")?;

        annotations.extend(&self.parse_annotations()?);
        self.eat(&TokenKind::Semicolon);

        Ok(FunctionDecl { name, return_type, params, annotations })
    }

    fn parse_params(&mut self) -> Result<Vec<ParamDecl>, DeclError> {
        let mut params = Vec::new();
        if self.peek_kind() == Some(&TokenKind::RParen) {
            return Ok(params);
        }
        // `f(void)` declares no parameters.
        if self.peek_ident() == Some("void")
            && self.tokens.get(self.pos + 1).map(|t| &t.kind) == Some(&TokenKind::RParen)
        {
            self.pos += 1;
            return Ok(params);
        }

        loop {
            let annotations = self.parse_annotations()?;
            let ty = self.parse_type()?;
            let name = match self.peek_kind() {
                Some(TokenKind::Ident(_)) => self.expect_ident("parameter name")?.0,
                _ => String::new(),
            };
            params.push(ParamDecl { name, ty, annotations });

            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(params)
    }

    fn parse_annotations(&mut self) -> Result<AnnotationSet, DeclError> {
        let mut set = AnnotationSet::new();
        while let Some(kind) = self.peek_ident().and_then(AnnotationKind::from_keyword) {
            let offset = self.peek().map_or(0, |t| t.start);
            self.pos += 1;
            let payload = if kind.takes_payload() {
                Some(self.parse_payload()?)
            } else {
                None
            };
            let annotation = Annotation::new(kind, payload)
                .map_err(|source| DeclError::Annotation { source, offset })?;
            set.insert(annotation);
        }
        Ok(set)
    }

    /// Raw source text between balanced parentheses.
    fn parse_payload(&mut self) -> Result<&'a str, DeclError> {
        let open = self.expect(TokenKind::LParen, "'(' after annotation")?;
        let mut depth = 1usize;
        loop {
            let Some(token) = self.advance() else {
                return Err(DeclError::UnexpectedEof { expected: "')' closing annotation" });
            };
            match token.kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        let src: &'a str = self.src;
                        return Ok(&src[open.end..token.start]);
                    }
                }
                _ => {}
            }
        }
    }

    fn parse_type(&mut self) -> Result<TypeRef, DeclError> {
        let mut is_const = self.eat_keyword("const");

        let (first, offset) = self.expect_ident("type name")?;
        let mut name = first;
        // `unsigned int`, `long long`: a modifier absorbs a following builtin word.
        while BUILTIN_MODIFIERS.contains(&name.rsplit(' ').next().unwrap_or_default()) {
            let next_is_builtin = self
                .peek_ident()
                .and_then(|w| self.vocab.get(w))
                .is_some_and(|entry| entry.class == TypeClass::Builtin);
            if !next_is_builtin {
                break;
            }
            let (word, _) = self.expect_ident("type name")?;
            name.push(' ');
            name.push_str(&word);
        }

        if self.vocab.resolve(&name).is_none() {
            return Err(DeclError::UnknownType { name, offset });
        }

        is_const |= self.eat_keyword("const");

        let mut pointer_depth = 0u8;
        while self.eat(&TokenKind::Star) {
            pointer_depth = pointer_depth.saturating_add(1);
            self.eat_keyword("const");
        }

        Ok(TypeRef { name, is_const, pointer_depth })
    }
}
