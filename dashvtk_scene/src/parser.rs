use std::collections::HashMap;
use std::sync::Arc;

use dashvtk_nodes::ComponentTag;
use dashvtk_variant::Variant;

use crate::builder::NodeBuilder;
use crate::error::ParseError;
use crate::lexer::{Lexer, Token};

/// Deepest allowed nesting of blocks, arrays and objects combined.
pub const MAX_DEPTH: usize = 128;

/// Parses `.vtks` text into an unvalidated node tree.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    line: usize,
    depth: usize,
    vars: HashMap<String, Variant>,
}

impl<'a> Parser<'a> {
    pub fn new(src: &'a str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(src);
        let (current, line) = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            line,
            depth: 0,
            vars: HashMap::new(),
        })
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        let (tok, line) = self.lexer.next_token()?;
        self.current = tok;
        self.line = line;
        Ok(())
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error(format!("nesting too deep (limit {MAX_DEPTH})")));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(self.line, message)
    }

    fn unexpected(&self, wanted: &str) -> ParseError {
        self.error(format!("expected {wanted}, found {}", self.current.describe()))
    }

    fn expect(&mut self, t: Token) -> Result<(), ParseError> {
        if self.current != t {
            return Err(self.unexpected(&t.describe()));
        }
        self.advance()
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match std::mem::replace(&mut self.current, Token::Eof) {
            Token::Ident(s) => {
                self.advance()?;
                Ok(s)
            }
            other => {
                self.current = other;
                Err(self.unexpected("identifier"))
            }
        }
    }

    /// `@name = value`, with the `@` already consumed.
    fn parse_var(&mut self) -> Result<(), ParseError> {
        let name = self.expect_ident()?;
        self.expect(Token::Equals)?;
        let value = self.parse_value()?;
        self.vars.insert(name, value);
        Ok(())
    }
}

impl<'a> Parser<'a> {
    fn parse_value(&mut self) -> Result<Variant, ParseError> {
        match std::mem::replace(&mut self.current, Token::Eof) {
            Token::Number(n) => {
                self.advance()?;
                Ok(Variant::Number(n))
            }
            Token::String(s) => {
                self.advance()?;
                Ok(Variant::from(s))
            }
            Token::Ident(word) => {
                let value = match word.as_str() {
                    "true" => Variant::Bool(true),
                    "false" => Variant::Bool(false),
                    "null" => Variant::Null,
                    _ => {
                        self.current = Token::Ident(word);
                        return Err(self.unexpected("value"));
                    }
                };
                self.advance()?;
                Ok(value)
            }
            Token::At => {
                self.advance()?;
                let line = self.line;
                let name = self.expect_ident()?;
                self.vars
                    .get(&name)
                    .cloned()
                    .ok_or_else(|| ParseError::new(line, format!("unknown variable @{name}")))
            }
            Token::LParen => {
                self.enter()?;
                self.advance()?;
                let mut items = Vec::new();
                while self.current != Token::RParen {
                    items.push(self.parse_value()?);
                    if self.current == Token::Comma {
                        self.advance()?;
                    } else if self.current != Token::RParen {
                        return Err(self.unexpected("`,` or `)`"));
                    }
                }
                self.advance()?;
                self.leave();
                Ok(Variant::Array(items))
            }
            Token::LBrace => {
                self.enter()?;
                self.advance()?;
                let mut map = std::collections::BTreeMap::new();
                while self.current != Token::RBrace {
                    let key = match std::mem::replace(&mut self.current, Token::Eof) {
                        Token::Ident(k) | Token::String(k) => k,
                        other => {
                            self.current = other;
                            return Err(self.unexpected("object key"));
                        }
                    };
                    let key_line = self.line;
                    self.advance()?;
                    self.expect(Token::Equals)?;
                    let value = self.parse_value()?;
                    if map.insert(Arc::<str>::from(key.as_str()), value).is_some() {
                        return Err(ParseError::new(
                            key_line,
                            format!("object key `{key}` set twice"),
                        ));
                    }
                    if self.current == Token::Comma {
                        self.advance()?;
                    }
                }
                self.advance()?;
                self.leave();
                Ok(Variant::Object(map))
            }
            other => {
                self.current = other;
                Err(self.unexpected("value"))
            }
        }
    }
}

impl<'a> Parser<'a> {
    fn parse_block_after_lbracket(&mut self) -> Result<NodeBuilder, ParseError> {
        let tag_line = self.line;
        self.enter()?;
        let tag = self.expect_ident()?;
        self.expect(Token::RBracket)?;

        let component: ComponentTag = tag
            .parse()
            .map_err(|e| ParseError::new(tag_line, format!("{e}")))?;
        let mut node = NodeBuilder::new(component);

        loop {
            match &self.current {
                Token::LBracket => {
                    self.advance()?;
                    if self.current == Token::Slash {
                        self.advance()?;
                        let end = self.expect_ident()?;
                        if end != tag {
                            return Err(self.error(format!(
                                "closing tag [/{end}] does not match [{tag}] opened on line {tag_line}"
                            )));
                        }
                        self.expect(Token::RBracket)?;
                        break;
                    }
                    let child = self.parse_block_after_lbracket()?;
                    node.push_child(child);
                }

                Token::At => {
                    self.advance()?;
                    self.parse_var()?;
                }

                Token::Ident(_) => {
                    let line = self.line;
                    let key = self.expect_ident()?;
                    self.expect(Token::Equals)?;
                    let value = self.parse_value()?;
                    if node.has_prop(&key) {
                        return Err(ParseError::new(
                            line,
                            format!("property `{key}` set twice in [{tag}]"),
                        ));
                    }
                    node.set_prop(key, value);
                }

                Token::Eof => {
                    return Err(ParseError::new(
                        tag_line,
                        format!("[{tag}] is never closed"),
                    ));
                }

                _ => return Err(self.unexpected("property, block or closing tag")),
            }
        }

        self.leave();
        Ok(node)
    }

    /// Parses a whole document: variables and exactly one root block.
    pub fn parse_document(mut self) -> Result<NodeBuilder, ParseError> {
        let mut root: Option<NodeBuilder> = None;

        loop {
            match self.current {
                Token::Eof => break,
                Token::At => {
                    self.advance()?;
                    self.parse_var()?;
                }
                Token::LBracket => {
                    let line = self.line;
                    self.advance()?;
                    let node = self.parse_block_after_lbracket()?;
                    if root.is_some() {
                        return Err(ParseError::new(line, "a scene has exactly one root block"));
                    }
                    root = Some(node);
                }
                _ => return Err(self.unexpected("`@variable` or `[Tag]`")),
            }
        }

        root.ok_or_else(|| ParseError::new(self.line, "no root block"))
    }
}

/// Parses `.vtks` source into a builder tree.
pub fn parse_vtks(src: &str) -> Result<NodeBuilder, ParseError> {
    Parser::new(src)?.parse_document()
}
