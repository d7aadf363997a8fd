use crate::ast::{Node, Prop, Tree, Value};
use crate::error::ParseError;
use crate::lexer::{Lexer, Token, TokenWithPos};

// ── Parser ────────────────────────────────────────────────────────────────

pub struct Parser {
    tokens: Vec<TokenWithPos>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<TokenWithPos>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn current_pos(&self) -> (usize, usize) {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|t| (t.line, t.col))
            .unwrap_or((1, 1))
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).map(|t| &t.token).unwrap_or(&Token::Eof)
    }

    fn peek_ahead(&self, offset: usize) -> &Token {
        self.tokens.get(self.pos + offset).map(|t| &t.token).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn err(&self, msg: impl Into<String>) -> ParseError {
        let (line, col) = self.current_pos();
        ParseError::new(msg, line, col)
    }

    // ── Document ──────────────────────────────────────────────────────────

    pub fn parse_tree(&mut self) -> Result<Tree, ParseError> {
        let root = self.parse_node()?;
        match self.peek() {
            Token::Eof => Ok(Tree { root }),
            tok => Err(self.err(format!("expected end of input after the root element, got {:?}", tok))),
        }
    }

    // ── Node ──────────────────────────────────────────────────────────────

    fn parse_node(&mut self) -> Result<Node, ParseError> {
        let (line, col) = self.current_pos();
        let tag = match self.advance() {
            Token::Ident(s) => s,
            tok => return Err(ParseError::new(format!("expected a tag name, got {:?}", tok), line, col)),
        };

        let text = if let Token::Str(s) = self.peek() {
            let s = s.clone();
            self.advance();
            Some(s)
        } else {
            None
        };

        let (props, children) = if self.peek() == &Token::LBrace {
            self.parse_block()?
        } else {
            (Vec::new(), Vec::new())
        };

        Ok(Node { tag, text, props, children, line })
    }

    // ── Block ─────────────────────────────────────────────────────────────

    /// `{ item* }`, where `ident ":"` starts a property and any other
    /// identifier starts a child element.
    fn parse_block(&mut self) -> Result<(Vec<Prop>, Vec<Node>), ParseError> {
        self.advance(); // `{`
        let mut props = Vec::new();
        let mut children = Vec::new();

        loop {
            match self.peek() {
                Token::RBrace => {
                    self.advance();
                    break;
                }
                Token::Eof => return Err(self.err("unclosed '{' block")),
                Token::Ident(_) if self.peek_ahead(1) == &Token::Colon => props.push(self.parse_prop()?),
                Token::Ident(_) => children.push(self.parse_node()?),
                tok => {
                    return Err(self.err(format!(
                        "unexpected {:?} inside block, expected `key: value` or a tag name",
                        tok
                    )));
                }
            }
        }

        Ok((props, children))
    }

    // ── Prop ──────────────────────────────────────────────────────────────

    fn parse_prop(&mut self) -> Result<Prop, ParseError> {
        let key = match self.advance() {
            Token::Ident(s) => s,
            tok => return Err(self.err(format!("expected a property name, got {:?}", tok))),
        };
        self.advance(); // `:`
        let value = self.parse_value()?;
        Ok(Prop { key, value })
    }

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        let at = self.current_pos();
        match self.advance() {
            Token::Str(s) => Ok(Value::Str(s)),
            Token::Number(n) => Ok(Value::Number(n)),
            Token::Ident(s) => Ok(Value::Ident(s)),
            tok => Err(ParseError::new(format!("expected a value, got {:?}", tok), at.0, at.1)),
        }
    }
}

// ── Public parse entry point ──────────────────────────────────────────────

/// Parses `.vml` source into a [`Tree`].
pub fn parse_str(src: &str) -> Result<Tree, ParseError> {
    let tokens = Lexer::new(src).tokenize()?;
    Parser::new(tokens).parse_tree()
}
