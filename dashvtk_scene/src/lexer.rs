use dashvtk_variant::Number;

use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String), // View, background, true
    Number(Number),
    String(String),

    At,     // @
    Equals, // =
    Comma,  // ,
    LParen, // (
    RParen, // )
    LBrace, // {
    RBrace, // }

    LBracket, // [
    RBracket, // ]

    Slash, // /
    Eof,
}

impl Token {
    pub fn describe(&self) -> String {
        match self {
            Token::Ident(s) => format!("identifier `{s}`"),
            Token::Number(n) => format!("number {n}"),
            Token::String(s) => format!("string {s:?}"),
            Token::At => "`@`".into(),
            Token::Equals => "`=`".into(),
            Token::Comma => "`,`".into(),
            Token::LParen => "`(`".into(),
            Token::RParen => "`)`".into(),
            Token::LBrace => "`{`".into(),
            Token::RBrace => "`}`".into(),
            Token::LBracket => "`[`".into(),
            Token::RBracket => "`]`".into(),
            Token::Slash => "`/`".into(),
            Token::Eof => "end of input".into(),
        }
    }
}

pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            chars: src.chars().peekable(),
            line: 1,
        }
    }

    /// Line of the next unread character.
    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c == Some('\n') {
            self.line += 1;
        }
        c
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else if c == '#' {
                while !matches!(self.peek(), None | Some('\n')) {
                    self.bump();
                }
            } else {
                break;
            }
        }
    }

    /// Next token and the line it starts on.
    pub fn next_token(&mut self) -> Result<(Token, usize), ParseError> {
        self.skip_trivia();
        let line = self.line;

        let c = match self.bump() {
            Some(c) => c,
            None => return Ok((Token::Eof, line)),
        };

        let tok = match c {
            '@' => Token::At,
            '=' => Token::Equals,
            ',' => Token::Comma,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '{' => Token::LBrace,
            '}' => Token::RBrace,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            '/' => Token::Slash,
            '"' => Token::String(self.string(line)?),
            c if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => {
                Token::Number(self.number(c, line)?)
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut s = String::new();
                s.push(c);
                while let Some(p) = self.peek() {
                    if !(p.is_alphanumeric() || p == '_') {
                        break;
                    }
                    s.push(p);
                    self.bump();
                }
                Token::Ident(s)
            }
            other => {
                return Err(ParseError::new(
                    line,
                    format!("unexpected character `{other}`"),
                ));
            }
        };
        Ok((tok, line))
    }

    fn string(&mut self, line: usize) -> Result<String, ParseError> {
        let mut s = String::new();
        loop {
            match self.bump() {
                None => return Err(ParseError::new(line, "unterminated string")),
                Some('"') => return Ok(s),
                Some('\\') => match self.bump() {
                    Some('n') => s.push('\n'),
                    Some('t') => s.push('\t'),
                    Some('"') => s.push('"'),
                    Some('\\') => s.push('\\'),
                    Some(other) => {
                        return Err(ParseError::new(
                            self.line,
                            format!("unknown escape `\\{other}`"),
                        ));
                    }
                    None => return Err(ParseError::new(line, "unterminated string")),
                },
                Some(c) => s.push(c),
            }
        }
    }

    fn number(&mut self, first: char, line: usize) -> Result<Number, ParseError> {
        let mut s = String::new();
        s.push(first);
        let mut float = first == '.';
        while let Some(p) = self.peek() {
            let exponent_sign = (p == '-' || p == '+') && matches!(s.chars().last(), Some('e' | 'E'));
            if p.is_ascii_digit() || exponent_sign {
                s.push(p);
            } else if p == '.' || p == 'e' || p == 'E' {
                float = true;
                s.push(p);
            } else {
                break;
            }
            self.bump();
        }

        let bad = || ParseError::new(line, format!("invalid number `{s}`"));
        if !float {
            if let Ok(v) = s.parse::<i64>() {
                return Ok(Number::I64(v));
            }
            if let Ok(v) = s.trim_start_matches('+').parse::<u64>() {
                return Ok(Number::U64(v));
            }
        }
        s.parse::<f64>().map(Number::F64).map_err(|_| bad())
    }
}
