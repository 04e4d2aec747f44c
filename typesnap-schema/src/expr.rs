//! Type expression parser.
//!
//! Parses the Go type syntax used in `type` attributes of a universe
//! description into a [`TypeExpr`].

use crate::error::ParseError;
use crate::types::{ChanDir, TypeExpr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Star,
    LBracket,
    RBracket,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Arrow,
    Int(usize),
    Word(&'a str),
}

impl std::fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Star => f.write_str("'*'"),
            Self::LBracket => f.write_str("'['"),
            Self::RBracket => f.write_str("']'"),
            Self::LParen => f.write_str("'('"),
            Self::RParen => f.write_str("')'"),
            Self::LBrace => f.write_str("'{'"),
            Self::RBrace => f.write_str("'}'"),
            Self::Comma => f.write_str("','"),
            Self::Arrow => f.write_str("'<-'"),
            Self::Int(n) => write!(f, "'{n}'"),
            Self::Word(w) => write!(f, "'{w}'"),
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '/' | '-' | '~')
}

fn tokenize(src: &str) -> Result<Vec<(usize, Token<'_>)>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        let token = match c {
            c if c.is_whitespace() => continue,
            '*' => Token::Star,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '{' => Token::LBrace,
            '}' => Token::RBrace,
            ',' => Token::Comma,
            '<' => match chars.next() {
                Some((_, '-')) => Token::Arrow,
                _ => return Err(ParseError::invalid_expr(src, start, "expected '<-'")),
            },
            c if is_word_char(c) => {
                let mut end = start + c.len_utf8();
                while let Some(&(idx, next)) = chars.peek() {
                    if !is_word_char(next) {
                        break;
                    }
                    end = idx + next.len_utf8();
                    chars.next();
                }
                let word = &src[start..end];
                if word.bytes().all(|b| b.is_ascii_digit()) {
                    let n = word
                        .parse()
                        .map_err(|_| ParseError::invalid_expr(src, start, "array length overflow"))?;
                    Token::Int(n)
                } else {
                    Token::Word(word)
                }
            }
            other => {
                return Err(ParseError::invalid_expr(
                    src,
                    start,
                    format!("unexpected character '{other}'"),
                ));
            }
        };
        tokens.push((start, token));
    }

    Ok(tokens)
}

struct ExprParser<'a> {
    src: &'a str,
    tokens: Vec<(usize, Token<'a>)>,
    pos: usize,
}

impl<'a> ExprParser<'a> {
    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).map(|&(_, t)| t)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map_or(self.src.len(), |&(offset, _)| offset)
    }

    fn next(&mut self) -> Option<Token<'a>> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::invalid_expr(self.src, self.offset(), message)
    }

    fn expect(&mut self, expected: Token<'a>) -> Result<(), ParseError> {
        match self.peek() {
            Some(t) if t == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(t) => Err(self.error(format!("expected {expected}, found {t}"))),
            None => Err(self.error(format!("expected {expected}, found end of input"))),
        }
    }

    fn parse_type(&mut self) -> Result<TypeExpr, ParseError> {
        let offset = self.offset();
        let Some(token) = self.next() else {
            return Err(self.error("expected a type, found end of input"));
        };

        match token {
            Token::Star => Ok(TypeExpr::Pointer(Box::new(self.parse_type()?))),
            Token::LBracket => match self.next() {
                Some(Token::RBracket) => Ok(TypeExpr::Slice(Box::new(self.parse_type()?))),
                Some(Token::Int(len)) => {
                    self.expect(Token::RBracket)?;
                    Ok(TypeExpr::Array {
                        len,
                        elem: Box::new(self.parse_type()?),
                    })
                }
                _ => Err(ParseError::invalid_expr(
                    self.src,
                    offset,
                    "expected ']' or array length",
                )),
            },
            Token::Arrow => {
                self.expect(Token::Word("chan"))?;
                Ok(TypeExpr::Chan {
                    dir: ChanDir::Recv,
                    elem: Box::new(self.parse_type()?),
                })
            }
            Token::LParen => {
                let inner = self.parse_type()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Token::Word("chan") => {
                let dir = if self.peek() == Some(Token::Arrow) {
                    self.pos += 1;
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                Ok(TypeExpr::Chan {
                    dir,
                    elem: Box::new(self.parse_type()?),
                })
            }
            Token::Word("map") => {
                self.expect(Token::LBracket)?;
                let key = self.parse_type()?;
                self.expect(Token::RBracket)?;
                let value = self.parse_type()?;
                Ok(TypeExpr::Map {
                    key: Box::new(key),
                    value: Box::new(value),
                })
            }
            Token::Word("func") => self.parse_func(),
            Token::Word("interface") => {
                self.expect(Token::LBrace)?;
                self.expect(Token::RBrace)?;
                Ok(TypeExpr::Interface)
            }
            Token::Word("struct") => {
                self.expect(Token::LBrace)?;
                self.expect(Token::RBrace)?;
                Ok(TypeExpr::Struct(Vec::new()))
            }
            Token::Word("any") => Ok(TypeExpr::Interface),
            Token::Word(word) => parse_name(self.src, offset, word),
            other => Err(ParseError::invalid_expr(
                self.src,
                offset,
                format!("unexpected {other}"),
            )),
        }
    }

    fn parse_list(&mut self) -> Result<Vec<TypeExpr>, ParseError> {
        self.expect(Token::LParen)?;
        let mut items = Vec::new();
        if self.peek() == Some(Token::RParen) {
            self.pos += 1;
            return Ok(items);
        }
        loop {
            items.push(self.parse_type()?);
            match self.peek() {
                Some(Token::Comma) => self.pos += 1,
                Some(Token::RParen) => {
                    self.pos += 1;
                    return Ok(items);
                }
                _ => return Err(self.error("expected ',' or ')'")),
            }
        }
    }

    fn parse_func(&mut self) -> Result<TypeExpr, ParseError> {
        let params = self.parse_list()?;
        let results = match self.peek() {
            Some(Token::LParen) => self.parse_list()?,
            Some(Token::Star | Token::LBracket | Token::Arrow | Token::Word(_)) => {
                vec![self.parse_type()?]
            }
            _ => Vec::new(),
        };
        Ok(TypeExpr::Func { params, results })
    }
}

fn parse_name(src: &str, offset: usize, word: &str) -> Result<TypeExpr, ParseError> {
    match word.rfind('.') {
        None => {
            if word.contains('/') {
                return Err(ParseError::invalid_expr(
                    src,
                    offset,
                    format!("package path '{word}' is missing a type name"),
                ));
            }
            Ok(TypeExpr::named(word))
        }
        Some(idx) => {
            let (location, name) = (&word[..idx], &word[idx + 1..]);
            if location.is_empty() || name.is_empty() || name.contains('/') {
                return Err(ParseError::invalid_expr(
                    src,
                    offset,
                    format!("invalid qualified name '{word}'"),
                ));
            }
            Ok(TypeExpr::qualified(location, name))
        }
    }
}

/// Parses a type expression.
///
/// # Arguments
/// * `src` - Expression text, e.g. `map[string][]github.com/acme/shop.Item`
///
/// # Errors
/// Returns `ParseError::InvalidTypeExpr` with the byte offset of the problem.
pub fn parse_type_expr(src: &str) -> Result<TypeExpr, ParseError> {
    let tokens = tokenize(src)?;
    let mut parser = ExprParser {
        src,
        tokens,
        pos: 0,
    };
    let expr = parser.parse_type()?;
    if let Some(token) = parser.peek() {
        return Err(parser.error(format!("unexpected trailing {token}")));
    }
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Box<TypeExpr> {
        Box::new(TypeExpr::named(name))
    }

    #[test]
    fn test_parse_primitives_and_names() {
        assert_eq!(parse_type_expr("string").unwrap(), TypeExpr::named("string"));
        assert_eq!(
            parse_type_expr("github.com/acme/shop.Order").unwrap(),
            TypeExpr::qualified("github.com/acme/shop", "Order")
        );
    }

    #[test]
    fn test_parse_composites() {
        assert_eq!(
            parse_type_expr("[]*Item").unwrap(),
            TypeExpr::Slice(Box::new(TypeExpr::Pointer(named("Item"))))
        );
        assert_eq!(
            parse_type_expr("[16]byte").unwrap(),
            TypeExpr::Array {
                len: 16,
                elem: named("byte"),
            }
        );
        assert_eq!(
            parse_type_expr("map[string][]int").unwrap(),
            TypeExpr::Map {
                key: named("string"),
                value: Box::new(TypeExpr::Slice(named("int"))),
            }
        );
    }

    #[test]
    fn test_parse_channels() {
        assert_eq!(
            parse_type_expr("chan int").unwrap(),
            TypeExpr::Chan {
                dir: ChanDir::Both,
                elem: named("int"),
            }
        );
        assert_eq!(
            parse_type_expr("chan<- int").unwrap(),
            TypeExpr::Chan {
                dir: ChanDir::Send,
                elem: named("int"),
            }
        );
        assert_eq!(
            parse_type_expr("<-chan int").unwrap(),
            TypeExpr::Chan {
                dir: ChanDir::Recv,
                elem: named("int"),
            }
        );
    }

    #[test]
    fn test_parse_functions() {
        assert_eq!(
            parse_type_expr("func()").unwrap(),
            TypeExpr::Func {
                params: Vec::new(),
                results: Vec::new(),
            }
        );
        assert_eq!(
            parse_type_expr("func(string, int) error").unwrap(),
            TypeExpr::Func {
                params: vec![TypeExpr::named("string"), TypeExpr::named("int")],
                results: vec![TypeExpr::named("error")],
            }
        );
        assert_eq!(
            parse_type_expr("func(a/b.C) (bool, error)").unwrap(),
            TypeExpr::Func {
                params: vec![TypeExpr::qualified("a/b", "C")],
                results: vec![TypeExpr::named("bool"), TypeExpr::named("error")],
            }
        );
    }

    #[test]
    fn test_func_as_map_value_stops_at_bracket() {
        let expr = parse_type_expr("map[func()]int").unwrap();
        assert!(matches!(expr, TypeExpr::Map { .. }));
    }

    #[test]
    fn test_parse_interface_and_empty_struct() {
        assert_eq!(parse_type_expr("interface{}").unwrap(), TypeExpr::Interface);
        assert_eq!(parse_type_expr("any").unwrap(), TypeExpr::Interface);
        assert_eq!(
            parse_type_expr("struct{}").unwrap(),
            TypeExpr::Struct(Vec::new())
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_type_expr("").is_err());
        assert!(parse_type_expr("[]").is_err());
        assert!(parse_type_expr("map[string").is_err());
        assert!(parse_type_expr("func(int").is_err());
        assert!(parse_type_expr("int int").is_err());
        assert!(parse_type_expr("a/b").is_err());
        assert!(parse_type_expr("x.").is_err());
        assert!(parse_type_expr("<chan int").is_err());
    }

    #[test]
    fn test_error_reports_offset() {
        let err = parse_type_expr("map[string]?").unwrap_err();
        match err {
            ParseError::InvalidTypeExpr { position, .. } => assert_eq!(position, 11),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
