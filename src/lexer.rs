use crate::encoder;
use crate::intern::Interner;
use crate::token::{Span, Token, TokenType};

/// Longest identifier the scanner accepts.
const MAX_IDENT_LEN: usize = 256;

fn keyword(word: &str) -> Option<TokenType> {
    let kind = match word {
        "array" => TokenType::Array,
        "auto" => TokenType::Auto,
        "boolean" => TokenType::Boolean,
        "carray" => TokenType::Carray,
        "char" => TokenType::Char,
        "double" => TokenType::Double,
        "else" => TokenType::Else,
        "false" => TokenType::False,
        "for" => TokenType::For,
        "function" => TokenType::Function,
        "if" => TokenType::If,
        "integer" => TokenType::Integer,
        "print" => TokenType::Print,
        "return" => TokenType::Return,
        "string" => TokenType::String,
        "true" => TokenType::True,
        "void" => TokenType::Void,
        _ => return None,
    };
    Some(kind)
}

/// Hand-written scanner for B-minor source text.
pub struct Lexer<'a, 'i> {
    source: &'a str,
    bytes: &'a [u8],
    position: usize,
    interner: &'i mut Interner,
}

impl<'a, 'i> Lexer<'a, 'i> {
    pub fn new(source: &'a str, interner: &'i mut Interner) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            position: 0,
            interner,
        }
    }

    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        let end = self.bytes.len();
        tokens.push(Token::new(TokenType::Eof, Span::new(end, end)));
        tokens
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.position + offset).copied()
    }

    fn error_token(&mut self, start: usize, end: usize) -> Token {
        let text = self.interner.intern(&self.source[start..end]);
        Token::new(TokenType::Error(text), Span::new(start, end))
    }

    fn skip_whitespace_and_comments(&mut self) -> Option<Token> {
        loop {
            match self.peek(0) {
                Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n') => self.position += 1,
                Some(b'/') if self.peek(1) == Some(b'/') => {
                    while self.peek(0).is_some_and(|b| b != b'\n') {
                        self.position += 1;
                    }
                }
                Some(b'/') if self.peek(1) == Some(b'*') => {
                    let start = self.position;
                    self.position += 2;
                    loop {
                        match self.peek(0) {
                            Some(b'*') if self.peek(1) == Some(b'/') => {
                                self.position += 2;
                                break;
                            }
                            Some(_) => self.position += 1,
                            None => return Some(self.error_token(start, self.position)),
                        }
                    }
                }
                _ => return None,
            }
        }
    }

    fn next_token(&mut self) -> Option<Token> {
        if let Some(err) = self.skip_whitespace_and_comments() {
            return Some(err);
        }
        let start = self.position;
        let first = self.peek(0)?;

        if first.is_ascii_alphabetic() || first == b'_' {
            return Some(self.scan_word(start));
        }
        if first.is_ascii_digit() {
            return Some(self.scan_number(start));
        }
        if first == b'"' {
            return Some(self.scan_string(start));
        }
        if first == b'\'' {
            return Some(self.scan_char(start));
        }
        Some(self.scan_operator(start))
    }

    fn scan_word(&mut self, start: usize) -> Token {
        while self
            .peek(0)
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
        {
            self.position += 1;
        }
        let text = &self.source[start..self.position];
        if text.len() > MAX_IDENT_LEN {
            return self.error_token(start, self.position);
        }
        let kind = match keyword(text) {
            Some(kw) => kw,
            None => TokenType::Identifier(self.interner.intern(text)),
        };
        Token::new(kind, Span::new(start, self.position))
    }

    fn scan_number(&mut self, start: usize) -> Token {
        if self.peek(0) == Some(b'0') && matches!(self.peek(1), Some(b'x') | Some(b'b')) {
            let radix = if self.peek(1) == Some(b'x') { 16 } else { 2 };
            self.position += 2;
            while self.peek(0).is_some_and(|b| b.is_ascii_alphanumeric()) {
                self.position += 1;
            }
            let digits = &self.source[start + 2..self.position];
            let kind = match i64::from_str_radix(digits, radix) {
                Ok(v) if radix == 16 => TokenType::HexadecimalLiteral(v),
                Ok(v) => TokenType::BinaryLiteral(v),
                Err(_) => return self.error_token(start, self.position),
            };
            return Token::new(kind, Span::new(start, self.position));
        }

        let mut saw_dot = false;
        let mut saw_exponent = false;
        while self.peek(0).is_some_and(|b| b.is_ascii_digit()) {
            self.position += 1;
        }
        if self.peek(0) == Some(b'.') && self.peek(1).is_some_and(|b| b.is_ascii_digit()) {
            saw_dot = true;
            self.position += 1;
            while self.peek(0).is_some_and(|b| b.is_ascii_digit()) {
                self.position += 1;
            }
        }
        if matches!(self.peek(0), Some(b'e') | Some(b'E')) {
            let mut lookahead = 1;
            if matches!(self.peek(1), Some(b'+') | Some(b'-')) {
                lookahead = 2;
            }
            if self.peek(lookahead).is_some_and(|b| b.is_ascii_digit()) {
                saw_exponent = true;
                self.position += lookahead;
                while self.peek(0).is_some_and(|b| b.is_ascii_digit()) {
                    self.position += 1;
                }
            }
        }

        // A literal running straight into identifier characters is one bad
        // token, not two good ones.
        if self
            .peek(0)
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
        {
            while self
                .peek(0)
                .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
            {
                self.position += 1;
            }
            return self.error_token(start, self.position);
        }

        let text = &self.source[start..self.position];
        let kind = if saw_exponent {
            match text.parse::<f64>() {
                Ok(v) => TokenType::DoubleScientificLiteral(v),
                Err(_) => return self.error_token(start, self.position),
            }
        } else if saw_dot {
            match text.parse::<f64>() {
                Ok(v) => TokenType::DoubleLiteral(v),
                Err(_) => return self.error_token(start, self.position),
            }
        } else {
            match text.parse::<i64>() {
                Ok(v) => TokenType::IntegerLiteral(v),
                Err(_) => return self.error_token(start, self.position),
            }
        };
        Token::new(kind, Span::new(start, self.position))
    }

    /// Scans past the closing delimiter of a quoted literal, honoring
    /// backslash escapes. Returns false if the line or file ends first.
    fn scan_quoted(&mut self, delimiter: u8) -> bool {
        self.position += 1;
        loop {
            match self.peek(0) {
                Some(b) if b == delimiter => {
                    self.position += 1;
                    return true;
                }
                Some(b'\\') if self.peek(1).is_some() => self.position += 2,
                Some(b'\n') | None => return false,
                Some(_) => self.position += 1,
            }
        }
    }

    fn scan_string(&mut self, start: usize) -> Token {
        if !self.scan_quoted(b'"') {
            return self.error_token(start, self.position);
        }
        let literal = &self.source[start..self.position];
        match encoder::string_decode(literal) {
            Ok(decoded) => {
                let name = self.interner.intern(&decoded);
                Token::new(TokenType::StringLiteral(name), Span::new(start, self.position))
            }
            Err(_) => self.error_token(start, self.position),
        }
    }

    fn scan_char(&mut self, start: usize) -> Token {
        if !self.scan_quoted(b'\'') {
            return self.error_token(start, self.position);
        }
        let literal = &self.source[start..self.position];
        match encoder::char_decode(literal) {
            Some(value) => Token::new(TokenType::CharLiteral(value), Span::new(start, self.position)),
            None => self.error_token(start, self.position),
        }
    }

    fn scan_operator(&mut self, start: usize) -> Token {
        let two = |lexer: &Self| {
            let a = lexer.peek(0)?;
            let b = lexer.peek(1)?;
            Some([a, b])
        };
        if let Some(pair) = two(self) {
            let kind = match &pair {
                b"==" => Some(TokenType::Equal),
                b"!=" => Some(TokenType::NotEqual),
                b"<=" => Some(TokenType::LessEqual),
                b">=" => Some(TokenType::GreaterEqual),
                b"&&" => Some(TokenType::AndAnd),
                b"||" => Some(TokenType::OrOr),
                b"++" => Some(TokenType::Increment),
                b"--" => Some(TokenType::Decrement),
                _ => None,
            };
            if let Some(kind) = kind {
                self.position += 2;
                return Token::new(kind, Span::new(start, self.position));
            }
        }

        let kind = match self.peek(0).unwrap() {
            b'=' => Some(TokenType::Assign),
            b'<' => Some(TokenType::Less),
            b'>' => Some(TokenType::Greater),
            b'!' => Some(TokenType::Not),
            b'+' => Some(TokenType::Plus),
            b'-' => Some(TokenType::Minus),
            b'*' => Some(TokenType::Star),
            b'/' => Some(TokenType::Slash),
            b'%' => Some(TokenType::Percent),
            b'^' => Some(TokenType::Caret),
            b'#' => Some(TokenType::Hash),
            b'(' => Some(TokenType::LeftParen),
            b')' => Some(TokenType::RightParen),
            b'[' => Some(TokenType::LeftBracket),
            b']' => Some(TokenType::RightBracket),
            b'{' => Some(TokenType::LeftBrace),
            b'}' => Some(TokenType::RightBrace),
            b':' => Some(TokenType::Colon),
            b';' => Some(TokenType::Semicolon),
            b',' => Some(TokenType::Comma),
            _ => None,
        };
        self.position += 1;
        match kind {
            Some(kind) => Token::new(kind, Span::new(start, self.position)),
            None => self.error_token(start, self.position),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenType> {
        let mut interner = Interner::new();
        let mut lexer = Lexer::new(source, &mut interner);
        lexer.tokenize().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn scans_declaration() {
        let mut interner = Interner::new();
        let mut lexer = Lexer::new("x: integer = 5;", &mut interner);
        let tokens = lexer.tokenize();
        let x = interner.lookup("x").unwrap();
        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![
                TokenType::Identifier(x),
                TokenType::Colon,
                TokenType::Integer,
                TokenType::Assign,
                TokenType::IntegerLiteral(5),
                TokenType::Semicolon,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn scans_radix_literals() {
        assert!(matches!(
            kinds("0x1F")[0],
            TokenType::HexadecimalLiteral(31)
        ));
        assert!(matches!(kinds("0b1010")[0], TokenType::BinaryLiteral(10)));
    }

    #[test]
    fn scans_double_literals() {
        assert!(matches!(kinds("1.5")[0], TokenType::DoubleLiteral(_)));
        assert!(matches!(
            kinds("6e10")[0],
            TokenType::DoubleScientificLiteral(_)
        ));
        assert!(matches!(
            kinds("1.5e-3")[0],
            TokenType::DoubleScientificLiteral(_)
        ));
    }

    #[test]
    fn scans_two_character_operators() {
        assert_eq!(
            kinds("== != <= >= && || ++ --"),
            vec![
                TokenType::Equal,
                TokenType::NotEqual,
                TokenType::LessEqual,
                TokenType::GreaterEqual,
                TokenType::AndAnd,
                TokenType::OrOr,
                TokenType::Increment,
                TokenType::Decrement,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn string_literal_is_decoded() {
        let mut interner = Interner::new();
        let mut lexer = Lexer::new("\"a\\tb\"", &mut interner);
        let tokens = lexer.tokenize();
        match tokens[0].kind {
            TokenType::StringLiteral(name) => assert_eq!(interner.resolve(name), "a\tb"),
            other => panic!("expected string literal, got {:?}", other),
        }
    }

    #[test]
    fn char_literal_is_decoded() {
        assert!(matches!(kinds("'\\n'")[0], TokenType::CharLiteral(10)));
        assert!(matches!(kinds("'a'")[0], TokenType::CharLiteral(97)));
    }

    #[test]
    fn comments_are_skipped() {
        let tokens = kinds("// line\nx /* block\nstill */ ;");
        assert_eq!(tokens.len(), 3);
        assert!(matches!(tokens[0], TokenType::Identifier(_)));
        assert_eq!(tokens[1], TokenType::Semicolon);
        assert_eq!(tokens[2], TokenType::Eof);
    }

    #[test]
    fn bad_characters_become_error_tokens() {
        assert!(matches!(kinds("@")[0], TokenType::Error(_)));
        assert!(matches!(kinds("123abc")[0], TokenType::Error(_)));
        assert!(matches!(kinds("\"unterminated")[0], TokenType::Error(_)));
    }

    #[test]
    fn unterminated_block_comment_is_an_error() {
        assert!(matches!(kinds("/* open")[0], TokenType::Error(_)));
    }
}
