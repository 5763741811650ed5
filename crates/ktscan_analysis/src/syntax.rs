//! Kotlin lexical front-end.
//!
//! The sensor talks to the parser only through the [`Parser`] trait, so a
//! full compiler front-end can be substituted without touching the
//! orchestration. The bundled [`KotlinTokenizer`] produces the token
//! stream the rules and the duplicate-detection (CPD) collaborator work
//! on, and rejects structurally broken files with a located error.

use crate::error::ParseError;
use ktscan_source::{FileKey, InputFile, LineIndex};

/// Kotlin keywords recognized by the tokenizer.
const KEYWORDS: &[&str] = &[
    "package", "import", "class", "interface", "object", "fun", "val", "var", "if", "else",
    "when", "for", "while", "do", "return", "try", "catch", "finally", "throw", "is", "in",
    "as", "null", "true", "false",
];

/// Lexical category of a token.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TokenKind {
    /// A reserved word.
    Keyword,
    /// A non-reserved identifier.
    Identifier,
    /// A numeric literal.
    Number,
    /// A string or character literal (text is the unquoted content).
    Str,
    /// Any single punctuation character.
    Symbol,
}

/// One lexed token with its 1-indexed source position.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// Lexical category.
    pub kind: TokenKind,
    /// The token text.
    pub text: String,
    /// 1-indexed line of the token start.
    pub line: u32,
    /// 1-indexed column of the token start.
    pub column: u32,
}

/// The parsed representation of one file.
pub struct SyntaxTree {
    key: FileKey,
    tokens: Vec<Token>,
}

impl SyntaxTree {
    /// Creates a tree from an already-lexed token stream.
    pub fn new(key: FileKey, tokens: Vec<Token>) -> Self {
        Self { key, tokens }
    }

    /// The key of the file this tree was parsed from.
    pub fn key(&self) -> &FileKey {
        &self.key
    }

    /// The lexed tokens in source order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

/// Parses one file of the batch.
pub trait Parser: Send + Sync {
    /// Parses `file`, returning its syntax tree or a located failure.
    fn parse(&self, file: &InputFile) -> Result<SyntaxTree, ParseError>;
}

/// The bundled lexical parser for Kotlin sources.
pub struct KotlinTokenizer;

impl Parser for KotlinTokenizer {
    fn parse(&self, file: &InputFile) -> Result<SyntaxTree, ParseError> {
        let tokens = tokenize(file.content())?;
        Ok(SyntaxTree::new(file.key().clone(), tokens))
    }
}

/// Lexes Kotlin source text into tokens.
///
/// Comments and whitespace are dropped. Unterminated strings or block
/// comments and unbalanced braces are parse errors pointing at the
/// offending position.
pub fn tokenize(content: &str) -> Result<Vec<Token>, ParseError> {
    let index = LineIndex::new(content);
    let chars: Vec<(usize, char)> = content.char_indices().collect();
    let mut tokens = Vec::new();
    let mut brace_depth = 0usize;
    let mut i = 0;

    let locate = |offset: usize| index.line_col(offset as u32);

    while i < chars.len() {
        let (offset, ch) = chars[i];

        if ch.is_whitespace() {
            i += 1;
            continue;
        }

        // Line comment
        if ch == '/' && matches!(chars.get(i + 1), Some((_, '/'))) {
            while i < chars.len() && chars[i].1 != '\n' {
                i += 1;
            }
            continue;
        }

        // Block comment, possibly nested
        if ch == '/' && matches!(chars.get(i + 1), Some((_, '*'))) {
            let mut depth = 1usize;
            i += 2;
            while i < chars.len() && depth > 0 {
                if chars[i].1 == '/' && matches!(chars.get(i + 1), Some((_, '*'))) {
                    depth += 1;
                    i += 2;
                } else if chars[i].1 == '*' && matches!(chars.get(i + 1), Some((_, '/'))) {
                    depth -= 1;
                    i += 2;
                } else {
                    i += 1;
                }
            }
            if depth > 0 {
                let (line, column) = locate(offset);
                return Err(ParseError::at("unterminated block comment", line, column));
            }
            continue;
        }

        // String and character literals
        if ch == '"' || ch == '\'' {
            let quote = ch;
            let (line, column) = locate(offset);
            let mut text = String::new();
            let mut closed = false;
            i += 1;
            while i < chars.len() {
                let c = chars[i].1;
                if c == '\\' {
                    if let Some((_, escaped)) = chars.get(i + 1) {
                        text.push(*escaped);
                        i += 2;
                        continue;
                    }
                    i += 1;
                    break;
                }
                if c == quote {
                    closed = true;
                    i += 1;
                    break;
                }
                if c == '\n' {
                    break;
                }
                text.push(c);
                i += 1;
            }
            if !closed {
                return Err(ParseError::at("unterminated string literal", line, column));
            }
            tokens.push(Token {
                kind: TokenKind::Str,
                text,
                line,
                column,
            });
            continue;
        }

        // Identifiers and keywords
        if ch.is_alphabetic() || ch == '_' {
            let (line, column) = locate(offset);
            let mut text = String::new();
            while i < chars.len() {
                let c = chars[i].1;
                if c.is_alphanumeric() || c == '_' {
                    text.push(c);
                    i += 1;
                } else {
                    break;
                }
            }
            let kind = if KEYWORDS.contains(&text.as_str()) {
                TokenKind::Keyword
            } else {
                TokenKind::Identifier
            };
            tokens.push(Token {
                kind,
                text,
                line,
                column,
            });
            continue;
        }

        // Numeric literals
        if ch.is_ascii_digit() {
            let (line, column) = locate(offset);
            let mut text = String::new();
            while i < chars.len() {
                let c = chars[i].1;
                if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                    text.push(c);
                    i += 1;
                } else {
                    break;
                }
            }
            tokens.push(Token {
                kind: TokenKind::Number,
                text,
                line,
                column,
            });
            continue;
        }

        // Punctuation, with brace balancing
        let (line, column) = locate(offset);
        if ch == '{' {
            brace_depth += 1;
        } else if ch == '}' {
            if brace_depth == 0 {
                return Err(ParseError::at("unmatched '}'", line, column));
            }
            brace_depth -= 1;
        }
        tokens.push(Token {
            kind: TokenKind::Symbol,
            text: ch.to_string(),
            line,
            column,
        });
        i += 1;
    }

    if brace_depth > 0 {
        let (line, column) = index.line_col(content.len() as u32);
        return Err(ParseError::at(
            "expected '}' before end of file",
            line,
            column,
        ));
    }

    Ok(tokens)
}
