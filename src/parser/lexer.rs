//! Lexer for the statement DSL using logos
//!
//! The grammar is line-oriented: words opening with anything but a
//! lowercase letter belong to nouns, lowercase-led words to verb
//! phrases, and newlines terminate statements.

use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")]
pub enum Token {
    /// A word opening a noun: anything but a lowercase letter first
    #[regex(r"[^a-z; \t\r\n#][^; \t\r\n]*", |lex| lex.slice().to_string())]
    TitleWord(String),

    /// A lowercase-led word: part of a verb phrase
    #[regex(r"[a-z][^; \t\r\n]*", |lex| lex.slice().to_string())]
    LowerWord(String),

    /// Statement terminator
    #[token("\n")]
    Newline,

    /// Comments run to end of line (skip)
    #[regex(r"#[^\n]*", logos::skip)]
    Comment,
}

/// Lex input into tokens with spans
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input)
        .spanned()
        .filter_map(|(tok, span)| tok.ok().map(|t| (t, span)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_tokens() {
        let tokens: Vec<_> = lex("Restaurant receives Hungry Customer")
            .map(|(t, _)| t)
            .collect();
        assert_eq!(
            tokens,
            vec![
                Token::TitleWord("Restaurant".to_string()),
                Token::LowerWord("receives".to_string()),
                Token::TitleWord("Hungry".to_string()),
                Token::TitleWord("Customer".to_string()),
            ]
        );
    }

    #[test]
    fn test_multi_word_verb() {
        let tokens: Vec<_> = lex("A is composed of B").map(|(t, _)| t).collect();
        assert_eq!(
            tokens,
            vec![
                Token::TitleWord("A".to_string()),
                Token::LowerWord("is".to_string()),
                Token::LowerWord("composed".to_string()),
                Token::LowerWord("of".to_string()),
                Token::TitleWord("B".to_string()),
            ]
        );
    }

    #[test]
    fn test_newlines_are_tokens() {
        let tokens: Vec<_> = lex("A produces B\nC receives B").map(|(t, _)| t).collect();
        assert!(tokens.contains(&Token::Newline));
        assert_eq!(tokens.len(), 7);
    }

    #[test]
    fn test_comments_are_skipped() {
        let tokens: Vec<_> = lex("# the whole line\nA produces B")
            .map(|(t, _)| t)
            .collect();
        assert_eq!(tokens[0], Token::Newline);
        assert_eq!(tokens.len(), 4);
    }

    #[test]
    fn test_numbers_open_nouns() {
        let tokens: Vec<_> = lex("2nd Stage").map(|(t, _)| t).collect();
        assert_eq!(
            tokens,
            vec![
                Token::TitleWord("2nd".to_string()),
                Token::TitleWord("Stage".to_string()),
            ]
        );
    }
}
