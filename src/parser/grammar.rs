//! Parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::parser::ast::*;
use crate::parser::lexer::Token;

/// Parse DSL source code into an AST
pub fn parse(input: &str) -> Result<Document, Vec<crate::ParseError>> {
    let len = input.len();

    // Create a logos lexer and convert to token stream
    let token_iter = crate::parser::lexer::lex(input).map(|(tok, span)| (tok, span.into()));

    // Turn the token iterator into a stream that chumsky can use
    let token_stream = Stream::from_iter(token_iter)
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    document_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

/// Helper to extract span range from chumsky's span type
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn document_parser<'a, I>() -> impl Parser<'a, I, Document, extra::Err<Rich<'a, Token>>>
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let title_word = select! {
        Token::TitleWord(w) => w,
    };
    let lower_word = select! {
        Token::LowerWord(w) => w,
    };

    // A noun is a run of title-case words
    let noun = title_word
        .repeated()
        .at_least(1)
        .collect::<Vec<_>>()
        .map(|words| Noun::from_words(&words));

    // A verb phrase is a run of lowercase words, checked against the
    // closed verb set at parse time
    let verb = lower_word
        .repeated()
        .at_least(1)
        .collect::<Vec<String>>()
        .try_map(|words, span| {
            let phrase = words.join(" ");
            Verb::parse(&phrase).ok_or_else(|| {
                Rich::custom(span, format!("unknown dependency verb '{}'", phrase))
            })
        });

    let statement = noun
        .clone()
        .then(verb)
        .then(noun)
        .map_with(|((subject, verb), object), e| {
            Spanned::new(
                Statement {
                    subject,
                    verb,
                    object,
                },
                span_range(&e.span()),
            )
        });

    let line_breaks = just(Token::Newline).repeated().collect::<Vec<_>>();

    // Document is a list of statements, each terminated by newlines
    line_breaks
        .clone()
        .ignore_then(
            statement
                .then_ignore(line_breaks)
                .repeated()
                .collect::<Vec<_>>(),
        )
        .then_ignore(end())
        .map(|statements| Document { statements })
}
