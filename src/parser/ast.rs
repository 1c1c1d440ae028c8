//! Abstract syntax for the statement DSL
//!
//! The language is a flat list of `<Noun> <verb phrase> <Noun>`
//! statements, one per line; there is no nesting.

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// AST node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// A title-case noun phrase naming a process or a flow
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Noun(String);

impl Noun {
    /// Build a noun from its words, normalizing a leading lowercase
    /// letter of any word to uppercase
    pub fn from_words(words: &[String]) -> Self {
        let normalized: Vec<String> = words
            .iter()
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) if first.is_lowercase() => {
                        first.to_uppercase().collect::<String>() + chars.as_str()
                    }
                    _ => w.clone(),
                }
            })
            .collect();
        Self(normalized.join(" "))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Noun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The five dependency verbs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    IsComposedOf,
    Receives,
    Produces,
    Respects,
    Requires,
}

impl Verb {
    /// Parse a normalized (lowercase, single-spaced) verb phrase
    pub fn parse(phrase: &str) -> Option<Verb> {
        match phrase {
            "is composed of" => Some(Verb::IsComposedOf),
            "receives" => Some(Verb::Receives),
            "produces" => Some(Verb::Produces),
            "respects" => Some(Verb::Respects),
            "requires" => Some(Verb::Requires),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::IsComposedOf => "is composed of",
            Verb::Receives => "receives",
            Verb::Produces => "produces",
            Verb::Respects => "respects",
            Verb::Requires => "requires",
        }
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One `<subject> <verb> <object>` statement
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub subject: Noun,
    pub verb: Verb,
    pub object: Noun,
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.subject, self.verb, self.object)
    }
}

/// A parsed source file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub statements: Vec<Spanned<Statement>>,
}
