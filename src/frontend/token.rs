//! Token definitions for the Bhagwad language

use crate::utils::Span;
use serde::Serialize;

/// A token produced by the lexer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn eof(span: Span) -> Self {
        Self { kind: TokenKind::Eof, span }
    }
}

/// Token kinds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TokenKind {
    // ============ Keywords ============
    /// shloka (function)
    Shloka,
    /// dharma (if)
    Dharma,
    /// adharma (else)
    Adharma,
    /// karma (loop)
    Karma,
    /// arjuna (entry block)
    Arjuna,
    /// manifest (print)
    Manifest,
    /// moksha (return)
    Moksha,
    /// maya (variable)
    Maya,
    /// sankalpa (constant)
    Sankalpa,
    /// yuga (namespace)
    Yuga,
    /// meditation (try)
    Meditation,
    /// disturbance (catch)
    Disturbance,
    /// cosmic (array type)
    Cosmic,
    /// sattva (int type)
    Sattva,
    /// rajas (string type)
    Rajas,
    /// tamas (bool type)
    Tamas,
    /// from (range loop lower bound)
    From,
    /// to (range loop upper bound)
    To,
    /// in (for-in loop)
    In,
    /// while (pre-test loop)
    While,

    // ============ Identifiers and Literals ============
    /// Identifier (variable name, function name, etc.)
    Ident(String),
    /// Integer literal
    IntLit(i64),
    /// String literal
    StringLit(String),
    /// Boolean literal (the keywords true/false)
    BoolLit(bool),

    // ============ Operators ============
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// =
    Eq,
    /// ==
    EqEq,
    /// !=
    Ne,
    /// <
    Lt,
    /// <=
    Le,
    /// >
    Gt,
    /// >=
    Ge,
    /// !
    Not,
    /// ->
    Arrow,
    /// .
    Dot,

    // ============ Delimiters ============
    /// (
    LParen,
    /// )
    RParen,
    /// {
    LBrace,
    /// }
    RBrace,
    /// [
    LBracket,
    /// ]
    RBracket,
    /// ,
    Comma,
    /// ;
    Semicolon,

    // ============ Special ============
    /// End of input
    Eof,
}

impl TokenKind {
    /// Try to convert an identifier to a keyword.
    ///
    /// This table is the single source of keyword-vs-identifier precedence:
    /// any identifier scan consults it before classifying the lexeme.
    pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
        match s {
            "shloka" => Some(TokenKind::Shloka),
            "dharma" => Some(TokenKind::Dharma),
            "adharma" => Some(TokenKind::Adharma),
            "karma" => Some(TokenKind::Karma),
            "arjuna" => Some(TokenKind::Arjuna),
            "manifest" => Some(TokenKind::Manifest),
            "moksha" => Some(TokenKind::Moksha),
            "maya" => Some(TokenKind::Maya),
            "sankalpa" => Some(TokenKind::Sankalpa),
            "yuga" => Some(TokenKind::Yuga),
            "meditation" => Some(TokenKind::Meditation),
            "disturbance" => Some(TokenKind::Disturbance),
            "cosmic" => Some(TokenKind::Cosmic),
            "sattva" => Some(TokenKind::Sattva),
            "rajas" => Some(TokenKind::Rajas),
            "tamas" => Some(TokenKind::Tamas),
            "from" => Some(TokenKind::From),
            "to" => Some(TokenKind::To),
            "in" => Some(TokenKind::In),
            "while" => Some(TokenKind::While),
            "true" => Some(TokenKind::BoolLit(true)),
            "false" => Some(TokenKind::BoolLit(false)),
            _ => None,
        }
    }

    /// Get the precedence of a binary operator (for precedence climbing)
    /// Returns None if not a binary operator
    pub fn binary_precedence(&self) -> Option<u8> {
        match self {
            // Equality
            TokenKind::EqEq | TokenKind::Ne => Some(1),

            // Comparison
            TokenKind::Lt | TokenKind::Le | TokenKind::Gt | TokenKind::Ge => Some(2),

            // Additive
            TokenKind::Plus | TokenKind::Minus => Some(3),

            // Multiplicative (highest for binary)
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Some(4),

            _ => None,
        }
    }

    /// Whether a token of this kind can begin an expression
    pub fn starts_expr(&self) -> bool {
        matches!(
            self,
            TokenKind::Ident(_)
                | TokenKind::IntLit(_)
                | TokenKind::StringLit(_)
                | TokenKind::BoolLit(_)
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::Minus
                | TokenKind::Not
        )
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Shloka => write!(f, "'shloka'"),
            TokenKind::Dharma => write!(f, "'dharma'"),
            TokenKind::Adharma => write!(f, "'adharma'"),
            TokenKind::Karma => write!(f, "'karma'"),
            TokenKind::Arjuna => write!(f, "'arjuna'"),
            TokenKind::Manifest => write!(f, "'manifest'"),
            TokenKind::Moksha => write!(f, "'moksha'"),
            TokenKind::Maya => write!(f, "'maya'"),
            TokenKind::Sankalpa => write!(f, "'sankalpa'"),
            TokenKind::Yuga => write!(f, "'yuga'"),
            TokenKind::Meditation => write!(f, "'meditation'"),
            TokenKind::Disturbance => write!(f, "'disturbance'"),
            TokenKind::Cosmic => write!(f, "'cosmic'"),
            TokenKind::Sattva => write!(f, "'sattva'"),
            TokenKind::Rajas => write!(f, "'rajas'"),
            TokenKind::Tamas => write!(f, "'tamas'"),
            TokenKind::From => write!(f, "'from'"),
            TokenKind::To => write!(f, "'to'"),
            TokenKind::In => write!(f, "'in'"),
            TokenKind::While => write!(f, "'while'"),
            TokenKind::Ident(name) => write!(f, "identifier '{name}'"),
            TokenKind::IntLit(v) => write!(f, "integer '{v}'"),
            TokenKind::StringLit(_) => write!(f, "string literal"),
            TokenKind::BoolLit(v) => write!(f, "'{v}'"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::Percent => write!(f, "'%'"),
            TokenKind::Eq => write!(f, "'='"),
            TokenKind::EqEq => write!(f, "'=='"),
            TokenKind::Ne => write!(f, "'!='"),
            TokenKind::Lt => write!(f, "'<'"),
            TokenKind::Le => write!(f, "'<='"),
            TokenKind::Gt => write!(f, "'>'"),
            TokenKind::Ge => write!(f, "'>='"),
            TokenKind::Not => write!(f, "'!'"),
            TokenKind::Arrow => write!(f, "'->'"),
            TokenKind::Dot => write!(f, "'.'"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::LBracket => write!(f, "'['"),
            TokenKind::RBracket => write!(f, "']'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}
