//! `when` guard evaluation.
//!
//! Guards are small boolean expressions over both variable tables:
//!
//! ```text
//! expr    := or
//! or      := and ( "||" and )*
//! and     := unary ( "&&" unary )*
//! unary   := "!" unary | compare
//! compare := operand ( ("==" | "!=" | "===" | "!==") operand )?
//! operand := "(" expr ")" | "#" name | "@" name
//!          | 'string' | "string" | number | true | false | null | undefined
//! ```
//!
//! A reference used as a boolean is an existence test, so `#ran` is true
//! once a job recorded `ran`, even with an empty value. Equality never
//! coerces between kinds.

use std::iter::Peekable;
use std::str::Chars;

use crate::domain::{
    error::DomainError,
    variables::{Scope, Variables, is_variable_name},
};

/// Evaluate a guard against the current tables.
pub fn evaluate_when(expression: &str, vars: &Variables) -> Result<bool, DomainError> {
    let expr = Condition::parse(expression)?;
    Ok(expr.evaluate(vars))
}

/// A parsed guard.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Reference { scope: Scope, name: String },
    Literal(Literal),
    Not(Box<Condition>),
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
    Equals(Box<Condition>, Box<Condition>),
    NotEquals(Box<Condition>, Box<Condition>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Number(f64),
    Bool(bool),
    Null,
    Undefined,
}

/// Runtime value of an operand.
#[derive(Debug, Clone, PartialEq)]
enum Operand {
    Str(String),
    Number(f64),
    Bool(bool),
    Null,
    Undefined,
}

impl Operand {
    fn truthy(&self) -> bool {
        match self {
            Self::Str(s) => !s.is_empty(),
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Bool(b) => *b,
            Self::Null | Self::Undefined => false,
        }
    }
}

impl Condition {
    /// Parse a guard; trailing input or a dangling operator is an error.
    pub fn parse(expression: &str) -> Result<Self, DomainError> {
        let fail = |reason: String| DomainError::InvalidExpression {
            expression: expression.to_string(),
            reason,
        };

        let tokens = tokenize(expression).map_err(fail)?;
        if tokens.is_empty() {
            return Err(fail("expression is empty".into()));
        }

        let mut parser = Parser { tokens, pos: 0 };
        let condition = parser.or().map_err(fail)?;
        if let Some(token) = parser.peek() {
            return Err(fail(format!("unexpected {}", token.describe())));
        }
        Ok(condition)
    }

    pub fn evaluate(&self, vars: &Variables) -> bool {
        match self {
            Self::Reference { scope, name } => vars.is_defined(*scope, name),
            Self::Literal(_) => self.value(vars).truthy(),
            Self::Not(inner) => !inner.evaluate(vars),
            Self::And(lhs, rhs) => lhs.evaluate(vars) && rhs.evaluate(vars),
            Self::Or(lhs, rhs) => lhs.evaluate(vars) || rhs.evaluate(vars),
            Self::Equals(lhs, rhs) => lhs.value(vars) == rhs.value(vars),
            Self::NotEquals(lhs, rhs) => lhs.value(vars) != rhs.value(vars),
        }
    }

    fn value(&self, vars: &Variables) -> Operand {
        match self {
            Self::Reference { scope, name } => vars
                .get(*scope, name)
                .map(Operand::Str)
                .unwrap_or(Operand::Undefined),
            Self::Literal(Literal::Str(s)) => Operand::Str(s.clone()),
            Self::Literal(Literal::Number(n)) => Operand::Number(*n),
            Self::Literal(Literal::Bool(b)) => Operand::Bool(*b),
            Self::Literal(Literal::Null) => Operand::Null,
            Self::Literal(Literal::Undefined) => Operand::Undefined,
            other => Operand::Bool(other.evaluate(vars)),
        }
    }
}

// ── Tokenizer ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ref(Scope, String),
    Str(String),
    Number(f64),
    Ident(String),
    Not,
    And,
    Or,
    Eq,
    Ne,
    LParen,
    RParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Self::Ref(scope, name) => format!("reference '{}{}'", scope.sigil(), name),
            Self::Str(s) => format!("string '{s}'"),
            Self::Number(n) => format!("number {n}"),
            Self::Ident(i) => format!("identifier '{i}'"),
            Self::Not => "'!'".into(),
            Self::And => "'&&'".into(),
            Self::Or => "'||'".into(),
            Self::Eq => "'=='".into(),
            Self::Ne => "'!='".into(),
            Self::LParen => "'('".into(),
            Self::RParen => "')'".into(),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '!' => {
                chars.next();
                if chars.next_if_eq(&'=').is_some() {
                    chars.next_if_eq(&'=');
                    tokens.push(Token::Ne);
                } else {
                    tokens.push(Token::Not);
                }
            }
            '=' => {
                chars.next();
                if chars.next_if_eq(&'=').is_none() {
                    return Err("assignment is not supported, use '=='".into());
                }
                chars.next_if_eq(&'=');
                tokens.push(Token::Eq);
            }
            '&' => {
                chars.next();
                if chars.next_if_eq(&'&').is_none() {
                    return Err("expected '&&'".into());
                }
                tokens.push(Token::And);
            }
            '|' => {
                chars.next();
                if chars.next_if_eq(&'|').is_none() {
                    return Err("expected '||'".into());
                }
                tokens.push(Token::Or);
            }
            '#' | '@' => {
                chars.next();
                let scope = Scope::from_sigil(c).unwrap_or(Scope::Memory);
                let name = take_while(&mut chars, |ch| {
                    ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-')
                });
                if !is_variable_name(&name) {
                    return Err(format!("expected a name after '{c}'"));
                }
                tokens.push(Token::Ref(scope, name));
            }
            '\'' | '"' => {
                chars.next();
                tokens.push(Token::Str(read_string(&mut chars, c)?));
            }
            c if c.is_ascii_digit() || c == '-' => {
                let raw = take_while(&mut chars, |ch| {
                    ch.is_ascii_digit() || matches!(ch, '.' | '-')
                });
                let number = raw
                    .parse::<f64>()
                    .map_err(|_| format!("invalid number '{raw}'"))?;
                tokens.push(Token::Number(number));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let ident = take_while(&mut chars, |ch| ch.is_ascii_alphanumeric() || ch == '_');
                tokens.push(Token::Ident(ident));
            }
            other => return Err(format!("unexpected character '{other}'")),
        }
    }

    Ok(tokens)
}

fn take_while(chars: &mut Peekable<Chars<'_>>, keep: impl Fn(char) -> bool) -> String {
    let mut out = String::new();
    while let Some(c) = chars.next_if(|c| keep(*c)) {
        out.push(c);
    }
    out
}

fn read_string(chars: &mut Peekable<Chars<'_>>, quote: char) -> Result<String, String> {
    let mut out = String::new();
    loop {
        match chars.next() {
            None => return Err("unterminated string literal".into()),
            Some(c) if c == quote => return Ok(out),
            Some('\\') => match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => return Err("unterminated string literal".into()),
            },
            Some(c) => out.push(c),
        }
    }
}

// ── Parser ───────────────────────────────────────────────────────────────────

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn or(&mut self) -> Result<Condition, String> {
        let mut lhs = self.and()?;
        while self.eat(&Token::Or) {
            let rhs = self.and()?;
            lhs = Condition::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn and(&mut self) -> Result<Condition, String> {
        let mut lhs = self.unary()?;
        while self.eat(&Token::And) {
            let rhs = self.unary()?;
            lhs = Condition::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Condition, String> {
        if self.eat(&Token::Not) {
            return Ok(Condition::Not(Box::new(self.unary()?)));
        }
        self.compare()
    }

    fn compare(&mut self) -> Result<Condition, String> {
        let lhs = self.operand()?;
        if self.eat(&Token::Eq) {
            let rhs = self.operand()?;
            return Ok(Condition::Equals(Box::new(lhs), Box::new(rhs)));
        }
        if self.eat(&Token::Ne) {
            let rhs = self.operand()?;
            return Ok(Condition::NotEquals(Box::new(lhs), Box::new(rhs)));
        }
        Ok(lhs)
    }

    fn operand(&mut self) -> Result<Condition, String> {
        match self.bump() {
            Some(Token::LParen) => {
                let inner = self.or()?;
                if !self.eat(&Token::RParen) {
                    return Err("missing ')'".into());
                }
                Ok(inner)
            }
            Some(Token::Ref(scope, name)) => Ok(Condition::Reference { scope, name }),
            Some(Token::Str(s)) => Ok(Condition::Literal(Literal::Str(s))),
            Some(Token::Number(n)) => Ok(Condition::Literal(Literal::Number(n))),
            Some(Token::Ident(ident)) => match ident.as_str() {
                "true" => Ok(Condition::Literal(Literal::Bool(true))),
                "false" => Ok(Condition::Literal(Literal::Bool(false))),
                "null" => Ok(Condition::Literal(Literal::Null)),
                "undefined" => Ok(Condition::Literal(Literal::Undefined)),
                other => Err(format!(
                    "unknown identifier '{other}', prefix variables with '#' or '@'"
                )),
            },
            Some(token) => Err(format!("unexpected {}", token.describe())),
            None => Err("unexpected end of expression".into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(memory: &[(&str, &str)], store: &[(&str, &str)]) -> Variables {
        let mut vars = Variables::default();
        for (k, v) in memory {
            vars.set(Scope::Memory, k, *v);
        }
        for (k, v) in store {
            vars.set(Scope::Store, k, *v);
        }
        vars
    }

    #[test]
    fn existence_checks() {
        let v = vars(&[("x", "1")], &[]);
        assert!(evaluate_when("#x", &v).unwrap());
        assert!(!evaluate_when("@x", &v).unwrap());
        assert!(evaluate_when("!#y", &vars(&[], &[])).unwrap());
        assert!(!evaluate_when("!#x", &v).unwrap());
    }

    #[test]
    fn existence_ignores_truthiness() {
        let v = vars(&[("ran", "")], &[("off", "false")]);
        assert!(evaluate_when("#ran", &v).unwrap());
        assert!(evaluate_when("@off", &v).unwrap());
    }

    #[test]
    fn strict_equality() {
        let a = vars(&[("x", "a")], &[]);
        let b = vars(&[("x", "b")], &[]);
        assert!(evaluate_when("#x == 'a'", &a).unwrap());
        assert!(!evaluate_when("#x == 'a'", &b).unwrap());
        assert!(evaluate_when("#x != 'a'", &b).unwrap());
        assert!(evaluate_when("#x === \"a\"", &a).unwrap());
    }

    #[test]
    fn no_coercion_between_kinds() {
        let v = vars(&[("n", "1"), ("flag", "true")], &[]);
        assert!(!evaluate_when("#n == 1", &v).unwrap());
        assert!(!evaluate_when("#flag == true", &v).unwrap());
        assert!(evaluate_when("#flag == 'true'", &v).unwrap());
        assert!(evaluate_when("#missing == undefined", &v).unwrap());
        assert!(!evaluate_when("#missing == null", &v).unwrap());
    }

    #[test]
    fn boolean_composition_and_precedence() {
        let v = vars(&[("fw", "react")], &[("ts", "true")]);
        assert!(evaluate_when("#fw == 'react' && @ts == 'true'", &v).unwrap());
        assert!(evaluate_when("#fw == 'vue' || @ts", &v).unwrap());
        // && binds tighter than ||
        assert!(evaluate_when("#nope && #nope || #fw", &v).unwrap());
        assert!(!evaluate_when("#nope && (#nope || #fw)", &v).unwrap());
        assert!(evaluate_when("!(#fw == 'vue')", &v).unwrap());
    }

    #[test]
    fn comparing_across_tables() {
        let v = vars(&[("name", "ada")], &[("name", "ada")]);
        assert!(evaluate_when("#name == @name", &v).unwrap());
    }

    #[test]
    fn malformed_expressions_are_errors() {
        let v = Variables::default();
        for bad in ["", "#x ==", "(#x", "#x = 'a'", "#x & #y", "framework", "'open", "#", "#x #y"] {
            let err = evaluate_when(bad, &v).unwrap_err();
            assert!(
                matches!(err, DomainError::InvalidExpression { .. }),
                "expected expression error for {bad:?}"
            );
        }
    }
}
