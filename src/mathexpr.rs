//! Math-expression fast path
//!
//! Prediction first checks whether the input looks like arithmetic; if so
//! it is evaluated directly and the classifier is never consulted.
//!
//! [`is_math_expression`] is a character-class filter, not a parser: it
//! only guarantees that the text contains no characters outside the
//! whitelist, so inputs like "sin" pass the filter and must then fail
//! evaluation with an error value rather than a panic.
//!
//! [`evaluate`] is a recursive-descent parser over a closed grammar. The
//! only names that resolve are the fixed function/constant set below;
//! there is no way for an expression to reach anything else.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::MathError;

/// Whitelist covering digits, whitespace, operators, brackets, and the
/// letters of the allowed names (sqrt, log, sin, cos, tan, pi, e, pow,
/// deg, rad). `**` is normalized to `^` before matching.
static MATH_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\d\s+\-*/%.,()\[\]eEpiqrtlogsincoatanraddeg\^]+$")
        .expect("math whitelist regex is valid")
});

/// True iff every character of `text` is in the math whitelist.
pub fn is_math_expression(text: &str) -> bool {
    MATH_CHARS.is_match(&text.replace("**", "^"))
}

/// Render an evaluation result: integer values without a decimal point,
/// everything else with full float precision.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Evaluate an arithmetic expression. Any failure comes back as a
/// [`MathError`] value; nothing panics on malformed input.
pub fn evaluate(text: &str) -> Result<f64, MathError> {
    let source = text.replace("**", "^");
    let tokens = lex(&source)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expression()?;
    parser.expect_end()?;
    if !value.is_finite() {
        return Err(MathError::NotFinite);
    }
    Ok(value)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Open,
    Close,
    Comma,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Ident(name) => write!(f, "{}", name),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Percent => write!(f, "%"),
            Token::Caret => write!(f, "^"),
            Token::Open => write!(f, "("),
            Token::Close => write!(f, ")"),
            Token::Comma => write!(f, ","),
        }
    }
}

fn lex(source: &str) -> Result<Vec<Token>, MathError> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut literal = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        literal.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                // Exponent suffix (1e5, 2.5e-3). Only consumed when a
                // digit actually follows, so "log(e)" still lexes the
                // constant and "2e" stays a clean parse error.
                if matches!(chars.peek(), Some(&('e' | 'E'))) {
                    let mut ahead = chars.clone();
                    ahead.next();
                    if matches!(ahead.peek(), Some(&('+' | '-'))) {
                        ahead.next();
                    }
                    if matches!(ahead.peek(), Some(d) if d.is_ascii_digit()) {
                        literal.push(chars.next().unwrap_or('e'));
                        if matches!(chars.peek(), Some(&('+' | '-'))) {
                            literal.push(chars.next().unwrap_or('+'));
                        }
                        while let Some(&d) = chars.peek() {
                            if d.is_ascii_digit() {
                                literal.push(d);
                                chars.next();
                            } else {
                                break;
                            }
                        }
                    }
                }
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| MathError::UnexpectedToken(literal.clone()))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_alphabetic() => {
                let mut name = String::new();
                while let Some(&a) = chars.peek() {
                    if a.is_alphabetic() {
                        name.push(a);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(name.to_lowercase()));
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '%' => {
                chars.next();
                tokens.push(Token::Percent);
            }
            '^' => {
                chars.next();
                tokens.push(Token::Caret);
            }
            '(' | '[' => {
                chars.next();
                tokens.push(Token::Open);
            }
            ')' | ']' => {
                chars.next();
                tokens.push(Token::Close);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            other => return Err(MathError::UnexpectedChar(other)),
        }
    }
    Ok(tokens)
}

/// Recursion ceiling for the parser. Parentheses and unary signs are
/// whitelisted characters, so arbitrarily nested input reaches the
/// parser; past this depth it gets an error value instead of blowing
/// the stack.
const MAX_DEPTH: usize = 64;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect_end(&self) -> Result<(), MathError> {
        match self.peek() {
            None => Ok(()),
            Some(token) => Err(MathError::UnexpectedToken(token.to_string())),
        }
    }

    /// Every recursion cycle in this parser passes through
    /// [`Parser::expression`] or [`Parser::unary`], so bounding those
    /// two bounds the whole parse.
    fn descend(&mut self) -> Result<(), MathError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(MathError::TooDeep);
        }
        Ok(())
    }

    /// expression := term (('+' | '-') term)*
    fn expression(&mut self) -> Result<f64, MathError> {
        self.descend()?;
        let value = self.expression_inner();
        self.depth -= 1;
        value
    }

    fn expression_inner(&mut self) -> Result<f64, MathError> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    /// term := unary (('*' | '/' | '%') unary)*
    fn term(&mut self) -> Result<f64, MathError> {
        let mut value = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    value *= self.unary()?;
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    let divisor = self.unary()?;
                    if divisor == 0.0 {
                        return Err(MathError::DivisionByZero);
                    }
                    value /= divisor;
                }
                Some(Token::Percent) => {
                    self.pos += 1;
                    let divisor = self.unary()?;
                    if divisor == 0.0 {
                        return Err(MathError::DivisionByZero);
                    }
                    value %= divisor;
                }
                _ => return Ok(value),
            }
        }
    }

    /// unary := ('-' | '+') unary | power
    ///
    /// Unary minus binds looser than '^', so -2^2 is -4.
    fn unary(&mut self) -> Result<f64, MathError> {
        self.descend()?;
        let value = self.unary_inner();
        self.depth -= 1;
        value
    }

    fn unary_inner(&mut self) -> Result<f64, MathError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(-self.unary()?)
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    /// power := atom ('^' unary)?   (right-associative)
    fn power(&mut self) -> Result<f64, MathError> {
        let base = self.atom()?;
        if let Some(Token::Caret) = self.peek() {
            self.pos += 1;
            let exponent = self.unary()?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    /// atom := number | constant | function '(' args ')' | '(' expression ')'
    fn atom(&mut self) -> Result<f64, MathError> {
        match self.advance() {
            Some(Token::Number(value)) => Ok(value),
            Some(Token::Open) => {
                let value = self.expression()?;
                match self.advance() {
                    Some(Token::Close) => Ok(value),
                    Some(token) => Err(MathError::UnexpectedToken(token.to_string())),
                    None => Err(MathError::UnexpectedEnd),
                }
            }
            Some(Token::Ident(name)) => self.name(&name),
            Some(token) => Err(MathError::UnexpectedToken(token.to_string())),
            None => Err(MathError::UnexpectedEnd),
        }
    }

    /// Resolve a name: the two constants evaluate directly, the known
    /// functions require a parenthesized argument list, and anything
    /// else is an unknown-name error.
    fn name(&mut self, name: &str) -> Result<f64, MathError> {
        match name {
            "pi" => return Ok(std::f64::consts::PI),
            "e" => return Ok(std::f64::consts::E),
            "sqrt" | "log" | "sin" | "cos" | "tan" | "pow" | "abs" | "round" | "deg"
            | "rad" => {}
            other => return Err(MathError::UnknownName(other.to_string())),
        }
        if self.peek() != Some(&Token::Open) {
            return Err(MathError::MissingArguments(name.to_string()));
        }
        self.pos += 1;
        let mut args = vec![self.expression()?];
        loop {
            match self.advance() {
                Some(Token::Comma) => args.push(self.expression()?),
                Some(Token::Close) => break,
                Some(token) => return Err(MathError::UnexpectedToken(token.to_string())),
                None => return Err(MathError::UnexpectedEnd),
            }
        }
        apply(name, &args)
    }
}

fn apply(name: &str, args: &[f64]) -> Result<f64, MathError> {
    let one = |name: &'static str| -> Result<f64, MathError> {
        if args.len() == 1 {
            Ok(args[0])
        } else {
            Err(MathError::WrongArgCount {
                name,
                expected: "1",
                got: args.len(),
            })
        }
    };
    match name {
        "sqrt" => {
            let x = one("sqrt")?;
            if x < 0.0 {
                return Err(MathError::Domain("sqrt of a negative number"));
            }
            Ok(x.sqrt())
        }
        "log" => match args {
            [x] => {
                if *x <= 0.0 {
                    return Err(MathError::Domain("log of a non-positive number"));
                }
                Ok(x.ln())
            }
            [x, base] => {
                if *x <= 0.0 || *base <= 0.0 {
                    return Err(MathError::Domain("log of a non-positive number"));
                }
                Ok(x.ln() / base.ln())
            }
            _ => Err(MathError::WrongArgCount {
                name: "log",
                expected: "1 or 2",
                got: args.len(),
            }),
        },
        "sin" => Ok(one("sin")?.sin()),
        "cos" => Ok(one("cos")?.cos()),
        "tan" => Ok(one("tan")?.tan()),
        "pow" => match args {
            [base, exponent] => Ok(base.powf(*exponent)),
            _ => Err(MathError::WrongArgCount {
                name: "pow",
                expected: "2",
                got: args.len(),
            }),
        },
        "abs" => Ok(one("abs")?.abs()),
        "round" => match args {
            [x] => Ok(x.round()),
            [x, digits] => {
                let factor = 10f64.powi(digits.round() as i32);
                Ok((x * factor).round() / factor)
            }
            _ => Err(MathError::WrongArgCount {
                name: "round",
                expected: "1 or 2",
                got: args.len(),
            }),
        },
        "deg" => Ok(one("deg")?.to_degrees()),
        "rad" => Ok(one("rad")?.to_radians()),
        other => Err(MathError::UnknownName(other.to_string())),
    }
}
