//! Arithmetic evaluator for chat input such as "what is 5 + 3?".
//!
//! Grammar (recursive descent, `^` binds tighter than unary minus and is
//! right-associative):
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/' | '%') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := primary ('^' unary)?
//! primary := number | '(' expr ')' | 'sqrt' '(' expr ')' | 'pi' | 'e'
//! ```

use chat_types::CalcError;

/// Lead-ins stripped before deciding whether input is arithmetic.
const LEAD_INS: &[&str] = &[
    "what is", "what's", "whats", "calculate", "compute", "evaluate", "solve",
];

const NAMES: &[&str] = &["sqrt", "pi", "e"];

/// Nesting limit for parentheses, signs and exponents.
pub const MAX_DEPTH: usize = 64;

/// Pull an arithmetic expression out of lowercased chat text, or `None` when
/// the text is not arithmetic. A bare number is not treated as arithmetic.
pub fn extract_expression(lowered: &str) -> Option<String> {
    let mut text = lowered.trim();
    for lead in LEAD_INS {
        if let Some(rest) = text.strip_prefix(lead) {
            text = rest.trim_start_matches(':').trim();
            break;
        }
    }
    let text = text.trim_end_matches(['?', '=', '!', ' ']).trim();
    if text.is_empty() {
        return None;
    }

    let normalized: String = text
        .chars()
        .map(|c| match c {
            '×' => '*',
            '÷' => '/',
            other => other,
        })
        .collect();

    let mut has_digit = false;
    let mut has_operator = false;
    let mut word = String::new();
    for c in normalized.chars().chain(std::iter::once(' ')) {
        if c.is_ascii_alphabetic() {
            word.push(c);
            continue;
        }
        if !word.is_empty() {
            if !NAMES.contains(&word.as_str()) {
                return None;
            }
            if word == "sqrt" {
                has_operator = true;
            }
            word.clear();
        }
        match c {
            '0'..='9' => has_digit = true,
            '+' | '-' | '*' | '/' | '%' | '^' => has_operator = true,
            '.' | '(' | ')' | ' ' => {}
            _ => return None,
        }
    }

    (has_digit && has_operator).then_some(normalized)
}

/// Evaluate an expression to a finite number.
pub fn evaluate(input: &str) -> Result<f64, CalcError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(CalcError::Empty);
    }
    let mut parser = Parser { tokens, pos: 0, depth: 0 };
    let value = parser.expr()?;
    match parser.peek() {
        None => {}
        Some(Token::RParen) => return Err(CalcError::UnbalancedParen),
        Some(_) => return Err(CalcError::TrailingInput),
    }
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::NotFinite)
    }
}

/// Integers print without a decimal point, everything else with at most ten
/// fractional digits and no trailing zeros.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    let fixed = format!("{:.10}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" || trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' => {
                i += 1;
                continue;
            }
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| CalcError::UnexpectedChar(c, start))?;
                tokens.push(Token::Num(value));
                continue;
            }
            'a'..='z' | 'A'..='Z' => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_alphabetic() {
                    i += 1;
                }
                let name: String = chars[start..i].iter().collect::<String>().to_lowercase();
                tokens.push(Token::Ident(name));
                continue;
            }
            '+' => tokens.push(Token::Plus),
            '-' => tokens.push(Token::Minus),
            '*' | '×' => tokens.push(Token::Star),
            '/' | '÷' => tokens.push(Token::Slash),
            '%' => tokens.push(Token::Percent),
            '^' => tokens.push(Token::Caret),
            '(' => tokens.push(Token::LParen),
            ')' => tokens.push(Token::RParen),
            other => return Err(CalcError::UnexpectedChar(other, i)),
        }
        i += 1;
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expr(&mut self) -> Result<f64, CalcError> {
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

    fn term(&mut self) -> Result<f64, CalcError> {
        let mut value = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    value *= self.unary()?;
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    let rhs = self.unary()?;
                    if rhs == 0.0 {
                        return Err(CalcError::DivisionByZero);
                    }
                    value /= rhs;
                }
                Some(Token::Percent) => {
                    self.pos += 1;
                    let rhs = self.unary()?;
                    if rhs == 0.0 {
                        return Err(CalcError::DivisionByZero);
                    }
                    value %= rhs;
                }
                _ => return Ok(value),
            }
        }
    }

    // Every nested construct passes through here, so this bounds recursion.
    fn unary(&mut self) -> Result<f64, CalcError> {
        if self.depth >= MAX_DEPTH {
            return Err(CalcError::TooDeep);
        }
        self.depth += 1;
        let value = self.signed();
        self.depth -= 1;
        value
    }

    fn signed(&mut self) -> Result<f64, CalcError> {
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

    fn power(&mut self) -> Result<f64, CalcError> {
        let base = self.primary()?;
        if let Some(Token::Caret) = self.peek() {
            self.pos += 1;
            let exponent = self.unary()?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<f64, CalcError> {
        match self.next() {
            Some(Token::Num(value)) => Ok(value),
            Some(Token::LParen) => {
                let value = self.expr()?;
                self.expect_rparen()?;
                Ok(value)
            }
            Some(Token::Ident(name)) => match name.as_str() {
                "pi" => Ok(std::f64::consts::PI),
                "e" => Ok(std::f64::consts::E),
                "sqrt" => {
                    if self.next() != Some(Token::LParen) {
                        return Err(CalcError::UnexpectedEnd);
                    }
                    let value = self.expr()?;
                    self.expect_rparen()?;
                    Ok(value.sqrt())
                }
                _ => Err(CalcError::UnknownName(name)),
            },
            Some(Token::RParen) => Err(CalcError::UnbalancedParen),
            Some(_) | None => Err(CalcError::UnexpectedEnd),
        }
    }

    fn expect_rparen(&mut self) -> Result<(), CalcError> {
        match self.next() {
            Some(Token::RParen) => Ok(()),
            _ => Err(CalcError::UnbalancedParen),
        }
    }
}
