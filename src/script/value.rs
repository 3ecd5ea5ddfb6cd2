//! The script engine's tagged numeric value.
//!
//! Arithmetic is integer or floating per-operation, decided by the textual
//! form of the operands: a decimal point in either side promotes the pair
//! to floats. Division is always floating. Integer results render plain;
//! float results render with six decimals, which is how they re-enter the
//! expression text and keep later operations floating.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
}

impl Value {
    /// Parse an operand substring. A decimal point selects the float
    /// representation; anything unparseable degrades to integer zero.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.contains('.') {
            Value::Float(text.parse().unwrap_or(0.0))
        } else {
            Value::Int(text.parse().unwrap_or(0))
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Value::Int(v) => v as f64,
            Value::Float(v) => v,
        }
    }

    /// Apply a binary operator. Two integer operands stay on the integer
    /// path (truncating where the operation produces a fraction); any
    /// float operand promotes both sides.
    pub fn apply(self, op: char, rhs: Value) -> Value {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => apply_int(a, op, b),
            _ => apply_float(self.as_f64(), op, rhs.as_f64()),
        }
    }
}

fn apply_int(a: i64, op: char, b: i64) -> Value {
    match op {
        // Division always yields a floating result.
        '/' => Value::Float(a as f64 / b as f64),
        '*' | 'x' => Value::Int(a.wrapping_mul(b)),
        '+' => Value::Int(a.wrapping_add(b)),
        '-' => Value::Int(a.wrapping_sub(b)),
        '^' => Value::Int((a as f64).powf(b as f64) as i64),
        '%' => Value::Int(ieee_remainder(a as f64, b as f64) as i64),
        '>' => Value::Int((a > b) as i64),
        '<' => Value::Int((a < b) as i64),
        '=' => Value::Int((a == b) as i64),
        '|' => Value::Int((a != 0 || b != 0) as i64),
        '&' => Value::Int((a != 0 && b != 0) as i64),
        _ => {
            log::error!("Unknown script operation: {}", op);
            Value::Int(0)
        }
    }
}

fn apply_float(a: f64, op: char, b: f64) -> Value {
    match op {
        '/' => Value::Float(a / b),
        '*' | 'x' => Value::Float(a * b),
        '+' => Value::Float(a + b),
        '-' => Value::Float(a - b),
        '^' => Value::Float(a.powf(b)),
        '%' => Value::Float(ieee_remainder(a, b)),
        '>' => Value::Float((a > b) as i64 as f64),
        '<' => Value::Float((a < b) as i64 as f64),
        '=' => Value::Float((a == b) as i64 as f64),
        '|' => Value::Float((a != 0.0 || b != 0.0) as i64 as f64),
        '&' => Value::Float((a != 0.0 && b != 0.0) as i64 as f64),
        _ => {
            log::error!("Unknown script operation: {}", op);
            Value::Float(0.0)
        }
    }
}

/// IEEE-style remainder: `a - b * round(a / b)`. Can go negative, unlike
/// a truncating modulo.
fn ieee_remainder(a: f64, b: f64) -> f64 {
    a - b * (a / b).round()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{:.6}", v),
        }
    }
}
