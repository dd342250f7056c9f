use parser::LiteralValue;

/// A runtime value. `Display` is what `print` writes.
#[derive(Debug, Clone, PartialEq, derive_more::From, derive_more::Display)]
pub enum Value {
    #[display(fmt = "{}", "format_number(*_0)")]
    Number(f64),
    Str(String),
    Bool(bool),
    #[display(fmt = "nil")]
    Nil,
}

/// Shortest round-trip decimal, with `+Inf`, `-Inf` and `NaN` for the non-finite values.
fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "+Inf" } else { "-Inf" }.to_string()
    } else {
        n.to_string()
    }
}

impl Value {
    /// `nil` and `false` are falsey, everything else (including `0` and `""`) is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<&LiteralValue<'_>> for Value {
    fn from(literal: &LiteralValue<'_>) -> Self {
        match *literal {
            LiteralValue::Number(n) => n.into(),
            LiteralValue::Str(s) => s.into(),
            LiteralValue::Boolean(b) => b.into(),
            LiteralValue::Nil => Value::Nil,
        }
    }
}
