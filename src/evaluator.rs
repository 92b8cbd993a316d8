use std::collections::HashMap;

use crate::error::ExprError;
use crate::operator::Op;
use crate::token::{Keyword, Token};
use crate::tokenizer::tokenize;
use crate::value::Value;

/// A native function callable by name from an expression.
pub type NativeFn = fn(&[Value]) -> Result<Value, EvalError>;

/// Errors that can occur while replaying a token stream.
#[derive(Debug, Clone)]
pub enum EvalError {
    /// Operation applied to a value of the wrong type
    TypeError(String),

    /// Call of a function the scope does not provide
    UnknownFunction(String),

    /// Method call no value type supports
    UnknownMethod(String),

    /// The token stream is not a well-formed postfix program
    MalformedStream(String),
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::TypeError(msg) => write!(f, "Type error: {}", msg),
            EvalError::UnknownFunction(name) => write!(f, "Unknown function: {}()", name),
            EvalError::UnknownMethod(name) => write!(f, "Unknown method: .{}()", name),
            EvalError::MalformedStream(msg) => write!(f, "Malformed token stream: {}", msg),
        }
    }
}

impl std::error::Error for EvalError {}

/// Returns a human-readable type name for a Value
fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::Str(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The variable and function context an expression is replayed against.
///
/// Identifiers resolve through the variable map; names that are absent
/// resolve to `Null`, since binding expressions routinely run against
/// partially populated data. Named calls resolve through the function
/// registry first, then through the built-ins.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    vars: HashMap<String, Value>,
    fns: HashMap<String, NativeFn>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scope from a root value. Object fields become variables and
    /// the whole root is reachable as `this`.
    pub fn from_value(root: Value) -> Self {
        let mut scope = Scope::new();
        if let Value::Object(fields) = &root {
            for (name, value) in fields {
                scope.vars.insert(name.clone(), value.clone());
            }
        }
        scope.vars.insert("this".to_string(), root);
        scope
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.vars.insert(name.into(), value);
    }

    pub fn register(&mut self, name: impl Into<String>, function: NativeFn) {
        self.fns.insert(name.into(), function);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }
}

/// One entry on the replay stack.
///
/// Identifiers and named calls stay unresolved until consumed: as an operand
/// they resolve against the scope, as the right side of `.` they act as a
/// property name or method call on the receiver.
#[derive(Debug)]
enum Slot {
    Val(Value),
    Ref(String),
    Key(String),
    Pending { name: String, args: Vec<Value> },
    Choice { taken: bool, value: Value },
}

/// Replays token streams against a scope.
///
/// # Examples
///
/// ```
/// use cassia::{Evaluator, Scope, Value};
///
/// let mut scope = Scope::new();
/// scope.set("price", Value::Number(100.0));
///
/// let evaluator = Evaluator::new(scope);
/// let result = evaluator.eval_str("price * 2").unwrap();
/// assert_eq!(result, Value::Number(200.0));
/// ```
#[derive(Debug, Default)]
pub struct Evaluator {
    scope: Scope,
}

impl Evaluator {
    pub fn new(scope: Scope) -> Self {
        Evaluator { scope }
    }

    /// Tokenize and replay an expression in one step.
    pub fn eval_str(&self, input: &str) -> Result<Value, ExprError> {
        let tokens = tokenize(input)?;
        Ok(self.eval(&tokens)?)
    }

    /// Replay a token stream. An empty stream evaluates to `Null`.
    pub fn eval(&self, tokens: &[Token]) -> Result<Value, EvalError> {
        let mut stack: Vec<Slot> = Vec::new();

        for token in tokens {
            match token {
                Token::Number(n) => stack.push(Slot::Val(Value::Number(*n))),
                Token::Str(s) => stack.push(Slot::Val(Value::Str(s.clone()))),
                Token::Keyword(k) => stack.push(Slot::Val(match k {
                    Keyword::True => Value::Bool(true),
                    Keyword::False => Value::Bool(false),
                    Keyword::Null | Keyword::Undefined => Value::Null,
                })),
                Token::Identifier(name) => stack.push(Slot::Ref(name.clone())),
                Token::PropertyKey(name) => stack.push(Slot::Key(name.clone())),
                Token::Operator(op) => self.apply_operator(*op, &mut stack)?,
                Token::Call { name, args } => {
                    let args = self.pop_values(&mut stack, *args)?;
                    stack.push(Slot::Pending {
                        name: name.clone(),
                        args,
                    });
                }
                Token::Invoke { args } => {
                    let _ = self.pop_values(&mut stack, *args)?;
                    let callee = self.resolve(pop(&mut stack)?)?;
                    return Err(EvalError::TypeError(format!(
                        "{} is not callable",
                        type_name(&callee)
                    )));
                }
                Token::Subscript { args } => {
                    if *args != 1 {
                        return Err(EvalError::TypeError(
                            "a subscript takes exactly one index".to_string(),
                        ));
                    }
                    let index = self.resolve(pop(&mut stack)?)?;
                    let target = self.resolve(pop(&mut stack)?)?;
                    stack.push(Slot::Val(index_value(&target, &index)));
                }
                Token::ArrayLiteral { len } => {
                    let items = self.pop_values(&mut stack, *len)?;
                    stack.push(Slot::Val(Value::Array(items)));
                }
                Token::ObjectLiteral { props } => {
                    let mut map = HashMap::new();
                    for _ in 0..*props {
                        let value = self.resolve(pop(&mut stack)?)?;
                        match pop(&mut stack)? {
                            // Pairs pop back to front, so a key already
                            // present came later in source and keeps its
                            // value. Duplicates resolve to the last write.
                            Slot::Key(name) => {
                                map.entry(name).or_insert(value);
                            }
                            _ => {
                                return Err(EvalError::MalformedStream(
                                    "object property without a key".to_string(),
                                ));
                            }
                        }
                    }
                    stack.push(Slot::Val(Value::Object(map)));
                }
            }
        }

        match stack.len() {
            0 => Ok(Value::Null),
            1 => match stack.pop() {
                Some(slot) => self.resolve(slot),
                None => Ok(Value::Null),
            },
            _ => Err(EvalError::MalformedStream(
                "leftover operands after replay".to_string(),
            )),
        }
    }

    // ========================================
    // Resolution
    // ========================================

    fn resolve(&self, slot: Slot) -> Result<Value, EvalError> {
        match slot {
            Slot::Val(v) => Ok(v),
            Slot::Ref(name) => Ok(self.scope.get(&name).cloned().unwrap_or(Value::Null)),
            Slot::Pending { name, args } => self.call_function(&name, &args),
            Slot::Key(_) => Err(EvalError::MalformedStream(
                "property key outside an object literal".to_string(),
            )),
            Slot::Choice { .. } => Err(EvalError::MalformedStream(
                "'?' without its ':'".to_string(),
            )),
        }
    }

    fn pop_values(&self, stack: &mut Vec<Slot>, count: usize) -> Result<Vec<Value>, EvalError> {
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(self.resolve(pop(stack)?)?);
        }
        values.reverse();
        Ok(values)
    }

    // ========================================
    // Operators
    // ========================================

    fn apply_operator(&self, op: Op, stack: &mut Vec<Slot>) -> Result<(), EvalError> {
        match op {
            Op::Member => {
                let member = pop(stack)?;
                let receiver = self.resolve(pop(stack)?)?;
                let result = match member {
                    Slot::Ref(name) => get_property(&receiver, &name),
                    Slot::Pending { name, args } => self.call_method(&receiver, &name, &args)?,
                    _ => {
                        return Err(EvalError::TypeError(
                            "member access needs a property name".to_string(),
                        ));
                    }
                };
                stack.push(Slot::Val(result));
            }
            Op::TernaryIf => {
                let value = self.resolve(pop(stack)?)?;
                let condition = self.resolve(pop(stack)?)?;
                stack.push(Slot::Choice {
                    taken: condition.is_truthy(),
                    value,
                });
            }
            Op::TernaryElse => {
                let fallback = self.resolve(pop(stack)?)?;
                match pop(stack)? {
                    Slot::Choice { taken, value } => {
                        stack.push(Slot::Val(if taken { value } else { fallback }));
                    }
                    _ => {
                        return Err(EvalError::MalformedStream(
                            "':' without its '?'".to_string(),
                        ));
                    }
                }
            }
            Op::Not | Op::Pos | Op::Neg => {
                let value = self.resolve(pop(stack)?)?;
                stack.push(Slot::Val(apply_unary(op, &value)));
            }
            _ => {
                let rhs = self.resolve(pop(stack)?)?;
                let lhs = self.resolve(pop(stack)?)?;
                stack.push(Slot::Val(apply_binary(op, lhs, rhs)));
            }
        }
        Ok(())
    }

    // ========================================
    // Functions
    // ========================================

    fn call_function(&self, name: &str, args: &[Value]) -> Result<Value, EvalError> {
        if let Some(function) = self.scope.fns.get(name) {
            return function(args);
        }
        let number = |index: usize| args.get(index).map(Value::as_number).unwrap_or(f64::NAN);
        match name {
            "abs" => Ok(Value::Number(number(0).abs())),
            "floor" => Ok(Value::Number(number(0).floor())),
            "ceil" => Ok(Value::Number(number(0).ceil())),
            "round" => Ok(Value::Number(number(0).round())),
            "sqrt" => Ok(Value::Number(number(0).sqrt())),
            "min" => Ok(Value::Number(
                args.iter()
                    .map(Value::as_number)
                    .fold(f64::INFINITY, f64::min),
            )),
            "max" => Ok(Value::Number(
                args.iter()
                    .map(Value::as_number)
                    .fold(f64::NEG_INFINITY, f64::max),
            )),
            _ => Err(EvalError::UnknownFunction(name.to_string())),
        }
    }

    // ========================================
    // Methods
    // ========================================

    fn call_method(&self, receiver: &Value, name: &str, args: &[Value]) -> Result<Value, EvalError> {
        match name {
            "length" => self.method_length(receiver),
            "toUpperCase" => self.method_to_upper_case(receiver),
            "toLowerCase" => self.method_to_lower_case(receiver),
            "trim" => self.method_trim(receiver),
            "includes" => self.method_includes(receiver, args),
            "join" => self.method_join(receiver, args),
            "matches" => self.method_matches(receiver, args),
            _ => Err(EvalError::UnknownMethod(name.to_string())),
        }
    }

    /// .length() - character or element count
    fn method_length(&self, receiver: &Value) -> Result<Value, EvalError> {
        match receiver {
            Value::Str(s) => Ok(Value::Number(s.chars().count() as f64)),
            Value::Array(items) => Ok(Value::Number(items.len() as f64)),
            _ => Err(EvalError::TypeError(format!(
                ".length() requires string or array, got {}",
                type_name(receiver)
            ))),
        }
    }

    /// .toUpperCase() - converts string to uppercase
    fn method_to_upper_case(&self, receiver: &Value) -> Result<Value, EvalError> {
        match receiver {
            Value::Str(s) => Ok(Value::Str(s.to_uppercase())),
            _ => Err(EvalError::TypeError(format!(
                ".toUpperCase() requires string, got {}",
                type_name(receiver)
            ))),
        }
    }

    /// .toLowerCase() - converts string to lowercase
    fn method_to_lower_case(&self, receiver: &Value) -> Result<Value, EvalError> {
        match receiver {
            Value::Str(s) => Ok(Value::Str(s.to_lowercase())),
            _ => Err(EvalError::TypeError(format!(
                ".toLowerCase() requires string, got {}",
                type_name(receiver)
            ))),
        }
    }

    /// .trim() - strips leading and trailing whitespace
    fn method_trim(&self, receiver: &Value) -> Result<Value, EvalError> {
        match receiver {
            Value::Str(s) => Ok(Value::Str(s.trim().to_string())),
            _ => Err(EvalError::TypeError(format!(
                ".trim() requires string, got {}",
                type_name(receiver)
            ))),
        }
    }

    /// .includes(x) - substring or element membership
    fn method_includes(&self, receiver: &Value, args: &[Value]) -> Result<Value, EvalError> {
        let needle = args.first().cloned().unwrap_or(Value::Null);
        match receiver {
            Value::Str(s) => Ok(Value::Bool(s.contains(&needle.as_string()))),
            Value::Array(items) => Ok(Value::Bool(items.contains(&needle))),
            _ => Err(EvalError::TypeError(format!(
                ".includes() requires string or array, got {}",
                type_name(receiver)
            ))),
        }
    }

    /// .join(sep) - concatenates array elements, "," by default
    fn method_join(&self, receiver: &Value, args: &[Value]) -> Result<Value, EvalError> {
        match receiver {
            Value::Array(items) => {
                let separator = match args.first() {
                    Some(v) => v.as_string(),
                    None => ",".to_string(),
                };
                let joined = items
                    .iter()
                    .map(|v| v.as_string())
                    .collect::<Vec<_>>()
                    .join(&separator);
                Ok(Value::Str(joined))
            }
            _ => Err(EvalError::TypeError(format!(
                ".join() requires array, got {}",
                type_name(receiver)
            ))),
        }
    }

    /// .matches(pattern) - tests a string against a regex
    fn method_matches(&self, receiver: &Value, args: &[Value]) -> Result<Value, EvalError> {
        let pattern = match args.first() {
            Some(Value::Str(p)) => p.clone(),
            Some(other) => {
                return Err(EvalError::TypeError(format!(
                    ".matches() pattern must be string, got {}",
                    type_name(other)
                )));
            }
            None => {
                return Err(EvalError::TypeError(
                    ".matches() requires a pattern argument".to_string(),
                ));
            }
        };
        let re = regex::Regex::new(&pattern)
            .map_err(|e| EvalError::TypeError(format!("invalid regex: {}", e)))?;
        match receiver {
            Value::Str(s) => Ok(Value::Bool(re.is_match(s))),
            _ => Ok(Value::Bool(false)),
        }
    }
}

fn pop(stack: &mut Vec<Slot>) -> Result<Slot, EvalError> {
    stack
        .pop()
        .ok_or_else(|| EvalError::MalformedStream("operand stack underflow".to_string()))
}

fn apply_unary(op: Op, value: &Value) -> Value {
    match op {
        Op::Not => Value::Bool(!value.is_truthy()),
        Op::Neg => Value::Number(-value.as_number()),
        _ => Value::Number(value.as_number()),
    }
}

fn apply_binary(op: Op, lhs: Value, rhs: Value) -> Value {
    match op {
        // '+' concatenates as soon as either side is a string
        Op::Add => match (&lhs, &rhs) {
            (Value::Str(_), _) | (_, Value::Str(_)) => {
                Value::Str(format!("{}{}", lhs.as_string(), rhs.as_string()))
            }
            _ => Value::Number(lhs.as_number() + rhs.as_number()),
        },
        Op::Sub => Value::Number(lhs.as_number() - rhs.as_number()),
        Op::Mul => Value::Number(lhs.as_number() * rhs.as_number()),
        Op::Div => Value::Number(lhs.as_number() / rhs.as_number()),
        Op::Mod => Value::Number(lhs.as_number() % rhs.as_number()),
        Op::Eq => Value::Bool(loose_eq(&lhs, &rhs)),
        Op::Ne => Value::Bool(!loose_eq(&lhs, &rhs)),
        Op::StrictEq => Value::Bool(lhs == rhs),
        Op::StrictNe => Value::Bool(lhs != rhs),
        Op::Lt | Op::Le | Op::Gt | Op::Ge => compare(op, &lhs, &rhs),
        // '&&' and '||' yield an operand, not a boolean
        Op::And => {
            if lhs.is_truthy() {
                rhs
            } else {
                lhs
            }
        }
        Op::Or => {
            if lhs.is_truthy() {
                lhs
            } else {
                rhs
            }
        }
        _ => Value::Null,
    }
}

/// Coercing equality. Strings compare to numbers and booleans through their
/// numeric value; collections compare structurally.
fn loose_eq(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => a == b,
        (Value::Object(a), Value::Object(b)) => a == b,
        (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => false,
        _ => lhs.as_number() == rhs.as_number(),
    }
}

fn compare(op: Op, lhs: &Value, rhs: &Value) -> Value {
    let result = match (lhs, rhs) {
        (Value::Str(a), Value::Str(b)) => match op {
            Op::Lt => a < b,
            Op::Le => a <= b,
            Op::Gt => a > b,
            _ => a >= b,
        },
        _ => {
            let a = lhs.as_number();
            let b = rhs.as_number();
            match op {
                Op::Lt => a < b,
                Op::Le => a <= b,
                Op::Gt => a > b,
                _ => a >= b,
            }
        }
    };
    Value::Bool(result)
}

fn get_property(receiver: &Value, name: &str) -> Value {
    match receiver {
        Value::Object(map) => map.get(name).cloned().unwrap_or(Value::Null),
        Value::Array(items) => match name {
            "length" => Value::Number(items.len() as f64),
            _ => Value::Null,
        },
        Value::Str(s) => match name {
            "length" => Value::Number(s.chars().count() as f64),
            _ => Value::Null,
        },
        _ => Value::Null,
    }
}

fn index_value(target: &Value, index: &Value) -> Value {
    match target {
        Value::Array(items) => {
            let i = index.as_number();
            if i.fract() != 0.0 || i < 0.0 {
                return Value::Null;
            }
            items.get(i as usize).cloned().unwrap_or(Value::Null)
        }
        Value::Object(map) => map.get(&index.as_string()).cloned().unwrap_or(Value::Null),
        Value::Str(s) => {
            let i = index.as_number();
            if i.fract() != 0.0 || i < 0.0 {
                return Value::Null;
            }
            s.chars()
                .nth(i as usize)
                .map(|c| Value::Str(c.to_string()))
                .unwrap_or(Value::Null)
        }
        _ => Value::Null,
    }
}
