use crate::operator::Op;

/// Literal keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    True,
    False,
    Null,
    Undefined,
}

impl Keyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::True => "true",
            Keyword::False => "false",
            Keyword::Null => "null",
            Keyword::Undefined => "undefined",
        }
    }

    /// Recognize a keyword in a finished identifier run.
    pub fn from_ident(ident: &str) -> Option<Keyword> {
        match ident {
            "true" => Some(Keyword::True),
            "false" => Some(Keyword::False),
            "null" => Some(Keyword::Null),
            "undefined" => Some(Keyword::Undefined),
            _ => None,
        }
    }
}

/// A token in evaluation order.
///
/// The stream is flat postfix: operands precede the operator, call, or
/// literal-builder token that consumes them. Replay consumers read every
/// token as a `(value, arity)` pair with the arity doubling as a type tag;
/// [`Token::value`] and [`Token::arity`] expose that encoding for dumps and
/// compatibility checks.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Numeric literal. Always a complete number; the scanner merges
    /// fractional parts before emitting.
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 3.14
    /// .5
    /// ```
    Number(f64),

    /// String literal, single- or double-quoted in source.
    ///
    /// # Examples
    /// ```text
    /// 'hello'
    /// "it\'s"
    /// ```
    Str(String),

    /// `true`, `false`, `null`, or `undefined`.
    Keyword(Keyword),

    // Names
    /// Bare identifier, resolved against the binding context at replay.
    ///
    /// # Examples
    /// ```text
    /// user
    /// @index
    /// $helper
    /// ```
    Identifier(String),

    /// Object-literal key. Produced by `:` converting the token to its left;
    /// replay reads it as a property name, never as a variable.
    ///
    /// # Examples
    /// ```text
    /// {name: ...}     key "name"
    /// {"a b": ...}    key "a b"
    /// {2: ...}        key "2"
    /// ```
    PropertyKey(String),

    // Operators
    /// Unary or binary operator, including member access `.` and the
    /// ternary pair `?` / `:`.
    Operator(Op),

    // Applications
    /// Named call. Emitted after its arguments; `f(1,2,3)` ends with
    /// the call token for `f` carrying 3. The name comes from an
    /// identifier or string-literal callee, so `('f')(x)` is a named
    /// call of `f`.
    Call { name: String, args: usize },

    /// Call of the preceding computed value (the callee was a subscript,
    /// call, or operator result rather than a name). The callee sits
    /// below the arguments in the stream.
    ///
    /// # Examples
    /// ```text
    /// handlers[0](evt)
    /// f(1)(2)
    /// ```
    Invoke { args: usize },

    /// Indexer application. The target and the index expressions precede it.
    ///
    /// # Examples
    /// ```text
    /// items[0]
    /// grid[row][col]
    /// ```
    Subscript { args: usize },

    // Literal builders
    /// Array literal; `len` elements precede it. `len == 0` is the
    /// immediately-empty `[]`.
    ArrayLiteral { len: usize },

    /// Object literal; `props` key/value pairs precede it.
    ObjectLiteral { props: usize },
}

impl Token {
    /// The token's value in the legacy `(value, arity)` encoding.
    pub fn value(&self) -> String {
        match self {
            Token::Number(n) => format_number(*n),
            Token::Str(s) => s.clone(),
            Token::Keyword(k) => k.as_str().to_string(),
            Token::Identifier(name) => name.clone(),
            Token::PropertyKey(name) => name.clone(),
            Token::Operator(op) => op.symbol().to_string(),
            Token::Call { name, .. } => name.clone(),
            Token::Invoke { .. } => "()".to_string(),
            Token::Subscript { .. } => "[]".to_string(),
            Token::ArrayLiteral { .. } => "[]".to_string(),
            Token::ObjectLiteral { .. } => "{}".to_string(),
        }
    }

    /// The token's arity in the legacy encoding: `-1` for identifiers and the
    /// empty array marker, `0` for literals, empty objects, and zero-argument
    /// calls, operand count for operators, and the collected count for calls,
    /// subscripts, and non-empty literal builders. The transient "pending
    /// call" state (`-2`) never reaches an emitted token.
    pub fn arity(&self) -> i32 {
        match self {
            Token::Number(_) | Token::Str(_) | Token::Keyword(_) => 0,
            Token::Identifier(_) => -1,
            Token::PropertyKey(_) => 1,
            Token::Operator(op) => op.operands() as i32,
            Token::Call { args, .. } => *args as i32,
            Token::Invoke { args } => *args as i32,
            Token::Subscript { args } => *args as i32,
            Token::ArrayLiteral { len } => {
                if *len == 0 {
                    -1
                } else {
                    *len as i32
                }
            }
            Token::ObjectLiteral { props } => *props as i32,
        }
    }
}

/// Format a number for token dumps and string coercion: integral values
/// print without a trailing fraction.
pub fn format_number(n: f64) -> String {
    n.to_string()
}
