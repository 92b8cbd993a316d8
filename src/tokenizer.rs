use crate::classify::{is_delimiter, is_digit, is_identifier_char, is_operator_char, is_space};
use crate::error::{ErrorKind, TokenizeError};
use crate::operator::{Assoc, Op};
use crate::token::{Keyword, Token, format_number};

/// Tokenize a template binding expression into its evaluation-order stream.
///
/// The result is flat postfix: operands come before the operator, call, or
/// literal-builder token that consumes them. Empty or all-whitespace input
/// yields an empty stream. Scan state is owned by the call, so independent
/// calls share only the operator table.
///
/// # Examples
///
/// ```
/// use cassia::tokenize;
///
/// let tokens = tokenize("1 + 2 * 3").unwrap();
/// let dump: Vec<String> = tokens.iter().map(|t| t.value()).collect();
/// assert_eq!(dump, vec!["1", "2", "3", "*", "+"]);
/// ```
pub fn tokenize(input: &str) -> Result<Vec<Token>, TokenizeError> {
    Tokenizer::new(input).run()
}

/// One open construct. Each frame records the operator-stack depth at the
/// moment it opened; draining "to the matching bracket" pops operators back
/// down to that floor, and the precedence loop never reaches below it.
#[derive(Debug)]
enum Frame {
    /// Plain grouping `(`
    Group { ops_floor: usize },
    /// Call-opening `(`. `name` holds an identifier or string-literal callee
    /// lifted off the output queue; `None` means the callee is a preceding
    /// computed value.
    Call {
        name: Option<String>,
        commas: usize,
        ops_floor: usize,
    },
    /// Indexer `[`
    Subscript { commas: usize, ops_floor: usize },
    /// Array-literal `[`
    Array { commas: usize, ops_floor: usize },
    /// Object-literal `{`
    Object { props: usize, ops_floor: usize },
    /// Open `?` awaiting its `:`. The `?` operator sits at `ops_floor - 1`.
    Ternary { ops_floor: usize },
}

impl Frame {
    fn ops_floor(&self) -> usize {
        match self {
            Frame::Group { ops_floor }
            | Frame::Call { ops_floor, .. }
            | Frame::Subscript { ops_floor, .. }
            | Frame::Array { ops_floor, .. }
            | Frame::Object { ops_floor, .. }
            | Frame::Ternary { ops_floor } => *ops_floor,
        }
    }
}

struct Tokenizer {
    input: Vec<char>,
    position: usize,
    out: Vec<Token>,
    ops: Vec<Op>,
    frames: Vec<Frame>,
    /// Last significant character consumed. Whitespace and skipped characters
    /// leave it untouched; it is the sole context signal between iterations.
    prev: Option<char>,
    /// Whitespace or skipped characters seen since `prev`.
    prev_gap: bool,
    /// Whether the most recent number token already carries a fraction.
    last_number_fract: bool,
}

impl Tokenizer {
    fn new(input: &str) -> Self {
        Tokenizer {
            input: input.chars().collect(),
            position: 0,
            out: Vec::new(),
            ops: Vec::new(),
            frames: Vec::new(),
            prev: None,
            prev_gap: false,
            last_number_fract: false,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn fail(&self, kind: ErrorKind, message: impl Into<String>) -> TokenizeError {
        let source: String = self.input.iter().collect();
        TokenizeError::new(kind, message, source)
    }

    fn run(mut self) -> Result<Vec<Token>, TokenizeError> {
        while let Some(ch) = self.current_char() {
            if is_space(ch) {
                self.prev_gap = true;
                self.advance();
            } else if ch == ';' {
                return Err(self.fail(
                    ErrorKind::UnexpectedToken,
                    "';' is not allowed in an expression",
                ));
            } else if is_identifier_char(ch) {
                self.read_word();
            } else if is_delimiter(ch) {
                self.read_delimiter(ch)?;
            } else if is_operator_char(ch) {
                self.read_operator(ch)?;
            } else {
                // unrecognized characters are skipped
                self.prev_gap = true;
                self.advance();
            }
        }
        self.finish()
    }

    /// End of scan. Open constructs are reported in a fixed order: a
    /// dangling ternary first, then an unclosed object, then unclosed
    /// brackets; a clean scan drains the remaining operators.
    fn finish(mut self) -> Result<Vec<Token>, TokenizeError> {
        if self
            .frames
            .iter()
            .any(|f| matches!(f, Frame::Ternary { .. }))
        {
            return Err(self.fail(ErrorKind::MalformedTernary, "'?' without a matching ':'"));
        }
        if self
            .frames
            .iter()
            .any(|f| matches!(f, Frame::Object { .. }))
        {
            return Err(self.fail(ErrorKind::MalformedObjectLiteral, "unclosed '{'"));
        }
        if let Some(frame) = self.frames.last() {
            return Err(match frame {
                Frame::Subscript { .. } | Frame::Array { .. } => {
                    self.fail(ErrorKind::BracketMismatch, "unclosed '['")
                }
                _ => self.fail(ErrorKind::BracketMismatch, "unclosed '('"),
            });
        }
        self.drain_to(0);
        Ok(self.out)
    }

    // ========================================
    // Stack machinery
    // ========================================

    /// Operator-stack depth the current frame opened at.
    fn floor(&self) -> usize {
        match self.frames.last() {
            Some(frame) => frame.ops_floor(),
            None => 0,
        }
    }

    fn drain_to(&mut self, floor: usize) {
        while self.ops.len() > floor {
            if let Some(op) = self.ops.pop() {
                self.out.push(Token::Operator(op));
            }
        }
    }

    /// Shunting-yard push: pop to the output while the stack top outranks
    /// the incoming operator, then push it. The current frame's floor stops
    /// the loop, which is what makes an open bracket a hard boundary.
    fn push_operator(&mut self, op: Op) {
        let floor = self.floor();
        while self.ops.len() > floor {
            let top = self.ops[self.ops.len() - 1];
            let outranks = top.precedence() > op.precedence()
                || (top.precedence() == op.precedence() && op.assoc() == Assoc::Left);
            if !outranks {
                break;
            }
            self.ops.pop();
            self.out.push(Token::Operator(top));
        }
        self.ops.push(op);
    }

    /// A `+` or `-` is binary exactly when the previous significant character
    /// can end an operand.
    fn binary_position(&self) -> bool {
        match self.prev {
            Some(p) => is_identifier_char(p) || matches!(p, ')' | ']' | '}' | '"' | '\''),
            None => false,
        }
    }

    /// Whether a `(` or `[` here applies to a preceding callable or
    /// indexable value.
    fn callable_position(&self) -> bool {
        match self.prev {
            Some(p) => is_identifier_char(p) || p == ']' || p == ')',
            None => false,
        }
    }

    // ========================================
    // Words and literals
    // ========================================

    /// Maximal identifier/number run. All digits make a number, the literal
    /// keywords make keywords, anything else is an identifier.
    fn read_word(&mut self) {
        let mut word = String::new();
        let mut all_digits = true;
        while let Some(ch) = self.current_char() {
            if is_identifier_char(ch) {
                if !is_digit(ch) {
                    all_digits = false;
                }
                word.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        self.prev = word.chars().last();
        self.prev_gap = false;

        if all_digits {
            if let Ok(n) = word.parse::<f64>() {
                self.out.push(Token::Number(n));
                self.last_number_fract = false;
            } else {
                self.out.push(Token::Identifier(word));
            }
        } else if let Some(keyword) = Keyword::from_ident(&word) {
            self.out.push(Token::Keyword(keyword));
        } else {
            self.out.push(Token::Identifier(word));
        }
    }

    fn read_digits(&mut self) -> String {
        let mut digits = String::new();
        while let Some(ch) = self.current_char() {
            if is_digit(ch) {
                digits.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        if let Some(last) = digits.chars().last() {
            self.prev = Some(last);
            self.prev_gap = false;
        }
        digits
    }

    fn read_string(&mut self, quote: char) -> Result<String, TokenizeError> {
        let mut result = String::new();
        self.advance(); // consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    self.advance(); // consume backslash
                    match self.current_char() {
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some('r') => result.push('\r'),
                        // unknown escapes keep the escaped character
                        Some(c) => result.push(c),
                        None => break,
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(self.fail(ErrorKind::UnexpectedToken, "unterminated string literal"))
    }

    // ========================================
    // Delimiter handlers
    // ========================================

    fn read_delimiter(&mut self, ch: char) -> Result<(), TokenizeError> {
        match ch {
            '.' => self.read_period(),
            '{' => {
                self.read_open_brace();
                Ok(())
            }
            '}' => self.read_close_brace(),
            '[' => {
                self.read_open_bracket();
                Ok(())
            }
            ']' => self.read_close_bracket(),
            '(' => {
                self.read_open_paren();
                Ok(())
            }
            ')' => self.read_close_paren(),
            ',' => self.read_comma(),
            quote @ ('\'' | '"') => {
                let literal = self.read_string(quote)?;
                self.out.push(Token::Str(literal));
                self.prev = Some(quote);
                self.prev_gap = false;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// `.` is a decimal point, a fraction merge, or member access.
    fn read_period(&mut self) -> Result<(), TokenizeError> {
        // No adjacent operand to the left: the period starts a decimal
        // literal. A gap counts, so "3 .5" is 3 followed by 0.5.
        let decimal_start = match self.prev {
            None => true,
            Some(p) => self.prev_gap || is_operator_char(p) || matches!(p, '(' | '[' | '{' | ','),
        };
        if decimal_start && self.peek_char(1).is_some_and(is_digit) {
            self.advance(); // consume '.'
            let frac = self.read_digits();
            let literal = format!("0.{}", frac);
            if let Ok(n) = literal.parse::<f64>() {
                self.out.push(Token::Number(n));
            }
            self.last_number_fract = true;
            return Ok(());
        }

        // Digits adjacent to a fraction-less number extend that number.
        if self.prev.is_some_and(is_digit)
            && !self.last_number_fract
            && matches!(self.out.last(), Some(Token::Number(_)))
            && self.peek_char(1).is_some_and(is_digit)
        {
            self.advance();
            let frac = self.read_digits();
            if let Some(Token::Number(n)) = self.out.last_mut() {
                let merged = format!("{}.{}", format_number(*n), frac);
                if let Ok(m) = merged.parse::<f64>() {
                    *n = m;
                }
            }
            self.last_number_fract = true;
            return Ok(());
        }

        // Member access. Equal precedence with left associativity flushes a
        // pending '.' first, so "a.b.c" applies left to right.
        self.advance();
        self.push_operator(Op::Member);
        self.prev = Some('.');
        self.prev_gap = false;
        Ok(())
    }

    fn read_open_brace(&mut self) {
        self.advance();
        self.frames.push(Frame::Object {
            props: 0,
            ops_floor: self.ops.len(),
        });
        self.prev = Some('{');
        self.prev_gap = false;
    }

    fn read_close_brace(&mut self) -> Result<(), TokenizeError> {
        self.advance();
        match self.frames.last() {
            Some(Frame::Object { .. }) => {}
            Some(Frame::Ternary { .. }) => {
                return Err(self.fail(ErrorKind::MalformedTernary, "'?' without a matching ':'"));
            }
            _ => return Err(self.fail(ErrorKind::MalformedObjectLiteral, "unmatched '}'")),
        }
        self.drain_to(self.floor());
        if let Some(Frame::Object { props, .. }) = self.frames.pop() {
            self.out.push(Token::ObjectLiteral { props });
        }
        self.prev = Some('}');
        self.prev_gap = false;
        Ok(())
    }

    fn read_open_bracket(&mut self) {
        // A pending member access binds to the subscript target, not to the
        // subscript result.
        let floor = self.floor();
        if self.ops.len() > floor && self.ops.last() == Some(&Op::Member) {
            self.ops.pop();
            self.out.push(Token::Operator(Op::Member));
        }
        let indexer = self.callable_position();
        self.advance();
        if indexer {
            self.frames.push(Frame::Subscript {
                commas: 0,
                ops_floor: self.ops.len(),
            });
        } else {
            self.frames.push(Frame::Array {
                commas: 0,
                ops_floor: self.ops.len(),
            });
        }
        self.prev = Some('[');
        self.prev_gap = false;
    }

    fn read_close_bracket(&mut self) -> Result<(), TokenizeError> {
        let empty = self.prev == Some('[');
        self.advance();
        match self.frames.last() {
            Some(Frame::Subscript { .. } | Frame::Array { .. }) => {}
            Some(Frame::Ternary { .. }) => {
                return Err(self.fail(ErrorKind::MalformedTernary, "'?' without a matching ':'"));
            }
            _ => return Err(self.fail(ErrorKind::BracketMismatch, "unmatched ']'")),
        }
        self.drain_to(self.floor());
        match self.frames.pop() {
            Some(Frame::Subscript { commas, .. }) => {
                if empty {
                    self.out.push(Token::ArrayLiteral { len: 0 });
                } else {
                    self.out.push(Token::Subscript { args: commas + 1 });
                }
            }
            Some(Frame::Array { commas, .. }) => {
                let len = if empty { 0 } else { commas + 1 };
                self.out.push(Token::ArrayLiteral { len });
            }
            _ => {}
        }
        self.prev = Some(']');
        self.prev_gap = false;
        Ok(())
    }

    fn read_open_paren(&mut self) {
        let call = self.callable_position();
        self.advance();
        if call {
            // An identifier or string-literal callee lifts off the queue and
            // comes back as the call token once its arguments are collected,
            // so `('f')(x)` calls `f` by name. Computed callees stay in place
            // and the call site closes as an invoke.
            let name = match self.out.pop() {
                Some(Token::Identifier(name) | Token::Str(name)) => Some(name),
                Some(other) => {
                    self.out.push(other);
                    None
                }
                None => None,
            };
            self.frames.push(Frame::Call {
                name,
                commas: 0,
                ops_floor: self.ops.len(),
            });
        } else {
            self.frames.push(Frame::Group {
                ops_floor: self.ops.len(),
            });
        }
        self.prev = Some('(');
        self.prev_gap = false;
    }

    fn read_close_paren(&mut self) -> Result<(), TokenizeError> {
        let empty = self.prev == Some('(');
        self.advance();
        match self.frames.last() {
            Some(Frame::Group { .. } | Frame::Call { .. }) => {}
            Some(Frame::Ternary { .. }) => {
                return Err(self.fail(ErrorKind::MalformedTernary, "'?' without a matching ':'"));
            }
            _ => return Err(self.fail(ErrorKind::BracketMismatch, "unmatched ')'")),
        }
        self.drain_to(self.floor());
        if let Some(Frame::Call { name, commas, .. }) = self.frames.pop() {
            let args = if empty { 0 } else { commas + 1 };
            self.out.push(match name {
                Some(name) => Token::Call { name, args },
                None => Token::Invoke { args },
            });
        }
        self.prev = Some(')');
        self.prev_gap = false;
        Ok(())
    }

    fn read_comma(&mut self) -> Result<(), TokenizeError> {
        self.advance();
        self.prev = Some(',');
        self.prev_gap = false;
        match self.frames.last() {
            Some(Frame::Call { .. } | Frame::Subscript { .. } | Frame::Array { .. }) => {}
            Some(Frame::Object { .. }) => {}
            Some(Frame::Ternary { .. }) => {
                return Err(self.fail(
                    ErrorKind::MalformedTernary,
                    "',' before the ternary's ':'",
                ));
            }
            Some(Frame::Group { .. }) | None => {
                return Err(self.fail(
                    ErrorKind::UnexpectedToken,
                    "',' outside any argument or element list",
                ));
            }
        }
        self.drain_to(self.floor());
        if let Some(
            Frame::Call { commas, .. }
            | Frame::Subscript { commas, .. }
            | Frame::Array { commas, .. },
        ) = self.frames.last_mut()
        {
            *commas += 1;
        }
        Ok(())
    }

    // ========================================
    // Operators
    // ========================================

    fn read_operator(&mut self, ch: char) -> Result<(), TokenizeError> {
        if ch == '?' {
            self.advance();
            self.prev = Some('?');
            self.prev_gap = false;
            self.push_operator(Op::TernaryIf);
            self.frames.push(Frame::Ternary {
                ops_floor: self.ops.len(),
            });
            return Ok(());
        }
        if ch == ':' {
            return self.read_colon();
        }

        // Longest match against the operator table.
        let mut candidate = String::from(ch);
        if let Some(c) = self.peek_char(1) {
            if is_operator_char(c) {
                candidate.push(c);
                if let Some(c2) = self.peek_char(2) {
                    if is_operator_char(c2) {
                        candidate.push(c2);
                    }
                }
            }
        }
        let mut matched = None;
        for len in (1..=candidate.len()).rev() {
            if let Some(op) = Op::from_symbol(&candidate[..len]) {
                matched = Some((op, len));
                break;
            }
        }
        let Some((op, len)) = matched else {
            return Err(self.fail(
                ErrorKind::UnexpectedToken,
                format!("unrecognized operator '{}'", ch),
            ));
        };
        let op = match op {
            Op::Add if !self.binary_position() => Op::Pos,
            Op::Sub if !self.binary_position() => Op::Neg,
            other => other,
        };
        self.prev = candidate[..len].chars().last();
        self.prev_gap = false;
        for _ in 0..len {
            self.advance();
        }
        self.push_operator(op);
        Ok(())
    }

    /// `:` closes the nearest `?` or separates an object property.
    fn read_colon(&mut self) -> Result<(), TokenizeError> {
        self.advance();
        self.prev = Some(':');
        self.prev_gap = false;
        match self.frames.last() {
            Some(Frame::Ternary { ops_floor }) => {
                let floor = *ops_floor;
                self.drain_to(floor);
                match self.ops.pop() {
                    Some(Op::TernaryIf) => self.out.push(Token::Operator(Op::TernaryIf)),
                    _ => {
                        return Err(
                            self.fail(ErrorKind::MalformedTernary, "':' without a matching '?'")
                        );
                    }
                }
                self.frames.pop();
                self.push_operator(Op::TernaryElse);
                Ok(())
            }
            Some(Frame::Object { .. }) => {
                if self.ops.len() > self.floor() {
                    return Err(self.fail(
                        ErrorKind::UnexpectedToken,
                        "property keys must be a single name or literal",
                    ));
                }
                let key = match self.out.last() {
                    Some(
                        Token::Identifier(_)
                        | Token::Str(_)
                        | Token::Number(_)
                        | Token::Keyword(_),
                    ) => self.out.pop().map(|t| t.value()),
                    _ => None,
                };
                let Some(key) = key else {
                    return Err(self.fail(
                        ErrorKind::UnexpectedToken,
                        "expected a property name before ':'",
                    ));
                };
                self.out.push(Token::PropertyKey(key));
                if let Some(Frame::Object { props, .. }) = self.frames.last_mut() {
                    *props += 1;
                }
                Ok(())
            }
            _ => Err(self.fail(
                ErrorKind::UnexpectedToken,
                "':' outside an object literal or ternary",
            )),
        }
    }
}

#[test]
fn test_postfix_order() {
    let tokens = tokenize("1+2*3").unwrap();
    let dump: Vec<String> = tokens.iter().map(|t| t.value()).collect();
    assert_eq!(dump, vec!["1", "2", "3", "*", "+"]);
}

#[test]
fn test_empty_input_yields_empty_stream() {
    assert_eq!(tokenize("").unwrap(), vec![]);
    assert_eq!(tokenize("   \t  ").unwrap(), vec![]);
}

#[test]
fn test_unclosed_group() {
    let err = tokenize("(1+2").unwrap_err();
    assert_eq!(err.kind, ErrorKind::BracketMismatch);
    assert!(err.to_string().contains("(1+2"));
}
