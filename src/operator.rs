/// Operator associativity for the precedence engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
}

/// Expression operators.
///
/// Each operator knows its symbol, operand count, precedence, and
/// associativity; the table is fixed and shared by every scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    // Arithmetic
    /// Addition or string concatenation (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Modulo (`%`)
    Mod,

    // Comparison
    /// Loose equality (`==`)
    Eq,
    /// Loose inequality (`!=`)
    Ne,
    /// Strict equality (`===`)
    StrictEq,
    /// Strict inequality (`!==`)
    StrictNe,
    /// Less than (`<`)
    Lt,
    /// Less than or equal (`<=`)
    Le,
    /// Greater than (`>`)
    Gt,
    /// Greater than or equal (`>=`)
    Ge,

    // Logical
    /// Logical AND (`&&`)
    And,
    /// Logical OR (`||`)
    Or,
    /// Logical NOT (`!`), always unary
    Not,

    // Unary sign, synthesized during disambiguation
    /// Unary plus (`u+`)
    Pos,
    /// Unary minus (`u-`)
    Neg,

    // Structure
    /// Member access (`.`)
    Member,
    /// Ternary condition (`?`)
    TernaryIf,
    /// Ternary branch select (`:`)
    TernaryElse,
}

impl Op {
    /// Symbol as it appears in token dumps. Unary sign carries the `u`
    /// prefix so it cannot be confused with its binary form.
    pub fn symbol(&self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
            Op::Mod => "%",
            Op::Eq => "==",
            Op::Ne => "!=",
            Op::StrictEq => "===",
            Op::StrictNe => "!==",
            Op::Lt => "<",
            Op::Le => "<=",
            Op::Gt => ">",
            Op::Ge => ">=",
            Op::And => "&&",
            Op::Or => "||",
            Op::Not => "!",
            Op::Pos => "u+",
            Op::Neg => "u-",
            Op::Member => ".",
            Op::TernaryIf => "?",
            Op::TernaryElse => ":",
        }
    }

    /// Number of operands the operator consumes during replay.
    pub fn operands(&self) -> usize {
        match self {
            Op::Not | Op::Pos | Op::Neg => 1,
            _ => 2,
        }
    }

    pub fn precedence(&self) -> u8 {
        match self {
            Op::Member => 17,
            Op::Not | Op::Pos | Op::Neg => 15,
            Op::Mul | Op::Div | Op::Mod => 14,
            Op::Add | Op::Sub => 13,
            Op::Lt | Op::Le | Op::Gt | Op::Ge => 12,
            Op::Eq | Op::Ne | Op::StrictEq | Op::StrictNe => 11,
            Op::And => 7,
            Op::Or => 6,
            Op::TernaryIf | Op::TernaryElse => 4,
        }
    }

    pub fn assoc(&self) -> Assoc {
        match self {
            Op::Not | Op::Pos | Op::Neg | Op::TernaryIf | Op::TernaryElse => Assoc::Right,
            _ => Assoc::Left,
        }
    }

    /// Look up a complete operator symbol. Returns `None` for sequences with
    /// no descriptor (a lone `=`, `&`, or `|`); the scanner treats that as a
    /// fatal condition.
    pub fn from_symbol(sym: &str) -> Option<Op> {
        match sym {
            "+" => Some(Op::Add),
            "-" => Some(Op::Sub),
            "*" => Some(Op::Mul),
            "/" => Some(Op::Div),
            "%" => Some(Op::Mod),
            "==" => Some(Op::Eq),
            "!=" => Some(Op::Ne),
            "===" => Some(Op::StrictEq),
            "!==" => Some(Op::StrictNe),
            "<" => Some(Op::Lt),
            "<=" => Some(Op::Le),
            ">" => Some(Op::Gt),
            ">=" => Some(Op::Ge),
            "&&" => Some(Op::And),
            "||" => Some(Op::Or),
            "!" => Some(Op::Not),
            "u+" => Some(Op::Pos),
            "u-" => Some(Op::Neg),
            "." => Some(Op::Member),
            "?" => Some(Op::TernaryIf),
            ":" => Some(Op::TernaryElse),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_round_trip() {
        let ops = [
            Op::Add,
            Op::Sub,
            Op::Mul,
            Op::Div,
            Op::Mod,
            Op::Eq,
            Op::Ne,
            Op::StrictEq,
            Op::StrictNe,
            Op::Lt,
            Op::Le,
            Op::Gt,
            Op::Ge,
            Op::And,
            Op::Or,
            Op::Not,
            Op::Pos,
            Op::Neg,
            Op::Member,
            Op::TernaryIf,
            Op::TernaryElse,
        ];
        for op in ops {
            assert_eq!(Op::from_symbol(op.symbol()), Some(op));
        }
    }

    #[test]
    fn test_precedence_ordering() {
        assert!(Op::Member.precedence() > Op::Neg.precedence());
        assert!(Op::Neg.precedence() > Op::Mul.precedence());
        assert!(Op::Mul.precedence() > Op::Add.precedence());
        assert!(Op::Add.precedence() > Op::Lt.precedence());
        assert!(Op::Lt.precedence() > Op::Eq.precedence());
        assert!(Op::Eq.precedence() > Op::And.precedence());
        assert!(Op::And.precedence() > Op::Or.precedence());
        assert!(Op::Or.precedence() > Op::TernaryIf.precedence());
    }

    #[test]
    fn test_unresolved_symbols() {
        assert_eq!(Op::from_symbol("="), None);
        assert_eq!(Op::from_symbol("&"), None);
        assert_eq!(Op::from_symbol("|"), None);
    }
}
