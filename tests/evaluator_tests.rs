// tests/evaluator_tests.rs

use cassia::{EvalError, Evaluator, ExprError, Scope, Value};
use std::collections::HashMap;

fn eval(expr: &str) -> Value {
    Evaluator::new(Scope::new()).eval_str(expr).unwrap()
}

fn eval_with(expr: &str, vars: Vec<(&str, Value)>) -> Value {
    let mut scope = Scope::new();
    for (name, value) in vars {
        scope.set(name, value);
    }
    Evaluator::new(scope).eval_str(expr).unwrap()
}

fn object(pairs: Vec<(&str, Value)>) -> Value {
    let mut map = HashMap::new();
    for (k, v) in pairs {
        map.insert(k.to_string(), v);
    }
    Value::Object(map)
}

fn array(values: Vec<Value>) -> Value {
    Value::Array(values)
}

fn num(n: f64) -> Value {
    Value::Number(n)
}

fn text(s: &str) -> Value {
    Value::Str(s.to_string())
}

// ============================================================================
// Arithmetic
// ============================================================================

#[test]
fn test_arithmetic() {
    let test_cases = vec![
        ("1 + 2 * 3", 7.0),
        ("(1 + 2) * 3", 9.0),
        ("10 / 4", 2.5),
        ("7 % 4", 3.0),
        ("2 - 5", -3.0),
        ("8 - 4 - 2", 2.0),
        ("3.5 + .5", 4.0),
    ];

    for (input, expected) in test_cases {
        assert_eq!(eval(input), num(expected), "Failed for input: {}", input);
    }
}

#[test]
fn test_unary_operators() {
    assert_eq!(eval_with("-price", vec![("price", num(4.0))]), num(-4.0));
    assert_eq!(eval("-(2 + 3)"), num(-5.0));
    assert_eq!(eval("1 - - 2"), num(3.0));
    assert_eq!(eval("!true"), Value::Bool(false));
    assert_eq!(eval("!0"), Value::Bool(true));
    assert_eq!(eval("!''"), Value::Bool(true));
    assert_eq!(eval("+'5'"), num(5.0));
}

#[test]
fn test_numeric_string_coercion() {
    assert_eq!(eval("'10' * 2"), num(20.0));
    assert_eq!(eval("'4' - '1'"), num(3.0));
    assert_eq!(eval("'3' * ' 4 '"), num(12.0));
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn test_string_concatenation() {
    assert_eq!(eval("'a' + 'b'"), text("ab"));
    assert_eq!(eval("'total: ' + 5"), text("total: 5"));
    assert_eq!(eval("1 + '2'"), text("12"));
    assert_eq!(
        eval_with(
            "first + ' ' + last",
            vec![("first", text("Ada")), ("last", text("Lovelace"))]
        ),
        text("Ada Lovelace")
    );
}

#[test]
fn test_string_methods() {
    assert_eq!(eval("'  pad  '.trim()"), text("pad"));
    assert_eq!(eval("'abc'.toUpperCase()"), text("ABC"));
    assert_eq!(eval("'ABC'.toLowerCase()"), text("abc"));
    assert_eq!(eval("'hello'.includes('ell')"), Value::Bool(true));
    assert_eq!(eval("'hello'.includes('xyz')"), Value::Bool(false));
    assert_eq!(eval("' x '.trim().toUpperCase()"), text("X"));
}

#[test]
fn test_regex_matching() {
    assert_eq!(
        eval_with("name.matches('^A')", vec![("name", text("Ada"))]),
        Value::Bool(true)
    );
    assert_eq!(
        eval_with("name.matches('z$')", vec![("name", text("Ada"))]),
        Value::Bool(false)
    );
    assert_eq!(eval("'user@host'.matches('@')"), Value::Bool(true));
}

// ============================================================================
// Comparisons and Logic
// ============================================================================

#[test]
fn test_comparisons() {
    let test_cases = vec![
        ("2 < 3", true),
        ("3 <= 3", true),
        ("5 > 7", false),
        ("5 >= 5", true),
        ("'b' > 'a'", true),
        ("'10' < 9", false),
    ];

    for (input, expected) in test_cases {
        assert_eq!(
            eval(input),
            Value::Bool(expected),
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_loose_and_strict_equality() {
    let test_cases = vec![
        ("'5' == 5", true),
        ("'5' === 5", false),
        ("5 === 5", true),
        ("true == 1", true),
        ("null == 0", false),
        ("null == undefined", true),
        ("2 != '2'", false),
        ("2 !== '2'", true),
        ("'a' == 'a'", true),
    ];

    for (input, expected) in test_cases {
        assert_eq!(
            eval(input),
            Value::Bool(expected),
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_logical_operators_yield_operands() {
    assert_eq!(eval("0 || 'fallback'"), text("fallback"));
    assert_eq!(eval("1 || 2"), num(1.0));
    assert_eq!(eval("'first' && 'second'"), text("second"));
    assert_eq!(eval("null && 'unreached'"), Value::Null);
}

#[test]
fn test_truthiness() {
    let test_cases = vec![
        ("'' ? 1 : 2", 2.0),
        ("0 ? 1 : 2", 2.0),
        ("null ? 1 : 2", 2.0),
        ("'0' ? 1 : 2", 1.0),
        ("[] ? 1 : 2", 1.0),
        ("{} ? 1 : 2", 1.0),
        ("42 ? 1 : 2", 1.0),
    ];

    for (input, expected) in test_cases {
        assert_eq!(eval(input), num(expected), "Failed for input: {}", input);
    }
}

// ============================================================================
// Ternaries
// ============================================================================

#[test]
fn test_ternary_selection() {
    assert_eq!(
        eval_with(
            "age >= 18 ? 'adult' : 'minor'",
            vec![("age", num(21.0))]
        ),
        text("adult")
    );
    assert_eq!(
        eval_with(
            "age >= 18 ? 'adult' : 'minor'",
            vec![("age", num(12.0))]
        ),
        text("minor")
    );
}

#[test]
fn test_chained_ternary() {
    let grade = |score: f64| {
        eval_with(
            "score >= 90 ? 'A' : score >= 80 ? 'B' : 'C'",
            vec![("score", num(score))],
        )
    };
    assert_eq!(grade(95.0), text("A"));
    assert_eq!(grade(85.0), text("B"));
    assert_eq!(grade(40.0), text("C"));
}

// ============================================================================
// Scope Resolution
// ============================================================================

#[test]
fn test_variable_resolution() {
    assert_eq!(
        eval_with(
            "price * quantity",
            vec![("price", num(3.0)), ("quantity", num(4.0))]
        ),
        num(12.0)
    );
}

#[test]
fn test_missing_variables_resolve_to_null() {
    assert_eq!(eval("missing"), Value::Null);
    assert_eq!(eval("missing + 1"), num(1.0));
    assert_eq!(eval("missing == null"), Value::Bool(true));
}

#[test]
fn test_empty_expression_is_null() {
    assert_eq!(eval(""), Value::Null);
    assert_eq!(eval("   "), Value::Null);
}

#[test]
fn test_scope_from_value_binds_fields_and_this() {
    let root = object(vec![("name", text("Ada")), ("age", num(36.0))]);
    let evaluator = Evaluator::new(Scope::from_value(root));

    assert_eq!(evaluator.eval_str("name").unwrap(), text("Ada"));
    assert_eq!(evaluator.eval_str("this.age").unwrap(), num(36.0));
}

// ============================================================================
// Member Access and Indexing
// ============================================================================

#[test]
fn test_member_access() {
    let user = object(vec![
        ("name", text("Ada")),
        (
            "address",
            object(vec![("city", text("London"))]),
        ),
    ]);

    assert_eq!(
        eval_with("user.name", vec![("user", user.clone())]),
        text("Ada")
    );
    assert_eq!(
        eval_with("user.address.city", vec![("user", user.clone())]),
        text("London")
    );
    assert_eq!(eval_with("user.missing", vec![("user", user)]), Value::Null);
}

#[test]
fn test_member_access_is_null_safe() {
    assert_eq!(eval("ghost.name"), Value::Null);
    assert_eq!(eval("ghost.a.b.c"), Value::Null);
}

#[test]
fn test_length_property() {
    let items = array(vec![num(1.0), num(2.0), num(3.0)]);
    assert_eq!(
        eval_with("items.length", vec![("items", items.clone())]),
        num(3.0)
    );
    assert_eq!(
        eval_with("word.length", vec![("word", text("abc"))]),
        num(3.0)
    );
    // the call form goes through the method table
    assert_eq!(
        eval_with("items.length()", vec![("items", items)]),
        num(3.0)
    );
}

#[test]
fn test_indexing() {
    let items = array(vec![text("first"), text("second"), text("third")]);

    assert_eq!(
        eval_with("items[0]", vec![("items", items.clone())]),
        text("first")
    );
    assert_eq!(
        eval_with("items[1 + 1]", vec![("items", items.clone())]),
        text("third")
    );
    assert_eq!(
        eval_with("items[9]", vec![("items", items.clone())]),
        Value::Null
    );
    assert_eq!(
        eval_with("items[-1]", vec![("items", items.clone())]),
        Value::Null
    );
    assert_eq!(
        eval_with("items[0.5]", vec![("items", items)]),
        Value::Null
    );
}

#[test]
fn test_indexing_objects_and_strings() {
    let user = object(vec![("name", text("Ada"))]);
    assert_eq!(
        eval_with("user['name']", vec![("user", user)]),
        text("Ada")
    );
    assert_eq!(
        eval_with("word[1]", vec![("word", text("abc"))]),
        text("b")
    );
}

// ============================================================================
// Literal Builders
// ============================================================================

#[test]
fn test_array_literals() {
    assert_eq!(eval("[]"), array(vec![]));
    assert_eq!(
        eval("[1, 2, 3]"),
        array(vec![num(1.0), num(2.0), num(3.0)])
    );
    assert_eq!(
        eval_with("[x, x * 2]", vec![("x", num(5.0))]),
        array(vec![num(5.0), num(10.0)])
    );
}

#[test]
fn test_object_literals() {
    assert_eq!(eval("{}"), object(vec![]));
    assert_eq!(
        eval("{a: 1, b: 'two'}"),
        object(vec![("a", num(1.0)), ("b", text("two"))])
    );
    assert_eq!(
        eval_with("{total: p * q}", vec![("p", num(2.0)), ("q", num(3.0))]),
        object(vec![("total", num(6.0))])
    );
    assert_eq!(
        eval("{outer: {inner: 1}}"),
        object(vec![("outer", object(vec![("inner", num(1.0))]))])
    );
}

#[test]
fn test_duplicate_object_keys_keep_the_last_value() {
    assert_eq!(eval("{a: 1, a: 2}"), object(vec![("a", num(2.0))]));
    assert_eq!(
        eval("{a: 1, b: 2, a: 3}"),
        object(vec![("a", num(3.0)), ("b", num(2.0))])
    );
}

#[test]
fn test_array_methods() {
    assert_eq!(eval("[1, 2].includes(2)"), Value::Bool(true));
    assert_eq!(eval("[1, 2].includes(3)"), Value::Bool(false));
    assert_eq!(eval("['a', 'b'].join('-')"), text("a-b"));
    assert_eq!(eval("[1, 2, 3].join()"), text("1,2,3"));
}

// ============================================================================
// Functions
// ============================================================================

#[test]
fn test_builtin_functions() {
    let test_cases = vec![
        ("abs(-5)", 5.0),
        ("floor(3.9)", 3.0),
        ("ceil(3.1)", 4.0),
        ("round(2.5)", 3.0),
        ("sqrt(16)", 4.0),
        ("min(3, 1, 2)", 1.0),
        ("max(3, 1, 2)", 3.0),
    ];

    for (input, expected) in test_cases {
        assert_eq!(eval(input), num(expected), "Failed for input: {}", input);
    }
}

#[test]
fn test_registered_functions() {
    fn double(args: &[Value]) -> Result<Value, EvalError> {
        let n = args.first().map(Value::as_number).unwrap_or(f64::NAN);
        Ok(Value::Number(n * 2.0))
    }

    let mut scope = Scope::new();
    scope.register("double", double);
    let evaluator = Evaluator::new(scope);

    assert_eq!(evaluator.eval_str("double(21)").unwrap(), num(42.0));
    assert_eq!(evaluator.eval_str("double(double(1))").unwrap(), num(4.0));
    // A quoted callee is a call by name, same as a grouped identifier.
    assert_eq!(evaluator.eval_str("('double')(21)").unwrap(), num(42.0));
    assert_eq!(evaluator.eval_str("(double)(21)").unwrap(), num(42.0));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unknown_function() {
    let err = Evaluator::new(Scope::new()).eval_str("nope(1)").unwrap_err();
    assert!(matches!(
        err,
        ExprError::Eval(EvalError::UnknownFunction(_))
    ));
    assert!(err.to_string().contains("Unknown function: nope()"));
}

#[test]
fn test_unknown_method() {
    let err = Evaluator::new(Scope::new())
        .eval_str("'a'.nope()")
        .unwrap_err();
    assert!(matches!(err, ExprError::Eval(EvalError::UnknownMethod(_))));
    assert!(err.to_string().contains(".nope()"));
}

#[test]
fn test_method_receiver_type_errors() {
    let err = Evaluator::new(Scope::new())
        .eval_str("(5).trim()")
        .unwrap_err();
    assert!(matches!(err, ExprError::Eval(EvalError::TypeError(_))));
    assert!(err.to_string().contains("requires string"));
}

#[test]
fn test_computed_callee_is_not_callable() {
    let err = Evaluator::new(Scope::new())
        .eval_str("(5)(1)")
        .unwrap_err();
    assert!(matches!(err, ExprError::Eval(EvalError::TypeError(_))));
    assert!(err.to_string().contains("not callable"));
}

#[test]
fn test_eval_str_surfaces_scan_errors() {
    let err = Evaluator::new(Scope::new()).eval_str("(1 + 2").unwrap_err();
    assert!(matches!(err, ExprError::Tokenize(_)));
    assert!(err.to_string().contains("(1 + 2"));
}

// ============================================================================
// Binding Expressions End to End
// ============================================================================

#[test]
fn test_realistic_binding_expressions() {
    let user = object(vec![
        ("name", text("Ada")),
        ("age", num(36.0)),
        ("active", Value::Bool(true)),
    ]);
    let items = array(vec![
        object(vec![("price", num(10.0)), ("qty", num(2.0))]),
        object(vec![("price", num(5.0)), ("qty", num(4.0))]),
    ]);

    assert_eq!(
        eval_with(
            "user.age >= 18 ? user.name + ' (adult)' : 'minor'",
            vec![("user", user.clone())]
        ),
        text("Ada (adult)")
    );
    assert_eq!(
        eval_with(
            "items[0].price * items[0].qty + items[1].price * items[1].qty",
            vec![("items", items)]
        ),
        num(40.0)
    );
    assert_eq!(
        eval_with(
            "user.active && user.name.toUpperCase()",
            vec![("user", user)]
        ),
        text("ADA")
    );
}
