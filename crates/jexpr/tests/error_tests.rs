//! Error reporting tests

use jexpr::context::DEFAULT_MAX_DEPTH;
use jexpr::*;
use pretty_assertions::assert_eq;
use serde_json::json;

fn eval_err(json: serde_json::Value) -> EvalError {
    Evaluator::new()
        .evaluate(&Value::from(json))
        .expect_err("evaluation should fail")
}

// ═══════════════════════════════════════════════════════════════════════
// Not Callable
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_unbound_head() {
    assert_eq!(
        eval_err(json!(["$undefinedFn", 1])).to_string(),
        "$undefinedFn is not a function"
    );
}

#[test]
fn test_literal_heads() {
    assert_eq!(eval_err(json!([1, 2])).to_string(), "1 is not a function");
    assert_eq!(
        eval_err(json!(["plain", 2])).to_string(),
        "plain is not a function"
    );
    assert_eq!(eval_err(json!([null])).to_string(), "null is not a function");
}

#[test]
fn test_empty_form() {
    assert_eq!(eval_err(json!([])), EvalError::NotCallable { head: "[]".to_string() });
}

#[test]
fn test_escaped_head_is_not_a_symbol() {
    assert_eq!(
        eval_err(json!(["$$add", 1, 2])).to_string(),
        "$$add is not a function"
    );
}

#[test]
fn test_bound_non_callable_head() {
    let evaluator = Evaluator::new();
    evaluator.define("five", Value::Int(5));
    let err = evaluator
        .evaluate(&Value::from(json!(["$five"])))
        .unwrap_err();
    assert_eq!(err.to_string(), "$five is not a function");
}

#[test]
fn test_operands_not_evaluated_after_bad_head() {
    let evaluator = Evaluator::new();
    evaluator.define(
        "boom",
        Value::builtin("boom", 0, |_| Err(EvalError::host("should not run"))),
    );
    let err = evaluator
        .evaluate(&Value::from(json!(["$missing", ["$boom"]])))
        .unwrap_err();
    assert!(matches!(err, EvalError::NotCallable { .. }));
}

// ═══════════════════════════════════════════════════════════════════════
// Malformed Forms
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_malformed_let() {
    assert_eq!(
        eval_err(json!(["$let", 5, 1])).to_string(),
        "malformed let: bindings must be a list, got 5"
    );
    assert_eq!(
        eval_err(json!(["$let", [1, 2], 3])).to_string(),
        "malformed let: expected a symbol, got 1"
    );
}

#[test]
fn test_malformed_fn() {
    assert_eq!(
        eval_err(json!(["$fn", "$a", "$a"])).to_string(),
        "malformed fn: parameters must be a list, got $a"
    );
    assert_eq!(
        eval_err(json!(["$fn", [true], 1])).to_string(),
        "malformed fn: expected a symbol, got true"
    );
}

#[test]
fn test_malformed_def() {
    assert_eq!(
        eval_err(json!(["$def", 3, 1])).to_string(),
        "malformed def: expected a symbol, got 3"
    );
}

#[test]
fn test_malformed_cond() {
    assert_eq!(
        eval_err(json!(["$cond", 1])).to_string(),
        "malformed cond: clause must be a list, got 1"
    );
}

// ═══════════════════════════════════════════════════════════════════════
// Builtins
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_arity_mismatch() {
    assert_eq!(
        eval_err(json!(["$not"])),
        EvalError::ArityMismatch {
            name: "not".to_string(),
            expected: 1,
            got: 0,
        }
    );
    assert_eq!(
        eval_err(json!(["$add", 1, 2, 3])).to_string(),
        "add expects 2 arguments, got 3"
    );
}

#[test]
fn test_type_error() {
    assert_eq!(
        eval_err(json!(["$subtract", "$$a", 1])).to_string(),
        "Type error: expected numbers, got string and int"
    );
    assert_eq!(
        eval_err(json!(["$gt", "a", 1])).to_string(),
        "Type error: expected comparable values, got string and int"
    );
}

#[test]
fn test_host_error_propagates_unchanged() {
    let evaluator = Evaluator::new();
    evaluator.define(
        "throw",
        Value::builtin("throw", 1, |args| Err(EvalError::host(args[0].to_string()))),
    );
    let err = evaluator
        .evaluate(&Value::from(json!([
            "$let", ["$x", 1], ["$do", 1, ["$throw", "Something wrong"]]
        ])))
        .unwrap_err();
    assert_eq!(err, EvalError::host("Something wrong"));
    assert_eq!(err.to_string(), "Something wrong");
}

#[test]
fn test_error_inside_closure_propagates() {
    let err = eval_err(json!([["$fn", ["$x"], ["$add", "$x", "$$s"]], true]));
    assert!(matches!(err, EvalError::TypeError { .. }));
}

// ═══════════════════════════════════════════════════════════════════════
// Limits and Conversion
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_runaway_recursion_hits_depth_limit() {
    let evaluator = Evaluator::builder().max_depth(64).build();
    let program = Value::from(json!([
        "$do",
        ["$def", "$forever", ["$fn", [], ["$forever"]]],
        ["$forever"]
    ]));
    let err = evaluator.evaluate(&program).unwrap_err();
    assert_eq!(err, EvalError::DepthExceeded { depth: 65, max: 64 });
}

#[tokio::test]
async fn test_depth_limit_in_suspending_mode() {
    let evaluator = Evaluator::builder().max_depth(64).build();
    let program = Value::from(json!([
        "$do",
        ["$def", "$forever", ["$fn", [], ["$forever"]]],
        ["$forever"]
    ]));
    let err = evaluator.evaluate_async(&program).await.unwrap_err();
    assert!(matches!(err, EvalError::DepthExceeded { max: 64, .. }));
}

/// `[add, [add, ... [add, 0, 1] ..., 1], 1]`, `levels` deep
fn nested_add(levels: usize) -> Value {
    let mut expr = Value::Int(0);
    for _ in 0..levels {
        expr = Value::list(vec![Value::string("$add"), expr, Value::Int(1)]);
    }
    expr
}

fn countdown(n: i64) -> Value {
    Value::from(json!([
        "$do",
        ["$def", "$count", ["$fn", ["$n"],
            ["$if", ["$eq", "$n", 0], "done", ["$count", ["$subtract", "$n", 1]]]]],
        ["$count", n]
    ]))
}

#[test]
fn test_nesting_just_under_default_limit() {
    // The innermost literal sits at depth levels + 1
    let levels = DEFAULT_MAX_DEPTH - 1;
    let result = Evaluator::new().evaluate(&nested_add(levels)).unwrap();
    assert_eq!(result, Value::Int(levels as i64));
}

#[tokio::test]
async fn test_nesting_just_under_default_limit_async() {
    let levels = DEFAULT_MAX_DEPTH - 1;
    let result = Evaluator::new()
        .evaluate_async(&nested_add(levels))
        .await
        .unwrap();
    assert_eq!(result, Value::Int(levels as i64));
}

#[test]
fn test_nesting_past_default_limit_is_an_error() {
    let err = Evaluator::new()
        .evaluate(&nested_add(DEFAULT_MAX_DEPTH))
        .unwrap_err();
    assert_eq!(
        err,
        EvalError::DepthExceeded {
            depth: DEFAULT_MAX_DEPTH + 1,
            max: DEFAULT_MAX_DEPTH,
        }
    );
}

#[test]
fn test_deep_recursion_with_default_limit() {
    let evaluator = Evaluator::new();
    assert_eq!(evaluator.evaluate(&countdown(200)).unwrap(), Value::string("done"));
}

#[tokio::test]
async fn test_deep_recursion_with_default_limit_async() {
    let evaluator = Evaluator::new();
    assert_eq!(
        evaluator.evaluate_async(&countdown(200)).await.unwrap(),
        Value::string("done")
    );
}

#[test]
fn test_closure_has_no_json_form() {
    let evaluator = Evaluator::new();
    let closure = evaluator
        .evaluate(&Value::from(json!(["$fn", [], 1])))
        .unwrap();
    assert!(matches!(closure.to_json(), Err(EvalError::ValueError(_))));
}
