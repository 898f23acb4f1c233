//! Conditionals, loops and signal propagation.

#![expect(clippy::unwrap_used, reason = "tests unwrap successful runs")]

use ember_ir::BinaryOp;
use pretty_assertions::assert_eq;

use super::{error_kind, run};
use crate::Value;

#[test]
fn while_loop_counts_to_three() {
    // let x = 1; while (x < 3) { x += 1; } return x;
    let (result, _) = run(|b| {
        let one = b.number(1.0);
        let decl = b.declare_init("x", one);
        let x = b.ident("x");
        let three = b.number(3.0);
        let cond = b.binary(BinaryOp::Lt, x, three);
        let step = b.number(1.0);
        let inc = b.compound(BinaryOp::Add, "x", step);
        let lp = b.while_loop(cond, Some(inc));
        let x = b.ident("x");
        let ret = b.ret(Some(x));
        b.block(&[decl, lp, ret])
    });
    assert_eq!(result.unwrap(), Value::Number(3.0));
}

#[test]
fn program_result_is_last_value() {
    let (result, _) = run(|b| {
        let one = b.number(1.0);
        let two = b.number(2.0);
        b.binary(BinaryOp::Add, one, two)
    });
    assert_eq!(result.unwrap(), Value::Number(3.0));
}

#[test]
fn top_level_return_skips_rest() {
    // return 5; print("no");
    let (result, output) = run(|b| {
        let five = b.number(5.0);
        let ret = b.ret(Some(five));
        let no = b.string("no");
        let print = b.call("print", &[no]);
        b.block(&[ret, print])
    });
    assert_eq!(result.unwrap(), Value::Number(5.0));
    assert_eq!(output, "");
}

#[test]
fn return_without_value_is_null() {
    let (result, _) = run(|b| {
        let ret = b.ret(None);
        let one = b.number(1.0);
        b.block(&[ret, one])
    });
    assert_eq!(result.unwrap(), Value::Null);
}

#[test]
fn if_else_picks_branch() {
    // let r = 0; if (false) { r = 1; } else { r = 2; } return r;
    let (result, _) = run(|b| {
        let zero = b.number(0.0);
        let decl = b.declare_init("r", zero);
        let cond = b.boolean(false);
        let one = b.number(1.0);
        let then_body = b.assign("r", one);
        let two = b.number(2.0);
        let else_body = b.assign("r", two);
        let branch = b.if_else(cond, Some(then_body), Some(else_body));
        let r = b.ident("r");
        let ret = b.ret(Some(r));
        b.block(&[decl, branch, ret])
    });
    assert_eq!(result.unwrap(), Value::Number(2.0));
}

#[test]
fn if_block_locals_do_not_leak() {
    // if (true) { let hidden = 1; } return hidden;
    let (result, _) = run(|b| {
        let cond = b.boolean(true);
        let one = b.number(1.0);
        let body = b.declare_init("hidden", one);
        let branch = b.if_else(cond, Some(body), None);
        let hidden = b.ident("hidden");
        let ret = b.ret(Some(hidden));
        b.block(&[branch, ret])
    });
    assert_eq!(error_kind(&result), Some("UnboundName"));
}

#[test]
fn return_escapes_nested_loop_but_not_the_call() {
    // function f() {
    //   let i = 0;
    //   while (true) { i += 1; if (i == 3) { return i; } }
    //   print("unreachable");
    // }
    // let r = f(); print("after", r);
    let (result, output) = run(|b| {
        let zero = b.number(0.0);
        let decl_i = b.declare_init("i", zero);
        let t = b.boolean(true);
        let one = b.number(1.0);
        let inc = b.compound(BinaryOp::Add, "i", one);
        let i = b.ident("i");
        let three = b.number(3.0);
        let is_three = b.binary(BinaryOp::Eq, i, three);
        let i = b.ident("i");
        let ret = b.ret(Some(i));
        let check = b.if_else(is_three, Some(ret), None);
        let body = b.block(&[inc, check]);
        let lp = b.while_loop(t, Some(body));
        let msg = b.string("unreachable");
        let unreachable = b.call("print", &[msg]);
        let f_body = b.block(&[decl_i, lp, unreachable]);
        let f = b.function("f", &[], Some(f_body));

        let call = b.call("f", &[]);
        let decl_r = b.declare_init("r", call);
        let after = b.string("after");
        let r = b.ident("r");
        let print = b.call("print", &[after, r]);
        b.block(&[f, decl_r, print])
    });
    assert_eq!(result.unwrap(), Value::Null);
    assert_eq!(output, "after 3\n");
}

#[test]
fn break_ends_only_the_nearest_loop() {
    // let outer = 0; let log = [];
    // while (outer < 2) {
    //   outer += 1; let inner = 0;
    //   while (true) { inner += 1; if (inner == 2) { break; } }
    //   append(log, inner);
    // }
    // return log;
    let (result, _) = run(|b| {
        let zero = b.number(0.0);
        let decl_outer = b.declare_init("outer", zero);
        let empty = b.array(&[]);
        let decl_log = b.declare_init("log", empty);

        let outer = b.ident("outer");
        let two = b.number(2.0);
        let outer_cond = b.binary(BinaryOp::Lt, outer, two);
        let one = b.number(1.0);
        let inc_outer = b.compound(BinaryOp::Add, "outer", one);
        let zero = b.number(0.0);
        let decl_inner = b.declare_init("inner", zero);

        let t = b.boolean(true);
        let one = b.number(1.0);
        let inc_inner = b.compound(BinaryOp::Add, "inner", one);
        let inner = b.ident("inner");
        let two = b.number(2.0);
        let is_two = b.binary(BinaryOp::Eq, inner, two);
        let brk = b.brk(None);
        let check = b.if_else(is_two, Some(brk), None);
        let inner_body = b.block(&[inc_inner, check]);
        let inner_loop = b.while_loop(t, Some(inner_body));

        let log = b.ident("log");
        let inner = b.ident("inner");
        let push = b.call("append", &[log, inner]);
        let outer_body = b.block(&[inc_outer, decl_inner, inner_loop, push]);
        let outer_loop = b.while_loop(outer_cond, Some(outer_body));

        let log = b.ident("log");
        let ret = b.ret(Some(log));
        b.block(&[decl_outer, decl_log, outer_loop, ret])
    });
    assert_eq!(
        result.unwrap(),
        Value::array(vec![Value::Number(2.0), Value::Number(2.0)])
    );
}

#[test]
fn continue_skips_rest_of_pass() {
    // let i = 0; let total = 0;
    // while (i < 5) { i += 1; if (i == 2) { continue; } total += i; }
    // return total;
    let (result, _) = run(|b| {
        let zero = b.number(0.0);
        let decl_i = b.declare_init("i", zero);
        let zero = b.number(0.0);
        let decl_total = b.declare_init("total", zero);
        let i = b.ident("i");
        let five = b.number(5.0);
        let cond = b.binary(BinaryOp::Lt, i, five);
        let one = b.number(1.0);
        let inc = b.compound(BinaryOp::Add, "i", one);
        let i = b.ident("i");
        let two = b.number(2.0);
        let is_two = b.binary(BinaryOp::Eq, i, two);
        let cont = b.cont(None);
        let skip = b.if_else(is_two, Some(cont), None);
        let i = b.ident("i");
        let add = b.compound(BinaryOp::Add, "total", i);
        let body = b.block(&[inc, skip, add]);
        let lp = b.while_loop(cond, Some(body));
        let total = b.ident("total");
        let ret = b.ret(Some(total));
        b.block(&[decl_i, decl_total, lp, ret])
    });
    assert_eq!(result.unwrap(), Value::Number(13.0));
}

#[test]
fn loop_body_bindings_carry_across_iterations() {
    // let n = 0; let seen = [];
    // while (n < 3) {
    //   n += 1;
    //   if (n > 1) { append(seen, carried); }
    //   let carried = n * 10;
    // }
    // return seen;
    let (result, _) = run(|b| {
        let zero = b.number(0.0);
        let decl_n = b.declare_init("n", zero);
        let empty = b.array(&[]);
        let decl_seen = b.declare_init("seen", empty);
        let n = b.ident("n");
        let three = b.number(3.0);
        let cond = b.binary(BinaryOp::Lt, n, three);
        let one = b.number(1.0);
        let inc = b.compound(BinaryOp::Add, "n", one);
        let n = b.ident("n");
        let one = b.number(1.0);
        let past_first = b.binary(BinaryOp::Gt, n, one);
        let seen = b.ident("seen");
        let carried = b.ident("carried");
        let push = b.call("append", &[seen, carried]);
        let maybe_push = b.if_else(past_first, Some(push), None);
        let n = b.ident("n");
        let ten = b.number(10.0);
        let times = b.binary(BinaryOp::Mul, n, ten);
        let decl_carried = b.declare_init("carried", times);
        let body = b.block(&[inc, maybe_push, decl_carried]);
        let lp = b.while_loop(cond, Some(body));
        let seen = b.ident("seen");
        let ret = b.ret(Some(seen));
        b.block(&[decl_n, decl_seen, lp, ret])
    });
    assert_eq!(
        result.unwrap(),
        Value::array(vec![Value::Number(10.0), Value::Number(20.0)])
    );
}

#[test]
fn loop_condition_ignores_body_locals() {
    // let x = 0; let passes = 0;
    // while (x < 2) { passes += 1; let x = 100; if (passes == 2) { break; } }
    // return passes;
    let (result, _) = run(|b| {
        let zero = b.number(0.0);
        let decl_x = b.declare_init("x", zero);
        let zero = b.number(0.0);
        let decl_passes = b.declare_init("passes", zero);
        let x = b.ident("x");
        let two = b.number(2.0);
        let cond = b.binary(BinaryOp::Lt, x, two);
        let one = b.number(1.0);
        let inc = b.compound(BinaryOp::Add, "passes", one);
        let hundred = b.number(100.0);
        let shadow = b.declare_init("x", hundred);
        let passes = b.ident("passes");
        let two = b.number(2.0);
        let done = b.binary(BinaryOp::Eq, passes, two);
        let brk = b.brk(None);
        let stop = b.if_else(done, Some(brk), None);
        let body = b.block(&[inc, shadow, stop]);
        let lp = b.while_loop(cond, Some(body));
        let passes = b.ident("passes");
        let ret = b.ret(Some(passes));
        b.block(&[decl_x, decl_passes, lp, ret])
    });
    assert_eq!(result.unwrap(), Value::Number(2.0));
}

#[test]
fn while_with_false_condition_never_runs() {
    let (result, output) = run(|b| {
        let f = b.boolean(false);
        let msg = b.string("body");
        let print = b.call("print", &[msg]);
        let lp = b.while_loop(f, Some(print));
        let done = b.string("done");
        b.block(&[lp, done])
    });
    assert_eq!(result.unwrap(), Value::string("done"));
    assert_eq!(output, "");
}
