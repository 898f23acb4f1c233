//! The built-in registry.
//!
//! A fixed name-to-primitive table consulted before scope lookup when a call
//! is resolved, so scripts cannot shadow these names for calls. The names are
//! not bound in any scope, so they are not visible as plain identifiers.

use crate::callable::Primitive;
use crate::errors::{missing_argument, type_mismatch};
use crate::{Callable, EvalResult, Interpreter, Value};

const BUILTINS: [Primitive; 7] = [
    Primitive::new("print", builtin_print),
    Primitive::new("time", builtin_time),
    Primitive::new("input", builtin_input),
    Primitive::new("rand", builtin_rand),
    Primitive::new("setTimeout", builtin_set_timeout),
    Primitive::new("len", builtin_len),
    Primitive::new("append", builtin_append),
];

/// Resolve a built-in by name.
pub fn lookup_builtin(name: &str) -> Option<Primitive> {
    BUILTINS.iter().find(|p| p.name() == name).copied()
}

/// Names of every built-in, in registry order.
pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    BUILTINS.iter().map(Primitive::name)
}

/// `print(a, b, ...)`: writes the arguments separated by spaces, then a
/// newline.
fn builtin_print(interpreter: &mut Interpreter, args: Vec<Value>) -> EvalResult {
    let line = args
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    interpreter.print_handler().println(&line);
    Ok(Value::Null)
}

/// `time()`: current epoch milliseconds.
fn builtin_time(interpreter: &mut Interpreter, _args: Vec<Value>) -> EvalResult {
    Ok(Value::Number(interpreter.clock().now_ms()))
}

/// `input(prompt, callback)`: shows the prompt now and queues a line read.
/// The callback later receives the line, or null at end of input.
fn builtin_input(interpreter: &mut Interpreter, args: Vec<Value>) -> EvalResult {
    let mut args = args.into_iter();
    let prompt = args.next().unwrap_or_default();
    let callback = callback_arg("input", args.next())?;
    if !prompt.is_null() {
        interpreter.print_handler().print(&prompt.to_string());
    }
    interpreter.events_mut().request_line(callback);
    Ok(Value::Null)
}

/// `rand()`: uniform in `[0, 1)`.
fn builtin_rand(interpreter: &mut Interpreter, _args: Vec<Value>) -> EvalResult {
    interpreter.random_mut().next_f64().map(Value::Number)
}

/// `setTimeout(delay, callback)`: runs `callback` once `delay` milliseconds
/// have passed. Negative and NaN delays count as zero.
fn builtin_set_timeout(interpreter: &mut Interpreter, args: Vec<Value>) -> EvalResult {
    let mut args = args.into_iter();
    let delay = match args.next() {
        Some(Value::Number(ms)) => ms.max(0.0),
        other => {
            return Err(type_mismatch(format!(
                "setTimeout: delay must be a number, got {}",
                other.unwrap_or_default().type_name()
            )))
        }
    };
    let callback = callback_arg("setTimeout", args.next())?;
    let due_ms = interpreter.clock().now_ms() + delay;
    interpreter.events_mut().schedule_timer(due_ms, callback);
    Ok(Value::Null)
}

/// `len(x)`: element count of an array, entry count of a map, else 0.
fn builtin_len(_interpreter: &mut Interpreter, args: Vec<Value>) -> EvalResult {
    Ok(match args.first() {
        Some(Value::Array(items)) => Value::count(items.borrow().len()),
        Some(Value::Map(entries)) => Value::count(entries.borrow().len()),
        _ => Value::Number(0.0),
    })
}

/// `append(array, value)`: pushes in place and returns `value`.
fn builtin_append(_interpreter: &mut Interpreter, args: Vec<Value>) -> EvalResult {
    let mut args = args.into_iter();
    match args.next() {
        Some(Value::Array(items)) => {
            let value = args.next().unwrap_or_default();
            items.borrow_mut().push(value.clone());
            Ok(value)
        }
        other => Err(type_mismatch(format!(
            "append: first argument must be an array, got {}",
            other.unwrap_or_default().type_name()
        ))),
    }
}

fn callback_arg(builtin: &'static str, arg: Option<Value>) -> EvalResult<Callable> {
    match arg {
        Some(Value::Callable(callback)) => Ok(callback),
        Some(other) => Err(missing_argument(
            builtin,
            format!("callback must be a function, got {}", other.type_name()),
        )),
        None => Err(missing_argument(builtin, "a callback function is required")),
    }
}
