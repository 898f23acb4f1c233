use super::*;
use pretty_assertions::assert_eq;

#[test]
fn buffer_captures_lines_and_prompts() {
    let handler = buffer_handler();
    handler.print("name? ");
    handler.println("hello");
    handler.println("");
    assert_eq!(handler.output(), "name? hello\n\n");
}

#[test]
fn take_output_drains() {
    let handler = buffer_handler();
    handler.println("one");
    assert_eq!(handler.take_output(), "one\n");
    assert_eq!(handler.output(), "");
    handler.println("two");
    assert_eq!(handler.output(), "two\n");
}

#[test]
fn silent_and_stdout_capture_nothing() {
    let silent = silent_handler();
    silent.println("ignored");
    assert_eq!(silent.output(), "");
    assert_eq!(stdout_handler().take_output(), "");
}
