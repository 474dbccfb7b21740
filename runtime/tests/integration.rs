//! End-to-end scenarios driven through the XML loader, exercising the
//! full loader → VM pipeline rather than hand-built instruction vectors.

use ippcode23_runtime::error::InterpError;
use ippcode23_runtime::io::{StringInput, StringSink};

fn run(xml: &str, input_text: &str) -> (Result<ippcode23_runtime::stats::StatsSnapshot, InterpError>, String, String) {
    let mut input = StringInput::new(input_text);
    let mut out = StringSink::default();
    let mut err = StringSink::default();
    let result = ippcode23_runtime::run(xml, &mut input, &mut out, &mut err);
    (result, out.buffer, err.buffer)
}

fn program(instructions: &str) -> String {
    format!(r#"<program language="IPPcode23">{}</program>"#, instructions)
}

fn instr(order: i64, opcode: &str, args: &str) -> String {
    format!(r#"<instruction order="{}" opcode="{}">{}</instruction>"#, order, opcode, args)
}

fn arg(n: u32, kind: &str, text: &str) -> String {
    format!(r#"<arg{} type="{}">{}</arg{}>"#, n, kind, text, n)
}

#[test]
fn s1_hello_world() {
    let xml = program(&format!(
        "{}{}{}{}{}",
        instr(1, "DEFVAR", &arg(1, "var", "GF@x")),
        instr(2, "MOVE", &format!("{}{}", arg(1, "var", "GF@x"), arg(2, "string", "Hello"))),
        instr(3, "WRITE", &arg(1, "var", "GF@x")),
        instr(4, "WRITE", &arg(1, "string", "\\032")),
        instr(5, "WRITE", &arg(1, "string", "World")),
    ));
    let (result, out, _) = run(&xml, "");
    assert!(result.is_ok(), "{:?}", result.err());
    assert_eq!(out, "Hello World");
}

#[test]
fn s2_integer_arithmetic() {
    let xml = program(&format!(
        "{}{}{}{}{}{}{}",
        instr(1, "DEFVAR", &arg(1, "var", "GF@a")),
        instr(2, "MOVE", &format!("{}{}", arg(1, "var", "GF@a"), arg(2, "int", "7"))),
        instr(3, "DEFVAR", &arg(1, "var", "GF@b")),
        instr(4, "MOVE", &format!("{}{}", arg(1, "var", "GF@b"), arg(2, "int", "3"))),
        instr(5, "DEFVAR", &arg(1, "var", "GF@q")),
        instr(
            6,
            "IDIV",
            &format!("{}{}{}", arg(1, "var", "GF@q"), arg(2, "var", "GF@a"), arg(3, "var", "GF@b"))
        ),
        instr(7, "WRITE", &arg(1, "var", "GF@q")),
    ));
    let (result, out, _) = run(&xml, "");
    assert!(result.is_ok(), "{:?}", result.err());
    assert_eq!(out, "2");
}

#[test]
fn s3_division_by_zero_exits_57() {
    let xml = program(&format!(
        "{}{}{}{}{}{}",
        instr(1, "DEFVAR", &arg(1, "var", "GF@a")),
        instr(2, "MOVE", &format!("{}{}", arg(1, "var", "GF@a"), arg(2, "int", "1"))),
        instr(3, "DEFVAR", &arg(1, "var", "GF@b")),
        instr(4, "MOVE", &format!("{}{}", arg(1, "var", "GF@b"), arg(2, "int", "0"))),
        instr(5, "DEFVAR", &arg(1, "var", "GF@q")),
        instr(
            6,
            "IDIV",
            &format!("{}{}{}", arg(1, "var", "GF@q"), arg(2, "var", "GF@a"), arg(3, "var", "GF@b"))
        ),
    ));
    let (result, out, _) = run(&xml, "");
    assert_eq!(result.unwrap_err().exit_code(), 57);
    assert_eq!(out, "");
}

#[test]
fn s4_frames_and_locals() {
    let xml = program(&format!(
        "{}{}{}{}{}{}{}",
        instr(1, "CREATEFRAME", ""),
        instr(2, "DEFVAR", &arg(1, "var", "TF@x")),
        instr(3, "MOVE", &format!("{}{}", arg(1, "var", "TF@x"), arg(2, "int", "5"))),
        instr(4, "PUSHFRAME", ""),
        instr(5, "WRITE", &arg(1, "var", "LF@x")),
        instr(6, "POPFRAME", ""),
        instr(7, "WRITE", &arg(1, "var", "TF@x")),
    ));
    let (result, out, _) = run(&xml, "");
    assert!(result.is_ok(), "{:?}", result.err());
    assert_eq!(out, "55");
}

#[test]
fn s5_labels_and_loop() {
    let xml = program(&format!(
        "{}{}{}{}{}{}{}{}{}",
        instr(1, "DEFVAR", &arg(1, "var", "GF@i")),
        instr(2, "MOVE", &format!("{}{}", arg(1, "var", "GF@i"), arg(2, "int", "1"))),
        instr(3, "LABEL", &arg(1, "label", "LOOP")),
        instr(4, "WRITE", &arg(1, "var", "GF@i")),
        instr(
            5,
            "JUMPIFEQ",
            &format!("{}{}{}", arg(1, "label", "END"), arg(2, "var", "GF@i"), arg(3, "int", "3"))
        ),
        instr(6, "WRITE", &arg(1, "string", "\\032")),
        instr(
            7,
            "ADD",
            &format!("{}{}{}", arg(1, "var", "GF@i"), arg(2, "var", "GF@i"), arg(3, "int", "1"))
        ),
        instr(8, "JUMP", &arg(1, "label", "LOOP")),
        instr(9, "LABEL", &arg(1, "label", "END")),
    ));
    let (result, out, _) = run(&xml, "");
    assert!(result.is_ok(), "{:?}", result.err());
    assert_eq!(out, "1 2 3");
}

#[test]
fn s6_type_error_exits_53() {
    let xml = program(&format!(
        "{}{}{}{}{}{}",
        instr(1, "DEFVAR", &arg(1, "var", "GF@a")),
        instr(2, "MOVE", &format!("{}{}", arg(1, "var", "GF@a"), arg(2, "int", "1"))),
        instr(3, "DEFVAR", &arg(1, "var", "GF@b")),
        instr(4, "MOVE", &format!("{}{}", arg(1, "var", "GF@b"), arg(2, "string", "x"))),
        instr(5, "DEFVAR", &arg(1, "var", "GF@c")),
        instr(
            6,
            "ADD",
            &format!("{}{}{}", arg(1, "var", "GF@c"), arg(2, "var", "GF@a"), arg(3, "var", "GF@b"))
        ),
    ));
    let (result, _, _) = run(&xml, "");
    assert_eq!(result.unwrap_err().exit_code(), 53);
}

#[test]
fn s7_malformed_root_tag_exits_32() {
    let xml = r#"<programme language="IPPcode23"></programme>"#;
    let (result, _, _) = run(xml, "");
    assert_eq!(result.unwrap_err().exit_code(), 32);
}

#[test]
fn invariant_int_read_write_round_trips_decimal_text() {
    let xml = program(&format!(
        "{}{}{}",
        instr(1, "DEFVAR", &arg(1, "var", "GF@n")),
        instr(2, "READ", &format!("{}{}", arg(1, "var", "GF@n"), arg(2, "type", "int"))),
        instr(3, "WRITE", &arg(1, "var", "GF@n")),
    ));
    let (result, out, _) = run(&xml, "-9223372036854775808\n");
    assert!(result.is_ok(), "{:?}", result.err());
    assert_eq!(out, "-9223372036854775808");
}

#[test]
fn invariant_jumpifeq_reaches_label_iff_eq_holds() {
    let xml = program(&format!(
        "{}{}{}{}{}",
        instr(
            1,
            "JUMPIFEQ",
            &format!("{}{}{}", arg(1, "label", "HIT"), arg(2, "int", "4"), arg(3, "int", "4"))
        ),
        instr(2, "WRITE", &arg(1, "string", "missed")),
        instr(3, "JUMP", &arg(1, "label", "END")),
        instr(4, "LABEL", &arg(1, "label", "HIT")),
        instr(5, "LABEL", &arg(1, "label", "END")),
    ));
    let (result, out, _) = run(&xml, "");
    assert!(result.is_ok(), "{:?}", result.err());
    assert_eq!(out, "");
}

#[test]
fn invariant_frame_depth_restored_after_matched_push_pop() {
    // A pushed outer frame stays reachable as LF across a nested, fully
    // matched CREATEFRAME/PUSHFRAME/POPFRAME cycle, proving the frame
    // stack depth returns to what it was before the nested cycle.
    let xml = program(&format!(
        "{}{}{}{}{}{}{}{}{}{}",
        instr(1, "CREATEFRAME", ""),
        instr(2, "DEFVAR", &arg(1, "var", "TF@outer")),
        instr(3, "MOVE", &format!("{}{}", arg(1, "var", "TF@outer"), arg(2, "int", "1"))),
        instr(4, "PUSHFRAME", ""),
        instr(5, "CREATEFRAME", ""),
        instr(6, "DEFVAR", &arg(1, "var", "TF@inner")),
        instr(7, "MOVE", &format!("{}{}", arg(1, "var", "TF@inner"), arg(2, "int", "2"))),
        instr(8, "PUSHFRAME", ""),
        instr(9, "POPFRAME", ""),
        instr(10, "WRITE", &arg(1, "var", "LF@outer")),
    ));
    let (result, out, _) = run(&xml, "");
    assert!(result.is_ok(), "{:?}", result.err());
    assert_eq!(out, "1");
}
