//! # Program Loader
//!
//! Parses the XML program document into an ordered [`Instruction`] list,
//! enforcing the structural contract of spec §4.2 over a `roxmltree` DOM.
//!
//! `roxmltree` is used the way it is used elsewhere in this codebase's
//! lineage (`examples/other_examples/..._twincat_parser.rs.rs`): as a
//! read-only tree to walk and validate by hand, rather than a
//! schema-driven deserializer — appropriate here because the validation
//! rules (arg-count-by-child-count, specific attribute presence, exact
//! exit codes per failure) are bespoke and don't map onto `serde`'s model.

use crate::error::InterpError;
use crate::operand::{parse_operand, Operand};

/// One loaded instruction: its source `order`, lowercased opcode name, and
/// parsed argument list (in `arg1..argN` order).
#[derive(Clone, Debug)]
pub struct Instruction {
    pub order: i64,
    pub opcode: String,
    pub args: Vec<Operand>,
}

/// Parse and validate an IPPcode23 XML program, returning instructions
/// sorted ascending by `order`.
pub fn load_program(xml: &str) -> Result<Vec<Instruction>, InterpError> {
    let doc = roxmltree::Document::parse(xml)
        .map_err(|e| InterpError::MalformedXml(e.to_string()))?;

    let root = doc.root_element();
    if root.tag_name().name() != "program" {
        return Err(InterpError::Syntax("root element must be <program>".to_string()));
    }
    match root.attribute("language") {
        Some(lang) if lang.eq_ignore_ascii_case("IPPcode23") => {}
        _ => {
            return Err(InterpError::Syntax(
                "root element must declare language=\"IPPcode23\"".to_string(),
            ))
        }
    }

    let mut instructions = Vec::new();
    let mut seen_orders = std::collections::HashSet::new();

    for node in root.children().filter(|n| n.is_element()) {
        if node.tag_name().name() != "instruction" {
            return Err(InterpError::Syntax(format!(
                "unexpected child element <{}> under <program>",
                node.tag_name().name()
            )));
        }

        let order_text = node
            .attribute("order")
            .ok_or_else(|| InterpError::Syntax("<instruction> missing 'order' attribute".to_string()))?;
        let order: i64 = order_text
            .parse()
            .map_err(|_| InterpError::Syntax(format!("invalid order '{}'", order_text)))?;
        if order < 1 {
            return Err(InterpError::Syntax(format!("order must be >= 1, got {}", order)));
        }
        if !seen_orders.insert(order) {
            return Err(InterpError::Syntax(format!("duplicate order {}", order)));
        }

        let opcode = node
            .attribute("opcode")
            .ok_or_else(|| InterpError::Syntax("<instruction> missing 'opcode' attribute".to_string()))?
            .to_string();

        let arg_children: Vec<_> = node.children().filter(|n| n.is_element()).collect();
        let mut args = Vec::with_capacity(arg_children.len());
        for k in 1..=arg_children.len() {
            let expected_name = format!("arg{}", k);
            let arg_node = arg_children
                .iter()
                .find(|n| n.tag_name().name() == expected_name)
                .ok_or_else(|| {
                    InterpError::Syntax(format!("missing <{}> in instruction order={}", expected_name, order))
                })?;
            let arg_type = arg_node
                .attribute("type")
                .ok_or_else(|| InterpError::Syntax(format!("<{}> missing 'type' attribute", expected_name)))?;
            let text = arg_node.text().unwrap_or("").trim();
            args.push(parse_operand(arg_type, text)?);
        }

        instructions.push(Instruction { order, opcode, args });
    }

    instructions.sort_by_key(|i| i.order);
    Ok(instructions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn loads_and_sorts_by_order() {
        let xml = r#"
            <program language="IPPcode23">
                <instruction order="2" opcode="WRITE">
                    <arg1 type="string">b</arg1>
                </instruction>
                <instruction order="1" opcode="WRITE">
                    <arg1 type="string">a</arg1>
                </instruction>
            </program>
        "#;
        let instrs = load_program(xml).unwrap();
        assert_eq!(instrs.len(), 2);
        assert_eq!(instrs[0].order, 1);
        assert_eq!(instrs[1].order, 2);
        assert_eq!(instrs[0].args[0], Operand::Literal(Value::Str("a".into())));
    }

    #[test]
    fn rejects_wrong_root_tag() {
        let xml = r#"<programme language="IPPcode23"></programme>"#;
        assert_eq!(load_program(xml).unwrap_err().exit_code(), 32);
    }

    #[test]
    fn rejects_malformed_xml() {
        let xml = "<program language=\"IPPcode23\">";
        assert_eq!(load_program(xml).unwrap_err().exit_code(), 31);
    }

    #[test]
    fn rejects_duplicate_order() {
        let xml = r#"
            <program language="IPPcode23">
                <instruction order="1" opcode="BREAK"></instruction>
                <instruction order="1" opcode="BREAK"></instruction>
            </program>
        "#;
        assert_eq!(load_program(xml).unwrap_err().exit_code(), 32);
    }

    #[test]
    fn rejects_missing_arg_element() {
        let xml = r#"
            <program language="IPPcode23">
                <instruction order="1" opcode="WRITE">
                    <arg2 type="string">oops</arg2>
                </instruction>
            </program>
        "#;
        assert_eq!(load_program(xml).unwrap_err().exit_code(), 32);
    }
}
