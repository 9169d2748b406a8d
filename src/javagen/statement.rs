use super::expr::{predicate_form, value_form};
use super::CodegenError;
use crate::ast::{Block, Statement};
use crate::types::DataType;

const INDENT: &str = "    ";

/// The hoisted field lines a statement contributes to the top of the class.
/// Only declarations produce any; loop bodies pass their contents through
/// because bodies do not open declaration scopes.
pub fn declarations(statement: &Statement) -> Result<String, CodegenError> {
    match statement {
        Statement::Declare {
            type_name,
            name,
            init,
        } => {
            let ty = DataType::from_keyword(type_name.source).ok_or_else(|| {
                CodegenError::UnresolvedType {
                    keyword: type_name.source.to_string(),
                }
            })?;
            let value = match init {
                Some((init, _)) => value_form(init),
                None => ty.default_literal().to_string(),
            };
            Ok(format!(
                "{}private static {} {} = {};\n",
                INDENT,
                ty.java_type(),
                name.source,
                value
            ))
        }
        Statement::Assign { .. } => Ok(String::new()),
        Statement::Block(block) => block_declarations(block),
        Statement::DoWhile { body, .. } => block_declarations(body),
    }
}

pub fn block_declarations(block: &Block) -> Result<String, CodegenError> {
    block
        .statements
        .iter()
        .map(|(statement, _)| declarations(statement))
        .collect()
}

/// The executable text a statement contributes to `main`, at the given
/// indentation depth. Declarations contribute nothing here; their
/// initialization already happened in the field initializer.
pub fn main_code(statement: &Statement, depth: usize) -> String {
    let pad = INDENT.repeat(depth);
    match statement {
        Statement::Declare { .. } => String::new(),
        Statement::Assign { target, value } => {
            format!("{}{} = {};\n", pad, target.source, value_form(&value.0))
        }
        Statement::Block(block) => block_main_code(block, depth),
        Statement::DoWhile { condition, body } => format!(
            "{pad}do {{\n{body}{pad}}} while ({condition});\n",
            pad = pad,
            body = block_main_code(body, depth + 1),
            condition = predicate_form(&condition.0),
        ),
    }
}

pub fn block_main_code(block: &Block, depth: usize) -> String {
    block
        .statements
        .iter()
        .map(|(statement, _)| main_code(statement, depth))
        .collect()
}
