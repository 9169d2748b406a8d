//! Lowering of an analyzed tree into one self-contained Java compilation
//! unit: hoisted state as `private static` fields, executable code inside
//! a single `main`.

mod expr;
mod statement;

pub use expr::{predicate_form, value_form};
pub use statement::{declarations, main_code};

use crate::ast::Program;
use itertools::Itertools;

/// Name of the generated class. The execution collaborator derives the
/// `.java` file name from it.
pub const CLASS_NAME: &str = "Program";

#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    #[error("type keyword `{keyword}` does not resolve; the tree was generated without a successful analysis")]
    UnresolvedType { keyword: String },
}

/// Assembles the final text: every declaration the tree contributes, in
/// source order, then every statement's executable text inside `main`.
/// This is the only place that knows the Java wrapping syntax.
pub fn generate_program(program: &Program) -> Result<String, CodegenError> {
    let fields = program
        .0
        .iter()
        .map(|(statement, _)| statement::declarations(statement))
        .collect::<Result<String, _>>()?;
    let body = program
        .0
        .iter()
        .map(|(statement, _)| statement::main_code(statement, 2))
        .join("");
    tracing::debug!(
        target: "javagen",
        "emitting class {} ({} bytes of fields, {} bytes of body)",
        CLASS_NAME,
        fields.len(),
        body.len()
    );
    Ok(format!(
        "public class {name} {{\n{fields}\n    public static void main(String[] args) {{\n{body}    }}\n}}\n",
        name = CLASS_NAME,
        fields = fields,
        body = body,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Program;
    use crate::error::SourceMetadata;
    use crate::grammar::Parser;
    use crate::semantic::analyze_program;

    fn generate(source: &str) -> String {
        let meta = SourceMetadata::new(source);
        let program: Program = Parser::new(&meta)
            .parse()
            .expect("test source should parse");
        analyze_program(&program, &meta).expect("test source should analyze");
        generate_program(&program).expect("generation cannot fail after analysis")
    }

    #[test]
    fn counting_loop_lowers_to_a_field_and_a_do_while() {
        let java = generate("int x = 5; do { x = x - 1; } while (x > 0);");
        assert_eq!(
            java,
            "public class Program {\n\
             \x20   private static int x = 5;\n\
             \n\
             \x20   public static void main(String[] args) {\n\
             \x20       do {\n\
             \x20           x = (x - 1);\n\
             \x20       } while ((x > 0));\n\
             \x20   }\n\
             }\n"
        );
    }

    #[test]
    fn missing_initializer_falls_back_to_the_catalog_default() {
        let java = generate("int x; boolean b;");
        assert!(java.contains("private static int x = 0;"));
        assert!(java.contains("private static int b = 0;"));
    }

    #[test]
    fn initializer_text_is_the_value_form() {
        let java = generate("boolean b = true; int x = 2 + 3;");
        assert!(java.contains("private static int b = 1;"));
        assert!(java.contains("private static int x = (2 + 3);"));
    }

    #[test]
    fn generation_is_idempotent() {
        let source = "int x = 5; do { x = x - 1; } while (x > 0);";
        let meta = SourceMetadata::new(source);
        let program: Program = Parser::new(&meta).parse().unwrap();
        analyze_program(&program, &meta).unwrap();
        let first = generate_program(&program).unwrap();
        let second = generate_program(&program).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn declarations_inside_loop_bodies_hoist_to_the_top() {
        // the condition cannot mention `y` (it is checked before the body),
        // but the body's declaration still hoists
        let java = generate("do { int y; y = y + 1; } while (false);");
        let field = java.find("private static int y = 0;").expect("hoisted field");
        let main = java.find("public static void main").expect("main");
        assert!(field < main, "declaration must precede all main text");
        // the loop body keeps only the executable part
        assert!(java.contains("y = (y + 1);"));
        assert!(!java[main..].contains("private static"));
    }

    #[test]
    fn nested_blocks_flatten_in_source_order() {
        let java = generate("int a = 1; { a = 2; { a = 3; } }");
        let first = java.find("a = 2;").unwrap();
        let second = java.find("a = 3;").unwrap();
        assert!(first < second);
    }

    #[test]
    fn unresolvable_type_keyword_is_a_contract_error() {
        // parses fine, but analysis was (wrongly) skipped
        let meta = SourceMetadata::new("float f;");
        let program: Program = Parser::new(&meta).parse().unwrap();
        let err = generate_program(&program).unwrap_err();
        assert!(matches!(err, CodegenError::UnresolvedType { keyword } if keyword == "float"));
    }
}
