//! Summary extraction for C++ source code

use makogen_api::{DeclarationSummary, ListerConfig, ListerError};
use std::ops::Range;
use std::path::Path;
use tracing::{debug, warn};
use tree_sitter::{Node, Parser, Tree};

use crate::preprocessor::MacroTable;
use crate::visitor::CppVisitor;

/// Extract the classes/structs of the configured namespace from C++ source code
pub fn extract(
    source: &str,
    file_path: &Path,
    config: &ListerConfig,
) -> Result<Vec<DeclarationSummary>, ListerError> {
    let mut parser = Parser::new();
    let language = tree_sitter_cpp::language();
    parser
        .set_language(&language)
        .map_err(|e| ListerError::ParseError(file_path.to_path_buf(), e.to_string()))?;

    if let Some(timeout) = config.timeout_per_file {
        parser.set_timeout_micros(u64::try_from(timeout.as_micros()).unwrap_or(u64::MAX));
    }

    let mut tree = parse(&mut parser, source, file_path)?;

    // `class PLAYPG_EXPORT Foo {...}`: the macro is blanked and the file parsed again
    let mut export_macros = Vec::new();
    export_macro_ranges(tree.root_node(), &mut export_macros);
    let patched: String;
    let source = if export_macros.is_empty() {
        source
    } else {
        let mut text = source.to_string();
        for range in export_macros {
            debug!(
                file = %file_path.display(),
                "ignoring `{}` before a class name",
                &source[range.clone()]
            );
            let blank = " ".repeat(range.len());
            text.replace_range(range, &blank);
        }
        patched = text;
        tree = parse(&mut parser, &patched, file_path)?;
        &patched
    };

    let root_node = tree.root_node();

    if root_node.has_error() {
        let (line, column, message) = first_error(root_node, source.as_bytes())
            .unwrap_or((0, 0, "Syntax error".to_string()));

        if config.strict {
            return Err(ListerError::SyntaxError(
                file_path.to_path_buf(),
                line,
                column,
                message,
            ));
        }
        warn!(
            file = %file_path.display(),
            line,
            column,
            "{message}; continuing with recovered syntax tree"
        );
    }

    let macros = MacroTable::from_compiler_args(&config.compiler_args[..]);
    let mut visitor = CppVisitor::new(source.as_bytes(), &config.namespace, macros);
    visitor.visit_translation_unit(root_node);

    debug!(
        file = %file_path.display(),
        declarations = visitor.summaries.len(),
        "extracted declarations"
    );

    Ok(visitor.summaries)
}

fn parse(parser: &mut Parser, source: &str, file_path: &Path) -> Result<Tree, ListerError> {
    parser
        .parse(source, None)
        .ok_or_else(|| ListerError::Timeout(file_path.to_path_buf()))
}

/// Byte ranges of macros written between `class`/`struct` and the class name
///
/// Without macro expansion `class API Foo {...}` reads as a function `Foo`
/// returning `class API`. A plain identifier can never declare a function
/// with a body, so that shape always means a decorated class.
fn export_macro_ranges(node: Node, ranges: &mut Vec<Range<usize>>) {
    if node.kind() == "function_definition" {
        let ty = node.child_by_field_name("type");
        let declarator = node.child_by_field_name("declarator");
        if let (Some(ty), Some(declarator)) = (ty, declarator) {
            if matches!(ty.kind(), "class_specifier" | "struct_specifier")
                && ty.child_by_field_name("body").is_none()
                && declarator.kind() == "identifier"
            {
                if let Some(name) = ty.child_by_field_name("name") {
                    ranges.push(name.byte_range());
                }
            }
        }
        return;
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        export_macro_ranges(child, ranges);
    }
}

/// 1-based position and description of the first error or missing node
fn first_error(node: Node, source: &[u8]) -> Option<(usize, usize, String)> {
    if node.is_missing() {
        let position = node.start_position();
        return Some((
            position.row + 1,
            position.column + 1,
            format!("missing `{}`", node.kind()),
        ));
    }
    if node.is_error() {
        let position = node.start_position();
        let text = node.utf8_text(source).unwrap_or("");
        let snippet: String = text.lines().next().unwrap_or("").chars().take(40).collect();
        return Some((
            position.row + 1,
            position.column + 1,
            format!("unexpected `{}`", snippet.trim()),
        ));
    }
    if !node.has_error() {
        return None;
    }

    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .find_map(|child| first_error(child, source))
}
