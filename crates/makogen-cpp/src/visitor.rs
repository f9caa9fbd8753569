//! CST visitor collecting public members of namespace classes

use makogen_api::DeclarationSummary;
use tracing::{debug, trace};
use tree_sitter::Node;

use crate::preprocessor::{MacroTable, Preprocessor};

/// Member access of a class/struct body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Protected,
    Private,
}

impl Access {
    /// Parse the text of an `access_specifier` node (`public`, `private:`...)
    pub fn from_specifier(text: &str) -> Option<Self> {
        match text.trim().trim_end_matches(':').trim() {
            "public" => Some(Access::Public),
            "protected" => Some(Access::Protected),
            "private" => Some(Access::Private),
            _ => None,
        }
    }
}

pub struct CppVisitor<'a> {
    pub source: &'a [u8],
    pub summaries: Vec<DeclarationSummary>,
    namespace: &'a str,
    preprocessor: Preprocessor<'a>,
}

impl<'a> CppVisitor<'a> {
    pub fn new(source: &'a [u8], namespace: &'a str, macros: MacroTable) -> Self {
        Self {
            source,
            summaries: Vec::new(),
            namespace,
            preprocessor: Preprocessor::new(source, macros),
        }
    }

    fn node_text(&self, node: Node) -> String {
        node.utf8_text(self.source).unwrap_or("").to_string()
    }

    /// Scan the top-level items of a translation unit
    pub fn visit_translation_unit(&mut self, root: Node) {
        for item in self.preprocessor.active_items(root) {
            if item.kind() == "namespace_definition" {
                self.visit_namespace(item);
            }
        }
    }

    fn visit_namespace(&mut self, node: Node) {
        let name = self.extract_namespace_name(node);
        if name.as_deref() != Some(self.namespace) {
            trace!(
                namespace = name.as_deref().unwrap_or("<anonymous>"),
                "skipping namespace"
            );
            return;
        }

        let Some(body) = node.child_by_field_name("body") else {
            return;
        };

        for item in self.preprocessor.active_items(body) {
            match item.kind() {
                "class_specifier" | "struct_specifier" => self.visit_class_or_struct(item),
                // `struct S {...} s;` and `typedef struct S {...} T;`
                "declaration" | "type_definition" => {
                    if let Some(ty) = item.child_by_field_name("type") {
                        if matches!(ty.kind(), "class_specifier" | "struct_specifier")
                            && ty.child_by_field_name("body").is_some()
                        {
                            self.visit_class_or_struct(ty);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn extract_namespace_name(&self, node: Node) -> Option<String> {
        if let Some(name) = node.child_by_field_name("name") {
            return Some(self.node_text(name));
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "namespace_identifier" | "identifier" | "nested_namespace_specifier" => {
                    return Some(self.node_text(child));
                }
                _ => {}
            }
        }
        None
    }

    fn visit_class_or_struct(&mut self, node: Node) {
        let Some(name) = self.extract_type_name(node) else {
            debug!(
                line = node.start_position().row + 1,
                "skipping {} without a name",
                node.kind()
            );
            return;
        };
        // Forward declarations are listed without members
        let Some(body) = node.child_by_field_name("body") else {
            debug!(name = %name, "forward declaration");
            self.summaries.push(DeclarationSummary::new(name));
            return;
        };

        let mut access = if node.kind() == "struct_specifier" {
            Access::Public
        } else {
            Access::Private
        };

        let mut summary = DeclarationSummary::new(name);
        for item in self.preprocessor.active_items(body) {
            if item.kind() == "access_specifier" {
                if let Some(next) = Access::from_specifier(&self.node_text(item)) {
                    access = next;
                }
                continue;
            }
            if access != Access::Public {
                continue;
            }
            for member in self.member_names(item) {
                summary.push_member(member);
            }
        }

        trace!(name = %summary.name, members = summary.member_count(), "collected class");
        self.summaries.push(summary);
    }

    /// Names declared by one item of a class body, in source order
    fn member_names(&self, item: Node) -> Vec<String> {
        let mut names = Vec::new();

        match item.kind() {
            "field_declaration" | "declaration" | "type_definition" => {
                if let Some(ty) = item.child_by_field_name("type") {
                    names.extend(self.nested_type_name(ty));
                }

                // `int S::*pm;` comes back as declarator `S`, an error on `:`
                // and a bit-field clause holding `*pm`
                let mut after_error = false;
                let mut cursor = item.walk();
                if cursor.goto_first_child() {
                    loop {
                        let child = cursor.node();
                        if cursor.field_name() == Some("declarator") {
                            names.extend(self.extract_declarator_name(child));
                            after_error = false;
                        } else if child.is_error() {
                            after_error = true;
                        } else if child.kind() == "bitfield_clause" && after_error {
                            if let Some(name) = self.member_pointer_name(child) {
                                names.pop();
                                names.push(name);
                            }
                            after_error = false;
                        }
                        if !cursor.goto_next_sibling() {
                            break;
                        }
                    }
                }
            }
            "function_definition" => {
                if let Some(declarator) = item.child_by_field_name("declarator") {
                    names.extend(self.extract_declarator_name(declarator));
                }
            }
            "template_declaration" => {
                let mut cursor = item.walk();
                let inner = item
                    .named_children(&mut cursor)
                    .filter(|c| c.kind() != "template_parameter_list")
                    .last();
                if let Some(inner) = inner {
                    names.extend(self.member_names(inner));
                }
            }
            "alias_declaration" => {
                if let Some(name) = item.child_by_field_name("name") {
                    names.push(self.node_text(name));
                }
            }
            "class_specifier" | "struct_specifier" | "union_specifier" | "enum_specifier" => {
                names.extend(self.nested_type_name(item));
            }
            _ => {}
        }

        names
    }

    /// Name of a nested type defined in place (with a body)
    fn nested_type_name(&self, node: Node) -> Option<String> {
        match node.kind() {
            "class_specifier" | "struct_specifier" | "union_specifier" | "enum_specifier" => {
                node.child_by_field_name("body")?;
                node.child_by_field_name("name").map(|name| self.node_text(name))
            }
            _ => None,
        }
    }

    /// Member name in the bit-field clause left by a pointer-to-member field
    fn member_pointer_name(&self, clause: Node) -> Option<String> {
        let mut cursor = clause.walk();
        let mut expr = clause.named_children(&mut cursor).next()?;
        if expr.kind() == "assignment_expression" {
            expr = expr.child_by_field_name("left")?;
        }

        match expr.kind() {
            "pointer_expression" => expr
                .child_by_field_name("argument")
                .and_then(|argument| self.extract_declarator_name(argument)),
            // `A::B::*pm` keeps the inner scope: `B::*pm`
            _ => self.extract_declarator_name(expr),
        }
    }

    // Helper methods

    fn extract_type_name(&self, node: Node) -> Option<String> {
        if let Some(name_node) = node.child_by_field_name("name") {
            return Some(self.node_text(name_node));
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "type_identifier" {
                return Some(self.node_text(child));
            }
        }
        None
    }

    fn extract_declarator_name(&self, node: Node) -> Option<String> {
        // `operator bool()` names itself by its target type
        if node.kind() == "operator_cast" {
            return node
                .child_by_field_name("type")
                .map(|ty| format!("operator {}", self.node_text(ty)));
        }

        if let Some(decl) = node.child_by_field_name("declarator") {
            return self.extract_declarator_name(decl);
        }

        match node.kind() {
            "identifier" | "field_identifier" | "type_identifier" | "destructor_name"
            | "operator_name" => Some(self.node_text(node)),
            "qualified_identifier" | "template_function" | "template_method" => node
                .child_by_field_name("name")
                .and_then(|name| self.extract_declarator_name(name)),
            "function_declarator"
            | "pointer_declarator"
            | "reference_declarator"
            | "array_declarator"
            | "parenthesized_declarator"
            | "attributed_declarator"
            | "init_declarator" => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    if let Some(name) = self.extract_declarator_name(child) {
                        return Some(name);
                    }
                }
                None
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    fn visit_with(source: &str, args: &[&str]) -> Vec<DeclarationSummary> {
        let mut parser = Parser::new();
        let language = tree_sitter_cpp::language();
        parser.set_language(&language).unwrap();
        let tree = parser.parse(source, None).unwrap();

        let macros = MacroTable::from_compiler_args(args);
        let mut visitor = CppVisitor::new(source.as_bytes(), "PlayPG", macros);
        visitor.visit_translation_unit(tree.root_node());
        visitor.summaries
    }

    fn visit(source: &str) -> Vec<DeclarationSummary> {
        visit_with(source, &[])
    }

    #[test]
    fn test_access_from_specifier() {
        assert_eq!(Access::from_specifier("public"), Some(Access::Public));
        assert_eq!(Access::from_specifier("protected:"), Some(Access::Protected));
        assert_eq!(Access::from_specifier(" private "), Some(Access::Private));
        assert_eq!(Access::from_specifier("friend"), None);
    }

    #[test]
    fn test_visitor_basics() {
        let visitor = CppVisitor::new(b"", "PlayPG", MacroTable::new());
        assert!(visitor.summaries.is_empty());
    }

    #[test]
    fn test_struct_public_fields_only() {
        let source = r#"
namespace PlayPG {
struct Location {
    int x;
    int y;
private:
    int secret;
};
}
"#;
        let summaries = visit(source);

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].to_string(), "Location: x,y");
    }

    #[test]
    fn test_class_defaults_to_private() {
        let source = r#"
namespace PlayPG {
class Race {
    int hidden;
public:
    std::string name;
protected:
    int level;
};
}
"#;
        let summaries = visit(source);

        assert_eq!(summaries[0].name, "Race");
        assert_eq!(summaries[0].public_members, vec!["name"]);
    }

    #[test]
    fn test_other_namespaces_ignored() {
        let source = r#"
struct Global { int a; };
namespace Other { struct Elsewhere { int b; }; }
namespace PlayPG {
namespace Inner { struct Deep { int c; }; }
struct Kept { int d; };
}
"#;
        let summaries = visit(source);

        assert_eq!(summaries, vec![DeclarationSummary::new("Kept").with_member("d")]);
    }

    #[test]
    fn test_reopened_namespace_keeps_order() {
        let source = r#"
namespace PlayPG { struct First {}; }
namespace PlayPG { class Second {}; }
"#;
        let names: Vec<_> = visit(source).into_iter().map(|s| s.name).collect();

        assert_eq!(names, vec!["First", "Second"]);
    }

    #[test]
    fn test_methods_and_special_members() {
        let source = r#"
namespace PlayPG {
class Player {
public:
    explicit Player(const std::string &username_) : username { username_ } {}
    ~Player();
    bool operator==(const Player &other) const;
    operator bool() const { return true; }
    const std::string &getName() const;
    static int count;
    int a, *b, c[4];
    template <typename T> T get() const;
    using Id = unsigned long;
    typedef int Score;
    enum class State { Online, Offline };
    struct Stats { int wins; } stats;
    friend class Server;
private:
    Player();
};
}
"#;
        let summaries = visit(source);

        assert_eq!(
            summaries[0].public_members,
            vec![
                "Player",
                "~Player",
                "operator==",
                "operator bool",
                "getName",
                "count",
                "a",
                "b",
                "c",
                "get",
                "Id",
                "Score",
                "State",
                "Stats",
                "stats",
            ]
        );
    }

    #[test]
    fn test_forward_declarations_listed_without_members() {
        let source = r#"
namespace PlayPG {
class Forward;
template <typename T> class Box { public: T value; };
struct Real { int v; };
struct timeval now;
}
"#;
        let summaries = visit(source);

        assert_eq!(
            summaries,
            vec![
                DeclarationSummary::new("Forward"),
                DeclarationSummary::new("Real").with_member("v"),
            ]
        );
        assert_eq!(summaries[0].to_string(), "Forward: ");
    }

    #[test]
    fn test_pointer_members() {
        let source = r#"
namespace PlayPG {
struct S {
    int (*fp)(int);
    int S::*pm;
    int S::*withDefault = nullptr;
    int (S::*pmf)(int);
    unsigned flags : 3;
    static constexpr int k = 1;
};
}
"#;
        let summaries = visit(source);

        assert_eq!(summaries[0].to_string(), "S: fp,pm,withDefault,pmf,flags,k");
    }

    #[test]
    fn test_access_label_inside_active_conditional() {
        let source = r#"
namespace PlayPG {
struct Account {
    int visible;
#ifdef HIDE_REST
private:
#endif
    int rest;
};
}
"#;
        assert_eq!(visit(source)[0].public_members, vec!["visible", "rest"]);
        assert_eq!(
            visit_with(source, &["-DHIDE_REST"])[0].public_members,
            vec!["visible"]
        );
    }

    #[test]
    fn test_struct_with_variable_declaration() {
        let source = "namespace PlayPG { struct Config { int port; } defaults; }";
        let summaries = visit(source);

        assert_eq!(summaries[0].to_string(), "Config: port");
    }

    #[test]
    fn test_conditional_members() {
        let source = r#"
namespace PlayPG {
class Player {
public:
    int id;
#ifdef PLAYPG_BUILD_SERVER
    long joinDate;
#endif
#ifdef PLAYPG_MAKO_GEN__
    int generated;
#endif
};
}
"#;
        let plain = visit(source);
        assert_eq!(plain[0].public_members, vec!["id"]);

        let server = visit_with(source, &["-DPLAYPG_BUILD_SERVER", "-DPLAYPG_MAKO_GEN__"]);
        assert_eq!(server[0].public_members, vec!["id", "joinDate", "generated"]);
    }

    #[test]
    fn test_header_guard_and_namespace_in_conditional() {
        let source = r#"
#ifndef ODB_RACE_HPP_
#define ODB_RACE_HPP_
#ifdef PLAYPG_MAKO_GEN__
namespace PlayPG {
struct Race { int id; };
}
#endif
#endif
"#;
        assert!(visit(source).is_empty());
        assert_eq!(
            visit_with(source, &["-DPLAYPG_MAKO_GEN__"])[0].to_string(),
            "Race: id"
        );
    }
}
