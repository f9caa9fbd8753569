//! Preprocessor conditional evaluation
//!
//! tree-sitter keeps `#if`/`#ifdef` blocks in the syntax tree instead of
//! expanding them. [`Preprocessor::active_items`] flattens those blocks so
//! callers only see the declarations of the branches selected by the current
//! macro table, the way a compiler invoked with the same `-D`/`-U` flags would.

use std::collections::HashMap;
use tracing::{debug, trace};
use tree_sitter::Node;

/// Nesting limit when a macro value names another macro
const MAX_EXPANSION_DEPTH: usize = 16;

/// Object-like macros known at a point of the walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacroTable {
    macros: HashMap<String, String>,
}

impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table from compiler arguments, applying `-D` and `-U` in order
    ///
    /// `-DNAME` defines `NAME` as `1`, `-DNAME=VALUE` as `VALUE`. Both flags
    /// also accept the name as the following argument (`-D NAME`).
    pub fn from_compiler_args<S: AsRef<str>>(args: &[S]) -> Self {
        let mut table = Self::new();
        let mut args = args.iter().map(|a| a.as_ref());

        while let Some(arg) = args.next() {
            let (flag, inline) = match arg.get(..2) {
                Some(flag @ ("-D" | "-U")) => (flag, &arg[2..]),
                _ => continue,
            };
            let operand = if inline.is_empty() {
                match args.next() {
                    Some(next) => next,
                    None => break,
                }
            } else {
                inline
            };

            if flag == "-D" {
                match operand.split_once('=') {
                    Some((name, value)) => table.define(name, value),
                    None => table.define(operand, "1"),
                }
            } else {
                table.undefine(operand);
            }
        }

        table
    }

    pub fn define(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.macros.insert(name.into(), value.into());
    }

    pub fn undefine(&mut self, name: &str) {
        self.macros.remove(name);
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.macros.get(name).map(String::as_str)
    }

    /// Integer value of an identifier inside an `#if` expression
    ///
    /// Undefined identifiers are 0. A macro whose value is neither a number
    /// nor the name of another macro cannot be evaluated.
    fn identifier_value(&self, name: &str, depth: usize) -> Option<i64> {
        if depth > MAX_EXPANSION_DEPTH {
            return None;
        }
        let Some(value) = self.value(name) else {
            return Some(0);
        };
        let value = value.trim();
        if let Some(number) = parse_integer(value) {
            return Some(number);
        }
        if is_identifier(value) {
            return self.identifier_value(value, depth + 1);
        }
        None
    }
}

/// Walks preprocessor-aware item lists of one source file
pub struct Preprocessor<'a> {
    source: &'a [u8],
    macros: MacroTable,
}

impl<'a> Preprocessor<'a> {
    pub fn new(source: &'a [u8], macros: MacroTable) -> Self {
        Self { source, macros }
    }

    pub fn macros(&self) -> &MacroTable {
        &self.macros
    }

    /// Named children of `node` with conditional blocks replaced by the
    /// items of their active branch
    ///
    /// `#define` and `#undef` directives met on the way update the macro
    /// table for everything that follows them.
    pub fn active_items<'t>(&mut self, node: Node<'t>) -> Vec<Node<'t>> {
        let mut items = Vec::new();
        self.collect_items(node, &[], &mut items);
        items
    }

    fn node_text(&self, node: Node) -> &'a str {
        node.utf8_text(self.source).unwrap_or("")
    }

    fn collect_items<'t>(
        &mut self,
        parent: Node<'t>,
        skip: &[usize],
        items: &mut Vec<Node<'t>>,
    ) {
        let mut cursor = parent.walk();
        let children: Vec<Node<'t>> = parent.named_children(&mut cursor).collect();

        for child in children {
            if skip.contains(&child.id()) {
                continue;
            }
            match child.kind() {
                "preproc_if" | "preproc_ifdef" => self.collect_conditional(child, items),
                "preproc_def" | "preproc_function_def" | "preproc_call" => {
                    self.apply_directive(child)
                }
                _ => items.push(child),
            }
        }
    }

    /// Follow the `alternative` chain and expand the first active branch
    fn collect_conditional<'t>(&mut self, node: Node<'t>, items: &mut Vec<Node<'t>>) {
        let mut branch = Some(node);

        while let Some(current) = branch {
            let alternative = current.child_by_field_name("alternative");

            let (active, header) = match current.kind() {
                "preproc_else" => (true, None),
                "preproc_if" | "preproc_elif" => {
                    let condition = current.child_by_field_name("condition");
                    let active = match condition.map(|c| self.evaluate(c)) {
                        Some(Some(value)) => value != 0,
                        _ => {
                            debug!(
                                condition = condition.map(|c| self.node_text(c)).unwrap_or(""),
                                line = current.start_position().row + 1,
                                "unsupported #if condition, treating branch as inactive"
                            );
                            false
                        }
                    };
                    (active, condition)
                }
                "preproc_ifdef" | "preproc_elifdef" => {
                    let name = current.child_by_field_name("name");
                    let defined = name
                        .map(|n| self.macros.is_defined(self.node_text(n)))
                        .unwrap_or(false);
                    (defined != self.is_negated(current), name)
                }
                _ => (false, None),
            };

            trace!(
                kind = current.kind(),
                line = current.start_position().row + 1,
                active,
                "conditional branch"
            );

            if active {
                let mut skip = Vec::with_capacity(2);
                skip.extend(header.map(|h| h.id()));
                skip.extend(alternative.map(|a| a.id()));
                self.collect_items(current, &skip, items);
                return;
            }

            branch = alternative;
        }
    }

    /// `#ifndef` and `#elifndef` share node kinds with their positive forms
    fn is_negated(&self, node: Node) -> bool {
        node.child(0)
            .map(|keyword| {
                let text: String = self
                    .node_text(keyword)
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect();
                text.ends_with("ndef")
            })
            .unwrap_or(false)
    }

    fn apply_directive(&mut self, node: Node) {
        match node.kind() {
            "preproc_def" | "preproc_function_def" => {
                let Some(name) = node.child_by_field_name("name") else {
                    return;
                };
                let value = node
                    .child_by_field_name("value")
                    .filter(|_| node.kind() == "preproc_def")
                    .map(|v| self.node_text(v).trim())
                    .unwrap_or("");
                let name = self.node_text(name);
                self.macros.define(name, value);
            }
            "preproc_call" => {
                let directive: String = node
                    .child_by_field_name("directive")
                    .map(|d| self.node_text(d))
                    .unwrap_or("")
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect();
                if directive == "#undef" {
                    if let Some(argument) = node.child_by_field_name("argument") {
                        let name = self.node_text(argument).trim();
                        self.macros.undefine(name);
                    }
                }
            }
            _ => {}
        }
    }

    /// Evaluate an `#if` expression; `None` when it uses unsupported constructs
    pub fn evaluate(&self, node: Node) -> Option<i64> {
        match node.kind() {
            "number_literal" => parse_integer(self.node_text(node)),
            "char_literal" => parse_char(self.node_text(node)),
            "true" => Some(1),
            "false" => Some(0),
            "identifier" => self.macros.identifier_value(self.node_text(node), 0),
            "preproc_defined" => {
                let mut cursor = node.walk();
                let name = node
                    .named_children(&mut cursor)
                    .find(|c| c.kind() == "identifier")?;
                Some(self.macros.is_defined(self.node_text(name)) as i64)
            }
            "parenthesized_expression" => self.evaluate(node.named_child(0)?),
            "unary_expression" => {
                let operand = self.evaluate(node.child_by_field_name("argument")?)?;
                match self.node_text(node.child_by_field_name("operator")?) {
                    "!" => Some((operand == 0) as i64),
                    "-" => Some(operand.wrapping_neg()),
                    "+" => Some(operand),
                    "~" => Some(!operand),
                    _ => None,
                }
            }
            "binary_expression" => {
                let operator = self.node_text(node.child_by_field_name("operator")?);
                let left = self.evaluate(node.child_by_field_name("left")?)?;

                // Short-circuit like the preprocessor: the other side may be unevaluable
                match operator {
                    "&&" if left == 0 => return Some(0),
                    "||" if left != 0 => return Some(1),
                    _ => {}
                }

                let right = self.evaluate(node.child_by_field_name("right")?)?;
                binary(operator, left, right)
            }
            "conditional_expression" => {
                let condition = self.evaluate(node.child_by_field_name("condition")?)?;
                let branch = if condition != 0 {
                    node.child_by_field_name("consequence")?
                } else {
                    node.child_by_field_name("alternative")?
                };
                self.evaluate(branch)
            }
            _ => None,
        }
    }
}

fn binary(operator: &str, left: i64, right: i64) -> Option<i64> {
    let value = match operator {
        "+" => left.wrapping_add(right),
        "-" => left.wrapping_sub(right),
        "*" => left.wrapping_mul(right),
        "/" => left.checked_div(right)?,
        "%" => left.checked_rem(right)?,
        "<<" => left.checked_shl(u32::try_from(right).ok()?)?,
        ">>" => left.checked_shr(u32::try_from(right).ok()?)?,
        "&" => left & right,
        "|" => left | right,
        "^" => left ^ right,
        "<" => (left < right) as i64,
        ">" => (left > right) as i64,
        "<=" => (left <= right) as i64,
        ">=" => (left >= right) as i64,
        "==" => (left == right) as i64,
        "!=" => (left != right) as i64,
        "&&" => (left != 0 && right != 0) as i64,
        "||" => (left != 0 || right != 0) as i64,
        _ => return None,
    };
    Some(value)
}

/// Parse a C integer literal (`42`, `0x2A`, `052`, `0b101`, `42UL`)
pub fn parse_integer(text: &str) -> Option<i64> {
    let text = text
        .trim()
        .trim_end_matches(|c: char| matches!(c, 'u' | 'U' | 'l' | 'L'))
        .replace('\'', "");

    let (digits, radix) = if let Some(hex) = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        (hex, 16)
    } else if let Some(bin) = text
        .strip_prefix("0b")
        .or_else(|| text.strip_prefix("0B"))
    {
        (bin, 2)
    } else if text.len() > 1 && text.starts_with('0') {
        (&text[1..], 8)
    } else {
        (text.as_str(), 10)
    };

    if digits.is_empty() {
        return None;
    }
    i64::from_str_radix(digits, radix).ok()
}

fn parse_char(text: &str) -> Option<i64> {
    let inner = text.strip_prefix('\'')?.strip_suffix('\'')?;
    let mut chars = inner.chars();
    let value = match (chars.next()?, chars.next()) {
        (c, None) => c as i64,
        ('\\', Some(escaped)) if chars.next().is_none() => match escaped {
            'n' => 10,
            't' => 9,
            'r' => 13,
            '0' => 0,
            '\\' => 92,
            '\'' => 39,
            _ => return None,
        },
        _ => return None,
    };
    Some(value)
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}
