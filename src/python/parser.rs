#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Tree-sitter parser wrapper for Python source code.

use std::fmt::Formatter;

use anyhow::{Context, Result, anyhow};
use tree_sitter::{Node, Tree};

/// A `from <module> import <names>` statement found in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FromImport {
    /// Dotted module name with any interior whitespace removed.
    pub module: String,
    /// Imported symbol names. Aliases are resolved to the original name.
    pub names:  Vec<String>,
}

/// A struct that wraps a tree-sitter parse tree and the source it came from.
#[derive(Clone)]
pub struct Parser {
    /// The source code being parsed.
    code: String,
    /// The parse tree. Tree-sitter always yields one, possibly with error
    /// nodes in it.
    tree: Tree,
}

/// Returns the compiled tree-sitter Python language.
fn python_language() -> tree_sitter::Language {
    tree_sitter_python::LANGUAGE.into()
}

impl std::fmt::Debug for Parser {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field("lines", &self.line_count())
            .field("has_error", &self.tree.root_node().has_error())
            .finish()
    }
}

impl Parser {
    /// Returns a new parser object.
    ///
    /// * `source_code`: the source code to be parsed
    pub fn new(source_code: String) -> Result<Self> {
        let mut parser = tree_sitter::Parser::new();
        let language = python_language();

        parser
            .set_language(&language)
            .with_context(|| "Failed to load Python grammar")?;
        let tree = parser
            .parse(source_code.as_str(), None)
            .ok_or_else(|| anyhow!("Error parsing Python code"))?;

        Ok(Self {
            code: source_code,
            tree,
        })
    }

    /// A getter for parser's source code.
    pub fn code(&self) -> &str {
        self.code.as_str()
    }

    /// Returns the parse tree's root node.
    pub fn root_node(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Returns the 1-based line of the first syntax error, if the source did
    /// not parse cleanly. Python 2 `print` and `exec` statements count as
    /// errors even though the grammar accepts them.
    pub fn first_error_line(&self) -> Option<usize> {
        let root = self.tree.root_node();
        let error = if root.has_error() {
            first_error(root)
        } else {
            None
        };

        [error, first_legacy_statement(root)]
            .into_iter()
            .flatten()
            .map(|node| node.start_position().row + 1)
            .min()
    }

    /// Collects every `from ... import ...` statement, at any nesting depth.
    pub fn from_imports(&self) -> Vec<FromImport> {
        let mut found = Vec::new();
        collect_from_imports(self.tree.root_node(), self.code.as_bytes(), &mut found);
        found
    }

    /// Returns the total number of lines in the source code.
    pub fn line_count(&self) -> usize {
        self.code.lines().count()
    }
}

/// Depth-first search for the first error or missing node.
fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }

    for i in 0..node.child_count() {
        if let Some(child) = node.child(i)
            && let Some(found) = first_error(child)
        {
            return Some(found);
        }
    }

    // `has_error` was set but no child carried the error; blame the node.
    Some(node)
}

/// Depth-first search for the first Python 2 only statement.
fn first_legacy_statement(node: Node<'_>) -> Option<Node<'_>> {
    if matches!(node.kind(), "print_statement" | "exec_statement") {
        return Some(node);
    }

    (0..node.child_count())
        .filter_map(|i| node.child(i))
        .find_map(first_legacy_statement)
}

/// Strips whitespace so `playwright . sync_api` compares equal to
/// `playwright.sync_api`.
fn node_name(node: Node<'_>, source: &[u8]) -> Option<String> {
    node.utf8_text(source)
        .ok()
        .map(|text| text.split_whitespace().collect())
}

/// Walks the tree and records every `import_from_statement`.
fn collect_from_imports(node: Node<'_>, source: &[u8], found: &mut Vec<FromImport>) {
    if node.kind() == "import_from_statement" {
        let module = node
            .child_by_field_name("module_name")
            .and_then(|m| node_name(m, source));

        if let Some(module) = module {
            let mut cursor = node.walk();
            let names = node
                .children_by_field_name("name", &mut cursor)
                .filter_map(|name| match name.kind() {
                    "aliased_import" => name
                        .child_by_field_name("name")
                        .and_then(|original| node_name(original, source)),
                    _ => node_name(name, source),
                })
                .collect();

            found.push(FromImport { module, names });
        }
    }

    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            collect_from_imports(child, source, found);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_source_has_no_error_line() {
        let parser = Parser::new("x = 1\nprint(x)\n".to_string()).expect("parse");
        assert_eq!(parser.first_error_line(), None);
    }

    #[test]
    fn reports_line_of_first_syntax_error() {
        let code = "import os\n\ndef broken(:\n    pass\n";
        let parser = Parser::new(code.to_string()).expect("parse");
        assert_eq!(parser.first_error_line(), Some(3));
    }

    #[test]
    fn resolves_aliased_and_parenthesized_imports() {
        let code = "from playwright.sync_api import (\n    expect,  # assertions\n    \
                    sync_playwright as sp,\n)\n";
        let parser = Parser::new(code.to_string()).expect("parse");
        let imports = parser.from_imports();

        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].module, "playwright.sync_api");
        assert_eq!(imports[0].names, vec!["expect", "sync_playwright"]);
    }

    #[test]
    fn finds_imports_nested_in_functions() {
        let code = "def main():\n    from playwright.sync_api import sync_playwright\n";
        let parser = Parser::new(code.to_string()).expect("parse");
        let imports = parser.from_imports();

        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].names, vec!["sync_playwright"]);
    }

    #[test]
    fn python2_statements_are_syntax_errors() {
        let code = "from playwright.sync_api import sync_playwright\nprint \"hi\"\nexec \"x=1\"\n";
        let parser = Parser::new(code.to_string()).expect("parse");
        assert_eq!(parser.first_error_line(), Some(2));

        let exec_only = Parser::new("x = 1\nexec \"x=2\"\n".to_string()).expect("parse");
        assert_eq!(exec_only.first_error_line(), Some(2));
    }

    #[test]
    fn print_call_is_not_a_legacy_statement() {
        let parser = Parser::new("print(\"hi\")\n".to_string()).expect("parse");
        assert_eq!(parser.first_error_line(), None);
    }
}
