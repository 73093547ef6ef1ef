//! Canonical source generation
//!
//! Nodes append text to a [`SourceWriter`]. The writer only indents at line
//! starts it created itself, so multi-line literal text such as text blocks
//! passes through untouched.

use super::Node;

const INDENT: &str = "    ";

#[derive(Debug, Default)]
pub struct SourceWriter {
    output: String,
    depth: usize,
    at_line_start: bool,
}

impl SourceWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.at_line_start {
            for _ in 0..self.depth {
                self.output.push_str(INDENT);
            }
            self.at_line_start = false;
        }
        self.output.push_str(text);
    }

    pub fn newline(&mut self) {
        self.output.push('\n');
        self.at_line_start = true;
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Write `{`, then indent the following lines
    pub fn open_brace(&mut self) {
        self.write("{");
        self.depth += 1;
        self.newline();
    }

    /// Dedent and write `}`
    pub fn close_brace(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.write("}");
    }

    /// Write each node on its own line inside braces, or `{}` when empty
    pub fn braced_lines<N: Node>(&mut self, items: &[N]) {
        if items.is_empty() {
            self.write("{}");
            return;
        }
        self.open_brace();
        for item in items {
            item.write(self);
            self.newline();
        }
        self.close_brace();
    }

    /// Write nodes separated by `separator`
    pub fn join<N: Node>(&mut self, items: &[N], separator: &str) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.write(separator);
            }
            item.write(self);
        }
    }

    /// `<A, B>` when `items` is non-empty
    pub fn angle_list<N: Node>(&mut self, items: &[N]) {
        if !items.is_empty() {
            self.write("<");
            self.join(items, ", ");
            self.write(">");
        }
    }

    /// `(a, b)`
    pub fn paren_list<N: Node>(&mut self, items: &[N]) {
        self.write("(");
        self.join(items, ", ");
        self.write(")");
    }

    /// Nodes each followed by a space, as for modifier lists
    pub fn prefix_list<N: Node>(&mut self, items: &[N]) {
        for item in items {
            item.write(self);
            self.write(" ");
        }
    }

    /// `keyword A, B` with a leading space when `items` is non-empty
    pub fn clause<N: Node>(&mut self, keyword: &str, items: &[N]) {
        if !items.is_empty() {
            self.write(" ");
            self.write(keyword);
            self.write(" ");
            self.join(items, ", ");
        }
    }

    /// Trailing newline, if any, is trimmed
    pub fn finish(mut self) -> String {
        while self.output.ends_with('\n') {
            self.output.pop();
        }
        self.output
    }
}

/// `a.b.c`
pub fn dotted(names: &[String]) -> String {
    names.join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indentation_applies_at_line_starts() {
        let mut w = SourceWriter::new();
        w.write("class A ");
        w.open_brace();
        w.write("int x;");
        w.newline();
        w.write("String s = \"\"\"\nraw\n\"\"\";");
        w.newline();
        w.close_brace();
        assert_eq!(
            w.finish(),
            "class A {\n    int x;\n    String s = \"\"\"\nraw\n\"\"\";\n}"
        );
    }

    #[test]
    fn test_dotted() {
        assert_eq!(dotted(&["java".into(), "util".into(), "List".into()]), "java.util.List");
    }
}
