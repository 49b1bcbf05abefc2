//! Rendering a variation diff back to a unified text diff

use crate::node::NodeId;
use crate::time::DiffType;
use crate::tree::VariationDiff;
use std::fmt::Write;

enum Visit {
    Enter(NodeId),
    Exit(NodeId),
}

impl VariationDiff {
    /// Line-based diff with one `+`, `-` or space prefix per line
    ///
    /// Every annotation is closed by an `#endif` line carrying the
    /// annotation's diff type. A node that moved between two parents is
    /// printed below both.
    #[must_use]
    pub fn to_text_diff(&self) -> String {
        let mut out = String::new();
        let mut stack: Vec<Visit> = self
            .node(self.root())
            .children()
            .iter()
            .rev()
            .map(|c| Visit::Enter(*c))
            .collect();

        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Enter(id) => {
                    let node = self.node(id);
                    write_lines(&mut out, node.diff_type(), node.label_lines());
                    if node.is_annotation() {
                        stack.push(Visit::Exit(id));
                    }
                    stack.extend(node.children().iter().rev().map(|c| Visit::Enter(*c)));
                }
                Visit::Exit(id) => {
                    let diff_type = self.node(id).diff_type();
                    write_lines(&mut out, diff_type, &["#endif".to_owned()]);
                }
            }
        }
        out
    }
}

fn write_lines(out: &mut String, diff_type: DiffType, lines: &[String]) {
    let symbol = diff_type.symbol();
    for line in lines {
        // writing into a String cannot fail
        let _ = writeln!(out, "{symbol}{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lines::LineNumber;
    use crate::time::Time;
    use vdiff_formula::Formula;

    #[test]
    fn renders_nested_edit() {
        let mut tree = VariationDiff::new();
        let root = tree.root();
        let a = tree.create_if(DiffType::Unchanged, Formula::var("A"));
        let e = tree.create_else(DiffType::Added);
        let x = tree.create_artifact(DiffType::Unchanged, LineNumber::INVALID, LineNumber::INVALID, ["x();"]);
        let y = tree.create_artifact(DiffType::Added, LineNumber::INVALID, LineNumber::INVALID, ["y();"]);
        tree.add_below(a, Some(root), Some(root)).unwrap();
        tree.add_below(x, Some(a), Some(a)).unwrap();
        tree.add_below(e, None, Some(a)).unwrap();
        tree.add_below(y, None, Some(e)).unwrap();

        let expected = " #if A\n x();\n+#else\n+y();\n+#endif\n #endif\n";
        assert_eq!(tree.to_text_diff(), expected);
        assert_eq!(tree.parent(y, Time::After), Some(e));
    }

    #[test]
    fn empty_diff_renders_nothing() {
        assert_eq!(VariationDiff::new().to_text_diff(), "");
    }
}
