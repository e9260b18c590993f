//! Printers that explain a derivative or an integral step by step, as an HTML fragment.
//!
//! The fragment is an ordered list: each step is an `<li>` holding `<p>` paragraphs, and the
//! steps of a sub-problem are nested in a collapsible `<div>`. Math is emitted as MathJax
//! `<script type="math/tex">` elements holding LaTeX.

pub mod diff;
pub mod int;

use super::{
    expr::{RelOp, SymExpr},
    print::latex,
};

pub use diff::print_html_steps as diff_steps;
pub use int::print_html_steps as int_steps;

/// The names used for the factors of a product in the product rule: `f`, `g`, `h` when there are
/// few enough, `f_0`, `f_1`, ... otherwise.
pub fn function_names(count: usize) -> Vec<String> {
    match count {
        2 => vec!["f".to_string(), "g".to_string()],
        3 => vec!["f".to_string(), "g".to_string(), "h".to_string()],
        _ => (0..count).map(|i| format!("f_{}", i)).collect(),
    }
}

/// Builds the HTML lines of a step-by-step explanation.
#[derive(Debug)]
pub struct HtmlPrinter {
    lines: Vec<String>,
    level: usize,
}

impl Default for HtmlPrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlPrinter {
    pub fn new() -> Self {
        Self {
            lines: vec![r#"<ol id="changedisplaytonone">"#.to_string()],
            level: 0,
        }
    }

    fn indent(&self, level: usize) -> String {
        " ".repeat(4 * level)
    }

    /// Formats math to be shown inline with text.
    pub fn format_math(&self, math: &SymExpr) -> String {
        format!(r#"<script type="math/tex; mode=inline">{}</script>"#, latex(math))
    }

    /// Formats math to be shown on its own line.
    pub fn format_math_display(&self, math: &SymExpr) -> String {
        self.format_latex_display(&latex(math))
    }

    /// Formats LaTeX that was built by hand to be shown on its own line.
    pub fn format_latex_display(&self, tex: &str) -> String {
        format!(r#"<script type="math/tex; mode=display">{}</script>"#, tex)
    }

    /// Formats the equation `lhs = rhs` inline, without letting the relational constructor
    /// evaluate it.
    pub fn format_equation(&self, lhs: &SymExpr, rhs: &SymExpr) -> String {
        self.format_math(&SymExpr::Relational(RelOp::Eq, Box::new(lhs.clone()), Box::new(rhs.clone())))
    }

    /// Formats the equation `lhs = rhs` on its own line.
    pub fn format_equation_display(&self, lhs: &SymExpr, rhs: &SymExpr) -> String {
        self.format_math_display(&SymExpr::Relational(RelOp::Eq, Box::new(lhs.clone()), Box::new(rhs.clone())))
    }

    /// Adds a paragraph at the current level.
    pub fn append(&mut self, text: &str) {
        let line = format!("{}<p>{}</p>", self.indent(self.level + 1), text);
        self.lines.push(line);
    }

    /// Adds a header at the current level.
    pub fn append_header(&mut self, text: &str) {
        let line = format!("{}<h2>{}</h2>", self.indent(self.level + 1), text);
        self.lines.push(line);
    }

    /// Adds a raw line without indentation or wrapping.
    pub fn push_raw(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    /// Runs `f` one level deeper, inside a collapsible list.
    pub fn new_level(&mut self, f: impl FnOnce(&mut Self)) {
        self.level += 1;
        let indent = self.indent(self.level);
        self.lines.push(format!(r#"{}<div class="collapsible"><h2>open</h2><ol class="content">"#, indent));
        f(self);
        self.lines.push(format!("{}</ol></div>", indent));
        self.level -= 1;
    }

    /// Runs `f` inside a new list item.
    pub fn new_step(&mut self, f: impl FnOnce(&mut Self)) {
        let indent = self.indent(self.level);
        self.lines.push(format!("{}<li>", indent));
        f(self);
        self.lines.push(format!("{}</li>", indent));
    }

    /// Runs `f` inside a block that starts out hidden.
    pub fn new_collapsible(&mut self, f: impl FnOnce(&mut Self)) {
        let indent = self.indent(self.level);
        self.lines.push(format!(r#"{}<div target="_blank" id="change_to_invisible">"#, indent));
        f(self);
        self.lines.push(format!("{}</div>", indent));
    }

    /// Closes the list, then shows the final answer below a rule.
    pub fn finish(mut self, answer: &SymExpr) -> String {
        self.lines.push("</ol>".to_string());
        self.lines.push("<hr/>".to_string());
        self.level = 0;
        self.append("The answer is:");
        let answer = self.format_math_display(answer);
        self.append(&answer);
        self.lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn nesting() {
        let mut printer = HtmlPrinter::new();
        printer.new_step(|printer| {
            printer.append("outer");
            printer.new_level(|printer| {
                printer.new_step(|printer| printer.append("inner"));
            });
        });
        let html = printer.finish(&SymExpr::integer(1));
        let expected = [
            r#"<ol id="changedisplaytonone">"#,
            "<li>",
            "    <p>outer</p>",
            r#"    <div class="collapsible"><h2>open</h2><ol class="content">"#,
            "    <li>",
            "        <p>inner</p>",
            "    </li>",
            "    </ol></div>",
            "</li>",
            "</ol>",
            "<hr/>",
            "    <p>The answer is:</p>",
            r#"    <p><script type="math/tex; mode=display">1</script></p>"#,
        ]
        .join("\n");
        assert_eq!(html, expected);
    }

    #[test]
    fn names() {
        assert_eq!(function_names(2), ["f", "g"]);
        assert_eq!(function_names(4), ["f_0", "f_1", "f_2", "f_3"]);
    }
}
