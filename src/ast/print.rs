use std::fmt;

use crate::{
    ast::{Block, FunctionLiteral, MacroLiteral, Node, Priority},
    interpreter::token::TokenRef,
    util::text::quote,
};

/// Layout used by [`PrintState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Everything on one line, statements separated by `;`, comments
    /// dropped.
    Compact,
    /// One statement per line, blocks indented with tabs, comments kept.
    Long,
}

/// Accumulates printed source text.
///
/// # Example
/// ```
/// use grol::{ast::print::PrintState, interpreter::parser::parse_program};
///
/// let program = parse_program("x=1+2*3;if x>3{println(x)}").unwrap();
///
/// let mut ps = PrintState::long();
/// ps.print_program(&program);
/// assert_eq!(ps.finish(), "x = 1 + 2 * 3\nif x > 3 {\n\tprintln(x)\n}\n");
/// ```
pub struct PrintState {
    out:        String,
    layout:     Layout,
    indent:     usize,
    all_parens: bool,
}

impl PrintState {
    /// Printer for single line output.
    #[must_use]
    pub const fn compact() -> Self {
        Self { out:        String::new(),
               layout:     Layout::Compact,
               indent:     0,
               all_parens: false, }
    }

    /// Printer for indented multi-line output.
    #[must_use]
    pub const fn long() -> Self {
        Self { out:        String::new(),
               layout:     Layout::Long,
               indent:     0,
               all_parens: false, }
    }

    /// Wraps every operator expression in parentheses, making the parsed
    /// precedence visible.
    #[must_use]
    pub const fn with_all_parens(mut self) -> Self {
        self.all_parens = true;
        self
    }

    /// Returns the printed text.
    #[must_use]
    pub fn finish(self) -> String {
        self.out
    }

    const fn compact_layout(&self) -> bool {
        matches!(self.layout, Layout::Compact)
    }

    fn push(&mut self, s: &str) {
        self.out.push_str(s);
    }

    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.indent {
            self.out.push('\t');
        }
    }

    /// `", "` in long layout, `","` in compact layout.
    fn separator(&mut self) {
        self.push(if self.compact_layout() { "," } else { ", " });
    }

    /// Prints a whole program. In long layout the output ends with a newline.
    pub fn print_program(&mut self, node: &Node) {
        let Node::Statements(block) = node else {
            self.print(node);
            if !self.compact_layout() {
                self.out.push('\n');
            }
            return;
        };
        let mut first = true;
        for statement in &block.statements {
            if self.compact_layout() {
                if statement.is_comment() {
                    continue;
                }
                if !first {
                    self.push(";");
                }
            } else if !first {
                match statement {
                    Node::Comment { same_line: true, .. } => self.push(" "),
                    _ => self.newline(),
                }
            }
            self.print(statement);
            first = false;
        }
        if !self.compact_layout() && !first {
            self.out.push('\n');
        }
    }

    fn print_block(&mut self, block: &Block) {
        let statements: Vec<&Node> = if self.compact_layout() {
            block.statements.iter().filter(|s| !s.is_comment()).collect()
        } else {
            block.statements.iter().collect()
        };
        if statements.is_empty() {
            self.push("{}");
            return;
        }
        self.push("{");
        if self.compact_layout() {
            for (i, statement) in statements.iter().enumerate() {
                if i > 0 {
                    self.push(";");
                }
                self.print(statement);
            }
            self.push("}");
            return;
        }
        self.indent += 1;
        for (i, statement) in statements.iter().enumerate() {
            match statement {
                Node::Comment { same_line: true, .. } if i > 0 => self.push(" "),
                _ => self.newline(),
            }
            self.print(statement);
        }
        self.indent -= 1;
        self.newline();
        self.push("}");
    }

    fn print_list(&mut self, nodes: &[Node]) {
        for (i, node) in nodes.iter().filter(|n| !n.is_comment()).enumerate() {
            if i > 0 {
                self.separator();
            }
            self.print(node);
        }
    }

    fn print_parameters(&mut self, parameters: &[TokenRef], variadic: bool) {
        self.push("(");
        for (i, parameter) in parameters.iter().enumerate() {
            if i > 0 {
                self.separator();
            }
            self.push(parameter.literal());
        }
        if variadic {
            if !parameters.is_empty() {
                self.separator();
            }
            self.push("..");
        }
        self.push(")");
    }

    /// Prints `node` as an operand of an operator with priority `parent`,
    /// adding parentheses when the operand binds more loosely.
    fn print_operand(&mut self, node: &Node, parent: Priority, needs_tighter: bool) {
        let priority = node.priority();
        let wrap = priority < parent || (needs_tighter && priority == parent);
        if wrap {
            self.push("(");
        }
        self.print(node);
        if wrap {
            self.push(")");
        }
    }

    fn print_function(&mut self, function: &FunctionLiteral) {
        self.push("func");
        if let Some(name) = &function.name {
            self.push(" ");
            self.push(name.literal());
        }
        self.print_parameters(&function.parameters, function.variadic);
        if !self.compact_layout() {
            self.push(" ");
        }
        self.print_block(&function.body);
    }

    fn print_macro(&mut self, literal: &MacroLiteral) {
        self.push("macro");
        self.print_parameters(&literal.parameters, false);
        if !self.compact_layout() {
            self.push(" ");
        }
        self.print_block(&literal.body);
    }

    fn print_infix(&mut self, token: &TokenRef, left: &Node, right: &Node) {
        let priority = Priority::of(token.kind());
        let right_assoc = priority == Priority::Assign;
        if self.all_parens {
            self.push("(");
        }
        self.print_operand(left, priority, right_assoc);
        if self.compact_layout() {
            self.push(token.literal());
        } else {
            self.push(" ");
            self.push(token.literal());
            self.push(" ");
        }
        if self.compact_layout() && starts_with_sign(right) {
            // `a-(-b)` must not print as `a--b`.
            self.push("(");
            self.print(right);
            self.push(")");
        } else {
            self.print_operand(right, priority, !right_assoc);
        }
        if self.all_parens {
            self.push(")");
        }
    }

    fn print_if(&mut self,
                condition: &Node,
                consequence: &Block,
                alternative: Option<&Block>) {
        self.push("if ");
        self.print(condition);
        if !self.compact_layout() {
            self.push(" ");
        }
        self.print_block(consequence);
        let Some(alternative) = alternative else {
            return;
        };
        self.push(if self.compact_layout() { "else" } else { " else " });
        if let [nested @ Node::If { .. }] = alternative.statements.as_slice() {
            if self.compact_layout() {
                self.push(" ");
            }
            self.print(nested);
        } else {
            self.print_block(alternative);
        }
    }

    /// Prints any node.
    pub fn print(&mut self, node: &Node) {
        match node {
            Node::Integer { token, .. }
            | Node::Float { token, .. }
            | Node::Boolean { token, .. }
            | Node::Identifier { token }
            | Node::Comment { token, .. }
            | Node::Control { token } => self.push(token.literal()),
            Node::Str { token } => self.push(&quote(token.literal())),
            Node::Array { elements, .. } => {
                self.push("[");
                self.print_list(elements);
                self.push("]");
            },
            Node::Map { pairs, .. } => {
                self.push("{");
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        self.separator();
                    }
                    self.print(key);
                    self.push(if self.compact_layout() { ":" } else { ": " });
                    self.print(value);
                }
                self.push("}");
            },
            Node::Function(function) => self.print_function(function),
            Node::Macro(literal) => self.print_macro(literal),
            Node::Prefix { token, right } => {
                if self.all_parens {
                    self.push("(");
                }
                self.push(token.literal());
                if starts_with_sign(right) {
                    self.push("(");
                    self.print(right);
                    self.push(")");
                } else {
                    self.print_operand(right, Priority::Prefix, false);
                }
                if self.all_parens {
                    self.push(")");
                }
            },
            Node::Infix { token, left, right } => self.print_infix(token, left, right),
            Node::Postfix { token, operand } => {
                self.push(operand.literal());
                self.push(token.literal());
            },
            Node::Index { left, index, .. } => {
                self.print_operand(left, Priority::Call, false);
                self.push("[");
                self.print(index);
                self.push("]");
            },
            Node::Call { function,
                         arguments,
                         .. } => {
                self.print_operand(function, Priority::Call, false);
                self.push("(");
                self.print_list(arguments);
                self.push(")");
            },
            Node::Builtin { token, arguments } => {
                self.push(token.literal());
                self.push("(");
                self.print_list(arguments);
                self.push(")");
            },
            Node::If { condition,
                       consequence,
                       alternative,
                       .. } => self.print_if(condition, consequence, alternative.as_ref()),
            Node::For { condition, body, .. } => {
                self.push("for ");
                self.print(condition);
                if !self.compact_layout() {
                    self.push(" ");
                }
                self.print_block(body);
            },
            Node::Return { value, .. } => {
                self.push("return");
                if let Some(value) = value {
                    self.push(" ");
                    self.print(value);
                }
            },
            Node::Statements(block) => {
                let saved = self.layout;
                self.layout = Layout::Compact;
                for (i, statement) in block.statements.iter().filter(|s| !s.is_comment()).enumerate() {
                    if i > 0 {
                        self.push(";");
                    }
                    self.print(statement);
                }
                self.layout = saved;
            },
        }
    }
}

/// Whether printing `node` right after an operator could merge with it into
/// a different token, as in `a--b` or `--5`.
fn starts_with_sign(node: &Node) -> bool {
    match node {
        Node::Prefix { .. } => true,
        Node::Integer { token, .. } | Node::Float { token, .. } => token.literal().starts_with('-'),
        _ => false,
    }
}

impl Node {
    /// Formats the node as source text.
    ///
    /// # Example
    /// ```
    /// use grol::interpreter::parser::parse_program;
    ///
    /// let program = parse_program("a = [1, 2] + [3]").unwrap();
    /// assert_eq!(program.format(true), "a=[1,2]+[3]");
    /// assert_eq!(program.format(false), "a = [1, 2] + [3]\n");
    /// ```
    #[must_use]
    pub fn format(&self, compact: bool) -> String {
        let mut ps = if compact { PrintState::compact() } else { PrintState::long() };
        ps.print_program(self);
        ps.finish()
    }

    /// Formats the node with every operator expression parenthesised.
    #[must_use]
    pub fn format_parenthesized(&self) -> String {
        let mut ps = PrintState::compact().with_all_parens();
        ps.print_program(self);
        ps.finish()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ps = PrintState::compact();
        ps.print(self);
        f.write_str(&ps.finish())
    }
}
