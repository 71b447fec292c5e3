use std::rc::Rc;

use crate::{
    ast::{Block, MacroLiteral, Node, modify::modify},
    error::RuntimeError,
    interpreter::{
        environment::Environment,
        evaluator::core::{EvalResult, State, Unwind},
        token::TokenKind,
        value::{core::Value, function::MacroValue},
    },
};

impl State {
    /// Moves the top-level macro definitions of `program` into the macro
    /// environment.
    ///
    /// A definition is a statement `name = macro(...) { ... }`; it is removed
    /// from the program. Macro literals anywhere else are left alone.
    pub(super) fn define_macros(&mut self, program: Node) -> Node {
        let Node::Statements(block) = program else {
            return program;
        };
        let mut statements = Vec::with_capacity(block.statements.len());
        for statement in block.statements {
            match Self::macro_definition(&statement) {
                Some((name, literal)) => {
                    log::debug!("defining macro {name}");
                    let value = MacroValue { literal,
                                             env: Rc::clone(&self.env) };
                    self.macros.borrow_mut().define(name, Value::Macro(Rc::new(value)));
                },
                None => statements.push(statement),
            }
        }
        Node::Statements(Block::new(block.token, statements))
    }

    fn macro_definition(statement: &Node) -> Option<(Rc<str>, Rc<MacroLiteral>)> {
        let Node::Infix { token, left, right } = statement else {
            return None;
        };
        if !matches!(token.kind(), TokenKind::Assign | TokenKind::Define) {
            return None;
        }
        match (left.as_ref(), right.as_ref()) {
            (Node::Identifier { token }, Node::Macro(literal)) => {
                Some((token.literal_rc(), Rc::clone(literal)))
            },
            _ => None,
        }
    }

    /// Replaces every call of a defined macro by the code its body returns.
    ///
    /// Does nothing when no macro is defined.
    ///
    /// # Errors
    /// The first error raised while expanding.
    pub(super) fn expand_macros(&mut self, program: Node) -> EvalResult<Node> {
        if self.macros.borrow().is_empty() {
            return Ok(program);
        }
        self.expand_node(program)
    }

    fn expand_node(&mut self, node: Node) -> EvalResult<Node> {
        let mut failure: Option<Unwind> = None;
        let expanded = modify(node, &mut |node| {
                           if failure.is_some() {
                               return (node, false);
                           }
                           let Some(found) = self.macro_called(&node) else {
                               return (node, true);
                           };
                           let Node::Call { arguments, .. } = &node else {
                               return (node, true);
                           };
                           match self.expand_call(&found, arguments.clone()) {
                               Ok(expanded) => (expanded, false),
                               Err(e) => {
                                   failure = Some(e);
                                   (node, false)
                               },
                           }
                       });
        match failure {
            Some(e) => Err(e),
            None => Ok(expanded),
        }
    }

    /// The macro called by `node`, if it is a call of a defined macro.
    fn macro_called(&self, node: &Node) -> Option<Rc<MacroValue>> {
        let Node::Call { function, .. } = node else {
            return None;
        };
        let name = function.as_identifier()?;
        match self.macros.borrow().get(name.literal()) {
            Some(Value::Macro(found)) => Some(found),
            _ => None,
        }
    }

    /// Runs a macro body with each parameter bound to the quoted code of its
    /// argument. Arguments are expanded first, so nested macro calls are
    /// expanded once, before the outer macro sees them.
    fn expand_call(&mut self, found: &MacroValue, arguments: Vec<Node>) -> EvalResult<Node> {
        let literal = &found.literal;
        if arguments.len() != literal.parameters.len() {
            return Err(RuntimeError::WrongArgumentCount { name: "macro".to_string(),
                                                          got:  arguments.len(),
                                                          min:  literal.parameters.len(),
                                                          max:  Some(literal.parameters.len()), }.into());
        }

        let env = Environment::enclosed(&found.env);
        for (parameter, argument) in literal.parameters.iter().zip(arguments) {
            let argument = self.expand_node(argument)?;
            env.borrow_mut()
               .define(parameter.literal_rc(), Value::Quote(Rc::new(argument)));
        }

        let result = self.eval_block_in(env, &literal.body);

        let value = match result {
            Ok(value) | Err(Unwind::Return(value)) => value,
            Err(other) => return Err(other.escaped()),
        };
        match value {
            Value::Quote(node) => Ok(Rc::unwrap_or_clone(node)),
            other => Err(RuntimeError::MacroResultNotQuote { kind: other.type_name() }.into()),
        }
    }
}
