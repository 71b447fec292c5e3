use std::rc::Rc;

use crate::ast::{Block, FunctionLiteral, MacroLiteral, Node};

/// Rewrites a tree top-down.
///
/// `f` is first applied to `node` itself. It returns the replacement and a
/// flag: when the flag is `true` the children of the replacement are
/// rewritten the same way, when it is `false` the replacement is kept as is.
/// Callers stop the walk with `false` once they have substituted a finished
/// subtree, such as an expanded macro body or a spliced `unquote` result.
///
/// The tree is taken by value, so rewriting a clone never aliases the source.
/// Map pairs are visited in their source order.
///
/// # Parameters
/// - `node`: The tree to rewrite.
/// - `f`: Called on every visited node.
///
/// # Returns
/// The rewritten tree.
///
/// # Example
/// ```
/// use grol::{
///     ast::{Node, modify::modify},
///     interpreter::token::{Token, TokenKind},
/// };
///
/// // Turn every integer 1 into 2.
/// let tree = Node::Array { token:    Token::of(TokenKind::LBracket),
///                          elements: vec![Node::integer(1), Node::integer(3)], };
/// let out = modify(tree,
///                  &mut |n| match n {
///                      Node::Integer { value: 1, .. } => (Node::integer(2), false),
///                      other => (other, true),
///                  });
/// assert_eq!(out.to_string(), "[2,3]");
/// ```
pub fn modify<F>(node: Node, f: &mut F) -> Node
    where F: FnMut(Node) -> (Node, bool)
{
    let (node, descend) = f(node);
    if !descend {
        return node;
    }
    match node {
        Node::Statements(block) => Node::Statements(modify_block(block, f)),
        Node::Array { token, elements } => {
            Node::Array { token,
                          elements: modify_all(elements, f) }
        },
        Node::Map { token, pairs } => {
            let pairs = pairs.into_iter()
                             .map(|(key, value)| (modify(key, f), modify(value, f)))
                             .collect();
            Node::Map { token, pairs }
        },
        Node::Function(function) => {
            let FunctionLiteral { token,
                                  name,
                                  parameters,
                                  variadic,
                                  body, } = Rc::unwrap_or_clone(function);
            Node::Function(Rc::new(FunctionLiteral { token,
                                                     name,
                                                     parameters,
                                                     variadic,
                                                     body: modify_block(body, f) }))
        },
        Node::Macro(literal) => {
            let MacroLiteral { token,
                               parameters,
                               body, } = Rc::unwrap_or_clone(literal);
            Node::Macro(Rc::new(MacroLiteral { token,
                                               parameters,
                                               body: modify_block(body, f) }))
        },
        Node::Prefix { token, right } => Node::Prefix { token,
                                                        right: modify_boxed(right, f) },
        Node::Infix { token, left, right } => {
            let left = modify_boxed(left, f);
            let right = modify_boxed(right, f);
            Node::Infix { token, left, right }
        },
        Node::Index { token, left, index } => {
            let left = modify_boxed(left, f);
            let index = modify_boxed(index, f);
            Node::Index { token, left, index }
        },
        Node::Call { token,
                     function,
                     arguments, } => {
            let function = modify_boxed(function, f);
            Node::Call { token,
                         function,
                         arguments: modify_all(arguments, f) }
        },
        Node::Builtin { token, arguments } => {
            Node::Builtin { token,
                            arguments: modify_all(arguments, f) }
        },
        Node::If { token,
                   condition,
                   consequence,
                   alternative, } => {
            let condition = modify_boxed(condition, f);
            let consequence = modify_block(consequence, f);
            let alternative = alternative.map(|block| modify_block(block, f));
            Node::If { token,
                       condition,
                       consequence,
                       alternative }
        },
        Node::For { token,
                    condition,
                    body, } => {
            let condition = modify_boxed(condition, f);
            Node::For { token,
                        condition,
                        body: modify_block(body, f) }
        },
        Node::Return { token, value } => {
            Node::Return { token,
                           value: value.map(|value| modify_boxed(value, f)) }
        },
        leaf @ (Node::Integer { .. }
                | Node::Float { .. }
                | Node::Str { .. }
                | Node::Boolean { .. }
                | Node::Identifier { .. }
                | Node::Comment { .. }
                | Node::Postfix { .. }
                | Node::Control { .. }) => leaf,
    }
}

fn modify_boxed<F>(node: Box<Node>, f: &mut F) -> Box<Node>
    where F: FnMut(Node) -> (Node, bool)
{
    Box::new(modify(*node, f))
}

fn modify_all<F>(nodes: Vec<Node>, f: &mut F) -> Vec<Node>
    where F: FnMut(Node) -> (Node, bool)
{
    nodes.into_iter().map(|node| modify(node, f)).collect()
}

fn modify_block<F>(block: Block, f: &mut F) -> Block
    where F: FnMut(Node) -> (Node, bool)
{
    Block { token:      block.token,
            statements: modify_all(block.statements, f), }
}
