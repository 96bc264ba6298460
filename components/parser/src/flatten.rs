//! Sequence flattening and splicing
//!
//! Statement lists are left-leaning [`Node::Sequence`] chains. Splicing a
//! nested chain into another moves its statements out of the old wrappers,
//! which are then dropped empty, so every statement keeps exactly one owner.

use std::mem;

use crate::ast::Node;

/// Non-Sequence statements of `node` in source order
pub fn statements(node: &Node) -> Vec<&Node> {
    let mut out = Vec::new();
    let mut pending = vec![node];
    while let Some(node) = pending.pop() {
        match node {
            Node::Sequence { first, last } => {
                pending.push(&**last);
                pending.extend(first.as_deref());
            }
            leaf => out.push(leaf),
        }
    }
    out
}

/// Move the non-Sequence statements out of `node`, in source order
pub fn into_statements(node: Node) -> Vec<Node> {
    let mut out = Vec::new();
    let mut pending = vec![node];
    while let Some(mut node) = pending.pop() {
        if let Node::Sequence { first, last } = &mut node {
            pending.push(take(last));
            if let Some(first) = first.take() {
                pending.push(*first);
            }
            continue;
        }
        out.push(node);
    }
    out
}

/// Append `statement` to `chain`, splicing it when it is itself a chain
pub fn append(chain: Option<Node>, statement: Node) -> Node {
    let mut statement = statement;
    if let Node::Sequence { first, last } = &mut statement {
        let earlier = first
            .take()
            .map(|first| into_statements(*first))
            .unwrap_or_default();
        let last = take(last);
        let chain = earlier
            .into_iter()
            .fold(chain, |chain, statement| Some(push(chain, statement)));
        return append(chain, last);
    }
    push(chain, statement)
}

fn push(chain: Option<Node>, statement: Node) -> Node {
    match chain {
        None => statement,
        Some(chain) => Node::sequence(Some(chain), statement),
    }
}

/// Move a boxed child out of a node that is about to be discarded
fn take(slot: &mut Box<Node>) -> Node {
    mem::replace(&mut **slot, Node::Identifier(String::new()))
}

/// Build a left-heavy chain from statements; None when there are none
pub fn chain<I>(statements: I) -> Option<Node>
where
    I: IntoIterator<Item = Node>,
{
    statements
        .into_iter()
        .fold(None, |chain, statement| Some(append(chain, statement)))
}
