use lexsem_syntax::{Module, Node, Stmt, label};

use crate::dot::{DotGraph, NodeId};

/// Every node of the tree labeled with its kind, linked to all of its
/// children.
pub fn syntax_graph(module: &Module) -> DotGraph {
    fn add(graph: &mut DotGraph, node: Node<'_>, parent: Option<NodeId>) {
        let id = graph.add_node(node.kind_name());
        if let Some(parent) = parent {
            graph.add_edge(parent, id);
        }
        for child in node.children() {
            add(graph, child, Some(id));
        }
    }

    let mut graph = DotGraph::new("syntax").with_node_shape("box");
    add(&mut graph, module.as_node(), None);
    graph
}

/// Statement-level tree. An `if` links its body directly and groups its
/// `else` branch under a separate node.
pub fn semantic_graph(module: &Module) -> DotGraph {
    fn add(graph: &mut DotGraph, node: Node<'_>, parent: Option<NodeId>) {
        let id = graph.add_node(label(node));
        if let Some(parent) = parent {
            graph.add_edge(parent, id);
        }

        if let Node::Stmt(Stmt::If(if_stmt)) = node {
            for stmt in &if_stmt.body {
                add(graph, Node::Stmt(stmt), Some(id));
            }
            if !if_stmt.orelse.is_empty() {
                let else_id = graph.add_node("else");
                graph.add_edge(id, else_id);
                for stmt in &if_stmt.orelse {
                    add(graph, Node::Stmt(stmt), Some(else_id));
                }
            }
            return;
        }

        for stmt in body_of(node) {
            add(graph, Node::Stmt(stmt), Some(id));
        }
    }

    let mut graph = DotGraph::new("semantic");
    add(&mut graph, module.as_node(), None);
    graph
}

/// Simplified control flow: statements of a body follow each other, a
/// branch or loop fans out from its header node.
pub fn flow_graph(module: &Module) -> DotGraph {
    let mut graph = DotGraph::new("control_flow");
    add_block(&mut graph, module.as_node(), None);
    graph
}

/// Adds `node` and its nested blocks, returning the node the next
/// statement should follow.
fn add_block(graph: &mut DotGraph, node: Node<'_>, parent: Option<NodeId>) -> NodeId {
    let id = graph.add_node(label(node));
    if let Some(parent) = parent {
        graph.add_edge(parent, id);
    }

    match node {
        Node::Stmt(Stmt::If(if_stmt)) => {
            chain(graph, &if_stmt.body, id);
            branch(graph, id, "else", &if_stmt.orelse);
            id
        }
        Node::Stmt(Stmt::For(for_loop)) => {
            chain(graph, &for_loop.body, id);
            branch(graph, id, "orelse", &for_loop.orelse);
            id
        }
        Node::Stmt(Stmt::While(while_loop)) => {
            chain(graph, &while_loop.body, id);
            branch(graph, id, "orelse", &while_loop.orelse);
            id
        }
        _ => chain(graph, body_of(node), id),
    }
}

fn chain(graph: &mut DotGraph, body: &[Stmt], start: NodeId) -> NodeId {
    body.iter()
        .fold(start, |last, stmt| add_block(graph, Node::Stmt(stmt), Some(last)))
}

fn branch(graph: &mut DotGraph, from: NodeId, name: &str, body: &[Stmt]) {
    if body.is_empty() {
        return;
    }
    let id = graph.add_node(name);
    graph.add_edge(from, id);
    chain(graph, body, id);
}

/// The statement list a node owns, if any.
fn body_of<'ast>(node: Node<'ast>) -> &'ast [Stmt] {
    match node {
        Node::Module(module) => &module.body,
        Node::ExceptHandler(handler) => &handler.body,
        Node::Stmt(Stmt::FunctionDef(def)) => &def.body,
        Node::Stmt(Stmt::If(if_stmt)) => &if_stmt.body,
        Node::Stmt(Stmt::For(for_loop)) => &for_loop.body,
        Node::Stmt(Stmt::While(while_loop)) => &while_loop.body,
        Node::Stmt(Stmt::Try(try_stmt)) => &try_stmt.body,
        _ => &[],
    }
}
