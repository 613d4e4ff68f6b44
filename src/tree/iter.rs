use super::{Body, Node, NodeId};
use slotmap::SlotMap;

/// Pre-order iterator over the controls reachable from a layout.
///
/// Nested layouts are flattened in place. A control is yielded whether or
/// not it is visible, but its sub-layout is only descended into while it is
/// visible. Created by [`Ui::controls`](super::Ui::controls).
pub struct Controls<'a> {
    nodes: &'a SlotMap<NodeId, Node>,
    stack: Vec<std::slice::Iter<'a, NodeId>>,
}

impl<'a> Controls<'a> {
    pub(crate) fn new(nodes: &'a SlotMap<NodeId, Node>, layout: NodeId) -> Self {
        let stack = match nodes.get(layout).map(|node| &node.body) {
            Some(Body::Layout(l)) => vec![l.items.iter()],
            _ => Vec::new(),
        };
        Self { nodes, stack }
    }

    fn push_layout(&mut self, id: NodeId) {
        if let Some(Body::Layout(l)) = self.nodes.get(id).map(|node| &node.body) {
            self.stack.push(l.items.iter());
        }
    }
}

impl Iterator for Controls<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        loop {
            let top = self.stack.last_mut()?;
            let Some(&id) = top.next() else {
                self.stack.pop();
                continue;
            };
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            match &node.body {
                Body::Layout(_) => self.push_layout(id),
                Body::Control(control) => {
                    if control.state.is_visible() {
                        if let Some(sub) = control.children {
                            self.push_layout(sub);
                        }
                    }
                    return Some(id);
                }
            }
        }
    }
}
