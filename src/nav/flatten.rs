use crate::tree::{ElementAddr, FormNode, FormTree, Slot};

/// One row-block of the body in display order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlatElement {
    pub addr: ElementAddr,
    /// Nesting level; the body indents 4 cells per level.
    pub depth: usize,
}

pub const INDENT: u16 = 4;

impl FlatElement {
    pub fn indent(&self) -> u16 {
        u16::try_from(self.depth)
            .unwrap_or(u16::MAX)
            .saturating_mul(INDENT)
    }
}

/// Walk the tree depth first: each group contributes its heading followed by
/// its children, each field its widgets. The unnamed root adds no heading.
pub fn flatten_tree(tree: &FormTree) -> Vec<FlatElement> {
    fn append(out: &mut Vec<FlatElement>, nodes: &[FormNode], path: &mut Vec<usize>, depth: usize) {
        for (i, node) in nodes.iter().enumerate() {
            path.push(i);
            match node {
                FormNode::Group(g) => {
                    out.push(FlatElement {
                        addr: ElementAddr {
                            node: path.clone(),
                            slot: Slot::Heading,
                        },
                        depth,
                    });
                    append(out, &g.children, path, depth + 1);
                }
                FormNode::Field(f) => {
                    for slot in 0..f.elements.len() {
                        out.push(FlatElement {
                            addr: ElementAddr {
                                node: path.clone(),
                                slot: Slot::Widget(slot),
                            },
                            depth,
                        });
                    }
                }
            }
            path.pop();
        }
    }

    let mut out = Vec::new();
    append(&mut out, tree.nodes(), &mut Vec::new(), 0);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::Widget;
    use serde_json::json;

    fn make_tree() -> FormTree {
        FormTree::build(
            json!({
                "top": {"^weight": 1},
                "grp": {
                    "inner": {"^type": "choice", "^choices": ["a", "b"]},
                    "deep": {"leaf": {}}
                }
            })
            .as_object()
            .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn headings_precede_children_and_depth_grows() {
        let tree = make_tree();
        let flat = flatten_tree(&tree);
        let kinds: Vec<(&str, usize)> = flat
            .iter()
            .map(|fe| {
                let kind = match &tree.element(&fe.addr).unwrap().widget {
                    Widget::Heading(_) => "heading",
                    Widget::Label(_) => "label",
                    Widget::Radio(_) => "radio",
                    Widget::Edit(_) => "edit",
                    _ => "other",
                };
                (kind, fe.depth)
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("edit", 0),
                ("heading", 0),
                ("label", 1),
                ("radio", 1),
                ("heading", 1),
                ("edit", 2),
            ]
        );
        assert_eq!(flat[5].indent(), 8);
    }

    #[test]
    fn every_address_resolves() {
        let tree = make_tree();
        for fe in flatten_tree(&tree) {
            assert!(tree.element(&fe.addr).is_some(), "{:?}", fe.addr);
        }
    }
}
