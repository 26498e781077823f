//! Structural invariants every document must satisfy between commands.

use crate::model::{Block, BlockType, Document, Node, Path};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("{container} at {path} holds a child that is not a list-item")]
    NonItemInList { container: BlockType, path: Path },
    #[error("list-item at {path} is not inside a list container")]
    OrphanListItem { path: Path },
    #[error("top-level node at {path} is not a block")]
    NonBlockAtRoot { path: Path },
}

/// Check the list-container and root invariants, reporting the first
/// violation in document order.
pub fn check(doc: &Document) -> Result<(), InvariantViolation> {
    for (index, node) in doc.nodes().iter().enumerate() {
        if node.as_block().is_none() {
            return Err(InvariantViolation::NonBlockAtRoot {
                path: Path::from([index]),
            });
        }
    }

    for (path, node) in doc.descendants() {
        let Node::Block(block) = node else {
            continue;
        };

        if block.kind().is_list_container()
            && block
                .nodes()
                .iter()
                .any(|child| child.as_block().map(Block::kind) != Some(BlockType::ListItem))
        {
            return Err(InvariantViolation::NonItemInList {
                container: block.kind(),
                path,
            });
        }

        if block.kind() == BlockType::ListItem {
            let in_list = path
                .parent()
                .and_then(|parent| doc.block(&parent))
                .is_some_and(|parent| parent.kind().is_list_container());
            if !in_list {
                return Err(InvariantViolation::OrphanListItem { path });
            }
        }
    }
    Ok(())
}
