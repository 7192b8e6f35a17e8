//! Document steps
//!
//! A step is one atomic change addressed by integer positions. Applying a
//! step mutates a tree in place and reports how positions moved.

use crate::{EditError, Result, StepMap};
use doc_model::{CellAttrs, DocumentTree, NodeId, NodeType, Paragraph, RowAttrs};
use serde::{Deserialize, Serialize};

/// A single document change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Step {
    /// Replace the attributes of the cell starting at `pos`
    SetCellAttrs { pos: usize, attrs: CellAttrs },
    /// Replace the attributes of the row starting at `pos`
    SetRowAttrs { pos: usize, attrs: RowAttrs },
    /// Insert text inside a paragraph
    InsertText { pos: usize, text: String },
    /// Delete a text range inside one paragraph, or a run of whole sibling nodes
    Delete { from: usize, to: usize },
    /// Insert a paragraph at a block boundary
    InsertParagraph { pos: usize, text: String },
}

impl Step {
    /// Get a display name for this step
    pub fn display_name(&self) -> &str {
        match self {
            Step::SetCellAttrs { .. } => "Set Cell Attributes",
            Step::SetRowAttrs { .. } => "Set Row Attributes",
            Step::InsertText { .. } => "Insert Text",
            Step::Delete { .. } => "Delete",
            Step::InsertParagraph { .. } => "Insert Paragraph",
        }
    }

    /// The table whose content this step changes, if any
    pub fn touched_table(&self, tree: &DocumentTree) -> Option<NodeId> {
        let pos = match self {
            Step::SetCellAttrs { pos, .. }
            | Step::SetRowAttrs { pos, .. }
            | Step::InsertText { pos, .. }
            | Step::InsertParagraph { pos, .. } => *pos,
            Step::Delete { from, .. } => *from,
        };
        let anchor = match self {
            Step::SetCellAttrs { .. } | Step::SetRowAttrs { .. } | Step::Delete { .. } => {
                tree.node_at(pos)
            }
            _ => None,
        };
        let anchor = anchor.or_else(|| tree.resolve(pos).ok().map(|r| r.parent()))?;
        tree.table_for_node(anchor)
    }

    /// Apply the step to a tree
    pub fn apply(&self, tree: &mut DocumentTree) -> Result<StepMap> {
        match self {
            Step::SetCellAttrs { pos, attrs } => {
                let cell = tree
                    .node_at(*pos)
                    .and_then(|id| tree.get_table_cell_mut(id))
                    .ok_or_else(|| EditError::InvalidStep(format!("no cell at {}", pos)))?;
                cell.attrs = attrs.clone();
                Ok(StepMap::identity())
            }
            Step::SetRowAttrs { pos, attrs } => {
                let row = tree
                    .node_at(*pos)
                    .and_then(|id| tree.get_table_row_mut(id))
                    .ok_or_else(|| EditError::InvalidStep(format!("no row at {}", pos)))?;
                row.attrs = attrs.clone();
                Ok(StepMap::identity())
            }
            Step::InsertText { pos, text } => {
                let resolved = tree.resolve(*pos)?;
                let offset = resolved.parent_offset();
                let para = tree
                    .get_paragraph_mut(resolved.parent())
                    .ok_or_else(|| {
                        EditError::InvalidStep(format!("position {} is not inside a paragraph", pos))
                    })?;
                para.insert_text(offset, text);
                Ok(StepMap::replace(*pos, 0, text.chars().count()))
            }
            Step::Delete { from, to } => apply_delete(tree, *from, *to),
            Step::InsertParagraph { pos, text } => {
                let resolved = tree.resolve(*pos)?;
                let parent = resolved.parent();
                let index = resolved
                    .index(resolved.depth())
                    .ok_or_else(|| EditError::InvalidStep(format!("cannot resolve {}", pos)))?;
                match tree.node_type(parent) {
                    Some(NodeType::Document) | Some(NodeType::TableCell) | Some(NodeType::TableHeader) => {}
                    _ => {
                        return Err(EditError::InvalidStep(format!(
                            "paragraphs cannot be inserted at {}",
                            pos
                        )))
                    }
                }
                let para = Paragraph::with_text(text.as_str());
                let size = para.char_len() + 2;
                tree.insert_paragraph(para, parent, Some(index))?;
                Ok(StepMap::replace(*pos, 0, size))
            }
        }
    }
}

fn apply_delete(tree: &mut DocumentTree, from: usize, to: usize) -> Result<StepMap> {
    if from > to {
        return Err(EditError::InvalidStep(format!(
            "delete range {}..{} is reversed",
            from, to
        )));
    }
    if from == to {
        return Ok(StepMap::identity());
    }

    let resolved = tree.resolve(from)?;
    let parent = resolved.parent();

    // Text range inside one paragraph
    if let Some(para) = tree.get_paragraph(parent) {
        let start = resolved.start(resolved.depth()).unwrap_or(from);
        if to > start + para.char_len() {
            return Err(EditError::InvalidStep(format!(
                "delete range {}..{} leaves its paragraph",
                from, to
            )));
        }
        let offset = resolved.parent_offset();
        if let Some(para) = tree.get_paragraph_mut(parent) {
            para.delete_text(offset, offset + (to - from));
        }
        return Ok(StepMap::replace(from, to - from, 0));
    }

    // Whole sibling nodes
    let index = resolved.index(resolved.depth()).unwrap_or(0);
    let mut covered = 0;
    let mut doomed = Vec::new();
    for &child in &tree.children(parent)[index..] {
        if covered >= to - from {
            break;
        }
        covered += tree.node_size(child);
        doomed.push(child);
    }
    if covered != to - from {
        return Err(EditError::InvalidStep(format!(
            "delete range {}..{} does not cover whole nodes",
            from, to
        )));
    }
    for id in doomed {
        tree.remove_subtree(id)?;
    }
    Ok(StepMap::replace(from, to - from, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::DimensionList;

    /// Paragraph "ab" followed by a 1x2 table
    fn sample() -> DocumentTree {
        let mut tree = DocumentTree::new();
        let root = tree.root_id();
        tree.insert_paragraph(Paragraph::with_text("ab"), root, None)
            .unwrap();
        tree.insert_simple_table(1, 2).unwrap();
        tree
    }

    #[test]
    fn test_set_cell_attrs() {
        let mut tree = sample();
        // table 4, row 5, first cell 6
        let attrs = CellAttrs::new().with_colwidth(DimensionList::from_values(&[120.0]));
        let map = Step::SetCellAttrs { pos: 6, attrs: attrs.clone() }
            .apply(&mut tree)
            .unwrap();
        assert!(map.is_identity());
        let cell = tree.node_at(6).unwrap();
        assert_eq!(tree.get_table_cell(cell).unwrap().attrs, attrs);
    }

    #[test]
    fn test_set_cell_attrs_rejects_non_cell() {
        let mut tree = sample();
        let result = Step::SetCellAttrs { pos: 5, attrs: CellAttrs::new() }.apply(&mut tree);
        assert!(result.is_err());
    }

    #[test]
    fn test_insert_text_shifts_positions() {
        let mut tree = sample();
        let map = Step::InsertText { pos: 2, text: "xyz".to_string() }
            .apply(&mut tree)
            .unwrap();
        assert_eq!(map.map(6, crate::Assoc::Before), 9);
        let para = tree.body()[0];
        assert_eq!(tree.get_paragraph(para).unwrap().text(), "axyzb");
    }

    #[test]
    fn test_delete_text() {
        let mut tree = sample();
        Step::Delete { from: 1, to: 2 }.apply(&mut tree).unwrap();
        let para = tree.body()[0];
        assert_eq!(tree.get_paragraph(para).unwrap().text(), "b");
    }

    #[test]
    fn test_delete_whole_cell() {
        let mut tree = sample();
        let table = tree.body()[1];
        // second cell: 6 + 4 = 10..14
        Step::Delete { from: 10, to: 14 }.apply(&mut tree).unwrap();
        assert_eq!(tree.node_size(table), 8);
    }

    #[test]
    fn test_delete_partial_node_fails() {
        let mut tree = sample();
        assert!(Step::Delete { from: 10, to: 12 }.apply(&mut tree).is_err());
    }

    #[test]
    fn test_insert_paragraph_at_start() {
        let mut tree = sample();
        let map = Step::InsertParagraph { pos: 0, text: "new".to_string() }
            .apply(&mut tree)
            .unwrap();
        assert_eq!(map.map(4, crate::Assoc::Before), 9);
        assert_eq!(tree.body().len(), 3);
    }

    #[test]
    fn test_touched_table() {
        let tree = sample();
        let table = tree.body()[1];
        let step = Step::SetCellAttrs { pos: 6, attrs: CellAttrs::new() };
        assert_eq!(step.touched_table(&tree), Some(table));
        let step = Step::InsertText { pos: 1, text: "x".to_string() };
        assert_eq!(step.touched_table(&tree), None);
        let step = Step::Delete { from: 4, to: 4 + tree.node_size(table) };
        assert_eq!(step.touched_table(&tree), Some(table));
    }
}
