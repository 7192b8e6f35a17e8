//! Paragraph node - the textblock used as cell and body content

use crate::{Node, NodeId, NodeType};
use serde::{Deserialize, Serialize};

/// A paragraph holding plain text.
///
/// Each character occupies one position; the paragraph itself adds an
/// opening and a closing token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paragraph {
    id: NodeId,
    parent: Option<NodeId>,
    text: String,
}

impl Paragraph {
    /// Create an empty paragraph
    pub fn new() -> Self {
        Self::with_text("")
    }

    /// Create a paragraph with initial text
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            parent: None,
            text: text.into(),
        }
    }

    /// The paragraph's text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of characters (and therefore positions) in the paragraph
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Insert text at a character offset
    pub fn insert_text(&mut self, offset: usize, text: &str) {
        let byte_offset = self.byte_offset(offset);
        self.text.insert_str(byte_offset, text);
    }

    /// Delete the characters in `from..to`
    pub fn delete_text(&mut self, from: usize, to: usize) {
        let start = self.byte_offset(from);
        let end = self.byte_offset(to);
        self.text.replace_range(start..end, "");
    }

    fn byte_offset(&self, offset: usize) -> usize {
        self.text
            .char_indices()
            .nth(offset)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }
}

impl Default for Paragraph {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for Paragraph {
    fn id(&self) -> NodeId {
        self.id
    }

    fn node_type(&self) -> NodeType {
        NodeType::Paragraph
    }

    fn children(&self) -> &[NodeId] {
        &[]
    }

    fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    fn text_content(&self) -> Option<&str> {
        Some(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_delete_text() {
        let mut para = Paragraph::with_text("héllo");
        para.insert_text(1, "XY");
        assert_eq!(para.text(), "hXYéllo");
        assert_eq!(para.char_len(), 7);

        para.delete_text(1, 4);
        assert_eq!(para.text(), "hllo");
    }

    #[test]
    fn test_insert_at_end() {
        let mut para = Paragraph::with_text("ab");
        para.insert_text(2, "c");
        assert_eq!(para.text(), "abc");
    }
}
