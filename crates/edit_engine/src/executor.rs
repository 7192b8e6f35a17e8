//! Transaction dispatch engine

use crate::{Mapping, Result, Transaction};
use doc_model::{DocumentTree, NodeId};
use std::collections::BTreeSet;
use tracing::debug;

/// Record of a transaction that changed the document
#[derive(Debug, Clone)]
pub struct DispatchedTransaction {
    /// Position mapping from the previous document
    pub mapping: Mapping,
    /// Tables whose content changed
    pub touched_tables: BTreeSet<NodeId>,
    /// Document revision after the transaction
    pub revision: u64,
}

/// The main editing engine that owns the document and applies transactions
pub struct EditingEngine {
    /// Current document tree
    tree: DocumentTree,
    /// Incremented on every applied transaction
    revision: u64,
}

impl EditingEngine {
    /// Create a new editing engine with an empty document
    pub fn new() -> Self {
        Self::with_tree(DocumentTree::with_empty_paragraph())
    }

    /// Create an editing engine with a specific document tree
    pub fn with_tree(tree: DocumentTree) -> Self {
        Self { tree, revision: 0 }
    }

    /// Get the current document tree
    pub fn tree(&self) -> &DocumentTree {
        &self.tree
    }

    /// Current document revision
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Apply a transaction.
    ///
    /// Empty transactions are not applied and return `None`. A failing step
    /// leaves the document unchanged.
    pub fn dispatch(&mut self, transaction: Transaction) -> Result<Option<DispatchedTransaction>> {
        if transaction.is_empty() {
            return Ok(None);
        }

        let applied = transaction.apply(&self.tree)?;
        self.tree = applied.tree;
        self.revision += 1;

        debug!(
            revision = self.revision,
            steps = transaction.steps().len(),
            touched_tables = applied.touched_tables.len(),
            "transaction applied"
        );

        Ok(Some(DispatchedTransaction {
            mapping: applied.mapping,
            touched_tables: applied.touched_tables,
            revision: self.revision,
        }))
    }
}

impl Default for EditingEngine {
    fn default() -> Self {
        Self::new()
    }
}
