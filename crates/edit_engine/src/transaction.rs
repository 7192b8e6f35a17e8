//! Transactions - ordered steps applied as one unit

use crate::{EditError, Mapping, Result, Step};
use doc_model::{DocumentTree, Node, NodeId};
use std::collections::BTreeSet;

/// An ordered batch of steps applied all-or-nothing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transaction {
    steps: Vec<Step>,
}

/// A transaction applied to a tree
#[derive(Debug, Clone)]
pub struct AppliedTransaction {
    /// The tree after every step
    pub tree: DocumentTree,
    /// Position mapping from the old tree to the new one
    pub mapping: Mapping,
    /// Tables whose content changed
    pub touched_tables: BTreeSet<NodeId>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style step append
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn add_step(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether applying this transaction changes the document
    pub fn doc_changed(&self) -> bool {
        !self.steps.is_empty()
    }

    /// Apply every step to a copy of `tree`; on failure the input is untouched
    pub fn apply(&self, tree: &DocumentTree) -> Result<AppliedTransaction> {
        let mut new_tree = tree.clone();
        let mut mapping = Mapping::new();
        let mut touched_tables = BTreeSet::new();

        for (index, step) in self.steps.iter().enumerate() {
            if let Some(table) = step.touched_table(&new_tree) {
                touched_tables.insert(table);
            }
            let map = step.apply(&mut new_tree).map_err(|err| EditError::StepFailed {
                index,
                reason: err.to_string(),
            })?;
            mapping.push(map);
        }
        // a deletion starting outside a table can still remove it
        touched_tables.extend(
            tree.tables()
                .map(|table| table.id())
                .filter(|id| new_tree.get_table(*id).is_none()),
        );

        Ok(AppliedTransaction {
            tree: new_tree,
            mapping,
            touched_tables,
        })
    }
}
