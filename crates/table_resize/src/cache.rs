//! Per-table grid map cache
//!
//! Maps are keyed by table identity and stay valid while the table's
//! content is unchanged, even when the table itself moves. Dispatched
//! transactions invalidate the tables they touched.

use crate::TableMap;
use doc_model::{DocModelError, DocumentTree, NodeId};
use edit_engine::DispatchedTransaction;
use std::collections::HashMap;
use std::sync::Arc;

/// Cache hit/miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Grid maps keyed by table node
#[derive(Debug, Default)]
pub struct TableMapCache {
    maps: HashMap<NodeId, Arc<TableMap>>,
    stats: CacheStats,
}

impl TableMapCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The map for a table, building it on first use
    pub fn get(&mut self, tree: &DocumentTree, table_id: NodeId) -> Result<Arc<TableMap>, DocModelError> {
        if let Some(map) = self.maps.get(&table_id) {
            self.stats.hits += 1;
            tracing::trace!(table = %table_id, "table map cache hit");
            return Ok(Arc::clone(map));
        }

        self.stats.misses += 1;
        tracing::trace!(table = %table_id, "table map cache miss");
        let map = Arc::new(TableMap::build(tree, table_id)?);
        self.maps.insert(table_id, Arc::clone(&map));
        Ok(map)
    }

    /// Drop the map of one table
    pub fn invalidate(&mut self, table_id: NodeId) {
        self.maps.remove(&table_id);
    }

    /// Drop the maps of every table a transaction touched
    pub fn apply_transaction(&mut self, dispatched: &DispatchedTransaction) {
        for table in &dispatched.touched_tables {
            self.invalidate(*table);
        }
    }

    pub fn clear(&mut self) {
        self.maps.clear();
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
