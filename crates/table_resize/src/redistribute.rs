//! Turning a dragged dimension into cell attribute updates
//!
//! Setting grid column `k` to width `w` rewrites the `colwidth` entry for
//! column `k` in every cell crossing that column, each cell once. A cell
//! spanning several columns only has the entry at its local offset changed;
//! its other entries are left alone. Rows work the same way with
//! `rowheight`.

use crate::{ActiveEdge, Axis, CellContext, ResizeError, Result, TableMap, TableMapCache};
use doc_model::{CellAttrs, DimensionList, DocumentTree};
use edit_engine::{Step, Transaction};
use std::collections::HashSet;

/// Steps setting grid column (or row) `index` of a table to `value`.
///
/// `table_start` is the position where the table's content begins. Cells
/// that already have the value produce no step.
pub fn redistribute_steps(
    tree: &DocumentTree,
    map: &TableMap,
    table_start: usize,
    axis: Axis,
    index: usize,
    value: f32,
) -> Vec<Step> {
    let (lines, line_len) = match axis {
        Axis::Column => (map.height, map.width),
        Axis::Row => (map.width, map.height),
    };
    if index >= line_len {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    let mut steps = Vec::new();
    for line in 0..lines {
        let (row, col) = match axis {
            Axis::Column => (line, index),
            Axis::Row => (index, line),
        };
        let Some(pos) = map.position_at(row, col) else {
            continue;
        };
        // slots a repaired hole borrowed from a neighbour are not part of the cell
        let Some(rect) = map.find_cell(pos).filter(|rect| rect.contains(row, col)) else {
            continue;
        };
        if !seen.insert(pos) {
            continue;
        }
        let Some(cell) = tree
            .node_at(table_start + pos)
            .and_then(|id| tree.get_table_cell(id))
        else {
            continue;
        };

        let attrs = &cell.attrs;
        let (span, current, local) = match axis {
            Axis::Column => (attrs.effective_colspan(), &attrs.colwidth, col - rect.left),
            Axis::Row => (attrs.effective_rowspan(), &attrs.rowheight, row - rect.top),
        };
        let local = if span == 1 { 0 } else { local };
        if current.as_ref().and_then(|list| list.get(local)) == Some(value) {
            continue;
        }

        let mut list = current
            .clone()
            .unwrap_or_else(|| DimensionList::unset(span))
            .resized(span);
        list.set(local, value);

        let updated = match axis {
            Axis::Column => CellAttrs {
                colwidth: Some(list),
                ..attrs.clone()
            },
            Axis::Row => CellAttrs {
                rowheight: Some(list),
                ..attrs.clone()
            },
        };
        steps.push(Step::SetCellAttrs {
            pos: table_start + pos,
            attrs: updated,
        });
    }
    steps
}

/// Transaction giving the trailing column (or row) of the edge's cell the
/// dimension `value`. Empty when nothing changes.
pub fn try_resize_transaction(
    tree: &DocumentTree,
    cache: &mut TableMapCache,
    edge: ActiveEdge,
    value: f32,
) -> Result<Transaction> {
    let context = CellContext::lookup(tree, cache, edge.pos).map_err(|err| match err {
        ResizeError::NotACell(pos) => ResizeError::StaleHandle(pos),
        other => other,
    })?;
    let index = context.rect.trailing(edge.axis);
    let mut transaction = Transaction::new();
    for step in redistribute_steps(tree, &context.map, context.table_start, edge.axis, index, value) {
        transaction.add_step(step);
    }
    Ok(transaction)
}

/// `try_resize_transaction` for the interaction path: a stale edge yields an
/// empty transaction
pub fn resize_transaction(
    tree: &DocumentTree,
    cache: &mut TableMapCache,
    edge: ActiveEdge,
    value: f32,
) -> Transaction {
    match try_resize_transaction(tree, cache, edge, value) {
        Ok(transaction) => transaction,
        Err(err) => {
            tracing::warn!(pos = edge.pos, "resize target unavailable: {}", err);
            Transaction::new()
        }
    }
}
