//! Table node specifications and markup conversion
//!
//! `table_nodes` produces the node specs a host schema registers for tables;
//! the `parse_*` / `*_to_markup` functions convert cell and row attributes
//! to and from markup elements.

use crate::{
    AttrValue, AttributeRegistry, CellAttrs, CellKind, DimensionList, MarkupAttributes,
    MarkupElement, RowAttrs, TableRole,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Options for building the table node specs
#[derive(Debug, Clone)]
pub struct TableNodesOptions {
    /// Group name added to the table node (e.g. "block")
    pub table_group: Option<String>,
    /// Content expression for cells
    pub cell_content: String,
    /// Extra cell attributes supplied by the host
    pub cell_attributes: AttributeRegistry,
}

impl Default for TableNodesOptions {
    fn default() -> Self {
        Self {
            table_group: Some("block".to_string()),
            cell_content: "block+".to_string(),
            cell_attributes: AttributeRegistry::new(),
        }
    }
}

/// Description of one node type as registered in a schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Content expression
    pub content: String,
    /// Group membership
    pub group: Option<String>,
    /// Role in the table structure
    pub table_role: TableRole,
    /// Whether editing operations stop at the node boundary
    pub isolating: bool,
    /// Attribute names with their default values
    pub attrs: BTreeMap<String, AttrValue>,
    /// Markup tags recognized when parsing
    pub parse_tags: Vec<String>,
}

/// The four table node specs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableNodeSpecs {
    pub table: NodeSpec,
    pub table_row: NodeSpec,
    pub table_cell: NodeSpec,
    pub table_header: NodeSpec,
}

impl TableNodeSpecs {
    /// Specs keyed by node type name
    pub fn by_name(&self) -> BTreeMap<&'static str, &NodeSpec> {
        BTreeMap::from([
            ("table", &self.table),
            ("table_row", &self.table_row),
            ("table_cell", &self.table_cell),
            ("table_header", &self.table_header),
        ])
    }
}

/// Build the table node specs
pub fn table_nodes(options: &TableNodesOptions) -> TableNodeSpecs {
    let mut cell_attrs = BTreeMap::from([
        ("colspan".to_string(), AttrValue::from(1)),
        ("rowspan".to_string(), AttrValue::from(1)),
        ("colwidth".to_string(), AttrValue::Null),
        ("rowheight".to_string(), AttrValue::Null),
    ]);
    cell_attrs.extend(options.cell_attributes.defaults());

    let cell = |role: TableRole, tag: &str| NodeSpec {
        content: options.cell_content.clone(),
        group: None,
        table_role: role,
        isolating: true,
        attrs: cell_attrs.clone(),
        parse_tags: vec![tag.to_string()],
    };

    TableNodeSpecs {
        table: NodeSpec {
            content: "table_row+".to_string(),
            group: options.table_group.clone(),
            table_role: TableRole::Table,
            isolating: true,
            attrs: BTreeMap::new(),
            parse_tags: vec!["table".to_string()],
        },
        table_row: NodeSpec {
            content: "(table_cell | table_header)*".to_string(),
            group: None,
            table_role: TableRole::Row,
            isolating: false,
            attrs: BTreeMap::from([("rowheight".to_string(), AttrValue::Null)]),
            parse_tags: vec!["tr".to_string()],
        },
        table_cell: cell(TableRole::Cell, "td"),
        table_header: cell(TableRole::HeaderCell, "th"),
    }
}

fn parse_span(element: &MarkupElement, name: &str) -> u32 {
    element
        .attribute(name)
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .filter(|&span| span > 0)
        .unwrap_or(1)
}

/// Read cell attributes from a `td` / `th` element.
///
/// Returns `None` for any other tag. Dimension lists whose length disagrees
/// with the span are dropped.
pub fn parse_cell(
    element: &MarkupElement,
    extra: &AttributeRegistry,
) -> Option<(CellKind, CellAttrs)> {
    let kind = match element.tag.as_str() {
        "td" => CellKind::Data,
        "th" => CellKind::Header,
        _ => return None,
    };

    let colspan = parse_span(element, "colspan");
    let rowspan = parse_span(element, "rowspan");
    let colwidth = element
        .attribute("data-colwidth")
        .and_then(DimensionList::parse_markup)
        .filter(|list| list.len() == colspan as usize);
    let rowheight = element
        .attribute("data-rowheight")
        .and_then(DimensionList::parse_markup)
        .filter(|list| list.len() == rowspan as usize);

    Some((
        kind,
        CellAttrs {
            colspan,
            rowspan,
            colwidth,
            rowheight,
            extra: extra.read_all(element),
        },
    ))
}

/// Write cell attributes as markup. Spans of 1 are omitted.
pub fn cell_to_markup(attrs: &CellAttrs, extra: &AttributeRegistry) -> MarkupAttributes {
    let mut out = MarkupAttributes::new();
    if attrs.colspan != 1 {
        out.insert("colspan".to_string(), attrs.colspan.to_string());
    }
    if attrs.rowspan != 1 {
        out.insert("rowspan".to_string(), attrs.rowspan.to_string());
    }
    if let Some(colwidth) = &attrs.colwidth {
        out.insert("data-colwidth".to_string(), colwidth.to_markup());
    }
    if let Some(rowheight) = &attrs.rowheight {
        out.insert("data-rowheight".to_string(), rowheight.to_markup());
    }
    extra.write_all(&attrs.extra, &mut out);
    out
}

/// Read row attributes from a `tr` element
pub fn parse_row(element: &MarkupElement) -> Option<RowAttrs> {
    if element.tag != "tr" {
        return None;
    }
    Some(RowAttrs {
        rowheight: element
            .attribute("data-rowheight")
            .and_then(DimensionList::parse_markup),
    })
}

/// Write row attributes as markup
pub fn row_to_markup(attrs: &RowAttrs) -> MarkupAttributes {
    let mut out = MarkupAttributes::new();
    if let Some(rowheight) = &attrs.rowheight {
        out.insert("data-rowheight".to_string(), rowheight.to_markup());
    }
    out
}
