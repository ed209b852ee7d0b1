//! Structural text extraction.
//!
//! HTML documents yield one fragment per body paragraph and one per table,
//! rendered one fragment per line. Formex XML documents yield one fragment
//! per child of the root element, rendered as continuous prose.
//!
//! Known limitation: a table nested in another table is linearized twice,
//! once inside the outer table's rows and once on its own.

use crate::markup::{NodeData, NodeId, NodeKind, TextStyle, Tree, Visit};
use crate::normalize::{normalize, Profile};

const FRAGMENT_SEPARATOR: &str = "\n\n";

/// Body fragments of an HTML tree, in document order.
pub fn extract_html(tree: &Tree) -> Vec<String> {
    let scope = tree.document_element().unwrap_or_else(|| tree.root());

    tree.descendants(scope)
        .filter_map(|id| match tree.node(id).kind() {
            NodeKind::Table => Some(linearize_table(tree, id, TextStyle::CONCAT)),
            NodeKind::Paragraph if is_body_paragraph(tree, id) => {
                Some(tree.text(id, TextStyle::SPACED))
            }
            _ => None,
        })
        .collect()
}

/// Body fragments of a Formex tree: one per element child of the root.
/// Footnotes and children without any text yield nothing.
pub fn extract_xml(tree: &Tree) -> Vec<String> {
    let Some(root) = tree.document_element() else {
        return Vec::new();
    };

    tree.children(root)
        .filter(|&id| {
            let node = tree.node(id);
            node.is_element() && node.kind() != NodeKind::Footnote
        })
        .map(|id| block_text(tree, id))
        .filter(|text| !text.is_empty())
        .collect()
}

/// Paragraph-per-line text of an HTML tree.
pub fn html_to_text(tree: &Tree) -> String {
    let fragments: Vec<String> = extract_html(tree)
        .iter()
        .map(|fragment| normalize(&single_line(fragment), Profile::CompactWhitespace))
        .collect();
    normalize(&fragments.join(FRAGMENT_SEPARATOR), Profile::CompactBlankLines)
}

/// Continuous-prose text of a Formex tree.
pub fn xml_to_text(tree: &Tree) -> String {
    normalize(
        &extract_xml(tree).join(FRAGMENT_SEPARATOR),
        Profile::CompactWhitespace,
    )
}

/// Text of a table as one line: for every row, including rows of nested
/// tables, the first paragraph of each direct cell. Cells without a
/// paragraph contribute their own text.
pub fn linearize_table(tree: &Tree, table: NodeId, style: TextStyle) -> String {
    let mut cells: Vec<String> = Vec::new();

    for row in tree
        .descendants(table)
        .filter(|&id| tree.node(id).kind() == NodeKind::Row)
    {
        for cell in tree
            .children(row)
            .filter(|&id| tree.node(id).kind() == NodeKind::Cell)
        {
            let source = cell_paragraph(tree, cell).unwrap_or(cell);
            cells.push(tree.text(source, style).trim().to_string());
        }
    }

    cells.join(" ")
}

/// First paragraph of a cell that is not part of a footnote.
fn cell_paragraph(tree: &Tree, cell: NodeId) -> Option<NodeId> {
    let mut found = None;
    tree.visit(cell, |id, node| {
        if found.is_some() {
            return Visit::SkipSubtree;
        }
        match node.kind() {
            NodeKind::Footnote => Visit::SkipSubtree,
            NodeKind::Paragraph => {
                found = Some(id);
                Visit::SkipSubtree
            }
            _ => Visit::Descend,
        }
    });
    found
}

/// A paragraph outside any table that does not wrap further paragraphs.
fn is_body_paragraph(tree: &Tree, id: NodeId) -> bool {
    !tree.has_ancestor_of_kind(id, NodeKind::Table)
        && tree
            .first_descendant_of_kind(id, NodeKind::Paragraph)
            .is_none()
}

fn block_text(tree: &Tree, id: NodeId) -> String {
    if tree.node(id).kind() == NodeKind::Table {
        return linearize_table(tree, id, TextStyle::STRIPPED);
    }

    let mut parts: Vec<String> = Vec::new();
    tree.visit(id, |child, node| match node.kind() {
        NodeKind::Footnote => Visit::SkipSubtree,
        NodeKind::Table => {
            let table = linearize_table(tree, child, TextStyle::STRIPPED);
            if !table.is_empty() {
                parts.push(table);
            }
            Visit::SkipSubtree
        }
        NodeKind::Text => {
            if let NodeData::Text(text) = node.data() {
                let text = text.trim();
                if !text.is_empty() {
                    parts.push(text.to_string());
                }
            }
            Visit::Descend
        }
        _ => Visit::Descend,
    });
    parts.join(" ")
}

/// Source line breaks inside a fragment carry no meaning.
fn single_line(fragment: &str) -> String {
    fragment.replace(['\r', '\n'], " ")
}
