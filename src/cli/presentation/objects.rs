//! Object presentation: show and list, text and json.

use crate::object::{FramedObject, ObjectKind};
use crate::store::ObjectSummary;
use crate::tree::Tree;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;

/// Format a section heading in bold.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold())
}

/// Header lines plus the decoded body of an object.
///
/// Tree payloads that fail to decode are reported instead of shown.
pub fn format_object_text(object: &FramedObject) -> String {
    let mut out = format!(
        "hash: {}\ntype: {}\nsize: {}\n\n",
        object.id(),
        object.kind(),
        object.size()
    );

    match object.kind() {
        ObjectKind::Tree => match Tree::decode(object.payload()) {
            Ok(tree) if tree.is_empty() => out.push_str("(empty tree)"),
            Ok(tree) => {
                out.push_str(&format!("{}\n", format_section_heading("Entries")));
                out.push_str(&tree_table(&tree).to_string());
            }
            Err(e) => out.push_str(&format!("(unreadable tree: {})", e)),
        },
        ObjectKind::Blob | ObjectKind::Commit => {
            out.push_str(&String::from_utf8_lossy(object.payload()));
        }
    }
    out
}

pub fn format_object_json(object: &FramedObject) -> String {
    let mut out = json!({
        "hash": object.id(),
        "type": object.kind(),
        "size": object.size(),
    });
    match object.kind() {
        ObjectKind::Tree => match Tree::decode(object.payload()) {
            Ok(tree) => {
                let entries: Vec<_> = tree
                    .entries()
                    .iter()
                    .map(|e| {
                        json!({
                            "mode": e.mode.as_octal(),
                            "type": e.kind(),
                            "name": e.name,
                            "hash": e.id,
                        })
                    })
                    .collect();
                out["entries"] = json!(entries);
            }
            Err(e) => out["error"] = json!(e.to_string()),
        },
        ObjectKind::Blob | ObjectKind::Commit => {
            out["content"] = json!(String::from_utf8_lossy(object.payload()));
        }
    }
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}

fn tree_table(tree: &Tree) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Mode", "Type", "Name", "Hash"]);
    for entry in tree.entries() {
        table.add_row(vec![
            entry.mode.as_octal().to_string(),
            entry.kind().to_string(),
            entry.name.clone(),
            entry.id.short(),
        ]);
    }
    table
}

pub fn format_object_list_text(objects: &[ObjectSummary]) -> String {
    if objects.is_empty() {
        return "No objects stored.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Type", "Hash", "Size"]);
    for summary in objects {
        table.add_row(vec![
            summary.kind.to_string(),
            summary.id.to_hex(),
            summary.size.to_string(),
        ]);
    }
    format!("{}\n\nTotal: {} object(s)", table, objects.len())
}

pub fn format_object_list_json(objects: &[ObjectSummary]) -> String {
    let out = json!({ "objects": objects, "total": objects.len() });
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}

/// Message for listing a workspace that has no store yet.
pub fn format_store_not_initialized() -> String {
    "No object store found. Run `gut start` to create one.".to_string()
}
