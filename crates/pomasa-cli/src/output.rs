use pomasa_core::tree::FileNode;
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

/// Lay out rows under headers with columns padded to the widest cell.
pub fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<String>| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let w = widths.get(i).copied().unwrap_or(0);
                format!("{cell:w$}")
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = Vec::with_capacity(rows.len() + 2);
    out.push(line(headers.iter().map(|h| h.to_string()).collect()));
    out.push(line(widths.iter().map(|&w| "-".repeat(w)).collect()));
    for row in rows {
        out.push(line(row.clone()));
    }
    out.join("\n")
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    println!("{}", format_table(headers, &rows));
}

/// Render a file tree with box-drawing connectors, directories suffixed `/`.
pub fn format_tree(nodes: &[FileNode]) -> String {
    fn walk(nodes: &[FileNode], prefix: &str, out: &mut Vec<String>) {
        for (i, node) in nodes.iter().enumerate() {
            let last = i + 1 == nodes.len();
            let branch = if last { "└── " } else { "├── " };
            let suffix = if node.is_dir() { "/" } else { "" };
            out.push(format!("{prefix}{branch}{}{suffix}", node.name));
            if let Some(children) = &node.children {
                let next = format!("{prefix}{}", if last { "    " } else { "│   " });
                walk(children, &next, out);
            }
        }
    }

    let mut out = Vec::new();
    walk(nodes, "", &mut out);
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pomasa_core::tree::NodeType;
    use std::path::PathBuf;

    fn file(name: &str) -> FileNode {
        FileNode {
            name: name.into(),
            path: PathBuf::from(name),
            node_type: NodeType::File,
            children: None,
        }
    }

    #[test]
    fn table_pads_columns() {
        let table = format_table(
            &["ID", "NAME"],
            &[vec!["COR-01".into(), "Prompt-Defined Agent".into()]],
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "ID      NAME");
        assert_eq!(lines[1], "------  --------------------");
        assert_eq!(lines[2], "COR-01  Prompt-Defined Agent");
    }

    #[test]
    fn tree_draws_nested_levels() {
        let agents = FileNode {
            name: "agents".into(),
            path: PathBuf::from("agents"),
            node_type: NodeType::Directory,
            children: Some(vec![file("00_orchestrator.md"), file("01_collector.md")]),
        };
        let rendered = format_tree(&[agents, file("user_input.md")]);
        assert_eq!(
            rendered,
            "├── agents/\n│   ├── 00_orchestrator.md\n│   └── 01_collector.md\n└── user_input.md"
        );
    }
}
