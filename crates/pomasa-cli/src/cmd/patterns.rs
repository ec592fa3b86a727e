use crate::output::{print_json, print_table};
use anyhow::Result;
use pomasa_core::catalog;
use std::path::Path;

pub fn run(data_dir: &Path, json: bool) -> Result<()> {
    let patterns = catalog::load_catalog(data_dir)?;

    if json {
        return print_json(&patterns);
    }

    if patterns.is_empty() {
        println!("No patterns found in {}", data_dir.display());
        return Ok(());
    }

    let rows = patterns
        .iter()
        .map(|p| {
            vec![
                p.id.clone(),
                p.necessity.to_string(),
                p.name.clone(),
                p.description.clone(),
            ]
        })
        .collect();
    print_table(&["ID", "NECESSITY", "NAME", "DESCRIPTION"], rows);
    Ok(())
}
