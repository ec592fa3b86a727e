use crate::output::{format_tree, print_json};
use anyhow::Result;
use pomasa_core::{paths, tree};

pub fn run(path: &str, json: bool) -> Result<()> {
    let info = tree::describe_dir(&paths::expand_home(path))?;

    if json {
        return print_json(&info);
    }

    println!("{}/", info.name);
    let body = format_tree(&info.tree);
    if !body.is_empty() {
        println!("{body}");
    }
    Ok(())
}
