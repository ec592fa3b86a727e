use anyhow::Result;
use pomasa_core::catalog;
use std::path::Path;

/// Print the `user_input.md` that `create` would write, without touching disk.
pub fn run(data_dir: &Path, input: &Path, patterns: Option<&str>) -> Result<()> {
    let mut user_input = super::load_user_input(input)?;
    user_input.dedup_references();

    let catalog = super::catalog_or_warn(data_dir);
    let selected = super::selection(patterns, catalog.as_deref());
    let selected = catalog::enforce_required(catalog.as_deref().unwrap_or_default(), &selected);

    print!("{}", user_input.render(&selected));
    Ok(())
}
