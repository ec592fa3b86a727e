use anyhow::{bail, Result};
use pomasa_core::config::Config;
use pomasa_core::creation::CreationRequest;
use pomasa_server::creation::{spawn_creation, CreateEvent};
use std::io::Write;
use std::path::Path;

pub struct CreateArgs<'a> {
    pub target: &'a str,
    pub name: &'a str,
    pub input: &'a Path,
    pub patterns: Option<&'a str>,
}

/// Run a creation headlessly: agent output to stdout, errors to stderr.
pub fn run(data_dir: &Path, args: CreateArgs<'_>) -> Result<()> {
    let config = Config::load(data_dir)?;
    let catalog = super::catalog_or_warn(data_dir);

    let request = CreationRequest {
        target_dir: args.target.to_string(),
        mas_name: args.name.to_string(),
        user_input: super::load_user_input(args.input)?,
        selected_patterns: super::selection(args.patterns, catalog.as_deref()),
    };
    let prepared = request.prepare(data_dir, catalog.as_deref())?;
    eprintln!("Creating MAS in {}", prepared.mas_path.display());

    let rt = tokio::runtime::Runtime::new()?;
    let code = rt.block_on(async move {
        let mut rx = spawn_creation(prepared, &config.agent);
        let mut stdout = std::io::stdout();
        let mut code = 1;
        loop {
            let event = tokio::select! {
                event = rx.recv() => event,
                _ = tokio::signal::ctrl_c() => {
                    eprintln!("interrupted");
                    break;
                }
            };
            match event {
                Some(CreateEvent::Output { content }) => {
                    print!("{content}");
                    let _ = stdout.flush();
                }
                Some(CreateEvent::Error { content }) => eprintln!("{content}"),
                Some(CreateEvent::Done { code: c, .. }) => code = c,
                None => break,
            }
        }
        code
    });

    if code != 0 {
        bail!("MAS creation did not complete");
    }
    Ok(())
}
