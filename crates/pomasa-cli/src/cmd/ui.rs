use anyhow::Result;
use pomasa_core::config::{Config, WarnLevel};
use std::path::Path;

pub fn run(data_dir: &Path, port: Option<u16>, no_open: bool) -> Result<()> {
    let config = Config::load(data_dir)?;

    for w in config.validate() {
        let label = match w.level {
            WarnLevel::Warning => "warning",
            WarnLevel::Error => "error",
        };
        eprintln!("{label}: {}", w.message);
    }

    let port = port.unwrap_or(config.server.port);
    let open_browser = config.server.open_browser && !no_open;

    let rt = tokio::runtime::Runtime::new()?;
    let data_dir = data_dir.to_path_buf();

    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
        let actual_port = listener.local_addr()?.port();
        println!(
            "POMASA UI → http://localhost:{actual_port}  (framework: {})",
            data_dir.display()
        );

        tokio::select! {
            res = pomasa_server::serve_on(data_dir, config, listener, open_browser) => res,
            _ = tokio::signal::ctrl_c() => Ok(()),
        }
    })
}
