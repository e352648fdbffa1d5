use crate::cli::{InitArgs, ServeArgs, ShowArgs, SourceArgs};
use crate::config::Config;
use crate::filter::{SeverityFilter, Summary, ViewFilter};
use crate::render::{format_report_list, format_violations};
use crate::server::{self, AppState};
use crate::store::ReportStore;
use crate::types::ReportFile;
use anyhow::{Context, bail};
use std::path::Path;
use tracing::{debug, info};

/// Write a default config file
pub fn init(args: &InitArgs) -> anyhow::Result<()> {
    if Path::new(&args.config).exists() && !args.r#override {
        bail!(
            "Config file {} already exists (use --override to replace it)",
            args.config
        );
    }
    std::fs::write(&args.config, Config::default().to_toml()?)
        .with_context(|| format!("Failed to write config file {}", args.config))?;
    info!("Config written to {}", args.config);
    Ok(())
}

pub async fn serve(args: &ServeArgs) -> anyhow::Result<()> {
    let mut config = load_config(&args.source)?;
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    let store = open_store(&config)?;
    server::serve(AppState::new(store), &config.server.host, config.server.port).await
}

pub async fn list(args: &SourceArgs) -> anyhow::Result<()> {
    let config = load_config(args)?;
    let store = open_store(&config)?;
    let entries = store.list().await?;
    info!("Found {} reports in {}", entries.len(), store.dir().display());
    for line in format_report_list(&entries).lines() {
        info!("{}", line);
    }
    Ok(())
}

pub async fn show(args: &ShowArgs) -> anyhow::Result<()> {
    let config = load_config(&args.source)?;
    let store = open_store(&config)?;
    let severity: SeverityFilter = args.severity.parse()?;

    let filename = match &args.filename {
        Some(f) => f.clone(),
        None => store.latest_filename().await?,
    };
    debug!("Showing report {}", filename);
    let ReportFile { report } = store.read_typed(&filename).await?;

    let summary = Summary::from_violations(&report.violations);
    let shown = ViewFilter::new(severity, args.search.as_str()).apply(&report.violations);
    let name = if report.metadata.file_name.is_empty() {
        filename.as_str()
    } else {
        report.metadata.file_name.as_str()
    };

    match &args.output {
        Some(path) => {
            let content = if path.ends_with(".json") {
                let output = serde_json::json!({
                    "filename": filename,
                    "metadata": report.metadata,
                    "summary": summary,
                    "violations": shown,
                });
                serde_json::to_string_pretty(&output)?
            } else if path.ends_with(".md") {
                format_violations(name, &summary, &shown)
            } else {
                bail!("Output file must end with .md or .json");
            };
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write output file {}", path))?;
            info!("Results written to {}", path);
        }
        None => {
            for line in format_violations(name, &summary, &shown).lines() {
                info!("{}", line);
            }
        }
    }
    Ok(())
}

pub fn schema() -> anyhow::Result<()> {
    let schema = schemars::schema_for!(ReportFile);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn load_config(args: &SourceArgs) -> anyhow::Result<Config> {
    let mut config = Config::load(&args.config, &args.config_overrides)?;
    if let Some(dir) = &args.reports_dir {
        config.reports.dir = dir.clone();
    }
    Ok(config)
}

fn open_store(config: &Config) -> anyhow::Result<ReportStore> {
    ReportStore::new(&config.reports.dir, &config.reports.pattern)
}
