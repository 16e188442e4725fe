// file: src/main.rs
// description: commandline application entry point
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind;
use sfm_orchestrator::utils::logging::{format_error, format_step, format_success, format_warning};
use sfm_orchestrator::config::DEFAULT_CONFIG_PATH;
use sfm_orchestrator::{Cli, Config, JsonExporter, PipelineOrchestrator, Stage, format_duration};
use std::path::Path;
use tracing::{error, info, warn};

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            println!("{}", Cli::usage());
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };

    sfm_orchestrator::utils::logging::init_logger(cli.color, cli.verbose);

    info!("Using input dir  : {}", cli.image_dir.display());
    info!("      output_dir : {}", cli.output_dir.display());

    let config_path = cli.config.as_deref().or_else(|| {
        let default = Path::new(DEFAULT_CONFIG_PATH);
        default.exists().then_some(default)
    });
    match config_path {
        Some(path) => info!("Loading configuration from: {}", path.display()),
        None => info!("No {} found, using built-in defaults", DEFAULT_CONFIG_PATH),
    }
    let config = Config::load(config_path).context("Failed to load configuration")?;

    let selection = cli.selection()?;

    let orchestrator = PipelineOrchestrator::new(&cli.image_dir, &cli.output_dir, &config)
        .context("Failed to prepare project layout")?
        .with_color(cli.color);

    if cli.dry_run {
        let plan = orchestrator.plan(&selection);
        for invocation in &plan {
            println!(
                "{}",
                format_step(
                    invocation.stage.index(),
                    Stage::ALL.len(),
                    &invocation.command_line()
                )
            );
        }
        return Ok(());
    }

    let report = orchestrator.execute(&selection)?;

    if config.pipeline.write_report {
        match JsonExporter::new(orchestrator.layout().output_dir())
            .and_then(|exporter| exporter.export_report(orchestrator.layout(), &report))
        {
            Ok(path) => info!("Report: {}", path.display()),
            Err(e) => warn!("{}", format_warning(&format!("Could not write run report: {}", e))),
        }
    }

    if let Err(e) = report.ensure_success() {
        error!("{}", format_error(&e.to_string()));
        return Err(e.into());
    }

    println!(
        "{}",
        format_success(&format!(
            "{} stage(s) completed in {}",
            report.completed(),
            format_duration(report.duration)
        ))
    );

    Ok(())
}
