//! Command dispatch and handlers

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_dir, global_config_path, Settings};
use crate::domain::{model_tree, Field, FieldKind};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Commands::Convert {
            source,
            output,
            dump_model,
            keep_work_dir,
        } => {
            let mut settings = load_settings(cli)?;
            settings.dump_model |= *dump_model;
            cmd_convert(&ServiceContainer::new(settings), source, output, *keep_work_dir)
        }
        Commands::Inspect { source } => {
            let settings = load_settings(cli)?;
            cmd_inspect(&ServiceContainer::new(settings), source)
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => cmd_config_show(cli),
            ConfigCommands::Init { force } => cmd_config_init(*force),
            ConfigCommands::Path => cmd_config_path(),
        },
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let settings = Settings::load(cli.config.as_deref())?;
    debug!("Effective settings: {:?}", settings);
    Ok(settings)
}

#[instrument(skip(container))]
fn cmd_convert(
    container: &ServiceContainer,
    source: &Path,
    dest: &Path,
    keep_work_dir: bool,
) -> CliResult<()> {
    let report = container
        .convert_service()
        .convert(source, dest, keep_work_dir)?;

    output::action("Language", &report.language);
    output::success(&format!(
        "Wrote {} presets and {} fields to {}",
        report.written.presets,
        report.written.fields,
        report.dest.display()
    ));
    output::success_detail(&format!(
        "{} icons x {} sizes",
        report.written.icons.copied.len(),
        container.settings.icons.sizes.len()
    ));
    for preset in &report.written.icons.skipped {
        output::failure(&format!("no icon for preset '{preset}'"));
    }
    for unresolved in &report.unresolved {
        output::warning(&format!(
            "{unresolved}: no attribute configuration, field skipped"
        ));
    }
    if let Some(file) = &report.written.raw_model {
        output::detail(&format!("raw model: {}", file.display()));
    }
    if let Some(dir) = &report.kept_work_dir {
        output::detail(&format!("work directory kept: {}", dir.display()));
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_inspect(container: &ServiceContainer, source: &Path) -> CliResult<()> {
    let loaded = container.convert_service().load(source, false)?;
    let out = &loaded.output;

    output::action("Model", &loaded.model_path.display());
    output::action("Project key", &loaded.project_key);
    output::info(&model_tree(&out.model));

    output::header(&format!("Presets ({})", out.presets.len()));
    for preset in &out.presets {
        let id = preset.id().unwrap_or_default();
        let icon = preset.icon.as_deref().unwrap_or("-");
        output::detail(&format!(
            "{id}: {} (icon: {icon}, fields: {})",
            preset.name,
            preset.fields.join(", ")
        ));
    }

    output::header(&format!("Fields ({})", out.fields.len()));
    for field in &out.fields {
        output::detail(&describe_field(field));
    }

    for unresolved in &out.unresolved {
        output::warning(unresolved);
    }
    Ok(())
}

fn describe_field(field: &Field) -> String {
    let kind = match &field.kind {
        FieldKind::Number {
            min_value,
            max_value,
        } => {
            let bound = |b: &Option<i64>| b.map(|v| v.to_string()).unwrap_or_default();
            format!("number [{}..{}]", bound(min_value), bound(max_value))
        }
        FieldKind::SelectOne { options } => format!("select_one ({} options)", options.len()),
        FieldKind::Text => "text".to_string(),
    };
    format!("{}: {} ({})", field.key, field.label, kind)
}

fn cmd_config_show(cli: &Cli) -> CliResult<()> {
    let settings = load_settings(cli)?;
    output::info(&settings.to_toml()?);
    Ok(())
}

fn cmd_config_init(force: bool) -> CliResult<()> {
    let (Some(dir), Some(path)) = (global_config_dir(), global_config_path()) else {
        return Err(CliError::Usage(
            "cannot determine config directory for this platform".into(),
        ));
    };
    if path.exists() && !force {
        return Err(CliError::Usage(format!(
            "config already exists: {} (use --force to overwrite)",
            path.display()
        )));
    }

    std::fs::create_dir_all(&dir).map_err(|e| InfraError::io("create config directory", e))?;
    std::fs::write(&path, Settings::template())
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
    output::success(&format!("Created {}", path.display()));
    Ok(())
}

fn cmd_config_path() -> CliResult<()> {
    match global_config_path() {
        Some(path) => {
            let state = if path.exists() { "exists" } else { "not found" };
            output::action("Global", &format!("{} ({state})", path.display()));
        }
        None => output::action("Global", &"unavailable"),
    }
    Ok(())
}
