//! CLI subcommand handlers.

use crate::{Commands, FrameworksAction};
use ethica_core::report::ansi::{self, BOLD, CYAN, DIM, GREEN, RED, YELLOW};
use ethica_core::report::{TextOptions, render};
use ethica_core::validate::has_errors;
use ethica_core::{
    AggregateReport, CheckEngine, CheckRegistry, EthicaError, FrameworkRegistry, FrameworkSpec,
    IssueLevel, PROJECT_CONFIG_FILE, ProjectConfig, ReportFormat, Settings, Severity,
    init_project, validate_spec,
};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use unicode_width::UnicodeWidthStr;

/// Resolve the `--workspace` argument to an existing project directory.
pub fn resolve_workspace(path: &Path) -> anyhow::Result<PathBuf> {
    if !path.exists() {
        anyhow::bail!("Workspace directory not found: {}", path.display());
    }
    if !path.is_dir() {
        anyhow::bail!("Workspace is not a directory: {}", path.display());
    }
    Ok(path.canonicalize()?)
}

/// Resolved state shared by every subcommand.
pub struct Context {
    pub workspace: PathBuf,
    pub settings: Settings,
    /// Emit ANSI colors on stdout.
    pub color: bool,
}

impl Context {
    pub fn new(workspace: PathBuf, settings: Settings) -> Self {
        let color = settings.color && std::io::stdout().is_terminal();
        Self {
            workspace,
            settings,
            color,
        }
    }

    fn registry(&self) -> Result<FrameworkRegistry, EthicaError> {
        self.settings.open_registry()
    }

    fn paint(&self, code: &str, text: &str) -> String {
        ansi::paint(self.color, code, text)
    }

    /// Display a path relative to the workspace when it lives inside it.
    fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.workspace)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

/// Handle a CLI subcommand.
pub fn handle_command(command: Commands, ctx: &Context) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Init {
            framework,
            level,
            force,
        } => handle_init(ctx, framework, level, force),
        Commands::Check {
            framework,
            level,
            output,
            verbose,
            save,
        } => handle_check(
            ctx,
            CheckArgs {
                framework,
                level,
                output,
                verbose,
                save,
            },
        ),
        Commands::Frameworks { action } => handle_frameworks(action, ctx),
        Commands::Version => {
            println!("ethica version {}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn handle_init(
    ctx: &Context,
    framework: Option<String>,
    level: Option<String>,
    force: bool,
) -> anyhow::Result<ExitCode> {
    let registry = ctx.registry()?;
    let framework = framework.unwrap_or_else(|| ctx.settings.default_framework.clone());
    let level = level.unwrap_or_else(|| ctx.settings.default_level.clone());

    let outcome = init_project(&ctx.workspace, &registry, &framework, &level, force)?;

    println!(
        "{} Created {} with {} framework",
        ctx.paint(GREEN, "✓"),
        PROJECT_CONFIG_FILE,
        framework
    );
    for path in &outcome.created_templates {
        println!(
            "{} Created template: {}",
            ctx.paint(GREEN, "✓"),
            ctx.display_path(path)
        );
    }

    println!("\n{}", ctx.paint(BOLD, "Next steps:"));
    println!("1. Review and customize {PROJECT_CONFIG_FILE}");
    println!("2. Fill out template files in docs/");
    println!(
        "3. Run {} to verify compliance",
        ctx.paint(CYAN, "ethica check")
    );
    Ok(ExitCode::SUCCESS)
}

struct CheckArgs {
    framework: Option<String>,
    level: Option<String>,
    output: Option<ReportFormat>,
    verbose: bool,
    save: bool,
}

fn handle_check(ctx: &Context, args: CheckArgs) -> anyhow::Result<ExitCode> {
    let config = ProjectConfig::load(&ctx.workspace)?;
    let selection = config.selected_framework();

    let framework_id = args
        .framework
        .or_else(|| selection.map(|s| s.id.clone()))
        .ok_or(EthicaError::NoFrameworkSelected)?;
    let level = args
        .level
        .or_else(|| selection.map(|s| s.compliance_level.clone()))
        .unwrap_or_else(|| ctx.settings.default_level.clone());
    let format = args.output.unwrap_or(ctx.settings.output);

    let spec = ctx.registry()?.load_spec(&framework_id)?;

    if format == ReportFormat::Text {
        println!(
            "\nChecking against {} ({} level)...\n",
            ctx.paint(CYAN, &framework_id),
            level
        );
    }

    let engine = CheckEngine::with_registry(
        &spec,
        &CheckRegistry::with_defaults(),
        &config.exclude_checks,
    );
    let report = engine.run_checks(&ctx.workspace);
    info!(
        framework = %framework_id,
        status = %report.overall_status,
        passed = report.checks_passed,
        total = report.total_checks,
        "Compliance check finished"
    );

    let options = TextOptions {
        verbose: args.verbose,
        color: ctx.color,
    };
    let rendered = render(&report, format, &spec.principles, &options)?;
    println!("{}", rendered.trim_end());

    if args.save {
        for path in save_reports(ctx, &config, &spec, &report)? {
            eprintln!("Saved report: {}", ctx.display_path(&path));
        }
    }

    if report.has_blocking_failures() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Write the report once per configured format into the output directory.
fn save_reports(
    ctx: &Context,
    config: &ProjectConfig,
    spec: &FrameworkSpec,
    report: &AggregateReport,
) -> anyhow::Result<Vec<PathBuf>> {
    let output_dir = ctx.workspace.join(&config.reporting.output_dir);
    std::fs::create_dir_all(&output_dir)?;

    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let options = TextOptions {
        verbose: true,
        color: false,
    };

    let mut written = Vec::with_capacity(config.reporting.formats.len());
    for format in &config.reporting.formats {
        let path = output_dir.join(format!(
            "{}-{}.{}",
            report.framework_id,
            stamp,
            format.extension()
        ));
        let rendered = render(report, *format, &spec.principles, &options)?;
        std::fs::write(&path, rendered)?;
        debug!(path = %path.display(), format = %format, "Saved report");
        written.push(path);
    }
    Ok(written)
}

fn handle_frameworks(action: FrameworksAction, ctx: &Context) -> anyhow::Result<ExitCode> {
    match action {
        FrameworksAction::List => {
            let registry = ctx.registry()?;
            if registry.list().is_empty() {
                println!("{}", ctx.paint(YELLOW, "No frameworks found"));
                return Ok(ExitCode::SUCCESS);
            }

            let rows: Vec<Vec<String>> = registry
                .list()
                .iter()
                .map(|fw| {
                    vec![
                        fw.id.clone(),
                        fw.name.clone(),
                        fw.version_or_na().to_string(),
                        fw.category.clone(),
                        fw.status_or_default().to_string(),
                    ]
                })
                .collect();

            println!("{}\n", ctx.paint(BOLD, "Available Ethics Frameworks"));
            print!(
                "{}",
                format_table(&["ID", "Name", "Version", "Category", "Status"], &rows)
            );
            println!(
                "\nUse {} for detailed information",
                ctx.paint(CYAN, "ethica frameworks info <id>")
            );
            Ok(ExitCode::SUCCESS)
        }
        FrameworksAction::Info { id } => {
            let spec = ctx.registry()?.load_spec(&id)?;
            print_framework_info(ctx, &spec);
            Ok(ExitCode::SUCCESS)
        }
        FrameworksAction::Validate { file } => {
            if !file.exists() {
                anyhow::bail!("File not found: {}", file.display());
            }
            let spec = FrameworkSpec::from_path(&file)?;
            let issues = validate_spec(&spec, &CheckRegistry::with_defaults());

            for issue in &issues {
                let color = match issue.level {
                    IssueLevel::Error => RED,
                    IssueLevel::Warning => YELLOW,
                };
                println!("  {} {}", ctx.paint(color, &format!("{}:", issue.level)), issue.message);
            }

            if has_errors(&issues) {
                println!(
                    "\n{} {} is not a valid framework specification",
                    ctx.paint(RED, "✗"),
                    file.display()
                );
                return Ok(ExitCode::FAILURE);
            }
            println!(
                "{}{} {} is valid ({} principles, {} checks)",
                if issues.is_empty() { "" } else { "\n" },
                ctx.paint(GREEN, "✓"),
                file.display(),
                spec.principles.len(),
                spec.checks.len()
            );
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_framework_info(ctx: &Context, spec: &FrameworkSpec) {
    let meta = &spec.metadata;
    println!("\n{}", ctx.paint(BOLD, &ctx.paint(CYAN, &meta.name)));
    if !meta.description.is_empty() {
        println!("{}", ctx.paint(DIM, meta.description.trim()));
    }
    println!();
    println!("{} {}", ctx.paint(BOLD, "Version:"), meta.version);
    println!("{} {}", ctx.paint(BOLD, "ID:"), meta.id);
    println!(
        "{} {}",
        ctx.paint(BOLD, "License:"),
        meta.license.as_deref().unwrap_or("N/A")
    );
    println!(
        "{} {}",
        ctx.paint(BOLD, "Maintainer:"),
        meta.maintainer.as_deref().unwrap_or("N/A")
    );
    if let Some(url) = &meta.source_url {
        println!("{} {}", ctx.paint(BOLD, "Source:"), url);
    }

    println!(
        "\n{}",
        ctx.paint(BOLD, &format!("Principles ({}):", spec.principles.len()))
    );
    for principle in &spec.principles {
        println!("  • {} ({})", ctx.paint(CYAN, &principle.name), principle.weight);
    }

    println!(
        "\n{}",
        ctx.paint(BOLD, &format!("Checks ({} total):", spec.checks.len()))
    );
    println!(
        "  • Required (errors): {}",
        spec.count_by_severity(Severity::Error)
    );
    println!(
        "  • Recommended (warnings): {}",
        spec.count_by_severity(Severity::Warning)
    );
    let informational = spec.count_by_severity(Severity::Info);
    if informational > 0 {
        println!("  • Informational: {informational}");
    }

    if let Some(levels) = &spec.compliance_levels {
        println!("\n{}", ctx.paint(BOLD, "Compliance Levels:"));
        for level in levels.values() {
            println!("  • {}: {}", ctx.paint(CYAN, &level.name), level.description);
        }
    }
}

/// Left-aligned plain-text table with a header rule, sized by display width.
fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let mut out = table_line(headers.iter().copied(), &widths);
    out.push_str(&table_line(rule.iter().map(String::as_str), &widths));
    for row in rows {
        out.push_str(&table_line(row.iter().map(String::as_str), &widths));
    }
    out
}

fn table_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| format!("{cell}{}", " ".repeat(width.saturating_sub(cell.width()))))
        .collect();
    format!("{}\n", padded.join("  ").trim_end())
}
