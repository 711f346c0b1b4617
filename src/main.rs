use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use ilume_report::config::{self, config_dir, init_config, load_config, Config};
use ilume_report::error::{ReportError, Result};
use ilume_report::filter::{self, date_bounds, FilterContext};
use ilume_report::ingest::load_raw_table;
use ilume_report::preview::{render_summary, render_table};
use ilume_report::render::{assemble, OutputFormat};
use ilume_report::report::{default_columns, AgingSummary, PreparedReport, ReportContext};
use ilume_report::table::{normalize, RecordTable};

#[derive(Parser)]
#[command(name = "ilume-report")]
#[command(version, about = "Accounts-receivable reports from CSV and spreadsheet files", long_about = None)]
struct Cli {
    /// Path to config directory (default: XDG config dir or ~/.ilume-report)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
struct FilterArgs {
    /// Only rows due on or after this date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<String>,

    /// Only rows due on or before this date (YYYY-MM-DD)
    #[arg(long)]
    to: Option<String>,

    /// Only rows for this client (exact match)
    #[arg(long)]
    client: Option<String>,

    /// Only rows in this category (exact match)
    #[arg(long)]
    category: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a template config.toml
    Init,

    /// Print the aging summary and the filtered table in the terminal
    Preview {
        /// Input file (.csv, .xls, .xlsx, .xlsb or .ods)
        file: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        /// Column to show (can be repeated; default: standard report columns)
        #[arg(long = "column", value_name = "NAME")]
        columns: Vec<String>,

        /// Number of rows to show (default: all)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Print the aging summary
    Summary {
        /// Input file (.csv, .xls, .xlsx, .xlsb or .ods)
        file: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render the report document
    Report {
        /// Input file (.csv, .xls, .xlsx, .xlsb or .ods)
        file: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        /// Column to include (can be repeated; default: standard report columns)
        #[arg(long = "column", value_name = "NAME")]
        columns: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Pdf)]
        format: OutputFormat,

        /// Custom output file path (default: output dir/Relatorio_Ilume_<timestamp>.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Open the generated file with the system default viewer
        #[arg(long)]
        open: bool,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // An explicit -C must exist; the default location is optional.
    let cfg_dir = match cli.config_dir {
        Some(p) => {
            if !matches!(cli.command, Commands::Init) && !p.exists() {
                return Err(ReportError::ConfigNotFound(p));
            }
            p
        }
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Preview {
            file,
            filters,
            columns,
            limit,
        } => cmd_preview(&cfg_dir, &file, &filters, &columns, limit),
        Commands::Summary {
            file,
            filters,
            json,
        } => cmd_summary(&file, &filters, json),
        Commands::Report {
            file,
            filters,
            columns,
            format,
            output,
            open,
        } => cmd_report(&cfg_dir, &file, &filters, &columns, format, output, open),
    }
}

/// Initialize config directory
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    let path = init_config(cfg_dir)?;

    println!("Initialized ilume-report config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit company name and colors:  $EDITOR {}", path.display());
    println!();
    println!("Then render your first report:");
    println!("  ilume-report report contas.xlsx --from 2025-06-01 --to 2025-06-30");

    Ok(())
}

fn parse_date_arg(flag: &'static str, value: Option<&str>) -> Result<Option<NaiveDate>> {
    value
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| ReportError::InvalidDate {
                flag,
                value: s.to_string(),
            })
        })
        .transpose()
}

/// Build the filter context; a single given bound is completed from the data.
fn filter_context(args: &FilterArgs, table: &RecordTable) -> Result<FilterContext> {
    let mut from = parse_date_arg("from", args.from.as_deref())?;
    let mut to = parse_date_arg("to", args.to.as_deref())?;

    if from.is_some() != to.is_some() {
        if let Some((first, last)) = date_bounds(table) {
            from = from.or(Some(first));
            to = to.or(Some(last));
        }
    }

    Ok(FilterContext::new(
        from,
        to,
        args.client.clone(),
        args.category.clone(),
    ))
}

/// Load, normalize and filter the input file.
fn load_filtered(file: &Path, args: &FilterArgs) -> Result<(RecordTable, FilterContext)> {
    let table = normalize(&load_raw_table(file)?);
    let ctx = filter_context(args, &table)?;
    let filtered = filter::apply(&table, &ctx);
    debug!(
        "{} of {} row(s) left after filtering",
        filtered.len(),
        table.len()
    );
    Ok((filtered, ctx))
}

fn selected_columns(columns: &[String], table: &RecordTable) -> Vec<String> {
    if columns.is_empty() {
        default_columns(table)
    } else {
        columns.to_vec()
    }
}

fn cmd_preview(
    cfg_dir: &Path,
    file: &Path,
    args: &FilterArgs,
    columns: &[String],
    limit: Option<usize>,
) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let (table, filter) = load_filtered(file, args)?;
    let selected = selected_columns(columns, &table);
    let report = PreparedReport::prepare(&table, &filter, &selected, &ReportContext::now());

    println!("{}", config.branding.title);
    for line in &report.filter_lines {
        println!("  {line}");
    }
    println!();

    if let Some(summary) = &report.summary {
        println!("{}", render_summary(summary));
        println!();
    }

    println!("{}", render_table(&report, limit));
    if let Some(n) = limit.filter(|n| *n < report.rows.len()) {
        println!("Showing {n} of {} rows", report.rows.len());
    } else {
        println!("Total: {} rows", report.rows.len());
    }

    Ok(())
}

fn cmd_summary(file: &Path, args: &FilterArgs, json: bool) -> Result<()> {
    let (table, _) = load_filtered(file, args)?;
    let today = ReportContext::now().today;

    let Some(summary) = AgingSummary::compute(&table, today) else {
        println!("No amount or due-date column found; summary unavailable.");
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary.view())?);
    } else {
        println!("{}", render_summary(&summary));
    }

    Ok(())
}

fn cmd_report(
    cfg_dir: &Path,
    file: &Path,
    args: &FilterArgs,
    columns: &[String],
    format: OutputFormat,
    output: Option<PathBuf>,
    open: bool,
) -> Result<()> {
    let config: Config = load_config(cfg_dir)?;
    let (table, filter) = load_filtered(file, args)?;
    if table.is_empty() {
        return Err(ReportError::NoData);
    }

    let selected = selected_columns(columns, &table);
    let ctx = ReportContext::now();
    let document = assemble(&table, &filter, &selected, format, &ctx, &config.branding);

    let path = match output {
        Some(p) => p,
        None => config::resolve_output_dir(&config.output).join(&document.filename),
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, &document.bytes)?;

    println!("Generated {} report", format.extension().to_uppercase());
    println!("  Rows:   {}", table.len());
    println!("  Saved:  {}", path.display());

    if open {
        open_path(&path)?;
    }

    Ok(())
}

fn open_path(path: &Path) -> Result<()> {
    // Open with system default viewer
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(path).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(path).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", ""])
            .arg(path)
            .spawn()?;
    }
    Ok(())
}
