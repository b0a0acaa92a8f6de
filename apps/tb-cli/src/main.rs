use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;
use tb_analysis::ReductionPolicy;
use tb_app::{
    AppResult, BatchOptions, BatchProgressEvent, BatchStage, inspect_recording, load_policy,
    reduce_batch,
};
use tb_core::{Reading, Real};
use tb_results::{SummaryTable, export_json, format_duration};
use tb_series::DEFAULT_SKIP_ROWS;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tb-cli")]
#[command(about = "ThermoBench CLI - reduce warmer bench recordings to summary rows", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reduce recordings and append them to a summary table
    Reduce {
        /// Recording CSV files; each file name is its run label
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Summary table CSV to append to (created if missing)
        #[arg(short, long)]
        output: PathBuf,
        /// Reduction policy YAML file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Leading rows above the column header
        #[arg(long, default_value_t = DEFAULT_SKIP_ROWS)]
        skip_rows: usize,
        /// Reduce runs in parallel
        #[arg(long)]
        parallel: bool,
        /// Write <stem>.summary.csv next to each recording
        #[arg(long)]
        sidecar: bool,
        /// Reprocess runs already present in the table
        #[arg(long)]
        force: bool,
        /// Also export the appended records as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Parse a run label and print its parameters
    ParseLabel {
        /// Label or file name, e.g. "92ml_m 10C battA4 disp6"
        label: String,
    },
    /// Show sampling and detected events for a recording
    Inspect {
        /// Recording CSV file
        input: PathBuf,
        /// Reduction policy YAML file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Leading rows above the column header
        #[arg(long, default_value_t = DEFAULT_SKIP_ROWS)]
        skip_rows: usize,
    },
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Reduce {
            inputs,
            output,
            config,
            skip_rows,
            parallel,
            sidecar,
            force,
            json,
        } => {
            let options = BatchOptions {
                policy: policy_from(config.as_deref())?,
                skip_rows,
                parallel,
                skip_processed: !force,
                write_sidecar: sidecar,
            };
            cmd_reduce(&inputs, &output, &options, json.as_deref())
        }
        Commands::ParseLabel { label } => cmd_parse_label(&label),
        Commands::Inspect {
            input,
            config,
            skip_rows,
        } => cmd_inspect(&input, &policy_from(config.as_deref())?, skip_rows),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn policy_from(config: Option<&Path>) -> AppResult<ReductionPolicy> {
    match config {
        Some(path) => load_policy(path),
        None => Ok(ReductionPolicy::default()),
    }
}

fn cmd_reduce(
    inputs: &[PathBuf],
    output: &Path,
    options: &BatchOptions,
    json: Option<&Path>,
) -> AppResult<()> {
    println!(
        "Reducing {} recording(s) into {}",
        inputs.len(),
        output.display()
    );
    let mut table = SummaryTable::open(output)?;

    let last_emit = Mutex::new(None::<Instant>);
    let on_progress = |event: BatchProgressEvent| {
        let mut last = last_emit.lock().unwrap_or_else(|e| e.into_inner());
        let due = last.is_none_or(|t| t.elapsed().as_millis() >= 100);
        if due || matches!(event.stage, BatchStage::Completed) {
            render_cli_progress(&event);
            *last = Some(Instant::now());
        }
    };
    let report = reduce_batch(inputs, &mut table, options, Some(&on_progress))?;
    clear_progress_line();

    println!("✓ Appended {} run(s)", report.runs.len());
    for run in &report.runs {
        let record = &run.record;
        println!(
            "  {}  startup={}  delivery={}  battery={}  fluid={} mL",
            record.source_label,
            show_duration(record.startup_s),
            show_duration(record.sustained_delivery_s),
            show_duration(record.battery_s),
            record.fluid_infused_ml
        );
        if !run.reached_operating_temp {
            println!("    never reached {:.1} °C", options.policy.operating_temp_c);
        }
        if let Some(sampling) = run.sampling.filter(|s| !s.is_uniform()) {
            println!(
                "    irregular sampling: {} step(s), max deviation {:.1}%",
                sampling.irregular_steps,
                sampling.max_deviation_rel * 100.0
            );
        }
        for outcome in &run.outcomes {
            println!("    {}", outcome);
        }
    }
    if !report.duplicates.is_empty() {
        println!("Already summarised ({}):", report.duplicates.len());
        for path in &report.duplicates {
            println!("  {}", path.display());
        }
    }
    if !report.skipped.is_empty() {
        println!("Skipped ({}):", report.skipped.len());
        for skipped in &report.skipped {
            println!("  {}: {}", skipped.input.display(), skipped.reason);
        }
    }

    if let Some(path) = json {
        let records = report.records();
        export_json(path, &records)?;
        println!(
            "✓ Exported {} record(s) to {}",
            records.len(),
            path.display()
        );
    }
    Ok(())
}

fn cmd_parse_label(label: &str) -> AppResult<()> {
    let params = tb_label::parse_label(label).map_err(tb_app::RunError::from)?;
    println!("Flow rate:   {} mL/min", params.flow_rate_ml_min);
    println!("Target temp: {} °C", params.target_temp_c);
    println!("Battery:     {}", params.battery_id);
    println!("Disposable:  {}", params.disposable_id.as_deref().unwrap_or("-"));
    println!("Unit:        {}", params.unit_id.as_deref().unwrap_or("-"));
    println!("Trial:       {}", params.trial_id.as_deref().unwrap_or("-"));
    println!("Canonical:   {}", params);
    Ok(())
}

fn cmd_inspect(input: &Path, policy: &ReductionPolicy, skip_rows: usize) -> AppResult<()> {
    let report = inspect_recording(input, skip_rows, policy)?;

    println!("Recording: {}", input.display());
    println!("  Started:   {}", report.started_at);
    println!("  Samples:   {}", report.samples);
    println!("  Duration:  {}", format_duration(report.duration_s));
    println!(
        "  Reservoir: {}",
        if report.has_reservoir { "yes" } else { "no" }
    );
    match report.sampling.interval_s {
        Some(interval) => println!(
            "  Interval:  {:.3} s ({} irregular step(s), max deviation {:.1}%)",
            interval,
            report.sampling.irregular_steps,
            report.sampling.max_deviation_rel * 100.0
        ),
        None => println!("  Interval:  -"),
    }
    println!("  Peak:      {:.2} °C", report.peak_c);
    println!("  Startup:   {}", show_duration(report.startup_s));
    println!("  Delivery:  {}", show_duration(report.delivery_s));
    println!("  Battery:   {}", show_duration(report.battery_s));
    Ok(())
}

fn show_duration(reading: Reading<Real>) -> String {
    match reading {
        Reading::Value(secs) => format_duration(secs),
        other => other.to_string(),
    }
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(120));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &BatchProgressEvent) {
    let width = 28usize;
    let fraction = event.fraction_complete();
    let filled = ((fraction * width as f64).round() as usize).min(width);
    let bar = format!(
        "{}{}",
        "#".repeat(filled),
        "-".repeat(width.saturating_sub(filled))
    );
    let mut line = format!(
        "\r[{}] {}/{}  {}  elapsed={:.1}s",
        bar,
        event.finished,
        event.total,
        event.stage.label(),
        event.elapsed_wall_s
    );
    if let Some(name) = event.input.as_deref().and_then(Path::file_name) {
        line.push_str(&format!("  {}", name.to_string_lossy()));
    }
    print!("{}", line);
    let _ = io::stdout().flush();
}
