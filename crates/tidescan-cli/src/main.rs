use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use glob::glob;
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use tidescan_core::{
    ByteSource, ConfigError, ExtractionWindow, FormatTag, InputInfo, PingParams, PingRecord,
    SampleType, ScanError, ScanOptions, ScanReport, Selection, SontekSections, TimeWindow,
    ToolInfo, Validity, WindowError, decode_pings, make_stub_report, scan_bytes,
};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (rev ",
    env!("TIDESCAN_BUILD_REVISION"),
    ", ",
    env!("TIDESCAN_BUILD_TARGET"),
    ", ",
    env!("TIDESCAN_BUILD_PROFILE"),
    ")"
);

const EXAMPLES: &str = "Examples:\n  tidescan scan deployment.ad2cp --format ad2cp -o report.json\n  tidescan scan 'raw/*.000' --format rdi --from 10 --to 99 --by 10 --stdout\n  tidescan scan profile.adp --format sontek --ctd --gps --strict -o report.json\n  tidescan ping survey.ad2cp --format ad2cp --channels 2 --samples 512 --sample-type i16 --stdout";

#[derive(Parser, Debug)]
#[command(name = "tidescan")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Locate, validate and index frames in raw oceanographic instrument files.",
    long_about = None,
    after_help = EXAMPLES
)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan a raw file and write a JSON report of the selected records.
    Scan {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// Exit with a non-zero code if invalid records were found
        #[arg(long)]
        strict: bool,

        /// List invalid records after scanning
        #[arg(long)]
        list_invalid: bool,
    },
    /// Decode the selected records as echo-sounder pings.
    Ping {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        ping: PingArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Path (or glob matching one file) of a raw instrument file
    input: PathBuf,

    /// Frame family recorded in the file
    #[arg(short, long, value_enum)]
    format: FormatArg,

    /// First valid record to select (0-based)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true, conflicts_with_all = ["since", "until"])]
    from: i64,

    /// Last valid record to select (inclusive; default: last record)
    #[arg(long, allow_negative_numbers = true, conflicts_with_all = ["since", "until"])]
    to: Option<i64>,

    /// Select every N-th record of the window
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    by: i64,

    /// Select records stamped at or after this RFC3339 time
    #[arg(long, requires = "until")]
    since: Option<String>,

    /// Select records stamped at or before this RFC3339 time
    #[arg(long, requires = "since")]
    until: Option<String>,

    /// Profiles carry a CTD section (sontek)
    #[arg(long)]
    ctd: bool,

    /// Profiles carry a GPS section (sontek)
    #[arg(long)]
    gps: bool,

    /// Profiles carry a bottom-track section (sontek)
    #[arg(long)]
    bottom_track: bool,

    /// Profiles carry a pulse-coherent section (sontek)
    #[arg(long)]
    pcadp: bool,

    /// Stop after this many valid records
    #[arg(long)]
    max: Option<usize>,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output report path (JSON)
    #[arg(short = 'o', long, required_unless_present = "stdout")]
    report: Option<PathBuf>,

    /// Write JSON report to stdout
    #[arg(long, conflicts_with = "report")]
    stdout: bool,

    /// Pretty-print JSON output
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,

    /// Compact JSON output (default)
    #[arg(long)]
    compact: bool,

    /// Suppress non-error output
    #[arg(long)]
    quiet: bool,
}

#[derive(Args, Debug)]
struct PingArgs {
    /// Channels per ping
    #[arg(long)]
    channels: usize,

    /// Samples per channel
    #[arg(long)]
    samples: usize,

    /// Wire sample type
    #[arg(long, value_enum)]
    sample_type: SampleTypeArg,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Ad2cp,
    Rdi,
    Sontek,
}

impl From<FormatArg> for FormatTag {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Ad2cp => FormatTag::Ad2cp,
            FormatArg::Rdi => FormatTag::Rdi,
            FormatArg::Sontek => FormatTag::Sontek,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SampleTypeArg {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    F32,
    Compressed,
}

impl From<SampleTypeArg> for SampleType {
    fn from(arg: SampleTypeArg) -> Self {
        match arg {
            SampleTypeArg::U8 => SampleType::U8,
            SampleTypeArg::I8 => SampleType::I8,
            SampleTypeArg::U16 => SampleType::U16,
            SampleTypeArg::I16 => SampleType::I16,
            SampleTypeArg::U32 => SampleType::U32,
            SampleTypeArg::I32 => SampleType::I32,
            SampleTypeArg::F32 => SampleType::F32,
            SampleTypeArg::Compressed => SampleType::Compressed,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Scan {
            input,
            output,
            strict,
            list_invalid,
        } => cmd_scan(input, output, strict, list_invalid),
        Commands::Ping {
            input,
            ping,
            output,
        } => cmd_ping(input, ping, output),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

impl From<ScanError> for CliError {
    fn from(err: ScanError) -> Self {
        let hint = match &err {
            ScanError::Configuration(ConfigError::SectionNotInstalled { .. }) => {
                Some("pass only the section flags (--ctd/--gps/--bottom-track/--pcadp) the deployment recorded".to_string())
            }
            ScanError::Configuration(ConfigError::Ping(_)) => {
                Some("check --channels, --samples and --sample-type against the instrument setup".to_string())
            }
            ScanError::Configuration(_) => None,
            ScanError::Source(_) => Some("check the input path and permissions".to_string()),
            ScanError::OutOfRange(_) => Some("this is a bug; please report it with the input file".to_string()),
        };
        CliError::new(err.to_string(), hint)
    }
}

fn cmd_scan(
    input: InputArgs,
    output: OutputArgs,
    strict: bool,
    list_invalid: bool,
) -> Result<(), CliError> {
    let resolved_input = prepare_paths(&input.input, &output)?;
    let options = scan_options(&input)?;
    let format = FormatTag::from(input.format);

    let source = ByteSource::map(&resolved_input).map_err(ScanError::from)?;
    let rep = scan_bytes(
        &resolved_input.display().to_string(),
        source.as_bytes(),
        format,
        &options,
    )?;
    let json = serialize_report(&rep, output.pretty, output.compact)?;
    emit(&json, &output)?;

    if list_invalid && !output.quiet {
        print_invalid(&rep);
    }
    if strict && has_invalid(&rep) {
        return Err(CliError::new(
            format!(
                "invalid records detected ({} checksum failed, {} malformed, {} truncated)",
                rep.summary.checksum_failed, rep.summary.malformed, rep.summary.truncated
            ),
            Some("use --list-invalid to inspect".to_string()),
        ));
    }
    Ok(())
}

/// Ping output: where the pings came from and the decoded samples.
#[derive(Debug, Serialize)]
struct PingReport {
    report_version: u32,
    tool: ToolInfo,
    input: InputInfo,
    format: FormatTag,
    selection: Selection,
    channels: usize,
    samples_per_ping: usize,
    sample_type: SampleType,
    pings: Vec<PingRecord>,
}

fn cmd_ping(input: InputArgs, ping: PingArgs, output: OutputArgs) -> Result<(), CliError> {
    let resolved_input = prepare_paths(&input.input, &output)?;
    let options = scan_options(&input)?;
    let format = FormatTag::from(input.format);
    let params = PingParams {
        channels: ping.channels,
        samples_per_ping: ping.samples,
        sample_type: ping.sample_type.into(),
    };

    let source = ByteSource::map(&resolved_input).map_err(ScanError::from)?;
    let pings = decode_pings(source.as_bytes(), format, &options, &params)?;

    let stub = make_stub_report(
        &resolved_input.display().to_string(),
        source.len() as u64,
        format,
    );
    let rep = PingReport {
        report_version: stub.report_version,
        tool: stub.tool,
        input: stub.input,
        format,
        selection: options.selection,
        channels: params.channels,
        samples_per_ping: params.samples_per_ping,
        sample_type: params.sample_type,
        pings,
    };
    let json = serialize_report(&rep, output.pretty, output.compact)?;
    emit(&json, &output)
}

fn prepare_paths(input: &Path, output: &OutputArgs) -> Result<PathBuf, CliError> {
    let resolved_input = resolve_input_path(input)?;
    validate_input_file(&resolved_input)?;
    let input_abs = fs::canonicalize(&resolved_input)
        .with_context(|| format!("Failed to resolve input path: {}", resolved_input.display()))?;

    if output.stdout {
        return Ok(resolved_input);
    }
    let report_path = output.report.as_ref().ok_or_else(|| {
        CliError::new(
            "missing output path",
            Some("use -o/--report or --stdout".to_string()),
        )
    })?;
    if let Some(target) = report_target(report_path)? {
        if target == input_abs {
            return Err(CliError::new(
                format!(
                    "report path must differ from input: {}",
                    report_path.display()
                ),
                Some("choose a different output path".to_string()),
            ));
        }
    }
    Ok(resolved_input)
}

/// Absolute path the report will be written to, or `None` when its
/// directory does not exist yet; `emit` creates it, and a path inside it
/// cannot name the input.
fn report_target(report_path: &Path) -> Result<Option<PathBuf>, CliError> {
    let parent = match report_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !parent.exists() {
        return Ok(None);
    }
    let report_dir = fs::canonicalize(parent)
        .with_context(|| format!("Failed to resolve output path: {}", report_path.display()))?;
    let file_name = report_path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid report path: {}", report_path.display()))?;
    Ok(Some(report_dir.join(file_name)))
}

fn scan_options(input: &InputArgs) -> Result<ScanOptions, CliError> {
    let window_hint = || Some("windows need 0 <= --from <= --to and --by >= 1".to_string());
    let selection = match (&input.since, &input.until) {
        (Some(since), Some(until)) => {
            let window = TimeWindow::new(parse_time(since)?, parse_time(until)?, input.by)
                .map_err(|err| window_error(err, window_hint()))?;
            Selection::Time(window)
        }
        _ => {
            let to = input.to.unwrap_or(i64::MAX);
            let window = ExtractionWindow::new(input.from, to, input.by)
                .map_err(|err| window_error(err, window_hint()))?;
            Selection::Records(window)
        }
    };

    Ok(ScanOptions {
        selection,
        sections: SontekSections {
            ctd: input.ctd,
            gps: input.gps,
            bottom_track: input.bottom_track,
            pulse_coherent: input.pcadp,
        },
        max_records: input.max,
        cancel: None,
    })
}

fn window_error(err: WindowError, hint: Option<String>) -> CliError {
    CliError::new(format!("invalid window: {err}"), hint)
}

fn parse_time(value: &str) -> Result<OffsetDateTime, CliError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|err| {
        CliError::new(
            format!("invalid time '{}': {}", value, err),
            Some("use RFC3339, e.g. 2024-03-14T09:26:00Z".to_string()),
        )
    })
}

fn serialize_report<T: Serialize>(rep: &T, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn emit(json: &str, output: &OutputArgs) -> Result<(), CliError> {
    let Some(report) = output.report.as_ref().filter(|_| !output.stdout) else {
        print!("{}", json);
        return Ok(());
    };
    if let Some(parent) = report.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }

    fs::write(report, json)
        .with_context(|| format!("Failed to write report: {}", report.display()))?;
    if !output.quiet {
        eprintln!("OK: report written -> {}", report.display());
    }
    Ok(())
}

fn has_invalid(rep: &ScanReport) -> bool {
    !rep.invalid.is_empty()
}

fn print_invalid(rep: &ScanReport) {
    eprintln!("Invalid records:");
    for entry in &rep.invalid {
        eprintln!(
            "  offset {} length {} {}",
            entry.offset,
            entry.length,
            validity_label(entry.validity)
        );
    }
}

fn validity_label(validity: Validity) -> &'static str {
    match validity {
        Validity::Valid => "valid",
        Validity::ChecksumFailed => "checksum_failed",
        Validity::Malformed => "malformed",
        Validity::Truncated => "truncated",
    }
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("pass the path of a raw instrument file".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("pass the path of a raw instrument file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    if matches.len() > 1 {
        let mut message = format!(
            "multiple files match pattern '{}' ({} matches); matches: {}",
            pattern,
            matches.len(),
            matches
                .iter()
                .take(3)
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        if matches.len() > 3 {
            message.push_str(", ...");
        }
        return Err(CliError::new(
            message,
            Some("pass a single instrument file, or run once per file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
