//! gffkit: GFF3 reader, writer and sniffer
//!
//! Usage: gffkit <COMMAND> [OPTIONS]

use clap::{Parser, Subcommand};
use log::{info, LevelFilter};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use gffkit::config;
use gffkit::gff::{GffError, GffReader};
use gffkit::sniff::{sniff_path, sniff_seekable};
use gffkit::streaming::GffWriter;

#[derive(Parser)]
#[command(name = "gffkit")]
#[command(author = "Manish Kumar Bobbili")]
#[command(version)]
#[command(about = "gffkit: read, validate and rewrite GFF3 annotation files", long_about = None)]
struct Cli {
    /// Accept any integer in the phase column instead of only 0, 1 and 2
    #[arg(long, global = true)]
    lenient_phase: bool,

    /// Skip empty attribute segments and read a `.` attribute column as empty
    #[arg(long, global = true)]
    lenient_attributes: bool,

    /// Log debug output to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report whether a file looks like GFF3
    Sniff {
        /// Input file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Re-emit one sequence's features as canonical GFF3
    View {
        /// Input GFF3 file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Sequence record to read (1-based)
        #[arg(short = 'n', long, default_value = "1")]
        record: usize,

        /// Write this sequence id in column 1 instead of the one read
        #[arg(long)]
        seq_id: Option<String>,

        /// Skip the ##gff-version check
        #[arg(short, long)]
        force: bool,
    },

    /// Re-emit every sequence, each with its own header
    Split {
        /// Input GFF3 file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Skip the ##gff-version check
        #[arg(short, long)]
        force: bool,
    },

    /// Print parsed attributes, one tag per row
    Attrs {
        /// Input GFF3 file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Sequence record to read (1-based)
        #[arg(short = 'n', long, default_value = "1")]
        record: usize,

        /// Skip the ##gff-version check
        #[arg(short, long)]
        force: bool,
    },

    /// Count features per sequence
    Stats {
        /// Input GFF3 file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Skip the ##gff-version check
        #[arg(short, long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);
    config::set_lenient_phase(cli.lenient_phase);
    config::set_lenient_attributes(cli.lenient_attributes);

    let result = match cli.command {
        Commands::Sniff { input } => run_sniff(&input),
        Commands::View {
            input,
            record,
            seq_id,
            force,
        } => run_view(input, record, seq_id, force),
        Commands::Split { input, force } => run_split(input, force),
        Commands::Attrs {
            input,
            record,
            force,
        } => run_attrs(input, record, force),
        Commands::Stats { input, force } => run_stats(input, force),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let mut builder = pretty_env_logger::formatted_builder();
    match std::env::var("RUST_LOG") {
        Ok(filters) => {
            builder.parse_filters(&filters);
        }
        Err(_) => {
            let level = if verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Warn
            };
            builder.filter_level(level);
        }
    }
    // A second init (e.g. in tests) is harmless.
    let _ = builder.try_init();
}

fn is_stdin(input: Option<&Path>) -> bool {
    input.map_or(true, |p| p.as_os_str() == "-")
}

/// Open the input, checking the GFF3 directive unless `force` is set.
///
/// Stdin is buffered in memory so it can be sniffed and then read.
fn open_input(input: Option<&Path>, force: bool) -> Result<Box<dyn BufRead>, GffError> {
    match input {
        Some(path) if !is_stdin(Some(path)) => {
            if !force && !sniff_path(path).matched {
                return Err(GffError::FormatMismatch(format!(
                    "{} does not start with a ##gff-version 3 directive (use --force to read anyway)",
                    path.display()
                )));
            }
            info!("Reading {}", path.display());
            Ok(Box::new(BufReader::new(File::open(path)?)))
        }
        _ => {
            let mut buffer = Vec::new();
            io::stdin().lock().read_to_end(&mut buffer)?;
            let mut cursor = Cursor::new(buffer);
            if !force && !sniff_seekable(&mut cursor).matched {
                return Err(GffError::FormatMismatch(
                    "stdin does not start with a ##gff-version 3 directive (use --force to read anyway)"
                        .to_string(),
                ));
            }
            info!("Reading stdin");
            Ok(Box::new(cursor))
        }
    }
}

fn run_sniff(input: &Path) -> Result<(), GffError> {
    let report = sniff_path(input);
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", if report.matched { "gff3" } else { "unknown" })?;
    Ok(())
}

fn run_view(
    input: Option<PathBuf>,
    record: usize,
    seq_id: Option<String>,
    force: bool,
) -> Result<(), GffError> {
    let reader = open_input(input.as_deref(), force)?;
    let (read_id, collection) = GffReader::new(reader).read_record(record)?;
    let seq_id = seq_id.unwrap_or(read_id);

    let stdout = io::stdout();
    let mut writer = GffWriter::new(stdout.lock());
    writer.write_collection(&collection, &seq_id)?;
    writer.flush()?;
    info!("Wrote {} lines for {}", writer.lines_written(), seq_id);
    Ok(())
}

fn run_split(input: Option<PathBuf>, force: bool) -> Result<(), GffError> {
    let reader = open_input(input.as_deref(), force)?;

    let stdout = io::stdout();
    let mut writer = GffWriter::new(stdout.lock());
    for result in GffReader::new(reader).collections() {
        let (seq_id, collection) = result?;
        writer.write_collection(&collection, &seq_id)?;
    }
    writer.flush()?;
    info!("Wrote {} lines", writer.lines_written());
    Ok(())
}

fn run_attrs(input: Option<PathBuf>, record: usize, force: bool) -> Result<(), GffError> {
    let reader = open_input(input.as_deref(), force)?;
    let (seq_id, collection) = GffReader::new(reader).read_record(record)?;

    let stdout = io::stdout();
    let mut handle = io::BufWriter::new(stdout.lock());
    for feature in &collection {
        let attributes = feature.metadata.parsed_attributes()?;
        for bound in &feature.bounds {
            let start = bound
                .one_based_start()
                .ok_or(GffError::UnwritableBound(*bound))?;
            for (tag, value) in &attributes {
                writeln!(
                    handle,
                    "{}\t{}\t{}\t{}\t{}",
                    seq_id,
                    start,
                    bound.end,
                    tag,
                    value
                )?;
            }
        }
    }
    handle.flush()?;
    Ok(())
}

fn run_stats(input: Option<PathBuf>, force: bool) -> Result<(), GffError> {
    let reader = open_input(input.as_deref(), force)?;

    let stdout = io::stdout();
    let mut handle = io::BufWriter::new(stdout.lock());
    for result in GffReader::new(reader).collections() {
        let (seq_id, collection) = result?;
        writeln!(
            handle,
            "{}\t{}\t{}",
            seq_id,
            collection.len(),
            collection.bound_count()
        )?;
    }
    handle.flush()?;
    Ok(())
}
