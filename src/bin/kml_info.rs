use anyhow::{Context, Result};
use clap::Parser;
use kml_joiner::utils::logger::{self, LogFormat};
use kml_joiner::{KmlError, KmlSource};

#[derive(Parser)]
#[command(name = "kml-info")]
#[command(about = "Show the waypoints found in KML track files")]
struct Args {
    /// Track files to inspect
    #[arg(required = true)]
    files: Vec<String>,

    /// Number of leading entries to print
    #[arg(short = 'n', long, default_value = "3")]
    head: usize,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn inspect(path: &str, head: usize) -> Result<()> {
    let source = KmlSource::new(path)?;
    let count = source
        .entry_count()
        .with_context(|| format!("reading {}", path))?;

    println!("{}", source.file_name());
    println!("  entries:     {}", count);

    match source.first_entry() {
        Ok(first) => {
            let last = source.last_entry()?;
            println!(
                "  lines:       {}..={}",
                source.first_entry_line_number()?,
                source.last_entry_line_number()?
            );
            println!("  first:       {} @ {}", first.timestamp, first.coordinate);
            println!("  last:        {} @ {}", last.timestamp, last.coordinate);
        }
        Err(KmlError::EmptySource { .. }) => return Ok(()),
        Err(e) => return Err(e.into()),
    }

    if let Some(span) = source.time_span()? {
        println!(
            "  span:        {}h {:02}m {:02}s",
            span.num_hours(),
            span.num_minutes() % 60,
            span.num_seconds() % 60
        );
    }

    for entry in source.entries()?.take(head) {
        let entry = entry?;
        println!("  {}\t{}", entry.timestamp, entry.coordinate);
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init_logger(args.verbose, LogFormat::Compact);

    let mut failed = 0;
    for path in &args.files {
        if let Err(e) = inspect(path, args.head) {
            tracing::error!("{}: {:#}", path, e);
            failed += 1;
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} files could not be inspected", failed, args.files.len());
    }
    Ok(())
}
