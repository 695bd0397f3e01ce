use crate::core::merger::select_sources;
use crate::core::source::KmlSource;
use crate::utils::error::Result;
use std::io::{BufRead, Write};

pub const PROMPT: &str = "Enter a list of files to join or type 'All':";
pub const GIVE_UP: &str = "Failed to understand input. Goodbye.";

fn describe(source: &KmlSource) -> String {
    let count = match source.entry_count() {
        Ok(count) => count,
        Err(e) => return format!("(unreadable: {})", e),
    };

    match source.time_span() {
        Ok(Some(span)) => format!(
            "({} entries, {}h {:02}m)",
            count,
            span.num_hours(),
            span.num_minutes() % 60
        ),
        _ => format!("({} entries)", count),
    }
}

/// Prints the numbered listing the user picks from.
pub fn print_listing<W: Write>(output: &mut W, sources: &[KmlSource], ignored: &[String]) -> Result<()> {
    writeln!(output, "Available files to join are:")?;
    for (index, source) in sources.iter().enumerate() {
        let name = source.file_name();
        if ignored.contains(&name) {
            continue;
        }
        writeln!(output, " {}\t{}\t{}", index, name, describe(source))?;
    }
    Ok(())
}

/// Asks for a selection until one resolves, at most `max_attempts` times.
///
/// Returns `None` when every attempt failed or the input ended. Errors other than bad
/// selections are passed on.
pub fn prompt_selection<'a, R, W>(
    input: &mut R,
    output: &mut W,
    sources: &'a [KmlSource],
    ignored: &[String],
    max_attempts: usize,
) -> Result<Option<Vec<&'a KmlSource>>>
where
    R: BufRead,
    W: Write,
{
    for attempt in 1..=max_attempts {
        writeln!(output, "{}", PROMPT)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            tracing::debug!("Input closed after {} attempts", attempt - 1);
            break;
        }

        match select_sources(sources, &line, ignored) {
            Ok(selected) => return Ok(Some(selected)),
            Err(e) if e.is_recoverable() => {
                tracing::debug!("Attempt {}/{} rejected: {}", attempt, max_attempts, e);
                writeln!(output, "{}", e)?;
            }
            Err(e) => return Err(e),
        }
    }

    writeln!(output, "{}", GIVE_UP)?;
    Ok(None)
}
