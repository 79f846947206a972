use clap::{Parser, Subcommand};
use serde_json::json;
use std::error::Error;
use std::process::ExitCode;
use timespan::{ConversionTable, Instant, TimeUnit, Timespan, TimespanError, instant};
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Calendar-aware timespans", long_about = None)]
struct Options {
    /// Print JSON instead of the compact form.
    #[arg(long, global = true)]
    json: bool,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a duration string such as "1y 2M 3w 4d".
    Parse {
        input: String,
        #[arg(long)]
        start: Option<String>,
    },
    /// Break down the span between two instants, or count one unit.
    Between {
        start: String,
        end: String,
        #[arg(long)]
        unit: Option<String>,
    },
    /// Add an amount of one unit to an instant.
    Add {
        amount: i64,
        unit: String,
        #[arg(long)]
        start: Option<String>,
    },
    /// List canonical units and their aliases.
    Units,
}

fn main() -> ExitCode {
    let options = Options::parse();
    init_logging(options.verbose);

    match run(&options) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

// Normal mode: Info, Warn, Error
// Verbose mode: everything from this crate down to Trace
fn init_logging(verbose: bool) {
    let level = if verbose { "trace" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("timespan={level}")));

    let stderr_layer = tracing_subscriber::Layer::with_filter(
        tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(std::io::stderr),
        filter,
    );

    // A second init only happens in tests; ignore it.
    let _ = tracing_subscriber::registry().with(stderr_layer).try_init();
}

fn start_or_now(start: Option<&str>) -> Result<Instant, TimespanError> {
    start.map(instant::parse).unwrap_or_else(|| Ok(instant::now()))
}

fn run(options: &Options) -> Result<String, Box<dyn Error>> {
    debug!(command = ?options.command, "running");
    match &options.command {
        Command::Parse { input, start } => {
            let start = start_or_now(start.as_deref())?;
            let span = Timespan::from_string(input, Some(start))?;
            render_span(&span, options.json)
        }
        Command::Between { start, end, unit } => {
            let start = instant::parse(start)?;
            let end = instant::parse(end)?;
            match unit {
                Some(unit) => {
                    let unit: TimeUnit = unit.parse()?;
                    let total = ConversionTable::shared().between(unit, &start, &end)?;
                    Ok(if options.json {
                        json!({ "unit": unit, "total": total }).to_string()
                    } else {
                        total.to_string()
                    })
                }
                None => render_span(&Timespan::new(start, end)?, options.json),
            }
        }
        Command::Add {
            amount,
            unit,
            start,
        } => {
            let start = start_or_now(start.as_deref())?;
            let span = Timespan::from_units(*amount, unit, Some(start))?;
            Ok(if options.json {
                json!({ "start": span.start(), "end": span.end() }).to_string()
            } else {
                span.end().to_rfc3339()
            })
        }
        Command::Units => Ok(render_units(ConversionTable::shared(), options.json)),
    }
}

fn render_span(span: &Timespan, as_json: bool) -> Result<String, Box<dyn Error>> {
    if !as_json {
        return Ok(span.to_string());
    }
    Ok(serde_json::to_string_pretty(span)?)
}

fn render_units(table: &ConversionTable, as_json: bool) -> String {
    if as_json {
        let units: Vec<_> = TimeUnit::ALL
            .into_iter()
            .map(|unit| {
                json!({
                    "unit": unit,
                    "abbreviation": unit.abbreviation(),
                    "aliases": unit.aliases(),
                    "millisPerUnit": table.millis_per_unit(unit),
                })
            })
            .collect();
        return serde_json::Value::Array(units).to_string();
    }

    TimeUnit::ALL
        .into_iter()
        .map(|unit| {
            format!(
                "{:<14}{:<4}{}",
                unit.plural(),
                unit.abbreviation(),
                unit.aliases().join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::{Command, Options, run};
    use clap::Parser;

    fn run_args(args: &[&str]) -> String {
        let options = Options::try_parse_from(args).expect("arguments");
        run(&options).expect("command")
    }

    #[test]
    fn parse_command_prints_compact_form() {
        let out = run_args(&["timespan", "parse", "2years 1month", "--start", "2024-01-01"]);
        assert_eq!(out, "2y 1M");
    }

    #[test]
    fn between_with_unit_prints_total() {
        let out = run_args(&[
            "timespan",
            "between",
            "2022-01-01T00:00:00",
            "2022-01-31T23:59:59",
            "--unit",
            "day",
        ]);
        assert_eq!(out, "30");
    }

    #[test]
    fn add_prints_end_instant() {
        let out = run_args(&["timespan", "add", "1", "year", "--start", "2020-02-29"]);
        assert_eq!(out, "2021-02-28T00:00:00+00:00");
    }

    #[test]
    fn json_output_is_valid() {
        let out = run_args(&["timespan", "--json", "between", "2024-01-01", "2024-01-11"]);
        let value: serde_json::Value = serde_json::from_str(&out).expect("json");
        assert_eq!(value["text"], "1w 3d");
    }

    #[test]
    fn units_lists_every_unit() {
        let options = Options::try_parse_from(["timespan", "units"]).expect("arguments");
        assert!(matches!(options.command, Command::Units));
        assert_eq!(run(&options).expect("units").lines().count(), 8);
    }

    #[test]
    fn bad_unit_is_an_error() {
        let options =
            Options::try_parse_from(["timespan", "add", "1", "fortnight"]).expect("arguments");
        assert!(run(&options).is_err());
    }
}
