//! # Rebarcalc CLI Application
//!
//! Line-oriented front end over `rebar_core`. Loads settings and catalogs
//! once at startup, then answers one command per line until `quit` or
//! end of input.
//!
//! ```text
//! rebar_cli [settings.json]
//! ```
//!
//! Logging goes to stderr; set `RUST_LOG` (e.g. `RUST_LOG=info`) to see
//! catalog loading details.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use rebar_core::catalog::{FieldRow, SpacingLimits};
use rebar_core::derivation::parse_strand_count;
use rebar_core::query::{CountResult, RebarRow, SpacingResult};
use rebar_core::{CalcError, CalcResult, DerivedBarMetrics, ForceSummary, Lookup, Settings, NOT_APPLICABLE};
use serde::Serialize;
use tracing::warn;
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
Commands:
  bars                       reference table of bar sizes
  bar <name>                 area and weight of one bar
  count [name] <n>           total area of n bars
  spacing [name] <mm>        area per metre at a c/c spacing
  anchor <strands>           anchor dimensions and forces
  limits <strands>           minimum spacing / edge distance by concrete grade
  forces <strands>           P_ult and working force for a tendon
  stressbar <diameter>       stress-bar accessories and forces
  stressbars                 diameters in the stress-bar catalog
  strands                    strand counts in the anchor catalog
  json <command ...>         print the result of a command as JSON
  help                       this text
  quit                       exit";

/// Result of one command, printable as text or JSON
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Reply {
    Bars { rows: Vec<RebarRow> },
    Bar { bar: String, metrics: DerivedBarMetrics },
    Count(CountResult),
    Spacing(SpacingResult),
    Anchor { anchor: String, fields: Vec<FieldRow>, forces: ForceSummary },
    Limits { anchor: String, rows: Vec<SpacingLimits> },
    Forces { strand_count: u32, forces: ForceSummary },
    StressBar { diameter: String, fields: Vec<FieldRow>, forces: Option<ForceSummary> },
    List { label: &'static str, items: Vec<String> },
    NotFound { what: String },
    Help,
}

fn main() {
    init_logging();

    let settings_path = std::env::args().nth(1).map(PathBuf::from);
    let settings = match Settings::load_or_default(settings_path.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            warn!(error = %e, "settings unavailable, using defaults");
            Settings::default()
        }
    };

    let lookup = Lookup::from_settings(&settings);
    let summary = lookup.catalogs().summary();

    println!("Rebarcalc - Reinforcement Reference Calculator");
    println!("==============================================");
    println!(
        "Catalogs: {} anchors, {} spacing rows, {} stress bars",
        summary.anchors, summary.spacing, summary.stress_bars
    );
    println!("Type 'help' for commands.");
    println!();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }

        let line = match lines.next() {
            Some(Ok(line)) => line,
            _ => break,
        };

        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => continue,
            ["quit"] | ["exit"] | ["q"] => break,
            ["json", rest @ ..] => print_json(&execute(&lookup, &settings, rest)),
            _ => print_text(&execute(&lookup, &settings, &words)),
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn execute(lookup: &Lookup, settings: &Settings, words: &[&str]) -> CalcResult<Reply> {
    let default_bar = settings.default_bar.as_str();

    match words {
        ["help"] => Ok(Reply::Help),
        ["bars"] => Ok(Reply::Bars {
            rows: lookup.rebar_table(),
        }),
        ["bar", name] => Ok(match lookup.rebar_metrics(name) {
            Some(metrics) => Reply::Bar {
                bar: name.to_string(),
                metrics,
            },
            None => Reply::NotFound {
                what: format!("bar {}", name),
            },
        }),
        ["count", n] => lookup.area_for_count(default_bar, n).map(Reply::Count),
        ["count", name, n] => lookup.area_for_count(name, n).map(Reply::Count),
        ["spacing", s] => lookup.area_for_spacing(default_bar, s).map(Reply::Spacing),
        ["spacing", name, s] => lookup.area_for_spacing(name, s).map(Reply::Spacing),
        ["anchor", n] => {
            let strands = parse_strand_count(n)?;
            let anchor = lookup.anchor_name(strands);
            Ok(match lookup.anchor_for_strand_count(strands) {
                Some(record) => Reply::Anchor {
                    anchor,
                    fields: record.fields(),
                    forces: lookup.strand_forces(strands)?,
                },
                None => Reply::NotFound { what: anchor },
            })
        }
        ["limits", n] => {
            let strands = parse_strand_count(n)?;
            let anchor = lookup.anchor_name(strands);
            let rows = lookup.spacing_rows(strands);
            Ok(if rows.is_empty() {
                Reply::NotFound {
                    what: format!("spacing limits for {}", anchor),
                }
            } else {
                Reply::Limits { anchor, rows }
            })
        }
        ["forces", n] => {
            let strands = parse_strand_count(n)?;
            Ok(Reply::Forces {
                strand_count: strands,
                forces: lookup.strand_forces(strands)?,
            })
        }
        ["stressbar", diameter] => Ok(match lookup.stress_bar(diameter) {
            Some(record) => Reply::StressBar {
                diameter: diameter.to_string(),
                fields: record.fields(),
                forces: lookup.stress_bar_forces(diameter),
            },
            None => Reply::NotFound {
                what: format!("stress bar {}", diameter),
            },
        }),
        ["stressbars"] => Ok(Reply::List {
            label: "Stress bar diameters (mm)",
            items: lookup
                .catalogs()
                .stress_bars
                .keys()
                .map(str::to_string)
                .collect(),
        }),
        ["strands"] => Ok(Reply::List {
            label: "Strand counts",
            items: lookup
                .strand_counts()
                .iter()
                .map(u32::to_string)
                .collect(),
        }),
        _ => Err(CalcError::invalid_input(
            "command",
            words.join(" "),
            "Unknown command, type 'help'",
        )),
    }
}

fn print_text(reply: &CalcResult<Reply>) {
    match reply {
        Ok(reply) => {
            for line in render(reply) {
                println!("{}", line);
            }
        }
        Err(e) => println!("{}  ({})", NOT_APPLICABLE, e),
    }
    println!();
}

fn print_json(reply: &CalcResult<Reply>) {
    let json = match reply {
        Ok(reply) => serde_json::to_string_pretty(reply),
        Err(e) => serde_json::to_string_pretty(e),
    };
    match json {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: {}", e),
    }
    println!();
}

fn render(reply: &Reply) -> Vec<String> {
    match reply {
        Reply::Help => HELP.lines().map(str::to_string).collect(),
        Reply::Bars { rows } => {
            let mut out = vec![format!("{:<5} {:>7} {:>10} {:>8}", "Bar", "Ø (mm)", "Area mm²", "kg/m")];
            out.extend(rows.iter().map(|row| {
                format!(
                    "{:<5} {:>7} {:>10.1} {:>8.3}",
                    row.bar.name, row.bar.diameter_mm, row.metrics.area_mm2, row.metrics.weight_kg_per_m
                )
            }));
            out
        }
        Reply::Bar { bar, metrics } => vec![
            format!("{}: area {:.1} mm², weight {:.3} kg/m", bar, metrics.area_mm2, metrics.weight_kg_per_m),
        ],
        Reply::Count(result) => vec![result.to_string()],
        Reply::Spacing(result) => vec![result.to_string()],
        Reply::Anchor { anchor, fields, forces } => {
            let mut out = vec![anchor.clone()];
            out.extend(render_fields(fields));
            out.extend(render_forces(forces));
            out
        }
        Reply::Limits { anchor, rows } => {
            let mut out = vec![
                anchor.clone(),
                format!("  {:<8} {:>12} {:>12}", "Concrete", "c/c min", "Edge min"),
            ];
            out.extend(rows.iter().map(|row| {
                format!(
                    "  {:<8} {:>12} {:>12}",
                    row.grade.display_name(),
                    row.centre_spacing.display("mm"),
                    row.edge_distance.display("mm")
                )
            }));
            out
        }
        Reply::Forces { strand_count, forces } => {
            let mut out = vec![format!("{} strands", strand_count)];
            out.extend(render_forces(forces));
            out
        }
        Reply::StressBar { diameter, fields, forces } => {
            let mut out = vec![format!("Stress bar Ø{} mm", diameter)];
            out.extend(render_fields(fields));
            match forces {
                Some(forces) => out.extend(render_forces(forces)),
                None => out.push(format!("  Forces: {}", NOT_APPLICABLE)),
            }
            out
        }
        Reply::List { label, items } => {
            if items.is_empty() {
                vec![format!("{}: {}", label, NOT_APPLICABLE)]
            } else {
                vec![format!("{}: {}", label, items.join(", "))]
            }
        }
        Reply::NotFound { what } => vec![format!("{}  (no data for {})", NOT_APPLICABLE, what)],
    }
}

fn render_fields(fields: &[FieldRow]) -> Vec<String> {
    fields
        .iter()
        .map(|f| format!("  {:<22} {}", f.label, f.value))
        .collect()
}

fn render_forces(forces: &ForceSummary) -> Vec<String> {
    vec![
        format!("  {}", forces.ultimate_label()),
        format!("  {}", forces.working_label()),
    ]
}
