use clap::{Parser, ValueEnum};
use colored::Colorize;
use routie::feasibility::{BreakPolicy, DistanceHeuristic, FlatTravelTime, TravelModel, Validation};
use routie::itinerary::Itinerary;
use routie::place::{Place, PlaceRow};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tabled::Tabled;
use tabled::settings::Style;
use tracing::info;

#[derive(Clone, Copy, ValueEnum)]
enum TravelKind {
    Distance,
    Flat,
}

impl From<TravelKind> for TravelModel {
    fn from(kind: TravelKind) -> Self {
        match kind {
            TravelKind::Distance => TravelModel::Distance(DistanceHeuristic::default()),
            TravelKind::Flat => TravelModel::Flat(FlatTravelTime::default()),
        }
    }
}

#[derive(Parser)]
#[command(version, about = "Plan a day trip and check that it fits opening hours")]
struct Args {
    /// Path to the JSON scenario file
    #[arg(short, long, value_name = "FILE", default_value = "data/default.json")]
    scenario: PathBuf,

    /// Print the validation result as JSON and exit
    #[arg(long)]
    check: bool,

    /// Break-time policy, overrides the scenario setting
    #[arg(long, value_enum)]
    break_policy: Option<BreakPolicy>,

    /// Travel-time model, overrides the scenario setting
    #[arg(long, value_enum)]
    travel: Option<TravelKind>,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub commands: Vec<String>,
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, _pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let mut candidates = Vec::new();

        for cmd in &self.commands {
            if cmd.starts_with(line) {
                candidates.push(Pair {
                    display: cmd.clone(),
                    replacement: format!("{} ", cmd),
                });
            }
        }

        Ok((0, candidates))
    }
}

#[derive(Tabled)]
struct RouteRow {
    #[tabled(rename = "#")]
    stop: usize,
    name: String,
    arrival: String,
    departure: String,
    #[tabled(rename = "travel to next")]
    travel: String,
}

fn paginate(content: String) {
    let pager = Command::new("less")
        .arg("-R")
        .stdin(Stdio::piped())
        .spawn()
        // Fallback to 'more' if 'less' isn't available
        .or_else(|_| Command::new("more").stdin(Stdio::piped()).spawn());

    let Ok(mut pager) = pager else {
        println!("{}", content);
        return;
    };

    if let Some(mut stdin) = pager.stdin.take() {
        if let Err(e) = stdin.write_all(content.as_bytes()) {
            // Broken pipe is common if the user quits the pager early
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                eprintln!("Error writing to pager: {}", e);
            }
        }
    }

    let _ = pager.wait();
}

fn print_table<T: Tabled>(rows: &[T]) {
    let mut table = tabled::Table::new(rows);
    table.with(Style::rounded());
    table.with(tabled::settings::Alignment::left());
    if rows.len() > 20 {
        paginate(table.to_string());
    } else {
        println!("{}", table);
    }
}

fn print_places(places: &[&Place]) {
    if places.is_empty() {
        println!("No matching places found.");
    } else {
        let rows = places.iter().map(|p| PlaceRow::from(*p)).collect::<Vec<_>>();
        print_table(&rows);
    }
}

fn print_route(itinerary: &Itinerary) {
    let entries = itinerary.entries();
    if entries.is_empty() {
        println!("The route is empty. Use 'add <id>' to select places.");
        return;
    }
    let stops = itinerary.timeline();
    let rows = entries
        .iter()
        .map(|entry| {
            let stop = stops.as_ref().and_then(|s| s.get(entry.visit_index));
            RouteRow {
                stop: entry.visit_index + 1,
                name: entry.place.name.clone(),
                arrival: stop.map_or("-".to_string(), |s| s.arrival.to_string()),
                departure: stop.map_or("-".to_string(), |s| s.departure.to_string()),
                travel: stop
                    .and_then(|s| s.travel_to_next)
                    .map_or("-".to_string(), |m| format!("{}m", m)),
            }
        })
        .collect::<Vec<_>>();
    print_table(&rows);
}

fn print_validation(validation: &Validation) {
    match validation {
        Validation::NotApplicable => println!(
            "{}",
            "No validation performed: set a start and end time and select places.".dimmed()
        ),
        v if v.is_valid() => println!("{}", "The plan is feasible.".green().bold()),
        v => {
            println!("{}", format!("{} issue(s) found:", v.issues().len()).yellow().bold());
            for issue in v.issues() {
                match issue.place_index() {
                    Some(i) => println!("  {} stop {}: {}", "!".yellow(), i + 1, issue),
                    None => println!("  {} {}", "!".yellow(), issue),
                }
            }
        }
    }
}

fn print_settings(itinerary: &Itinerary) {
    let window = itinerary.window();
    let show = |t: Option<routie::time::Time>| t.map_or("unset".to_string(), |t| t.to_string());
    println!("Window:       {} - {}", show(window.start), show(window.end));
    println!("Break policy: {}", itinerary.settings.break_policy);
    println!("Travel model: {}", itinerary.settings.travel);
}

fn print_help() {
    println!("\nAvailable Commands:");
    println!("  ls [purpose]           - List places, optionally only one purpose");
    println!("  purposes               - List purposes");
    println!("  route                  - Show the route with arrival and departure times");
    println!("  add <id>               - Append place <id> to the route");
    println!("  rm <id>                - Remove place <id> from the route");
    println!("  mv <from> <to>         - Move the stop at position <from> to <to> (1-based)");
    println!("  clear                  - Remove all stops from the route");
    println!("  window [<start> <end>] - Show or set the day window (HH:MM), 'window clear' unsets it");
    println!("  check                  - Check the plan against opening hours, breaks and the window");
    println!("  json                   - Print the check result as JSON");
    println!("  policy [break <interval|arrival> | travel <distance|flat> [m]]");
    println!("                         - Show or change how breaks and travel are evaluated");
    println!("  help / ?               - Show this help menu");
    println!("  exit / quit            - Exit the planner\n");
}

fn parse_position(s: Option<&&str>) -> Option<usize> {
    s.and_then(|s| s.parse::<usize>().ok())
        .filter(|p| *p > 0)
        .map(|p| p - 1)
}

fn run_policy(itinerary: &mut Itinerary, parts: &[&str]) {
    match (parts.get(1).copied(), parts.get(2).copied()) {
        (None, _) => print_settings(itinerary),
        (Some("break"), Some(name)) => match BreakPolicy::from_str(name, true) {
            Ok(policy) => {
                itinerary.set_break_policy(policy);
                println!("Break policy set to {}.", policy);
            }
            Err(e) => println!("Error: {}", e),
        },
        (Some("travel"), Some(name)) => match TravelKind::from_str(name, true) {
            Ok(kind) => {
                let mut model = TravelModel::from(kind);
                if let (TravelModel::Flat(flat), Some(mins)) = (&mut model, parts.get(3)) {
                    match mins.parse::<u32>() {
                        Ok(m) => flat.minutes = m,
                        Err(_) => {
                            println!("Usage: policy travel flat <minutes>");
                            return;
                        }
                    }
                }
                itinerary.set_travel(model);
                println!("Travel model set to {}.", model);
            }
            Err(e) => println!("Error: {}", e),
        },
        _ => println!("Usage: policy [break <interval|arrival> | travel <distance|flat> [minutes]]"),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(if args.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    let mut itinerary = Itinerary::load_from_file(&args.scenario)?;
    if let Some(policy) = args.break_policy {
        itinerary.set_break_policy(policy);
    }
    if let Some(kind) = args.travel {
        itinerary.set_travel(kind.into());
    }
    info!(scenario = %args.scenario.display(), stops = itinerary.route().len(), "scenario loaded");

    if args.check {
        println!("{}", serde_json::to_string_pretty(&itinerary.validate())?);
        return Ok(());
    }

    println!("Planner ready. Loaded places from {}", args.scenario.display());

    let config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let helper = CompleteHelper {
        commands: [
            "ls", "purposes", "route", "add", "rm", "mv", "clear", "window", "check", "json",
            "policy", "help", "exit",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect(),
    };

    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(helper));

    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() { continue; }

                rl.add_history_entry(trimmed)?;

                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                match parts[0] {
                    "ls" => print_places(&itinerary.places_by_purpose(parts.get(1).copied())),
                    "purposes" => print_table(itinerary.purposes()),
                    "route" => print_route(&itinerary),
                    "add" => {
                        if let Some(id) = parts.get(1) {
                            match itinerary.select(id) {
                                Ok(place) => println!("Added {} to the route.", place.name),
                                Err(e) => println!("Error: {}", e),
                            }
                        } else {
                            println!("Usage: add <place_id>");
                        }
                    },
                    "rm" => {
                        if let Some(id) = parts.get(1) {
                            match itinerary.remove(id) {
                                Ok(()) => println!("Removed {} from the route.", id),
                                Err(e) => println!("Error: {}", e),
                            }
                        } else {
                            println!("Usage: rm <place_id>");
                        }
                    },
                    "mv" => {
                        if let (Some(from), Some(to)) = (parse_position(parts.get(1)), parse_position(parts.get(2))) {
                            match itinerary.move_stop(from, to) {
                                Ok(()) => print_route(&itinerary),
                                Err(e) => println!("Error: {}", e),
                            }
                        } else {
                            println!("Usage: mv <from> <to>");
                        }
                    },
                    "clear" => {
                        itinerary.clear();
                        println!("The route is now empty.");
                    },
                    "window" => match (parts.get(1), parts.get(2)) {
                        (None, _) => print_settings(&itinerary),
                        (Some(&"clear"), None) => {
                            itinerary.clear_window();
                            println!("Window cleared.");
                        },
                        (Some(start), Some(end)) => match itinerary.set_window(start, end) {
                            Ok(()) => print_settings(&itinerary),
                            Err(e) => println!("Error: {}", e),
                        },
                        _ => println!("Usage: window <HH:MM> <HH:MM> | window clear"),
                    },
                    "check" => print_validation(&itinerary.validate()),
                    "json" => println!("{}", serde_json::to_string_pretty(&itinerary.validate())?),
                    "policy" => run_policy(&mut itinerary, &parts),
                    "help" | "?" => print_help(),
                    "exit" | "quit" => break,
                    _ => println!("Unknown command: {}", parts[0]),
                }
            },
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            },
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            },
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
