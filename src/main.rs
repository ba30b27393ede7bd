use crate::demand::intraday_passenger_demand;
use crate::economy::EconomyConfig;
use crate::manager::AirlineManager;
use crate::snapshot::Snapshot;
use crate::time::{Day, Instant};
use clap::Parser;
use colored::Colorize;
use log::warn;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;
use tabled::Tabled;
use tabled::settings::Style;

mod city;
mod demand;
mod economy;
mod error;
mod flight;
mod hashing;
mod hub;
mod manager;
mod model;
mod plane;
mod snapshot;
mod time;
mod world;

#[derive(Parser)]
struct Args {
    /// Directory holding cities.csv and the planes/ catalog
    #[arg(short, long, value_name = "DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Saved game to resume and keep writing to
    #[arg(short, long, value_name = "FILE", default_value = "skylanes-save.json")]
    save: PathBuf,

    /// Optional economy overrides (JSON)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub commands: Vec<String>,
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
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

fn paginate(content: String) {
    let pager = Command::new("less")
        .arg("-R")
        .stdin(Stdio::piped())
        .spawn()
        // Fallback to 'more' if 'less' isn't available
        .or_else(|_| Command::new("more").stdin(Stdio::piped()).spawn());

    let mut pager = match pager {
        Ok(pager) => pager,
        Err(_) => {
            println!("{content}");
            return;
        }
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

fn render<R: Tabled>(rows: Vec<R>) {
    let mut table = tabled::Table::new(&rows);
    table.with(Style::rounded());
    table.with(tabled::settings::Alignment::left());
    if rows.len() > 20 {
        paginate(table.to_string());
    } else {
        println!("{}", table);
    }
}

#[derive(Tabled)]
struct CityRow {
    code: String,
    name: String,
    population: u64,
    utc: f64,
    hub: String,
}

#[derive(Tabled)]
struct ModelRow {
    model: String,
    seats: u32,
    range_km: f64,
    km_per_min: f64,
    price: String,
    upkeep: String,
    pilots: u32,
}

#[derive(Tabled)]
struct PlaneRow {
    registration: String,
    model: String,
    location: String,
    flights: usize,
}

#[derive(Tabled)]
struct FlightRow {
    plane: String,
    route: String,
    start: String,
    end: String,
    pax: u32,
    km: u64,
    profit: String,
}

#[derive(Tabled)]
struct SlotRow {
    slot: String,
    pax: u32,
}

fn list_cities(manager: &AirlineManager) {
    let rows = manager
        .world()
        .cities()
        .iter()
        .map(|city| CityRow {
            code: city.code.to_string(),
            name: city.name.to_string(),
            population: city.population,
            utc: city.timezone,
            hub: manager
                .hub_in(&city.code)
                .map(|h| format!("{} (L{})", h.tier_name(), h.level()))
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();
    render(rows);
}

fn list_models(manager: &AirlineManager) {
    let rows = manager
        .world()
        .models()
        .iter()
        .map(|model| ModelRow {
            model: model.name.to_string(),
            seats: model.capacity,
            range_km: model.range,
            km_per_min: model.velocity,
            price: format!("{:.0}", model.price),
            upkeep: format!("{:.0}/wk", model.maintenance),
            pilots: model.pilots,
        })
        .collect();
    render(rows);
}

fn list_planes(manager: &AirlineManager) {
    let rows = manager
        .planes()
        .into_iter()
        .map(|plane| PlaneRow {
            registration: plane.registration.to_string(),
            model: plane.model.name.to_string(),
            location: plane.location.to_string(),
            flights: manager.flights_for(&plane.registration).len(),
        })
        .collect();
    render(rows);
}

fn list_flights(manager: &AirlineManager) {
    let mut flights: Vec<_> = manager.flights().iter().collect();
    flights.sort_by_key(|f| (f.start.to_minutes(), f.plane.clone()));
    let rows = flights
        .into_iter()
        .map(|flight| FlightRow {
            plane: flight.plane.to_string(),
            route: format!("{} -> {}", flight.origin, flight.destination),
            start: flight.start.to_string(),
            end: flight.end.to_string(),
            pax: flight.passengers,
            km: flight.distance.round() as u64,
            profit: manager
                .find_plane(&flight.plane)
                .map(|p| format!("{:.2}", flight.profit(&p.model, manager.config())))
                .unwrap_or_else(|| "?".to_string()),
        })
        .collect();
    render(rows);
}

fn show_demand(manager: &AirlineManager, origin: &str, destination: &str) {
    let (Some(origin), Some(destination)) = (
        manager.world().find_city(origin),
        manager.world().find_city(destination),
    ) else {
        println!("Unknown city.");
        return;
    };
    let Some(weekly) = manager.route_demand(&origin.code, &destination.code) else {
        println!("No demand on {} -> {}.", origin.code, destination.code);
        return;
    };
    println!(
        "{} -> {}: {} passengers this week, by departure hour:",
        origin, destination, weekly
    );
    let rows = (0..24)
        .map(|hour| SlotRow {
            slot: format!("{hour:02}:00"),
            pax: intraday_passenger_demand(weekly, hour, 0, origin.timezone),
        })
        .collect();
    render(rows);
}

fn show_status(manager: &AirlineManager) {
    let balance = format!("{:.2}", manager.cash());
    let balance = if manager.cash() < 0.0 {
        balance.as_str().red()
    } else {
        balance.as_str().green()
    };
    println!(
        "Week {} | balance {} | {} planes | {} flights | expected profit {:.2}",
        manager.week(),
        balance,
        manager.planes().len(),
        manager.flights().len(),
        manager.expected_profit(),
    );
}

fn check_plan(manager: &AirlineManager) {
    let issues = manager.check_flight_plan();
    if issues.is_empty() {
        println!("{}", "Flight plan is consistent.".green());
    } else {
        let header = format!("{} issue(s):", issues.len());
        println!("{}", header.as_str().red());
        for issue in issues {
            println!("  {}", issue);
        }
    }
}

fn persist(manager: &AirlineManager, path: &Path) {
    if let Err(e) = manager.snapshot().save_to_file(path) {
        warn!("could not save game to {}: {e}", path.display());
    }
}

fn print_help() {
    println!("\nAvailable Commands:");
    println!("  status                                  - Week, balance and fleet summary");
    println!("  ls [flights|planes|cities|models]       - List game state (default: flights)");
    println!("  demand <origin> <dest>                  - Weekly route demand by departure hour");
    println!("  fly <origin> <dest> <plane> <start> <n> - Schedule a flight, e.g. fly BER MUC SL-001 M-8-30 40");
    println!("  rm <plane> <start>                      - Delete the flight keyed by plane and start");
    println!("  buy <city> <model...>                   - Buy a plane parked in <city>");
    println!("  sell <plane>                            - Sell an idle plane at 70% of list price");
    println!("  hub <city>                              - Found or upgrade the hub in <city>");
    println!("  check                                   - Validate the flight plan");
    println!("  next                                    - Settle the week and advance");
    println!("  save                                    - Write the save file now");
    println!("  reset                                   - Abandon the airline and start over");
    println!("  help / ?                                - Show this help menu");
    println!("  exit / quit                             - Leave the simulator");
    let legend: Vec<String> = Day::ALL
        .iter()
        .map(|d| format!("{}={}", d.code(), d.name()))
        .collect();
    println!("\nStart format: <day>-<hour>-<minute>, {}\n", legend.join(", "));
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let world = Arc::new(world::World::load(
        &args.data_dir.join("cities.csv"),
        &args.data_dir.join("planes"),
    )?);
    let config = match &args.config {
        Some(path) => EconomyConfig::from_file(path)?,
        None => EconomyConfig::default(),
    };

    let mut manager = if args.save.exists() {
        let snapshot = Snapshot::load_from_file(&args.save)?;
        println!("Resuming airline from {}", args.save.display());
        AirlineManager::restore(world.clone(), config.clone(), &snapshot)?
    } else {
        println!("Starting a new airline.");
        AirlineManager::new_game(world.clone(), config.clone())?
    };

    let rl_config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let helper = CompleteHelper {
        commands: [
            "status", "ls", "demand", "fly", "rm", "buy", "sell", "hub", "check", "next", "save",
            "reset", "help", "exit",
        ]
        .map(String::from)
        .to_vec(),
    };

    let mut rl = Editor::with_config(rl_config)?;
    rl.set_helper(Some(helper));

    show_status(&manager);
    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                rl.add_history_entry(trimmed)?;

                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                match parts[0] {
                    "status" => show_status(&manager),
                    "ls" => match parts.get(1).copied().unwrap_or("flights") {
                        "f" | "flights" => list_flights(&manager),
                        "p" | "planes" => list_planes(&manager),
                        "c" | "cities" => list_cities(&manager),
                        "m" | "models" => list_models(&manager),
                        other => println!("Unknown listing: {other}"),
                    },
                    "demand" => {
                        if let (Some(origin), Some(destination)) = (parts.get(1), parts.get(2)) {
                            show_demand(&manager, origin, destination);
                        } else {
                            println!("Usage: demand <origin> <dest>");
                        }
                    }
                    "fly" => {
                        let (Some(origin), Some(dest), Some(plane), Some(start), Some(pax)) = (
                            parts.get(1),
                            parts.get(2),
                            parts.get(3),
                            parts.get(4),
                            parts.get(5),
                        ) else {
                            println!("Usage: fly <origin> <dest> <plane> <start> <passengers>");
                            continue;
                        };
                        let start = match start.parse::<Instant>() {
                            Ok(start) => start,
                            Err(e) => {
                                println!("{e}");
                                continue;
                            }
                        };
                        let Ok(requested) = pax.parse::<u32>() else {
                            println!("Passenger count must be a number.");
                            continue;
                        };
                        match manager.create_flight(origin, dest, plane, start, requested) {
                            Ok(flight) => {
                                println!(
                                    "Scheduled {} with {} of {} requested passengers.",
                                    flight, flight.passengers, requested
                                );
                                persist(&manager, &args.save);
                            }
                            Err(e) => println!("{e}"),
                        }
                    }
                    "rm" => {
                        let (Some(plane), Some(start)) = (parts.get(1), parts.get(2)) else {
                            println!("Usage: rm <plane> <start>");
                            continue;
                        };
                        match start.parse::<Instant>() {
                            Ok(start) => {
                                if manager.delete_flight(plane, start) {
                                    println!("Flight removed.");
                                    persist(&manager, &args.save);
                                } else {
                                    println!("No flight by {plane} at {start}.");
                                }
                            }
                            Err(e) => println!("{e}"),
                        }
                    }
                    "buy" => {
                        if parts.len() < 3 {
                            println!("Usage: buy <city> <model name>");
                            continue;
                        }
                        let model = parts[2..].join(" ");
                        match manager.buy_plane(&model, parts[1]) {
                            Ok(registration) => {
                                println!(
                                    "Bought {model} as {registration}. Balance {:.2}.",
                                    manager.cash()
                                );
                                persist(&manager, &args.save);
                            }
                            Err(e) => println!("{e}"),
                        }
                    }
                    "sell" => {
                        let Some(plane) = parts.get(1) else {
                            println!("Usage: sell <plane>");
                            continue;
                        };
                        match manager.sell_plane(plane) {
                            Ok(value) => {
                                println!("Sold for {value:.2}. Balance {:.2}.", manager.cash());
                                persist(&manager, &args.save);
                            }
                            Err(e) => println!("{e}"),
                        }
                    }
                    "hub" => {
                        let Some(city) = parts.get(1) else {
                            println!("Usage: hub <city>");
                            continue;
                        };
                        match manager.invest_in_hub(city) {
                            Ok(hub) => {
                                println!(
                                    "Hub is now {} (level {}), upkeep {:.0}/week.",
                                    hub.tier_name(),
                                    hub.level(),
                                    hub.weekly_cost()
                                );
                                persist(&manager, &args.save);
                            }
                            Err(e) => println!("{e}"),
                        }
                    }
                    "check" => check_plan(&manager),
                    "next" => match manager.advance_week() {
                        Ok(s) => {
                            println!("Week {} settled:", s.week);
                            println!("  flights flown   {:>12}", s.flights);
                            println!("  revenue         {:>12.2}", s.revenue);
                            println!("  flight costs    {:>12.2}", s.flight_cost);
                            println!("  maintenance     {:>12.2}", s.maintenance);
                            println!("  hub upkeep      {:>12.2}", s.hub_upkeep);
                            let profit = format!("{:>12.2}", s.profit);
                            let profit = if s.profit < 0.0 {
                                profit.as_str().red()
                            } else {
                                profit.as_str().green()
                            };
                            println!("  profit          {}", profit);
                            println!("  new balance     {:>12.2}", s.balance);
                            if s.balance < 0.0 {
                                println!("{}", "Warning: balance is negative!".red());
                            }
                            persist(&manager, &args.save);
                        }
                        Err(error::SimError::PlanInvalid(issues)) => {
                            println!("{}", "Flight plan is not flyable:".red());
                            for issue in issues {
                                println!("  {}", issue);
                            }
                        }
                        Err(e) => println!("{e}"),
                    },
                    "save" => {
                        manager.snapshot().save_to_file(&args.save)?;
                        println!("Saved to {}.", args.save.display());
                    }
                    "reset" => {
                        manager = AirlineManager::new_game(world.clone(), config.clone())?;
                        persist(&manager, &args.save);
                        println!("Started over.");
                        show_status(&manager);
                    }
                    "help" | "?" => print_help(),
                    "exit" | "quit" => break,
                    _ => println!("Unknown command: {}", parts[0]),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    persist(&manager, &args.save);
    Ok(())
}
