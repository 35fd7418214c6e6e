//! Arena Dashboard
//!
//! Terminal client for the trading analytics backend: browse and compare
//! Arena simulations, follow running jobs until they finish, and inspect
//! Live20 signal runs and stock data.

mod analytics;
mod api;
mod comparison;
mod config;
mod format;
mod models;
mod polling;

use std::io::BufRead;
use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use futures::future::try_join_all;
use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use crate::analytics::{
    compare_to_benchmark, monthly_pnl, monthly_trade_frequency, portfolio_composition,
    position_concentration, positions_for_snapshot, sector_allocation, sector_performance,
    summarize_live20, unrealized_estimate,
};
use crate::api::{
    ArenaClient, BenchmarkSymbol, CreateSimulationRequest, Live20RunDetail, SimulationDetail,
};
use crate::comparison::{group_simulations, ComparisonTable, Highlight, SortField, SortState};
use crate::config::{poll_interval_from_millis, DashboardConfig};
use crate::format::{
    format_currency, format_days, format_large_number, format_percent, format_pnl, format_ratio,
    format_score, symbol_preview, truncate, PLACEHOLDER,
};
use crate::models::{Position, Simulation};
use crate::polling::{JobSource, Live20Jobs, PollPhase, Poller, SimulationJobs};

/// Trading analytics dashboard CLI.
#[derive(Parser)]
#[command(name = "arenadash")]
#[command(about = "Browse, compare and follow Arena simulations and Live20 runs", long_about = None)]
struct Cli {
    /// Backend API base URL
    #[arg(long, env = "ARENA_API_URL")]
    api_url: Option<String>,

    /// Status poll interval in milliseconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    poll_interval_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List simulations
    List {
        /// Only simulations in this comparison group
        #[arg(short, long)]
        group: Option<String>,

        /// Maximum number of simulations to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },

    /// Show a simulation with its portfolio analytics
    Show {
        id: i64,

        /// Holdings as of this simulated day (defaults to the latest)
        #[arg(short, long)]
        day: Option<u32>,
    },

    /// Compare the simulations of a group side by side
    Compare {
        group_id: String,

        /// Column to sort by (total_return_pct, max_drawdown_pct, sharpe_ratio, ...)
        #[arg(short, long, default_value = "total_return_pct")]
        sort: SortField,

        /// Sort ascending instead of descending
        #[arg(long)]
        asc: bool,
    },

    /// Follow a running simulation until it finishes
    Watch { id: i64 },

    /// Cancel a running simulation
    Cancel { id: i64 },

    /// Delete a simulation
    Delete { id: i64 },

    /// Start a new simulation
    Create {
        /// Comma-separated symbols
        #[arg(short, long, value_delimiter = ',', required = true)]
        symbols: Vec<String>,

        /// First simulated day (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,

        /// Last simulated day (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,

        /// Starting capital in USD
        #[arg(short, long, default_value = "10000")]
        capital: Decimal,

        /// Capital per position in USD
        #[arg(short, long, default_value = "1000")]
        position_size: Decimal,

        /// Trailing stop percentage (0-100)
        #[arg(long)]
        trailing_stop: Option<Decimal>,

        /// Minimum score for a buy signal (0-100)
        #[arg(long)]
        min_buy_score: Option<u32>,

        #[arg(long)]
        name: Option<String>,

        /// Comparison group to add the simulation to
        #[arg(long)]
        group: Option<String>,

        /// Keep following the simulation after creating it
        #[arg(short, long)]
        watch: bool,
    },

    /// Compare a simulation's return against SPY/QQQ
    Benchmark {
        id: i64,

        /// Single benchmark (SPY or QQQ); both when omitted
        #[arg(short, long)]
        symbol: Option<BenchmarkSymbol>,
    },

    /// Live20 signal analysis runs
    Live20 {
        #[command(subcommand)]
        command: Live20Commands,
    },

    /// Show recent daily prices for a symbol
    Prices {
        symbol: String,

        /// Lookback period (1mo, 3mo, 6mo, 1y)
        #[arg(short, long, default_value = "1mo")]
        period: String,

        /// Include indicator values (20-day moving average)
        #[arg(short, long)]
        indicators: bool,

        /// Number of most recent days to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show current configuration
    Config,
}

#[derive(Subcommand)]
enum Live20Commands {
    /// List recent runs
    List {
        #[arg(short, long, default_value = "20")]
        limit: u32,
    },

    /// Show one run with its setups
    Show { id: i64 },

    /// Follow a run until it finishes
    Watch { id: i64 },

    /// Cancel a running analysis
    Cancel { id: i64 },

    /// Delete a run
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = DashboardConfig::from_env()?;
    if let Some(url) = cli.api_url {
        config.api_base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(ms) = cli.poll_interval_ms {
        config.poll_interval = poll_interval_from_millis(ms)?;
    }

    let client = ArenaClient::new(&config)?;

    match cli.command {
        Commands::List { group, limit } => {
            let mut simulations = client.list_all_simulations().await?;
            if let Some(group) = &group {
                simulations.retain(|s| s.group_id.as_deref() == Some(group.as_str()));
            }

            if simulations.is_empty() {
                println!("No simulations found. Use 'arenadash create' to start one.");
                return Ok(());
            }

            let shown: Vec<&Simulation> = simulations.iter().take(limit).collect();
            print_simulation_list(&shown, &config);

            if simulations.len() > shown.len() {
                println!("\n({} of {} shown)", shown.len(), simulations.len());
            }
        }

        Commands::Show { id, day } => {
            let detail = client.get_simulation(id).await?;
            print_simulation_detail(&detail, day, &config);
        }

        Commands::Compare {
            group_id,
            sort,
            asc,
        } => {
            let mut groups = group_simulations(client.list_all_simulations().await?);
            let Some(members) = groups.remove(&group_id) else {
                let known: Vec<&String> = groups.keys().collect();
                if known.is_empty() {
                    println!("No comparison groups found.");
                } else {
                    println!("Group '{}' not found. Known groups:", group_id);
                    for key in known {
                        println!("  {}", key);
                    }
                }
                return Ok(());
            };

            let mut state = SortState::default();
            if state.field != sort {
                state.click(sort);
            }
            if asc {
                state.click(sort);
            }

            let table = ComparisonTable::build(&members, state);
            print_comparison(&group_id, &table);
        }

        Commands::Watch { id } => {
            watch_job(SimulationJobs::new(client), id, config.poll_interval, render_simulation_progress)
                .await?;
        }

        Commands::Cancel { id } => {
            client.cancel_simulation(id).await?;
            let detail = client.get_simulation(id).await?;
            println!(
                "Cancel requested for {}: status is now {}",
                detail.simulation.display_name(),
                detail.simulation.status
            );
        }

        Commands::Delete { id } => {
            client.delete_simulation(id).await?;
            println!("Deleted simulation #{}", id);
        }

        Commands::Create {
            symbols,
            start,
            end,
            capital,
            position_size,
            trailing_stop,
            min_buy_score,
            name,
            group,
            watch,
        } => {
            let request = CreateSimulationRequest {
                symbols: symbols.iter().map(|s| s.trim().to_uppercase()).collect(),
                start_date: start,
                end_date: end,
                initial_capital: capital,
                position_size,
                trailing_stop_pct: trailing_stop,
                min_buy_score,
                name,
                group_id: group,
            };
            request.validate().map_err(|e| anyhow!("Invalid simulation: {}", e))?;

            info!(symbols = request.symbols.len(), start = %start, end = %end, "Creating simulation");
            let simulation = client.create_simulation(&request).await?;

            println!("Created {} ({})", simulation.display_name(), simulation.status);
            println!(
                "Symbols: {}",
                symbol_preview(&simulation.symbols, config.symbol_preview_limit)
            );

            if watch {
                watch_job(
                    SimulationJobs::new(client),
                    simulation.id,
                    config.poll_interval,
                    render_simulation_progress,
                )
                .await?;
            }
        }

        Commands::Benchmark { id, symbol } => {
            let symbols = match symbol {
                Some(s) => vec![s],
                None => vec![BenchmarkSymbol::Spy, BenchmarkSymbol::Qqq],
            };

            let (detail, series) = tokio::try_join!(
                client.get_simulation(id),
                try_join_all(symbols.iter().map(|s| client.get_benchmark(id, *s)))
            )?;

            println!("\n=== Benchmark: {} ===", detail.simulation.display_name());
            println!(
                "\n{:<8} {:>12} {:>12} {:>12}",
                "INDEX", "SIMULATION", "BENCHMARK", "EXCESS"
            );
            println!("{}", "-".repeat(47));

            for (symbol, points) in symbols.iter().zip(series.iter()) {
                match compare_to_benchmark(&detail.snapshots, points) {
                    Some(c) => println!(
                        "{:<8} {:>12} {:>12} {:>12}",
                        symbol,
                        format_percent(c.simulation_return_pct),
                        format_percent(c.benchmark_return_pct),
                        format_percent(c.excess_return_pct)
                    ),
                    None => println!(
                        "{:<8} {:>12} {:>12} {:>12}",
                        symbol, PLACEHOLDER, PLACEHOLDER, PLACEHOLDER
                    ),
                }
            }
        }

        Commands::Live20 { command } => match command {
            Live20Commands::List { limit } => {
                let page = client.list_live20_runs(limit, 0).await?;

                if page.items.is_empty() {
                    println!("No Live20 runs found.");
                    return Ok(());
                }

                println!(
                    "\n{:<8} {:<10} {:>8} {:>6} {:>6} {:>9} {:<20}",
                    "ID", "STATUS", "SYMBOLS", "LONG", "SHORT", "NO SETUP", "CREATED"
                );
                println!("{}", "-".repeat(73));

                for run in &page.items {
                    println!(
                        "{:<8} {:<10} {:>8} {:>6} {:>6} {:>9} {:<20}",
                        run.id,
                        run.status,
                        run.symbol_count,
                        run.long_count,
                        run.short_count,
                        run.no_setup_count,
                        run.created_at
                            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                            .unwrap_or_else(|| PLACEHOLDER.to_string())
                    );
                }

                if page.has_more {
                    println!("\n({} of {} shown)", page.items.len(), page.total);
                }
            }

            Live20Commands::Show { id } => {
                let detail = client.get_live20_run(id).await?;
                print_live20_detail(&detail);
            }

            Live20Commands::Watch { id } => {
                watch_job(Live20Jobs::new(client), id, config.poll_interval, render_live20_progress)
                    .await?;
            }

            Live20Commands::Cancel { id } => {
                client.cancel_live20_run(id).await?;
                let detail = client.get_live20_run(id).await?;
                println!("Cancel requested for run #{}: status is now {}", id, detail.run.status);
            }

            Live20Commands::Delete { id } => {
                client.delete_live20_run(id).await?;
                println!("Deleted Live20 run #{}", id);
            }
        },

        Commands::Prices {
            symbol,
            period,
            indicators,
            limit,
        } => {
            let candles = client.get_prices(&symbol, &period).await?;
            let ma = if indicators {
                client.get_indicators(&symbol, &period).await?
            } else {
                Vec::new()
            };

            if candles.is_empty() {
                println!("No price data for {}", symbol.to_uppercase());
                return Ok(());
            }

            println!("\n=== {} ({}) ===", symbol.to_uppercase(), period);
            println!(
                "\n{:<12} {:>10} {:>10} {:>10} {:>10} {:>8} {:>8} {:>10}",
                "DATE", "OPEN", "HIGH", "LOW", "CLOSE", "CHANGE", "VOLUME", "MA20"
            );
            println!("{}", "-".repeat(85));

            let skip = candles.len().saturating_sub(limit);
            for candle in candles.iter().skip(skip) {
                let ma20 = ma
                    .iter()
                    .find(|p| p.date == candle.date)
                    .and_then(|p| p.value("ma_20"));

                println!(
                    "{:<12} {:>10} {:>10} {:>10} {:>10} {:>8} {:>8} {:>10}",
                    candle.date,
                    format_currency(candle.open),
                    format_currency(candle.high),
                    format_currency(candle.low),
                    format_currency(candle.close),
                    format_percent(candle.change_pct()),
                    format_large_number(candle.volume),
                    format_currency(ma20)
                );
            }
        }

        Commands::Config => {
            println!("\n=== Dashboard Configuration ===\n");
            println!("Backend:");
            println!("  API URL:              {}", config.api_base_url);
            println!("  Request Timeout:      {}s", config.request_timeout.as_secs());
            println!("  Page Size:            {}", config.page_size);

            println!("\nPolling:");
            println!("  Interval:             {}ms", config.poll_interval.as_millis());

            println!("\nDisplay:");
            println!("  Monthly P&L After:    {} trading days", config.min_snapshots_for_monthly);
            println!("  Winners/Losers Shown: {}", config.composition_preview);
            println!("  Symbols Shown:        {}", config.symbol_preview_limit);
        }
    }

    Ok(())
}

/// Poll a job until it reaches a terminal status, printing each change.
///
/// `r` + Enter refetches now, `c` + Enter cancels the job, Ctrl+C stops
/// watching without touching the job.
async fn watch_job<S, F>(source: S, id: i64, interval: Duration, render: F) -> Result<()>
where
    S: JobSource,
    F: Fn(&S::Detail) -> String,
{
    let handle = Poller::new(source, interval).spawn();
    let mut updates = handle.subscribe();
    let mut input = spawn_line_reader(std::io::BufReader::new(std::io::stdin()));
    let mut input_open = true;

    handle.set_target(Some(id));
    println!("Watching #{} (r+Enter refresh, c+Enter cancel, Ctrl+C quit)\n", id);

    let mut last_line = String::new();
    let mut last_error: Option<String> = None;

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();

                if let Some(detail) = &state.detail {
                    let line = render(detail);
                    if line != last_line {
                        println!("{}", line);
                        last_line = line;
                    }
                }
                if state.error != last_error {
                    if let Some(e) = &state.error {
                        warn!(error = %e, "Job error");
                        println!("Error: {}", e);
                    }
                    last_error = state.error.clone();
                }
                if state.phase == PollPhase::Terminal {
                    break;
                }
            }
            line = input.recv(), if input_open => {
                match line {
                    Some(cmd) => match cmd.trim() {
                        "r" => handle.refetch(),
                        "c" => {
                            println!("Cancelling #{}...", id);
                            handle.cancel();
                        }
                        _ => {}
                    },
                    None => input_open = false,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Stopped watching");
                break;
            }
        }
    }

    let state = handle.current();
    handle.shutdown().await;

    match (state.phase, state.status(), state.error) {
        (PollPhase::Terminal, _, Some(e)) => Err(anyhow!("Polling stopped: {}", e)),
        (PollPhase::Terminal, Some(status), None) => {
            println!("\nFinished: {}", status);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Forward lines from a blocking reader running on its own thread.
///
/// The thread is never joined, so a read still waiting on the terminal does
/// not hold up runtime shutdown.
fn spawn_line_reader<R>(reader: R) -> mpsc::UnboundedReceiver<String>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || {
        for line in reader.lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Failed to read stdin");
                    break;
                }
            }
        }
    });

    rx
}

fn render_simulation_progress(detail: &SimulationDetail) -> String {
    let sim = &detail.simulation;
    let equity = detail.latest_snapshot().and_then(|s| s.total_equity);

    format!(
        "[{:<9}] day {}/{} ({}) equity {} return {}",
        sim.status,
        sim.current_day,
        sim.total_days,
        sim.progress_pct()
            .map(|p| format!("{:.0}%", p))
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
        format_currency(equity),
        format_percent(detail.latest_snapshot().and_then(|s| s.cumulative_return_pct))
    )
}

fn render_live20_progress(detail: &Live20RunDetail) -> String {
    let run = &detail.run;
    format!(
        "[{:<9}] {}/{} symbols ({}) long {} short {} no setup {}",
        run.status,
        run.processed_count,
        run.symbol_count,
        run.progress_pct()
            .map(|p| format!("{:.0}%", p))
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
        run.long_count,
        run.short_count,
        run.no_setup_count
    )
}

fn print_simulation_list(simulations: &[&Simulation], config: &DashboardConfig) {
    println!(
        "\n{:<6} {:<24} {:<10} {:<23} {:>9} {:>6} {:<30}",
        "ID", "NAME", "STATUS", "PERIOD", "RETURN", "DONE", "SYMBOLS"
    );
    println!("{}", "-".repeat(112));

    for sim in simulations {
        let done = if sim.is_terminal() {
            String::new()
        } else {
            sim.progress_pct()
                .map(|p| format!("{:.0}%", p))
                .unwrap_or_else(|| PLACEHOLDER.to_string())
        };

        println!(
            "{:<6} {:<24} {:<10} {:<23} {:>9} {:>6} {:<30}",
            sim.id,
            truncate(&sim.display_name(), 22),
            sim.status,
            format!("{} → {}", sim.start_date, sim.end_date),
            format_percent(sim.total_return_pct),
            done,
            truncate(&symbol_preview(&sim.symbols, config.symbol_preview_limit), 30)
        );
    }
}

fn print_simulation_detail(detail: &SimulationDetail, day: Option<u32>, config: &DashboardConfig) {
    let sim = &detail.simulation;
    let positions = &detail.positions;

    println!("\n=== Simulation: {} ===", sim.display_name());
    println!("ID:      {}", sim.id);
    println!("Status:  {}", sim.status);
    println!("Period:  {} to {}", sim.start_date, sim.end_date);
    println!("Symbols: {}", symbol_preview(&sim.symbols, config.symbol_preview_limit));
    if let Some(group) = &sim.group_id {
        println!("Group:   {}", group);
    }
    if !sim.is_terminal() {
        if let Some(p) = sim.progress_pct() {
            println!("Progress: day {}/{} ({:.0}%)", sim.current_day, sim.total_days, p);
        }
    }
    if let Some(err) = &sim.error_message {
        println!("Error:   {}", err);
    }

    println!("\n--- Parameters ---");
    println!("Initial Capital:  {}", format_currency(sim.initial_capital));
    println!("Position Size:    {}", format_currency(sim.position_size));
    println!("Trailing Stop:    {}", format_percent(sim.trailing_stop_pct));
    println!("Min Buy Score:    {}", format_score(sim.min_buy_score));

    println!("\n--- Performance ---");
    println!("Total Return:     {}", format_percent(sim.total_return_pct));
    println!("Max Drawdown:     {}", format_percent(sim.max_drawdown_pct));
    println!("Sharpe Ratio:     {}", format_ratio(sim.sharpe_ratio));
    println!("Profit Factor:    {}", format_ratio(sim.profit_factor));
    println!("Win Rate:         {}", format_percent(sim.win_rate()));
    println!("Total Trades:     {} ({} winning)", sim.total_trades, sim.winning_trades);
    println!("Avg Hold:         {}", format_days(sim.avg_hold_days));
    println!("Avg Win:          {}", format_pnl(sim.avg_win_pnl).labeled());
    println!("Avg Loss:         {}", format_pnl(sim.avg_loss_pnl).labeled());
    println!("Realized P&L:     {}", format_pnl(sim.total_realized_pnl).labeled());
    println!("Final Equity:     {}", format_currency(sim.final_equity));

    let latest = detail.latest_snapshot();
    if let Some(unrealized) = unrealized_estimate(sim, latest, positions) {
        println!("Unrealized P&L:   {} (estimate)", format_pnl(unrealized).labeled());
    }

    let allocation = sector_allocation(positions);
    if !allocation.is_empty() {
        println!("\n--- Sector Allocation (open positions) ---");
        println!("{:<24} {:>9} {:>14} {:>8}", "SECTOR", "POSITIONS", "COST BASIS", "SHARE");
        for row in &allocation {
            println!(
                "{:<24} {:>9} {:>14} {:>7.1}%",
                truncate(&row.sector, 22),
                row.position_count,
                format_currency(row.cost_basis),
                row.percentage
            );
        }
    }

    let performance = sector_performance(positions);
    if !performance.is_empty() {
        println!("\n--- Sector Performance (closed trades) ---");
        println!("{:<24} {:>7} {:>6} {:>16}", "SECTOR", "TRADES", "WIN%", "P&L");
        for row in &performance {
            println!(
                "{:<24} {:>7} {:>5.1}% {:>16}",
                truncate(&row.sector, 22),
                row.trade_count,
                row.win_rate * 100.0,
                format_pnl(row.total_pnl).labeled()
            );
        }
    }

    println!("\n--- Monthly P&L ---");
    match monthly_pnl(&detail.snapshots, config.min_snapshots_for_monthly) {
        Some(months) => {
            for month in months {
                println!(
                    "{:<8} {:>16} ({} days)",
                    month.month,
                    format_pnl(month.pnl).labeled(),
                    month.trading_days
                );
            }
        }
        None => println!(
            "Available after {} trading days ({} so far)",
            config.min_snapshots_for_monthly,
            detail.snapshots.len()
        ),
    }

    let frequency = monthly_trade_frequency(positions);
    if !frequency.is_empty() {
        println!("\n--- Trades per Month ---");
        for month in frequency {
            println!("{:<8} {:>4}", month.month, month.trades);
        }
    }

    let composition = portfolio_composition(positions, config.composition_preview);
    if !composition.winners.is_empty() {
        println!("\n--- Top Trades ---");
        print_trades(&composition.winners);

        println!("\n--- Worst Trades ---");
        if composition.has_losers() {
            print_trades(&composition.losers);
        } else {
            println!("No losing trades");
        }
    }

    let concentration = position_concentration(positions, latest);
    if !concentration.is_empty() {
        println!("\n--- Concentration (open positions) ---");
        for row in &concentration {
            println!(
                "{:<8} {:<20} {:>14} {:>7.1}%",
                row.symbol,
                truncate(&row.sector, 18),
                format_currency(row.cost_basis),
                row.pct_of_equity
            );
        }
    }

    let snapshot = match day {
        Some(n) => detail.snapshots.iter().find(|s| s.day_number == n),
        None => latest,
    };
    match (snapshot, day) {
        (Some(snapshot), _) => {
            let held = positions_for_snapshot(positions, Some(snapshot));
            println!(
                "\n--- Day {} ({}) ---",
                snapshot.day_number, snapshot.snapshot_date
            );
            println!(
                "Equity {}  Cash {}  Day P&L {}",
                format_currency(snapshot.total_equity),
                format_currency(snapshot.cash),
                format_pnl(snapshot.daily_pnl).labeled()
            );

            let actions: Vec<String> = snapshot
                .action_counts()
                .into_iter()
                .map(|(action, count)| format!("{} {}", action, count))
                .collect();
            if !actions.is_empty() {
                println!("Decisions: {}", actions.join(", "));
            }

            if held.is_empty() {
                println!("No positions held");
            } else {
                let symbols: Vec<String> = held.iter().map(|p| p.symbol.clone()).collect();
                println!("Holding: {}", symbol_preview(&symbols, config.symbol_preview_limit));
            }
        }
        (None, Some(n)) => println!("\nNo snapshot for day {}", n),
        (None, None) => {}
    }
}

fn print_trades(trades: &[&Position]) {
    println!(
        "{:<8} {:<12} {:<12} {:>9} {:>16}",
        "SYMBOL", "ENTRY", "EXIT", "RETURN", "P&L"
    );
    for p in trades {
        println!(
            "{:<8} {:<12} {:<12} {:>9} {:>16}",
            p.symbol,
            p.entry_date.map(|d| d.to_string()).unwrap_or_else(|| PLACEHOLDER.to_string()),
            p.exit_date.map(|d| d.to_string()).unwrap_or_else(|| PLACEHOLDER.to_string()),
            format_percent(p.return_pct),
            format_pnl(p.realized_pnl).labeled()
        );
    }
}

/// Metric cell text for one comparison column.
fn metric_cell(sim: &Simulation, field: SortField) -> String {
    match field {
        SortField::TotalReturnPct => format_percent(sim.total_return_pct),
        SortField::MaxDrawdownPct => format_percent(sim.max_drawdown_pct),
        SortField::SharpeRatio => format_ratio(sim.sharpe_ratio),
        SortField::ProfitFactor => format_ratio(sim.profit_factor),
        SortField::WinRate => format_percent(sim.win_rate()),
        SortField::TotalTrades => sim.total_trades.to_string(),
        SortField::AvgHoldDays => format_days(sim.avg_hold_days),
        SortField::AvgWinPnl => format_currency(sim.avg_win_pnl),
        SortField::AvgLossPnl => format_currency(sim.avg_loss_pnl),
    }
}

fn print_comparison(group_id: &str, table: &ComparisonTable<'_>) {
    println!("\n=== Comparison: {} ===", group_id);
    println!(
        "Sorted by {} ({:?}); * best, ! worst\n",
        table.state.field, table.state.direction
    );

    let mut header = format!("{:<20} {:<10}", "SIMULATION", "STATUS");
    for field in SortField::ALL {
        let marker = if field == table.state.field { "~" } else { "" };
        header.push_str(&format!(" {:>11}", format!("{}{}", field.label(), marker)));
    }
    println!("{}", header);
    println!("{}", "-".repeat(header.chars().count()));

    for sim in &table.rows {
        let mut line = format!("{:<20} {:<10}", truncate(&sim.display_name(), 18), sim.status);
        for field in SortField::ALL {
            let mark = match table.highlight(sim, field) {
                Some(Highlight::Best) => "*",
                Some(Highlight::Worst) => "!",
                None => "",
            };
            line.push_str(&format!(" {:>11}", format!("{}{}", metric_cell(sim, field), mark)));
        }
        println!("{}", line);
    }
}

fn print_live20_detail(detail: &Live20RunDetail) {
    let run = &detail.run;
    let summary = summarize_live20(&detail.results);

    println!("\n=== Live20 Run #{} ===", run.id);
    println!("Status:   {}", run.status);
    println!("Symbols:  {}/{}", run.processed_count, run.symbol_count);
    if let Some(err) = &run.error_message {
        println!("Error:    {}", err);
    }
    println!(
        "Setups:   {} long, {} short, {} no setup",
        summary.long, summary.short, summary.no_setup
    );

    if summary.setups.is_empty() {
        println!("\nNo actionable setups");
        return;
    }

    println!(
        "\n{:<8} {:<6} {:>6} {:<12} {:>10} {:<12}",
        "SYMBOL", "SIDE", "SCORE", "TREND", "MA20 DIST", "VOLUME"
    );
    println!("{}", "-".repeat(59));
    for result in &summary.setups {
        println!(
            "{:<8} {:<6} {:>6} {:<12} {:>10} {:<12}",
            result.symbol,
            result.direction.as_str(),
            format_score(result.confidence_score),
            truncate(result.trend.as_deref().unwrap_or(PLACEHOLDER), 12),
            format_percent(result.ma20_distance_pct.as_deref()),
            truncate(result.volume_signal.as_deref().unwrap_or(PLACEHOLDER), 12)
        );
    }
}
