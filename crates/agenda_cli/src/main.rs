//! CLI smoke entry point.
//!
//! # Responsibility
//! - Wire config, logging, store and service together outside any UI.
//! - Print one month grid with per-day period coverage.

use agenda_core::{
    init_logging_from_config, AgendaService, AgendaSession, CalendarDay, CoreConfig, MonthCursor,
    PeriodDraft, SqliteAgendaStore, WeekStart,
};
use clap::{Parser, ValueEnum};
use log::info;
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "agenda-cli")]
#[command(about = "Print a month of the colored agenda with period coverage")]
struct Cli {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Month to show (1-12); defaults to the current month
    #[arg(long)]
    month: Option<u32>,

    /// Year to show; defaults to the current year
    #[arg(long)]
    year: Option<i32>,

    /// First column of the grid; overrides the config value
    #[arg(long, value_enum)]
    week_start: Option<WeekStartArg>,

    /// Period to add before printing, as NAME=YYYY-MM-DD..YYYY-MM-DD
    #[arg(long = "period")]
    periods: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum WeekStartArg {
    Sunday,
    Monday,
}

impl From<WeekStartArg> for WeekStart {
    fn from(value: WeekStartArg) -> Self {
        match value {
            WeekStartArg::Sunday => WeekStart::Sunday,
            WeekStartArg::Monday => WeekStart::Monday,
        }
    }
}

fn main() {
    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = match cli.config.as_deref() {
        Some(path) => CoreConfig::load(path)?,
        None => CoreConfig::default(),
    };
    init_logging_from_config(&config)?;

    let conn = match config.database_path.as_deref() {
        Some(path) => agenda_core::db::open_db(path)?,
        None => agenda_core::db::open_db_in_memory()?,
    };
    let service = AgendaService::new(SqliteAgendaStore::try_new(&conn)?)
        .with_default_agenda_name(config.default_agenda_name.as_str());
    let agenda_id = service.ensure_default_agenda()?;

    for arg in &cli.periods {
        let draft = parse_period_arg(arg)?;
        service.create_period(agenda_id, &draft)?;
    }

    let mut session = AgendaSession::new();
    let _feed = service.open_feed(&mut session)?;

    let today = CalendarDay::today();
    let cursor = MonthCursor::new(
        cli.month.unwrap_or(today.month()),
        cli.year.unwrap_or(today.year()),
    )?;
    let week_start = cli.week_start.map(WeekStart::from).unwrap_or(config.week_start);
    let grid = cursor.grid(week_start)?;
    info!(
        "event=cli_render module=cli status=ok month={} year={} periods={}",
        grid.month(),
        grid.year(),
        session.periods().len()
    );

    let title = session
        .selected_agenda()
        .map(|agenda| agenda.name.as_str())
        .unwrap_or("");
    println!("{title} {:04}-{:02}", grid.year(), grid.month());
    println!(
        "{}",
        grid.weekday_labels()
            .iter()
            .map(|label| format!("{label:>7}"))
            .collect::<String>()
    );
    for week in grid.weeks() {
        let mut line = String::new();
        for cell in week {
            let coverage = session.day_coverage(cell.day, config.max_visible_periods);
            let mut marker = "*".repeat(coverage.visible.len());
            if coverage.overflow > 0 {
                marker.push_str(format!("+{}", coverage.overflow).as_str());
            }
            let day = if cell.is_other_month {
                format!("({})", cell.day_of_month)
            } else {
                cell.day_of_month.to_string()
            };
            line.push_str(format!("{:>7}", format!("{day}{marker}")).as_str());
        }
        println!("{line}");
    }
    for period in session.periods() {
        println!(
            "{} {} {} ({} days)",
            period.color,
            period.name,
            agenda_core::format_day_range(period.start(), period.end()),
            period.day_count()
        );
    }
    Ok(())
}

fn parse_period_arg(value: &str) -> Result<PeriodDraft, Box<dyn Error>> {
    let (name, range) = value
        .split_once('=')
        .ok_or_else(|| format!("period `{value}` must look like NAME=START..END"))?;
    let (start, end) = range
        .split_once("..")
        .ok_or_else(|| format!("period range `{range}` must look like START..END"))?;
    Ok(PeriodDraft::new(
        name,
        CalendarDay::parse(start.trim())?,
        CalendarDay::parse(end.trim())?,
    ))
}
