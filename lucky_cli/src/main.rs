use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use lucky_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "luckycal")]
#[command(about = "Numerology lucky calendar: flowing year, month and day numbers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Reference tables (TOML) replacing the built-in ones
    #[arg(long, global = true)]
    tables: Option<PathBuf>,

    /// Override export directory
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the calendar table for a month (default)
    Month {
        /// Birth date (YYYY-MM-DD)
        #[arg(long)]
        birth: Option<String>,

        /// Year to read (defaults to the current year)
        #[arg(long, value_parser = clap::value_parser!(i32).range(1900..=2100))]
        year: Option<i32>,

        /// Month to read, 1-12 (defaults to the current month)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        /// Write the table to the export directory
        #[arg(long)]
        export: bool,

        /// Export format (csv, json, xlsx)
        #[arg(long, requires = "export")]
        format: Option<String>,
    },

    /// Print the reading for a single day
    Day {
        /// Birth date (YYYY-MM-DD)
        #[arg(long)]
        birth: Option<String>,

        /// Date to read (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Validate the reference tables and print a summary
    Tables {
        /// Tables file to validate (defaults to --tables, then the config)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        lucky_core::logging::init_with_level("debug");
    } else {
        lucky_core::logging::init();
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let tables_path = match &cli.command {
        Some(Commands::Tables { path: Some(path) }) => Some(path.as_path()),
        _ => cli.tables.as_deref(),
    };
    let tables = config.reference_tables(tables_path)?;
    let output_dir = cli
        .output_dir
        .unwrap_or_else(|| config.output.dir.clone());

    match cli.command {
        Some(Commands::Month {
            birth,
            year,
            month,
            export,
            format,
        }) => {
            let format = match format {
                Some(f) => f.parse()?,
                None => config.output.format,
            };
            let export_to = export.then_some((output_dir, format));
            cmd_month(&config, &tables, birth, year, month, export_to)
        }
        Some(Commands::Day { birth, date }) => cmd_day(&config, &tables, birth, date),
        Some(Commands::Tables { .. }) => cmd_tables(&tables),
        None => {
            // Default to "month" command
            cmd_month(&config, &tables, None, None, None, None)
        }
    }
}

fn cmd_month(
    config: &Config,
    tables: &ReferenceTables,
    birth: Option<String>,
    year: Option<i32>,
    month: Option<u32>,
    export_to: Option<(PathBuf, ExportFormat)>,
) -> Result<()> {
    let birth = resolve_birth(birth, config)?;
    let today = Local::now().date_naive();
    let year = year.unwrap_or_else(|| today.year());
    let month = month.unwrap_or_else(|| today.month());

    warn_on_invalid_tables(tables);

    let ctx = ReadingContext::new(birth).with_leap_policy(config.reading.leap_birthday);
    let table = generate_month_table(tables, &ctx, year, month)?;

    display_banner();
    display_month(&table);

    if let Some((dir, format)) = export_to {
        let path = export_table(&table, &dir, format)?;
        println!();
        println!("✓ Exported {} days", table.rows.len());
        println!("  File: {}", path.display());
    }

    Ok(())
}

fn cmd_day(
    config: &Config,
    tables: &ReferenceTables,
    birth: Option<String>,
    date: Option<String>,
) -> Result<()> {
    let birth = resolve_birth(birth, config)?;
    let query = match date {
        Some(s) => parse_date(&s)?,
        None => Local::now().date_naive(),
    };

    warn_on_invalid_tables(tables);

    let ctx = ReadingContext::new(birth).with_leap_policy(config.reading.leap_birthday);
    let reading = read_day(tables, &ctx, query);

    display_banner();
    println!("  Birth: {}", birth);
    println!("  Date:  {} ({})", reading.date, reading.weekday);
    println!();

    let flowing = [
        (FlowingPeriodKind::Year, reading.flowing_year),
        (FlowingPeriodKind::Month, reading.flowing_month),
        (FlowingPeriodKind::Day, reading.flowing_day),
    ];
    for (kind, number) in flowing {
        println!("  {}  {}", kind.label(), number);
    }

    println!();
    println!(
        "  {} {}  {}",
        reading.main_number, reading.day_name, reading.stars
    );
    println!("  → {}", reading.guidance);
    println!();
    println!("  幸運色   {}", reading.lucky.color);
    println!("  水晶     {}", reading.lucky.crystal);
    println!("  幸運小物 {}", reading.lucky.small_object);

    Ok(())
}

fn cmd_tables(tables: &ReferenceTables) -> Result<()> {
    let errors = tables.validate();
    if !errors.is_empty() {
        eprintln!("Reference table validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::TableValidation("Invalid reference tables".into()));
    }

    let mut keys: Vec<_> = tables.guidance.keys().collect();
    keys.sort();

    println!("✓ Reference tables are valid");
    println!("  Guidance entries: {}", tables.guidance.len());
    println!("  Lucky entries:    {}", tables.lucky.len());
    println!("  Default stars:    {}", tables.defaults.stars);
    println!(
        "  Keys: {}",
        keys.iter().map(|k| k.as_str()).collect::<Vec<_>>().join(", ")
    );

    Ok(())
}

fn resolve_birth(birth: Option<String>, config: &Config) -> Result<NaiveDate> {
    Ok(birth
        .as_deref()
        .map(parse_date)
        .transpose()?
        .unwrap_or_else(|| config.birth_date()))
}

fn warn_on_invalid_tables(tables: &ReferenceTables) {
    for error in tables.validate() {
        tracing::warn!("Reference tables: {}", error);
    }
}

fn display_banner() {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  🧭 樂覺製所生命靈數");
    println!("╰─────────────────────────────────────────╯");
    println!("  在數字之中，我們與自己不期而遇。");
    println!("  Be true, be you. 讓靈魂，自在呼吸。");
    println!();
}

fn display_month(table: &MonthTable) {
    println!(
        "  Birth: {}   Calendar: {}-{:02}",
        table.birth, table.year, table.month
    );
    println!();
    println!(
        "  {:<10}  {:<9}  {:<9}  {:<9}  {:<9}  {:>2}  {}",
        "Date", "Weekday", "Year", "Month", "Day", "#", "Stars"
    );
    println!("─────────────────────────────────────────────────────────────────────");

    for row in &table.rows {
        println!(
            "  {:<10}  {:<9}  {:<9}  {:<9}  {:<9}  {:>2}  {}",
            row.date.format("%Y-%m-%d"),
            row.weekday,
            row.flowing_year.to_string(),
            row.flowing_month.to_string(),
            row.flowing_day.to_string(),
            row.main_number,
            row.stars,
        );
        println!(
            "      {} {}  |  {} / {} / {}",
            row.day_name,
            row.guidance,
            row.lucky.color,
            row.lucky.crystal,
            row.lucky.small_object
        );
    }
}
