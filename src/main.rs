use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fern::colors::{Color, ColoredLevelConfig};
use log::{info, LevelFilter};

use parking_calculator::calc_command::{CalcArgs, CalcCommand};
use parking_calculator::config::Config;
use parking_calculator::console::{ConsoleForm, JsonSnapshot};
use parking_calculator::datetime;
use parking_calculator::form_command::FormCommand;
use parking_calculator::session::Session;

/// ログレベルを指定する環境変数。
const LOG_ENV: &str = "PARKING_CALCULATOR_LOG";

/// 駐車料金を計算するためのCLIアプリケーション。
///
/// # Examples
/// ```
/// $ cargo run -- calc --entry 08:00 --exit 09:30 --rate 10
/// $ cargo run -- form
/// $ cargo run -- now
/// ```
#[derive(Debug, Parser)]
#[clap(version, about)]
struct Args {
    #[clap(long, global = true, help = "Path to the JSON configuration file")]
    config: Option<PathBuf>,

    #[clap(
        long,
        global = true,
        help = "Currency locale: pt-BR, en-US or de-DE"
    )]
    locale: Option<String>,

    #[clap(short, long, global = true, help = "Show debug logs")]
    verbose: bool,

    #[clap(subcommand)]
    subcommand: SubCommands,
}

/// サブコマンドを表す列挙型。
#[derive(Debug, Subcommand)]
enum SubCommands {
    /// Calculate the parking time and fee once
    Calc(CalcArgs),
    /// Fill in the calculator form interactively
    Form,
    /// Print the current time as HH:mm
    Now,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logger(args.verbose)?;

    let mut config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    config.apply_overrides(args.locale, None);
    let currency = config.currency_format()?;
    info!("Locale: {}, Default rate: {:?}", config.locale, config.hourly_rate);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let stderr = io::stderr();
    let mut alerts = stderr.lock();
    let accepted = match args.subcommand {
        SubCommands::Calc(calc) => {
            if calc.json {
                let mut presenter = JsonSnapshot::new(&mut out, &mut alerts);
                CalcCommand::new(&mut presenter, config.hourly_rate.as_str()).run(calc)?
            } else {
                let mut presenter = ConsoleForm::new(&mut out, &mut alerts, currency);
                CalcCommand::new(&mut presenter, config.hourly_rate.as_str()).run(calc)?
            }
        }
        SubCommands::Form => {
            let stdin = io::stdin();
            let mut presenter = ConsoleForm::new(&mut out, &mut alerts, currency);
            FormCommand::new(
                stdin.lock(),
                &mut presenter,
                Session::with_hourly_rate(config.hourly_rate.as_str()),
            )
            .run()?;
            true
        }
        SubCommands::Now => {
            writeln!(out, "{}", datetime::current_time_label())
                .context("Failed to write current time")?;
            true
        }
    };
    out.flush().context("Failed to flush output")?;
    alerts.flush().context("Failed to flush alerts")?;

    if !accepted {
        std::process::exit(1);
    }

    Ok(())
}

/// ログの出力先とレベルを設定する。
///
/// フォームの表示と混ざらないよう、ログは標準エラー出力に書き出す。
fn init_logger(verbose: bool) -> Result<()> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        env::var(LOG_ENV)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(LevelFilter::Warn)
    };
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(io::stderr())
        .apply()
        .context("Failed to initialize logger")?;

    Ok(())
}
