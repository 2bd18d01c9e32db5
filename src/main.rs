use anyhow::{Context, Result};
use chrono::{Days, Local};
use clap::Parser;
use pogoda::chart::{ChartData, Metric};
use pogoda::cli::{Cli, Command};
use pogoda::render::{headline, render_outcome};
use pogoda::{
    Geocoder, LocationParser, LocationResolver, PogodaConfig, PogodaError, ReportKind,
    ResponseCache, WeatherClient, export, logging,
};
use std::process::ExitCode;
use tracing::{debug, error, info};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            match e.downcast_ref::<PogodaError>() {
                Some(err) => eprintln!("Błąd: {}", err.user_message()),
                None => eprintln!("Błąd: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

/// `Ok(false)` when the weather request itself failed and only the failure message was printed
fn run(cli: Cli) -> Result<bool> {
    let config = PogodaConfig::load_from_path(cli.config.clone())?;
    logging::init(&config.logging, cli.verbose)?;
    debug!("Loaded configuration: {:?}", config);

    let query = cli.command.query();
    let location_input = LocationParser::parse(&query.location)?;
    let parameters = query.selection();

    let geocoder = Geocoder::new(&config.geocoding)?;
    let cache = if config.cache.enabled && !query.no_cache {
        ResponseCache::open_or_disabled(&config.cache.location)
    } else {
        info!("Response cache disabled");
        ResponseCache::disabled()
    };
    let client = WeatherClient::new(&config, cache)?;

    let location = LocationResolver::resolve(&geocoder, location_input)
        .with_context(|| format!("Nie udało się ustalić lokalizacji '{}'", query.location))?;
    let coordinates = location.coordinates;

    let (kind, days, outcome) = match &cli.command {
        Command::Current(_) => (
            ReportKind::Current,
            0,
            client.current_weather(coordinates, &parameters),
        ),
        Command::Forecast(args) => {
            let days = args.days.unwrap_or(config.defaults.forecast_days);
            let today = Local::now().date_naive();
            let end = today
                .checked_add_days(Days::new(u64::from(days)))
                .context("Forecast end date out of range")?;
            (
                ReportKind::Forecast,
                days,
                client.forecast_weather(coordinates, &parameters, today, end),
            )
        }
        Command::Historical(args) => {
            let days = args.days.unwrap_or(config.defaults.historical_days);
            (
                ReportKind::Historical,
                days,
                client.historical_weather(coordinates, &parameters, days),
            )
        }
    };

    let text = format!(
        "{}\n{}",
        headline(kind, &location.name, days),
        render_outcome(kind, &outcome)
    );
    print!("{text}");

    if let Some(path) = &query.export {
        let metrics = Metric::selected(&parameters);
        if outcome.is_err() {
            info!("Nothing to export for a failed request");
        } else if metrics.is_empty() {
            info!("No charted parameter selected, nothing to export");
        } else {
            let chart = ChartData::from_text(&text);
            let written = export::export_chart(path, &chart, &metrics)
                .with_context(|| format!("Nie udało się zapisać pliku {}", path.display()))?;
            debug!("Export files: {:?}", written);
        }
    }

    client.into_cache().close();
    Ok(outcome.is_ok())
}
