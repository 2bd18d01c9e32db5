//! Command-line interface definition

use crate::models::{ParameterSelection, WeatherParameter};
use clap::builder::{Styles, styling::AnsiColor};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const ABOUT: &str = "Pogoda z Open-Meteo dla miasta lub współrzędnych";

const LONG_ABOUT: &str = "
Current conditions, hourly forecast and recent history from Open-Meteo.

The location is either a place name (resolved through OpenStreetMap Nominatim) or a pair of
coordinates such as `52.2297,21.0122`. Responses are cached on disk; cached results are marked
in the output.

The output starts with a headline followed by the Polish text block. `--export` also writes the
charted series of the selected parameters to a semicolon-delimited text file. When the path is
an existing directory, each series goes to its own file named after the metric, place and time
range.
";

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default())
    .usage(AnsiColor::Green.on_default())
    .literal(AnsiColor::Green.on_default())
    .placeholder(AnsiColor::Green.on_default());

#[derive(Parser, Debug)]
#[command(name = "pogoda", version, styles = STYLES, about = ABOUT, long_about = LONG_ABOUT)]
pub struct Cli {
    /// Configuration file (default: <config dir>/pogoda/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Current weather
    Current(QueryArgs),
    /// Hourly forecast from today
    Forecast(ForecastArgs),
    /// Hourly data for the last days, today excluded
    Historical(HistoricalArgs),
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Place name or `lat,lon`
    #[arg(short, long)]
    pub location: String,

    /// Parameter to include, repeatable (default: all)
    #[arg(short, long = "param", value_enum)]
    pub params: Vec<ParamArg>,

    /// Also write the charted series of the selected parameters to this file,
    /// or one file per series when the path is a directory
    #[arg(short, long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Bypass the response cache
    #[arg(long)]
    pub no_cache: bool,
}

#[derive(Args, Debug)]
pub struct ForecastArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Days ahead, at most 16 (default from configuration)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=16))]
    pub days: Option<u32>,
}

#[derive(Args, Debug)]
pub struct HistoricalArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Past days, at most 92 (default from configuration)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=92))]
    pub days: Option<u32>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamArg {
    #[value(alias = "temperature_2m")]
    Temperature,
    #[value(alias = "soil_temperature_0cm")]
    SoilTemperature,
    #[value(alias = "windspeed_10m")]
    Wind,
    #[value(alias = "precipitation")]
    Rain,
    #[value(alias = "surface_pressure")]
    Pressure,
}

impl From<ParamArg> for WeatherParameter {
    fn from(arg: ParamArg) -> Self {
        match arg {
            ParamArg::Temperature => WeatherParameter::Temperature,
            ParamArg::SoilTemperature => WeatherParameter::SoilTemperature,
            ParamArg::Wind => WeatherParameter::WindSpeed,
            ParamArg::Rain => WeatherParameter::Precipitation,
            ParamArg::Pressure => WeatherParameter::SurfacePressure,
        }
    }
}

impl QueryArgs {
    /// Selected parameters; none given means all of them
    #[must_use]
    pub fn selection(&self) -> ParameterSelection {
        if self.params.is_empty() {
            ParameterSelection::all()
        } else {
            self.params.iter().copied().map(WeatherParameter::from).collect()
        }
    }
}

impl Command {
    #[must_use]
    pub fn query(&self) -> &QueryArgs {
        match self {
            Command::Current(args) => args,
            Command::Forecast(args) => &args.query,
            Command::Historical(args) => &args.query,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_current_defaults_to_all_parameters() {
        let cli = Cli::try_parse_from(["pogoda", "current", "--location", "Warszawa"]).unwrap();
        assert!(!cli.verbose);
        let Command::Current(args) = &cli.command else {
            panic!("expected current");
        };
        assert_eq!(args.location, "Warszawa");
        assert_eq!(args.selection(), ParameterSelection::all());
    }

    #[test]
    fn test_forecast_with_params_and_days() {
        let cli = Cli::try_parse_from([
            "pogoda",
            "--verbose",
            "forecast",
            "-l",
            "52.2297,21.0122",
            "--param",
            "pressure",
            "--param",
            "temperature_2m",
            "--param",
            "pressure",
            "--days",
            "5",
        ])
        .unwrap();

        assert!(cli.verbose);
        let Command::Forecast(args) = &cli.command else {
            panic!("expected forecast");
        };
        assert_eq!(args.days, Some(5));
        let selection = args.query.selection();
        assert_eq!(selection.len(), 2);
        assert_eq!(selection.joined(), "temperature_2m,surface_pressure");
    }

    #[test]
    fn test_forecast_days_capped_at_sixteen() {
        assert!(Cli::try_parse_from(["pogoda", "forecast", "-l", "Gdańsk", "--days", "16"]).is_ok());
        assert!(Cli::try_parse_from(["pogoda", "forecast", "-l", "Gdańsk", "--days", "17"]).is_err());

        let cli = Cli::try_parse_from(["pogoda", "historical", "-l", "Gdańsk", "--days", "92"]).unwrap();
        let Command::Historical(args) = &cli.command else {
            panic!("expected historical");
        };
        assert_eq!(args.days, Some(92));
        assert!(Cli::try_parse_from(["pogoda", "historical", "-l", "Gdańsk", "--days", "93"]).is_err());
    }

    #[test]
    fn test_rejects_zero_days_and_unknown_param() {
        assert!(Cli::try_parse_from(["pogoda", "historical", "-l", "Gdańsk", "--days", "0"]).is_err());
        assert!(Cli::try_parse_from(["pogoda", "current", "-l", "Gdańsk", "--param", "humidity"]).is_err());
    }

    #[test]
    fn test_location_is_required() {
        assert!(Cli::try_parse_from(["pogoda", "current"]).is_err());
    }
}
