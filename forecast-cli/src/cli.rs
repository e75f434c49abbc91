use anyhow::Context;
use clap::{Parser, Subcommand};
use forecast_core::{
    Config, ForecastRequest, ForecastView, LATITUDE_RANGE, LONGITUDE_RANGE, MAX_FORECAST_DAYS,
    PrecipitationKind, UnitPreference, provider_from_config,
};
use inquire::{CustomType, CustomUserError, InquireError, Select, Text, validator::Validation};
use std::{ops::RangeInclusive, process::ExitCode};
use tracing::debug;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "14-day weather forecast")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch and show the forecast for the configured location.
    Show {
        /// Display unit; defaults to the configured one.
        #[arg(long, value_parser = parse_unit)]
        unit: Option<UnitPreference>,

        /// Terminal width used to pick the number of cards per row.
        #[arg(long, default_value_t = 140)]
        width: usize,

        /// Offer a °F/°C toggle after rendering.
        #[arg(short, long)]
        interactive: bool,
    },

    /// Set the location, default unit and precipitation semantic.
    Configure,

    /// Print where the config file lives.
    ConfigPath,
}

fn parse_unit(value: &str) -> Result<UnitPreference, String> {
    UnitPreference::try_from(value).map_err(|e| e.to_string())
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Toggle,
    Quit,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Toggle => f.write_str("Toggle °F/°C"),
            Action::Quit => f.write_str("Quit"),
        }
    }
}

fn is_cancel(err: &InquireError) -> bool {
    matches!(err, InquireError::OperationCanceled | InquireError::OperationInterrupted)
}

/// `Ok(None)` when the user pressed Esc or Ctrl-C, so the caller can stop quietly.
fn answered<T>(res: Result<T, InquireError>, what: &str) -> anyhow::Result<Option<T>> {
    match res {
        Ok(value) => Ok(Some(value)),
        Err(err) if is_cancel(&err) => Ok(None),
        Err(err) => Err(err).with_context(|| format!("Failed to read {what}")),
    }
}

fn within(
    range: RangeInclusive<f64>,
    message: &'static str,
) -> impl Fn(&f64) -> Result<Validation, CustomUserError> + Clone + 'static {
    move |value: &f64| {
        if range.contains(value) {
            Ok(Validation::Valid)
        } else {
            Ok(Validation::Invalid(message.into()))
        }
    }
}

const LATITUDE_HINT: &str = "Please enter a number between -90 and 90";
const LONGITUDE_HINT: &str = "Please enter a number between -180 and 180";

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Show { unit, width, interactive } => show(unit, width, interactive).await,
            Command::Configure => {
                configure()?;
                Ok(ExitCode::SUCCESS)
            }
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

async fn show(
    unit: Option<UnitPreference>,
    width: usize,
    interactive: bool,
) -> anyhow::Result<ExitCode> {
    let config = Config::load()?;
    let provider = provider_from_config(&config)?;
    let request = ForecastRequest::from_config(&config);
    let title = format!("{MAX_FORECAST_DAYS}-Day Forecast for {}", config.location.name);

    let mut view = ForecastView::new(unit.unwrap_or(config.default_unit));

    println!("{}", render::loading());
    view.load(provider.as_ref(), &request).await;

    if let Some(reason) = view.failure_reason() {
        eprintln!("{}", render::error(reason));
        return Ok(ExitCode::FAILURE);
    }

    loop {
        let days = view.days().unwrap_or_default();
        println!("{}", render::grid(&title, &days, width));

        if !interactive {
            break;
        }

        let choice = answered(
            Select::new("Next:", vec![Action::Toggle, Action::Quit]).prompt(),
            "selection",
        )?;
        match choice {
            Some(Action::Toggle) => {
                let unit = view.toggle_unit();
                debug!(%unit, phase = ?view.phase(), "Unit toggled");
            }
            Some(Action::Quit) | None => break,
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn configure() -> anyhow::Result<()> {
    let Some(config) = prompt_settings(&Config::load()?)? else {
        println!("Configuration cancelled.");
        return Ok(());
    };

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

/// Ask for every setting; `None` as soon as any prompt is cancelled.
fn prompt_settings(current: &Config) -> anyhow::Result<Option<Config>> {
    let mut config = current.clone();

    let Some(name) = answered(
        Text::new("Location name:").with_default(&current.location.name).prompt(),
        "location name",
    )?
    else {
        return Ok(None);
    };

    let Some(latitude) = answered(
        CustomType::<f64>::new("Latitude:")
            .with_default(current.location.latitude)
            .with_error_message(LATITUDE_HINT)
            .with_validator(within(LATITUDE_RANGE, LATITUDE_HINT))
            .prompt(),
        "latitude",
    )?
    else {
        return Ok(None);
    };

    let Some(longitude) = answered(
        CustomType::<f64>::new("Longitude:")
            .with_default(current.location.longitude)
            .with_error_message(LONGITUDE_HINT)
            .with_validator(within(LONGITUDE_RANGE, LONGITUDE_HINT))
            .prompt(),
        "longitude",
    )?
    else {
        return Ok(None);
    };

    let Some(timezone) = answered(
        Text::new("Timezone (IANA name):").with_default(&current.location.timezone).prompt(),
        "timezone",
    )?
    else {
        return Ok(None);
    };

    let units = vec![UnitPreference::Fahrenheit, UnitPreference::Celsius];
    let cursor = units.iter().position(|u| *u == current.default_unit).unwrap_or(0);
    let Some(default_unit) = answered(
        Select::new("Default unit:", units).with_starting_cursor(cursor).prompt(),
        "default unit",
    )?
    else {
        return Ok(None);
    };

    let kinds = PrecipitationKind::all().to_vec();
    let cursor = kinds.iter().position(|k| *k == current.precipitation).unwrap_or(0);
    let Some(precipitation) = answered(
        Select::new("Precipitation (probability % or sum in inches):", kinds)
            .with_starting_cursor(cursor)
            .prompt(),
        "precipitation semantic",
    )?
    else {
        return Ok(None);
    };

    config.location.name = name.trim().to_string();
    config.location.latitude = latitude;
    config.location.longitude = longitude;
    config.location.timezone = timezone.trim().to_string();
    config.default_unit = default_unit;
    config.precipitation = precipitation;

    Ok(Some(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_show_with_unit() {
        let cli = Cli::try_parse_from(["forecast", "show", "--unit", "celsius", "--width", "60"])
            .expect("valid args");

        match cli.command {
            Command::Show { unit, width, interactive } => {
                assert_eq!(unit, Some(UnitPreference::Celsius));
                assert_eq!(width, 60);
                assert!(!interactive);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn show_defaults() {
        let cli = Cli::try_parse_from(["forecast", "-vv", "show"]).expect("valid args");
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Show { unit, width, .. } => {
                assert_eq!(unit, None);
                assert_eq!(width, 140);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_unit() {
        assert!(Cli::try_parse_from(["forecast", "show", "--unit", "kelvin"]).is_err());
    }

    #[test]
    fn parses_configure_and_config_path() {
        let cli = Cli::try_parse_from(["forecast", "configure"]).expect("valid args");
        assert!(matches!(cli.command, Command::Configure));

        let cli = Cli::try_parse_from(["forecast", "config-path"]).expect("valid args");
        assert!(matches!(cli.command, Command::ConfigPath));
    }

    #[test]
    fn coordinate_validators_use_config_bounds() {
        let latitude = within(LATITUDE_RANGE, LATITUDE_HINT);
        assert!(matches!(latitude(&38.627), Ok(Validation::Valid)));
        assert!(matches!(latitude(&90.0), Ok(Validation::Valid)));
        assert!(matches!(latitude(&90.5), Ok(Validation::Invalid(_))));
        assert!(matches!(latitude(&f64::NAN), Ok(Validation::Invalid(_))));

        let longitude = within(LONGITUDE_RANGE, LONGITUDE_HINT);
        assert!(matches!(longitude(&-180.0), Ok(Validation::Valid)));
        assert!(matches!(longitude(&-180.1), Ok(Validation::Invalid(_))));
    }

    #[test]
    fn cancelled_prompts_are_not_errors() {
        let esc: Result<f64, InquireError> = Err(InquireError::OperationCanceled);
        assert!(answered(esc, "latitude").expect("cancel is not an error").is_none());

        let ctrl_c: Result<f64, InquireError> = Err(InquireError::OperationInterrupted);
        assert!(answered(ctrl_c, "latitude").expect("cancel is not an error").is_none());

        assert_eq!(answered(Ok(1.5), "latitude").expect("answered"), Some(1.5));
    }

    #[test]
    fn other_prompt_failures_carry_context() {
        let failed: Result<String, InquireError> = Err(InquireError::NotTTY);
        let err = answered(failed, "timezone").unwrap_err();
        assert!(err.to_string().contains("Failed to read timezone"));
    }
}
