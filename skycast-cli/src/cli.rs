use anyhow::Result;
use clap::{Parser, Subcommand};
use inquire::{Confirm, Text};
use skycast_core::{
    Config, JsonFileStore, OpenWeatherClient, RecentSearches, SavedLocation, SessionError,
    WeatherSession, storage,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "City weather lookup with recent-search history")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show current conditions and the weekly strip for a city.
    Show {
        /// City name, e.g. "paris".
        city: String,

        /// Render temperatures in Fahrenheit.
        #[arg(long)]
        fahrenheit: bool,
    },

    /// Look up the saved default location.
    Here {
        /// Render temperatures in Fahrenheit.
        #[arg(long)]
        fahrenheit: bool,
    },

    /// Print the recent-search list.
    Recent,

    /// Store the API key and an optional default location.
    Configure,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Some(Command::Show { city, fahrenheit }) => {
                let mut session = open_session()?;
                if fahrenheit {
                    session.toggle_unit();
                }
                submit_and_report(&mut session, &city).await;
                println!("{}", render::recent_list(session.recent()));
            }
            Some(Command::Here { fahrenheit }) => {
                let mut session = open_session()?;
                if fahrenheit {
                    session.toggle_unit();
                }
                lookup_here(&mut session).await?;
            }
            Some(Command::Recent) => {
                let store = storage::shared(JsonFileStore::open(Config::data_file_path()?));
                let history = RecentSearches::load(store);
                println!("{}", render::recent_list(history.list()));
            }
            Some(Command::Configure) => configure()?,
            None => interactive().await?,
        }

        Ok(())
    }
}

fn open_session() -> Result<WeatherSession> {
    let config = Config::load()?;
    let api_key = config.api_key()?.to_string();
    let store = storage::shared(JsonFileStore::open(Config::data_file_path()?));

    Ok(WeatherSession::new(
        Box::new(OpenWeatherClient::new(api_key)),
        store,
    ))
}

/// Submit a query and print either the view or the surfaced failure.
async fn submit_and_report(session: &mut WeatherSession, city: &str) {
    match session.submit(city).await {
        Ok(()) => {
            if let Some(view) = session.view() {
                println!("{}", render::weather_report(&view));
            }
        }
        Err(err) => println!("{err}"),
    }
}

/// The CLI stand-in for a geolocation prompt: coordinates saved in the
/// config file. A missing location surfaces a geolocation failure with no
/// fallback.
async fn lookup_here(session: &mut WeatherSession) -> Result<()> {
    let config = Config::load()?;
    let Some(location) = config.location else {
        let err = SessionError::Geolocation {
            reason: "Unable to determine your location. Run `skycast configure` to save one."
                .to_string(),
        };
        println!("{err}");
        return Ok(());
    };

    match session
        .submit_coords(location.latitude, location.longitude)
        .await
    {
        Ok(()) => {
            if let Some(view) = session.view() {
                println!("{}", render::weather_report(&view));
            }
        }
        Err(err) => println!("{err}"),
    }

    Ok(())
}

async fn interactive() -> Result<()> {
    let mut session = open_session()?;
    println!(
        "skycast — type a city name, `u` to switch units, `here` for your saved location, `q` to quit."
    );

    loop {
        // A coordinate lookup leaves its resolved city name as the initial
        // prompt value.
        let echo = session.input_echo().map(ToString::to_string);
        let mut prompt = Text::new("city ❯");
        if let Some(echo) = echo.as_deref() {
            prompt = prompt.with_initial_value(echo);
        }

        let line = match prompt.prompt() {
            Ok(line) => line,
            Err(_) => break, // Esc or Ctrl-C ends the session.
        };

        match line.trim() {
            "q" | "quit" => break,
            "u" => {
                session.toggle_unit();
                match session.view() {
                    Some(view) => println!("{}", render::weather_report(&view)),
                    None => println!("Units set to {}.", session.unit().symbol()),
                }
            }
            "here" => lookup_here(&mut session).await?,
            input => {
                submit_and_report(&mut session, input).await;
                println!("{}", render::recent_list(session.recent()));
            }
        }
    }

    Ok(())
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let key = Text::new("OpenWeatherMap API key:").prompt()?;
    config.api_key = Some(key.trim().to_string());

    let save_location = Confirm::new("Save a default location for `skycast here`?")
        .with_default(false)
        .prompt()?;
    if save_location {
        let latitude: f64 = Text::new("Latitude:").prompt()?.trim().parse()?;
        let longitude: f64 = Text::new("Longitude:").prompt()?.trim().parse()?;
        config.location = Some(SavedLocation {
            latitude,
            longitude,
        });
    }

    config.save()?;
    println!("Saved to {}", Config::config_file_path()?.display());

    Ok(())
}
