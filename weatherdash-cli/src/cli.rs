use anyhow::{Context, anyhow};
use chrono::{DateTime, Local, Utc};
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use weatherdash_core::{
    Config, KeywordResponder, Location, ProviderId, Responder, chat, dashboard, emergency,
    presentation::{DashboardView, TemperatureBand},
    provider::default_provider_from_config,
    registry, resolver_from_config,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherdash", version, about = "Weather dashboard in your terminal")]
pub struct Cli {
    /// Show debug logs on stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// How the user picks a location.
#[derive(Debug, Args, Default)]
pub struct PlaceArgs {
    /// Place name; the top search result is used.
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    pub place: Option<String>,

    /// Latitude, as if clicked on the map.
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude, as if clicked on the map.
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, "mock" or "openweather".
        provider: String,
    },

    /// Search for a location.
    Search {
        /// Free-text query, at least two characters.
        query: String,
    },

    /// Show the weather dashboard for a location.
    Show {
        #[command(flatten)]
        place: PlaceArgs,
    },

    /// Ask the weather assistant something.
    Chat {
        /// The message to send; without one the assistant introduces itself.
        message: Vec<String>,

        #[command(flatten)]
        place: PlaceArgs,
    },

    /// Emergency contacts, alerts and shareable help messages.
    Emergency {
        #[command(flatten)]
        place: PlaceArgs,
    },

    /// Continental regions and major cities.
    Global,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        // `configure` saves what it loads, so it must not see the env overlay.
        let mut config = match &self.command {
            Command::Configure { .. } => Config::load_file()?,
            _ => Config::load()?,
        };

        match self.command {
            Command::Configure { provider } => {
                let key = prompt_api_key(&provider)?;
                let id = apply_provider_choice(&mut config, &provider, key)?;
                config.save()?;
                println!(
                    "Saved {id} as default provider in {}",
                    Config::config_file_path()?.display()
                );
            }
            Command::Search { query } => search(&config, &query).await,
            Command::Show { place } => {
                let location = resolve_place(&config, &place).await?;
                let provider = default_provider_from_config(&config)?;
                let data = dashboard::load(provider.as_ref(), &location)
                    .await
                    .map_err(|e| {
                        let hint = e.user_message();
                        anyhow::Error::new(e).context(hint)
                    })?;
                print_dashboard(&data.view(), data.current.sunrise, data.current.sunset);
            }
            Command::Chat { message, .. } if message.is_empty() => print_greeting(),
            Command::Chat { message, place } => {
                let utterance = message.join(" ");
                let current = if place.is_given() {
                    let location = resolve_place(&config, &place).await?;
                    let provider = default_provider_from_config(&config)?;
                    Some(
                        provider
                            .current_conditions(location.coordinates, Some(&location.name))
                            .await?,
                    )
                } else {
                    None
                };
                println!("🤖 {}", KeywordResponder.respond(&utterance, current.as_ref()));
            }
            Command::Emergency { place } => {
                let location = resolve_place(&config, &place).await?;
                print_emergency(&location);
            }
            Command::Global => print_global(),
        }

        Ok(())
    }
}

impl PlaceArgs {
    fn is_given(&self) -> bool {
        self.place.is_some() || self.lat.is_some()
    }
}

/// Asks for the key when `provider` needs one.
fn prompt_api_key(provider: &str) -> anyhow::Result<Option<String>> {
    let id = ProviderId::try_from(provider)?;
    if !id.requires_api_key() {
        return Ok(None);
    }

    let key = inquire::Password::new(&format!("API key for {id}:"))
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    Ok(Some(key))
}

fn apply_provider_choice(
    config: &mut Config,
    provider: &str,
    api_key: Option<String>,
) -> anyhow::Result<ProviderId> {
    let id = ProviderId::try_from(provider)?;

    if id.requires_api_key() {
        let key = api_key.map(|k| k.trim().to_string()).unwrap_or_default();
        if key.is_empty() {
            return Err(anyhow!("API key must not be empty"));
        }
        config.upsert_provider_api_key(id, key);
    }
    config.set_default_provider(id);
    Ok(id)
}

async fn search(config: &Config, query: &str) {
    let results = resolver_from_config(config).search(query).await;
    if results.is_empty() {
        println!("No locations found for '{query}'.");
        return;
    }

    for location in results {
        println!(
            "{:<32} {:<10} {}",
            location.full_name(),
            location.kind,
            location.coordinates
        );
    }
}

/// Explicit coordinates, then the top search hit, then the default location.
async fn resolve_place(config: &Config, args: &PlaceArgs) -> anyhow::Result<Location> {
    if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        return Ok(Location::from_map_click(lat, lon)?);
    }

    match &args.place {
        Some(query) => {
            let location = resolver_from_config(config)
                .search(query)
                .await
                .into_iter()
                .next()
                .ok_or_else(|| anyhow!("Location not found: {query}"))?;
            debug!(query = %query, name = %location.name, "resolved place");
            Ok(location)
        }
        None => Ok(Location::default_location()),
    }
}

fn local_time(ts: i64) -> String {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .map(|t| t.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

fn print_dashboard(view: &DashboardView, sunrise: i64, sunset: i64) {
    let current = &view.current;
    println!("{}", view.location);
    println!(
        "{}  {}°C  {}   H: {}° L: {}°",
        current.icon.emoji(),
        current.temperature,
        current.description,
        current.high,
        current.low
    );
    for tile in &current.details {
        println!("  {:<12} {}", tile.label, tile.value);
    }
    println!("  {:<12} {}  /  {}", "Sun", local_time(sunrise), local_time(sunset));

    println!("\nHourly");
    let hours: Vec<String> = view
        .hourly
        .iter()
        .map(|h| format!("{} {} {}°", h.hour, h.icon.emoji(), h.temp))
        .collect();
    println!("  {}", hours.join("  "));

    println!("\nDaily");
    for ((label, temp), humidity) in view
        .daily
        .labels
        .iter()
        .zip(&view.daily.temperatures)
        .zip(&view.daily.humidity)
    {
        println!("  {label:<4} {temp:>4}°C  {humidity:>3}%");
    }

    let aqi = &view.air_quality;
    let marker = if aqi.tier.is_alert() { "⚠️" } else { "✅" };
    println!("\nAir Quality Index: {} {} ({}) - {}", marker, aqi.index, aqi.label, aqi.description);
    for p in &aqi.pollutants {
        println!("  {:<6} {} {}", p.name, p.value, p.unit);
    }
}

fn print_emergency(location: &Location) {
    println!("Emergency Weather Mode - {}", location.full_name());

    println!("\nAlerts");
    for alert in emergency::simulated_alerts(Utc::now()) {
        println!(
            "  {} {} (expires {})",
            alert.severity.icon(),
            alert.title,
            alert.expires.with_timezone(&Local).format("%H:%M")
        );
        println!("     {}", alert.message);
    }

    println!("\nContacts");
    for contact in emergency::DEFAULT_CONTACTS {
        println!("  {:<20} {:<20} {}", contact.name, contact.number, contact.tel_link());
    }

    println!("\nShare");
    println!("  SMS:      {}", emergency::sms_link(location));
    println!("  WhatsApp: {}", emergency::whatsapp_link(location));
    println!("  Text:     {}", emergency::clipboard_text(location));

    println!("\nSafety tips");
    for tip in emergency::SAFETY_TIPS {
        println!("  - {tip}");
    }
}

fn print_greeting() {
    println!("🤖 {}", chat::GREETING);
    println!("\nTry asking:");
    for question in chat::QUICK_QUESTIONS {
        println!("  weatherdash chat \"{question}\"");
    }
}

fn print_global() {
    println!("Continental regions");
    for (name, coords, temp) in registry::continental_regions() {
        let band = TemperatureBand::from_celsius(temp);
        println!(
            "  {name:<14} {temp:>5.0}°C  {:<10} {}  {coords}",
            band.description(),
            band.color()
        );
    }

    println!("\nMajor cities");
    for (city, country) in registry::major_cities().into_iter().take(50) {
        let country = country.map(|c| format!("{} ({})", c.name, c.code)).unwrap_or_default();
        println!("  {city:<18} {country:<28} {}", registry::climate_zone_of(city));
    }

    println!("\nTry: weatherdash chat \"{}\"", chat::QUICK_QUESTIONS[0]);
}
