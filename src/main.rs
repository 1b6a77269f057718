use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use indicatif::{ProgressBar, ProgressStyle};
use log::warn;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use terreplus::api::ApiClient;
use terreplus::auth::TokenStore;
use terreplus::capture::{
    CaptureSession, DEFAULT_CENTER, PolygonCapture, StaticLocation, TerminalSurface,
};
use terreplus::config::FileConfig;
use terreplus::domain::{DashboardStats, GeoPoint, MapSelection, Role, Terrain};
use terreplus::form::TerrainForm;
use terreplus::geometry::{geodesic_area_hectares, to_closed_ring};

/// Register terrains and get ML price estimates from TerrePlus
///
/// Examples:
///   # Sign in once; the session token is kept in the config dir
///   terreplus login -e ana@example.com -p secret
///
///   # Draw a boundary interactively and register it
///   terreplus register --name "Finca Norte" --soil arcilloso --road-km 1.5 --irrigation --draw --estimate
///
///   # Register from known vertices (lat,lng), area derived from the boundary
///   terreplus register --name "Lote 4" --soil franco --road-km 0 \
///     --point=-0.180,-78.468 --point=-0.180,-78.466 --point=-0.182,-78.466
///
///   # Estimate an existing terrain
///   terreplus estimate 42
#[derive(Parser, Debug)]
#[command(name = "terreplus")]
#[command(version, about, long_about = None, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file (optional, auto-searches terreplus.toml if not provided)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides config file and TERREPLUS_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and store the session token
    Login {
        #[arg(short = 'e', long)]
        email: String,
        #[arg(short = 'p', long)]
        password: String,
    },

    /// Create a new account
    Signup {
        #[arg(short = 'n', long)]
        name: String,
        #[arg(short = 'e', long)]
        email: String,
        #[arg(short = 'p', long)]
        password: String,
        #[arg(short = 'r', long, value_enum)]
        role: Role,
    },

    /// Forget the stored session token
    Logout,

    /// Draw a terrain boundary and print its center and GeoJSON ring
    Draw(DrawArgs),

    /// Register a terrain, optionally estimating its price right away
    Register(RegisterArgs),

    /// Request a price estimate for a registered terrain
    Estimate {
        terrain_id: u64,
        /// Estimation model id (defaults to the config value)
        #[arg(long)]
        model: Option<u64>,
    },

    /// List your terrains and their latest estimates
    History,

    /// Show platform statistics
    Dashboard,
}

#[derive(Args, Debug)]
struct DrawArgs {
    /// Current position used to center the map (lat,lng)
    #[arg(long, allow_hyphen_values = true)]
    near: Option<GeoPoint>,
}

#[derive(Args, Debug)]
struct RegisterArgs {
    /// Location name shown in your history
    #[arg(long)]
    name: Option<String>,

    /// Area in hectares (derived from the boundary when omitted)
    #[arg(long)]
    area: Option<String>,

    /// Soil type, e.g. arcilloso, franco, arenoso
    #[arg(long)]
    soil: String,

    /// The terrain has irrigation access
    #[arg(long)]
    irrigation: bool,

    /// Distance to the nearest road in km
    #[arg(long = "road-km")]
    road_km: String,

    /// Boundary vertex as lat,lng; repeat in drawing order (at least 3)
    #[arg(long = "point", allow_hyphen_values = true, conflicts_with = "draw")]
    points: Vec<GeoPoint>,

    /// Draw the boundary interactively instead of passing --point
    #[arg(long)]
    draw: bool,

    /// Current position used to center the map (lat,lng)
    #[arg(long, allow_hyphen_values = true, requires = "draw")]
    near: Option<GeoPoint>,

    /// Request a price estimate after saving
    #[arg(long)]
    estimate: bool,

    /// Estimation model id (defaults to the config value)
    #[arg(long)]
    model: Option<u64>,
}

struct App {
    config: FileConfig,
    tokens: TokenStore,
}

impl App {
    fn load(cli: &Cli) -> Result<Self> {
        let file_config: FileConfig = if let Some(ref config_path) = cli.config {
            if config_path.exists() {
                let contents = std::fs::read_to_string(config_path)
                    .context(format!("Failed to read config file: {:?}", config_path))?;
                toml::from_str(&contents).context("Failed to parse config file")?
            } else {
                bail!("Config file not found: {:?}", config_path);
            }
        } else {
            FileConfig::load().unwrap_or_default()
        };

        let mut config = file_config.with_env_overrides();
        if let Some(ref url) = cli.api_url {
            config.api_url = url.clone();
        }

        let tokens = match config.token_path {
            Some(ref path) => TokenStore::new(path),
            None => TokenStore::default_location().context("Failed to locate token storage")?,
        };

        Ok(Self { config, tokens })
    }

    fn api(&self) -> Result<ApiClient> {
        let token = self
            .tokens
            .load()
            .context("Failed to read session token")?;
        let client = ApiClient::new(
            &self.config.api_url,
            Duration::from_secs(self.config.timeout_secs),
        )?;
        Ok(client.with_token(token))
    }

    fn viewport_center(&self) -> GeoPoint {
        self.config.default_center.unwrap_or(DEFAULT_CENTER)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .format_timestamp(None)
        .init();

    let ctx = App::load(&cli)?;
    log::debug!("using backend {}", ctx.config.api_url);

    match cli.command {
        Commands::Login { email, password } => login(&ctx, &email, &password),
        Commands::Signup {
            name,
            email,
            password,
            role,
        } => signup(&ctx, &name, &email, &password, role),
        Commands::Logout => {
            ctx.tokens.remove().context("Failed to remove session token")?;
            println!("Signed out.");
            Ok(())
        }
        Commands::Draw(args) => draw(&ctx, &args),
        Commands::Register(args) => register(&ctx, &args),
        Commands::Estimate { terrain_id, model } => estimate(&ctx, terrain_id, model),
        Commands::History => history(&ctx),
        Commands::Dashboard => dashboard(&ctx),
    }
}

fn login(ctx: &App, email: &str, password: &str) -> Result<()> {
    let api = ctx.api()?;
    let spinner = create_spinner("Signing in...");
    let signed_in = abandon_on_err(&spinner, api.sign_in(email, password))
        .context("Sign-in failed, check your credentials")?;

    match signed_in.access_token {
        Some(ref token) => abandon_on_err(&spinner, ctx.tokens.save(token))
            .context("Failed to store session token")?,
        None => warn!("backend returned no access token; requests will be anonymous"),
    }

    spinner.finish_with_message(format!(
        "Signed in as {} ({})",
        signed_in.user.name,
        signed_in.user.role.as_str()
    ));
    Ok(())
}

fn signup(ctx: &App, name: &str, email: &str, password: &str, role: Role) -> Result<()> {
    let api = ctx.api()?;
    let spinner = create_spinner("Creating account...");
    let message = abandon_on_err(&spinner, api.sign_up(name, email, password, role))
        .context("Failed to register user")?;
    spinner.finish_with_message(if message.is_empty() {
        "Account created".to_string()
    } else {
        message
    });
    println!("You can now run `terreplus login`.");
    Ok(())
}

/// Run the interactive capture on stdin/stdout. `None` when cancelled.
fn draw_interactively(ctx: &App, near: Option<GeoPoint>) -> Option<MapSelection> {
    println!("Draw the terrain boundary: enter one vertex per line as lat,lng.");
    println!("Commands: undo, clear, done, cancel");

    let stdin = io::stdin();
    let surface = TerminalSurface::new(stdin.lock(), io::stdout());
    let mut session = CaptureSession::new(PolygonCapture::new(ctx.viewport_center()), surface);
    session.show(&mut StaticLocation(near.or(ctx.config.location)));
    session.run()
}

fn draw(ctx: &App, args: &DrawArgs) -> Result<()> {
    let Some(selection) = draw_interactively(ctx, args.near) else {
        println!("Cancelled.");
        return Ok(());
    };

    println!();
    println!("Center: {}", selection.center);
    if selection.polygon.is_empty() {
        println!("No boundary drawn (center only).");
        return Ok(());
    }

    if let Some(hectares) = geodesic_area_hectares(&selection.polygon) {
        println!("Area:   {:.2} ha", hectares);
    }
    let ring = to_closed_ring(&selection.polygon)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "type": "Polygon",
            "coordinates": [ring],
        }))?
    );
    Ok(())
}

fn register(ctx: &App, args: &RegisterArgs) -> Result<()> {
    let selection = if args.draw {
        match draw_interactively(ctx, args.near) {
            Some(selection) => selection,
            None => {
                println!("Cancelled.");
                return Ok(());
            }
        }
    } else {
        let mut capture = PolygonCapture::new(ctx.viewport_center());
        for point in &args.points {
            capture.add_point(*point);
        }
        capture.confirm()?
    };

    let mut form = TerrainForm::new();
    if let Some(ref name) = args.name {
        form.set_location_name(name.as_str());
    }
    form.set_soil_type(args.soil.as_str());
    form.set_irrigation(args.irrigation);
    form.set_road_distance(args.road_km.as_str());
    if let Some(ref area) = args.area {
        form.set_area(area.as_str());
    }
    form.apply_selection(selection);
    if let Some(hectares) = form.suggest_area() {
        println!("Area from drawn boundary: {:.2} ha", hectares);
    }

    let api = ctx.api()?;
    let spinner = create_spinner("Registering terrain...");
    let start = Instant::now();
    let id = abandon_on_err(&spinner, form.register(&api))
        .context("Failed to register terrain")?;
    spinner.finish_with_message(format!(
        "Registered terrain #{} \"{}\" [{:.1}s]",
        id,
        form.location_name(),
        start.elapsed().as_secs_f32()
    ));

    if args.estimate {
        let model = args.model.unwrap_or(ctx.config.model_id);
        let spinner = create_spinner("Estimating value...");
        let estimate = abandon_on_err(&spinner, form.estimate(&api, model))
            .context("Failed to estimate value")?;
        spinner.finish_with_message(format!("Estimated value: {}", estimate.label()));
    } else {
        println!("Run `terreplus estimate {}` to estimate its value.", id);
    }
    Ok(())
}

fn estimate(ctx: &App, terrain_id: u64, model: Option<u64>) -> Result<()> {
    let api = ctx.api()?;
    let model = model.unwrap_or(ctx.config.model_id);

    let mut form = TerrainForm::new();
    match api.my_terrains() {
        Ok(terrains) => match terrains.iter().find(|t| t.id == terrain_id) {
            Some(terrain) => form.load_terrain(terrain),
            None => bail!("Terrain #{} is not in your list", terrain_id),
        },
        Err(e) => warn!("could not load your terrains: {}", e),
    }

    let spinner = create_spinner("Estimating value...");
    let start = Instant::now();
    let estimate = if form.registered_id().is_some() {
        abandon_on_err(&spinner, form.estimate(&api, model))?
    } else {
        abandon_on_err(&spinner, api.estimate(terrain_id, model))?
    };
    let name = if form.location_name().is_empty() {
        format!("Terrain #{}", terrain_id)
    } else {
        form.location_name().to_string()
    };
    spinner.finish_with_message(format!(
        "{}: {} [{:.1}s]",
        name,
        estimate.label(),
        start.elapsed().as_secs_f32()
    ));
    Ok(())
}

fn history(ctx: &App) -> Result<()> {
    let api = ctx.api()?;
    let spinner = create_spinner("Loading your terrains...");
    let terrains = abandon_on_err(&spinner, api.my_terrains())
        .context("Could not load your terrains")?;
    spinner.finish_with_message(format!("{} terrains", terrains.len()));

    if terrains.is_empty() {
        println!("No terrains yet. Register one with `terreplus register`.");
        return Ok(());
    }

    println!();
    for terrain in &terrains {
        print_terrain(terrain);
    }
    Ok(())
}

fn print_terrain(terrain: &Terrain) {
    let latest = terrain.latest_consultation();
    let price = match latest.and_then(|c| c.price_per_hectare) {
        Some(p) => format!("${:.2}/ha", p),
        None => "No estimate".to_string(),
    };
    let date = latest
        .and_then(|c| c.date.as_deref())
        .map(|d| d.split('T').next().unwrap_or(d))
        .unwrap_or("-");

    println!("#{:<5} {}", terrain.id, terrain.display_name());
    println!(
        "       {} ha | {} | {} km to roads | soil: {}",
        terrain
            .area_hectares
            .map(|a| a.to_string())
            .unwrap_or_else(|| "?".to_string()),
        if terrain.irrigation.unwrap_or(false) {
            "irrigated"
        } else {
            "rain-fed"
        },
        terrain
            .road_distance_km
            .map(|d| d.to_string())
            .unwrap_or_else(|| "?".to_string()),
        terrain.soil_type.as_deref().unwrap_or("?"),
    );
    println!("       {} ({})", price, date);
}

fn dashboard(ctx: &App) -> Result<()> {
    let api = ctx.api()?;
    let spinner = create_spinner("Loading statistics...");
    let stats = abandon_on_err(&spinner, api.dashboard_stats())
        .context("Failed to load dashboard statistics")?;
    spinner.finish_and_clear();
    print_dashboard(&stats);
    Ok(())
}

fn print_dashboard(stats: &DashboardStats) {
    println!("TerrePlus Dashboard");
    println!("===================");
    println!();
    println!("  Terrains:     {}", stats.kpis.terrenos_registrados);
    println!("  New users:    {}", stats.kpis.usuarios_nuevos);
    println!("  Zones:        {}", stats.kpis.zonas_cubiertas);
    println!("  AI precision: {}", stats.kpis.precision_ia);

    if !stats.precision_mensual.is_empty() {
        println!();
        println!("Monthly precision:");
        for month in &stats.precision_mensual {
            println!("  {:<6} {:>6.1}", month.mes, month.promedio);
        }
    }

    if !stats.zonas_mas_activas.is_empty() {
        println!();
        println!("Most active zones:");
        for zone in &stats.zonas_mas_activas {
            println!("  {:<20} {}", zone.zona, zone.cantidad);
        }
    }

    let shares = stats.soil_shares();
    if !shares.is_empty() {
        println!();
        println!("Soil distribution:");
        for (soil, pct) in shares {
            println!("  {:<20} {:>5.1}%", soil, pct);
        }
    }

    if !stats.terrenos_recientes.is_empty() {
        println!();
        println!("Recent terrains:");
        for recent in &stats.terrenos_recientes {
            println!("  {:<20} {} ha  ({})", recent.zona, recent.area, recent.suelo);
        }
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Stop the spinner in place when `result` is an error, so the error is not
/// printed under a still-ticking spinner.
fn abandon_on_err<T, E>(spinner: &ProgressBar, result: Result<T, E>) -> Result<T, E> {
    if result.is_err() {
        spinner.abandon();
    }
    result
}
