use std::net::SocketAddr;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use clap::{Parser, Subcommand};
use comfy_table::{modifiers, presets, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use terminal_size::{terminal_size, Width};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use infradash::api::HttpFetcher;
use infradash::chart::{self, svg, PlotArea};
use infradash::config::{self, DashboardConfig, DEFAULT_HOST, DEFAULT_MOCK_DATA_FILE, DEFAULT_MOCK_HOST, DEFAULT_MOCK_PORT, DEFAULT_PORT};
use infradash::mock_backend::{load_mock_data, mock_router};
use infradash::models::{AppState, InstanceRecord, PollState};
use infradash::routes::build_router;
use infradash::services::{samples_for_record, PollingController};

fn load_config(env_file: Option<&str>) -> DashboardConfig {
    config::load_env_file(env_file);
    DashboardConfig::from_env()
}

fn build_controller(cfg: &DashboardConfig) -> Arc<PollingController> {
    match HttpFetcher::new(cfg.api_url.clone(), cfg.request_timeout) {
        Ok(fetcher) => Arc::new(PollingController::new(Arc::new(fetcher), cfg.field_mapping.clone())),
        Err(e) => {
            tracing::error!(%e, "Failed to create HTTP client");
            eprintln!("{}: {}", yansi::Paint::new("Failed to create HTTP client").red(), e);
            process::exit(1);
        }
    }
}

fn parse_addr(host: &str, port: u16) -> SocketAddr {
    match format!("{}:{}", host, port).parse() {
        Ok(a) => a,
        Err(e) => {
            tracing::error!(%e, "Invalid host/port format");
            eprintln!("{}: {}", yansi::Paint::red("Invalid host/port format"), e);
            process::exit(1);
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(%e, "Failed to listen for Ctrl-C");
    }
    tracing::info!("shutdown requested");
}

async fn serve_router(app: axum::Router, addr: SocketAddr) {
    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            if let Err(e) = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await {
                tracing::error!(%e, "Server encountered an error while running");
                eprintln!("{}: {}", yansi::Paint::new("Server error").red(), e);
                process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!(%e, "Failed to bind to address; is the port already in use?");
            eprintln!(
                "{}: {}\n{}",
                yansi::Paint::new(format!("Failed to bind to {}", addr)).red(),
                e,
                yansi::Paint::new("Please stop any process using this port, or start with a different --port value.").yellow()
            );
            process::exit(1);
        }
    }
}

async fn start_server(cfg: DashboardConfig, host: &str, port: u16, stylesheet: Option<String>) {
    let controller = build_controller(&cfg);
    let mut state = AppState::new(Arc::clone(&controller), cfg.max_attempts, cfg.refresh_interval);
    if let Some(path) = stylesheet {
        match tokio::fs::read_to_string(&path).await {
            Ok(css) => {
                state.custom_css = Some(css);
                tracing::info!("Loaded custom stylesheet from {}", path);
            }
            Err(e) => {
                tracing::error!(%e, "Failed to read custom stylesheet");
                eprintln!("{} {}: {}", yansi::Paint::red("Failed to read custom stylesheet at"), path, e);
                process::exit(1);
            }
        }
    }

    let addr = parse_addr(host, port);
    let initial = Arc::clone(&controller);
    let max_attempts = cfg.max_attempts;
    tokio::spawn(async move {
        initial.poll(max_attempts).await;
    });
    let refresh = controller.start_auto_refresh(cfg.refresh_interval);

    tracing::info!(%addr, api_url = %cfg.api_url, "Starting infradash server");
    println!(
        "{} {}",
        yansi::Paint::new("Dashboard running on").green(),
        yansi::Paint::new(format!("http://{}", addr)).cyan()
    );
    serve_router(build_router(state), addr).await;
    controller.stop(&refresh);
}

/// Full-retry poll with a spinner showing the current attempt.
async fn poll_with_spinner(controller: &Arc<PollingController>, max_attempts: u32) -> PollState {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(format!("Fetching {}", controller.endpoint()));
    pb.enable_steady_tick(Duration::from_millis(100));

    let mut rx = controller.subscribe();
    let progress = pb.clone();
    let watcher = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let attempt = match &*rx.borrow_and_update() {
                PollState::Loading { attempt, .. } => Some(*attempt),
                _ => None,
            };
            if let Some(attempt) = attempt {
                progress.set_message(format!("Fetching inventory (attempt {}/{})", attempt, max_attempts.max(1)));
            }
        }
    });

    let outcome = controller.poll(max_attempts).await;
    watcher.abort();
    pb.finish_and_clear();
    outcome
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if let Some((Width(w), _)) = terminal_size() {
        table.set_width(w.saturating_sub(4));
    }
    table
}

fn print_instances_table(records: &[InstanceRecord]) {
    if records.is_empty() {
        println!("{}", yansi::Paint::new("No data found.").dim());
        return;
    }
    let mut table = new_table();
    table.set_header(vec!["Name / ID", "State", "Type", "AZ", "Private IP", "Project", "Tenant", "Owner"]);
    for r in records {
        table.add_row(vec![
            r.display_label(),
            r.state.label(),
            r.instance_type.clone(),
            r.availability_zone.clone(),
            r.private_ip.clone(),
            r.project.clone(),
            r.tenant.clone(),
            r.owner.clone(),
        ]);
    }
    println!("\n{table}");
}

fn print_last_update(state: &PollState) {
    println!(
        "{}",
        yansi::Paint::new(format!("Last Update: {}", infradash::handlers::helpers::format_last_update(state))).dim()
    );
}

/// Exit with the poll's error message when it failed.
fn require_success(state: &PollState) {
    if let Some(message) = state.error_message() {
        eprintln!("{}", yansi::Paint::new(message).red());
        process::exit(1);
    }
}

async fn show_instance(state: &PollState, instance_id: &str, svg_path: Option<String>) {
    let Some(record) = state.inventory().and_then(|inv| inv.find(instance_id)) else {
        eprintln!("{} '{}' {}", yansi::Paint::new("Instance").red(), instance_id, yansi::Paint::new("not found").red());
        process::exit(1);
    };

    println!(
        "\n{} {}",
        yansi::Paint::new(&record.name).bold(),
        yansi::Paint::new(format!("[{}]", record.state.label())).cyan()
    );
    let mut table = new_table();
    table.set_header(vec!["Field", "Value"]);
    for (label, value) in record.details() {
        table.add_row(vec![label.to_string(), value]);
    }
    println!("{table}");

    let samples = samples_for_record(record, Utc::now().date_naive());
    let Some(chart) = chart::render(&samples, &PlotArea::default()) else {
        println!("{}", yansi::Paint::new("No CPU history available.").dim());
        return;
    };

    println!("\n{}", yansi::Paint::new("7-Day Avg CPU Usage").bold().underline());
    let mut table = new_table();
    table.set_header(vec!["Date", "CPU %"]);
    for s in &samples {
        table.add_row(vec![s.timestamp.format("%Y-%m-%d").to_string(), format!("{:.1}", s.value)]);
    }
    println!("{table}");
    let x_labels: Vec<&str> = chart.x_ticks.iter().map(|t| t.label.as_str()).collect();
    let y_labels: Vec<&str> = chart.y_ticks.iter().map(|t| t.label.as_str()).collect();
    println!("{} {}", yansi::Paint::new("X ticks:").dim(), x_labels.join(", "));
    println!("{} {}", yansi::Paint::new("Y ticks:").dim(), y_labels.join(", "));

    if let Some(path) = svg_path {
        if let Err(e) = tokio::fs::write(&path, svg::to_svg(&chart)).await {
            tracing::error!(%e, %path, "Failed to write chart");
            eprintln!("{} {}: {}", yansi::Paint::red("Failed to write chart to"), path, e);
            process::exit(1);
        }
        println!("{} {}", yansi::Paint::new("Chart written to").green(), path);
    }
}

async fn watch(cfg: DashboardConfig, interval: Option<u64>) {
    let every = interval.map(Duration::from_secs).unwrap_or(cfg.refresh_interval);
    let controller = build_controller(&cfg);
    let mut rx = controller.subscribe();

    let first = poll_with_spinner(&controller, cfg.max_attempts).await;
    print_instances_table(first.records());
    if let Some(message) = first.error_message() {
        eprintln!("{}", yansi::Paint::new(message).red());
    }
    print_last_update(&first);
    let _ = rx.borrow_and_update();

    let handle = controller.start_auto_refresh(every);
    println!("{}", yansi::Paint::new(format!("Refreshing every {}s; press Ctrl-C to stop.", every.as_secs())).dim());
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = rx.borrow_and_update().clone();
                if state.is_loading() {
                    continue;
                }
                print_instances_table(state.records());
                if let Some(message) = state.error_message() {
                    eprintln!("{}", yansi::Paint::new(message).red());
                }
                print_last_update(&state);
            }
            _ = &mut shutdown => break,
        }
    }
    controller.stop(&handle);
}

async fn start_mock_backend(data: String, host: &str, port: u16) {
    let addr = parse_addr(host, port);
    let data = load_mock_data(&data).await;
    tracing::info!(%addr, count = data.len(), "Starting mock metrics backend");
    println!(
        "{} {} ({} instances)",
        yansi::Paint::new("Mock backend running on").green(),
        yansi::Paint::new(format!("http://{}/api/metrics", addr)).cyan(),
        data.len()
    );
    serve_router(mock_router(data), addr).await;
}

#[derive(Parser)]
#[command(
    name = "infradash",
    author,
    version,
    about = "Infrastructure dashboard",
    long_about = r#"infradash polls a metrics endpoint for a compute inventory and shows it as a web dashboard or on the terminal.

Configuration comes from environment variables (API_URL, REFRESH_INTERVAL_SECS, MAX_ATTEMPTS, REQUEST_TIMEOUT_SECS, FIELD_MAP) or a .env file.

Examples:
  1) Serve the dashboard against a local mock backend:
      infradash mock-backend --port 5000 &
      infradash serve --port 8080
  2) Inspect from the terminal:
      infradash instances list
      infradash instances show i-0123 --svg cpu.svg
"#,
    after_help = "Use `infradash <subcommand> --help` to get subcommand specific options and usage examples."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Disable colorized output
    #[arg(long, global = true)]
    no_color: bool,
    /// Disable request/response logging
    #[arg(long, global = true)]
    silent: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web dashboard
    Serve {
        /// Host to bind to
        #[arg(long, default_value_t = String::from(DEFAULT_HOST))]
        host: String,
        /// Port to bind to
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Path to .env file
        #[arg(long)]
        env_file: Option<String>,
        /// Path to a custom stylesheet to serve instead of the default
        #[arg(long)]
        stylesheet: Option<String>,
    },
    /// Validate configuration and reach the metrics endpoint once
    #[command(
        about = "Validate configuration and ensure the metrics endpoint is reachable.",
        long_about = "Print the effective configuration, then make a single fetch attempt against API_URL and report whether a valid inventory came back."
    )]
    CheckConfig {
        #[arg(long)]
        env_file: Option<String>,
    },
    /// Inspect the inventory from the terminal
    Instances {
        #[command(subcommand)]
        sub: InstanceCommands,
    },
    /// Poll continuously and print the inventory on every change
    Watch {
        /// Seconds between refreshes (defaults to REFRESH_INTERVAL_SECS)
        #[arg(long)]
        interval: Option<u64>,
        #[arg(long)]
        env_file: Option<String>,
    },
    /// Serve a JSON inventory file as a metrics endpoint
    MockBackend {
        /// JSON file holding an array of instance objects
        #[arg(long, default_value_t = String::from(DEFAULT_MOCK_DATA_FILE))]
        data: String,
        #[arg(long, default_value_t = String::from(DEFAULT_MOCK_HOST))]
        host: String,
        #[arg(long, default_value_t = DEFAULT_MOCK_PORT)]
        port: u16,
    },
}

#[derive(Subcommand)]
enum InstanceCommands {
    #[command(about = "List instances", long_about = "Fetch the inventory (with retries) and print one row per instance.")]
    List {
        #[arg(long)]
        env_file: Option<String>,
    },
    #[command(about = "Show instance details", long_about = "Print the metadata and dated CPU history of one instance, with the chart's axis labels. Use --svg to also write the chart as a standalone SVG file.")]
    Show {
        instance_id: String,
        /// Write the CPU chart to this file
        #[arg(long)]
        svg: Option<String>,
        #[arg(long)]
        env_file: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        yansi::whenever(yansi::Condition::NEVER);
    }

    if cli.silent {
        infradash::api::set_silent(true);
    }

    // No subcommand serves the dashboard with defaults
    let Some(command) = cli.command else {
        start_server(load_config(None), DEFAULT_HOST, DEFAULT_PORT, None).await;
        return;
    };
    match command {
        Commands::Serve {
            host,
            port,
            env_file,
            stylesheet,
        } => {
            start_server(load_config(env_file.as_deref()), &host, port, stylesheet).await;
        }
        Commands::CheckConfig { env_file } => {
            let cfg = load_config(env_file.as_deref());
            let mut table = new_table();
            table.set_header(vec!["Setting", "Value"]);
            table.add_row(vec!["API_URL".to_string(), cfg.api_url.clone()]);
            table.add_row(vec!["REFRESH_INTERVAL_SECS".to_string(), cfg.refresh_interval.as_secs().to_string()]);
            table.add_row(vec!["MAX_ATTEMPTS".to_string(), cfg.max_attempts.to_string()]);
            table.add_row(vec!["REQUEST_TIMEOUT_SECS".to_string(), cfg.request_timeout.as_secs().to_string()]);
            println!("\n{table}");

            if !cfg.api_url.starts_with("http://") && !cfg.api_url.starts_with("https://") {
                eprintln!("{}", yansi::Paint::new("API_URL must start with http:// or https://").red());
                process::exit(1);
            }
            let controller = build_controller(&cfg);
            let outcome = controller.poll(1).await;
            require_success(&outcome);
            println!(
                "{}",
                yansi::Paint::new(format!("Configuration looks valid ({} instances returned)", outcome.records().len())).green()
            );
        }
        Commands::Instances { sub } => match sub {
            InstanceCommands::List { env_file } => {
                let cfg = load_config(env_file.as_deref());
                let controller = build_controller(&cfg);
                let outcome = poll_with_spinner(&controller, cfg.max_attempts).await;
                require_success(&outcome);
                print_instances_table(outcome.records());
                print_last_update(&outcome);
            }
            InstanceCommands::Show { instance_id, svg, env_file } => {
                let cfg = load_config(env_file.as_deref());
                let controller = build_controller(&cfg);
                let outcome = poll_with_spinner(&controller, cfg.max_attempts).await;
                require_success(&outcome);
                show_instance(&outcome, &instance_id, svg).await;
            }
        },
        Commands::Watch { interval, env_file } => {
            watch(load_config(env_file.as_deref()), interval).await;
        }
        Commands::MockBackend { data, host, port } => {
            start_mock_backend(data, &host, port).await;
        }
    }
}
