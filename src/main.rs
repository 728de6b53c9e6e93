use std::path::Path;

use badge_generator::badge::BadgeSheet;
use badge_generator::config::Config;
use badge_generator::display::{print_badge_summary, write_artifact};
use badge_generator::error::AppError;
use badge_generator::render::{HtmlRenderer, Renderer, Template};
use badge_generator::wcif::load_competition;
use badge_generator::web;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    init_logging();
    let mut config = Config::from_env()?;

    // Check if we should run in web mode
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "web" {
        if let Some(port) = args.get(2).and_then(|p| p.parse::<u16>().ok()) {
            config.port = port;
        }

        println!("Access the site at http://localhost:{}", config.port);
        tracing::info!(port = config.port, policy = %config.failure_policy, "Starting web server");

        web::start_server(config).await?;
        return Ok(());
    }

    // CLI mode
    let Some(wcif_path) = args.get(1) else {
        eprintln!("Usage: {} <competition.json> [logo]", args[0]);
        eprintln!("       {} web [port]", args[0]);
        std::process::exit(2);
    };

    let logo = match args.get(2) {
        Some(path) => Some(copy_logo(Path::new(path), &config)?),
        None => None,
    };

    println!("Loading competition from {}...", wcif_path);
    let competition = load_competition(wcif_path)?;
    println!("Loaded {} persons", competition.persons.len());

    let sheet = BadgeSheet::generate(&competition, config.failure_policy, logo)?;
    print_badge_summary(&sheet);

    // Write documents to files
    println!("\n=== Writing Documents ===");
    let renderer = HtmlRenderer::default();
    for template in Template::ALL {
        let bytes = renderer.render(template, &sheet)?;
        let path = write_artifact(&config.output_dir, template.file_name(), &bytes)?;
        println!("  - {}", path.display());
    }

    Ok(())
}

/// Copies the logo next to the generated badges so the HTML can reference it by name.
fn copy_logo(path: &Path, config: &Config) -> std::io::Result<String> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "logo path has no file name"))?;
    std::fs::create_dir_all(&config.output_dir)?;
    std::fs::copy(path, config.output_dir.join(&name))?;
    Ok(name)
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("badge_generator=debug,info")),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
