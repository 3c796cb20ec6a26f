use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tw_core::{ArticleStore, PageRequest};
use tw_inference::{create_model, ArticleGenerator};
use tw_scrapers::logging::init_logging;
use tw_scrapers::scrapers::{HttpRenderer, PageRenderer, MAX_TOPICS};
use tw_scrapers::{
    spawn_periodic, GoogleTrendsScraper, IngestionManager, StaticTrendSource, TrendSource,
    TrendsConfig,
};
use tw_web::{create_app, AppState};

#[derive(Debug, Clone, Copy, PartialEq)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_seconds = 0u64;
        let mut current_number = String::new();
        let mut has_unit = false;

        for c in s.chars() {
            if c.is_ascii_digit() {
                current_number.push(c);
            } else if let Ok(num) = current_number.parse::<u64>() {
                let unit = match c {
                    's' => 1,
                    'm' => 60,
                    'h' => 3600,
                    'd' => 86400,
                    _ => return Err(format!("Invalid duration unit: {}", c)),
                };
                total_seconds = num
                    .checked_mul(unit)
                    .and_then(|secs| total_seconds.checked_add(secs))
                    .ok_or_else(|| format!("Duration is too large: {}", s))?;
                current_number.clear();
                has_unit = true;
            } else if !c.is_whitespace() {
                return Err(format!("Invalid character in duration: {}", c));
            }
        }

        // A bare trailing number counts as seconds
        if !current_number.is_empty() {
            match current_number.parse::<u64>() {
                Ok(num) => {
                    total_seconds = total_seconds
                        .checked_add(num)
                        .ok_or_else(|| format!("Duration is too large: {}", s))?;
                    has_unit = true;
                }
                Err(_) => return Err(format!("Duration is too large: {}", s)),
            }
        }

        if !has_unit {
            return Err("Duration must include a number".to_string());
        }
        if total_seconds == 0 {
            return Err("Duration must be greater than zero".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Turns trending search topics into SEO articles", long_about = None)]
pub struct Cli {
    /// Article store: memory or sqlite
    #[arg(long, default_value = "sqlite")]
    storage: String,
    /// SQLite database file, optionally prefixed with `sqlite:`
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
    #[arg(long, default_value = tw_inference::DEFAULT_MODEL, help = "Model to use for generation. Available models: gemini (default), deepseek, dummy")]
    model: String,
    /// Backend specific model identifier, e.g. gemini-1.5-flash
    #[arg(long)]
    model_name: Option<String>,
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    /// Overrides the model API base URL
    #[arg(long)]
    model_url: Option<String>,
    /// Region passed to Google Trends
    #[arg(long, default_value = tw_scrapers::scrapers::google_trends::DEFAULT_GEO)]
    trends_geo: String,
    /// CSS selector of the topic labels on the trends page
    #[arg(long, default_value = tw_scrapers::scrapers::google_trends::DEFAULT_SELECTOR)]
    trends_selector: String,
    #[arg(long, default_value_t = MAX_TOPICS)]
    max_topics: usize,
    /// Fetch the trends page with plain HTTP instead of a headless browser
    #[arg(long)]
    http_renderer: bool,
    /// Launch the headless browser without its sandbox (needed as root in containers)
    #[arg(long)]
    no_sandbox: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP API and run ingestion periodically
    Serve {
        #[arg(long, env = "PORT", default_value_t = 8000)]
        port: u16,
        /// Only this origin may call the API from a browser
        #[arg(long, env = "CLIENT_URL")]
        client_url: Option<String>,
        /// Time between scheduled runs (e.g. 6h, 30m, 1d, 1h15m30s)
        #[arg(long, default_value = "6h")]
        interval: HumanDuration,
        /// Run once at start-up instead of waiting a full interval
        #[arg(long)]
        run_on_start: bool,
    },
    /// Run ingestion once
    Generate {
        /// Topics to write about instead of the current trends
        topics: Vec<String>,
    },
    /// Print the currently trending topics
    Trends,
    /// List stored articles, newest first
    List {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Print a stored article
    Show { slug: String },
}

fn create_renderer(cli: &Cli) -> anyhow::Result<Arc<dyn PageRenderer>> {
    #[cfg(feature = "browser")]
    {
        if !cli.http_renderer {
            info!("🌐 Rendering trends with headless Chromium");
            return Ok(Arc::new(tw_scrapers::scrapers::ChromiumRenderer::new(
                cli.no_sandbox,
            )));
        }
    }

    #[cfg(not(feature = "browser"))]
    let _ = cli.no_sandbox;

    info!("🌐 Rendering trends over plain HTTP");
    Ok(Arc::new(HttpRenderer::new()?))
}

fn create_trends(cli: &Cli) -> anyhow::Result<GoogleTrendsScraper> {
    let config = TrendsConfig {
        geo: cli.trends_geo.clone(),
        selector: cli.trends_selector.clone(),
        max_topics: cli.max_topics,
        ..TrendsConfig::default()
    };
    Ok(GoogleTrendsScraper::new(create_renderer(cli)?, config))
}

fn create_generator(cli: &Cli) -> anyhow::Result<Arc<ArticleGenerator>> {
    let config = tw_inference::Config {
        model: cli.model.clone(),
        model_name: cli.model_name.clone(),
        api_key: cli.api_key.clone(),
        base_url: cli.model_url.clone(),
    };
    let model = create_model(&config).context("Failed to initialize inference model")?;
    info!("🧠 Inference model initialized (using {})", model.name());
    Ok(Arc::new(ArticleGenerator::new(model)))
}

async fn open_store(cli: &Cli) -> anyhow::Result<Arc<dyn ArticleStore>> {
    let store = tw_storage::create_storage(&cli.storage, cli.database_url.as_deref())
        .await
        .with_context(|| format!("Failed to open {} storage", cli.storage))?;
    info!("✨ Storage initialized successfully (using {})", cli.storage);
    Ok(store)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging(LevelFilter::INFO);
    let cli = Cli::parse();

    match &cli.command {
        Commands::Serve {
            port,
            client_url,
            interval,
            run_on_start,
        } => {
            let store = open_store(&cli).await?;
            let manager = Arc::new(IngestionManager::new(
                Arc::new(create_trends(&cli)?),
                create_generator(&cli)?,
                store,
            ));

            let scheduler = spawn_periodic(manager.clone(), interval.0, *run_on_start)?;

            let app = create_app(AppState::new(manager), client_url.as_deref())?;
            let listener = tokio::net::TcpListener::bind(("0.0.0.0", *port))
                .await
                .with_context(|| format!("Failed to bind port {}", port))?;
            info!("🚀 Listening on http://{}", listener.local_addr()?);

            let served = axum::serve(listener, app).await;
            scheduler.abort();
            served?;
        }
        Commands::Generate { topics } => {
            let store = open_store(&cli).await?;
            let trends: Arc<dyn TrendSource> = if topics.is_empty() {
                Arc::new(create_trends(&cli)?)
            } else {
                Arc::new(StaticTrendSource::new(topics.iter().cloned()))
            };
            let manager = IngestionManager::new(trends, create_generator(&cli)?, store);

            let summary = manager.run().await?;
            for article in &summary.created {
                println!("{}\t{}", article.slug, article.title);
            }
            info!(
                "📰 {} of {} topics produced new articles",
                summary.created.len(),
                summary.topics
            );
        }
        Commands::Trends => {
            let scraper = create_trends(&cli)?;
            let topics = scraper.scrape_topics().await?;
            if topics.is_empty() {
                bail!("No trending topics found with selector '{}'", cli.trends_selector);
            }
            for (i, topic) in topics.iter().enumerate() {
                println!("{:>2}. {}", i + 1, topic);
            }
        }
        Commands::List { page, limit } => {
            let store = open_store(&cli).await?;
            let listing = store.list_paged(PageRequest::new(*page, *limit)).await?;
            for article in &listing.articles {
                println!(
                    "{}  {}\t{}",
                    article.created_at.format("%Y-%m-%d %H:%M"),
                    article.slug,
                    article.title
                );
            }
            println!(
                "Page {}/{} ({} articles)",
                listing.current_page,
                listing.total_pages.max(1),
                listing.total_count
            );
        }
        Commands::Show { slug } => {
            let store = open_store(&cli).await?;
            match store.get_by_slug(slug).await? {
                Some(article) => {
                    println!("{}", article.content);
                }
                None => bail!("No article with slug '{}'", slug),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_duration() {
        assert_eq!("6h".parse::<HumanDuration>().unwrap().0, Duration::from_secs(21600));
        assert_eq!(
            "1h15m30s".parse::<HumanDuration>().unwrap().0,
            Duration::from_secs(4530)
        );
        assert_eq!("1d".parse::<HumanDuration>().unwrap().0, Duration::from_secs(86400));
        assert_eq!("90".parse::<HumanDuration>().unwrap().0, Duration::from_secs(90));
    }

    #[test]
    fn test_human_duration_rejects_garbage() {
        assert!("".parse::<HumanDuration>().is_err());
        assert!("5x".parse::<HumanDuration>().is_err());
        assert!("h".parse::<HumanDuration>().is_err());
        assert!("0m".parse::<HumanDuration>().is_err());
    }

    #[test]
    fn test_human_duration_overflow_is_an_error() {
        assert!("999999999999999999d".parse::<HumanDuration>().is_err());
        assert!("18446744073709551615s1s".parse::<HumanDuration>().is_err());
        assert!("99999999999999999999999".parse::<HumanDuration>().is_err());
    }

    #[test]
    fn test_cli_parses_serve() {
        let cli = Cli::try_parse_from([
            "trendwise",
            "--storage",
            "memory",
            "--model",
            "dummy",
            "serve",
            "--port",
            "9000",
            "--interval",
            "30m",
        ])
        .unwrap();
        assert_eq!(cli.storage, "memory");
        match cli.command {
            Commands::Serve { port, interval, run_on_start, .. } => {
                assert_eq!(port, 9000);
                assert_eq!(interval.0, Duration::from_secs(1800));
                assert!(!run_on_start);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_parses_generate_topics() {
        let cli = Cli::try_parse_from(["trendwise", "generate", "solar eclipse", "ipl"]).unwrap();
        match cli.command {
            Commands::Generate { topics } => assert_eq!(topics, vec!["solar eclipse", "ipl"]),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
