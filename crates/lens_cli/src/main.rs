use clap::Parser;
use lens_core::{ArticleRepository, NewAnalysis};
use lens_inference::prelude::*;
use lens_scrapers::prelude::{ArticleCacheService, HttpFetcher};
use lens_storage::create_repository;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

mod config;
mod logging;

use config::Settings;

#[derive(Parser, Debug)]
#[command(author, version, about = "Fetch, cache and analyse web articles", long_about = None)]
pub struct Cli {
    /// SQLite file holding cached articles and the analysis log
    #[arg(long, global = true)]
    database: Option<PathBuf>,
    /// Directory reports are written to
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,
    #[arg(long, global = true, help = "Analysis backend: openrouter, ollama or dummy")]
    provider: Option<String>,
    #[arg(long, global = true, default_value = "sqlite", help = "Storage backend: sqlite or memory")]
    storage: String,
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Fetch (or reuse) an article, analyse it and record the run
    Analyze {
        #[arg(long)]
        url: String,
        /// Fetch again even if the article is cached
        #[arg(long)]
        refresh: bool,
    },
    /// Show the most recent analyses
    History {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Show the most recently fetched articles
    Cached {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

async fn analyze(settings: &Settings, storage: &str, url: &str, refresh: bool) -> Result<()> {
    // Backend problems surface before anything is fetched or written.
    let model = create_model(&settings.inference_config())?;

    let repository = create_repository(storage, &settings.database_path).await?;
    let service = ArticleCacheService::new(repository.clone(), Arc::new(HttpFetcher::new()?));
    let payload = if refresh {
        service.refresh_article(url).await?
    } else {
        service.get_article(url).await?
    };

    let analyzer = ArticleAnalyzer::new(model, &settings.output_dir);
    let report = analyzer
        .analyze(url, payload.title.as_deref(), &payload.content)
        .await?;

    repository
        .record_analysis(&NewAnalysis {
            article_id: payload.record.id,
            model_provider: report.model_provider.clone(),
            model_name: report.model_name.clone(),
            output_path: report.output_path.display().to_string(),
            created_at: report.created_at,
        })
        .await?;
    info!("🗂️ Recorded analysis of article #{}", payload.record.id);

    println!("\n\nArticle Analysis Report:");
    println!("==========================");
    println!("{}", report.markdown);
    println!("Saved to {}", report.output_path.display());
    Ok(())
}

async fn history(repository: &dyn ArticleRepository, limit: usize) -> Result<()> {
    let records = repository.list_recent_analyses(limit).await?;
    if records.is_empty() {
        println!("No analyses recorded yet.");
        return Ok(());
    }
    for record in records {
        println!(
            "{}  {}  {}/{}  {}",
            record.created_at.format("%Y-%m-%d %H:%M:%S"),
            record.article_title.as_deref().unwrap_or(&record.article_url),
            record.model_provider,
            record.model_name,
            record.output_path
        );
    }
    Ok(())
}

async fn cached(repository: &dyn ArticleRepository, limit: usize) -> Result<()> {
    let articles = repository.list_cached_articles(limit).await?;
    if articles.is_empty() {
        println!("No cached articles.");
        return Ok(());
    }
    for article in articles {
        println!(
            "#{}  {}  {}  {}  {}",
            article.id,
            article.fetched_at.format("%Y-%m-%d %H:%M:%S"),
            article.content_hash.get(..12).unwrap_or(&article.content_hash),
            article.title.as_deref().unwrap_or("(untitled)"),
            article.url
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::from_env().with_overrides(
        cli.provider.clone(),
        cli.output_dir.clone(),
        cli.database.clone(),
        cli.verbose.then_some(true),
    );
    logging::init_logging(settings.verbose);

    match cli.command {
        Commands::Analyze { url, refresh } => {
            analyze(&settings, &cli.storage, &url, refresh).await?;
        }
        Commands::History { limit } => {
            let repository = create_repository(&cli.storage, &settings.database_path).await?;
            history(repository.as_ref(), limit).await?;
        }
        Commands::Cached { limit } => {
            let repository = create_repository(&cli.storage, &settings.database_path).await?;
            cached(repository.as_ref(), limit).await?;
        }
    }

    Ok(())
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
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "lens",
            "--provider",
            "ollama",
            "analyze",
            "--url",
            "https://example.com/a",
            "--refresh",
        ])
        .unwrap();
        assert_eq!(cli.provider.as_deref(), Some("ollama"));
        assert_eq!(cli.storage, "sqlite");
        match cli.command {
            Commands::Analyze { url, refresh } => {
                assert_eq!(url, "https://example.com/a");
                assert!(refresh);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_analyze_requires_url() {
        assert!(Cli::try_parse_from(["lens", "analyze"]).is_err());
    }

    #[test]
    fn test_history_limit() {
        let cli = Cli::try_parse_from(["lens", "history", "--limit", "3", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::History { limit: 3 }));

        let cli = Cli::try_parse_from(["lens", "cached"]).unwrap();
        assert!(matches!(cli.command, Commands::Cached { limit: 10 }));
    }

    #[test]
    fn test_storage_flag() {
        let cli = Cli::try_parse_from(["lens", "cached", "--storage", "memory"]).unwrap();
        assert_eq!(cli.storage, "memory");
    }

    #[tokio::test]
    async fn test_unknown_storage_is_configuration_error() {
        let settings = Settings::from_lookup(|_| None).with_overrides(
            Some("dummy".to_string()),
            None,
            Some(PathBuf::from("/nonexistent/unknown-storage/analysis.db")),
            None,
        );
        let result = analyze(&settings, "postgres", "https://example.com/a", false).await;
        assert!(matches!(result, Err(Error::Configuration(_))));
        assert!(!PathBuf::from("/nonexistent/unknown-storage").exists());
    }

    #[tokio::test]
    async fn test_unknown_provider_fails_before_storage() {
        let settings = Settings::from_lookup(|_| None).with_overrides(
            Some("nonexistent".to_string()),
            None,
            Some(PathBuf::from("/nonexistent/should-not-be-created/analysis.db")),
            None,
        );
        let result = analyze(&settings, "sqlite", "https://example.com/a", false).await;
        assert!(matches!(result, Err(Error::Configuration(_))));
        assert!(!PathBuf::from("/nonexistent/should-not-be-created").exists());
    }

    #[tokio::test]
    async fn test_history_on_memory_repository() {
        let repository = create_repository("memory", &PathBuf::from("unused.db")).await.unwrap();
        history(repository.as_ref(), 5).await.unwrap();
        cached(repository.as_ref(), 5).await.unwrap();
    }
}
