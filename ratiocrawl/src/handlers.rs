use anyhow::{Context, anyhow};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use ratiocrawl_core::crawl::{CrawlOptions, start_crawl};
use ratiocrawl_core::storage::LocalStore;
use ratiocrawl_core::task::{JobRequest, crawl_task};
use ratiocrawl_scanner::{CrawlConfig, CrawlSummary, PageResult, ResultCallback, RetryPolicy};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Map the tuning flags of a subcommand onto a crawl configuration
pub fn crawl_config_from_args(args: &ArgMatches) -> CrawlConfig {
    let defaults = CrawlConfig::default();
    let secs = |name: &str, fallback: Duration| {
        args.get_one::<u64>(name)
            .map(|s| Duration::from_secs(*s))
            .unwrap_or(fallback)
    };
    let millis = |name: &str, fallback: Duration| {
        args.get_one::<u64>(name)
            .map(|ms| Duration::from_millis(*ms))
            .unwrap_or(fallback)
    };

    let retry = RetryPolicy::new(
        args.get_one::<u32>("retries")
            .copied()
            .unwrap_or(defaults.retry.attempts),
        millis("backoff-ms", defaults.retry.base_backoff),
        millis("jitter-ms", defaults.retry.max_jitter),
    );

    CrawlConfig::default()
        .with_connect_timeout(secs("connect-timeout", defaults.connect_timeout))
        .with_request_timeout(secs("timeout", defaults.request_timeout))
        .with_max_in_flight(
            args.get_one::<usize>("max-in-flight")
                .copied()
                .unwrap_or(defaults.max_in_flight),
        )
        .with_retry(retry)
}

fn crawl_options_from_args(args: &ArgMatches) -> anyhow::Result<CrawlOptions> {
    let url = args
        .get_one::<String>("url")
        .ok_or_else(|| anyhow!("--url is required"))?;
    let depth = *args
        .get_one::<usize>("depth")
        .ok_or_else(|| anyhow!("--depth is required"))?;

    let mut options =
        CrawlOptions::new(url.clone(), depth).with_config(crawl_config_from_args(args));
    if let Some(scheme) = args.get_one::<String>("scheme") {
        options = options.with_scheme(scheme.clone());
    }
    Ok(options)
}

fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// Spinner counting recorded pages, plus the callback that drives it
fn progress_spinner() -> (ProgressBar, ResultCallback) {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Starting crawl...");

    let recorded = Arc::new(AtomicUsize::new(0));
    let spinner_clone = spinner.clone();
    let callback: ResultCallback = Arc::new(move |record: &PageResult| {
        let count = recorded.fetch_add(1, Ordering::Relaxed) + 1;
        spinner_clone.set_message(format!(
            "Crawling... {} pages recorded, last {}",
            count, record.url
        ));
    });

    (spinner, callback)
}

pub async fn handle_crawl(args: &ArgMatches, quiet: bool) -> anyhow::Result<()> {
    let mut options = crawl_options_from_args(args)?;
    let output = args
        .get_one::<String>("output")
        .map(|raw| expand_path(raw))
        .ok_or_else(|| anyhow!("--output is required"))?;

    let spinner = if quiet {
        None
    } else {
        let (spinner, callback) = progress_spinner();
        options = options.with_result_callback(callback);
        Some(spinner)
    };

    let result = start_crawl(options, &output).await;
    if let Some(ref spinner) = spinner {
        spinner.finish_and_clear();
    }

    let summary = result
        .with_context(|| format!("Crawl failed, partial output in {}", output.display()))?;
    if !quiet {
        print!("{}", render_summary(&summary, &output));
    }
    Ok(())
}

pub async fn handle_task(args: &ArgMatches, quiet: bool) -> anyhow::Result<()> {
    let options = crawl_options_from_args(args)?;
    let store_dir = args
        .get_one::<String>("store")
        .map(|raw| expand_path(raw))
        .ok_or_else(|| anyhow!("--store is required"))?;

    let store = LocalStore::open(&store_dir)
        .await
        .with_context(|| format!("Failed to open store at {}", store_dir.display()))?;
    let request = JobRequest {
        url: options.start_url(),
        max_depth: options.max_depth,
    };

    let spinner = (!quiet).then(|| {
        let spinner = ProgressBar::new_spinner();
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner.set_message(format!("Running crawl task for {}", request.url));
        spinner
    });

    let result = crawl_task(&request, &store, options.config).await;
    if let Some(ref spinner) = spinner {
        spinner.finish_and_clear();
    }

    let result = result.context("Crawl task failed")?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Human-readable end-of-crawl report
pub fn render_summary(summary: &CrawlSummary, output: &Path) -> String {
    let mut report = String::new();
    report.push_str(&format!("\n{} Crawl complete!\n\n", "✓".green().bold()));
    report.push_str(&format!("  Start URL:       {}\n", summary.start_url.bright_white()));
    report.push_str(&format!("  Max depth:       {}\n", summary.max_depth));
    report.push_str(&format!("  URLs visited:    {}\n", summary.visited));
    report.push_str(&format!("  Pages recorded:  {}\n", summary.records_written));
    report.push_str(&format!("  Elapsed:         {:.2?}\n", summary.elapsed));
    report.push_str(&format!(
        "  Output:          {}\n",
        output.display().to_string().bright_white()
    ));
    report
}
