use std::sync::Arc;

use chrono::Utc;
use envconfig::Envconfig;
use eyre::{bail, Result, WrapErr};
use tokio_util::sync::CancellationToken;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use lunch_roulette::config::Config;
use lunch_roulette::roster::Roster;
use lunch_roulette::runner::{MatchRunner, RunnerConfig};
use lunch_roulette::schedule::{run_daily, DailySchedule};
use lunch_roulette::store::{MatchStore, MemoryStore};
use lunch_roulette::types::Profile;

fn setup_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    let log_layer = tracing_subscriber::fmt::layer().with_filter(filter);
    tracing_subscriber::registry().with(log_layer).init();
}

fn load_profiles(path: &str) -> Result<Vec<Profile>> {
    let raw = std::fs::read_to_string(path).wrap_err_with(|| format!("failed to read {path}"))?;
    serde_json::from_str(&raw).wrap_err_with(|| format!("failed to parse profiles in {path}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();

    let config = Config::init_from_env().wrap_err("failed to load configuration from env")?;
    let schedule = DailySchedule::new(config.deadline_hour, config.utc_offset()?)?;
    let runner_config = RunnerConfig {
        group_size: config.group_size()?,
        min_requesters: config.min_requesters,
        schedule,
    };

    let store = Arc::new(MemoryStore::new());
    let profiles = load_profiles(&config.requests_path)?;
    tracing::info!(path = %config.requests_path, requesters = profiles.len(), "loaded requesters");

    let runner = Arc::new(
        MatchRunner::new(Arc::clone(&store), runner_config)
            .with_strategy(config.grouping_strategy()?),
    );

    match config.mode.as_str() {
        "once" => {
            // A manual run matches whoever is listed, deadline or not.
            let match_date = config
                .parsed_match_date()?
                .unwrap_or_else(|| schedule.local_date(Utc::now()));
            for profile in profiles {
                store.submit_request(profile, match_date).await?;
            }
            let report = runner.run(match_date).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "daily" => {
            let started = schedule.local_date(Utc::now());
            let roster = Arc::new(Roster::new(profiles));
            let cancel = CancellationToken::new();
            let daily = tokio::spawn(run_daily(
                Arc::clone(&runner),
                roster,
                Utc::now,
                cancel.clone(),
            ));

            tokio::signal::ctrl_c().await?;
            tracing::info!("shutting down");
            cancel.cancel();
            daily.await??;

            let stats = store.stats(started, schedule.local_date(Utc::now())).await;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        other => bail!("invalid MODE {other}, expected once or daily"),
    }

    Ok(())
}
