//! CLI entrypoint for the swarm validation consensus engine
//!
//! Wires the layers together with dependency injection: the in-memory
//! registry, the configured session history, and the simulated classifier
//! gateway feeding the consensus use cases.

mod cli;
mod output;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use cli::{Cli, Command, OutputFormat};
use output::{ConsoleProgress, format_outcome, format_report};
use std::path::PathBuf;
use std::sync::Arc;
use swarm_application::{
    ApplyOutcomeUseCase, ParcelImagery, RegisterAgentUseCase, RoundOutcome, RunRoundInput,
    RunRoundUseCase, SessionHistory, SessionReportUseCase,
};
use swarm_domain::{Agent, GeoPoint, LandClass, ParcelId};
use swarm_infrastructure::{
    ConfigLoader, FileConfig, InMemoryAgentRegistry, InMemorySessionHistory, JsonlSessionHistory,
    Roster, SimulatedClassifier, history::replay as replay_history,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(&cli)?;

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow!(e))?
    };
    let engine = config.engine();
    engine.validate()?;

    // === Dependency Injection ===
    let registry = Arc::new(InMemoryAgentRegistry::new());
    seed_registry(&cli, &config, registry.clone()).await?;

    let history: Arc<dyn SessionHistory> = match &config.history.audit_log {
        Some(path) => Arc::new(
            JsonlSessionHistory::new(path)
                .ok_or_else(|| anyhow!("could not open audit log {}", path.display()))?,
        ),
        None => Arc::new(InMemorySessionHistory::new()),
    };

    match cli.command {
        Command::Validate {
            ref parcel,
            lat,
            lon,
            ref tile,
            ref hint,
            ref truth,
        } => {
            let hint = parse_class(hint.as_deref())?;
            let truth = parse_class(truth.as_deref())?;

            let mut classifier =
                SimulatedClassifier::new().with_error_rate(config.simulation.error_rate);
            if let Some(class) = truth {
                classifier = classifier.with_truth(parcel.as_str(), class);
            }

            let use_case = RunRoundUseCase::new(Arc::new(classifier), registry.clone(), history)
                .with_consensus_config(engine.consensus)
                .with_eligibility_config(engine.eligibility)
                .with_dispute_thresholds(engine.dispute);

            let mut input = RunRoundInput::new(
                parcel.as_str(),
                ParcelImagery::new(parcel.as_str(), tile.as_str()),
                GeoPoint::new(lat, lon),
            );
            if let Some(class) = hint {
                input = input.with_hint(class);
            }

            let outcome = if cli.quiet {
                use_case.execute(input).await?
            } else {
                use_case.execute_with_progress(input, &ConsoleProgress).await?
            };

            if truth.is_some() {
                let adjusted = ApplyOutcomeUseCase::new(registry)
                    .execute(&outcome.decision, truth)
                    .await?;
                info!("Adjusted {} reputations from ground truth", adjusted.len());
            }

            print_outcome(&outcome, cli.output)?;
        }

        Command::Simulate {
            parcels,
            lat,
            lon,
            agents,
        } => {
            let center = GeoPoint::new(lat, lon);
            if registry.is_empty().await {
                info!("No roster configured, generating {} synthetic agents", agents);
                let register = RegisterAgentUseCase::new(registry.clone());
                for agent in synthetic_swarm(agents, center) {
                    register.execute(agent).await?;
                }
            }

            let classifier = Arc::new(
                SimulatedClassifier::new().with_error_rate(config.simulation.error_rate),
            );
            let use_case =
                RunRoundUseCase::new(classifier.clone(), registry.clone(), history.clone())
                    .with_consensus_config(engine.consensus)
                    .with_eligibility_config(engine.eligibility)
                    .with_dispute_thresholds(engine.dispute);
            let feedback = ApplyOutcomeUseCase::new(registry.clone());

            let mut aborted = 0usize;
            for i in 0..parcels {
                let parcel_id = ParcelId::new(format!("parcel-{:03}", i + 1));
                let target = GeoPoint::new(
                    center.lat + 0.02 * (i as f64 * 2.4).sin(),
                    center.lon + 0.02 * (i as f64 * 1.7).cos(),
                );
                let input = RunRoundInput::new(
                    parcel_id.clone(),
                    ParcelImagery::new(parcel_id.clone(), "sim://tile"),
                    target,
                );

                match use_case.execute(input).await {
                    Ok(outcome) => {
                        let truth = classifier.truth(&parcel_id);
                        feedback.execute(&outcome.decision, Some(truth)).await?;
                        if !cli.quiet {
                            eprintln!(
                                "{}: {} (certainty {:.3}{})",
                                outcome.decision.parcel_id,
                                outcome.decision.winning_class,
                                outcome.decision.decision_certainty,
                                if outcome.decision.disputed {
                                    ", disputed"
                                } else {
                                    ""
                                }
                            );
                        }
                    }
                    Err(e) => {
                        warn!("Round for {} aborted: {}", parcel_id, e);
                        aborted += 1;
                    }
                }
            }

            let report = SessionReportUseCase::new(history).execute();
            match cli.output {
                OutputFormat::Full => {
                    println!("{}", format_report(&report));
                    if aborted > 0 {
                        println!("Aborted rounds:  {}", aborted);
                    }
                }
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&report)?)
                }
            }
        }

        Command::Report { ref log } => {
            let path = log
                .clone()
                .or_else(|| config.history.audit_log.clone())
                .ok_or_else(|| {
                    anyhow!("no audit log configured; pass --log or set [history] audit_log")
                })?;
            let replayed = replay_history(&path)
                .with_context(|| format!("could not read audit log {}", path.display()))?;
            let report = SessionReportUseCase::new(Arc::new(replayed)).execute();
            match cli.output {
                OutputFormat::Full => println!("{}", format_report(&report)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            }
        }
    }

    Ok(())
}

/// Initialize logging based on verbosity; returns the appender guard when
/// logging to a file
fn init_logging(cli: &Cli) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    match &cli.log_file {
        Some(path) => {
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow!("invalid log file path {}", path.display()))?;
            let appender = tracing_appender::rolling::never(
                dir.unwrap_or_else(|| std::path::Path::new(".")),
                file_name,
            );
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
            Ok(None)
        }
    }
}

/// Seed the registry from the roster file, if one is configured
async fn seed_registry(
    cli: &Cli,
    config: &FileConfig,
    registry: Arc<InMemoryAgentRegistry>,
) -> Result<()> {
    let roster_path: Option<PathBuf> = cli.roster.clone().or_else(|| config.swarm.roster.clone());
    let Some(path) = roster_path else {
        return Ok(());
    };

    let roster =
        Roster::load(&path).with_context(|| format!("could not load roster {}", path.display()))?;
    let register = RegisterAgentUseCase::new(registry);
    let mut admitted = 0usize;
    for agent in roster.into_agents() {
        match register.execute(agent).await {
            Ok(()) => admitted += 1,
            Err(e) => warn!("Roster entry rejected: {}", e),
        }
    }
    info!("Admitted {} agents from {}", admitted, path.display());
    Ok(())
}

/// Deterministic demo swarm spread in a ring around the center
fn synthetic_swarm(count: usize, center: GeoPoint) -> Vec<Agent> {
    let classes = LandClass::all();
    (0..count)
        .map(|i| {
            let angle = i as f64 / count.max(1) as f64 * std::f64::consts::TAU;
            let position = GeoPoint::new(
                center.lat + 0.03 * angle.sin(),
                center.lon + 0.03 * angle.cos(),
            );
            let mut agent = Agent::new(
                format!("drone-{:02}", i + 1).as_str(),
                "resnet-field-v3",
                position,
            )
            .with_reputation(0.6 + 0.3 * (i as f64 / count.max(1) as f64))
            .with_capacity(0.6 + 0.4 * ((i % 4) as f64 / 3.0));
            if i % 3 == 0 {
                agent = agent.with_specialization(classes[i % classes.len()]);
            }
            agent
        })
        .collect()
}

fn parse_class(value: Option<&str>) -> Result<Option<LandClass>> {
    value
        .map(|s| s.parse::<LandClass>().map_err(|e| anyhow!(e)))
        .transpose()
}

fn print_outcome(outcome: &RoundOutcome, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Full => println!("{}", format_outcome(outcome)),
        OutputFormat::Json => {
            let value = serde_json::json!({
                "plan": outcome.plan,
                "decision": outcome.decision,
                "dispute": outcome.dispute,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_swarm_is_deterministic_and_nearby() {
        let center = GeoPoint::new(45.0, 10.0);
        let first = synthetic_swarm(8, center);
        let second = synthetic_swarm(8, center);
        assert_eq!(first, second);
        for agent in &first {
            assert!(agent.position.distance_km(&center) < 5.0);
            assert!(agent.admission_check().is_ok());
        }
    }

    #[test]
    fn test_parse_class_accepts_known_names() {
        assert_eq!(parse_class(Some("forest")).unwrap(), Some(LandClass::Forest));
        assert_eq!(parse_class(None).unwrap(), None);
        assert!(parse_class(Some("lava")).is_err());
    }
}
