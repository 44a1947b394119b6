use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use clap::Parser;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use oddsmaker::format::OddsFormat;
use oddsmaker::timed::Timed;
use oddsmaker_soccer::config::GeneratorConfig;
use oddsmaker_soccer::data::{HeadToHead, MatchResult, DEFAULT_HEAD_TO_HEAD_LIMIT, DEFAULT_STATS_LIMIT};
use oddsmaker_soccer::domain::{TeamId, TeamStats};
use oddsmaker_soccer::generator::{generate_match_odds, GenerationError, GenerationRequest, OddsGenerationResult};
use oddsmaker_soccer::print;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// file to source the fixtures and team data from
    #[clap(short = 'f', long)]
    file: PathBuf,

    /// generator config file; defaults apply if omitted
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// odds format: decimal, fractional or american
    #[clap(long, default_value = "decimal")]
    format: OddsFormat,

    /// number of recent results aggregated per team
    #[clap(long, default_value_t = DEFAULT_STATS_LIMIT)]
    limit: usize,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if self.limit == 0 {
            bail!("the result limit must be positive");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct FixtureFile {
    #[serde(default)]
    teams: Vec<TeamStats>,
    #[serde(default)]
    results: Vec<MatchResult>,
    fixtures: Vec<GenerationRequest>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    args.validate()?;
    debug!("args: {args:?}");

    let config = read_config(&args).await?;
    config.validate()?;
    let fixture_file: FixtureFile = serde_json::from_str(&tokio::fs::read_to_string(&args.file).await?)?;
    if fixture_file.fixtures.is_empty() {
        bail!("no fixtures in {}", args.file.display());
    }
    info!(
        "read {} teams, {} results, {} fixtures",
        fixture_file.teams.len(),
        fixture_file.results.len(),
        fixture_file.fixtures.len()
    );

    let teams = Arc::new(assemble_teams(&fixture_file, args.limit));
    let config = Arc::new(config);
    let mut join_set = JoinSet::new();
    for (index, request) in fixture_file.fixtures.iter().cloned().enumerate() {
        let teams = teams.clone();
        let config = config.clone();
        join_set.spawn_blocking(move || {
            let outcome = Timed::result(|| generate_match_odds(&request, &teams, &config));
            (index, request, outcome)
        });
    }

    let mut outcomes = Vec::with_capacity(fixture_file.fixtures.len());
    while let Some(joined) = join_set.join_next().await {
        outcomes.push(joined?);
    }
    outcomes.sort_by_key(|(index, _, _)| *index);

    let mut published = 0;
    for (_, request, outcome) in outcomes {
        match outcome {
            Ok(timed) => {
                published += 1;
                debug!("generated {} in {:?}", request.match_id, timed.elapsed);
                print_result(&timed.value, &fixture_file.results, args.format);
            }
            Err(err) => report_failure(&request, &err),
        }
    }
    info!("published odds for {published} of {} fixtures", fixture_file.fixtures.len());
    Ok(())
}

async fn read_config(args: &Args) -> anyhow::Result<GeneratorConfig> {
    match &args.config {
        None => Ok(GeneratorConfig::default()),
        Some(path) => Ok(serde_json::from_str(&tokio::fs::read_to_string(path).await?)?),
    }
}

/// Supplied team statistics take precedence; any other team named in a fixture is aggregated
/// from the results.
fn assemble_teams(fixture_file: &FixtureFile, limit: usize) -> FxHashMap<TeamId, TeamStats> {
    let mut teams: FxHashMap<_, _> = fixture_file
        .teams
        .iter()
        .map(|stats| (stats.team_id.clone(), stats.clone()))
        .collect();
    for request in &fixture_file.fixtures {
        for team_id in [&request.home_team_id, &request.away_team_id] {
            if teams.contains_key(team_id) {
                continue;
            }
            if let Some(stats) = TeamStats::from_results(team_id, &fixture_file.results, limit) {
                teams.insert(team_id.clone(), stats);
            }
        }
    }
    teams
}

fn print_result(result: &OddsGenerationResult, results: &[MatchResult], format: OddsFormat) {
    let home_team_id = &result.home_stats.team_id;
    let away_team_id = &result.away_stats.team_id;
    println!(
        "{}: {home_team_id} v {away_team_id} (margin {:.1}%)",
        result.match_id,
        result.margin * 100.0
    );
    if let Some(head_to_head) =
        HeadToHead::from_results(home_team_id, away_team_id, results, DEFAULT_HEAD_TO_HEAD_LIMIT)
    {
        println!(
            "H2H: {} {}, {} draws, {} {}, {:.2} goals per match",
            home_team_id,
            head_to_head.team_a_wins,
            head_to_head.draws,
            away_team_id,
            head_to_head.team_b_wins,
            head_to_head.avg_goals
        );
    }
    println!("{}", Console::default().render(&print::tabulate_odds(result, format)));
    println!(
        "Validation:\n{}",
        Console::default().render(&print::tabulate_validation(&result.validation))
    );
}

fn report_failure(request: &GenerationRequest, err: &GenerationError) {
    warn!("no odds available for {}: {err}", request.match_id);
    if let GenerationError::InvalidOdds(validation) = err {
        println!(
            "{}: withheld\n{}",
            request.match_id,
            Console::default().render(&print::tabulate_validation(validation))
        );
    }
}
