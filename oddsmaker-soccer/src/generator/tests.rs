use assert_float_eq::*;
use rustc_hash::FxHashMap;
use tinyrand::Wyrand;

use oddsmaker::probs::SliceExt;

use crate::testing::{random_team, team};

use super::*;

fn league() -> FxHashMap<TeamId, TeamStats> {
    [
        team("lions", 10, 8, 1, 1, 15, 15, "WWDWW"),
        team("tigers", 10, 2, 2, 6, 15, 15, "LLDWL"),
        team("bears", 10, 4, 3, 3, 14, 12, "WDLDW"),
        team("wolves", 10, 4, 3, 3, 14, 12, "WDLDW"),
        team("rookies", 0, 0, 0, 0, 0, 0, ""),
    ]
    .into_iter()
    .map(|stats| (stats.team_id.clone(), stats))
    .collect()
}

#[test]
fn generate_valid_odds() {
    let result = generate_match_odds(
        &GenerationRequest::new("m1", "lions", "tigers"),
        &league(),
        &GeneratorConfig::default(),
    )
    .unwrap();
    assert_eq!("m1", result.match_id);
    assert_eq!(0.05, result.margin);
    assert_eq!(result.odds.generated_at, result.generated_at);
    assert_eq!("lions", result.home_stats.team_id);
    assert_eq!("tigers", result.away_stats.team_id);
    assert!(result.validation.is_valid);
    assert!(!result.validation.has_arbitrage);
    assert_float_absolute_eq!(5.0, result.validation.margin, 1.0);
    assert!(result.odds.both_teams_score.is_some());
    assert!(result.odds.over_under.is_some());
}

#[test]
fn dominant_home_side_is_favoured() {
    let result = generate_match_odds(
        &GenerationRequest::new("m1", "lions", "tigers"),
        &league(),
        &GeneratorConfig::default(),
    )
    .unwrap();
    let odds = result.odds.match_result;
    assert!(odds.home + 0.5 < odds.away, "{odds:?}");
    assert!(result.probabilities.draw < 0.27);
}

#[test]
fn identical_sides_split_by_home_advantage() {
    let result = generate_match_odds(
        &GenerationRequest::new("m2", "bears", "wolves"),
        &league(),
        &GeneratorConfig::default(),
    )
    .unwrap();
    let odds = result.odds.match_result;
    assert!(odds.home < odds.away, "{odds:?}");
    assert!(odds.away - odds.home < 1.0, "{odds:?}");
}

#[test]
fn swapped_sides_swap_prices() {
    let mut config = GeneratorConfig::default();
    config.home_advantage = 0.0;
    config.goals.home_goals_bonus = 0.0;
    let forward = generate_match_odds(&GenerationRequest::new("m1", "lions", "tigers"), &league(), &config).unwrap();
    let reverse = generate_match_odds(&GenerationRequest::new("m1", "tigers", "lions"), &league(), &config).unwrap();
    assert_eq!(forward.odds.match_result.home, reverse.odds.match_result.away);
    assert_eq!(forward.odds.match_result.draw, reverse.odds.match_result.draw);
    assert_eq!(forward.odds.match_result.away, reverse.odds.match_result.home);
}

#[test]
fn custom_margin() {
    let request = GenerationRequest::new("m1", "lions", "tigers").with_margin(0.1);
    let result = generate_match_odds(&request, &league(), &GeneratorConfig::default()).unwrap();
    assert_eq!(0.1, result.margin);
    assert_float_absolute_eq!(10.0, result.validation.margin, 1.0);

    let cheaper = generate_match_odds(
        &GenerationRequest::new("m1", "lions", "tigers").with_margin(0.02),
        &league(),
        &GeneratorConfig::default(),
    )
    .unwrap();
    for (price, cheaper_price) in result
        .odds
        .match_result
        .prices()
        .iter()
        .zip(cheaper.odds.match_result.prices())
    {
        assert!(*price < cheaper_price);
    }
}

#[test]
fn invalid_margins_rejected() {
    let config = GeneratorConfig::default();
    for margin in [-0.05, 0.75, f64::NAN] {
        let request = GenerationRequest::new("m1", "lions", "tigers").with_margin(margin);
        let err = generate_match_odds(&request, &league(), &config).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidRequest(_)), "{err:?}");
    }
}

#[test]
fn negative_form_weight_rejected() {
    let mut request = GenerationRequest::new("m1", "lions", "tigers");
    request.form_weight = Some(-0.3);
    let err = generate_match_odds(&request, &league(), &GeneratorConfig::default()).unwrap_err();
    assert_eq!(
        "invalid request: form_weight must not be negative, got -0.3",
        err.to_string()
    );
}

#[test]
fn invalid_config_rejected() {
    let mut config = GeneratorConfig::default();
    config.sensitivity = -0.03;
    let err = generate_match_odds(&GenerationRequest::new("m1", "lions", "tigers"), &league(), &config)
        .unwrap_err();
    assert!(matches!(err, GenerationError::InvalidRequest(_)), "{err:?}");
}

#[test]
fn team_cannot_play_itself() {
    let err = generate_match_odds(
        &GenerationRequest::new("m1", "lions", "lions"),
        &league(),
        &GeneratorConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, GenerationError::SameTeam(ref team_id) if team_id == "lions"));
}

#[test]
fn missing_stats() {
    let config = GeneratorConfig::default();
    let err = generate_match_odds(&GenerationRequest::new("m1", "dragons", "tigers"), &league(), &config)
        .unwrap_err();
    assert_eq!("no statistics for home team dragons", err.to_string());
    assert!(matches!(err, GenerationError::MissingStats { side: Side::Home, .. }));

    let err = generate_match_odds(&GenerationRequest::new("m1", "lions", "dragons"), &league(), &config)
        .unwrap_err();
    assert!(matches!(err, GenerationError::MissingStats { side: Side::Away, .. }));
}

#[test]
fn form_toggles_strength() {
    let config = GeneratorConfig::default();
    let with_form = generate_match_odds(&GenerationRequest::new("m1", "lions", "tigers"), &league(), &config).unwrap();
    let mut request = GenerationRequest::new("m1", "lions", "tigers");
    request.use_form = false;
    let without_form = generate_match_odds(&request, &league(), &config).unwrap();
    assert!(with_form.probabilities.home_win > without_form.probabilities.home_win);

    request.use_form = true;
    request.form_weight = Some(1.0);
    let heavier_form = generate_match_odds(&request, &league(), &config).unwrap();
    assert!(heavier_form.probabilities.home_win > with_form.probabilities.home_win);
}

#[test]
fn teams_without_history_priced() {
    let result = generate_match_odds(
        &GenerationRequest::new("m3", "rookies", "bears"),
        &league(),
        &GeneratorConfig::default(),
    )
    .unwrap();
    assert!(result.validation.is_valid);
    for (_, prices) in result.odds.markets() {
        assert!(prices.iter().all(|price| price.is_finite()));
    }
}

#[test]
fn unpublishable_odds_withheld() {
    let mut config = GeneratorConfig::default();
    config.price_bounds = 3.5..=100.0;
    let err = generate_match_odds(&GenerationRequest::new("m1", "lions", "tigers"), &league(), &config)
        .unwrap_err();
    match err {
        GenerationError::InvalidOdds(validation) => {
            assert!(!validation.is_valid);
            assert!(validation.has_arbitrage);
            assert!(!validation.errors.is_empty());
        }
        _ => panic!("unexpected {err:?}"),
    }
}

#[test]
fn batch_preserves_order() {
    let requests = [
        GenerationRequest::new("m1", "lions", "tigers"),
        GenerationRequest::new("m2", "dragons", "tigers"),
        GenerationRequest::new("m3", "bears", "wolves"),
    ];
    let results = generate_batch(&requests, &league(), &GeneratorConfig::default());
    assert_eq!(3, results.len());
    assert_eq!("m1", results[0].as_ref().unwrap().match_id);
    assert!(matches!(results[1], Err(GenerationError::MissingStats { .. })));
    assert_eq!("m3", results[2].as_ref().unwrap().match_id);
}

#[test]
fn random_fixtures_publish_coherent_odds() {
    let mut rand = Wyrand::default();
    let config = GeneratorConfig::default();
    let teams: FxHashMap<_, _> = (0..40)
        .map(|index| {
            let team_id = format!("team-{index}");
            (team_id.clone(), random_team(&team_id, &mut rand))
        })
        .collect();
    for home in 0..40 {
        let away = (home + 1 + home * 7 % 39) % 40;
        let request = GenerationRequest::new(format!("m{home}"), format!("team-{home}"), format!("team-{away}"));
        let result = generate_match_odds(&request, &teams, &config).unwrap();
        assert!(result.odds.match_result.prices().booksum() > 1.0);
        for (market, prices) in result.odds.markets() {
            for price in prices {
                assert!(config.price_bounds.contains(&price), "{market}: {price}");
            }
        }
    }
}

#[test]
fn request_defaults_when_deserialized() {
    let request: GenerationRequest =
        serde_json::from_str(r#"{"match_id": "m1", "home_team_id": "lions", "away_team_id": "tigers"}"#).unwrap();
    assert_eq!(GenerationRequest::new("m1", "lions", "tigers"), request);
}
