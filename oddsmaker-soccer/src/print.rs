use stanza::style::HAlign::Left;
use stanza::style::{HAlign, Header, MinWidth, Styles};
use stanza::table::{Col, Row, Table};

use oddsmaker::format::OddsFormat;

use crate::domain::{MarketKind, MatchProbabilities};
use crate::generator::OddsGenerationResult;
use crate::validation::OddsValidationResult;

fn market_probs(probs: &MatchProbabilities, market: MarketKind) -> Vec<f64> {
    match market {
        MarketKind::MatchResult => probs.match_result().to_vec(),
        MarketKind::DoubleChance => probs.double_chance().to_vec(),
        MarketKind::BothTeamsScore => probs.both_teams_score().to_vec(),
        MarketKind::OverUnder => probs.total_goals().to_vec(),
    }
}

fn market_label(probs: &MatchProbabilities, market: MarketKind) -> String {
    match market {
        MarketKind::OverUnder => format!("{market} {}", probs.goal_line),
        _ => market.to_string(),
    }
}

pub fn tabulate_odds(result: &OddsGenerationResult, format: OddsFormat) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(14)).with(Left)),
            Col::new(Styles::default().with(MinWidth(14)).with(Left)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec![
                "Market".into(),
                "Outcome".into(),
                "Prob.".into(),
                "Price".into(),
            ],
        ));
    let probs = &result.probabilities;
    for (market, prices) in result.odds.markets() {
        let label = market_label(probs, market);
        let outcome_probs = market_probs(probs, market);
        for (index, (outcome, price)) in market.outcome_labels().into_iter().zip(prices).enumerate() {
            table.push_row(Row::new(
                Styles::default(),
                vec![
                    (if index == 0 { label.clone() } else { String::new() }).into(),
                    outcome.into(),
                    format!("{:.3}", outcome_probs[index]).into(),
                    format.render(price).into(),
                ],
            ));
        }
    }
    table
}

pub fn tabulate_validation(validation: &OddsValidationResult) -> Table {
    let mut table = Table::default().with_cols(vec![
        Col::new(Styles::default().with(MinWidth(14)).with(Left)),
        Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Right)),
    ]);
    let mut push = |key: String, value: String| {
        table.push_row(Row::new(Styles::default(), vec![key.into(), value.into()]));
    };
    push("Valid".into(), validation.is_valid.to_string());
    push("Margin".into(), format!("{:.2}%", validation.margin));
    push("Arbitrage".into(), validation.has_arbitrage.to_string());
    for (market, overround) in &validation.overrounds {
        push(format!("{market} overround"), format!("{overround:.3}"));
    }
    for error in &validation.errors {
        push("Error".into(), error.clone());
    }
    for warning in &validation.warnings {
        push("Warning".into(), warning.clone());
    }
    table
}
