use finyap_core::content::{filter_stats, order_stats};
use finyap_core::session::session_rng;
use finyap_core::{Config, ScenarioStat};
use serde::Serialize;

#[derive(Serialize)]
struct StatView<'a> {
    #[serde(flatten)]
    stat: &'a ScenarioStat,
    accuracy_pct: f64,
}

pub fn run(filter: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let (db, _) = super::open_catalog(&config)?;

    let mut rng = session_rng(config.session.seed);
    let ordered = order_stats(db.scenario_stats()?, &mut rng);
    let shown = filter_stats(&ordered, filter.unwrap_or(""));

    let views: Vec<StatView<'_>> = shown
        .into_iter()
        .map(|stat| StatView {
            stat,
            accuracy_pct: stat.accuracy_pct(),
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&views)?);
    Ok(())
}
