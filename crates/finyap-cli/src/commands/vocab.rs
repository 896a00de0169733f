use finyap_core::content::vocabulary;
use finyap_core::{load_dir, Config};

pub fn run(scenarios: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let sentences = load_dir(&config.scenarios_dir(), &config.content.extension)?;
    let pool = vocabulary(
        sentences
            .iter()
            .filter(|s| scenarios.is_empty() || scenarios.iter().any(|name| name == s.scenario())),
    );
    for word in pool {
        println!("{word}");
    }
    Ok(())
}
