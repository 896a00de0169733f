use finyap_core::{Config, Database};

pub fn run(sentence_id: i64, limit: usize) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = Database::open_at(config.database_path()?)?;
    let results = db.recent_results(sentence_id, limit)?;
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
