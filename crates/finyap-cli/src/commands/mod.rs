pub mod config;
pub mod history;
pub mod play;
pub mod scenarios;
pub mod vocab;

use finyap_core::{load_dir, Config, Database, Sentence};

/// Load every scenario file and sync it into the database.
///
/// Returns the catalog with database ids assigned.
pub fn open_catalog(
    config: &Config,
) -> Result<(Database, Vec<Sentence>), Box<dyn std::error::Error>> {
    let mut sentences = load_dir(&config.scenarios_dir(), &config.content.extension)?;
    let mut db = Database::open_at(config.database_path()?)?;
    db.sync_sentences(&mut sentences)?;
    Ok((db, sentences))
}
