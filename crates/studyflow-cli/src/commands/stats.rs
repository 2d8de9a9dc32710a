use clap::Subcommand;
use studyflow_core::storage::Database;

#[derive(Subcommand)]
pub enum StatsAction {
    /// This week's stats (Monday-based)
    Week,
    /// All-time stats
    All,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        StatsAction::Week => {
            let stats = db.stats_week()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::All => {
            let stats = db.stats_all()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}
