use clap::Subcommand;
use studyflow_core::storage::Database;

#[derive(Subcommand)]
pub enum SessionAction {
    /// List recent sessions, newest first
    List {
        /// Maximum number of sessions to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        SessionAction::List { limit, json } => {
            let sessions = db.list_sessions(limit)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&sessions)?);
                return Ok(());
            }
            for session in sessions {
                // Never-finalized records are cancelled runs; show them as such.
                let status = if session.completed {
                    "completed"
                } else {
                    "incomplete"
                };
                println!(
                    "{}  {}  {} min planned  {}",
                    session.start_time.format("%Y-%m-%d %H:%M"),
                    session.subject_name,
                    session.planned_minutes,
                    status
                );
            }
        }
    }
    Ok(())
}
