use clap::Subcommand;
use studyflow_core::generate_plan;
use studyflow_core::storage::{Config, Database};

#[derive(Subcommand)]
pub enum PlanAction {
    /// Generate a session plan for a subject
    Generate {
        /// Subject id (see `subject list`)
        #[arg(long)]
        subject: String,
        /// Available minutes; defaults to session.default_minutes
        #[arg(long)]
        minutes: Option<i64>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: PlanAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PlanAction::Generate {
            subject,
            minutes,
            json,
        } => {
            let db = Database::open()?;
            let subject_name = db
                .get_subject(&subject)?
                .map(|s| s.name)
                .unwrap_or_else(|| "Study".to_string());
            let minutes = match minutes {
                Some(m) => m,
                None => i64::from(Config::load_or_default().session.default_minutes),
            };
            let plan = generate_plan(&subject, &subject_name, minutes);

            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
                return Ok(());
            }
            if plan.blocks.is_empty() {
                println!("empty plan: requested {minutes} minutes");
                return Ok(());
            }
            println!(
                "{}: {} min planned ({} min focus)",
                plan.subject_name,
                plan.total_minutes(),
                plan.total_focus_minutes
            );
            for (i, block) in plan.blocks.iter().enumerate() {
                println!("  {}. {}", i + 1, block.label);
            }
        }
    }
    Ok(())
}
