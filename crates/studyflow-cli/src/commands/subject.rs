use clap::Subcommand;
use studyflow_core::storage::Database;
use studyflow_core::Subject;
use uuid::Uuid;

#[derive(Subcommand)]
pub enum SubjectAction {
    /// List subjects
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a subject
    Add {
        /// Subject name
        name: String,
        /// Display color, e.g. "#2563eb"
        #[arg(long)]
        color: Option<String>,
    },
    /// Remove a subject by id
    Remove {
        /// Subject id
        id: String,
    },
}

pub fn run(action: SubjectAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        SubjectAction::List { json } => {
            let subjects = db.list_subjects()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&subjects)?);
            } else {
                for subject in subjects {
                    println!("{}  {}", subject.id, subject.name);
                }
            }
        }
        SubjectAction::Add { name, color } => {
            let subject = Subject {
                id: Uuid::new_v4().to_string(),
                name,
                color,
            };
            db.add_subject(&subject)?;
            println!("subject added: {}", subject.id);
        }
        SubjectAction::Remove { id } => {
            db.remove_subject(&id)?;
            println!("subject removed: {id}");
        }
    }
    Ok(())
}
