use std::io::Write;
use std::time::Duration;

use clap::Subcommand;
use studyflow_core::storage::{Config, Database};
use studyflow_core::{format_m_ss, generate_plan, Event, SessionPlan, SessionTimer};

const TIMER_KEY: &str = "session_timer";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run a session countdown in the foreground (Ctrl-C cancels)
    Run {
        /// Subject id (see `subject list`)
        #[arg(long)]
        subject: String,
        /// Available minutes; defaults to session.default_minutes
        #[arg(long)]
        minutes: Option<i64>,
    },
    /// Print the last saved timer state as JSON
    Status,
    /// Discard the saved timer state
    Reset,
}

fn save_timer(db: &Database, timer: &SessionTimer) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(timer)?;
    db.kv_set(TIMER_KEY, &json)?;
    Ok(())
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        TimerAction::Run { subject, minutes } => {
            let subject_name = db
                .get_subject(&subject)?
                .map(|s| s.name)
                .unwrap_or_else(|| "Study".to_string());
            let minutes = match minutes {
                Some(m) => m,
                None => i64::from(Config::load_or_default().session.default_minutes),
            };
            let plan = generate_plan(&subject, &subject_name, minutes);
            if plan.blocks.is_empty() {
                println!("empty plan: requested {minutes} minutes");
                return Ok(());
            }

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(run_countdown(&db, plan))?;
        }
        TimerAction::Status => match db.kv_get(TIMER_KEY)? {
            Some(json) => {
                let timer: SessionTimer = serde_json::from_str(&json)?;
                println!("{}", serde_json::to_string_pretty(&timer.snapshot())?);
            }
            None => println!("no saved timer state"),
        },
        TimerAction::Reset => {
            db.kv_delete(TIMER_KEY)?;
            println!("timer state cleared");
        }
    }
    Ok(())
}

/// The one-second tick task: a fixed-quantum interval plus Ctrl-C as the
/// cancellation signal. The timer itself never reads the clock.
async fn run_countdown(
    db: &Database,
    plan: SessionPlan,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut timer = SessionTimer::new(plan, db);
    timer.start();
    save_timer(db, &timer)?;
    print_block_header(&timer);

    let mut interval = tokio::time::interval(Duration::from_secs(1));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    // The first interval tick fires immediately; consume it so the countdown
    // advances once per elapsed second.
    interval.tick().await;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match timer.tick(db) {
                    Some(Event::BlockStarted { .. }) => {
                        println!();
                        print_block_header(&timer);
                        save_timer(db, &timer)?;
                    }
                    Some(Event::SessionCompleted { .. }) => {
                        println!();
                        println!(
                            "session complete: {} min focus",
                            timer.plan().total_focus_minutes
                        );
                        save_timer(db, &timer)?;
                        return Ok(());
                    }
                    _ => {}
                }
                print_countdown(&timer);
            }
            _ = &mut ctrl_c => {
                timer.cancel();
                save_timer(db, &timer)?;
                println!();
                println!("session cancelled");
                return Ok(());
            }
        }
    }
}

fn print_block_header(timer: &SessionTimer) {
    if let Some(block) = timer.current_block() {
        println!(
            "{}: block {} of {}: {}",
            timer.plan().subject_name,
            timer.block_index() + 1,
            timer.plan().blocks.len(),
            block.label
        );
    }
}

fn print_countdown(timer: &SessionTimer) {
    print!("\r  {}  ", format_m_ss(timer.seconds_left()));
    let _ = std::io::stdout().flush();
}
