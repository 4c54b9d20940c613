use chrono::Local;
use clap::Subcommand;
use focusflow_core::storage::keys;
use focusflow_core::{Database, TomatoTally};
use serde_json::json;

use super::host::print_json;

#[derive(Subcommand)]
pub enum TallyAction {
    /// Sessions completed today
    Today,
    /// Every recorded day
    All,
    /// Zero today's count (the all-time total is kept)
    ResetToday,
}

pub fn run(action: TallyAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let today = Local::now().date_naive();

    db.exclusive(|db| -> Result<(), Box<dyn std::error::Error>> {
        let mut tally: TomatoTally = db.load_or_default(keys::TALLY)?;
        match action {
            TallyAction::Today => {
                print_json(&json!({
                    "date": today.format("%Y-%m-%d").to_string(),
                    "count": tally.on(today),
                    "total": tally.total,
                }))?;
            }
            TallyAction::All => {
                print_json(&tally)?;
            }
            TallyAction::ResetToday => {
                tally.reset_day(today);
                db.save_record(keys::TALLY, &tally)?;
                println!("ok");
            }
        }
        Ok(())
    })
}
