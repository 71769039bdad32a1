//! Availability command implementation.
//!
//! Shows which shifts of a space are still free on a date.

use crate::error::CliError;
use crate::utils::{load_configuration, open_database, write_json, GlobalOptions};
use cajuhub::operations::SpaceManager;
use cajuhub::slot::parse_date;
use cajuhub::{Shift, SlotLedger, SpaceId};
use clap::Args;

/// Show free and booked shifts of a space on a date.
#[derive(Args)]
pub struct AvailabilityCommand {
    /// Space id
    #[arg(long, value_name = "ID")]
    pub space: i64,

    /// Date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub date: String,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

impl AvailabilityCommand {
    /// Execute the availability command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;

        let date = parse_date(&self.date).map_err(cajuhub::Error::from)?;
        let space = SpaceManager::new(&mut db).show(SpaceId::new(self.space))?;
        let booked = SlotLedger::new(&mut db).occupied_shifts(space.id, date)?;

        if self.json {
            let shifts: Vec<serde_json::Value> = Shift::ALL
                .iter()
                .map(|shift| {
                    let (start, end) = shift.window();
                    serde_json::json!({
                        "shift": shift,
                        "start": start,
                        "end": end,
                        "available": !booked.contains(shift),
                    })
                })
                .collect();
            return write_json(&serde_json::json!({
                "space_id": space.id,
                "date": date.to_string(),
                "shifts": shifts,
            }));
        }

        println!("{} on {date}", space.name);
        for shift in Shift::ALL {
            let (start, end) = shift.window();
            let state = if booked.contains(&shift) {
                "booked"
            } else {
                "free"
            };
            println!("  {:<10} {start}-{end}  {state}", shift.as_str());
        }
        Ok(())
    }
}
