//! List command implementation.
//!
//! Shows the caller's reservations (every reservation for admins), newest
//! date first, in table, JSON, CSV or TSV form.

use crate::error::CliError;
use crate::utils::{
    format_cents, format_timestamp, load_configuration, open_database, output_format,
    require_principal, write_delimited, write_json, write_table, GlobalOptions, OutputFormat,
};
use cajuhub::operations::{Page, ReservationManager};
use cajuhub::ReservationDetails;
use clap::Args;

/// Column headers for all output formats.
const COLUMN_HEADERS: [&str; 10] = [
    "id",
    "space_id",
    "space",
    "date",
    "shift",
    "status",
    "holder",
    "price",
    "notes",
    "created_at",
];

/// List reservations.
#[derive(Args)]
pub struct ListCommand {
    /// Output format (default from configuration)
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<OutputFormat>,

    /// Maximum number of rows (default from configuration)
    #[arg(long, value_name = "N")]
    pub limit: Option<u32>,

    /// Rows to skip
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub offset: u32,

    /// Show every row
    #[arg(long, conflicts_with = "limit")]
    pub all: bool,
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        if self.limit == Some(0) {
            return Err(CliError::InvalidArguments(
                "--limit must be greater than 0".into(),
            ));
        }

        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;
        let principal = require_principal(global, &db)?;

        let page = if self.all {
            Page {
                limit: None,
                offset: self.offset,
            }
        } else {
            Page::new(
                self.limit.unwrap_or_else(|| config.default_list_limit()),
                self.offset,
            )
        };
        let rows = ReservationManager::new(&mut db).list(&principal, page)?;

        match output_format(self.format, &config) {
            OutputFormat::Table => write_table(&COLUMN_HEADERS, &table_rows(&rows, "-")),
            OutputFormat::Json => format_as_json(&rows),
            OutputFormat::Csv => write_delimited(&COLUMN_HEADERS, &table_rows(&rows, ""), b','),
            OutputFormat::Tsv => write_delimited(&COLUMN_HEADERS, &table_rows(&rows, ""), b'\t'),
        }
    }
}

fn table_rows(rows: &[ReservationDetails], missing: &str) -> Vec<Vec<String>> {
    rows.iter()
        .map(|d| {
            let r = &d.reservation;
            vec![
                r.id().to_string(),
                r.slot().space_id.to_string(),
                d.space_name.clone(),
                r.slot().date.to_string(),
                r.slot().shift.to_string(),
                r.status().to_string(),
                r.holder().to_string(),
                format_cents(d.price_per_shift_cents),
                r.notes().unwrap_or(missing).to_string(),
                format_timestamp(r.created_at()),
            ]
        })
        .collect()
}

fn format_as_json(rows: &[ReservationDetails]) -> Result<(), CliError> {
    let json_data: Vec<serde_json::Value> = rows
        .iter()
        .map(|d| {
            let r = &d.reservation;
            serde_json::json!({
                "id": r.id(),
                "space_id": r.slot().space_id,
                "space_name": d.space_name,
                "reservation_date": r.slot().date.to_string(),
                "shift": r.slot().shift,
                "status": r.status().as_str(),
                "user_id": r.holder(),
                "price_per_shift_cents": d.price_per_shift_cents,
                "notes": r.notes(),
                "created_at": format_timestamp(r.created_at()),
                "cancelled_at": r.cancelled_at().map(format_timestamp),
            })
        })
        .collect();

    write_json(&serde_json::Value::Array(json_data))
}
