//! Space catalog commands: `space add|update|list|show`.

use crate::error::CliError;
use crate::utils::{
    format_cents, load_configuration, open_database, optional_principal, output_format,
    require_principal, write_delimited, write_json, write_table, GlobalOptions, OutputFormat,
};
use cajuhub::operations::SpaceManager;
use cajuhub::{Space, SpaceDraft, SpaceId};
use clap::{Args, Subcommand};

const COLUMN_HEADERS: [&str; 7] = [
    "id",
    "name",
    "capacity",
    "price_per_shift",
    "size",
    "amenities",
    "active",
];

/// Manage the space catalog.
#[derive(Args)]
pub struct SpaceCommand {
    #[command(subcommand)]
    pub action: SpaceAction,
}

/// Space subcommands.
#[derive(Subcommand)]
pub enum SpaceAction {
    /// Add a space (admins only)
    Add(SpaceAddArgs),

    /// Change a space (admins only)
    Update(SpaceUpdateArgs),

    /// List spaces
    List(SpaceListArgs),

    /// Show one space
    Show(SpaceShowArgs),
}

/// Arguments for `space add`.
#[derive(Args)]
pub struct SpaceAddArgs {
    /// Display name
    #[arg(long, value_name = "NAME")]
    pub name: String,

    /// Maximum number of people
    #[arg(long, value_name = "N")]
    pub capacity: u32,

    /// Price of one shift, in cents
    #[arg(long, value_name = "CENTS", allow_negative_numbers = true)]
    pub price: i64,

    /// Long description
    #[arg(long)]
    pub description: Option<String>,

    /// Free-text size, e.g. "40m2"
    #[arg(long)]
    pub size: Option<String>,

    /// Amenity label (repeatable)
    #[arg(long = "amenity", value_name = "LABEL")]
    pub amenities: Vec<String>,

    /// Picture URL
    #[arg(long, value_name = "URL")]
    pub image_url: Option<String>,

    /// Create the space as inactive
    #[arg(long)]
    pub inactive: bool,
}

/// Arguments for `space update`. Omitted fields keep their current value.
#[derive(Args)]
pub struct SpaceUpdateArgs {
    /// Space id
    #[arg(value_name = "ID")]
    pub id: i64,

    /// Display name
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Maximum number of people
    #[arg(long, value_name = "N")]
    pub capacity: Option<u32>,

    /// Price of one shift, in cents
    #[arg(long, value_name = "CENTS", allow_negative_numbers = true)]
    pub price: Option<i64>,

    /// Long description
    #[arg(long)]
    pub description: Option<String>,

    /// Free-text size
    #[arg(long)]
    pub size: Option<String>,

    /// Replace the amenities (repeatable)
    #[arg(long = "amenity", value_name = "LABEL")]
    pub amenities: Option<Vec<String>>,

    /// Picture URL
    #[arg(long, value_name = "URL")]
    pub image_url: Option<String>,

    /// Stop accepting reservations
    #[arg(long, conflicts_with = "activate")]
    pub deactivate: bool,

    /// Accept reservations again
    #[arg(long)]
    pub activate: bool,
}

/// Arguments for `space list`.
#[derive(Args)]
pub struct SpaceListArgs {
    /// Include inactive spaces (admins only)
    #[arg(long)]
    pub all: bool,

    /// Output format
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<OutputFormat>,
}

/// Arguments for `space show`.
#[derive(Args)]
pub struct SpaceShowArgs {
    /// Space id
    #[arg(value_name = "ID")]
    pub id: i64,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

impl SpaceCommand {
    /// Execute the space command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;

        match self.action {
            SpaceAction::Add(args) => {
                let principal = require_principal(global, &db)?;
                let draft = SpaceDraft {
                    name: args.name,
                    description: args.description,
                    size: args.size,
                    capacity: args.capacity,
                    price_per_shift_cents: args.price,
                    amenities: args.amenities,
                    image_url: args.image_url,
                    is_active: !args.inactive,
                };
                let space = SpaceManager::new(&mut db).create(&principal, draft)?;
                println!("{}", space.id);
                Ok(())
            }
            SpaceAction::Update(args) => {
                let principal = require_principal(global, &db)?;
                let mut manager = SpaceManager::new(&mut db);
                let id = SpaceId::new(args.id);
                let current = manager.show(id)?;
                let draft = apply_update(current, args);
                let space = manager.update(&principal, id, draft)?;
                if !global.quiet {
                    println!("Updated space {} '{}'", space.id, space.name);
                }
                Ok(())
            }
            SpaceAction::List(args) => {
                let principal = optional_principal(global, &db)?;
                let spaces = SpaceManager::new(&mut db).list(principal.as_ref(), args.all)?;
                print_spaces(&spaces, output_format(args.format, &config))
            }
            SpaceAction::Show(args) => {
                let space = SpaceManager::new(&mut db).show(SpaceId::new(args.id))?;
                if args.json {
                    write_json(&serde_json::to_value(&space)?)
                } else {
                    print_space_details(&space);
                    Ok(())
                }
            }
        }
    }
}

fn apply_update(current: Space, args: SpaceUpdateArgs) -> SpaceDraft {
    let is_active = if args.deactivate {
        false
    } else if args.activate {
        true
    } else {
        current.is_active
    };

    SpaceDraft {
        name: args.name.unwrap_or(current.name),
        description: args.description.or(current.description),
        size: args.size.or(current.size),
        capacity: args.capacity.unwrap_or(current.capacity),
        price_per_shift_cents: args.price.unwrap_or(current.price_per_shift_cents),
        amenities: args.amenities.unwrap_or(current.amenities),
        image_url: args.image_url.or(current.image_url),
        is_active,
    }
}

fn space_row(space: &Space) -> Vec<String> {
    vec![
        space.id.to_string(),
        space.name.clone(),
        space.capacity.to_string(),
        format_cents(space.price_per_shift_cents),
        space.size.clone().unwrap_or_default(),
        space.amenities.join(";"),
        space.is_active.to_string(),
    ]
}

fn print_spaces(spaces: &[Space], format: OutputFormat) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => write_json(&serde_json::to_value(spaces)?),
        OutputFormat::Csv => write_delimited(&COLUMN_HEADERS, &rows(spaces), b','),
        OutputFormat::Tsv => write_delimited(&COLUMN_HEADERS, &rows(spaces), b'\t'),
        OutputFormat::Table => write_table(&COLUMN_HEADERS, &rows(spaces)),
    }
}

fn rows(spaces: &[Space]) -> Vec<Vec<String>> {
    spaces.iter().map(space_row).collect()
}

fn print_space_details(space: &Space) {
    println!("Space {}: {}", space.id, space.name);
    if let Some(ref description) = space.description {
        println!("  {description}");
    }
    println!("  Capacity:  {}", space.capacity);
    println!("  Price:     {} per shift", format_cents(space.price_per_shift_cents));
    if let Some(ref size) = space.size {
        println!("  Size:      {size}");
    }
    if !space.amenities.is_empty() {
        println!("  Amenities: {}", space.amenities.join(", "));
    }
    if let Some(ref url) = space.image_url {
        println!("  Image:     {url}");
    }
    println!(
        "  Status:    {}",
        if space.is_active { "active" } else { "inactive" }
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing() -> Space {
        Space {
            id: SpaceId::new(3),
            name: "Sala".into(),
            description: Some("Ampla".into()),
            size: None,
            capacity: 10,
            price_per_shift_cents: 5_000,
            amenities: vec!["wifi".into()],
            image_url: None,
            is_active: true,
        }
    }

    fn no_changes() -> SpaceUpdateArgs {
        SpaceUpdateArgs {
            id: 3,
            name: None,
            capacity: None,
            price: None,
            description: None,
            size: None,
            amenities: None,
            image_url: None,
            deactivate: false,
            activate: false,
        }
    }

    #[test]
    fn test_update_keeps_unset_fields() {
        let draft = apply_update(existing(), no_changes());
        assert_eq!(draft.name, "Sala");
        assert_eq!(draft.description.as_deref(), Some("Ampla"));
        assert_eq!(draft.amenities, vec!["wifi"]);
        assert!(draft.is_active);
    }

    #[test]
    fn test_update_applies_changes() {
        let args = SpaceUpdateArgs {
            capacity: Some(20),
            amenities: Some(vec![]),
            deactivate: true,
            ..no_changes()
        };
        let draft = apply_update(existing(), args);
        assert_eq!(draft.capacity, 20);
        assert!(draft.amenities.is_empty());
        assert!(!draft.is_active);
    }

    #[test]
    fn test_space_row() {
        let row = space_row(&existing());
        assert_eq!(row[0], "3");
        assert_eq!(row[3], "50.00");
        assert_eq!(row[6], "true");
    }
}
