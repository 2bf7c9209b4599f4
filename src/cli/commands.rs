use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "jot", about = concat!("jot v", env!("CARGO_PKG_VERSION"), " - your journal is a flat file"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different data directory
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new entry
    Add(AddArgs),
    /// List entries (the dashboard): filter, then sort
    List(ListArgs),
    /// Show one entry in full
    Show(ShowArgs),
    /// Edit an entry's fields
    Edit(EditArgs),
    /// Delete an entry and its images
    Delete(DeleteArgs),
    /// Search entries, reporting which fields matched
    Search(SearchArgs),
    /// Show or edit the profile
    Profile(ProfileCmd),
    /// Resolve the current location to a place name
    Locate,
    /// Remove image files no entry references
    Clean(CleanArgs),
    /// Validate stored data integrity
    Check,
    /// View or change settings
    Config(ConfigCmd),
}

// ---------------------------------------------------------------------------
// Entry commands
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Entry title (optional — entries may be untitled)
    pub title: Option<String>,
    /// Entry body text
    #[arg(long)]
    pub content: Option<String>,
    /// Location text (manual entry)
    #[arg(long, conflicts_with = "gps")]
    pub location: Option<String>,
    /// Resolve the location from the configured location services
    #[arg(long)]
    pub gps: bool,
    /// Attach an image file (repeatable)
    #[arg(long)]
    pub image: Vec<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Filter: case-insensitive substring over title/location/content
    #[arg(long)]
    pub search: Option<String>,
    /// Sort mode: date-desc, date-asc, title-asc, title-desc
    /// (default from settings)
    #[arg(long)]
    pub sort: Option<String>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Entry id (an unambiguous prefix works)
    pub id: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Entry id (an unambiguous prefix works)
    pub id: String,
    /// New title ("" clears it)
    #[arg(long)]
    pub title: Option<String>,
    /// New body text ("" clears it)
    #[arg(long)]
    pub content: Option<String>,
    /// New location text ("" clears it)
    #[arg(long, conflicts_with = "gps")]
    pub location: Option<String>,
    /// Resolve the location from the configured location services
    #[arg(long)]
    pub gps: bool,
    /// Attach another image file (repeatable)
    #[arg(long)]
    pub image: Vec<String>,
    /// Delete the entry's image files and clear the list
    #[arg(long)]
    pub clear_images: bool,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Entry id (an unambiguous prefix works)
    pub id: String,
    /// Skip confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Text to search for
    pub text: String,
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ProfileCmd {
    #[command(subcommand)]
    pub action: Option<ProfileAction>,
}

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the profile (default)
    Show,
    /// Set profile fields
    Set(ProfileSetArgs),
    /// Replace the profile photo
    Image(ProfileImageArgs),
    /// Remove the profile photo
    ClearImage,
}

#[derive(Args)]
pub struct ProfileSetArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub bio: Option<String>,
}

#[derive(Args)]
pub struct ProfileImageArgs {
    /// Image file to store
    pub path: String,
}

// ---------------------------------------------------------------------------
// Maintenance and settings
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct CleanArgs {
    /// Report orphaned images without deleting them
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective settings
    Show,
    /// Change a setting (keys: default-sort, debounce-ms)
    Set(ConfigSetArgs),
}

#[derive(Args)]
pub struct ConfigSetArgs {
    /// Setting key: default-sort or debounce-ms
    pub key: String,
    /// New value
    pub value: String,
}
