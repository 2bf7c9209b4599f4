use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::cli::commands::*;
use crate::cli::output;
use crate::io::config_io;
use crate::io::image_io::ImageStore;
use crate::io::journal_io::JournalStore;
use crate::io::lock::StoreLock;
use crate::io::paths::DataDir;
use crate::io::profile_io::ProfileStore;
use crate::location::settings_provider::{SettingsGeocoder, SettingsLocationProvider};
use crate::location::{DENIED_MESSAGE, LocationOutcome, LocationService};
use crate::model::journal::SortMode;
use crate::ops::{check, clean, entry_ops, search};

/// Global override for the data directory (set by the -C flag)
static DATA_DIR_OVERRIDE: Mutex<Option<PathBuf>> = Mutex::new(None);

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;

    if let Some(ref dir) = cli.data_dir {
        DATA_DIR_OVERRIDE
            .lock()
            .unwrap()
            .replace(PathBuf::from(dir));
    }

    match cli.command {
        Commands::Add(args) => cmd_add(args, json),
        Commands::List(args) => cmd_list(args, json),
        Commands::Show(args) => cmd_show(args, json),
        Commands::Edit(args) => cmd_edit(args, json),
        Commands::Delete(args) => cmd_delete(args, json),
        Commands::Search(args) => cmd_search(args, json),
        Commands::Profile(args) => match args.action {
            None | Some(ProfileAction::Show) => cmd_profile_show(json),
            Some(ProfileAction::Set(args)) => cmd_profile_set(args, json),
            Some(ProfileAction::Image(args)) => cmd_profile_image(args),
            Some(ProfileAction::ClearImage) => cmd_profile_clear_image(),
        },
        Commands::Locate => cmd_locate(json),
        Commands::Clean(args) => cmd_clean(args, json),
        Commands::Check => cmd_check(json),
        Commands::Config(args) => match args.action {
            ConfigAction::Show => cmd_config_show(json),
            ConfigAction::Set(args) => cmd_config_set(args),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn data_dir() -> DataDir {
    match DATA_DIR_OVERRIDE.lock().unwrap().as_ref() {
        Some(dir) => DataDir::new(dir.clone()),
        None => DataDir::resolve(),
    }
}

fn read_image(path: &str) -> Result<(Vec<u8>, String), Box<dyn std::error::Error>> {
    let bytes =
        std::fs::read(path).map_err(|e| format!("cannot read image '{}': {}", path, e))?;
    let ext = std::path::Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("jpg")
        .to_string();
    Ok((bytes, ext))
}

/// Run the location flow against the settings-backed collaborator.
/// Denial and failure leave the location unset and tell the user why.
fn resolve_gps(dir: &DataDir) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let settings = config_io::read_settings(dir)?;
    let mut service = LocationService::new(
        SettingsLocationProvider::new(settings.location.clone()),
        SettingsGeocoder::new(&settings.location),
    );
    match service.request_location() {
        LocationOutcome::Granted { place, .. } => Ok(Some(place)),
        LocationOutcome::Denied => {
            eprintln!("{}", DENIED_MESSAGE);
            Ok(None)
        }
        LocationOutcome::Failed(message) => {
            eprintln!("Could not resolve location: {}", message);
            Ok(None)
        }
    }
}

fn parse_sort(s: &str) -> Result<SortMode, String> {
    SortMode::parse(s).ok_or_else(|| {
        format!(
            "invalid sort mode '{}' (expected date-desc, date-asc, title-asc or title-desc)",
            s
        )
    })
}

fn confirm(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    let _ = std::io::stdout().flush();
    let mut line = String::new();
    if std::io::stdin().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

// ---------------------------------------------------------------------------
// Entry commands
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let dir = data_dir();
    dir.ensure_layout()?;
    let _lock = StoreLock::acquire_default(dir.root())?;
    let store = JournalStore::new(&dir);
    let images = ImageStore::new(&dir);

    let location = if args.gps {
        resolve_gps(&dir)?
    } else {
        args.location
    };
    let mut entry = entry_ops::new_entry(args.title, location, args.content);
    for path in &args.image {
        let (bytes, ext) = read_image(path)?;
        entry.images.push(images.save_bytes(&bytes, &ext)?);
    }

    let entry = store.upsert(entry)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        println!("Added {}", output::short_id(&entry.id));
    }
    Ok(())
}

fn cmd_list(args: ListArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let dir = data_dir();
    let store = JournalStore::new(&dir);
    let settings = config_io::read_settings(&dir)?;

    let sort = match args.sort.as_deref() {
        Some(s) => parse_sort(s)?,
        None => settings.general.default_sort,
    };

    let entries = store.load();
    let mut entries = search::filter_entries(&entries, args.search.as_deref().unwrap_or(""));
    search::sort_entries(&mut entries, sort);

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else if entries.is_empty() {
        println!("No entries.");
    } else {
        for entry in &entries {
            println!("{}", output::entry_line(entry));
        }
    }
    Ok(())
}

fn cmd_show(args: ShowArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let dir = data_dir();
    let store = JournalStore::new(&dir);
    let entries = store.load();
    let entry = entry_ops::resolve_id(&entries, &args.id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(entry)?);
    } else {
        output::print_detail(entry);
    }
    Ok(())
}

fn cmd_edit(args: EditArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let dir = data_dir();
    dir.ensure_layout()?;
    let _lock = StoreLock::acquire_default(dir.root())?;
    let store = JournalStore::new(&dir);
    let images = ImageStore::new(&dir);

    let entries = store.load();
    let mut entry = entry_ops::resolve_id(&entries, &args.id)?.clone();

    let location = if args.gps {
        resolve_gps(&dir)?
    } else {
        args.location
    };
    let mut edit = entry_ops::EntryEdit {
        title: args.title,
        location,
        content: args.content,
        add_images: Vec::new(),
        clear_images: args.clear_images,
    };
    for path in &args.image {
        let (bytes, ext) = read_image(path)?;
        edit.add_images.push(images.save_bytes(&bytes, &ext)?);
    }
    if edit.is_empty() {
        return Err("nothing to edit (pass at least one field)".into());
    }

    entry_ops::apply_edit(&mut entry, edit, &images);
    let entry = store.upsert(entry)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        println!("Updated {}", output::short_id(&entry.id));
    }
    Ok(())
}

fn cmd_delete(args: DeleteArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let dir = data_dir();
    dir.ensure_layout()?;
    let store = JournalStore::new(&dir);
    let images = ImageStore::new(&dir);

    let entries = store.load();
    let entry = entry_ops::resolve_id(&entries, &args.id)?.clone();

    if !args.yes && !confirm(&format!("Delete \"{}\"?", entry.display_title())) {
        println!("Canceled.");
        return Ok(());
    }

    let _lock = StoreLock::acquire_default(dir.root())?;
    let removed = entry_ops::delete_entry(&store, &images, &entry.id)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&removed)?);
    } else {
        println!("Deleted {}", output::short_id(&removed.id));
    }
    Ok(())
}

fn cmd_search(args: SearchArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let re = search::build_matcher(&args.text).ok_or("search text is empty")?;
    let dir = data_dir();
    let store = JournalStore::new(&dir);
    let entries = store.load();
    let hits = search::search_entries(&entries, &re);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::hits_to_json(&hits))?
        );
    } else {
        output::print_hits(&entries, &hits);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

fn cmd_profile_show(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let dir = data_dir();
    let profile = ProfileStore::new(&dir).load();
    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        println!("Name:  {}", profile.name);
        println!("Email: {}", profile.email);
        println!("Bio:   {}", profile.bio);
        if let Some(image) = profile.image_filename.as_deref() {
            println!("Photo: {}", image);
        }
    }
    Ok(())
}

fn cmd_profile_set(args: ProfileSetArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let dir = data_dir();
    dir.ensure_layout()?;
    let _lock = StoreLock::acquire_default(dir.root())?;
    let profiles = ProfileStore::new(&dir);

    let mut profile = profiles.load();
    if let Some(name) = args.name {
        profile.name = name;
    }
    if let Some(email) = args.email {
        profile.email = email;
    }
    if let Some(bio) = args.bio {
        profile.bio = bio;
    }
    profiles.save(&profile)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        println!("Profile updated.");
    }
    Ok(())
}

fn cmd_profile_image(args: ProfileImageArgs) -> Result<(), Box<dyn std::error::Error>> {
    let dir = data_dir();
    dir.ensure_layout()?;
    let _lock = StoreLock::acquire_default(dir.root())?;
    let profiles = ProfileStore::new(&dir);
    let images = ImageStore::new(&dir);

    let (bytes, ext) = read_image(&args.path)?;
    let filename = profiles.set_image(&bytes, &ext, &images)?;
    println!("Profile photo set ({})", filename);
    Ok(())
}

fn cmd_profile_clear_image() -> Result<(), Box<dyn std::error::Error>> {
    let dir = data_dir();
    dir.ensure_layout()?;
    let _lock = StoreLock::acquire_default(dir.root())?;
    let profiles = ProfileStore::new(&dir);
    let images = ImageStore::new(&dir);
    profiles.clear_image(&images)?;
    println!("Profile photo removed.");
    Ok(())
}

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

fn cmd_locate(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let dir = data_dir();
    let settings = config_io::read_settings(&dir)?;
    let mut service = LocationService::new(
        SettingsLocationProvider::new(settings.location.clone()),
        SettingsGeocoder::new(&settings.location),
    );

    let result = match service.request_location() {
        LocationOutcome::Granted { position, place } => output::LocateJson {
            outcome: "granted",
            place: Some(place),
            latitude: Some(position.latitude),
            longitude: Some(position.longitude),
            message: None,
        },
        LocationOutcome::Denied => output::LocateJson {
            outcome: "denied",
            place: None,
            latitude: None,
            longitude: None,
            message: Some(DENIED_MESSAGE.to_string()),
        },
        LocationOutcome::Failed(message) => output::LocateJson {
            outcome: "failed",
            place: None,
            latitude: None,
            longitude: None,
            message: Some(message),
        },
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if let Some(place) = &result.place {
        println!("{}", place);
    } else if let Some(message) = &result.message {
        println!("{}", message);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Maintenance and settings
// ---------------------------------------------------------------------------

fn cmd_clean(args: CleanArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let dir = data_dir();
    dir.ensure_layout()?;
    let _lock = StoreLock::acquire_default(dir.root())?;
    let journal = JournalStore::new(&dir);
    let profiles = ProfileStore::new(&dir);
    let images = ImageStore::new(&dir);

    let result = clean::sweep_images(&journal, &profiles, &images, args.dry_run);
    if json {
        println!(
            "{}",
            serde_json::json!({ "orphans": result.orphans, "deleted": result.deleted })
        );
    } else if result.orphans.is_empty() {
        println!("No orphaned images.");
    } else {
        let verb = if result.deleted { "Removed" } else { "Would remove" };
        println!("{} {} orphaned image(s):", verb, result.orphans.len());
        for name in &result.orphans {
            println!("  {}", name);
        }
    }
    Ok(())
}

fn cmd_check(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let dir = data_dir();
    let journal = JournalStore::new(&dir);
    let profiles = ProfileStore::new(&dir);
    let images = ImageStore::new(&dir);

    let report = check::check(&journal, &profiles, &images);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    if report.is_clean() {
        println!("OK");
        return Ok(());
    }
    for id in &report.duplicate_ids {
        println!("duplicate id: {}", id);
    }
    for missing in &report.missing_images {
        println!(
            "missing image: {} (referenced by {})",
            missing.filename, missing.entry_id
        );
    }
    for id in &report.timestamp_violations {
        println!("updated before created: {}", id);
    }
    Ok(())
}

fn cmd_config_show(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let dir = data_dir();
    let settings = config_io::read_settings(&dir)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
    } else {
        print!("{}", toml::to_string_pretty(&settings)?);
    }
    Ok(())
}

fn cmd_config_set(args: ConfigSetArgs) -> Result<(), Box<dyn std::error::Error>> {
    let dir = data_dir();
    dir.ensure_layout()?;
    let _lock = StoreLock::acquire_default(dir.root())?;

    let mut doc = config_io::read_document(&dir)?;
    match args.key.as_str() {
        "default-sort" => {
            let mode = parse_sort(&args.value)?;
            config_io::set_default_sort(&mut doc, mode);
        }
        "debounce-ms" => {
            let ms: u64 = args
                .value
                .parse()
                .map_err(|_| format!("invalid debounce interval '{}'", args.value))?;
            config_io::set_debounce_ms(&mut doc, ms);
        }
        other => {
            return Err(
                format!("unknown setting '{}' (try default-sort or debounce-ms)", other).into(),
            );
        }
    }
    config_io::write_document(&dir, &doc)?;
    println!("Set {} = {}", args.key, args.value);
    Ok(())
}
