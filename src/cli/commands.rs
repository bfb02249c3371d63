use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;

use crate::composer::Composer;
use crate::config::{Config, LoggingConfig};
use crate::error::{Error, Result};
use crate::model::{Status, User};
use crate::repository::{ManualClock, Repositories};

/// Create the configuration directory and a default configuration file.
pub fn init(config_path: Option<&Path>) -> Result<()> {
    info!("Initializing chirpterm configuration");

    let config_file = resolve_config_file(config_path)?;
    if let Some(config_dir) = config_file.parent() {
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            info!("Created configuration directory: {}", config_dir.display());
        }
    }

    if config_file.exists() {
        return Err(Error::Invalid(format!(
            "Configuration file already exists: {}",
            config_file.display()
        )));
    }

    Config::default().save(&config_file)?;

    println!("✅ chirpterm initialized");
    println!("   Config file: {}", config_file.display());
    println!();
    println!("Next steps:");
    println!("   1. Add your API credentials to the [api] section");
    println!("   2. Check the result: chirpterm check");

    Ok(())
}

/// Validate the configuration, including the key-binding tables.
pub fn check(config: &Config) -> Result<()> {
    config.validate()?;
    let mappings = config.key_mappings()?;

    println!("✅ Configuration is valid");
    println!("   Cache TTL: {}s", config.cache.ttl);
    println!("   Sweep interval: {}s", config.cache.sweep_interval);
    println!("   API base URL: {}", config.api.base_url);
    println!(
        "   Key bindings: {} general, {} status",
        mappings.general.bindings().len(),
        mappings.status.bindings().len()
    );

    Ok(())
}

/// Print the resolved key bindings per category.
pub fn keys(config: &Config) -> Result<()> {
    let mappings = config.key_mappings()?;

    for mapper in [&mappings.general, &mappings.status] {
        println!("[{}]", mapper.category());
        for (command, binding) in mapper.bindings() {
            println!("  {:<12} {}", command, binding);
        }
        println!();
    }

    Ok(())
}

/// Walk through the repository lifecycle with sample data and a manual
/// clock, without touching the network.
pub fn demo(config: &Config) -> Result<()> {
    let clock = Arc::new(ManualClock::new());
    let repositories = Repositories::with_clock(config.ttl(), clock.clone());

    repositories
        .users
        .store(User::new("100", "alice", "Alice"));
    repositories
        .users
        .store(User::new("200", "bob", "Bob"));
    repositories
        .statuses
        .store(Status::new("1", "100", "Shipping the new release today!"));
    repositories.statuses.store(
        Status::new("2", "200", "Congrats! What changed?").in_reply_to("1"),
    );
    repositories.statuses.store(
        Status::new("3", "100", "Mostly the cache layer.").in_reply_to("1"),
    );

    println!("📥 Stored {} statuses from the sample timeline", repositories.statuses.len());
    for status in repositories.statuses.all() {
        let author = repositories
            .users
            .find(&status.user_id)
            .map(|user| user.screen_name)
            .unwrap_or_else(|| "unknown".to_string());
        println!("   @{}: {}", author, status.text);
    }

    let root_id = "1".to_string();
    let replies = repositories.statuses.find_replies_for(&root_id);
    println!();
    println!("💬 {} replies to status {}", replies.len(), root_id);

    let composer = Composer::new(repositories.users.clone(), config.api.base_url.clone());
    if let Some(root) = repositories.statuses.find(&root_id) {
        let draft = composer.reply(&root)?;
        let params = draft.finish("Looking forward to it")?;
        println!("✏️  Drafted reply: {}", params.text);
    }

    clock.advance(config.ttl());
    clock.advance_secs(1);
    let report = repositories.sweep_all();
    println!();
    println!(
        "🧹 After {}s of inactivity the sweep reclaimed {} statuses and {} users",
        config.cache.ttl + 1,
        report.statuses,
        report.users
    );
    println!(
        "   find(\"1\") now reports {}",
        if repositories.statuses.contains(&root_id) {
            "present"
        } else {
            "absent"
        }
    );

    Ok(())
}

/// Load the configuration, falling back to defaults when no file exists yet.
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config_file = resolve_config_file(config_path)?;
    if config_file.exists() {
        Config::load_with_env(config_file)
    } else {
        Ok(Config::default())
    }
}

/// Initialize logging based on verbosity flags and the logging section.
pub fn init_logging(
    debug: bool,
    verbose: bool,
    logging: &LoggingConfig,
) -> Result<Option<WorkerGuard>> {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let guard = if logging.log_to_file {
        let path = Path::new(&logging.log_file);
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let file_name = path
            .file_name()
            .ok_or_else(|| Error::Config(format!("Invalid log file path: {}", logging.log_file)))?;
        fs::create_dir_all(dir)?;

        let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(
            dir,
            file_name.to_os_string(),
        ));
        fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .init();
        Some(guard)
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_file(debug)
            .with_line_number(debug)
            .init();
        None
    };

    debug!("Logging initialized");
    Ok(guard)
}

fn resolve_config_file(config_path: Option<&Path>) -> Result<PathBuf> {
    match config_path {
        Some(path) => Ok(path.to_path_buf()),
        None => Config::config_file(),
    }
}
