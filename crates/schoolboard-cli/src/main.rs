//! Schoolboard CLI - prints school dashboard data from the command line.
//!
//! Every request goes through one `ResourceCache`, the same way the dashboard
//! reads data, so asking for `allUsers` and `students` together costs a single
//! request to the backend.

use std::io;

use anyhow::{bail, Result};
use futures::future::join_all;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use schoolboard_core::cache::views::{user_view, USER_VIEWS};
use schoolboard_core::cache::DerivedView;
use schoolboard_core::models::User;
use schoolboard_core::{Config, ResourceCache, ResourceKey};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Something the user can ask for: a cached resource or a view over one.
#[derive(Debug, Clone, Copy)]
enum Target {
    Key(ResourceKey),
    View(&'static DerivedView<User>),
}

impl Target {
    fn parse(name: &str) -> Result<Self> {
        if let Some(view) = user_view(name) {
            return Ok(Target::View(view));
        }
        match name.parse::<ResourceKey>() {
            Ok(key) => Ok(Target::Key(key)),
            Err(_) => bail!("Unknown resource '{}'. Run `schoolboard keys` for the list.", name),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Target::Key(key) => key.as_str(),
            Target::View(view) => view.name,
        }
    }

    async fn fetch(&self, cache: &ResourceCache) -> Result<Value> {
        let value = match self {
            Target::Key(key) => serde_json::to_value(cache.get(*key).await?)?,
            Target::View(view) => serde_json::to_value(cache.get_view(view).await?)?,
        };
        Ok(value)
    }
}

#[derive(Serialize)]
struct StatusRow {
    key: ResourceKey,
    loading: bool,
    has_data: bool,
    age: String,
}

fn print_usage() {
    eprintln!("Usage: schoolboard [--status] <resource>...");
    eprintln!("       schoolboard keys");
    eprintln!();
    eprintln!("Fetches each resource through the cache and prints a JSON object keyed by name.");
    eprintln!("--status also prints the cache state of every key to stderr.");
}

fn print_keys() {
    for key in ResourceKey::ALL {
        println!("{}", key);
    }
    for view in USER_VIEWS.iter() {
        println!("{} (view of {})", view.name, view.base);
    }
}

fn print_status(cache: &ResourceCache) -> Result<()> {
    let rows: Vec<StatusRow> = cache
        .status()
        .into_iter()
        .map(|(key, status)| StatusRow {
            key,
            loading: status.is_fetching,
            has_data: status.has_data,
            age: status.age_display(),
        })
        .collect();
    eprintln!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }
    if args[0] == "keys" {
        print_keys();
        return Ok(());
    }

    let show_status = args.iter().any(|a| a == "--status");
    let targets = args
        .iter()
        .filter(|a| !a.starts_with("--"))
        .map(|a| Target::parse(a))
        .collect::<Result<Vec<_>>>()?;

    let config = Config::load()?;
    info!(api = %config.api_base_url, "Schoolboard starting");
    let cache = ResourceCache::from_config(&config)?;

    let results = join_all(targets.iter().map(|target| target.fetch(&cache))).await;

    let mut output = Map::new();
    let mut failures = 0;
    for (target, result) in targets.iter().zip(results) {
        match result {
            Ok(value) => {
                debug!(resource = target.name(), "Fetched");
                output.insert(target.name().to_string(), value);
            }
            Err(e) => {
                failures += 1;
                eprintln!("Error: {}: {:#}", target.name(), e);
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(&Value::Object(output))?);

    if show_status {
        print_status(&cache)?;
    }
    cache.dispose();

    if failures > 0 {
        bail!("{} of {} resources failed", failures, targets.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use schoolboard_core::cache::TtlPolicy;
    use schoolboard_core::{ApiClient, CacheError, Resource};

    use super::*;

    #[test]
    fn test_parse_resource_key() {
        assert!(matches!(
            Target::parse("galleryImages").unwrap(),
            Target::Key(ResourceKey::GalleryImages)
        ));
    }

    #[test]
    fn test_parse_view_before_key() {
        let target = Target::parse("students").unwrap();
        assert!(matches!(target, Target::View(view) if view.base == ResourceKey::AllUsers));
        assert_eq!(target.name(), "students");
    }

    fn offline_cache() -> ResourceCache {
        // Nothing listens on port 9, so any real fetch fails.
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        ResourceCache::new(client, TtlPolicy::default())
    }

    #[tokio::test]
    async fn test_fetch_serializes_cached_payload() {
        let cache = offline_cache();
        cache.set_cache(Resource::GalleryStats(None)).unwrap();

        let value = Target::Key(ResourceKey::GalleryStats).fetch(&cache).await.unwrap();
        assert_eq!(value, Value::Null);
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_cache_error() {
        let cache = offline_cache();

        let err = Target::parse("students").unwrap().fetch(&cache).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<CacheError>(), Some(CacheError::Fetch(_))));
    }

    #[test]
    fn test_parse_unknown() {
        let err = Target::parse("timetable").unwrap_err();
        assert!(err.to_string().contains("Unknown resource 'timetable'"));
    }
}
