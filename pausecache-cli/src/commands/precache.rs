//! Precache command - bulk-ingest recorded objects without fetching.

use std::path::PathBuf;

use pausecache::cache::Tier;
use pausecache::protocol::PauseId;

use super::common::print_stats;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the precache command.
pub struct PrecacheArgs {
    pub recording: PathBuf,
    pub pause: Option<String>,
    pub debug: bool,
}

/// Run the precache command.
///
/// Feeds every recorded descriptor of the selected pauses through bulk
/// ingestion and reports what each tier ended up holding.
pub fn run(args: PrecacheArgs) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(args.debug)?;
    runner.log_startup("precache");

    let (cache, client) = runner.create_cache(&args.recording)?;

    let pauses = match args.pause {
        Some(pause) => vec![PauseId::new(pause)],
        None => client.pause_ids(),
    };

    if pauses.is_empty() {
        println!("Recording contains no pauses.");
        return Ok(());
    }

    for pause_id in &pauses {
        let objects = client.recorded_objects(pause_id);
        let changed = cache.precache_many(pause_id, &objects);

        println!("Pause {}:", pause_id);
        println!("  Descriptors: {}", objects.len());
        println!("  Cached:      {}", changed);

        if let Some(scope) = cache.scope(pause_id) {
            println!("  Objects:     {}", scope.object_count());
            println!("  Partial:     {}", scope.preview_count(Tier::Partial));
            println!("  Full:        {}", scope.preview_count(Tier::Full));
        }

        let mut ids: Vec<_> = objects.iter().map(|o| &o.object_id).collect();
        ids.sort();
        for id in ids {
            if let Some(object) = cache.try_get_object(pause_id, id) {
                println!(
                    "    {} {} ({})",
                    object.object_id,
                    object.class_name,
                    Tier::of(&object)
                );
            }
        }
    }

    print_stats(&cache.stats(), client.preview_calls() + client.property_calls());
    runner.finish(&cache);
    Ok(())
}
