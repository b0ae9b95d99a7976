//! Object command - read one object preview through the cache.

use std::path::PathBuf;

use futures::future::join_all;
use pausecache::cache::ObjectCacheError;
use pausecache::protocol::{ObjectId, PauseId};

use super::common::{print_json, print_stats, resolve_tier, TierArg};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the object command.
pub struct ObjectArgs {
    pub recording: PathBuf,
    pub pause: String,
    pub object: String,
    pub tier: Option<TierArg>,
    pub readers: usize,
    pub debug: bool,
}

/// Run the object command.
///
/// Issues `readers` concurrent reads of the same key; they share one fetch.
pub fn run(args: ObjectArgs) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(args.debug)?;
    runner.log_startup("object");

    let tier = resolve_tier(args.tier, runner.config());
    let (cache, client) = runner.create_cache(&args.recording)?;
    let pause_id = PauseId::new(args.pause);
    let object_id = ObjectId::new(args.object);
    let readers = args.readers.max(1);

    let runtime = runner.runtime()?;
    let results = runtime.block_on(async {
        join_all((0..readers).map(|_| cache.read_object_async(&pause_id, &object_id, tier))).await
    });

    let first = results.into_iter().next();
    let object = first.unwrap_or(Err(ObjectCacheError::NotFound {
        pause_id: pause_id.clone(),
        object_id: object_id.clone(),
    }))?;

    println!("{} preview of {} in pause {}:", tier, object_id, pause_id);
    print_json(&object)?;

    if let Some(best) = cache.try_get_object(&pause_id, &object_id) {
        if best != object {
            println!();
            println!("A stronger descriptor is cached:");
            print_json(&best)?;
        }
    }

    print_stats(&cache.stats(), client.preview_calls() + client.property_calls());
    runner.finish(&cache);
    Ok(())
}
