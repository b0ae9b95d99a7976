//! Property command - read one property value through the cache.

use std::path::PathBuf;

use futures::future::join_all;
use pausecache::cache::{ObjectCacheError, PropertyKey};
use pausecache::protocol::{ObjectId, PauseId};

use super::common::{print_json, print_stats};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the property command.
pub struct PropertyArgs {
    pub recording: PathBuf,
    pub pause: String,
    pub object: String,
    pub name: String,
    pub readers: usize,
    pub debug: bool,
}

/// Run the property command.
pub fn run(args: PropertyArgs) -> Result<(), CliError> {
    let runner = CliRunner::with_debug(args.debug)?;
    runner.log_startup("property");

    let (cache, client) = runner.create_cache(&args.recording)?;
    let pause_id = PauseId::new(args.pause);
    let object_id = ObjectId::new(args.object);
    let readers = args.readers.max(1);

    let runtime = runner.runtime()?;
    let results = runtime.block_on(async {
        join_all(
            (0..readers).map(|_| cache.read_property_async(&pause_id, &object_id, &args.name)),
        )
        .await
    });

    let first = results.into_iter().next();
    let value = first.unwrap_or(Err(ObjectCacheError::NotFound {
        pause_id: pause_id.clone(),
        object_id: object_id.clone(),
    }))?;

    let key = PropertyKey::new(object_id, args.name);
    println!("{} in pause {}:", key, pause_id);
    print_json(&value)?;

    // Objects returned alongside the value are now cached too.
    if let Some(nested) = value
        .object
        .as_ref()
        .and_then(|id| cache.try_get_object(&pause_id, id))
    {
        println!();
        println!("Referenced object (cached with the response):");
        print_json(&nested)?;
    }

    print_stats(&cache.stats(), client.preview_calls() + client.property_calls());
    runner.finish(&cache);
    Ok(())
}
