use anyhow::Context;
use data_loader::Dataset;
use std::path::Path;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    let data_dir = Path::new("data");

    println!("Loading games dataset...\n");

    let start = Instant::now();
    let dataset = Dataset::load_from_files(data_dir).context("Failed to load dataset")?;
    let elapsed = start.elapsed();

    let (games, keys, buckets) = dataset.counts();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Games: {}", games);
    println!("Membership keys: {}", keys);
    println!("Release buckets: {}", buckets);
    println!("\nPerformance: {:.0} games/second",
             games as f64 / elapsed.as_secs_f64());
    Ok(())
}
