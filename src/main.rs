use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::Rng;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ttl_cache::config::secs_to_duration;
use ttl_cache::{clear_cache, CacheConfig, TtlCache};

/// Exercise and inspect the TTL cache
#[derive(Parser, Debug)]
#[command(name = "ttl-cache")]
#[command(about = "Thread-safe TTL cache with background expiration")]
#[command(version)]
struct Cli {
    /// JSON config file, e.g. {"ttl_secs": 900, "cleanup_interval_secs": 60}
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Idle time after which an entry expires (overrides the config file)
    #[arg(long, value_name = "SECS", global = true)]
    ttl_secs: Option<f64>,

    /// Time between background sweeps (overrides the config file)
    #[arg(long, value_name = "SECS", global = true)]
    cleanup_interval_secs: Option<f64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Put two entries, let them expire, put two more and report what survived.
    /// Without a config file or flags this uses a 5s TTL and a 1s sweep.
    Demo,
    /// Hammer one shared cache with random gets and puts from many threads
    Stress {
        #[arg(long, default_value_t = 5)]
        threads: usize,
        /// Operations per thread
        #[arg(long, default_value_t = 100_000)]
        ops: usize,
        #[arg(long, default_value_t = 100_000)]
        key_space: u32,
    },
    /// Print the effective configuration as JSON
    Config,
}

impl Cli {
    fn has_overrides(&self) -> bool {
        self.config.is_some() || self.ttl_secs.is_some() || self.cleanup_interval_secs.is_some()
    }

    /// Flags win over the file, the file wins over `base`.
    fn effective_config(&self, base: CacheConfig) -> Result<CacheConfig> {
        let mut config = match &self.config {
            Some(path) => CacheConfig::from_json_file(path)?,
            None => base,
        };
        if let Some(secs) = self.ttl_secs {
            config = config.with_ttl(secs_to_duration("ttl-secs", secs)?)?;
        }
        if let Some(secs) = self.cleanup_interval_secs {
            config = config.with_cleanup_interval(secs_to_duration("cleanup-interval-secs", secs)?)?;
        }
        Ok(config)
    }
}

fn run_demo(config: &CacheConfig) -> Result<()> {
    let cache: TtlCache<String, String> = TtlCache::with_config(config);

    cache.put("1".to_string(), "One".to_string())?;
    cache.put("2".to_string(), "Two".to_string())?;
    println!("Put 1 and 2 ({} entries)", cache.size());

    let wait = config.ttl() + config.cleanup_interval() + Duration::from_millis(100);
    println!("Sleeping {:?} so the sweeper can expire them...", wait);
    thread::sleep(wait);

    cache.put("3".to_string(), "Three".to_string())?;
    cache.put("4".to_string(), "Four".to_string())?;

    for key in ["1", "2", "3", "4"] {
        println!("contains {}: {}", key, cache.contains_key(&key.to_string())?);
    }
    println!("size: {}", cache.size());

    println!("cleared: {}", clear_cache(&cache));
    cache.close();
    Ok(())
}

fn run_stress(config: &CacheConfig, threads: usize, ops: usize, key_space: u32) -> Result<()> {
    let key_space = key_space.max(1);
    let cache: Arc<TtlCache<String, u32>> = Arc::new(TtlCache::with_config(config));
    let started = Instant::now();

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let cache = cache.clone();
            thread::spawn(move || -> Result<()> {
                let mut rng = rand::thread_rng();
                for _ in 0..ops {
                    let read_key = rng.gen_range(0..key_space);
                    let value = rng.gen_range(0..key_space);
                    cache.get(&read_key.to_string())?;
                    cache.put(value.to_string(), value)?;
                }
                Ok(())
            })
        })
        .collect();

    for handle in handles {
        handle
            .join()
            .map_err(|e| anyhow::anyhow!("Stress worker panicked: {:?}", e))??;
    }

    let elapsed = started.elapsed();
    info!("All {} threads completed in {:?}", threads, elapsed);
    println!(
        "threads: {}, ops/thread: {}, elapsed: {:.3}s, final size: {}",
        threads,
        ops,
        elapsed.as_secs_f64(),
        cache.size()
    );
    cache.close();
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Command::Demo => {
            let base = if cli.has_overrides() {
                CacheConfig::default()
            } else {
                CacheConfig::new(Duration::from_secs(5), Duration::from_secs(1))?
            };
            let config = cli.effective_config(base).context("Invalid cache configuration")?;
            run_demo(&config)
        }
        Command::Stress {
            threads,
            ops,
            key_space,
        } => {
            let config = cli
                .effective_config(CacheConfig::default())
                .context("Invalid cache configuration")?;
            run_stress(&config, *threads, *ops, *key_space)
        }
        Command::Config => {
            let config = cli
                .effective_config(CacheConfig::default())
                .context("Invalid cache configuration")?;
            println!("{}", config.to_json_string()?);
            Ok(())
        }
    }
}
