//! house-gen: generate one house and print it.
//!
//! Usage: house-gen [--seed N] [--config PATH] [--level Z] [--json] [--verbose]

use anyhow::Context;

use house_core::logging::{init_tracing, TracingConfig};
use house_core::{House, HouseConfig};

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn parse_num_arg<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    parse_str_arg(args, flag).and_then(|v| v.parse().ok())
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--verbose") {
        init_tracing(&TracingConfig::verbose());
    } else {
        init_tracing(&TracingConfig::default());
    }

    let mut config = match parse_str_arg(&args, "--config") {
        Some(path) => HouseConfig::load(&path)
            .with_context(|| format!("failed to load house config from {path}"))?,
        None => HouseConfig::default(),
    };
    if let Some(seed) = parse_num_arg::<u64>(&args, "--seed") {
        config.seed = Some(seed);
    }

    let house = House::generate(&config).context("house generation failed")?;

    if args.iter().any(|a| a == "--json") {
        println!("{}", house.to_json()?);
        return Ok(());
    }

    println!("seed:        {}", house.seed);
    println!("facing:      {}", house.facing);
    println!(
        "rooms:       {} built, {} placed",
        house.tree.len(),
        house.placed_rooms().len()
    );
    println!("stories:     {}", house.stories());
    println!("gaps:        {}", house.gaps.len());
    println!("fingerprint: {}", house.fingerprint());

    let levels: Vec<u32> = match parse_num_arg::<u32>(&args, "--level") {
        Some(z) => vec![z],
        None => (0..house.stories()).collect(),
    };
    for z in levels {
        let dump = house
            .grid
            .render_level(z)
            .with_context(|| format!("level {z} does not exist (house has {})", house.stories()))?;
        println!("\n-- level {z} --");
        print!("{dump}");
    }

    Ok(())
}
