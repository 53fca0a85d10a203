use core::hash::BuildHasher;

use clap::Parser;
use clap::ValueEnum;
use probe_hash::HashTable;
use probe_hash::LinearProbe;
use probe_hash::ProbeSequence;
use probe_hash::QuadraticProbe;
use siphasher::sip::SipHasher;

/// Zero-key SipHash builder so every run produces the same layout.
#[derive(Clone, Copy, Default)]
struct FixedSipBuilder;

impl BuildHasher for FixedSipBuilder {
    type Hasher = SipHasher;

    fn build_hasher(&self) -> Self::Hasher {
        SipHasher::new()
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ProbeChoice {
    Linear,
    Quadratic,
}

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'n', long = "keys", default_value_t = 1000)]
    keys: usize,

    #[arg(short = 'p', long = "probe", value_enum, default_value = "linear")]
    probe: ProbeChoice,

    /// Remove every other key after the fill to leave tombstones behind.
    #[arg(long = "churn")]
    churn: bool,
}

fn main() {
    let args = Args::parse();

    match args.probe {
        ProbeChoice::Linear => run(LinearProbe, &args),
        ProbeChoice::Quadratic => run(QuadraticProbe, &args),
    }
}

fn run<P: ProbeSequence>(probe: P, args: &Args) {
    let mut table: HashTable<u64, u64, P, FixedSipBuilder> =
        HashTable::with_probe_and_hasher(probe, FixedSipBuilder);

    println!("Filling table with {} sequential u64 keys...", args.keys);

    let mut worst = 0;
    let mut total = 0;
    for key in 0..args.keys as u64 {
        match table.try_insert(key, key) {
            Ok(probes) => {
                worst = worst.max(probes);
                total += probes;
            }
            Err(rejected) => {
                panic!("key already present in table: {}", rejected.key());
            }
        }
    }

    println!("Inserted {} keys into table", table.len());
    println!(
        "Mean insert probes: {:.2} (worst: {})",
        total as f64 / table.len() as f64,
        worst
    );

    if args.churn {
        println!("Removing every other key to leave tombstones behind...");
        for key in (0..args.keys as u64).step_by(2) {
            table.remove(&key);
        }
    }

    print_histogram(&table, args.keys as u64);
    table.stats().print();
}

fn print_histogram<P: ProbeSequence>(
    table: &HashTable<u64, u64, P, FixedSipBuilder>,
    keys: u64,
) {
    let mut histogram: Vec<usize> = Vec::new();
    let mut misses = 0;
    for key in 0..keys {
        match table.get(&key) {
            Some(found) => {
                if histogram.len() < found.probes {
                    histogram.resize(found.probes, 0);
                }
                histogram[found.probes - 1] += 1;
            }
            None => misses += 1,
        }
    }

    println!("=== Probe Length Histogram ===");
    let widest = histogram.iter().copied().max().unwrap_or(1);
    for (length, count) in histogram.iter().enumerate() {
        let bar = "#".repeat(count * 40 / widest.max(1));
        println!("{:>6} | {:>8} {}", length + 1, count, bar);
    }
    if misses > 0 {
        println!("Skipped {} removed keys", misses);
    }
}
