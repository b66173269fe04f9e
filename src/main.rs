use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use codonforge::config::OptimizationConfig;
use codonforge::engine::{ConsoleProgress, Optimizer};
use codonforge::featurize;
use codonforge::io::{fasta, profile};
use codonforge::types::FeatureKey;

#[derive(Parser, Debug)]
#[command(
    name = "codonforge",
    author,
    version,
    about = "Featurize DNA k-mer usage and evolve coding sequences that match it",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Featurize one or more FASTA files into a k-mer frequency profile
    Featurize {
        /// Input FASTA files
        files: Vec<String>,
        /// Comma-separated k values to featurize, e.g. "1,2,3"
        #[arg(short, long, value_delimiter = ',')]
        kmers: Vec<usize>,
        /// Also featurize codon usage (non-overlapping reading-frame triplets)
        #[arg(short, long)]
        codons: bool,
        /// Output profile file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Generate a DNA sequence matching a target profile for an amino acid sequence
    Generate {
        /// FASTA file containing the target amino acid sequence
        #[arg(short, long)]
        seq: String,
        /// Profile file with the target k-mer/codon frequencies
        #[arg(short, long)]
        freq: String,
        /// Output FASTA file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Genetic code id (NCBI translation table)
        #[arg(short, long)]
        genetic_code: Option<u8>,
        /// TOML file with GA parameters
        #[arg(long)]
        config: Option<String>,
        /// Number of independent populations to run
        #[arg(short, long)]
        populations: Option<usize>,
        /// Fixed RNG seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Featurize {
            files,
            kmers,
            codons,
            output,
        } => run_featurize(&files, &kmers, codons, output.as_deref()),
        Commands::Generate {
            seq,
            freq,
            output,
            genetic_code,
            config,
            populations,
            seed,
        } => run_generate(
            &seq,
            &freq,
            output.as_deref(),
            genetic_code,
            config.as_deref(),
            populations,
            seed,
        ),
    }
}

fn run_featurize(files: &[String], ks: &[usize], codons: bool, output: Option<&str>) -> Result<()> {
    let mut keys: Vec<FeatureKey> = ks.iter().map(|&k| FeatureKey::Kmer(k)).collect();
    keys.sort_unstable();
    keys.dedup();
    if codons {
        keys.push(FeatureKey::Codons);
    }
    if keys.is_empty() {
        anyhow::bail!(
            "No k-mers or codons specified to featurize. Provide at least one k value \
             with -k or use -c to featurize codons."
        );
    }
    if files.is_empty() {
        anyhow::bail!("No input FASTA files given.");
    }

    let mut sequences = Vec::new();
    for file in files {
        let records =
            fasta::read_fasta(file).with_context(|| format!("cannot read FASTA file '{}'", file))?;
        sequences.extend(records.into_iter().map(|record| record.sequence));
    }
    if sequences.is_empty() {
        anyhow::bail!("The input FASTA files contain no sequences.");
    }
    log::info!(
        "Featurizing {} sequence(s) from {} file(s)",
        sequences.len(),
        files.len()
    );

    let result = featurize::featurize_collection(&sequences, &keys)?;
    match output {
        Some(path) => {
            profile::write_profile(path, &result)?;
            log::info!("Profile written to {}", path);
        }
        None => println!("{}", serde_json::to_string_pretty(&result)?),
    }
    Ok(())
}

fn run_generate(
    seq_path: &str,
    freq_path: &str,
    output: Option<&str>,
    genetic_code: Option<u8>,
    config_path: Option<&str>,
    populations: Option<usize>,
    seed: Option<u64>,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => OptimizationConfig::load_from_file(path)?,
        None => OptimizationConfig::default(),
    };
    if let Some(id) = genetic_code {
        config.genetic_code = id;
    }
    if let Some(n) = populations {
        config.num_populations = n;
    }
    if seed.is_some() {
        config.seed = seed;
    }

    let records = fasta::read_fasta(seq_path)
        .with_context(|| format!("cannot read FASTA file '{}'", seq_path))?;
    let record = records
        .into_iter()
        .next()
        .with_context(|| format!("FASTA file '{}' contains no sequences", seq_path))?;

    let target = profile::read_profile(freq_path)
        .with_context(|| format!("cannot read profile '{}'", freq_path))?;

    let optimizer = Optimizer::new(&record.sequence, target, config)?;
    let results = optimizer.run_with_progress(&mut ConsoleProgress::default())?;
    let best = results
        .first()
        .context("optimization produced no results")?;

    log::info!(
        "Best fitness {:.6} after {} generation(s) in {:.2?} ({:?})",
        best.fitness,
        best.generations,
        best.elapsed,
        best.stop_reason
    );

    let header = format!("{} codon-optimized, fitness {:.6}", record.id, best.fitness);
    match output {
        Some(path) => {
            let mut out = std::fs::File::create(path)
                .with_context(|| format!("cannot create output file '{}'", path))?;
            fasta::write_fasta(&mut out, &header, &best.sequence)?;
            log::info!("Sequence written to {}", path);
        }
        None => {
            let stdout = std::io::stdout();
            fasta::write_fasta(&mut stdout.lock(), &header, &best.sequence)?;
        }
    }
    Ok(())
}
