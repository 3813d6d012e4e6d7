use adapter_align::{AdapterAligner, ScoringScheme};
use clap::Parser;
use log::{debug, info};

/// Aligns one adapter against one read and prints the statistics record
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cmd {
    /// Read sequence
    read: String,
    /// Adapter sequence
    adapter: String,
    /// Alignment scores: match,mismatch,gap open,gap extend
    #[arg(short, long, default_value_t = ScoringScheme::default(), allow_hyphen_values = true)]
    scoring: ScoringScheme,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cmd = Cmd::parse();
    let aligner = AdapterAligner::new().with_scoring(cmd.scoring);
    info!("scoring scheme {}", aligner.scoring());

    let alignment = aligner.align(cmd.read.as_bytes(), cmd.adapter.as_bytes());
    debug!("read:    {}", String::from_utf8_lossy(&alignment.read_row));
    debug!("adapter: {}", String::from_utf8_lossy(&alignment.adapter_row));

    println!("{}", adapter_align::extract_stats(&alignment));

    Ok(())
}
