//! Command-line driver: build a lattice scan and emit the template bank.

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::fmt::SubscriberBuilder;

use dopplerscan::prelude::*;

#[derive(Parser)]
#[command(name = "dopplerscan-cli")]
#[command(about = "Generate a lattice-covering template bank over a Doppler search region")]
struct Cmd {
    /// Sky region: `(alpha, delta)` pairs in equatorial radians,
    /// e.g. "(0.1, 0.2), (0.3, 0.2), (0.2, 0.4)"
    #[arg(long)]
    sky_region: String,

    /// Frequency lower bound [Hz]
    #[arg(long)]
    freq: f64,
    /// Frequency band width [Hz]
    #[arg(long, default_value_t = 0.0)]
    freq_band: f64,
    /// First spindown lower bound [Hz/s]
    #[arg(long, default_value_t = 0.0)]
    f1dot: f64,
    /// First spindown band width [Hz/s]
    #[arg(long, default_value_t = 0.0)]
    f1dot_band: f64,
    /// Second spindown lower bound [Hz/s^2]
    #[arg(long, default_value_t = 0.0)]
    f2dot: f64,
    /// Second spindown band width [Hz/s^2]
    #[arg(long, default_value_t = 0.0)]
    f2dot_band: f64,
    /// Third spindown lower bound [Hz/s^3]
    #[arg(long, default_value_t = 0.0)]
    f3dot: f64,
    /// Third spindown band width [Hz/s^3]
    #[arg(long, default_value_t = 0.0)]
    f3dot_band: f64,

    /// Reference time of the spins (GPS seconds)
    #[arg(long)]
    ref_time: f64,
    /// Start of the observation (GPS seconds)
    #[arg(long)]
    start_time: f64,
    /// Observation span (seconds)
    #[arg(long)]
    tspan: f64,
    /// Maximal template-bank mismatch
    #[arg(long, default_value_t = 0.02)]
    mismatch: f64,

    /// Sky frame of the output: "equatorial" or "ecliptic"
    #[arg(long, default_value = "equatorial")]
    coords: String,
    /// Emit a JSON array instead of a text table
    #[arg(long)]
    json: bool,
    /// Stop after this many templates (0 = no limit)
    #[arg(long, default_value_t = 0)]
    max_templates: u64,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();

    let coords = match cmd.coords.as_str() {
        "equatorial" => CoordinateSystem::Equatorial,
        "ecliptic" => CoordinateSystem::Ecliptic,
        other => bail!("unknown sky frame `{other}`"),
    };

    let init = DopplerLatticeInit {
        tspan: cmd.tspan,
        start_time: cmd.start_time,
        max_mismatch: cmd.mismatch,
        sky_region: cmd.sky_region.clone(),
        spin_range: SpinRange {
            ref_time: cmd.ref_time,
            fkdot: [cmd.freq, cmd.f1dot, cmd.f2dot, cmd.f3dot],
            fkdot_band: [cmd.freq_band, cmd.f1dot_band, cmd.f2dot_band, cmd.f3dot_band],
        },
    };

    let metric = CircularOrbitMetric::default();
    let mut scan = DopplerLatticeScan::new(&init, &metric).context("initializing lattice scan")?;
    tracing::info!(dim = scan.dim(), tspan = cmd.tspan, "scan ready");
    tracing::debug!(origin = ?scan.origin(), "lattice origin");
    tracing::debug!(generator = ?scan.generator(), "lattice generator");

    let mut templates = Vec::new();
    let mut truncated = false;
    loop {
        let p = scan.current(coords).context("reading current template")?;
        templates.push(p);
        if cmd.max_templates > 0 && templates.len() as u64 >= cmd.max_templates {
            truncated = true;
            break;
        }
        match scan.advance().context("advancing lattice scan")? {
            StepOutcome::Advanced => {}
            StepOutcome::Finished => break,
        }
    }
    tracing::info!(count = templates.len(), truncated, "template bank complete");

    if cmd.json {
        let arr: Vec<serde_json::Value> = templates
            .iter()
            .map(|p| {
                serde_json::json!({
                    "ref_time": p.ref_time,
                    "alpha": p.alpha,
                    "delta": p.delta,
                    "fkdot": p.fkdot.to_vec(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&arr)?);
    } else {
        println!("# alpha delta f0 f1dot f2dot f3dot");
        for p in &templates {
            println!(
                "{:.9} {:.9} {:.9e} {:.9e} {:.9e} {:.9e}",
                p.alpha, p.delta, p.fkdot[0], p.fkdot[1], p.fkdot[2], p.fkdot[3]
            );
        }
    }
    Ok(())
}
