use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use blobber::{generate_many_par, BlobParams, BlobWriter, InterpKind, Mask, Palette};

/// Generate random blob masks and save them as PNG files
#[derive(Parser, Debug)]
#[command(name = "blobber", version)]
struct Args {
    /// Side length of the square frame in pixels
    size: usize,

    /// Fraction of the maximum radius the boundary may shrink by
    fluctuation_rate: f64,

    /// Number of random boundary points before interpolation
    num_points: usize,

    /// How many blobs to generate
    #[arg(default_value_t = 1)]
    number_of_blobs: usize,

    /// Interpolation kind: nearest, nearest-up, previous, next, linear,
    /// zero, slinear, quadratic, cubic or a spline order
    #[arg(long, default_value = "cubic")]
    kind: InterpKind,

    /// Directory the blobs are written to
    #[arg(long, default_value = "blobs")]
    out_dir: PathBuf,

    /// Seed for a reproducible batch
    #[arg(long)]
    seed: Option<u64>,

    /// Draw black blobs on a white background
    #[arg(long)]
    invert: bool,

    /// Print every blob to the terminal
    #[arg(long)]
    show: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = match args.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let params = BlobParams::new(args.size, args.fluctuation_rate, args.num_points, args.kind);
    params.validate().context("invalid blob parameters")?;

    let palette = if args.invert {
        Palette::BlackOnWhite
    } else {
        Palette::WhiteOnBlack
    };
    let writer = BlobWriter::create(&args.out_dir, palette)
        .with_context(|| format!("cannot use output directory {}", args.out_dir.display()))?;

    println!("Generating {} blob(s)...", args.number_of_blobs);
    let saved = match args.seed {
        Some(seed) => {
            let masks = generate_many_par(args.number_of_blobs, &params, seed)
                .context("blob generation failed")?;
            if args.show {
                for (i, mask) in masks.iter().enumerate() {
                    show(i + 1, mask);
                }
            }
            writer.write_all(&masks)?.len()
        }
        None => writer
            .write_generated(
                args.number_of_blobs,
                &params,
                &mut rand::thread_rng(),
                |index, mask| {
                    if args.show {
                        show(index, mask);
                    }
                },
            )
            .context("blob generation failed")?,
    };

    println!(
        "Saved {} blob(s) to {}",
        saved,
        writer.dir().display()
    );
    Ok(())
}

fn show(index: usize, mask: &Mask) {
    println!("blob{}:\n{}", index, mask.render_preview());
}
