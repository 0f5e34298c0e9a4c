//! Benchmark driver: overlay two region files with a doubling strip count.

use std::fs::File;
use std::io::{BufReader, Write as _};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::Parser;

use stripsweeper::{hex, overlay_plane_sweep, parallel_overlay, Halfsegment, RegionId};

/// Overlay two halfsegment region files repeatedly, doubling the strip
/// count from `min_strips` up to `max_strips`.
///
/// A strip count of one runs the serial plane sweep; everything above
/// runs the strip-parallel overlay. Per-run wall times are appended to
/// `preprocessing.csv`.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Hex region file for the first input.
    file1: PathBuf,
    /// Hex region file for the second input.
    file2: PathBuf,
    /// Strip count of the first run (clamped to at least 1).
    min_strips: usize,
    /// Strip count to stop at.
    max_strips: usize,
}

fn read_sorted(path: &Path, region: RegionId) -> anyhow::Result<Vec<Halfsegment>> {
    let file =
        File::open(path).with_context(|| format!("could not open {}", path.display()))?;
    let mut segs = hex::read_region(BufReader::new(file), region)
        .with_context(|| format!("could not parse {}", path.display()))?;
    segs.sort();
    Ok(segs)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let r1 = read_sorted(&args.file1, RegionId::First)?;
    let r2 = read_sorted(&args.file2, RegionId::Second)?;
    log::info!(
        "read {} + {} halfsegments",
        r1.len(),
        r2.len()
    );

    let mut csv = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("preprocessing.csv")
        .context("could not open preprocessing.csv")?;

    let mut strips = args.min_strips.max(1);
    while strips <= args.max_strips {
        println!("TTT num strips: {strips}");
        let started = Instant::now();
        let result = if strips == 1 {
            overlay_plane_sweep(&r1, &r2)
        } else {
            parallel_overlay(&r1, &r2, strips)
        };
        let seconds = started.elapsed().as_secs_f64();
        println!("num segs: {}", result.len() / 2);
        writeln!(csv, "overlay,{strips},{seconds}").context("could not append timing row")?;
        strips = if strips == 1 { 2 } else { strips * 2 };
    }

    Ok(())
}
