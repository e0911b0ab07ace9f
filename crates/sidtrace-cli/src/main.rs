//! SID music routine tracer
//!
//! Loads a PSID/RSID file, runs its init routine once and its play routine
//! once per PAL frame, and prints the SID register activity as a note table
//! (or raw registers, JSON lines, or a binary dump).

mod args;

use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use sidtrace::decoder::DumpDecoder;
use sidtrace::{ActiveDecoder, DecoderKind, EntryPoints, FrameDecoder, FrameDriver, RunSummary};
use sidtrace_psid::{load_psid_file, C64Machine, PsidFile};

use args::CliArgs;

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = CliArgs::parse();
    let sid_file = match input_file(&args) {
        Ok(path) => path,
        Err(code) => return Ok(code),
    };

    run(&args, sid_file)?;
    Ok(ExitCode::SUCCESS)
}

/// The file to trace, or the exit code when help was requested or no file given.
fn input_file(args: &CliArgs) -> std::result::Result<&Path, ExitCode> {
    if args.help {
        eprintln!("{}", CliArgs::command().render_help());
        return Err(ExitCode::FAILURE);
    }
    args.sid_file.as_deref().ok_or_else(|| {
        eprintln!("Usage: sidtrace [options] <sidfile>");
        ExitCode::FAILURE
    })
}

fn run(args: &CliArgs, sid_file: &Path) -> Result<RunSummary> {
    let settings = args.settings();
    let kind = args.decoder_kind();
    let table = args
        .frequency_table()
        .context("invalid frequency calibration")?;

    let psid = load_psid_file(sid_file)
        .with_context(|| format!("failed to load {}", sid_file.display()))?;
    print_vitals(&psid);

    let machine = C64Machine::from_psid(&psid).context("failed to place tune in memory")?;
    let mut driver = FrameDriver::new(
        machine,
        EntryPoints {
            init: psid.header.init_address,
            play: psid.header.play_address,
        },
    );

    println!(
        "Load address: ${:04X} Init address: ${:04X} Play address: ${:04X}",
        psid.load_address, psid.header.init_address, psid.header.play_address
    );
    println!("Calling initroutine with subtune {}", args.subtune);
    driver.run_init(args.subtune);

    println!(
        "Calling playroutine for {} frames, starting from frame {}",
        settings.frames, settings.first_frame
    );
    io::stdout().flush()?;

    let mut decoder: Box<dyn FrameDecoder> = if kind == DecoderKind::Dump {
        let dump = DumpDecoder::create(&args.dump_file)
            .with_context(|| format!("failed to create {}", args.dump_file.display()))?;
        Box::new(dump)
    } else {
        let out = BufWriter::new(io::stdout().lock());
        Box::new(ActiveDecoder::new(kind, settings.clone(), table, out))
    };
    let summary = driver
        .run(decoder.as_mut(), settings.total_frames(), settings.first_frame)
        .context("trace aborted")?;

    if summary.incomplete_frames > 0 {
        log::warn!(
            "{} of {} play calls were cut off by the instruction limit",
            summary.incomplete_frames,
            summary.frames_simulated
        );
    }
    if kind.is_binary() {
        log::info!(
            "wrote {} frames to {}",
            summary.frames_decoded,
            args.dump_file.display()
        );
    }
    Ok(summary)
}

fn print_vitals(psid: &PsidFile) {
    let header = &psid.header;
    println!(
        "{} v{}: {} songs, default song {}",
        header.kind.magic(),
        header.version,
        header.songs,
        header.start_song
    );
    println!("Name:     {}", header.name);
    println!("Author:   {}", header.author);
    println!("Released: {}", header.released);
}
