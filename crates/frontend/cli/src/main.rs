use anyhow::{anyhow, Context, Result};
use clap::Parser;
use emu_core::logging::{LogConfig, LogLevel};
use emu_core::types::StopReason;
use emu_core::System;
use emu_et3400::{
    DisplayEvent, DisplaySnapshot, Et3400System, Key, KeyEvent, MachineConfig, ProgramImage,
};
use log::{info, warn};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(about = "Headless Heathkit ET-3400 trainer")]
struct Args {
    /// Monitor ROM image (1 KiB, mapped at $FC00)
    #[arg(long)]
    monitor: Option<PathBuf>,

    /// Program image to load after power-on (JSON: {"pairs": [...]} or {"block": {...}})
    #[arg(long)]
    program: Option<PathBuf>,

    /// Start the loaded program at this hex address instead of the reset vector
    #[arg(long, value_parser = parse_hex_u16)]
    start: Option<u16>,

    /// Machine configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of ticks to run
    #[arg(long, default_value_t = 60)]
    ticks: u32,

    /// Comma-separated keys to press, one per tick with a release tick between ("1,2,A")
    #[arg(long, value_delimiter = ',')]
    keys: Vec<String>,

    /// Core log level: off, error, warn, info, debug, trace
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Write core log output to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Dump save-state to this file as JSON
    #[arg(long, default_value = "state.json")]
    save: PathBuf,

    /// Suppress display output (still writes --save)
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

fn parse_hex_u16(s: &str) -> Result<u16, String> {
    let digits = s.trim_start_matches('$').trim_start_matches("0x");
    u16::from_str_radix(digits, 16).map_err(|e| format!("invalid address {:?}: {}", s, e))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let log_config = LogConfig::global();
    let level = LogLevel::from_str(&args.log_level)
        .ok_or_else(|| anyhow!("unknown log level: {}", args.log_level))?;
    log_config.set_global_level(level);
    if let Some(path) = args.log_file.as_ref() {
        log_config
            .set_log_file(path.clone())
            .with_context(|| format!("opening log file {}", path.display()))?;
    }

    let config = match args.config.as_deref() {
        Some(path) => MachineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => MachineConfig::default(),
    };

    let keys = args
        .keys
        .iter()
        .map(|code| code.parse::<Key>())
        .collect::<Result<Vec<_>, _>>()?;

    let mut sys = Et3400System::new(&[], config);
    match args.monitor.as_deref() {
        Some(path) => {
            let data = fs::read(path)
                .with_context(|| format!("reading monitor ROM {}", path.display()))?;
            sys.mount("Monitor", &data)?;
        }
        None => warn!("No monitor ROM given; the reset vector will read $0000"),
    }

    let display = sys.subscribe_display();
    sys.power_button();

    if let Some(path) = args.program.as_deref() {
        let image = load_image(path)?;
        let report = sys.load_program(&image)?;
        info!(
            "Loaded {} bytes from {} ({} rejected by ROM)",
            report.written,
            path.display(),
            report.rejected
        );
    }
    if let Some(start) = args.start {
        sys.set_pc(start);
    }

    let mut shown = DisplaySnapshot::default();
    for tick in 0..args.ticks {
        // Even ticks press the next key, odd ticks release it
        if let Some(&key) = keys.get((tick / 2) as usize) {
            let event = if tick % 2 == 0 {
                KeyEvent::Press(key)
            } else {
                KeyEvent::Release(key)
            };
            sys.queue_key_event(event);
        }

        let summary = sys.run_tick()?;

        let mut changed = false;
        for event in display.try_iter() {
            match event {
                DisplayEvent::Snapshot(snapshot) => shown = snapshot,
                DisplayEvent::Digit { index, segments } => {
                    if let Some(digit) = shown.digits.get_mut(index) {
                        *digit = segments;
                    }
                }
            }
            changed = true;
        }
        if changed && !args.quiet {
            println!("{:>5} [{}]", tick, shown.render());
        }

        match summary.stop {
            StopReason::Halted => {
                if let Some(fault) = sys.last_fault() {
                    warn!("CPU halted: {}", fault);
                }
                break;
            }
            StopReason::Breakpoint(pc) => {
                let (text, _) = sys.disassemble(pc);
                info!("Breakpoint at {:04X}: {}", pc, text);
                break;
            }
            _ => {}
        }
    }

    if !args.quiet {
        let regs = sys.registers();
        println!(
            "A={:02X} B={:02X} X={:04X} SP={:04X} PC={:04X} CCR={:02X} cycles={}",
            regs.a,
            regs.b,
            regs.x,
            regs.sp,
            regs.pc,
            regs.ccr,
            sys.cycles()
        );
    }

    let state = sys.save_state();
    let mut f = File::create(&args.save)
        .with_context(|| format!("creating {}", args.save.display()))?;
    write!(f, "{}", serde_json::to_string_pretty(&state)?)?;
    log_config.clear_log_file();

    Ok(())
}

fn load_image(path: &Path) -> Result<ProgramImage> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading program {}", path.display()))?;
    ProgramImage::from_json(&text).with_context(|| format!("parsing program {}", path.display()))
}
