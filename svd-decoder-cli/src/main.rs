use std::{env, io, path};

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::Verbosity;
use log::debug;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// CMSIS-SVD source file for device metadata
    #[arg(long, required = true)]
    svd: String,

    #[command(flatten)]
    verbose: Verbosity,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the parsed device as JSON
    Dump,
    /// List all peripherals in the supplied source
    Ls {
        /// Only list peripherals without register counts
        #[arg(long, action = clap::ArgAction::SetTrue)]
        no_count: bool,
        #[arg(long, value_enum, default_value = "preserve")]
        sorting: Sorting,
    },
    /// Print device and CPU properties
    Info,
    /// Print the address of a peripheral, or of one of its registers
    Addr {
        #[arg(long)]
        periph: String,
        #[arg(long)]
        reg: Option<String>,
    },
    /// Break a raw register value down into its fields
    Decode {
        #[arg(long)]
        periph: String,
        #[arg(long)]
        reg: String,
        /// Register value, decimal or 0x-prefixed hexadecimal
        #[arg(value_parser = clap_num::maybe_hex::<u32>)]
        value: u32,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Sorting {
    Preserve,
    Alpha,
}

fn string_to_path(s: &str) -> Result<path::PathBuf, io::Error> {
    Ok(env::current_dir()?.join(s))
}

fn get_source(cli: &Cli) -> anyhow::Result<path::PathBuf> {
    let path = string_to_path(&cli.svd)?;
    // Tell a missing file apart from a malformed one before parsing
    if !path.is_file() {
        return Err(anyhow!("file does not exist: {}", path.display()));
    }
    // Canonicalize paths for clear output
    Ok(path.canonicalize()?)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    let source = get_source(&cli)?;
    debug!("using SVD source {}", source.display());
    let load = || {
        svd_decoder::parse_file(&source)
            .with_context(|| format!("could not load device from {}", source.display()))
    };

    match &cli.command {
        Command::Dump => println!("{}", load()?.to_json_string_pretty()),
        Command::Ls { no_count, sorting } => ls(&load()?, *sorting, *no_count),
        Command::Info => println!("{}", device_summary(&load()?)),
        Command::Addr { periph, reg } => addr(&load()?, periph, reg.as_deref())?,
        Command::Decode { periph, reg, value } => {
            let output =
                svd_decoder::format_register_value_from_file(&source, periph, reg, *value)
                    .with_context(|| {
                        format!("could not decode {periph}.{reg} from {}", source.display())
                    })?;
            print!("{output}");
            if !output.ends_with('\n') {
                println!();
            }
        }
    }

    Ok(())
}

fn ls(model: &svd_decoder::SvdModel, sorting: Sorting, no_count: bool) {
    let mut periph_and_count = svd_decoder::list_peripherals(model);
    if periph_and_count.is_empty() {
        println!("svd-decode: no peripherals found in input");
        return;
    }
    match sorting {
        Sorting::Preserve => { /* do nothing */ }
        Sorting::Alpha => periph_and_count.sort(),
    };
    let longest = periph_and_count
        .iter()
        .map(|(s, _)| s.len())
        .max()
        .unwrap_or_default();
    for (periph, count) in periph_and_count {
        if no_count {
            println!("{periph}");
        } else {
            println!("{periph: <longest$} {count}");
        }
    }
}

fn device_summary(model: &svd_decoder::SvdModel) -> String {
    let dev = model.device();
    let mut lines = vec![
        format!("device:          {}", dev.name()),
        format!("version:         {}", dev.version()),
        format!("description:     {}", dev.description()),
        format!("addressUnitBits: {}", dev.address_unit_bits()),
        format!("width:           {}", dev.width()),
    ];
    match dev.cpu() {
        Some(cpu) => lines.extend([
            format!("cpu:             {} {}", cpu.name(), cpu.revision()),
            format!("  endian:              {}", cpu.endian()),
            format!("  mpuPresent:          {}", cpu.mpu_present()),
            format!("  fpuPresent:          {}", cpu.fpu_present()),
            format!("  nvicPrioBits:        {}", cpu.nvic_prio_bits()),
            format!("  vendorSystickConfig: {}", cpu.vendor_systick_config()),
        ]),
        None => lines.push("cpu:             (not described)".to_owned()),
    }
    lines.push(format!("peripherals:     {}", model.peripheral_count()));
    lines.join("\n")
}

fn addr(model: &svd_decoder::SvdModel, periph: &str, reg: Option<&str>) -> anyhow::Result<()> {
    let address = match reg {
        Some(reg) => svd_decoder::register_address(model, periph, reg)
            .with_context(|| format!("invalid address for {periph}.{reg}"))?
            .ok_or_else(|| anyhow!("register not found: {periph}.{reg}"))?,
        None => svd_decoder::peripheral_base_address(model, periph)
            .with_context(|| format!("invalid base address for {periph}"))?
            .ok_or_else(|| anyhow!("peripheral not found: {periph}"))?,
    };
    println!("{address:#010X}");
    Ok(())
}
