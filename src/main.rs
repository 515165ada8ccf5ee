use anyhow::{anyhow, Result};
use clap::parser::ValueSource;
use clap::{
    value_parser, ArgMatches, Args as ClapArgs, CommandFactory, FromArgMatches, Parser, Subcommand,
    ValueEnum,
};
use log::{debug, info, warn};
use resolution_normalizer::{
    efficiency_factor, normalize, scale_bitrate, tier_for_bitrate, ResolutionBound,
    ResolutionTier, VideoCodec, RESOLUTION_TIERS,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod config;
mod logging;

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Clone, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, global = true, value_parser = value_parser!(PathBuf))]
    config_file: Option<PathBuf>,

    /// Output format for results: text|json
    #[arg(
        long,
        global = true,
        value_enum,
        default_value_t = OutputFormat::Text,
        id = "output"
    )]
    output: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Clone, Debug)]
enum Command {
    /// Bound the output resolution by what the output bitrate can sustain
    Normalize(NormalizeArgs),
    /// Convert a bitrate between codecs of different efficiency
    ScaleBitrate(ScaleBitrateArgs),
    /// Print the bitrate/resolution tier table
    Tiers,
}

#[derive(ClapArgs, Clone, Debug)]
struct NormalizeArgs {
    /// Target output bitrate (e.g. 8M, 4800k, 5.5mbps)
    #[arg(long, value_parser = Args::parse_bitrate, id = "output_bitrate")]
    output_bitrate: i64,

    /// Bitrate of the source stream, if known
    #[arg(long, value_parser = Args::parse_bitrate, id = "input_bitrate")]
    input_bitrate: Option<i64>,

    /// Caller-imposed maximum output width in pixels
    #[arg(long, id = "max_width")]
    max_width: Option<u32>,

    /// Caller-imposed maximum output height in pixels
    #[arg(long, id = "max_height")]
    max_height: Option<u32>,
}

#[derive(ClapArgs, Clone, Debug)]
struct ScaleBitrateArgs {
    /// Bitrate tuned for the input codec (e.g. 8M, 4800k)
    #[arg(value_parser = Args::parse_bitrate)]
    bitrate: i64,

    /// Codec the bitrate was chosen for (h264, hevc, vp9, ...)
    #[arg(long, id = "input_codec")]
    input_codec: Option<String>,

    /// Codec the bitrate should be converted to
    #[arg(long, id = "output_codec")]
    output_codec: Option<String>,
}

impl Args {
    fn parse_bitrate(input: &str) -> Result<i64, String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err("Bitrate value cannot be empty".to_string());
        }

        let lower = trimmed.to_ascii_lowercase().replace(' ', "");
        let mut split_idx = lower.len();
        for (idx, ch) in lower.char_indices() {
            if !(ch.is_ascii_digit() || ch == '.' || ch == ',' || ch == '_') {
                split_idx = idx;
                break;
            }
        }

        let (number_str, suffix) = lower.split_at(split_idx);
        if number_str.is_empty() {
            return Err(format!(
                "Failed to parse bitrate '{}': missing number",
                input
            ));
        }

        let numeric = number_str.replace([',', '_'], "");
        let value: f64 = numeric
            .parse()
            .map_err(|_| format!("Failed to parse bitrate '{}': invalid number", input))?;

        let mut normalized_suffix = suffix.trim().to_string();
        for trailing in ["/s", "ps", "bps", "bits", "bit"] {
            if normalized_suffix.ends_with(trailing) {
                let new_len = normalized_suffix.len() - trailing.len();
                normalized_suffix.truncate(new_len);
            }
        }

        let multiplier = match normalized_suffix.trim() {
            "" | "b" => 1i64,
            "k" | "kb" | "kbit" => 1_000i64,
            "m" | "mb" | "mbit" => 1_000_000i64,
            "g" | "gb" | "gbit" => 1_000_000_000i64,
            other => {
                return Err(format!(
                    "Failed to parse bitrate '{}': unsupported suffix '{}'. Use plain numbers or k/m/g suffixes.",
                    input, other
                ));
            }
        };

        let bits_per_second = (value * multiplier as f64).round() as i64;
        if bits_per_second <= 0 {
            return Err(format!(
                "Failed to parse bitrate '{}': value must be positive",
                input
            ));
        }

        Ok(bits_per_second)
    }
}

fn cli_value_provided(matches: &ArgMatches, id: &str) -> bool {
    matches
        .value_source(id)
        .is_some_and(|src| matches!(src, ValueSource::CommandLine))
}

fn apply_config_overrides(args: &mut Args, cfg: &config::Config, matches: &ArgMatches) {
    if !cli_value_provided(matches, "output") {
        if let Some(output) = cfg.output {
            args.output = output;
        }
    }

    match &mut args.command {
        Command::Normalize(normalize_args) => {
            if normalize_args.max_width.is_none() {
                normalize_args.max_width = cfg.max_width;
            }
            if normalize_args.max_height.is_none() {
                normalize_args.max_height = cfg.max_height;
            }
        }
        Command::ScaleBitrate(scale_args) => {
            if scale_args.input_codec.is_none() {
                scale_args.input_codec = cfg.input_codec.clone();
            }
            if scale_args.output_codec.is_none() {
                scale_args.output_codec = cfg.output_codec.clone();
            }
        }
        Command::Tiers => {}
    }
}

#[derive(Debug, Serialize)]
struct NormalizeReport {
    input_bitrate: Option<i64>,
    output_bitrate: i64,
    tier: Option<ResolutionTier>,
    #[serde(flatten)]
    bound: ResolutionBound,
}

#[derive(Debug, Serialize)]
struct ScaleBitrateReport {
    bitrate: i64,
    input_codec: String,
    output_codec: String,
    scale_factor: f64,
    scaled_bitrate: i64,
}

fn run_normalize(args: &NormalizeArgs, output: OutputFormat) -> Result<()> {
    let tier = tier_for_bitrate(args.output_bitrate).copied();
    match tier {
        Some(tier) => debug!(
            "Output bitrate {} bps maps to tier '{}'",
            args.output_bitrate, tier
        ),
        None => debug!(
            "Output bitrate {} bps exceeds every tier; width left to the caller",
            args.output_bitrate
        ),
    }

    let bound = normalize(
        args.input_bitrate,
        args.output_bitrate,
        args.max_width,
        args.max_height,
    );

    if args.max_height.is_some() && bound.max_height.is_none() {
        info!(
            "Dropped requested max height {:?}: width bound changed from {:?} to {:?}",
            args.max_height, args.max_width, bound.max_width
        );
    }

    match output {
        OutputFormat::Text => println!("{}", bound),
        OutputFormat::Json => {
            let report = NormalizeReport {
                input_bitrate: args.input_bitrate,
                output_bitrate: args.output_bitrate,
                tier,
                bound,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn run_scale_bitrate(args: &ScaleBitrateArgs, output: OutputFormat) -> Result<()> {
    let input_codec = args
        .input_codec
        .as_deref()
        .ok_or_else(|| anyhow!("--input-codec is required (or set input_codec in the config file)"))?;
    let output_codec = args.output_codec.as_deref().ok_or_else(|| {
        anyhow!("--output-codec is required (or set output_codec in the config file)")
    })?;

    for name in [input_codec, output_codec] {
        if let VideoCodec::Other(unknown) = VideoCodec::parse(name) {
            warn!(
                "Unrecognised codec '{}'; treating it as baseline efficiency",
                unknown
            );
        }
    }

    let scale_factor = efficiency_factor(output_codec) / efficiency_factor(input_codec);
    let scaled_bitrate = scale_bitrate(args.bitrate, input_codec, output_codec);
    debug!(
        "Scaled {} bps from {} to {} by {:.4}: {} bps",
        args.bitrate, input_codec, output_codec, scale_factor, scaled_bitrate
    );

    match output {
        OutputFormat::Text => println!("{}", scaled_bitrate),
        OutputFormat::Json => {
            let report = ScaleBitrateReport {
                bitrate: args.bitrate,
                input_codec: input_codec.to_string(),
                output_codec: output_codec.to_string(),
                scale_factor,
                scaled_bitrate,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn run_tiers(output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Text => {
            for tier in RESOLUTION_TIERS.iter() {
                println!("{}", tier);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(RESOLUTION_TIERS)?);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    logging::init();
    logging::log_relevant_env();

    let matches = Args::command().get_matches();
    let mut args = Args::from_arg_matches(&matches)?;

    let loaded_config = config::load(args.config_file.as_deref())?;
    if let Some((cfg, source)) = &loaded_config {
        match source {
            config::ConfigSource::Env(path) => info!(
                "Loaded configuration from '{}' (via {}).",
                path.display(),
                config::CONFIG_ENV_VAR
            ),
            _ => info!("Loaded configuration from '{}'.", source.path().display()),
        }
        apply_config_overrides(&mut args, cfg, &matches);
    }

    match &args.command {
        Command::Normalize(normalize_args) => run_normalize(normalize_args, args.output),
        Command::ScaleBitrate(scale_args) => run_scale_bitrate(scale_args, args.output),
        Command::Tiers => run_tiers(args.output),
    }
}
