use crate::blocks::{BlockIds, blocks_to_legacy, legacy_to_blocks};
use crate::config::{Config, load_config};
use crate::convert::{convert_to_type, recommend_layout};
use crate::deck::import_deck;
use crate::ir::{SlideData, SlideKind};
use crate::layout::compute_layout;
use crate::layout_dump::write_layout_dump;
#[cfg(feature = "png")]
use crate::render::write_output_png;
use crate::render::{render_svg_with, write_output_svg};
use crate::variants::variant_field;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "slidekit", version, about = "Slide layout, conversion and rendering")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a slide or every slide of a deck to SVG/PNG
    Render {
        /// Input file (slide or deck JSON) or '-' for stdin
        #[arg(short = 'i', long = "input")]
        input: Option<PathBuf>,

        /// Output file. Defaults to stdout for a single SVG.
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
        output_format: OutputFormat,

        /// Config JSON file (theme, themeVariables, palettes, layout, render)
        #[arg(short = 'c', long = "configFile")]
        config: Option<PathBuf>,

        /// Also write the computed layout as JSON
        #[arg(long = "dumpLayout")]
        dump_layout: Option<PathBuf>,
    },
    /// Convert a slide to another type and print it as JSON
    Convert {
        #[arg(short = 'i', long = "input")]
        input: Option<PathBuf>,

        /// Target slide type, e.g. funnel or grid-item
        #[arg(short = 't', long = "to")]
        to: String,

        /// Target variant; invalid values fall back to the default
        #[arg(short = 'v', long = "variant")]
        variant: Option<String>,
    },
    /// Convert a slide to the block form, or back with --collapse
    Blocks {
        #[arg(short = 'i', long = "input")]
        input: Option<PathBuf>,

        /// Collapse a block slide into its legacy form
        #[arg(long)]
        collapse: bool,

        /// Fixed id session, for reproducible output
        #[arg(long)]
        seed: Option<i64>,
    },
    /// Suggest alternative layouts for a slide
    Recommend {
        #[arg(short = 'i', long = "input")]
        input: Option<PathBuf>,
    },
    /// Validate a deck file
    Validate {
        #[arg(short = 'i', long = "input")]
        input: Option<PathBuf>,
    },
    /// List the variants a slide type accepts
    Variants {
        /// Slide type; lists every type when omitted
        kind: Option<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SLIDEKIT_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

pub fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    match args.command {
        Command::Render {
            input,
            output,
            output_format,
            config,
            dump_layout,
        } => {
            let config = load_config(config.as_deref())?;
            let slides = read_slides(input.as_deref())?;
            render_slides(&slides, &config, output.as_deref(), output_format, dump_layout.as_deref())
        }
        Command::Convert { input, to, variant } => {
            let slide = read_slide(input.as_deref())?;
            let kind = parse_kind(&to)?;
            print_json(&convert_to_type(&slide, kind, variant.as_deref()))
        }
        Command::Blocks {
            input,
            collapse,
            seed,
        } => {
            let slide = read_slide(input.as_deref())?;
            if collapse {
                let SlideData::BlockSlide(blocks) = &slide else {
                    return Err(anyhow::anyhow!("--collapse expects a block-slide input"));
                };
                return print_json(&blocks_to_legacy(blocks));
            }
            let mut ids = seed.map_or_else(BlockIds::new, BlockIds::with_seed);
            print_json(&SlideData::BlockSlide(legacy_to_blocks(&slide, &mut ids)))
        }
        Command::Recommend { input } => {
            let slide = read_slide(input.as_deref())?;
            print_json(&recommend_layout(&slide))
        }
        Command::Validate { input } => {
            let raw = read_input(input.as_deref())?;
            let deck = import_deck(&raw)?;
            println!("ok: \"{}\" with {} slides", deck.title, deck.slides.len());
            Ok(())
        }
        Command::Variants { kind } => {
            let kinds = match kind {
                Some(name) => vec![parse_kind(&name)?],
                None => SlideKind::ALL.to_vec(),
            };
            let listing: Vec<Value> = kinds
                .into_iter()
                .map(|kind| serde_json::json!({ "type": kind, "variants": variant_field(kind) }))
                .collect();
            print_json(&listing)
        }
    }
}

fn parse_kind(name: &str) -> Result<SlideKind> {
    SlideKind::parse(name).ok_or_else(|| anyhow::anyhow!("Unknown slide type: {name}"))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn render_slides(
    slides: &[SlideData],
    config: &Config,
    output: Option<&Path>,
    format: OutputFormat,
    dump_layout: Option<&Path>,
) -> Result<()> {
    let outputs = if slides.len() == 1 {
        vec![output.map(Path::to_path_buf)]
    } else {
        resolve_multi_outputs(output, format, slides.len())?
            .into_iter()
            .map(Some)
            .collect()
    };
    for (idx, (slide, target)) in slides.iter().zip(outputs).enumerate() {
        let layout = compute_layout(slide, &config.theme, &config.layout);
        if let Some(path) = dump_layout {
            let path = if slides.len() == 1 {
                path.to_path_buf()
            } else {
                numbered(path, idx, "json")
            };
            write_layout_dump(&path, &layout)?;
        }
        let svg = render_svg_with(&layout, &config.theme, &config.layout, &config.render);
        match format {
            OutputFormat::Svg => write_output_svg(&svg, target.as_deref())?,
            OutputFormat::Png => write_png(&svg, target.as_deref(), config)?,
        }
        tracing::debug!(slide = idx + 1, kind = %slide.kind(), "rendered");
    }
    Ok(())
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: Option<&Path>, config: &Config) -> Result<()> {
    let output = output.ok_or_else(|| anyhow::anyhow!("Output path required for png output"))?;
    write_output_png(svg, output, &config.render)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: Option<&Path>, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
        }
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn parse_value(raw: &str) -> Result<Value> {
    match serde_json::from_str(raw) {
        Ok(value) => Ok(value),
        Err(strict) => json5::from_str(raw).map_err(|_| anyhow::anyhow!("Invalid JSON input: {strict}")),
    }
}

fn read_slide(path: Option<&Path>) -> Result<SlideData> {
    let value = parse_value(&read_input(path)?)?;
    serde_json::from_value(value).context("Input is not a valid slide")
}

/// A deck (anything with a `slides` array) yields all its slides; any other
/// object is read as a single slide.
fn read_slides(path: Option<&Path>) -> Result<Vec<SlideData>> {
    let raw = read_input(path)?;
    let value = parse_value(&raw)?;
    if value.get("slides").is_some_and(Value::is_array) {
        return Ok(import_deck(&raw)?.slides);
    }
    Ok(vec![serde_json::from_value(value).context("Input is not a valid slide")?])
}

fn numbered(base: &Path, idx: usize, ext: &str) -> PathBuf {
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("slide");
    let parent = base.parent().unwrap_or_else(|| Path::new("."));
    parent.join(format!("{}-{}.{}", stem, idx + 1, ext))
}

fn resolve_multi_outputs(output: Option<&Path>, format: OutputFormat, count: usize) -> Result<Vec<PathBuf>> {
    let ext = match format {
        OutputFormat::Svg => "svg",
        OutputFormat::Png => "png",
    };
    let base = output.ok_or_else(|| anyhow::anyhow!("Output path required for deck input"))?;
    if base.is_dir() {
        return Ok((0..count)
            .map(|idx| base.join(format!("slide-{}.{}", idx + 1, ext)))
            .collect());
    }
    Ok((0..count).map(|idx| numbered(base, idx, ext)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deck_outputs_are_numbered() {
        let outputs = resolve_multi_outputs(Some(Path::new("out/deck.svg")), OutputFormat::Svg, 2).unwrap();
        assert_eq!(outputs, vec![PathBuf::from("out/deck-1.svg"), PathBuf::from("out/deck-2.svg")]);
        assert!(resolve_multi_outputs(None, OutputFormat::Png, 2).is_err());
    }

    #[test]
    fn args_parse_subcommands() {
        let args = Args::try_parse_from(["slidekit", "convert", "-i", "a.json", "--to", "funnel", "-v", "pyramid"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Convert { ref to, ref variant, .. } if to == "funnel" && variant.as_deref() == Some("pyramid")
        ));
        assert!(parse_kind("hub-spoke").is_ok());
        assert!(parse_kind("poster").is_err());
    }

    #[test]
    fn json5_input_is_accepted() {
        let value = parse_value("{type: 'title', title: 'Hi',}").unwrap();
        assert_eq!(value["title"], "Hi");
    }
}
