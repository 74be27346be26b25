use crate::config::load_config;
use crate::layout_dump::{layout_dump_json, write_layout_dump};
use crate::parser::parse_input;
use crate::render::{render_empty_svg, render_svg, write_output_svg};
use crate::theme::Theme;
use crate::{ChordLayout, RenderOptions, layout_with_options};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "chordr", version, about = "Chord diagram renderer in Rust")]
pub struct Args {
    /// Input file (table .json or From,To,Value rows) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png/json). Defaults to stdout for SVG and JSON if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Theme name (powerbi, modern, high-contrast)
    #[arg(short = 't', long = "theme")]
    pub theme: Option<String>,

    /// Width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f64>,

    /// Height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f64>,

    /// Select the arc with this label (repeatable)
    #[arg(long = "select", num_args = 1..)]
    pub select: Vec<String>,

    /// Keep every --select label selected, as with ctrl-click
    #[arg(long = "multi")]
    pub multi: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(name) = args.theme.as_deref() {
        let theme = Theme::by_name(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown theme '{}'", name))?;
        config.render.background = theme.background.clone();
        config.theme = theme;
    }
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }

    let input = read_input(args.input.as_deref())?;
    let table = parse_input(&input)?;
    let options = RenderOptions {
        config,
        selected: args.select.clone(),
        multi_select: args.multi,
    };
    let layout = layout_with_options(&table, &options);
    check_selection(layout.as_ref(), &options.selected)?;
    let config = &options.config;

    match args.output_format {
        OutputFormat::Json => {
            let Some(layout) = layout else {
                return Err(anyhow::anyhow!("Input has no categories to lay out"));
            };
            match args.output.as_deref() {
                Some(path) => write_layout_dump(path, &layout)?,
                None => println!("{}", layout_dump_json(&layout)?),
            }
        }
        OutputFormat::Svg | OutputFormat::Png => {
            let svg = match &layout {
                Some(layout) => render_svg(layout, &config.theme, &config.layout),
                None => render_empty_svg(&config.render),
            };
            if matches!(args.output_format, OutputFormat::Svg) {
                write_output_svg(&svg, args.output.as_deref())?;
            } else {
                let output = ensure_output(&args.output, "png")?;
                write_png(&svg, &output, &options)?;
            }
        }
    }

    Ok(())
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, options: &RenderOptions) -> Result<()> {
    crate::render::write_output_png(svg, output, &options.config.render, &options.config.theme)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _options: &RenderOptions) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the 'png' feature"))
}

/// Every `--select` label must name an arc.
fn check_selection(layout: Option<&ChordLayout>, labels: &[String]) -> Result<()> {
    let unknown: Vec<&str> = labels
        .iter()
        .filter(|label| {
            !layout.is_some_and(|layout| layout.arcs.iter().any(|arc| &arc.data.label == *label))
        })
        .map(String::as_str)
        .collect();
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(anyhow::anyhow!("No arc labelled {}", unknown.join(", ")))
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path.filter(|path| *path != Path::new("-")) {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_selection_flags() {
        let args = Args::try_parse_from([
            "chordr", "-i", "flows.csv", "-e", "json", "--select", "A", "B", "--multi", "-w",
            "640",
        ])
        .unwrap();
        assert!(matches!(args.output_format, OutputFormat::Json));
        assert_eq!(args.select, vec!["A".to_string(), "B".to_string()]);
        assert!(args.multi);
        assert_eq!(args.width, Some(640.0));
        assert_eq!(args.height, None);
    }

    #[test]
    fn unknown_selection_labels_are_rejected() {
        let table = parse_input("A,B,2\nB,A,1\n").unwrap();
        let layout = layout_with_options(&table, &RenderOptions::default());
        assert!(check_selection(layout.as_ref(), &["A".to_string()]).is_ok());
        let err = check_selection(layout.as_ref(), &["A".to_string(), "Z".to_string()])
            .unwrap_err()
            .to_string();
        assert_eq!(err, "No arc labelled Z");
        assert!(check_selection(None, &["A".to_string()]).is_err());
        assert!(check_selection(None, &[]).is_ok());
    }

    #[test]
    fn png_needs_an_output_path() {
        assert!(ensure_output(&None, "png").is_err());
        assert_eq!(
            ensure_output(&Some(PathBuf::from("out.png")), "png").unwrap(),
            PathBuf::from("out.png")
        );
    }
}
