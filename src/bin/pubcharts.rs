use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use num_format::{Locale, ToFormattedString};
use pubcharts::scheduler::{RedrawScheduler, Viewport, ViewportEvent};
use pubcharts::theme::ThemeColors;
use pubcharts::viz::{self, ChartData, ChartKind, RenderOptions};
use pubcharts::{Client, Record, api, stats, storage};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

#[derive(Parser, Debug)]
#[command(
    name = "pubcharts",
    version,
    about = "Aggregate a publication feed and render DPI-aware bar charts"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one chart to a PNG or SVG file.
    Render(RenderArgs),
    /// Render, then re-render on each width read from stdin (debounced).
    Watch(RenderArgs),
    /// Print site statistics (works, citations, collaborators, h-index).
    Stats(StatsArgs),
    /// Export the aggregated series of a chart as CSV or JSON.
    Export(ExportArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Chart {
    PapersPerYear,
    TopCited,
    Citations,
}

impl From<Chart> for ChartKind {
    fn from(c: Chart) -> Self {
        match c {
            Chart::PapersPerYear => ChartKind::PapersPerYear,
            Chart::TopCited => ChartKind::TopCited,
            Chart::Citations => ChartKind::CitationHistogram,
        }
    }
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Feed document: file path or http(s) URL.
    #[arg(short, long, default_value = "data/publications.json")]
    input: String,
    /// Number of most recent years on the papers-per-year chart.
    #[arg(long, default_value_t = 6)]
    max_years: usize,
    /// Number of bars on the top-cited chart.
    #[arg(long, default_value_t = 6)]
    top: usize,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Which chart to draw.
    #[arg(short, long, value_enum)]
    chart: Chart,
    /// Output file (.png or .svg).
    #[arg(short, long)]
    out: PathBuf,
    /// Container width in CSS pixels (default: 260, minimum 240).
    #[arg(long)]
    width: Option<f64>,
    /// Device pixel ratio (>= 1).
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,
    /// JSON theme file with `text`, `border`, `accent`, `background` colours.
    #[arg(long)]
    theme: Option<PathBuf>,
    /// TTF font for labels (default: probe common system fonts).
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct StatsArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Drop duplicate records (DOI, arXiv id, record id, title + year) first.
    #[arg(long, default_value_t = false)]
    dedupe: bool,
    /// Also list the N newest records.
    #[arg(long)]
    latest: Option<usize>,
    /// Locale for number formatting (en, de, fr, es, it, pt, nl).
    #[arg(long, default_value = "en")]
    locale: String,
    /// Also write the statistics as JSON.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    input: InputArgs,
    #[arg(short, long, value_enum)]
    chart: Chart,
    /// Output file.
    #[arg(short, long)]
    out: PathBuf,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
}

/// Map a user-provided locale tag to a num-format Locale.
fn map_locale(tag: &str) -> &'static Locale {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => &Locale::de,
        "fr" | "fr_fr" => &Locale::fr,
        "es" | "es_es" => &Locale::es,
        "it" | "it_it" => &Locale::it,
        "pt" | "pt_pt" | "pt_br" => &Locale::pt,
        "nl" | "nl_nl" => &Locale::nl,
        _ => &Locale::en,
    }
}

/// Parse a stdin resize line: `<width> [dpr]`.
fn parse_viewport(line: &str, default_dpr: f64) -> Option<Viewport> {
    let mut parts = line.split_whitespace();
    let width = parts.next()?.parse::<f64>().ok()?;
    let dpr = match parts.next() {
        Some(s) => s.parse::<f64>().ok()?,
        None => default_dpr,
    };
    Some(Viewport {
        width: Some(width),
        device_pixel_ratio: dpr,
    })
}

fn load_records(input: &InputArgs) -> Vec<Record> {
    api::load_records_or_empty(&Client::default(), &input.input)
}

fn render_options(args: &RenderArgs, viewport: Viewport) -> RenderOptions {
    RenderOptions {
        container_width: viewport.width,
        device_pixel_ratio: viewport.device_pixel_ratio,
        // Re-read every render so theme edits show up on the next redraw.
        theme: ThemeColors::load_or_default(args.theme.as_deref()),
        max_years: args.input.max_years,
        top_n: args.input.top,
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Watch(args) => cmd_watch(args),
        Command::Stats(args) => cmd_stats(args),
        Command::Export(args) => cmd_export(args),
    }
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    viz::ensure_fonts_registered(args.font.as_deref());
    let records = load_records(&args.input);
    let viewport = Viewport {
        width: args.width,
        device_pixel_ratio: args.dpr,
    };
    let geometry = viz::render_to_file(
        &args.out,
        args.chart.into(),
        &records,
        &render_options(&args, viewport),
    )?;
    let (w, h) = geometry.pixel_size();
    eprintln!("Wrote {}x{} chart to {}", w, h, args.out.display());
    Ok(())
}

fn cmd_watch(args: RenderArgs) -> Result<()> {
    viz::ensure_fonts_registered(args.font.as_deref());
    let records = load_records(&args.input);
    let kind: ChartKind = args.chart.into();
    let initial = Viewport {
        width: args.width,
        device_pixel_ratio: args.dpr,
    };

    // The reader thread only forwards resize events; all rendering stays on this thread.
    let (tx, rx) = mpsc::channel();
    let default_dpr = args.dpr;
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match parse_viewport(&line, default_dpr) {
                Some(v) => {
                    if tx.send(ViewportEvent::Resized(v)).is_err() {
                        break;
                    }
                }
                None if line.trim().is_empty() => {}
                None => log::warn!("ignoring resize line {:?}, expected `<width> [dpr]`", line),
            }
        }
    });

    let out = args.out.clone();
    let mut scheduler = RedrawScheduler::new(rx, initial, |viewport| {
        let opts = render_options(&args, viewport);
        match viz::render_to_file(&out, kind, &records, &opts) {
            Ok(g) => {
                let (w, h) = g.pixel_size();
                eprintln!("Redrew {}x{} chart to {}", w, h, out.display());
            }
            Err(e) => log::error!("redraw failed: {:#}", e),
        }
    });
    scheduler.redraw_now();
    scheduler.run();
    Ok(())
}

fn cmd_stats(args: StatsArgs) -> Result<()> {
    let mut records = load_records(&args.input);
    if args.dedupe {
        let before = records.len();
        records = stats::dedupe(&records);
        eprintln!("Dropped {} duplicate record(s)", before - records.len());
    }
    let s = stats::site_stats(&records);
    let locale = map_locale(&args.locale);
    println!("works={}", s.works_count.to_formatted_string(locale));
    println!("citations={}", s.cited_by_count.to_formatted_string(locale));
    println!("collaborators={}", s.collaborators.to_formatted_string(locale));
    println!("h-index={}", s.h_index);

    if let Some(n) = args.latest {
        for r in stats::latest(&records, Some(n)) {
            let title = r.title.as_deref().unwrap_or("Untitled");
            let year = r.year.map(|y| y.to_string()).unwrap_or_default();
            println!(
                "- {} ({})  cited by {}",
                title,
                year,
                r.citations().to_formatted_string(locale)
            );
        }
    }

    if let Some(path) = args.out.as_ref() {
        storage::save_json(&s, path)?;
        eprintln!("Saved statistics to {}", path.display());
    }
    Ok(())
}

fn export_format(format: Option<&OutFormat>, path: &Path) -> String {
    match format {
        Some(OutFormat::Csv) => "csv".to_string(),
        Some(OutFormat::Json) => "json".to_string(),
        None => path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("csv")
            .to_ascii_lowercase(),
    }
}

fn cmd_export(args: ExportArgs) -> Result<()> {
    let records = load_records(&args.input);
    let opts = RenderOptions {
        max_years: args.input.max_years,
        top_n: args.input.top,
        ..RenderOptions::default()
    };
    let data = viz::prepare(args.chart.into(), &records, &opts);
    let fmt = export_format(args.format.as_ref(), &args.out);
    match (fmt.as_str(), &data) {
        ("csv", ChartData::Bars(series)) => storage::save_series_csv(series, &args.out),
        ("csv", ChartData::Grouped(pair)) => {
            storage::save_paired_csv(pair, "citable", "published", &args.out)
        }
        ("json", ChartData::Bars(series)) => storage::save_json(series, &args.out),
        ("json", ChartData::Grouped(pair)) => storage::save_json(pair, &args.out),
        (other, _) => anyhow::bail!("unsupported format: {}", other),
    }
    .with_context(|| format!("export to {}", args.out.display()))?;
    eprintln!("Saved series to {}", args.out.display());
    Ok(())
}
