//! Batch CLI for season_colors
//!
//! Scores every product image listed in a CSV file against the seasonal
//! palettes and writes one result row per product.
//!
//! Input CSV columns (header row required):
//!     product_name, product_url, image_path
//!
//! Output CSV columns:
//!     product_name, product_url, image_path, dominant_hexes, best_for,
//!     also_works_for, score_CIE76

use std::fs;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn, Level};

use season_colors::{classify_image, PaletteTable, SeasonConfig};

const REQUIRED_COLUMNS: [&str; 3] = ["product_name", "product_url", "image_path"];
const OUTPUT_COLUMNS: [&str; 7] = [
    "product_name",
    "product_url",
    "image_path",
    "dominant_hexes",
    "best_for",
    "also_works_for",
    "score_CIE76",
];
const DEFAULT_PALETTES: &str = "data/palettes.json";

/// Batch score product images for color seasons.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// CSV with product_name, product_url, image_path
    #[arg(short, long)]
    input: PathBuf,

    /// Output CSV path
    #[arg(short, long)]
    output: PathBuf,

    /// Palettes JSON path (built-in palettes are used if it does not exist)
    #[arg(short, long)]
    palettes: Option<PathBuf>,

    /// Number of dominant colors to extract
    #[arg(short = 'k', long)]
    colors: Option<usize>,

    /// How many top seasons to report (best + also_works_for)
    #[arg(short = 'n', long)]
    topn: Option<usize>,

    /// Optional JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// One output row; empty strings when the product could not be scored
#[derive(Debug, Default)]
struct ResultRow {
    product_name: String,
    product_url: String,
    image_path: String,
    dominant_hexes: String,
    best_for: String,
    also_works_for: String,
    score: String,
}

impl ResultRow {
    fn fields(&self) -> [&str; 7] {
        [
            &self.product_name,
            &self.product_url,
            &self.image_path,
            &self.dominant_hexes,
            &self.best_for,
            &self.also_works_for,
            &self.score,
        ]
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if !args.input.exists() {
        bail!("Input CSV does not exist: {}", args.input.display());
    }

    let mut config = match &args.config {
        Some(path) => SeasonConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SeasonConfig::default(),
    };
    if let Some(colors) = args.colors {
        config.extraction.num_colors = colors;
    }
    if let Some(topn) = args.topn {
        config.top_n = topn;
    }
    config.validate().context("invalid configuration")?;

    let palettes_path = args
        .palettes
        .clone()
        .or_else(|| config.palettes_path.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PALETTES));
    let table = PaletteTable::load_or_builtin(Some(&palettes_path))
        .with_context(|| format!("loading palettes {}", palettes_path.display()))?;

    let input = fs::File::open(&args.input)
        .with_context(|| format!("opening {}", args.input.display()))?;
    let rows = read_products(input).with_context(|| format!("reading {}", args.input.display()))?;
    info!(products = rows.len(), input = %args.input.display(), "scoring products");

    let mut scored = 0;
    let results: Vec<ResultRow> = rows
        .into_iter()
        .map(|product| {
            let row = score_product(product, &config, &table);
            if !row.best_for.is_empty() {
                scored += 1;
            }
            row
        })
        .collect();

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let output = fs::File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    write_results(BufWriter::new(output), &results)?;
    info!(
        scored,
        skipped = results.len() - scored,
        output = %args.output.display(),
        "batch complete"
    );

    Ok(())
}

/// Read the product CSV, checking the required columns
///
/// Quoted fields may hold commas, doubled quotes and line breaks.
fn read_products<R: Read>(input: R) -> Result<Vec<ResultRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input);

    let header: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();
    if header.iter().all(|h| h.is_empty()) {
        bail!("Input CSV is empty");
    }

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !header.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        bail!("Missing required CSV columns: {}", missing.join(", "));
    }
    let index = |column: &str| header.iter().position(|h| h == column);
    let (name_idx, url_idx, path_idx) = (
        index("product_name"),
        index("product_url"),
        index("image_path"),
    );

    let mut products = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let field = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .unwrap_or_default()
                .to_string()
        };
        products.push(ResultRow {
            product_name: field(name_idx),
            product_url: field(url_idx),
            image_path: field(path_idx),
            ..ResultRow::default()
        });
    }
    Ok(products)
}

/// Fill in the result columns; failures leave them blank
fn score_product(mut row: ResultRow, config: &SeasonConfig, table: &PaletteTable) -> ResultRow {
    let path = Path::new(&row.image_path);
    if row.image_path.is_empty() || !path.exists() {
        warn!(product = %row.product_name, path = %row.image_path, "image not found, skipping");
        return row;
    }

    match classify_image(path, None, config, table) {
        Ok(classification) => {
            let top = classification.ranking.top(config.top_n);
            let best = classification.ranking.best();
            row.dominant_hexes = classification.dominant_hexes().join(",");
            row.best_for = best.season.to_string();
            row.also_works_for = top
                .iter()
                .skip(1)
                .map(|s| s.season.name())
                .collect::<Vec<_>>()
                .join(" | ");
            row.score = format!("{:.2}", best.distance);
        }
        Err(error) => {
            warn!(product = %row.product_name, path = %row.image_path, %error, "scoring failed");
        }
    }
    row
}

fn write_results<W: Write>(output: W, rows: &[ResultRow]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(OUTPUT_COLUMNS)?;
    for row in rows {
        writer.write_record(row.fields())?;
    }
    writer.flush()?;
    Ok(())
}
