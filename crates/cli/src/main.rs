//! CMVM command-line tool
//!
//! # Usage
//!
//! ```bash
//! # Decompose a real matrix into per-slice factor tables
//! cmvm decompose --matrix matrix.json --slices 2,2 --out-dir tables
//!
//! # Multiply an input vector using those tables
//! cmvm run --config tables/engine.json --table tables/slice_0.json --table tables/slice_1.json --input 256,0,-512,128
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use cmvm_engine::{Engine, EngineConfig};
use cmvm_factor::{
    decompose_into, required_planes, sqnr_db, CoefficientMatrix, JsonFileSource, TableDocument,
};
use cmvm_fixed_point::{BitWidth, WordVector, DEFAULT_FRAC_BITS};

#[derive(Parser)]
#[command(name = "cmvm")]
#[command(version)]
#[command(about = "Multiplierless constant matrix-vector multiplication")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Multiply an input vector by the matrix encoded in factor tables
    Run {
        /// Engine config JSON (defaults plus CMVM_* env overrides when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Factor table JSON, one per slice in slice order
        #[arg(short, long = "table", required = true)]
        tables: Vec<PathBuf>,

        /// Comma-separated input words
        #[arg(short, long, value_delimiter = ',', allow_negative_numbers = true)]
        input: Vec<i64>,

        /// Also print the output as fixed-point values with this many fractional bits
        #[arg(long)]
        frac_bits: Option<u8>,
    },

    /// CSD-decompose a constant matrix into per-slice factor tables
    Decompose {
        /// Matrix JSON: an array of equally long rows of numbers
        #[arg(short, long)]
        matrix: PathBuf,

        /// Comma-separated column counts per slice
        #[arg(short, long, value_delimiter = ',', required = true)]
        slices: Vec<usize>,

        /// Columns per slice buffer (defaults to the widest slice)
        #[arg(long)]
        slice_width: Option<usize>,

        /// Fractional bits used to quantize coefficients
        #[arg(long, default_value_t = DEFAULT_FRAC_BITS)]
        frac_bits: u8,

        /// Word width in bits
        #[arg(long, default_value_t = 32)]
        bit_width: u32,

        /// Directory for slice_<i>.json tables and engine.json
        #[arg(short, long)]
        out_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            tables,
            input,
            frac_bits,
        } => run(config.as_deref(), &tables, input, frac_bits),
        Commands::Decompose {
            matrix,
            slices,
            slice_width,
            frac_bits,
            bit_width,
            out_dir,
        } => decompose(&matrix, &slices, slice_width, frac_bits, bit_width, &out_dir),
    }
}

fn run(config: Option<&Path>, tables: &[PathBuf], input: Vec<i64>, frac_bits: Option<u8>) -> Result<()> {
    let config = match config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("reading config {}", path.display()))?
            .with_env_overrides(),
        None => EngineConfig::from_env(),
    };

    let shape = config.table_shape();
    let width = config.bit_width;
    let sources: Vec<JsonFileSource> = tables
        .iter()
        .map(|p| JsonFileSource::new(p, shape, width))
        .collect();

    let engine = Engine::from_sources(config, &sources)?;
    tracing::debug!(
        input_len = engine.config().input_len(),
        parallel = engine.config().parallel,
        terms_per_slice = ?engine.pipelines().iter().map(|p| p.term_count()).collect::<Vec<_>>(),
        "Running engine"
    );
    let output = engine.run(&WordVector::from_raw(input, engine.config().bit_width))?;

    let words: Vec<String> = output.data.iter().map(i64::to_string).collect();
    println!("{}", words.join(","));
    if let Some(frac_bits) = frac_bits {
        let values: Vec<String> = output
            .to_f64_vec(frac_bits)
            .iter()
            .map(|v| format!("{:.6}", v))
            .collect();
        println!("{}", values.join(","));
    }
    Ok(())
}

fn decompose(
    matrix_path: &Path,
    slices: &[usize],
    slice_width: Option<usize>,
    frac_bits: u8,
    bit_width: u32,
    out_dir: &Path,
) -> Result<()> {
    let width = BitWidth::new(bit_width)?;
    let text = std::fs::read_to_string(matrix_path)
        .with_context(|| format!("reading matrix {}", matrix_path.display()))?;
    let rows: Vec<Vec<f64>> = serde_json::from_str(&text).context("parsing matrix JSON")?;
    let matrix = CoefficientMatrix::from_f64_rows(&rows, frac_bits, width)?;

    let widest = slices.iter().copied().max().unwrap_or(0);
    let slice_width = slice_width.unwrap_or(widest);
    if slice_width < widest {
        bail!("slice width {} is narrower than slice of {} columns", slice_width, widest);
    }
    if slices.iter().any(|&s| s != widest) {
        bail!("slices must all populate the same number of columns, got {:?}", slices);
    }

    let padded = matrix
        .slice_columns(slices)?
        .iter()
        .map(|m| m.pad_columns(slice_width))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let planes = padded
        .iter()
        .map(|m| required_planes(m, width))
        .collect::<std::result::Result<Vec<_>, _>>()?
        .into_iter()
        .max()
        .unwrap_or(0)
        .max(1);

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut total_terms = 0;
    for (i, m) in padded.iter().enumerate() {
        let table = decompose_into(m, width, planes)?;
        let path = out_dir.join(format!("slice_{}.json", i));
        std::fs::write(&path, TableDocument::from_table(&table).to_json()?)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Slice {}: {} terms -> {}", i, table.term_count(), path.display());
        total_terms += table.term_count();
    }

    let config = EngineConfig {
        slice_count: slices.len(),
        slice_width,
        populated_width: widest,
        output_width: matrix.rows,
        planes,
        bit_width: width,
        ..Default::default()
    };
    let config_path = out_dir.join("engine.json");
    std::fs::write(&config_path, serde_json::to_string_pretty(&config)?)
        .with_context(|| format!("writing {}", config_path.display()))?;

    let original: Vec<f64> = rows.iter().flatten().copied().collect();
    let snr = sqnr_db(&original, &matrix.to_f64())?;
    println!("Digit planes: {}", planes);
    println!("Shift-add terms: {}", total_terms);
    println!("Coefficient SQNR: {:.2} dB", snr);
    println!("Output fractional bits: input fractional bits + {}", frac_bits);
    println!("Config -> {}", config_path.display());
    Ok(())
}
