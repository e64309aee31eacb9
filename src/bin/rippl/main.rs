//! Rippl CLI - meshing kernel output to VTK grid converter.
//!
//! Usage: rippl [--log-level LEVEL] <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `rippl --help` for available commands.

use std::env;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::{Builder, Target};
use log::{info, LevelFilter};

use rippl::config::{LoggingConfig, RipplConfig};
use rippl::extract::MeshExtractor;
use rippl::grid::UnstructuredGrid;
use rippl::io::{self as mesh_io, Format};
use rippl::kernel::KernelSession;

#[derive(Parser)]
#[command(name = "rippl")]
#[command(author, version, about = "Meshing kernel output to VTK converter", long_about = None)]
struct Cli {
    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display the element types of a mesh file
    Info {
        /// Input MSH file
        input: PathBuf,

        /// Dimension to extract (default: highest dimension present)
        #[arg(short, long)]
        dim: Option<u8>,
    },

    /// Extract one dimension of a mesh file and write it as a VTK grid
    Convert(ConvertArgs),
}

#[derive(Args)]
struct ConvertArgs {
    /// Input MSH file
    input: PathBuf,

    /// Output grid file (.vtk or .vtu); default: a fresh output directory
    output: Option<PathBuf>,

    /// Dimension to extract
    #[arg(short, long)]
    dim: Option<u8>,

    /// Run configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Model name for the kernel session
    #[arg(short, long)]
    model_name: Option<String>,

    /// Output format when writing into the output directory
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Legacy VTK
    Vtk,
    /// VTK XML unstructured grid
    Vtu,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Format {
        match format {
            OutputFormat::Vtk => Format::Vtk,
            OutputFormat::Vtu => Format::Vtu,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input, dim } => {
            let mut logging = LoggingConfig {
                level: "warn".to_string(),
                log_file: false,
            };
            if let Some(level) = cli.log_level {
                logging.level = level;
            }
            init_logging(logging.level_filter()?, None);
            cmd_info(&input, dim)?;
        }

        Commands::Convert(args) => {
            cmd_convert(args, cli.log_level)?;
        }
    }

    Ok(())
}

/// Writes every log line to stderr and to `app.log`.
struct Tee {
    file: File,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

fn init_logging(level: LevelFilter, log_file: Option<File>) {
    let mut builder = Builder::new();
    builder.filter_level(level).format(|buf, record| {
        writeln!(
            buf,
            "[{}] {} - {}",
            record.level(),
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.args()
        )
    });
    // RUST_LOG still overrides the configured level.
    builder.parse_default_env();
    if let Some(file) = log_file {
        builder.target(Target::Pipe(Box::new(Tee { file })));
    }
    builder.init();
}

fn cmd_info(input: &Path, dim: Option<u8>) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = mesh_io::load(input)?;

    println!("File: {}", input.display());
    println!("Format: MSH {:?}", file.version());
    println!("Nodes: {}", file.num_nodes());
    for d in file.dimensions() {
        let summary: Vec<String> = file
            .element_types(d)
            .iter()
            .map(|&code| match file.num_elements(d, code) {
                Some(n) => format!("type {} x {}", code, n),
                None => format!("type {}", code),
            })
            .collect();
        println!("Dimension {}: {}", d, summary.join(", "));
    }

    let Some(dim) = dim.or(file.max_dimension()) else {
        println!("No elements");
        return Ok(());
    };

    let session = KernelSession::open(&mut file, "info")?;
    match MeshExtractor::extract_from_session(&session, dim) {
        Ok(mesh) => {
            println!("Extracted dimension {}:", dim);
            println!("  Cell type: {} (VTK {})", mesh.cell_type(), mesh.cell_type().vtk_code());
            println!("  Elements: {}", mesh.num_elements());
            if let Some((min, max)) = mesh.bounding_box() {
                println!(
                    "  Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
                    min.x, min.y, min.z, max.x, max.y, max.z
                );
            }
        }
        Err(e) if e.is_data_error() => {
            println!("Dimension {} cannot be extracted: {}", dim, e);
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

fn cmd_convert(
    args: ConvertArgs,
    log_level: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => RipplConfig::from_file(path)?,
        None => RipplConfig::default(),
    };
    if let Some(dim) = args.dim {
        config.extract.dimension = dim;
    }
    if let Some(name) = args.model_name {
        config.extract.model_name = name;
    }
    if let Some(format) = args.format {
        config.output.format = format.into();
    }
    if let Some(level) = log_level {
        config.logging.level = level;
    }
    config.validate()?;

    // An explicit output path bypasses the output directory and app.log.
    let (output, output_dir) = match args.output {
        Some(path) => (path, None),
        None => {
            let dir = config.set_up_output_dir()?;
            let stem = args
                .input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("mesh");
            let path = dir.join(format!("{}.{}", stem, config.output.format));
            (path, Some(dir))
        }
    };

    let log_file = match &output_dir {
        Some(dir) if config.logging.log_file => Some(File::create(dir.join("app.log"))?),
        _ => None,
    };
    init_logging(config.logging.level_filter()?, log_file);
    info!("Current working directory: {}", env::current_dir()?.display());
    if let Some(dir) = &output_dir {
        info!("Output directory: {}", dir.display());
    }

    info!("Starting mesh load from {}...", args.input.display());
    let mut file = mesh_io::load(&args.input)?;
    info!("Finished mesh load.");

    let mesh = {
        let session = KernelSession::open(&mut file, &config.extract.model_name)?;
        MeshExtractor::extract_from_session(&session, config.extract.dimension)?
    };

    let grid = UnstructuredGrid::from_mesh(&mesh);
    info!("Starting grid output to {}...", output.display());
    if output_dir.is_some() {
        mesh_io::save_as(&grid, &output, config.output.format)?;
    } else {
        mesh_io::save(&grid, &output)?;
    }
    info!("Finished grid output.");

    println!(
        "Wrote {} ({} points, {} {} cells)",
        output.display(),
        grid.num_points(),
        grid.num_cells(),
        grid.cell_type()
    );
    Ok(())
}
