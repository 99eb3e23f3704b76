//! # labelgrid CLI
//!
//! Command-line interface for the label designer.
//!
//! ## Usage
//!
//! ```bash
//! # Start the web app
//! labelgrid serve --listen 0.0.0.0:8080 --data-dir uploads
//!
//! # List the columns of a data file
//! labelgrid columns products.csv
//!
//! # Render labels offline from a data file and an exported template
//! labelgrid render products.xlsx label_template.json --rows 0,2 --output labels.html
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use labelgrid::{
    LabelError,
    dataset::{Dataset, ingest},
    render::{self, QrRoute},
    server::{self, ServerConfig},
    template::Template,
};

/// labelgrid - Label designer and print preview
#[derive(Parser, Debug)]
#[command(name = "labelgrid")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the web interface
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:8080")]
        listen: String,

        /// Directory for uploaded datasets and print selections
        #[arg(long, default_value = "uploads")]
        data_dir: PathBuf,

        /// Directory served under /static (logos, images)
        #[arg(long, default_value = "static")]
        static_dir: PathBuf,

        /// Login user name
        #[arg(long, default_value = "admin")]
        username: String,

        /// Login password
        #[arg(long, default_value = "admin")]
        password: String,
    },

    /// Render labels from a data file and a template document
    Render {
        /// CSV or XLSX data file
        data: PathBuf,

        /// Template document (as exported by the designer)
        template: PathBuf,

        /// Comma-separated row indices to print (default: all rows)
        #[arg(long, value_delimiter = ',')]
        rows: Vec<usize>,

        /// Write the HTML page here instead of stdout
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Prefix for QR image URLs
        #[arg(long, default_value = "/qrcode/")]
        qr_prefix: String,
    },

    /// Print the column names of a data file
    Columns {
        /// CSV or XLSX data file
        data: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), LabelError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            listen,
            data_dir,
            static_dir,
            username,
            password,
        } => {
            let config = ServerConfig {
                listen_addr: listen,
                data_dir,
                static_dir,
                username,
                password,
            };
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(config))
        }

        Commands::Render {
            data,
            template,
            rows,
            output,
            qr_prefix,
        } => {
            let dataset = load_dataset(&data)?;
            let template = Template::import_json(&std::fs::read_to_string(&template)?)?;

            let selection = if rows.is_empty() {
                dataset
            } else {
                dataset.select(&rows)?
            };

            let labels =
                render::render_batch(&template, selection.rows(), &QrRoute::new(qr_prefix))?;
            let page = server::print_document(&labels);

            match output {
                Some(path) => {
                    std::fs::write(&path, page)?;
                    println!("Wrote {} labels to {}", labels.len(), path.display());
                }
                None => println!("{}", page),
            }
            Ok(())
        }

        Commands::Columns { data } => {
            let dataset = load_dataset(&data)?;
            for (i, name) in dataset.columns().iter().enumerate() {
                println!("{:>3}  {}", i, name);
            }
            println!("\n{} rows", dataset.len());
            Ok(())
        }
    }
}

fn load_dataset(path: &Path) -> Result<Dataset, LabelError> {
    let bytes = std::fs::read(path)?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    ingest::read_dataset(&filename, &bytes)
}
