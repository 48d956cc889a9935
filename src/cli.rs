use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "averon-catalog")]
#[command(author, version, about = "Product-catalog service for the Averon storefront", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the catalog web server
    Serve {
        /// Port override (defaults to WEB_PORT or 3000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Serve the fixed seed product set instead of Supabase
        #[arg(long)]
        seed: bool,

        /// Shuffle the product list on load, like the storefront landing page
        #[arg(long)]
        shuffle: bool,
    },

    /// Print the resolved catalog as JSON and exit (diagnostics)
    Dump {
        /// Narrow to one category at the backend
        #[arg(short, long)]
        category: Option<String>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
