use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "resumegen")]
#[command(about = "Render role-specific resumes from tagged YAML data", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project directory (defaults to the current directory)
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render and write resumes for the given roles
    #[command(alias = "b")]
    Build {
        /// Roles to build (e.g. python java)
        #[arg(required_unless_present = "every", num_args = 1..)]
        roles: Vec<String>,

        /// Build every configured role
        #[arg(long, conflicts_with = "roles")]
        every: bool,
    },

    /// Print the resume for one role to stdout
    Render {
        role: String,
    },

    /// Render every role without writing, reporting problems
    Check,

    /// List configured roles
    Roles,

    /// Create resumegen.json, sample data and the default template
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },
}
