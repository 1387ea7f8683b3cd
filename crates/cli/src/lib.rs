mod bind;
mod chain;
mod check;
mod model;
mod resolve;
mod schema;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "genscope",
    version,
    about = "Resolve Java type variables through lexical declaration scopes",
    long_about = "Genscope loads a model of generic declarations (classes, methods and constructors \
                  with their lexical nesting) and resolves type-variable names the way the Java \
                  language binds them: innermost declaration first, then outward."
)]
pub struct Cli {
    /// Build a fresh scope chain per request instead of sharing scopes
    #[arg(long, global = true)]
    pub no_share: bool,

    /// Mirror log output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a type-variable name from the scope of a declaration
    #[command(
        long_about = "Looks NAME up starting at the declaration addressed by PATH \
                            (e.g. `Outer#m.Local`) and walking outward through enclosing \
                            methods, constructors and classes."
    )]
    Resolve {
        /// Model file (JSON)
        #[arg(value_name = "MODEL")]
        model: PathBuf,
        /// Declaration path, e.g. `Outer`, `Outer.Inner`, `Outer#m`, `Outer#<init>`
        #[arg(value_name = "PATH")]
        path: String,
        /// Type-variable name
        #[arg(value_name = "NAME")]
        name: String,
        /// Print the resolved type variable as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the scope chain of a declaration, innermost first
    Chain {
        #[arg(value_name = "MODEL")]
        model: PathBuf,
        #[arg(value_name = "PATH")]
        path: String,
        #[arg(long)]
        json: bool,
    },
    /// Parse a generic signature and bind it in the scope of a declaration
    Bind {
        #[arg(value_name = "MODEL")]
        model: PathBuf,
        #[arg(value_name = "PATH")]
        path: String,
        /// Signature in class-file syntax, e.g. `Ljava/util/List<TT;>;`
        #[arg(value_name = "SIGNATURE")]
        signature: String,
        #[arg(long, value_enum, default_value_t = SignatureKind::Field)]
        kind: SignatureKind,
    },
    /// Bind every signature and bound in a model and report failures
    Check {
        #[arg(value_name = "MODEL")]
        model: PathBuf,
    },
    /// Print the JSON schema of model files
    Schema,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SignatureKind {
    Field,
    Method,
    Class,
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _guard = genscope_core::logging::init_logging("cli", cli.verbose);

    let share = !cli.no_share;
    let output = match cli.command {
        Commands::Resolve {
            model,
            path,
            name,
            json,
        } => resolve::run(&model, share, &path, &name, json)?,
        Commands::Chain { model, path, json } => chain::run(&model, share, &path, json)?,
        Commands::Bind {
            model,
            path,
            signature,
            kind,
        } => bind::run(&model, share, &path, &signature, kind)?,
        Commands::Check { model } => check::run(&model, share)?,
        Commands::Schema => schema::run()?,
    };
    println!("{}", output);
    Ok(())
}
