use clap::Parser;
use duressvault::cli::{commands, Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Init {
            second_factor,
            force,
        } => commands::init::execute(&cli, second_factor, force),
        Commands::Add { ref source, decoy } => commands::add::execute(&cli, source, decoy),
        Commands::Note {
            ref name,
            ref text,
            decoy,
        } => commands::note::execute(&cli, name, text.as_deref(), decoy),
        Commands::List { decoy } => commands::list::execute(&cli, decoy),
        Commands::Export { ref name, ref out } => {
            commands::export::execute(&cli, name, out.as_deref())
        }
        Commands::Remove {
            ref name,
            decoy,
            force,
        } => commands::remove::execute(&cli, name, decoy, force),
        Commands::DecoyInit { force } => commands::decoy_init::execute(&cli, force),
        Commands::Status => commands::status::execute(&cli),
        Commands::Lock => commands::lock::execute(),
        Commands::Completions { shell } => commands::completions::execute(shell),
    };

    if let Err(e) = result {
        duressvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}

/// Log to stderr. `RUST_LOG` wins; `--verbose` turns on debug logs.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "duressvault=debug,warn" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
