use asciify::cli::{self, Args, Command};
use clap::Parser;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = match &args.command {
        Some(Command::Config { action }) => {
            cli::handle_config_action(action.clone(), args.config.as_deref())
        }
        None => cli::run_convert(&args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
