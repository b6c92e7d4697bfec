use std::path::PathBuf;

use clap::Parser;

use hashlife::{
    cli::{Cli, Command},
    parsers,
    utils::{activate_logging, LogOnErrUnwrap},
    Universe, UniverseConfig,
};
use patharg::InputArg;

fn main() {
    let args = Cli::parse();

    activate_logging(args.verbose.log_level_filter());

    match args.command {
        Command::Advance {
            pattern,
            generations,
            config,
            out,
        } => {
            let mut universe = load_universe(pattern, config);
            universe.advance(generations);
            println!(
                "Advanced {} generations, population {}",
                universe.generation(),
                universe.population()
            );
            if let Some(out) = out {
                out.write(parsers::to_rle(&universe.cells()))
                    .log_on_err_unwrap();
            }
        }

        Command::Ffwd {
            pattern,
            leaps,
            config,
            out,
        } => {
            let mut universe = load_universe(pattern, config);
            let gens = universe.ffwd(leaps);
            println!(
                "Leapt {} generations in {} leaps, population {}",
                gens,
                leaps,
                universe.population()
            );
            if let Some(out) = out {
                out.write(parsers::to_rle(&universe.cells()))
                    .log_on_err_unwrap();
            }
        }

        Command::Print { pattern } => {
            let universe = load_universe(pattern, None);
            println!("{}", universe.to_text());
        }
    }
}

fn load_universe(pattern: InputArg, config: Option<PathBuf>) -> Universe {
    let text = pattern.read_to_string().log_on_err_unwrap();
    let cells = parsers::autoguess_life_str(&text);

    let config = config
        .map(UniverseConfig::deserialize)
        .transpose()
        .log_on_err_unwrap()
        .unwrap_or_default();

    Universe::with_config(&cells, config).log_on_err_unwrap()
}
