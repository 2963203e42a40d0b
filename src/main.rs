//! # Command Line Interface
//!
//! The command tree is built in `cli.rs`.
//! The subcommands are run by the `commands` module of the library.

mod cli;

use env_logger;
use log::error;
use a2dos::commands;
use a2dos::commands::CommandError;

fn main() -> Result<(),Box<dyn std::error::Error>>
{
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let matches = cli::build_cli().get_matches();

    match matches.subcommand() {
        Some(("mkdsk",cmd)) => commands::mkdsk::mkdsk(cmd),
        Some(("catalog",cmd)) => commands::stat::catalog(cmd),
        Some(("stat",cmd)) => commands::stat::stat(cmd),
        Some(("get",cmd)) => commands::get::get(cmd),
        Some(("put",cmd)) => commands::put::put(cmd),
        Some(("delete",cmd)) => commands::modify::delete(cmd),
        Some(("lock",cmd)) => commands::modify::lock(cmd),
        Some(("unlock",cmd)) => commands::modify::unlock(cmd),
        Some(("rename",cmd)) => commands::modify::rename(cmd),
        Some(("completions",cmd)) => commands::completions::generate(cli::build_cli(),cmd),
        _ => {
            error!("No subcommand was found, try `a2dos --help`");
            Err(Box::new(CommandError::InvalidCommand))
        }
    }
}
