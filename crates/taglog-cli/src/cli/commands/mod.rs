//! Subcommand implementations.

pub mod demo;
pub mod keygen;
pub mod sign;

use super::args::{Cli, Command};

pub fn dispatch(cli: Cli) -> i32 {
    match cli.cmd {
        Command::Keygen(args) => keygen::cmd_keygen(args),
        Command::Sign(args) => sign::cmd_sign(args),
        Command::Demo(args) => demo::cmd_demo(args),
    }
}
