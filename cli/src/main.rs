mod commands;
mod sink;
mod terminal;

use commands::{CommandLine, Commands, probe, reboot};
use terminal::print;

use crate::terminal::spinner;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    spinner::init_logging(commands.verbose);
    print::banner();

    match commands.command {
        Commands::Reboot(args) => {
            print::header("starting reboot run");
            reboot::reboot(args).await
        }
        Commands::Probe(args) => {
            print::header("probing targets");
            probe::probe(args).await
        }
    }
}
