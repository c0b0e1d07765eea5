pub mod repos;
pub mod run;
pub mod schema;

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Execute one collection run and write the Parquet batch
    Run(run::RunArgs),
    /// Print the effective monitored-repository list
    Repos(repos::ReposArgs),
    /// Print the fixed output column schema
    Schema,
}

pub async fn run(cmd: Command) -> anyhow::Result<()> {
    match cmd {
        Command::Run(args) => run::run(args).await,
        Command::Repos(args) => repos::run(args).await,
        Command::Schema => schema::run(),
    }
}
