mod cmd;

use clap::{Parser, Subcommand};
use finplan::ItemTypeCatalog;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "finplan", version, about = "Tax options and financial item templates for planning")]
struct Cli {
    /// Directory of <CODE>.json tax documents (bundled data when omitted)
    #[arg(long, global = true, env = "FINPLAN_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List supported countries
    Countries(cmd::countries::CountriesCommand),
    /// List tax options for a country and tax type
    Options(cmd::options::OptionsCommand),
    /// Show the default tax option for a country and tax type
    Default(cmd::options::DefaultCommand),
    /// Look up a tax option by id
    Find(cmd::options::FindCommand),
    /// Compute the tax due on an amount
    Compute(cmd::compute::ComputeCommand),
    /// List item type templates
    Items(cmd::items::ItemsCommand),
    /// Project an item type template month by month
    Project(cmd::items::ProjectCommand),
    /// Print the tax document format
    Schema(cmd::schema::SchemaCommand),
    /// Validate a directory of tax documents
    Validate(cmd::validate::ValidateCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();
    let data_dir = cli.data_dir.as_deref();

    match &cli.command {
        Command::Countries(command) => command.exec(&cmd::load_catalog(data_dir)?),
        Command::Options(command) => command.exec(&cmd::load_catalog(data_dir)?),
        Command::Default(command) => command.exec(&cmd::load_catalog(data_dir)?),
        Command::Find(command) => command.exec(&cmd::load_catalog(data_dir)?),
        Command::Compute(command) => command.exec(&cmd::load_catalog(data_dir)?),
        Command::Items(command) => command.exec(&ItemTypeCatalog::standard()),
        Command::Project(command) => command.exec(&ItemTypeCatalog::standard()),
        Command::Schema(command) => command.exec(),
        Command::Validate(command) => command.exec(data_dir),
    }
}
