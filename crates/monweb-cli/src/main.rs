//! `conftool`: migrate legacy monitoring object definitions

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use monweb_cli::{load_objects, render_mappings, summarize};
use monweb_conftool::{migrate_batch, BatchPolicy, MigrateOptions};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("conftool")
        .version(monweb_conftool::VERSION)
        .about("Migrate legacy monitoring object definitions")
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log at debug level"),
        )
        .subcommand(
            Command::new("migrate")
                .about("Convert a JSON or YAML list of legacy objects")
                .arg(
                    Arg::new("input")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Legacy object list (.json, otherwise YAML)"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_parser(value_parser!(PathBuf))
                        .help("Write definitions to a file instead of stdout"),
                )
                .arg(
                    Arg::new("fail-fast")
                        .long("fail-fast")
                        .action(ArgAction::SetTrue)
                        .help("Stop at the first object that cannot be converted"),
                ),
        )
        .subcommand(Command::new("mappings").about("Print the attribute tables of every object kind"))
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn migrate(args: &ArgMatches) -> Result<ExitCode> {
    let input = args
        .get_one::<PathBuf>("input")
        .context("missing input path")?;
    let policy = if args.get_flag("fail-fast") {
        BatchPolicy::FailFast
    } else {
        BatchPolicy::SkipAndLog
    };

    let objects = load_objects(input)?;
    info!(count = objects.len(), input = %input.display(), "loaded legacy objects");

    let report = migrate_batch(&objects, &MigrateOptions::new().with_policy(policy));
    let rendered = report.render();
    match args.get_one::<PathBuf>("output") {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{rendered}"),
    }

    eprint!("{}", summarize(&report));
    Ok(if report.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn main() -> Result<ExitCode> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("verbose"));

    match matches.subcommand() {
        Some(("migrate", args)) => migrate(args),
        Some(("mappings", _)) => {
            print!("{}", render_mappings());
            Ok(ExitCode::SUCCESS)
        }
        _ => Ok(ExitCode::SUCCESS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn migrate_flags() {
        let matches = cli()
            .try_get_matches_from(["conftool", "migrate", "objects.yml", "--fail-fast", "-o", "out.conf"])
            .unwrap();
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "migrate");
        assert!(args.get_flag("fail-fast"));
        assert_eq!(args.get_one::<PathBuf>("output"), Some(&PathBuf::from("out.conf")));
    }
}
