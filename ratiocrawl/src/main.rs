use colored::Colorize;
use ratiocrawl::{command_argument_builder, handle_crawl, handle_task, init_logging};
use std::path::PathBuf;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let chosen_command = command_argument_builder().get_matches();
    let quiet = chosen_command.get_flag("quiet");
    let verbosity = chosen_command.get_count("verbose");
    let log_file = chosen_command.get_one::<PathBuf>("log-file");

    if let Err(e) = init_logging(verbosity, log_file.map(PathBuf::as_path)) {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        return ExitCode::FAILURE;
    }

    let result = match chosen_command.subcommand() {
        Some(("crawl", primary_command)) => handle_crawl(primary_command, quiet).await,
        Some(("task", primary_command)) => handle_task(primary_command, quiet).await,
        _ => unreachable!("clap should ensure we don't get here"),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
