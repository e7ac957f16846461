use clap::{Arg, ArgAction, arg, command};
use ratiocrawl_scanner::config::{LOG_FILE, OUTPUT_FILE};

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("ratiocrawl")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("ratiocrawl")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress the progress spinner and summary")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Raise log verbosity (-v info, -vv debug)")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("PATH")
                .help("Append logs to a file instead of stderr")
                .num_args(0..=1)
                .default_missing_value(LOG_FILE)
                .value_parser(clap::value_parser!(std::path::PathBuf))
                .global(true),
        )
        .subcommand_required(true)
        .subcommand(
            command!("crawl")
                .about("Crawl from a start URL and write one TSV record per fetched page")
                .args(target_args())
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Where to write the TSV output")
                        .default_value(OUTPUT_FILE),
                )
                .args(tuning_args()),
        )
        .subcommand(
            command!("task")
                .about(
                    "Run a crawl as a job: crawl into memory, store the output and print a \
                retrieval link as JSON",
                )
                .args(target_args())
                .arg(
                    arg!(--"store" <DIR>)
                        .required(false)
                        .help("Directory backing the local object store")
                        .default_value("./crawl-results"),
                )
                .args(tuning_args()),
        )
}

fn target_args() -> Vec<Arg> {
    vec![
        arg!(-u --"url" <URL>)
            .required(true)
            .help("The URL to start crawling from (scheme optional)"),
        arg!(-d --"depth" <DEPTH>)
            .required(true)
            .help("Maximum depth; the start page is depth 1")
            .value_parser(clap::value_parser!(usize)),
    ]
}

fn tuning_args() -> Vec<Arg> {
    vec![
        arg!(--"scheme" <SCHEME>)
            .required(false)
            .help("Scheme prepended to a start URL without one")
            .default_value("https"),
        arg!(--"retries" <ATTEMPTS>)
            .required(false)
            .help("Attempts per page before giving up")
            .value_parser(clap::value_parser!(u32).range(1..))
            .default_value("3"),
        arg!(--"backoff-ms" <MILLIS>)
            .required(false)
            .help("Initial retry backoff, doubled after each failure")
            .value_parser(clap::value_parser!(u64))
            .default_value("1000"),
        arg!(--"jitter-ms" <MILLIS>)
            .required(false)
            .help("Upper bound of the random jitter added to each backoff")
            .value_parser(clap::value_parser!(u64))
            .default_value("1000"),
        arg!(--"connect-timeout" <SECONDS>)
            .required(false)
            .help("Connect timeout in seconds")
            .value_parser(clap::value_parser!(u64))
            .default_value("5"),
        arg!(--"timeout" <SECONDS>)
            .required(false)
            .help("Total request timeout in seconds")
            .value_parser(clap::value_parser!(u64))
            .default_value("15"),
        arg!(--"max-in-flight" <REQUESTS>)
            .required(false)
            .help("Cap on simultaneous HTTP requests across the whole crawl")
            .value_parser(clap::value_parser!(usize))
            .default_value("64"),
    ]
}
