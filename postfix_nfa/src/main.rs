use std::env;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use postfix_nfa::driver::{self, Config, Driver, Summary};

const USAGE: &str = "usage: postfix-nfa [--skip-malformed] <FILE>";

#[derive(Debug)]
struct Args {
    path: PathBuf,
    config: Config,
}

impl Args {
    fn parse<I: Iterator<Item = String>>(args: I) -> Result<Self, String> {
        let mut path = None;
        let mut config = Config::new();

        for arg in args {
            match arg.as_str() {
                "--skip-malformed" => config = config.skip_malformed(true),
                flag if flag.starts_with("--") => return Err(format!("unknown flag {}", flag)),
                _ if path.is_some() => return Err(format!("unexpected argument {}", arg)),
                _ => path = Some(PathBuf::from(&arg)),
            }
        }

        let path = path.ok_or_else(|| "missing input file".to_string())?;
        Ok(Args { path, config })
    }
}

fn run(args: &Args) -> anyhow::Result<Summary> {
    let stdout = io::stdout();
    Driver::new(args.config.clone())
        .run_path(&args.path, stdout.lock())
        .with_context(|| format!("processing {}", args.path.display()))
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match Args::parse(env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}\n{}", msg, USAGE);
            return ExitCode::from(2);
        }
    };

    match run(&args) {
        Ok(summary) => {
            log::info!(
                "{} expressions compiled, {} skipped",
                summary.compiled,
                summary.skipped
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{:#}", err);
            match err.downcast_ref::<driver::Error>() {
                Some(driver::Error::InputUnavailable { .. }) => {
                    println!("{}", driver::INPUT_DIAGNOSTIC)
                }
                Some(driver::Error::Malformed { .. }) => {
                    println!("{}", driver::MALFORMED_DIAGNOSTIC)
                }
                _ => eprintln!("{:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}
