use std::time::Duration;

use argument::Cli;
use clap::{CommandFactory, Parser};
#[cfg(feature = "log")]
use ipgeo::initialize_logging;
use ipgeo::{build_runner, runner::Config, Backend, Provider};
use tokio::runtime;

mod argument;

fn main() {
    match run_application() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:?}", e);
            std::process::exit(1);
        }
    }
}

fn run_application() -> anyhow::Result<i32> {
    if std::env::args_os().len() == 1 {
        Cli::command().print_help()?;
        return Ok(2);
    }
    let options = Cli::parse();

    #[cfg(feature = "log")]
    {
        let log_level = match options.log_level.as_str() {
            "debug" => log::LevelFilter::Debug,
            "info" => log::LevelFilter::Info,
            "warn" => log::LevelFilter::Warn,
            "error" => log::LevelFilter::Error,
            "trace" => log::LevelFilter::Trace,
            _ => log::LevelFilter::Off,
        };
        initialize_logging(log_level)?;
    }

    let backend = match options.database_file {
        Some(path) => Backend::Local(path),
        None => Backend::Remote(options.api.parse::<Provider>().map_err(anyhow::Error::msg)?),
    };
    let timeout = Duration::from_secs(options.timeout);
    let config = Config {
        delay: options.sleep,
        output_file: options.output_file,
    };

    let runtime = runtime::Builder::new_current_thread().enable_all().build()?;
    runtime.block_on(async {
        let mut runner = build_runner(backend, timeout, config)?;
        let mut stdout = std::io::stdout();

        let lookups = async {
            if let Some(path) = &options.input_file {
                runner.run_file(path, &mut stdout).await?;
                Ok::<i32, anyhow::Error>(0)
            } else if let Some(address) = &options.address {
                let summary = runner.run_single(address, &mut stdout).await?;
                Ok(if summary.failed > 0 { 1 } else { 0 })
            } else {
                anyhow::bail!("missing ip/hostname or input file")
            }
        };

        tokio::select! {
            result = lookups => result,
            _ = tokio::signal::ctrl_c() => {
                println!("Aborting.");
                Ok(1)
            }
        }
    })
}
