mod config;

use std::{
    fs::{File, OpenOptions},
    io::{BufRead, BufReader, Write},
    net::Ipv4Addr,
    path::Path,
};

use async_trait::async_trait;
pub use config::Config;
use tokio::time;

use crate::{
    error::Result,
    format,
    models::{Location, LookupRequest, Source},
    resolver::Resolver,
};

/// Something that can place an IPv4 address on the map.
#[async_trait]
pub trait Locator: Send + Sync {
    /// Which source the locations come from; drives the output layout.
    fn source(&self) -> Source;

    /// Whether a lookup goes over the network and is subject to the delay.
    fn is_remote(&self) -> bool {
        true
    }

    async fn locate(&self, ip: Ipv4Addr) -> Result<Location>;
}

/// Outcome counts of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub succeeded: usize,
    pub failed: usize,
}

/// Drives lookups one after another: resolve, locate, render, emit.
pub struct LookupRunner {
    resolver: Resolver,
    locator: Box<dyn Locator>,
    config: Config,
    network_lookups: usize, // Lookups already sent over the network.
}

impl LookupRunner {
    pub fn new(resolver: Resolver, locator: Box<dyn Locator>, config: Config) -> Self {
        Self {
            resolver,
            locator,
            config,
            network_lookups: 0,
        }
    }

    /// Looks up a single address, writing the result or a diagnostic to `out`.
    pub async fn run_single<W: Write>(&mut self, input: &str, out: &mut W) -> anyhow::Result<Summary> {
        let mut summary = Summary::default();
        self.process(input, out, &mut summary).await?;
        Ok(summary)
    }

    /// Looks up every address listed in the file at `path`, one per line.
    pub async fn run_file<P, W>(&mut self, path: P, out: &mut W) -> anyhow::Result<Summary>
    where
        P: AsRef<Path>,
        W: Write,
    {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| anyhow::anyhow!("Failed to open {}: {}", path.display(), e))?;
        let lines = BufReader::new(file).lines().collect::<std::io::Result<Vec<_>>>()?;

        #[cfg(feature = "log")]
        log::debug!("Read {} lines from {}", lines.len(), path.display());
        self.run_batch(lines, out).await
    }

    /// Looks up every non-blank line. A failed line is reported and skipped.
    pub async fn run_batch<I, W>(&mut self, lines: I, out: &mut W) -> anyhow::Result<Summary>
    where
        I: IntoIterator<Item = String>,
        W: Write,
    {
        let mut summary = Summary::default();
        for line in lines {
            let input = line.trim();
            if input.is_empty() {
                continue;
            }
            self.process(input, out, &mut summary).await?;
        }

        #[cfg(feature = "log")]
        log::debug!(
            "Finished: {} located, {} failed",
            summary.succeeded,
            summary.failed
        );
        Ok(summary)
    }

    /// Handles one input. Only I/O failures on `out` or the output file are errors.
    async fn process<W: Write>(
        &mut self,
        input: &str,
        out: &mut W,
        summary: &mut Summary,
    ) -> anyhow::Result<()> {
        let mut request = LookupRequest::new(input);
        let ip = match self.resolver.resolve(&request.input).await {
            Ok(ip) => ip,
            Err(e) => {
                #[cfg(feature = "log")]
                log::warn!("{}", e);
                writeln!(out, "{}", e)?;
                out.flush()?;
                summary.failed += 1;
                return Ok(());
            }
        };
        request.address = Some(ip);

        if self.locator.is_remote() {
            if self.network_lookups > 0 && !self.config.delay.is_zero() {
                time::sleep(self.config.delay).await;
            }
            self.network_lookups += 1;
        }

        match self.locator.locate(ip).await {
            Ok(location) => {
                let line =
                    format::render(self.locator.source(), &location, &request.to_string());
                self.emit(&line, out)?;
                summary.succeeded += 1;
            }
            Err(e) => {
                #[cfg(feature = "log")]
                log::warn!("{} ({}): {}", request.input, self.locator.source(), e);
                writeln!(out, "{} - {}", request, e)?;
                out.flush()?;
                summary.failed += 1;
            }
        }
        Ok(())
    }

    /// Prints `line` and appends it to the output file, opened for this line only.
    fn emit<W: Write>(&self, line: &str, out: &mut W) -> anyhow::Result<()> {
        writeln!(out, "{}", line)?;
        out.flush()?;

        if let Some(path) = &self.config.output_file {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| anyhow::anyhow!("Failed to open {}: {}", path.display(), e))?;
            writeln!(file, "{}", line)?;
        }
        Ok(())
    }
}
