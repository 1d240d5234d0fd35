//! Transcript delivery.
//!
//! Every front-end style reduces to one capability: deliver the finished
//! text somewhere. Stdout keeps no trailing newline by default so the text
//! can be piped straight into other tools; `--newline` adds one.

use crate::config::DeliveryConfig;
use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

pub trait OutputAdapter {
    fn deliver(&mut self, text: &str) -> Result<()>;
}

pub struct StdoutOutput {
    newline: bool,
}

impl OutputAdapter for StdoutOutput {
    fn deliver(&mut self, text: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        if self.newline {
            writeln!(stdout, "{text}").context("failed to write to stdout")?;
        } else {
            write!(stdout, "{text}").context("failed to write to stdout")?;
        }
        stdout.flush().context("failed to flush stdout")
    }
}

pub struct FileOutput {
    path: PathBuf,
    newline: bool,
}

impl OutputAdapter for FileOutput {
    fn deliver(&mut self, text: &str) -> Result<()> {
        let mut rendered = text.to_string();
        if self.newline {
            rendered.push('\n');
        }
        fs::write(&self.path, rendered)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}

pub fn from_config(delivery: &DeliveryConfig) -> Box<dyn OutputAdapter> {
    match &delivery.output {
        Some(path) => Box::new(FileOutput {
            path: path.clone(),
            newline: delivery.newline,
        }),
        None => Box::new(StdoutOutput {
            newline: delivery.newline,
        }),
    }
}
