use std::io::{self, Write as _};

use anyhow::Context as _;
use tetrust_engine::SessionConfig;

pub(crate) fn run() -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &SessionConfig::default())
        .context("Failed to write config JSON to stdout")?;
    writeln!(stdout).context("Failed to write newline to stdout")?;
    Ok(())
}
