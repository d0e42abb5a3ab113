//! GitHub Actions step outputs

use anyhow::Context;
use prenv_core::Outputs;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

const OUTPUT_FILE_VAR: &str = "GITHUB_OUTPUT";

/// Append outputs to `$GITHUB_OUTPUT`, or print them to stdout when unset
pub fn publish(outputs: &Outputs) -> anyhow::Result<()> {
    match std::env::var_os(OUTPUT_FILE_VAR) {
        Some(path) if !path.is_empty() => append_to_file(Path::new(&path), outputs),
        _ => {
            let stdout = io::stdout();
            write_outputs(&mut stdout.lock(), outputs).context("failed to write outputs to stdout")
        }
    }
}

fn append_to_file(path: &Path, outputs: &Outputs) -> anyhow::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open output file {}", path.display()))?;
    write_outputs(&mut file, outputs)
        .with_context(|| format!("failed to write output file {}", path.display()))
}

/// `name=value` per line; multi-line values use the heredoc form
pub fn write_outputs<W: Write>(writer: &mut W, outputs: &Outputs) -> io::Result<()> {
    for (name, value) in outputs.iter() {
        if value.contains('\n') || value.contains('\r') {
            let delimiter = delimiter_for(value);
            writeln!(writer, "{}<<{}", name, delimiter)?;
            writeln!(writer, "{}", value)?;
            writeln!(writer, "{}", delimiter)?;
        } else {
            writeln!(writer, "{}={}", name, value)?;
        }
    }
    writer.flush()
}

/// A delimiter that does not occur inside `value`
fn delimiter_for(value: &str) -> String {
    let mut n = 0u32;
    loop {
        let delimiter = format!("PRENV_EOF_{}", n);
        if !value.contains(&delimiter) {
            return delimiter;
        }
        n += 1;
    }
}
