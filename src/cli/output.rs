/// Output formatting: text lines, table and JSON.
use std::io::{self, Write};

use comfy_table::{Table, presets::UTF8_BORDERS_ONLY};
use serde::Serialize;

use super::args::OutputFormat;
use crate::commands::CommandOutput;
use crate::types::{ErrorOutput, InstanceOutput, LaunchedOutput, TransitionOutput};

/// Separator written after each instance record in text listings.
const RECORD_SEPARATOR: &str = "-------------------------------";

/// Resolve the effective output format, handling the `--json` flag.
#[must_use]
pub fn resolve_format(fmt: OutputFormat, json_flag: bool) -> OutputFormat {
    if json_flag { OutputFormat::Json } else { fmt }
}

/// Output context passed to all formatters.
pub struct OutputCtx {
    pub format: OutputFormat,
    pub no_header: bool,
}

impl OutputCtx {
    /// Construct from CLI args.
    #[must_use]
    pub fn new(fmt: OutputFormat, json_flag: bool, no_header: bool) -> Self {
        Self {
            format: resolve_format(fmt, json_flag),
            no_header,
        }
    }
}

/// Write a command's output to stdout.
///
/// # Errors
///
/// Returns the I/O error when stdout cannot be written (closed pipe, full disk).
pub fn write_output(output: &CommandOutput, ctx: &OutputCtx) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render(output, ctx, &mut out)?;
    out.flush()
}

/// Render into any writer. Split out from `write_output` so it can be tested.
///
/// # Errors
///
/// Returns any I/O error from the writer.
pub fn render<W: Write>(output: &CommandOutput, ctx: &OutputCtx, out: &mut W) -> io::Result<()> {
    if ctx.format == OutputFormat::Json {
        return match output {
            CommandOutput::Launched(items) => write_json(out, items),
            CommandOutput::Transitioned(items) => write_json(out, items),
            CommandOutput::Listed(items) => write_json(out, items),
        };
    }

    match output {
        CommandOutput::Launched(items) => write_launched(out, items),
        CommandOutput::Transitioned(items) => write_transitions(out, items),
        CommandOutput::Listed(items) if ctx.format == OutputFormat::Table => {
            write_instances_table(out, items, ctx)
        }
        CommandOutput::Listed(items) => write_instances_text(out, items),
    }
}

fn write_launched<W: Write>(out: &mut W, items: &[LaunchedOutput]) -> io::Result<()> {
    for item in items {
        writeln!(out, "Instance {} launched.", item.instance_id)?;
    }
    Ok(())
}

fn write_transitions<W: Write>(out: &mut W, items: &[TransitionOutput]) -> io::Result<()> {
    for item in items {
        writeln!(
            out,
            "Instance {} {} with response {}.",
            item.instance_id,
            item.action.verb(),
            item.status_code
        )?;
    }
    Ok(())
}

fn write_instances_text<W: Write>(out: &mut W, items: &[InstanceOutput]) -> io::Result<()> {
    for item in items {
        writeln!(out, "Instance ID: {}", item.instance_id)?;
        writeln!(out, "Instance state: {}", item.state)?;
        writeln!(out, "Instance type: {}", item.instance_type)?;
        writeln!(out, "Launch time: {}", launch_time(item))?;
        writeln!(out, "{RECORD_SEPARATOR}")?;
    }
    Ok(())
}

fn write_instances_table<W: Write>(
    out: &mut W,
    items: &[InstanceOutput],
    ctx: &OutputCtx,
) -> io::Result<()> {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    if !ctx.no_header {
        table.set_header(["INSTANCE ID", "STATE", "TYPE", "LAUNCHED"]);
    }
    for item in items {
        table.add_row([
            item.instance_id.as_str(),
            item.state.as_str(),
            item.instance_type.as_str(),
            &launch_time(item),
        ]);
    }
    writeln!(out, "{table}")
}

fn launch_time(item: &InstanceOutput) -> String {
    item.launch_time
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "-".to_owned())
}

// --- Error output ---

/// Write a structured error to stderr.
pub fn write_error(err: &ErrorOutput, format: OutputFormat, json_flag: bool) {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    let _ = render_error(err, resolve_format(format, json_flag), &mut out);
}

fn render_error<W: Write>(err: &ErrorOutput, format: OutputFormat, out: &mut W) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            let s = serde_json::to_string(err).map_err(io::Error::other)?;
            writeln!(out, "{s}")
        }
        OutputFormat::Text | OutputFormat::Table => {
            writeln!(out, "Error [{}]: {}", err.error.code, err.error.message)
        }
    }
}

// --- Generic JSON helpers ---

fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> io::Result<()> {
    let s = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    writeln!(out, "{s}")
}
