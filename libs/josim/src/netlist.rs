//! Rendering and assembly of JoSIM `.cir` files.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use arcstr::ArcStr;

use crate::{Component, Error, Ptl, Result, Subckt};

/// Default propagation delay per unit length, in picoseconds per nanometer.
pub const DEFAULT_SPEED_CONSTANT: f64 = 1e-5;
/// Default characteristic impedance of passive transmission lines.
pub const DEFAULT_Z0: f64 = 5.0;
/// Default tool identity written to the file header.
pub const DEFAULT_GENERATOR: &str = "die2sim";

/// Label of the banner preceding the component section.
pub const COMPONENTS_SECTION: &str = "Components";
/// Label of the banner preceding the transmission line section.
pub const PTL_SECTION: &str = "Passive Transmission Lines";
/// The statement closing the generated subcircuit.
pub const END_SUBCKT: &str = ".ends Created_subckt";

/// Width of the `=` rules in section banners.
const BANNER_WIDTH: usize = 74;
const COMPONENT_NAME_WIDTH: usize = 20;
const COMPONENT_TYPE_WIDTH: usize = 20;
const COMPONENT_NET_WIDTH: usize = 7;
/// `asctime`-style timestamp, e.g. `Sun Oct 19 09:05:01 2026`.
const TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Configuration for JoSIM netlists.
#[derive(Clone, Debug, PartialEq)]
pub struct NetlistOptions {
    /// Propagation delay per unit length, in picoseconds per nanometer.
    pub speed_constant: f64,
    /// Characteristic impedance of passive transmission lines.
    pub z0: f64,
    /// Tool identity written to the file header.
    pub generator: ArcStr,
}

impl Default for NetlistOptions {
    fn default() -> Self {
        Self {
            speed_constant: DEFAULT_SPEED_CONSTANT,
            z0: DEFAULT_Z0,
            generator: ArcStr::from(DEFAULT_GENERATOR),
        }
    }
}

/// An import that could not be copied into the output.
#[derive(Debug)]
pub struct SkippedImport {
    /// The path of the import.
    pub path: PathBuf,
    /// The reason the import was skipped.
    pub error: io::Error,
}

/// The outcome of writing a netlist.
#[derive(Debug, Default)]
pub struct AssemblyReport {
    /// Imports copied into the output, in order.
    pub imported: Vec<PathBuf>,
    /// Imports that could not be read and were left out.
    pub skipped: Vec<SkippedImport>,
}

impl AssemblyReport {
    /// Returns `true` if every import was copied.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Left-justifies `token` in `width` columns, followed by at least one space.
fn pad_right(token: &str, width: usize) -> String {
    if token.chars().count() < width {
        format!("{token:<width$}")
    } else {
        format!("{token} ")
    }
}

/// Right-justifies `token` in `width` columns, preceded by at least one space.
fn pad_left(token: &str, width: usize) -> String {
    if token.chars().count() < width {
        format!("{token:>width$}")
    } else {
        format!(" {token}")
    }
}

/// Formats a delay with two decimals, or two significant digits if it is below `0.01`.
fn format_delay(delay: f64) -> String {
    let magnitude = delay.abs();
    let decimals = if magnitude > 0.0 && magnitude < 0.01 {
        (-magnitude.log10()).ceil() as usize + 1
    } else {
        2
    };
    format!("{delay:.decimals$}")
}

/// Renders a component instantiation, without a trailing newline.
///
/// `X<name>` and the type are padded to 20 columns and each net to 7. Tokens
/// that fill their column are followed by a single space.
pub fn render_component(component: &Component) -> String {
    let mut line = pad_right(&format!("X{}", component.name()), COMPONENT_NAME_WIDTH);
    line.push_str(&pad_right(component.type_name(), COMPONENT_TYPE_WIDTH));
    line.extend(
        component
            .nets()
            .iter()
            .map(|net| pad_right(net, COMPONENT_NET_WIDTH)),
    );
    line
}

/// Renders the port comment and `.SUBCKT` declaration of a subcircuit.
///
/// The two lines are separated by a newline; no trailing newline is added.
pub fn render_port_header(subckt: &Subckt) -> String {
    let mut header = String::from("* ");
    for designator in subckt.port_designators() {
        header.push('\t');
        header.push_str(designator);
    }
    header.push_str("\n.SUBCKT ");
    header.push_str(subckt.name());
    for net in subckt.port_nets() {
        header.push('\t');
        header.push_str(net);
    }
    header
}

/// Renders a decorative section banner.
///
/// The banner starts with two blank lines and ends with a newline followed by
/// one blank line.
pub fn banner(label: &str) -> String {
    let rule = "=".repeat(BANNER_WIDTH);
    let side = "=".repeat((BANNER_WIDTH.saturating_sub(label.len()) / 2).saturating_sub(1));
    format!("\n\n* {rule}\n* {side} {label} {side}\n* {rule}\n\n")
}

/// Writes JoSIM netlists.
#[derive(Clone, Debug, Default)]
pub struct Netlister {
    opts: NetlistOptions,
    timestamp: Option<ArcStr>,
}

impl Netlister {
    /// Creates a new [`Netlister`].
    pub fn new(opts: NetlistOptions) -> Self {
        Self {
            opts,
            timestamp: None,
        }
    }

    /// Returns a netlister that writes `timestamp` into file headers instead of the current time.
    pub fn with_timestamp(mut self, timestamp: impl Into<ArcStr>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// The options used by this netlister.
    #[inline]
    pub fn opts(&self) -> &NetlistOptions {
        &self.opts
    }

    /// Renders a passive transmission line, without a trailing newline.
    ///
    /// Fields are right-justified to 7, 6, 4, 6 and 4 columns; a field that
    /// fills its column is preceded by a single space.
    pub fn render_ptl(&self, ptl: &Ptl) -> String {
        format!(
            "{:>7}{}{}{}{}  LOSSLESS Z0={:.2}  TD={}p",
            format!("T{}", ptl.name()),
            pad_left(&ptl.net_a(), 6),
            pad_left("0", 4),
            pad_left(&ptl.net_b(), 6),
            pad_left("0", 4),
            self.opts.z0,
            format_delay(ptl.delay(self.opts.speed_constant)),
        )
    }

    /// Renders the generated file header.
    pub fn render_file_header(&self) -> String {
        let timestamp = match &self.timestamp {
            Some(timestamp) => timestamp.to_string(),
            None => chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
        };
        format!(
            "* JoSIM file generated with {}, {timestamp}\n\n\
             * This is a generated file. Be careful when editing manually: this file may be overwritten.\n\n",
            self.opts.generator,
        )
    }

    /// Writes a complete netlist for `subckt` to the output stream.
    ///
    /// Unreadable imports are skipped and listed in the returned report.
    pub fn export<W: Write>(&self, subckt: &Subckt, out: &mut W) -> Result<AssemblyReport> {
        out.write_all(self.render_file_header().as_bytes())?;
        let report = self.write_imports(out, subckt)?;
        self.write_subckt(out, subckt)?;
        out.flush()?;
        Ok(report)
    }

    /// Writes a complete netlist for `subckt` to the file at `path`.
    ///
    /// The file is truncated if it exists. Failure to create or write it aborts
    /// the assembly and may leave a partially written file behind. Unreadable
    /// imports are skipped and listed in the returned report.
    pub fn assemble(&self, subckt: &Subckt, path: impl AsRef<Path>) -> Result<AssemblyReport> {
        let path = path.as_ref();
        tracing::info!("creating JoSIM file {:?}", path);

        {
            let mut out = File::create(path).map_err(|err| Error::Output {
                path: path.to_path_buf(),
                err,
            })?;
            out.write_all(self.render_file_header().as_bytes())?;
        }

        let file = OpenOptions::new()
            .append(true)
            .open(path)
            .map_err(|err| Error::Output {
                path: path.to_path_buf(),
                err,
            })?;
        let mut out = BufWriter::new(file);
        let report = self.write_imports(&mut out, subckt)?;
        self.write_subckt(&mut out, subckt)?;
        out.flush()?;

        tracing::info!(
            skipped = report.skipped.len(),
            "creating JoSIM file {:?} done",
            path
        );
        Ok(report)
    }

    /// Copies each import of `subckt` to the output stream, byte for byte.
    fn write_imports<W: Write>(&self, out: &mut W, subckt: &Subckt) -> io::Result<AssemblyReport> {
        let mut report = AssemblyReport::default();
        for (i, path) in subckt.imports().iter().enumerate() {
            match fs::read(path) {
                Ok(contents) => {
                    tracing::debug!("[{i}] importing {:?}", path);
                    out.write_all(&contents)?;
                    report.imported.push(path.clone());
                }
                Err(error) => {
                    tracing::warn!("[{i}] could not open {:?} for copying: {}", path, error);
                    report.skipped.push(SkippedImport {
                        path: path.clone(),
                        error,
                    });
                }
            }
        }
        Ok(report)
    }

    /// Writes the subcircuit sections and the closing statement.
    pub fn write_subckt<W: Write>(&self, out: &mut W, subckt: &Subckt) -> io::Result<()> {
        writeln!(out, "{}", banner(subckt.name()))?;
        writeln!(out, "{}", render_port_header(subckt))?;

        writeln!(out, "{}", banner(COMPONENTS_SECTION))?;
        for component in subckt.components() {
            writeln!(out, "{}", render_component(component))?;
        }

        writeln!(out, "{}", banner(PTL_SECTION))?;
        for ptl in subckt.lines() {
            writeln!(out, "{}", self.render_ptl(ptl))?;
        }

        writeln!(out, "{END_SUBCKT}")?;
        Ok(())
    }
}
