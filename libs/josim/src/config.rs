//! Tool configuration.

use std::path::{Path, PathBuf};

use arcstr::ArcStr;
use serde::{Deserialize, Serialize};

use crate::netlist::{NetlistOptions, DEFAULT_GENERATOR, DEFAULT_SPEED_CONSTANT, DEFAULT_Z0};
use crate::Result;

/// The default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// The default directory for automatically named outputs.
pub const DEFAULT_OUT_DIR: &str = "data/results/josim";

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Netlist rendering parameters.
    pub netlist: NetlistConfig,
    /// Run parameters.
    pub run: RunConfig,
}

/// The `[netlist]` section.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetlistConfig {
    /// Propagation delay per unit length, in picoseconds per nanometer.
    pub speed_constant: f64,
    /// Characteristic impedance of passive transmission lines.
    pub z0: f64,
    /// Tool identity written to the file header.
    pub generator: ArcStr,
}

impl Default for NetlistConfig {
    fn default() -> Self {
        Self {
            speed_constant: DEFAULT_SPEED_CONSTANT,
            z0: DEFAULT_Z0,
            generator: ArcStr::from(DEFAULT_GENERATOR),
        }
    }
}

/// The `[run]` section.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// The circuit description to convert, if not given on the command line.
    pub circuit: Option<PathBuf>,
    /// The output file, if not given on the command line.
    pub out: Option<PathBuf>,
    /// Directory for outputs that are not explicitly named.
    pub out_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            circuit: None,
            out: None,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
        }
    }
}

impl Config {
    /// Parses a configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Reads a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("reading config file: {:?}", path);
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Reads `path` if given, otherwise [`CONFIG_FILE_NAME`] if it exists.
    ///
    /// Falls back to the defaults when no file is given and none is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(CONFIG_FILE_NAME);
                if default.is_file() {
                    Self::from_file(default)
                } else {
                    tracing::debug!("no config file found, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// The netlist options described by this configuration.
    pub fn netlist_options(&self) -> NetlistOptions {
        NetlistOptions {
            speed_constant: self.netlist.speed_constant,
            z0: self.netlist.z0,
            generator: self.netlist.generator.clone(),
        }
    }

    /// The output path for `input`: [`RunConfig::out`] if set, otherwise [`Config::default_output`].
    pub fn output_for(&self, input: impl AsRef<Path>) -> PathBuf {
        match &self.run.out {
            Some(out) => out.clone(),
            None => self.default_output(input),
        }
    }

    /// The output path used for `input` when none is given explicitly.
    ///
    /// This is `input`'s file stem with a `.cir` extension, inside [`RunConfig::out_dir`].
    pub fn default_output(&self, input: impl AsRef<Path>) -> PathBuf {
        let mut name = input
            .as_ref()
            .file_stem()
            .map(|stem| stem.to_os_string())
            .unwrap_or_else(|| "out".into());
        name.push(".cir");
        self.run.out_dir.join(name)
    }
}
