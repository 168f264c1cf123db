//! Serialized circuit descriptions.
//!
//! A [`CircuitDescription`] carries the placement facts produced by a
//! physical-design front end: the subcircuit name, library imports,
//! components and transmission lines. It is read from TOML:
//!
//! ```toml
//! name = "top"
//! imports = ["lib/and2.cir"]
//!
//! [[components]]
//! name = "P0"
//! type = "PAD"
//! nets = ["a"]
//!
//! [[lines]]
//! name = "L1"
//! net = "a"
//! length = 1200
//! ```

use std::path::{Path, PathBuf};

use arcstr::ArcStr;
use serde::{Deserialize, Serialize};

use crate::{Result, Subckt};

/// A component entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentDescription {
    /// The unique name of the component.
    pub name: ArcStr,
    /// The device or subcircuit type.
    #[serde(rename = "type")]
    pub type_name: ArcStr,
    /// The nets connected to each pin, in pin order.
    pub nets: Vec<ArcStr>,
}

/// A transmission line entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LineDescription {
    /// The unique name of the line.
    pub name: ArcStr,
    /// The net the line is inserted into.
    pub net: ArcStr,
    /// The length of the line in nanometers.
    pub length: i64,
}

/// A complete circuit description.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CircuitDescription {
    /// The name of the generated subcircuit.
    pub name: ArcStr,
    /// Library netlists to copy ahead of the subcircuit.
    #[serde(default)]
    pub imports: Vec<PathBuf>,
    /// Components, in registration order.
    #[serde(default)]
    pub components: Vec<ComponentDescription>,
    /// Transmission lines, in registration order.
    #[serde(default)]
    pub lines: Vec<LineDescription>,
}

impl CircuitDescription {
    /// Parses a description from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Reads a description file.
    ///
    /// Relative import paths are resolved against the directory containing the file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("reading circuit description: {:?}", path);
        let mut desc = Self::from_toml_str(&std::fs::read_to_string(path)?)?;
        if let Some(root) = path.parent() {
            for import in desc.imports.iter_mut() {
                if import.is_relative() {
                    *import = root.join(&*import);
                }
            }
        }
        Ok(desc)
    }

    /// Registers every entry of this description, in order, with a new [`Subckt`].
    ///
    /// Stops at the first invalid entry.
    pub fn into_subckt(self) -> Result<Subckt> {
        let mut subckt = Subckt::new(self.name);
        for import in self.imports {
            subckt.register_import(import);
        }
        for comp in self.components {
            subckt.register_component(comp.name, comp.type_name, comp.nets)?;
        }
        for line in self.lines {
            subckt.register_line(line.name, line.net, line.length)?;
        }
        Ok(subckt)
    }
}
