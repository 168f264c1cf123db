//! JoSIM subcircuit netlist assembly.
//!
//! A [`Subckt`] is built up through registration calls and then written out
//! by a [`Netlister`](netlist::Netlister) as a single `.cir` file, optionally
//! preceded by externally authored library netlists.
#![warn(missing_docs)]

use std::fmt::Display;
use std::path::PathBuf;

use arcstr::ArcStr;

pub mod circuit;
pub mod config;
pub mod error;
pub mod netlist;

pub use error::{Error, InvalidArgument, Result};

/// The component type that marks a component as a port of the enclosing subcircuit.
pub const PAD_TYPE: &str = "PAD";

/// The kind of a registered component.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum ComponentKind {
    /// A pad, whose last net is exposed as a port of the subcircuit.
    Pad,
    /// An instance of a primitive device or nested subcircuit.
    Instance(ArcStr),
}

impl ComponentKind {
    /// Classifies a component type name.
    ///
    /// Only the exact string [`PAD_TYPE`] produces [`ComponentKind::Pad`].
    pub fn from_type_name(type_name: impl Into<ArcStr>) -> Self {
        let type_name = type_name.into();
        if type_name == PAD_TYPE {
            Self::Pad
        } else {
            Self::Instance(type_name)
        }
    }

    /// The type name written to the netlist.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Pad => PAD_TYPE,
            Self::Instance(name) => name.as_str(),
        }
    }

    /// Returns `true` if this is a pad.
    #[inline]
    pub fn is_pad(&self) -> bool {
        matches!(self, Self::Pad)
    }
}

/// An instantiated circuit element or sub-block.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Component {
    name: ArcStr,
    kind: ComponentKind,
    nets: Vec<ArcStr>,
}

impl Component {
    /// The unique name of the component.
    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// The kind of the component.
    #[inline]
    pub fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    /// The type name of the component.
    #[inline]
    pub fn type_name(&self) -> &str {
        self.kind.type_name()
    }

    /// The nets connected to each pin, in pin order.
    #[inline]
    pub fn nets(&self) -> &[ArcStr] {
        &self.nets
    }
}

/// A passive transmission line inserted into a net.
///
/// The line splits its net into two endpoints, named by suffixing the net
/// with `A` and `B`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Ptl {
    name: ArcStr,
    net: ArcStr,
    length: u64,
}

impl Ptl {
    /// The unique name of the line.
    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// The base name of the net this line is inserted into.
    #[inline]
    pub fn net(&self) -> &ArcStr {
        &self.net
    }

    /// The physical length of the line in nanometers.
    #[inline]
    pub fn length(&self) -> u64 {
        self.length
    }

    /// The name of the first endpoint.
    pub fn net_a(&self) -> ArcStr {
        arcstr::format!("{}A", self.net)
    }

    /// The name of the second endpoint.
    pub fn net_b(&self) -> ArcStr {
        arcstr::format!("{}B", self.net)
    }

    /// The propagation delay in picoseconds for the given speed constant (ps/nm).
    #[inline]
    pub fn delay(&self, speed_constant: f64) -> f64 {
        self.length as f64 * speed_constant
    }
}

/// An external port of a subcircuit, contributed by a pad.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Port {
    /// The name of the pad that defines the port.
    pub designator: ArcStr,
    /// The net exposed by the port.
    pub net: ArcStr,
}

/// A subcircuit under construction.
///
/// Components, lines and imports keep their registration order. Nothing is
/// ever removed or re-sorted.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Subckt {
    name: ArcStr,
    components: Vec<Component>,
    lines: Vec<Ptl>,
    ports: Vec<Port>,
    imports: Vec<PathBuf>,
}

impl Subckt {
    /// Creates an empty subcircuit with the given name.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The name under which the subcircuit is emitted.
    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// Adds a library netlist to be copied verbatim ahead of the subcircuit.
    ///
    /// Paths are not deduplicated and need not exist yet.
    pub fn register_import(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        tracing::debug!("registering import {:?}", path);
        self.imports.push(path);
    }

    /// Adds a component.
    ///
    /// A component of type [`PAD_TYPE`] also exposes its last net as a port.
    pub fn register_component(
        &mut self,
        name: impl Into<ArcStr>,
        type_name: impl Into<ArcStr>,
        nets: impl IntoIterator<Item = impl Into<ArcStr>>,
    ) -> Result<()> {
        let name = name.into();
        let nets: Vec<ArcStr> = nets.into_iter().map(Into::into).collect();
        let Some(last) = nets.last().cloned() else {
            return Err(InvalidArgument::EmptyNets { component: name }.into());
        };
        let kind = ComponentKind::from_type_name(type_name);
        tracing::debug!(name = %name, kind = ?kind, "registering component");

        if kind.is_pad() {
            self.ports.push(Port {
                designator: name.clone(),
                net: last,
            });
        }
        self.components.push(Component { name, kind, nets });
        Ok(())
    }

    /// Adds a passive transmission line of `length` nanometers to net `net`.
    pub fn register_line(
        &mut self,
        name: impl Into<ArcStr>,
        net: impl Into<ArcStr>,
        length: i64,
    ) -> Result<()> {
        let name = name.into();
        let Ok(unsigned) = u64::try_from(length) else {
            return Err(InvalidArgument::NegativeLength { line: name, length }.into());
        };
        let net = net.into();
        tracing::debug!(name = %name, net = %net, length, "registering transmission line");
        self.lines.push(Ptl {
            name,
            net,
            length: unsigned,
        });
        Ok(())
    }

    /// The registered components, in registration order.
    #[inline]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// The registered transmission lines, in registration order.
    #[inline]
    pub fn lines(&self) -> &[Ptl] {
        &self.lines
    }

    /// The ports contributed by pads, in registration order.
    #[inline]
    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    /// The nets exposed as ports, in registration order.
    pub fn port_nets(&self) -> impl Iterator<Item = &ArcStr> {
        self.ports.iter().map(|port| &port.net)
    }

    /// The names of the pads defining each port, in registration order.
    pub fn port_designators(&self) -> impl Iterator<Item = &ArcStr> {
        self.ports.iter().map(|port| &port.designator)
    }

    /// The library netlists to copy ahead of the subcircuit.
    #[inline]
    pub fn imports(&self) -> &[PathBuf] {
        &self.imports
    }
}

impl Display for Subckt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Subcircuit `{}`", self.name)?;
        writeln!(f, "Files to be imported:")?;
        for (i, path) in self.imports.iter().enumerate() {
            writeln!(f, "[{i}]: {}", path.display())?;
        }
        writeln!(f, "Components added:")?;
        for (i, comp) in self.components.iter().enumerate() {
            write!(f, "[{i}]: {} {}", comp.name, comp.type_name())?;
            for net in &comp.nets {
                write!(f, " {net}")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "Transmission lines added:")?;
        for (i, line) in self.lines.iter().enumerate() {
            writeln!(f, "[{i}]: {} {} {}nm", line.name, line.net, line.length)?;
        }
        Ok(())
    }
}
