use anyhow::Context;
use clap::Parser as ClapParser;
use josim::circuit::CircuitDescription;
use josim::config::Config;
use josim::netlist::Netlister;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let cfg = Config::load(args.config.as_deref()).with_context(|| match &args.config {
        Some(path) => format!("Failed to load config file {:?}.", path),
        None => "Failed to load config.toml.".to_string(),
    })?;
    let (circuit, out) = resolve_paths(&args, &cfg)?;

    println!("circuit file: {:?}", &circuit);
    println!("config: {:?}", &args.config);
    println!("output: {:?}", &out);
    die2sim(&circuit, &cfg, &out)?;
    println!("JoSIM file writing complete.");

    Ok(())
}

/// Arguments to [`die2sim`].
#[derive(ClapParser, Debug)]
#[command(
    version,
    about,
    long_about = "Convert a placed circuit description into a JoSIM subcircuit netlist"
)]
pub struct Args {
    /// The path to the circuit description (TOML).
    ///
    /// If unspecified, `run.circuit` from the configuration file is used.
    circuit: Option<PathBuf>,
    /// The path where the output `.cir` file should be saved.
    ///
    /// The file's parent directories will be created if necessary.
    /// If the file already exists, it will be overwritten.
    ///
    /// If unspecified, `run.out` from the configuration file is used. Failing
    /// that, the output is named after the circuit file and placed in the
    /// configured output directory.
    #[arg(short, long)]
    out: Option<PathBuf>,
    /// The configuration file.
    ///
    /// Defaults to `config.toml` in the working directory, if it exists.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// The circuit description and output paths, with command line arguments
/// taking precedence over the configuration file.
fn resolve_paths(args: &Args, cfg: &Config) -> anyhow::Result<(PathBuf, PathBuf)> {
    let Some(circuit) = args.circuit.clone().or_else(|| cfg.run.circuit.clone()) else {
        anyhow::bail!("No circuit description given on the command line or in the config file.");
    };
    let out = match &args.out {
        Some(out) => out.clone(),
        None => cfg.output_for(&circuit),
    };
    Ok((circuit, out))
}

/// Assemble the JoSIM netlist described by `circuit` into `out`.
pub fn die2sim(circuit: &Path, cfg: &Config, out: &Path) -> anyhow::Result<()> {
    let subckt = CircuitDescription::from_file(circuit)
        .with_context(|| format!("Failed to read circuit description {:?}.", circuit))?
        .into_subckt()
        .with_context(|| "Failed to build subcircuit.")?;
    tracing::debug!("{}", subckt);

    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {:?}.", parent))?;
    }

    let report = Netlister::new(cfg.netlist_options())
        .assemble(&subckt, out)
        .with_context(|| format!("Failed to write JoSIM file to {:?}.", out))?;
    for skipped in &report.skipped {
        tracing::warn!(
            "import {:?} was left out of {:?}: {}",
            skipped.path,
            out,
            skipped.error
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_config() -> Config {
        Config::from_toml_str(
            r#"
            [run]
            circuit = "designs/from_config.toml"
            out = "results/from_config.cir"
            "#,
        )
        .unwrap()
    }

    #[test]
    fn output_defaults_to_configured_directory() {
        let args = Args::parse_from(["die2sim", "designs/adder.toml"]);
        let (circuit, out) = resolve_paths(&args, &Config::default()).unwrap();
        assert_eq!(circuit, PathBuf::from("designs/adder.toml"));
        assert_eq!(out, PathBuf::from("data/results/josim/adder.cir"));
    }

    #[test]
    fn explicit_output_wins() {
        let args = Args::parse_from(["die2sim", "adder.toml", "-o", "out/top.cir", "-c", "x.toml"]);
        let (_, out) = resolve_paths(&args, &run_config()).unwrap();
        assert_eq!(out, PathBuf::from("out/top.cir"));
        assert_eq!(args.config, Some(PathBuf::from("x.toml")));
    }

    #[test]
    fn runs_from_config_alone() {
        let args = Args::parse_from(["die2sim", "-c", "config.toml"]);
        let (circuit, out) = resolve_paths(&args, &run_config()).unwrap();
        assert_eq!(circuit, PathBuf::from("designs/from_config.toml"));
        assert_eq!(out, PathBuf::from("results/from_config.cir"));
    }

    #[test]
    fn command_line_circuit_overrides_config() {
        let args = Args::parse_from(["die2sim", "designs/adder.toml"]);
        let (circuit, out) = resolve_paths(&args, &run_config()).unwrap();
        assert_eq!(circuit, PathBuf::from("designs/adder.toml"));
        assert_eq!(out, PathBuf::from("results/from_config.cir"));
    }

    #[test]
    fn missing_circuit_is_an_error() {
        let args = Args::parse_from(["die2sim"]);
        assert!(resolve_paths(&args, &Config::default()).is_err());
    }
}
