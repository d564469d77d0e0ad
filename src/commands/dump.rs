//! # Dump-Projects Command Implementation
//!
//! Prints the fully resolved project list as pretty JSON. This is the quickest
//! way to see exactly which remote, path and revision every project ends up
//! with after inheritance and environment expansion.

use anyhow::Result;
use clap::Args;

use super::ManifestArgs;

/// Dump the evaluated project manifest as JSON
#[derive(Args, Debug)]
pub struct DumpArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,
}

/// Execute the `dump-projects` command.
pub fn execute(args: DumpArgs) -> Result<()> {
    let (_, projects) = args.manifest.resolve()?;
    println!("{}", serde_json::to_string_pretty(&projects)?);
    Ok(())
}
