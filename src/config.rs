//! Configuration loading helpers.
//!
//! Layers configuration files and environment variables under command-line
//! values using `ortho_config`. Precedence is defaults < file < env < CLI.

use ortho_config::{OrthoConfig, OrthoError, load_and_merge_subcommand_for};

use crate::PmergeError;
use crate::cli_args::{GlobalArgs, MergeArgs};

/// Load global options from files and the environment, then apply `cli` on
/// top.
///
/// # Errors
///
/// Returns an [`OrthoError`] if configuration gathering fails.
#[expect(
    clippy::result_large_err,
    reason = "configuration loading errors can be verbose"
)]
pub fn load_global_args(cli: GlobalArgs) -> Result<GlobalArgs, OrthoError> {
    // Only the program name is passed so CLI values come from `cli` alone.
    let mut global = GlobalArgs::load_from_iter(std::env::args_os().take(1))?;
    global.merge(cli);
    Ok(global)
}

/// Merge the `[cmds.merge]` configuration section under the CLI arguments and
/// check that a directory to scan is known.
///
/// # Errors
///
/// Returns [`PmergeError::Config`] when configuration cannot be loaded and
/// [`PmergeError::MissingPath`] when no source supplies `path`.
pub fn resolve_merge_args(cli: &MergeArgs, global: &GlobalArgs) -> Result<MergeArgs, PmergeError> {
    let merged = load_and_merge_subcommand_for::<MergeArgs>(cli)?;
    if merged.path.is_none() {
        return Err(PmergeError::MissingPath {
            manifest_name: global.manifest_name().to_owned(),
        });
    }
    Ok(merged)
}
