//! `duressvault lock`: nothing to clear; reports the stateless design.

use crate::cli::output;
use crate::errors::Result;

/// Execute the `lock` command.
pub fn execute() -> Result<()> {
    output::success("Vault locked. Keys are never kept between commands.");
    Ok(())
}
