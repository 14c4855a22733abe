//! `opov check`: parse only.

use super::{FileArgs, parse_file};
use crate::error::Result;

pub(super) fn execute(args: &FileArgs) -> Result<()> {
    let (_, program, _) = parse_file(&args.path)?;
    opov_log::debug!("{}: {} statements", args.path.display(), program.body.len());
    println!("{}: ok", args.path.display());
    Ok(())
}
