//! `opov transform`: print the rewritten source.

use super::{FileArgs, read_source};
use crate::error::{CliError, Result};
use opov_syntax::pretty::PrettyConfig;

pub(super) fn execute(args: &FileArgs) -> Result<()> {
    let text = read_source(&args.path)?;
    let config = PrettyConfig::with_indent_width(args.indent);

    match opov_transform::transform_source_with(&text, &args.options(), config) {
        Ok((output, report)) => {
            opov_log::info!("{}: {}", args.path.display(), report);
            print!("{output}");
            Ok(())
        }
        Err(error) => Err(CliError::Syntax {
            path: args.path.clone(),
            text,
            error,
        }),
    }
}
