//! `opov run`: rewrite, evaluate, and print what the program logged.

use super::{FileArgs, parse_file};
use crate::error::Result;
use opov_runtime::Interpreter;

pub(super) fn execute(args: &FileArgs) -> Result<()> {
    let (_, mut program, mut interner) = parse_file(&args.path)?;
    let report = opov_transform::transform_program(&mut program, &mut interner, &args.options());
    opov_log::debug!("{}: {}", args.path.display(), report);

    let mut interp = Interpreter::new(interner);
    let result = interp.run(&program);

    // Lines logged before a runtime error are still shown.
    for line in interp.take_output() {
        println!("{line}");
    }
    result?;
    Ok(())
}
