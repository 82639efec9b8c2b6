use std::io::{self, BufRead, Write};

use linguapedia_core::DestructiveAction;

/// Asks for an explicit yes before a destructive action.
///
/// Returns the action when confirmed, `None` when declined. `assume_yes`
/// skips the question entirely.
pub fn confirm_action<R: BufRead, W: Write>(
    action: DestructiveAction,
    assume_yes: bool,
    input: &mut R,
    output: &mut W,
) -> io::Result<Option<DestructiveAction>> {
    if assume_yes {
        return Ok(Some(action));
    }
    write!(output, "{} [y/N] ", action.prompt())?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(action.confirm(&answer))
}
