//! Line-mode operator prompts.
//!
//! Everything the operator answers before the loop starts: confirming the
//! log file name and the go-ahead gate.  Both run in cooked mode on plain
//! `BufRead`/`Write` handles so they can be driven from tests.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::app::ports::InputError;
use crate::output_path::with_suffix;

fn term(e: std::io::Error) -> InputError {
    InputError::Terminal(e.to_string())
}

/// Read one line, without its terminator.  End of input is an error: every
/// prompt here needs an answer.
fn read_answer(input: &mut impl BufRead) -> Result<String, InputError> {
    let mut line = String::new();
    if input.read_line(&mut line).map_err(term)? == 0 {
        return Err(InputError::EndOfInput);
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Offer `default` as the log file; anything but `y` asks for a suffix.
pub fn confirm_log_path(
    input: &mut impl BufRead,
    output: &mut impl Write,
    default: &Path,
) -> Result<PathBuf, InputError> {
    writeln!(output, "Would you like to write to {}? y/n", default.display()).map_err(term)?;
    let path = if read_answer(input)?.trim() == "y" {
        default.to_path_buf()
    } else {
        writeln!(output, "Enter a filename suffix.").map_err(term)?;
        let suffix = read_answer(input)?;
        with_suffix(default, &suffix)
    };
    writeln!(output, "\nCreating new file: {}\n", path.display()).map_err(term)?;
    Ok(path)
}

/// Block until the operator submits an empty line.
pub fn wait_for_start(input: &mut impl BufRead, output: &mut impl Write) -> Result<(), InputError> {
    loop {
        writeln!(output, "Press Enter to initiate activation cycling.\n").map_err(term)?;
        output.flush().map_err(term)?;
        if read_answer(input)?.is_empty() {
            return Ok(());
        }
    }
}
