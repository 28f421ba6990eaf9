//! Line-driven collapse session.
//!
//! Each input line is one event; state changes are applied and re-rendered
//! before the next line is read.

use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::application::services::TreeVisualizer;
use crate::cli::commands::layout_table;
use crate::domain::CollapseCommand;

const HELP: &str = "\
commands:
  toggle <id>     collapse or expand one node
  expand-all      show every node
  collapse-all    hide everything below the root's children
  show            print the outline
  layout          print node positions
  help            this text
  quit            leave the session";

pub fn run_session<R: BufRead, W: Write>(
    visualizer: &mut TreeVisualizer,
    input: R,
    out: &mut W,
) -> io::Result<()> {
    write!(out, "{}", visualizer.outline())?;

    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        debug!("session input: {}", trimmed);

        match trimmed {
            "quit" | "exit" | "q" => break,
            "help" | "?" => writeln!(out, "{}", HELP)?,
            "show" => write!(out, "{}", visualizer.outline())?,
            "layout" => write!(out, "{}", layout_table(visualizer.layout()))?,
            other => match other.parse::<CollapseCommand>() {
                Ok(command) => {
                    visualizer.dispatch(command);
                    write!(out, "{}", visualizer.outline())?;
                }
                Err(e) => writeln!(out, "{} (try 'help')", e)?,
            },
        }
    }
    out.flush()
}
