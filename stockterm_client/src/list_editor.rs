//! Line-driven front end for the watchlist editor.
//!
//! Each line typed on stdin is mapped to an `EditorAction`; the view is redrawn
//! after every action. Stdin is read on a helper thread so that Ctrl+C can end the
//! session through `select!` while a read is still blocked.
use std::io::{self, BufRead, Write};
use std::thread;

use crossbeam_channel::{Receiver, select, unbounded};
use log::debug;
use stockterm_common::editor::{EditOutcome, EditorAction, EditorState, WatchlistEditor};
use stockterm_common::{Interrupt, Result, Ticker};

const FOOTER: &str = "\nk/j: move, enter: toggle, s: save, q: quit without saving.";

/// Spawns a thread forwarding stdin lines. The channel closes at end of input.
pub fn stdin_lines() -> Receiver<String> {
    let (tx, rx) = unbounded();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
        debug!("Stdin reader stopping");
    });
    rx
}

/// Runs an editing session over `tickers`.
///
/// End of input and an interrupt both end the session without saving.
pub fn run_interactive<W: Write>(
    tickers: Vec<Ticker>,
    input: &Receiver<String>,
    interrupt: &Interrupt,
    out: &mut W,
) -> Result<EditOutcome> {
    let mut editor = WatchlistEditor::new(tickers);

    while editor.state() == EditorState::Browsing {
        write!(out, "{}", render_view(&editor))?;
        out.flush()?;
        select! {
            recv(input) -> line => match line {
                Ok(line) => match EditorAction::from_key(&line) {
                    Some(action) => {
                        editor.apply(action);
                    }
                    None => writeln!(out, "Unknown key '{}'", line.trim())?,
                },
                Err(_) => break,
            },
            recv(interrupt.receiver()) -> _ => {
                editor.apply(EditorAction::Quit);
            },
        }
    }
    Ok(editor.finish())
}

/// Text view of the editor: `>` marks the cursor, `[x]` a kept row.
pub fn render_view(editor: &WatchlistEditor) -> String {
    let mut view = String::from("Watchlist\n\n");
    for (index, ticker) in editor.choices().iter().enumerate() {
        let cursor = if editor.cursor() == index { '>' } else { ' ' };
        let kept = if editor.is_marked(index) { ' ' } else { 'x' };
        view.push_str(&format!("{} [{}] {}\n", cursor, kept, ticker));
    }
    view.push_str(FOOTER);
    view.push('\n');
    view
}
