//! Line-oriented keyboard source.
//!
//! Without a window there are no key events to listen to, so key transitions
//! are read as text, one per line:
//!
//! ```text
//! down KeyA
//! up KeyA
//! +ArrowLeft      # shorthand for down
//! -ArrowLeft      # shorthand for up
//! quit
//! ```
//!
//! Key identifiers are the browser `KeyboardEvent.code` names.  Unknown
//! identifiers are passed through; the controller ignores them.  Repeated
//! `down` lines behave like keyboard auto-repeat.

use std::io::BufRead;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyInput {
    Down(String),
    Up(String),
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyLineError {
    #[error("unknown key action {0:?} (expected down, up or quit)")]
    UnknownAction(String),
    #[error("missing key name after {0:?}")]
    MissingKey(String),
}

/// Parses one line.  Blank lines and `#` comments yield `Ok(None)`.
///
/// # Errors
///
/// Returns [`KeyLineError`] if the line is not a recognised command.
pub fn parse_key_line(line: &str) -> Result<Option<KeyInput>, KeyLineError> {
    let line = line.split('#').next().unwrap_or_default().trim();
    if line.is_empty() {
        return Ok(None);
    }

    if let Some(code) = line.strip_prefix('+') {
        return key_code(code, "+").map(|c| Some(KeyInput::Down(c)));
    }
    if let Some(code) = line.strip_prefix('-') {
        return key_code(code, "-").map(|c| Some(KeyInput::Up(c)));
    }

    let mut words = line.split_whitespace();
    let action = words.next().unwrap_or_default();
    match action.to_ascii_lowercase().as_str() {
        "quit" | "exit" => Ok(Some(KeyInput::Quit)),
        "down" => key_code(words.next().unwrap_or_default(), action).map(|c| Some(KeyInput::Down(c))),
        "up" => key_code(words.next().unwrap_or_default(), action).map(|c| Some(KeyInput::Up(c))),
        _ => Err(KeyLineError::UnknownAction(action.to_string())),
    }
}

fn key_code(code: &str, action: &str) -> Result<String, KeyLineError> {
    let code = code.trim();
    if code.is_empty() {
        Err(KeyLineError::MissingKey(action.to_string()))
    } else {
        Ok(code.to_string())
    }
}

/// Reads key lines from `reader` until EOF, `quit`, or the receiver is gone.
///
/// Blocking: run it on its own thread.  Malformed lines are logged and
/// skipped.  EOF is reported as [`KeyInput::Quit`].
///
/// # Errors
///
/// Propagates read errors from `reader`.
pub fn read_keys<R: BufRead>(reader: R, keys: mpsc::UnboundedSender<KeyInput>) -> std::io::Result<()> {
    for line in reader.lines() {
        let line = line?;
        match parse_key_line(&line) {
            Ok(Some(input)) => {
                let quit = input == KeyInput::Quit;
                if keys.send(input).is_err() || quit {
                    return Ok(());
                }
            }
            Ok(None) => {}
            Err(e) => warn!("ignoring input line {line:?}: {e}"),
        }
    }

    debug!("key source reached end of input");
    let _ = keys.send(KeyInput::Quit);
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_down_and_up() {
        assert_eq!(
            parse_key_line("down KeyA"),
            Ok(Some(KeyInput::Down("KeyA".to_string())))
        );
        assert_eq!(
            parse_key_line("UP ArrowLeft"),
            Ok(Some(KeyInput::Up("ArrowLeft".to_string())))
        );
    }

    #[test]
    fn test_parse_shorthand() {
        assert_eq!(
            parse_key_line("+Space"),
            Ok(Some(KeyInput::Down("Space".to_string())))
        );
        assert_eq!(
            parse_key_line("-Space"),
            Ok(Some(KeyInput::Up("Space".to_string())))
        );
    }

    #[test]
    fn test_blank_and_comment_lines_are_skipped() {
        assert_eq!(parse_key_line(""), Ok(None));
        assert_eq!(parse_key_line("   "), Ok(None));
        assert_eq!(parse_key_line("# press start"), Ok(None));
        assert_eq!(
            parse_key_line("down KeyB # jump"),
            Ok(Some(KeyInput::Down("KeyB".to_string())))
        );
    }

    #[test]
    fn test_malformed_lines_are_errors() {
        assert_eq!(
            parse_key_line("press KeyA"),
            Err(KeyLineError::UnknownAction("press".to_string()))
        );
        assert_eq!(
            parse_key_line("down"),
            Err(KeyLineError::MissingKey("down".to_string()))
        );
        assert_eq!(
            parse_key_line("+"),
            Err(KeyLineError::MissingKey("+".to_string()))
        );
    }

    #[test]
    fn test_unknown_key_names_pass_through() {
        assert_eq!(
            parse_key_line("down KeyZ"),
            Ok(Some(KeyInput::Down("KeyZ".to_string())))
        );
    }

    #[test]
    fn test_read_keys_forwards_in_order_and_stops_at_quit() {
        // Arrange
        let input: &[u8] = b"down KeyA\nbogus\nup KeyA\nquit\ndown KeyB\n";
        let (tx, mut rx) = mpsc::unbounded_channel();

        // Act
        read_keys(input, tx).unwrap();

        // Assert
        assert_eq!(rx.try_recv().ok(), Some(KeyInput::Down("KeyA".to_string())));
        assert_eq!(rx.try_recv().ok(), Some(KeyInput::Up("KeyA".to_string())));
        assert_eq!(rx.try_recv().ok(), Some(KeyInput::Quit));
        assert_eq!(rx.try_recv().ok(), None);
    }

    #[test]
    fn test_read_keys_reports_eof_as_quit() {
        let input: &[u8] = b"+KeyF\n";
        let (tx, mut rx) = mpsc::unbounded_channel();

        read_keys(input, tx).unwrap();

        assert_eq!(rx.try_recv().ok(), Some(KeyInput::Down("KeyF".to_string())));
        assert_eq!(rx.try_recv().ok(), Some(KeyInput::Quit));
    }
}
