//! A small line based text format for recorded editor input, one event per
//! line:
//!
//! ```text
//! # comments and blank lines are skipped
//! down 3 4 primary
//! move 4 4
//! up primary
//! pen 3
//! mode erase
//! import {0xf0, 0x0f}
//! ```

use std::str::FromStr;

use crate::brush::{PointerButton, ToolMode};
use crate::codec::Radix;
use crate::errors::{GridError, Result};
use crate::events::EditorEvent;

fn script_error(line: usize, message: impl Into<String>) -> GridError {
    GridError::Script {
        line,
        message: message.into(),
    }
}

fn parse_arg<T: FromStr>(
    line: usize,
    args: &[&str],
    index: usize,
    what: &str,
) -> Result<T> {
    let arg = args
        .get(index)
        .ok_or_else(|| script_error(line, format!("missing {}", what)))?;
    arg.parse()
        .map_err(|_| script_error(line, format!("invalid {} '{}'", what, arg)))
}

fn parse_button(line: usize, arg: Option<&&str>) -> Result<PointerButton> {
    match arg.copied() {
        None | Some("primary") | Some("left") => Ok(PointerButton::Primary),
        Some("secondary") | Some("right") => Ok(PointerButton::Secondary),
        Some(other) => {
            Err(script_error(line, format!("unknown button '{}'", other)))
        }
    }
}

fn expect_no_args(line: usize, command: &str, args: &[&str]) -> Result<()> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(script_error(
            line,
            format!("'{}' takes no arguments", command),
        ))
    }
}

/// Parses a single script line, `line` being its 1-based number. Returns
/// `None` for blank and comment lines.
pub fn parse_line(line: usize, text: &str) -> Result<Option<EditorEvent>> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }

    let (command, rest) = match text.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (text, ""),
    };
    let args: Vec<&str> = rest.split_whitespace().collect();

    let event = match command {
        "down" => EditorEvent::PointerDown {
            x: parse_arg(line, &args, 0, "x")?,
            y: parse_arg(line, &args, 1, "y")?,
            button: parse_button(line, args.get(2))?,
        },
        "move" => EditorEvent::PointerMove {
            x: parse_arg(line, &args, 0, "x")?,
            y: parse_arg(line, &args, 1, "y")?,
        },
        "up" => EditorEvent::PointerUp {
            button: parse_button(line, args.first())?,
        },
        "wheel" => EditorEvent::PenWheel {
            delta_y: parse_arg(line, &args, 0, "wheel delta")?,
        },
        "pen" => EditorEvent::SetPenSize(parse_arg(line, &args, 0, "pen size")?),
        "mode" => match args.first().copied() {
            Some("fill") => EditorEvent::SetMode(ToolMode::Fill),
            Some("erase") => EditorEvent::SetMode(ToolMode::Erase),
            _ => return Err(script_error(line, "mode is 'fill' or 'erase'")),
        },
        "radix" => match args.first().copied() {
            Some("hex") => EditorEvent::SetRadix(Radix::Hex),
            Some("binary") => EditorEvent::SetRadix(Radix::Binary),
            _ => return Err(script_error(line, "radix is 'hex' or 'binary'")),
        },
        "resize" => {
            if args.len() != 2 {
                return Err(script_error(line, "resize needs a width and a height"));
            }
            EditorEvent::Resize {
                width: args[0].to_string(),
                height: args[1].to_string(),
            }
        }
        "nudge-width" => {
            EditorEvent::NudgeWidth(parse_arg(line, &args, 0, "delta")?)
        }
        "nudge-height" => {
            EditorEvent::NudgeHeight(parse_arg(line, &args, 0, "delta")?)
        }
        "preset" => match args.first() {
            Some(name) => EditorEvent::SelectPreset(name.to_string()),
            None => return Err(script_error(line, "missing preset name")),
        },
        "key" => {
            let key = match args.first().map(|arg| arg.chars()) {
                Some(mut chars) => match (chars.next(), chars.next()) {
                    (Some(key), None) => key,
                    _ => return Err(script_error(line, "key is one character")),
                },
                None => return Err(script_error(line, "missing key")),
            };
            let ctrl = args.get(1) == Some(&"ctrl");
            EditorEvent::from_key(key, ctrl).ok_or_else(|| {
                script_error(line, format!("key '{}' is not bound", key))
            })?
        }
        "import" => EditorEvent::Import(rest.to_string()),
        "invert" | "clear" | "rotate" | "flip-h" | "flip-v" | "undo"
        | "generate" | "copy" => {
            expect_no_args(line, command, &args)?;
            match command {
                "invert" => EditorEvent::Invert,
                "clear" => EditorEvent::Clear,
                "rotate" => EditorEvent::RotateClockwise,
                "flip-h" => EditorEvent::FlipHorizontal,
                "flip-v" => EditorEvent::FlipVertical,
                "undo" => EditorEvent::Undo,
                "generate" => EditorEvent::GenerateCode,
                _ => EditorEvent::CopyCode,
            }
        }
        other => {
            return Err(script_error(
                line,
                format!("unknown command '{}'", other),
            ))
        }
    };

    Ok(Some(event))
}

/// Parses a whole script. Stops at the first bad line.
pub fn parse_script(text: &str) -> Result<Vec<EditorEvent>> {
    let mut events = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if let Some(event) = parse_line(index + 1, line)? {
            events.push(event);
        }
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{parse_line, parse_script};
    use crate::brush::{PointerButton, ToolMode};
    use crate::codec::Radix;
    use crate::errors::GridError;
    use crate::events::EditorEvent;

    #[rstest]
    #[case("down 3 4", EditorEvent::PointerDown { x: 3, y: 4, button: PointerButton::Primary })]
    #[case("down 3 4 right", EditorEvent::PointerDown { x: 3, y: 4, button: PointerButton::Secondary })]
    #[case("  move 0 7 ", EditorEvent::PointerMove { x: 0, y: 7 })]
    #[case("up secondary", EditorEvent::PointerUp { button: PointerButton::Secondary })]
    #[case("wheel -120", EditorEvent::PenWheel { delta_y: -120.0 })]
    #[case("pen 4", EditorEvent::SetPenSize(4))]
    #[case("mode erase", EditorEvent::SetMode(ToolMode::Erase))]
    #[case("radix binary", EditorEvent::SetRadix(Radix::Binary))]
    #[case("resize 10 abc", EditorEvent::Resize { width: "10".to_string(), height: "abc".to_string() })]
    #[case("nudge-width -1", EditorEvent::NudgeWidth(-1))]
    #[case("preset uint16_t", EditorEvent::SelectPreset("uint16_t".to_string()))]
    #[case("key z ctrl", EditorEvent::Undo)]
    #[case("key d", EditorEvent::SetMode(ToolMode::Fill))]
    #[case("flip-v", EditorEvent::FlipVertical)]
    #[case("import {0xf0, 0x0f}", EditorEvent::Import("{0xf0, 0x0f}".to_string()))]
    fn lines_parse_into_events(#[case] line: &str, #[case] expected: EditorEvent) {
        assert_eq!(parse_line(1, line), Ok(Some(expected)));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("# a comment")]
    fn blank_and_comment_lines_are_skipped(#[case] line: &str) {
        assert_eq!(parse_line(1, line), Ok(None));
    }

    #[rstest]
    #[case("jump 1 2", "unknown command 'jump'")]
    #[case("down 1", "missing y")]
    #[case("down a 1", "invalid x 'a'")]
    #[case("down 1 1 middle", "unknown button 'middle'")]
    #[case("mode paint", "mode is 'fill' or 'erase'")]
    #[case("undo now", "'undo' takes no arguments")]
    #[case("key q", "key 'q' is not bound")]
    #[case("key ab", "key is one character")]
    fn bad_lines_are_reported(#[case] line: &str, #[case] message: &str) {
        assert_eq!(
            parse_line(7, line),
            Err(GridError::Script {
                line: 7,
                message: message.to_string()
            })
        );
    }

    #[test]
    fn script_reports_the_failing_line_number() {
        let script = "down 0 0\n\n# comment\nmove x 1\n";
        assert_eq!(
            parse_script(script),
            Err(GridError::Script {
                line: 4,
                message: "invalid x 'x'".to_string()
            })
        );
    }

    #[test]
    fn script_collects_events_in_order() {
        let script = "down 0 0\nmove 1 0\nup\n# done\ngenerate\n";
        assert_eq!(
            parse_script(script).unwrap(),
            vec![
                EditorEvent::PointerDown {
                    x: 0,
                    y: 0,
                    button: PointerButton::Primary
                },
                EditorEvent::PointerMove { x: 1, y: 0 },
                EditorEvent::PointerUp {
                    button: PointerButton::Primary
                },
                EditorEvent::GenerateCode,
            ]
        );
    }
}
