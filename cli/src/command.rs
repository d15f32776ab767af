use headtotoe_protocol::ClientMessage;
use thiserror::Error;

/// One line typed at the prompt.
#[derive(Clone, Debug, PartialEq)]
pub enum Input {
    Message(ClientMessage),
    Show,
    Help,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown command {0:?}, try `help`")]
    Unknown(String),
    #[error("`{0}` needs a number")]
    MissingArgument(&'static str),
    #[error("{0:?} is not a valid number")]
    BadNumber(String),
}

pub const HELP: &str = "\
Commands:
  flip N | f N | N   turn tile N face-up
  hint | h           reveal a matching pair for a moment
  wait MS | w MS     let MS milliseconds pass
  level N | l N      start level N
  restart | r        start the current level again
  show | s           print the board
  quit | q           leave";

pub fn parse(line: &str) -> Result<Input, ParseError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(Input::Show);
    };
    let arg = words.next();

    if let Ok(tile) = head.parse() {
        return Ok(Input::Message(ClientMessage::SelectTile { tile }));
    }

    let message = match head.to_ascii_lowercase().as_str() {
        "flip" | "f" | "select" => ClientMessage::SelectTile {
            tile: number(arg, "flip")?,
        },
        "hint" | "h" => ClientMessage::Hint,
        "wait" | "w" => ClientMessage::Advance {
            millis: number(arg, "wait")?,
            generation: None,
        },
        "level" | "l" => ClientMessage::SelectLevel {
            level: number(arg, "level")?,
        },
        "restart" | "r" => ClientMessage::Restart,
        "quit" | "q" | "exit" => ClientMessage::Quit,
        "show" | "s" => return Ok(Input::Show),
        "help" | "?" => return Ok(Input::Help),
        _ => return Err(ParseError::Unknown(head.into())),
    };
    Ok(Input::Message(message))
}

fn number<T: std::str::FromStr>(arg: Option<&str>, command: &'static str) -> Result<T, ParseError> {
    let arg = arg.ok_or(ParseError::MissingArgument(command))?;
    arg.parse().map_err(|_| ParseError::BadNumber(arg.into()))
}
