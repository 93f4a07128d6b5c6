//! Textual commands accepted by the headless front end.

use std::fmt;
use std::str::FromStr;

use crate::SimError;

pub const HELP: &str = "\
commands:
  start   run ticks continuously in the background
  stop    stop the background loop
  step    run a single tick
  status  print sim time, pending orders and per-robot loads
  help    show this message
  exit    stop and quit";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    Step,
    Status,
    Help,
    Exit,
}

impl FromStr for Command {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start"  => Ok(Command::Start),
            "stop"   => Ok(Command::Stop),
            "step"   => Ok(Command::Step),
            "status" => Ok(Command::Status),
            "help"   => Ok(Command::Help),
            "exit"   => Ok(Command::Exit),
            _        => Err(SimError::UnknownCommand(s.trim().to_string())),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Command::Start  => "start",
            Command::Stop   => "stop",
            Command::Step   => "step",
            Command::Status => "status",
            Command::Help   => "help",
            Command::Exit   => "exit",
        };
        f.write_str(s)
    }
}
