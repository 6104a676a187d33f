/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::fmt;
use std::io;

/***************************************/
/*            Error types              */
/***************************************/
/// Errors returned by the elevator façade and engine construction.
#[derive(Debug)]
pub enum ElevatorError {
    InvalidFloor { floor: u8, max_floor: u8 },
    InvalidConfig(String),
    AlreadyStarted,
    Stopped,
    Spawn(io::Error),
    EnginePanicked,
}

impl fmt::Display for ElevatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElevatorError::InvalidFloor { floor, max_floor } => {
                write!(f, "floor {} is outside 0..={}", floor, max_floor)
            }
            ElevatorError::InvalidConfig(reason) => {
                write!(f, "invalid elevator config: {}", reason)
            }
            ElevatorError::AlreadyStarted => write!(f, "elevator has already been started"),
            ElevatorError::Stopped => write!(f, "elevator is no longer accepting calls"),
            ElevatorError::Spawn(e) => write!(f, "failed to spawn elevator thread: {}", e),
            ElevatorError::EnginePanicked => write!(f, "elevator thread panicked"),
        }
    }
}

impl std::error::Error for ElevatorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ElevatorError::Spawn(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ElevatorError {
    fn from(err: io::Error) -> Self {
        ElevatorError::Spawn(err)
    }
}

/// Errors encountered while loading `config.toml`.
#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read configuration file: {}", e),
            ConfigError::Parse(e) => write!(f, "failed to parse configuration file: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err)
    }
}

/// Reported by a clock when a simulated trip was cut short.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TravelInterrupted;

impl fmt::Display for TravelInterrupted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "simulated travel was interrupted")
    }
}

impl std::error::Error for TravelInterrupted {}
