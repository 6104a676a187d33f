/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::error::{ConfigError, ElevatorError};
use crate::shared::{Direction, FloorCall, Person};

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub elevator: ElevatorConfig,
    #[serde(default)]
    pub calls: Vec<CallConfig>,
}

/// Engine parameters. Times are in milliseconds.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ElevatorConfig {
    pub start_floor: u8,
    pub max_floor: u8,
    pub max_capacity: usize,
    #[serde(default = "default_floor_travel_time")]
    pub floor_travel_time: u64,
    #[serde(default = "default_idle_poll_time")]
    pub idle_poll_time: u64,
}

#[derive(Deserialize, Clone, Debug)]
pub struct CallConfig {
    pub floor: u8,
    pub direction: Direction,
    #[serde(default)]
    pub people: Vec<PersonConfig>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct PersonConfig {
    pub name: String,
    pub destination: u8,
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let config_str = fs::read_to_string(path)?;
    parse_config(&config_str)
}

pub fn parse_config(config_str: &str) -> Result<Config, ConfigError> {
    Ok(toml::from_str(config_str)?)
}

impl ElevatorConfig {
    pub fn validate(&self) -> Result<(), ElevatorError> {
        if self.start_floor > self.max_floor {
            return Err(ElevatorError::InvalidConfig(format!(
                "start floor {} is above max floor {}",
                self.start_floor, self.max_floor
            )));
        }
        if self.max_capacity == 0 {
            return Err(ElevatorError::InvalidConfig(
                "max capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn floor_travel_time(&self) -> Duration {
        Duration::from_millis(self.floor_travel_time)
    }

    pub fn idle_poll_time(&self) -> Duration {
        Duration::from_millis(self.idle_poll_time)
    }
}

impl CallConfig {
    pub fn to_floor_call(&self) -> FloorCall {
        let people = self
            .people
            .iter()
            .map(|p| Person::new(p.name.clone(), self.floor, p.destination))
            .collect();
        FloorCall::new(people, self.floor, self.direction)
    }
}

impl Config {
    pub fn demo_calls(&self) -> Vec<FloorCall> {
        self.calls.iter().map(CallConfig::to_floor_call).collect()
    }
}

fn default_floor_travel_time() -> u64 {
    1000
}

fn default_idle_poll_time() -> u64 {
    1000
}

/***************************************/
/*             Unit tests              */
/***************************************/
