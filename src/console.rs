use std::fmt;

use crate::map::MapStats;
pub mod reader;

pub struct MapOption {
    pub name: String,
    pub default: String,
    pub min: Option<u64>,
    pub max: Option<u64>,
}

impl fmt::Display for MapOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "option name {} type spin default {}", self.name, self.default)?;
        if let Some(min) = self.min {
            write!(f, " min {min}")?;
        }
        if let Some(max) = self.max {
            write!(f, " max {max}")?;
        }
        Ok(())
    }
}

/// Whether the driver keeps reading after a command.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Flow {
    Continue,
    Quit,
}

pub trait Console {
    // Throw away the current block, if any, and start over with a zeroed
    // block of `size` bytes using the current options.
    fn provision(&mut self, size: u64) -> Result<(), String>;

    // List the options that can be changed with `setoption`.
    fn options(&mut self) -> Result<(), String>;

    // Takes effect on the next `new`.
    fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<(), String>;

    fn put(&mut self, key: i64, value: i64) -> Result<(), String>;

    // Prints 0 for missing keys, like the map itself.
    fn get(&mut self, key: i64) -> Result<(), String>;

    // Prints `none` for missing keys.
    fn find(&mut self, key: i64) -> Result<(), String>;

    fn stats(&mut self) -> Result<(), String>;
}

pub fn option(option: MapOption) {
    println!("{option}");
}

pub fn ready(stats: &MapStats) {
    println!(
        "ready primary {} overflow {}",
        stats.primary_slots, stats.overflow_slots
    );
}

pub fn previous(key: i64, value: i64) {
    println!("previous {key} {value}");
}

pub fn value(key: i64, value: Option<i64>) {
    match value {
        Some(v) => println!("value {key} {v}"),
        None => println!("value {key} none"),
    }
}

pub fn stats(stats: &MapStats) {
    for line in stats.to_string().lines() {
        println!("info {line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_line() {
        let option = MapOption {
            name: String::from("OverflowDivisor"),
            default: String::from("3"),
            min: Some(2),
            max: None,
        };
        assert_eq!(
            "option name OverflowDivisor type spin default 3 min 2",
            option.to_string()
        );
    }
}
