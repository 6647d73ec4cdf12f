use crate::console::{self, MapOption};

/// One in every `DEFAULT_OVERFLOW_DIVISOR` node cells of a block is set aside
/// for collision chains.
pub const DEFAULT_OVERFLOW_DIVISOR: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapOptions {
    pub overflow_divisor: u64,
}

impl Default for MapOptions {
    fn default() -> MapOptions {
        MapOptions {
            overflow_divisor: DEFAULT_OVERFLOW_DIVISOR,
        }
    }
}

impl MapOptions {
    pub fn overflow_divisor(mut self, divisor: u64) -> MapOptions {
        self.overflow_divisor = divisor;
        self
    }

    pub fn report() {
        console::option(MapOption {
            name: String::from("OverflowDivisor"),
            default: DEFAULT_OVERFLOW_DIVISOR.to_string(),
            min: Some(2),
            max: None,
        });
    }

    pub fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<String, String> {
        match name {
            "OverflowDivisor" => match value.map(|x| x.parse::<u64>()) {
                Some(Ok(divisor)) if divisor >= 2 => {
                    self.overflow_divisor = divisor;
                    Ok(String::from("OverflowDivisor"))
                }
                _ => Err(format!("Bad argument for OverflowDivisor")),
            },
            _ => Err(format!("No such Option: {name}")),
        }
    }
}
