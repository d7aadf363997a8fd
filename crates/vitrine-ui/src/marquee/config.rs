use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Travel direction of the content.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Direction {
    #[default]
    Left,
    Right,
}

impl Direction {
    /// Sign applied to the speed when integrating position.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

impl FromStr for Direction {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(ConfigError::InvalidDirection(s.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Left => "left",
            Direction::Right => "right",
        })
    }
}

/// Ticker settings, fixed at construction (speed and direction have setters
/// on the engine).
#[derive(Debug, Clone, PartialEq)]
pub struct TickerConfig {
    /// Pixels per second, > 0.
    pub speed_px_per_second: f64,
    /// Pause while the pointer is over (or a finger is on) the track.
    pub pause_on_hover: bool,
    pub direction: Direction,
    /// Spacing counted after every item when measuring content, >= 0.
    pub gap_px: f64,
    pub auto_start: bool,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            speed_px_per_second: 50.0,
            pause_on_hover: true,
            direction: Direction::Left,
            gap_px: 20.0,
            auto_start: true,
        }
    }
}

impl TickerConfig {
    pub fn speed(mut self, px_per_second: f64) -> Self {
        self.speed_px_per_second = px_per_second;
        self
    }

    pub fn pause_on_hover(mut self, on: bool) -> Self {
        self.pause_on_hover = on;
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn gap(mut self, px: f64) -> Self {
        self.gap_px = px;
        self
    }

    pub fn auto_start(mut self, on: bool) -> Self {
        self.auto_start = on;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_speed(self.speed_px_per_second)?;
        if !(self.gap_px.is_finite() && self.gap_px >= 0.0) {
            return Err(ConfigError::InvalidGap(self.gap_px));
        }
        Ok(())
    }
}

pub(crate) fn validate_speed(px_per_second: f64) -> Result<(), ConfigError> {
    if px_per_second.is_finite() && px_per_second > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidSpeed(px_per_second))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = TickerConfig::default();
        assert_eq!(c.speed_px_per_second, 50.0);
        assert!(c.pause_on_hover);
        assert_eq!(c.direction, Direction::Left);
        assert_eq!(c.gap_px, 20.0);
        assert!(c.auto_start);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_bad_speed_and_gap() {
        assert_eq!(TickerConfig::default().speed(0.0).validate(), Err(ConfigError::InvalidSpeed(0.0)));
        assert!(TickerConfig::default().speed(f64::NAN).validate().is_err());
        assert_eq!(TickerConfig::default().gap(-1.0).validate(), Err(ConfigError::InvalidGap(-1.0)));
        assert!(TickerConfig::default().gap(0.0).validate().is_ok());
    }

    #[test]
    fn direction_parses_case_insensitively() {
        assert_eq!("Right".parse::<Direction>(), Ok(Direction::Right));
        assert!("up".parse::<Direction>().is_err());
        assert_eq!(Direction::Left.to_string(), "left");
    }
}
