//! Runtime options (`setoption name X value Y`).
//!
//! One `EngineOptions` value is owned by the front end and handed by
//! reference to the codec and evaluator, so tests can vary options per case.

use super::tunables::Tunables;
use crate::error::OptionError;
use crate::search::tablebase::SyzygySettings;
use tracing::{debug, info};

pub const DEFAULT_HASH_MB: usize = 16;
pub const MAX_HASH_MB: usize = 65536;

/// How castling moves are written in coordinate notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CastlingNotation {
    /// King hops two squares: `e1g1`
    #[default]
    Standard,
    /// King moves onto its own rook: `e1h1` (Chess960)
    KingTakesRook,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// `UCI_Chess960`
    pub chess960: bool,
    /// `Hash`, in megabytes
    pub hash_mb: usize,
    pub syzygy: SyzygySettings,
    pub tunables: Tunables,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            chess960: false,
            hash_mb: DEFAULT_HASH_MB,
            syzygy: SyzygySettings::default(),
            tunables: Tunables::default(),
        }
    }
}

impl EngineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn castling_notation(&self) -> CastlingNotation {
        if self.chess960 {
            CastlingNotation::KingTakesRook
        } else {
            CastlingNotation::Standard
        }
    }

    /// Apply one option. Names are case-insensitive.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), OptionError> {
        let value = value.trim();
        match name.trim().to_lowercase().as_str() {
            "uci_chess960" => self.chess960 = parse_bool(name, value)?,
            "hash" => self.hash_mb = parse_spin(name, value, 1, MAX_HASH_MB as i64)? as usize,
            "syzygypath" => {
                self.syzygy.path = match value {
                    "" | "<empty>" => None,
                    path => Some(path.to_string()),
                }
            }
            "syzygyprobedepth" => {
                self.syzygy.probe_depth = parse_spin(name, value, 0, 127)? as i32;
            }
            "syzygyprobelimit" => {
                self.syzygy.probe_limit = parse_spin(name, value, 0, 7)? as u32;
            }
            _ => {
                let Some(tunable) = self.tunables.get(name.trim()) else {
                    return Err(OptionError::UnknownOption {
                        name: name.to_string(),
                    });
                };
                let (min, max) = tunable.bounds();
                let parsed = parse_spin(name, value, min.into(), max.into())? as i32;
                self.tunables.set(name.trim(), parsed)?;
            }
        }
        info!(option = name, value, "option set");
        Ok(())
    }

    /// Apply a full `setoption` command line.
    pub fn apply_setoption(&mut self, line: &str) -> Result<(), OptionError> {
        let (name, value) = parse_setoption(line);
        debug!(%name, ?value, "setoption");
        self.set_option(&name, value.as_deref().unwrap_or(""))
    }

    /// `option name ...` lines announced in reply to `uci`.
    pub fn uci_option_lines(&self) -> Vec<String> {
        let defaults = Self::default();
        let mut lines = vec![
            format!(
                "option name Hash type spin default {} min 1 max {}",
                defaults.hash_mb, MAX_HASH_MB
            ),
            format!(
                "option name UCI_Chess960 type check default {}",
                defaults.chess960
            ),
            "option name SyzygyPath type string default <empty>".to_string(),
            format!(
                "option name SyzygyProbeDepth type spin default {} min 0 max 127",
                defaults.syzygy.probe_depth
            ),
            format!(
                "option name SyzygyProbeLimit type spin default {} min 0 max 7",
                defaults.syzygy.probe_limit
            ),
        ];
        lines.extend(self.tunables.iter().map(|t| t.uci_line()));
        lines
    }
}

/// Split `setoption name <name...> value <value...>` into its parts.
fn parse_setoption(line: &str) -> (String, Option<String>) {
    let mut name = String::new();
    let mut value: Option<String> = None;
    let mut parsing_name = false;
    let mut parsing_value = false;

    for token in line.split_whitespace().skip_while(|t| *t == "setoption") {
        match token {
            "name" if !parsing_value => {
                parsing_name = true;
            }
            "value" if parsing_name => {
                parsing_name = false;
                parsing_value = true;
            }
            _ if parsing_name => {
                if !name.is_empty() {
                    name.push(' ');
                }
                name.push_str(token);
            }
            _ if parsing_value => {
                let v = value.get_or_insert_with(String::new);
                if !v.is_empty() {
                    v.push(' ');
                }
                v.push_str(token);
            }
            _ => {}
        }
    }
    (name, value)
}

fn parse_bool(name: &str, value: &str) -> Result<bool, OptionError> {
    match value.to_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(OptionError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
            expected: "true or false",
        }),
    }
}

fn parse_spin(name: &str, value: &str, min: i64, max: i64) -> Result<i64, OptionError> {
    let parsed = value.parse::<i64>().map_err(|_| OptionError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
        expected: "an integer",
    })?;
    if !(min..=max).contains(&parsed) {
        return Err(OptionError::OutOfRange {
            name: name.to_string(),
            value: parsed,
            min,
            max,
        });
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Piece;

    #[test]
    fn test_chess960_toggles_notation() {
        let mut options = EngineOptions::new();
        assert_eq!(options.castling_notation(), CastlingNotation::Standard);
        options.set_option("UCI_Chess960", "true").expect("valid");
        assert_eq!(options.castling_notation(), CastlingNotation::KingTakesRook);
        assert!(options.set_option("uci_chess960", "maybe").is_err());
    }

    #[test]
    fn test_setoption_line() {
        crate::init_test_tracing();
        let mut options = EngineOptions::new();
        options
            .apply_setoption("setoption name Hash value 64")
            .expect("valid");
        assert_eq!(options.hash_mb, 64);

        options
            .apply_setoption("setoption name SyzygyPath value /tb/wdl /tb/dtz")
            .expect("valid");
        assert_eq!(options.syzygy.path.as_deref(), Some("/tb/wdl /tb/dtz"));

        options
            .apply_setoption("setoption name SeeKnightScore value 500")
            .expect("valid");
        assert_eq!(options.tunables.piece_value(Piece::Knight), 500);
    }

    #[test]
    fn test_errors() {
        let mut options = EngineOptions::new();
        assert!(matches!(
            options.set_option("SeeKingScore", "0"),
            Err(OptionError::UnknownOption { .. })
        ));
        assert_eq!(
            options.set_option("Contempt", "10"),
            Err(OptionError::UnknownOption {
                name: "Contempt".to_string()
            })
        );
        assert!(matches!(
            options.set_option("Hash", "0"),
            Err(OptionError::OutOfRange { .. })
        ));
        assert!(matches!(
            options.set_option("Hash", "lots"),
            Err(OptionError::InvalidValue { .. })
        ));
        assert_eq!(options.hash_mb, DEFAULT_HASH_MB);
    }

    #[test]
    fn test_option_lines_cover_tunables() {
        let lines = EngineOptions::new().uci_option_lines();
        assert!(lines.iter().any(|l| l.starts_with("option name UCI_Chess960")));
        assert!(lines.iter().any(|l| l.contains("MaterialScaleBase")));
        assert!(lines.iter().any(|l| l.contains("SeePawnScore")));
        assert!(!lines.iter().any(|l| l.contains("SeeKingScore")));
    }
}
