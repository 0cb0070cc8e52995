//! Client configuration from environment and command line.

use std::path::PathBuf;

use anyhow::{anyhow, Result};

use crate::api::ApiConfig;
use crate::types::CreateGameRequest;

pub const DEFAULT_LOG_FILE: &str = "tetris-client.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub level: u32,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Attach to an existing game instead of creating one.
    pub resume: Option<u64>,
    pub log_path: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            level: 1,
            width: None,
            height: None,
            resume: None,
            log_path: None,
        }
    }
}

impl ClientConfig {
    /// Create from environment variables.
    pub fn from_env() -> Self {
        use std::env;

        let level = env::var("TETRIS_START_LEVEL")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1);

        let log_path = env::var("TETRIS_LOG_PATH")
            .ok()
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) });

        Self {
            api: ApiConfig::from_env(),
            level,
            log_path,
            ..Self::default()
        }
    }

    /// Override settings from command line arguments (program name excluded).
    pub fn apply_args(mut self, args: &[String]) -> Result<Self> {
        let mut i = 0usize;
        while i < args.len() {
            let flag = args[i].as_str();
            let value = |i: usize| {
                args.get(i + 1)
                    .ok_or_else(|| anyhow!("missing value for {}", flag))
            };
            match flag {
                "--level" => {
                    let v = value(i)?;
                    self.level = parse_positive(flag, v)?;
                    i += 1;
                }
                "--width" => {
                    let v = value(i)?;
                    self.width = Some(parse_positive(flag, v)?);
                    i += 1;
                }
                "--height" => {
                    let v = value(i)?;
                    self.height = Some(parse_positive(flag, v)?);
                    i += 1;
                }
                "--game" => {
                    let v = value(i)?;
                    self.resume = Some(
                        v.parse::<u64>()
                            .map_err(|_| anyhow!("invalid --game value: {}", v))?,
                    );
                    i += 1;
                }
                "--url" => {
                    let v = value(i)?;
                    self.api.base_url = v.trim_end_matches('/').to_string();
                    i += 1;
                }
                "--log" => {
                    let v = value(i)?;
                    self.log_path = Some(v.clone());
                    i += 1;
                }
                other => return Err(anyhow!("unknown argument: {}", other)),
            }
            i += 1;
        }
        Ok(self)
    }

    /// Where logs go: the configured path, or `tetris-client.log` in the
    /// system temp directory. Never the terminal, which is in raw mode.
    pub fn log_file(&self) -> PathBuf {
        match &self.log_path {
            Some(path) => PathBuf::from(path),
            None => std::env::temp_dir().join(DEFAULT_LOG_FILE),
        }
    }

    pub fn create_request(&self) -> CreateGameRequest {
        CreateGameRequest {
            level: self.level,
            width: self.width,
            height: self.height,
        }
    }
}

fn parse_positive(flag: &str, v: &str) -> Result<u32> {
    match v.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(anyhow!("invalid {} value: {}", flag, v)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_all_flags() {
        let c = ClientConfig::default()
            .apply_args(&args(&[
                "--level", "5", "--width", "12", "--height", "22", "--game", "31", "--url",
                "http://h:1/", "--log", "/tmp/t.log",
            ]))
            .unwrap();
        assert_eq!(c.level, 5);
        assert_eq!(c.width, Some(12));
        assert_eq!(c.height, Some(22));
        assert_eq!(c.resume, Some(31));
        assert_eq!(c.api.base_url, "http://h:1");
        assert_eq!(c.log_path.as_deref(), Some("/tmp/t.log"));
        assert_eq!(
            c.create_request(),
            CreateGameRequest {
                level: 5,
                width: Some(12),
                height: Some(22)
            }
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert!(ClientConfig::default().apply_args(&args(&["--level"])).is_err());
        assert!(ClientConfig::default().apply_args(&args(&["--level", "0"])).is_err());
        assert!(ClientConfig::default().apply_args(&args(&["--game", "x"])).is_err());
        assert!(ClientConfig::default().apply_args(&args(&["--frobnicate"])).is_err());
    }

    #[test]
    fn log_file_defaults_to_temp_dir() {
        let c = ClientConfig::default();
        assert_eq!(c.log_file(), std::env::temp_dir().join(DEFAULT_LOG_FILE));

        let c = ClientConfig {
            log_path: Some("/var/tmp/t.log".to_string()),
            ..ClientConfig::default()
        };
        assert_eq!(c.log_file(), PathBuf::from("/var/tmp/t.log"));
    }

    #[test]
    fn config_from_env() {
        // Ensures it doesn't panic
        let c = ClientConfig::from_env();
        assert_eq!(c.resume, None);
        assert!(!c.api.base_url.ends_with('/'));
    }

    #[test]
    fn no_args_keeps_defaults() {
        let c = ClientConfig::default().apply_args(&[]).unwrap();
        assert_eq!(c, ClientConfig::default());
    }
}
