use crate::cli_messages::{MessageKind, print_message};
use crate::config::Config;
use crate::consts::cli_consts::{ENVIRONMENT_VAR, LOCAL_BASE_URL};
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Which dashboard server the CLI talks to.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Environment {
    /// Development server on this machine.
    #[default]
    Local,
    /// Any other deployment, identified by its dashboard base URL.
    Custom { base_url: String },
}

impl Environment {
    /// Returns the dashboard base URL associated with the environment.
    pub fn base_url(&self) -> String {
        match self {
            Environment::Local => LOCAL_BASE_URL.to_string(),
            Environment::Custom { base_url } => base_url.clone(),
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("local") {
            return Ok(Environment::Local);
        }
        if s.starts_with("http://") || s.starts_with("https://") {
            return Ok(Environment::Custom {
                base_url: s.to_string(),
            });
        }
        Err(format!(
            "unknown environment '{}' (expected 'local' or an http(s) URL)",
            s
        ))
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Local => write!(f, "Local"),
            Environment::Custom { base_url } => write!(f, "Custom ({})", base_url),
        }
    }
}

impl Debug for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Environment::{}, URL: {}", self, self.base_url())
    }
}

/// Dashboard base URL: command-line flag, then config file, then the
/// environment variable value, then the local development server.
pub fn resolve_base_url(flag: Option<String>, config: &Config, env_value: Option<&str>) -> String {
    flag.or_else(|| config.base_url.clone())
        .or_else(|| {
            env_value
                .filter(|value| !value.trim().is_empty())
                .and_then(|value| match value.parse::<Environment>() {
                    Ok(environment) => Some(environment.base_url()),
                    Err(e) => {
                        print_message(
                            MessageKind::Warn,
                            "Ignoring environment",
                            &format!("{}: {}", ENVIRONMENT_VAR, e),
                        );
                        None
                    }
                })
        })
        .unwrap_or_else(|| Environment::default().base_url())
}
