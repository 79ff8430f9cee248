// src/credentials/mod.rs
pub mod generator;

use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::common::utils;
use crate::error::ConfigError;

pub use generator::{GenerationRule, DEFAULT_GENERATION_CAP, MAX_GENERATION_CAP};

/// One (login, password) combination to try.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CredentialPair {
    pub login: String,
    pub password: String,
}

impl CredentialPair {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        CredentialPair {
            login: login.into(),
            password: password.into(),
        }
    }
}

impl fmt::Display for CredentialPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Login: {}, Password: {}", self.login, self.password)
    }
}

/// Where logins and passwords come from.
///
/// An explicit login wins over a login file. An explicit password wins over
/// a generation rule, which wins over a password file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialSpec {
    pub login: Option<String>,
    pub login_file: Option<PathBuf>,
    pub password: Option<String>,
    pub password_file: Option<PathBuf>,
    pub generate: Option<GenerationRule>,
    pub generation_cap: usize,
    pub seed: Option<u64>,
}

impl Default for CredentialSpec {
    fn default() -> Self {
        CredentialSpec {
            login: None,
            login_file: None,
            password: None,
            password_file: None,
            generate: None,
            generation_cap: DEFAULT_GENERATION_CAP,
            seed: None,
        }
    }
}

impl CredentialSpec {
    pub fn logins(&self) -> Result<Vec<String>, ConfigError> {
        if let Some(login) = &self.login {
            return Ok(vec![login.clone()]);
        }
        match &self.login_file {
            Some(path) => read_list(path),
            None => Err(ConfigError::MissingLogins),
        }
    }

    pub fn passwords(&self) -> Result<Vec<String>, ConfigError> {
        if let Some(password) = &self.password {
            return Ok(vec![password.clone()]);
        }
        if let Some(rule) = &self.generate {
            let mut rng = match self.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let passwords = rule.generate(self.generation_cap, &mut rng);
            info!(
                "Generated {} passwords from rule {} (space of {} candidates)",
                passwords.len(),
                rule,
                rule.space_size()
            );
            return Ok(passwords);
        }
        match &self.password_file {
            Some(path) => read_list(path),
            None => Err(ConfigError::MissingPasswords),
        }
    }

    /// Resolves both sides and pairs every login with every password.
    pub fn load(&self) -> Result<Vec<CredentialPair>, ConfigError> {
        let logins = self.logins()?;
        let passwords = self.passwords()?;
        Ok(cross_product(&logins, &passwords))
    }
}

/// Pairs every login with every password, login-major, keeping duplicates.
pub fn cross_product(logins: &[String], passwords: &[String]) -> Vec<CredentialPair> {
    let mut pairs = Vec::with_capacity(logins.len() * passwords.len());
    for login in logins {
        for password in passwords {
            pairs.push(CredentialPair::new(login.as_str(), password.as_str()));
        }
    }
    pairs
}

fn read_list(path: &Path) -> Result<Vec<String>, ConfigError> {
    let lines = utils::read_lines_from_file(path).map_err(|source| ConfigError::ListFile {
        path: path.to_path_buf(),
        source,
    })?;
    if lines.is_empty() {
        warn!("List file {} has no usable lines", path.display());
    } else {
        debug!("Loaded {} entries from {}", lines.len(), path.display());
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_cross_product_size_and_duplicates() {
        let logins = strings(&["admin", "root", "admin"]);
        let passwords = strings(&["x", "y"]);
        let pairs = cross_product(&logins, &passwords);
        assert_eq!(pairs.len(), 6);
        assert_eq!(pairs[0], CredentialPair::new("admin", "x"));
        assert_eq!(pairs[3], CredentialPair::new("root", "y"));
        assert_eq!(pairs.iter().filter(|p| p.login == "admin").count(), 4);
    }

    #[test]
    fn test_list_files_keep_file_order() {
        let dir = TempDir::new().unwrap();
        let users = dir.path().join("users.txt");
        let words = dir.path().join("words.txt");
        fs::write(&users, "  alice \n\nbob\n   \n").unwrap();
        fs::write(&words, "#hash\npw1\n").unwrap();

        let spec = CredentialSpec {
            login_file: Some(users),
            password_file: Some(words),
            ..CredentialSpec::default()
        };
        let pairs = spec.load().unwrap();
        assert_eq!(
            pairs,
            vec![
                CredentialPair::new("alice", "#hash"),
                CredentialPair::new("alice", "pw1"),
                CredentialPair::new("bob", "#hash"),
                CredentialPair::new("bob", "pw1"),
            ]
        );
    }

    #[test]
    fn test_explicit_values_take_precedence() {
        let spec = CredentialSpec {
            login: Some("admin".into()),
            login_file: Some(PathBuf::from("/nonexistent/users.txt")),
            password: Some("secret".into()),
            generate: Some("1:1:ab".parse().unwrap()),
            ..CredentialSpec::default()
        };
        assert_eq!(spec.load().unwrap(), vec![CredentialPair::new("admin", "secret")]);
    }

    #[test]
    fn test_generation_wins_over_password_file() {
        let spec = CredentialSpec {
            login: Some("admin".into()),
            password_file: Some(PathBuf::from("/nonexistent/words.txt")),
            generate: Some("1:1:ab".parse().unwrap()),
            seed: Some(9),
            ..CredentialSpec::default()
        };
        let mut passwords: Vec<String> = spec.load().unwrap().into_iter().map(|p| p.password).collect();
        passwords.sort();
        assert_eq!(passwords, vec!["a", "b"]);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let spec = CredentialSpec {
            login_file: Some(PathBuf::from("/nonexistent/users.txt")),
            password: Some("x".into()),
            ..CredentialSpec::default()
        };
        assert!(matches!(spec.load(), Err(ConfigError::ListFile { .. })));
    }

    #[test]
    fn test_one_sided_input_is_config_error() {
        let only_logins = CredentialSpec {
            login: Some("admin".into()),
            ..CredentialSpec::default()
        };
        assert!(matches!(only_logins.load(), Err(ConfigError::MissingPasswords)));

        let only_passwords = CredentialSpec {
            password: Some("x".into()),
            ..CredentialSpec::default()
        };
        assert!(matches!(only_passwords.load(), Err(ConfigError::MissingLogins)));
    }

    #[test]
    fn test_display_matches_output_line() {
        let pair = CredentialPair::new("admin", "secret");
        assert_eq!(pair.to_string(), "Login: admin, Password: secret");
    }
}
