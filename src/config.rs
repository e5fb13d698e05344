use serde::{Deserialize, Serialize};

use crate::error::AccountError;
use crate::identity::Address;
use crate::request::DigestScheme;

/// Deployment-wide protocol configuration: which identity orchestrates,
/// which targets are privileged, and which digest convention signatures
/// cover. Injected at construction so tests can substitute fakes; nothing
/// here is a compile-time constant.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProtocolConfig {
    pub orchestrator: Address,
    #[serde(default)]
    pub system_targets: Vec<Address>,
    #[serde(default)]
    pub digest_scheme: DigestScheme,
}

impl ProtocolConfig {
    pub fn new(orchestrator: Address) -> Self {
        Self {
            orchestrator,
            system_targets: Vec::new(),
            digest_scheme: DigestScheme::default(),
        }
    }

    pub fn with_system_target(mut self, target: Address) -> Self {
        self.system_targets.push(target);
        self
    }

    pub fn with_digest_scheme(mut self, scheme: DigestScheme) -> Self {
        self.digest_scheme = scheme;
        self
    }

    pub fn is_system_target(&self, target: Address) -> bool {
        self.system_targets.contains(&target)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, AccountError> {
        toml::from_str(s).map_err(|e| AccountError::Config(e.to_string()))
    }

    pub fn load(path: &str) -> Result<Self, AccountError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| AccountError::Config(e.to_string()))?;
        Self::from_toml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_toml() {
        let toml = r#"
            orchestrator = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"
            system_targets = ["0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee"]
            digest_scheme = "domain_prefixed"
        "#;
        let config = ProtocolConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.orchestrator, Address([0xaa; 20]));
        assert!(config.is_system_target(Address([0xee; 20])));
        assert_eq!(config.digest_scheme, DigestScheme::DomainPrefixed);
    }

    #[test]
    fn test_defaults_are_optional() {
        let toml = r#"orchestrator = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa""#;
        let config = ProtocolConfig::from_toml_str(toml).unwrap();
        assert!(config.system_targets.is_empty());
        assert_eq!(config.digest_scheme, DigestScheme::Raw);
    }

    #[test]
    fn test_bad_toml_is_a_config_error() {
        let err = ProtocolConfig::from_toml_str("orchestrator = 5").unwrap_err();
        assert!(matches!(err, AccountError::Config(_)));
    }
}
