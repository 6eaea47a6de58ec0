//! Symbolic memory configuration
//!
//! Controls seed naming and the numbering of addresses and slot-identities.
//! Seed names end up verbatim in solver queries, so two memories built with
//! the same config produce syntactically identical pool seeds.

use super::error::{ConfigError, ConfigResult};
use super::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Upper bound accepted for `max_addresses`
pub const MAX_ADDRESSES_LIMIT: usize = 100_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Seed variable name of the address chain
    pub address_chain_name: String,

    /// Prefix of every pool seed variable name
    pub seed_prefix: String,

    /// First logical address handed out (>= 0)
    pub first_address: i64,

    /// First slot-identity in every pool (>= 0)
    pub first_slot_id: i64,

    /// Addresses one memory may hand out (1..=100000000)
    pub max_addresses: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            address_chain_name: "$addr".to_string(),
            seed_prefix: "$".to_string(),
            first_address: 1,
            first_slot_id: 1,
            max_addresses: 1_000_000,
        }
    }
}

impl MemoryConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.address_chain_name.is_empty() {
            return Err(ConfigError::Validation(
                "address_chain_name must not be empty".to_string(),
            ));
        }

        if self.seed_prefix.is_empty() {
            return Err(ConfigError::Validation(
                "seed_prefix must not be empty".to_string(),
            ));
        }

        if collides_with_seed(&self.address_chain_name, &self.seed_prefix) {
            return Err(ConfigError::Validation(format!(
                "address_chain_name '{}' collides with a pool seed name",
                self.address_chain_name
            )));
        }

        if self.max_addresses == 0 || self.max_addresses > MAX_ADDRESSES_LIMIT {
            return Err(ConfigError::range_with_hint(
                "max_addresses",
                self.max_addresses,
                1,
                MAX_ADDRESSES_LIMIT,
                "A run needs at least one address and a finite address space",
            ));
        }

        // Every address and every slot of a pool must stay representable
        let last_start = i64::MAX - self.max_addresses as i64;

        if !(0..=last_start).contains(&self.first_address) {
            return Err(ConfigError::range_with_hint(
                "first_address",
                self.first_address,
                0,
                last_start,
                "Addresses are non-negative and leave room for max_addresses more",
            ));
        }

        if !(0..=last_start).contains(&self.first_slot_id) {
            return Err(ConfigError::range_with_hint(
                "first_slot_id",
                self.first_slot_id,
                0,
                last_start,
                "Slot identities are non-negative and leave room for max_addresses more",
            ));
        }

        Ok(())
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Builder: Set address_chain_name
    pub fn address_chain_name(mut self, v: impl Into<String>) -> Self {
        self.address_chain_name = v.into();
        self
    }

    /// Builder: Set seed_prefix
    pub fn seed_prefix(mut self, v: impl Into<String>) -> Self {
        self.seed_prefix = v.into();
        self
    }

    /// Builder: Set first_address
    pub fn first_address(mut self, v: i64) -> Self {
        self.first_address = v;
        self
    }

    /// Builder: Set first_slot_id
    pub fn first_slot_id(mut self, v: i64) -> Self {
        self.first_slot_id = v;
        self
    }

    /// Builder: Set max_addresses
    pub fn max_addresses(mut self, v: usize) -> Self {
        self.max_addresses = v;
        self
    }
}

/// Whether `name` has the shape of a pool seed built with `prefix`.
///
/// Primitive and array seeds are `<prefix><type>`; field seeds are
/// `<prefix><schema>.<index><prefix><field type>`.
fn collides_with_seed(name: &str, prefix: &str) -> bool {
    let Some(rest) = name.strip_prefix(prefix) else {
        return false;
    };
    if matches!(rest, "int" | "float" | "bool") || rest.starts_with("array[") {
        return true;
    }

    rest.match_indices('.').any(|(dot, _)| {
        let tail = &rest[dot + 1..];
        let digits = tail.bytes().take_while(u8::is_ascii_digit).count();
        dot > 0
            && digits > 0
            && tail[digits..]
                .strip_prefix(prefix)
                .is_some_and(is_field_type)
    })
}

fn is_field_type(render: &str) -> bool {
    matches!(render, "int" | "float" | "bool")
        || render.starts_with("array[")
        || render.starts_with("ref<")
}

impl Validatable for MemoryConfig {
    fn validate(&self) -> ConfigResult<()> {
        MemoryConfig::validate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidatableCollection;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_are_valid() {
        let config = MemoryConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.address_chain_name, "$addr");
        assert_eq!(config.first_address, 1);
    }

    #[test]
    fn test_max_addresses_range() {
        let err = MemoryConfig::default().max_addresses(0).validate().unwrap_err();
        assert!(matches!(err, ConfigError::Range { ref field, .. } if field == "max_addresses"));

        let err = MemoryConfig::default()
            .max_addresses(MAX_ADDRESSES_LIMIT + 1)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Range { .. }));
    }

    #[test]
    fn test_negative_numbering_rejected() {
        assert!(MemoryConfig::default().first_address(-1).validate().is_err());
        assert!(MemoryConfig::default().first_slot_id(-5).validate().is_err());
    }

    #[test]
    fn test_numbering_leaves_room_for_every_address() {
        let err = MemoryConfig::default()
            .first_slot_id(i64::MAX)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Range { ref field, .. } if field == "first_slot_id"));

        let err = MemoryConfig::default()
            .first_address(i64::MAX)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Range { ref field, .. } if field == "first_address"));

        let edge = i64::MAX - 10;
        let config = MemoryConfig::default()
            .max_addresses(10)
            .first_address(edge)
            .first_slot_id(edge);
        assert!(config.validate().is_ok());
        assert!(config.first_slot_id(edge + 1).validate().is_err());
    }

    #[test]
    fn test_chain_name_must_not_shadow_pool() {
        let err = MemoryConfig::default()
            .address_chain_name("$int")
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(MemoryConfig::default().address_chain_name("").validate().is_err());
        assert!(MemoryConfig::default()
            .address_chain_name("$array[bool]")
            .validate()
            .is_err());
    }

    #[test]
    fn test_chain_name_must_not_shadow_field_seed() {
        for taken in ["$Foo.1$int", "$a.b.0$ref<Bar>", "$Holder.12$array[int]"] {
            assert!(
                MemoryConfig::default().address_chain_name(taken).validate().is_err(),
                "{taken} should collide"
            );
        }
        for free in ["$addr", "$Foo.x$int", "$Foo.1", "$.1$int", "$Foo.1$object"] {
            assert!(
                MemoryConfig::default().address_chain_name(free).validate().is_ok(),
                "{free} should be accepted"
            );
        }
    }

    #[test]
    fn test_yaml_partial_document_uses_defaults() {
        let config = MemoryConfig::from_yaml_str("seed_prefix: \"#\"\nfirst_slot_id: 0\n").unwrap();
        assert_eq!(config.seed_prefix, "#");
        assert_eq!(config.first_slot_id, 0);
        assert_eq!(config.max_addresses, 1_000_000);
    }

    #[test]
    fn test_yaml_round_trip_and_errors() {
        let config = MemoryConfig::default().max_addresses(64);
        let yaml = config.to_yaml_string().unwrap();
        assert!(yaml.contains("max_addresses: 64"));
        assert_eq!(MemoryConfig::from_yaml_str(&yaml).unwrap(), config);

        assert!(matches!(
            MemoryConfig::from_yaml_str("max_addresses: [1, 2]"),
            Err(ConfigError::Yaml(_))
        ));
        assert!(matches!(
            MemoryConfig::from_yaml_str("max_addresses: 0"),
            Err(ConfigError::Range { .. })
        ));
    }

    #[test]
    fn test_validate_all() {
        let configs = vec![MemoryConfig::default(), MemoryConfig::default().seed_prefix("")];
        assert!(configs.validate_all().is_err());
    }
}
