use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::domain::order::ItemField;
use crate::flows::FlowTransitionError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("pending item is incomplete, missing {missing:?}")]
    IncompleteItem { missing: Vec<ItemField> },
    #[error("there is no item under construction")]
    NoPendingItem,
    #[error("item index {index} is out of range for {len} cart lines")]
    ItemOutOfRange { index: usize, len: usize },
    #[error("quantity must be a positive integer, got {quantity}")]
    InvalidQuantity { quantity: u32 },
    #[error(transparent)]
    FlowTransition(#[from] FlowTransitionError),
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("catalog failure: {0}")]
    Catalog(#[from] CatalogError),
    #[error("configuration failure: {0}")]
    Configuration(#[from] ConfigError),
}

impl ApplicationError {
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Domain(_) => "domain",
            Self::Catalog(_) => "catalog",
            Self::Configuration(_) => "config_validation",
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::CatalogError;
    use crate::config::ConfigError;
    use crate::errors::{ApplicationError, DomainError};

    #[test]
    fn domain_errors_render_actionable_messages() {
        let error = DomainError::ItemOutOfRange { index: 4, len: 2 };
        assert_eq!(error.to_string(), "item index 4 is out of range for 2 cart lines");
    }

    #[test]
    fn application_errors_carry_error_class() {
        let config = ApplicationError::from(ConfigError::Validation("bad level".to_owned()));
        assert_eq!(config.error_class(), "config_validation");

        let catalog = ApplicationError::from(CatalogError::MissingEntry {
            category: "colors",
            tag: "GRIS",
        });
        assert_eq!(catalog.error_class(), "catalog");
        assert!(catalog.to_string().contains("GRIS"));
    }
}
