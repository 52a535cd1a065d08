//! Configuration module for brawlbrief.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    CatalogSettings, FilterSettings, GeneralSettings, OracleSettings, RagSettings, Settings,
    StorageSettings,
};
