//! The brawler catalog: the canonical allow-list of character names.
//!
//! The catalog serves two purposes: it is serialized into the extraction
//! prompt so the oracle can correct misheard names against it, and it is the
//! reference the mention filter checks extracted names against afterwards.

use crate::error::{BriefError, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Official brawler roster. Order is kept as shipped in-game (by rarity wave)
/// so prompt output stays stable across runs.
const BUILTIN_BRAWLERS: &[&str] = &[
    "Shelly", "Nita", "Colt", "Bull", "Brock", "El Primo", "Barley", "Poco",
    "Rosa", "Jessie", "Dynamike", "Tick", "8-Bit", "Rico", "Darryl", "Penny",
    "Carl", "Jacky", "Gus", "Bo", "Emz", "Stu", "Piper", "Pam", "Frank",
    "Bibi", "Bea", "Nani", "Edgar", "Griff", "Grom", "Bonnie", "Gale",
    "Colette", "Belle", "Ash", "Lola", "Sam", "Mandy", "Maisie", "Hank",
    "Pearl", "Larry & Lawrie", "Angelo", "Berry", "Mortis", "Tara", "Gene",
    "Max", "Mr. P", "Sprout", "Byron", "Squeak", "Lou", "Colonel Ruffs",
    "Buzz", "Fang", "Eve", "Janet", "Otis", "Buster", "Gray", "R-T",
    "Willow", "Doug", "Chuck", "Charlie", "Mico", "Melodie", "Lily",
    "Clancy", "Moe", "Spike", "Crow", "Leon", "Sandy", "Amber", "Meg",
    "Surge", "Chester", "Cordelius", "Kit", "Draco", "Kenji", "Juju",
    "Shade", "Meeple", "Ollie", "Lumi", "Finx", "Jae-yong",
];

/// Immutable allow-list of valid brawler names.
///
/// Constructed once at startup and shared read-only across runs.
#[derive(Debug, Clone)]
pub struct BrawlerCatalog {
    names: Vec<String>,
    exact: HashSet<String>,
    lowered: HashSet<String>,
}

/// On-disk shape for a custom catalog file.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    brawlers: Vec<String>,
}

impl BrawlerCatalog {
    /// Build the catalog from the embedded roster.
    pub fn builtin() -> Self {
        Self::from_names(BUILTIN_BRAWLERS.iter().map(|s| s.to_string()))
            .expect("builtin roster has no duplicates")
    }

    /// Build a catalog from an explicit name list.
    ///
    /// Fails if any name appears more than once: the allow-list must define
    /// each name exactly once.
    pub fn from_names(names: impl IntoIterator<Item = String>) -> Result<Self> {
        let names: Vec<String> = names.into_iter().collect();
        let mut exact = HashSet::with_capacity(names.len());
        let mut lowered = HashSet::with_capacity(names.len());

        for name in &names {
            if !exact.insert(name.clone()) {
                return Err(BriefError::InvalidInput(format!(
                    "Duplicate catalog entry: {}",
                    name
                )));
            }
            lowered.insert(name.to_lowercase());
        }

        Ok(Self {
            names,
            exact,
            lowered,
        })
    }

    /// Load the catalog, using a custom TOML file if configured.
    ///
    /// The file replaces the builtin roster entirely; it must contain a
    /// `brawlers = [...]` array.
    pub fn load(custom_path: Option<&str>) -> Result<Self> {
        match custom_path {
            Some(path) => {
                let expanded = shellexpand::tilde(path).to_string();
                let path = Path::new(&expanded);
                if !path.exists() {
                    return Err(BriefError::Config(format!(
                        "Catalog file not found: {}",
                        path.display()
                    )));
                }
                let content = std::fs::read_to_string(path)?;
                let file: CatalogFile = toml::from_str(&content)?;
                Self::from_names(file.brawlers)
            }
            None => Ok(Self::builtin()),
        }
    }

    /// Exact, case-sensitive membership check.
    pub fn contains(&self, name: &str) -> bool {
        self.exact.contains(name)
    }

    /// Case-insensitive membership check, for the relaxed filter policy.
    pub fn contains_ignore_case(&self, name: &str) -> bool {
        self.lowered.contains(&name.to_lowercase())
    }

    /// All names, in catalog order.
    pub fn all(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Serialize the roster for embedding in the extraction prompt.
    pub fn prompt_list(&self) -> String {
        self.names.join(", ")
    }
}

impl Default for BrawlerCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_contains_known_names() {
        let catalog = BrawlerCatalog::builtin();
        assert!(catalog.contains("Leon"));
        assert!(catalog.contains("El Primo"));
        assert!(catalog.contains("Larry & Lawrie"));
        assert!(!catalog.contains("Leom"));
    }

    #[test]
    fn test_contains_is_case_sensitive() {
        let catalog = BrawlerCatalog::builtin();
        assert!(!catalog.contains("leon"));
        assert!(catalog.contains_ignore_case("LEON"));
        assert!(!catalog.contains_ignore_case("leom"));
    }

    #[test]
    fn test_from_names_rejects_duplicates() {
        let result = BrawlerCatalog::from_names(vec![
            "Leon".to_string(),
            "Spike".to_string(),
            "Leon".to_string(),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_prompt_list_preserves_order() {
        let catalog =
            BrawlerCatalog::from_names(vec!["Spike".to_string(), "Leon".to_string()]).unwrap();
        assert_eq!(catalog.prompt_list(), "Spike, Leon");
    }

    #[test]
    fn test_builtin_has_no_duplicates() {
        let catalog = BrawlerCatalog::builtin();
        assert_eq!(catalog.len(), catalog.all().len());
        assert!(!catalog.is_empty());
    }
}
