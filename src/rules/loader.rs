//! Loading and validating rule data.

use crate::constants::{DEFAULT_SUBTYPE, KNOWN_CLASSES};
use crate::error::{Error, Result};
use crate::rules::catalog::FollowupCatalog;
use crate::rules::table::{CityRules, RuleTable, SubtypeRules};
use crate::rules::{City, FollowupPrompt};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::debug;

/// Rule data compiled into the binary.
const EMBEDDED_RULES: &str = include_str!("rules.toml");

/// On-disk layout of a rules file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RulesFile {
    #[serde(default)]
    followups: BTreeMap<String, FollowupPrompt>,
    cities: BTreeMap<String, CityFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CityFile {
    contact: String,
    #[serde(default)]
    rules: BTreeMap<String, SubtypeRules>,
}

/// Rule table and follow-up catalog loaded together.
#[derive(Debug, Clone)]
pub struct RuleBook {
    table: RuleTable,
    catalog: FollowupCatalog,
}

impl RuleBook {
    /// Load the rules bundled with the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_toml_str(EMBEDDED_RULES, "embedded table")
    }

    /// Load rules from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::RulesRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&contents, &path.display().to_string())
    }

    /// Load rules from an optional override file, falling back to the embedded table.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(Self::embedded, Self::from_file)
    }

    /// Parse and validate rules from TOML text.
    ///
    /// `origin` names the source in error messages.
    pub fn from_toml_str(contents: &str, origin: &str) -> Result<Self> {
        let file: RulesFile = toml::from_str(contents).map_err(|e| Error::RulesParse {
            origin: origin.to_string(),
            source: e,
        })?;

        validate_followups(&file.followups)?;

        let mut cities = BTreeMap::new();
        for (name, city_file) in file.cities {
            let city = name.parse::<City>().map_err(|_| invalid(format!(
                "unknown city '{name}' (known: {})",
                City::ALL.map(City::as_str).join(", ")
            )))?;
            validate_city(city, &city_file, &file.followups)?;
            cities.insert(
                city,
                CityRules {
                    contact: city_file.contact,
                    classes: city_file.rules,
                },
            );
        }

        if cities.is_empty() {
            return Err(invalid("rules define no cities".to_string()));
        }

        debug!(
            "Loaded rules from {}: {} cities, {} follow-up questions",
            origin,
            cities.len(),
            file.followups.len()
        );

        Ok(Self {
            table: RuleTable::new(cities),
            catalog: FollowupCatalog::new(file.followups),
        })
    }

    /// The city rule table.
    pub const fn table(&self) -> &RuleTable {
        &self.table
    }

    /// The follow-up question catalog.
    pub const fn catalog(&self) -> &FollowupCatalog {
        &self.catalog
    }

    /// Whether a detection of `class` in `city` has to be disambiguated
    /// by a follow-up question before it can be resolved.
    pub fn needs_followup(&self, city: City, class: &str) -> bool {
        self.catalog.get(class).is_some() && !self.table.has_default(city, class)
    }
}

fn invalid(message: String) -> Error {
    Error::RulesValidation { message }
}

fn check_known_class(class: &str, context: &str) -> Result<()> {
    if KNOWN_CLASSES.contains(&class) {
        Ok(())
    } else {
        Err(invalid(format!(
            "{context}: '{class}' is not a detector class (known: {})",
            KNOWN_CLASSES.join(", ")
        )))
    }
}

fn validate_followups(followups: &BTreeMap<String, FollowupPrompt>) -> Result<()> {
    for (class, prompt) in followups {
        check_known_class(class, "follow-up")?;

        if prompt.question_text.trim().is_empty() {
            return Err(invalid(format!("follow-up for '{class}' has an empty question")));
        }
        if prompt.options.is_empty() {
            return Err(invalid(format!("follow-up for '{class}' has no options")));
        }

        let mut seen = HashSet::new();
        for option in &prompt.options {
            if option.subtype_id == DEFAULT_SUBTYPE {
                return Err(invalid(format!(
                    "follow-up for '{class}' uses the reserved subtype '{DEFAULT_SUBTYPE}'"
                )));
            }
            if !seen.insert(option.subtype_id.as_str()) {
                return Err(invalid(format!(
                    "follow-up for '{class}' lists option '{}' twice",
                    option.subtype_id
                )));
            }
        }
    }
    Ok(())
}

fn validate_city(
    city: City,
    city_file: &CityFile,
    followups: &BTreeMap<String, FollowupPrompt>,
) -> Result<()> {
    if city_file.contact.trim().is_empty() {
        return Err(invalid(format!("city '{city}' has no contact")));
    }

    for (class, subtypes) in &city_file.rules {
        let context = format!("{city}/{class}");
        check_known_class(class, &context)?;

        if subtypes.is_empty() {
            return Err(invalid(format!("{context} has no entries")));
        }

        if subtypes.contains_key(DEFAULT_SUBTYPE) {
            if subtypes.len() > 1 {
                return Err(invalid(format!(
                    "{context} mixes '{DEFAULT_SUBTYPE}' with other subtypes"
                )));
            }
            continue;
        }

        // Without a default the subtypes are only reachable through a follow-up question.
        let Some(prompt) = followups.get(class) else {
            return Err(invalid(format!(
                "{context} has subtypes but no follow-up question to reach them"
            )));
        };
        if let Some(missing) = prompt
            .options
            .iter()
            .find(|option| !subtypes.contains_key(&option.subtype_id))
        {
            return Err(invalid(format!(
                "{context} has no rule for follow-up option '{}'",
                missing.subtype_id
            )));
        }
    }
    Ok(())
}
