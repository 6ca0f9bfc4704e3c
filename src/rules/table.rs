//! City rule table: `city -> class -> subtype -> recommendation`.

use crate::constants::DEFAULT_SUBTYPE;
use crate::error::{Error, Result};
use crate::rules::{City, Recommendation};
use std::collections::BTreeMap;

/// Subtype map for one detected class.
pub type SubtypeRules = BTreeMap<String, Recommendation>;

/// Rules and contact information for a single city.
#[derive(Debug, Clone)]
pub struct CityRules {
    pub(crate) contact: String,
    pub(crate) classes: BTreeMap<String, SubtypeRules>,
}

impl CityRules {
    /// Contact string shown with every recommendation for this city.
    pub fn contact(&self) -> &str {
        &self.contact
    }

    /// Classes this city has rules for.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// Subtype rules for a class.
    pub fn subtypes(&self, class: &str) -> Option<&SubtypeRules> {
        self.classes.get(class)
    }
}

/// Immutable rule table.
///
/// Built once by [`crate::rules::RuleBook`] and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct RuleTable {
    cities: BTreeMap<City, CityRules>,
}

impl RuleTable {
    pub(crate) const fn new(cities: BTreeMap<City, CityRules>) -> Self {
        Self { cities }
    }

    /// Look up the recommendation for a (city, class, subtype) triple.
    ///
    /// Missing keys at any level yield `None`.
    pub fn lookup(&self, city: City, class: &str, subtype: &str) -> Option<&Recommendation> {
        self.cities.get(&city)?.classes.get(class)?.get(subtype)
    }

    /// Whether the city resolves the class without a follow-up question.
    pub fn has_default(&self, city: City, class: &str) -> bool {
        self.lookup(city, class, DEFAULT_SUBTYPE).is_some()
    }

    /// Contact string for a city.
    pub fn contact(&self, city: City) -> Option<&str> {
        self.cities.get(&city).map(CityRules::contact)
    }

    /// Rules for a single city.
    pub fn city_rules(&self, city: City) -> Option<&CityRules> {
        self.cities.get(&city)
    }

    /// Cities present in the table, in stable order.
    pub fn cities(&self) -> impl Iterator<Item = City> + '_ {
        self.cities.keys().copied()
    }

    /// Resolve a caller-supplied city name against the table.
    pub fn parse_city(&self, name: &str) -> Result<City> {
        name.parse::<City>()
            .ok()
            .filter(|city| self.cities.contains_key(city))
            .ok_or_else(|| Error::InvalidCity {
                city: name.to_string(),
                supported: self.supported_cities(),
            })
    }

    /// Comma-separated list of supported city names.
    pub fn supported_cities(&self) -> String {
        self.cities
            .keys()
            .map(|city| city.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::rules::{City, RuleBook};

    #[test]
    fn test_lookup_is_total() {
        let book = RuleBook::embedded().unwrap();
        let table = book.table();

        assert!(table.lookup(City::Oakland, "glass", "default").is_some());
        assert!(table.lookup(City::Oakland, "glass", "bottle").is_none());
        assert!(table.lookup(City::Oakland, "styrofoam", "default").is_none());
        assert!(table.lookup(City::Oakland, "", "").is_none());
    }

    #[test]
    fn test_city_specific_divergence() {
        let book = RuleBook::embedded().unwrap();
        let table = book.table();

        let oakland = table.lookup(City::Oakland, "paper", "pizza_box").unwrap();
        let livermore = table.lookup(City::Livermore, "paper", "pizza_box").unwrap();
        assert_eq!(oakland.bin_category, "Organic / Compost");
        assert_eq!(oakland.color_tag, "green");
        assert_eq!(livermore.bin_category, "Recyclable");
        assert_eq!(livermore.color_tag, "blue");
    }

    #[test]
    fn test_parse_city() {
        let book = RuleBook::embedded().unwrap();
        let table = book.table();

        assert_eq!(table.parse_city("OAKLAND").unwrap(), City::Oakland);
        let err = table.parse_city("atlantis").unwrap_err();
        assert_eq!(err.code(), "invalid_city");
        assert!(err.to_string().contains("livermore, oakland"));
    }

    #[test]
    fn test_contacts() {
        let book = RuleBook::embedded().unwrap();
        let contact = book.table().contact(City::Livermore).unwrap();
        assert!(contact.contains("925-449-7300"));
    }
}
