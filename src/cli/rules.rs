//! `binwise rules` subcommands: inspect and validate the rule table.

#![allow(clippy::print_stdout)]

use crate::config::OutputMode;
use crate::error::{Error, Result};
use crate::output::emit_json_result;
use crate::output::json_envelope::{
    CityEntry, ClassEntry, ResultType, RulesCheckPayload, RulesListPayload, RulesShowPayload,
};
use crate::rules::{City, RuleBook};
use std::path::Path;

/// Overview of the rule table, optionally limited to one city.
pub fn list_overview(book: &RuleBook, city: Option<&str>) -> Result<RulesListPayload> {
    let table = book.table();
    let cities: Vec<City> = match city {
        Some(name) => vec![table.parse_city(name)?],
        None => table.cities().collect(),
    };

    let cities = cities
        .into_iter()
        .filter_map(|city| {
            let rules = table.city_rules(city)?;
            let classes = rules
                .classes()
                .map(|class| ClassEntry {
                    class: class.to_string(),
                    subtypes: rules
                        .subtypes(class)
                        .map(|s| s.keys().cloned().collect())
                        .unwrap_or_default(),
                    needs_followup: book.needs_followup(city, class),
                })
                .collect();
            Some(CityEntry {
                city,
                contact: rules.contact().to_string(),
                classes,
            })
        })
        .collect();

    Ok(RulesListPayload {
        result_type: ResultType::RulesList,
        cities,
    })
}

/// Rules and follow-up question for one class in one city.
pub fn show_class(book: &RuleBook, city: &str, class: &str) -> Result<RulesShowPayload> {
    let table = book.table();
    let city = table.parse_city(city)?;
    let rules = table
        .city_rules(city)
        .and_then(|r| r.subtypes(class))
        .cloned()
        .ok_or_else(|| Error::NoRuleFound {
            city: city.to_string(),
            class: class.to_string(),
            subtype: "*".to_string(),
        })?;

    Ok(RulesShowPayload {
        result_type: ResultType::RulesShow,
        city,
        class: class.to_string(),
        followup: if book.needs_followup(city, class) {
            book.catalog().get(class).cloned()
        } else {
            None
        },
        rules,
    })
}

/// Load and validate a rules file, counting what it defines.
pub fn check_file(file: Option<&Path>) -> Result<RulesCheckPayload> {
    let book = RuleBook::load(file)?;
    let table = book.table();

    let rules = table
        .cities()
        .filter_map(|city| table.city_rules(city))
        .map(|city_rules| {
            city_rules
                .classes()
                .filter_map(|class| city_rules.subtypes(class))
                .map(|subtypes| subtypes.len())
                .sum::<usize>()
        })
        .sum();

    Ok(RulesCheckPayload {
        result_type: ResultType::RulesCheck,
        file: file.map(Path::to_path_buf),
        cities: table.cities().count(),
        rules,
        followups: book.catalog().classes().count(),
    })
}

/// Handle `rules list`.
pub fn list_rules(book: &RuleBook, city: Option<&str>, mode: OutputMode) -> Result<()> {
    let overview = list_overview(book, city)?;
    if mode.is_json() {
        emit_json_result(&overview);
        return Ok(());
    }

    for entry in &overview.cities {
        println!("{} ({})", entry.city, entry.contact);
        for class in &entry.classes {
            let marker = if class.needs_followup { " [follow-up]" } else { "" };
            println!("  {:<10} {}{}", class.class, class.subtypes.join(", "), marker);
        }
    }
    Ok(())
}

/// Handle `rules show`.
pub fn show_rules(book: &RuleBook, city: &str, class: &str, mode: OutputMode) -> Result<()> {
    let shown = show_class(book, city, class)?;
    if mode.is_json() {
        emit_json_result(&shown);
        return Ok(());
    }

    println!("{} / {}", shown.city, shown.class);
    if let Some(ref prompt) = shown.followup {
        println!("  Q: {}", prompt.question_text);
        for option in &prompt.options {
            println!("     - {} ({})", option.label_text, option.subtype_id);
        }
    }
    for (subtype, rec) in &shown.rules {
        println!(
            "  {subtype}: {} {} [{}] {}",
            rec.icon, rec.bin_category, rec.color_tag, rec.tip_text
        );
    }
    Ok(())
}

/// Handle `rules check`.
pub fn check_rules(file: Option<&Path>, mode: OutputMode) -> Result<()> {
    let report = check_file(file)?;
    if mode.is_json() {
        emit_json_result(&report);
        return Ok(());
    }

    let origin = report
        .file
        .as_ref()
        .map_or_else(|| "embedded table".to_string(), |p| p.display().to_string());
    println!(
        "{origin}: OK ({} cities, {} rules, {} follow-up questions)",
        report.cities, report.rules, report.followups
    );
    Ok(())
}
