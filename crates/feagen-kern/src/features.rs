//! Registering kerning lookups under `kern` and `dist`
//!
//! Without any `languagesystem` statement a single `kern` block references
//! every lookup. Otherwise each declared script tag gets its own section,
//! and scripts handled by the distance shapers move from `kern` to `dist`.

// this_file: crates/feagen-kern/src/features.rs

use feagen_core::{
    ast::{FeatureBlock, Statement},
    diagnostics::{DiagnosticKind, Diagnostics},
    types::{Direction, FeatureTag, NEUTRAL_SCRIPT},
    UnicodeProperties,
};
use feagen_unicode::{ot_tag_to_script, scripts::is_dist_enabled};
use std::collections::{BTreeMap, BTreeSet};

const DFLT_TAG: &str = "DFLT";
const DFLT_LANGUAGE: &str = "dflt";

/// Script code → names of its lookups, base lookup first
pub type LookupNames = BTreeMap<String, Vec<String>>;

/// Drop lookups of scripts no `languagesystem` declares
///
/// Neutral lookups always stay. Nothing is dropped when no language system
/// is declared at all.
pub fn drop_unregistered(
    lookups: &mut LookupNames,
    language_systems: &[(String, Vec<String>)],
    diagnostics: &mut Diagnostics,
) {
    if language_systems.is_empty() {
        return;
    }
    let declared: BTreeSet<String> = language_systems
        .iter()
        .filter_map(|(tag, _)| ot_tag_to_script(tag))
        .collect();
    lookups.retain(|script, names| {
        let keep = script == NEUTRAL_SCRIPT || declared.contains(script);
        if !keep {
            diagnostics.report(
                DiagnosticKind::UnregisteredScript,
                format!(
                    "Dropping kerning lookup(s) {} for script {script}: no languagesystem declares it",
                    names.join(", ")
                ),
            );
        }
        keep
    });
}

fn references(names: &[String]) -> impl Iterator<Item = Statement> + '_ {
    names.iter().map(Statement::lookup_reference)
}

fn covers(tag: FeatureTag, script: &str) -> bool {
    match tag {
        FeatureTag::Dist => is_dist_enabled(script),
        _ => !is_dist_enabled(script),
    }
}

/// Build the statements of one feature block
fn register(
    tag: FeatureTag,
    lookups: &LookupNames,
    language_systems: &[(String, Vec<String>)],
    properties: &dyn UnicodeProperties,
) -> FeatureBlock {
    let mut block = FeatureBlock::new(tag.as_str());
    let neutral: &[String] = lookups.get(NEUTRAL_SCRIPT).map(Vec::as_slice).unwrap_or(&[]);

    if language_systems.is_empty() {
        block.statements.extend(references(neutral));
        for (script, names) in lookups.iter().filter(|(s, _)| *s != NEUTRAL_SCRIPT) {
            log::trace!("Registering {script} lookups globally");
            block.statements.extend(references(names));
        }
        return block;
    }

    let declared: BTreeSet<String> = language_systems
        .iter()
        .filter_map(|(t, _)| ot_tag_to_script(t))
        .collect();
    let covered: Vec<(&String, &Vec<String>)> = lookups
        .iter()
        .filter(|(s, _)| *s != NEUTRAL_SCRIPT && declared.contains(*s) && covers(tag, s))
        .collect();

    if tag == FeatureTag::Kern {
        if let Some((_, languages)) = language_systems.iter().find(|(t, _)| t == DFLT_TAG) {
            let with_direction = |direction: Direction| {
                covered
                    .iter()
                    .filter(|(s, _)| properties.horizontal_direction(s) == Some(direction))
                    .flat_map(|(_, names)| names.iter())
                    .collect::<Vec<&String>>()
            };
            let mut directional = with_direction(Direction::LeftToRight);
            if directional.is_empty() {
                directional = with_direction(Direction::RightToLeft);
            }
            if !neutral.is_empty() || !directional.is_empty() {
                block.statements.push(Statement::Script {
                    tag: DFLT_TAG.to_string(),
                });
                block.statements.push(Statement::Language {
                    tag: DFLT_LANGUAGE.to_string(),
                    include_default: true,
                });
                block.statements.extend(references(neutral));
                block
                    .statements
                    .extend(directional.into_iter().map(Statement::lookup_reference));
                for language in languages.iter().filter(|l| *l != DFLT_LANGUAGE) {
                    block.statements.push(Statement::Language {
                        tag: language.clone(),
                        include_default: true,
                    });
                }
            }
        }
    }

    for (ot_tag, languages) in language_systems.iter().filter(|(t, _)| t != DFLT_TAG) {
        let Some(script) = ot_tag_to_script(ot_tag) else {
            log::debug!("Ignoring unknown script tag '{ot_tag}'");
            continue;
        };
        if !covers(tag, &script) {
            continue;
        }
        let own: &[String] = lookups.get(&script).map(Vec::as_slice).unwrap_or(&[]);
        if own.is_empty() && neutral.is_empty() {
            continue;
        }
        if !block.statements.is_empty() {
            block.statements.push(Statement::blank());
        }
        block.statements.push(Statement::Script {
            tag: ot_tag.clone(),
        });
        block.statements.push(Statement::Language {
            tag: DFLT_LANGUAGE.to_string(),
            include_default: true,
        });
        block.statements.extend(references(neutral));
        block.statements.extend(references(own));
        for language in languages.iter().filter(|l| *l != DFLT_LANGUAGE) {
            block.statements.push(Statement::Language {
                tag: language.clone(),
                include_default: true,
            });
        }
    }
    block
}

/// Feature blocks for the requested tags, in splice order
///
/// `dist` is only generated when language systems are declared.
pub fn build_features(
    lookups: &LookupNames,
    language_systems: &[(String, Vec<String>)],
    todo: &BTreeSet<FeatureTag>,
    properties: &dyn UnicodeProperties,
) -> Vec<(FeatureTag, FeatureBlock)> {
    let mut features = Vec::new();
    for tag in [FeatureTag::Kern, FeatureTag::Dist] {
        if !todo.contains(&tag) {
            continue;
        }
        if tag == FeatureTag::Dist && language_systems.is_empty() {
            log::debug!("No languagesystem declared, not generating dist");
            continue;
        }
        let block = register(tag, lookups, language_systems, properties);
        if block.statements.is_empty() {
            log::debug!("Feature '{tag}' would be empty, skipping");
            continue;
        }
        features.push((tag, block));
    }
    features
}

#[cfg(test)]
mod tests {
    use super::*;
    use feagen_core::ast::FeatureFile;
    use feagen_unicode::IcuProperties;

    fn names(entries: &[(&str, &[&str])]) -> LookupNames {
        entries
            .iter()
            .map(|(script, lookups)| {
                (
                    (*script).to_string(),
                    lookups.iter().map(|l| (*l).to_string()).collect(),
                )
            })
            .collect()
    }

    fn systems(entries: &[(&str, &[&str])]) -> Vec<(String, Vec<String>)> {
        entries
            .iter()
            .map(|(tag, languages)| {
                (
                    (*tag).to_string(),
                    languages.iter().map(|l| (*l).to_string()).collect(),
                )
            })
            .collect()
    }

    fn render(features: Vec<(FeatureTag, FeatureBlock)>) -> String {
        FeatureFile {
            statements: features.into_iter().map(|(_, f)| Statement::Feature(f)).collect(),
        }
        .to_string()
    }

    fn all() -> BTreeSet<FeatureTag> {
        [FeatureTag::Kern, FeatureTag::Dist].into_iter().collect()
    }

    #[test]
    fn test_global_registration_without_language_systems() {
        let lookups = names(&[("Latn", &["kern_Latn"]), ("Zyyy", &["kern_Dflt"]), ("Deva", &["kern_Deva"])]);
        let features = build_features(&lookups, &[], &all(), &IcuProperties::new());
        assert_eq!(
            render(features),
            "feature kern {\n    lookup kern_Dflt;\n    lookup kern_Deva;\n    lookup kern_Latn;\n} kern;\n"
        );
    }

    #[test]
    fn test_script_sections() {
        let lookups = names(&[
            ("Latn", &["kern_Latn", "kern_Latn_marks"]),
            ("Arab", &["kern_Arab"]),
            ("Zyyy", &["kern_Dflt"]),
        ]);
        let langsys = systems(&[("DFLT", &["dflt"]), ("latn", &["dflt", "TRK"]), ("arab", &["dflt", "URD"])]);
        let features = build_features(&lookups, &langsys, &all(), &IcuProperties::new());
        assert_eq!(
            render(features),
            concat!(
                "feature kern {\n",
                "    script DFLT;\n",
                "    language dflt;\n",
                "    lookup kern_Dflt;\n",
                "    lookup kern_Latn;\n",
                "    lookup kern_Latn_marks;\n",
                "\n",
                "    script latn;\n",
                "    language dflt;\n",
                "    lookup kern_Dflt;\n",
                "    lookup kern_Latn;\n",
                "    lookup kern_Latn_marks;\n",
                "    language TRK;\n",
                "\n",
                "    script arab;\n",
                "    language dflt;\n",
                "    lookup kern_Dflt;\n",
                "    lookup kern_Arab;\n",
                "    language URD;\n",
                "} kern;\n"
            )
        );
    }

    #[test]
    fn test_dist_scripts_move_to_dist() {
        let lookups = names(&[("Deva", &["kern_Deva"]), ("Latn", &["kern_Latn"])]);
        let langsys = systems(&[("latn", &["dflt"]), ("dev2", &["dflt"]), ("deva", &["dflt"])]);
        let features = build_features(&lookups, &langsys, &all(), &IcuProperties::new());
        assert_eq!(
            render(features),
            concat!(
                "feature kern {\n",
                "    script latn;\n",
                "    language dflt;\n",
                "    lookup kern_Latn;\n",
                "} kern;\n",
                "\n",
                "feature dist {\n",
                "    script dev2;\n",
                "    language dflt;\n",
                "    lookup kern_Deva;\n",
                "\n",
                "    script deva;\n",
                "    language dflt;\n",
                "    lookup kern_Deva;\n",
                "} dist;\n"
            )
        );
    }

    #[test]
    fn test_rtl_lookups_in_dflt_when_no_ltr() {
        let lookups = names(&[("Hebr", &["kern_Hebr"])]);
        let langsys = systems(&[("DFLT", &["dflt"]), ("hebr", &["dflt"])]);
        let features = build_features(&lookups, &langsys, &all(), &IcuProperties::new());
        let text = render(features);
        assert!(text.starts_with(
            "feature kern {\n    script DFLT;\n    language dflt;\n    lookup kern_Hebr;\n\n    script hebr;\n"
        ));
    }

    #[test]
    fn test_extra_dflt_languages_follow_dflt_section() {
        let lookups = names(&[("Latn", &["kern_Latn"])]);
        let langsys = systems(&[("DFLT", &["dflt", "ZND"]), ("latn", &["dflt"])]);
        let features = build_features(&lookups, &langsys, &all(), &IcuProperties::new());
        assert!(render(features).starts_with(concat!(
            "feature kern {\n",
            "    script DFLT;\n",
            "    language dflt;\n",
            "    lookup kern_Latn;\n",
            "    language ZND;\n",
            "\n",
            "    script latn;\n",
        )));
    }

    #[test]
    fn test_unregistered_scripts_dropped() {
        let mut lookups = names(&[("Grek", &["kern_Grek"]), ("Latn", &["kern_Latn"]), ("Zyyy", &["kern_Dflt"])]);
        let langsys = systems(&[("latn", &["dflt"])]);
        let mut diagnostics = Diagnostics::new();
        drop_unregistered(&mut lookups, &langsys, &mut diagnostics);
        assert!(!lookups.contains_key("Grek"));
        assert!(lookups.contains_key("Zyyy"));
        let found = diagnostics.of_kind(DiagnosticKind::UnregisteredScript);
        assert_eq!(found.len(), 1);
        assert!(found[0].message.contains("kern_Grek"));
    }

    #[test]
    fn test_only_requested_tags() {
        let lookups = names(&[("Latn", &["kern_Latn"])]);
        let todo: BTreeSet<_> = [FeatureTag::Dist].into_iter().collect();
        let langsys = systems(&[("latn", &["dflt"])]);
        assert!(build_features(&lookups, &langsys, &todo, &IcuProperties::new()).is_empty());
    }
}
