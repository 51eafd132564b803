// crates/online-ddl-cli/src/tests/i18n.rs
// ============================================================================
// Module: CLI i18n Tests
// Description: Unit tests for catalog parity and locale parsing.
// Purpose: Ensure CLI localization remains consistent across supported locales.
// Dependencies: online-ddl-cli i18n module
// ============================================================================

//! ## Overview
//! Verifies the CLI message catalogs stay in sync, locale parsing is tolerant,
//! and every locale template uses the same placeholders as English.

use std::collections::BTreeSet;

use crate::i18n::Locale;
use crate::i18n::SUPPORTED_LOCALES;
use crate::i18n::catalog_entries_for;
use crate::i18n::catalog_for;

fn placeholders(template: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start ..].find('}') else {
            break;
        };
        names.insert(rest[start + 1 .. start + len].to_string());
        rest = &rest[start + len + 1 ..];
    }
    names
}

#[test]
fn catalogs_have_unique_keys() {
    for locale in SUPPORTED_LOCALES {
        let entries = catalog_entries_for(*locale);
        assert_eq!(
            catalog_for(*locale).len(),
            entries.len(),
            "duplicate keys in the {} catalog",
            locale.as_str()
        );
    }
}

#[test]
fn catalogs_share_keys_and_placeholders() {
    let english = catalog_for(Locale::En);
    for locale in SUPPORTED_LOCALES {
        let catalog = catalog_for(*locale);
        let keys: BTreeSet<_> = catalog.keys().collect();
        let english_keys: BTreeSet<_> = english.keys().collect();
        assert_eq!(keys, english_keys, "{} catalog keys differ from en", locale.as_str());
        for (key, template) in catalog {
            assert_eq!(
                placeholders(template),
                placeholders(english[key]),
                "placeholder mismatch for {key} in {}",
                locale.as_str()
            );
        }
    }
}

#[test]
fn locale_parse_accepts_region_tags() {
    assert_eq!(Locale::parse("en"), Some(Locale::En));
    assert_eq!(Locale::parse(" CA-es "), Some(Locale::Ca));
    assert_eq!(Locale::parse("en_US.UTF-8"), Some(Locale::En));
    assert_eq!(Locale::parse("fr"), None);
    assert_eq!(Locale::parse(""), None);
}
