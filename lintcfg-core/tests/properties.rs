use proptest::prelude::*;

use lintcfg_core::catalog::{Catalog, TagSet};
use lintcfg_core::document::SpecDocument;
use lintcfg_core::font::FontInfo;
use lintcfg_core::selection::TestSelection;

fn catalog_tag() -> impl Strategy<Value = String> {
    let tags: Vec<String> = Catalog::builtin().tags().iter().cloned().collect();
    prop::sample::select(tags)
}

fn directive() -> impl Strategy<Value = (bool, String)> {
    (any::<bool>(), catalog_tag())
}

fn font() -> impl Strategy<Value = FontInfo> {
    (
        prop::sample::select(vec!["Monotype", "Adobe", "Google"]),
        prop::sample::select(vec!["1.0", "1.02", "2.5"]),
        any::<bool>(),
    )
        .prop_map(|(vendor, version, hinted)| FontInfo {
            filename: "Probe.ttf".into(),
            vendor: vendor.into(),
            version: version.into(),
            hinted,
            ..FontInfo::default()
        })
}

fn selection_from(directives: &[(bool, String)]) -> TestSelection {
    let mut sel = TestSelection::new(Catalog::builtin());
    for (on, tag) in directives {
        if *on {
            sel.enable(tag).unwrap();
        } else {
            sel.disable(tag).unwrap();
        }
    }
    sel
}

proptest! {
    #[test]
    fn apply_is_idempotent(
        directives in prop::collection::vec(directive(), 0..8),
        start in prop::collection::btree_set(catalog_tag(), 0..40),
    ) {
        let sel = selection_from(&directives);
        let mut once: TagSet = start.clone();
        sel.apply(&mut once);
        let mut twice = once.clone();
        sel.apply(&mut twice);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn resolve_stays_within_catalog(
        blocks in prop::collection::vec(
            (
                prop::sample::select(vec!["", "vendor Monotype", "version >= 1.02", "hinted is true"]),
                prop::collection::vec(directive(), 1..4),
            ),
            0..6,
        ),
        probe in font(),
    ) {
        let mut text = String::new();
        for (condition, directives) in &blocks {
            text.push_str("condition\n");
            if !condition.is_empty() {
                text.push_str(condition);
                text.push('\n');
            }
            for (on, tag) in directives {
                text.push_str(if *on { "enable " } else { "disable " });
                text.push_str(tag);
                text.push('\n');
            }
        }

        let doc = SpecDocument::parse(&text).unwrap();
        let resolved = doc.resolve(&probe);
        prop_assert!(resolved.is_subset(doc.catalog().tags()));
    }

    #[test]
    fn last_directive_wins_for_its_own_tag(
        tag in catalog_tag(),
        first in any::<bool>(),
        second in any::<bool>(),
    ) {
        let verb = |on: bool| if on { "enable" } else { "disable" };
        let text = format!("{} {tag}\ncondition\n{} {tag}\n", verb(first), verb(second));
        let doc = SpecDocument::parse(&text).unwrap();
        prop_assert_eq!(doc.resolve(&FontInfo::default()).contains(&tag), second);
    }
}
