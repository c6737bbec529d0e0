//! Property-based tests for the filter engine.
//!
//! For arbitrary bookmarks and filter selections: every match satisfies each
//! criterion on its own, an empty filter keeps everything, and adding a
//! criterion never widens the result.

use std::collections::BTreeSet;

use linkdeck::services::filter_engine::{filter_bookmarks, matches, matches_search};
use linkdeck::types::bookmark::{Bookmark, Category, Tag};
use linkdeck::types::filter::FilterState;
use proptest::prelude::*;

fn arb_bookmark() -> impl Strategy<Value = Bookmark> {
    (
        "[a-z]{1,8}",
        "[a-zA-Z ]{0,20}",
        proptest::option::of("[a-zA-Z ]{0,20}"),
        proptest::option::of(0usize..4),
        proptest::collection::btree_set(0usize..4, 0..4),
    )
        .prop_map(|(id, title, description, category, tags)| {
            let categories = Category::defaults();
            let all_tags = Tag::defaults();
            Bookmark {
                url: format!("https://{}.example.com", id),
                id,
                title,
                description,
                category: category.map(|i| categories[i].clone()),
                tags: tags.into_iter().map(|i| all_tags[i].clone()).collect(),
                notes: vec![],
                custom_style: None,
                favicon: None,
                hidden: false,
                created_at: 0,
                updated_at: 0,
            }
        })
}

fn arb_filter() -> impl Strategy<Value = FilterState> {
    (
        "[a-zA-Z]{0,3}",
        proptest::option::of(prop_oneof![Just("1"), Just("2"), Just("3"), Just("4"), Just("uncategorized")]),
        proptest::collection::btree_set(prop_oneof![Just("1"), Just("2"), Just("3"), Just("4")], 0..3),
    )
        .prop_map(|(query, category, tags)| FilterState {
            search_query: query,
            selected_category: category.map(String::from),
            selected_tags: tags.into_iter().map(String::from).collect::<BTreeSet<_>>(),
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn empty_filter_keeps_everything(bookmarks in proptest::collection::vec(arb_bookmark(), 0..20)) {
        let kept = filter_bookmarks(&bookmarks, &FilterState::default());
        prop_assert_eq!(kept.len(), bookmarks.len());
    }

    #[test]
    fn every_match_satisfies_each_criterion(
        bookmarks in proptest::collection::vec(arb_bookmark(), 0..20),
        filter in arb_filter(),
    ) {
        for b in filter_bookmarks(&bookmarks, &filter) {
            prop_assert!(matches_search(b, &filter.search_query));
            if let Some(category) = &filter.selected_category {
                prop_assert_eq!(b.category_id(), category.as_str());
            }
            for tag in &filter.selected_tags {
                prop_assert!(b.has_tag(tag));
            }
        }
    }

    #[test]
    fn filtering_preserves_order(
        bookmarks in proptest::collection::vec(arb_bookmark(), 0..20),
        filter in arb_filter(),
    ) {
        let positions: Vec<usize> = filter_bookmarks(&bookmarks, &filter)
            .iter()
            .map(|kept| bookmarks.iter().position(|b| std::ptr::eq(b, *kept)).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn adding_a_tag_never_widens(
        bookmark in arb_bookmark(),
        filter in arb_filter(),
        extra in prop_oneof![Just("1"), Just("2"), Just("3"), Just("4")],
    ) {
        let mut narrower = filter.clone();
        narrower.selected_tags.insert(extra.to_string());
        if matches(&bookmark, &narrower) {
            prop_assert!(matches(&bookmark, &filter));
        }
    }

    #[test]
    fn search_ignores_case(bookmark in arb_bookmark(), start in 0usize..8, len in 1usize..6) {
        let title = bookmark.title.clone();
        let end = (start + len).min(title.len());
        if start < end {
            let needle = &title[start..end];
            prop_assert!(matches_search(&bookmark, &needle.to_uppercase()));
            prop_assert!(matches_search(&bookmark, &needle.to_lowercase()));
        }
    }
}
