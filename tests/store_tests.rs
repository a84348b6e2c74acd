//! Store flows: paging, detail resolution and search through the reducer.

use pretty_assertions::assert_eq;
use tui_dispatch::testing::*;
use tui_dispatch::EffectStore;
use pokebox::{
    action::Action,
    effect::Effect,
    pager::CatalogPage,
    reducer::{reducer, DETAIL_ERROR_MESSAGE},
    state::{AppState, CreatureDetail, CreatureSummary, DetailTab, GenderRatio, Screen},
};

fn summary(name: &str, id: u32) -> CreatureSummary {
    CreatureSummary {
        name: name.to_string(),
        url: format!("https://pokeapi.co/api/v2/pokemon/{id}/"),
    }
}

fn page(offset: u32, names: &[&str], has_more: bool) -> CatalogPage {
    CatalogPage {
        offset,
        entries: names
            .iter()
            .enumerate()
            .map(|(idx, name)| summary(name, offset + idx as u32 + 1))
            .collect(),
        has_more,
    }
}

fn detail(name: &str) -> CreatureDetail {
    CreatureDetail {
        id: 1,
        name: name.to_string(),
        height_m: 0.7,
        weight_kg: 6.9,
        types: vec!["grass".into(), "poison".into()],
        image_url: None,
        abilities: vec!["overgrow".into()],
        base_stats: Vec::new(),
        evolution_chain: Vec::new(),
        species_label: "Seed Pokémon".into(),
        color: "green".into(),
        egg_groups: vec!["monster".into()],
        egg_cycle: "20".into(),
        gender_ratio: GenderRatio { male: 87.5, female: 12.5 },
        national_dex_number: 1,
        flavor_text: "A strange seed was planted on its back at birth.".into(),
    }
}

// ============================================================================
// EffectStore Tests
// ============================================================================

#[test]
fn test_init_requests_first_page() {
    let mut store = EffectStore::new(AppState::default(), reducer);

    let result = store.dispatch(Action::Init);
    assert!(result.changed);
    assert_eq!(
        result.effects,
        vec![Effect::LoadPage {
            offset: 0,
            limit: 20
        }]
    );
    assert!(store.state().pager.is_loading());
}

#[test]
fn test_page_request_while_loading_is_ignored() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::Init);

    let result = store.dispatch(Action::PageRequest);
    assert!(!result.changed);
    assert!(result.effects.is_empty());
}

#[test]
fn test_cached_detail_opens_without_fetch() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::Init);
    store.dispatch(Action::PageDidLoad(page(0, &["bulbasaur"], true)));
    store.dispatch(Action::CreatureDidLoad {
        name: "bulbasaur".into(),
        detail: detail("bulbasaur"),
    });

    let result = store.dispatch(Action::OpenSelected);
    assert!(result.changed);
    assert!(result.effects.is_empty());
    assert_eq!(store.state().screen, Screen::Detail);
    assert!(!store.state().detail_loading);
    assert_eq!(
        store.state().current_detail().map(|d| d.name.as_str()),
        Some("bulbasaur")
    );
}

// ============================================================================
// EffectStoreTestHarness Tests
// ============================================================================

#[test]
fn test_first_page_flow_with_harness() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::Init);
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::LoadPage { offset: 0, .. }));

    harness.complete_action(Action::PageDidLoad(page(0, &["bulbasaur", "ivysaur"], true)));
    let (changed, total) = harness.process_emitted();
    assert_eq!(total, 1);
    assert_eq!(changed, 1);

    harness.assert_state(|s| s.entries().len() == 2);
    harness.assert_state(|s| s.pager.cursor().offset == 20);
    harness.assert_state(|s| s.pager.has_more());
    harness.assert_state(|s| !s.pager.is_loading());

    // Freshly listed rows are prefetched in the background.
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| {
        matches!(e, Effect::PrefetchCreatures { names } if names == &["bulbasaur", "ivysaur"])
    });
}

#[test]
fn test_page_error_then_retry_same_offset() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::Init);
    harness.drain_effects();

    harness.complete_action(Action::PageDidError {
        offset: 0,
        error: "connection refused".into(),
    });
    harness.process_emitted();
    harness.assert_state(|s| s.pager.error() == Some("connection refused"));
    harness.assert_state(|s| s.pager.cursor().offset == 0);
    harness.assert_state(|s| {
        s.message.as_deref() == Some("Error loading Pokemon list: connection refused")
    });

    harness.dispatch_collect(Action::PageRetry);
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::LoadPage { offset: 0, limit: 20 }));
    harness.assert_state(|s| s.pager.error().is_none());
}

#[test]
fn test_open_uncached_detail_then_error() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::Init);
    harness.complete_action(Action::PageDidLoad(page(0, &["pikachu"], false)));
    harness.process_emitted();
    harness.drain_effects();

    harness.dispatch_collect(Action::OpenSelected);
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| {
        matches!(e, Effect::ResolveCreature { name } if name == "pikachu")
    });
    harness.assert_state(|s| s.detail_loading);

    harness.complete_action(Action::CreatureDidError {
        name: "pikachu".into(),
        error: "HTTP 500".into(),
    });
    harness.process_emitted();
    harness.assert_state(|s| !s.detail_loading);
    harness.assert_state(|s| s.detail_error.as_deref() == Some("HTTP 500"));
    harness.assert_state(|s| s.message.as_deref() == Some(DETAIL_ERROR_MESSAGE));
    harness.assert_state(|s| s.details.is_empty());
}

#[test]
fn test_background_error_does_not_touch_detail_screen() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::Init);
    harness.complete_action(Action::PageDidLoad(page(0, &["bulbasaur", "ivysaur"], false)));
    harness.process_emitted();

    harness.complete_action(Action::CreatureDidError {
        name: "ivysaur".into(),
        error: "timeout".into(),
    });
    let (changed, total) = harness.process_emitted();
    assert_eq!((changed, total), (0, 1));
    harness.assert_state(|s| s.screen == Screen::List);
    harness.assert_state(|s| s.message.is_none());
}

#[test]
fn test_search_submit_opens_typed_name() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::SearchStart);
    for ch in "Mr Mime".chars() {
        harness.dispatch_collect(Action::SearchInput(ch));
    }
    harness.dispatch_collect(Action::SearchSubmit);

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| {
        matches!(e, Effect::ResolveCreature { name } if name == "mr-mime")
    });
    harness.assert_state(|s| !s.search.active);
    harness.assert_state(|s| s.screen == Screen::Detail);
}

#[test]
fn test_back_returns_to_list_and_keeps_cache() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::Init);
    harness.complete_action(Action::PageDidLoad(page(0, &["bulbasaur"], false)));
    harness.complete_action(Action::CreatureDidLoad {
        name: "bulbasaur".into(),
        detail: detail("bulbasaur"),
    });
    harness.process_emitted();

    harness.dispatch_collect(Action::OpenSelected);
    harness.dispatch_collect(Action::DetailTabNext);
    harness.assert_state(|s| s.detail_tab == DetailTab::Stats);

    harness.dispatch_collect(Action::Back);
    harness.assert_state(|s| s.screen == Screen::List);
    harness.assert_state(|s| s.details.contains_key("bulbasaur"));
}
