use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::cache::cache_key;
use crate::effect::Effect;
use crate::state::{AppState, DetailTab, Screen};

pub const DETAIL_ERROR_MESSAGE: &str = "Failed to load Pokemon.";
pub const LIST_ERROR_MESSAGE: &str = "Error loading Pokemon list";

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init | Action::PageRequest => match request_page(state) {
            Some(effect) => DispatchResult::changed_with(effect),
            None => DispatchResult::unchanged(),
        },

        Action::PageRetry => {
            if state.pager.error().is_none() {
                return DispatchResult::unchanged();
            }
            state.message = None;
            match request_page(state) {
                Some(effect) => DispatchResult::changed_with(effect),
                None => DispatchResult::changed(),
            }
        }

        Action::PageDidLoad(page) => {
            let Some(rows) = state.pager.complete(page) else {
                return DispatchResult::unchanged();
            };
            let names: Vec<String> = rows
                .iter()
                .map(|row| cache_key(&row.name))
                .filter(|name| !state.details.contains_key(name))
                .collect();
            state.message = None;
            state.rebuild_filtered();
            if names.is_empty() {
                DispatchResult::changed()
            } else {
                DispatchResult::changed_with(Effect::PrefetchCreatures { names })
            }
        }

        Action::PageDidError { offset, error } => {
            if !state.pager.fail(offset, error.clone()) {
                return DispatchResult::unchanged();
            }
            state.message = Some(format!("{LIST_ERROR_MESSAGE}: {error}"));
            DispatchResult::changed()
        }

        Action::SelectionMove(delta) => {
            let index = (state.selected_index as i64 + i64::from(delta)).max(0) as usize;
            let moved = state.set_selected_index(index);
            finish(moved, load_more(state))
        }

        Action::SelectionPage(delta) => {
            let page = list_page_size(state) as i64;
            let index = (state.selected_index as i64 + i64::from(delta) * page).max(0) as usize;
            let moved = state.set_selected_index(index);
            finish(moved, load_more(state))
        }

        Action::DexSelect(index) => {
            let moved = state.set_selected_index(index);
            finish(moved, load_more(state))
        }

        Action::OpenSelected => {
            let Some(name) = state.selected_name() else {
                return DispatchResult::unchanged();
            };
            open_detail(state, &name)
        }

        Action::Back => {
            if state.screen != Screen::Detail {
                return DispatchResult::unchanged();
            }
            state.screen = Screen::List;
            state.detail_loading = false;
            state.detail_error = None;
            DispatchResult::changed()
        }

        Action::SearchStart => {
            state.search.active = true;
            state.search.query.clear();
            state.rebuild_filtered();
            DispatchResult::changed()
        }

        Action::SearchCancel => {
            if !state.search.active && state.search.query.is_empty() {
                return DispatchResult::unchanged();
            }
            state.search.active = false;
            state.search.query.clear();
            state.rebuild_filtered();
            DispatchResult::changed()
        }

        Action::SearchInput(ch) => {
            state.search.query.push(ch);
            state.rebuild_filtered();
            state.set_selected_index(0);
            DispatchResult::changed()
        }

        Action::SearchBackspace => {
            if state.search.query.pop().is_none() {
                return DispatchResult::unchanged();
            }
            state.rebuild_filtered();
            DispatchResult::changed()
        }

        Action::SearchSubmit => {
            state.search.active = false;
            let query = cache_key(&state.search.query);
            if query.is_empty() {
                state.search.query.clear();
                state.rebuild_filtered();
                return DispatchResult::changed();
            }
            open_detail(state, &query)
        }

        Action::CreatureDidLoad { name, detail } => {
            let key = cache_key(&name);
            let own_key = cache_key(&detail.name);
            let is_current = state.detail_name.as_deref() == Some(key.as_str());
            if own_key != key {
                state.details.insert(own_key, detail.clone());
            }
            state.details.insert(key, detail);
            if is_current {
                state.detail_loading = false;
                state.detail_error = None;
                sync_evolution_selection(state);
            }
            DispatchResult::changed()
        }

        Action::CreatureDidError { name, error } => {
            let key = cache_key(&name);
            if state.screen != Screen::Detail || state.detail_name.as_deref() != Some(key.as_str())
            {
                tracing::debug!(name = %key, %error, "background lookup failed");
                return DispatchResult::unchanged();
            }
            state.detail_loading = false;
            state.detail_error = Some(error);
            state.message = Some(DETAIL_ERROR_MESSAGE.to_string());
            DispatchResult::changed()
        }

        Action::DetailTabNext => cycle_detail_tab(state, 1),
        Action::DetailTabPrev => cycle_detail_tab(state, -1),

        Action::EvolutionSelect(index) => {
            let Some(detail) = state.current_detail() else {
                return DispatchResult::unchanged();
            };
            if index >= detail.evolution_chain.len() || index == state.evolution_selected_index {
                return DispatchResult::unchanged();
            }
            state.evolution_selected_index = index;
            DispatchResult::changed()
        }

        Action::EvolutionOpen => {
            let Some(stage) = state
                .current_detail()
                .and_then(|detail| detail.evolution_chain.get(state.evolution_selected_index))
            else {
                return DispatchResult::unchanged();
            };
            let name = cache_key(&stage.display_name);
            if is_current_creature(state, &name) {
                return DispatchResult::unchanged();
            }
            open_detail(state, &name)
        }

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size != (width, height) {
                state.terminal_size = (width, height);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Tick => {
            state.tick = state.tick.wrapping_add(1);
            if state.pager.is_loading() || state.detail_loading {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn request_page(state: &mut AppState) -> Option<Effect> {
    let request = state.pager.begin()?;
    Some(Effect::LoadPage {
        offset: request.offset,
        limit: request.limit,
    })
}

/// Scroll-to-load: claim the next page once the selection nears the end.
/// A failed page waits for an explicit retry.
fn load_more(state: &mut AppState) -> Vec<Effect> {
    if !state.near_list_end() || state.pager.error().is_some() {
        return Vec::new();
    }
    request_page(state).into_iter().collect()
}

fn finish(changed: bool, effects: Vec<Effect>) -> DispatchResult<Effect> {
    if !effects.is_empty() {
        DispatchResult::changed_with_many(effects)
    } else if changed {
        DispatchResult::changed()
    } else {
        DispatchResult::unchanged()
    }
}

fn open_detail(state: &mut AppState, name: &str) -> DispatchResult<Effect> {
    let key = cache_key(name);
    if key.is_empty() {
        return DispatchResult::unchanged();
    }
    state.screen = Screen::Detail;
    state.detail_name = Some(key.clone());
    state.reset_detail_view();
    state.message = None;
    if state.details.contains_key(&key) {
        state.detail_loading = false;
        sync_evolution_selection(state);
        return DispatchResult::changed();
    }
    state.detail_loading = true;
    DispatchResult::changed_with(Effect::ResolveCreature { name: key })
}

fn is_current_creature(state: &AppState, name: &str) -> bool {
    state.detail_name.as_deref() == Some(name)
        || state
            .current_detail()
            .is_some_and(|detail| cache_key(&detail.name) == name)
}

/// Point the evolution cursor at the stage for the creature on screen.
fn sync_evolution_selection(state: &mut AppState) {
    let Some(detail) = state.current_detail() else {
        return;
    };
    let own = cache_key(&detail.name);
    let position = detail
        .evolution_chain
        .iter()
        .position(|stage| cache_key(&stage.display_name) == own);
    if let Some(index) = position {
        state.evolution_selected_index = index;
    }
}

fn cycle_detail_tab(state: &mut AppState, step: i16) -> DispatchResult<Effect> {
    if state.screen != Screen::Detail {
        return DispatchResult::unchanged();
    }
    let len = DetailTab::ALL.len() as i16;
    let next = (state.detail_tab.index() as i16 + step).rem_euclid(len);
    state.detail_tab = DetailTab::ALL[next as usize];
    DispatchResult::changed()
}

fn list_page_size(state: &AppState) -> usize {
    state.terminal_size.1.saturating_sub(6).max(1) as usize
}
