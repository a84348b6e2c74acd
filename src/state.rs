use serde::{Deserialize, Serialize};
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use std::collections::HashMap;

use crate::cache::cache_key;
use crate::mapper::extract_id;
use crate::pager::ListPager;

/// Rows from the end of the list at which the next page is requested.
pub const LOAD_MORE_THRESHOLD: usize = 3;

// ============================================================================
// Domain records
// ============================================================================

/// One row of the paginated catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreatureSummary {
    pub name: String,
    pub url: String,
}

impl CreatureSummary {
    /// Catalog number parsed from the listing URL, when present.
    pub fn number(&self) -> Option<u32> {
        extract_id(&self.url)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GenderRatio {
    pub male: f64,
    pub female: f64,
}

impl GenderRatio {
    pub const GENDERLESS: GenderRatio = GenderRatio {
        male: 0.0,
        female: 0.0,
    };

    pub fn is_genderless(&self) -> bool {
        self.male == 0.0 && self.female == 0.0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BaseStat {
    /// Uppercased API slug, e.g. `SPECIAL-ATTACK`.
    pub key: String,
    pub value: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvolutionStage {
    pub display_name: String,
    pub trigger_level: Option<i32>,
    pub image_url: String,
    pub evolution_method: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreatureDetail {
    pub id: u32,
    pub name: String,
    pub height_m: f64,
    pub weight_kg: f64,
    pub types: Vec<String>,
    pub image_url: Option<String>,
    pub abilities: Vec<String>,
    pub base_stats: Vec<BaseStat>,
    pub evolution_chain: Vec<EvolutionStage>,
    pub species_label: String,
    pub color: String,
    pub egg_groups: Vec<String>,
    pub egg_cycle: String,
    pub gender_ratio: GenderRatio,
    pub national_dex_number: u32,
    pub flavor_text: String,
}

impl CreatureDetail {
    pub fn stat(&self, key: &str) -> Option<u32> {
        let key = key.to_uppercase();
        self.base_stats
            .iter()
            .find(|stat| stat.key == key)
            .map(|stat| stat.value)
    }

    pub fn stat_total(&self) -> u32 {
        self.base_stats.iter().map(|stat| stat.value).sum()
    }

    /// A single stage means the creature does not evolve.
    pub fn has_evolutions(&self) -> bool {
        self.evolution_chain.len() > 1
    }
}

// ============================================================================
// Screen state
// ============================================================================

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchState {
    pub active: bool,
    pub query: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Screen {
    #[default]
    List,
    Detail,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum DetailTab {
    #[default]
    Info,
    Stats,
    Evolution,
}

impl DetailTab {
    pub const ALL: [DetailTab; 3] = [DetailTab::Info, DetailTab::Stats, DetailTab::Evolution];

    pub fn title(&self) -> &'static str {
        match self {
            DetailTab::Info => "Info",
            DetailTab::Stats => "Stats",
            DetailTab::Evolution => "Evolution",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|tab| tab == self).unwrap_or(0)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppState {
    pub terminal_size: (u16, u16),
    pub screen: Screen,
    pub pager: ListPager,
    pub filtered_indices: Vec<usize>,
    pub selected_index: usize,
    pub search: SearchState,

    /// Store-side mirror of the orchestrator's detail cache, used for
    /// rendering. Keyed by [`cache_key`].
    pub details: HashMap<String, CreatureDetail>,
    pub detail_name: Option<String>,
    pub detail_loading: bool,
    pub detail_error: Option<String>,
    pub detail_tab: DetailTab,
    pub evolution_selected_index: usize,

    pub message: Option<String>,
    pub tick: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            terminal_size: (80, 24),
            screen: Screen::List,
            pager: ListPager::default(),
            filtered_indices: Vec::new(),
            selected_index: 0,
            search: SearchState::default(),
            details: HashMap::new(),
            detail_name: None,
            detail_loading: false,
            detail_error: None,
            detail_tab: DetailTab::Info,
            evolution_selected_index: 0,
            message: None,
            tick: 0,
        }
    }
}

impl AppState {
    pub fn entries(&self) -> &[CreatureSummary] {
        self.pager.entries()
    }

    pub fn selected_entry(&self) -> Option<&CreatureSummary> {
        self.filtered_indices
            .get(self.selected_index)
            .and_then(|idx| self.entries().get(*idx))
    }

    pub fn selected_name(&self) -> Option<String> {
        self.selected_entry().map(|entry| entry.name.clone())
    }

    pub fn set_selected_index(&mut self, index: usize) -> bool {
        if self.filtered_indices.is_empty() {
            self.selected_index = 0;
            return false;
        }
        let bounded = index.min(self.filtered_indices.len() - 1);
        if bounded != self.selected_index {
            self.selected_index = bounded;
            return true;
        }
        false
    }

    /// Recompute the visible rows from the accumulated catalog and the
    /// search query. Matches on name substring or catalog number.
    pub fn rebuild_filtered(&mut self) {
        let query = self.search.query.trim().to_lowercase();
        self.filtered_indices = self
            .entries()
            .iter()
            .enumerate()
            .filter(|(_, entry)| {
                query.is_empty()
                    || entry.name.to_lowercase().contains(&query)
                    || entry
                        .number()
                        .map(|number| number.to_string().contains(&query))
                        .unwrap_or(false)
            })
            .map(|(idx, _)| idx)
            .collect();

        if self.selected_index >= self.filtered_indices.len() {
            self.selected_index = self.filtered_indices.len().saturating_sub(1);
        }
    }

    pub fn detail(&self, name: &str) -> Option<&CreatureDetail> {
        self.details.get(&cache_key(name))
    }

    pub fn current_detail(&self) -> Option<&CreatureDetail> {
        let name = self.detail_name.as_ref()?;
        self.detail(name)
    }

    pub fn is_filtering(&self) -> bool {
        !self.search.query.trim().is_empty()
    }

    /// True when the selection sits close enough to the end of an
    /// unfiltered list that the next page should be fetched.
    pub fn near_list_end(&self) -> bool {
        if self.is_filtering() {
            return false;
        }
        self.selected_index + LOAD_MORE_THRESHOLD >= self.filtered_indices.len()
    }

    pub fn reset_detail_view(&mut self) {
        self.detail_tab = DetailTab::Info;
        self.evolution_selected_index = 0;
        self.detail_error = None;
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        let cursor = self.pager.cursor();
        vec![
            DebugSection::new("Catalog")
                .entry("loaded", ron_string(&self.entries().len()))
                .entry("filtered", ron_string(&self.filtered_indices.len()))
                .entry("selected", ron_string(&self.selected_index))
                .entry("offset", ron_string(&cursor.offset))
                .entry("has_more", ron_string(&cursor.has_more))
                .entry("page_loading", ron_string(&self.pager.is_loading()))
                .entry("page_error", ron_string(&self.pager.error())),
            DebugSection::new("Detail")
                .entry("screen", ron_string(&self.screen))
                .entry("name", ron_string(&self.detail_name))
                .entry("tab", ron_string(&self.detail_tab))
                .entry("evolution_index", ron_string(&self.evolution_selected_index))
                .entry("cached", ron_string(&self.details.len()))
                .entry("loading", ron_string(&self.detail_loading))
                .entry("error", ron_string(&self.detail_error)),
            DebugSection::new("Status")
                .entry("search", ron_string(&self.search.query))
                .entry("search_active", ron_string(&self.search.active))
                .entry("message", ron_string(&self.message)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pager::CatalogPage;

    fn summary(name: &str, id: u32) -> CreatureSummary {
        CreatureSummary {
            name: name.to_string(),
            url: format!("https://pokeapi.co/api/v2/pokemon/{id}/"),
        }
    }

    fn loaded_state(names: &[(&str, u32)]) -> AppState {
        let mut state = AppState::default();
        let request = state.pager.begin();
        assert!(request.is_some());
        state.pager.complete(CatalogPage {
            offset: 0,
            entries: names.iter().map(|(name, id)| summary(name, *id)).collect(),
            has_more: true,
        });
        state.rebuild_filtered();
        state
    }

    #[test]
    fn test_filter_by_name_and_number() {
        let mut state = loaded_state(&[("bulbasaur", 1), ("ivysaur", 2), ("charmander", 4)]);
        assert_eq!(state.filtered_indices, vec![0, 1, 2]);

        state.search.query = "SAUR".to_string();
        state.rebuild_filtered();
        assert_eq!(state.filtered_indices, vec![0, 1]);

        state.search.query = "4".to_string();
        state.rebuild_filtered();
        assert_eq!(state.filtered_indices, vec![2]);
        assert_eq!(state.selected_name().as_deref(), Some("charmander"));
    }

    #[test]
    fn test_selection_is_bounded() {
        let mut state = loaded_state(&[("bulbasaur", 1), ("ivysaur", 2)]);
        assert!(state.set_selected_index(10));
        assert_eq!(state.selected_index, 1);
        assert!(!state.set_selected_index(1));
    }

    #[test]
    fn test_near_list_end_only_when_unfiltered() {
        let names: Vec<(String, u32)> = (1..=10).map(|id| (format!("mon{id}"), id)).collect();
        let refs: Vec<(&str, u32)> = names.iter().map(|(n, id)| (n.as_str(), *id)).collect();
        let mut state = loaded_state(&refs);
        assert!(!state.near_list_end());
        state.set_selected_index(7);
        assert!(state.near_list_end());

        state.search.query = "mon".to_string();
        state.rebuild_filtered();
        assert!(!state.near_list_end());
    }

    #[test]
    fn test_stat_lookup_is_case_insensitive() {
        let detail = CreatureDetail {
            id: 1,
            name: "bulbasaur".into(),
            height_m: 0.7,
            weight_kg: 6.9,
            types: vec!["grass".into()],
            image_url: None,
            abilities: vec![],
            base_stats: vec![
                BaseStat { key: "HP".into(), value: 45 },
                BaseStat { key: "SPECIAL-ATTACK".into(), value: 65 },
            ],
            evolution_chain: vec![],
            species_label: "Seed Pokémon".into(),
            color: "green".into(),
            egg_groups: vec![],
            egg_cycle: "20".into(),
            gender_ratio: GenderRatio { male: 87.5, female: 12.5 },
            national_dex_number: 1,
            flavor_text: String::new(),
        };
        assert_eq!(detail.stat("hp"), Some(45));
        assert_eq!(detail.stat("special-attack"), Some(65));
        assert_eq!(detail.stat("speed"), None);
        assert_eq!(detail.stat_total(), 110);
        assert!(!detail.has_evolutions());
    }
}
