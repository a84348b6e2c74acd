use serde::{Deserialize, Serialize};

use crate::pager::CatalogPage;
use crate::state::CreatureDetail;

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[action(infer_categories)]
pub enum Action {
    Init,

    PageRequest,
    PageRetry,
    PageDidLoad(CatalogPage),
    PageDidError { offset: u32, error: String },

    SelectionMove(i16),
    SelectionPage(i16),
    DexSelect(usize),
    OpenSelected,
    Back,

    SearchStart,
    SearchCancel,
    SearchSubmit,
    SearchInput(char),
    SearchBackspace,

    /// `name` is the key the record was requested under.
    CreatureDidLoad { name: String, detail: CreatureDetail },
    CreatureDidError { name: String, error: String },

    DetailTabNext,
    DetailTabPrev,
    EvolutionSelect(usize),
    EvolutionOpen,

    UiTerminalResize(u16, u16),
    Tick,
    Quit,
}
