#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    LoadPage { offset: u32, limit: u32 },
    /// Foreground lookup for the detail screen.
    ResolveCreature { name: String },
    /// Background lookups for freshly listed rows.
    PrefetchCreatures { names: Vec<String> },
}
