//! Pure mapping from the three PokeAPI responses into one [`CreatureDetail`].

use crate::api::{EvolutionChainResponse, PokemonResponse, SpeciesResponse};
use crate::evolution::flatten_chain;
use crate::gender::gender_ratio;
use crate::state::{BaseStat, CreatureDetail};

pub const ARTWORK_URL_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork";
pub const UNKNOWN_GENUS: &str = "Unknown";
pub const UNKNOWN_EGG_CYCLE: &str = "Unknown";
pub const FLAVOR_TEXT_PLACEHOLDER: &str = "No description available.";

const ENGLISH: &str = "en";
const NATIONAL_DEX: &str = "national";
const GENDERLESS_CODE: i32 = -1;

pub fn to_creature_detail(
    pokemon: &PokemonResponse,
    species: &SpeciesResponse,
    chain: &EvolutionChainResponse,
) -> CreatureDetail {
    let name = if pokemon.name.is_empty() {
        species.name.clone()
    } else {
        pokemon.name.clone()
    };
    let id = species
        .evolution_chain
        .as_ref()
        .and_then(|chain_ref| extract_id(&chain_ref.url))
        .unwrap_or(0);

    CreatureDetail {
        id,
        name,
        height_m: f64::from(pokemon.height) / 10.0,
        weight_kg: f64::from(pokemon.weight) / 10.0,
        types: pokemon
            .types
            .iter()
            .map(|slot| slot.type_info.name.clone())
            .collect(),
        image_url: image_url(&pokemon.sprites),
        abilities: pokemon
            .abilities
            .iter()
            .map(|slot| slot.ability.name.clone())
            .collect(),
        base_stats: base_stats(pokemon),
        evolution_chain: flatten_chain(&chain.chain),
        species_label: genus(species),
        color: species.color.name.clone(),
        egg_groups: species
            .egg_groups
            .iter()
            .map(|group| group.name.clone())
            .collect(),
        egg_cycle: species
            .hatch_counter
            .map(|cycles| cycles.to_string())
            .unwrap_or_else(|| UNKNOWN_EGG_CYCLE.to_string()),
        gender_ratio: gender_ratio(species.gender_rate.unwrap_or(GENDERLESS_CODE)),
        national_dex_number: national_dex_number(species),
        flavor_text: flavor_text(species),
    }
}

/// Trailing numeric path segment of a resource URL, e.g. `.../pokemon-species/6/` -> 6.
pub fn extract_id(url: &str) -> Option<u32> {
    let mut segments: Vec<&str> = url.split('/').collect();
    if segments.last() == Some(&"") {
        segments.pop();
    }
    segments.last()?.parse().ok()
}

pub fn artwork_url(id: u32) -> String {
    format!("{ARTWORK_URL_BASE}/{id}.png")
}

/// Official artwork first, then the default front sprite.
pub fn image_url(sprites: &serde_json::Value) -> Option<String> {
    pointer_string(sprites, "/other/official-artwork/front_default")
        .or_else(|| pointer_string(sprites, "/front_default"))
}

fn base_stats(pokemon: &PokemonResponse) -> Vec<BaseStat> {
    let mut stats: Vec<BaseStat> = Vec::with_capacity(pokemon.stats.len());
    for slot in &pokemon.stats {
        let key = slot.stat.name.to_uppercase();
        if stats.iter().any(|stat| stat.key == key) {
            continue;
        }
        stats.push(BaseStat {
            key,
            value: slot.base_stat,
        });
    }
    stats
}

fn genus(species: &SpeciesResponse) -> String {
    species
        .genera
        .iter()
        .find(|entry| entry.language.name == ENGLISH)
        .map(|entry| entry.genus.clone())
        .unwrap_or_else(|| UNKNOWN_GENUS.to_string())
}

fn flavor_text(species: &SpeciesResponse) -> String {
    species
        .flavor_text_entries
        .iter()
        .find(|entry| entry.language.name == ENGLISH)
        .map(|entry| sanitize_text(&entry.flavor_text))
        .unwrap_or_else(|| FLAVOR_TEXT_PLACEHOLDER.to_string())
}

fn national_dex_number(species: &SpeciesResponse) -> u32 {
    species
        .pokedex_numbers
        .iter()
        .find(|entry| entry.pokedex.name == NATIONAL_DEX)
        .map(|entry| entry.entry_number)
        .unwrap_or(0)
}

fn sanitize_text(text: &str) -> String {
    text.replace('\n', " ").replace('\u{000C}', " ")
}

fn pointer_string(value: &serde_json::Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}
