//! Evolution chain flattening.
//!
//! PokeAPI returns an evolution chain as a tree rooted at the earliest form.
//! Screens render it as a line, so the tree is walked pre-order: a node's
//! stage comes before the stages of its children, siblings in API order.

use crate::api::{ChainLink, EvolutionDetail};
use crate::format::capitalize;
use crate::mapper::{artwork_url, extract_id};
use crate::state::EvolutionStage;

pub const UNKNOWN_TRIGGER: &str = "Unknown";
pub const UNKNOWN_METHOD: &str = "Unknown Evolution Method";

/// Flatten the tree under `root` into an ordered, non-empty list of stages.
/// A single stage means the creature has no evolutions.
pub fn flatten_chain(root: &ChainLink) -> Vec<EvolutionStage> {
    let mut stages = Vec::new();
    push_stages(root, &mut stages);
    stages
}

fn push_stages(link: &ChainLink, stages: &mut Vec<EvolutionStage>) {
    stages.push(stage_for(link));
    for next in &link.evolves_to {
        push_stages(next, stages);
    }
}

/// Build the stage for one node. Only the first evolution detail is read.
pub fn stage_for(link: &ChainLink) -> EvolutionStage {
    let id = extract_id(&link.species.url).unwrap_or(0);
    let condition = link.evolution_details.first();
    let trigger_level = condition.and_then(|detail| detail.min_level);
    tracing::trace!(
        species = %link.species.name,
        ?trigger_level,
        trigger = trigger_name(condition),
        "evolution stage"
    );
    EvolutionStage {
        display_name: capitalize(&link.species.name),
        trigger_level,
        image_url: artwork_url(id),
        evolution_method: evolution_method(condition),
    }
}

pub fn evolution_method(condition: Option<&EvolutionDetail>) -> String {
    match trigger_name(condition) {
        "level-up" => match condition.and_then(|detail| detail.min_level) {
            Some(level) if level > 0 => format!("Level {level}"),
            _ => "Level Up".to_string(),
        },
        "use-item" => {
            let item = condition
                .and_then(|detail| detail.item.as_ref())
                .map(|item| item_display_name(&item.name))
                .unwrap_or_default();
            format!("Use {item}")
        }
        "trade" => "Trade".to_string(),
        _ => UNKNOWN_METHOD.to_string(),
    }
}

fn trigger_name(condition: Option<&EvolutionDetail>) -> &str {
    condition
        .and_then(|detail| detail.trigger.as_ref())
        .map(|trigger| trigger.name.as_str())
        .unwrap_or(UNKNOWN_TRIGGER)
}

fn item_display_name(raw: &str) -> String {
    raw.split('-')
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::NamedResource;
    use pretty_assertions::assert_eq;

    fn species_url(id: u32) -> String {
        format!("https://pokeapi.co/api/v2/pokemon-species/{id}/")
    }

    fn node(name: &str, id: u32, details: Vec<EvolutionDetail>, children: Vec<ChainLink>) -> ChainLink {
        ChainLink {
            species: NamedResource {
                name: name.to_string(),
                url: species_url(id),
            },
            evolves_to: children,
            evolution_details: details,
        }
    }

    fn trigger(name: &str) -> Option<NamedResource> {
        Some(NamedResource {
            name: name.to_string(),
            url: String::new(),
        })
    }

    fn level_up(level: Option<i32>) -> EvolutionDetail {
        EvolutionDetail {
            min_level: level,
            trigger: trigger("level-up"),
            ..Default::default()
        }
    }

    fn use_item(item: Option<&str>) -> EvolutionDetail {
        EvolutionDetail {
            trigger: trigger("use-item"),
            item: item.map(|name| NamedResource {
                name: name.to_string(),
                url: String::new(),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_single_node_yields_one_stage() {
        let root = node("tauros", 128, vec![], vec![]);
        let stages = flatten_chain(&root);
        assert_eq!(stages.len(), 1);
        assert_eq!(stages[0].display_name, "Tauros");
        assert_eq!(stages[0].trigger_level, None);
        assert_eq!(stages[0].evolution_method, UNKNOWN_METHOD);
        assert_eq!(
            stages[0].image_url,
            "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork/128.png"
        );
    }

    #[test]
    fn test_linear_chain_in_order() {
        let root = node(
            "charmander",
            4,
            vec![],
            vec![node(
                "charmeleon",
                5,
                vec![level_up(Some(16))],
                vec![node("charizard", 6, vec![level_up(Some(36))], vec![])],
            )],
        );
        let stages = flatten_chain(&root);
        let names: Vec<_> = stages.iter().map(|s| s.display_name.as_str()).collect();
        assert_eq!(names, vec!["Charmander", "Charmeleon", "Charizard"]);
        assert_eq!(stages[1].evolution_method, "Level 16");
        assert_eq!(stages[1].trigger_level, Some(16));
        assert_eq!(stages[2].evolution_method, "Level 36");
        assert!(stages[2].image_url.ends_with("/6.png"));
    }

    #[test]
    fn test_branches_flatten_pre_order() {
        // root -> [a -> [a1], b]
        let root = node(
            "oddish",
            43,
            vec![],
            vec![
                node(
                    "gloom",
                    44,
                    vec![level_up(Some(21))],
                    vec![node("vileplume", 45, vec![use_item(Some("leaf-stone"))], vec![])],
                ),
                node("bellossom", 182, vec![use_item(Some("sun-stone"))], vec![]),
            ],
        );
        let names: Vec<_> = flatten_chain(&root)
            .into_iter()
            .map(|stage| stage.display_name)
            .collect();
        assert_eq!(names, vec!["Oddish", "Gloom", "Vileplume", "Bellossom"]);
    }

    #[test]
    fn test_method_labels() {
        assert_eq!(evolution_method(Some(&level_up(Some(16)))), "Level 16");
        assert_eq!(evolution_method(Some(&level_up(None))), "Level Up");
        assert_eq!(evolution_method(Some(&level_up(Some(0)))), "Level Up");
        assert_eq!(evolution_method(Some(&use_item(Some("fire-stone")))), "Use Fire Stone");
        assert_eq!(
            evolution_method(Some(&EvolutionDetail {
                trigger: trigger("trade"),
                ..Default::default()
            })),
            "Trade"
        );
        assert_eq!(evolution_method(None), UNKNOWN_METHOD);
        assert_eq!(
            evolution_method(Some(&EvolutionDetail {
                trigger: trigger("shed"),
                ..Default::default()
            })),
            UNKNOWN_METHOD
        );
    }

    #[test]
    fn test_use_item_without_item_does_not_panic() {
        assert_eq!(evolution_method(Some(&use_item(None))), "Use ");
    }

    #[test]
    fn test_only_first_condition_is_read() {
        let link = node(
            "espeon",
            196,
            vec![
                EvolutionDetail {
                    min_happiness: Some(160),
                    time_of_day: "day".to_string(),
                    trigger: trigger("level-up"),
                    ..Default::default()
                },
                use_item(Some("sun-stone")),
            ],
            vec![],
        );
        let stage = stage_for(&link);
        assert_eq!(stage.evolution_method, "Level Up");
        assert_eq!(stage.trigger_level, None);
    }

    #[test]
    fn test_malformed_species_url_still_builds_stage() {
        let link = ChainLink {
            species: NamedResource {
                name: "glitch".to_string(),
                url: "not a url".to_string(),
            },
            ..Default::default()
        };
        let stage = stage_for(&link);
        assert!(stage.image_url.ends_with("/0.png"));
    }
}
