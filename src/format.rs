//! Display helpers shared by the TUI and the `show` subcommand.

pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `1.7` -> `5'6" (1.7m)`.
pub fn format_height(meters: f64) -> String {
    let inches = (meters * 39.37) as u32;
    format!("{}'{}\" ({}m)", inches / 12, inches % 12, meters)
}

/// `90.5` -> `199.5 lbs (90.5 kg)`.
pub fn format_weight(kilograms: f64) -> String {
    format!("{:.1} lbs ({:.1} kg)", kilograms * 2.20462, kilograms)
}

pub fn format_stat_name(stat: &str) -> String {
    match stat.to_lowercase().as_str() {
        "special-attack" => "Sp. Atk".to_string(),
        "special-defense" => "Sp. Def".to_string(),
        "hp" => "HP".to_string(),
        other => format_name(other),
    }
}

/// Hyphenated API slug to words: `solar-power` -> `Solar Power`.
pub fn format_name(slug: &str) -> String {
    slug.split('-')
        .filter(|part| !part.is_empty())
        .map(|part| capitalize(&part.to_lowercase()))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("pikachu"), "Pikachu");
        assert_eq!(capitalize("Mew"), "Mew");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_height_and_weight() {
        assert_eq!(format_height(1.7), "5'6\" (1.7m)");
        assert_eq!(format_height(0.4), "1'3\" (0.4m)");
        assert_eq!(format_weight(90.5), "199.5 lbs (90.5 kg)");
        assert_eq!(format_weight(6.0), "13.2 lbs (6.0 kg)");
    }

    #[test]
    fn test_stat_names() {
        assert_eq!(format_stat_name("SPECIAL-ATTACK"), "Sp. Atk");
        assert_eq!(format_stat_name("special-defense"), "Sp. Def");
        assert_eq!(format_stat_name("HP"), "HP");
        assert_eq!(format_stat_name("ATTACK"), "Attack");
        assert_eq!(format_name("solar-power"), "Solar Power");
    }
}
