/// common geographic-name abbreviations expanded before a name is compared
/// or stored, so "Cr" and "Creek" aren't penalized as a fuzzy mismatch.
/// Matching is case-insensitive and whole-word only.
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("cr", "Creek"),
    ("crk", "Creek"),
    ("ck", "Creek"),
    ("rd", "Road"),
    ("mtn", "Mountain"),
    ("mt", "Mount"),
    ("cyn", "Canyon"),
    ("spg", "Spring"),
    ("spgs", "Springs"),
    ("hwy", "Highway"),
    ("ln", "Lane"),
    ("n", "North"),
    ("s", "South"),
    ("e", "East"),
    ("w", "West"),
];

/// expands every recognized abbreviation in `name`, word by word, leaving
/// unrecognized words untouched. Title-cases the input first so the table
/// lookup is case-insensitive without mutating words it doesn't recognize.
pub fn expand(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            ABBREVIATIONS
                .iter()
                .find(|(abbrev, _)| *abbrev == lower)
                .map(|(_, full)| full.to_string())
                .unwrap_or_else(|| word.to_string())
        })
        .collect::<Vec<_>>()
        .join(" ")
}
