/// case-insensitive string similarity in 0..=100, standing in for the
/// upstream `fuzz.ratio` used to compare OSM and external-dataset tag
/// values. Built on normalized Levenshtein distance rather than
/// token-sort matching — tag values here are short (names, refs), so the
/// difference rarely matters.
pub fn ratio(a: &str, b: &str) -> u8 {
    let (a, b) = (a.to_lowercase(), b.to_lowercase());
    if a.is_empty() && b.is_empty() {
        return 100;
    }
    let similarity = strsim::normalized_levenshtein(&a, &b);
    (similarity * 100.0).round().clamp(0.0, 100.0) as u8
}
