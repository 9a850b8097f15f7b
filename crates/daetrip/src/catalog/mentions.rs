use std::collections::HashSet;

/// Returns the known names that occur verbatim in `text`, ordered by first occurrence.
///
/// Matching is exact and case-sensitive. When two names start at the same offset the
/// longer one comes first. Names that never occur are dropped.
pub fn extract_mentions<'a, I>(text: &str, known_names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut found: Vec<(usize, &str)> = known_names
        .into_iter()
        .filter(|name| !name.is_empty() && seen.insert(*name))
        .filter_map(|name| text.find(name).map(|offset| (offset, name)))
        .collect();

    found.sort_by(|(left_offset, left), (right_offset, right)| {
        left_offset
            .cmp(right_offset)
            .then_with(|| right.len().cmp(&left.len()))
            .then_with(|| left.cmp(right))
    });

    found
        .into_iter()
        .map(|(_, name)| name.to_string())
        .collect()
}
