use super::types::Opportunity;

/// Does `opportunity` match `needle`? `needle` must already be lowercase.
fn matches(opportunity: &Opportunity, needle: &str) -> bool {
    opportunity.title.to_lowercase().contains(needle)
        || opportunity.description.to_lowercase().contains(needle)
        || opportunity.source.to_lowercase().contains(needle)
}

/// Client-side filter over a full listing.
///
/// Keeps items whose title, description or source contain `query`
/// case-insensitively, in source order. A blank query keeps everything.
/// This is authoritative: the server-side search hint is not relied on.
pub fn filter_opportunities(list: &[Opportunity], query: &str) -> Vec<Opportunity> {
    let query = query.trim();
    if query.is_empty() {
        return list.to_vec();
    }

    let needle = query.to_lowercase();
    list.iter()
        .filter(|o| matches(o, &needle))
        .cloned()
        .collect()
}
