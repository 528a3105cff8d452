//! Ordering ranks keyed on tag-name prefixes.

/// Ranks of the top-level groups.
pub const TOP_LEVEL_ORDER: &[(&str, u32)] = &[
    ("data:", 1),
    ("mesh", 2),
    ("participant", 3),
    ("m2n:", 4),
    ("coupling-scheme:", 5),
];

/// Ranks of the children of a participant.
pub const PARTICIPANT_ORDER: &[(&str, u32)] = &[
    ("provide-mesh", 1),
    ("receive-mesh", 2),
    ("write-data", 3),
    ("read-data", 4),
    ("mapping:", 5),
];

/// Rank lookup with stable ranks for unrecognised tags.
///
/// A tag matching no known prefix gets the next free rank after all known
/// ranks the first time it is seen, and keeps it for the table's lifetime.
/// Tables are created per render call and never shared.
#[derive(Debug, Clone)]
pub struct RankTable {
    known: &'static [(&'static str, u32)],
    unknown: Vec<String>,
}

impl RankTable {
    /// Creates an empty table over a fixed prefix order.
    pub fn new(known: &'static [(&'static str, u32)]) -> Self {
        Self {
            known,
            unknown: Vec::new(),
        }
    }

    /// Rank of `tag`.
    pub fn rank(&mut self, tag: &str) -> u32 {
        if let Some((_, rank)) = self.known.iter().find(|(prefix, _)| tag.starts_with(prefix)) {
            return *rank;
        }
        let base = self.known.iter().map(|(_, rank)| *rank).max().unwrap_or(0) + 1;
        let position = match self.unknown.iter().position(|seen| seen == tag) {
            Some(position) => position,
            None => {
                self.unknown.push(tag.to_string());
                self.unknown.len() - 1
            }
        };
        base + position as u32
    }

    /// Stable sort of `items` by the rank of their tag.
    pub fn sorted_by_rank<T>(&mut self, items: Vec<T>, tag: impl Fn(&T) -> &str) -> Vec<T> {
        // Ranks are assigned in input order, before sorting.
        let mut ranked: Vec<(u32, T)> = items
            .into_iter()
            .map(|item| (self.rank(tag(&item)), item))
            .collect();
        ranked.sort_by_key(|(rank, _)| *rank);
        ranked.into_iter().map(|(_, item)| item).collect()
    }
}
