//! Groups (teams), groupings (distributions) and their fingerprints.

use std::collections::HashSet;

use serde::Serialize;

use crate::participant::{Participant, Scheme};

/// An unordered team of participants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Group {
    members: Vec<Participant>,
}

impl Group {
    pub fn from_members(members: Vec<Participant>) -> Self {
        Self { members }
    }

    pub fn members(&self) -> &[Participant] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Mean rating of the group, `0.0` when empty.
    pub fn strength(&self) -> f64 {
        mean_rating(self.members.iter())
    }

    /// Number of members in the supportive category of `scheme`.
    pub fn supportive_count(&self, scheme: Scheme) -> usize {
        self.members.iter().filter(|p| p.is_supportive(scheme)).count()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|p| p.name.as_str())
    }
}

/// Mean rating over a set of participants, `0.0` when empty.
pub(crate) fn mean_rating<'a>(members: impl IntoIterator<Item = &'a Participant>) -> f64 {
    let (sum, count) = members
        .into_iter()
        .fold((0u32, 0u32), |(sum, count), p| (sum + u32::from(p.rating), count + 1));
    if count == 0 {
        0.0
    } else {
        f64::from(sum) / f64::from(count)
    }
}

/// Order-independent fingerprint of a [`Grouping`]: each group's names
/// sorted, then the groups themselves sorted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Signature(Vec<Vec<String>>);

impl Signature {
    pub fn groups(&self) -> &[Vec<String>] {
        &self.0
    }
}

/// An ordered sequence of groups covering the roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Grouping {
    groups: Vec<Group>,
}

impl Grouping {
    pub fn new(groups: Vec<Group>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of placed participants.
    pub fn participant_count(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    pub fn strengths(&self) -> Vec<f64> {
        self.groups.iter().map(Group::strength).collect()
    }

    /// Skill-spread: highest group mean minus lowest group mean.
    pub fn spread(&self) -> f64 {
        let strengths = self.strengths();
        let max = strengths.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = strengths.iter().copied().fold(f64::INFINITY, f64::min);
        if strengths.is_empty() { 0.0 } else { max - min }
    }

    pub fn signature(&self) -> Signature {
        let mut groups: Vec<Vec<String>> = self
            .groups
            .iter()
            .map(|g| {
                let mut names: Vec<String> = g.names().map(str::to_string).collect();
                names.sort();
                names
            })
            .collect();
        groups.sort();
        Signature(groups)
    }

    /// Unordered name pairs that share a group. Each pair is stored with the
    /// lexicographically smaller name first.
    pub fn co_membership(&self) -> HashSet<(&str, &str)> {
        let mut pairs = HashSet::new();
        for group in &self.groups {
            let names: Vec<&str> = group.names().collect();
            for (i, a) in names.iter().enumerate() {
                for b in &names[i + 1..] {
                    pairs.insert(if a <= b { (*a, *b) } else { (*b, *a) });
                }
            }
        }
        pairs
    }

    /// Number of co-membership pairs shared with `other`.
    pub fn overlap(&self, other: &Grouping) -> usize {
        let ours = self.co_membership();
        other
            .co_membership()
            .iter()
            .filter(|pair| ours.contains(*pair))
            .count()
    }
}
