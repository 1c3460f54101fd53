//! Grouping engine
//!
//! Pure, deterministic arrangements of a goroutine collection. Nothing here
//! clones a [`GoRoutine`]: every function returns references into the input
//! slice, and an empty input always yields an empty result.
//!
//! - [`by_id`], [`by_age_then_id`]: total orders
//! - [`age_groups`], [`stack_groups`], [`status_groups`]: ordered partitions,
//!   each bucket sorted by id
//! - [`by_status`]: unordered status index
//! - [`group`]: labelled [`Group`]s for a [`GroupBy`] mode

use crate::model::GoRoutine;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::time::Duration;

/// Partitioning strategy chosen at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    /// One implicit group, sorted by age then id
    #[default]
    None,
    /// One group per distinct age
    Age,
    /// One group per identical call-stack fingerprint
    Stack,
    /// One group per status string
    Status,
}

impl GroupBy {
    pub fn is_active(self) -> bool {
        self != GroupBy::None
    }
}

/// SHA-256 over every pointer argument of every frame, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn of(goroutine: &GoRoutine) -> Self {
        let mut hasher = Sha256::new();
        for value in goroutine.all_arguments() {
            hasher.update(value.to_be_bytes());
        }
        let digest = hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Fingerprint(bytes)
    }

    /// First eight hex digits
    pub fn short(&self) -> String {
        self.0[..4].iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

/// What the members of a [`Group`] have in common
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupKey {
    All,
    Age(Option<Duration>),
    Stack(Fingerprint),
    Status(String),
}

/// One bucket of goroutines
#[derive(Debug, Clone)]
pub struct Group<'a> {
    pub key: GroupKey,
    pub members: Vec<&'a GoRoutine>,
}

impl<'a> Group<'a> {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'a GoRoutine> {
        self.members.get(index).copied()
    }

    /// Text shown for this group in the group list
    pub fn label(&self) -> String {
        match &self.key {
            GroupKey::All => "all goroutines".to_string(),
            GroupKey::Age(age) => format_age(*age),
            GroupKey::Stack(fingerprint) => {
                let function = self
                    .members
                    .first()
                    .and_then(|g| g.first_frame())
                    .map(|f| format!("{}.{}", f.package_base(), f.function))
                    .unwrap_or_default();
                format!("{} {}", fingerprint.short(), function)
            }
            GroupKey::Status(status) => status.clone(),
        }
    }
}

/// Human-readable age, `-` when the header carried none
pub fn format_age(age: Option<Duration>) -> String {
    match age {
        Some(age) => humantime::format_duration(age).to_string(),
        None => "-".to_string(),
    }
}

/// Ascending by id
pub fn by_id(goroutines: &[GoRoutine]) -> Vec<&GoRoutine> {
    let mut sorted: Vec<&GoRoutine> = goroutines.iter().collect();
    sorted.sort_by_key(|g| g.id);
    sorted
}

/// Ascending by age (absent first), then by id
pub fn by_age_then_id(goroutines: &[GoRoutine]) -> Vec<&GoRoutine> {
    let mut sorted: Vec<&GoRoutine> = goroutines.iter().collect();
    sorted.sort_by_key(|g| (g.age, g.id));
    sorted
}

/// Buckets of equal age, in strictly increasing age order
pub fn age_groups(goroutines: &[GoRoutine]) -> Vec<Vec<&GoRoutine>> {
    let mut groups: Vec<Vec<&GoRoutine>> = Vec::new();
    for goroutine in by_age_then_id(goroutines) {
        match groups.last_mut() {
            Some(group) if group[0].age == goroutine.age => group.push(goroutine),
            _ => groups.push(vec![goroutine]),
        }
    }
    groups
}

/// Buckets of identical call-stack fingerprint, ordered by first occurrence
pub fn stack_groups(goroutines: &[GoRoutine]) -> Vec<Vec<&GoRoutine>> {
    keyed_stack_groups(goroutines)
        .into_iter()
        .map(|(_, members)| members)
        .collect()
}

fn keyed_stack_groups(goroutines: &[GoRoutine]) -> Vec<(Fingerprint, Vec<&GoRoutine>)> {
    let mut index: FxHashMap<Fingerprint, usize> = FxHashMap::default();
    let mut groups: Vec<(Fingerprint, Vec<&GoRoutine>)> = Vec::new();
    for goroutine in goroutines {
        let fingerprint = Fingerprint::of(goroutine);
        let slot = *index.entry(fingerprint).or_insert_with(|| {
            groups.push((fingerprint, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(goroutine);
    }
    for (_, members) in &mut groups {
        members.sort_by_key(|g| g.id);
    }
    groups
}

/// Status string -> goroutines carrying it, in input order
pub fn by_status(goroutines: &[GoRoutine]) -> FxHashMap<&str, Vec<&GoRoutine>> {
    let mut map: FxHashMap<&str, Vec<&GoRoutine>> = FxHashMap::default();
    for goroutine in goroutines {
        map.entry(goroutine.status.as_str()).or_default().push(goroutine);
    }
    map
}

/// Buckets per status, ordered by status string
pub fn status_groups(goroutines: &[GoRoutine]) -> Vec<Vec<&GoRoutine>> {
    let mut buckets: Vec<(&str, Vec<&GoRoutine>)> = by_status(goroutines).into_iter().collect();
    buckets.sort_by(|a, b| a.0.cmp(b.0));
    buckets
        .into_iter()
        .map(|(_, mut members)| {
            members.sort_by_key(|g| g.id);
            members
        })
        .collect()
}

/// Build the labelled groups for `mode`
///
/// `GroupBy::None` yields a single [`GroupKey::All`] group, even when the
/// input is empty.
pub fn group(goroutines: &[GoRoutine], mode: GroupBy) -> Vec<Group<'_>> {
    match mode {
        GroupBy::None => vec![Group {
            key: GroupKey::All,
            members: by_age_then_id(goroutines),
        }],
        GroupBy::Age => age_groups(goroutines)
            .into_iter()
            .map(|members| Group {
                key: GroupKey::Age(members[0].age),
                members,
            })
            .collect(),
        GroupBy::Stack => keyed_stack_groups(goroutines)
            .into_iter()
            .map(|(fingerprint, members)| Group {
                key: GroupKey::Stack(fingerprint),
                members,
            })
            .collect(),
        GroupBy::Status => status_groups(goroutines)
            .into_iter()
            .map(|members| Group {
                key: GroupKey::Status(members[0].status.clone()),
                members,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Frame;

    fn goroutine(id: u64, status: &str, minutes: Option<u64>, args: &[u64]) -> GoRoutine {
        let mut g = GoRoutine::new(id, status);
        g.age = minutes.map(|m| Duration::from_secs(m * 60));
        g.stack.push(Frame {
            package: "main".to_string(),
            function: format!("f{}", id),
            arguments: args.to_vec(),
            file: "/src/main.go".to_string(),
            line: 1,
            ..Frame::default()
        });
        g
    }

    fn ids(group: &[&GoRoutine]) -> Vec<u64> {
        group.iter().map(|g| g.id).collect()
    }

    fn sample() -> Vec<GoRoutine> {
        vec![
            goroutine(9, "select", Some(5), &[0x1]),
            goroutine(3, "running", None, &[0x2]),
            goroutine(7, "select", Some(1), &[0x1]),
            goroutine(1, "chan receive", Some(5), &[0x3]),
            goroutine(4, "running", None, &[0x2]),
        ]
    }

    #[test]
    fn test_by_id() {
        let goroutines = sample();
        assert_eq!(ids(&by_id(&goroutines)), vec![1, 3, 4, 7, 9]);
    }

    #[test]
    fn test_by_age_then_id() {
        let goroutines = sample();
        assert_eq!(ids(&by_age_then_id(&goroutines)), vec![3, 4, 7, 1, 9]);
    }

    #[test]
    fn test_age_groups() {
        let goroutines = sample();
        let groups = age_groups(&goroutines);
        let grouped: Vec<Vec<u64>> = groups.iter().map(|g| ids(g)).collect();
        assert_eq!(grouped, vec![vec![3, 4], vec![7], vec![1, 9]]);
    }

    #[test]
    fn test_stack_groups_first_occurrence_order() {
        let goroutines = sample();
        let groups = stack_groups(&goroutines);
        let grouped: Vec<Vec<u64>> = groups.iter().map(|g| ids(g)).collect();
        // 0x1 first seen on 9, then 0x2 on 3, then 0x3 on 1
        assert_eq!(grouped, vec![vec![7, 9], vec![3, 4], vec![1]]);
    }

    #[test]
    fn test_by_status() {
        let goroutines = sample();
        let map = by_status(&goroutines);
        assert_eq!(map.len(), 3);
        assert_eq!(ids(&map["select"]), vec![9, 7]);
        assert_eq!(ids(&map["running"]), vec![3, 4]);
    }

    #[test]
    fn test_status_groups_sorted() {
        let goroutines = sample();
        let groups = group(&goroutines, GroupBy::Status);
        let labels: Vec<String> = groups.iter().map(|g| g.label()).collect();
        assert_eq!(labels, vec!["chan receive", "running", "select"]);
        assert_eq!(ids(&groups[2].members), vec![7, 9]);
    }

    #[test]
    fn test_group_labels() {
        let goroutines = sample();
        let groups = group(&goroutines, GroupBy::Age);
        let labels: Vec<String> = groups.iter().map(|g| g.label()).collect();
        assert_eq!(labels, vec!["-", "1m", "5m"]);

        let groups = group(&goroutines, GroupBy::None);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].label(), "all goroutines");
    }

    #[test]
    fn test_fingerprint_depends_on_order() {
        let a = goroutine(1, "running", None, &[0x1, 0x2]);
        let b = goroutine(2, "running", None, &[0x2, 0x1]);
        let c = goroutine(3, "running", None, &[0x1, 0x2]);
        assert_ne!(Fingerprint::of(&a), Fingerprint::of(&b));
        assert_eq!(Fingerprint::of(&a), Fingerprint::of(&c));
        assert_eq!(Fingerprint::of(&a).short().len(), 8);
    }

    #[test]
    fn test_empty_input() {
        let empty: Vec<GoRoutine> = Vec::new();
        assert!(by_id(&empty).is_empty());
        assert!(by_age_then_id(&empty).is_empty());
        assert!(age_groups(&empty).is_empty());
        assert!(stack_groups(&empty).is_empty());
        assert!(by_status(&empty).is_empty());
        assert!(group(&empty, GroupBy::Age).is_empty());
        assert!(group(&empty, GroupBy::None)[0].is_empty());
    }
}
