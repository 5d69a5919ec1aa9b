// src/matching/manager.rs

use std::collections::{HashMap, HashSet};

use log::info;
use petgraph::unionfind::UnionFind;

use crate::matching::exact::find_exact_pairs;
use crate::matching::fuzzy::find_fuzzy_pairs;
use crate::models::core::LeadRecord;
use crate::models::matching::{DuplicateGroup, MatchMethodStats, MatchMethodType};
use crate::models::scoring::FuzzyMatchConfig;

/// Run both duplicate matchers over the batch and extract the unioned groups.
///
/// Both matchers feed `union(i, j)` calls into a single disjoint set keyed by
/// batch position, so a lead that matches one record exactly and another
/// fuzzily lands in one group with no post-hoc list merging. Groups of size 1
/// are not duplicates and are dropped here. Group membership is in input
/// order and groups are ordered by their first member's position, so the
/// result is a pure function of batch order and configuration.
pub fn find_duplicate_groups(
    batch: &[LeadRecord],
    config: &FuzzyMatchConfig,
) -> (Vec<DuplicateGroup>, MatchMethodStats) {
    let exact_pairs = find_exact_pairs(batch);
    let fuzzy_pairs = find_fuzzy_pairs(batch, config);

    let mut union_find: UnionFind<usize> = UnionFind::new(batch.len());
    let mut matched_indices: HashSet<usize> = HashSet::new();

    for pair in &exact_pairs {
        union_find.union(pair.index_1, pair.index_2);
        matched_indices.insert(pair.index_1);
        matched_indices.insert(pair.index_2);
    }
    for pair in &fuzzy_pairs {
        union_find.union(pair.index_1, pair.index_2);
        matched_indices.insert(pair.index_1);
        matched_indices.insert(pair.index_2);
    }

    // Component roots are only stable once all unions are done
    let mut exact_roots: HashSet<usize> = HashSet::new();
    for pair in &exact_pairs {
        exact_roots.insert(union_find.find(pair.index_1));
    }
    let mut min_fuzzy_by_root: HashMap<usize, f64> = HashMap::new();
    for pair in &fuzzy_pairs {
        let root = union_find.find(pair.index_1);
        min_fuzzy_by_root
            .entry(root)
            .and_modify(|m| *m = m.min(pair.composite))
            .or_insert(pair.composite);
    }

    let mut members_by_root: HashMap<usize, Vec<usize>> = HashMap::new();
    let mut root_order: Vec<usize> = Vec::new();
    for idx in 0..batch.len() {
        if !matched_indices.contains(&idx) {
            continue;
        }
        let root = union_find.find(idx);
        let members = members_by_root.entry(root).or_insert_with(|| {
            root_order.push(root);
            Vec::new()
        });
        members.push(idx);
    }

    let mut groups = Vec::new();
    let mut leads_in_groups = 0usize;
    for root in root_order {
        let members = &members_by_root[&root];
        if members.len() < 2 {
            continue;
        }
        leads_in_groups += members.len();
        let method = if exact_roots.contains(&root) {
            MatchMethodType::Exact
        } else {
            MatchMethodType::Fuzzy
        };
        groups.push(DuplicateGroup {
            lead_ids: members.iter().map(|&i| batch[i].id.clone()).collect(),
            method,
            min_fuzzy_score: min_fuzzy_by_root.get(&root).copied(),
        });
    }

    let stats = MatchMethodStats {
        exact_pairs: exact_pairs.len(),
        fuzzy_pairs: fuzzy_pairs.len(),
        groups_formed: groups.len(),
        leads_in_groups,
    };
    info!(
        "Dedup: {} exact edges, {} fuzzy edges -> {} groups covering {} of {} leads",
        stats.exact_pairs,
        stats.fuzzy_pairs,
        stats.groups_formed,
        stats.leads_in_groups,
        batch.len()
    );

    (groups, stats)
}
