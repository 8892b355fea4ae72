//! Similarity grouping over the fingerprint index.
//!
//! Every unordered pair of records is compared by Hamming distance and
//! matching pairs are merged through a union-find, so similarity is treated
//! as transitive: chains of slightly-different recompressions collapse into
//! one group even when their endpoints exceed the threshold directly.
//!
//! The all-pairs comparison is quadratic by design. That puts the practical
//! ceiling at tens of thousands of images, which is the intended corpus
//! size; bucketing or BK-tree style indexing would be an extension, not a
//! correctness requirement.

use rayon::prelude::*;

use crate::types::ImageRecord;

/// Array-based disjoint-set with path compression and union by rank
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, i: usize) -> usize {
        if self.parent[i] != i {
            self.parent[i] = self.find(self.parent[i]);
        }
        self.parent[i]
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

/// Partition records into clusters of positions whose fingerprints are
/// (transitively) within `threshold` bits of each other.
///
/// The pair space is scanned on the rayon pool; matching pairs are merged in
/// a single serial union step afterwards. Order of comparison is irrelevant:
/// the similarity relation is symmetric and union is associative. Clusters
/// come back ordered by their smallest member position, members ascending,
/// singletons included — together they cover every record exactly once.
pub fn group(records: &[ImageRecord], threshold: u32) -> Vec<Vec<usize>> {
    let n = records.len();

    let matches: Vec<(usize, usize)> = (0..n)
        .into_par_iter()
        .flat_map_iter(|i| {
            (i + 1..n).filter_map(move |j| {
                records[i]
                    .fingerprint
                    .is_similar(&records[j].fingerprint, threshold)
                    .then_some((i, j))
            })
        })
        .collect();

    let mut sets = DisjointSet::new(n);
    for (i, j) in matches {
        sets.union(i, j);
    }

    // Bucket positions by root, first-seen order
    let mut cluster_of_root = std::collections::HashMap::new();
    let mut clusters: Vec<Vec<usize>> = Vec::new();
    for i in 0..n {
        let root = sets.find(i);
        let idx = *cluster_of_root.entry(root).or_insert_with(|| {
            clusters.push(Vec::new());
            clusters.len() - 1
        });
        clusters[idx].push(i);
    }

    clusters
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::Dhash;
    use std::path::PathBuf;

    fn record(name: &str, hash: u64) -> ImageRecord {
        ImageRecord {
            path: PathBuf::from(name),
            fingerprint: Dhash(hash),
            width: 100,
            height: 100,
            byte_size: 1000,
        }
    }

    #[test]
    fn identical_fingerprints_form_one_cluster() {
        let records = vec![record("a", 42), record("b", 42), record("c", !42)];
        let clusters = group(&records, 5);
        assert_eq!(clusters, vec![vec![0, 1], vec![2]]);
    }

    #[test]
    fn transitive_chain_merges_despite_distant_endpoints() {
        // d(a,b) = 3, d(b,c) = 4, d(a,c) = 7 > threshold
        let a = 0u64;
        let b = a ^ 0b111;
        let c = b ^ 0b1111000;
        let records = vec![record("a", a), record("b", b), record("c", c)];

        assert!(Dhash(a).distance(&Dhash(c)) > 5);
        let clusters = group(&records, 5);
        assert_eq!(clusters, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn clusters_partition_the_index() {
        let records = vec![
            record("a", 0),
            record("b", 1),
            record("c", u64::MAX),
            record("d", u64::MAX ^ 0b11),
            record("e", 0xF0F0_F0F0_F0F0_F0F0),
        ];
        let clusters = group(&records, 5);

        let mut seen: Vec<usize> = clusters.iter().flatten().copied().collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn no_matches_yields_all_singletons() {
        let records = vec![
            record("a", 0),
            record("b", u64::MAX),
            record("c", 0x00FF_FF00_00FF_FF00),
        ];
        let clusters = group(&records, 5);
        assert_eq!(clusters.len(), 3);
        assert!(clusters.iter().all(|c| c.len() == 1));
    }

    #[test]
    fn empty_index_groups_to_nothing() {
        assert!(group(&[], 5).is_empty());
    }
}
