use std::path::{Path, PathBuf};

use crate::model::{Category, Partition};

/// Quote asset of every pool the exports were computed for.
pub const QUOTE_ASSET: &str = "wbnb";

/// The fixed set of eight reward exports, one per (partition, category).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTable {
    paths: [[PathBuf; 4]; 2],
}

impl SourceTable {
    /// Lays out the exports of one round under `input_dir`, named
    /// `<category>_wbnb_<p1|p2>_p_<round>.csv`.
    pub fn from_directory(input_dir: &Path, round: &str) -> Self {
        Self::from_fn(|partition, category| {
            input_dir.join(format!(
                "{category}_{QUOTE_ASSET}_{}_p_{round}.csv",
                partition.file_tag()
            ))
        })
    }

    /// Builds a table by asking `path_for` for every slot.
    pub fn from_fn(mut path_for: impl FnMut(Partition, Category) -> PathBuf) -> Self {
        let paths = Partition::ALL.map(|partition| {
            Category::ALL.map(|category| path_for(partition, category))
        });
        Self { paths }
    }

    pub fn path(&self, partition: Partition, category: Category) -> &Path {
        &self.paths[partition_index(partition)][category_index(category)]
    }

    /// Iterates the exports in processing order: every category of partition
    /// 1, then every category of partition 2.
    pub fn iter(&self) -> impl Iterator<Item = (Partition, Category, &Path)> + '_ {
        Partition::ALL.into_iter().flat_map(move |partition| {
            Category::ALL
                .into_iter()
                .map(move |category| (partition, category, self.path(partition, category)))
        })
    }
}

fn partition_index(partition: Partition) -> usize {
    match partition {
        Partition::Part1 => 0,
        Partition::Part2 => 1,
    }
}

fn category_index(category: Category) -> usize {
    match category {
        Category::Btcb => 0,
        Category::Busd => 1,
        Category::Eth => 2,
        Category::Usdt => 3,
    }
}
