use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::constants::unpack::SPLIT_ORDER;

/// Dataset partitions laid out as subfolders of the unpacker input directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitFolder {
    /// Training split (`train/`).
    Train,
    /// Test split (`test/`).
    Test,
    /// Development split (`dev/`).
    Dev,
}

impl SplitFolder {
    /// Every split in canonical processing order.
    pub fn all() -> [SplitFolder; 3] {
        SPLIT_ORDER
    }

    /// Subfolder name on disk.
    pub fn dir_name(self) -> &'static str {
        match self {
            SplitFolder::Train => "train",
            SplitFolder::Test => "test",
            SplitFolder::Dev => "dev",
        }
    }

    /// Absolute location of this split under `input_dir`.
    pub fn path_in(self, input_dir: &Path) -> PathBuf {
        input_dir.join(self.dir_name())
    }
}

impl fmt::Display for SplitFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}
