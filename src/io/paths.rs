use crate::types::AncillaryDataPaths;
use std::collections::BTreeMap;
use std::path::Path;

/// Keep only the entries of a `{group -> {key -> path}}` mapping whose path
/// exists right now.
///
/// Every input group is present in the output, possibly with an empty inner
/// mapping. A path that cannot be stat-ed (e.g. permission denied) counts as
/// missing. Nothing is cached: each call checks the file system again.
pub fn filter_missing_path<G, K, P>(
    paths: &BTreeMap<G, BTreeMap<K, P>>,
) -> BTreeMap<G, BTreeMap<K, P>>
where
    G: Ord + Clone,
    K: Ord + Clone,
    P: AsRef<Path> + Clone,
{
    paths
        .iter()
        .map(|(group, entries)| {
            let available = entries
                .iter()
                .filter(|(_, path)| path_exists(path.as_ref()))
                .map(|(key, path)| (key.clone(), path.clone()))
                .collect();
            (group.clone(), available)
        })
        .collect()
}

fn path_exists(path: &Path) -> bool {
    match path.try_exists() {
        Ok(true) => true,
        Ok(false) => {
            log::debug!("Dropping missing path {}", path.display());
            false
        }
        Err(e) => {
            log::debug!("Treating unreadable path {} as missing: {}", path.display(), e);
            false
        }
    }
}

impl AncillaryDataPaths {
    /// Same categories, restricted to files that exist on disk
    pub fn available(&self) -> AncillaryDataPaths {
        AncillaryDataPaths {
            categories: filter_missing_path(&self.categories),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Polarization;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_filter_missing_path() {
        let dir = TempDir::new().unwrap();
        let existing = dir.path().to_path_buf();
        let missing = dir.path().join("does-not-exist.xml");

        let mut paths: BTreeMap<&str, BTreeMap<&str, PathBuf>> = BTreeMap::new();
        paths.insert(
            "paths1",
            BTreeMap::from([("path1", existing.clone()), ("path2", missing.clone())]),
        );
        paths.insert(
            "paths2",
            BTreeMap::from([("path1", missing.clone()), ("path2", missing)]),
        );

        let res = filter_missing_path(&paths);

        let mut expected: BTreeMap<&str, BTreeMap<&str, PathBuf>> = BTreeMap::new();
        expected.insert("paths1", BTreeMap::from([("path1", existing)]));
        expected.insert("paths2", BTreeMap::new());
        assert_eq!(res, expected);
    }

    #[test]
    fn test_filter_rechecks_every_call() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("s1b-iw1-slc-vv.xml");

        let mut paths = AncillaryDataPaths::new();
        paths.insert("annotation_path", Polarization::VV, &file);

        assert!(paths.available().categories["annotation_path"].is_empty());

        std::fs::write(&file, "<product/>").unwrap();
        assert_eq!(paths.available().categories["annotation_path"].len(), 1);

        std::fs::remove_file(&file).unwrap();
        assert!(paths.available().categories["annotation_path"].is_empty());
    }

    #[test]
    fn test_unstatable_path_counts_as_missing() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("manifest.safe");
        std::fs::write(&file, "").unwrap();
        // A regular file cannot have children, stat fails with ENOTDIR
        let below_file = file.join("child.xml");

        let mut paths: BTreeMap<&str, BTreeMap<&str, PathBuf>> = BTreeMap::new();
        paths.insert("g", BTreeMap::from([("k", below_file), ("ok", file.clone())]));

        let res = filter_missing_path(&paths);
        assert_eq!(res["g"].len(), 1);
        assert_eq!(res["g"]["ok"], file);
    }
}
