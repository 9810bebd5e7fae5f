use std::path::PathBuf;

pub fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

pub fn packs_root() -> PathBuf {
    workspace_root().join("fixtures").join("packs")
}

pub fn pack_dir(name: &str) -> PathBuf {
    packs_root().join(name)
}

pub fn testcase_path(name: &str) -> PathBuf {
    pack_dir(name).join("testcase.json")
}

/// Every bundled pack directory, sorted by name.
pub fn pack_names() -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(packs_root()) else {
        return Vec::new();
    };
    let mut names = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect::<Vec<_>>();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workspace_root_points_to_workspace() {
        assert!(workspace_root().join("Cargo.toml").exists());
    }

    #[test]
    fn packs_root_points_to_fixture_directory() {
        assert!(packs_root().is_dir());
    }

    #[test]
    fn pack_dir_joins_name() {
        assert!(pack_dir("01-hello").is_dir());
    }

    #[test]
    fn testcase_path_joins_default_filename() {
        let path = testcase_path("01-hello");
        assert!(path.ends_with("testcase.json"));
        assert!(path.exists());
    }

    #[test]
    fn pack_names_are_sorted() {
        let names = pack_names();
        assert_eq!(names.first().map(String::as_str), Some("01-hello"));
        assert!(names.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
