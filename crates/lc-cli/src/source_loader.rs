use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use lc_api::load_pack_from_map;
use walkdir::WalkDir;

use crate::{map_cli_source_path, map_cli_source_read, map_cli_source_scan, CliError, LoadedPack};

const PACK_REF_PREFIX: &str = "pack-dir:";

pub(crate) fn load_pack_by_dir(pack_dir: &str) -> Result<LoadedPack, CliError> {
    let root = resolve_pack_dir(pack_dir)?;
    let files = read_pack_files_from_dir(&root)?;
    let pack = load_pack_from_map(&files)?;
    log::debug!("loaded pack {} ({} files)", root.display(), files.len());

    Ok(LoadedPack {
        id: make_pack_id(&root),
        pack,
    })
}

pub(crate) fn load_pack_by_ref(pack_ref: &str) -> Result<LoadedPack, CliError> {
    let Some(raw) = pack_ref.strip_prefix(PACK_REF_PREFIX) else {
        return Err(CliError::new(
            "CLI_SOURCE_REF_INVALID",
            format!("Unsupported pack ref: {}", pack_ref),
        ));
    };
    load_pack_by_dir(raw)
}

pub(crate) fn resolve_pack_dir(pack_dir: &str) -> Result<PathBuf, CliError> {
    let path = PathBuf::from(pack_dir);
    let absolute = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .map_err(map_cli_source_path)?
            .join(path)
    };

    if !absolute.exists() {
        return Err(CliError::new(
            "CLI_SOURCE_NOT_FOUND",
            format!("pack-dir does not exist: {}", absolute.display()),
        ));
    }

    if !absolute.is_dir() {
        return Err(CliError::new(
            "CLI_SOURCE_NOT_DIR",
            format!("pack-dir is not a directory: {}", absolute.display()),
        ));
    }

    Ok(absolute)
}

pub(crate) fn read_pack_files_from_dir(
    pack_dir: &Path,
) -> Result<BTreeMap<String, String>, CliError> {
    let mut files = BTreeMap::new();

    for entry in WalkDir::new(pack_dir)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }

        let relative = path
            .strip_prefix(pack_dir)
            .map_err(map_cli_source_scan)?
            .to_string_lossy()
            .replace('\\', "/");

        let content = fs::read_to_string(path).map_err(map_cli_source_read)?;
        files.insert(relative, content);
    }

    if files.is_empty() {
        return Err(CliError::new(
            "CLI_SOURCE_EMPTY",
            format!("No .json files under {}", pack_dir.display()),
        ));
    }

    Ok(files)
}

pub(crate) fn make_pack_id(pack_dir: &Path) -> String {
    format!("{}{}", PACK_REF_PREFIX, pack_dir.display())
}
