//! Files the binary leaves behind: debug input dumps and the `in` response.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use http_resource_types::Verb;

/// Written into the `in` destination directory.
pub const RESPONSE_FILE_NAME: &str = "response.json";

/// Persist the raw stdin payload as `<verb>-XXXX.json` in `directory`.
pub fn dump_input(verb: Verb, payload: &str, directory: &Path) -> Result<PathBuf> {
    fs::create_dir_all(directory).with_context(|| format!("could not create directory '{}'", directory.display()))?;
    let mut file = tempfile::Builder::new()
        .prefix(&format!("{verb}-"))
        .suffix(".json")
        .tempfile_in(directory)
        .with_context(|| format!("could not create input dump in '{}'", directory.display()))?;
    file.write_all(payload.as_bytes()).context("could not write input dump")?;
    let (_, path) = file.keep()?;
    Ok(path)
}

/// Write the raw response body to `<destination>/response.json`.
pub fn write_response(destination: &Path, body: &str) -> Result<PathBuf> {
    fs::create_dir_all(destination)
        .with_context(|| format!("could not create destination '{}'", destination.display()))?;
    let path = destination.join(RESPONSE_FILE_NAME);
    fs::write(&path, body).with_context(|| format!("could not write '{}'", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_dump_is_prefixed_with_the_verb() {
        let directory = tempfile::tempdir().unwrap();

        let path = dump_input(Verb::Out, r#"{"source": {}}"#, directory.path()).unwrap();

        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("out-"), "unexpected name {name}");
        assert!(name.ends_with(".json"));
        assert_eq!(fs::read_to_string(path).unwrap(), r#"{"source": {}}"#);
    }

    #[test]
    fn response_lands_in_destination_created_on_demand() {
        let directory = tempfile::tempdir().unwrap();
        let destination = directory.path().join("get").join("resource");

        let path = write_response(&destination, r#"{"ok": true}"#).unwrap();

        assert_eq!(path, destination.join("response.json"));
        assert_eq!(fs::read_to_string(path).unwrap(), r#"{"ok": true}"#);
    }
}
