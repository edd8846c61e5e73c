use std::ffi::{OsStr, OsString};
use std::path::Path;

/// Name of the inherited search-path variable.
pub const SEARCH_PATH_VAR: &str = "PATH";

#[cfg(windows)]
const PATH_LIST_SEPARATOR: &str = ";";
#[cfg(not(windows))]
const PATH_LIST_SEPARATOR: &str = ":";

/// Prepend `bin_dir` to an inherited search path. Without an inherited value
/// the result is exactly `bin_dir`.
pub fn compose_search_path(bin_dir: &Path, inherited: Option<&OsStr>) -> OsString {
    let mut composed = OsString::from(bin_dir.as_os_str());
    if let Some(rest) = inherited {
        composed.push(PATH_LIST_SEPARATOR);
        composed.push(rest);
    }
    composed
}

/// The search path a child process should inherit, read from this process.
pub fn child_search_path(bin_dir: &Path) -> OsString {
    let inherited = std::env::var_os(SEARCH_PATH_VAR);
    compose_search_path(bin_dir, inherited.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn prepends_to_inherited_path() {
        let bin = PathBuf::from("/work/.venv/bin");
        let composed = compose_search_path(&bin, Some(OsStr::new("/usr/bin:/bin")));

        #[cfg(unix)]
        assert_eq!(composed, OsString::from("/work/.venv/bin:/usr/bin:/bin"));
    }

    #[test]
    fn missing_path_becomes_bin_dir() {
        let bin = PathBuf::from("/work/.venv/bin");
        let composed = compose_search_path(&bin, None);
        assert_eq!(composed, OsString::from("/work/.venv/bin"));
    }

    #[test]
    fn empty_inherited_path_still_gets_separator() {
        let bin = PathBuf::from("env/bin");
        let composed = compose_search_path(&bin, Some(OsStr::new("")));

        #[cfg(unix)]
        assert_eq!(composed, OsString::from("env/bin:"));
    }
}
