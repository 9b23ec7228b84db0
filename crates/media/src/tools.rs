//! Discovery and invocation of external programs.

use slidecast_core::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Locate an executable on `PATH`.
pub fn find_tool(name: &str) -> Result<PathBuf> {
    which::which(name).map_err(|_| Error::ToolNotFound(name.to_string()))
}

/// Locate the first of several alternative executables.
pub fn find_any_tool(names: &[&str]) -> Result<PathBuf> {
    names
        .iter()
        .find_map(|name| which::which(name).ok())
        .ok_or_else(|| Error::ToolNotFound(names.join(" or ")))
}

/// Run a program to completion, turning a non-zero exit into `on_failure`.
pub(crate) fn run_tool(program: &Path, args: &[String], on_failure: fn(String) -> Error) -> Result<Output> {
    log::debug!("Running {} {}", program.display(), args.join(" "));

    let output = Command::new(program).args(args).output()?;
    if !output.status.success() {
        return Err(on_failure(format!(
            "{} exited with {}: {}",
            program.display(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(output)
}

/// Render a path as a command-line argument.
pub(crate) fn path_arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tool() {
        let result = find_tool("slidecast-no-such-program");
        assert!(matches!(result, Err(Error::ToolNotFound(name)) if name == "slidecast-no-such-program"));
    }

    #[test]
    fn test_missing_alternatives_are_listed() {
        let result = find_any_tool(&["slidecast-missing-a", "slidecast-missing-b"]);
        match result {
            Err(Error::ToolNotFound(names)) => {
                assert_eq!(names, "slidecast-missing-a or slidecast-missing-b");
            }
            other => panic!("expected ToolNotFound, got {:?}", other),
        }
    }
}
