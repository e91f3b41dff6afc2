//! External retrieval tool invocation

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::Context;

pub const DEFAULT_TOOL: &str = "scihub";

/// `{id}` is replaced by the identifier, `{out}` by the output directory.
pub const DEFAULT_ARGS: &[&str] = &[
    "-s",
    "{id}",
    "-O",
    "{out}",
    "-u",
    "https://sci-hub.se",
    "-ow",
    "N",
];

/// Fetches one document and returns the diagnostic text to classify.
pub trait Retriever {
    fn retrieve(&mut self, identifier: &str, output_dir: &Path) -> io::Result<String>;
}

/// Runs a command-line tool per identifier and captures its stderr.
///
/// The exit status is ignored; only the diagnostics decide the outcome.
#[derive(Debug, Clone)]
pub struct CliRetriever {
    program: PathBuf,
    args: Vec<String>,
    /// PATH for the child: inherited PATH plus configured search paths
    path_env: OsString,
}

impl CliRetriever {
    /// Locate `tool` in PATH plus `search_paths`. A missing tool is an error.
    pub fn resolve(tool: &str, args: Vec<String>, search_paths: &[PathBuf]) -> anyhow::Result<Self> {
        let inherited = std::env::var_os("PATH").unwrap_or_default();
        let path_env = std::env::join_paths(
            std::env::split_paths(&inherited).chain(search_paths.iter().cloned()),
        )
        .context("Invalid retrieval tool search path")?;
        let cwd = std::env::current_dir().context("Cannot determine working directory")?;
        let program = which::which_in(tool, Some(&path_env), cwd)
            .with_context(|| format!("Retrieval tool `{tool}` not found in PATH or search paths"))?;
        log::info!("Retrieval tool: {}", program.display());
        Ok(Self {
            program,
            args,
            path_env,
        })
    }

    fn expand_args(&self, identifier: &str, output_dir: &Path) -> Vec<String> {
        let out = output_dir.to_string_lossy();
        self.args
            .iter()
            .map(|a| a.replace("{id}", identifier).replace("{out}", &out))
            .collect()
    }
}

impl Retriever for CliRetriever {
    fn retrieve(&mut self, identifier: &str, output_dir: &Path) -> io::Result<String> {
        let args = self.expand_args(identifier, output_dir);
        log::debug!("{} {}", self.program.display(), args.join(" "));
        let output = Command::new(&self.program)
            .args(&args)
            .env("PATH", &self.path_env)
            .stdin(Stdio::null())
            .output()?;
        if !output.stdout.is_empty() {
            log::debug!("{}", String::from_utf8_lossy(&output.stdout).trim_end());
        }
        Ok(String::from_utf8_lossy(&output.stderr).into_owned())
    }
}

pub fn default_args() -> Vec<String> {
    DEFAULT_ARGS.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tool_is_an_error() {
        let err = CliRetriever::resolve("confcollect-no-such-tool-xyz", default_args(), &[])
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn placeholders_expanded() {
        let r = CliRetriever {
            program: PathBuf::from("scihub"),
            args: default_args(),
            path_env: OsString::new(),
        };
        let args = r.expand_args("10.1/x", Path::new("/r/ISCA/2019/PDF"));
        assert_eq!(
            args,
            [
                "-s",
                "10.1/x",
                "-O",
                "/r/ISCA/2019/PDF",
                "-u",
                "https://sci-hub.se",
                "-ow",
                "N"
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn tool_found_in_search_path_and_stderr_captured() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-fetch");
        std::fs::write(&script, "#!/bin/sh\necho \"no doc for $1\" >&2\nexit 3\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut r = CliRetriever::resolve(
            "fake-fetch",
            vec!["{id}".into()],
            &[dir.path().to_path_buf()],
        )
        .unwrap();
        assert_eq!(r.program.file_name(), script.file_name());

        let stderr = r.retrieve("10.1/y", dir.path()).unwrap();
        assert_eq!(stderr.trim(), "no doc for 10.1/y");
    }
}
