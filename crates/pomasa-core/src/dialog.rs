//! Native folder / file choosers.
//!
//! The user-facing prompt is always handed to the chooser as its own process
//! argument. On macOS the AppleScript reads it from `argv`; with zenity it is
//! the value of `--title=`. No shell is involved, so the prompt text cannot
//! change what gets executed.
//!
//! Cancellation and every kind of failure collapse into an empty result.

use std::path::PathBuf;
use std::process::Command;

pub const DEFAULT_FOLDER_PROMPT: &str = "Select folder";
pub const DEFAULT_FILES_PROMPT: &str = "Select files";

const FOLDER_SCRIPT: &[&str] = &[
    "on run argv",
    "return POSIX path of (choose folder with prompt (item 1 of argv))",
    "end run",
];

const FILES_SCRIPT: &[&str] = &[
    "on run argv",
    "set fileList to choose file with prompt (item 1 of argv) with multiple selections allowed",
    "set posixPaths to {}",
    "repeat with f in fileList",
    "set end of posixPaths to POSIX path of f",
    "end repeat",
    "set AppleScript's text item delimiters to linefeed",
    "return posixPaths as text",
    "end run",
];

/// Which native chooser is available on this machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogBackend {
    /// `osascript` on macOS.
    AppleScript,
    /// `zenity` at the given path.
    Zenity(PathBuf),
    Unsupported,
}

impl DialogBackend {
    pub fn detect() -> Self {
        if cfg!(target_os = "macos") {
            return DialogBackend::AppleScript;
        }
        match which::which("zenity") {
            Ok(path) => DialogBackend::Zenity(path),
            Err(_) => DialogBackend::Unsupported,
        }
    }

    /// Command that shows a single-folder chooser, or `None` if unsupported.
    pub fn folder_command(&self, prompt: &str) -> Option<Command> {
        match self {
            DialogBackend::AppleScript => Some(osascript(FOLDER_SCRIPT, prompt)),
            DialogBackend::Zenity(exe) => {
                let mut cmd = Command::new(exe);
                cmd.arg("--file-selection")
                    .arg("--directory")
                    .arg(format!("--title={prompt}"));
                Some(cmd)
            }
            DialogBackend::Unsupported => None,
        }
    }

    /// Command that shows a multi-file chooser printing one path per line.
    pub fn files_command(&self, prompt: &str) -> Option<Command> {
        match self {
            DialogBackend::AppleScript => Some(osascript(FILES_SCRIPT, prompt)),
            DialogBackend::Zenity(exe) => {
                let mut cmd = Command::new(exe);
                cmd.arg("--file-selection")
                    .arg("--multiple")
                    .arg("--separator=\n")
                    .arg(format!("--title={prompt}"));
                Some(cmd)
            }
            DialogBackend::Unsupported => None,
        }
    }
}

fn osascript(script: &[&str], prompt: &str) -> Command {
    let mut cmd = Command::new("osascript");
    for line in script {
        cmd.arg("-e").arg(line);
    }
    cmd.arg("--").arg(prompt);
    cmd
}

fn prompt_or<'a>(prompt: Option<&'a str>, default: &'a str) -> &'a str {
    match prompt {
        Some(p) if !p.trim().is_empty() => p,
        _ => default,
    }
}

/// Run a chooser and return its stdout, or `None` on cancel / failure.
fn run(cmd: Option<Command>) -> Option<String> {
    let mut cmd = cmd?;
    match cmd.output() {
        Ok(out) if out.status.success() => {
            Some(String::from_utf8_lossy(&out.stdout).into_owned())
        }
        Ok(out) => {
            tracing::debug!(code = ?out.status.code(), "dialog dismissed");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to launch dialog");
            None
        }
    }
}

/// Trim chooser output and drop the trailing `/` AppleScript adds to folders.
pub fn parse_folder_output(stdout: &str) -> Option<PathBuf> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return None;
    }
    let path = if trimmed.len() > 1 {
        trimmed.strip_suffix('/').unwrap_or(trimmed)
    } else {
        trimmed
    };
    Some(PathBuf::from(path))
}

pub fn parse_files_output(stdout: &str) -> Vec<PathBuf> {
    stdout
        .trim()
        .split('\n')
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.is_empty())
        .map(PathBuf::from)
        .collect()
}

pub fn select_folder_with(backend: &DialogBackend, prompt: Option<&str>) -> Option<PathBuf> {
    let prompt = prompt_or(prompt, DEFAULT_FOLDER_PROMPT);
    run(backend.folder_command(prompt)).and_then(|out| parse_folder_output(&out))
}

pub fn select_files_with(backend: &DialogBackend, prompt: Option<&str>) -> Vec<PathBuf> {
    let prompt = prompt_or(prompt, DEFAULT_FILES_PROMPT);
    run(backend.files_command(prompt))
        .map(|out| parse_files_output(&out))
        .unwrap_or_default()
}

/// Ask the user for one folder with the platform's native chooser.
pub fn select_folder(prompt: Option<&str>) -> Option<PathBuf> {
    select_folder_with(&DialogBackend::detect(), prompt)
}

/// Ask the user for one or more files with the platform's native chooser.
pub fn select_files(prompt: Option<&str>) -> Vec<PathBuf> {
    select_files_with(&DialogBackend::detect(), prompt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    const HOSTILE: &str = "Pick \"this\" folder'; do shell script \"rm -rf ~\" --";

    fn args(cmd: &Command) -> Vec<&OsStr> {
        cmd.get_args().collect()
    }

    #[test]
    fn applescript_prompt_is_a_separate_argument() {
        let cmd = DialogBackend::AppleScript.folder_command(HOSTILE).unwrap();
        assert_eq!(cmd.get_program(), "osascript");
        let args = args(&cmd);
        assert_eq!(args.last().copied(), Some(OsStr::new(HOSTILE)));
        assert_eq!(args[args.len() - 2], "--");
        // Script lines never contain the prompt text.
        assert!(args[..args.len() - 2]
            .iter()
            .all(|a| !a.to_string_lossy().contains("rm -rf")));
    }

    #[test]
    fn applescript_files_script_allows_multiple_selection() {
        let cmd = DialogBackend::AppleScript.files_command("Refs").unwrap();
        let joined: Vec<String> = args(&cmd)
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert!(joined
            .iter()
            .any(|a| a.contains("with multiple selections allowed")));
        assert_eq!(joined.last().map(String::as_str), Some("Refs"));
    }

    #[test]
    fn zenity_prompt_is_the_title_value() {
        let backend = DialogBackend::Zenity(PathBuf::from("/usr/bin/zenity"));
        let cmd = backend.folder_command(HOSTILE).unwrap();
        let args = args(&cmd);
        assert!(args.contains(&OsStr::new("--directory")));
        let expected = format!("--title={HOSTILE}");
        assert_eq!(args.last().copied(), Some(OsStr::new(&expected)));
    }

    #[test]
    fn unsupported_backend_returns_empty_results() {
        assert_eq!(select_folder_with(&DialogBackend::Unsupported, Some("x")), None);
        assert!(select_files_with(&DialogBackend::Unsupported, None).is_empty());
    }

    #[test]
    fn missing_executable_returns_empty_results() {
        let backend = DialogBackend::Zenity(PathBuf::from("/nonexistent/zenity-binary"));
        assert_eq!(select_folder_with(&backend, Some(HOSTILE)), None);
        assert!(select_files_with(&backend, Some(HOSTILE)).is_empty());
    }

    #[test]
    fn parse_folder_strips_trailing_slash() {
        assert_eq!(
            parse_folder_output("/Users/me/Research/\n"),
            Some(PathBuf::from("/Users/me/Research"))
        );
        assert_eq!(parse_folder_output("/\n"), Some(PathBuf::from("/")));
        assert_eq!(parse_folder_output("  \n"), None);
    }

    #[test]
    fn parse_files_drops_blank_lines() {
        assert_eq!(
            parse_files_output("/a/one.pdf\n\n/b/two.md\r\n"),
            vec![PathBuf::from("/a/one.pdf"), PathBuf::from("/b/two.md")]
        );
        assert!(parse_files_output("").is_empty());
    }

    #[test]
    fn blank_prompt_falls_back_to_default() {
        assert_eq!(prompt_or(Some("  "), DEFAULT_FOLDER_PROMPT), "Select folder");
        assert_eq!(prompt_or(None, DEFAULT_FILES_PROMPT), "Select files");
        assert_eq!(prompt_or(Some("Pick"), DEFAULT_FILES_PROMPT), "Pick");
    }

    #[cfg(unix)]
    #[test]
    fn fake_chooser_output_is_parsed() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let script = dir.path().join("fake-zenity");
        std::fs::write(
            &script,
            "#!/bin/sh\nfor a in \"$@\"; do case \"$a\" in --multiple) printf '/x/a.md\\n/x/b.md\\n'; exit 0;; esac; done\necho /x/chosen/\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let backend = DialogBackend::Zenity(script);
        assert_eq!(
            select_folder_with(&backend, Some(HOSTILE)),
            Some(PathBuf::from("/x/chosen"))
        );
        assert_eq!(
            select_files_with(&backend, None),
            vec![PathBuf::from("/x/a.md"), PathBuf::from("/x/b.md")]
        );
    }

    #[cfg(unix)]
    #[test]
    fn cancelled_chooser_returns_nothing() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let script = dir.path().join("cancel-zenity");
        std::fs::write(&script, "#!/bin/sh\nexit 1\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let backend = DialogBackend::Zenity(script);
        assert_eq!(select_folder_with(&backend, None), None);
        assert!(select_files_with(&backend, None).is_empty());
    }
}
