use std::collections::BTreeMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::Deserialize;

use crate::error::AppError;

/// Option defaults: program index, extra arguments (deprecated), escape
/// output, no-wrap.
pub const DEFAULT_OPTIONS: [&str; 4] = ["0", "-f /dev/null -i -wrap -q", "1", "1"];

/// An operator-approved program, with any arguments it always receives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Program {
    pub path: PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Program {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            args: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProgramEntry {
    Path(PathBuf),
    Full(Program),
}

#[derive(Debug, Deserialize)]
struct ProgramsFile {
    #[serde(default)]
    programs: BTreeMap<String, ProgramEntry>,
}

/// Feeds a value to an external program on stdin and returns its stdout.
///
/// Nothing runs unless the operator lists programs; with an empty list the
/// transformation passes input through untouched.
#[derive(Debug, Clone, Default)]
pub struct ExternalTransformation {
    programs: BTreeMap<u32, Program>,
}

impl ExternalTransformation {
    pub const NAME: &'static str = "External";

    pub fn new(programs: BTreeMap<u32, Program>) -> Self {
        Self { programs }
    }

    /// Load the program list from a TOML file:
    ///
    /// ```toml
    /// [programs]
    /// 0 = "/usr/bin/tidy"
    /// 1 = { path = "/usr/local/bin/validate", args = ["--quiet"] }
    /// ```
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path)?;
        let file: ProgramsFile = toml::from_str(&content).map_err(|e| {
            AppError::ConfigError(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        let mut programs = BTreeMap::new();
        for (index, entry) in file.programs {
            let index: u32 = index.parse().map_err(|_| {
                AppError::ConfigError(format!("Program index `{}` is not a number", index))
            })?;
            let program = match entry {
                ProgramEntry::Path(path) => Program::new(path),
                ProgramEntry::Full(program) => program,
            };
            programs.insert(index, program);
        }
        Ok(Self::new(programs))
    }

    pub fn info() -> &'static str {
        "Launches an external application and feeds it the column data via \
         standard input. Returns the standard output of the application. \
         Only programs listed by the operator can be used. The first option \
         is the number of the program to use. The second option is deprecated \
         and ignored. The third option, if set to 1, escapes the output for \
         HTML (default 1). The fourth option, if set to 1, keeps the output \
         on one line (default 1)."
    }

    pub fn is_enabled(&self) -> bool {
        !self.programs.is_empty()
    }

    /// User options merged over [`DEFAULT_OPTIONS`]; empty entries keep the default.
    pub fn options(user: &[String]) -> [String; 4] {
        std::array::from_fn(|i| match user.get(i) {
            Some(value) if !value.is_empty() => value.clone(),
            _ => DEFAULT_OPTIONS[i].to_string(),
        })
    }

    /// Whether the output should be kept from wrapping.
    pub fn no_wrap(user: &[String]) -> bool {
        match user.get(3).map(|s| s.trim()) {
            None | Some("") => true,
            Some(flag) => flag_value(flag) == Some(1),
        }
    }

    fn program(&self, index: &str) -> Option<&Program> {
        index
            .trim()
            .parse::<u32>()
            .ok()
            .and_then(|i| self.programs.get(&i))
            .or_else(|| self.programs.values().next())
    }

    pub fn apply(&self, buffer: &str, user: &[String]) -> Result<String, AppError> {
        let options = Self::options(user);
        let Some(program) = self.program(&options[0]) else {
            return Ok(buffer.to_string());
        };

        if user.get(1).is_some_and(|extra| !extra.is_empty()) {
            tracing::warn!(
                program = %program.path.display(),
                "the external transformation command line options field is deprecated \
                 and ignored; add arguments to the program definition instead"
            );
        }

        let output = run(program, buffer)?;

        if matches!(flag_value(&options[2]), Some(1 | 2)) {
            Ok(htmlize::escape_all_quotes(output.as_str()).into_owned())
        } else {
            Ok(output)
        }
    }
}

fn flag_value(flag: &str) -> Option<i64> {
    flag.trim().parse().ok()
}

/// Write all of `input` to the program and close its stdin while stdout is
/// read to the end on this thread.
fn run(program: &Program, input: &str) -> Result<String, AppError> {
    let failed = |source| AppError::TransformError {
        program: program.path.display().to_string(),
        source,
    };

    tracing::debug!(program = %program.path.display(), bytes = input.len(), "running external transformation");
    let mut child = Command::new(&program.path)
        .args(&program.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .map_err(failed)?;

    let stdin = child.stdin.take();
    let (output, written) = std::thread::scope(|scope| {
        let writer = stdin.map(|mut stdin| {
            scope.spawn(move || match stdin.write_all(input.as_bytes()) {
                // The program may exit without reading its input.
                Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
                other => other,
            })
        });
        let output = child.wait_with_output();
        let written = match writer {
            Some(handle) => handle
                .join()
                .unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked"))),
            None => Ok(()),
        };
        (output, written)
    });
    let output = output.map_err(failed)?;
    written.map_err(failed)?;

    if !output.status.success() {
        tracing::warn!(program = %program.path.display(), status = %output.status, "external program failed");
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
