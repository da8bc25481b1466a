//! `tree-sitter query` CLI backend.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use super::capture::{parse_query_output, Match};
use super::queries::QueryKey;
use super::{EngineError, QueryEngine, QuerySession, SourceFile};
use crate::language::Language;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Runs the external `tree-sitter` binary once per language batch.
pub struct TreeSitterCli {
    bin: PathBuf,
    grammar_root: Option<PathBuf>,
    timeout: Duration,
    session: QuerySession,
}

impl TreeSitterCli {
    pub fn new(
        bin: PathBuf,
        grammar_root: Option<PathBuf>,
        timeout: Duration,
        session: QuerySession,
    ) -> Self {
        Self {
            bin,
            grammar_root,
            timeout,
            session,
        }
    }

    /// Grammar package directory for a language, relative to the grammar root.
    pub fn grammar_package(language: Language) -> Option<&'static str> {
        match language {
            Language::JavaScript => Some("tree-sitter-javascript"),
            Language::TypeScript => Some("tree-sitter-typescript/typescript"),
            Language::Tsx => Some("tree-sitter-typescript/tsx"),
            Language::Python => Some("tree-sitter-python"),
            Language::Go => Some("tree-sitter-go"),
            Language::Rust => Some("tree-sitter-rust"),
            Language::Ruby => Some("tree-sitter-ruby"),
            Language::Java => Some("tree-sitter-java"),
            Language::C => Some("tree-sitter-c"),
            Language::Cpp => Some("tree-sitter-cpp"),
            Language::Unknown => None,
        }
    }

    fn grammar_dir(&self, language: Language) -> Option<PathBuf> {
        let root = self.grammar_root.as_ref()?;
        let dir = root.join(Self::grammar_package(language)?);
        dir.is_dir().then_some(dir)
    }

    fn execute(&self, grammar: &Path, query_file: &Path, sources: &[PathBuf]) -> Result<String, EngineError> {
        let mut cmd = Command::new(&self.bin);
        cmd.arg("query")
            .arg("-p")
            .arg(grammar)
            .arg(query_file)
            .args(sources)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!(
            "Running {} query over {} file(s)",
            self.bin.display(),
            sources.len()
        );

        let mut child = cmd.spawn().map_err(|source| EngineError::Spawn {
            bin: self.bin.display().to_string(),
            source,
        })?;

        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(EngineError::Timeout(self.timeout));
            }
            thread::sleep(POLL_INTERVAL);
        };

        let stdout = stdout.and_then(|h| h.join().ok()).unwrap_or_default();
        let stderr = stderr.and_then(|h| h.join().ok()).unwrap_or_default();

        if !status.success() {
            return Err(EngineError::Exit {
                status: status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(stdout)
    }
}

/// Read a pipe to completion on a helper thread so the child never blocks on a full pipe.
fn drain<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn extension_for(file: &SourceFile) -> &str {
    Path::new(&file.relative_path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("txt")
}

impl QueryEngine for TreeSitterCli {
    fn name(&self) -> &'static str {
        "cli"
    }

    fn supports(&self, language: Language) -> bool {
        self.grammar_dir(language).is_some()
    }

    fn run(&self, language: Language, files: &[SourceFile]) -> Result<Vec<Vec<Match>>, EngineError> {
        if files.is_empty() {
            return Ok(Vec::new());
        }

        let grammar = self
            .grammar_dir(language)
            .ok_or(EngineError::MissingGrammar(language))?;
        let query_file = QueryKey::for_language(language)
            .and_then(|key| self.session.query_path(key))
            .ok_or(EngineError::MissingGrammar(language))?;

        // Content without an on-disk location is written to a scratch directory
        // that lives until the report has been parsed.
        let mut scratch = None;
        let mut sources = Vec::with_capacity(files.len());
        for (i, file) in files.iter().enumerate() {
            match &file.absolute_path {
                Some(path) => sources.push(path.clone()),
                None => {
                    if scratch.is_none() {
                        scratch = Some(tempfile::Builder::new().prefix("codefold-src-").tempdir()?);
                    }
                    if let Some(dir) = &scratch {
                        let path = dir.path().join(format!("source-{}.{}", i, extension_for(file)));
                        std::fs::write(&path, &file.content)?;
                        sources.push(path);
                    }
                }
            }
        }

        let output = self.execute(&grammar, query_file, &sources)?;
        let mut parsed = parse_query_output(&output);

        Ok(sources
            .iter()
            .map(|path| {
                parsed
                    .swap_remove(&*path.to_string_lossy())
                    .unwrap_or_default()
            })
            .collect())
    }
}
