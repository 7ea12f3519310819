//! Example conversion: the boundary to the external per-language converter.
//!
//! Conversion itself is opaque to this crate. A [`Converter`] renders one
//! source example in one target language; [`convert_example`] asks for
//! every target language in parallel and keeps each outcome separate, so a
//! failing language only loses its own snippet.

use crate::config::ConverterConfig;
use crate::error::ConvertError;
use crate::model::Diagnostic;
use indexmap::IndexMap;
use rayon::prelude::*;
use std::io::{self, Read, Write};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// One successful rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversion {
    pub code: String,
    /// Free-form converter output worth surfacing, e.g. warnings.
    pub diagnostics: String,
}

/// Renders a source-language example in a target language.
pub trait Converter: Sync {
    fn convert(
        &self,
        source: &str,
        example_id: &str,
        language: &str,
    ) -> Result<Conversion, ConvertError>;
}

/// All renderings of one example.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExampleConversion {
    /// Language → code, only for languages that rendered something.
    pub snippets: IndexMap<String, String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Convert `source` to every language in `languages`, one call per language.
pub fn convert_example(
    converter: &dyn Converter,
    source: &str,
    example_id: &str,
    languages: &[String],
) -> ExampleConversion {
    let results: Vec<(&String, Result<Conversion, ConvertError>)> = languages
        .par_iter()
        .map(|language| (language, converter.convert(source, example_id, language)))
        .collect();

    let mut out = ExampleConversion::default();
    for (language, result) in results {
        match result {
            Ok(conversion) => {
                if !conversion.diagnostics.trim().is_empty() {
                    out.diagnostics.push(Diagnostic {
                        example: example_id.to_string(),
                        language: language.clone(),
                        message: conversion.diagnostics.trim().to_string(),
                    });
                }
                if conversion.code.trim().is_empty() {
                    tracing::debug!(example = example_id, %language, "converter returned no code");
                    continue;
                }
                out.snippets.insert(language.clone(), conversion.code);
            }
            Err(err) => {
                tracing::warn!(example = example_id, %language, "conversion failed: {}", err);
                out.diagnostics.push(Diagnostic {
                    example: example_id.to_string(),
                    language: language.clone(),
                    message: err.to_string(),
                });
            }
        }
    }
    out
}

// -- External command converter -----------------------------------------------

/// Runs an external program per conversion.
///
/// The example is written to stdin, code is read from stdout and stderr is
/// kept as diagnostics. A non-zero exit or running past the timeout fails
/// the conversion; the child is killed on timeout.
#[derive(Debug, Clone)]
pub struct CommandConverter {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandConverter {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    pub fn from_config(config: &ConverterConfig) -> Self {
        Self::new(config.program.clone(), config.args.clone(), config.timeout())
    }

    fn command_args(&self, example_id: &str, language: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace("{language}", language).replace("{example}", example_id))
            .collect()
    }
}

impl Converter for CommandConverter {
    fn convert(
        &self,
        source: &str,
        example_id: &str,
        language: &str,
    ) -> Result<Conversion, ConvertError> {
        let mut child = Command::new(&self.program)
            .args(self.command_args(example_id, language))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ConvertError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let writer = {
            let stdin = child.stdin.take();
            let input = source.to_string();
            thread::spawn(move || -> io::Result<()> {
                if let Some(mut stdin) = stdin {
                    stdin.write_all(input.as_bytes())?;
                }
                Ok(())
            })
        };
        let stdout = spawn_reader(child.stdout.take());
        let stderr = spawn_reader(child.stderr.take());

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ConvertError::Timeout(self.timeout));
            }
            thread::sleep(POLL_INTERVAL);
        };

        // A converter may exit without draining stdin; a broken pipe is not its failure.
        let _ = writer.join();
        let stdout = join_reader(stdout)?;
        let stderr = String::from_utf8_lossy(&join_reader(stderr)?).trim().to_string();

        if !status.success() {
            return Err(ConvertError::Failed {
                status: status.to_string(),
                stderr,
            });
        }

        let code = String::from_utf8(stdout).map_err(|_| ConvertError::InvalidOutput)?;
        Ok(Conversion {
            code,
            diagnostics: stderr,
        })
    }
}

fn spawn_reader<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf)?;
        }
        Ok(buf)
    })
}

fn join_reader(handle: JoinHandle<io::Result<Vec<u8>>>) -> Result<Vec<u8>, ConvertError> {
    let bytes = handle
        .join()
        .map_err(|_| ConvertError::Other("converter output reader panicked".to_string()))??;
    Ok(bytes)
}
