//! Check command implementation.
//!
//! This module walks every file in an input directory, transpiles each one
//! using the source language inferred from its extension, and reports
//! per-file success or failure without writing any output files. It is the
//! round-trip self-check described for batch diagnostics: every target
//! emitter runs (including the source language's own, which canonicalizes
//! the program) and a file is reported healthy only if none of the four
//! emissions produced an error.

use std::path::{Path, PathBuf};
use std::time::Instant;

use xlc_drv::{SourceLang, Transpiler};

use crate::commands::common::output_messages;
use crate::commands::traits::{Command, CommandDescription};
use crate::config::Config;
use crate::error::{Result, XltError};

/// Arguments for the check command.
#[derive(Debug, Clone)]
pub struct CheckArgs {
    /// Enable verbose output.
    pub verbose: bool,
    /// Input directory path.
    pub input: Option<PathBuf>,
    /// Stop at the first file whose check reports an error.
    pub stop_on_first_error: bool,
}

impl Default for CheckArgs {
    fn default() -> Self {
        Self { verbose: false, input: None, stop_on_first_error: false }
    }
}

/// A single file's check outcome.
#[derive(Debug, Clone)]
pub struct FileCheckOutcome {
    pub path: PathBuf,
    pub lang: SourceLang,
    pub errors: Vec<String>,
}

impl FileCheckOutcome {
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check command handler.
pub struct CheckCommand {
    args: CheckArgs,
    config: Config,
}

impl CheckCommand {
    /// Create a new CheckCommand.
    pub fn new(args: CheckArgs) -> Self {
        Self { args, config: Config::default() }
    }

    /// Execute the command.
    pub fn run(&self) -> Result<()> {
        let start_time = Instant::now();
        let input_path = self.get_input_path()?;
        self.validate_input_path(&input_path)?;

        let outcomes = self.check_directory(&input_path)?;
        let failed = outcomes.iter().filter(|o| !o.is_healthy()).count();
        let succeeded = outcomes.len() - failed;

        for outcome in &outcomes {
            self.log_outcome(outcome);
        }

        self.log_completion(start_time.elapsed(), succeeded, failed)?;
        self.check_for_failures(failed)
    }

    fn check_for_failures(&self, failed: usize) -> Result<()> {
        if failed > 0 {
            return Err(XltError::CommandExecution(format!("{} file(s) failed to process", failed)));
        }
        Ok(())
    }

    fn get_input_path(&self) -> Result<PathBuf> {
        match &self.args.input {
            Some(path) => Ok(path.clone()),
            None => Ok(PathBuf::from(&self.config.input_dir)),
        }
    }

    fn validate_input_path(&self, input_path: &Path) -> Result<()> {
        if !input_path.exists() {
            return Err(XltError::Validation(format!("Input path does not exist: {}", input_path.display())));
        }
        if !input_path.is_dir() {
            return Err(XltError::Validation(format!("Input path is not a directory: {}", input_path.display())));
        }
        Ok(())
    }

    fn check_directory(&self, input_path: &Path) -> Result<Vec<FileCheckOutcome>> {
        let mut transpiler = Transpiler::new();
        let mut outcomes = Vec::new();
        let stop_on_first_error = self.args.stop_on_first_error || self.config.check.stop_on_first_error;

        for entry in std::fs::read_dir(input_path)? {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let Some(lang) = extension_to_lang(&path) else { continue };
            let outcome = self.check_file(&mut transpiler, &path, lang)?;
            let healthy = outcome.is_healthy();
            outcomes.push(outcome);

            if stop_on_first_error && !healthy {
                break;
            }
        }

        Ok(outcomes)
    }

    fn check_file(&self, transpiler: &mut Transpiler, path: &Path, lang: SourceLang) -> Result<FileCheckOutcome> {
        let source = std::fs::read_to_string(path)?;
        let result = transpiler.transpile(&source, lang);
        Ok(FileCheckOutcome { path: path.to_path_buf(), lang, errors: result.errors })
    }

    fn log_outcome(&self, outcome: &FileCheckOutcome) {
        if outcome.is_healthy() {
            if self.args.verbose {
                eprintln!("✅ {} ({})", outcome.path.display(), outcome.lang.label());
            }
        } else {
            eprintln!("❌ {} ({}): {}", outcome.path.display(), outcome.lang.label(), outcome.errors.join("; "));
        }
    }

    fn log_completion(&self, elapsed: std::time::Duration, succeeded: usize, failed: usize) -> Result<()> {
        if self.args.verbose {
            eprintln!("{}", format!("✅ Check completed in {:.2}s", elapsed.as_secs_f64()));
            eprintln!("{}", output_messages::FILES_TRANSPILED);
            eprintln!("📊 Files: {} succeeded, {} failed", succeeded, failed);
        }
        Ok(())
    }
}

fn extension_to_lang(path: &Path) -> Option<SourceLang> {
    match path.extension()?.to_str()? {
        "py" => Some(SourceLang::Scripting),
        "c" | "h" => Some(SourceLang::CFamily),
        "cpp" | "cc" | "cxx" | "hpp" => Some(SourceLang::CppFamily),
        "java" => Some(SourceLang::ClassBased),
        _ => None,
    }
}

impl Command for CheckCommand {
    type Args = CheckArgs;
    type Output = ();

    fn new(args: Self::Args) -> Self {
        Self { args, config: Config::default() }
    }

    fn execute(&self) -> Result<Self::Output> {
        self.run()
    }

    fn name() -> &'static str {
        "check"
    }
}

impl CommandDescription for CheckCommand {
    fn description() -> &'static str {
        "Run round-trip self-checks over a directory of source files"
    }

    fn help() -> &'static str {
        "Transpiles every recognized file in the input directory and \
         reports which ones produced emitter errors, without writing \
         any output files."
    }
}

/// Run the check command.
pub fn run_check(args: CheckArgs) -> Result<()> {
    let command = CheckCommand::new(args);
    command.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("good.py"), "x = 1\nprint(x)\n").unwrap();
        std::fs::write(
            dir.path().join("also_good.c"),
            "int main() { int x = 10; if (x > 5) { printf(\"%d\\n\", x); } return 0; }",
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_check_args_default() {
        let args = CheckArgs::default();
        assert!(!args.verbose);
        assert!(args.input.is_none());
        assert!(!args.stop_on_first_error);
    }

    #[test]
    fn test_check_command_name() {
        assert_eq!(<CheckCommand as Command>::name(), "check");
    }

    #[test]
    fn test_check_command_execute() {
        let dir = setup_test_dir();

        let args = CheckArgs { verbose: false, input: Some(dir.path().to_path_buf()), stop_on_first_error: false };
        let command = CheckCommand::new(args);

        let result = command.run();
        assert!(result.is_ok());
    }

    #[test]
    fn test_check_command_execute_nonexistent_input() {
        let args =
            CheckArgs { verbose: false, input: Some(PathBuf::from("/nonexistent/path")), stop_on_first_error: false };
        let command = CheckCommand::new(args);

        let result = command.run();
        assert!(result.is_err());
        if let Err(XltError::Validation(msg)) = result {
            assert!(msg.contains("does not exist"));
        } else {
            panic!("Expected Validation error");
        }
    }

    #[test]
    fn test_check_directory_skips_unrecognized_extensions() {
        let dir = setup_test_dir();
        std::fs::write(dir.path().join("notes.txt"), "not a source file").unwrap();

        let args = CheckArgs { verbose: false, input: Some(dir.path().to_path_buf()), stop_on_first_error: false };
        let command = CheckCommand::new(args);

        let outcomes = command.check_directory(dir.path()).unwrap();
        assert_eq!(outcomes.len(), 2);
    }

    #[test]
    fn test_run_check_convenience_function() {
        let dir = setup_test_dir();
        let args = CheckArgs { verbose: false, input: Some(dir.path().to_path_buf()), stop_on_first_error: false };

        let result = run_check(args);
        assert!(result.is_ok());
    }
}
