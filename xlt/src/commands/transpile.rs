//! Transpile command implementation.
//!
//! This module provides functionality to transpile a source file written in
//! one of the four known languages into the other three, writing each
//! successfully generated target as a sibling file next to the input (or
//! inside an explicit output directory).

use std::path::{Path, PathBuf};
use std::time::Instant;

use xlc_drv::{SourceLang, Transpiler};

use crate::commands::common::{error_messages, output_messages};
use crate::commands::traits::{Command, CommandDescription};
use crate::config::Config;
use crate::error::{Result, XltError};

/// Arguments for the transpile command.
#[derive(Debug, Clone)]
pub struct TranspileArgs {
    /// Enable verbose output.
    pub verbose: bool,
    /// Input files to transpile.
    pub input: Vec<PathBuf>,
    /// Output directory for generated targets (defaults next to each input file).
    pub output: Option<PathBuf>,
    /// Explicit source-language tag, overriding extension inference.
    pub from: Option<String>,
    /// Force overwrite of existing target files.
    pub force: bool,
}

impl Default for TranspileArgs {
    fn default() -> Self {
        Self { verbose: false, input: Vec::new(), output: None, from: None, force: false }
    }
}

/// Transpile command handler.
pub struct TranspileCommand {
    args: TranspileArgs,
    config: Config,
}

impl TranspileCommand {
    /// Create a new TranspileCommand.
    pub fn new(args: TranspileArgs) -> Self {
        Self { args, config: Config::default() }
    }

    /// Execute the command.
    pub fn run(&self) -> Result<()> {
        let start_time = Instant::now();
        self.validate_input_files()?;

        let mut transpiler = Transpiler::new();
        let mut files_succeeded = 0;
        let mut files_failed = 0;

        for input_path in &self.args.input {
            match self.transpile_file(&mut transpiler, input_path) {
                Ok(_) => files_succeeded += 1,
                Err(e) => {
                    files_failed += 1;
                    self.log_transpile_error(input_path, &e);
                }
            }
        }

        self.log_completion(start_time.elapsed(), files_succeeded, files_failed)?;
        self.check_for_failures(files_failed)
    }

    fn validate_input_files(&self) -> Result<()> {
        if self.args.input.is_empty() {
            return Err(XltError::Validation(error_messages::NO_INPUT_FILES.to_string()));
        }
        Ok(())
    }

    fn check_for_failures(&self, files_failed: usize) -> Result<()> {
        if files_failed > 0 {
            return Err(XltError::CommandExecution(format!("{} file(s) failed to process", files_failed)));
        }
        Ok(())
    }

    fn transpile_file(&self, transpiler: &mut Transpiler, input_path: &Path) -> Result<()> {
        self.validate_input_file(input_path)?;
        let lang = self.resolve_source_lang(input_path)?;

        if self.args.verbose {
            eprintln!("{} {}", output_messages::PROCESSING_FILE, input_path.display());
        }

        let source = std::fs::read_to_string(input_path)?;
        let result = transpiler.transpile(&source, lang);

        for target in SourceLang::ALL {
            if target == lang {
                continue;
            }
            let Some(text) = result.get(target) else { continue };
            let output_path = self.determine_output_path(input_path, target)?;
            self.check_output_writable(&output_path)?;
            std::fs::write(&output_path, text)?;
            if self.args.verbose {
                eprintln!("{} {} {}", output_messages::TRANSPILED_TARGET, input_path.display(), output_path.display());
            }
        }

        if !result.success {
            return Err(XltError::CommandExecution(result.errors.join("; ")));
        }
        Ok(())
    }

    fn log_transpile_error(&self, input_path: &Path, error: &XltError) {
        eprintln!("{} Failed to transpile {}: {}", output_messages::ERROR, input_path.display(), error);
    }

    fn log_completion(&self, elapsed: std::time::Duration, succeeded: usize, failed: usize) -> Result<()> {
        if self.args.verbose {
            eprintln!("{}", format!("✅ Transpilation completed in {:.2}s", elapsed.as_secs_f64()));
            eprintln!("📊 Files: {} succeeded, {} failed", succeeded, failed);
        }
        Ok(())
    }

    fn validate_input_file(&self, input_path: &Path) -> Result<()> {
        if !input_path.exists() {
            return Err(XltError::Validation(format!("Input path does not exist: {}", input_path.display())));
        }
        if !input_path.is_file() {
            return Err(XltError::Validation(format!("Input path is not a file: {}", input_path.display())));
        }
        Ok(())
    }

    /// Resolve the source language: explicit `--from` wins, then the
    /// configured default, then the file extension.
    fn resolve_source_lang(&self, input_path: &Path) -> Result<SourceLang> {
        if let Some(ref tag) = self.args.from {
            return SourceLang::from_tag(tag)
                .ok_or_else(|| XltError::Validation(format!("Unknown source language tag: {}", tag)));
        }

        if let Some(lang) = extension_to_lang(input_path) {
            return Ok(lang);
        }

        if let Some(ref tag) = self.config.transpile.default_from {
            return SourceLang::from_tag(tag)
                .ok_or_else(|| XltError::Config(format!("Unknown source language tag: {}", tag)));
        }

        Err(XltError::Validation(format!(
            "Cannot infer source language from extension: {}",
            input_path.display()
        )))
    }

    fn check_output_writable(&self, output_path: &Path) -> Result<()> {
        if output_path.exists() && !self.args.force && !self.config.transpile.force {
            return Err(XltError::Validation(format!("Output file already exists: {}", output_path.display())));
        }
        Ok(())
    }

    fn determine_output_path(&self, input_path: &Path, target: SourceLang) -> Result<PathBuf> {
        let stem = input_path
            .file_stem()
            .ok_or_else(|| XltError::FileOperation(error_messages::INVALID_FILE_PATH.to_string()))?
            .to_string_lossy()
            .to_string();
        let file_name = format!("{}.{}", stem, lang_extension(target));

        match &self.args.output {
            Some(dir) => Ok(dir.join(file_name)),
            None => Ok(input_path.with_file_name(file_name)),
        }
    }
}

/// Map a file extension to one of the four known source languages.
fn extension_to_lang(path: &Path) -> Option<SourceLang> {
    match path.extension()?.to_str()? {
        "py" => Some(SourceLang::Scripting),
        "c" | "h" => Some(SourceLang::CFamily),
        "cpp" | "cc" | "cxx" | "hpp" => Some(SourceLang::CppFamily),
        "java" => Some(SourceLang::ClassBased),
        _ => None,
    }
}

/// The canonical file extension written for a given target language.
fn lang_extension(lang: SourceLang) -> &'static str {
    match lang {
        SourceLang::Scripting => "py",
        SourceLang::CFamily => "c",
        SourceLang::CppFamily => "cpp",
        SourceLang::ClassBased => "java",
    }
}

impl Command for TranspileCommand {
    type Args = TranspileArgs;
    type Output = ();

    fn new(args: Self::Args) -> Self {
        Self { args, config: Config::default() }
    }

    fn execute(&self) -> Result<Self::Output> {
        self.run()
    }

    fn name() -> &'static str {
        "transpile"
    }
}

impl CommandDescription for TranspileCommand {
    fn description() -> &'static str {
        "Transpile a source file into the other known languages"
    }

    fn help() -> &'static str {
        "Parses each input file with its source language's front-end and \
         writes the other three languages' emitted output as sibling files."
    }
}

/// Run the transpile command.
pub fn run_transpile(args: TranspileArgs) -> Result<()> {
    let command = TranspileCommand::new(args);
    command.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_transpile_args_default() {
        let args = TranspileArgs::default();
        assert!(args.input.is_empty());
        assert!(args.output.is_none());
        assert!(args.from.is_none());
        assert!(!args.verbose);
        assert!(!args.force);
    }

    #[test]
    fn test_transpile_command_name() {
        assert_eq!(<TranspileCommand as Command>::name(), "transpile");
    }

    #[test]
    fn test_extension_to_lang() {
        assert_eq!(extension_to_lang(Path::new("a.py")), Some(SourceLang::Scripting));
        assert_eq!(extension_to_lang(Path::new("a.c")), Some(SourceLang::CFamily));
        assert_eq!(extension_to_lang(Path::new("a.cpp")), Some(SourceLang::CppFamily));
        assert_eq!(extension_to_lang(Path::new("a.java")), Some(SourceLang::ClassBased));
        assert_eq!(extension_to_lang(Path::new("a.rs")), None);
    }

    #[test]
    fn test_transpile_command_execute_no_input() {
        let args = TranspileArgs::default();
        let command = TranspileCommand::new(args);

        let result = command.run();
        assert!(result.is_err());
        if let Err(XltError::Validation(msg)) = result {
            assert!(msg.contains("No input files"));
        } else {
            panic!("Expected Validation error");
        }
    }

    #[test]
    fn test_transpile_command_execute() {
        let temp_dir = TempDir::new().unwrap();
        let input_file = temp_dir.path().join("prog.py");
        std::fs::write(&input_file, "x = 1\nprint(x)\n").unwrap();

        let args = TranspileArgs { verbose: false, input: vec![input_file.clone()], output: None, from: None, force: true };
        let command = TranspileCommand::new(args);

        let result = command.run();
        assert!(result.is_ok());

        assert!(temp_dir.path().join("prog.c").exists());
        assert!(temp_dir.path().join("prog.cpp").exists());
        assert!(temp_dir.path().join("prog.java").exists());
        assert!(!temp_dir.path().join("prog.py.py").exists());
    }

    #[test]
    fn test_transpile_command_execute_nonexistent_input() {
        let args = TranspileArgs {
            verbose: false,
            input: vec![PathBuf::from("/nonexistent/file.py")],
            output: None,
            from: None,
            force: true,
        };
        let command = TranspileCommand::new(args);

        let result = command.run();
        assert!(result.is_err());
    }

    #[test]
    fn test_transpile_command_unknown_extension_requires_from() {
        let temp_dir = TempDir::new().unwrap();
        let input_file = temp_dir.path().join("prog.txt");
        std::fs::write(&input_file, "x = 1\n").unwrap();

        let args = TranspileArgs { verbose: false, input: vec![input_file], output: None, from: None, force: true };
        let command = TranspileCommand::new(args);

        let result = command.run();
        assert!(result.is_err());
    }

    #[test]
    fn test_transpile_command_explicit_from_overrides_extension() {
        let temp_dir = TempDir::new().unwrap();
        let input_file = temp_dir.path().join("prog.txt");
        std::fs::write(&input_file, "x = 1\nprint(x)\n").unwrap();

        let args = TranspileArgs {
            verbose: false,
            input: vec![input_file],
            output: None,
            from: Some("scripting".to_string()),
            force: true,
        };
        let command = TranspileCommand::new(args);

        let result = command.run();
        assert!(result.is_ok());
        assert!(temp_dir.path().join("prog.c").exists());
    }

    #[test]
    fn test_run_transpile_convenience_function() {
        let temp_dir = TempDir::new().unwrap();
        let input_file = temp_dir.path().join("prog.py");
        std::fs::write(&input_file, "x = 1\nprint(x)\n").unwrap();

        let args = TranspileArgs { verbose: false, input: vec![input_file], output: None, from: None, force: true };

        let result = run_transpile(args);
        assert!(result.is_ok());
    }
}
