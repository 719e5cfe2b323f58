//! Launcher-script packager.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;
use verbkit_core::error::VerbError;
use verbkit_core::ports::{PackageRequest, Packager};

/// Writes a shell script per base command that re-invokes the program.
#[derive(Debug, Clone)]
pub struct ScriptPackager {
    program: PathBuf,
    default_name: String,
    config_path: Option<PathBuf>,
}

impl ScriptPackager {
    /// `program` is the executable the scripts run; `default_name` is
    /// packaged when a request names no commands.
    pub fn new(program: impl Into<PathBuf>, default_name: &str) -> Self {
        Self {
            program: program.into(),
            default_name: default_name.to_string(),
            config_path: None,
        }
    }

    /// Pin the configuration file the packaged program uses.
    #[must_use]
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    fn script(&self, name: &str) -> String {
        let mut script = String::from("#!/bin/sh\n");
        script.push_str(&format!("# {name}: generated launcher\n"));
        if let Some(config) = &self.config_path {
            script.push_str(&format!(
                "VERBKIT_CONFIG=\"${{VERBKIT_CONFIG:-{}}}\"\nexport VERBKIT_CONFIG\n",
                config.display()
            ));
        }
        script.push_str(&format!("exec \"{}\" \"$@\"\n", self.program.display()));
        script
    }

    fn write_script(path: &Path, content: &str) -> std::io::Result<()> {
        fs::write(path, content)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
        }
        Ok(())
    }
}

impl Packager for ScriptPackager {
    fn package(&mut self, request: &PackageRequest) -> Result<Vec<PathBuf>, VerbError> {
        let dir = request
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        let names = if request.names.is_empty() {
            vec![self.default_name.clone()]
        } else {
            request.names.clone()
        };

        let targets: Vec<PathBuf> = names.iter().map(|name| dir.join(name)).collect();
        let existing: Vec<String> = targets
            .iter()
            .filter(|path| path.exists())
            .map(|path| path.display().to_string())
            .collect();
        if !request.force && !existing.is_empty() {
            return Err(VerbError::aborted(
                "Output files exist, delete them or use the force option to overwrite:",
                &existing,
            ));
        }

        fs::create_dir_all(&dir)?;
        for (name, path) in names.iter().zip(&targets) {
            Self::write_script(path, &self.script(name))?;
            info!(path = %path.display(), "Wrote launcher script");
        }
        Ok(targets)
    }
}
