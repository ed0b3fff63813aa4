//! How this program is relaunched by the shell.

use std::path::{Path, PathBuf};

use crate::error::{Result, SystemError};

/// Command the OS runs to start High Tide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchTarget {
    /// A standalone binary
    Executable(PathBuf),
    /// A script run by an interpreter
    Interpreted { interpreter: PathBuf, script: PathBuf },
}

impl LaunchTarget {
    /// The running executable.
    pub fn current() -> Result<Self> {
        std::env::current_exe()
            .map(Self::Executable)
            .map_err(|e| SystemError::LaunchTarget(e.to_string()))
    }

    /// An interpreter and script. The script path is made absolute.
    pub fn interpreted(interpreter: impl Into<PathBuf>, script: impl AsRef<Path>) -> Result<Self> {
        let script = std::path::absolute(script.as_ref())
            .map_err(|e| SystemError::LaunchTarget(e.to_string()))?;
        Ok(Self::Interpreted {
            interpreter: interpreter.into(),
            script,
        })
    }

    /// Quoted command line with no arguments.
    pub fn command(&self) -> String {
        match self {
            Self::Executable(exe) => quote(exe),
            Self::Interpreted {
                interpreter,
                script,
            } => format!("{} {}", quote(interpreter), quote(script)),
        }
    }

    /// Command line with a quoted `%1` placeholder for a shell argument.
    pub fn command_with_argument(&self) -> String {
        format!("{} \"%1\"", self.command())
    }

    /// Icon resource reference (`path,index`) for the program.
    pub fn icon_resource(&self) -> String {
        let binary = match self {
            Self::Executable(exe) => exe,
            Self::Interpreted { interpreter, .. } => interpreter,
        };
        format!("{},0", binary.display())
    }
}

fn quote(path: &Path) -> String {
    format!("\"{}\"", path.display())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_executable_command() {
        let target = LaunchTarget::Executable(PathBuf::from(r"C:\Program Files\High Tide\high-tide.exe"));
        assert_eq!(target.command(), r#""C:\Program Files\High Tide\high-tide.exe""#);
        assert_eq!(
            target.command_with_argument(),
            r#""C:\Program Files\High Tide\high-tide.exe" "%1""#
        );
        assert_eq!(
            target.icon_resource(),
            r"C:\Program Files\High Tide\high-tide.exe,0"
        );
    }

    #[test]
    fn test_interpreted_command() {
        let target = LaunchTarget::Interpreted {
            interpreter: PathBuf::from(r"C:\Python\python.exe"),
            script: PathBuf::from(r"C:\src\high-tide"),
        };
        assert_eq!(target.command(), r#""C:\Python\python.exe" "C:\src\high-tide""#);
        assert_eq!(
            target.command_with_argument(),
            r#""C:\Python\python.exe" "C:\src\high-tide" "%1""#
        );
        assert_eq!(target.icon_resource(), r"C:\Python\python.exe,0");
    }

    #[test]
    fn test_interpreted_script_is_absolute() {
        let target = LaunchTarget::interpreted("python", "main.py").unwrap();
        match target {
            LaunchTarget::Interpreted { script, .. } => assert!(script.is_absolute()),
            LaunchTarget::Executable(_) => panic!("expected interpreted target"),
        }
    }

    #[test]
    fn test_current_is_executable() {
        assert!(matches!(LaunchTarget::current(), Ok(LaunchTarget::Executable(_))));
    }
}
