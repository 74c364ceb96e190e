use std::env;

pub struct ShellDetector;

impl ShellDetector {
    /// Full path of the user's shell, used to spawn `<shell> -c`.
    pub fn shell_binary() -> String {
        env::var("SHELL").unwrap_or_else(|_| "sh".to_string())
    }

    pub fn detect_shell() -> String {
        // Try to detect from SHELL environment variable
        if let Ok(shell) = env::var("SHELL") {
            if let Some(shell_name) = shell.split('/').next_back() {
                if !shell_name.is_empty() {
                    return shell_name.to_string();
                }
            }
        }

        // Fallback detection methods
        if env::var("ZSH_VERSION").is_ok() {
            return "zsh".to_string();
        }

        if env::var("BASH_VERSION").is_ok() {
            return "bash".to_string();
        }

        "sh".to_string()
    }
}

/// Host package managers the `package` group knows how to drive, in
/// detection priority order (Termux first).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Pkg,
    Apt,
    Dnf,
    Pacman,
    Brew,
}

impl PackageManager {
    pub fn detect() -> Option<Self> {
        [
            PackageManager::Pkg,
            PackageManager::Apt,
            PackageManager::Dnf,
            PackageManager::Pacman,
            PackageManager::Brew,
        ]
        .into_iter()
        .find(|manager| which::which(manager.binary()).is_ok())
    }

    pub fn binary(&self) -> &'static str {
        match self {
            PackageManager::Pkg => "pkg",
            PackageManager::Apt => "apt",
            PackageManager::Dnf => "dnf",
            PackageManager::Pacman => "pacman",
            PackageManager::Brew => "brew",
        }
    }

    pub fn search_command(&self, name: &str) -> String {
        match self {
            PackageManager::Pkg => format!("pkg search {name}"),
            PackageManager::Apt => format!("apt search {name}"),
            PackageManager::Dnf => format!("dnf search {name}"),
            PackageManager::Pacman => format!("pacman -Ss {name}"),
            PackageManager::Brew => format!("brew search {name}"),
        }
    }

    /// System-wide managers need elevation; Termux's pkg and brew do not.
    pub fn install_command(&self, name: &str) -> String {
        match self {
            PackageManager::Pkg => format!("pkg install {name}"),
            PackageManager::Apt => format!("sudo apt install {name}"),
            PackageManager::Dnf => format!("sudo dnf install {name}"),
            PackageManager::Pacman => format!("sudo pacman -S {name}"),
            PackageManager::Brew => format!("brew install {name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_shell_never_returns_empty() {
        assert!(!ShellDetector::detect_shell().is_empty());
        assert!(!ShellDetector::shell_binary().is_empty());
    }

    #[test]
    fn install_commands_target_the_right_binary() {
        assert_eq!(
            PackageManager::Pkg.install_command("git"),
            "pkg install git"
        );
        assert_eq!(
            PackageManager::Apt.install_command("git"),
            "sudo apt install git"
        );
        assert_eq!(
            PackageManager::Pacman.search_command("git"),
            "pacman -Ss git"
        );
    }
}
