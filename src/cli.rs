// CLI module for argument parsing and configuration

use crate::config::UserConfig;
use crate::domain::{CatalogOptions, Polarity, SwipeThreshold};
use crate::session::SessionConfig;
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// Default number of items loaded into one session
pub const DEFAULT_LIMIT: usize = 1000;

/// Gallery Swipe - review a photo folder one item at a time
///
/// Drag (or press arrow keys) to keep or delete each photo and video.
/// Deleted items go to the system trash when it is available, and are
/// removed permanently when it is not.
#[derive(Parser, Debug, Clone)]
#[command(name = "gswp")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory to scan for photos and videos
    ///
    /// If not specified, defaults to the current directory.
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Dry run mode - record decisions without touching any file
    #[arg(short = 'n', long = "dry-run", action = ArgAction::SetTrue)]
    pub dry_run: bool,

    /// Skip the confirmation prompt before each delete
    #[arg(short = 'y', long = "yes", action = ArgAction::SetTrue)]
    pub yes: bool,

    /// Which swipe direction deletes
    #[arg(short = 'p', long = "polarity", value_enum)]
    pub polarity: Option<PolarityArg>,

    /// Swipe threshold as a fraction of the screen width (0 < f <= 1)
    #[arg(short = 't', long = "threshold")]
    pub threshold: Option<f64>,

    /// Maximum number of items loaded into the session
    #[arg(short = 'l', long = "limit", default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,

    /// Review oldest items first
    #[arg(short = 'r', long = "reverse", action = ArgAction::SetTrue)]
    pub reverse: bool,

    /// Include hidden files (files starting with .)
    #[arg(long = "hidden", action = ArgAction::SetTrue)]
    pub show_hidden: bool,

    /// Show the welcome screen even if it was already dismissed
    #[arg(long = "welcome", action = ArgAction::SetTrue)]
    pub welcome: bool,

    /// Verbose logging to the log file
    #[arg(long = "debug", action = ArgAction::SetTrue)]
    pub debug: bool,
}

/// Swipe polarity options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolarityArg {
    /// Swipe right to delete, left to keep
    RightDelete,
    /// Swipe right to keep, left to delete
    RightKeep,
}

impl From<PolarityArg> for Polarity {
    fn from(arg: PolarityArg) -> Self {
        match arg {
            PolarityArg::RightDelete => Polarity::RightIsDelete,
            PolarityArg::RightKeep => Polarity::RightIsKeep,
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Validate the arguments and return any errors
    pub fn validate(&self) -> Result<(), String> {
        if !self.directory.exists() {
            return Err(format!(
                "Directory does not exist: {}",
                self.directory.display()
            ));
        }

        if !self.directory.is_dir() {
            return Err(format!(
                "Path is not a directory: {}",
                self.directory.display()
            ));
        }

        if let Some(threshold) = self.threshold {
            if !is_valid_fraction(threshold) {
                return Err(format!(
                    "Invalid threshold: {}. Use a fraction of the screen width in (0, 1], e.g. 0.3",
                    threshold
                ));
            }
        }

        if self.limit == 0 {
            return Err("limit must be at least 1".to_string());
        }

        Ok(())
    }
}

pub(crate) fn is_valid_fraction(value: f64) -> bool {
    value > 0.0 && value <= 1.0
}

/// Configuration derived from CLI arguments and the persisted user config
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub directory: PathBuf,
    pub dry_run: bool,
    pub confirm_delete: bool,
    pub polarity: Polarity,
    pub threshold_fraction: f64,
    pub limit: usize,
    pub reverse: bool,
    pub show_hidden: bool,
    pub show_welcome: bool,
    pub debug: bool,
}

impl AppConfig {
    /// Merges CLI flags over the persisted preferences
    pub fn resolve(args: Args, user: &UserConfig) -> Self {
        AppConfig {
            directory: args.directory,
            dry_run: args.dry_run,
            confirm_delete: user.confirm_delete && !args.yes && !args.dry_run,
            polarity: args.polarity.map(Polarity::from).unwrap_or(user.polarity),
            threshold_fraction: args.threshold.unwrap_or(user.threshold_fraction),
            limit: args.limit,
            reverse: args.reverse,
            show_hidden: args.show_hidden,
            show_welcome: args.welcome || !user.welcome_shown,
            debug: args.debug,
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            threshold: SwipeThreshold::Fraction(self.threshold_fraction),
            polarity: self.polarity,
        }
    }

    pub fn catalog_options(&self) -> CatalogOptions {
        CatalogOptions {
            show_hidden: self.show_hidden,
            reverse: self.reverse,
            limit: self.limit,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            directory: PathBuf::from("."),
            dry_run: false,
            confirm_delete: true,
            polarity: Polarity::default(),
            threshold_fraction: 0.3,
            limit: DEFAULT_LIMIT,
            reverse: false,
            show_hidden: false,
            show_welcome: true,
            debug: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            directory: PathBuf::from("."),
            dry_run: false,
            yes: false,
            polarity: None,
            threshold: None,
            limit: DEFAULT_LIMIT,
            reverse: false,
            show_hidden: false,
            welcome: false,
            debug: false,
        }
    }

    mod args_tests {
        use super::*;

        #[test]
        fn test_parse_defaults() {
            let args = Args::try_parse_from(["gswp"]).unwrap();

            assert_eq!(args.directory, PathBuf::from("."));
            assert!(!args.dry_run);
            assert!(args.polarity.is_none());
            assert!(args.threshold.is_none());
            assert_eq!(args.limit, DEFAULT_LIMIT);
        }

        #[test]
        fn test_parse_all_flags() {
            let args = Args::try_parse_from([
                "gswp",
                "/photos",
                "--dry-run",
                "--yes",
                "--polarity",
                "right-keep",
                "--threshold",
                "0.5",
                "--limit",
                "20",
                "--reverse",
                "--hidden",
                "--welcome",
                "--debug",
            ])
            .unwrap();

            assert_eq!(args.directory, PathBuf::from("/photos"));
            assert!(args.dry_run);
            assert!(args.yes);
            assert_eq!(args.polarity, Some(PolarityArg::RightKeep));
            assert_eq!(args.threshold, Some(0.5));
            assert_eq!(args.limit, 20);
            assert!(args.reverse);
            assert!(args.show_hidden);
            assert!(args.welcome);
            assert!(args.debug);
        }

        #[test]
        fn test_parse_rejects_unknown_polarity() {
            assert!(Args::try_parse_from(["gswp", "--polarity", "sideways"]).is_err());
        }

        #[test]
        fn test_polarity_conversion() {
            assert_eq!(
                Polarity::from(PolarityArg::RightDelete),
                Polarity::RightIsDelete
            );
            assert_eq!(Polarity::from(PolarityArg::RightKeep), Polarity::RightIsKeep);
        }

        #[test]
        fn test_validate_nonexistent_directory() {
            let args = Args {
                directory: PathBuf::from("/nonexistent/path/12345"),
                ..base_args()
            };

            let result = args.validate();
            assert!(result.is_err());
            assert!(result.unwrap_err().contains("does not exist"));
        }

        #[test]
        fn test_validate_file_is_not_directory() {
            let file = tempfile::NamedTempFile::new().unwrap();
            let args = Args {
                directory: file.path().to_path_buf(),
                ..base_args()
            };

            assert!(args.validate().unwrap_err().contains("not a directory"));
        }

        #[test]
        fn test_validate_threshold_range() {
            for bad in [0.0, -0.2, 1.5] {
                let args = Args {
                    threshold: Some(bad),
                    ..base_args()
                };
                assert!(args.validate().unwrap_err().contains("Invalid threshold"));
            }

            let args = Args {
                threshold: Some(1.0),
                ..base_args()
            };
            assert!(args.validate().is_ok());
        }

        #[test]
        fn test_validate_zero_limit() {
            let args = Args {
                limit: 0,
                ..base_args()
            };
            assert!(args.validate().unwrap_err().contains("limit"));
        }

        #[test]
        fn test_validate_success() {
            assert!(base_args().validate().is_ok());
        }
    }

    mod config_tests {
        use super::*;

        #[test]
        fn test_app_config_uses_user_preferences() {
            let user = UserConfig {
                welcome_shown: true,
                polarity: Polarity::RightIsKeep,
                threshold_fraction: 0.4,
                confirm_delete: true,
            };

            let config = AppConfig::resolve(base_args(), &user);

            assert_eq!(config.polarity, Polarity::RightIsKeep);
            assert_eq!(config.threshold_fraction, 0.4);
            assert!(config.confirm_delete);
            assert!(!config.show_welcome);
        }

        #[test]
        fn test_app_config_flags_override() {
            let user = UserConfig {
                welcome_shown: true,
                ..Default::default()
            };
            let args = Args {
                polarity: Some(PolarityArg::RightKeep),
                threshold: Some(0.6),
                yes: true,
                welcome: true,
                ..base_args()
            };

            let config = AppConfig::resolve(args, &user);

            assert_eq!(config.polarity, Polarity::RightIsKeep);
            assert_eq!(config.threshold_fraction, 0.6);
            assert!(!config.confirm_delete);
            assert!(config.show_welcome);
        }

        #[test]
        fn test_dry_run_never_confirms() {
            let args = Args {
                dry_run: true,
                ..base_args()
            };

            let config = AppConfig::resolve(args, &UserConfig::default());

            assert!(config.dry_run);
            assert!(!config.confirm_delete);
        }

        #[test]
        fn test_session_and_catalog_config() {
            let config = AppConfig {
                threshold_fraction: 0.25,
                limit: 10,
                reverse: true,
                ..AppConfig::default()
            };

            let session = config.session_config();
            assert_eq!(session.threshold, SwipeThreshold::Fraction(0.25));
            assert_eq!(session.polarity, Polarity::RightIsDelete);

            let catalog = config.catalog_options();
            assert_eq!(catalog.limit, 10);
            assert!(catalog.reverse);
            assert!(!catalog.show_hidden);
        }

        #[test]
        fn test_app_config_default() {
            let config = AppConfig::default();

            assert_eq!(config.directory, PathBuf::from("."));
            assert!(!config.dry_run);
            assert!(config.confirm_delete);
            assert_eq!(config.limit, DEFAULT_LIMIT);
        }
    }
}
