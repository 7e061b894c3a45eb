//! CLI argument definitions using clap derive macros.

use clap::{Parser, ValueEnum};

use proxyview_core::ContentCategory;

/// Resolve a URL into renderable content through the forwarding proxy.
///
/// Proxyview fetches the resource behind a URL via the configured proxy
/// endpoint, negotiates its real content type against the server, and
/// prints one typed delivery message per line as JSON.
#[derive(Parser, Debug)]
#[command(name = "proxyview")]
#[command(author, version, about)]
pub struct Args {
    /// URL to resolve (scheme optional; `#fragment` inputs navigate in place)
    pub url: String,

    /// Declared content category; skips URL classification
    #[arg(long = "type", value_enum)]
    pub category: Option<CategoryArg>,

    /// Proxy endpoint template, overriding the config file
    #[arg(long)]
    pub proxy: Option<String>,

    /// Emit a navigation instruction instead of fetching
    #[arg(short = 'n', long)]
    pub navigate: bool,

    /// Confirm large binary transfers without prompting
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

/// Content categories accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    /// Renderable markup or plain text.
    Document,
    /// Raster image, loaded by reference.
    Image,
    /// Audio stream, loaded by reference.
    Audio,
    /// Video stream, loaded by reference.
    Video,
    /// Generic binary resource, delivered inline.
    #[value(name = "binary-resource")]
    Binary,
}

impl From<CategoryArg> for ContentCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Document => Self::Document,
            CategoryArg::Image => Self::Image,
            CategoryArg::Audio => Self::Audio,
            CategoryArg::Video => Self::Video,
            CategoryArg::Binary => Self::Binary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_minimal_args_parse() {
        let args = Args::try_parse_from(["proxyview", "example.com"]).unwrap();
        assert_eq!(args.url, "example.com");
        assert!(args.category.is_none());
        assert!(args.proxy.is_none());
        assert!(!args.navigate);
        assert!(!args.yes);
    }

    #[test]
    fn test_cli_requires_url() {
        let result = Args::try_parse_from(["proxyview"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_cli_type_flag_values() {
        let args =
            Args::try_parse_from(["proxyview", "example.com/x", "--type", "image"]).unwrap();
        assert_eq!(args.category, Some(CategoryArg::Image));
        assert_eq!(
            ContentCategory::from(args.category.unwrap()),
            ContentCategory::Image
        );

        let args =
            Args::try_parse_from(["proxyview", "example.com/x", "--type", "binary-resource"])
                .unwrap();
        assert_eq!(args.category, Some(CategoryArg::Binary));
    }

    #[test]
    fn test_cli_rejects_unknown_type() {
        let result = Args::try_parse_from(["proxyview", "example.com", "--type", "blob"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["proxyview", "x.com", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        // --help causes early exit, so we check it returns an error with Help kind
        let result = Args::try_parse_from(["proxyview", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let result = Args::try_parse_from(["proxyview", "--version"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
