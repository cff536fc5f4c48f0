use anyhow::Result;
use clap::Parser;
use crate_index::{
    commands::{self, FileOptions, config::IndexConfig},
    domain::model::{DependencyKind, FileType, Release, ReleaseKey},
};
use std::path::PathBuf;

/// crate-index - a private Python package index
///
/// Register packages, publish releases with their files and dependency
/// metadata, and keep every package's releases ranked by version.
///
/// Examples:
///   crate-index package add requests
///   crate-index release add requests 2.0.1 --summary "HTTP for humans"
///   crate-index show requests
#[derive(Parser, Debug)]
#[command(author, version = env!("CRATE_INDEX_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Index root directory (defaults to ~/.crate-index; also via CRATE_INDEX_ROOT)
    #[arg(
        long = "root",
        short = 'r',
        env = "CRATE_INDEX_ROOT",
        value_name = "PATH",
        global = true
    )]
    pub root: Option<PathBuf>,

    /// Base URL of the index pages (defaults to http://localhost:8000)
    #[arg(
        long = "base-url",
        env = "CRATE_INDEX_BASE_URL",
        value_name = "URL",
        global = true
    )]
    pub base_url: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Manage packages
    #[command(subcommand)]
    Package(PackageCommands),

    /// Manage releases
    #[command(subcommand)]
    Release(ReleaseCommands),

    /// Manage release files
    #[command(subcommand)]
    File(FileCommands),

    /// Manage release dependencies
    #[command(subcommand)]
    Dep(DepCommands),

    /// Show a package, its releases and their files
    Show(ShowArgs),

    /// List all packages
    List,

    /// Recompute release ranks
    Reorder(ReorderArgs),

    /// List registered trove classifiers
    Classifiers,
}

#[derive(clap::Subcommand, Debug)]
enum PackageCommands {
    /// Register a new package
    Add {
        /// Package name: letters, digits, '-' and '_'
        name: String,
    },
}

#[derive(clap::Subcommand, Debug)]
enum ReleaseCommands {
    /// Publish a new release
    Add(ReleaseAddArgs),

    /// Hide a release (or show it again with --unhide)
    Hide {
        package: String,
        version: String,
        #[arg(long)]
        unhide: bool,
    },
}

#[derive(clap::Args, Debug)]
pub struct ReleaseAddArgs {
    pub package: String,
    pub version: String,
    #[arg(long, default_value = "")]
    pub summary: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value = "")]
    pub keywords: String,
    #[arg(long, default_value = "")]
    pub license: String,
    #[arg(long, default_value = "")]
    pub platform: String,
    #[arg(long, default_value = "")]
    pub author: String,
    #[arg(long, default_value = "")]
    pub author_email: String,
    #[arg(long, default_value = "")]
    pub maintainer: String,
    #[arg(long, default_value = "")]
    pub maintainer_email: String,
    #[arg(long, default_value = "")]
    pub requires_python: String,
    #[arg(long, default_value = "")]
    pub download_uri: String,
    /// Trove classifier; may be repeated
    #[arg(long = "classifier", value_name = "TROVE")]
    pub classifiers: Vec<String>,
    /// Publish the release hidden
    #[arg(long)]
    pub hidden: bool,
}

impl From<ReleaseAddArgs> for Release {
    fn from(args: ReleaseAddArgs) -> Self {
        Release {
            hidden: args.hidden,
            summary: args.summary,
            description: args.description,
            keywords: args.keywords,
            license: args.license,
            platform: args.platform,
            author: args.author,
            author_email: args.author_email,
            maintainer: args.maintainer,
            maintainer_email: args.maintainer_email,
            requires_python: args.requires_python,
            download_uri: args.download_uri,
            classifiers: args.classifiers,
            ..Release::new(args.package, args.version)
        }
    }
}

#[derive(clap::Subcommand, Debug)]
enum FileCommands {
    /// Copy an artifact into the index and attach it to a release
    Add {
        package: String,
        version: String,
        path: PathBuf,
        /// sdist, bdist_egg, bdist_msi, bdist_dmg, bdist_rpm, bdist_dumb or bdist_wininst
        #[arg(long = "type", default_value = "sdist")]
        file_type: FileType,
        /// Defaults to "source" for sdists and "any" otherwise
        #[arg(long)]
        python_version: Option<String>,
        /// Name shown to users (defaults to the file's name)
        #[arg(long)]
        filename: Option<String>,
        #[arg(long)]
        comment: Option<String>,
    },

    /// Count a download and print the artifact's location
    Download {
        package: String,
        version: String,
        filename: String,
    },
}

#[derive(clap::Subcommand, Debug)]
enum DepCommands {
    /// Record a requires/provides/obsoletes entry
    Add {
        package: String,
        version: String,
        name: String,
        /// requires, requires_dist, external, provides, provides_dist, obsoletes or obsoletes_dist
        #[arg(long, default_value = "requires_dist")]
        kind: DependencyKind,
        /// Version specifier, e.g. ">=1.0"
        #[arg(long)]
        spec: Option<String>,
        /// Environment marker, e.g. 'python_version < "3"'
        #[arg(long)]
        environment: Option<String>,
    },
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    pub name: String,
}

#[derive(clap::Args, Debug)]
pub struct ReorderArgs {
    /// Only this package (default: every package)
    pub package: Option<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = crate_index::runtime::RealRuntime;
    let config = IndexConfig::resolve(&runtime, cli.root, cli.base_url)?;

    match cli.command {
        Commands::Package(PackageCommands::Add { name }) => {
            commands::package_add(runtime, &config, &name)?
        }
        Commands::Release(ReleaseCommands::Add(args)) => {
            commands::release_add(runtime, &config, args.into())?
        }
        Commands::Release(ReleaseCommands::Hide {
            package,
            version,
            unhide,
        }) => commands::release_hide(
            runtime,
            &config,
            &ReleaseKey::new(package, version),
            !unhide,
        )?,
        Commands::File(FileCommands::Add {
            package,
            version,
            path,
            file_type,
            python_version,
            filename,
            comment,
        }) => commands::file_add(
            runtime,
            &config,
            &ReleaseKey::new(package, version),
            file_type,
            &path,
            FileOptions {
                python_version,
                filename,
                comment,
            },
        )?,
        Commands::File(FileCommands::Download {
            package,
            version,
            filename,
        }) => commands::file_download(
            runtime,
            &config,
            &ReleaseKey::new(package, version),
            &filename,
        )?,
        Commands::Dep(DepCommands::Add {
            package,
            version,
            name,
            kind,
            spec,
            environment,
        }) => commands::dep_add(
            runtime,
            &config,
            &ReleaseKey::new(package, version),
            kind,
            &name,
            spec,
            environment,
        )?,
        Commands::Show(args) => commands::show(runtime, &config, &args.name)?,
        Commands::List => commands::list(runtime, &config)?,
        Commands::Reorder(args) => commands::reorder(runtime, &config, args.package.as_deref())?,
        Commands::Classifiers => commands::classifiers(runtime, &config)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_package_add_parsing() {
        let cli = Cli::try_parse_from(["crate-index", "package", "add", "foo"]).unwrap();
        match cli.command {
            Commands::Package(PackageCommands::Add { name }) => assert_eq!(name, "foo"),
            _ => panic!("Expected package add command"),
        }
        assert_eq!(cli.root, None);
    }

    #[test]
    fn test_cli_release_add_parsing() {
        let cli = Cli::try_parse_from([
            "crate-index",
            "release",
            "add",
            "foo",
            "1.0",
            "--summary",
            "A foo",
            "--classifier",
            "Framework :: Django",
            "--classifier",
            "License :: OSI Approved",
        ])
        .unwrap();
        match cli.command {
            Commands::Release(ReleaseCommands::Add(args)) => {
                let release: Release = args.into();
                assert_eq!(release.package, "foo");
                assert_eq!(release.version, "1.0");
                assert_eq!(release.summary, "A foo");
                assert_eq!(release.classifiers.len(), 2);
                assert!(!release.hidden);
            }
            _ => panic!("Expected release add command"),
        }
    }

    #[test]
    fn test_cli_file_add_parsing() {
        let cli = Cli::try_parse_from([
            "crate-index",
            "file",
            "add",
            "foo",
            "1.0",
            "dist/foo-1.0-py2.7.egg",
            "--type",
            "bdist_egg",
            "--python-version",
            "2.7",
        ])
        .unwrap();
        match cli.command {
            Commands::File(FileCommands::Add {
                file_type,
                python_version,
                path,
                ..
            }) => {
                assert_eq!(file_type, FileType::BdistEgg);
                assert_eq!(python_version.as_deref(), Some("2.7"));
                assert_eq!(path, PathBuf::from("dist/foo-1.0-py2.7.egg"));
            }
            _ => panic!("Expected file add command"),
        }
    }

    #[test]
    fn test_cli_file_type_defaults_to_sdist() {
        let cli =
            Cli::try_parse_from(["crate-index", "file", "add", "foo", "1.0", "foo.tar.gz"]).unwrap();
        match cli.command {
            Commands::File(FileCommands::Add { file_type, .. }) => {
                assert_eq!(file_type, FileType::Sdist)
            }
            _ => panic!("Expected file add command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_file_type() {
        let result = Cli::try_parse_from([
            "crate-index",
            "file",
            "add",
            "foo",
            "1.0",
            "foo.zip",
            "--type",
            "wheel",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_dep_add_parsing() {
        let cli = Cli::try_parse_from([
            "crate-index",
            "dep",
            "add",
            "foo",
            "1.0",
            "bar",
            "--kind",
            "obsoletes",
            "--spec",
            "<2.0",
        ])
        .unwrap();
        match cli.command {
            Commands::Dep(DepCommands::Add { kind, spec, .. }) => {
                assert_eq!(kind, DependencyKind::Obsoletes);
                assert_eq!(spec.as_deref(), Some("<2.0"));
            }
            _ => panic!("Expected dep add command"),
        }
    }

    #[test]
    fn test_cli_global_root_parsing() {
        let cli = Cli::try_parse_from(["crate-index", "--root", "/tmp", "list"]).unwrap();
        assert_eq!(cli.root, Some(PathBuf::from("/tmp")));
    }

    #[test]
    fn test_cli_root_after_subcommand() {
        let cli = Cli::try_parse_from(["crate-index", "show", "foo", "--root", "/tmp"]).unwrap();
        assert_eq!(cli.root, Some(PathBuf::from("/tmp")));
    }

    #[test]
    fn test_cli_reorder_optional_package() {
        let cli = Cli::try_parse_from(["crate-index", "reorder"]).unwrap();
        match cli.command {
            Commands::Reorder(args) => assert_eq!(args.package, None),
            _ => panic!("Expected reorder command"),
        }
    }

    #[test]
    fn test_cli_no_subcommand_fails() {
        assert!(Cli::try_parse_from(["crate-index"]).is_err());
    }
}
