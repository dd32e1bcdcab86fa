//! Build command implementations (build, clean)

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use super::{EXIT_ERROR, EXIT_SUCCESS};
use crate::build::progress::{ConsoleProgress, JsonProgress, ProgressReporter};
use crate::build::{clean_manifest, BuildContext, BuildGraph, ParallelResolve, ViewAggregate};
use crate::config::loader::{find_config, load_config, merge_cli_overrides, project_root};
use crate::config::{default_config, CliOverrides, ConfigError};

/// Arguments for the build command
pub struct BuildArgs<'a> {
    pub graph: &'a Path,
    pub out: Option<&'a Path>,
    pub config: Option<&'a Path>,
    pub strict: bool,
    pub jobs: Option<usize>,
    pub dry_run: bool,
    pub verbose: bool,
    pub json: bool,
}

/// Load configuration and build the context.
///
/// The project root is the directory holding the config file, or the
/// current directory when there is none.
fn load_context(
    config_path: Option<&Path>,
    overrides: &CliOverrides,
    verbose: bool,
) -> Result<BuildContext, ConfigError> {
    let config_path = config_path.map(Path::to_path_buf).or_else(find_config);

    let (mut config, root) = match config_path {
        Some(path) => {
            if verbose {
                println!("Using config: {}", path.display());
            }
            let config = load_config(Some(&path))?;
            let root = project_root(&path)
                .map(Path::to_path_buf)
                .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());
            (config, root)
        }
        None => {
            if verbose {
                println!("No copy-views.toml found, using defaults");
            }
            (default_config(), std::env::current_dir().unwrap_or_default())
        }
    };

    merge_cli_overrides(&mut config, overrides);
    Ok(BuildContext::new(config, root))
}

/// Run the build command
pub fn run_build(args: BuildArgs<'_>) -> ExitCode {
    let overrides = CliOverrides {
        out: args.out.map(PathBuf::from),
        strict: if args.strict { Some(true) } else { None },
        jobs: args.jobs,
    };

    let context = match load_context(args.config, &overrides, args.verbose) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let graph = match BuildGraph::load(args.graph) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("Error: {}: {}", args.graph.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let reporter: Arc<dyn ProgressReporter> = if args.json {
        Arc::new(JsonProgress::new())
    } else {
        Arc::new(ConsoleProgress::new().with_verbose(args.verbose))
    };

    let aggregate = ViewAggregate::with_policy(context.duplicate_policy());
    let resolve = ParallelResolve::new(context).with_dry_run(args.dry_run).with_reporter(reporter);

    match resolve.run_with(&graph, &aggregate) {
        Ok(result) => {
            if args.dry_run {
                println!("{}", aggregate.render());
            } else if args.verbose {
                println!("{}", result.summary());
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Run the clean command
pub fn run_clean(out: Option<&Path>, config: Option<&Path>) -> ExitCode {
    let overrides = CliOverrides { out: out.map(PathBuf::from), ..Default::default() };

    let context = match load_context(config, &overrides, false) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let out_dir = context.out_dir();
    match clean_manifest(&out_dir) {
        Ok(true) => {
            println!("Removed manifest from {}", out_dir.display());
            ExitCode::from(EXIT_SUCCESS)
        }
        Ok(false) => {
            println!("No manifest in {}", out_dir.display());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::MANIFEST_FILENAME;
    use std::fs;
    use tempfile::TempDir;

    fn write_project(temp: &TempDir) -> (PathBuf, PathBuf) {
        let config = temp.path().join("copy-views.toml");
        fs::write(&config, "[project]\nname = \"demo\"\nout = \"dist\"\n").unwrap();

        let graph = temp.path().join("graph.json");
        fs::write(
            &graph,
            r#"{"packages":[
                {"package":{"name":"demo","directories":{"views":"views"},"build":{"type":"app"}}},
                {"base_path":"plugins/extra","package":{"name":"extra","directories":{"views":"tpl"}}}
            ]}"#,
        )
        .unwrap();

        (config, graph)
    }

    fn exited_with(code: ExitCode, expected: u8) -> bool {
        format!("{:?}", code) == format!("{:?}", ExitCode::from(expected))
    }

    fn args<'a>(graph: &'a Path, config: &'a Path) -> BuildArgs<'a> {
        BuildArgs {
            graph,
            out: None,
            config: Some(config),
            strict: false,
            jobs: Some(2),
            dry_run: false,
            verbose: false,
            json: true,
        }
    }

    #[test]
    fn test_load_context_uses_config_dir_as_root() {
        let temp = TempDir::new().unwrap();
        let (config, _) = write_project(&temp);

        let ctx = load_context(Some(&config), &CliOverrides::default(), false).unwrap();

        assert_eq!(ctx.project_root(), temp.path());
        assert_eq!(ctx.out_dir(), temp.path().join("dist"));
    }

    #[test]
    fn test_load_context_applies_overrides() {
        let temp = TempDir::new().unwrap();
        let (config, _) = write_project(&temp);
        let overrides =
            CliOverrides { out: Some(PathBuf::from("elsewhere")), strict: Some(true), jobs: None };

        let ctx = load_context(Some(&config), &overrides, false).unwrap();

        assert!(ctx.is_strict());
        assert_eq!(ctx.out_dir(), temp.path().join("elsewhere"));
    }

    #[test]
    fn test_run_build_writes_manifest() {
        let temp = TempDir::new().unwrap();
        let (config, graph) = write_project(&temp);

        let code = run_build(args(&graph, &config));

        assert!(exited_with(code, EXIT_SUCCESS));
        let content = fs::read_to_string(temp.path().join("dist").join(MANIFEST_FILENAME)).unwrap();
        assert_eq!(content, "views/*\nplugins/extra/tpl/*");
    }

    #[test]
    fn test_run_build_dry_run_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let (config, graph) = write_project(&temp);

        let code = run_build(BuildArgs { dry_run: true, ..args(&graph, &config) });

        assert!(exited_with(code, EXIT_SUCCESS));
        assert!(!temp.path().join("dist").exists());
    }

    #[test]
    fn test_run_build_missing_graph() {
        let temp = TempDir::new().unwrap();
        let (config, _) = write_project(&temp);
        let missing = temp.path().join("missing.json");

        assert!(exited_with(run_build(args(&missing, &config)), EXIT_ERROR));
    }

    #[test]
    fn test_run_clean_removes_manifest() {
        let temp = TempDir::new().unwrap();
        let (config, graph) = write_project(&temp);
        run_build(args(&graph, &config));

        assert!(exited_with(run_clean(None, Some(&config)), EXIT_SUCCESS));
        assert!(!temp.path().join("dist").join(MANIFEST_FILENAME).exists());
    }
}
