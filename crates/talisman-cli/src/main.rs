// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result, anyhow};
use config::Config;
use runtime::{ApiRuntime, DemoRuntime};
use std::env;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use talisman_api::Client;
use talisman_app::{AppState, PracticeId};
use tracing_subscriber::EnvFilter;

const DEMO_SEED: u64 = 2026;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `talisman --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;
    let ui_options = config.ui_options()?;

    let mut state = AppState {
        active_page: config.start_page(),
        ..AppState::default()
    };

    if options.demo && options.export_insights.is_none() && !options.check_only {
        init_logging(&config)?;
        tracing::info!(config = %options.config_path.display(), "config loaded");
        tracing::info!(seed = DEMO_SEED, "starting with demo data");
        let mut runtime = DemoRuntime::new(DEMO_SEED);
        return talisman_tui::run_app(&mut state, &mut runtime, ui_options);
    }

    let base_url = options
        .api_url
        .clone()
        .unwrap_or_else(|| config.api_base_url());
    let client = Client::new(&base_url, config.api_timeout()?, config.report_timeout()?)
        .with_context(|| {
            format!(
                "invalid [api] config in {}; fix base_url/host/port/timeout values or pass --api-url",
                options.config_path.display()
            )
        })?;

    if options.check_only {
        client.ping()?;
        println!("ok: {} is reachable", client.base_url());
        return Ok(());
    }

    if let Some(practice) = &options.export_insights {
        let report = client.insights_markdown(practice, config.days_back())?;
        print!("{report}");
        return Ok(());
    }

    init_logging(&config)?;
    tracing::info!(config = %options.config_path.display(), "config loaded");
    tracing::info!(base_url = client.base_url(), "starting dashboard");
    let mut runtime = ApiRuntime::new(client);
    talisman_tui::run_app(&mut state, &mut runtime, ui_options)
}

/// Routes `tracing` output to the log file; the terminal belongs to the UI.
fn init_logging(config: &Config) -> Result<()> {
    let path = config.log_file()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}", path.display()))?;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config.log_level()).with_context(|| {
            format!(
                "invalid [log].level {:?}; use a level such as info or debug",
                config.log_level()
            )
        })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|error| anyhow!("initialize logging: {error}"))?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    api_url: Option<String>,
    export_insights: Option<PracticeId>,
    print_config_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        api_url: None,
        export_insights: None,
        print_config_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--api-url" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--api-url requires a URL such as http://localhost:8000"))?;
                options.api_url = Some(value.as_ref().to_owned());
            }
            "--export-insights" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--export-insights requires a practice GUID"))?;
                options.export_insights = Some(PracticeId::new(value.as_ref()));
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("talisman: revenue-cycle analytics dashboard");
    println!("  --config <path>             Use a specific config path");
    println!("  --api-url <url>             Override the analytics API base URL");
    println!("  --demo                      Launch with generated demo data (offline)");
    println!("  --print-config-path         Print resolved config path");
    println!("  --print-example-config      Print a v1 config template");
    println!("  --check                     Validate config and ping the API");
    println!("  --export-insights <guid>    Print the markdown insights report for a practice");
    println!("  --help                      Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, parse_cli_args};
    use anyhow::Result;
    use std::path::PathBuf;
    use talisman_app::PracticeId;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/talisman-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                api_url: None,
                export_insights: None,
                print_config_path: false,
                demo: false,
                print_example: false,
                check_only: false,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_config_and_api_overrides() -> Result<()> {
        let options = parse_cli_args(
            vec![
                "--config",
                "/custom/config.toml",
                "--api-url",
                "http://10.0.0.5:8000",
            ],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        assert_eq!(options.api_url.as_deref(), Some("http://10.0.0.5:8000"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_values() {
        for (flag, expected) in [
            ("--config", "--config requires a file path"),
            ("--api-url", "--api-url requires a URL"),
            ("--export-insights", "--export-insights requires a practice GUID"),
        ] {
            let error = parse_cli_args(vec![flag], default_options_path())
                .expect_err("missing value should fail");
            assert!(error.to_string().contains(expected), "{error}");
        }
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn parse_cli_args_sets_print_check_and_demo_flags() -> Result<()> {
        let options = parse_cli_args(
            vec![
                "--print-config-path",
                "--print-example-config",
                "--check",
                "--demo",
            ],
            default_options_path(),
        )?;
        assert!(options.print_config_path);
        assert!(options.print_example);
        assert!(options.check_only);
        assert!(options.demo);
        assert!(!options.show_help);
        Ok(())
    }

    #[test]
    fn parse_cli_args_reads_export_target() -> Result<()> {
        let options = parse_cli_args(
            vec!["--export-insights", "loc-42"],
            default_options_path(),
        )?;
        assert_eq!(options.export_insights, Some(PracticeId::new("loc-42")));
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_help_flag_for_long_and_short_variants() -> Result<()> {
        let long = parse_cli_args(vec!["--help"], default_options_path())?;
        assert!(long.show_help);

        let short = parse_cli_args(vec!["-h"], default_options_path())?;
        assert!(short.show_help);
        Ok(())
    }
}
