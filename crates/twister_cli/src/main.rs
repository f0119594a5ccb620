use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use twister_core::{init_logging, LogConfig, LogFormat, Scripting, ScriptingData, ScriptingElement};

/// Validate and query twister scripting files.
#[derive(Parser, Debug)]
#[command(author, version, about = "twister scripting rule inspector", long_about = None)]
struct Cli {
    /// Scripting file to load. Repeat to load several; rules keep file order.
    #[arg(long = "scripting-list", value_name = "FILE", global = true)]
    scripting_list: Vec<PathBuf>,

    /// Log level or filter directive, overridden by RUST_LOG.
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[arg(long, value_enum, default_value_t = LogFormatArg::Compact, global = true)]
    log_format: LogFormatArg,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load every scripting file and report how many rules each holds.
    Check,
    /// Print the rule applied to a scenario on a platform.
    Match {
        #[arg(long)]
        scenario: String,
        #[arg(long)]
        platform: String,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Yaml,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&LogConfig {
        level: cli.log_level.clone(),
        format: cli.log_format.into(),
        use_colors: false,
    })?;

    match cli.command {
        Command::Check => {
            print!("{}", check(&cli.scripting_list)?);
        }
        Command::Match {
            scenario,
            platform,
            output,
        } => {
            let scripting = Scripting::new(&cli.scripting_list)?;
            let matched = scripting.get_matched_scripting(&scenario, &platform);
            print!("{}", render(matched, output)?);
        }
    }

    Ok(())
}

/// Load each file on its own so the report can name per-file rule counts
fn check(files: &[PathBuf]) -> Result<String> {
    let mut total = ScriptingData::new();
    let mut report = String::new();

    for file in files {
        let data = ScriptingData::load_from_yaml(file)?;
        if data.is_empty() {
            twister_core::twister_log_warn!(file = %file.display(), "scripting file has no rules");
        } else {
            twister_core::twister_log_info!(file = %file.display(), rules = data.len(), "scripting file is valid");
        }
        writeln!(report, "{}: {} rules", file.display(), data.len())?;
        total.extend(data);
    }

    writeln!(report, "total: {} rules", total.len())?;
    Ok(report)
}

fn render(matched: Option<&ScriptingElement>, output: OutputFormat) -> Result<String> {
    match output {
        OutputFormat::Yaml => {
            serde_yaml::to_string(&matched).context("Failed to serialize matched scripting")
        }
        OutputFormat::Text => Ok(matched.map_or_else(
            || "no matching scripting\n".to_string(),
            render_text,
        )),
    }
}

fn render_text(element: &ScriptingElement) -> String {
    let script = |path: Option<&Path>| {
        path.map_or_else(|| "-".to_string(), |p| p.display().to_string())
    };

    format!(
        "comment: {}\npre_script: {}\npost_flash_script: {}\npost_script: {}\n",
        element.comment(),
        script(element.pre_script()),
        script(element.post_flash_script()),
        script(element.post_script()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;
    use twister_core::ScriptingElementConfig;

    fn element() -> ScriptingElement {
        ScriptingElement::new(ScriptingElementConfig {
            scenarios: vec!["kernel.*".into()],
            pre_script: Some("pre.sh".into()),
            comment: "power cycle".into(),
            ..Default::default()
        })
        .expect("valid element")
    }

    #[test]
    fn text_output_lists_scripts() {
        let out = render(Some(&element()), OutputFormat::Text).expect("renders");
        assert_eq!(
            out,
            "comment: power cycle\npre_script: pre.sh\npost_flash_script: -\npost_script: -\n"
        );
    }

    #[test]
    fn no_match_output() {
        assert_eq!(
            render(None, OutputFormat::Text).expect("renders"),
            "no matching scripting\n"
        );
        assert_eq!(render(None, OutputFormat::Yaml).expect("renders").trim(), "null");
    }

    #[test]
    fn yaml_output_round_trips_into_rule() {
        let out = render(Some(&element()), OutputFormat::Yaml).expect("renders");
        let config: ScriptingElementConfig = serde_yaml::from_str(&out).expect("valid rule");
        assert_eq!(&config, element().config());
    }

    #[test]
    fn check_without_files_reports_zero() {
        assert_eq!(check(&[]).expect("nothing to load"), "total: 0 rules\n");
    }

    #[cfg(not(feature = "minimal-logging"))]
    #[traced_test]
    #[test]
    fn check_logs_each_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let rules = dir.path().join("rules.yaml");
        let empty = dir.path().join("empty.yaml");
        std::fs::write(&rules, "- scenarios: [kernel]\n").expect("Failed to write scripting file");
        std::fs::write(&empty, "").expect("Failed to write scripting file");

        let report = check(&[rules, empty]).expect("valid files");
        assert!(report.ends_with("total: 1 rules\n"));
        assert!(logs_contain("scripting file is valid"));
        assert!(logs_contain("scripting file has no rules"));
    }

    #[test]
    fn cli_parses_repeated_scripting_list() {
        let cli = Cli::try_parse_from([
            "twister-scripting",
            "--scripting-list",
            "a.yaml",
            "--scripting-list",
            "b.yaml",
            "match",
            "--scenario",
            "kernel.common",
            "--platform",
            "qemu_x86",
        ])
        .expect("valid arguments");

        assert_eq!(
            cli.scripting_list,
            [PathBuf::from("a.yaml"), PathBuf::from("b.yaml")]
        );
        assert!(matches!(cli.command, Command::Match { output: OutputFormat::Text, .. }));
    }
}
