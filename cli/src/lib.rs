//! Command line interface of the threat modeling engine.
//!
//! In the default output mode the only thing written to stdout is the final
//! result; all diagnostics go to stderr via tracing.

use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use stria_core::Config;
use stria_core::read_and_analyze_model;
use stria_core::report::write_report;
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "stria",
    about = "Agile threat modeling: evaluates a declarative model of a software system \
             against a library of risk rules",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze a threat model document and write the risk report.
    Analyze(AnalyzeArgs),
    /// List the built-in risk rules with their categories.
    ListRiskRules,
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// The threat model input document (YAML).
    #[arg(long, value_name = "FILE")]
    pub input_file: PathBuf,

    /// Folder receiving the generated report.
    #[arg(long, value_name = "DIR", default_value = "output")]
    pub output_folder: PathBuf,

    /// Folder holding the RAA and custom-rule plugin executables.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub bin_folder: PathBuf,

    /// Executable name of the RAA plugin inside the bin folder.
    #[arg(long, value_name = "NAME", default_value = "stria-raa")]
    pub raa_plugin: String,

    /// Custom risk rule plugin executables inside the bin folder.
    #[arg(long, value_name = "NAME", value_delimiter = ',')]
    pub risk_rules_plugins: Vec<String>,

    /// Risk rule ids to skip during evaluation.
    #[arg(long, value_name = "ID", value_delimiter = ',')]
    pub skip_risk_rules: Vec<String>,

    /// Only warn about risk tracking entries matching no generated risk
    /// instead of failing.
    #[arg(long)]
    pub ignore_orphaned_risk_tracking: bool,
}

impl From<AnalyzeArgs> for Config {
    fn from(args: AnalyzeArgs) -> Self {
        Config {
            input_file: args.input_file,
            output_folder: args.output_folder,
            bin_folder: args.bin_folder,
            raa_plugin: args.raa_plugin,
            risk_rules_plugins: args.risk_rules_plugins,
            skip_risk_rules: args.skip_risk_rules,
            ignore_orphaned_risk_tracking: args.ignore_orphaned_risk_tracking,
        }
    }
}

pub fn run(cli: Cli) -> Result<(), stria_core::Error> {
    match cli.command {
        Command::Analyze(args) => analyze(args.into()),
        Command::ListRiskRules => {
            list_risk_rules();
            Ok(())
        }
    }
}

fn analyze(config: Config) -> Result<(), stria_core::Error> {
    let evaluation = read_and_analyze_model(&config)?;
    let report_path = write_report(&config.output_folder, &evaluation)?;
    info!(report = %report_path.display(), "report written");

    let total_risks: usize = evaluation
        .risks_by_category
        .values()
        .map(Vec::len)
        .sum();
    println!(
        "identified {total_risks} risks in {} categories, report written to {}",
        evaluation.risks_by_category.len(),
        report_path.display()
    );
    Ok(())
}

fn list_risk_rules() {
    for rule in stria_rules::built_in_risk_rules() {
        let category = rule.category();
        println!("{}: {}", category.id, category.title);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn analyze_args_map_onto_the_config() {
        let cli = Cli::parse_from([
            "stria",
            "analyze",
            "--input-file",
            "model.yaml",
            "--skip-risk-rules",
            "rule-a,rule-b",
            "--ignore-orphaned-risk-tracking",
        ]);
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze subcommand");
        };
        let config: Config = args.into();
        assert_eq!(config.input_file, PathBuf::from("model.yaml"));
        assert_eq!(
            config.skip_risk_rules,
            vec!["rule-a".to_string(), "rule-b".to_string()]
        );
        assert!(config.ignore_orphaned_risk_tracking);
        assert_eq!(config.raa_plugin, "stria-raa");
    }
}
