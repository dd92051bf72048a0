//! CLI commands

mod build;
mod init;
mod plan;
mod publish;
mod run;
mod validate;

pub use build::BuildCommand;
pub use init::InitCommand;
pub use plan::PlanCommand;
pub use publish::PublishCommand;
pub use run::RunCommand;
pub use validate::ValidateCommand;

use console::Term;
use dialoguer::Input;
use tracing::warn;

use crate::cli::{display_path, output, Cli, OutputFormat};
use crate::pipeline::PipelineOutcome;

/// Print the outcome of a pipeline run and return its exit code
///
/// With `acknowledge`, a successful run waits for ENTER before the staging area
/// is released.
fn finish(cli: &Cli, outcome: PipelineOutcome, acknowledge: bool) -> anyhow::Result<u8> {
    let code = outcome.exit_code();

    match outcome {
        PipelineOutcome::Succeeded {
            staging,
            index,
            reports,
        } => {
            match cli.format {
                OutputFormat::Json => {
                    let artifacts: Vec<_> = index
                        .iter()
                        .map(|(key, artifact)| serde_json::json!({ "key": key, "artifact": artifact }))
                        .collect();
                    let output = serde_json::json!({
                        "success": true,
                        "staging": staging.path(),
                        "artifacts": artifacts,
                        "reports": reports,
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                OutputFormat::Text => {
                    if !cli.quiet {
                        output::artifacts(&index);
                        for report in &reports {
                            output::uploads(report);
                        }
                        println!();
                        output::success(&format!(
                            "Done. Artifacts are in {}",
                            output::path_style().apply_to(display_path(staging.path()))
                        ));
                    }
                }
            }

            if acknowledge && staging.is_temporary() {
                wait_for_enter()?;
            }
            drop(staging);
            Ok(code)
        }
        PipelineOutcome::Failed { stage, error } => {
            match cli.format {
                OutputFormat::Json => {
                    let output = serde_json::json!({
                        "success": false,
                        "stage": stage.to_string(),
                        "error": format!("{:#}", error),
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                OutputFormat::Text => {
                    output::error(&format!("{} failed: {:#}", stage, error));
                }
            }
            Ok(code)
        }
    }
}

fn wait_for_enter() -> anyhow::Result<()> {
    if !Term::stdout().is_term() {
        warn!("no terminal attached, removing staging directory without confirmation");
        output::warning("No terminal attached; removing the staging directory");
        return Ok(());
    }

    Input::<String>::new()
        .with_prompt("Press ENTER to remove the staging directory")
        .allow_empty(true)
        .interact_text()?;
    Ok(())
}
