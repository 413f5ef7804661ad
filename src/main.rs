use anyhow::{bail, Context};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use policyedit::cli::PolicyRenderer;
use policyedit::config::EditorConfig;
use policyedit::editor::{identifier_from_codebase, PolicyEditorController};
use policyedit::logging;
use policyedit::permissions::{KnownPermission, PermissionDescriptor, PrincipalEntry};
use policyedit::policy::PolicyIdentifier;

/// View and edit Java security policy files
#[derive(Parser)]
#[command(name = "policyedit", version)]
struct Cli {
    /// Policy file to edit
    #[arg(long, global = true, conflicts_with = "defaultfile")]
    file: Option<PathBuf>,

    /// Edit the per-user default policy file
    #[arg(long, global = true)]
    defaultfile: bool,

    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

/// Selects one grant scope; nothing selected means all code
#[derive(Args, Clone, Default)]
struct ScopeArgs {
    /// Codebase URL of the scope
    #[arg(long)]
    codebase: Option<String>,

    /// Signer of the scope
    #[arg(long = "signedby")]
    signed_by: Option<String>,

    /// Principal of the scope, may be repeated
    #[arg(long, num_args = 2, value_names = ["CLASS", "NAME"], action = ArgAction::Append)]
    principal: Vec<String>,
}

impl ScopeArgs {
    fn identifier(&self) -> PolicyIdentifier {
        let principals: Vec<PrincipalEntry> = self
            .principal
            .chunks(2)
            .filter(|pair| pair.len() == 2)
            .map(|pair| PrincipalEntry::new(pair[0].clone(), pair[1].clone()))
            .collect();
        if self.signed_by.is_none() && principals.is_empty() {
            return identifier_from_codebase(self.codebase.as_deref().unwrap_or(""));
        }
        PolicyIdentifier::scoped(self.signed_by.as_deref(), principals, self.codebase.as_deref())
    }
}

#[derive(Subcommand)]
enum Command {
    /// List every grant scope with what it grants
    List,
    /// Show one scope in full
    Show(ScopeArgs),
    /// Grant categories to a scope
    Grant {
        #[command(flatten)]
        scope: ScopeArgs,
        /// Category names, see `categories`
        #[arg(required = true)]
        permissions: Vec<KnownPermission>,
    },
    /// Revoke categories from a scope
    Revoke {
        #[command(flatten)]
        scope: ScopeArgs,
        #[arg(required = true)]
        permissions: Vec<KnownPermission>,
    },
    /// Add a permission outside the category catalog
    AddCustom {
        #[command(flatten)]
        scope: ScopeArgs,
        class: String,
        target: String,
        actions: Option<String>,
    },
    /// Remove a scope's custom permissions
    ClearCustom(ScopeArgs),
    /// Remove a scope entirely
    Remove(ScopeArgs),
    /// Copy a scope's entitlements to a codebase scope
    Copy {
        #[command(flatten)]
        scope: ScopeArgs,
        #[arg(long)]
        to_codebase: String,
    },
    /// List the known categories
    Categories,
}

fn load_config(cli: &Cli) -> anyhow::Result<EditorConfig> {
    let mut config = match &cli.config {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EditorConfig::default(),
    }
    .apply_env();

    config = match cli.verbose {
        0 => config,
        1 => config.with_log_level("info"),
        2 => config.with_log_level("debug"),
        _ => config.with_log_level("trace"),
    };
    if cli.json {
        config = config.with_json_output(true);
    }
    if let Some(file) = &cli.file {
        config = config.with_policy_file(file);
    } else if cli.defaultfile {
        config.policy_file = Some(EditorConfig::default_policy_file()?);
    }
    Ok(config)
}

/// Bind and load the policy file; a missing file starts empty
fn open(config: &EditorConfig) -> anyhow::Result<PolicyEditorController> {
    let path = config.resolve_policy_file()?;
    let mut controller = PolicyEditorController::new();
    controller.set_file(Some(path.clone()));
    match controller.open_and_parse() {
        Ok(()) => {}
        Err(e) if e.is_not_found() => {
            tracing::info!("{} does not exist yet, starting empty", path.display());
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
    Ok(controller)
}

fn save(controller: &mut PolicyEditorController, renderer: &PolicyRenderer) -> anyhow::Result<()> {
    let path = match controller.file() {
        Some(path) => path.to_path_buf(),
        None => bail!("No policy file selected"),
    };
    if controller.file_has_changed() {
        let overwrite = renderer
            .console()
            .confirm("The policy file changed on disk since it was read. Overwrite?")?;
        if !overwrite {
            bail!("Not saving; {} was modified externally", path.display());
        }
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    controller
        .save()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    renderer.render_saved(&format!("Saved {}", path.display()))?;
    Ok(())
}

fn set_permissions(
    controller: &mut PolicyEditorController,
    scope: &ScopeArgs,
    permissions: &[KnownPermission],
    granted: bool,
) -> anyhow::Result<()> {
    let identifier = scope.identifier();
    controller.add_identifier(identifier.clone())?;
    for permission in permissions {
        controller.set_permission(&identifier, *permission, granted);
    }
    tracing::info!(
        "{} {} categories for {}",
        if granted { "Granted" } else { "Revoked" },
        permissions.len(),
        identifier
    );
    Ok(())
}

fn run(cli: Cli, config: EditorConfig, renderer: &PolicyRenderer) -> anyhow::Result<()> {
    if let Command::Categories = cli.command {
        renderer.render_categories()?;
        return Ok(());
    }

    let mut controller = open(&config)?;

    match cli.command {
        Command::Categories => {}
        Command::List => renderer.render_identifiers(&controller)?,
        Command::Show(scope) => {
            let identifier = scope.identifier();
            if !controller.identifiers().contains(&identifier) {
                tracing::warn!("{} has no grant clause, showing defaults", identifier);
            }
            renderer.render_scope(&controller, &identifier)?;
        }
        Command::Grant { scope, permissions } => {
            set_permissions(&mut controller, &scope, &permissions, true)?;
            save(&mut controller, renderer)?;
        }
        Command::Revoke { scope, permissions } => {
            set_permissions(&mut controller, &scope, &permissions, false)?;
            save(&mut controller, renderer)?;
        }
        Command::AddCustom {
            scope,
            class,
            target,
            actions,
        } => {
            let identifier = scope.identifier();
            controller.add_identifier(identifier.clone())?;
            let descriptor = PermissionDescriptor::with_actions(class, target, actions.unwrap_or_default());
            controller.add_custom_permission(&identifier, descriptor);
            save(&mut controller, renderer)?;
        }
        Command::ClearCustom(scope) => {
            controller.clear_custom_identifier(&scope.identifier());
            save(&mut controller, renderer)?;
        }
        Command::Remove(scope) => {
            let identifier = scope.identifier();
            if !controller.remove_identifier(&identifier) {
                bail!("No grant clause for {}", identifier);
            }
            save(&mut controller, renderer)?;
        }
        Command::Copy { scope, to_codebase } => {
            let source = scope.identifier();
            controller.copy_to_clipboard(&source);
            controller.paste_from_clipboard(identifier_from_codebase(&to_codebase))?;
            save(&mut controller, renderer)?;
        }
    }
    Ok(())
}

/// Exit code for a command result, reporting any error
fn exit_code(result: anyhow::Result<()>, renderer: &PolicyRenderer) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            renderer.render_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let _guard = logging::init_logging(&config)?;

    tracing::debug!("Using policy file {:?}", config.policy_file);

    let renderer = PolicyRenderer::new(config.json_output);
    let code = exit_code(run(cli, config, &renderer), &renderer);
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_command_exits_with_failure() {
        let renderer = PolicyRenderer::new(true);
        assert_eq!(exit_code(Ok(()), &renderer), ExitCode::SUCCESS);
        assert_eq!(
            exit_code(Err(anyhow::anyhow!("No grant clause for All code")), &renderer),
            ExitCode::FAILURE
        );
    }
}
