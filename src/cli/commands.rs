use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use std::fs;
use std::path::Path;

use crate::ai::{AiRouter, PromptBuilder, RouteMode, ScaffoldPlan};
use crate::cli::{
    Cli, Commands, DevelopCommand, LearnCommand, OperationsCommand, OutputFormatter,
    PackageCommand, Spinner, SystemCommand,
};
use crate::config::Settings;
use crate::context::ContextManager;
use crate::utils::{run_shell_command, CommandValidator, PackageManager};

/// Owns the effective configuration, the project context and the AI router
/// for one invocation, and maps each parsed subcommand to its handler.
pub struct CommandHandler {
    settings: Settings,
    context: ContextManager,
    router: AiRouter,
    prompts: PromptBuilder,
    formatter: OutputFormatter,
    validator: CommandValidator,
}

impl CommandHandler {
    /// Loads config and context, folding the global flags into the
    /// effective configuration before any handler can run.
    pub fn new(cli: &Cli) -> Result<Self> {
        let mut settings = Settings::load()?;
        if cli.verbose {
            settings.system.verbose = true;
        }
        if let Some(model) = cli.ai_model {
            settings.ai.model = model;
        }

        let context = ContextManager::new()?;
        let router = AiRouter::new(&settings)?;

        Ok(Self {
            settings,
            context,
            router,
            prompts: PromptBuilder::new(),
            formatter: OutputFormatter::new(),
            validator: CommandValidator::new(),
        })
    }

    pub async fn dispatch(&mut self, command: Commands) -> Result<String> {
        match command {
            Commands::System(cmd) => self.handle_system(cmd).await,
            Commands::Develop(cmd) => self.handle_develop(cmd).await,
            Commands::Operations(cmd) => self.handle_operations(cmd).await,
            Commands::Package(cmd) => self.handle_package(cmd).await,
            Commands::Learn(cmd) => self.handle_learn(cmd).await,
            Commands::Explain { query } => self.explain(&query.join(" ")).await,
        }
    }

    pub fn format_error(&self, message: &str) -> String {
        self.formatter.format_error(message)
    }

    // ========================================================================
    // system
    // ========================================================================

    async fn handle_system(&mut self, command: SystemCommand) -> Result<String> {
        match command {
            SystemCommand::Run { command } => self.system_run(&command.join(" ")),
            SystemCommand::Explain { query } => self.system_explain(&query.join(" ")).await,
            SystemCommand::Fix { issue } => self.system_fix(&issue).await,
            SystemCommand::Config {
                set_model,
                set_mistral_key,
                set_codestral_key,
            } => self.system_config(set_model, set_mistral_key, set_codestral_key),
        }
    }

    fn system_run(&mut self, cmd: &str) -> Result<String> {
        if self.validator.is_destructive_command(cmd) {
            let accepted = self.formatter.confirm(
                &format!("'{cmd}' looks destructive. Run it anyway?"),
                !self.settings.system.confirm_dangerous,
            )?;
            if !accepted {
                return Err(anyhow!("declined, nothing was run"));
            }
        }

        println!("→ Running: {cmd}");
        let result = run_shell_command(cmd, false)?;
        if result.success() {
            Ok(String::new())
        } else {
            Ok(self
                .formatter
                .format_warning(&format!("Command exited with code {}", result.code)))
        }
    }

    async fn system_explain(&mut self, query: &str) -> Result<String> {
        let prompt = self.prompts.system_explain(query);
        let response = match self.route(&prompt, RouteMode::Reasoning).await {
            Ok(response) => response,
            Err(e) => return Ok(self.formatter.format_warning(&format!("AI error: {e:#}"))),
        };
        self.context.record_exchange(query, &response)?;
        Ok(response)
    }

    async fn system_fix(&mut self, issue: &str) -> Result<String> {
        let prompt = self.prompts.fix(issue);
        let suggested = match self.route(&prompt, RouteMode::Reasoning).await {
            Ok(response) => response,
            Err(e) => return Ok(self.formatter.format_warning(&format!("AI error: {e:#}"))),
        };

        if !self.validator.is_safe_command(&suggested) {
            return Ok(self.formatter.format_warning(&format!(
                "Suggested command failed the safety screen, not executing: {suggested}"
            )));
        }

        println!("💡 Suggested: {suggested}");
        let accepted = self
            .formatter
            .confirm("Execute?", !self.settings.system.confirm_dangerous)?;
        if !accepted {
            return Err(anyhow!("declined, nothing was executed"));
        }

        let result = run_shell_command(&suggested, false)?;
        self.context.record_exchange(issue, &suggested)?;
        if result.success() {
            Ok(self.formatter.format_success("Fix applied"))
        } else {
            Ok(self
                .formatter
                .format_warning(&format!("Fix exited with code {}", result.code)))
        }
    }

    fn system_config(
        &mut self,
        set_model: Option<crate::config::ModelChoice>,
        set_mistral_key: Option<String>,
        set_codestral_key: Option<String>,
    ) -> Result<String> {
        let mutating =
            set_model.is_some() || set_mistral_key.is_some() || set_codestral_key.is_some();

        if mutating {
            if let Some(model) = set_model {
                self.settings.ai.model = model;
            }
            if let Some(key) = set_mistral_key {
                self.settings.ai.mistral_api_key = key;
            }
            if let Some(key) = set_codestral_key {
                self.settings.ai.codestral_api_key = key;
            }
            // Only the user layer is ever written; project config stays
            // read-only to the tool.
            self.settings.save()?;
            info!("User configuration updated");
            return Ok(self.formatter.format_success("Configuration saved"));
        }

        let mask = |key: &str| if key.is_empty() { "unset" } else { "set" };
        Ok(format!(
            "termforge configuration:\n\
            - Model: {}\n\
            - Endpoint: {}\n\
            - Mistral API key: {}\n\
            - Codestral API key: {}\n\
            - Confirm dangerous operations: {}\n\
            - Verbose: {}\n\
            - User config: {}\n\
            - Project config: {}\n\
            - Context file: {}",
            self.settings.ai.model,
            self.settings.ai.endpoint,
            mask(&self.settings.ai.mistral_api_key),
            mask(&self.settings.ai.codestral_api_key),
            self.settings.system.confirm_dangerous,
            self.settings.system.verbose,
            Settings::user_config_path()?.display(),
            Settings::project_config_path().display(),
            self.context.context_file_path().display(),
        ))
    }

    // ========================================================================
    // develop
    // ========================================================================

    async fn handle_develop(&mut self, command: DevelopCommand) -> Result<String> {
        match command {
            DevelopCommand::Create { name, stack } => self.develop_create(&name, stack).await,
            DevelopCommand::Edit { file, instruction } => {
                self.develop_edit(&file, &instruction).await
            }
        }
    }

    async fn develop_create(&mut self, name: &str, stack: Option<String>) -> Result<String> {
        let stack: Vec<String> = stack
            .as_deref()
            .unwrap_or("python")
            .split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect();

        let prompt = self.prompts.scaffold(name, &stack);
        let response = match self.route(&prompt, RouteMode::Coding).await {
            Ok(response) => response,
            Err(e) => return Ok(self.formatter.format_warning(&format!("AI error: {e:#}"))),
        };

        let plan = match ScaffoldPlan::parse(&response) {
            Ok(plan) => plan,
            Err(e) => {
                // Show what the model actually said so the user can salvage it
                return Ok(format!(
                    "{}\n{response}",
                    self.formatter
                        .format_warning(&format!("Failed to parse AI response: {e:#}"))
                ));
            }
        };

        let mut lines = Vec::new();
        for file in &plan.files {
            let path = Path::new(&file.path);
            if path.exists() {
                let overwrite = self.formatter.confirm(
                    &format!("{} already exists. Overwrite?", file.path),
                    !self.settings.system.confirm_dangerous,
                )?;
                if !overwrite {
                    lines.push(self.formatter.format_info(&format!("Skipped {}", file.path)));
                    continue;
                }
            }
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(path, &file.content)
                .with_context(|| format!("Failed to write {}", file.path))?;
            self.context.add_file(&file.path)?;
            lines.push(self.formatter.format_success(&format!("Created {}", file.path)));
        }

        if !plan.instructions.is_empty() {
            lines.push("\n📘 Instructions:".to_string());
            for step in &plan.instructions {
                lines.push(format!("  → {step}"));
            }
        }

        self.context
            .set_goal(&format!("Project {name} with stack {}", stack.join(",")))?;
        debug!("Scaffold for {name} complete: {} files", plan.files.len());
        Ok(lines.join("\n"))
    }

    async fn develop_edit(&mut self, file: &Path, instruction: &str) -> Result<String> {
        if !file.exists() {
            return Err(anyhow!("File {} not found", file.display()));
        }

        let content = fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let prompt = self
            .prompts
            .edit(&file.display().to_string(), instruction, &content);

        let response = match self.route(&prompt, RouteMode::Coding).await {
            Ok(response) => response,
            Err(e) => return Ok(self.formatter.format_warning(&format!("AI error: {e:#}"))),
        };
        let new_content = crate::ai::strip_code_fences(&response);

        let accepted = self.formatter.confirm(
            &format!("Replace content of {}?", file.display()),
            !self.settings.system.confirm_dangerous,
        )?;
        if !accepted {
            return Err(anyhow!(
                "declined, {} left unchanged",
                file.display()
            ));
        }

        fs::write(file, new_content)
            .with_context(|| format!("Failed to write {}", file.display()))?;
        self.context.add_file(&file.display().to_string())?;
        Ok(self
            .formatter
            .format_success(&format!("Updated {}", file.display())))
    }

    // ========================================================================
    // operations
    // ========================================================================

    async fn handle_operations(&mut self, command: OperationsCommand) -> Result<String> {
        match command {
            OperationsCommand::Status => self.operations_status(),
            OperationsCommand::Diagnose { description } => {
                self.operations_diagnose(&description.join(" ")).await
            }
        }
    }

    fn operations_status(&self) -> Result<String> {
        let probes = [
            ("Uptime", "uptime"),
            ("Memory", "free -h"),
            ("Disk", "df -h /"),
        ];

        let mut report = vec!["System status:".to_string()];
        for (label, cmd) in probes {
            match run_shell_command(cmd, true) {
                Ok(result) if result.success() => {
                    report.push(format!("{label}:\n{}", result.stdout.trim_end()));
                }
                Ok(result) => {
                    warn!("{cmd} exited with code {}", result.code);
                    report.push(
                        self.formatter
                            .format_warning(&format!("{label}: unavailable ({cmd} failed)")),
                    );
                }
                Err(e) => {
                    report.push(
                        self.formatter
                            .format_warning(&format!("{label}: unavailable ({e:#})")),
                    );
                }
            }
        }
        Ok(report.join("\n\n"))
    }

    async fn operations_diagnose(&mut self, description: &str) -> Result<String> {
        let prompt = self.prompts.diagnose(description);
        let response = match self.route(&prompt, RouteMode::Reasoning).await {
            Ok(response) => response,
            Err(e) => return Ok(self.formatter.format_warning(&format!("AI error: {e:#}"))),
        };
        self.context.record_exchange(description, &response)?;
        Ok(response)
    }

    // ========================================================================
    // package
    // ========================================================================

    async fn handle_package(&mut self, command: PackageCommand) -> Result<String> {
        match command {
            PackageCommand::Search { name } => self.package_search(&name),
            PackageCommand::Install { name } => self.package_install(&name),
            PackageCommand::Suggest { task } => self.package_suggest(&task.join(" ")).await,
        }
    }

    fn detect_manager(&self) -> Result<PackageManager> {
        PackageManager::detect()
            .ok_or_else(|| anyhow!("No supported package manager found (pkg/apt/dnf/pacman/brew)"))
    }

    fn package_search(&self, name: &str) -> Result<String> {
        let manager = self.detect_manager()?;
        let cmd = manager.search_command(name);
        println!("→ Running: {cmd}");
        let result = run_shell_command(&cmd, false)?;
        if result.success() {
            Ok(String::new())
        } else {
            Ok(self
                .formatter
                .format_warning(&format!("Search exited with code {}", result.code)))
        }
    }

    fn package_install(&mut self, name: &str) -> Result<String> {
        let manager = self.detect_manager()?;
        let cmd = manager.install_command(name);

        let accepted = self.formatter.confirm(
            &format!("Install '{name}' via {}?", manager.binary()),
            !self.settings.system.confirm_dangerous,
        )?;
        if !accepted {
            return Err(anyhow!("declined, nothing was installed"));
        }

        println!("→ Running: {cmd}");
        let result = run_shell_command(&cmd, false)?;
        if result.success() {
            Ok(self
                .formatter
                .format_success(&format!("Installed {name}")))
        } else {
            Ok(self
                .formatter
                .format_warning(&format!("Install exited with code {}", result.code)))
        }
    }

    async fn package_suggest(&mut self, task: &str) -> Result<String> {
        let manager_name = PackageManager::detect()
            .map(|manager| manager.binary())
            .unwrap_or("your package manager");
        let prompt = self.prompts.suggest_packages(task, manager_name);
        let response = match self.route(&prompt, RouteMode::Reasoning).await {
            Ok(response) => response,
            Err(e) => return Ok(self.formatter.format_warning(&format!("AI error: {e:#}"))),
        };
        self.context.record_exchange(task, &response)?;
        Ok(response)
    }

    // ========================================================================
    // learn
    // ========================================================================

    async fn handle_learn(&mut self, command: LearnCommand) -> Result<String> {
        match command {
            LearnCommand::Explain { query } => self.explain(&query.join(" ")).await,
            LearnCommand::Tutorial { topic } => self.learn_tutorial(&topic.join(" ")).await,
        }
    }

    /// Shared by `learn explain` and the root `explain` alias.
    async fn explain(&mut self, query: &str) -> Result<String> {
        let prompt = self.prompts.explain(query);
        let response = match self.route(&prompt, RouteMode::Reasoning).await {
            Ok(response) => response,
            Err(e) => return Ok(self.formatter.format_warning(&format!("AI error: {e:#}"))),
        };
        self.context.record_exchange(query, &response)?;
        Ok(response)
    }

    async fn learn_tutorial(&mut self, topic: &str) -> Result<String> {
        let prompt = self.prompts.tutorial(topic);
        let response = match self.route(&prompt, RouteMode::Reasoning).await {
            Ok(response) => response,
            Err(e) => return Ok(self.formatter.format_warning(&format!("AI error: {e:#}"))),
        };
        self.context.record_exchange(topic, &response)?;
        Ok(response)
    }

    // ========================================================================
    // helpers
    // ========================================================================

    async fn route(&self, prompt: &str, mode: RouteMode) -> Result<String> {
        let spinner = Spinner::new("Thinking...");
        let result = self.router.route(prompt, mode).await;
        spinner.stop();
        result
    }
}
