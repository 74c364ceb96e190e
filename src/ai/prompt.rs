/// Prompt templates for every AI-backed command.
pub struct PromptBuilder;

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn scaffold(&self, name: &str, stack: &[String]) -> String {
        format!(
            r#"Generate a complete project structure for '{name}' using {stack}.
Output as a JSON object with keys: "files" (list of {{"path", "content"}} objects) and "instructions" (list of setup steps).
All paths must be relative to the project root. No markdown, no explanation."#,
            stack = stack.join(", ")
        )
    }

    pub fn edit(&self, file: &str, instruction: &str, content: &str) -> String {
        format!(
            r#"Edit this file according to instruction: "{instruction}"

FILE: {file}
CONTENT:
{content}

Output ONLY the new file content. No explanations."#
        )
    }

    pub fn explain(&self, query: &str) -> String {
        format!("Explain this in simple terms for a developer: {query}")
    }

    pub fn system_explain(&self, query: &str) -> String {
        format!(
            "You are a Linux system expert. Explain this command or concept to a developer: {query}"
        )
    }

    pub fn fix(&self, issue: &str) -> String {
        format!(
            r#"You are an AI system administrator. Suggest a SAFE Linux/Termux shell command to fix this issue: "{issue}".
Output ONLY the command, no explanation. If unsure, output "echo 'No safe fix found'"."#
        )
    }

    pub fn diagnose(&self, description: &str) -> String {
        format!(
            r#"You are a Linux operations engineer. Diagnose the following problem and list the most likely causes and the commands to verify each one: {description}"#
        )
    }

    pub fn suggest_packages(&self, task: &str, manager: &str) -> String {
        format!(
            "Recommend packages installable with '{manager}' for this task, one per line with a short reason: {task}"
        )
    }

    pub fn tutorial(&self, topic: &str) -> String {
        format!(
            "Write a short hands-on tutorial for a developer learning: {topic}. Use numbered steps with runnable shell commands where relevant."
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaffold_prompt_names_project_and_stack() {
        let prompt = PromptBuilder::new().scaffold("blog", &["rust".into(), "sqlite".into()]);
        assert!(prompt.contains("'blog'"));
        assert!(prompt.contains("rust, sqlite"));
        assert!(prompt.contains("\"files\""));
    }

    #[test]
    fn edit_prompt_embeds_file_content() {
        let prompt = PromptBuilder::new().edit("a.py", "add logging", "print('x')");
        assert!(prompt.contains("add logging"));
        assert!(prompt.contains("print('x')"));
    }
}
