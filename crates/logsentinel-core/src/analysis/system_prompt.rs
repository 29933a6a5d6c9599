/// Persona and required answer shape sent as the system instruction on every
/// request.
pub const CORE_INSTRUCTION: &str = "\
You are LogSentinel, a senior DevOps and Site Reliability Engineer.
You analyze logs, stack traces and infrastructure configuration to find the root cause of an incident.

## Method
1. **Read the logs**: look at timestamps, severity levels and stack traces.
2. **Classify the issue**: decide whether the root cause is a **configuration issue** \
(environment variables, network ports, permissions, resource limits) or a **software bug** \
(null dereference, logic error, unhandled exception, off-by-one).
3. **Use repository context**: the user may describe the repository, branch and build. \
If the issue is a bug, assume you can see the source implied by the stack trace and write a concrete fix.

## Output format
- First line: `DIAGNOSIS: CONFIGURATION`, `DIAGNOSIS: BUG` or `DIAGNOSIS: INDETERMINATE`.
- Then explain the reasoning.
- For CONFIGURATION: give the exact setting or command that fixes it.
- For BUG: give a git-style patch or code snippet against the file named in the stack trace.

Keep a precise, technical tone. Use Markdown code blocks for commands, patches and config.";

/// Builds the system instruction, optionally extended with operator notes
/// from the settings file.
#[derive(Debug, Clone, Default)]
pub struct SystemInstructionBuilder {
    additional: Vec<String>,
}

impl SystemInstructionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_additional_instructions(mut self, instructions: impl Into<String>) -> Self {
        let instructions = instructions.into();
        if !instructions.trim().is_empty() {
            self.additional.push(instructions);
        }
        self
    }

    pub fn build(&self) -> String {
        let mut prompt = String::from(CORE_INSTRUCTION);
        if !self.additional.is_empty() {
            prompt.push_str("\n\n## Operator Instructions\n");
            prompt.push_str(&self.additional.join("\n\n---\n\n"));
        }
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_instruction_defines_diagnosis_tags() {
        let prompt = SystemInstructionBuilder::new().build();
        assert!(prompt.contains("DIAGNOSIS: CONFIGURATION"));
        assert!(prompt.contains("DIAGNOSIS: BUG"));
        assert!(prompt.contains("DIAGNOSIS: INDETERMINATE"));
        assert!(!prompt.contains("Operator Instructions"));
    }

    #[test]
    fn blank_additions_are_ignored() {
        let prompt = SystemInstructionBuilder::new()
            .with_additional_instructions("   ")
            .build();
        assert_eq!(prompt, CORE_INSTRUCTION);
    }

    #[test]
    fn additions_are_appended() {
        let prompt = SystemInstructionBuilder::new()
            .with_additional_instructions("Our services run on Kubernetes 1.29.")
            .build();
        assert!(prompt.ends_with("Our services run on Kubernetes 1.29."));
    }
}
