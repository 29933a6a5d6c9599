use logsentinel_core::analysis::assemble_prompt;
use logsentinel_core::config::Settings;
use logsentinel_core::context::{read_log_file, FileSet};
use logsentinel_core::*;
use tempfile::TempDir;

// ========================================================================
// Settings Tests (config/mod.rs)
// ========================================================================

#[test]
fn test_settings_default_values() {
    let settings = Settings::default();

    assert_eq!(settings.llm.model, "gemini-3-pro-preview");
    assert_eq!(settings.llm.api_key_env, "API_KEY");
    assert!(settings.llm.base_url.is_none());
    assert!((settings.llm.temperature - 0.2).abs() < f32::EPSILON);
    assert_eq!(settings.llm.thinking_budget, 4096);
    assert!(settings.llm.history_limit.is_none());

    assert_eq!(settings.ui.theme, "dark");
    assert!(settings.ui.show_timestamps);
}

#[test]
fn test_settings_save_and_reload_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let mut settings = Settings::default();
    settings.llm.model = "gemini-test".to_string();
    settings.llm.thinking_budget = 0;
    settings.llm.history_limit = Some(6);
    settings.ui.theme = "dracula".to_string();
    settings.save_to(&config_path).unwrap();

    let loaded = Settings::load_from(&config_path);
    assert_eq!(loaded.llm.model, "gemini-test");
    assert_eq!(loaded.llm.thinking_budget, 0);
    assert_eq!(loaded.llm.history_limit, Some(6));
    assert_eq!(loaded.ui.theme, "dracula");
}

#[test]
fn test_settings_missing_file_gives_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let loaded = Settings::load_from(&temp_dir.path().join("absent.toml"));
    assert_eq!(loaded.llm.model, Settings::default().llm.model);
}

#[test]
fn test_settings_invalid_file_gives_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "this is = = not toml").unwrap();
    let loaded = Settings::load_from(&path);
    assert_eq!(loaded.llm.api_key_env, "API_KEY");
}

#[test]
fn test_settings_ui_section_is_optional() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[llm]
model = "gemini-2.5-pro"
api_key_env = "GEMINI_KEY"
temperature = 0.5
thinking_budget = 1024
"#,
    )
    .unwrap();
    let loaded = Settings::load_from(&path);
    assert_eq!(loaded.llm.model, "gemini-2.5-pro");
    assert_eq!(loaded.llm.api_key_env, "GEMINI_KEY");
    assert_eq!(loaded.ui.theme, "dark");
}

#[test]
fn test_missing_api_key_is_config_error() {
    let mut settings = Settings::default();
    settings.llm.api_key_env = "LOGSENTINEL_TEST_KEY_THAT_IS_NEVER_SET".to_string();
    match settings.build_llm_client() {
        Err(SentinelError::Config(msg)) => {
            assert!(msg.contains("LOGSENTINEL_TEST_KEY_THAT_IS_NEVER_SET"))
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("client built without a key"),
    }
}

#[test]
fn test_system_instruction_carries_extra_instructions() {
    let mut settings = Settings::default();
    settings.llm.extra_instructions = Some("Nodes run on ARM.".to_string());
    let instruction = settings.system_instruction();
    assert!(instruction.contains("DIAGNOSIS"));
    assert!(instruction.contains("Nodes run on ARM."));
}

// ========================================================================
// File Tests (context/files.rs)
// ========================================================================

#[tokio::test]
async fn test_read_log_file_uses_file_name() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("node.yaml");
    std::fs::write(&path, "replicas: 3\n").unwrap();

    let file = read_log_file(&path).await.unwrap();
    assert_eq!(file.name(), "node.yaml");
    assert_eq!(file.kind(), FileKind::Config);
    assert_eq!(file.content(), "replicas: 3\n");
}

#[tokio::test]
async fn test_read_log_file_missing_path_is_file_read_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("gone.log");
    let err = read_log_file(&path).await.unwrap_err();
    assert!(matches!(err, SentinelError::FileRead { .. }));
    assert!(err.to_string().contains("gone.log"));
}

#[test]
fn test_file_set_keeps_upload_order_and_duplicates() {
    let mut files = FileSet::new();
    files.add(LogFile::new("b.log", "2"));
    files.add(LogFile::new("a.log", "1"));
    files.add(LogFile::new("b.log", "3"));
    let names: Vec<_> = files.iter().map(|f| f.name().to_string()).collect();
    assert_eq!(names, vec!["b.log", "a.log", "b.log"]);

    let removed = files.remove(0).unwrap();
    assert_eq!(removed.content(), "2");
    assert_eq!(files.len(), 2);
    assert!(matches!(
        files.remove(5),
        Err(SentinelError::FileIndex { index: 5, len: 2 })
    ));
}

// ========================================================================
// Prompt Tests (analysis/prompt.rs)
// ========================================================================

#[test]
fn test_prompt_for_null_pointer_log() {
    let files = vec![LogFile::new(
        "app.log",
        "ERROR NullPointerException at Foo.java:42",
    )];
    let prompt = assemble_prompt("Why is the node crashing?", &files, &RepoContext::default());

    assert_eq!(
        prompt,
        "Why is the node crashing?\n\n--- ATTACHED FILES ---\n\nFile: app.log (log)\n```\nERROR NullPointerException at Foo.java:42\n```\n"
    );
}

#[test]
fn test_prompt_files_appear_in_order_once_each() {
    let files = vec![
        LogFile::new("first.log", "one"),
        LogFile::new("settings.json", "{}"),
        LogFile::new("third.log", "three"),
    ];
    let prompt = assemble_prompt("check", &files, &RepoContext::default());

    assert_eq!(prompt.matches("\nFile: ").count(), 3);
    let first = prompt.find("File: first.log (log)").unwrap();
    let second = prompt.find("File: settings.json (config)").unwrap();
    let third = prompt.find("File: third.log (log)").unwrap();
    assert!(first < second && second < third);
}

#[test]
fn test_prompt_truncates_each_file_to_cap() {
    let big = "x".repeat(25_000);
    let files = vec![LogFile::new("big.log", big)];
    let prompt = assemble_prompt("", &files, &RepoContext::default());
    assert_eq!(prompt.matches('x').count(), 20_000);
}

#[test]
fn test_prompt_cap_boundary_counts_chars() {
    let exact = "é".repeat(20_000);
    let files = vec![LogFile::new("exact.log", exact.clone())];
    let prompt = assemble_prompt("", &files, &RepoContext::default());
    assert!(prompt.contains(&format!("```\n{exact}\n```")));

    let over = format!("{exact}z");
    let files = vec![LogFile::new("over.log", over)];
    let prompt = assemble_prompt("", &files, &RepoContext::default());
    assert!(prompt.contains(&format!("```\n{exact}\n```")));
    assert!(!prompt.contains('z'));
}

#[test]
fn test_prompt_without_access_never_mentions_repo() {
    let repo = RepoContext {
        repo_url: "https://git.example.com/node".into(),
        branch: "release".into(),
        build_version: "v9.9.9".into(),
        has_access: false,
        custom_snippet: Some("fn main() {}".into()),
    };
    let prompt = assemble_prompt("status?", &[], &repo);
    assert_eq!(prompt, "status?");
    assert!(!prompt.contains("REPO CONTEXT"));
    assert!(!prompt.contains("git.example.com"));
    assert!(!prompt.contains("v9.9.9"));
}

#[test]
fn test_prompt_with_access_includes_repo_block() {
    let repo = RepoContext::default()
        .with_field(RepoField::Url, "https://git.example.com/node")
        .with_field(RepoField::Build, "v1.2.3")
        .with_access(true);
    let prompt = assemble_prompt("why?", &[], &repo);
    assert_eq!(
        prompt,
        "why?\n\n--- REPO CONTEXT ---\nRepo URL: https://git.example.com/node\nBuild Version: v1.2.3\nBranch: main\n"
    );
}

// ========================================================================
// Conversation Tests (conversation/state.rs)
// ========================================================================

#[test]
fn test_conversation_starts_with_welcome() {
    let conversation = Conversation::new();
    assert_eq!(conversation.len(), 1);
    let welcome = &conversation.messages()[0];
    assert_eq!(welcome.id.as_str(), "welcome");
    assert_eq!(welcome.role, ChatRole::Model);
    assert_eq!(conversation.request_state(), RequestState::Idle);
}

#[test]
fn test_blank_submission_without_files_is_rejected() {
    let mut conversation = Conversation::new();
    assert!(!conversation.can_submit("   \n", false));
    assert!(matches!(
        conversation.begin_turn("   ", false),
        Err(SentinelError::EmptySubmission)
    ));
    assert_eq!(conversation.len(), 1);
    assert!(!conversation.is_in_flight());
}

#[test]
fn test_blank_submission_with_files_is_accepted() {
    let mut conversation = Conversation::new();
    let turn = conversation.begin_turn("", true).unwrap();
    assert_eq!(turn.input, "");
    assert_eq!(turn.history.len(), 1);
    assert!(conversation.is_in_flight());
}

#[test]
fn test_second_submission_while_in_flight_is_rejected() {
    let mut conversation = Conversation::new();
    conversation.begin_turn("first", false).unwrap();
    assert!(matches!(
        conversation.begin_turn("second", false),
        Err(SentinelError::RequestInFlight)
    ));
    assert_eq!(conversation.len(), 2);

    conversation.complete_turn("answer");
    assert_eq!(conversation.len(), 3);
    assert!(!conversation.is_in_flight());
}

#[test]
fn test_message_ids_are_unique() {
    let mut conversation = Conversation::new();
    for i in 0..5 {
        conversation.begin_turn(format!("q{i}"), false).unwrap();
        conversation.complete_turn("a");
    }
    conversation.push_notice("note");
    let mut ids: Vec<_> = conversation
        .messages()
        .iter()
        .map(|m| m.id.as_str().to_string())
        .collect();
    let total = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), total);
}
