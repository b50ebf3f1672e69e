use std::env;
use std::fs;
use std::io::Cursor;
use std::sync::{Arc, Mutex, OnceLock};

use designbot_agent::DialogueSession;
use designbot_cli::commands::{catalog, chat, config, replay};
use designbot_core::catalog::Catalog;
use designbot_core::config::DialogueConfig;
use serde_json::Value;
use tempfile::TempDir;

#[test]
fn catalog_prints_the_builtin_price_table() {
    with_env(&[], || {
        let result = catalog::run(None);
        assert_eq!(result.exit_code, 0, "expected catalog to load");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "catalog");
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["message"], "catalog loaded from built-in");
        assert_eq!(payload["data"]["furniture"]["SILLA"]["base_price"], "150.00");
        assert_eq!(payload["data"]["dimensions"]["GRANDE"]["factor"], "1.3");
    });
}

#[test]
fn catalog_fails_with_config_class_for_missing_explicit_file() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");
        let result = catalog::run(Some(dir.path().join("missing.toml")));
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn replay_reports_every_turn_and_the_confirmed_order() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");
        let transcript = dir.path().join("pedido.txt");
        fs::write(
            &transcript,
            "# pedido de prueba\nhola\nquiero una silla\nmdf\nblanco\n\ngrande\nno\nsí\nana@example.com\n",
        )
        .expect("write transcript");

        let result = replay::run(&transcript, None);
        assert_eq!(result.exit_code, 0, "expected replay to succeed");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "replay");
        assert_eq!(payload["message"], "replayed 8 messages");

        let turns = payload["data"]["turns"].as_array().expect("turns array");
        assert_eq!(turns.len(), 8);
        assert_eq!(turns[1]["state"], "awaiting_material");
        assert_eq!(turns[4]["state"], "adding_more");
        assert_eq!(turns[7]["state"], "start");

        let completed = payload["data"]["completed_orders"].as_array().expect("completed array");
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0]["total"], "299.00");
        assert_eq!(completed[0]["email"], "ana@example.com");
        assert_eq!(payload["data"]["order"]["total"], "299.00");
    });
}

#[test]
fn replay_of_missing_transcript_is_an_error_payload() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");
        let result = replay::run(&dir.path().join("nada.txt"), None);
        assert_eq!(result.exit_code, 1);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "transcript_unreadable");
        assert!(payload["message"].as_str().unwrap_or_default().contains("nada.txt"));
    });
}

#[test]
fn chat_loop_handles_local_commands_and_messages() {
    let mut session =
        DialogueSession::new(Arc::new(Catalog::standard()), DialogueConfig::default());
    let input = Cursor::new("hola\n:pedido\nquiero 2 sillas y 1 mesa\n:exportar\n:salir\nadiós\n");
    let mut output = Vec::new();

    let stats = chat::run_with_io(&mut session, input, &mut output).expect("chat loop");
    let transcript = String::from_utf8(output).expect("utf-8 output");

    assert_eq!(stats.turns, 2, "local commands and lines after :salir are not turns");
    assert_eq!(stats.completed_orders, 0);
    assert!(transcript.starts_with("DesignBot: tu asistente para muebles personalizados."));
    assert!(transcript.contains("designbot> ¡Hola! 👋 Soy DesignBot"));
    assert!(transcript.contains("🛒 **Tu pedido está vacío**"));
    assert!(transcript.contains("\"furniture_type\": \"SILLA\""));
    assert!(!transcript.contains("¡Ha sido un gusto ayudarte"));
}

#[test]
fn chat_new_session_command_clears_the_cart() {
    let mut session =
        DialogueSession::new(Arc::new(Catalog::standard()), DialogueConfig::default());
    let input = Cursor::new("quiero una mesa de vidrio\n:nuevo\n");

    chat::run_with_io(&mut session, input, Vec::new()).expect("chat loop");

    assert!(session.order().items().is_empty());
}

#[test]
fn config_reports_env_attribution() {
    with_env(&[("DESIGNBOT_DEFAULT_COLOR", "gris"), ("DESIGNBOT_LOG_LEVEL", "debug")], || {
        let output = config::run(None);

        assert!(output.contains(
            "- dialogue.default_color = GRIS (source: env (DESIGNBOT_DEFAULT_COLOR))"
        ));
        assert!(output.contains("- logging.level = debug (source: env (DESIGNBOT_LOG_LEVEL))"));
        assert!(output.contains("- catalog.path = <built-in> (source: default)"));
    });
}

#[test]
fn config_reports_file_attribution() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("designbot.toml");
        fs::write(&path, "[dialogue]\ndefault_material = \"metal\"\n").expect("write config");

        let output = config::run(Some(path.clone()));

        assert!(output.contains(&format!(
            "- dialogue.default_material = METAL (source: file ({}))",
            path.display()
        )));
        assert!(output.contains("- dialogue.default_dimension = ESTÁNDAR (source: default)"));
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be a JSON payload")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "DESIGNBOT_CATALOG_PATH",
        "DESIGNBOT_DEFAULT_MATERIAL",
        "DESIGNBOT_DEFAULT_COLOR",
        "DESIGNBOT_DEFAULT_DIMENSION",
        "DESIGNBOT_LOGGING_LEVEL",
        "DESIGNBOT_LOGGING_FORMAT",
        "DESIGNBOT_LOG_LEVEL",
        "DESIGNBOT_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
