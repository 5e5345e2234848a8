use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use runway_core::ids::SessionId;
use runway_store::{Database, SessionRepo};
use runway_telemetry::{init_telemetry, MonitoringSink, NullSink, TelemetryConfig};
use runway_wizard::{stages, Wizard};

#[derive(Parser)]
#[command(name = "runway", about = "Fashion-event creation wizard")]
struct Cli {
    /// Resume an existing wizard session by id.
    #[arg(long)]
    resume: Option<String>,

    /// Print the funnel summary and exit.
    #[arg(long)]
    funnel: bool,

    /// Override the database directory.
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let data_dir = cli.data_dir.unwrap_or_else(|| dirs_home().join(".runway").join("database"));
    let telemetry = init_telemetry(TelemetryConfig {
        funnel_db_path: data_dir.join("funnel.db"),
        ..TelemetryConfig::default()
    });

    if cli.funnel {
        match telemetry.funnel() {
            Some(funnel) => {
                let summary = funnel.summary();
                println!("{}", serde_json::to_string_pretty(&summary).expect("serialize summary"));
            }
            None => eprintln!("funnel recording is disabled"),
        }
        return;
    }

    let db = Database::open(&data_dir.join("runway.db")).expect("Failed to open database");
    tracing::info!(path = %data_dir.display(), "runway wizard starting");

    let sink: Arc<dyn MonitoringSink> = match telemetry.funnel() {
        Some(funnel) => funnel,
        None => Arc::new(NullSink),
    };
    let registry = Arc::new(stages::default_registry());

    let mut wizard = match &cli.resume {
        Some(raw) => Wizard::resume(
            registry,
            sink,
            SessionRepo::new(db),
            &SessionId::from_raw(raw.clone()),
        )
        .expect("Failed to resume session"),
        None => Wizard::start(registry, sink, Some(SessionRepo::new(db)))
            .expect("Failed to start session"),
    };

    println!("session {}", wizard.session().session_id);
    run_loop(&mut wizard);
}

/// Read `{"action": "...", "payload": {...}}` lines from stdin and dispatch
/// them — the seat the conversational agent occupies in production.
fn run_loop(wizard: &mut Wizard) {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    loop {
        match wizard.current_prompt() {
            Some(prompt) => {
                println!("\n[{}] {}", prompt.stage, prompt.instructions);
                println!("enabled action: {}", prompt.action.name);
            }
            None => {
                println!("\nwizard finished at stage {}", wizard.stage());
                return;
            }
        }
        print!("> ");
        stdout.flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
            return; // EOF: abandonment is recorded by the monitor on drop
        }
        let line = line.trim();
        match line {
            "" => continue,
            "quit" => return,
            "reset" => {
                match wizard.reset() {
                    Ok(()) => println!("session reset: {}", wizard.session().session_id),
                    Err(e) => eprintln!("reset failed: {e}"),
                }
                continue;
            }
            _ => {}
        }

        let parsed: serde_json::Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                eprintln!("not valid JSON: {e}");
                continue;
            }
        };
        let Some(action) = parsed["action"].as_str() else {
            eprintln!(r#"expected {{"action": "...", "payload": {{...}}}}"#);
            continue;
        };
        let payload = parsed.get("payload").cloned().unwrap_or(serde_json::json!({}));

        match wizard.handle_action(action, payload) {
            Ok(ack) => println!("{}", ack.message),
            // Validation and state errors resolve locally: same stage, new prompt.
            Err(e) => eprintln!("{e}"),
        }
    }
}

fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}
