//! `conclave chat` — Interactive or single-message chat with the manager.

use std::io::Write;

use conclave_config::AppConfig;
use conclave_core::Memory;

use crate::fleet;

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    config.validate()?;

    // Check for the API key early, with a clear error.
    if config.api_key.is_none() && config.provider != "ollama" {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    CONCLAVE_API_KEY    (generic)");
        eprintln!("    OPENROUTER_API_KEY  (for OpenRouter)");
        eprintln!("    OPENAI_API_KEY      (for OpenAI direct)");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let model = conclave_providers::build_from_config(&config)
        .map_err(|e| format!("Failed to build model backend: {e}"))?;
    let fleet = fleet::build(&config, model);

    if let Some(msg) = message {
        // Single message mode
        eprint!("  Thinking...");
        let run = fleet.manager.run(&msg, None, &fleet.ctx).await?;
        eprint!("\r              \r");
        println!("{}", run.memory.last_assistant_content().unwrap_or_default());
        return Ok(());
    }

    // Interactive mode: one shared sliding-window memory across queries, so
    // follow-up questions see the earlier exchange.
    println!();
    println!("  Conclave — Interactive Mode");
    println!();
    println!("  Provider:  {}", config.provider);
    println!("  Model:     {}", config.model);
    println!(
        "  Agents:    {}",
        fleet
            .ctx
            .agent_registry()
            .map(|r| r.names().join(", "))
            .unwrap_or_default()
    );
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type '/audit' to dump the audit log, 'exit' to quit.");
    println!();

    let mut memory = Memory::bounded(config.runtime.max_history);
    let stdin = std::io::stdin();

    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "exit" || input == "quit" {
            break;
        }
        if input == "/audit" {
            for entry in fleet.ctx.audit().snapshot() {
                println!("{}", serde_json::to_string(&entry)?);
            }
            continue;
        }

        eprint!("  ...");
        match fleet.manager.run(input, Some(memory), &fleet.ctx).await {
            Ok(run) => {
                eprint!("\r     \r");
                println!();
                let answer = run.memory.last_assistant_content().unwrap_or_default().to_string();
                for answer_line in answer.lines() {
                    println!("  Manager > {answer_line}");
                }
                println!();
                memory = run.memory;
            }
            Err(e) => {
                eprint!("\r     \r");
                eprintln!("  [Error] {e}");
                println!();
                memory = Memory::bounded(config.runtime.max_history);
            }
        }
    }

    println!();
    println!("  Goodbye!");
    Ok(())
}
