//! `conclave agents` — List the agents in the default fleet.

use crate::fleet::SPECIALISTS;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!();
    println!("  manager");
    println!("      Delegates to the specialists below via 'call_agent'.");
    for blueprint in SPECIALISTS {
        let tools = if blueprint.tags.is_empty() {
            "all public tools".to_string()
        } else {
            blueprint.tags.join(", ")
        };
        println!();
        println!("  {}", blueprint.name);
        println!("      Tools: {tools}");
        if let Some(goal) = blueprint.goals.first() {
            println!("      {goal}");
        }
    }
    println!();

    Ok(())
}
