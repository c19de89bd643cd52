//! `conclave tools` — List the built-in tools and their tags.

use conclave_tools::public_registry;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let registry = public_registry();

    println!();
    println!("  Built-in tools ({}):", registry.len());
    println!();
    for action in registry.get_actions(None) {
        let tags = if action.tags.is_empty() {
            "-".to_string()
        } else {
            action.tags.join(", ")
        };
        println!("  {:<16} [{tags}]", action.name);
        println!("      {}", action.description);
    }
    println!();

    Ok(())
}
