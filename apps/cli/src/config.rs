use std::fs;
use std::path::Path;

use llmsh_app::{AppError, write_default_config};

pub fn init(config_file: &Path) {
    match write_default_config(config_file) {
        Ok(()) => print_next_steps(config_file),
        Err(AppError::Config(msg)) if config_file.exists() => {
            eprintln!("{}", msg);
            eprintln!("Remove it first if you want to reinitialize.");
        }
        Err(err) => eprintln!("Error creating config file: {}", err),
    }
}

pub fn show(config_file: &Path) {
    match fs::read_to_string(config_file) {
        Ok(contents) => {
            eprintln!("Current Configuration ({}):", config_file.display());
            eprintln!("=====================\n");
            eprint!("{}", contents);
        }
        Err(err) => eprintln!("Error reading config file {}: {}", config_file.display(), err),
    }
}

fn print_next_steps(config_file: &Path) {
    let path = config_file.display();
    eprintln!("Configuration file created at: {}\n", path);
    eprintln!("Next steps:");
    eprintln!("1. Set your OpenAI API key:");
    eprintln!("   export OPENAI_API_KEY=\"your-api-key\"");
    eprintln!("   Or edit {} and replace ${{OPENAI_API_KEY}}\n", path);
    eprintln!("2. Alternatively, configure a local LLM provider (like Ollama)");
    eprintln!("   by setting default_provider = \"local\" in the config\n");
    eprintln!("3. Load the zsh plugin by adding to your ~/.zshrc:");
    eprintln!("   source /path/to/llmsh/zsh/llmsh.plugin.zsh");
}
