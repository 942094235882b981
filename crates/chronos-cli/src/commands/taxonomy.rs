use clap::Subcommand;
use chronos_core::Config;

#[derive(Subcommand)]
pub enum TaxonomyAction {
    /// List configured modes and actions
    List,
}

pub fn run(action: TaxonomyAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TaxonomyAction::List => {
            let config = Config::load()?;
            let taxonomy = config.taxonomy()?;
            println!("modes:");
            for (_, mode) in taxonomy.modes() {
                println!("  {:<14} {}", mode.key, mode.label);
            }
            println!("actions:");
            for (_, action) in taxonomy.actions() {
                println!("  {:<14} {}", action.key, action.label);
            }
        }
    }
    Ok(())
}
