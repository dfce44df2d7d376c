use clap::Subcommand;
use focustimer_core::{compute_break, format_clock};

#[derive(Subcommand)]
pub enum BreakAction {
    /// Print the break earned by a focus interval
    Compute {
        /// Seconds spent focusing, overtime included
        worked_secs: u64,
        /// Print seconds only
        #[arg(long)]
        raw: bool,
    },
}

pub fn run(action: BreakAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        BreakAction::Compute { worked_secs, raw } => {
            let secs = compute_break(worked_secs);
            if raw {
                println!("{secs}");
            } else {
                println!("{} ({secs}s)", format_clock(secs));
            }
        }
    }
    Ok(())
}
