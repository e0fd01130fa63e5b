use clap::Subcommand;
use colored::Colorize;
use helden_lib::{Session, session::entities::ProfileId};

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List profiles
    List,
    /// Add a new profile
    Add {
        #[arg(required = true)]
        name: Vec<String>,
    },
    /// Make another profile the active one
    Switch { id: u64 },
}

pub fn handle(session: &mut Session, cmd: &Command) {
    match cmd {
        Command::List => {
            if session.registry().is_empty() {
                println!("No profiles yet");
            }
            for profile in session.registry().profiles() {
                let marker = if Some(profile) == session.active_profile() {
                    "*"
                } else {
                    " "
                };
                println!("{marker} {:>3}  {}", profile.id(), profile.name());
            }
        }
        Command::Add { name } => match session.add_profile(&name.join(" ")) {
            Ok(profile) => println!("Added profile {}: {}", profile.id(), profile.name()),
            Err(err) => eprintln!("{} {err}", "error:".red().bold()),
        },
        Command::Switch { id } => {
            if let Err(err) = session.switch_active(ProfileId::from(*id)) {
                eprintln!("{} {err}", "error:".red().bold());
            }
        }
    }
}
