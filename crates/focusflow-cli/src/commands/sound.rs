use clap::Subcommand;
use focusflow_core::storage::keys;
use focusflow_core::{AudioCapability, Config, Cue, Database, Phase};
use serde_json::json;

use super::host::print_json;

#[derive(Subcommand)]
pub enum SoundAction {
    /// Allow sound cues (the first user gesture)
    Prime,
    /// Show sound settings and whether audio is allowed
    Show,
    /// Play the cue for a phase
    Test {
        #[arg(default_value = "break")]
        phase: Phase,
    },
}

pub fn run(action: SoundAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load()?;
    let mut audio: AudioCapability = db.load_or_default(keys::AUDIO)?;

    match action {
        SoundAction::Prime => {
            if audio.prime() {
                db.save_record(keys::AUDIO, &audio)?;
                println!("audio primed");
            } else {
                println!("audio already primed");
            }
        }
        SoundAction::Show => {
            let settings = config.sound_settings();
            print_json(&json!({
                "volume": settings.volume(),
                "sound": settings.sound,
                "source": settings.source,
                "primed": audio.is_primed(),
                "primed_at": audio.primed_at(),
            }))?;
        }
        SoundAction::Test { phase } => {
            let cue = Cue::for_phase(phase, &config.sound_settings(), &audio);
            eprint!("{}", "\x07".repeat(cue.bells));
            print_json(&cue)?;
        }
    }
    Ok(())
}
