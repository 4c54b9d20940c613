use clap::Subcommand;
use focusflow_core::storage::keys;
use focusflow_core::{Database, Playlist};
use serde_json::json;

use super::host::print_json;

#[derive(Subcommand)]
pub enum PlaylistAction {
    /// Add a video by id or link
    Add {
        /// 11-character video id, youtu.be link or youtube.com/watch link
        video: String,
    },
    /// Show the playlist
    List,
    /// Remove a video by id or link
    Remove { video: String },
    /// Advance to the next video
    Next,
    /// Go back to the previous video
    Prev,
    /// Show the current video
    Current,
}

pub fn run(action: PlaylistAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut playlist: Playlist = db.load_or_default(keys::PLAYLIST)?;

    match action {
        PlaylistAction::Add { video } => {
            let id = playlist.add(&video)?;
            println!("{id}");
        }
        PlaylistAction::List => {
            print_json(&json!({
                "ids": playlist.ids(),
                "current": playlist.current_index(),
            }))?;
            return Ok(());
        }
        PlaylistAction::Remove { video } => {
            let id = playlist.remove(&video)?;
            println!("removed {id}");
        }
        PlaylistAction::Next => print_current(playlist.next()),
        PlaylistAction::Prev => print_current(playlist.previous()),
        PlaylistAction::Current => {
            print_current(playlist.current());
            return Ok(());
        }
    }

    db.save_record(keys::PLAYLIST, &playlist)?;
    Ok(())
}

fn print_current(id: Option<&str>) {
    match id {
        Some(id) => println!("{id}"),
        None => eprintln!("playlist is empty"),
    }
}
