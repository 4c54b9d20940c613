//! Video playlist played alongside focus sessions.
//!
//! Only video identifiers are stored; embedding and playback belong to the
//! host.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ValidationError;

const VIDEO_ID_LEN: usize = 11;

fn is_video_id(s: &str) -> bool {
    s.len() == VIDEO_ID_LEN
        && s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Pull an 11-character video id out of a bare id, a `youtu.be/<id>` link
/// or a `youtube.com/watch?v=<id>` link.
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if is_video_id(input) {
        return Some(input.to_string());
    }

    let url = Url::parse(input).ok()?;
    let host = url.host_str()?;
    let host = host.strip_prefix("www.").unwrap_or(host);

    let candidate = if host == "youtu.be" {
        url.path_segments()?.find(|seg| !seg.is_empty())?.to_string()
    } else if host.ends_with("youtube.com") {
        url.query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())?
    } else {
        return None;
    };

    is_video_id(&candidate).then_some(candidate)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    #[serde(default)]
    ids: Vec<String>,
    #[serde(default)]
    current: usize,
}

impl Playlist {
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn current(&self) -> Option<&str> {
        self.ids.get(self.current).map(String::as_str)
    }

    pub fn current_index(&self) -> Option<usize> {
        (self.current < self.ids.len()).then_some(self.current)
    }

    /// Append a video by id or link. Returns the parsed id.
    pub fn add(&mut self, input: &str) -> Result<String, ValidationError> {
        let id = extract_video_id(input).ok_or_else(|| ValidationError::InvalidValue {
            field: "video".into(),
            message: format!("'{}' is not a video id or link", input.trim()),
        })?;
        if self.ids.contains(&id) {
            return Err(ValidationError::Duplicate(format!("video {id}")));
        }
        self.ids.push(id.clone());
        Ok(id)
    }

    /// Remove a video by id or link. The cursor stays on the same video when
    /// possible.
    pub fn remove(&mut self, input: &str) -> Result<String, ValidationError> {
        let id = extract_video_id(input).unwrap_or_else(|| input.trim().to_string());
        let pos = self
            .ids
            .iter()
            .position(|v| *v == id)
            .ok_or_else(|| ValidationError::NotFound {
                kind: "video".into(),
                id: id.clone(),
            })?;
        self.ids.remove(pos);
        if pos < self.current || self.current >= self.ids.len() {
            self.current = self.current.saturating_sub(1);
        }
        Ok(id)
    }

    /// Advance to the next video, wrapping to the first.
    pub fn next(&mut self) -> Option<&str> {
        if self.ids.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.ids.len();
        self.current()
    }

    /// Step back to the previous video, wrapping to the last.
    pub fn previous(&mut self) -> Option<&str> {
        if self.ids.is_empty() {
            return None;
        }
        self.current = self
            .current
            .checked_sub(1)
            .unwrap_or(self.ids.len() - 1)
            .min(self.ids.len() - 1);
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "dQw4w9WgXcQ";

    #[test]
    fn extracts_from_supported_inputs() {
        assert_eq!(extract_video_id(ID).as_deref(), Some(ID));
        assert_eq!(
            extract_video_id(&format!("https://youtu.be/{ID}?t=42")).as_deref(),
            Some(ID)
        );
        assert_eq!(
            extract_video_id(&format!("https://www.youtube.com/watch?v={ID}&list=x")).as_deref(),
            Some(ID)
        );
        assert_eq!(
            extract_video_id(&format!("https://m.youtube.com/watch?v={ID}")).as_deref(),
            Some(ID)
        );
    }

    #[test]
    fn rejects_everything_else() {
        assert!(extract_video_id("").is_none());
        assert!(extract_video_id("short").is_none());
        assert!(extract_video_id(&format!("https://vimeo.com/watch?v={ID}")).is_none());
        assert!(extract_video_id("https://youtu.be/tooshort").is_none());
        assert!(extract_video_id("https://www.youtube.com/watch?list=abc").is_none());
        assert!(extract_video_id("not a url at all").is_none());
    }

    #[test]
    fn add_rejects_duplicates_and_garbage() {
        let mut list = Playlist::default();
        assert_eq!(list.add(ID).unwrap(), ID);
        assert!(matches!(
            list.add(&format!("https://youtu.be/{ID}")),
            Err(ValidationError::Duplicate(_))
        ));
        assert!(list.add("nope").is_err());
        assert_eq!(list.ids().len(), 1);
    }

    #[test]
    fn next_and_previous_wrap() {
        let mut list = Playlist::default();
        list.add("aaaaaaaaaaa").unwrap();
        list.add("bbbbbbbbbbb").unwrap();
        list.add("ccccccccccc").unwrap();
        assert_eq!(list.current(), Some("aaaaaaaaaaa"));
        assert_eq!(list.previous(), Some("ccccccccccc"));
        assert_eq!(list.next(), Some("aaaaaaaaaaa"));
        assert_eq!(list.next(), Some("bbbbbbbbbbb"));
    }

    #[test]
    fn remove_keeps_cursor_on_same_video() {
        let mut list = Playlist::default();
        list.add("aaaaaaaaaaa").unwrap();
        list.add("bbbbbbbbbbb").unwrap();
        list.add("ccccccccccc").unwrap();
        list.next();
        list.next();
        list.remove("aaaaaaaaaaa").unwrap();
        assert_eq!(list.current(), Some("ccccccccccc"));
        list.remove("ccccccccccc").unwrap();
        assert_eq!(list.current(), Some("bbbbbbbbbbb"));
        list.remove("bbbbbbbbbbb").unwrap();
        assert_eq!(list.current(), None);
        assert_eq!(list.current_index(), None);
    }

    #[test]
    fn empty_playlist_navigation() {
        let mut list = Playlist::default();
        assert!(list.next().is_none());
        assert!(list.previous().is_none());
        assert!(list.remove(ID).is_err());
    }
}
