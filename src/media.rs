//! Background media using HTML media elements
//!
//! The page provides a looping background video and a music track. Browsers
//! may refuse to start playback (autoplay policy); that is logged and the
//! game carries on silently.

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, HtmlMediaElement};

use crate::settings::Settings;

const VIDEO_ELEMENT_ID: &str = "background-video";
const MUSIC_ELEMENT_ID: &str = "background-music";

/// Background video and music controller
pub struct MediaController {
    video: Option<HtmlMediaElement>,
    music: Option<HtmlMediaElement>,
    music_volume: f64,
    game_over_volume: f64,
}

impl MediaController {
    pub fn new(document: &Document, settings: &Settings) -> Self {
        Self {
            video: media_element(document, VIDEO_ELEMENT_ID),
            music: media_element(document, MUSIC_ELEMENT_ID),
            music_volume: settings.effective_music_volume(),
            game_over_volume: settings.effective_game_over_volume(),
        }
    }

    /// Start video and music at full volume (must follow a user gesture)
    pub fn on_start(&self) {
        if let Some(video) = &self.video {
            play(video, "Video");
        }
        if let Some(music) = &self.music {
            play(music, "Audio");
            music.set_volume(self.music_volume);
        }
    }

    /// Freeze the video and lower the music
    pub fn on_game_over(&self) {
        if let Some(video) = &self.video {
            let _ = video.pause();
        }
        if let Some(music) = &self.music {
            music.set_volume(self.game_over_volume);
        }
    }
}

fn media_element(document: &Document, id: &str) -> Option<HtmlMediaElement> {
    let element = document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlMediaElement>().ok());
    if element.is_none() {
        log::warn!("No media element #{} - playback disabled", id);
    }
    element
}

/// Begin playback; a rejected play promise is only logged
fn play(element: &HtmlMediaElement, label: &'static str) {
    let promise = match element.play() {
        Ok(promise) => promise,
        Err(e) => {
            log::warn!("{} play failed: {:?}", label, e);
            return;
        }
    };

    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = JsFuture::from(promise).await {
            log::warn!("{} play failed: {:?}", label, e);
        }
    });
}
