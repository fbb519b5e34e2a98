//! DOM presenter for the browser
//!
//! Every entity is an absolutely positioned `div` inside the game container,
//! sized from the settings so the drawn boxes match the simulated ones.

use std::collections::HashMap;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use super::Presenter;
use crate::media::MediaController;
use crate::settings::Settings;
use crate::sim::{EntityId, EntityKind, GameEvent, Playfield, Rect};

/// Mirrors game events onto the page
pub struct DomPresenter {
    document: Document,
    container: HtmlElement,
    player: Option<HtmlElement>,
    start_screen: Option<Element>,
    game_over: Option<Element>,
    final_score: Option<Element>,
    score: Option<Element>,
    health: Option<Element>,
    level: Option<Element>,
    /// HUD blocks hidden while no run is active
    hud: Vec<HtmlElement>,
    entities: HashMap<EntityId, HtmlElement>,
    media: MediaController,
}

impl DomPresenter {
    /// Bind to the page; `None` if there is no game container
    pub fn new(document: &Document, settings: &Settings) -> Option<Self> {
        let container = html_element(document, "game-container")?;
        let player = html_element(document, "player");
        if let Some(player) = &player {
            set_size(player, settings.sizes.player);
        }

        let hud = ["score", "health", "level"]
            .iter()
            .filter_map(|id| html_element(document, id))
            .collect();

        Some(Self {
            document: document.clone(),
            container,
            player,
            start_screen: element(document, "start-screen"),
            game_over: element(document, "game-over"),
            final_score: element(document, "final-score"),
            score: element(document, "score-value"),
            health: element(document, "health-value"),
            level: element(document, "level-value"),
            hud,
            entities: HashMap::new(),
            media: MediaController::new(document, settings),
        })
    }

    /// Current size of the game container
    pub fn playfield(&self) -> Playfield {
        Playfield::new(
            self.container.offset_width() as f32,
            self.container.offset_height() as f32,
        )
    }

    fn spawn(&mut self, id: EntityId, kind: EntityKind, rect: &Rect, health: i32) {
        let Some(el) = self
            .document
            .create_element("div")
            .ok()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            log::warn!("Failed to create element for entity {}", id);
            return;
        };

        let class = match kind {
            EntityKind::Bullet => "bullet".to_string(),
            EntityKind::Enemy(enemy) => format!("enemy enemy-{}", enemy.as_str()),
            EntityKind::PowerUp => "power-up".to_string(),
        };
        let _ = el.set_attribute("class", &class);
        if matches!(kind, EntityKind::Enemy(_)) {
            el.set_inner_text(&health.to_string());
        }
        set_size(&el, rect.size);
        set_pos(&el, rect.pos);

        let _ = self.container.append_child(&el);
        self.entities.insert(id, el);
    }

    fn show_run(&self, running: bool) {
        let display = if running { "block" } else { "none" };
        if let Some(player) = &self.player {
            let _ = player.style().set_property("display", display);
        }
        for block in &self.hud {
            let _ = block.style().set_property("display", display);
        }
    }

    fn on_started(&mut self) {
        if let Some(el) = &self.start_screen {
            let _ = el.class_list().add_1("hidden");
        }
        if let Some(el) = &self.game_over {
            let _ = el.class_list().add_1("hidden");
        }
        let _ = self.container.class_list().remove_1("game-over");
        self.show_run(true);
        self.media.on_start();
    }

    fn on_ended(&mut self, final_score: u64) {
        if let Some(el) = &self.final_score {
            el.set_text_content(Some(&final_score.to_string()));
        }
        if let Some(el) = &self.game_over {
            let _ = el.class_list().remove_1("hidden");
        }
        let _ = self.container.class_list().add_1("game-over");
        self.show_run(false);
        self.media.on_game_over();
    }
}

impl Presenter for DomPresenter {
    fn apply(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Started => self.on_started(),
            GameEvent::Spawned {
                id,
                kind,
                rect,
                health,
            } => self.spawn(*id, *kind, rect, *health),
            GameEvent::Moved { id, pos } => {
                if let Some(el) = self.entities.get(id) {
                    set_pos(el, *pos);
                }
            }
            GameEvent::Removed { id } => {
                if let Some(el) = self.entities.remove(id) {
                    el.remove();
                }
            }
            GameEvent::EnemyDamaged { id, health } => {
                if let Some(el) = self.entities.get(id) {
                    el.set_inner_text(&health.to_string());
                }
            }
            GameEvent::PlayerMoved { pos } => {
                if let Some(player) = &self.player {
                    set_pos(player, *pos);
                }
            }
            GameEvent::ScoreChanged(score) => set_text(&self.score, &score.to_string()),
            GameEvent::HealthChanged(health) => set_text(&self.health, &health.to_string()),
            GameEvent::LevelChanged(level) => set_text(&self.level, &level.to_string()),
            GameEvent::MultiplierChanged(multiplier) => {
                let classes = self.container.class_list();
                let _ = if *multiplier > 1 {
                    classes.add_1("multiplier")
                } else {
                    classes.remove_1("multiplier")
                };
            }
            GameEvent::Ended { final_score } => self.on_ended(*final_score),
        }
    }
}

fn element(document: &Document, id: &str) -> Option<Element> {
    let el = document.get_element_by_id(id);
    if el.is_none() {
        log::warn!("Missing element #{}", id);
    }
    el
}

fn html_element(document: &Document, id: &str) -> Option<HtmlElement> {
    element(document, id).and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

fn set_text(el: &Option<Element>, text: &str) {
    if let Some(el) = el {
        el.set_text_content(Some(text));
    }
}

fn set_pos(el: &HtmlElement, pos: Vec2) {
    let style = el.style();
    let _ = style.set_property("left", &format!("{}px", pos.x));
    let _ = style.set_property("top", &format!("{}px", pos.y));
}

fn set_size(el: &HtmlElement, size: Vec2) {
    let style = el.style();
    let _ = style.set_property("width", &format!("{}px", size.x));
    let _ = style.set_property("height", &format!("{}px", size.y));
}
