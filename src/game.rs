//! The game context.
//!
//! [`Game`] owns every piece of engine state (entities, scene, sprites, input,
//! clock, configuration) and is handed to every hook as `&mut Game`. There is
//! no global: a program creates one `Game`, optionally attaches a
//! [`GameBehavior`], and drives it with [`Game::run`] or by calling
//! [`Game::frame`] from its own loop.
//!
//! # Lifecycle
//!
//! 1. [`Game::new`] builds the state from a [`GameConfig`].
//! 2. [`Game::run`] waits for the sprite loader, calls [`Game::start`]
//!    (which runs [`GameBehavior::init`]) and then feeds host frames to the
//!    scheduler until the host stops or [`Game::stop`] is called.
//! 3. [`Game::shutdown`] force-destroys everything.
//!
//! # Scene transitions
//!
//! [`Game::start_scene`] replaces the active scene:
//!
//! 1. the old scene's `on_destroy` produces an optional payload,
//! 2. every non-persistent entity is destroyed with `unloading = true`,
//! 3. the new scene becomes active and its `on_transfer` receives the old
//!    scene and the payload,
//! 4. the new scene's `on_init` runs,
//! 5. a forced frame runs one logic tick without rendering.
//!
//! The very first scene skips steps 1 to 3. A switch requested while a logic
//! tick or another transition is running is applied right after it; if
//! several are requested, the last one wins.

use fastrand::Rng;
use log::{error, info, warn};

use crate::components::behavior::{Behavior, Inert};
use crate::components::entity::{Entity, EntityId};
use crate::events::collision::StaticCollisionData;
use crate::host::Host;
use crate::resources::entitymanager::EntityManager;
use crate::resources::frameclock::FrameClock;
use crate::resources::gameconfig::GameConfig;
use crate::resources::gamestate::{GameMode, RunState};
use crate::resources::input::InputState;
use crate::resources::scene::{Scene, SceneBehavior};
use crate::resources::spritestore::{SpriteLoader, SpriteStore};
use crate::systems::collision::{get_static_collision, ray_cast_static_collision};
use crate::systems::destroy;
use crate::systems::frame::{self, FrameOutcome};
use crate::systems::loading::wait_for_assets;
use crate::systems::render::Renderer;

/// Game-wide hooks.
pub trait GameBehavior {
    /// Runs once from [`Game::start`].
    fn init(&mut self, _game: &mut Game) {}

    /// Once per logic tick, before the scene update and every entity.
    fn update(&mut self, _game: &mut Game) {}
}

pub struct Game {
    pub name: String,
    pub config: GameConfig,
    /// Current mode; entities only update/draw when their flags intersect it.
    pub mode: GameMode,
    pub entities: EntityManager,
    pub scene: Scene,
    pub sprites: SpriteStore,
    pub input: InputState,
    pub clock: FrameClock,
    /// General purpose generator for game code.
    pub rng: Rng,
    run_state: RunState,
    behavior: Option<Box<dyn GameBehavior>>,
    scene_active: bool,
    in_transition: bool,
    pub(crate) in_process: bool,
    pub(crate) pending_scene: Option<Scene>,
    pub(crate) static_probes: Vec<StaticCollisionData>,
}

impl Game {
    pub fn new(name: impl Into<String>, config: GameConfig) -> Self {
        let name = name.into();
        info!(
            "Created game '{}' at {} updates per second",
            name, config.update_rate
        );
        Self {
            name,
            entities: EntityManager::new(config.entity_cap, Rng::new()),
            clock: FrameClock::new(config.update_rate),
            config,
            mode: GameMode::default(),
            scene: Scene::default(),
            sprites: SpriteStore::new(),
            input: InputState::new(),
            rng: Rng::new(),
            run_state: RunState::Created,
            behavior: None,
            scene_active: false,
            in_transition: false,
            in_process: false,
            pending_scene: None,
            static_probes: Vec::new(),
        }
    }

    pub fn with_behavior(mut self, behavior: impl GameBehavior + 'static) -> Self {
        self.behavior = Some(Box::new(behavior));
        self
    }

    /// Make ids and [`Game::rng`] reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng.seed(seed);
        self.entities.set_seed(seed);
        self
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn has_active_scene(&self) -> bool {
        self.scene_active
    }

    // ===== LIFECYCLE =====

    /// Run the game's `init` hook and mark it running. A second call only
    /// logs an error.
    pub fn start(&mut self) {
        if self.run_state != RunState::Created {
            error!("Game '{}' was already started", self.name);
            return;
        }
        info!("Game '{}' started", self.name);
        self.run_state = RunState::Running;
        self.clock.set_update_rate(self.config.update_rate);
        self.entities.entity_cap = self.config.entity_cap;
        if let Some(mut behavior) = self.behavior.take() {
            behavior.init(self);
            self.behavior.get_or_insert(behavior);
        }
    }

    /// Load assets, start, then run frames until the host or the game stops.
    ///
    /// A loading failure is logged and returned; the game is left unstarted.
    pub fn run(
        &mut self,
        host: &mut dyn Host,
        loader: &mut dyn SpriteLoader,
        renderer: &mut dyn Renderer,
    ) -> Result<(), String> {
        if let Err(e) = wait_for_assets(self, host, loader) {
            error!("{}", e);
            return Err(e);
        }
        if self.run_state == RunState::Created {
            self.start();
        }
        while self.run_state == RunState::Running {
            let Some(now_ms) = host.next_frame() else {
                break;
            };
            host.poll_input(&mut self.input);
            let has_focus = host.has_focus();
            self.frame(now_ms, false, has_focus, Some(&mut *renderer));
        }
        self.shutdown();
        Ok(())
    }

    /// Ask [`Game::run`] to return after the current frame.
    pub fn stop(&mut self) {
        if self.run_state == RunState::Running {
            info!("Game '{}' stopping", self.name);
            self.run_state = RunState::Stopped;
        }
    }

    /// Destroy every entity, persistent ones included, and stop.
    pub fn shutdown(&mut self) {
        destroy::destroy_all(self, true, true);
        self.run_state = RunState::Stopped;
        info!(
            "Game '{}' shut down: {} entities created, {} destroyed",
            self.name, self.entities.created, self.entities.destroyed
        );
    }

    // ===== ENTITIES =====

    /// Queue an entity; it becomes active at the start of the next logic tick.
    pub fn spawn(&mut self, entity: Entity, behavior: impl Behavior + 'static) -> EntityId {
        self.spawn_boxed(entity, Box::new(behavior))
    }

    pub fn spawn_boxed(&mut self, entity: Entity, behavior: Box<dyn Behavior>) -> EntityId {
        self.entities
            .enqueue(entity, behavior, self.clock.previous_update_ms)
    }

    /// Queue an entity with no hooks of its own.
    pub fn spawn_inert(&mut self, entity: Entity) -> EntityId {
        self.spawn(entity, Inert)
    }

    pub fn get(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn get_mut(&mut self, id: &EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    pub fn is_alive(&self, id: &EntityId) -> bool {
        self.entities.is_alive(id)
    }

    /// See [`destroy::destroy`].
    pub fn destroy(&mut self, id: &EntityId, unloading: bool) -> bool {
        destroy::destroy(self, id, unloading)
    }

    /// See [`destroy::destroy_all`].
    pub fn destroy_all(&mut self, unloading: bool, forced: bool) {
        destroy::destroy_all(self, unloading, forced);
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        if mode != self.mode {
            info!("Game mode {:#x} -> {:#x}", self.mode.0, mode.0);
        }
        self.mode = mode;
    }

    // ===== SCENES AND FRAMES =====

    pub fn start_scene(&mut self, scene: Scene) {
        if self.in_process || self.in_transition {
            if let Some(replaced) = self.pending_scene.replace(scene) {
                warn!("Scene switch to '{}' was superseded", replaced.name);
            }
            return;
        }
        self.in_transition = true;
        let mut next = Some(scene);
        while let Some(scene) = next {
            self.switch_scene(scene);
            next = self.pending_scene.take();
        }
        self.in_transition = false;
    }

    fn switch_scene(&mut self, scene: Scene) {
        info!("Starting scene '{}'", scene.name);
        if self.scene_active {
            let mut old_behavior = self.scene.behavior.take();
            let payload = old_behavior
                .as_mut()
                .and_then(|behavior| behavior.on_destroy(self));
            destroy::destroy_all(self, true, false);

            let mut old_scene = std::mem::replace(&mut self.scene, scene);
            old_scene.behavior = old_behavior;
            self.scene_active = true;
            self.with_scene_behavior(|behavior, game| {
                behavior.on_transfer(game, &old_scene, payload)
            });
        } else {
            self.scene = scene;
            self.scene_active = true;
        }
        self.with_scene_behavior(|behavior, game| behavior.on_init(game));
        self.force_frame(None);
    }

    /// One scheduler step; see [`crate::systems::frame`].
    pub fn frame(
        &mut self,
        now_ms: f64,
        forced: bool,
        has_focus: bool,
        renderer: Option<&mut dyn Renderer>,
    ) -> FrameOutcome {
        frame::frame(self, now_ms, forced, has_focus, renderer)
    }

    /// Run one logic tick now, at the last seen host time.
    pub fn force_frame(&mut self, renderer: Option<&mut dyn Renderer>) -> FrameOutcome {
        let now_ms = self.clock.last_now_ms;
        self.frame(now_ms, true, true, renderer)
    }

    // ===== STATIC COLLISION =====

    /// Probe the scene's static grid at a point.
    pub fn static_collision(&mut self, x: f32, y: f32) -> StaticCollisionData {
        let data = get_static_collision(&self.scene, x, y);
        self.record_probe(data);
        data
    }

    /// March a ray through the scene's static grid.
    pub fn ray_cast_static(&mut self, x: f32, y: f32, angle: f32, dist: f32) -> StaticCollisionData {
        let data = ray_cast_static_collision(&self.scene, x, y, angle, dist);
        self.record_probe(data);
        data
    }

    fn record_probe(&mut self, data: StaticCollisionData) {
        if self.config.draw_static_colliders {
            self.static_probes.push(data);
        }
    }

    // ===== VIEW =====

    pub fn view_size(&self) -> (u32, u32) {
        self.config.view_size()
    }

    /// Whether `(x, y)` is inside the view grown by `pad` pixels.
    pub fn point_inside_view(&self, x: f32, y: f32, pad: f32) -> bool {
        self.scene.point_inside_view(x, y, pad, self.view_size())
    }

    pub fn point_outside_view(&self, x: f32, y: f32, pad: f32) -> bool {
        self.scene.point_outside_view(x, y, pad, self.view_size())
    }

    // ===== HOOK RUNNERS =====

    pub(crate) fn run_game_update(&mut self) {
        if let Some(mut behavior) = self.behavior.take() {
            behavior.update(self);
            self.behavior.get_or_insert(behavior);
        }
    }

    pub(crate) fn run_scene_update(&mut self) {
        if !self.scene_active {
            return;
        }
        self.with_scene_behavior(|behavior, game| behavior.update(game));
        let scroll = self.scene.scroll_speed;
        self.scene.view_position += scroll;
    }

    /// Run a scene hook with the behavior taken out of the scene.
    fn with_scene_behavior(&mut self, hook: impl FnOnce(&mut dyn SceneBehavior, &mut Game)) {
        let Some(mut behavior) = self.scene.behavior.take() else {
            return;
        };
        hook(behavior.as_mut(), self);
        self.scene.behavior.get_or_insert(behavior);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Recorder {
        name: &'static str,
        log: Log,
        payload: Option<serde_json::Value>,
    }

    impl SceneBehavior for Recorder {
        fn on_init(&mut self, game: &mut Game) {
            self.log.borrow_mut().push(format!(
                "{} init ({} active)",
                self.name,
                game.entities.active_count()
            ));
        }

        fn on_destroy(&mut self, _game: &mut Game) -> Option<serde_json::Value> {
            self.log.borrow_mut().push(format!("{} destroy", self.name));
            self.payload.clone()
        }

        fn on_transfer(
            &mut self,
            game: &mut Game,
            old_scene: &Scene,
            payload: Option<serde_json::Value>,
        ) {
            self.log.borrow_mut().push(format!(
                "{} transfer from {} {} ({} active)",
                self.name,
                old_scene.name,
                payload.map(|p| p.to_string()).unwrap_or_default(),
                game.entities.active_count()
            ));
        }
    }

    fn recorder(name: &'static str, log: &Log, payload: Option<serde_json::Value>) -> Scene {
        Scene::new(name).with_behavior(Recorder {
            name,
            log: Rc::clone(log),
            payload,
        })
    }

    // ===== LIFECYCLE =====

    #[test]
    fn test_second_start_is_ignored() {
        struct Counter(Rc<RefCell<u32>>);
        impl GameBehavior for Counter {
            fn init(&mut self, _game: &mut Game) {
                *self.0.borrow_mut() += 1;
            }
        }
        let count = Rc::new(RefCell::new(0));
        let mut game = Game::new("g", GameConfig::new()).with_behavior(Counter(Rc::clone(&count)));
        game.start();
        game.start();
        assert_eq!(*count.borrow(), 1);
        assert_eq!(game.run_state(), RunState::Running);
    }

    #[test]
    fn test_seeded_ids_repeat() {
        let mut a = Game::new("a", GameConfig::new()).with_seed(7);
        let mut b = Game::new("b", GameConfig::new()).with_seed(7);
        assert_eq!(
            a.spawn_inert(Entity::new(0.0, 0.0)),
            b.spawn_inert(Entity::new(0.0, 0.0))
        );
    }

    // ===== SCENES =====

    #[test]
    fn test_first_scene_skips_teardown() {
        let log: Log = Rc::default();
        let mut game = Game::new("g", GameConfig::new());
        game.start_scene(recorder("one", &log, None));
        assert!(game.has_active_scene());
        assert_eq!(*log.borrow(), vec!["one init (0 active)".to_string()]);
        assert_eq!(game.clock.ticks, 1);
    }

    #[test]
    fn test_transition_order_and_payload() {
        let log: Log = Rc::default();
        let mut game = Game::new("g", GameConfig::new());
        game.start_scene(recorder("one", &log, Some(serde_json::json!({"score": 3}))));
        game.spawn_inert(Entity::new(0.0, 0.0));
        game.spawn_inert(Entity::new(0.0, 0.0).with_persistence(true));
        game.force_frame(None);
        assert_eq!(game.entities.active_count(), 2);

        game.start_scene(recorder("two", &log, None));
        assert_eq!(game.scene.name, "two");
        assert_eq!(
            *log.borrow(),
            vec![
                "one init (0 active)".to_string(),
                "one destroy".to_string(),
                "two transfer from one {\"score\":3} (1 active)".to_string(),
                "two init (1 active)".to_string(),
            ]
        );
    }

    #[test]
    fn test_scene_switch_from_hook_is_deferred() {
        struct Chain;
        impl SceneBehavior for Chain {
            fn on_init(&mut self, game: &mut Game) {
                game.start_scene(Scene::new("next"));
                // still the chaining scene until this hook returns
                assert_eq!(game.scene.name, "chain");
            }
        }
        let mut game = Game::new("g", GameConfig::new());
        game.start_scene(Scene::new("chain").with_behavior(Chain));
        assert_eq!(game.scene.name, "next");
    }

    #[test]
    fn test_scene_scrolls_every_tick() {
        let mut game = Game::new("g", GameConfig::new());
        let mut scene = Scene::new("scroll");
        scene.scroll_speed = crate::math::vector::Vector2::new(2.0, 0.0);
        game.start_scene(scene);
        game.force_frame(None);
        // the transition's own forced frame counts too
        assert_eq!(game.scene.view_position.x, 4.0);
    }

    // ===== STATIC PROBES =====

    #[test]
    fn test_probes_recorded_only_when_drawn() {
        let mut game = Game::new("g", GameConfig::new());
        game.static_collision(1.0, 1.0);
        assert!(game.static_probes.is_empty());
        game.config.draw_static_colliders = true;
        game.ray_cast_static(0.0, 0.0, 0.0, 10.0);
        assert_eq!(game.static_probes.len(), 1);
    }

    #[test]
    fn test_probes_only_keep_the_latest_tick() {
        struct Prober;
        impl Behavior for Prober {
            fn update(&mut self, me: &mut Entity, game: &mut Game) {
                game.static_collision(me.position.x, me.position.y);
            }
        }
        let mut config = GameConfig::new();
        config.draw_static_colliders = true;
        let mut game = Game::new("g", config);
        game.start_scene(Scene::new("stage"));
        game.spawn(Entity::new(4.0, 4.0), Prober);
        for _ in 0..5 {
            game.force_frame(None);
        }
        assert_eq!(game.static_probes.len(), 1);
    }
}
