//! Collision integration tests: dynamic resolution through the logic tick and
//! static grid probes through the game context.

use std::cell::RefCell;
use std::rc::Rc;

use enjin::components::behavior::Behavior;
use enjin::components::collider::Collider;
use enjin::components::entity::{Entity, EntityId};
use enjin::events::collision::CollisionData;
use enjin::game::Game;
use enjin::math::vector::Vector2;
use enjin::resources::gameconfig::GameConfig;
use enjin::resources::scene::{Scene, StaticGrid};

const EPSILON: f32 = 1e-4;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

type Hits = Rc<RefCell<Vec<(String, String)>>>;

/// Records `(own collider, other collider)` for every callback; optionally
/// destroys the other entity on the first hit.
struct Recorder {
    hits: Hits,
    destroy_other: bool,
}

impl Recorder {
    fn new(hits: &Hits) -> Self {
        Self {
            hits: Rc::clone(hits),
            destroy_other: false,
        }
    }

    fn destroying(hits: &Hits) -> Self {
        Self {
            hits: Rc::clone(hits),
            destroy_other: true,
        }
    }
}

impl Behavior for Recorder {
    fn on_collision(&mut self, _me: &mut Entity, game: &mut Game, data: &CollisionData) {
        self.hits
            .borrow_mut()
            .push((data.id.to_string(), data.other_id.to_string()));
        if self.destroy_other {
            game.destroy(&data.other_entity, false);
        }
    }
}

fn game() -> Game {
    let mut game = Game::new("collisions", GameConfig::new()).with_seed(11);
    game.start_scene(Scene::new("stage"));
    game
}

fn spawn_at(game: &mut Game, x: f32, y: f32, collider: Collider, behavior: Recorder) -> EntityId {
    game.spawn(Entity::new(x, y).with_collider(collider), behavior)
}

// ===== DYNAMIC =====

#[test]
fn overlapping_circles_report_both_ways() {
    let hits: Hits = Rc::default();
    let mut game = game();
    spawn_at(&mut game, 0.0, 0.0, Collider::circle("a", 0.0, 0.0, 5.0), Recorder::new(&hits));
    spawn_at(&mut game, 8.0, 0.0, Collider::circle("b", 0.0, 0.0, 5.0), Recorder::new(&hits));

    game.force_frame(None);
    let mut seen = hits.borrow().clone();
    seen.sort();
    assert_eq!(
        seen,
        vec![
            ("a".to_string(), "b".to_string()),
            ("b".to_string(), "a".to_string())
        ]
    );
}

#[test]
fn circles_touching_exactly_collide() {
    let hits: Hits = Rc::default();
    let mut game = game();
    spawn_at(&mut game, 0.0, 0.0, Collider::circle("a", 0.0, 0.0, 5.0), Recorder::new(&hits));
    spawn_at(&mut game, 10.0, 0.0, Collider::circle("b", 0.0, 0.0, 5.0), Recorder::new(&hits));
    game.force_frame(None);
    assert_eq!(hits.borrow().len(), 2);
}

#[test]
fn point_on_rectangle_edge_does_not_collide() {
    let hits: Hits = Rc::default();
    let mut game = game();
    spawn_at(&mut game, 10.0, 5.0, Collider::point("p", 0.0, 0.0), Recorder::new(&hits));
    spawn_at(
        &mut game,
        10.0,
        0.0,
        Collider::rectangle("r", 0.0, 0.0, 10.0, 10.0),
        Recorder::new(&hits),
    );
    game.force_frame(None);
    assert!(hits.borrow().is_empty());
}

#[test]
fn raycast_hits_only_from_the_casting_side() {
    let hits: Hits = Rc::default();
    let mut game = game();
    spawn_at(
        &mut game,
        0.0,
        0.0,
        Collider::raycast("ray", 0.0, 0.0, 0.0, 100.0),
        Recorder::new(&hits),
    );
    spawn_at(
        &mut game,
        40.0,
        -5.0,
        Collider::rectangle("wall", 0.0, 0.0, 20.0, 10.0),
        Recorder::new(&hits),
    );
    game.force_frame(None);
    assert_eq!(
        *hits.borrow(),
        vec![("ray".to_string(), "wall".to_string())]
    );
}

#[test]
fn destroyed_entity_gets_no_more_callbacks_in_the_same_tick() {
    let hits: Hits = Rc::default();
    let mut game = game();
    // three mutually overlapping circles; whoever is resolved first destroys
    // its partner
    let ids = [
        spawn_at(&mut game, 0.0, 0.0, Collider::circle("x", 0.0, 0.0, 5.0), Recorder::destroying(&hits)),
        spawn_at(&mut game, 1.0, 0.0, Collider::circle("y", 0.0, 0.0, 5.0), Recorder::destroying(&hits)),
        spawn_at(&mut game, 2.0, 0.0, Collider::circle("z", 0.0, 0.0, 5.0), Recorder::destroying(&hits)),
    ];
    game.force_frame(None);

    let alive: Vec<&EntityId> = ids.iter().filter(|id| game.is_alive(id)).collect();
    assert_eq!(alive.len(), 1);
    // the survivor destroyed both others, each with a single callback
    assert_eq!(hits.borrow().len(), 2);
}

#[test]
fn inactive_colliders_are_ignored() {
    let hits: Hits = Rc::default();
    let mut game = game();
    let mut dormant = Collider::circle("a", 0.0, 0.0, 5.0);
    dormant.active = false;
    spawn_at(&mut game, 0.0, 0.0, dormant, Recorder::new(&hits));
    spawn_at(&mut game, 1.0, 0.0, Collider::circle("b", 0.0, 0.0, 5.0), Recorder::new(&hits));
    game.force_frame(None);
    assert!(hits.borrow().is_empty());
}

#[test]
fn collision_data_names_both_entities() {
    let hits: Hits = Rc::default();
    let mut game = game();

    struct Check {
        seen: Rc<RefCell<Option<CollisionData>>>,
    }
    impl Behavior for Check {
        fn on_collision(&mut self, _me: &mut Entity, _game: &mut Game, data: &CollisionData) {
            *self.seen.borrow_mut() = Some(data.clone());
        }
    }

    let seen = Rc::new(RefCell::new(None));
    let checker = game.spawn(
        Entity::new(0.0, 0.0).with_collider(Collider::point("tip", 3.0, 0.0)),
        Check {
            seen: Rc::clone(&seen),
        },
    );
    let target = spawn_at(&mut game, 0.0, 0.0, Collider::circle("body", 0.0, 0.0, 4.0), Recorder::new(&hits));
    game.force_frame(None);

    let data = seen.borrow().clone().expect("point inside circle");
    assert_eq!(data.entity, checker);
    assert_eq!(data.other_entity, target);
    assert_eq!(data.hit, Vector2::new(3.0, 0.0));
}

// ===== STATIC =====

fn walled_game() -> Game {
    let mut game = Game::new("walls", GameConfig::new());
    game.start_scene(
        Scene::new("walls").with_grid(StaticGrid::new(vec![
            vec![0, 0, 0, 0, 0, 0],
            vec![0, 0, 0, 5, 0, 0],
            vec![0, 0, 0, 0, 0, 0],
        ])),
    );
    game
}

#[test]
fn static_ray_stops_short_of_the_blocked_cell() {
    let mut game = walled_game();
    let data = game.ray_cast_static(2.0, 20.0, 0.0, 80.0);
    assert_eq!(data.value, 5);
    assert!(data.hit.x >= 48.0 && data.hit.x < 64.0);
    assert!(data.magnitude_free() < data.magnitude_hit());
    assert!(data.last_free.x < 48.0);
    assert!(approx_eq(data.cast_length.x, 80.0));
}

#[test]
fn static_ray_misses_along_a_free_row() {
    let mut game = walled_game();
    let data = game.ray_cast_static(2.0, 36.0, 0.0, 80.0);
    assert_eq!(data.value, 0);
    assert!(approx_eq(data.hit.x, 82.0));
}

#[test]
fn static_point_probe_reads_cell() {
    let mut game = walled_game();
    assert_eq!(game.static_collision(50.0, 17.0).value, 5);
    assert_eq!(game.static_collision(50.0, 15.9).value, 0);
    assert_eq!(game.static_collision(500.0, 500.0).value, 0);
}
