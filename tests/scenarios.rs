//! End-to-end runs through the public game loop

use sphere_runner::Tuning;
use sphere_runner::consts::SIM_DT;
use sphere_runner::persistence::{MemoryStore, PersistenceStore};
use sphere_runner::sim::{
    CollectibleKind, CollectiblePattern, GameEvent, GameLoop, GamePhase, Intent, Lane, ObstacleKind,
    PowerUpKind,
};

/// Default balance with the random spawn schedules pushed out of reach
fn scripted_tuning() -> Tuning {
    Tuning {
        obstacle_base_interval: 1.0e6,
        collectible_base_interval: 1.0e6,
        ..Default::default()
    }
}

fn start(tuning: Tuning, store: MemoryStore) -> GameLoop {
    let mut game = GameLoop::new(tuning, 42, Box::new(store)).unwrap();
    game.tick(SIM_DT, &[Intent::Restart]);
    assert_eq!(game.phase(), GamePhase::Playing);
    game
}

fn advance(game: &mut GameLoop, seconds: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..(seconds / SIM_DT).round() as usize {
        events.extend(game.tick(SIM_DT, &[]));
    }
    events
}

/// Drop a tree on the hero and run the tick that hits it
fn take_hit(game: &mut GameLoop) -> Vec<GameEvent> {
    let lane = game.lane().hero().lane;
    game.place_obstacle(ObstacleKind::Tree, lane, 0.0).unwrap();
    game.tick(SIM_DT, &[])
}

#[test]
fn three_hits_end_the_run() {
    let mut game = start(scripted_tuning(), MemoryStore::new());
    assert_eq!(game.lives(), 3);

    take_hit(&mut game);
    advance(&mut game, 1.2);
    take_hit(&mut game);
    advance(&mut game, 1.2);
    assert_eq!(game.lives(), 1);
    assert_eq!(game.phase(), GamePhase::Playing);

    let events = take_hit(&mut game);
    assert_eq!(game.phase(), GamePhase::GameOver);
    let final_score = game.score().display_score();
    assert!(events.contains(&GameEvent::GameOver { final_score, coins: 0 }));
    assert!(events.contains(&GameEvent::StateChanged { phase: GamePhase::GameOver }));
}

#[test]
fn shield_absorbs_a_hit() {
    let mut game = start(scripted_tuning(), MemoryStore::new());
    game.place_collectible(CollectibleKind::Shield, Lane::Middle, 0.1).unwrap();
    let events = game.tick(SIM_DT, &[]);
    assert!(events.contains(&GameEvent::CollectibleCollected { kind: CollectibleKind::Shield }));
    assert!(game.powerups().is_active(PowerUpKind::Shield));

    let events = take_hit(&mut game);
    assert!(events.contains(&GameEvent::ObstacleHit { kind: ObstacleKind::Tree, absorbed: true }));
    assert!(!game.powerups().is_active(PowerUpKind::Shield));
    assert_eq!(game.lives(), 3);
    assert_eq!(game.phase(), GamePhase::Playing);
    assert!(!game.is_invulnerable());
}

#[test]
fn pause_freezes_every_timer() {
    let mut game = start(Tuning::default(), MemoryStore::new());
    game.place_collectible(CollectibleKind::Magnet, Lane::Middle, 0.1).unwrap();
    game.tick(SIM_DT, &[]);
    assert!(game.powerups().is_active(PowerUpKind::Magnet));

    game.tick(SIM_DT, &[Intent::PauseToggle]);
    assert_eq!(game.phase(), GamePhase::Paused);
    let magnet = game.powerups().remaining(PowerUpKind::Magnet);
    let elapsed = game.progress().elapsed();
    let difficulty = game.progress().difficulty_factor();
    let next_obstacle = game.spawner().next_obstacle_at();
    let next_collectible = game.spawner().next_collectible_at();
    let score = game.score().score();

    let events = advance(&mut game, 5.0);
    assert!(events.is_empty());

    game.tick(0.0, &[Intent::PauseToggle]);
    assert_eq!(game.phase(), GamePhase::Playing);
    assert_eq!(game.powerups().remaining(PowerUpKind::Magnet), magnet);
    assert_eq!(game.progress().elapsed(), elapsed);
    assert_eq!(game.progress().difficulty_factor(), difficulty);
    assert_eq!(game.spawner().next_obstacle_at(), next_obstacle);
    assert_eq!(game.spawner().next_collectible_at(), next_collectible);
    assert_eq!(game.score().score(), score);
}

#[test]
fn horizontal_line_fills_each_lane_once() {
    let mut game = start(scripted_tuning(), MemoryStore::new());
    assert_eq!(game.spawn_pattern(CollectiblePattern::Horizontal), 3);

    let active: Vec<_> = game.spawner().collectibles().iter_active().collect();
    assert_eq!(active.len(), 3);
    let mut laterals: Vec<f32> = active.iter().map(|c| c.lateral).collect();
    laterals.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(laterals, vec![-1.0, 0.0, 1.0]);
    assert!(active.iter().all(|c| c.path_distance == active[0].path_distance));

    let events = game.tick(SIM_DT, &[]);
    let spawned = events
        .iter()
        .filter(|e| matches!(e, GameEvent::CollectibleSpawned(_)))
        .count();
    assert_eq!(spawned, 3);
}

#[test]
fn high_score_survives_restart() {
    let store = MemoryStore::new();
    let mut game = start(scripted_tuning(), store.clone());
    advance(&mut game, 3.0);
    for _ in 0..3 {
        take_hit(&mut game);
        advance(&mut game, 1.2);
    }
    assert_eq!(game.phase(), GamePhase::GameOver);
    let best = game.score().high_score();
    assert!(best > 0);
    assert_eq!(store.high_score().unwrap(), best);

    game.tick(SIM_DT, &[Intent::Restart]);
    assert_eq!(game.phase(), GamePhase::Playing);
    assert_eq!(game.score().high_score(), best);

    // A fresh loop on the same store sees the saved value
    let reloaded = GameLoop::new(scripted_tuning(), 7, Box::new(store)).unwrap();
    assert_eq!(reloaded.score().high_score(), best);
}

#[test]
fn same_seed_same_run() {
    let script = |game: &mut GameLoop| {
        let mut events = Vec::new();
        for i in 0..600 {
            let intents: &[Intent] = match i % 50 {
                0 => &[Intent::Jump],
                20 => &[Intent::MoveLeft],
                35 => &[Intent::MoveRight],
                _ => &[],
            };
            events.extend(game.tick(SIM_DT, intents));
        }
        events
    };
    let mut a = start(Tuning::default(), MemoryStore::new());
    let mut b = start(Tuning::default(), MemoryStore::new());
    assert_eq!(script(&mut a), script(&mut b));
    assert_eq!(a.score().score(), b.score().score());
}
