//! Player stat mutations, score and ranking comparators.

use proptest::prelude::*;
use towerfall_bracket::{by_kills, by_runnerup, by_score, Color, Direction, Player, StatKind};

fn stat_kinds() -> impl Strategy<Value = StatKind> {
    prop_oneof![
        Just(StatKind::Kills),
        Just(StatKind::Shots),
        Just(StatKind::Sweeps),
        Just(StatKind::SelfKills),
        Just(StatKind::Explosions),
    ]
}

fn directions() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Up), Just(Direction::Down)]
}

fn seasoned(name: &str) -> Player {
    let mut p = Player::new(name, Some(Color::Blue));
    p.kills = 1000;
    p.shots = 1000;
    p.sweeps = 10;
    p.self_kills = 10;
    p.explosions = 10;
    p
}

#[test]
fn sweep_gives_shot_and_three_kills() {
    let mut p = Player::new("Alice", Some(Color::Green));
    p.add_kill();
    p.add_sweep();
    assert_eq!(p.sweeps, 1);
    assert_eq!(p.shots, 1);
    assert_eq!(p.kills, 4);
}

#[test]
fn removals_stop_at_zero() {
    let mut p = Player::new("Alice", Some(Color::Green));
    p.remove_shot();
    p.remove_kill();
    p.remove_sweep();
    p.remove_self();
    p.remove_explosion();
    assert_eq!(p, Player::new("Alice", Some(Color::Green)));
}

#[test]
fn self_costs_a_kill_and_gives_a_shot() {
    let mut p = Player::new("Alice", Some(Color::Green));
    p.add_kills(2);
    p.add_self();
    assert_eq!((p.self_kills, p.kills, p.shots), (1, 1, 1));

    // With no kills left the kill part is clamped, the rest still applies.
    let mut q = Player::new("Bob", Some(Color::Red));
    q.add_self();
    assert_eq!((q.self_kills, q.kills, q.shots), (1, 0, 1));
}

#[test]
fn explosion_gives_shot_and_kill() {
    let mut p = Player::new("Alice", Some(Color::Green));
    p.add_explosion();
    assert_eq!((p.explosions, p.shots, p.kills), (1, 1, 1));
    p.remove_explosion();
    assert_eq!((p.explosions, p.shots, p.kills), (0, 0, 0));
}

#[test]
fn score_weights_each_stat() {
    let mut p = Player::new("Alice", Some(Color::Green));
    p.add_sweep();
    // 5 for the sweep, 3 for its shot, 2 for each of its kills.
    assert_eq!(p.score(), 14);
    p.add_explosion();
    assert_eq!(p.score(), 14 + 1 + 3 + 2);
}

#[test]
fn huge_counters_saturate_instead_of_overflowing() {
    let mut p = Player::new("Alice", Some(Color::Green));
    p.add_kills(u32::MAX);
    p.add_sweep();
    assert_eq!(p.kills, u32::MAX);
    assert_eq!(p.score(), u32::MAX);

    let mut total = Player::new("Alice", Some(Color::Green));
    total.update(&p);
    total.update(&p);
    assert_eq!(total.kills, u32::MAX);
    assert_eq!(total.total_score, u32::MAX);
}

#[test]
fn apply_maps_to_add_and_remove() {
    let mut p = Player::new("Alice", Some(Color::Green));
    p.apply(StatKind::Sweeps, Direction::Up);
    p.apply(StatKind::Kills, Direction::Up);
    assert_eq!((p.sweeps, p.kills, p.shots), (1, 4, 1));
    p.apply(StatKind::Sweeps, Direction::Down);
    assert_eq!((p.sweeps, p.kills, p.shots), (0, 1, 0));
}

#[test]
fn update_accumulates_and_counts_matches() {
    let mut total = Player::new("Alice", Some(Color::Green));
    let mut one = Player::new("Alice", Some(Color::Green));
    one.add_kills(4);
    one.add_shot();
    total.update(&one);
    total.update(&one);
    assert_eq!(total.kills, 8);
    assert_eq!(total.shots, 2);
    assert_eq!(total.matches, 2);
    assert_eq!(total.total_score, total.score());

    let cached = total.total_score;
    total.reset();
    assert_eq!((total.kills, total.shots, total.matches), (0, 0, 0));
    // The cached score is only refreshed by the next update.
    assert_eq!(total.total_score, cached);
    total.update(&one);
    assert_eq!(total.total_score, one.score());
}

#[test]
fn score_data_lists_every_counter() {
    let mut p = Player::new("Alice", Some(Color::Green));
    p.add_kills(3);
    let keys: Vec<_> = p.score_data().iter().map(|d| d.key).collect();
    assert_eq!(keys, ["kills", "shots", "sweeps", "self", "explosions"]);
    assert_eq!(p.score_data()[0].value, 3);
}

#[test]
fn comparators_order_best_first() {
    let mut a = Player::new("A", None);
    a.add_kills(5);
    let mut b = Player::new("B", None);
    b.add_kills(3);
    b.add_sweep();

    let mut ps = vec![a.clone(), b.clone()];
    ps.sort_by(by_kills);
    assert_eq!(ps[0].name, "B");

    let mut ps = vec![a.clone(), b.clone()];
    ps.sort_by(by_score);
    assert_eq!(ps[0].name, "B");

    // Fewer matches beats a higher score.
    a.matches = 1;
    b.matches = 2;
    let mut c = Player::new("C", None);
    c.matches = 1;
    c.add_kills(9);
    let mut ps = vec![b, a, c];
    ps.sort_by(by_runnerup);
    let names: Vec<_> = ps.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["C", "A", "B"]);
}

proptest! {
    #[test]
    fn add_then_remove_restores_counters(ops in prop::collection::vec(stat_kinds(), 0..50)) {
        let start = seasoned("Alice");
        let mut p = start.clone();
        for &stat in &ops {
            p.apply(stat, Direction::Up);
        }
        for &stat in ops.iter().rev() {
            p.apply(stat, Direction::Down);
        }
        prop_assert_eq!(p, start);
    }

    #[test]
    fn arbitrary_actions_never_underflow(
        ops in prop::collection::vec((stat_kinds(), directions()), 0..100)
    ) {
        let mut p = Player::new("Alice", Some(Color::Cyan));
        for (stat, dir) in ops {
            p.apply(stat, dir);
        }
        prop_assert!(p.score() >= p.sweeps * 5);
    }
}
