//! Match slots, start/end lifecycle, round commits and colour conflicts.

use rand::rngs::StdRng;
use rand::SeedableRng;
use towerfall_bracket::{
    Color, GameMatch, MatchId, MatchKind, Player, RoundScore, TournamentError, MATCH_SLOTS,
    MAX_ROUND_UPS,
};

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

fn full_match(kind: MatchKind) -> GameMatch {
    let mut m = GameMatch::new(kind, 0);
    let colors = [Color::Green, Color::Blue, Color::Pink, Color::Orange];
    for (i, color) in colors.into_iter().enumerate() {
        m.add_player(Player::new(format!("P{i}"), Some(color))).unwrap();
    }
    m
}

#[test]
fn new_match_has_four_placeholders() {
    let m = GameMatch::new(MatchKind::Tryout, 2);
    assert_eq!(m.players.len(), MATCH_SLOTS);
    assert!(m.players.iter().all(Player::is_prefill));
    assert_eq!(m.actual_players(), 0);
    assert_eq!(m.id(), MatchId::tryout(2));
    assert!(m.can_start());
}

#[test]
fn add_player_replaces_placeholders_and_caps_at_four() {
    let mut m = GameMatch::new(MatchKind::Semi, 1);
    m.add_player(Player::new("Alice", Some(Color::Red))).unwrap();
    assert_eq!(m.players.len(), MATCH_SLOTS);
    assert_eq!(m.players[0].name, "Alice");
    assert_eq!(m.slot_of("Alice"), Some(0));
    assert_eq!(m.slot_of(""), None);

    let mut m = full_match(MatchKind::Tryout);
    assert!(m.is_full());
    assert_eq!(
        m.add_player(Player::new("Eve", Some(Color::Red))),
        Err(TournamentError::MatchFull(MatchId::tryout(0)))
    );
    assert_eq!(m.players.len(), MATCH_SLOTS);
}

#[test]
fn start_and_end_only_once_and_in_order() {
    let mut rng = rng();
    let mut m = full_match(MatchKind::Tryout);
    assert!(matches!(m.finish(), Err(TournamentError::InvalidTransition(_))));

    m.begin(&mut rng).unwrap();
    assert!(m.is_open());
    assert!(matches!(
        m.begin(&mut rng),
        Err(TournamentError::InvalidTransition(_))
    ));

    m.finish().unwrap();
    assert!(m.is_ended());
    assert!(!m.is_open());
    assert!(matches!(m.finish(), Err(TournamentError::InvalidTransition(_))));
    assert_eq!(m.players.len(), MATCH_SLOTS);
}

#[test]
fn begin_resets_in_match_stats() {
    let mut m = full_match(MatchKind::Tryout);
    m.players[1].add_kills(7);
    m.begin(&mut rng()).unwrap();
    assert!(m.players.iter().all(|p| p.kills == 0));
}

#[test]
fn can_end_once_someone_reaches_the_kill_target() {
    let mut m = full_match(MatchKind::Tryout);
    m.players[0].add_kills(10);
    // Not started yet.
    assert!(!m.can_end());

    let mut m = full_match(MatchKind::Tryout);
    m.begin(&mut rng()).unwrap();
    m.players[2].add_kills(9);
    assert!(!m.can_end());
    m.players[2].add_kill();
    assert!(m.can_end());

    let mut f = full_match(MatchKind::Final);
    f.begin(&mut rng()).unwrap();
    assert_eq!(f.length(), 20);
    f.players[0].add_kills(10);
    assert!(!f.can_end());
    f.players[0].add_kills(10);
    assert!(f.can_end());
    f.finish().unwrap();
    assert!(!f.can_end());
}

#[test]
fn finish_gives_the_leader_a_shot() {
    let mut m = full_match(MatchKind::Semi);
    m.begin(&mut rng()).unwrap();
    m.players[3].add_kills(5);
    m.finish().unwrap();
    assert_eq!(m.players[3].shots, 1);
    assert!(m.players[..3].iter().all(|p| p.shots == 0));
}

#[test]
fn commit_applies_round_results_in_slot_order() {
    let mut m = full_match(MatchKind::Tryout);
    m.begin(&mut rng()).unwrap();
    let scores = [
        RoundScore { ups: 3, downs: 0 },
        RoundScore { ups: 3, downs: 1 },
        RoundScore { ups: 2, downs: 0 },
        RoundScore { ups: 0, downs: 1 },
    ];
    m.commit(&scores, &[false, false, true, false]).unwrap();

    let p = &m.players;
    assert_eq!((p[0].sweeps, p[0].kills, p[0].shots), (1, 3, 1));
    // Sweep plus self: one shot only, and the self costs a kill.
    assert_eq!((p[1].sweeps, p[1].kills, p[1].shots, p[1].self_kills), (1, 2, 1, 1));
    assert_eq!((p[2].kills, p[2].shots), (2, 1));
    assert_eq!((p[3].kills, p[3].shots, p[3].self_kills), (0, 1, 1));
}

#[test]
fn commit_rejects_more_than_a_sweep_and_applies_nothing() {
    let mut m = full_match(MatchKind::Tryout);
    m.begin(&mut rng()).unwrap();
    let before = m.players.clone();
    let scores = [
        RoundScore { ups: 2, downs: 0 },
        RoundScore { ups: u32::MAX, downs: 0 },
    ];
    assert_eq!(
        m.commit(&scores, &[true, true]),
        Err(TournamentError::InvalidRoundScore { slot: 1, ups: u32::MAX })
    );
    assert_eq!(m.players, before);

    let sweep = [RoundScore { ups: MAX_ROUND_UPS, downs: 0 }];
    m.commit(&sweep, &[]).unwrap();
    assert_eq!(m.players[0].sweeps, 1);
}

#[test]
fn commit_requires_a_running_match() {
    let mut m = full_match(MatchKind::Tryout);
    let scores = [RoundScore { ups: 1, downs: 0 }];
    assert!(matches!(
        m.commit(&scores, &[]),
        Err(TournamentError::InvalidTransition(_))
    ));
    m.begin(&mut rng()).unwrap();
    m.commit(&scores, &[]).unwrap();
    assert_eq!(m.players[0].kills, 1);
    m.finish().unwrap();
    assert!(m.commit(&scores, &[]).is_err());
}

#[test]
fn colour_conflict_moves_the_lower_score() {
    let mut m = GameMatch::new(MatchKind::Tryout, 0);
    m.add_player(Player::new("Low", Some(Color::Red))).unwrap();
    m.add_player(Player::new("High", Some(Color::Red))).unwrap();
    m.add_player(Player::new("Other", Some(Color::Blue))).unwrap();
    m.add_player(Player::new("Tied", Some(Color::Blue))).unwrap();
    m.players[1].add_kills(5);

    m.correct_color_conflicts(&mut rng());

    assert_eq!(m.players[1].preferred_color, Some(Color::Red));
    // On a tie the earlier slot keeps its colour.
    assert_eq!(m.players[2].preferred_color, Some(Color::Blue));
    let mut colors: Vec<_> = m.players.iter().map(|p| p.preferred_color).collect();
    colors.sort_by_key(|c| format!("{c:?}"));
    colors.dedup();
    assert_eq!(colors.len(), 4);
}

#[test]
fn titles_and_paths() {
    let m = GameMatch::new(MatchKind::Tryout, 1);
    assert_eq!(m.title(8), "Tryout 2/8");
    assert_eq!(GameMatch::new(MatchKind::Final, 0).title(4), "Final");
    assert_eq!(MatchId::semi(1).path("cup"), "/cup/semi/1/");
}
