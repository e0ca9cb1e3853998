// Integration tests for the external agent protocol
//
// Agents are small /bin/sh scripts, plus the random-agent binary built with the crate.
#![cfg(unix)]

use std::time::{Duration, Instant};

use tron_arena::arena::Arena;
use tron_arena::engine::GameState;
use tron_arena::player::Player;
use tron_arena::source::{MoveSource, SubprocessAgent};
use tron_arena::types::{Coord, PlayerId, SENTINEL_MOVE};

fn sh_agent(player: PlayerId, script: &str) -> SubprocessAgent {
    SubprocessAgent::new(
        player,
        vec!["/bin/sh".to_string(), "-c".to_string(), script.to_string()],
    )
    .with_cleanup_timeout(Duration::from_millis(500))
}

const VIEW: &str = r#"{"board_size":8,"walls":[],"self":{"head":null,"trail":[],"previous_move":0},"opponent":{"head":null,"trail":[],"previous_move":0}}"#;

#[tokio::test]
async fn test_agent_answers_each_request() {
    let mut agent = sh_agent(PlayerId::One, "while read line; do echo 3; done");
    assert!(agent.initialize().await);
    assert!(agent.is_running());

    for _ in 0..3 {
        assert_eq!(agent.get_move(VIEW).await, 3);
    }

    agent.cleanup().await;
    assert!(!agent.is_running());
}

#[tokio::test]
async fn test_agent_receives_the_view_line() {
    let script = r#"read line; case "$line" in *board_size*) echo 4;; *) echo 0;; esac; read rest"#;
    let mut agent = sh_agent(PlayerId::Two, script);
    assert!(agent.initialize().await);
    assert_eq!(agent.get_move(VIEW).await, 4);
    agent.cleanup().await;
}

#[tokio::test]
async fn test_reply_with_whitespace_is_accepted() {
    let mut agent = sh_agent(PlayerId::One, "while read line; do echo '  2 '; done");
    assert!(agent.initialize().await);
    assert_eq!(agent.get_move(VIEW).await, 2);
    agent.cleanup().await;
}

#[tokio::test]
async fn test_non_numeric_reply_yields_sentinel() {
    let mut agent = sh_agent(PlayerId::One, "while read line; do echo left; done");
    assert!(agent.initialize().await);
    assert_eq!(agent.get_move(VIEW).await, SENTINEL_MOVE);
    agent.cleanup().await;
}

#[tokio::test]
async fn test_exited_agent_yields_sentinel() {
    let mut agent = sh_agent(PlayerId::One, "read line; exit 0");
    assert!(agent.initialize().await);

    // The first request is read but never answered
    assert_eq!(agent.get_move(VIEW).await, SENTINEL_MOVE);
    // Later requests hit a closed pipe
    assert_eq!(agent.get_move(VIEW).await, SENTINEL_MOVE);
    agent.cleanup().await;
}

#[tokio::test]
async fn test_slow_agent_times_out_when_bounded() {
    let mut agent = sh_agent(PlayerId::One, "while read line; do sleep 5; echo 1; done")
        .with_move_timeout(Some(Duration::from_millis(100)));
    assert!(agent.initialize().await);

    let start = Instant::now();
    assert_eq!(agent.get_move(VIEW).await, SENTINEL_MOVE);
    assert!(start.elapsed() < Duration::from_secs(2));

    agent.cleanup().await;
    assert!(start.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn test_late_reply_is_dropped_and_replies_stay_paired() {
    // Answers with the request number; only the first answer is slow
    let script = r#"n=0; while read line; do n=$((n+1)); if [ $n -eq 1 ]; then sleep 0.3; fi; echo $n; done"#;
    let mut agent =
        sh_agent(PlayerId::One, script).with_move_timeout(Some(Duration::from_millis(100)));
    assert!(agent.initialize().await);

    assert_eq!(agent.get_move(VIEW).await, SENTINEL_MOVE);
    // Let the late answer to request 1 land in the pipe
    tokio::time::sleep(Duration::from_millis(400)).await;

    assert_eq!(agent.get_move(VIEW).await, 2);
    assert_eq!(agent.get_move(VIEW).await, 3);
    agent.cleanup().await;
}

#[tokio::test]
async fn test_late_reply_still_in_flight_is_dropped() {
    let script = r#"n=0; while read line; do n=$((n+1)); if [ $n -eq 1 ]; then sleep 0.3; fi; echo $n; done"#;
    let mut agent =
        sh_agent(PlayerId::Two, script).with_move_timeout(Some(Duration::from_millis(1000)));
    assert!(agent.initialize().await);

    // Shorter bound for the first request only
    let first = tokio::time::timeout(Duration::from_millis(100), agent.get_move(VIEW)).await;
    assert!(first.is_err());

    // The next request waits out the stale answer, then gets its own
    assert_eq!(agent.get_move(VIEW).await, 2);
    agent.cleanup().await;
}

#[tokio::test]
async fn test_chatty_stderr_does_not_block_replies() {
    // Well past a pipe buffer of diagnostics before the first answer
    let script = "yes 'agent diagnostics line' | head -c 200000 >&2; while read line; do echo 3; done";
    let mut agent = sh_agent(PlayerId::One, script);
    assert!(agent.initialize().await);

    let reply = tokio::time::timeout(Duration::from_secs(5), agent.get_move(VIEW)).await;
    assert_eq!(reply.ok(), Some(3));
    agent.cleanup().await;
    assert!(!agent.is_running());
}

#[tokio::test]
async fn test_cleanup_kills_agent_that_ignores_eof() {
    let mut agent = sh_agent(PlayerId::Two, "trap '' TERM; while true; do sleep 1; done");
    assert!(agent.initialize().await);

    let start = Instant::now();
    agent.cleanup().await;
    assert!(start.elapsed() < Duration::from_secs(4));
    assert!(!agent.is_running());
}

#[tokio::test]
async fn test_cleanup_drains_diagnostics() {
    let mut agent = sh_agent(
        PlayerId::One,
        "echo 'warming up' >&2; while read line; do echo 2; done; echo 'bye' >&2",
    );
    assert!(agent.initialize().await);
    assert_eq!(agent.get_move(VIEW).await, 2);
    agent.cleanup().await;
    assert!(!agent.is_running());
}

#[tokio::test]
async fn test_cleanup_is_safe_without_initialize() {
    let mut agent = sh_agent(PlayerId::One, "true");
    agent.cleanup().await;
    assert_eq!(agent.get_move(VIEW).await, SENTINEL_MOVE);
    agent.cleanup().await;
}

#[tokio::test]
async fn test_empty_command_fails_to_initialize() {
    let mut agent = SubprocessAgent::new(PlayerId::One, vec![]);
    assert!(!agent.initialize().await);
    agent.cleanup().await;
}

#[tokio::test]
async fn test_match_between_script_agents() {
    let game = GameState::with_players(
        8,
        Player::at(PlayerId::One, Coord::new(2, 6), 10),
        Player::at(PlayerId::Two, Coord::new(5, 2), 10),
    )
    .unwrap();
    let mut one = sh_agent(PlayerId::One, "while read line; do echo 2; done");
    let mut two = sh_agent(PlayerId::Two, "while read line; do echo 3; done");

    let report = Arena::with_board(8, 10)
        .run_game(game, &mut one, &mut two)
        .await
        .expect("match should finish");

    assert_eq!(report.winner(), Some(PlayerId::Two));
    assert_eq!(report.ticks, 2);
    assert!(!one.is_running());
    assert!(!two.is_running());
}

#[tokio::test]
async fn test_match_between_demo_agents() {
    let bin = env!("CARGO_BIN_EXE_random-agent");
    let mut one = SubprocessAgent::new(
        PlayerId::One,
        vec![bin.to_string(), "random".to_string(), "1".to_string()],
    );
    let mut two = SubprocessAgent::new(
        PlayerId::Two,
        vec![bin.to_string(), "random".to_string(), "2".to_string()],
    );

    let report = Arena::with_board(7, 4)
        .run(&mut one, &mut two)
        .await
        .expect("match should finish");

    assert!(report.ticks >= 1);
    assert!(report.final_state.game_over());
}
