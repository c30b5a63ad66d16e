//! Tests for database repository operations.

use std::sync::Arc;
use tempfile::NamedTempFile;

use tictactoe_bot::{
    GameOutcome, GameRepository, GameState, GameStatus, GameStore, Mark, MoveEngine,
    MoveOutcome, MoveRequest, Position, Statistics, UserId,
};

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a ready repository.
fn setup_test_db() -> (NamedTempFile, GameRepository) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let repo = GameRepository::open(db_path).expect("Failed to open repository");
    (db_file, repo)
}

fn game_after(moves: &[(Position, Mark)]) -> GameState {
    let mut state = GameState::new();
    for &(pos, mark) in moves {
        state.apply(pos, mark);
    }
    state
}

#[test]
fn test_get_or_create_user_starts_fresh() {
    let (_db, repo) = setup_test_db();
    let user = repo
        .get_or_create_user("alice@example.com")
        .expect("Create failed");
    assert_eq!(user.user_key(), "alice@example.com");
    assert!(*user.id() > 0);
    assert_eq!(user.statistics(), Statistics::default());
    assert_eq!(user.game_state().expect("Decode failed"), GameState::new());
}

#[test]
fn test_get_or_create_user_is_idempotent() {
    let (_db, repo) = setup_test_db();
    let first = repo.get_or_create_user("bob@example.com").expect("Create failed");
    let second = repo.get_or_create_user("bob@example.com").expect("Get failed");
    assert_eq!(first.id(), second.id());
    assert_eq!(repo.list_users().expect("List failed").len(), 1);
}

#[test]
fn test_get_user_not_found() {
    let (_db, repo) = setup_test_db();
    let found = repo.get_user("nobody@example.com").expect("Query failed");
    assert!(found.is_none());
}

#[test]
fn test_list_users_ordered_by_creation() {
    let (_db, repo) = setup_test_db();
    for key in ["alpha", "beta", "gamma"] {
        repo.get_or_create_user(key).expect("Create failed");
    }

    let users = repo.list_users().expect("List failed");
    let keys: Vec<_> = users.iter().map(|u| u.user_key().as_str()).collect();
    assert_eq!(keys, ["alpha", "beta", "gamma"]);
}

#[test]
fn test_save_current_game_round_trips() {
    let (_db, repo) = setup_test_db();
    let state = game_after(&[
        (Position::Center, Mark::X),
        (Position::TopLeft, Mark::O),
    ]);

    repo.save_current_game("carol", &state).expect("Save failed");

    let user = repo.get_user("carol").expect("Query failed").expect("User missing");
    assert_eq!(user.game_state().expect("Decode failed"), state);
    assert_eq!(user.statistics(), Statistics::default());
}

#[test]
fn test_record_outcome_counts_and_resets() {
    let (_db, repo) = setup_test_db();
    let state = game_after(&[(Position::Center, Mark::X), (Position::TopLeft, Mark::O)]);
    repo.save_current_game("dave", &state).expect("Save failed");

    let user = repo.record_outcome("dave", GameOutcome::Win).expect("Record failed");
    assert_eq!(user.statistics(), Statistics::new(1, 1, 0));
    assert_eq!(user.game_state().expect("Decode failed"), GameState::new());

    let user = repo.record_outcome("dave", GameOutcome::Loss).expect("Record failed");
    assert_eq!(user.statistics(), Statistics::new(2, 1, 1));
}

#[test]
fn test_record_draw_counts_as_loss() {
    let (_db, repo) = setup_test_db();
    let user = repo.record_outcome("erin", GameOutcome::Draw).expect("Record failed");
    assert_eq!(*user.games_played(), 1);
    assert_eq!(*user.wins(), 0);
    assert_eq!(*user.losses(), 1);
}

#[test]
fn test_reopen_keeps_data() {
    let (db, repo) = setup_test_db();
    repo.record_outcome("frank", GameOutcome::Win).expect("Record failed");

    let path = db.path().to_str().expect("Invalid path").to_string();
    let reopened = GameRepository::open(path).expect("Reopen failed");
    let user = reopened.get_user("frank").expect("Query failed").expect("User missing");
    assert_eq!(user.statistics(), Statistics::new(1, 1, 0));
}

#[test]
fn test_open_bad_path_fails() {
    let result = GameRepository::open("/nonexistent/dir/games.db".to_string());
    assert!(result.is_err());
}

#[tokio::test]
async fn test_store_creates_user_on_first_load() {
    let (_db, repo) = setup_test_db();
    let user = UserId::from("gina@example.com");

    let state = repo.load_game_state(&user).await.expect("Load failed");
    assert_eq!(state, GameState::new());
    assert!(repo.get_user("gina@example.com").expect("Query failed").is_some());
}

#[tokio::test]
async fn test_store_save_then_load() {
    let (_db, repo) = setup_test_db();
    let user = UserId::from("hank@example.com");
    let state = game_after(&[(Position::TopRight, Mark::X), (Position::Center, Mark::O)]);

    repo.save_in_progress_state(&user, &state).await.expect("Save failed");
    let loaded = repo.load_game_state(&user).await.expect("Load failed");
    assert_eq!(loaded, state);
    assert_eq!(loaded.status(), GameStatus::InProgress);
    assert_eq!(loaded.current_player(), Mark::X);
}

#[tokio::test]
async fn test_store_record_outcome_returns_statistics() {
    let (_db, repo) = setup_test_db();
    let user = UserId::from("iris@example.com");
    let state = game_after(&[(Position::TopRight, Mark::X), (Position::Center, Mark::O)]);
    repo.save_in_progress_state(&user, &state).await.expect("Save failed");

    let stats = repo
        .record_outcome_and_reset_state(&user, GameOutcome::Draw)
        .await
        .expect("Record failed");
    assert_eq!(stats, Statistics::new(1, 0, 1));

    let profile = repo.load_profile(&user).await.expect("Profile failed");
    assert_eq!(profile.user_id(), &user);
    assert_eq!(profile.statistics(), &stats);
    assert_eq!(profile.current_game(), &GameState::new());
}

#[tokio::test]
async fn test_store_users_are_independent() {
    let (_db, repo) = setup_test_db();
    let a = UserId::from("a@example.com");
    let b = UserId::from("b@example.com");

    let state = game_after(&[(Position::Center, Mark::X), (Position::TopLeft, Mark::O)]);
    repo.save_in_progress_state(&a, &state)
        .await
        .expect("Save failed");
    repo.record_outcome_and_reset_state(&b, GameOutcome::Win)
        .await
        .expect("Record failed");

    let a_profile = repo.load_profile(&a).await.expect("Profile failed");
    assert_eq!(a_profile.statistics(), &Statistics::default());
    assert_eq!(a_profile.current_game().board().occupied_count(), 2);

    let b_profile = repo.load_profile(&b).await.expect("Profile failed");
    assert_eq!(b_profile.statistics(), &Statistics::new(1, 1, 0));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_moves_for_different_users_all_succeed() {
    let (_db, repo) = setup_test_db();
    let engine = Arc::new(MoveEngine::with_seed(repo.clone(), 3));

    let tasks: Vec<_> = (0..64)
        .map(|i| {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move {
                let user = UserId::from(format!("u{i}@example.com"));
                engine
                    .handle_move(&user, "hard", MoveRequest::new(1, 1))
                    .await
            })
        })
        .collect();

    for task in tasks {
        let outcome = task.await.expect("Task panicked").expect("Move failed");
        assert!(matches!(outcome, MoveOutcome::Played(_)));
    }

    let users = repo.list_users().expect("List failed");
    assert_eq!(users.len(), 64);
    for user in users {
        assert_eq!(user.game_state().expect("Decode failed").board().occupied_count(), 2);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_first_login_and_first_load_do_not_collide() {
    for round in 0..20 {
        let (_db, repo) = setup_test_db();
        let user = UserId::from(format!("fresh{round}@example.com"));

        let (profile, state) =
            tokio::join!(repo.load_profile(&user), repo.load_game_state(&user));
        assert_eq!(profile.expect("Profile failed").current_game(), &GameState::new());
        assert_eq!(state.expect("Load failed"), GameState::new());
        assert_eq!(repo.list_users().expect("List failed").len(), 1);
    }
}
