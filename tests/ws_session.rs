mod support;

use serde_json::json;
use shooting_gallery::game::ShotResult;
use shooting_gallery::ws::protocol::{GameSnapshot, ServerMsg};
use shooting_gallery::Config;

fn seeded_config() -> Config {
    Config {
        gallery_seed: Some(2024),
        fire_rate_limit: 100,
        ..Config::default()
    }
}

async fn opening(client: &mut support::Client) -> GameSnapshot {
    match support::next_msg(client).await {
        ServerMsg::Welcome { hud, .. } => assert_eq!(hud.starting_ammo, 6),
        other => panic!("expected welcome, got {other:?}"),
    }
    match support::next_msg(client).await {
        ServerMsg::Snapshot(snapshot) => snapshot,
        other => panic!("expected snapshot, got {other:?}"),
    }
}

#[tokio::test]
async fn shooting_a_target_spends_ammo_and_flashes_feedback() {
    let addr = support::spawn_server(seeded_config()).await;
    let mut client = support::connect(addr).await;

    let snapshot = opening(&mut client).await;
    assert_eq!(snapshot.ammo_remaining, 6);
    assert_eq!(snapshot.targets.len(), 3);

    // Nearest target to the camera along its own line of fire
    let target = snapshot
        .targets
        .iter()
        .min_by(|a, b| a.position[0].total_cmp(&b.position[0]))
        .expect("visible target")
        .clone();
    let [x, y, z] = target.position;
    support::send_json(
        &mut client,
        json!({
            "type": "fire",
            "seq": 1,
            "origin": [-7.6, y, z],
            "direction": [x + 7.6, 0.0, 0.0],
        }),
    )
    .await;

    match support::next_msg(&mut client).await {
        ServerMsg::ShotResult {
            seq,
            accepted,
            result,
            target_id,
        } => {
            assert_eq!(seq, 1);
            assert!(accepted);
            assert!(matches!(result, ShotResult::Real | ShotResult::Fake));
            assert_eq!(target_id, Some(target.id));
        }
        other => panic!("expected shot result, got {other:?}"),
    }

    match support::next_msg(&mut client).await {
        ServerMsg::Snapshot(snapshot) => {
            assert_eq!(snapshot.ammo_remaining, 5);
            assert_eq!(snapshot.ammo_label, "5 / 0");
            let feedback = snapshot.feedback.expect("feedback message");
            assert!(feedback.text == "wagmi" || feedback.text == "goodluck wasting ammo!");
        }
        other => panic!("expected snapshot, got {other:?}"),
    }

    // The message expires on its own after 1.5 seconds
    assert!(matches!(
        support::next_msg(&mut client).await,
        ServerMsg::FeedbackCleared
    ));
    match support::next_msg(&mut client).await {
        ServerMsg::Snapshot(snapshot) => assert!(snapshot.feedback.is_none()),
        other => panic!("expected snapshot, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_magazine_ends_the_game() {
    let addr = support::spawn_server(seeded_config()).await;
    let mut client = support::connect(addr).await;
    opening(&mut client).await;

    let fire_up = |seq: u32| {
        json!({
            "type": "fire",
            "seq": seq,
            "origin": [-7.6, 0.7, 0.0],
            "direction": [0.0, 1.0, 0.0],
        })
    };

    for seq in 1..=6 {
        support::send_json(&mut client, fire_up(seq)).await;
        match support::next_msg(&mut client).await {
            ServerMsg::ShotResult { result, .. } => assert_eq!(result, ShotResult::Miss),
            other => panic!("expected shot result, got {other:?}"),
        }
        support::next_msg(&mut client).await;
    }

    support::send_json(&mut client, fire_up(7)).await;
    match support::next_msg(&mut client).await {
        ServerMsg::ShotResult {
            accepted, result, ..
        } => {
            assert!(!accepted);
            assert_eq!(result, ShotResult::GameOver);
        }
        other => panic!("expected shot result, got {other:?}"),
    }
    match support::next_msg(&mut client).await {
        ServerMsg::Snapshot(snapshot) => {
            assert!(snapshot.ended);
            assert_eq!(snapshot.ammo_remaining, 0);
            assert_eq!(snapshot.feedback.map(|f| f.text).as_deref(), Some("Game Over"));
        }
        other => panic!("expected snapshot, got {other:?}"),
    }
}

#[tokio::test]
async fn connections_beyond_the_session_limit_are_refused() {
    let config = Config {
        max_sessions: 1,
        ..seeded_config()
    };
    let addr = support::spawn_server(config).await;

    let mut first = support::connect(addr).await;
    opening(&mut first).await;

    let mut second = support::connect(addr).await;
    match support::next_msg(&mut second).await {
        ServerMsg::Error { code, .. } => assert_eq!(code, "server_full"),
        other => panic!("expected error, got {other:?}"),
    }
}
