//! Integration tests for the team-rooms service
//!
//! These tests validate the room flows working together over the in-memory
//! platform: the provision-then-reclaim lifecycle, the periodic sweep, the
//! team randomize command, and interleavings of the two reclamation paths.

mod fixtures;

use fixtures::{create_test_system, fill_channel, join, leave};
use std::collections::HashSet;
use team_rooms::rooms::{REQUIRED_PLAYERS, TEAM_SIZE};
use team_rooms::VoicePlatform;
use team_rooms::types::{CommandIssuer, RandomizeOutcome, UserId};

#[tokio::test]
async fn test_lobby_join_to_reclaim_lifecycle() {
    let system = create_test_system();

    // Member M joins the lobby: one room created, M relocated, registry = {id}
    let room = system
        .provisioner
        .handle_transition(system.platform.as_ref(), &join(1, "M", system.lobby))
        .await
        .unwrap()
        .expect("room should be provisioned");

    assert_eq!(system.platform.channel_name(room).as_deref(), Some("M's team"));
    assert_eq!(
        system
            .platform
            .voice_channel_members(room)
            .await
            .unwrap(),
        vec![UserId(1)]
    );
    assert_eq!(system.registry.snapshot(), vec![room]);

    // M leaves voice entirely: room is empty, gets deleted, registry = {}
    system.platform.disconnect_member(UserId(1));
    system
        .reclaimer
        .handle_departure(system.platform.as_ref(), &leave(1, "M", room))
        .await
        .unwrap();

    assert!(!system.platform.channel_exists(room));
    assert!(system.registry.is_empty());
}

#[tokio::test]
async fn test_lobby_channel_itself_is_never_reclaimed() {
    let system = create_test_system();

    // A member enters and leaves the lobby without triggering provisioning
    system
        .reclaimer
        .handle_departure(system.platform.as_ref(), &leave(1, "M", system.lobby))
        .await
        .unwrap();

    assert!(system.platform.channel_exists(system.lobby));
}

#[tokio::test]
async fn test_sweep_reclaims_room_missed_by_reactive_path() {
    let system = create_test_system();

    let room = system
        .provisioner
        .handle_transition(system.platform.as_ref(), &join(1, "M", system.lobby))
        .await
        .unwrap()
        .unwrap();

    // The member is disconnected without the watched transition firing
    // (e.g. kicked), so only the sweep can notice the empty room
    system.platform.disconnect_member(UserId(1));

    let report = system.reclaimer.sweep(system.platform.as_ref()).await.unwrap();
    assert_eq!(report.reclaimed, 1);
    assert!(!system.platform.channel_exists(room));
    assert!(system.registry.is_empty());
}

#[tokio::test]
async fn test_sweep_leaves_occupied_room_registered() {
    let system = create_test_system();

    let room = system
        .provisioner
        .handle_transition(system.platform.as_ref(), &join(1, "M", system.lobby))
        .await
        .unwrap()
        .unwrap();

    let report = system.reclaimer.sweep(system.platform.as_ref()).await.unwrap();

    assert_eq!(report.reclaimed, 0);
    assert_eq!(report.occupied, 1);
    assert!(system.platform.channel_exists(room));
    assert!(system.registry.contains(room));
}

#[tokio::test]
async fn test_ten_member_randomize_grows_registry_by_two() {
    let system = create_test_system();
    let scrims = system.platform.add_channel("scrims", None);
    let members = fill_channel(&system.platform, scrims, REQUIRED_PLAYERS);

    let issuer = CommandIssuer {
        user: members[0],
        holds_required_role: true,
        voice_channel: Some(scrims),
    };

    let outcome = system
        .randomizer
        .randomize(system.platform.as_ref(), &issuer)
        .await
        .unwrap();

    assert_eq!(
        outcome.reply_text(),
        "Players have been randomized into two teams!"
    );
    let RandomizeOutcome::TeamsCreated {
        team_one_channel,
        team_two_channel,
    } = outcome
    else {
        panic!("expected team creation, got {:?}", outcome);
    };

    assert_eq!(system.registry.len(), 2);

    let team_one: HashSet<UserId> = system
        .platform
        .voice_channel_members(team_one_channel)
        .await
        .unwrap()
        .into_iter()
        .collect();
    let team_two: HashSet<UserId> = system
        .platform
        .voice_channel_members(team_two_channel)
        .await
        .unwrap()
        .into_iter()
        .collect();

    assert_eq!(team_one.len(), TEAM_SIZE);
    assert_eq!(team_two.len(), TEAM_SIZE);
    assert!(team_one.is_disjoint(&team_two));
    assert_eq!(
        team_one.union(&team_two).copied().collect::<HashSet<_>>(),
        members.into_iter().collect()
    );
}

#[tokio::test]
async fn test_randomized_team_rooms_are_reclaimed_once_empty() {
    let system = create_test_system();
    let scrims = system.platform.add_channel("scrims", None);
    let members = fill_channel(&system.platform, scrims, REQUIRED_PLAYERS);

    let issuer = CommandIssuer {
        user: members[0],
        holds_required_role: true,
        voice_channel: Some(scrims),
    };
    system
        .randomizer
        .randomize(system.platform.as_ref(), &issuer)
        .await
        .unwrap();
    assert_eq!(system.registry.len(), 2);

    // Everyone disconnects after the match
    for member in &members {
        system.platform.disconnect_member(*member);
    }

    let report = system.reclaimer.sweep(system.platform.as_ref()).await.unwrap();
    assert_eq!(report.reclaimed, 2);
    assert!(system.registry.is_empty());
    // The source channel was never system-owned and survives
    assert!(system.platform.channel_exists(scrims));
}

#[tokio::test]
async fn test_reactive_and_sweep_interleaving_is_harmless() {
    let system = create_test_system();

    let room = system
        .provisioner
        .handle_transition(system.platform.as_ref(), &join(1, "M", system.lobby))
        .await
        .unwrap()
        .unwrap();
    system.platform.disconnect_member(UserId(1));

    // Both reclamation paths observe the same empty room concurrently
    let departure = leave(1, "M", room);
    let (reactive, sweep) = futures::join!(
        system
            .reclaimer
            .handle_departure(system.platform.as_ref(), &departure),
        system.reclaimer.sweep(system.platform.as_ref()),
    );

    reactive.unwrap();
    sweep.unwrap();

    // Exactly one deletion takes effect; duplicates are ignored
    assert!(!system.platform.channel_exists(room));
    assert!(system.registry.is_empty());

    // A second sweep afterwards deletes nothing new
    let report = system.reclaimer.sweep(system.platform.as_ref()).await.unwrap();
    assert_eq!(report.examined, 0);
}

#[tokio::test]
async fn test_externally_deleted_room_is_dropped_by_sweep() {
    let system = create_test_system();

    let room = system
        .provisioner
        .handle_transition(system.platform.as_ref(), &join(1, "M", system.lobby))
        .await
        .unwrap()
        .unwrap();

    // A moderator deletes the room by hand
    system.platform.drop_channel(room);

    let report = system.reclaimer.sweep(system.platform.as_ref()).await.unwrap();
    assert_eq!(report.vanished, 1);
    assert!(system.registry.is_empty());
}

#[tokio::test]
async fn test_multiple_lobby_joins_provision_distinct_rooms() {
    let system = create_test_system();

    let first = system
        .provisioner
        .handle_transition(system.platform.as_ref(), &join(1, "alice", system.lobby))
        .await
        .unwrap()
        .unwrap();
    let second = system
        .provisioner
        .handle_transition(system.platform.as_ref(), &join(2, "bob", system.lobby))
        .await
        .unwrap()
        .unwrap();

    assert_ne!(first, second);
    assert_eq!(system.registry.len(), 2);
    assert_eq!(system.platform.channel_name(first).as_deref(), Some("alice's team"));
    assert_eq!(system.platform.channel_name(second).as_deref(), Some("bob's team"));
}
