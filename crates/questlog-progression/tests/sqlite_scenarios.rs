// SPDX-FileCopyrightText: 2026 Questlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Progression scenarios against the real SQLite store.

use std::sync::Arc;

use questlog_core::{AttributeSpend, CharacterStore, QuestStatus, QuestlogError};
use questlog_progression::{LevelingRules, ProgressionEngine, QuestEngine};
use questlog_test_utils::TestHarness;

async fn engines() -> (TestHarness, ProgressionEngine, QuestEngine) {
    let harness = TestHarness::new().await.expect("harness");
    let store = Arc::new(harness.store.clone());
    let rules = LevelingRules::default();
    let progression = ProgressionEngine::new(store.clone(), rules);
    let quests = QuestEngine::new(store, rules);
    (harness, progression, quests)
}

#[tokio::test]
async fn journal_of_a_new_character() {
    let (_harness, progression, quests) = engines().await;

    let c = progression
        .create_character("user-1", "Aria", "Rogue", None)
        .await
        .unwrap();

    let grant = progression.grant_xp(&c.id, 350).await.unwrap();
    assert!(grant.leveled_up);
    assert_eq!(grant.levels_gained, 2);
    assert_eq!((grant.character.level, grant.character.xp), (3, 50));
    assert_eq!(grant.character.attribute_points, 15);

    let spent = progression
        .spend_attribute_points(
            &c.id,
            AttributeSpend {
                strength: 5,
                defense: 5,
                vitality: 5,
                mana: 0,
            },
        )
        .await
        .unwrap();
    assert_eq!(spent.attribute_points, 0);
    assert_eq!(spent.attributes.total(), 55);

    let quest = quests
        .create_quest("user-1", "Journal every day", "for a week", 300)
        .await
        .unwrap();
    let done = quests.complete_quest(&quest.id).await.unwrap();
    assert_eq!(done.status, QuestStatus::Completed);

    let final_state = progression.get_character(&c.id).await.unwrap();
    assert_eq!((final_state.level, final_state.xp), (4, 50));
    assert_eq!(final_state.attribute_points, 5);

    let listed = quests.get_user_quests("user-1").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].is_completed());
}

#[tokio::test]
async fn stale_save_is_a_conflict() {
    let (harness, progression, _quests) = engines().await;
    let c = progression
        .create_character("user-1", "Bram", "warrior", None)
        .await
        .unwrap();

    progression.grant_xp(&c.id, 10).await.unwrap();

    let err = harness.store.update_character(&c).await.unwrap_err();
    assert!(matches!(err, QuestlogError::Conflict { .. }));
    assert_eq!(progression.get_character(&c.id).await.unwrap().xp, 10);
}

#[tokio::test]
async fn missing_records_are_not_found() {
    let (_harness, progression, quests) = engines().await;
    assert!(matches!(
        progression.get_character("nope").await,
        Err(QuestlogError::NotFound { .. })
    ));
    assert!(matches!(
        progression.get_character_by_user("nobody").await,
        Err(QuestlogError::NotFound { .. })
    ));
    assert!(matches!(
        quests.complete_quest("nope").await,
        Err(QuestlogError::NotFound { .. })
    ));
}

#[tokio::test]
async fn duplicate_completion_signals_grant_once() {
    let (_harness, progression, quests) = engines().await;
    let c = progression
        .create_character("user-1", "Cora", "mage", None)
        .await
        .unwrap();
    let quest = quests
        .create_quest("user-1", "Stretch", "", 150)
        .await
        .unwrap();

    let (first, second) = tokio::join!(
        quests.complete_quest(&quest.id),
        quests.complete_quest(&quest.id)
    );
    assert_eq!(first.unwrap().status, QuestStatus::Completed);
    assert_eq!(second.unwrap().status, QuestStatus::Completed);

    let after = progression.get_character(&c.id).await.unwrap();
    assert_eq!((after.level, after.xp), (2, 50));
    assert_eq!(after.attribute_points, 10);
}
