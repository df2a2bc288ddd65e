//! # League Commands
//!
//! Account linking (`/add-league-account`, `/remove-league-account`), single-player
//! profiles (`/ranked`, `/flex`) and the leaderboards (`/ranked-race`, `/flex-race`).
//! Everything that touches the Riot API runs deferred.

use std::sync::Arc;

use crate::application::formatter::{leaderboard_embed, profile_embed};
use crate::application::leaderboard::build_leaderboard;
use crate::application::profile::{ProfileOutcome, load_profile};
use crate::application::records;
use crate::application::router::{CommandContext, RouteOutcome};
use crate::domain::interaction::CommandInvocation;
use crate::domain::ranked::QueueKind;
use crate::domain::types::FollowUp;
use crate::strings::messages;

fn non_empty<'a>(cmd: &'a CommandInvocation, name: &str) -> Option<&'a str> {
    cmd.string(name).map(str::trim).filter(|s| !s.is_empty())
}

pub fn handle_add_account(ctx: &Arc<CommandContext>, cmd: &CommandInvocation) -> RouteOutcome {
    let (Some(game_name), Some(tag_line)) = (
        non_empty(cmd, "game-name"),
        non_empty(cmd, "tag-line").map(|t| t.trim_start_matches('#')),
    ) else {
        return RouteOutcome::Immediate(messages::MISSING_RIOT_ID.to_string());
    };
    let Some(user_id) = cmd.target_user().map(str::to_string) else {
        return RouteOutcome::Immediate(messages::NO_TARGET_USER.to_string());
    };

    let store = ctx.store.clone();
    let stats = ctx.stats.clone();
    let game_name = game_name.to_string();
    let tag_line = tag_line.to_string();
    RouteOutcome::deferred(async move {
        let Some(identity) = stats.lookup_riot_id(&game_name, &tag_line).await? else {
            return Ok(FollowUp::text(messages::riot_account_not_found(&game_name, &tag_line)));
        };
        records::link_account(store.as_ref(), &user_id, &identity.puuid).await?;
        tracing::info!(user_id = %user_id, riot_id = %identity.display_name(), "League account linked");
        Ok(FollowUp::text(messages::riot_account_linked(
            &identity.display_name(),
            &user_id,
        )))
    })
}

pub fn handle_remove_account(ctx: &Arc<CommandContext>, cmd: &CommandInvocation) -> RouteOutcome {
    let Some(user_id) = cmd.target_user().map(str::to_string) else {
        return RouteOutcome::Immediate(messages::NO_TARGET_USER.to_string());
    };
    let explicit = cmd.explicit_user().is_some();

    let store = ctx.store.clone();
    RouteOutcome::deferred(async move {
        if !records::unlink_account(store.as_ref(), &user_id).await? {
            return Ok(FollowUp::text(messages::account_not_linked(&user_id)));
        }
        tracing::info!(user_id = %user_id, "League account unlinked");
        let content = if explicit {
            messages::account_removed_for(&user_id)
        } else {
            messages::ACCOUNT_REMOVED.to_string()
        };
        Ok(FollowUp::text(content))
    })
}

pub fn handle_profile(ctx: &Arc<CommandContext>, cmd: &CommandInvocation, queue: QueueKind) -> RouteOutcome {
    let Some(user_id) = cmd.target_user().map(str::to_string) else {
        return RouteOutcome::Immediate(messages::NO_TARGET_USER.to_string());
    };

    let ctx = ctx.clone();
    RouteOutcome::deferred(async move {
        let outcome = load_profile(
            ctx.store.as_ref(),
            ctx.stats.as_ref(),
            &user_id,
            queue,
            ctx.config.riot.match_history,
        )
        .await?;
        Ok(match outcome {
            ProfileOutcome::NotLinked => FollowUp::text(messages::account_not_linked(&user_id)),
            ProfileOutcome::NoData => FollowUp::text(messages::NO_DATA),
            ProfileOutcome::Found(profile) => FollowUp::embed(profile_embed(&profile)),
        })
    })
}

pub fn handle_race(ctx: &Arc<CommandContext>, queue: QueueKind) -> RouteOutcome {
    let ctx = ctx.clone();
    RouteOutcome::deferred(async move {
        let accounts = records::all_linked_accounts(ctx.store.as_ref()).await?;
        if accounts.is_empty() {
            return Ok(FollowUp::text(messages::NO_ACCOUNTS_LINKED));
        }
        let rows = build_leaderboard(ctx.stats.as_ref(), accounts, queue).await;
        let title = format!("{} Leaderboard", queue.label());
        Ok(FollowUp::embed(leaderboard_embed(&title, &rows)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::leaderboard::tests::{FakeStats, solo};
    use crate::application::router::tests::{context_with, invocation};
    use crate::domain::interaction::OptionValue;
    use crate::domain::ranked::{Division, Tier};
    use crate::domain::traits::RecordStore;
    use crate::infrastructure::store::FileStore;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts table scans on top of an in-memory store.
    struct CountingStore {
        inner: FileStore,
        scans: AtomicUsize,
    }

    #[async_trait]
    impl RecordStore for CountingStore {
        async fn get_record(&self, table: &str, key: &str) -> anyhow::Result<Option<Value>> {
            self.inner.get_record(table, key).await
        }

        async fn upsert_record(&self, table: &str, key: &str, fields: Value) -> anyhow::Result<()> {
            self.inner.upsert_record(table, key, fields).await
        }

        async fn delete_record(&self, table: &str, key: &str) -> anyhow::Result<bool> {
            self.inner.delete_record(table, key).await
        }

        async fn list_records(&self, table: &str) -> anyhow::Result<Vec<(String, Value)>> {
            self.scans.fetch_add(1, Ordering::SeqCst);
            self.inner.list_records(table).await
        }
    }

    async fn run(outcome: RouteOutcome) -> FollowUp {
        match outcome {
            RouteOutcome::Deferred(task) => task.await.unwrap(),
            RouteOutcome::Immediate(s) => panic!("expected deferred, got immediate: {s}"),
        }
    }

    #[test]
    fn test_add_account_requires_both_parts() {
        let ctx = context_with(FakeStats::default(), vec![]);
        let cmd = invocation("add-league-account", vec![("game-name", OptionValue::String("x".into()))]);
        assert!(matches!(
            handle_add_account(&ctx, &cmd),
            RouteOutcome::Immediate(s) if s == messages::MISSING_RIOT_ID
        ));
    }

    #[tokio::test]
    async fn test_add_then_remove_account() {
        let stats = FakeStats::default().with_player("p1", None);
        let ctx = context_with(stats, vec![]);
        let add = invocation(
            "add-league-account",
            vec![
                ("game-name", OptionValue::String("name-p1".into())),
                ("tag-line", OptionValue::String("#EUW".into())),
            ],
        );
        let follow_up = run(handle_add_account(&ctx, &add)).await;
        assert_eq!(follow_up.content, messages::riot_account_linked("name-p1#EUW", "42"));
        let linked = records::linked_account(ctx.store.as_ref(), "42").await.unwrap().unwrap();
        assert_eq!(linked.puuid, "p1");

        let remove = invocation("remove-league-account", vec![]);
        assert_eq!(run(handle_remove_account(&ctx, &remove)).await.content, messages::ACCOUNT_REMOVED);
        assert_eq!(
            run(handle_remove_account(&ctx, &remove)).await.content,
            messages::account_not_linked("42")
        );
    }

    #[tokio::test]
    async fn test_unknown_riot_id() {
        let ctx = context_with(FakeStats::default(), vec![]);
        let add = invocation(
            "add-league-account",
            vec![
                ("game-name", OptionValue::String("ghost".into())),
                ("tag-line", OptionValue::String("EUW".into())),
            ],
        );
        let follow_up = run(handle_add_account(&ctx, &add)).await;
        assert_eq!(follow_up.content, messages::riot_account_not_found("ghost", "EUW"));
    }

    #[tokio::test]
    async fn test_profile_for_unlinked_user() {
        let ctx = context_with(FakeStats::default(), vec![]);
        let follow_up = run(handle_profile(&ctx, &invocation("ranked", vec![]), QueueKind::SoloDuo)).await;
        assert_eq!(follow_up.content, messages::account_not_linked("42"));
    }

    #[tokio::test]
    async fn test_profile_renders_embed() {
        let stats = FakeStats::default().with_player("p1", Some(solo(Tier::Diamond, Some(Division::III), 12)));
        let ctx = context_with(stats, vec![]);
        records::link_account(ctx.store.as_ref(), "42", "p1").await.unwrap();
        let follow_up = run(handle_profile(&ctx, &invocation("ranked", vec![]), QueueKind::SoloDuo)).await;
        assert_eq!(follow_up.embeds[0].title.as_deref(), Some("name-p1#EUW"));
    }

    #[tokio::test]
    async fn test_race_scans_accounts_once() {
        let stats = FakeStats::default()
            .with_player("p1", Some(solo(Tier::Gold, Some(Division::II), 40)))
            .with_player("p2", Some(solo(Tier::Platinum, Some(Division::IV), 0)));
        let base = context_with(stats, vec![]);
        let store = Arc::new(CountingStore {
            inner: FileStore::in_memory(),
            scans: AtomicUsize::new(0),
        });
        records::link_account(store.as_ref(), "1", "p1").await.unwrap();
        records::link_account(store.as_ref(), "2", "p2").await.unwrap();
        let ctx = Arc::new(CommandContext {
            config: base.config.clone(),
            store: store.clone(),
            stats: base.stats.clone(),
            media: base.media.clone(),
        });

        let follow_up = run(handle_race(&ctx, QueueKind::SoloDuo)).await;
        assert_eq!(store.scans.load(Ordering::SeqCst), 1);
        assert_eq!(follow_up.embeds.len(), 1);
    }

    #[tokio::test]
    async fn test_race_without_accounts() {
        let ctx = context_with(FakeStats::default(), vec![]);
        let follow_up = run(handle_race(&ctx, QueueKind::Flex)).await;
        assert_eq!(follow_up.content, messages::NO_ACCOUNTS_LINKED);
        assert!(follow_up.embeds.is_empty());
    }
}
