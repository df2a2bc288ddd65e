//! # Birthday Commands
//!
//! `/set-birthday` and `/remove-birthday`. Dates are range-checked before anything
//! is scheduled: a rejected date never produces a follow-up.

use chrono::Datelike;
use std::sync::Arc;

use super::{ValidationError, bounded};
use crate::application::birthday::local_now;
use crate::application::records::{self, Birthday};
use crate::application::router::{CommandContext, RouteOutcome};
use crate::domain::interaction::CommandInvocation;
use crate::domain::types::FollowUp;
use crate::strings::messages;

pub const MIN_YEAR: i32 = 1900;

/// Checks `day`, `month` and `year` against their ranges.
pub fn validate_birthday(cmd: &CommandInvocation, current_year: i32) -> Result<Birthday, ValidationError> {
    let day = bounded(cmd.integer("day"), "day", 1, 31)?;
    let month = bounded(cmd.integer("month"), "month", 1, 12)?;
    let year = bounded(cmd.integer("year"), "year", MIN_YEAR.into(), current_year.into())?;
    Ok(Birthday {
        day: day as u32,
        month: month as u32,
        year: Some(year as i32),
    })
}

pub fn handle_set(ctx: &Arc<CommandContext>, cmd: &CommandInvocation) -> RouteOutcome {
    let (today, _) = local_now(&ctx.config.birthdays);
    let birthday = match validate_birthday(cmd, today.year()) {
        Ok(b) => b,
        Err(e) => {
            tracing::info!("Rejected set-birthday: {}", e);
            return RouteOutcome::Immediate(messages::INVALID_DATE.to_string());
        }
    };
    let Some(user_id) = cmd.target_user().map(str::to_string) else {
        return RouteOutcome::Immediate(messages::NO_TARGET_USER.to_string());
    };

    let store = ctx.store.clone();
    RouteOutcome::deferred(async move {
        records::set_birthday(store.as_ref(), &user_id, &birthday).await?;
        tracing::info!(user_id = %user_id, "Birthday saved");
        Ok(FollowUp::text(messages::birthday_set(
            &user_id,
            birthday.day,
            birthday.month,
            birthday.year.unwrap_or_default(),
        )))
    })
}

pub fn handle_remove(ctx: &Arc<CommandContext>, cmd: &CommandInvocation) -> RouteOutcome {
    let Some(user_id) = cmd.target_user().map(str::to_string) else {
        return RouteOutcome::Immediate(messages::NO_TARGET_USER.to_string());
    };
    let explicit = cmd.explicit_user().is_some();

    let store = ctx.store.clone();
    RouteOutcome::deferred(async move {
        let removed = records::remove_birthday(store.as_ref(), &user_id).await?;
        tracing::info!(user_id = %user_id, removed, "Birthday removal");
        let content = if explicit {
            messages::birthday_removed_for(&user_id)
        } else {
            messages::BIRTHDAY_REMOVED.to_string()
        };
        Ok(FollowUp::text(content))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::leaderboard::tests::FakeStats;
    use crate::application::router::tests::{context_with, invocation};
    use crate::domain::interaction::OptionValue;

    fn date(day: i64, month: i64, year: i64) -> CommandInvocation {
        invocation(
            "set-birthday",
            vec![
                ("day", OptionValue::Integer(day)),
                ("month", OptionValue::Integer(month)),
                ("year", OptionValue::Integer(year)),
            ],
        )
    }

    #[test]
    fn test_range_boundaries() {
        assert!(validate_birthday(&date(1, 1, 1900), 2026).is_ok());
        assert!(validate_birthday(&date(31, 12, 2026), 2026).is_ok());

        assert_eq!(
            validate_birthday(&date(32, 1, 2000), 2026),
            Err(ValidationError::OutOfRange { field: "day", value: 32, min: 1, max: 31 })
        );
        assert!(validate_birthday(&date(0, 1, 2000), 2026).is_err());
        assert!(validate_birthday(&date(1, 13, 2000), 2026).is_err());
        assert!(validate_birthday(&date(1, 0, 2000), 2026).is_err());
        assert!(validate_birthday(&date(1, 1, 1899), 2026).is_err());
        assert!(validate_birthday(&date(1, 1, 2027), 2026).is_err());
    }

    #[test]
    fn test_missing_option_is_rejected() {
        let cmd = invocation("set-birthday", vec![("day", OptionValue::Integer(1))]);
        assert_eq!(validate_birthday(&cmd, 2026), Err(ValidationError::Missing("month")));
    }

    #[test]
    fn test_invalid_date_answers_immediately() {
        let ctx = context_with(FakeStats::default(), vec![]);
        let outcome = handle_set(&ctx, &date(1, 13, 2000));
        assert!(matches!(outcome, RouteOutcome::Immediate(s) if s == messages::INVALID_DATE));
    }

    #[tokio::test]
    async fn test_valid_date_is_stored_in_background() {
        let ctx = context_with(FakeStats::default(), vec![]);
        let RouteOutcome::Deferred(task) = handle_set(&ctx, &date(24, 12, 1990)) else {
            panic!("expected deferred");
        };
        assert!(records::birthdays_on(ctx.store.as_ref(), 24, 12).await.unwrap().is_empty());

        let follow_up = task.await.unwrap();
        assert_eq!(follow_up.content, messages::birthday_set("42", 24, 12, 1990));
        let stored = records::birthdays_on(ctx.store.as_ref(), 24, 12).await.unwrap();
        assert_eq!(stored[0].0, "42");
    }

    #[tokio::test]
    async fn test_remove_for_other_user() {
        let ctx = context_with(FakeStats::default(), vec![]);
        let cmd = invocation("remove-birthday", vec![("user", OptionValue::User("7".into()))]);
        let RouteOutcome::Deferred(task) = handle_remove(&ctx, &cmd) else {
            panic!("expected deferred");
        };
        assert_eq!(task.await.unwrap().content, messages::birthday_removed_for("7"));
    }
}
