//! Community activity feed.

use crate::CommunityActivity;
use chrono::{DateTime, Duration, Utc};

/// Most recent activity first, truncated to `limit` entries
pub fn recent_activity(feed: &[CommunityActivity], limit: usize) -> Vec<&CommunityActivity> {
    let mut items: Vec<&CommunityActivity> = feed.iter().collect();
    items.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
    items.truncate(limit);
    items
}

/// Human-readable age of an event ("2 hours ago")
///
/// Timestamps in the future are reported as "just now".
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now - then;

    if elapsed < Duration::minutes(1) {
        return "just now".to_string();
    }

    let (amount, unit) = if elapsed < Duration::hours(1) {
        (elapsed.num_minutes(), "minute")
    } else if elapsed < Duration::days(1) {
        (elapsed.num_hours(), "hour")
    } else {
        (elapsed.num_days(), "day")
    };

    if amount == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", amount, unit)
    }
}

/// Built-in feed fixture, timestamped relative to `now`
pub fn default_feed(now: DateTime<Utc>) -> Vec<CommunityActivity> {
    let activity = |user: &str, action: &str, university: &str, ago: Duration| CommunityActivity {
        user: user.into(),
        action: action.into(),
        university: university.into(),
        occurred_at: now - ago,
    };

    vec![
        activity("Alex M.", "unlocked Front Lever", "MIT", Duration::hours(2)),
        activity("Sarah K.", "completed 50 push-ups challenge", "Harvard", Duration::hours(4)),
        activity("Mike R.", "achieved new handstand PR", "BU", Duration::hours(6)),
        activity("Emma T.", "joined Boston meetup group", "Northeastern", Duration::days(1)),
    ]
}
