//! Recurrence dialect translation.
//!
//! The source dialect (daily, weekly, absoluteMonthly, relativeMonthly,
//! absoluteYearly, relativeYearly, hourly) is wider than the destination's
//! four cycles, so some mappings are lossy. Every lossy mapping surfaces
//! as a run warning; unknown pattern types leave the task one-shot.

use crate::model::{QuickSetting, RepeatCycle};
use crate::report::ConversionSummary;
use crate::source::RecurrencePattern;
use crate::time::{clamped_date, day_string, parse_utc, weekday_index};
use chrono::{DateTime, Datelike, Utc};
use tracing::debug;

/// A recurrence pattern translated into the destination vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedRepeat {
    pub cycle: RepeatCycle,
    pub repeat_every: u32,
    /// Monday-first weekday flags; meaningful for weekly cycles only.
    pub weekdays: [bool; 7],
    /// Anchor day; set for monthly and yearly cycles only.
    pub start_date: Option<String>,
    pub quick_setting: QuickSetting,
}

/// Translate a source pattern. Returns `None` for unknown pattern types,
/// which leaves the owning task one-shot.
pub fn translate(
    pattern: &RecurrencePattern,
    due_raw: Option<&str>,
    created: DateTime<Utc>,
    title: &str,
    summary: &mut ConversionSummary,
) -> Option<TranslatedRepeat> {
    let mut interval = pattern.interval.clamp(1, i64::from(u32::MAX)) as u32;

    let cycle = match pattern.pattern_type.as_str() {
        "daily" => RepeatCycle::Daily,
        "weekly" => RepeatCycle::Weekly,
        "absoluteMonthly" => RepeatCycle::Monthly,
        "relativeMonthly" => {
            summary.warn(format!(
                "Task '{}': relative monthly recurrence downgraded to a fixed day-of-month rule",
                title
            ));
            RepeatCycle::Monthly
        }
        "absoluteYearly" => RepeatCycle::Yearly,
        "relativeYearly" => {
            summary.warn(format!(
                "Task '{}': relative yearly recurrence downgraded to a fixed-date rule",
                title
            ));
            RepeatCycle::Yearly
        }
        "hourly" => {
            summary.warn(format!(
                "Task '{}': hourly recurrence is not supported, falling back to daily",
                title
            ));
            interval = 1;
            RepeatCycle::Daily
        }
        other => {
            debug!(task = %title, pattern = %other, "Unknown recurrence type, keeping task one-shot");
            return None;
        }
    };

    let mut weekdays = [false; 7];
    if cycle == RepeatCycle::Weekly {
        let mut any = false;
        if let Some(days) = pattern.days_of_week.as_deref() {
            for day in days {
                if let Some(i) = weekday_name_index(day) {
                    weekdays[i] = true;
                    any = true;
                } else {
                    debug!(day = %day, "Ignoring unrecognized weekday name");
                }
            }
        }
        if !any {
            // No usable weekday set: repeat on the weekday the task was
            // created. A weekly rule must fire on at least one day.
            weekdays[weekday_index(created.date_naive())] = true;
        }
    }

    let start_date = match cycle {
        RepeatCycle::Monthly | RepeatCycle::Yearly => {
            Some(anchor_date(pattern, due_raw, created, cycle))
        }
        RepeatCycle::Daily | RepeatCycle::Weekly => None,
    };

    let quick_setting = classify(cycle, interval, &weekdays);

    Some(TranslatedRepeat {
        cycle,
        repeat_every: interval,
        weekdays,
        start_date,
        quick_setting,
    })
}

/// Resolve the anchor day for monthly and yearly cycles.
///
/// Priority: the due date's calendar day, then (monthly only) the
/// pattern's day-of-month joined with the creation month and clamped to
/// its last valid day, then the creation day.
fn anchor_date(
    pattern: &RecurrencePattern,
    due_raw: Option<&str>,
    created: DateTime<Utc>,
    cycle: RepeatCycle,
) -> String {
    if let Some(due) = due_raw.and_then(parse_utc) {
        return day_string(&due);
    }
    if cycle == RepeatCycle::Monthly
        && let Some(day) = pattern.day_of_month
        && let Some(date) = clamped_date(created.year(), created.month(), day)
    {
        return date.format("%Y-%m-%d").to_string();
    }
    day_string(&created)
}

/// Pick the preset shorthand for a translated pattern. Specific presets
/// win over the generic custom marker.
fn classify(cycle: RepeatCycle, repeat_every: u32, weekdays: &[bool; 7]) -> QuickSetting {
    if repeat_every != 1 {
        return QuickSetting::Custom;
    }
    match cycle {
        RepeatCycle::Daily => QuickSetting::Daily,
        RepeatCycle::Weekly => {
            let flagged = weekdays.iter().filter(|d| **d).count();
            if flagged == 1 {
                QuickSetting::WeeklyCurrentWeekday
            } else if weekdays[..5].iter().all(|d| *d) && !weekdays[5] && !weekdays[6] {
                QuickSetting::MondayToFriday
            } else {
                QuickSetting::Custom
            }
        }
        RepeatCycle::Monthly => QuickSetting::MonthlyCurrentDate,
        RepeatCycle::Yearly => QuickSetting::YearlyCurrentDate,
    }
}

/// Map a source weekday name to a Monday-first index.
fn weekday_name_index(name: &str) -> Option<usize> {
    match name.to_lowercase().as_str() {
        "monday" => Some(0),
        "tuesday" => Some(1),
        "wednesday" => Some(2),
        "thursday" => Some(3),
        "friday" => Some(4),
        "saturday" => Some(5),
        "sunday" => Some(6),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(kind: &str, interval: i64) -> RecurrencePattern {
        RecurrencePattern {
            pattern_type: kind.to_string(),
            interval,
            days_of_week: None,
            day_of_month: None,
        }
    }

    fn created_on(s: &str) -> DateTime<Utc> {
        parse_utc(s).unwrap()
    }

    #[test]
    fn daily_maps_directly() {
        let mut summary = ConversionSummary::new();
        let t = translate(
            &pattern("daily", 1),
            None,
            created_on("2024-01-10T08:00:00Z"),
            "Water plants",
            &mut summary,
        )
        .unwrap();

        assert_eq!(t.cycle, RepeatCycle::Daily);
        assert_eq!(t.repeat_every, 1);
        assert_eq!(t.quick_setting, QuickSetting::Daily);
        assert_eq!(t.start_date, None);
        assert!(summary.warnings.is_empty());
    }

    #[test]
    fn interval_is_clamped_to_one() {
        let mut summary = ConversionSummary::new();
        let t = translate(
            &pattern("daily", 0),
            None,
            created_on("2024-01-10T08:00:00Z"),
            "t",
            &mut summary,
        )
        .unwrap();
        assert_eq!(t.repeat_every, 1);

        let t = translate(
            &pattern("daily", 3),
            None,
            created_on("2024-01-10T08:00:00Z"),
            "t",
            &mut summary,
        )
        .unwrap();
        assert_eq!(t.repeat_every, 3);
        assert_eq!(t.quick_setting, QuickSetting::Custom);
    }

    #[test]
    fn weekly_without_days_uses_creation_weekday() {
        let mut summary = ConversionSummary::new();
        // 2024-01-10 is a Wednesday
        let t = translate(
            &pattern("weekly", 1),
            None,
            created_on("2024-01-10T08:00:00Z"),
            "Standup notes",
            &mut summary,
        )
        .unwrap();

        assert_eq!(t.cycle, RepeatCycle::Weekly);
        assert_eq!(
            t.weekdays,
            [false, false, true, false, false, false, false]
        );
        assert_eq!(t.quick_setting, QuickSetting::WeeklyCurrentWeekday);
    }

    #[test]
    fn weekly_with_explicit_days() {
        let mut summary = ConversionSummary::new();
        let mut p = pattern("weekly", 1);
        p.days_of_week = Some(vec![
            "monday".to_string(),
            "tuesday".to_string(),
            "wednesday".to_string(),
            "thursday".to_string(),
            "friday".to_string(),
        ]);
        let t = translate(
            &p,
            None,
            created_on("2024-01-13T08:00:00Z"),
            "t",
            &mut summary,
        )
        .unwrap();

        assert_eq!(t.weekdays, [true, true, true, true, true, false, false]);
        assert_eq!(t.quick_setting, QuickSetting::MondayToFriday);
    }

    #[test]
    fn weekly_with_only_garbage_days_falls_back() {
        let mut summary = ConversionSummary::new();
        let mut p = pattern("weekly", 1);
        p.days_of_week = Some(vec!["funday".to_string()]);
        // 2024-01-08 is a Monday
        let t = translate(
            &p,
            None,
            created_on("2024-01-08T08:00:00Z"),
            "t",
            &mut summary,
        )
        .unwrap();

        assert!(t.weekdays[0]);
        assert_eq!(t.weekdays.iter().filter(|d| **d).count(), 1);
    }

    #[test]
    fn hourly_degrades_to_daily_with_warning() {
        let mut summary = ConversionSummary::new();
        let t = translate(
            &pattern("hourly", 6),
            None,
            created_on("2024-01-10T08:00:00Z"),
            "Drink water",
            &mut summary,
        )
        .unwrap();

        assert_eq!(t.cycle, RepeatCycle::Daily);
        assert_eq!(t.repeat_every, 1);
        assert_eq!(t.quick_setting, QuickSetting::Daily);
        assert_eq!(summary.warnings.len(), 1);
        assert!(summary.warnings[0].contains("hourly"));
    }

    #[test]
    fn relative_patterns_degrade_with_warning() {
        let mut summary = ConversionSummary::new();
        let t = translate(
            &pattern("relativeMonthly", 1),
            None,
            created_on("2024-01-10T08:00:00Z"),
            "Review budget",
            &mut summary,
        )
        .unwrap();
        assert_eq!(t.cycle, RepeatCycle::Monthly);
        assert_eq!(summary.warnings.len(), 1);

        let t = translate(
            &pattern("relativeYearly", 1),
            None,
            created_on("2024-01-10T08:00:00Z"),
            "Renew insurance",
            &mut summary,
        )
        .unwrap();
        assert_eq!(t.cycle, RepeatCycle::Yearly);
        assert_eq!(summary.warnings.len(), 2);
    }

    #[test]
    fn unknown_pattern_yields_none_without_warning() {
        let mut summary = ConversionSummary::new();
        let t = translate(
            &pattern("fortnightly", 1),
            None,
            created_on("2024-01-10T08:00:00Z"),
            "t",
            &mut summary,
        );

        assert!(t.is_none());
        assert!(summary.warnings.is_empty());
    }

    #[test]
    fn anchor_prefers_due_date() {
        let mut summary = ConversionSummary::new();
        let t = translate(
            &pattern("absoluteMonthly", 1),
            Some("2024-03-15T00:00:00Z"),
            created_on("2024-01-10T08:00:00Z"),
            "Rent",
            &mut summary,
        )
        .unwrap();

        assert_eq!(t.start_date.as_deref(), Some("2024-03-15"));
        assert_eq!(t.quick_setting, QuickSetting::MonthlyCurrentDate);
    }

    #[test]
    fn anchor_clamps_day_of_month_to_creation_month() {
        let mut summary = ConversionSummary::new();
        let mut p = pattern("absoluteMonthly", 1);
        p.day_of_month = Some(31);
        let t = translate(
            &p,
            None,
            created_on("2024-02-10T08:00:00Z"),
            "Pay card",
            &mut summary,
        )
        .unwrap();

        assert_eq!(t.start_date.as_deref(), Some("2024-02-29"));
    }

    #[test]
    fn anchor_falls_back_to_creation_date() {
        let mut summary = ConversionSummary::new();
        let t = translate(
            &pattern("absoluteYearly", 1),
            Some("not a date"),
            created_on("2024-01-10T08:00:00Z"),
            "Anniversary",
            &mut summary,
        )
        .unwrap();

        assert_eq!(t.start_date.as_deref(), Some("2024-01-10"));
        assert_eq!(t.quick_setting, QuickSetting::YearlyCurrentDate);
    }

    #[test]
    fn daily_and_weekly_never_get_an_anchor() {
        let mut summary = ConversionSummary::new();
        let t = translate(
            &pattern("weekly", 1),
            Some("2024-03-15T00:00:00Z"),
            created_on("2024-01-10T08:00:00Z"),
            "t",
            &mut summary,
        )
        .unwrap();
        assert_eq!(t.start_date, None);
    }
}
