use crate::progress::Snapshot;

/// Whole percent unless there is a meaningful fraction. Never shows 100%
/// before the goal is actually reached.
pub fn format_percent(val: f64) -> String {
    if (99.5..100.0).contains(&val) {
        "99%".to_string()
    } else if (val - val.round()).abs() < f64::EPSILON || val >= 10.0 {
        format!("{}%", val.round())
    } else {
        format!("{val:.1}%")
    }
}

pub fn days_left_label(snap: &Snapshot) -> String {
    match (snap.deadline_date, snap.days_left) {
        (None, _) => "Days Left: -".to_string(),
        (Some(_), 0) => "Days Left: 0 (due today)".to_string(),
        (Some(_), d) if d < 0 => format!("Days Left: {d} (overdue)"),
        (Some(_), d) => format!("Days Left: {d}"),
    }
}

pub fn words_per_day_label(snap: &Snapshot) -> String {
    if snap.word_goal == 0 {
        "Set a word goal to get started".to_string()
    } else if snap.goal_met() {
        "Goal reached!".to_string()
    } else {
        format!(
            "Need to write {} words per day to make it",
            snap.words_per_day_needed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ProgressState;
    use chrono::NaiveDate;

    fn snap(count: u64, goal: u64, deadline: Option<(i32, u32, u32)>) -> Snapshot {
        ProgressState {
            word_count: count,
            word_goal: goal,
            deadline_date: deadline.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        }
        .snapshot(NaiveDate::from_ymd_opt(2025, 1, 10).unwrap())
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(25.0), "25%");
        assert_eq!(format_percent(2.5), "2.5%");
        assert_eq!(format_percent(33.333), "33%");
        assert_eq!(format_percent(0.0), "0%");
        assert_eq!(format_percent(100.0), "100%");
    }

    #[test]
    fn almost_done_is_not_shown_as_done() {
        let nearly = snap(1992, 2000, None);
        assert_eq!(format_percent(nearly.percent_achieved), "99%");
        assert_eq!(format_percent(99.5), "99%");
        assert!(!nearly.goal_met());
        assert_eq!(format_percent(snap(2000, 2000, None).percent_achieved), "100%");
    }

    #[test]
    fn test_days_left_label() {
        assert_eq!(days_left_label(&snap(0, 0, None)), "Days Left: -");
        assert_eq!(days_left_label(&snap(0, 0, Some((2025, 1, 20)))), "Days Left: 10");
        assert_eq!(
            days_left_label(&snap(0, 0, Some((2025, 1, 8)))),
            "Days Left: -2 (overdue)"
        );
    }

    #[test]
    fn test_words_per_day_label() {
        assert_eq!(
            words_per_day_label(&snap(0, 0, None)),
            "Set a word goal to get started"
        );
        assert_eq!(words_per_day_label(&snap(10, 10, None)), "Goal reached!");
        assert_eq!(
            words_per_day_label(&snap(500, 2000, Some((2025, 1, 20)))),
            "Need to write 150 words per day to make it"
        );
    }
}
