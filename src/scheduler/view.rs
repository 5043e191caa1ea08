//! View projection: grouping, filtering, and derived counts
//!
//! Pure functions from the slot set and the user's filter state to what the
//! display layer shows: date groups in chronological order, per-date and
//! aggregate counts, relative date labels. Aggregate counts always come from
//! the unfiltered set, so hiding a group can never change the summary
//! numbers.

use crate::api::Slot;
use chrono::{Duration, NaiveDate};
use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

/// Status filter over the slot set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Available,
    Booked,
}

impl StatusFilter {
    fn matches(&self, slot: &Slot) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Available => !slot.is_booked,
            StatusFilter::Booked => slot.is_booked,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "all" => Ok(StatusFilter::All),
            "available" | "open" => Ok(StatusFilter::Available),
            "booked" => Ok(StatusFilter::Booked),
            other => Err(format!(
                "unknown filter {:?}, expected all, available, or booked",
                other
            )),
        }
    }
}

/// The user's active filter choices
#[derive(Debug, Clone)]
pub struct ViewFilters {
    pub status: StatusFilter,
    pub show_booked: bool,
    pub selected_date: Option<NaiveDate>,
}

impl Default for ViewFilters {
    fn default() -> Self {
        Self {
            status: StatusFilter::All,
            show_booked: true,
            selected_date: None,
        }
    }
}

/// Filter choices plus per-group collapse state
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub filters: ViewFilters,
    collapsed: HashSet<NaiveDate>,
}

impl ViewState {
    /// Flip one date group between collapsed and expanded
    pub fn toggle_collapsed(&mut self, date: NaiveDate) {
        if !self.collapsed.remove(&date) {
            self.collapsed.insert(date);
        }
    }

    pub fn is_collapsed(&self, date: NaiveDate) -> bool {
        self.collapsed.contains(&date)
    }

    /// Reset every filter to its default; collapse state is kept
    pub fn clear_filters(&mut self) {
        self.filters = ViewFilters::default();
    }
}

/// Aggregate slot counts, always computed from the unfiltered set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlotCounts {
    pub total: usize,
    pub available: usize,
    pub booked: usize,
    /// Distinct calendar dates carrying at least one slot
    pub days: usize,
}

impl SlotCounts {
    pub fn tally(slots: &[Slot]) -> Self {
        let booked = slots.iter().filter(|s| s.is_booked).count();
        let days = slots.iter().map(|s| s.date).collect::<HashSet<_>>().len();
        Self {
            total: slots.len(),
            available: slots.len() - booked,
            booked,
            days,
        }
    }
}

/// Slots bucketed by calendar date (time of day discarded)
///
/// `BTreeMap` keys iterate in `NaiveDate` order, which is chronological,
/// never string order.
pub fn group_by_date(slots: &[Slot]) -> BTreeMap<NaiveDate, Vec<Slot>> {
    let mut groups: BTreeMap<NaiveDate, Vec<Slot>> = BTreeMap::new();
    for slot in slots {
        groups.entry(slot.date).or_default().push(slot.clone());
    }
    groups
}

/// Group keys in ascending chronological order
pub fn sorted_date_keys(groups: &BTreeMap<NaiveDate, Vec<Slot>>) -> Vec<NaiveDate> {
    groups.keys().copied().collect()
}

/// One displayed date group
#[derive(Debug, Clone)]
pub struct DayGroup {
    pub date: NaiveDate,
    /// Slots surviving every active filter, in load order
    pub slots: Vec<Slot>,
    /// Counts over the status-filtered group, before the show-booked toggle
    pub available: usize,
    pub booked: usize,
    pub collapsed: bool,
}

/// The full projected view
#[derive(Debug, Clone)]
pub struct ViewProjection {
    /// Displayed groups in chronological order; groups with no surviving
    /// slots are omitted entirely
    pub days: Vec<DayGroup>,
    /// Aggregates over the unfiltered slot set
    pub counts: SlotCounts,
    /// Total slots across the displayed groups
    pub visible: usize,
}

/// Project the slot set through the user's filter state
///
/// The status filter, the show-booked toggle, and the selected-date filter
/// compose by intersection. Omitting a group never affects `counts`.
pub fn project(slots: &[Slot], state: &ViewState) -> ViewProjection {
    let counts = SlotCounts::tally(slots);
    let filters = &state.filters;

    let status_filtered: Vec<Slot> = slots
        .iter()
        .filter(|s| filters.status.matches(s))
        .cloned()
        .collect();

    let mut days = Vec::new();
    let mut visible = 0;
    for (date, group) in group_by_date(&status_filtered) {
        if let Some(selected) = filters.selected_date {
            if selected != date {
                continue;
            }
        }

        let booked = group.iter().filter(|s| s.is_booked).count();
        let available = group.len() - booked;

        let surviving: Vec<Slot> = if filters.show_booked {
            group
        } else {
            group.into_iter().filter(|s| !s.is_booked).collect()
        };
        if surviving.is_empty() {
            continue;
        }

        visible += surviving.len();
        days.push(DayGroup {
            date,
            slots: surviving,
            available,
            booked,
            collapsed: state.is_collapsed(date),
        });
    }

    ViewProjection {
        days,
        counts,
        visible,
    }
}

/// Relative position of a date against "today"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateLabel {
    Today,
    Tomorrow,
    Other,
}

impl DateLabel {
    pub fn relative(date: NaiveDate, today: NaiveDate) -> Self {
        if date == today {
            DateLabel::Today
        } else if date == today + Duration::days(1) {
            DateLabel::Tomorrow
        } else {
            DateLabel::Other
        }
    }
}

/// Human display for a slot's length: `"15 min"`, `"1h 30m"`, `"1h"`
///
/// Inverted or zero-length windows display as `"—"`.
pub fn format_slot_duration(slot: &Slot) -> String {
    let minutes = slot.duration_minutes();
    if minutes <= 0 {
        return "—".to_string();
    }
    if minutes < 60 {
        return format!("{} min", minutes);
    }
    let hours = minutes / 60;
    let rest = minutes % 60;
    if rest > 0 {
        format!("{}h {}m", hours, rest)
    } else {
        format!("{}h", hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn slot_on(id: &str, date: NaiveDate, booked: bool) -> Slot {
        Slot {
            id: id.to_string(),
            teacher_id: "tch-1".to_string(),
            date,
            start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(10, 15, 0).unwrap(),
            is_booked: booked,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_group_by_date_buckets_by_calendar_date() {
        let slots = vec![
            slot_on("a", date(2024, 3, 5), false),
            slot_on("b", date(2024, 3, 5), true),
            slot_on("c", date(2024, 3, 1), false),
        ];

        let groups = group_by_date(&slots);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&date(2024, 3, 5)].len(), 2);
        assert_eq!(groups[&date(2024, 3, 1)].len(), 1);
    }

    #[test]
    fn test_sorted_date_keys_ascending() {
        let slots = vec![
            slot_on("a", date(2024, 3, 5), false),
            slot_on("b", date(2024, 3, 1), false),
            slot_on("c", date(2024, 3, 10), false),
        ];

        let keys = sorted_date_keys(&group_by_date(&slots));
        assert_eq!(
            keys,
            vec![date(2024, 3, 1), date(2024, 3, 5), date(2024, 3, 10)]
        );
    }

    #[test]
    fn test_sorted_date_keys_chronological_not_string_order() {
        // "Feb 28" sorts after "Mar 9" lexically; chronological order must win
        let slots = vec![
            slot_on("a", date(2024, 3, 10), false),
            slot_on("b", date(2024, 3, 9), false),
            slot_on("c", date(2024, 2, 28), false),
        ];

        let keys = sorted_date_keys(&group_by_date(&slots));
        assert_eq!(
            keys,
            vec![date(2024, 2, 28), date(2024, 3, 9), date(2024, 3, 10)]
        );
    }

    #[test]
    fn test_counts_from_unfiltered_set() {
        let slots = vec![
            slot_on("a", date(2024, 3, 1), false),
            slot_on("b", date(2024, 3, 1), false),
            slot_on("c", date(2024, 3, 2), false),
            slot_on("d", date(2024, 3, 2), true),
            slot_on("e", date(2024, 3, 3), true),
        ];

        let counts = SlotCounts::tally(&slots);
        assert_eq!(counts.total, 5);
        assert_eq!(counts.available, 3);
        assert_eq!(counts.booked, 2);
        assert_eq!(counts.days, 3);
    }

    #[test]
    fn test_filter_available_yields_only_open_slots() {
        let slots = vec![
            slot_on("a", date(2024, 3, 1), false),
            slot_on("b", date(2024, 3, 1), false),
            slot_on("c", date(2024, 3, 2), false),
            slot_on("d", date(2024, 3, 2), true),
            slot_on("e", date(2024, 3, 3), true),
        ];

        let mut state = ViewState::default();
        state.filters.status = StatusFilter::Available;

        let view = project(&slots, &state);
        assert_eq!(view.visible, 3);
        assert!(view
            .days
            .iter()
            .all(|day| day.slots.iter().all(|s| !s.is_booked)));
        // The all-booked date disappears entirely
        assert_eq!(view.days.len(), 2);
    }

    #[test]
    fn test_booked_filter_with_hide_booked_shows_nothing_but_keeps_counts() {
        let slots = vec![
            slot_on("a", date(2024, 3, 1), false),
            slot_on("b", date(2024, 3, 1), false),
            slot_on("c", date(2024, 3, 2), false),
            slot_on("d", date(2024, 3, 2), true),
            slot_on("e", date(2024, 3, 3), true),
        ];

        let mut state = ViewState::default();
        state.filters.status = StatusFilter::Booked;
        state.filters.show_booked = false;

        let view = project(&slots, &state);
        assert!(view.days.is_empty());
        assert_eq!(view.visible, 0);
        // Hidden groups must not corrupt the aggregates
        assert_eq!(view.counts.available, 3);
        assert_eq!(view.counts.booked, 2);
    }

    #[test]
    fn test_hide_booked_prunes_fully_booked_groups() {
        let slots = vec![
            slot_on("a", date(2024, 3, 1), true),
            slot_on("b", date(2024, 3, 2), false),
            slot_on("c", date(2024, 3, 2), true),
        ];

        let mut state = ViewState::default();
        state.filters.show_booked = false;

        let view = project(&slots, &state);
        assert_eq!(view.days.len(), 1);
        assert_eq!(view.days[0].date, date(2024, 3, 2));
        assert_eq!(view.days[0].slots.len(), 1);
        // Per-group counts reflect the group before the toggle
        assert_eq!(view.days[0].available, 1);
        assert_eq!(view.days[0].booked, 1);
    }

    #[test]
    fn test_selected_date_composes_by_intersection() {
        let slots = vec![
            slot_on("a", date(2024, 3, 1), false),
            slot_on("b", date(2024, 3, 2), false),
        ];

        let mut state = ViewState::default();
        state.filters.selected_date = Some(date(2024, 3, 2));

        let view = project(&slots, &state);
        assert_eq!(view.days.len(), 1);
        assert_eq!(view.days[0].date, date(2024, 3, 2));
        assert_eq!(view.counts.total, 2);
    }

    #[test]
    fn test_collapse_toggle_round_trips() {
        let mut state = ViewState::default();
        let day = date(2024, 3, 1);

        assert!(!state.is_collapsed(day));
        state.toggle_collapsed(day);
        assert!(state.is_collapsed(day));
        state.toggle_collapsed(day);
        assert!(!state.is_collapsed(day));
    }

    #[test]
    fn test_projection_carries_collapse_state() {
        let slots = vec![slot_on("a", date(2024, 3, 1), false)];
        let mut state = ViewState::default();
        state.toggle_collapsed(date(2024, 3, 1));

        let view = project(&slots, &state);
        assert!(view.days[0].collapsed);
    }

    #[test]
    fn test_clear_filters_resets_to_defaults() {
        let mut state = ViewState::default();
        state.filters.status = StatusFilter::Booked;
        state.filters.show_booked = false;
        state.filters.selected_date = Some(date(2024, 3, 1));
        state.toggle_collapsed(date(2024, 3, 1));

        state.clear_filters();

        assert_eq!(state.filters.status, StatusFilter::All);
        assert!(state.filters.show_booked);
        assert!(state.filters.selected_date.is_none());
        // Collapse state survives a filter reset
        assert!(state.is_collapsed(date(2024, 3, 1)));
    }

    #[test]
    fn test_status_filter_from_str() {
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "available".parse::<StatusFilter>().unwrap(),
            StatusFilter::Available
        );
        assert_eq!("open".parse::<StatusFilter>().unwrap(), StatusFilter::Available);
        assert_eq!(
            "booked".parse::<StatusFilter>().unwrap(),
            StatusFilter::Booked
        );
        assert!("bogus".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn test_date_label_relative() {
        let today = date(2024, 3, 10);
        assert_eq!(DateLabel::relative(date(2024, 3, 10), today), DateLabel::Today);
        assert_eq!(
            DateLabel::relative(date(2024, 3, 11), today),
            DateLabel::Tomorrow
        );
        assert_eq!(DateLabel::relative(date(2024, 3, 9), today), DateLabel::Other);
        assert_eq!(DateLabel::relative(date(2024, 3, 20), today), DateLabel::Other);
    }

    #[test]
    fn test_format_slot_duration() {
        let mut slot = slot_on("a", date(2024, 3, 1), false);
        assert_eq!(format_slot_duration(&slot), "15 min");

        slot.end_time = NaiveTime::from_hms_opt(11, 0, 0).unwrap();
        assert_eq!(format_slot_duration(&slot), "1h");

        slot.end_time = NaiveTime::from_hms_opt(11, 30, 0).unwrap();
        assert_eq!(format_slot_duration(&slot), "1h 30m");

        slot.end_time = slot.start_time;
        assert_eq!(format_slot_duration(&slot), "—");
    }
}
