//! Action applier.
//!
//! Consumes the structured actions produced by the external planning layer
//! and turns each one into zero or more calendar mutations. The planner's
//! records are loosely typed (optional fields per kind), so everything is
//! validated here, once, at this boundary: date/time strings parse here,
//! defaults apply here, and the past-time guard runs here.
//!
//! Every action is one self-contained load → mutate → save transaction
//! against the store; an action that mutates nothing writes nothing.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use almanac_core::model::event::Recurrence;
use almanac_core::{mutate, view, Calendar, CalendarStore};

use crate::conflict::resolve_conflict;
use crate::params::SchedParams;
use crate::rebalance::rebalance_week;
use crate::spacing::auto_space;

/// Minimum gap assumed when an `auto_space` action names none.
pub const DEFAULT_GAP_MINUTES: i64 = 60;

// ---------------------------------------------------------------------------
// Planner contract
// ---------------------------------------------------------------------------

/// One structured action from the planner.
///
/// The wire shape is a tagged record: `type` selects the variant, field
/// names are camelCase, dates are `yyyy-MM-dd`, times `HH:mm`. Date and
/// time fields stay strings at this level and are parsed on application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    #[serde(rename_all = "camelCase")]
    CreateEvent {
        #[serde(default)]
        title: Option<String>,
        date: String,
        time: String,
        #[serde(default)]
        recurring: Option<String>,
        #[serde(default)]
        duration_minutes: Option<i64>,
    },
    #[serde(rename_all = "camelCase")]
    UpdateEvent {
        title: String,
        date: String,
        time: String,
        #[serde(default)]
        new_date: Option<String>,
        #[serde(default)]
        new_time: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    ResizeEvent {
        title: String,
        date: String,
        time: String,
        new_duration_minutes: i64,
    },
    #[serde(rename_all = "camelCase")]
    DeleteEvent {
        title: String,
        date: String,
        time: String,
    },
    #[serde(rename_all = "camelCase")]
    AutoSpace {
        #[serde(default)]
        min_gap_minutes: Option<i64>,
    },
    BulkUpdate {
        moves: Vec<MoveSpec>,
    },
    RebalanceWeek,
    #[serde(rename_all = "camelCase")]
    AskClarification {
        question: String,
        #[serde(default)]
        include_summary: bool,
    },
    #[serde(rename_all = "camelCase")]
    Respond {
        message: String,
        #[serde(default)]
        include_summary: bool,
    },
}

/// One move inside a `bulk_update` action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveSpec {
    pub title: String,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub new_date: Option<String>,
    #[serde(default)]
    pub new_time: Option<String>,
}

/// A conversational suggestion; carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub note: String,
}

/// A whole planner response: an action list plus suggestions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Result of applying one action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// Number of individual mutations this action produced.
    pub applied: usize,
    /// Pass-through text for `ask_clarification` / `respond`.
    pub reply: Option<String>,
}

/// Result of applying a whole plan, left-to-right.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanOutcome {
    pub applied: usize,
    pub replies: Vec<String>,
    pub suggestions: Vec<String>,
}

// ---------------------------------------------------------------------------
// Applier
// ---------------------------------------------------------------------------

/// Applies actions against one calendar store.
///
/// Stateless between calls apart from its configuration: the clock value
/// and `allow_past` flag are supplied by the caller, never remembered.
#[derive(Debug)]
pub struct Applier<'s> {
    store: &'s CalendarStore,
    params: SchedParams,
    now: NaiveDateTime,
    allow_past: bool,
}

impl<'s> Applier<'s> {
    #[must_use]
    pub fn new(store: &'s CalendarStore, now: NaiveDateTime) -> Self {
        Self {
            store,
            params: SchedParams::default(),
            now,
            allow_past: false,
        }
    }

    /// Override the scheduling constants.
    #[must_use]
    pub fn with_params(mut self, params: SchedParams) -> Self {
        self.params = params;
        self
    }

    /// Permit mutations that target times before the clock value.
    #[must_use]
    pub fn allow_past(mut self, allow: bool) -> Self {
        self.allow_past = allow;
        self
    }

    /// Apply a whole plan left-to-right, accumulating the applied count.
    ///
    /// # Errors
    ///
    /// Fails on the first action whose fields do not validate or whose
    /// store transaction fails; actions already applied stay applied.
    pub fn apply_plan(&self, plan: &Plan) -> Result<PlanOutcome> {
        let mut outcome = PlanOutcome::default();
        for action in &plan.actions {
            let one = self.apply_action(action)?;
            outcome.applied += one.applied;
            if let Some(reply) = one.reply {
                outcome.replies.push(reply);
            }
        }
        outcome.suggestions = plan.suggestions.iter().map(|s| s.note.clone()).collect();
        Ok(outcome)
    }

    /// Apply one action as a self-contained load → mutate → save
    /// transaction. Returns how many mutations it produced, plus any
    /// pass-through reply.
    ///
    /// # Errors
    ///
    /// Invalid date/time/recurrence fields and store I/O failures are
    /// errors. "Nothing to do" outcomes (no match, no free slot, past
    /// target with `allow_past` unset) are not.
    pub fn apply_action(&self, action: &Action) -> Result<ApplyOutcome> {
        match action {
            Action::CreateEvent {
                title,
                date,
                time,
                recurring,
                duration_minutes,
            } => self.create_event(
                title.as_deref().unwrap_or(""),
                date,
                time,
                recurring.as_deref(),
                *duration_minutes,
            ),
            Action::UpdateEvent {
                title,
                date,
                time,
                new_date,
                new_time,
            } => {
                let key = MatchKey::parse(title, date, time)?;
                let mut calendar = self.store.load()?;
                let applied =
                    self.move_one(&mut calendar, &key, new_date.as_deref(), new_time.as_deref())?;
                if applied > 0 {
                    self.store.save(&calendar)?;
                }
                Ok(ApplyOutcome {
                    applied,
                    reply: None,
                })
            }
            Action::ResizeEvent {
                title,
                date,
                time,
                new_duration_minutes,
            } => self.resize_event(title, date, time, *new_duration_minutes),
            Action::DeleteEvent { title, date, time } => self.delete_event(title, date, time),
            Action::AutoSpace { min_gap_minutes } => {
                let gap = min_gap_minutes
                    .filter(|&m| m > 0)
                    .unwrap_or(DEFAULT_GAP_MINUTES);
                let mut calendar = self.store.load()?;
                let moved = auto_space(&mut calendar, gap, self.now.date());
                if moved > 0 {
                    self.store.save(&calendar)?;
                }
                info!(moved, gap, "auto-space applied");
                Ok(ApplyOutcome {
                    applied: moved,
                    reply: None,
                })
            }
            Action::RebalanceWeek => {
                let mut calendar = self.store.load()?;
                let moved = rebalance_week(&mut calendar, self.now.date(), &self.params);
                if moved > 0 {
                    self.store.save(&calendar)?;
                }
                info!(moved, "week rebalance applied");
                Ok(ApplyOutcome {
                    applied: moved,
                    reply: None,
                })
            }
            Action::BulkUpdate { moves } => self.bulk_update(moves),
            Action::AskClarification {
                question,
                include_summary,
            } => self.passthrough(question, *include_summary),
            Action::Respond {
                message,
                include_summary,
            } => self.passthrough(message, *include_summary),
        }
    }

    fn create_event(
        &self,
        title: &str,
        date: &str,
        time: &str,
        recurring: Option<&str>,
        duration_minutes: Option<i64>,
    ) -> Result<ApplyOutcome> {
        let date = parse_date(date)?;
        let time = parse_time(time)?;
        let recurrence = parse_recurrence(recurring)?;
        if self.skips_past(date.and_time(time), "create_event") {
            return Ok(ApplyOutcome::default());
        }
        let mut calendar = self.store.load()?;
        mutate::create_event(&mut calendar, date, time, recurrence, title, duration_minutes);
        self.store.save(&calendar)?;
        Ok(ApplyOutcome {
            applied: 1,
            reply: None,
        })
    }

    fn resize_event(
        &self,
        title: &str,
        date: &str,
        time: &str,
        new_duration_minutes: i64,
    ) -> Result<ApplyOutcome> {
        let key = MatchKey::parse(title, date, time)?;
        if self.skips_past(key.start(), "resize_event") {
            return Ok(ApplyOutcome::default());
        }
        let mut calendar = self.store.load()?;
        let Some(idx) = key.find(&calendar) else {
            debug!(title = %key.title, "resize target not found");
            return Ok(ApplyOutcome::default());
        };
        mutate::resize(&mut calendar, idx, new_duration_minutes);
        self.store.save(&calendar)?;
        Ok(ApplyOutcome {
            applied: 1,
            reply: None,
        })
    }

    fn delete_event(&self, title: &str, date: &str, time: &str) -> Result<ApplyOutcome> {
        let key = MatchKey::parse(title, date, time)?;
        if self.skips_past(key.start(), "delete_event") {
            return Ok(ApplyOutcome::default());
        }
        let mut calendar = self.store.load()?;
        let Some(idx) = key.find(&calendar) else {
            debug!(title = %key.title, "delete target not found");
            return Ok(ApplyOutcome::default());
        };
        mutate::remove(&mut calendar, idx);
        self.store.save(&calendar)?;
        Ok(ApplyOutcome {
            applied: 1,
            reply: None,
        })
    }

    fn bulk_update(&self, moves: &[MoveSpec]) -> Result<ApplyOutcome> {
        let mut calendar = self.store.load()?;
        let mut applied = 0;
        for spec in moves {
            let key = MatchKey::parse(&spec.title, &spec.date, &spec.time)?;
            applied += self.move_one(
                &mut calendar,
                &key,
                spec.new_date.as_deref(),
                spec.new_time.as_deref(),
            )?;
        }
        if applied > 0 {
            self.store.save(&calendar)?;
        }
        Ok(ApplyOutcome {
            applied,
            reply: None,
        })
    }

    /// Shared move semantics for `update_event` and each bulk move:
    /// conflict-aware placement first, unconditional move as the fallback.
    /// Returns 1 when the event was matched and moved, 0 otherwise.
    fn move_one(
        &self,
        calendar: &mut Calendar,
        key: &MatchKey,
        new_date: Option<&str>,
        new_time: Option<&str>,
    ) -> Result<usize> {
        let Some(idx) = key.find(calendar) else {
            debug!(title = %key.title, start = %key.start(), "move target not found");
            return Ok(0);
        };
        let current = calendar.events[idx].start_at();
        let new_date = match new_date {
            Some(raw) => parse_date(raw)?,
            None => current.date(),
        };
        let new_time = match new_time {
            Some(raw) => parse_time(raw)?,
            None => current.time(),
        };
        let desired = new_date.and_time(new_time);
        if self.skips_past(desired, "move") {
            return Ok(0);
        }
        if let Some(placed) = resolve_conflict(calendar, idx, desired, &self.params) {
            debug!(title = %key.title, start = %placed, "conflict-aware move");
        } else {
            // No free slot within the search budget: move unconditionally.
            mutate::update_start(calendar, idx, new_date, new_time);
            debug!(title = %key.title, start = %desired, "unconditional move");
        }
        Ok(1)
    }

    fn passthrough(&self, text: &str, include_summary: bool) -> Result<ApplyOutcome> {
        let reply = if include_summary {
            let calendar = self.store.load()?;
            format!("{text}\n\n{}", view::summarize(&calendar))
        } else {
            text.to_string()
        };
        Ok(ApplyOutcome {
            applied: 0,
            reply: Some(reply),
        })
    }

    /// The past-time guard: `true` means the action (or move) is silently
    /// skipped because its target lies strictly before the clock value.
    fn skips_past(&self, target: NaiveDateTime, what: &str) -> bool {
        if target < self.now && !self.allow_past {
            info!(target = %target, action = what, "target is in the past, skipping");
            true
        } else {
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Field validation
// ---------------------------------------------------------------------------

/// A parsed (title, start) match key.
struct MatchKey {
    title: String,
    date: NaiveDate,
    time: NaiveTime,
}

impl MatchKey {
    fn parse(title: &str, date: &str, time: &str) -> Result<Self> {
        Ok(Self {
            title: title.to_string(),
            date: parse_date(date)?,
            time: parse_time(time)?,
        })
    }

    fn start(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    fn find(&self, calendar: &Calendar) -> Option<usize> {
        calendar.find_event(&self.title, self.date, self.time)
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date '{raw}' (expected yyyy-MM-dd)"))
}

fn parse_time(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .with_context(|| format!("invalid time '{raw}' (expected HH:mm)"))
}

fn parse_recurrence(raw: Option<&str>) -> Result<Recurrence> {
    match raw {
        None => Ok(Recurrence::None),
        Some(raw) => raw
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .with_context(|| format!("invalid recurring value '{raw}'")),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
