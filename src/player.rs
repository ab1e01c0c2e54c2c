//! Live workout session state machine.
//!
//! Tracks exercise progression, set/rest timing, and calorie accrual for
//! the workout player. The machine never reads the wall clock itself;
//! every operation takes `now` so handlers drive it with `Utc::now()`
//! and tests drive it with fixed instants.
//!
//! Calories accrue per working interval as MET x weight-kg x hours,
//! using the current exercise's MET. Nothing accrues while resting or
//! paused, so the estimate is non-negative and monotonic. Results are
//! discarded when the session ends; only a summary is produced.

use chrono::{DateTime, Utc};

use crate::models::template::{TemplateExercise, WorkoutTemplate};

const SECS_PER_HOUR: f64 = 3600.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Working,
    Resting { remaining_secs: f64 },
}

#[derive(Debug, Clone)]
pub struct LiveSession {
    template: &'static WorkoutTemplate,
    weight_kg: f64,
    exercise_index: usize,
    current_set: u32,
    phase: Phase,
    paused: bool,
    started_at: DateTime<Utc>,
    exercise_started_at: DateTime<Utc>,
    last_tick: DateTime<Utc>,
    active_secs: f64,
    calories: f64,
    sets_done: u32,
}

/// What remains of a session after it ends. Nothing is persisted.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub template_name: &'static str,
    pub elapsed_secs: i64,
    pub active_secs: i64,
    pub calories: i64,
    pub sets_completed: u32,
    pub total_sets: u32,
}

impl SessionSummary {
    pub fn elapsed_display(&self) -> String {
        format_mmss(self.elapsed_secs)
    }
}

impl LiveSession {
    pub fn start(
        template: &'static WorkoutTemplate,
        weight_kg: f64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            template,
            weight_kg,
            exercise_index: 0,
            current_set: 1,
            phase: Phase::Working,
            paused: false,
            started_at: now,
            exercise_started_at: now,
            last_tick: now,
            active_secs: 0.0,
            calories: 0.0,
            sets_done: 0,
        }
    }

    /// Advance the session clocks to `now`. While working, the interval
    /// counts toward active time and calories; while resting, it counts
    /// down the rest timer; while paused, it is discarded.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        let dt = (now - self.last_tick).num_milliseconds() as f64 / 1000.0;
        self.last_tick = now;
        if self.paused || dt <= 0.0 {
            return;
        }

        match self.phase {
            Phase::Working => {
                self.active_secs += dt;
                let met = self.current_exercise().met;
                self.calories += met * self.weight_kg * dt / SECS_PER_HOUR;
            }
            Phase::Resting { remaining_secs } => {
                if dt >= remaining_secs {
                    self.phase = Phase::Working;
                } else {
                    self.phase = Phase::Resting {
                        remaining_secs: remaining_secs - dt,
                    };
                }
            }
        }
    }

    /// Complete the current set. Starts the rest period between sets, or
    /// advances to the next exercise after the final set. Completing the
    /// last set of the last exercise finishes the session. Ignored while
    /// resting, matching the disabled button in the player UI.
    pub fn complete_set(&mut self, now: DateTime<Utc>) -> Option<SessionSummary> {
        self.tick(now);
        if self.is_resting() {
            return None;
        }

        let exercise = self.current_exercise();
        self.sets_done += 1;
        if self.current_set < exercise.sets {
            self.phase = Phase::Resting {
                remaining_secs: exercise.rest_secs as f64,
            };
            self.current_set += 1;
            None
        } else {
            self.advance(now)
        }
    }

    /// Skip the rest of the current exercise. Skipping the last exercise
    /// finishes the session.
    pub fn skip_exercise(&mut self, now: DateTime<Utc>) -> Option<SessionSummary> {
        self.tick(now);
        self.advance(now)
    }

    pub fn pause(&mut self, now: DateTime<Utc>) {
        self.tick(now);
        self.paused = true;
    }

    pub fn resume(&mut self, now: DateTime<Utc>) {
        self.last_tick = now;
        self.paused = false;
    }

    /// End the session early and produce the summary.
    pub fn finish(&mut self, now: DateTime<Utc>) -> SessionSummary {
        self.tick(now);
        self.summary(now)
    }

    fn advance(&mut self, now: DateTime<Utc>) -> Option<SessionSummary> {
        if self.exercise_index + 1 < self.template.exercises.len() {
            self.exercise_index += 1;
            self.current_set = 1;
            self.phase = Phase::Working;
            self.exercise_started_at = now;
            None
        } else {
            Some(self.summary(now))
        }
    }

    fn summary(&self, now: DateTime<Utc>) -> SessionSummary {
        SessionSummary {
            template_name: self.template.name,
            elapsed_secs: self.elapsed_secs(now),
            active_secs: self.active_secs.round() as i64,
            calories: self.calories_burned(),
            sets_completed: self.sets_completed(),
            total_sets: self.template.total_sets(),
        }
    }

    pub fn template(&self) -> &'static WorkoutTemplate {
        self.template
    }

    pub fn current_exercise(&self) -> &'static TemplateExercise {
        &self.template.exercises[self.exercise_index]
    }

    pub fn exercise_number(&self) -> usize {
        self.exercise_index + 1
    }

    pub fn current_set(&self) -> u32 {
        self.current_set
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_resting(&self) -> bool {
        matches!(self.phase, Phase::Resting { .. })
    }

    /// Remaining rest, rounded up so the display never shows 0 while
    /// still resting.
    pub fn rest_remaining_secs(&self) -> i64 {
        match self.phase {
            Phase::Resting { remaining_secs } => remaining_secs.ceil() as i64,
            Phase::Working => 0,
        }
    }

    /// Wall-clock time since the session started, rest and pauses
    /// included.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> i64 {
        (now - self.started_at).num_seconds().max(0)
    }

    pub fn exercise_elapsed_secs(&self, now: DateTime<Utc>) -> i64 {
        (now - self.exercise_started_at).num_seconds().max(0)
    }

    pub fn calories_burned(&self) -> i64 {
        self.calories.round() as i64
    }

    fn sets_completed(&self) -> u32 {
        self.sets_done
    }

    /// Share of the template's sets completed so far, clamped to
    /// [0, 100].
    pub fn progress_pct(&self) -> f64 {
        let total = self.template.total_sets();
        if total == 0 {
            return 0.0;
        }
        let pct = self.sets_completed() as f64 / total as f64 * 100.0;
        pct.clamp(0.0, 100.0)
    }
}

pub fn format_mmss(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::template::WorkoutTemplate;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap()
    }

    fn core_template() -> &'static WorkoutTemplate {
        // Core & Stability: 6 exercises, 16 sets total
        WorkoutTemplate::find(4).unwrap()
    }

    #[test]
    fn test_fresh_session() {
        let session = LiveSession::start(core_template(), 70.0, t0());
        assert_eq!(session.exercise_number(), 1);
        assert_eq!(session.current_set(), 1);
        assert_eq!(session.calories_burned(), 0);
        assert_eq!(session.progress_pct(), 0.0);
        assert!(!session.is_resting());
        assert!(!session.is_paused());
    }

    #[test]
    fn test_calories_monotonic_while_working() {
        let mut session = LiveSession::start(core_template(), 70.0, t0());
        let mut last = 0.0;
        for i in 1..=120 {
            session.tick(t0() + Duration::seconds(i));
            assert!(session.calories >= last);
            last = session.calories;
        }
        // Plank at MET 4.5, 70 kg, 2 minutes: 4.5 * 70 * (2/60) = 10.5
        assert!((session.calories - 10.5).abs() < 1e-9);
    }

    #[test]
    fn test_no_accrual_while_resting() {
        let mut session = LiveSession::start(core_template(), 70.0, t0());
        session.tick(t0() + Duration::seconds(60));
        let before = session.calories;

        assert!(session.complete_set(t0() + Duration::seconds(60)).is_none());
        assert!(session.is_resting());
        assert_eq!(session.current_set(), 2);

        // Half the 45s rest passes
        session.tick(t0() + Duration::seconds(80));
        assert_eq!(session.calories, before);
        assert!(session.is_resting());
        assert_eq!(session.rest_remaining_secs(), 25);
    }

    #[test]
    fn test_rest_countdown_expires_back_to_working() {
        let mut session = LiveSession::start(core_template(), 70.0, t0());
        session.complete_set(t0() + Duration::seconds(30));
        assert!(session.is_resting());

        session.tick(t0() + Duration::seconds(30 + 46));
        assert!(!session.is_resting());
        assert_eq!(session.rest_remaining_secs(), 0);
    }

    #[test]
    fn test_complete_set_ignored_while_resting() {
        let mut session = LiveSession::start(core_template(), 70.0, t0());
        session.complete_set(t0() + Duration::seconds(30));
        let set_before = session.current_set();

        assert!(session.complete_set(t0() + Duration::seconds(31)).is_none());
        assert_eq!(session.current_set(), set_before);
    }

    #[test]
    fn test_pause_halts_calories_and_rest() {
        let mut session = LiveSession::start(core_template(), 70.0, t0());
        session.tick(t0() + Duration::seconds(60));
        let calories = session.calories;

        session.pause(t0() + Duration::seconds(60));
        session.tick(t0() + Duration::seconds(600));
        assert_eq!(session.calories, calories);

        session.resume(t0() + Duration::seconds(600));
        session.tick(t0() + Duration::seconds(660));
        assert!(session.calories > calories);

        // Pause during rest freezes the countdown
        session.complete_set(t0() + Duration::seconds(660));
        session.pause(t0() + Duration::seconds(661));
        let remaining = session.rest_remaining_secs();
        session.tick(t0() + Duration::seconds(1200));
        assert_eq!(session.rest_remaining_secs(), remaining);
    }

    #[test]
    fn test_final_set_advances_exercise() {
        let mut session = LiveSession::start(core_template(), 70.0, t0());
        let mut now = t0();

        // Plank has 3 sets; work through all of them
        for _ in 0..3 {
            now += Duration::seconds(30);
            session.complete_set(now);
            now += Duration::seconds(60); // let any rest expire
            session.tick(now);
        }

        assert_eq!(session.exercise_number(), 2);
        assert_eq!(session.current_set(), 1);
        assert_eq!(session.current_exercise().name, "Dead Bug");
    }

    #[test]
    fn test_skip_exercise() {
        let mut session = LiveSession::start(core_template(), 70.0, t0());
        assert!(session.skip_exercise(t0() + Duration::seconds(10)).is_none());
        assert_eq!(session.exercise_number(), 2);
        assert_eq!(session.current_set(), 1);
    }

    #[test]
    fn test_skipping_last_exercise_finishes() {
        let mut session = LiveSession::start(core_template(), 70.0, t0());
        let mut now = t0();
        let mut summary = None;
        for _ in 0..core_template().exercise_count() {
            now += Duration::seconds(10);
            summary = session.skip_exercise(now);
        }
        let summary = summary.expect("skipping every exercise should finish");
        assert_eq!(summary.template_name, "Core & Stability");
        assert_eq!(summary.total_sets, core_template().total_sets());
        assert_eq!(summary.sets_completed, 0);
    }

    #[test]
    fn test_completing_every_set_finishes() {
        let template = core_template();
        let mut session = LiveSession::start(template, 70.0, t0());
        let mut now = t0();
        let mut summary = None;

        for exercise in template.exercises {
            for _ in 0..exercise.sets {
                now += Duration::seconds(20);
                summary = session.complete_set(now);
                now += Duration::seconds(exercise.rest_secs as i64 + 1);
                session.tick(now);
            }
        }

        let summary = summary.expect("completing every set should finish");
        assert_eq!(summary.sets_completed, template.total_sets());
        assert!(summary.calories >= 0);
        assert!(summary.elapsed_secs > 0);
    }

    #[test]
    fn test_progress_pct_clamped_and_increasing() {
        let template = core_template();
        let mut session = LiveSession::start(template, 70.0, t0());
        let mut now = t0();
        let mut last = -1.0;

        for exercise in template.exercises {
            for _ in 0..exercise.sets {
                now += Duration::seconds(20);
                session.complete_set(now);
                let pct = session.progress_pct();
                assert!((0.0..=100.0).contains(&pct));
                assert!(pct >= last);
                last = pct;
                now += Duration::seconds(exercise.rest_secs as i64 + 1);
                session.tick(now);
            }
        }
        assert_eq!(last, 100.0);
    }

    #[test]
    fn test_finish_early() {
        let mut session = LiveSession::start(core_template(), 70.0, t0());
        session.tick(t0() + Duration::seconds(90));
        let summary = session.finish(t0() + Duration::seconds(90));
        assert_eq!(summary.elapsed_secs, 90);
        assert_eq!(summary.sets_completed, 0);
        assert!(summary.calories > 0);
    }

    #[test]
    fn test_elapsed_includes_rest_and_pause() {
        let mut session = LiveSession::start(core_template(), 70.0, t0());
        session.complete_set(t0() + Duration::seconds(30));
        session.pause(t0() + Duration::seconds(40));
        assert_eq!(session.elapsed_secs(t0() + Duration::seconds(100)), 100);
    }

    #[test]
    fn test_format_mmss() {
        assert_eq!(format_mmss(0), "00:00");
        assert_eq!(format_mmss(61), "01:01");
        assert_eq!(format_mmss(600), "10:00");
        assert_eq!(format_mmss(-5), "00:00");
    }
}
