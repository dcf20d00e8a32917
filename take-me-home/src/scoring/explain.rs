//! Human-readable explanation of a plan score.

use super::{FutureContext, ScoreBreakdown, TravelPlan};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

fn future_context_notes(context: &FutureContext) -> Vec<String> {
    let mut details = Vec::new();
    if let Some(weather) = &context.weather {
        details.push(format!(
            "Weather watch: severity {}/10 with an expected {} min delay",
            weather.severity, weather.expected_delay_minutes
        ));
    }
    if let Some(reservation) = &context.reservation {
        details.push(format!(
            "Reservations: {} (confidence {:.0}%)",
            reservation.status(),
            reservation.confidence() * 100.0
        ));
    }
    if let Some(notes) = &context.notes {
        details.push(format!("Additional context: {notes}"));
    }
    details
}

/// Describe how `plan` was scored.
///
/// Sections for buffers and future signals are only emitted when there is
/// something to list.
pub fn build_explanation(plan: &TravelPlan, breakdown: &ScoreBreakdown) -> String {
    let ferry = plan.ferry();
    let mut lines = vec![
        "Take Me Home · plan evaluation".to_string(),
        "=".repeat(32),
        format!(
            "Selected ferry: {} departing {}",
            ferry.name(),
            ferry.departure().format(TIMESTAMP_FORMAT)
        ),
        format!(
            "Estimated arrival (door-to-door): {}",
            plan.estimated_arrival().format(TIMESTAMP_FORMAT)
        ),
        format!(
            "Total travel time: {} min (driving {} min, buffers {} min)",
            plan.total_travel_minutes(),
            plan.total_driving_minutes(),
            plan.total_buffer_minutes()
        ),
        "Score breakdown:".to_string(),
    ];

    for (term, value) in breakdown.components() {
        lines.push(format!("  - {}: {:.2}", term.label(), value));
    }
    lines.push(format!("Composite score: {:.2}", breakdown.total()));

    let mut buffers = Vec::new();
    if plan.prep_buffer_minutes() > 0 {
        buffers.push(format!(
            "prep buffer {} min before departure",
            plan.prep_buffer_minutes()
        ));
    }
    if ferry.buffer_minutes() > 0 {
        buffers.push(format!("ferry check-in buffer {} min", ferry.buffer_minutes()));
    }
    if plan.arrival_buffer_minutes() > 0 {
        buffers.push(format!(
            "arrival buffer {} min before post-drive commitments",
            plan.arrival_buffer_minutes()
        ));
    }
    if !buffers.is_empty() {
        lines.push("Buffers considered:".to_string());
        lines.extend(buffers.into_iter().map(|item| format!("  - {item}")));
    }

    let notes = future_context_notes(plan.future_context());
    if !notes.is_empty() {
        lines.push("Future readiness signals:".to_string());
        lines.extend(notes.into_iter().map(|note| format!("  - {note}")));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{
        FerryOption, ReservationAvailability, ReservationStatus, ScoringWeights, WeatherDisruption,
        score_plan,
    };
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn minimal_plan() {
        let ferry = FerryOption::new("Edmonds–Kingston", at(15, 0), at(15, 25), 0.25, 0).unwrap();
        let plan = TravelPlan::builder(ferry).driving(45, 20).build().unwrap();
        let breakdown = score_plan(&plan, &ScoringWeights::default());

        let text = build_explanation(&plan, &breakdown);
        let expected = [
            "Take Me Home · plan evaluation",
            "================================",
            "Selected ferry: Edmonds–Kingston departing 2025-06-01 15:00",
            "Estimated arrival (door-to-door): 2025-06-01 15:45",
            "Total travel time: 90 min (driving 65 min, buffers 0 min)",
            "Score breakdown:",
            "  - Total Travel Time: 54.00",
            "  - Driving Minutes: 19.50",
            "  - Ferry Risk: 0.03",
            "Composite score: 73.53",
        ]
        .join("\n");

        assert_eq!(text, expected);
    }

    #[test]
    fn buffers_and_signals_listed() {
        let ferry = FerryOption::new("Seattle–Bainbridge", at(15, 25), at(16, 0), 0.3, 10).unwrap();
        let context = FutureContext::default()
            .with_weather(WeatherDisruption::new(7, 25))
            .with_reservation(
                ReservationAvailability::new(ReservationStatus::Limited, 0.65).unwrap(),
            )
            .with_notes("holiday weekend");
        let plan = TravelPlan::builder(ferry)
            .driving(30, 48)
            .buffers(15, 5)
            .future_context(context)
            .build()
            .unwrap();
        let breakdown = score_plan(&plan, &ScoringWeights::default());

        let text = build_explanation(&plan, &breakdown);

        assert!(text.contains("  - Weather Disruption: 0.00"));
        assert!(text.contains("  - Reservation Pressure: 0.00"));
        assert!(text.contains("Buffers considered:"));
        assert!(text.contains("  - prep buffer 15 min before departure"));
        assert!(text.contains("  - ferry check-in buffer 10 min"));
        assert!(text.contains("  - arrival buffer 5 min before post-drive commitments"));
        assert!(text.contains("Future readiness signals:"));
        assert!(text.contains("  - Weather watch: severity 7/10 with an expected 25 min delay"));
        assert!(text.contains("  - Reservations: limited (confidence 65%)"));
        assert!(text.contains("  - Additional context: holiday weekend"));
    }
}
