//! Display and formatting utilities for Prestimax.
//!
//! This module turns a [`PrestigeResult`] into the text report printed by
//! the command-line tool, and humanizes durations for both the report and
//! the WebAssembly bindings.

use bigdecimal::{BigDecimal, RoundingMode, ToPrimitive};

use crate::models::{Bottleneck, Eta, Goal, PrestigeResult, RequirementKind};

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;
const SECONDS_PER_YEAR: u64 = 365 * SECONDS_PER_DAY;

/// Formats an [`Eta`] as a human-readable duration.
///
/// Leading zero units are dropped, and durations too long to count in
/// seconds are shown in years with scientific notation.
///
/// # Example
///
/// ```
/// use bigdecimal::BigDecimal;
/// use prestimax::display::format_duration;
/// use prestimax::models::Eta;
///
/// assert_eq!(format_duration(&Eta::Finite(BigDecimal::from(3665))), "1h 1m 5s");
/// assert_eq!(format_duration(&Eta::Finite(BigDecimal::from(45))), "45s");
/// assert_eq!(format_duration(&Eta::zero()), "0s");
/// assert_eq!(format_duration(&Eta::Never), "never");
/// ```
pub fn format_duration(eta: &Eta) -> String {
    let seconds = match eta {
        Eta::Finite(seconds) => seconds,
        Eta::Never => return "never".to_string(),
    };

    let Some(total) = seconds.with_scale_round(0, RoundingMode::HalfUp).to_u64() else {
        let years = seconds / BigDecimal::from(SECONDS_PER_YEAR);
        return format!("{}y", years.with_prec(4).to_scientific_notation());
    };

    let parts = [
        (total / SECONDS_PER_YEAR, "y"),
        (total % SECONDS_PER_YEAR / SECONDS_PER_DAY, "d"),
        (total % SECONDS_PER_DAY / SECONDS_PER_HOUR, "h"),
        (total % SECONDS_PER_HOUR / SECONDS_PER_MINUTE, "m"),
        (total % SECONDS_PER_MINUTE, "s"),
    ];

    let shown: Vec<String> = parts
        .iter()
        .skip_while(|(value, unit)| *value == 0 && *unit != "s")
        .map(|(value, unit)| format!("{}{}", value, unit))
        .collect();
    shown.join(" ")
}

/// One-line description of what the bottleneck is waiting on.
///
/// # Example
///
/// ```
/// use bigdecimal::BigDecimal;
/// use prestimax::display::bottleneck_message;
/// use prestimax::models::{Bottleneck, Eta, RequirementKind};
///
/// let bottleneck = Bottleneck {
///     goal: "Queen".to_string(),
///     kind: RequirementKind::Twin,
///     required: BigDecimal::from(3),
///     time: Eta::Finite(BigDecimal::from(120)),
/// };
/// assert_eq!(bottleneck_message(&bottleneck), "+3 Queen twins");
/// ```
pub fn bottleneck_message(bottleneck: &Bottleneck) -> String {
    let count = bottleneck.required.normalized();
    match bottleneck.kind {
        RequirementKind::Buy => format!("+{} {}", count, bottleneck.goal),
        RequirementKind::Twin => format!("+{} {} twins", count, bottleneck.goal),
    }
}

/// Formats a goal as an indented block of report lines.
pub fn format_goal(goal: &Goal) -> String {
    let mut lines = vec![format!(
        "  {} (ready in {})",
        goal.name,
        format_duration(&goal.time_to_prestige())
    )];
    lines.push(format!(
        "    Buy:   {} total (+{}) in {}",
        goal.buy_total.normalized(),
        goal.buy_required.normalized(),
        format_duration(&goal.buy_time)
    ));
    lines.push(format!(
        "    Twins: {} total (+{}) in {}",
        goal.twin_total.normalized(),
        goal.twin_required.normalized(),
        format_duration(&goal.twin_time)
    ));
    lines.join("\n")
}

/// Displays the complete prestige estimate to stdout.
///
/// Prints the overall time to prestige and its bottleneck, followed by
/// the plan for every unlock threshold.
pub fn display_results(result: &PrestigeResult) {
    println!();
    println!("+================================================================+");
    println!("|                  PRESTIGE TIME ESTIMATE                        |");
    println!("+================================================================+");
    println!();

    println!("[SUMMARY]");
    println!("----------------------------------------------------------------");
    println!(
        "  Time to Prestige: {}",
        format_duration(&result.time_to_prestige)
    );
    match &result.bottleneck {
        Some(bottleneck) => println!(
            "  Bottleneck:       {} ({})",
            bottleneck_message(bottleneck),
            format_duration(&bottleneck.time)
        ),
        None => println!("  Bottleneck:       none"),
    }

    println!();
    println!("[GOALS]");
    println!("----------------------------------------------------------------");
    if result.goals.is_empty() {
        println!("  No unlock thresholds.");
    }
    for goal in &result.goals {
        println!("{}", format_goal(goal));
    }
    println!();
}
