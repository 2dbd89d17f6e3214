//! Client-side filtering, sorting, and terminal rendering of meteor events
//! and the picture-of-the-day section.
//!
//! Everything here is plain view logic: it consumes immutable events and
//! produces strings, so it stays trivially testable.

use crate::events::MeteorEvent;
use crate::models::Apod;

/// Longest explanation excerpt shown under the picture of the day.
const EXPLANATION_EXCERPT_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum HazardFilter {
    /// Show every event.
    All,
    /// Show only potentially hazardous objects.
    Hazardous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SortKey {
    /// Ascending by approach timestamp.
    Date,
    /// Descending by maximum estimated diameter.
    Size,
    /// Ascending by miss distance.
    Distance,
}

/// Applies the dashboard's filter and sort controls to an event list.
///
/// Sorts are stable, so re-sorting an already date-ordered list keeps feed
/// order among ties.
pub fn filter_and_sort(
    events: &[MeteorEvent],
    filter: HazardFilter,
    sort: SortKey,
) -> Vec<MeteorEvent> {
    let mut selected: Vec<MeteorEvent> = events
        .iter()
        .filter(|e| match filter {
            HazardFilter::All => true,
            HazardFilter::Hazardous => e.is_hazardous,
        })
        .cloned()
        .collect();

    match sort {
        SortKey::Date => selected.sort_by_key(MeteorEvent::approach_timestamp),
        SortKey::Size => selected
            .sort_by(|a, b| b.estimated_size.max.total_cmp(&a.estimated_size.max)),
        SortKey::Distance => {
            selected.sort_by(|a, b| a.distance.value.total_cmp(&b.distance.value))
        }
    }

    selected
}

/// Formats a number with thousands separators and at most two fraction
/// digits, e.g. `4027630.324` -> `"4,027,630.32"`.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{value:.2}");
    let fixed = fixed.trim_end_matches('0').trim_end_matches('.');
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed, None),
    };

    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Renders one event as a multi-line card. Sizes are shown in meters, the
/// way the dashboard presents them.
pub fn render_event(event: &MeteorEvent) -> String {
    let badge = if event.is_hazardous {
        "  [!] potentially hazardous"
    } else {
        ""
    };

    format!(
        "{name}{badge}\n  \
         approach: {date}\n  \
         size:     {min} - {max} meters\n  \
         velocity: {vel} {vel_unit}\n  \
         distance: {dist} {dist_unit}\n  \
         id:       {id}",
        name = event.name,
        date = event.approach_date,
        min = format_number(event.estimated_size.min * 1000.0),
        max = format_number(event.estimated_size.max * 1000.0),
        vel = format_number(event.velocity.value),
        vel_unit = event.velocity.unit,
        dist = format_number(event.distance.value),
        dist_unit = event.distance.unit,
        id = event.id,
    )
}

/// Renders a titled list of event cards with a total/hazardous header, or
/// an empty-state line when there is nothing to show.
pub fn render_list(title: &str, events: &[MeteorEvent]) -> String {
    if events.is_empty() {
        return format!("{title}\n\nNo meteor data available for the selected time period.");
    }

    let hazardous = events.iter().filter(|e| e.is_hazardous).count();
    let mut out = format!("{title}\n{} total meteors", events.len());
    if hazardous > 0 {
        out.push_str(&format!(" ({hazardous} potentially hazardous)"));
    }

    for event in events {
        out.push_str("\n\n");
        out.push_str(&render_event(event));
    }

    out
}

/// Renders the picture-of-the-day section, or `None` for non-image media.
pub fn render_apod(apod: &Apod) -> Option<String> {
    if apod.media_type != "image" {
        return None;
    }

    let excerpt: String = if apod.explanation.chars().count() > EXPLANATION_EXCERPT_CHARS {
        let cut: String = apod.explanation.chars().take(EXPLANATION_EXCERPT_CHARS).collect();
        format!("{cut}...")
    } else {
        apod.explanation.clone()
    };

    let mut out = format!(
        "Astronomy Picture of the Day: {title}\n{url}\n{excerpt}",
        title = apod.title,
        url = apod.url,
    );
    if let Some(copyright) = &apod.copyright {
        out.push_str(&format!("\n(c) {copyright}"));
    }

    Some(out)
}
