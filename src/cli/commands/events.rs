//! Event listing and detail commands

use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;

use crate::catalog::{results_label, Catalog, Event};
use crate::cli::output::{column, print_formatted, print_success, OutputFormat};
use crate::cli::FilterArgs;
use crate::regions::StateCode;
use crate::state::SelectionController;

/// One line of the event list
#[derive(Serialize)]
pub struct EventRow<'a> {
    pub index: usize,
    pub name: &'a str,
    pub date: String,
    pub approximate: bool,
    pub city: &'a str,
    pub state: &'a str,
    pub url: &'a str,
}

impl<'a> EventRow<'a> {
    pub fn new(index: usize, event: &'a Event) -> Self {
        Self {
            index,
            name: event.display_name(),
            date: event.formatted_date(),
            approximate: event.approximate,
            city: &event.city,
            state: &event.state,
            url: &event.url,
        }
    }
}

/// Full event with its list position
#[derive(Serialize)]
struct EventDetail<'a> {
    index: usize,
    formatted_date: String,
    #[serde(flatten)]
    event: &'a Event,
}

/// Build a controller with the command-line filters applied
pub fn filtered(catalog: &Arc<Catalog>, filter: &FilterArgs) -> SelectionController {
    let mut controller = SelectionController::new(Arc::clone(catalog));
    if let Some(term) = &filter.search {
        controller.set_search_term(term.as_str());
    }
    if let Some(code) = filter.state.as_deref().and_then(StateCode::parse) {
        controller.select_state(Some(code));
    }
    controller
}

/// Text table for a filtered list
pub fn format_rows(rows: &[EventRow<'_>]) -> String {
    let mut out = format!("{:>3}  {}  {}  {}\n", "#", column("Data", 22), column("UF", 3), "Evento");
    for row in rows {
        let date = if row.approximate {
            format!("~{}", row.date)
        } else {
            row.date.clone()
        };
        out.push_str(&format!(
            "{:>3}  {}  {}  {}\n",
            row.index,
            column(&date, 22),
            column(row.state, 3),
            row.name
        ));
    }
    out.trim_end().to_string()
}

/// Text block for one event
pub fn format_event(event: &Event) -> String {
    let mut lines = vec![event.display_name().to_string()];

    let date = if event.approximate {
        format!("{} (Aproximado)", event.formatted_date())
    } else {
        event.formatted_date()
    };
    lines.push(format!("  Data:    {}", date));

    let location = event.location();
    if !location.is_empty() {
        lines.push(format!("  Local:   {}", location));
    }
    if !event.price.is_empty() {
        lines.push(format!("  Preço:   {}", event.price));
    }
    if !event.url.is_empty() {
        lines.push(format!("  Site:    {}", event.url));
    }
    if !event.tags().is_empty() {
        lines.push(format!("  Tags:    {}", event.tags().join(", ")));
    }
    if let Some(socials) = &event.socials {
        for (label, url) in socials.links() {
            lines.push(format!("  {:<8} {}", format!("{}:", label), url));
        }
    }
    if let Some(description) = event.description() {
        lines.push(String::new());
        lines.extend(description.lines().map(|line| format!("  {}", line)));
    }

    lines.join("\n")
}

pub fn list(catalog: &Arc<Catalog>, filter: &FilterArgs, format: OutputFormat, quiet: bool) -> Result<()> {
    let controller = filtered(catalog, filter);
    let events = controller.filtered_events();
    let rows: Vec<EventRow> = events
        .iter()
        .enumerate()
        .map(|(index, event)| EventRow::new(index, event))
        .collect();

    if rows.is_empty() && format == OutputFormat::Text {
        let message = match controller.selected_state() {
            Some(state) => format!("Nenhum evento encontrado em {}", state.display_name()),
            None => "Nenhum evento encontrado".to_string(),
        };
        println!("{}", message);
        return Ok(());
    }

    print_formatted(&rows, format, |rows| format_rows(rows));
    if format == OutputFormat::Text {
        print_success(&format!("\n{}", results_label(rows.len())), quiet);
    }

    Ok(())
}

pub fn show(catalog: &Arc<Catalog>, filter: &FilterArgs, index: usize, format: OutputFormat) -> Result<()> {
    let mut controller = filtered(catalog, filter);
    controller.select_event_by_index(index);

    let Some(event) = controller.selected_event() else {
        let count = controller.filtered_events().len();
        match format {
            OutputFormat::Json => println!("null"),
            OutputFormat::Text => println!("No event at index {} ({})", index, results_label(count)),
        }
        return Ok(());
    };

    let detail = EventDetail {
        index,
        formatted_date: event.formatted_date(),
        event,
    };
    print_formatted(&detail, format, |d| format_event(d.event));

    Ok(())
}
