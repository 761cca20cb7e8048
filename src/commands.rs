use crate::controller::Controller;
use crate::datekey::{format_month_key, parse_date_key, parse_month_key, total_days_in_year};
use crate::storage::{init_project_store, locate_store_from_cwd, StoreScope};
use crate::ui;
use anyhow::{anyhow, bail, Result};
use chrono::{Datelike, Utc};

pub fn init() -> Result<()> {
    let location = init_project_store()?;
    println!("Initialized calendar at {}", location.path.display());
    Ok(())
}

pub fn tui(year: Option<i32>) -> Result<()> {
    let year = year.unwrap_or_else(|| Utc::now().year());
    let controller = load_controller()?;
    ui::run(controller, year)
}

pub fn notes() -> Result<()> {
    let controller = load_controller()?;
    if controller.notes().is_empty() {
        println!("No notes saved.");
        return Ok(());
    }
    for note in controller.notes() {
        println!(
            "{} [{}] {} day{} • {}",
            note.id,
            note.color,
            note.dates.len(),
            if note.dates.len() == 1 { "" } else { "s" },
            note.created_at.format("%Y-%m-%d")
        );
        println!("  {}", note.content);
    }
    Ok(())
}

pub fn stats(year: Option<i32>) -> Result<()> {
    let year = year.unwrap_or_else(|| Utc::now().year());
    let controller = load_controller()?;
    let total = total_days_in_year(year);
    let percent = controller.day_count() as f64 / total as f64 * 100.0;
    println!("Selected days:   {}", controller.day_count());
    println!("Of year {}:    {:.1}%", year, percent);
    println!("Selected months: {}", controller.month_count());
    println!("Notes:           {}", controller.note_count());
    Ok(())
}

pub fn select(from: String, to: Option<String>) -> Result<()> {
    let mut controller = load_controller()?;
    let (fy, fm, fd) =
        parse_date_key(&from).ok_or_else(|| invalid_date(&from))?;
    match to {
        Some(to) => {
            let (ty, tm, td) = parse_date_key(&to).ok_or_else(|| invalid_date(&to))?;
            controller.on_day_press(fy, fm, fd);
            controller.on_day_hover_during_drag(ty, tm, td);
            controller.on_release_pointer();
        }
        None => {
            controller.on_day_press(fy, fm, fd);
            controller.on_release_pointer();
        }
    }
    report_diagnostic(&mut controller);
    println!("Selected days: {}", controller.day_count());
    Ok(())
}

pub fn month(month: String) -> Result<()> {
    let mut controller = load_controller()?;
    let (year, m) = parse_month_key(&month).ok_or_else(|| {
        anyhow!(
            "invalid month (use YYYY-MM with a zero-based month, e.g. 2024-00): {}",
            month
        )
    })?;
    controller.on_month_header_click(year, m);
    report_diagnostic(&mut controller);
    let key = format_month_key(year, m);
    if controller.is_month_selected(&key) {
        println!("Selected all of {}", key);
    } else {
        println!("Deselected {}", key);
    }
    Ok(())
}

pub fn note(content: String) -> Result<()> {
    let mut controller = load_controller()?;
    if !controller.on_save_note_requested(&content) {
        bail!("nothing to note: select at least one day and provide non-empty text");
    }
    report_diagnostic(&mut controller);
    if let Some(saved) = controller.notes().last() {
        println!("Saved note {} ({})", saved.id, saved.color);
    }
    Ok(())
}

pub fn delete(note_id: String) -> Result<()> {
    let mut controller = load_controller()?;
    let existed = controller.notes().iter().any(|n| n.id == note_id);
    controller.on_delete_note_requested(&note_id);
    report_diagnostic(&mut controller);
    if existed {
        println!("Deleted note {}", note_id);
    } else {
        println!("No note {} (nothing to do)", note_id);
    }
    Ok(())
}

pub fn clear() -> Result<()> {
    let mut controller = load_controller()?;
    controller.clear_selection();
    report_diagnostic(&mut controller);
    println!("Selection cleared.");
    Ok(())
}

fn load_controller() -> Result<Controller> {
    let location = locate_store_from_cwd()?;
    let mut controller = Controller::load(location);
    if let Some(diag) = controller.take_diagnostic() {
        let scope = match controller.location().scope {
            StoreScope::Project => "project",
            StoreScope::Global => "global",
        };
        eprintln!("warning ({} store): {}", scope, diag);
    }
    Ok(controller)
}

fn report_diagnostic(controller: &mut Controller) {
    if let Some(diag) = controller.take_diagnostic() {
        eprintln!("warning: {}", diag);
    }
}

fn invalid_date(input: &str) -> anyhow::Error {
    anyhow!(
        "invalid date (use YYYY-MM-DD with a zero-based month, e.g. 2024-00-15): {}",
        input
    )
}
