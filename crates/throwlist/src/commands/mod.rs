use std::io::Write;

use anyhow::{Context, Result};
use throwlist_app::{BatchReport, LifecycleError, TaskService, TaskStore};
use throwlist_core::{Board, DateOnly, Selection, Task, TaskId, View};

use crate::{Command, LsView};

/// Execute one CLI command and print its outcome to `out`.
///
/// Mutating commands re-read the store afterwards and print the Today view,
/// also when the write failed, so the output reflects what was persisted.
pub fn run<S: TaskStore, W: Write>(
    command: Command,
    service: &TaskService<S>,
    reference: DateOnly,
    out: &mut W,
) -> Result<()> {
    match command {
        Command::Add { title, band, due } => {
            let id = match due {
                Some(due) => service.add_due(&title, band, &due, reference)?,
                None => service.add(&title, band, reference)?,
            };
            writeln!(out, "added task: {id}")?;
            render_views(service, reference, &[View::Today], out)
        }
        Command::Ls { view } => render_views(service, reference, view.views(), out),
        Command::Advance { id } => {
            let outcome = service.advance_one_day(&TaskId::new(id), reference);
            finish(service, reference, "advanced", outcome, out)
        }
        Command::Done { id } => {
            let outcome = service.complete(&TaskId::new(id), reference);
            finish(service, reference, "completed", outcome, out)
        }
        Command::Rm { id } => {
            let outcome = service.remove(&TaskId::new(id), reference);
            finish(service, reference, "removed", outcome, out)
        }
        Command::Throw { ids, by } => {
            let mut selection = Selection::with_ids(reference, ids.into_iter().map(TaskId::new));
            let outcome = service.throw(&mut selection, by, reference);
            if let Err(LifecycleError::PartialBatch { pending, .. }) = &outcome {
                let pending: Vec<&str> = pending.iter().map(TaskId::as_str).collect();
                writeln!(out, "not thrown: {}", pending.join(" "))?;
            }
            finish(service, reference, &format!("threw ({by})"), outcome, out)
        }
        Command::Restore { ids } => {
            let ids: Vec<TaskId> = ids.into_iter().map(TaskId::new).collect();
            let outcome = service.restore(&ids, reference);
            finish(service, reference, "restored", outcome, out)
        }
        Command::Move { id, index } => {
            let outcome = service.reorder(&TaskId::new(id), index, reference);
            finish(service, reference, "reordered", outcome, out)
        }
        Command::Band { id, band } => {
            let outcome = service.change_band(&TaskId::new(id), band, reference);
            finish(service, reference, "moved", outcome, out)
        }
    }
}

fn finish<S: TaskStore, W: Write>(
    service: &TaskService<S>,
    reference: DateOnly,
    verb: &str,
    outcome: Result<BatchReport, LifecycleError>,
    out: &mut W,
) -> Result<()> {
    if let Ok(report) = &outcome {
        if report.is_empty() {
            writeln!(out, "nothing changed")?;
        } else {
            writeln!(out, "{verb} {} task(s)", report.committed.len())?;
        }
    }
    render_views(service, reference, &[View::Today], out)?;
    outcome
        .map(|_| ())
        .with_context(|| format!("{verb} failed; the list above is what was saved"))
}

fn render_views<S: TaskStore, W: Write>(
    service: &TaskService<S>,
    reference: DateOnly,
    views: &[View],
    out: &mut W,
) -> Result<()> {
    let board: Board = service.board(reference)?;
    for view in views {
        render_view(view.as_str(), board.view(*view), out)?;
    }
    Ok(())
}

fn render_view<W: Write>(label: &str, tasks: &[Task], out: &mut W) -> Result<()> {
    writeln!(out, "== {label} ({}) ==", tasks.len())?;
    if tasks.is_empty() {
        writeln!(out, "No tasks")?;
        return Ok(());
    }
    writeln!(out, "# | ID | Band | Due | Title | Done | Thrown")?;
    for (position, task) in tasks.iter().enumerate() {
        writeln!(
            out,
            "{position} | {} | {} | {} | {} | {} | {}",
            task.id, task.sort_order, task.due_date, task.title, task.done_count, task.throw_count
        )?;
    }
    Ok(())
}
