//! Task commands: add, list, next, done, check

use anyhow::Result;

use super::output::Output;
use crate::domain::{Task, DATE_FORMAT};
use crate::storage::{Persistence, TaskBoard};

fn task_json(task: &Task) -> serde_json::Value {
    serde_json::json!({
        "name": task.name(),
        "priority": task.priority,
        "due_date": task.due_date.format(DATE_FORMAT).to_string(),
        "dependencies": task.dependencies().collect::<Vec<_>>(),
        "completed": task.is_completed(),
    })
}

pub fn add<P: Persistence>(
    board: &mut TaskBoard<P>,
    output: &Output,
    name: &str,
    priority: i64,
    due: &str,
    deps: &[String],
) -> Result<()> {
    let task = Task::parse(name, priority, due, deps.iter().cloned())?;
    let summary = task_json(&task);

    board.add_task(task)?;

    if output.is_json() {
        output.data(&summary);
    } else {
        output.success(&format!("Added task: {}", name));
    }

    Ok(())
}

pub fn list<P: Persistence>(board: &TaskBoard<P>, output: &Output, by_due: bool) -> Result<()> {
    let tasks = if by_due {
        board.list_by_due_date()
    } else {
        board.list_pending()
    };

    if output.is_json() {
        let items: Vec<_> = tasks.iter().map(|t| task_json(t)).collect();
        output.data(&items);
    } else if tasks.is_empty() {
        println!("No pending tasks.");
    } else {
        println!("{:<20} {:>8} {:<12} DEPENDS ON", "NAME", "PRIORITY", "DUE");
        println!("{}", "-".repeat(60));
        for task in tasks {
            let deps: Vec<_> = task.dependencies().collect();
            println!(
                "{:<20} {:>8} {:<12} {}",
                task.name(),
                task.priority,
                task.due_date.format(DATE_FORMAT),
                deps.join(", ")
            );
        }
    }

    Ok(())
}

pub fn next<P: Persistence>(board: &mut TaskBoard<P>, output: &Output) -> Result<()> {
    let next = board.peek_next();

    if output.is_json() {
        output.data(&next.map(task_json));
    } else {
        match next {
            Some(task) => println!("Next task: {}", task),
            None => println!("No pending tasks."),
        }
    }

    Ok(())
}

pub fn done<P: Persistence>(board: &mut TaskBoard<P>, output: &Output, name: &str) -> Result<()> {
    let completion = board.complete_task(name)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "completed": completion.completed.name(),
            "purged": completion.purged,
            "ready": completion.ready.iter().map(task_json).collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    output.success(&format!("Completed task: {}", name));

    let others: Vec<_> = completion
        .purged
        .iter()
        .filter(|purged| purged.as_str() != name)
        .map(String::as_str)
        .collect();
    if !others.is_empty() {
        println!("Also removed completed: {}", others.join(", "));
    }

    if completion.ready.is_empty() {
        println!("No tasks with all dependencies completed.");
    } else {
        println!("Tasks with all dependencies completed ({}):", completion.ready.len());
        for task in &completion.ready {
            println!(
                "- {} (priority: {}, due: {})",
                task.name(),
                task.priority,
                task.due_date.format(DATE_FORMAT)
            );
        }
    }

    Ok(())
}

pub fn check<P: Persistence>(board: &TaskBoard<P>, output: &Output) -> Result<()> {
    let cycles = board.cycles();

    if output.is_json() {
        output.data(&serde_json::json!({ "cycles": cycles }));
    } else if cycles.is_empty() {
        println!("No dependency cycles.");
    } else {
        println!("Dependency cycles ({}):", cycles.len());
        for cycle in &cycles {
            println!("  {}", cycle.join(" <-> "));
        }
    }

    Ok(())
}
