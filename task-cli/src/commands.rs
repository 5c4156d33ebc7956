//! Command table of `task-cli` and the handlers behind it.

use crate::clock::Clock;
use crate::{Error, Status, TaskRepository};
use cli_registry::{ArgSpec, CommandSpec, ParsedArgs, Registry};
use std::io::Write;

/// State shared by the handlers for the duration of one invocation.
pub struct TaskContext<W: Write> {
    repository: TaskRepository,
    clock: Box<dyn Clock>,
    out: W,
    modified: bool,
}

impl<W: Write> TaskContext<W> {
    pub fn new(repository: TaskRepository, clock: Box<dyn Clock>, out: W) -> Self {
        Self {
            repository,
            clock,
            out,
            modified: false,
        }
    }

    pub fn repository(&self) -> &TaskRepository {
        &self.repository
    }

    /// Whether a handler changed the store, i.e. whether it needs saving.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn out(&self) -> &W {
        &self.out
    }
}

pub fn registry<W: Write>() -> Registry<TaskContext<W>> {
    Registry::new(
        "task-cli",
        "Handy tool for handling tasks",
        vec![
            CommandSpec::new("add", "Add a new task", add::<W>)
                .arg(ArgSpec::positional("description", "Description of a task")),
            CommandSpec::new("delete", "Delete a task", delete::<W>)
                .arg(ArgSpec::positional("id", "Id of the task to delete")),
            CommandSpec::new("update", "Update a task", update::<W>)
                .arg(ArgSpec::positional("id", "Id of the task to update"))
                .arg(ArgSpec::option(
                    "status",
                    "New status: todo, in-progress or done",
                ))
                .arg(ArgSpec::option("description", "New description")),
            CommandSpec::new("list", "List tasks, all or by status", list::<W>).arg(
                ArgSpec::option("status", "Only show tasks with this status"),
            ),
        ],
    )
}

fn parse_status(value: Option<String>) -> Result<Option<Status>, Error> {
    value.map(|value| value.parse()).transpose()
}

fn add<W: Write>(ctx: &mut TaskContext<W>, args: &ParsedArgs<'_>) -> anyhow::Result<()> {
    let description = args.required_string("description")?;
    let id = ctx.repository.add(&description, ctx.clock.now())?;
    ctx.modified = true;
    writeln!(ctx.out, "Task added successfully (ID: {id})")?;
    Ok(())
}

fn delete<W: Write>(ctx: &mut TaskContext<W>, args: &ParsedArgs<'_>) -> anyhow::Result<()> {
    let id = args.required_string("id")?;
    let task = ctx.repository.delete(&id)?;
    ctx.modified = true;
    writeln!(ctx.out, "Task {} deleted", task.id())?;
    Ok(())
}

fn update<W: Write>(ctx: &mut TaskContext<W>, args: &ParsedArgs<'_>) -> anyhow::Result<()> {
    let id = args.required_string("id")?;
    let status = parse_status(args.string("status")?)?;
    let description = args.string("description")?;
    let now = ctx.clock.now();
    let task = ctx
        .repository
        .update(&id, description.as_deref(), status, now)?;
    ctx.modified = true;
    writeln!(ctx.out, "Task updated: {task}")?;
    Ok(())
}

fn list<W: Write>(ctx: &mut TaskContext<W>, args: &ParsedArgs<'_>) -> anyhow::Result<()> {
    let status = parse_status(args.string("status")?)?;
    for task in ctx.repository.list(status) {
        writeln!(ctx.out, "{task}")?;
    }
    Ok(())
}
