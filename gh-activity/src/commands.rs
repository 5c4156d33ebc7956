//! Command table of `gh-activity` and the handlers behind it.

use crate::client::ActivityClient;
use crate::config::Settings;
use crate::event::EventKind;
use crate::{fetch_activity, report, validate_request};
use anyhow::Context;
use cli_registry::{ArgSpec, CommandSpec, ParsedArgs, Registry};
use std::collections::HashSet;
use std::io::Write;
use tracing::info;

/// State shared by the handlers. Owns the runtime the async client is driven on.
pub struct ActivityContext<W: Write> {
    runtime: tokio::runtime::Runtime,
    client: ActivityClient,
    check_rate_limit: bool,
    out: W,
}

impl<W: Write> ActivityContext<W> {
    pub fn new(settings: &Settings, out: W) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("Failed to start async runtime")?;
        Ok(Self {
            runtime,
            client: ActivityClient::new(settings)?,
            check_rate_limit: settings.check_rate_limit,
            out,
        })
    }

    pub fn out(&self) -> &W {
        &self.out
    }
}

pub fn registry<W: Write>() -> Registry<ActivityContext<W>> {
    Registry::new(
        "gh-activity",
        "Parses GitHub user activity",
        vec![
            CommandSpec::new(
                "hub-activity",
                "Gets activity of a user by username",
                hub_activity::<W>,
            )
            .arg(ArgSpec::positional("username", "Username of a user on GitHub"))
            .arg(
                ArgSpec::option("p", "Number of pages of 100 events to fetch")
                    .integer()
                    .default_value("1"),
            )
            .args(EventKind::ALL.iter().map(|kind| {
                ArgSpec::flag(kind.flag_name(), format!("Filter by {} events", kind.label()))
            })),
            CommandSpec::new(
                "rate-limit",
                "Shows the remaining API quota",
                rate_limit::<W>,
            ),
        ],
    )
}

fn selected_kinds(args: &ParsedArgs<'_>) -> anyhow::Result<HashSet<EventKind>> {
    let mut kinds = HashSet::new();
    for kind in EventKind::ALL {
        if args.flag(kind.flag_name())? {
            kinds.insert(kind);
        }
    }
    Ok(kinds)
}

fn hub_activity<W: Write>(ctx: &mut ActivityContext<W>, args: &ParsedArgs<'_>) -> anyhow::Result<()> {
    let username = args.required_string("username")?;
    let pages = args.integer("p")?.unwrap_or(1);
    let filter = selected_kinds(args)?;
    validate_request(&username, pages)?;

    let client = &ctx.client;
    let check_rate_limit = ctx.check_rate_limit;
    let rows = ctx.runtime.block_on(async {
        if check_rate_limit {
            client.check_quota().await?;
        }
        fetch_activity(client, &username, pages, &filter).await
    })?;

    info!(rows = rows.len(), "Rendering activity");
    write!(ctx.out, "{}", report::render(&rows))?;
    Ok(())
}

fn rate_limit<W: Write>(ctx: &mut ActivityContext<W>, _args: &ParsedArgs<'_>) -> anyhow::Result<()> {
    let limit = ctx.runtime.block_on(ctx.client.remaining_calls())?;
    writeln!(
        ctx.out,
        "Remaining calls: {}, resets at {}",
        limit.remaining,
        limit.reset_at()
    )?;
    Ok(())
}
