use anyhow::{Context, Result, anyhow, bail};
use clap::ArgMatches;
use colored::Colorize;
use importwalk_core::predicates::has_tag_name;
use importwalk_core::trace::events_to_json;
use importwalk_core::{
    Selector, TraceEvent, TraceRecorder, VisitorHelper, file_exists, generate_trace_report,
    spanning_order,
};
use std::path::PathBuf;
use tracing::debug;

/// Options for a `walk` run
#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    pub entry: PathBuf,
    pub selectors: Vec<String>,
    pub tags: Vec<String>,
    pub omit: Vec<PathBuf>,
    pub json: bool,
}

impl WalkOptions {
    pub fn from_matches(args: &ArgMatches) -> Self {
        Self {
            entry: entry_from_matches(args),
            selectors: strings_from_matches(args, "select"),
            tags: strings_from_matches(args, "tag"),
            omit: omit_from_matches(args),
            json: args.get_flag("json"),
        }
    }
}

/// Expand a leading `~` in a user-supplied path
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}

pub fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Invalid selector '{}': {}", css, e))
}

/// Run the traversal described by `options` and return the recorded events
pub fn record_walk(options: &WalkOptions) -> Result<Vec<TraceEvent>> {
    if !file_exists(&options.entry) {
        bail!("Entry document not found: {}", options.entry.display());
    }

    let mut helper = VisitorHelper::new(TraceRecorder::new());
    for css in &options.selectors {
        helper = helper.with_predicate(parse_selector(css)?);
    }
    for tag in &options.tags {
        helper = helper.with_predicate(has_tag_name(tag.to_ascii_lowercase()));
    }

    for path in &options.omit {
        helper
            .omit(path)
            .with_context(|| format!("Failed to omit {}", path.display()))?;
    }
    helper
        .enter(&options.entry)
        .with_context(|| format!("Failed to walk {}", options.entry.display()))?;
    debug!("{} documents traversed", helper.imports().len());

    Ok(helper.into_visitor().into_events())
}

/// Render a `walk` run as a report, or as JSON when requested
pub fn render_walk(options: &WalkOptions) -> Result<String> {
    let events = record_walk(options)?;
    if options.json {
        let mut json = events_to_json(&events).context("Failed to serialize events")?;
        json.push('\n');
        Ok(json)
    } else {
        Ok(generate_trace_report(&events))
    }
}

/// Render the spanning-tree document order, one path per line
pub fn render_order(entry: PathBuf, omit: Vec<PathBuf>) -> Result<String> {
    let options = WalkOptions {
        entry,
        omit,
        ..WalkOptions::default()
    };
    let events = record_walk(&options)?;

    let mut output = String::new();
    for path in spanning_order(&events) {
        output.push_str(&path.display().to_string());
        output.push('\n');
    }
    Ok(output)
}

pub fn handle_walk(args: &ArgMatches, quiet: bool) -> Result<()> {
    let options = WalkOptions::from_matches(args);

    if !quiet {
        eprintln!(
            "{} Walking {}",
            "→".blue(),
            options.entry.display().to_string().bright_white()
        );
        for path in &options.omit {
            eprintln!("  {} omitting {}", "•".yellow(), path.display());
        }
    }

    print!("{}", render_walk(&options)?);
    Ok(())
}

pub fn handle_order(args: &ArgMatches) -> Result<()> {
    let output = render_order(entry_from_matches(args), omit_from_matches(args))?;
    print!("{}", output);
    Ok(())
}

fn entry_from_matches(args: &ArgMatches) -> PathBuf {
    args.get_one::<String>("ENTRY")
        .map(|raw| expand_path(raw))
        .unwrap_or_default()
}

fn omit_from_matches(args: &ArgMatches) -> Vec<PathBuf> {
    args.get_many::<String>("omit")
        .map(|values| values.map(|raw| expand_path(raw)).collect())
        .unwrap_or_default()
}

fn strings_from_matches(args: &ArgMatches, id: &str) -> Vec<String> {
    args.get_many::<String>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}
