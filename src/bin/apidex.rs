//! apidex CLI binary.
//!
//! A command-line interface over the catalogue: list/show/try for browsing,
//! plus the maintenance tools (update, stats, check, parse, validate).

use std::collections::BTreeMap;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use apidex::cli::{Cli, Command};
use apidex::{
    apply_update, by_category, closest_to_completion, compute_view, dataset, find_matches,
    healthcheck, markdown, source_for, validate, ApiEntry, ApidexError, Criteria, Dataset,
    Dispatcher, EntryUpdate, PrettyPrint, ProgressSort, ResponseKind, SortKey, Status,
    StatusCounts, TryIt, TryItChange, UrlTemplate,
};
use clap::Parser;
use tabled::{Table, Tabled};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> apidex::Result<()> {
    match cli.command {
        Command::List {
            search,
            category,
            auth,
            status,
            sort,
            desc,
        } => handle_list(&cli.data, search, category, auth, status, &sort, desc, cli.json).await,
        Command::Show { name, category } => {
            handle_show(&cli.data, &name, category.as_deref(), cli.json).await
        }
        Command::Try {
            name,
            params,
            preview,
            timeout,
            category,
        } => handle_try(&cli.data, &name, params, preview, timeout, category.as_deref()).await,
        Command::Check {
            category,
            timeout,
            fix,
            verbose,
        } => handle_check(&cli.data, category.as_deref(), timeout, fix, verbose).await,
        Command::Update {
            name,
            status,
            notes,
            try_url,
            try_type,
            try_params,
            clear_tryit,
            category,
            dry_run,
            yes,
        } => {
            let args = UpdateArgs {
                name,
                status,
                notes,
                try_url,
                try_type,
                try_params,
                clear_tryit,
                category,
                dry_run,
                yes,
            };
            handle_update(&cli.data, args)
        }
        Command::Stats {
            category,
            auth,
            sort,
            next,
            pending,
        } => handle_stats(&cli.data, category.as_deref(), auth.as_deref(), sort, next, pending, cli.json)
            .await,
        Command::Parse {
            input,
            output,
            force,
        } => handle_parse(&input, output.unwrap_or_else(|| PathBuf::from(&cli.data)), force),
        Command::Validate => handle_validate(&cli.data).await,
    }
}

async fn load_dataset(data: &str) -> apidex::Result<Dataset> {
    let source = source_for(data)?;
    Dataset::load(source.as_ref()).await
}

/// Editing commands rewrite the dataset file, so they refuse URL sources.
fn require_file(data: &str) -> apidex::Result<&Path> {
    if data.starts_with("http://") || data.starts_with("https://") {
        return Err(ApidexError::InvalidArgument(
            "this command writes the dataset and needs a file path, not a URL".to_string(),
        ));
    }
    Ok(Path::new(data))
}

/// Resolve a name query to one entry, printing hints on miss or ambiguity.
fn resolve_entry<'a>(
    entries: &'a [ApiEntry],
    name: &str,
    category: Option<&str>,
) -> apidex::Result<&'a ApiEntry> {
    match dataset::find_one(entries, name, category) {
        Err(ApidexError::NoMatch(query)) => {
            let hints = dataset::suggest(entries, name, 5);
            if !hints.is_empty() {
                eprintln!("Did you mean:");
                for hint in hints {
                    eprintln!("  - {} ({})", hint.name, hint.category);
                }
            }
            Err(ApidexError::NoMatch(query))
        }
        Err(ApidexError::Ambiguous { query, names }) => {
            eprintln!("Multiple matches for '{query}':");
            for name in &names {
                eprintln!("  - {name}");
            }
            eprintln!("Hint: narrow the query or add --category");
            Err(ApidexError::Ambiguous { query, names })
        }
        other => other,
    }
}

#[allow(clippy::too_many_arguments)]
async fn handle_list(
    data: &str,
    search: Option<String>,
    category: Option<String>,
    auth: Option<String>,
    status: Option<String>,
    sort: &str,
    desc: bool,
    json: bool,
) -> apidex::Result<()> {
    let dataset = load_dataset(data).await?;
    let criteria = Criteria {
        free_text: search.unwrap_or_default(),
        category: category.unwrap_or_default(),
        auth: auth.unwrap_or_default(),
        status: status.unwrap_or_default(),
    };

    let view = compute_view(dataset.entries(), &criteria, SortKey::parse(sort), !desc);

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        let rows: Vec<EntryRow> = view.iter().map(|e| EntryRow::from(*e)).collect();
        println!("{}", Table::new(rows));
        println!("\n{} of {} entries", view.len(), dataset.len());
    }
    Ok(())
}

async fn handle_show(
    data: &str,
    name: &str,
    category: Option<&str>,
    json: bool,
) -> apidex::Result<()> {
    let dataset = load_dataset(data).await?;
    let entry = resolve_entry(dataset.entries(), name, category)?;

    if json {
        println!("{}", serde_json::to_string_pretty(entry)?);
    } else {
        println!("{}", entry.pretty_print());
    }
    Ok(())
}

async fn handle_try(
    data: &str,
    name: &str,
    overrides: Vec<(String, String)>,
    preview: bool,
    timeout: u64,
    category: Option<&str>,
) -> apidex::Result<()> {
    let dataset = load_dataset(data).await?;
    let entry = resolve_entry(dataset.entries(), name, category)?;

    let Some(tryit) = &entry.try_it else {
        return Err(ApidexError::InvalidArgument(format!(
            "'{}' has no try-it config (status: {})",
            entry.name, entry.status
        )));
    };

    let mut params: BTreeMap<String, String> = tryit.default_params();
    params.extend(overrides);

    let template = UrlTemplate::parse(&tryit.url);
    // Raw preview keeps unresolved placeholders and values visible.
    println!("URL: {}", template.resolve(&params));

    let missing: Vec<&str> = template
        .placeholders()
        .into_iter()
        .filter(|key| !params.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        eprintln!(
            "Note: unresolved placeholders: {} (use --param key=value)",
            missing.join(", ")
        );
    }

    if preview {
        return Ok(());
    }

    let dispatcher = Dispatcher::with_timeout(Duration::from_secs(timeout))?;
    let url = template.resolve_encoded(&params);
    let outcome = dispatcher.dispatch(&url, &tryit.response_type).await;
    println!("{}", outcome.pretty_print());
    Ok(())
}

async fn handle_check(
    data: &str,
    category: Option<&str>,
    timeout: u64,
    fix: bool,
    verbose: bool,
) -> apidex::Result<()> {
    if fix {
        require_file(data)?;
    }
    let mut entries = load_dataset(data).await?.into_entries();

    let candidates = healthcheck::candidates(&entries, category);
    let skipped = healthcheck::untestable(&entries, category).len();

    if candidates.is_empty() && skipped == 0 {
        println!(
            "No working APIs found{}",
            category.map(|c| format!(" in category '{c}'")).unwrap_or_default()
        );
        return Ok(());
    }

    let label = category.map(|c| format!(" ({c})")).unwrap_or_default();
    println!("Health check{label}");
    println!("{} testable, {skipped} skipped (no try-it URL)\n", candidates.len());

    let dispatcher = Dispatcher::with_timeout(Duration::from_secs(timeout))?;
    let total = candidates.len();
    let mut failures = Vec::new();
    let mut passed = 0;

    for (i, index) in candidates.into_iter().enumerate() {
        let result = healthcheck::probe(&dispatcher, &entries, index).await;
        let verdict = if result.passed { "PASS" } else { "FAIL" };
        println!("  [{}/{total}] {:<30} {verdict}  {}", i + 1, result.name, result.detail);
        if verbose {
            println!("           {}", result.url);
        }
        if result.passed {
            passed += 1;
        } else {
            failures.push(result);
        }
    }

    println!("\nResults: {passed} passed, {} failed, {skipped} skipped", failures.len());
    if !failures.is_empty() {
        println!("\nFailed APIs:");
        for failure in &failures {
            println!("  - {} ({})", failure.name, failure.category);
        }
    }

    if fix && !failures.is_empty() {
        let today = chrono::Local::now().date_naive();
        for failure in &failures {
            healthcheck::mark_broken(&mut entries[failure.index], &failure.detail, today);
        }
        let path = require_file(data)?;
        dataset::save_path(path, &entries)?;
        println!("\nMarked {} entr(ies) broken in {}", failures.len(), path.display());
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(ApidexError::CheckFailed(failures.len()))
    }
}

struct UpdateArgs {
    name: String,
    status: Option<String>,
    notes: Option<String>,
    try_url: Option<String>,
    try_type: Option<String>,
    try_params: Option<String>,
    clear_tryit: bool,
    category: Option<String>,
    dry_run: bool,
    yes: bool,
}

fn handle_update(data: &str, args: UpdateArgs) -> apidex::Result<()> {
    let path = require_file(data)?;

    if args.status.is_none() && args.notes.is_none() && args.try_url.is_none() && !args.clear_tryit
    {
        return Err(ApidexError::InvalidArgument(
            "at least one of --status, --notes, --try-url, or --clear-tryit is required"
                .to_string(),
        ));
    }
    if args.try_url.is_some() && args.try_type.is_none() {
        return Err(ApidexError::InvalidArgument(
            "--try-type is required when --try-url is specified".to_string(),
        ));
    }
    if args.try_params.is_some() && args.try_url.is_none() {
        return Err(ApidexError::InvalidArgument(
            "--try-params is only valid together with --try-url".to_string(),
        ));
    }
    if args.clear_tryit && args.try_url.is_some() {
        return Err(ApidexError::InvalidArgument(
            "--clear-tryit conflicts with --try-url".to_string(),
        ));
    }

    let try_it = if args.clear_tryit {
        TryItChange::Clear
    } else if let Some(url) = &args.try_url {
        let params: Option<BTreeMap<String, String>> = match &args.try_params {
            Some(raw) => Some(serde_json::from_str(raw).map_err(|e| {
                ApidexError::InvalidArgument(format!("invalid JSON for --try-params: {e}"))
            })?),
            None => None,
        };
        TryItChange::Set(TryIt {
            url: url.clone(),
            response_type: args
                .try_type
                .as_deref()
                .map(|t| ResponseKind::from(t.to_string()))
                .unwrap_or(ResponseKind::Json),
            params,
        })
    } else {
        TryItChange::Keep
    };

    let update = EntryUpdate {
        status: args.status.map(Status::from),
        notes: args.notes,
        try_it,
    };

    let mut entries = dataset::load_path(path)?;
    let index = {
        let matches = find_matches(&entries, &args.name, args.category.as_deref());
        if matches.len() != 1 {
            // Prints miss suggestions or the ambiguity listing, then errors.
            return resolve_entry(&entries, &args.name, args.category.as_deref()).map(|_| ());
        }
        let entry = matches[0];
        let Some(index) = entries.iter().position(|e| std::ptr::eq(e, entry)) else {
            return Err(ApidexError::NoMatch(args.name));
        };
        index
    };

    println!("BEFORE:\n{}\n", entries[index].pretty_print());

    let mut updated = entries[index].clone();
    apply_update(&mut updated, &update, chrono::Local::now().date_naive());
    println!("AFTER:\n{}\n", updated.pretty_print());

    if args.dry_run {
        println!("Dry run, no changes written.");
        return Ok(());
    }

    if !args.yes && !confirm("Write changes? [y/N] ") {
        println!("Cancelled.");
        return Ok(());
    }

    entries[index] = updated;
    dataset::save_path(path, &entries)?;
    println!("Updated '{}' in {}", entries[index].name, path.display());
    Ok(())
}

fn confirm(prompt: &str) -> bool {
    print!("{prompt}");
    std::io::stdout().flush().ok();
    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

async fn handle_stats(
    data: &str,
    category: Option<&str>,
    auth: Option<&str>,
    sort: ProgressSort,
    next: bool,
    pending: bool,
    json: bool,
) -> apidex::Result<()> {
    let dataset = load_dataset(data).await?;

    let entries: Vec<&ApiEntry> = dataset
        .entries()
        .iter()
        .filter(|e| auth.is_none_or(|a| e.auth.as_str() == a))
        .collect();
    if entries.is_empty() {
        if let Some(auth) = auth {
            return Err(ApidexError::NoMatch(format!("auth '{auth}'")));
        }
        println!("Catalogue is empty");
        return Ok(());
    }

    if pending {
        let Some(category) = category else {
            return Err(ApidexError::InvalidArgument(
                "--pending requires --category".to_string(),
            ));
        };
        return stats_pending(&entries, category, json);
    }

    if next {
        let candidates = closest_to_completion(entries.iter().copied(), 10);
        if json {
            println!("{}", serde_json::to_string_pretty(&candidates)?);
            return Ok(());
        }
        println!("Categories closest to completion:\n");
        for cat in &candidates {
            let width = 20usize;
            let filled = (cat.counts.percent_done() / 100.0 * width as f64) as usize;
            let bar: String = "█".repeat(filled) + &"░".repeat(width - filled);
            println!(
                "  {:<25} {bar} {}/{} ({} pending)",
                cat.name,
                cat.counts.tested(),
                cat.counts.total,
                cat.counts.pending
            );
        }
        return Ok(());
    }

    if let Some(category) = category {
        return stats_category_detail(&entries, category, json);
    }

    let categories = by_category(entries.iter().copied(), sort);
    if json {
        println!("{}", serde_json::to_string_pretty(&categories)?);
        return Ok(());
    }

    let totals = StatusCounts::tally(entries.iter().copied());
    let auth_label = auth.map(|a| format!(" (auth: {a})")).unwrap_or_default();
    println!("Catalogue progress{auth_label}");
    println!(
        "{}/{} tested ({:.0}%)\n",
        totals.tested(),
        totals.total,
        totals.percent_done()
    );

    let mut rows: Vec<CategoryRow> = categories.iter().map(CategoryRow::from).collect();
    rows.push(CategoryRow::total(&totals));
    println!("{}", Table::new(rows));
    Ok(())
}

fn stats_pending(entries: &[&ApiEntry], category: &str, json: bool) -> apidex::Result<()> {
    let mut pending: Vec<&&ApiEntry> = entries
        .iter()
        .filter(|e| e.category == category && e.status == Status::Pending)
        .collect();
    pending.sort_by_key(|e| e.name.to_lowercase());

    if json {
        let list: Vec<&ApiEntry> = pending.iter().map(|e| **e).collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    if pending.is_empty() {
        println!("No pending APIs in '{category}'");
        return Ok(());
    }
    println!("{category} — {} pending\n", pending.len());
    for entry in pending {
        println!("  {:<12} {}", entry.auth.as_str(), entry.name);
        println!("               {}", entry.url);
    }
    Ok(())
}

fn stats_category_detail(entries: &[&ApiEntry], category: &str, json: bool) -> apidex::Result<()> {
    let mut members: Vec<&&ApiEntry> =
        entries.iter().filter(|e| e.category == category).collect();
    if members.is_empty() {
        let mut available: Vec<&str> = entries.iter().map(|e| e.category.as_str()).collect();
        available.sort_unstable();
        available.dedup();
        eprintln!("Available categories: {}", available.join(", "));
        return Err(ApidexError::NoMatch(format!("category '{category}'")));
    }

    // Tested entries first, pending last, names alphabetical within a rank.
    members.sort_by_key(|e| (e.status.rank(), e.name.to_lowercase()));

    if json {
        let list: Vec<&ApiEntry> = members.iter().map(|e| **e).collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    println!("{category} — {} APIs\n", members.len());
    for entry in &members {
        let notes = if entry.notes.is_empty() {
            String::new()
        } else {
            format!(" — {}", entry.notes)
        };
        println!(
            "  {:<10} {:<12} {}{notes}",
            entry.status.as_str(),
            entry.auth.as_str(),
            entry.name
        );
    }

    let counts = StatusCounts::tally(members.iter().map(|e| **e));
    println!(
        "\nSummary: {}/{} tested ({:.0}%)",
        counts.tested(),
        counts.total,
        counts.percent_done()
    );
    Ok(())
}

fn handle_parse(input: &Path, output: PathBuf, force: bool) -> apidex::Result<()> {
    let raw = std::fs::read_to_string(input).map_err(|source| ApidexError::DatasetRead {
        path: input.display().to_string(),
        source,
    })?;

    // Refuse to clobber testing progress unless forced.
    if output.exists() && !force {
        let existing = dataset::load_path(&output)?;
        let tested = existing.iter().filter(|e| e.status != Status::Pending).count();
        if tested > 0 {
            return Err(ApidexError::InvalidArgument(format!(
                "{} has {tested} tested entries; re-parsing would reset them (use --force)",
                output.display()
            )));
        }
    }

    let entries = markdown::parse_markdown(&raw);
    dataset::save_path(&output, &entries)?;

    let mut categories: Vec<&str> = entries.iter().map(|e| e.category.as_str()).collect();
    categories.sort_unstable();
    categories.dedup();
    println!(
        "Parsed {} APIs across {} categories into {}",
        entries.len(),
        categories.len(),
        output.display()
    );

    let mut by_auth: BTreeMap<&str, usize> = BTreeMap::new();
    for entry in &entries {
        *by_auth.entry(entry.auth.as_str()).or_default() += 1;
    }
    for (auth, count) in by_auth {
        println!("  {auth}: {count}");
    }
    Ok(())
}

async fn handle_validate(data: &str) -> apidex::Result<()> {
    let dataset = load_dataset(data).await?;
    let violations = validate::validate(dataset.entries());

    if violations.is_empty() {
        println!("{} entries, no violations", dataset.len());
        return Ok(());
    }

    for violation in &violations {
        println!("{violation}");
    }
    Err(ApidexError::ValidationFailed(violations.len()))
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct EntryRow {
    name: String,
    category: String,
    auth: String,
    https: String,
    cors: String,
    status: String,
    checked: String,
}

impl From<&ApiEntry> for EntryRow {
    fn from(e: &ApiEntry) -> Self {
        Self {
            name: e.name.clone(),
            category: e.category.clone(),
            auth: e.auth.to_string(),
            https: if e.https { "yes" } else { "no" }.to_string(),
            cors: e.cors.to_string(),
            status: e.status.to_string(),
            checked: e.date_checked.map(|d| d.to_string()).unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct CategoryRow {
    category: String,
    total: usize,
    working: usize,
    broken: usize,
    #[tabled(rename = "needs-key")]
    needs_key: usize,
    #[tabled(rename = "paid-only")]
    paid_only: usize,
    skipped: usize,
    pending: usize,
    done: String,
}

impl From<&apidex::CategoryProgress> for CategoryRow {
    fn from(c: &apidex::CategoryProgress) -> Self {
        Self {
            category: c.name.clone(),
            total: c.counts.total,
            working: c.counts.working,
            broken: c.counts.broken,
            needs_key: c.counts.needs_key,
            paid_only: c.counts.paid_only,
            skipped: c.counts.skipped,
            pending: c.counts.pending,
            done: format!("{:.0}%", c.counts.percent_done()),
        }
    }
}

impl CategoryRow {
    fn total(counts: &StatusCounts) -> Self {
        Self {
            category: "TOTAL".to_string(),
            total: counts.total,
            working: counts.working,
            broken: counts.broken,
            needs_key: counts.needs_key,
            paid_only: counts.paid_only,
            skipped: counts.skipped,
            pending: counts.pending,
            done: format!("{:.0}%", counts.percent_done()),
        }
    }
}
