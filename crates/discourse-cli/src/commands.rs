use std::path::{Path, PathBuf};
use std::time::Duration;

use color_eyre::eyre::{bail, eyre, Result, WrapErr};
use discourse_core::config::{DEFAULT_CONFIG_FILE, DEFAULT_SCHEMA_FILE};
use discourse_core::{
    run_query, CompiledQuery, Config, ConditionId, FileStorage, Query, QueryCompiler,
    QueryManager, ResultSort, RoamApiExecutor, SchemaRegistry, SearchResult,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::cli::QueryCommands;

/// Loaded configuration and schema shared by every command.
pub struct Context {
    pub config: Config,
    pub registry: SchemaRegistry,
}

/// `--config` when given, otherwise the usual search path.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .wrap_err_with(|| format!("loading config {}", path.display())),
        None => Ok(Config::load()?),
    }
}

impl Context {
    pub fn new(config: Config, schema_path: Option<&Path>) -> Result<Self> {
        let schema_path = schema_path
            .map(Path::to_path_buf)
            .or_else(|| config.schema.path.as_ref().map(PathBuf::from));
        let registry = match schema_path {
            Some(path) => SchemaRegistry::from_file(&path)
                .wrap_err_with(|| format!("loading schema {}", path.display()))?,
            None => SchemaRegistry::with_defaults(),
        };

        info!(
            node_types = registry.node_types().len(),
            relations = registry.relations().len(),
            fingerprint = %registry.fingerprint(),
            "Schema loaded"
        );

        Ok(Self { config, registry })
    }

    fn manager(&self) -> Result<QueryManager<FileStorage>> {
        let storage = FileStorage::with_config(self.config.storage.clone());
        Ok(QueryManager::new(storage)?.with_cache_capacity(self.config.query.cache_capacity))
    }

    fn read_query(&self, path: &Path) -> Result<Query> {
        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("reading query {}", path.display()))?;
        Query::from_text(&text, &self.registry.relation_labels())
            .wrap_err_with(|| format!("parsing query {}", path.display()))
    }
}

pub fn init(force: bool) -> Result<()> {
    for path in [DEFAULT_CONFIG_FILE, DEFAULT_SCHEMA_FILE] {
        if Path::new(path).exists() && !force {
            bail!("{} already exists (use --force to overwrite)", path);
        }
    }

    let mut config = Config::default();
    config.schema.path = Some(DEFAULT_SCHEMA_FILE.to_string());
    config.save(DEFAULT_CONFIG_FILE)?;
    SchemaRegistry::with_defaults()
        .to_file()
        .save(DEFAULT_SCHEMA_FILE)?;

    println!("Wrote {} and {}", DEFAULT_CONFIG_FILE, DEFAULT_SCHEMA_FILE);
    Ok(())
}

pub fn types(ctx: &Context) {
    for node_type in ctx.registry.node_types() {
        println!(
            "{:<6} {:<14} {}",
            node_type.type_id, node_type.label, node_type.format
        );
    }
}

pub fn labels(ctx: &Context) {
    for label in ctx.registry.relation_labels() {
        println!("{}", label);
    }
}

pub fn match_title(ctx: &Context, title: &str) {
    let matches = ctx.registry.format_matches(title);
    match matches.as_slice() {
        [] => println!("No node type matches '{}'", title),
        [node_type] => println!("{} ({})", node_type.label, node_type.type_id),
        many => {
            println!("Ambiguous: '{}' matches several formats", title);
            for node_type in many {
                println!("  {} ({})", node_type.label, node_type.type_id);
            }
        }
    }
}

pub fn compile(ctx: &Context, files: &[PathBuf]) -> Result<()> {
    if files.is_empty() {
        let compiled = ctx.manager()?.compile_scratch(&ctx.registry)?;
        print_compiled(&compiled);
        return Ok(());
    }

    let compiler = QueryCompiler::new(&ctx.registry);
    for path in files {
        let query = ctx.read_query(path)?;
        let compiled = compiler.compile(&query)?;
        if files.len() > 1 {
            println!(";; {}", path.display());
        }
        print_compiled(&compiled);
    }
    Ok(())
}

fn print_compiled(compiled: &CompiledQuery) {
    for warning in compiled.warnings() {
        eprintln!("warning: {}", warning);
    }
    if compiled.is_unsatisfiable() {
        eprintln!("warning: query cannot match anything");
    }
    println!("{}", compiled.text());
}

pub async fn run(
    ctx: &Context,
    file: Option<&Path>,
    saved: Option<&str>,
    sort: ResultSort,
    json: bool,
) -> Result<()> {
    let compiled = match (file, saved) {
        (Some(path), _) => {
            let query = ctx.read_query(path)?;
            QueryCompiler::new(&ctx.registry).compile(&query)?
        }
        (None, Some(label)) => ctx.manager()?.compile_saved(&ctx.registry, label)?,
        (None, None) => ctx.manager()?.compile_scratch(&ctx.registry)?,
    };
    for warning in compiled.warnings() {
        eprintln!("warning: {}", warning);
    }

    let executor = RoamApiExecutor::from_config(&ctx.config.executor)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Querying graph...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let outcome = run_query(&executor, &compiled).await;
    spinner.finish_and_clear();

    if let Some(diagnostic) = &outcome.diagnostic {
        eprintln!("Query failed: {}", diagnostic.message);
        eprintln!("{}", diagnostic.query);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.rows)?);
        return Ok(());
    }

    let mut results = SearchResult::from_rows(&outcome.rows);
    sort.sort(&mut results);
    for result in &results {
        println!("{}  ({})", result.text, result.page_uid);
    }
    println!("{} result(s), sorted by {}", results.len(), sort);
    Ok(())
}

pub fn query(ctx: &Context, command: QueryCommands) -> Result<()> {
    let mut manager = ctx.manager()?;

    match command {
        QueryCommands::Show => print_scratch(manager.scratch()),
        QueryCommands::Return { variable } => {
            manager.set_return_variable(&variable)?;
            print_scratch(manager.scratch());
        }
        QueryCommands::Add {
            source,
            relation,
            target,
        } => {
            check_relation(ctx, &relation)?;
            let uid = manager.add_condition(&source, &relation, &target.join(" "))?;
            println!("Added condition {}", uid);
        }
        QueryCommands::Update {
            uid,
            source,
            relation,
            target,
        } => {
            check_relation(ctx, &relation)?;
            manager.update_condition(&ConditionId::new(uid), &source, &relation, &target.join(" "))?;
            print_scratch(manager.scratch());
        }
        QueryCommands::Remove { uid } => {
            let removed = manager.remove_condition(&ConditionId::new(uid))?;
            println!("Removed: {}", removed.to_line());
        }
        QueryCommands::Sources => {
            let next = manager.scratch().conditions.len();
            for candidate in manager.source_candidates(next) {
                println!("{}", candidate);
            }
        }
        QueryCommands::Clear => {
            manager.clear_scratch()?;
            println!("Scratch query cleared");
        }
        QueryCommands::Save { label } => {
            let saved = manager.save_scratch(label.as_deref())?;
            println!("Saved '{}'", saved.label);
        }
        QueryCommands::List => {
            for saved in manager.list_saved()? {
                println!(
                    "{}  [{}]",
                    saved.label,
                    saved.created_at.format("%Y-%m-%d %H:%M")
                );
                for line in &saved.lines {
                    println!("    {}", line);
                }
            }
        }
        QueryCommands::Edit { label } => {
            let scratch = manager.edit_saved(&ctx.registry, &label)?;
            print_scratch(scratch);
        }
        QueryCommands::Delete { label } => {
            manager.delete_saved(&label)?;
            println!("Deleted '{}'", label);
        }
    }

    Ok(())
}

fn check_relation(ctx: &Context, relation: &str) -> Result<()> {
    if ctx.registry.all_relation_labels().contains(relation)
        || ctx.registry.is_wildcard(relation)
        || ctx.registry.native(relation).is_some()
    {
        return Ok(());
    }
    Err(eyre!(
        "unknown relation '{}' (see `discourse labels`)",
        relation
    ))
}

fn print_scratch(query: &Query) {
    if query.return_variable.is_empty() && query.is_empty() {
        println!("Scratch query is empty");
        return;
    }
    println!("Find {} Where", query.return_variable);
    for condition in &query.conditions {
        println!("  [{}] {}", condition.uid, condition.to_line());
    }
}
