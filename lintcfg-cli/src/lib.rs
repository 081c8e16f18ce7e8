//! lintcfg CLI (made by FontLab https://www.fontlab.com/)

use std::env;
use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};
use log::debug;

use lintcfg_core::catalog::Catalog;
use lintcfg_core::document::SpecDocument;
use lintcfg_core::font::{parse_font_infos, FontInfo};
use lintcfg_core::lint::{resolve_fonts, FontTests, ResolveOptions};
use lintcfg_core::output::{write_json_pretty, write_ndjson};

pub mod server;

/// CLI entrypoint for lintcfg.
#[derive(Debug, Parser)]
#[command(
    name = "lintcfg",
    about = "Decide which font lint checks run for each font (made by FontLab https://www.fontlab.com/)"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve the active lint tests for font metadata records
    Resolve(ResolveArgs),
    /// Validate a spec file and print its normalised form
    Check(CheckArgs),
    /// List the lint tags of the catalog
    Tags(TagsArgs),
    /// Show which spec blocks decide one tag for each font
    Explain(ExplainArgs),
    /// Serve resolution over HTTP
    Serve(ServeArgs),
}

#[derive(Debug, Args)]
struct CatalogArgs {
    /// Catalog outline replacing the built-in lint tags (also LINTCFG_CATALOG)
    #[arg(long = "catalog", value_hint = ValueHint::FilePath)]
    catalog: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct SpecArgs {
    /// Lint spec file ("-" reads STDIN)
    #[arg(long = "spec", value_hint = ValueHint::FilePath)]
    spec: PathBuf,

    #[command(flatten)]
    catalog: CatalogArgs,
}

#[derive(Debug, Args)]
struct ResolveArgs {
    #[command(flatten)]
    spec: SpecArgs,

    /// Font metadata files (JSON array, object, or NDJSON; "-" reads STDIN)
    #[arg(value_hint = ValueHint::FilePath, required_unless_present = "stdin")]
    inputs: Vec<PathBuf>,

    /// Read font metadata from STDIN
    #[arg(long = "stdin", action = ArgAction::SetTrue)]
    stdin: bool,

    /// List the disabled tests instead of the active ones (plain/columns output)
    #[arg(long = "disabled", action = ArgAction::SetTrue)]
    disabled: bool,

    /// Number of worker threads
    #[arg(short = 'j', long = "jobs")]
    jobs: Option<usize>,

    /// Emit a single JSON array
    #[arg(long = "json", action = ArgAction::SetTrue, conflicts_with = "ndjson")]
    json: bool,

    /// Emit newline-delimited JSON
    #[arg(long = "ndjson", action = ArgAction::SetTrue)]
    ndjson: bool,

    /// Format output as padded columns, one line per font
    #[arg(long = "columns", action = ArgAction::SetTrue)]
    columns: bool,

    /// Control colorized output (auto|always|never)
    #[arg(long = "color", default_value_t = ColorChoice::Auto, value_enum)]
    color: ColorChoice,
}

#[derive(Debug, Args)]
struct CheckArgs {
    #[command(flatten)]
    spec: SpecArgs,
}

#[derive(Debug, Args)]
struct TagsArgs {
    #[command(flatten)]
    catalog: CatalogArgs,

    /// Only list tags at or below this prefix
    #[arg(long = "under", value_hint = ValueHint::Other)]
    under: Option<String>,

    /// Show outline comments next to tags
    #[arg(long = "comments", action = ArgAction::SetTrue)]
    comments: bool,
}

#[derive(Debug, Args)]
struct ExplainArgs {
    #[command(flatten)]
    spec: SpecArgs,

    /// Tag to explain
    #[arg(long = "tag", value_hint = ValueHint::Other)]
    tag: String,

    /// Font metadata files ("-" reads STDIN)
    #[arg(value_hint = ValueHint::FilePath, required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct ServeArgs {
    #[command(flatten)]
    spec: SpecArgs,

    /// Address to listen on
    #[arg(long = "bind", default_value = "127.0.0.1:8765")]
    bind: String,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

/// Parse CLI args and execute the selected command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Resolve(args) => run_resolve(args),
        Command::Check(args) => run_check(args),
        Command::Tags(args) => run_tags(args),
        Command::Explain(args) => run_explain(args),
        Command::Serve(args) => run_serve(args),
    }
}

fn run_resolve(args: ResolveArgs) -> Result<()> {
    ensure_single_stdin_reader(&args.spec, &args.inputs, args.stdin)?;
    let doc = load_spec(&args.spec)?;
    let fonts = gather_fonts(&args.inputs, args.stdin, io::stdin().lock())?;
    debug!("resolving {} fonts against {} spec blocks", fonts.len(), doc.len());

    let opts = ResolveOptions {
        jobs: args.jobs,
        include_disabled: args.disabled || args.json || args.ndjson,
    };
    let results = resolve_fonts(&doc, &fonts, &opts)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let use_color = match args.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => handle.is_terminal(),
    };

    if args.ndjson {
        write_ndjson(&results, &mut handle)?;
    } else if args.json {
        write_json_pretty(&results, &mut handle)?;
    } else if args.columns {
        write_columns(&results, &mut handle, args.disabled, use_color)?;
    } else {
        write_plain(&results, &mut handle, args.disabled, use_color)?;
    }

    Ok(())
}

fn run_check(args: CheckArgs) -> Result<()> {
    let doc = load_spec(&args.spec)?;
    let mut out = io::stdout().lock();
    write!(out, "{doc}")?;
    writeln!(out, "# {} blocks, {} catalog tags", doc.len(), doc.catalog().len())?;
    Ok(())
}

fn run_tags(args: TagsArgs) -> Result<()> {
    let catalog = load_catalog(&args.catalog)?;
    let mut out = io::stdout().lock();
    write_tags(&catalog, args.under.as_deref(), args.comments, &mut out)
}

fn run_explain(args: ExplainArgs) -> Result<()> {
    ensure_single_stdin_reader(&args.spec, &args.inputs, false)?;
    let doc = load_spec(&args.spec)?;
    let fonts = gather_fonts(&args.inputs, false, io::stdin().lock())?;
    let mut out = io::stdout().lock();
    write_explanations(&doc, &fonts, &args.tag, &mut out)
}

fn run_serve(args: ServeArgs) -> Result<()> {
    let doc = Arc::new(load_spec(&args.spec)?);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;
    runtime.block_on(server::serve(&args.bind, doc))
}

/// Catalog from `--catalog`, then `LINTCFG_CATALOG`, then the built-in outline.
fn load_catalog(args: &CatalogArgs) -> Result<Arc<Catalog>> {
    let path = args
        .catalog
        .clone()
        .or_else(|| env::var_os("LINTCFG_CATALOG").map(PathBuf::from));

    match path {
        Some(path) => {
            debug!("loading catalog from {}", path.display());
            let catalog = Catalog::from_path(&path)
                .with_context(|| format!("loading catalog {}", path.display()))?;
            Ok(Arc::new(catalog))
        }
        None => Ok(Catalog::builtin()),
    }
}

fn load_spec(args: &SpecArgs) -> Result<SpecDocument> {
    let catalog = load_catalog(&args.catalog)?;
    if args.spec == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("reading spec from STDIN")?;
        return SpecDocument::parse_with(catalog, &text).context("parsing spec from STDIN");
    }

    SpecDocument::from_path(&args.spec, catalog)
        .with_context(|| format!("loading spec {}", args.spec.display()))
}

/// STDIN can feed either the spec (`--spec -`) or the font metadata, never both.
fn ensure_single_stdin_reader(
    spec: &SpecArgs,
    inputs: &[PathBuf],
    read_stdin: bool,
) -> Result<()> {
    let fonts_from_stdin = read_stdin || inputs.iter().any(|path| path == Path::new("-"));
    if spec.spec == Path::new("-") && fonts_from_stdin {
        return Err(anyhow!(
            "STDIN cannot carry both the spec (--spec -) and font metadata (--stdin or -)"
        ));
    }
    Ok(())
}

fn gather_fonts(inputs: &[PathBuf], read_stdin: bool, mut stdin: impl Read) -> Result<Vec<FontInfo>> {
    let mut fonts = Vec::new();
    let mut stdin_used = false;

    let mut read_stdin_once = |fonts: &mut Vec<FontInfo>| -> Result<()> {
        if stdin_used {
            return Ok(());
        }
        stdin_used = true;
        let mut text = String::new();
        stdin
            .read_to_string(&mut text)
            .context("reading font metadata from STDIN")?;
        fonts.extend(parse_font_infos(&text)?);
        Ok(())
    };

    if read_stdin {
        read_stdin_once(&mut fonts)?;
    }

    for path in inputs {
        if path == Path::new("-") {
            read_stdin_once(&mut fonts)?;
        } else {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading font metadata {}", path.display()))?;
            fonts.extend(
                parse_font_infos(&text).with_context(|| format!("in {}", path.display()))?,
            );
        }
    }

    if fonts.is_empty() {
        return Err(anyhow!("no font metadata provided"));
    }

    Ok(fonts)
}

fn shown_tags(result: &FontTests, disabled: bool) -> &[String] {
    if disabled {
        result.disabled.as_deref().unwrap_or(&[])
    } else {
        &result.tests
    }
}

fn write_plain(results: &[FontTests], mut w: impl Write, disabled: bool, color: bool) -> Result<()> {
    for item in results {
        let header = apply_color(item.font.label(), color, AnsiColor::Cyan);
        writeln!(w, "{header}")?;
        for tag in shown_tags(item, disabled) {
            writeln!(w, "  {tag}")?;
        }
    }
    Ok(())
}

fn write_columns(results: &[FontTests], mut w: impl Write, disabled: bool, color: bool) -> Result<()> {
    let label_width = results
        .iter()
        .map(|r| r.font.label().len())
        .max()
        .unwrap_or(0)
        .clamp(0, 120);

    for item in results {
        let padded = format!("{:<label_width$}", item.font.label());
        let tags = shown_tags(item, disabled);
        let count = format!(
            "{:>3} {}",
            tags.len(),
            if disabled { "disabled" } else { "active" }
        );

        let rendered_label = apply_color(&padded, color, AnsiColor::Cyan);
        let rendered_count = apply_color(&count, color, AnsiColor::Yellow);
        let rendered_tags = apply_color(&tags.join(","), color, AnsiColor::Green);

        writeln!(w, "{rendered_label}  {rendered_count}  {rendered_tags}")?;
    }

    Ok(())
}

fn write_tags(catalog: &Catalog, under: Option<&str>, comments: bool, mut w: impl Write) -> Result<()> {
    let selected: Option<Vec<&str>> = under.map(|prefix| catalog.expand(prefix)).transpose()?;

    for entry in catalog.entries() {
        if let Some(selected) = &selected {
            if !selected.contains(&entry.tag.as_str()) {
                continue;
            }
        }
        match (&entry.comment, comments) {
            (Some(comment), true) => writeln!(w, "{}  -- {comment}", entry.tag)?,
            _ => writeln!(w, "{}", entry.tag)?,
        }
    }
    Ok(())
}

fn write_explanations(
    doc: &SpecDocument,
    fonts: &[FontInfo],
    tag: &str,
    mut w: impl Write,
) -> Result<()> {
    for font in fonts {
        let deciders = doc.explain(font, tag)?;
        let verdict = match deciders.last() {
            Some(&last) => match doc.entries()[last].selection.verdict(tag) {
                Some(true) => "enabled",
                _ => "disabled",
            },
            None => "enabled (default)",
        };

        let blocks: Vec<String> = deciders.iter().map(|idx| format!("#{idx}")).collect();
        if blocks.is_empty() {
            writeln!(w, "{}: {tag} {verdict}", font.label())?;
        } else {
            writeln!(w, "{}: {tag} {verdict} by blocks {}", font.label(), blocks.join(" "))?;
        }
    }
    Ok(())
}

#[derive(Copy, Clone)]
enum AnsiColor {
    Cyan,
    Yellow,
    Green,
}

fn apply_color(text: &str, color: bool, code: AnsiColor) -> String {
    if !color {
        return text.to_string();
    }

    let code_str = match code {
        AnsiColor::Cyan => "36",
        AnsiColor::Yellow => "33",
        AnsiColor::Green => "32",
    };

    format!("\u{1b}[{}m{}\u{1b}[0m", code_str, text)
}
