/// lintcfg-core: the quiet referee deciding which font checks get to play
///
/// A font project rarely wants every lint check on every font. One vendor
/// has agreed to live with off-curve extrema, one CJK release has no use for
/// the name table checks, one version got a special pass. This library reads
/// those agreements from a small text file and answers, for any one font,
/// exactly which checks should run.
///
/// ## How the Pieces Fit
///
/// - [`catalog::Catalog`]: the outline of every known check tag, nested like
///   a table of contents (`name`, `name/version`, `name/version/hinted_suffix`)
/// - [`condition::ConditionMatcher`]: which fonts a block talks about
/// - [`selection::TestSelection`]: what the block switches on and off
/// - [`document::SpecDocument`]: all blocks, in file order, where the last
///   word always wins
///
/// ## A Sample Conversation
///
/// ```rust
/// use lintcfg_core::document::SpecDocument;
/// use lintcfg_core::font::FontInfo;
///
/// let spec = SpecDocument::parse(
///     "vendor Monotype\n\
///      disable paths/extrema   # they prefer not to handle this\n\
///      condition\n\
///      filename NotoSansCJK-Regular.ttc\n\
///      disable name\n",
/// )?;
///
/// let font = FontInfo {
///     filename: "NotoSans-Regular.ttf".into(),
///     vendor: "Monotype".into(),
///     ..FontInfo::default()
/// };
///
/// let tests = spec.resolve(&font);
/// assert!(!tests.contains("paths/extrema"));
/// assert!(tests.contains("name/copyright"));
/// # Ok::<(), lintcfg_core::error::Error>(())
/// ```
///
/// ## Sharing
///
/// Documents are immutable once parsed, so [`document::SpecDocument::resolve`]
/// can be called from as many threads as you like; [`lint::resolve_fonts`]
/// does exactly that with Rayon.
///
/// ---
///
/// Crafted with care at FontLab https://www.fontlab.com/

pub mod catalog;
pub mod condition;
pub mod document;
pub mod error;
pub mod font;
pub mod lint;
pub mod output;
pub mod parser;
pub mod selection;
