//! Test scripting configuration
//!
//! A scripting file is a YAML list of rules. Each rule names the scenarios
//! and platforms it applies to (as regular expressions) and the scripts to
//! run before the test, after flashing, and after the test:
//!
//! ```yaml
//! - scenarios: ["kernel.common.*"]
//!   platforms: ["frdm_k64f"]
//!   pre_script: scripts/power_cycle.sh
//!   comment: "Board needs a power cycle"
//! ```
//!
//! Rules are kept in file order, and lookups return the first rule that
//! matches. A later, more specific rule never overrides an earlier one.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ScriptingError, ScriptingResult};

/// Comment attached to rules that do not provide one
pub const DEFAULT_COMMENT: &str = "NA";

/// Pattern entry meaning "no constraint"
const ANY_PATTERN: &str = "all";

/// Which half of a (scenario, platform) query a pattern applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternDimension {
    Scenario,
    Platform,
}

impl fmt::Display for PatternDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternDimension::Scenario => write!(f, "scenario"),
            PatternDimension::Platform => write!(f, "platform"),
        }
    }
}

/// One scripting rule as written in a scripting file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptingElementConfig {
    /// Scenario name patterns; empty or containing "all" matches every scenario
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scenarios: Vec<String>,

    /// Platform name patterns; empty or containing "all" matches every platform
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub platforms: Vec<String>,

    /// Script run before the test starts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_script: Option<PathBuf>,

    /// Script run once the image has been flashed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_flash_script: Option<PathBuf>,

    /// Script run after the test finished
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_script: Option<PathBuf>,

    /// Free-text reason for the rule
    #[serde(default = "default_comment")]
    pub comment: String,
}

fn default_comment() -> String {
    DEFAULT_COMMENT.to_string()
}

impl Default for ScriptingElementConfig {
    fn default() -> Self {
        Self {
            scenarios: Vec::new(),
            platforms: Vec::new(),
            pre_script: None,
            post_flash_script: None,
            post_script: None,
            comment: default_comment(),
        }
    }
}

impl ScriptingElementConfig {
    /// True when at least one of the patterns or scripts is given.
    /// Empty script paths count as absent.
    fn has_properties(&self) -> bool {
        let has_script = |script: &Option<PathBuf>| {
            script
                .as_deref()
                .is_some_and(|path| !path.as_os_str().is_empty())
        };

        !self.scenarios.is_empty()
            || !self.platforms.is_empty()
            || has_script(&self.pre_script)
            || has_script(&self.post_flash_script)
            || has_script(&self.post_script)
    }
}

/// Compiled name constraint for one dimension of a rule
#[derive(Debug, Clone)]
pub enum NameFilter {
    /// No constraint
    Any,
    /// Name must match at least one pattern, anchored at its first character
    Patterns(Vec<Regex>),
}

impl NameFilter {
    /// Compiles every pattern except "all". A list that is empty or
    /// contains "all" accepts any name.
    pub fn compile(dimension: PatternDimension, patterns: &[String]) -> ScriptingResult<Self> {
        let compiled = patterns
            .iter()
            .filter(|pattern| pattern.as_str() != ANY_PATTERN)
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| ScriptingError::InvalidPattern {
                    dimension,
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<ScriptingResult<Vec<_>>>()?;

        if compiled.is_empty() || compiled.len() != patterns.len() {
            Ok(NameFilter::Any)
        } else {
            Ok(NameFilter::Patterns(compiled))
        }
    }

    /// Whether `name` satisfies this filter
    pub fn accepts(&self, name: &str) -> bool {
        match self {
            NameFilter::Any => true,
            NameFilter::Patterns(patterns) => matches_any(name, patterns),
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, NameFilter::Any)
    }
}

/// Prefix-anchored match: the pattern must match starting at position 0 but
/// need not consume the whole name. Leftmost-first search finds a match at 0
/// whenever one exists.
fn matches_any(name: &str, patterns: &[Regex]) -> bool {
    patterns
        .iter()
        .any(|pattern| pattern.find(name).is_some_and(|m| m.start() == 0))
}

/// Nothing but whitespace and comments
fn is_blank_document(content: &str) -> bool {
    content.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    })
}

/// Document values that stand for "no rules"
fn is_empty_value(value: &serde_yaml::Value) -> bool {
    use serde_yaml::Value;

    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Sequence(seq) => seq.is_empty(),
        Value::Mapping(map) => map.is_empty(),
        Value::Tagged(_) => false,
    }
}

/// A single validated scripting rule
///
/// Patterns are compiled once at construction and the rule is immutable
/// afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ScriptingElementConfig", into = "ScriptingElementConfig")]
pub struct ScriptingElement {
    config: ScriptingElementConfig,
    scenario_filter: NameFilter,
    platform_filter: NameFilter,
}

impl ScriptingElement {
    /// Validate a rule and compile its patterns
    pub fn new(config: ScriptingElementConfig) -> ScriptingResult<Self> {
        if !config.has_properties() {
            return Err(ScriptingError::EmptyElement);
        }

        let scenario_filter = NameFilter::compile(PatternDimension::Scenario, &config.scenarios)?;
        let platform_filter = NameFilter::compile(PatternDimension::Platform, &config.platforms)?;

        Ok(Self {
            config,
            scenario_filter,
            platform_filter,
        })
    }

    /// Both the scenario and the platform constraint must hold.
    pub fn matches(&self, scenario: &str, platform: &str) -> bool {
        self.scenario_filter.accepts(scenario) && self.platform_filter.accepts(platform)
    }

    pub fn scenarios(&self) -> &[String] {
        &self.config.scenarios
    }

    pub fn platforms(&self) -> &[String] {
        &self.config.platforms
    }

    pub fn pre_script(&self) -> Option<&Path> {
        self.config.pre_script.as_deref()
    }

    pub fn post_flash_script(&self) -> Option<&Path> {
        self.config.post_flash_script.as_deref()
    }

    pub fn post_script(&self) -> Option<&Path> {
        self.config.post_script.as_deref()
    }

    pub fn comment(&self) -> &str {
        &self.config.comment
    }

    pub fn scenario_filter(&self) -> &NameFilter {
        &self.scenario_filter
    }

    pub fn platform_filter(&self) -> &NameFilter {
        &self.platform_filter
    }

    /// The rule as it was written
    pub fn config(&self) -> &ScriptingElementConfig {
        &self.config
    }
}

impl TryFrom<ScriptingElementConfig> for ScriptingElement {
    type Error = ScriptingError;

    fn try_from(config: ScriptingElementConfig) -> ScriptingResult<Self> {
        Self::new(config)
    }
}

impl From<ScriptingElement> for ScriptingElementConfig {
    fn from(element: ScriptingElement) -> Self {
        element.config
    }
}

/// Ordered collection of scripting rules
#[derive(Debug, Clone, Default)]
pub struct ScriptingData {
    elements: Vec<ScriptingElement>,
}

impl ScriptingData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_elements(elements: Vec<ScriptingElement>) -> Self {
        Self { elements }
    }

    /// Load rules from a scripting file
    pub fn load_from_yaml<P: AsRef<Path>>(filename: P) -> ScriptingResult<Self> {
        let path = filename.as_ref();
        let origin = path.display().to_string();
        let content = fs::read_to_string(path)
            .map_err(|source| ScriptingError::Read {
                origin: origin.clone(),
                source,
            })?;

        Self::load_from_str(&content, &origin)
    }

    /// Load rules from YAML text; `origin` names the source in errors.
    ///
    /// An empty document, or one holding a false-like value (`null`,
    /// `false`, `0`, `""`, `[]`, `{}`), yields no rules.
    pub fn load_from_str(content: &str, origin: &str) -> ScriptingResult<Self> {
        let parse_error = |source| ScriptingError::Parse {
            origin: origin.to_string(),
            source,
        };

        let elements = if is_blank_document(content) {
            Vec::new()
        } else {
            let document: serde_yaml::Value = serde_yaml::from_str(content).map_err(parse_error)?;
            if is_empty_value(&document) {
                Vec::new()
            } else {
                serde_yaml::from_value::<Vec<ScriptingElement>>(document).map_err(parse_error)?
            }
        };

        let data = Self::from_elements(elements);
        crate::twister_log_debug!(origin, elements = data.len(), "loaded scripting rules");
        Ok(data)
    }

    /// Append `other`'s rules after the existing ones
    pub fn extend(&mut self, other: ScriptingData) {
        self.elements.extend(other.elements);
    }

    /// First rule matching the scenario and platform
    pub fn find_matching_scripting(
        &self,
        scenario: &str,
        platform: &str,
    ) -> Option<&ScriptingElement> {
        self.elements
            .iter()
            .find(|element| element.matches(scenario, platform))
    }

    pub fn elements(&self) -> &[ScriptingElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScriptingElement> {
        self.elements.iter()
    }
}

impl Extend<ScriptingElement> for ScriptingData {
    fn extend<T: IntoIterator<Item = ScriptingElement>>(&mut self, iter: T) {
        self.elements.extend(iter);
    }
}

impl FromIterator<ScriptingElement> for ScriptingData {
    fn from_iter<T: IntoIterator<Item = ScriptingElement>>(iter: T) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ScriptingData {
    type Item = &'a ScriptingElement;
    type IntoIter = std::slice::Iter<'a, ScriptingElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl IntoIterator for ScriptingData {
    type Item = ScriptingElement;
    type IntoIter = std::vec::IntoIter<ScriptingElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

/// Scripting rules aggregated from every configured scripting file
#[derive(Debug, Clone, Default)]
pub struct Scripting {
    scripting: ScriptingData,
}

impl Scripting {
    /// Load the given files in order. The first file that fails to load
    /// aborts construction.
    pub fn new<I, P>(scripting_files: I) -> ScriptingResult<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut scripting = ScriptingData::new();
        for scripting_file in scripting_files {
            scripting.extend(ScriptingData::load_from_yaml(scripting_file)?);
        }
        Ok(Self { scripting })
    }

    pub fn from_data(scripting: ScriptingData) -> Self {
        Self { scripting }
    }

    pub fn data(&self) -> &ScriptingData {
        &self.scripting
    }

    /// Rule to apply to `testname` on `platform`, if any
    pub fn get_matched_scripting(
        &self,
        testname: &str,
        platform: &str,
    ) -> Option<&ScriptingElement> {
        let matched = self.scripting.find_matching_scripting(testname, platform)?;
        crate::twister_log_debug!(
            "{testname} scripting with reason: {}",
            matched.comment()
        );
        Some(matched)
    }
}
