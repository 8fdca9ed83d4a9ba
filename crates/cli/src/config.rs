// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use regex::Regex;
use serde::Deserialize;

/// Contents of `extension.toml`, with every path resolved against the
/// directory the file lives in.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub entry: BTreeMap<String, Entry>,
    pub output: Output,
    #[serde(default)]
    pub optimization: Optimization,
    pub module: Module,
    #[serde(default)]
    pub copy: Vec<CopyPattern>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawEntry")]
pub struct Entry {
    pub path: PathBuf,
    /// Name of the wasm export the generated stub calls.
    pub start: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Path(PathBuf),
    Detailed {
        path: PathBuf,
        #[serde(default = "default_start")]
        start: String,
    },
}

impl From<RawEntry> for Entry {
    fn from(raw: RawEntry) -> Self {
        match raw {
            RawEntry::Path(path) => Entry {
                path,
                start: default_start(),
            },
            RawEntry::Detailed { path, start } => Entry { path, start },
        }
    }
}

fn default_start() -> String {
    "start".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Output {
    pub path: PathBuf,
    #[serde(default = "default_filename")]
    pub filename: String,
}

fn default_filename() -> String {
    "[name].js".into()
}

impl Output {
    /// Output file of the entry `name`.
    pub fn file_for(&self, name: &str) -> PathBuf {
        self.path.join(self.filename.replace("[name]", name))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Optimization {
    pub split_chunks: Option<SplitChunks>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SplitChunks {
    #[serde(default = "default_chunk_name")]
    pub name: String,
    #[serde(default)]
    pub chunks: Chunks,
}

fn default_chunk_name() -> String {
    "vendor".into()
}

/// Which chunks are eligible for splitting.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chunks {
    /// Chunks loaded when an entry starts
    Initial,
    /// Lazily imported chunks only
    #[default]
    Async,
    All,
}

impl Chunks {
    pub fn includes_initial(self) -> bool {
        matches!(self, Chunks::Initial | Chunks::All)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Module {
    pub rules: Vec<Rule>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    pub test: Test,
    pub loader: Loader,
}

/// Regex matched against entry paths.
#[derive(Debug, Deserialize)]
#[serde(try_from = "String")]
pub struct Test(Regex);

impl TryFrom<String> for Test {
    type Error = regex::Error;

    fn try_from(pattern: String) -> Result<Self, regex::Error> {
        Regex::new(&pattern).map(Test)
    }
}

impl Test {
    pub fn matches(&self, path: &Path) -> bool {
        self.0.is_match(&path.to_string_lossy())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Loader {
    /// Build the crate for `wasm32-unknown-unknown` and run `wasm-bindgen`
    WasmBindgen,
    /// Ship the file as is
    Copy,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CopyPattern {
    pub from: PathBuf,
    pub to: PathBuf,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Couldn't read {}", path.display()))?;

        let root = path.parent().unwrap_or(Path::new(""));

        Config::from_toml_str(&source, root)
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    pub fn from_toml_str(source: &str, root: &Path) -> anyhow::Result<Self> {
        let mut config: Config = toml::from_str(source)?;

        config.validate()?;
        config.resolve(root);

        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.entry.is_empty() {
            bail!("At least one `[entry]` is required");
        }
        if self.module.rules.is_empty() {
            bail!("At least one `[[module.rules]]` is required");
        }
        if !self.output.filename.contains("[name]") {
            bail!(
                "`output.filename` must contain `[name]`, got `{}`",
                self.output.filename
            );
        }
        if self.output.filename.contains(['/', '\\']) {
            bail!(
                "`output.filename` must be a plain file name, got `{}`",
                self.output.filename
            );
        }

        Ok(())
    }

    fn resolve(&mut self, root: &Path) {
        for entry in self.entry.values_mut() {
            entry.path = root.join(&entry.path);
        }
        for pattern in &mut self.copy {
            pattern.from = root.join(&pattern.from);
            pattern.to = root.join(&pattern.to);
        }
        self.output.path = root.join(&self.output.path);
    }

    /// Loader of the first rule matching `path`.
    pub fn loader_for(&self, path: &Path) -> Option<Loader> {
        self.module
            .rules
            .iter()
            .find(|rule| rule.test.matches(path))
            .map(|rule| rule.loader)
    }
}
