// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{bail, Context};
use serde::Deserialize;
use walkdir::WalkDir;

use crate::plan::{stub, Step};

#[derive(Debug, Default, Clone, Copy)]
pub struct Options {
    pub release: bool,
    /// Log the steps, but don't run them
    pub dry_run: bool,
}

pub fn execute<'a>(
    steps: impl IntoIterator<Item = &'a Step>,
    options: Options,
) -> anyhow::Result<()> {
    for step in steps {
        log::info!("{step}");

        if options.dry_run {
            continue;
        }

        match step {
            Step::Compile {
                manifest,
                module,
                out_dir,
            } => {
                let wasm = cargo_build(manifest, options.release)?;

                wasm_bindgen(&wasm, module, out_dir)?;
            }
            Step::Stub {
                path,
                module,
                start,
            } => {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(path, stub(module, start))
                    .with_context(|| format!("Couldn't write {}", path.display()))?;
            }
            Step::Copy { from, to } => {
                let files = copy_all(from, to)?;

                log::debug!("copied {files} file(s) to {}", to.display());
            }
        }
    }

    Ok(())
}

fn cargo_build(manifest: &Path, release: bool) -> anyhow::Result<PathBuf> {
    let cargo = env::var_os("CARGO").unwrap_or_else(|| OsString::from("cargo"));

    let mut command = Command::new(cargo);

    command
        .args(["build", "--target", "wasm32-unknown-unknown"])
        .arg("--message-format=json-render-diagnostics")
        .arg("--manifest-path")
        .arg(manifest)
        .stderr(Stdio::inherit());

    if release {
        command.arg("--release");
    }

    let output = command.output().context("Couldn't run `cargo`")?;

    if !output.status.success() {
        bail!("`cargo build` failed for {}", manifest.display());
    }

    wasm_artifact(&String::from_utf8_lossy(&output.stdout)).with_context(|| {
        format!(
            "`cargo build` produced no .wasm file for {}, is it a `cdylib`?",
            manifest.display()
        )
    })
}

fn wasm_bindgen(wasm: &Path, module: &str, out_dir: &Path) -> anyhow::Result<()> {
    let status = Command::new("wasm-bindgen")
        .args(["--target", "web"])
        .arg("--out-dir")
        .arg(out_dir)
        .arg("--out-name")
        .arg(module)
        .arg(wasm)
        .status()
        .context("Couldn't run `wasm-bindgen`, install it with `cargo install wasm-bindgen-cli`")?;

    if !status.success() {
        bail!("`wasm-bindgen` failed on {}", wasm.display());
    }

    Ok(())
}

#[derive(Deserialize)]
struct Message {
    reason: String,
    #[serde(default)]
    target: Option<Target>,
    #[serde(default)]
    filenames: Vec<PathBuf>,
}

#[derive(Deserialize)]
struct Target {
    kind: Vec<String>,
}

/// Last `.wasm` file of a `cdylib` artifact in cargo's JSON messages.
fn wasm_artifact(messages: &str) -> Option<PathBuf> {
    messages
        .lines()
        .filter_map(|line| serde_json::from_str::<Message>(line).ok())
        .filter(|message| message.reason == "compiler-artifact")
        .filter(|message| {
            message
                .target
                .as_ref()
                .is_some_and(|target| target.kind.iter().any(|kind| kind == "cdylib"))
        })
        .flat_map(|message| message.filenames)
        .filter(|file| file.extension().is_some_and(|ext| ext == "wasm"))
        .last()
}

/// Copy a file, or a directory tree, returning the number of files copied.
///
/// The whole tree is walked before anything is written, so a symlink loop
/// fails without leaving a partial copy behind.
fn copy_all(from: &Path, to: &Path) -> anyhow::Result<usize> {
    fs::metadata(from).with_context(|| format!("Couldn't read {}", from.display()))?;

    let mut dirs = Vec::new();
    let mut files = Vec::new();

    for entry in WalkDir::new(from).follow_links(true) {
        let entry = entry.with_context(|| format!("Couldn't walk {}", from.display()))?;
        let relative = entry.path().strip_prefix(from)?;

        let target = if relative.as_os_str().is_empty() {
            to.to_path_buf()
        } else {
            to.join(relative)
        };

        if entry.file_type().is_dir() {
            dirs.push(target);
        } else {
            files.push((entry.into_path(), target));
        }
    }

    for dir in &dirs {
        fs::create_dir_all(dir).with_context(|| format!("Couldn't create {}", dir.display()))?;
    }

    for (source, target) in &files {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(source, target).with_context(|| {
            format!("Couldn't copy {} to {}", source.display(), target.display())
        })?;
    }

    Ok(files.len())
}
