// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail};

use crate::config::{Config, Loader};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Build a crate to wasm and emit `<out_dir>/<module>.js` with its
    /// `<module>_bg.wasm`.
    Compile {
        manifest: PathBuf,
        module: String,
        out_dir: PathBuf,
    },
    /// Write an ES module that loads `module` and calls its `start` export.
    Stub {
        path: PathBuf,
        module: String,
        start: String,
    },
    Copy { from: PathBuf, to: PathBuf },
}

impl Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Compile {
                manifest,
                module,
                out_dir,
            } => write!(
                f,
                "compile {} -> {}",
                manifest.display(),
                out_dir.join(format!("{module}.js")).display()
            ),
            Step::Stub {
                path,
                module,
                start,
            } => write!(f, "stub    {} -> {module}.{start}()", path.display()),
            Step::Copy { from, to } => {
                write!(f, "copy    {} -> {}", from.display(), to.display())
            }
        }
    }
}

impl Step {
    /// Files this step creates.
    fn outputs(&self) -> Vec<PathBuf> {
        match self {
            Step::Compile {
                module, out_dir, ..
            } => vec![
                out_dir.join(format!("{module}.js")),
                out_dir.join(format!("{module}_bg.wasm")),
            ],
            Step::Stub { path, .. } => vec![path.clone()],
            Step::Copy { to, .. } => vec![to.clone()],
        }
    }
}

/// Reject plans where two entry steps write the same file.
fn check_outputs(steps: &[Step]) -> anyhow::Result<()> {
    let mut written = BTreeSet::new();

    for step in steps {
        for path in step.outputs() {
            if !written.insert(path) {
                bail!("`{step}` overwrites the output of an earlier step");
            }
        }
    }

    Ok(())
}

/// Source of an entry stub. No top-level `await`, service workers reject it.
pub fn stub(module: &str, start: &str) -> String {
    format!(
        "import init, {{ {start} }} from \"./{module}.js\";\n\
         \n\
         init().then(() => {start}());\n"
    )
}

#[derive(Debug, Default)]
pub struct Plan {
    /// Compile, stub and copy steps of the entries, in entry name order
    pub entries: Vec<Step>,
    /// Static assets, always after the entries
    pub assets: Vec<Step>,
}

impl Plan {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        // Entries are initial chunks, so only those policies split them.
        let split = config
            .optimization
            .split_chunks
            .as_ref()
            .filter(|split| split.chunks.includes_initial());

        if let Some(split) = split {
            if config.entry.contains_key(&split.name) {
                bail!(
                    "Entry `{}` has the same name as the shared chunk",
                    split.name
                );
            }
        }

        let mut routed = Vec::with_capacity(config.entry.len());
        let mut users: BTreeMap<&Path, usize> = BTreeMap::new();

        for (name, entry) in &config.entry {
            let loader = config.loader_for(&entry.path).ok_or_else(|| {
                anyhow!(
                    "No rule matches entry `{name}` ({})",
                    entry.path.display()
                )
            })?;

            if loader == Loader::WasmBindgen {
                *users.entry(entry.path.as_path()).or_default() += 1;
            }

            routed.push((name, entry, loader));
        }

        let mut plan = Plan::default();
        let mut compiled = BTreeSet::new();

        for (name, entry, loader) in routed {
            let path = config.output.file_for(name);

            match loader {
                Loader::Copy => plan.entries.push(Step::Copy {
                    from: entry.path.clone(),
                    to: path,
                }),
                Loader::WasmBindgen => {
                    let module = match split {
                        Some(split) if users[entry.path.as_path()] > 1 => split.name.clone(),
                        _ => format!("{name}_module"),
                    };

                    if compiled.insert(module.clone()) {
                        plan.entries.push(Step::Compile {
                            manifest: entry.path.clone(),
                            module: module.clone(),
                            out_dir: config.output.path.clone(),
                        });
                    }

                    plan.entries.push(Step::Stub {
                        path,
                        module,
                        start: entry.start.clone(),
                    });
                }
            }
        }

        check_outputs(&plan.entries)?;

        plan.assets = config
            .copy
            .iter()
            .map(|pattern| Step::Copy {
                from: pattern.from.clone(),
                to: pattern.to.clone(),
            })
            .collect();

        Ok(plan)
    }

    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.entries.iter().chain(&self.assets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(source: &str) -> anyhow::Result<Plan> {
        Plan::new(&Config::from_toml_str(source, Path::new("/ext"))?)
    }

    const RULES: &str = r#"
        [[module.rules]]
        test = 'Cargo\.toml$'
        loader = "wasm-bindgen"

        [[module.rules]]
        test = '\.js$'
        loader = "copy"
    "#;

    fn with_rules(head: &str) -> String {
        format!("{head}\n{RULES}")
    }

    #[test]
    fn shared_crate_is_split_into_vendor_chunk() {
        let plan = plan(&with_rules(
            r#"
            [entry]
            app = "ext/Cargo.toml"
            options = "ext/Cargo.toml"

            [output]
            path = "dist/js"

            [optimization.split_chunks]
            name = "vendor"
            chunks = "initial"

            [[copy]]
            from = "public"
            to = "dist"
            "#,
        ))
        .unwrap();

        assert_eq!(
            plan.entries,
            [
                Step::Compile {
                    manifest: "/ext/ext/Cargo.toml".into(),
                    module: "vendor".into(),
                    out_dir: "/ext/dist/js".into(),
                },
                Step::Stub {
                    path: "/ext/dist/js/app.js".into(),
                    module: "vendor".into(),
                    start: "start".into(),
                },
                Step::Stub {
                    path: "/ext/dist/js/options.js".into(),
                    module: "vendor".into(),
                    start: "start".into(),
                },
            ]
        );
        assert_eq!(
            plan.assets,
            [Step::Copy {
                from: "/ext/public".into(),
                to: "/ext/dist".into(),
            }]
        );
        assert_eq!(plan.steps().count(), 4);
    }

    #[test]
    fn without_splitting_every_entry_compiles_alone() {
        let plan = plan(&with_rules(
            r#"
            [entry]
            app = "ext/Cargo.toml"
            options = { path = "ext/Cargo.toml", start = "options" }

            [output]
            path = "dist"
            "#,
        ))
        .unwrap();

        let modules: Vec<_> = plan
            .entries
            .iter()
            .filter_map(|step| match step {
                Step::Compile { module, .. } => Some(module.as_str()),
                _ => None,
            })
            .collect();

        assert_eq!(modules, ["app_module", "options_module"]);
        assert_eq!(
            plan.entries[3],
            Step::Stub {
                path: "/ext/dist/options.js".into(),
                module: "options_module".into(),
                start: "options".into(),
            }
        );
    }

    #[test]
    fn async_policy_leaves_entries_alone() {
        let plan = plan(&with_rules(
            r#"
            [entry]
            app = "ext/Cargo.toml"
            options = "ext/Cargo.toml"

            [output]
            path = "dist"

            [optimization.split_chunks]
            chunks = "async"
            "#,
        ))
        .unwrap();

        let compiles = plan
            .entries
            .iter()
            .filter(|step| matches!(step, Step::Compile { .. }))
            .count();

        assert_eq!(compiles, 2);
    }

    #[test]
    fn single_user_crate_is_not_split() {
        let plan = plan(&with_rules(
            r#"
            [entry]
            app = "app/Cargo.toml"
            options = "options/Cargo.toml"

            [output]
            path = "dist"

            [optimization.split_chunks]
            chunks = "all"
            "#,
        ))
        .unwrap();

        assert!(matches!(
            &plan.entries[0],
            Step::Compile { module, .. } if module == "app_module"
        ));
    }

    #[test]
    fn plain_js_entries_are_copied() {
        let plan = plan(&with_rules(
            r#"
            [entry]
            legacy = "src/legacy.js"

            [output]
            path = "dist"
            filename = "[name].bundle.js"
            "#,
        ))
        .unwrap();

        assert_eq!(
            plan.entries,
            [Step::Copy {
                from: "/ext/src/legacy.js".into(),
                to: "/ext/dist/legacy.bundle.js".into(),
            }]
        );
    }

    #[test]
    fn unmatched_entry_is_an_error() {
        let err = plan(&with_rules(
            r#"
            [entry]
            app = "src/App/App.fsproj"

            [output]
            path = "dist"
            "#,
        ))
        .unwrap_err();

        assert!(err.to_string().contains("`app`"), "{err}");
    }

    #[test]
    fn entry_named_like_shared_chunk() {
        let err = plan(&with_rules(
            r#"
            [entry]
            vendor = "ext/Cargo.toml"

            [output]
            path = "dist"

            [optimization.split_chunks]
            chunks = "initial"
            "#,
        ))
        .unwrap_err();

        assert!(err.to_string().contains("shared chunk"), "{err}");
    }

    #[test]
    fn module_name_colliding_with_entry_output() {
        let err = plan(&with_rules(
            r#"
            [entry]
            a = "a/Cargo.toml"
            a_module = "b/Cargo.toml"

            [output]
            path = "dist"
            "#,
        ))
        .unwrap_err();

        assert!(err.to_string().contains("/ext/dist/a_module.js"), "{err}");
    }

    #[test]
    fn copied_entry_colliding_with_stub() {
        let err = plan(&with_rules(
            r#"
            [entry]
            app = "app/Cargo.toml"
            app_module = "legacy.js"

            [output]
            path = "dist"
            "#,
        ))
        .unwrap_err();

        assert!(err.to_string().contains("overwrites"), "{err}");
    }

    #[test]
    fn stub_source() {
        assert_eq!(
            stub("vendor", "start"),
            "import init, { start } from \"./vendor.js\";\n\ninit().then(() => start());\n"
        );
    }
}
