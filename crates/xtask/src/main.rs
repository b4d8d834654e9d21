use std::collections::BTreeMap;

use anyhow::Context;
use serde::Deserialize;

/// Internal crates each workspace crate may depend on.
const ALLOWED: &[(&str, &[&str])] = &[
    ("nightfall-domain", &[]),
    ("nightfall-shared", &["nightfall-domain"]),
    ("nightfall-engine", &["nightfall-domain", "nightfall-shared"]),
    ("xtask", &[]),
];

#[derive(Deserialize)]
struct Metadata {
    packages: Vec<Package>,
}

#[derive(Deserialize)]
struct Package {
    name: String,
    dependencies: Vec<Dependency>,
}

#[derive(Deserialize)]
struct Dependency {
    name: String,
}

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("arch-check") => arch_check(),
        Some(cmd) => anyhow::bail!("Unknown xtask command: {cmd}"),
        None => anyhow::bail!("Usage: cargo xtask <command>\n\nCommands:\n  arch-check"),
    }
}

fn arch_check() -> anyhow::Result<()> {
    let output = std::process::Command::new("cargo")
        .args(["metadata", "--format-version", "1", "--no-deps"])
        .output()
        .context("running cargo metadata")?;

    if !output.status.success() {
        anyhow::bail!("cargo metadata failed")
    }

    let metadata: Metadata =
        serde_json::from_slice(&output.stdout).context("parsing cargo metadata")?;
    let violations = find_violations(&metadata);
    if !violations.is_empty() {
        for violation in &violations {
            eprintln!("  {violation}");
        }
        anyhow::bail!("arch-check failed with {} violation(s)", violations.len());
    }

    println!("arch-check OK ({} crates)", metadata.packages.len());
    Ok(())
}

fn find_violations(metadata: &Metadata) -> Vec<String> {
    let allowed: BTreeMap<&str, &[&str]> = ALLOWED.iter().copied().collect();
    let mut violations = Vec::new();

    for package in &metadata.packages {
        let Some(permitted) = allowed.get(package.name.as_str()) else {
            violations.push(format!("{} is not a known workspace crate", package.name));
            continue;
        };
        for dependency in &package.dependencies {
            let internal = allowed.contains_key(dependency.name.as_str());
            if internal && !permitted.contains(&dependency.name.as_str()) {
                violations.push(format!(
                    "{} must not depend on {}",
                    package.name, dependency.name
                ));
            }
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(name: &str, deps: &[&str]) -> Package {
        Package {
            name: name.to_string(),
            dependencies: deps
                .iter()
                .map(|d| Dependency { name: d.to_string() })
                .collect(),
        }
    }

    #[test]
    fn layered_workspace_passes() {
        let metadata = Metadata {
            packages: vec![
                package("nightfall-domain", &["serde", "uuid"]),
                package("nightfall-shared", &["nightfall-domain", "serde"]),
                package("nightfall-engine", &["nightfall-domain", "nightfall-shared", "tokio"]),
            ],
        };
        assert!(find_violations(&metadata).is_empty());
    }

    #[test]
    fn domain_reaching_into_the_engine_is_flagged() {
        let metadata = Metadata {
            packages: vec![package("nightfall-domain", &["nightfall-engine"])],
        };
        assert_eq!(
            find_violations(&metadata),
            vec!["nightfall-domain must not depend on nightfall-engine".to_string()]
        );
    }
}
